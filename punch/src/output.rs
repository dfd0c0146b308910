//! Text and JSON rendering

use anyhow::Result;
use clap::ValueEnum;
use libticketpunch::board::{ProjectColumn, TicketColumn};
use libticketpunch::{Project, Ticket, TicketStatus, User};
use serde::Serialize;
use serde_json::json;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

pub struct Printer {
    format: OutputFormat,
}

impl Printer {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    fn json<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    pub fn message(&self, text: &str) -> Result<()> {
        match self.format {
            OutputFormat::Json => self.json(&json!({ "message": text })),
            OutputFormat::Text => {
                println!("{}", text);
                Ok(())
            }
        }
    }

    /// The token is never printed
    pub fn user(&self, user: &User, verb: &str) -> Result<()> {
        match self.format {
            OutputFormat::Json => self.json(&json!({ "id": user.id, "email": user.email })),
            OutputFormat::Text => {
                println!("{} as {} (user {})", verb, user.email, user.id);
                Ok(())
            }
        }
    }

    pub fn projects(&self, projects: &[Project]) -> Result<()> {
        if self.format == OutputFormat::Json {
            return self.json(projects);
        }
        if projects.is_empty() {
            println!("No projects found");
        }
        for project in projects {
            println!("{}", project_line(project));
        }
        Ok(())
    }

    pub fn project(&self, project: &Project) -> Result<()> {
        match self.format {
            OutputFormat::Json => self.json(project),
            OutputFormat::Text => {
                println!("Project #{}: {}", project.id, project.title);
                println!("Status: {}", project.status.label());
                if !project.description.is_empty() {
                    println!();
                    println!("{}", project.description);
                }
                Ok(())
            }
        }
    }

    pub fn tickets(&self, tickets: &[Ticket]) -> Result<()> {
        if self.format == OutputFormat::Json {
            return self.json(tickets);
        }
        if tickets.is_empty() {
            println!("No tickets found");
        }
        for ticket in tickets {
            println!("{}", ticket_line(ticket));
        }
        Ok(())
    }

    pub fn ticket(&self, ticket: &Ticket) -> Result<()> {
        match self.format {
            OutputFormat::Json => self.json(ticket),
            OutputFormat::Text => {
                println!("Ticket #{}: {}", ticket.id, ticket.title);
                println!("Project: {}", ticket.project_id);
                println!("Status: {}", ticket.status.label());
                println!("Bug: {}", if ticket.bug { "yes" } else { "no" });
                if ticket.archived {
                    println!("Archived: yes");
                }
                if !ticket.description.is_empty() {
                    println!();
                    println!("{}", ticket.description);
                }
                Ok(())
            }
        }
    }

    pub fn deleted(&self, kind: &str, id: i64) -> Result<()> {
        match self.format {
            OutputFormat::Json => self.json(&json!({ "deleted": kind, "id": id })),
            OutputFormat::Text => {
                println!("Deleted {} {}", kind, id);
                Ok(())
            }
        }
    }

    pub fn project_board(&self, columns: &[ProjectColumn<'_>]) -> Result<()> {
        if self.format == OutputFormat::Json {
            let value: Vec<_> = columns
                .iter()
                .map(|c| json!({ "status": c.status, "items": c.items }))
                .collect();
            return self.json(&value);
        }
        for (i, column) in columns.iter().enumerate() {
            if i > 0 {
                println!();
            }
            println!("{} ({})", column.status.label(), column.len());
            for project in &column.items {
                println!("  #{} {}", project.id, project.title);
            }
        }
        Ok(())
    }

    pub fn ticket_board(&self, columns: &[TicketColumn<'_>]) -> Result<()> {
        if self.format == OutputFormat::Json {
            let value: Vec<_> = columns
                .iter()
                .map(|c| json!({ "status": c.status, "items": c.items }))
                .collect();
            return self.json(&value);
        }
        for (i, column) in columns.iter().enumerate() {
            if i > 0 {
                println!();
            }
            println!("{} ({})", column.status.label(), column.len());
            for ticket in &column.items {
                let bug = if ticket.bug { " [bug]" } else { "" };
                println!("  #{} {}{}", ticket.id, ticket.title, bug);
            }
        }
        Ok(())
    }
}

fn project_line(project: &Project) -> String {
    format!(
        "{:>4}  {:<13}  {}",
        project.id,
        project.status.as_str(),
        project.title
    )
}

fn ticket_line(ticket: &Ticket) -> String {
    let mut line = format!(
        "{:>4}  {:<13}  {}",
        ticket.id,
        ticket.status.as_str(),
        ticket.title
    );
    if ticket.bug {
        line.push_str(" [bug]");
    }
    if ticket.archived && ticket.status != TicketStatus::Archived {
        line.push_str(" (archived)");
    }
    line
}

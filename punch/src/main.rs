//! punch - command-line front-end for Ticket Punch
//!
//! Every command restores the saved session, validates its input with the
//! same form rules the web front-end uses, and only then talks to the API.

mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use libticketpunch::board::{project_board, ticket_board};
use libticketpunch::forms::{
    login_form, project_edit_form, project_form, registration_form, ticket_form, Form,
};
use libticketpunch::logging;
use libticketpunch::types::{ProjectId, TicketId};
use libticketpunch::{
    Credentials, NewProject, NewTicket, ProjectEdits, ProjectStatus, TicketEdits,
    TicketPunchError, TicketPunchService, TicketStatus, User,
};
use std::io::{self, BufRead};
use tracing::debug;

use crate::output::{OutputFormat, Printer};

#[derive(Parser)]
#[command(name = "punch")]
#[command(about = "Track projects and tickets from the terminal", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account and log in
    Register {
        email: String,

        /// Read the password from stdin instead of prompting
        #[arg(long)]
        password_stdin: bool,
    },

    /// Log in and save the session
    Login {
        email: String,

        /// Read the password from stdin instead of prompting
        #[arg(long)]
        password_stdin: bool,
    },

    /// Discard the saved session
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Manage projects
    #[command(subcommand)]
    Projects(ProjectCommands),

    /// Manage tickets
    #[command(subcommand)]
    Tickets(TicketCommands),
}

#[derive(Subcommand)]
enum ProjectCommands {
    /// List your projects
    List,

    /// Show one project
    Show { id: ProjectId },

    /// Create a project
    Create {
        #[arg(long)]
        title: String,

        #[arg(long)]
        description: String,

        /// working_on_it or done
        #[arg(long, default_value_t = ProjectStatus::WorkingOnIt)]
        status: ProjectStatus,
    },

    /// Change a project's fields
    Edit {
        id: ProjectId,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        status: Option<ProjectStatus>,
    },

    /// Delete a project and its tickets
    Delete { id: ProjectId },

    /// Show your projects grouped by status
    Board,
}

#[derive(Subcommand)]
enum TicketCommands {
    /// List the tickets of a project
    List { project_id: ProjectId },

    /// Show one ticket
    Show { id: TicketId },

    /// Create a ticket in a project
    Create {
        project_id: ProjectId,

        #[arg(long)]
        title: String,

        #[arg(long)]
        description: String,

        /// stuck, working_on_it, done or archived
        #[arg(long, default_value_t = TicketStatus::WorkingOnIt)]
        status: TicketStatus,

        /// Mark the ticket as a bug
        #[arg(long)]
        bug: bool,
    },

    /// Change a ticket's fields
    Edit {
        id: TicketId,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        status: Option<TicketStatus>,

        /// true or false
        #[arg(long)]
        bug: Option<bool>,

        /// true or false
        #[arg(long)]
        archived: Option<bool>,

        /// Move the ticket to another project
        #[arg(long = "project")]
        project_id: Option<ProjectId>,
    },

    /// Delete a ticket
    Delete { id: TicketId },

    /// Show a project's tickets grouped by status
    Board {
        project_id: ProjectId,

        /// Include the archived column
        #[arg(long)]
        archived: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let logging = logging::config_from_env().verbose(cli.verbose);
    if let Err(e) = logging.try_init() {
        eprintln!("Warning: failed to initialise logging: {}", e);
    }

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(exit_code(&e));
    }
}

fn exit_code(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<TicketPunchError>()
        .map(TicketPunchError::exit_code)
        .unwrap_or(1)
}

async fn run(cli: Cli) -> Result<()> {
    let printer = Printer::new(cli.format);
    let service = TicketPunchService::new()?;

    match cli.command {
        Commands::Register {
            email,
            password_stdin,
        } => authenticate(&service, &printer, &email, password_stdin, true).await,
        Commands::Login {
            email,
            password_stdin,
        } => authenticate(&service, &printer, &email, password_stdin, false).await,
        Commands::Logout => {
            service.users().logout()?;
            printer.message("Logged out")
        }
        Commands::Whoami => {
            let user = require_session(&service)?;
            printer.user(&user, "Logged in")
        }
        Commands::Projects(command) => run_projects(&service, &printer, command).await,
        Commands::Tickets(command) => run_tickets(&service, &printer, command).await,
    }
}

async fn authenticate(
    service: &TicketPunchService,
    printer: &Printer,
    email: &str,
    password_stdin: bool,
    register: bool,
) -> Result<()> {
    let form = if register {
        registration_form()
    } else {
        login_form()
    };

    // Reject a bad address before asking for a password
    if let Some(msg) = form.validate_field("email", email) {
        return Err(invalid(msg));
    }

    let password = read_password(password_stdin)?;
    let values = form
        .validate([("email", email), ("password", password.as_str())])
        .map_err(TicketPunchError::from)?;
    let credentials = Credentials::new(values.get("email"), values.get("password"));

    let user = if register {
        service.users().register(credentials).await?
    } else {
        service.users().login(credentials).await?
    };

    printer.user(&user, if register { "Registered" } else { "Logged in" })
}

async fn run_projects(
    service: &TicketPunchService,
    printer: &Printer,
    command: ProjectCommands,
) -> Result<()> {
    let user = require_session(service)?;
    let projects = service.projects();

    match command {
        ProjectCommands::List => {
            let list = projects.fetch_all(user.id).await?;
            printer.projects(&list)
        }
        ProjectCommands::Show { id } => {
            let project = projects.fetch(id).await?;
            printer.project(&project)
        }
        ProjectCommands::Create {
            title,
            description,
            status,
        } => {
            let values = project_form()
                .validate([("title", title.as_str()), ("description", description.as_str())])
                .map_err(TicketPunchError::from)?;
            let project = projects
                .create(NewProject {
                    title: values.get("title").to_string(),
                    description: values.get("description").to_string(),
                    status,
                    user_id: user.id,
                })
                .await?;
            printer.project(&project)
        }
        ProjectCommands::Edit {
            id,
            title,
            description,
            status,
        } => {
            let form = project_edit_form();
            let edits = ProjectEdits {
                title: checked(&form, "title", title)?,
                description: checked(&form, "description", description)?,
                status,
            };
            let project = projects.update(id, edits).await?;
            printer.project(&project)
        }
        ProjectCommands::Delete { id } => {
            let removed = projects.delete(id).await?;
            printer.deleted("project", removed)
        }
        ProjectCommands::Board => {
            let list = projects.fetch_all(user.id).await?;
            printer.project_board(&project_board(&list))
        }
    }
}

async fn run_tickets(
    service: &TicketPunchService,
    printer: &Printer,
    command: TicketCommands,
) -> Result<()> {
    require_session(service)?;
    let tickets = service.tickets();

    match command {
        TicketCommands::List { project_id } => {
            let list = tickets.fetch_all(project_id).await?;
            printer.tickets(&list)
        }
        TicketCommands::Show { id } => {
            let ticket = tickets.fetch(id).await?;
            printer.ticket(&ticket)
        }
        TicketCommands::Create {
            project_id,
            title,
            description,
            status,
            bug,
        } => {
            let values = ticket_form()
                .validate([("title", title.as_str()), ("description", description.as_str())])
                .map_err(TicketPunchError::from)?;
            let ticket = tickets
                .create(NewTicket {
                    project_id,
                    title: values.get("title").to_string(),
                    description: values.get("description").to_string(),
                    status,
                    bug,
                    archived: status == TicketStatus::Archived,
                })
                .await?;
            printer.ticket(&ticket)
        }
        TicketCommands::Edit {
            id,
            title,
            description,
            status,
            bug,
            archived,
            project_id,
        } => {
            let form = ticket_form();
            let edits = TicketEdits {
                project_id,
                title: checked(&form, "title", title)?,
                description: checked(&form, "description", description)?,
                status,
                bug,
                archived,
            };
            let ticket = tickets.update(id, edits).await?;
            printer.ticket(&ticket)
        }
        TicketCommands::Delete { id } => {
            let removed = tickets.delete(id).await?;
            printer.deleted("ticket", removed)
        }
        TicketCommands::Board {
            project_id,
            archived,
        } => {
            let list = tickets.fetch_all(project_id).await?;
            printer.ticket_board(&ticket_board(&list, archived))
        }
    }
}

/// Load the saved session or fail with `NotAuthenticated`
fn require_session(service: &TicketPunchService) -> Result<User> {
    service.users().restore()?;
    let user = service.require_user()?;
    debug!(user_id = user.id, "Using saved session");
    Ok(user)
}

/// Validate an optional edit field; absent fields pass untouched
fn checked(form: &Form, field: &str, value: Option<String>) -> Result<Option<String>> {
    match value {
        None => Ok(None),
        Some(value) => match form.validate_field(field, &value) {
            Some(msg) => Err(invalid(msg)),
            None => Ok(Some(value.trim().to_string())),
        },
    }
}

fn invalid(msg: &str) -> anyhow::Error {
    TicketPunchError::InvalidInput(msg.to_string()).into()
}

fn read_password(from_stdin: bool) -> Result<String> {
    if from_stdin {
        let mut line = String::new();
        io::stdin()
            .lock()
            .read_line(&mut line)
            .context("Failed to read password from stdin")?;
        Ok(line.trim_end_matches(|c| c == '\r' || c == '\n').to_string())
    } else {
        rpassword::prompt_password("Password: ").context("Failed to read password")
    }
}

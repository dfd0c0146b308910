//! Core types for Ticket Punch

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub type UserId = i64;
pub type ProjectId = i64;
pub type TicketId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(alias = "user_id")]
    pub id: UserId,
    pub email: String,
    pub token: String,
}

/// Login/registration input. The password is never logged or echoed.
#[derive(Debug)]
pub struct Credentials {
    pub email: String,
    pub password: SecretString,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: SecretString::from(password.into()),
        }
    }

    /// JSON request body `{email, password}`
    pub(crate) fn to_body(&self) -> serde_json::Value {
        serde_json::json!({
            "email": self.email,
            "password": self.password.expose_secret(),
        })
    }
}

// ============================================================================
// Projects
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    #[default]
    WorkingOnIt,
    Done,
}

impl ProjectStatus {
    pub const ALL: [ProjectStatus; 2] = [ProjectStatus::WorkingOnIt, ProjectStatus::Done];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::WorkingOnIt => "working_on_it",
            ProjectStatus::Done => "done",
        }
    }

    /// Column heading used on the board
    pub fn label(&self) -> &'static str {
        match self {
            ProjectStatus::WorkingOnIt => "Working on it",
            ProjectStatus::Done => "Done",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "working_on_it" => Ok(ProjectStatus::WorkingOnIt),
            "done" => Ok(ProjectStatus::Done),
            _ => Err(format!(
                "Invalid project status: '{}'. Valid options: working_on_it, done",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub user_id: UserId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: ProjectStatus,
}

/// POST /projects body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewProject {
    pub title: String,
    pub description: String,
    pub status: ProjectStatus,
    pub user_id: UserId,
}

/// PUT /projects/{id} body; absent fields are left out of the request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProjectEdits {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ProjectStatus>,
}

impl ProjectEdits {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.status.is_none()
    }
}

// ============================================================================
// Tickets
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Stuck,
    #[default]
    WorkingOnIt,
    Done,
    Archived,
}

impl TicketStatus {
    pub const ALL: [TicketStatus; 4] = [
        TicketStatus::Stuck,
        TicketStatus::WorkingOnIt,
        TicketStatus::Done,
        TicketStatus::Archived,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Stuck => "stuck",
            TicketStatus::WorkingOnIt => "working_on_it",
            TicketStatus::Done => "done",
            TicketStatus::Archived => "archived",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TicketStatus::Stuck => "Stuck",
            TicketStatus::WorkingOnIt => "Working on it",
            TicketStatus::Done => "Done",
            TicketStatus::Archived => "Archived",
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "stuck" => Ok(TicketStatus::Stuck),
            "working_on_it" => Ok(TicketStatus::WorkingOnIt),
            "done" => Ok(TicketStatus::Done),
            "archived" => Ok(TicketStatus::Archived),
            _ => Err(format!(
                "Invalid ticket status: '{}'. Valid options: stuck, working_on_it, done, archived",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: TicketId,
    pub project_id: ProjectId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: TicketStatus,
    #[serde(default)]
    pub bug: bool,
    #[serde(default)]
    pub archived: bool,
}

impl Ticket {
    /// Archived either by status or by flag
    pub fn is_archived(&self) -> bool {
        self.archived || self.status == TicketStatus::Archived
    }
}

/// POST /tickets body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewTicket {
    pub project_id: ProjectId,
    pub title: String,
    pub description: String,
    pub status: TicketStatus,
    pub bug: bool,
    pub archived: bool,
}

/// PUT /tickets/{id} body
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TicketEdits {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<ProjectId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TicketStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bug: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archived: Option<bool>,
}

impl TicketEdits {
    pub fn is_empty(&self) -> bool {
        self.project_id.is_none()
            && self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.bug.is_none()
            && self.archived.is_none()
    }
}

//! Modal visibility flags
//!
//! Each modal is independently open or closed. The state layer does not
//! enforce mutual exclusion; callers avoid opening conflicting modals.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modal {
    /// Welcome / registration
    Register,
    Login,
    Help,
    AddProject,
    EditProject,
    DeleteProject,
    AddTicket,
    EditTicket,
    DeleteTicket,
}

impl Modal {
    pub const ALL: [Modal; 9] = [
        Modal::Register,
        Modal::Login,
        Modal::Help,
        Modal::AddProject,
        Modal::EditProject,
        Modal::DeleteProject,
        Modal::AddTicket,
        Modal::EditTicket,
        Modal::DeleteTicket,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Modal::Register => "register",
            Modal::Login => "login",
            Modal::Help => "help",
            Modal::AddProject => "add_project",
            Modal::EditProject => "edit_project",
            Modal::DeleteProject => "delete_project",
            Modal::AddTicket => "add_ticket",
            Modal::EditTicket => "edit_ticket",
            Modal::DeleteTicket => "delete_ticket",
        }
    }
}

impl fmt::Display for Modal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Modal {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Modal::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| format!("Unknown modal: '{}'", s))
    }
}

/// One visibility flag per modal, all closed by default
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModalState {
    pub register: bool,
    pub login: bool,
    pub help: bool,
    pub add_project: bool,
    pub edit_project: bool,
    pub delete_project: bool,
    pub add_ticket: bool,
    pub edit_ticket: bool,
    pub delete_ticket: bool,
}

impl ModalState {
    pub fn is_open(&self, modal: Modal) -> bool {
        match modal {
            Modal::Register => self.register,
            Modal::Login => self.login,
            Modal::Help => self.help,
            Modal::AddProject => self.add_project,
            Modal::EditProject => self.edit_project,
            Modal::DeleteProject => self.delete_project,
            Modal::AddTicket => self.add_ticket,
            Modal::EditTicket => self.edit_ticket,
            Modal::DeleteTicket => self.delete_ticket,
        }
    }

    /// Copy with `modal` set to `open`; other flags untouched
    pub fn with(self, modal: Modal, open: bool) -> Self {
        let mut next = self;
        let flag = match modal {
            Modal::Register => &mut next.register,
            Modal::Login => &mut next.login,
            Modal::Help => &mut next.help,
            Modal::AddProject => &mut next.add_project,
            Modal::EditProject => &mut next.edit_project,
            Modal::DeleteProject => &mut next.delete_project,
            Modal::AddTicket => &mut next.add_ticket,
            Modal::EditTicket => &mut next.edit_ticket,
            Modal::DeleteTicket => &mut next.delete_ticket,
        };
        *flag = open;
        next
    }

    /// Modals currently open, in declaration order
    pub fn open_modals(&self) -> Vec<Modal> {
        Modal::ALL.iter().copied().filter(|m| self.is_open(*m)).collect()
    }
}

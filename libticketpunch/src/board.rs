//! Kanban board grouping
//!
//! Projects and tickets are shown in status columns. Grouping never
//! reorders: within a column, items keep the order of the input list.

use crate::types::{Project, ProjectStatus, Ticket, TicketStatus};

/// One status column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column<'a, T, S> {
    pub status: S,
    pub items: Vec<&'a T>,
}

impl<T, S> Column<'_, T, S> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

pub type ProjectColumn<'a> = Column<'a, Project, ProjectStatus>;
pub type TicketColumn<'a> = Column<'a, Ticket, TicketStatus>;

/// Project columns in display order: working on it, then done
pub fn project_board(projects: &[Project]) -> Vec<ProjectColumn<'_>> {
    ProjectStatus::ALL
        .iter()
        .map(|&status| Column {
            status,
            items: projects.iter().filter(|p| p.status == status).collect(),
        })
        .collect()
}

/// Ticket columns in display order: stuck, working on it, done
///
/// A ticket archived by status or by flag goes only to the archived
/// column, which is appended when `show_archived` is set.
pub fn ticket_board(tickets: &[Ticket], show_archived: bool) -> Vec<TicketColumn<'_>> {
    let mut columns: Vec<TicketColumn<'_>> = [
        TicketStatus::Stuck,
        TicketStatus::WorkingOnIt,
        TicketStatus::Done,
    ]
    .iter()
    .map(|&status| Column {
        status,
        items: tickets
            .iter()
            .filter(|t| !t.is_archived() && t.status == status)
            .collect(),
    })
    .collect();

    if show_archived {
        columns.push(Column {
            status: TicketStatus::Archived,
            items: tickets.iter().filter(|t| t.is_archived()).collect(),
        });
    }

    columns
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(id: i64, status: ProjectStatus) -> Project {
        Project {
            id,
            user_id: 1,
            title: format!("Project {}", id),
            description: String::new(),
            status,
        }
    }

    fn ticket(id: i64, status: TicketStatus, archived: bool) -> Ticket {
        Ticket {
            id,
            project_id: 1,
            title: format!("Ticket {}", id),
            description: String::new(),
            status,
            bug: false,
            archived,
        }
    }

    fn ids<T, S>(column: &Column<'_, T, S>, id: impl Fn(&T) -> i64) -> Vec<i64> {
        column.items.iter().map(|item| id(*item)).collect()
    }

    #[test]
    fn test_project_columns_in_order() {
        let projects = vec![
            project(1, ProjectStatus::Done),
            project(2, ProjectStatus::WorkingOnIt),
            project(3, ProjectStatus::Done),
        ];

        let board = project_board(&projects);

        assert_eq!(board.len(), 2);
        assert_eq!(board[0].status, ProjectStatus::WorkingOnIt);
        assert_eq!(ids(&board[0], |p| p.id), vec![2]);
        assert_eq!(board[1].status, ProjectStatus::Done);
        assert_eq!(ids(&board[1], |p| p.id), vec![1, 3]);
    }

    #[test]
    fn test_archived_tickets_hidden_by_default() {
        let tickets = vec![
            ticket(1, TicketStatus::Stuck, false),
            ticket(2, TicketStatus::Done, true),
            ticket(3, TicketStatus::Archived, false),
            ticket(4, TicketStatus::WorkingOnIt, false),
        ];

        let board = ticket_board(&tickets, false);

        assert_eq!(board.len(), 3);
        assert_eq!(ids(&board[0], |t| t.id), vec![1]);
        assert_eq!(ids(&board[1], |t| t.id), vec![4]);
        assert!(board[2].is_empty());
    }

    #[test]
    fn test_archived_column_on_request() {
        let tickets = vec![
            ticket(1, TicketStatus::Done, true),
            ticket(2, TicketStatus::Done, false),
            ticket(3, TicketStatus::Archived, false),
        ];

        let board = ticket_board(&tickets, true);

        assert_eq!(board.len(), 4);
        assert_eq!(board[3].status, TicketStatus::Archived);
        assert_eq!(ids(&board[3], |t| t.id), vec![1, 3]);
        assert_eq!(board[2].len(), 1);
    }

    #[test]
    fn test_empty_board() {
        assert!(project_board(&[]).iter().all(|c| c.is_empty()));
        assert_eq!(ticket_board(&[], true).len(), 4);
    }
}

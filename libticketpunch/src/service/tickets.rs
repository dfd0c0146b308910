//! Ticket operations

use std::sync::Arc;

use super::perform;
use crate::error::{Result, TicketPunchError};
use crate::repository::TicketRepository;
use crate::store::{Operation, Store, TicketAction};
use crate::types::{NewTicket, ProjectId, Ticket, TicketEdits, TicketId};

const KIND: &str = "ticket";

#[derive(Clone)]
pub struct TicketService {
    repo: Arc<dyn TicketRepository>,
    store: Arc<Store>,
}

impl TicketService {
    pub fn new(repo: Arc<dyn TicketRepository>, store: Arc<Store>) -> Self {
        Self { repo, store }
    }

    /// GET /tickets/project/{projectId}; replaces the ticket list
    pub async fn fetch_all(&self, project_id: ProjectId) -> Result<Vec<Ticket>> {
        perform(
            &self.store,
            KIND,
            Operation::FetchAll,
            self.repo.list_tickets(project_id),
            |tickets: &Vec<Ticket>| TicketAction::FetchAllSuccess(tickets.clone()),
        )
        .await
    }

    /// GET /tickets/{ticketId}
    pub async fn fetch(&self, ticket_id: TicketId) -> Result<Ticket> {
        perform(
            &self.store,
            KIND,
            Operation::Fetch,
            self.repo.get_ticket(ticket_id),
            |ticket: &Ticket| TicketAction::FetchSuccess(ticket.clone()),
        )
        .await
    }

    /// POST /tickets
    pub async fn create(&self, ticket: NewTicket) -> Result<Ticket> {
        perform(
            &self.store,
            KIND,
            Operation::Create,
            self.repo.create_ticket(&ticket),
            |ticket: &Ticket| TicketAction::CreateSuccess(ticket.clone()),
        )
        .await
    }

    /// PUT /tickets/{ticketId}
    pub async fn update(&self, ticket_id: TicketId, edits: TicketEdits) -> Result<Ticket> {
        if edits.is_empty() {
            return Err(TicketPunchError::InvalidInput(
                "Nothing to update".to_string(),
            ));
        }
        perform(
            &self.store,
            KIND,
            Operation::Update,
            self.repo.update_ticket(ticket_id, &edits),
            |ticket: &Ticket| TicketAction::UpdateSuccess(ticket.clone()),
        )
        .await
    }

    /// DELETE /tickets/{ticketId}
    pub async fn delete(&self, ticket_id: TicketId) -> Result<TicketId> {
        perform(
            &self.store,
            KIND,
            Operation::Delete,
            self.repo.delete_ticket(ticket_id),
            |id: &TicketId| TicketAction::DeleteSuccess(*id),
        )
        .await
    }

    /// Select a ticket for editing
    pub fn target(&self, ticket: Ticket) {
        self.store.dispatch(TicketAction::Target(ticket).into());
    }

    pub fn clear_target(&self) {
        self.store.dispatch(TicketAction::ClearTarget.into());
    }
}

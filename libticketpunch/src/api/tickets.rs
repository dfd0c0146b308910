//! Ticket endpoints

use async_trait::async_trait;

use super::ApiClient;
use crate::error::Result;
use crate::repository::TicketRepository;
use crate::types::{NewTicket, ProjectId, Ticket, TicketEdits, TicketId};

#[async_trait]
impl TicketRepository for ApiClient {
    async fn list_tickets(&self, project_id: ProjectId) -> Result<Vec<Ticket>> {
        self.get(&format!("/tickets/project/{}", project_id)).await
    }

    async fn get_ticket(&self, ticket_id: TicketId) -> Result<Ticket> {
        self.get(&format!("/tickets/{}", ticket_id)).await
    }

    async fn create_ticket(&self, ticket: &NewTicket) -> Result<Ticket> {
        self.post("/tickets", ticket).await
    }

    async fn update_ticket(&self, ticket_id: TicketId, edits: &TicketEdits) -> Result<Ticket> {
        self.put(&format!("/tickets/{}", ticket_id), edits).await
    }

    async fn delete_ticket(&self, ticket_id: TicketId) -> Result<TicketId> {
        self.delete(&format!("/tickets/{}", ticket_id)).await?;
        Ok(ticket_id)
    }
}

//! User endpoints

use async_trait::async_trait;

use super::ApiClient;
use crate::error::Result;
use crate::repository::UserRepository;
use crate::types::{Credentials, User};

#[async_trait]
impl UserRepository for ApiClient {
    async fn login(&self, credentials: &Credentials) -> Result<User> {
        self.post("/users/login", &credentials.to_body()).await
    }

    async fn register(&self, credentials: &Credentials) -> Result<User> {
        self.post("/users/register", &credentials.to_body()).await
    }
}

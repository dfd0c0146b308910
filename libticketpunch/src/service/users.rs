//! Session operations: login, registration, logout, restore

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::repository::UserRepository;
use crate::session::{SessionStore, StoredSession};
use crate::store::{Store, UserAction};
use crate::types::{Credentials, User};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AuthKind {
    Login,
    Register,
}

impl AuthKind {
    fn request(self) -> UserAction {
        match self {
            AuthKind::Login => UserAction::LoginRequest,
            AuthKind::Register => UserAction::RegisterRequest,
        }
    }

    fn success(self, user: User) -> UserAction {
        match self {
            AuthKind::Login => UserAction::LoginSuccess(user),
            AuthKind::Register => UserAction::RegisterSuccess(user),
        }
    }

    fn failure(self, message: String) -> UserAction {
        match self {
            AuthKind::Login => UserAction::LoginFailure(message),
            AuthKind::Register => UserAction::RegisterFailure(message),
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            AuthKind::Login => "login",
            AuthKind::Register => "register",
        }
    }
}

/// Authentication against the users endpoints
///
/// A successful login or registration is persisted through the session
/// store, so the HTTP client attaches its token to every later request.
#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
    session: Arc<dyn SessionStore>,
    store: Arc<Store>,
}

impl UserService {
    pub fn new(
        repo: Arc<dyn UserRepository>,
        session: Arc<dyn SessionStore>,
        store: Arc<Store>,
    ) -> Self {
        Self {
            repo,
            session,
            store,
        }
    }

    /// POST /users/login
    pub async fn login(&self, credentials: Credentials) -> Result<User> {
        self.authenticate(AuthKind::Login, credentials).await
    }

    /// POST /users/register
    pub async fn register(&self, credentials: Credentials) -> Result<User> {
        self.authenticate(AuthKind::Register, credentials).await
    }

    async fn authenticate(&self, kind: AuthKind, credentials: Credentials) -> Result<User> {
        self.store.dispatch(kind.request().into());
        debug!(operation = kind.as_str(), email = %credentials.email, "Request started");

        let result = match kind {
            AuthKind::Login => self.repo.login(&credentials).await,
            AuthKind::Register => self.repo.register(&credentials).await,
        };

        // A session that cannot be saved is as good as a failed login
        let result = result.and_then(|user| {
            self.session.save(&StoredSession::from_user(&user))?;
            Ok(user)
        });

        match result {
            Ok(user) => {
                info!(operation = kind.as_str(), user_id = user.id, "Authenticated");
                self.store.dispatch(kind.success(user.clone()).into());
                Ok(user)
            }
            Err(e) => {
                warn!(operation = kind.as_str(), error = %e, "Authentication failed");
                self.store.dispatch(kind.failure(e.to_string()).into());
                Err(e)
            }
        }
    }

    /// Discard the session locally; the server is not contacted
    pub fn logout(&self) -> Result<()> {
        self.session.clear()?;
        self.store.dispatch(UserAction::Logout.into());
        info!("Logged out");
        Ok(())
    }

    /// Load a persisted session into the store
    ///
    /// Returns `None` (and leaves the store untouched) when no session is
    /// saved.
    pub fn restore(&self) -> Result<Option<User>> {
        let Some(stored) = self.session.load()? else {
            debug!(backend = self.session.backend_name(), "No saved session");
            return Ok(None);
        };

        let user = stored.to_user();
        debug!(user_id = user.id, saved_at = %stored.saved_at, "Restored session");
        self.store.dispatch(UserAction::SessionRestored(user.clone()).into());
        Ok(Some(user))
    }
}

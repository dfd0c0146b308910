//! Error types for Ticket Punch

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TicketPunchError>;

#[derive(Error, Debug)]
pub enum TicketPunchError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Api(#[from] ApiError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not logged in. Run 'punch login <email>' first.")]
    NotAuthenticated,

    #[error("Command did not complete: {0}")]
    Incomplete(String),
}

impl TicketPunchError {
    /// Returns the appropriate exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            TicketPunchError::InvalidInput(_) => 3,
            TicketPunchError::NotAuthenticated => 2,
            TicketPunchError::Api(ApiError::Status { status, .. }) if *status == 401 => 2,
            TicketPunchError::Api(_) => 1,
            TicketPunchError::Config(_) => 1,
            TicketPunchError::Session(_) => 1,
            TicketPunchError::Incomplete(_) => 1,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Failures talking to the Ticket Punch API.
///
/// The `Display` output is the single human-readable message that ends up
/// in a slice's `error` field; no status code or structure survives past
/// the failure event.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("{message}")]
    Status { status: u16, message: String },

    #[error("{0}")]
    Transport(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Build a status error the way the browser client reported it:
    /// the server's own message when it sent one, otherwise a generic line.
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = server_message(body)
            .unwrap_or_else(|| format!("Request failed with status code {}", status));
        ApiError::Status { status, message }
    }
}

/// Pull a `message` (or `error`) string out of a JSON error body.
fn server_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["message", "error"]
        .iter()
        .find_map(|key| value.get(*key).and_then(|v| v.as_str()))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Failed to access session file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt session file: {0}")]
    Corrupt(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_invalid_input() {
        let error = TicketPunchError::InvalidInput("Title is required".to_string());
        assert_eq!(error.exit_code(), 3);
    }

    #[test]
    fn test_exit_code_not_authenticated() {
        assert_eq!(TicketPunchError::NotAuthenticated.exit_code(), 2);
    }

    #[test]
    fn test_exit_code_unauthorized_status() {
        let error = TicketPunchError::Api(ApiError::from_status(401, ""));
        assert_eq!(error.exit_code(), 2);

        let error = TicketPunchError::Api(ApiError::from_status(500, ""));
        assert_eq!(error.exit_code(), 1);
    }

    #[test]
    fn test_status_error_uses_server_message() {
        let error = ApiError::from_status(401, r#"{"message": "Invalid credentials"}"#);
        assert_eq!(error.to_string(), "Invalid credentials");
    }

    #[test]
    fn test_status_error_falls_back_to_error_field() {
        let error = ApiError::from_status(400, r#"{"error": "Email already registered"}"#);
        assert_eq!(error.to_string(), "Email already registered");
    }

    #[test]
    fn test_status_error_generic_message() {
        let error = ApiError::from_status(404, "<html>Not Found</html>");
        assert_eq!(error.to_string(), "Request failed with status code 404");

        let error = ApiError::from_status(500, r#"{"message": "   "}"#);
        assert_eq!(error.to_string(), "Request failed with status code 500");
    }

    #[test]
    fn test_api_error_is_not_wrapped_in_display() {
        // The failure event carries the bare message
        let error: TicketPunchError = ApiError::Transport("connection refused".to_string()).into();
        assert_eq!(format!("{}", error), "connection refused");
    }

    #[test]
    fn test_config_error_formatting() {
        let config_error = ConfigError::MissingField("api.base_url".to_string());
        let error = TicketPunchError::Config(config_error);
        assert_eq!(
            format!("{}", error),
            "Configuration error: Missing required field: api.base_url"
        );
    }

    #[test]
    fn test_error_debug_output() {
        let error = TicketPunchError::Api(ApiError::Status {
            status: 500,
            message: "boom".to_string(),
        });

        let debug_output = format!("{:?}", error);
        assert!(debug_output.contains("Api"));
        assert!(debug_output.contains("Status"));
    }
}

use std::fmt;

// Failures surfaced by the authenticated client and the response decoder.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientError {
    // No session was present when an authenticated call was attempted.
    Unauthenticated,
    // The backend rejected the token and the verify round trip failed.
    SessionExpired,
    // Non-2xx status other than a resolved 403.
    Api { status: u16, message: String },
    // Declared JSON body that failed to parse, or JSON of the wrong shape.
    MalformedJson { preview: String, diagnostic: String },
    // The request never reached the server or no response came back.
    Network(String),
    // A path template placeholder was not supplied.
    InvalidEndpoint(String),
}

impl ClientError {
    /// Message suitable for an inline notice in the UI.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Unauthenticated => "Please log in first.".to_string(),
            ClientError::SessionExpired => {
                "Your session has expired. Please log in again.".to_string()
            }
            ClientError::Api { status, message } => {
                if message.trim().is_empty() {
                    format!("Request failed with status {status}.")
                } else {
                    message.clone()
                }
            }
            ClientError::MalformedJson { .. } => "Server returned invalid data.".to_string(),
            ClientError::Network(_) => {
                "Unable to connect to the server. Please check your connection.".to_string()
            }
            ClientError::InvalidEndpoint(_) => "Request could not be built.".to_string(),
        }
    }

    /// True for failures that end the session (the caller has already been redirected).
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, ClientError::Unauthenticated | ClientError::SessionExpired)
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Unauthenticated => write!(f, "user not authenticated"),
            ClientError::SessionExpired => write!(f, "authentication token expired"),
            ClientError::Api { status, message } => {
                if message.is_empty() {
                    write!(f, "api error {status}")
                } else {
                    write!(f, "api error {status}: {message}")
                }
            }
            ClientError::MalformedJson {
                preview,
                diagnostic,
            } => write!(f, "malformed json ({diagnostic}): {preview}"),
            ClientError::Network(cause) => write!(f, "network error: {cause}"),
            ClientError::InvalidEndpoint(param) => {
                write!(f, "missing path parameter `{param}`")
            }
        }
    }
}

impl std::error::Error for ClientError {}

// Errors from the login/register flows.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthError {
    Validation(String),
    Client(ClientError),
}

impl AuthError {
    pub fn user_message(&self) -> String {
        match self {
            AuthError::Validation(message) => message.clone(),
            AuthError::Client(err) => err.user_message(),
        }
    }
}

impl From<ClientError> for AuthError {
    fn from(err: ClientError) -> Self {
        AuthError::Client(err)
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::Validation(message) => write!(f, "validation failed: {message}"),
            AuthError::Client(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for AuthError {}

// Errors from controller actions: advisory validation or a failed call.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionError {
    Validation(String),
    Client(ClientError),
}

impl ActionError {
    pub fn user_message(&self) -> String {
        match self {
            ActionError::Validation(message) => message.clone(),
            ActionError::Client(err) => err.user_message(),
        }
    }
}

impl From<ClientError> for ActionError {
    fn from(err: ClientError) -> Self {
        ActionError::Client(err)
    }
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionError::Validation(message) => write!(f, "validation failed: {message}"),
            ActionError::Client(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ActionError {}

use serde::{Deserialize, Serialize};

// Storage keys shared with every page of the web client.
pub const TOKEN_KEY: &str = "authToken";
pub const USER_EMAIL_KEY: &str = "userEmail";
pub const USER_NAME_KEY: &str = "userName";

/// Locally cached proof of login.
///
/// A session only exists while a token is stored; email and name are cached
/// identity and are never used for authorization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: String,
    pub user_email: String,
    pub user_name: String,
}

/// Navigation targets the client can be sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    // Public landing page, used after an explicit logout.
    Landing,
    // Login/register page, used when the session is missing or rejected.
    Login,
    // Authenticated home page.
    Dashboard,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Landing => "index.html",
            Route::Login => "html/auth.html",
            Route::Dashboard => "html/dashboard.html",
        }
    }
}

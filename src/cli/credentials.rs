//! Credential resolution from flags and environment

use tracing::debug;

use crate::error::FatalError;

/// Remote account credentials
#[derive(Debug, Clone)]
pub struct Credentials {
    pub server: String,
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// Build credentials from already-merged flag/environment values
    ///
    /// Empty strings count as missing.
    pub fn resolve(
        server: Option<String>,
        email: Option<String>,
        password: Option<String>,
    ) -> Result<Self, FatalError> {
        let username = required(email, "email")?;
        let password = required(password, "password")?;
        let server = required(server, "server")?;

        debug!("Using account {} on {}", username, server);
        Ok(Self {
            server,
            username,
            password,
        })
    }
}

fn required(value: Option<String>, name: &'static str) -> Result<String, FatalError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(FatalError::MissingCredential(name))
}

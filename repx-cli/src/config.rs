//! Configuration module
//!
//! Settings shared by the commands that talk to a judging server.

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// URL of the judging server
    pub server_url: String,
}

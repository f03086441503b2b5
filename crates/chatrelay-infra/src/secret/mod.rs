//! Secret lookup for provider API keys.
//!
//! - `env`: environment variable provider
//! - [`load_dotenv`]: merges a `.env` file into the environment at startup

pub mod env;

pub use env::EnvSecretProvider;

/// Load `.env` from the working directory (or a parent), if present.
///
/// Variables already set in the environment win over the file.
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env"),
        Err(dotenvy::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No .env file found");
        }
        Err(err) => tracing::warn!(error = %err, "Failed to load .env"),
    }
}

//! # Authentication Middleware
//!
//! Bearer-token handling for outgoing requests and the on-disk token store
//! that keeps a login alive between runs.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use reqwest::RequestBuilder;
use sesplan_core::errors::{SesplanError, SesplanResult};
use tracing::debug;

/// Adds `Authorization: Bearer <token>` when a token is present.
pub fn attach_bearer(request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
    match token {
        Some(token) => request.bearer_auth(token),
        None => request,
    }
}

/// File-backed storage for the bearer token.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the stored token; a missing or blank file means no token.
    pub fn load(&self) -> SesplanResult<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(e)),
        }
    }

    pub fn save(&self, token: &str) -> SesplanResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_error)?;
        }
        fs::write(&self.path, token).map_err(io_error)?;
        debug!("Stored token at {}", self.path.display());
        Ok(())
    }

    /// Removes the stored token; clearing an empty store succeeds.
    pub fn clear(&self) -> SesplanResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!("Removed token at {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(e)),
        }
    }
}

fn io_error(e: std::io::Error) -> SesplanError {
    SesplanError::Internal(Box::new(e))
}

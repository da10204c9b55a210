//! Session persistence for staying logged in across runs.
//!
//! The session file holds the stored form of [`AuthState`]: a bearer
//! token as JSON, or the "null" sentinel after logout.

use crate::auth::AuthState;
use anyhow::Result;
use std::fs;
use std::path::PathBuf;

/// Get the session file path
fn session_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".pokedeck")
        .join("session.json")
}

/// Save the auth state to disk.
pub fn save_auth(auth: &AuthState) -> Result<()> {
    let path = session_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, auth.to_stored())?;
    Ok(())
}

/// Load the auth state from disk. A missing or unreadable file means
/// anonymous.
pub fn load_auth() -> AuthState {
    match fs::read_to_string(session_path()) {
        Ok(content) => AuthState::from_stored(Some(&content)),
        Err(_) => AuthState::Anonymous,
    }
}

//! Session file I/O

use crate::types::*;
use std::path::Path;

/// Load a session from a JSON file
pub async fn load_session(path: impl AsRef<Path>) -> Result<Session> {
    let path = path.as_ref().to_owned();
    let bytes = tokio::fs::read(&path).await?;
    let session: Session = serde_json::from_slice(&bytes)?;
    log::info!(
        "Loaded session '{}' with {} exercises from {}",
        session.display_name(),
        session.exercises.len(),
        path.display()
    );
    Ok(session)
}

/// Save a session as pretty-printed JSON
pub async fn save_session(session: &Session, path: impl AsRef<Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(session)?;
    tokio::fs::write(path, json).await?;
    Ok(())
}

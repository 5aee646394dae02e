use std::fs;
use std::path::PathBuf;

use serde_json::Value;

use crate::config::AppConfig;
use crate::error::PortalError;
use crate::portal::deadlines::DeadlineRecord;
use crate::store::{JsonStore, StoragePort};

/// Pluggable check of the shared admin secret, so the comparison strategy
/// can change without touching route logic.
pub trait Authenticator: Send + Sync {
    fn verify(&self, candidate: &str) -> bool;
}

/// Plain comparison against the configured password. One shared secret
/// guards a low-stakes panel; that model is deliberate.
pub struct PlainTextAuthenticator {
    secret: String,
}

impl PlainTextAuthenticator {
    pub fn new(secret: impl Into<String>) -> Self {
        PlainTextAuthenticator {
            secret: secret.into(),
        }
    }
}

impl Authenticator for PlainTextAuthenticator {
    fn verify(&self, candidate: &str) -> bool {
        candidate == self.secret
    }
}

/// Maps an upload category onto its directory: `materials` and `labs` are
/// fixed roots, anything else names a lecture subfolder.
pub fn category_dir(config: &AppConfig, category: &str) -> PathBuf {
    match category {
        "materials" => config.materials_dir.clone(),
        "labs" => config.labs_dir.clone(),
        other => config.lectures_dir.join(other),
    }
}

/// Writes an uploaded payload under its original filename, creating the
/// category directory on first use. Same name overwrites.
pub fn save_upload(
    config: &AppConfig,
    category: &str,
    filename: &str,
    payload: &[u8],
) -> Result<PathBuf, PortalError> {
    if filename.is_empty() || payload.is_empty() {
        return Err(PortalError::NoFileSelected);
    }
    // A lecture-subfolder category is joined into the content tree, so it
    // gets the same traversal check as delete targets.
    check_filename(category)?;
    // Browsers may send a full client-side path; keep the last component.
    let name = filename.rsplit(['/', '\\']).next().unwrap_or(filename);

    let dir = category_dir(config, category);
    fs::create_dir_all(&dir)?;
    let target = dir.join(name);
    fs::write(&target, payload)?;
    Ok(target)
}

/// Anything that could step outside the category directory is rejected
/// before the filesystem is touched.
fn check_filename(filename: &str) -> Result<(), PortalError> {
    if filename.contains("..") || filename.contains('/') || filename.contains('\\') {
        return Err(PortalError::InvalidFilename(filename.to_string()));
    }
    Ok(())
}

/// Removes one file from `materials` or `labs`. Lecture folders are not
/// deletable from the panel.
pub fn delete_file(config: &AppConfig, category: &str, filename: &str) -> Result<(), PortalError> {
    check_filename(filename)?;
    let dir = match category {
        "materials" => &config.materials_dir,
        "labs" => &config.labs_dir,
        _ => return Err(PortalError::FileNotFound(filename.to_string())),
    };
    let target = dir.join(filename);
    if !target.is_file() {
        return Err(PortalError::FileNotFound(filename.to_string()));
    }
    fs::remove_file(&target)?;
    Ok(())
}

/// Load, append one record, rewrite the whole array. No partial updates.
pub fn append_deadline<S: StoragePort>(
    config: &AppConfig,
    store: &JsonStore<S>,
    record: DeadlineRecord,
) -> Result<(), PortalError> {
    let mut records: Vec<DeadlineRecord> =
        store.load_or_default(&config.deadlines_file, Vec::new());
    records.push(record);
    store.save(&config.deadlines_file, &records)
}

/// Persists the hand-edited JSON payloads from the raw editor. Each payload
/// is validated and written independently: a malformed schedule does not
/// hold well-formed deadlines hostage. Every malformed payload is reported
/// as one `InvalidJson` after the good ones landed.
pub fn save_raw_json<S: StoragePort>(
    config: &AppConfig,
    store: &JsonStore<S>,
    schedule_text: Option<&str>,
    deadlines_text: Option<&str>,
) -> Result<(), PortalError> {
    let mut bad: Vec<&str> = Vec::new();

    if let Some(text) = schedule_text.filter(|t| !t.trim().is_empty()) {
        match serde_json::from_str::<Value>(text) {
            Ok(value) => store.save(&config.schedule_file, &value)?,
            Err(_) => bad.push("schedule"),
        }
    }
    if let Some(text) = deadlines_text.filter(|t| !t.trim().is_empty()) {
        match serde_json::from_str::<Value>(text) {
            Ok(value) => store.save(&config.deadlines_file, &value)?,
            Err(_) => bad.push("deadlines"),
        }
    }

    if bad.is_empty() {
        Ok(())
    } else {
        Err(PortalError::InvalidJson(bad.join(", ")))
    }
}

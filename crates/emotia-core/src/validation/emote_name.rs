//! Emote name validation
//!
//! Rules:
//! - At most 32 bytes are accepted from the request
//! - Must match `^[-_A-Za-z():0-9]{2,100}$`

use anyhow::Result;
use regex::Regex;
use std::sync::LazyLock;

/// Maximum number of bytes read from the `name` part of an upload.
pub const MAX_EMOTE_NAME_BYTES: usize = 32;

/// Allowed characters and length for an emote name.
pub const EMOTE_NAME_PATTERN: &str = r"^[-_A-Za-z():0-9]{2,100}$";

static EMOTE_NAME_RE: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(EMOTE_NAME_PATTERN));

/// Validate an emote display name.
pub fn validate_emote_name(name: &str) -> Result<()> {
    if name.len() > MAX_EMOTE_NAME_BYTES {
        return Err(anyhow::anyhow!(
            "Emote name exceeds maximum length of {} bytes",
            MAX_EMOTE_NAME_BYTES
        ));
    }

    let pattern = EMOTE_NAME_RE.as_ref().map_err(|e| {
        anyhow::anyhow!("Failed to compile emote name validation regex: {}", e)
    })?;

    if !pattern.is_match(name) {
        return Err(anyhow::anyhow!("Invalid Emote Name"));
    }

    Ok(())
}

/// Derive an emote name from an uploaded file name by dropping its extension.
///
/// `"pepeD.gif"` becomes `"pepeD"`; path components are ignored.
pub fn infer_name_from_filename(filename: &str) -> String {
    let basename = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename);

    match basename.rfind('.') {
        Some(idx) => basename[..idx].to_string(),
        None => basename.to_string(),
    }
}

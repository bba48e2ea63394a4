//! Localised default shift label ("Shift", "Zmiana", …).
//!
//! Translations are plain JSON files named `<language>.json` holding a
//! top-level `"shift_label"` string.

use std::path::Path;

use serde::Deserialize;

use workshift_domain::schedule::DEFAULT_SHIFT_LABEL;

pub const FALLBACK_LANGUAGE: &str = "en";

#[derive(Deserialize)]
struct Translation {
    shift_label: Option<String>,
}

/// Load the shift label for `language`, falling back to English and then to
/// the built-in label. Never fails; every miss is logged.
pub async fn load_shift_label(dir: &Path, language: &str) -> String {
    if let Some(label) = read_label(dir, language).await {
        return label;
    }
    if language != FALLBACK_LANGUAGE
        && let Some(label) = read_label(dir, FALLBACK_LANGUAGE).await
    {
        return label;
    }
    tracing::warn!(language, "no translated shift label, using built-in label");
    DEFAULT_SHIFT_LABEL.to_string()
}

async fn read_label(dir: &Path, language: &str) -> Option<String> {
    let path = dir.join(format!("{language}.json"));
    let raw = match tokio::fs::read_to_string(&path).await {
        Ok(raw) => raw,
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "cannot read translation file");
            return None;
        }
    };
    match serde_json::from_str::<Translation>(&raw) {
        Ok(Translation {
            shift_label: Some(label),
        }) if !label.trim().is_empty() => Some(label.trim().to_string()),
        Ok(_) => {
            tracing::warn!(path = %path.display(), "translation file has no shift_label");
            None
        }
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "invalid translation file");
            None
        }
    }
}

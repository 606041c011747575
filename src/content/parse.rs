//! Tolerant decoding of the nested JSON payloads carried by content blocks.
//!
//! Nothing here ever fails: malformed payloads degrade to defaults so the
//! projection layer can sit under presentation code without an error
//! boundary. Degradations are not invisible though: each one bumps a
//! counter and lands in the logs at warn, so data-quality drift shows up
//! without breaking a single render.

use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::{Map, Value};

static DEGRADED: AtomicU64 = AtomicU64::new(0);

/// Number of malformed nested payloads tolerated since startup.
pub fn degraded_count() -> u64 {
    DEGRADED.load(Ordering::Relaxed)
}

fn note_degraded(block_id: i64, field: &'static str) {
    DEGRADED.fetch_add(1, Ordering::Relaxed);
    tracing::warn!(block_id, field, "malformed nested JSON, using defaults");
}

/// Resolve `metadata` to an object. JSON-encoded strings are parsed;
/// anything malformed or absent becomes an empty object.
pub fn metadata_object(block_id: i64, metadata: Option<&Value>) -> Map<String, Value> {
    match metadata {
        None | Some(Value::Null) => Map::new(),
        Some(Value::Object(map)) => map.clone(),
        Some(Value::String(raw)) => match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(map)) => map,
            _ => {
                note_degraded(block_id, "metadata");
                Map::new()
            }
        },
        Some(_) => {
            note_degraded(block_id, "metadata");
            Map::new()
        }
    }
}

/// The `url` column resolved into one of its two legitimate shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum UrlField {
    /// Legacy plain link string.
    Plain(String),
    /// JSON object of link fields (`img_url`, `web_url`, `github_url`, ...).
    Object(Map<String, Value>),
    Empty,
}

/// A string that looks like a JSON object (leading `{`) is parsed and falls
/// back to being treated as a plain URL when the parse fails.
pub fn url_field(block_id: i64, url: Option<&Value>) -> UrlField {
    match url {
        None | Some(Value::Null) => UrlField::Empty,
        Some(Value::Object(map)) => UrlField::Object(map.clone()),
        Some(Value::String(raw)) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                UrlField::Empty
            } else if trimmed.starts_with('{') {
                match serde_json::from_str::<Value>(trimmed) {
                    Ok(Value::Object(map)) => UrlField::Object(map),
                    _ => {
                        note_degraded(block_id, "url");
                        UrlField::Plain(raw.clone())
                    }
                }
            } else {
                UrlField::Plain(raw.clone())
            }
        }
        Some(_) => {
            note_degraded(block_id, "url");
            UrlField::Empty
        }
    }
}

/// First non-empty string among `keys`, trimmed.
pub fn str_in(map: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| {
        map.get(*key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
    })
}

/// First integer among `keys`; tolerates numbers stored as strings.
pub fn i64_in(map: &Map<String, Value>, keys: &[&str]) -> Option<i64> {
    keys.iter().find_map(|key| match map.get(*key) {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

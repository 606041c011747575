//! Site settings: key/value rows folded into one lookup map.
//!
//! Every fallback text the site uses lives in `DEFAULTS`, not inline at
//! call sites. The map is held in a `LiveQuery` loaded once at startup and
//! refreshed after admin settings writes. When the store blips, the last
//! known values keep being served with the error recorded alongside.

use std::collections::HashMap;

use once_cell::sync::OnceCell;

use crate::store::live::LiveQuery;
use crate::store::models::SiteSetting;
use crate::store::query::Query;
use crate::store::Store;

pub const SITE_SETTINGS: &str = "site_settings";

/// Declared defaults for every key the presentation layer reads.
pub const DEFAULTS: &[(&str, &str)] = &[
    ("hero_title", "Hi, I'm a developer"),
    ("hero_subtitle", "I build things for the web"),
    ("about_title", "About Me"),
    ("projects_title", "Projects"),
    ("projects_subtitle", "A selection of things I've built"),
    ("certificates_title", "Certificates"),
    ("certificates_subtitle", "Courses and credentials"),
    ("contact_success", "Thanks for reaching out! I'll get back to you soon."),
    (
        "contact_failure",
        "Something went wrong sending your message. Please try again later.",
    ),
    (
        "chat_greeting",
        "Hi! Ask me about skills, projects or how to get in touch.",
    ),
    (
        "chat_apology",
        "Sorry, I ran into a technical hiccup. Please try again or reach out by email.",
    ),
    ("typing_speed", "90"),
    ("typing_delay", "1500"),
];

static CACHE: OnceCell<SettingsCache> = OnceCell::new();

pub struct SettingsCache {
    live: LiveQuery<SiteSetting>,
}

impl SettingsCache {
    fn new() -> Self {
        Self {
            live: LiveQuery::new(SITE_SETTINGS, Query::new()),
        }
    }

    pub async fn refresh(&self, store: &Store) {
        self.live.refetch(store).await;
    }

    /// Stored values merged over the declared defaults.
    pub async fn resolved(&self) -> HashMap<String, String> {
        let snapshot = self.live.snapshot().await;
        resolve(snapshot.data.as_deref().unwrap_or(&[]))
    }

    /// Error from the most recent refresh, if it failed.
    pub async fn last_error(&self) -> Option<String> {
        self.live.snapshot().await.error
    }
}

/// Fold rows over `DEFAULTS`: stored values win, defaults fill the gaps.
pub fn resolve(rows: &[SiteSetting]) -> HashMap<String, String> {
    let mut map: HashMap<String, String> = DEFAULTS
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();
    for row in rows {
        if let Some(value) = &row.setting_value {
            map.insert(row.setting_key.clone(), value.clone());
        }
    }
    map
}

/// The declared default for one key; empty for unknown keys.
pub fn default_for(key: &str) -> &'static str {
    DEFAULTS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| *v)
        .unwrap_or("")
}

/// Create (or return) the process-wide cache.
pub fn init() -> &'static SettingsCache {
    CACHE.get_or_init(SettingsCache::new)
}

pub fn get() -> Option<&'static SettingsCache> {
    CACHE.get()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(key: &str, value: Option<&str>) -> SiteSetting {
        SiteSetting {
            id: 0,
            setting_key: key.to_string(),
            setting_value: value.map(str::to_string),
        }
    }

    #[test]
    fn test_missing_keys_fall_back_to_declared_defaults() {
        let map = resolve(&[]);
        assert_eq!(map.get("about_title").map(String::as_str), Some("About Me"));
        assert_eq!(map.get("typing_speed").map(String::as_str), Some("90"));
    }

    #[test]
    fn test_stored_values_win_over_defaults() {
        let map = resolve(&[row("about_title", Some("Who I Am"))]);
        assert_eq!(map.get("about_title").map(String::as_str), Some("Who I Am"));
    }

    #[test]
    fn test_unknown_keys_pass_through() {
        let map = resolve(&[row("custom_banner", Some("hello"))]);
        assert_eq!(map.get("custom_banner").map(String::as_str), Some("hello"));
    }

    #[test]
    fn test_null_valued_rows_keep_the_default() {
        let map = resolve(&[row("about_title", None)]);
        assert_eq!(map.get("about_title").map(String::as_str), Some("About Me"));
    }

    #[test]
    fn test_default_for_unknown_key_is_empty() {
        assert_eq!(default_for("no_such_key"), "");
        assert_eq!(default_for("hero_title"), "Hi, I'm a developer");
    }
}

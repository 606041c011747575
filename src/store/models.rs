//! Row types for the remote collections (serde types used by the gateway).
#![allow(dead_code)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Discriminator for `content_blocks`. Closed set; a block keeps its kind
/// for life; no update path carries this field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Project,
    Skill,
    Certificate,
    Social,
    Role,
    Custom,
}

impl BlockKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "project" => Some(BlockKind::Project),
            "skill" => Some(BlockKind::Skill),
            "certificate" => Some(BlockKind::Certificate),
            "social" => Some(BlockKind::Social),
            "role" => Some(BlockKind::Role),
            "custom" => Some(BlockKind::Custom),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::Project => "project",
            BlockKind::Skill => "skill",
            BlockKind::Certificate => "certificate",
            BlockKind::Social => "social",
            BlockKind::Role => "role",
            BlockKind::Custom => "custom",
        }
    }
}

/// Polymorphic content row; `kind` decides which projection applies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentBlock {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: BlockKind,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub long_description: Option<String>,
    /// Plain link string in older rows, JSON object of link fields in newer
    /// ones. Nothing in the store schema guarantees either shape.
    #[serde(default)]
    pub url: Option<Value>,
    /// JSON object, or a JSON-encoded string in older rows.
    #[serde(default)]
    pub metadata: Option<Value>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload for `content_blocks`.
#[derive(Debug, Clone, Serialize)]
pub struct NewContentBlock {
    #[serde(rename = "type")]
    pub kind: BlockKind,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    pub is_featured: bool,
    pub display_order: i32,
}

/// Update payload for `content_blocks`. Deliberately has no kind field:
/// re-typing a block is unsupported.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ContentBlockPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_featured: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_order: Option<i32>,
}

/// Singleton-by-read-pattern owner profile (`personal_info`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub resume_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Full-row write payload for `personal_info`. The admin form submits the
/// whole record, so every field is written and blanks clear stored values.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileUpsert {
    pub name: String,
    pub display_name: Option<String>,
    pub title: Option<String>,
    pub bio: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub avatar_url: Option<String>,
    pub resume_url: Option<String>,
}

/// One `site_settings` key/value row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteSetting {
    pub id: i64,
    pub setting_key: String,
    #[serde(default)]
    pub setting_value: Option<String>,
}

/// A technology chip shared across projects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Technology {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewTechnology {
    pub name: String,
}

/// Join row between `projects` and `technologies`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectTechnology {
    #[serde(default)]
    pub id: Option<i64>,
    pub project_id: i64,
    pub technology_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewProjectTechnology {
    pub project_id: i64,
    pub technology_id: i64,
}

/// Row in the legacy `projects` collection (the join-table variant).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectRow {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub demo_url: Option<String>,
    #[serde(default)]
    pub github_url: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub display_order: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewProjectRow {
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub demo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    pub status: String,
    pub is_featured: bool,
    pub display_order: i32,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectRowPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub demo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_featured: Option<bool>,
}

/// Row from the `projects_with_technologies` view: a project plus its
/// joined technology records, already aggregated store-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectWithTechnologies {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub demo_url: Option<String>,
    #[serde(default)]
    pub github_url: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default)]
    pub technologies: Vec<Technology>,
}

/// Admin-managed FAQ entry consulted by the chatbot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    pub id: i64,
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewKnowledgeEntry {
    pub question: String,
    pub answer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub keywords: Vec<String>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct KnowledgeEntryPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Contact-form submission as stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactMessage {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub message: String,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default)]
    pub replied_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewContactMessage {
    pub name: String,
    pub email: String,
    pub message: String,
    pub is_read: bool,
}

/// One chat exchange appended to `chat_history`, best-effort.
#[derive(Debug, Clone, Serialize)]
pub struct NewChatHistoryEntry {
    pub session_id: String,
    pub user_message: String,
    pub bot_response: String,
    pub response_time_ms: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_kind_wire_names() {
        for (kind, name) in [
            (BlockKind::Project, "\"project\""),
            (BlockKind::Skill, "\"skill\""),
            (BlockKind::Certificate, "\"certificate\""),
            (BlockKind::Social, "\"social\""),
            (BlockKind::Role, "\"role\""),
            (BlockKind::Custom, "\"custom\""),
        ] {
            assert_eq!(serde_json::to_string(&kind).unwrap(), name);
        }
    }

    #[test]
    fn test_content_block_deserializes_string_metadata_untouched() {
        let row: ContentBlock = serde_json::from_value(serde_json::json!({
            "id": 7,
            "type": "project",
            "title": "Demo",
            "metadata": "{\"category\":\"app\"}",
            "url": "https://example.com/shot.png",
            "is_featured": false,
            "display_order": 1,
            "created_at": "2024-05-01T00:00:00Z",
            "updated_at": "2024-05-01T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(row.kind, BlockKind::Project);
        assert!(matches!(row.metadata, Some(Value::String(_))));
        assert!(matches!(row.url, Some(Value::String(_))));
    }

    #[test]
    fn test_patch_never_serializes_a_kind_field() {
        let patch = ContentBlockPatch {
            title: Some("Renamed".to_string()),
            ..Default::default()
        };
        let value = serde_json::to_value(&patch).unwrap();
        let object = value.as_object().unwrap();
        assert!(!object.contains_key("type"));
        assert_eq!(object.len(), 1);
    }

    #[test]
    fn test_profile_upsert_writes_every_field() {
        let row = ProfileUpsert {
            name: "Dana".to_string(),
            display_name: Some("D.".to_string()),
            title: None,
            bio: None,
            email: None,
            phone: None,
            location: None,
            avatar_url: None,
            resume_url: None,
        };
        let value = serde_json::to_value(&row).unwrap();
        let object = value.as_object().unwrap();
        // Blank fields go out as null so a save clears what the form left
        // empty, matching the full-form write the admin console performs.
        assert_eq!(object.len(), 9);
        assert_eq!(object.get("title"), Some(&Value::Null));
    }

    #[test]
    fn test_view_row_tolerates_missing_technologies() {
        let row: ProjectWithTechnologies = serde_json::from_value(serde_json::json!({
            "id": 1,
            "title": "Site",
            "is_featured": true,
            "display_order": 2
        }))
        .unwrap();
        assert!(row.technologies.is_empty());
    }
}

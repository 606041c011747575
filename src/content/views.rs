//! Per-kind projections from raw content blocks to stable view models.
//!
//! Every projected field is always present (empty string, empty list or a
//! literal default, never an absent value) so consumers can render
//! unconditionally. Resolution order per target field: `metadata` first,
//! then the url-derived fields, then the legacy top-level column, then the
//! default.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use super::parse::{self, UrlField};
use crate::store::models::ContentBlock;

/// One technology chip. Linked rows keep their id and color so the
/// presentation can tell a colored chip from a plain tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TechTag {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl TechTag {
    pub fn plain(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
            color: None,
        }
    }

    pub fn is_linked(&self) -> bool {
        self.id.is_some() || self.color.is_some()
    }
}

/// Normalize a tech-stack value: an array of plain strings and an array of
/// joined technology records both become one renderable list.
fn tech_tags(value: Option<&Value>) -> Vec<TechTag> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match item {
            Value::String(name) => {
                let name = name.trim();
                (!name.is_empty()).then(|| TechTag::plain(name))
            }
            Value::Object(map) => {
                let name = map.get("name").and_then(Value::as_str)?.trim().to_string();
                if name.is_empty() {
                    return None;
                }
                Some(TechTag {
                    name,
                    id: map.get("id").and_then(Value::as_i64),
                    color: map
                        .get("color")
                        .and_then(Value::as_str)
                        .map(str::to_string),
                })
            }
            _ => None,
        })
        .collect()
}

/// Pieces of a block's `url` column, split once per projection.
struct Links {
    object: Option<Map<String, Value>>,
    plain: Option<String>,
}

impl Links {
    fn of(block: &ContentBlock) -> Self {
        match parse::url_field(block.id, block.url.as_ref()) {
            UrlField::Object(object) => Self {
                object: Some(object),
                plain: None,
            },
            UrlField::Plain(plain) => Self {
                object: None,
                plain: Some(plain),
            },
            UrlField::Empty => Self {
                object: None,
                plain: None,
            },
        }
    }

    fn get(&self, keys: &[&str]) -> Option<String> {
        self.object.as_ref().and_then(|map| parse::str_in(map, keys))
    }
}

fn resolve(
    meta: &Map<String, Value>,
    meta_keys: &[&str],
    links: &Links,
    link_keys: &[&str],
    legacy: Option<&str>,
) -> String {
    parse::str_in(meta, meta_keys)
        .or_else(|| links.get(link_keys))
        .or_else(|| {
            legacy
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
        })
        .unwrap_or_default()
}

#[derive(Debug, Clone, Serialize)]
pub struct Project {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub long_description: String,
    pub image_url: String,
    pub url: String,
    pub github_url: String,
    pub demo_url: String,
    pub category: String,
    pub tech_stack: Vec<TechTag>,
    pub start_date: String,
    pub end_date: String,
    pub duration_months: i64,
    pub is_featured: bool,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub fn project(block: &ContentBlock) -> Project {
    let meta = parse::metadata_object(block.id, block.metadata.as_ref());
    let links = Links::of(block);

    Project {
        id: block.id,
        title: block.title.clone(),
        description: block.description.clone().unwrap_or_default(),
        long_description: block.long_description.clone().unwrap_or_default(),
        // A bare string url on a project row is its screenshot by convention.
        image_url: resolve(
            &meta,
            &["image_url", "img_url"],
            &links,
            &["img_url", "image_url"],
            links.plain.as_deref(),
        ),
        url: resolve(
            &meta,
            &["web_url", "website_url"],
            &links,
            &["web_url", "website_url", "url"],
            None,
        ),
        github_url: resolve(&meta, &["github_url"], &links, &["github_url"], None),
        demo_url: resolve(&meta, &["demo_url"], &links, &["demo_url"], None),
        category: parse::str_in(&meta, &["category"]).unwrap_or_else(|| "website".to_string()),
        tech_stack: tech_tags(meta.get("tech_stack").or_else(|| meta.get("technologies"))),
        start_date: parse::str_in(&meta, &["start_date"]).unwrap_or_default(),
        end_date: parse::str_in(&meta, &["end_date"]).unwrap_or_default(),
        duration_months: parse::i64_in(&meta, &["duration_months"]).unwrap_or(0),
        is_featured: block.is_featured,
        display_order: block.display_order,
        created_at: block.created_at,
        updated_at: block.updated_at,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Skill {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub proficiency: String,
    pub years_experience: i64,
    pub is_featured: bool,
    pub display_order: i32,
}

pub fn skill(block: &ContentBlock) -> Skill {
    let meta = parse::metadata_object(block.id, block.metadata.as_ref());

    Skill {
        id: block.id,
        name: block.title.clone(),
        // Subtitle doubles as category when metadata doesn't carry one.
        category: parse::str_in(&meta, &["category"])
            .or_else(|| {
                block
                    .subtitle
                    .as_deref()
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
            })
            .unwrap_or_else(|| "General".to_string()),
        proficiency: parse::str_in(&meta, &["proficiency"]).unwrap_or_default(),
        years_experience: parse::i64_in(&meta, &["years_experience"]).unwrap_or(0),
        is_featured: block.is_featured,
        display_order: block.display_order,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Certificate {
    pub id: i64,
    pub title: String,
    pub issuer: String,
    pub description: String,
    pub image_url: String,
    pub link: String,
    pub credential_id: String,
    pub issue_date: String,
    pub is_featured: bool,
    pub display_order: i32,
}

pub fn certificate(block: &ContentBlock) -> Certificate {
    let meta = parse::metadata_object(block.id, block.metadata.as_ref());
    let links = Links::of(block);

    Certificate {
        id: block.id,
        title: block.title.clone(),
        issuer: block
            .subtitle
            .clone()
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
        description: block.description.clone().unwrap_or_default(),
        image_url: resolve(
            &meta,
            &["image_url", "img_url"],
            &links,
            &["img_url", "image_url"],
            links.plain.as_deref(),
        ),
        link: resolve(
            &meta,
            &["link"],
            &links,
            &["web_url", "website_url", "url"],
            None,
        ),
        credential_id: parse::str_in(&meta, &["credential_id"]).unwrap_or_default(),
        issue_date: parse::str_in(&meta, &["issue_date"]).unwrap_or_default(),
        is_featured: block.is_featured,
        display_order: block.display_order,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SocialLink {
    pub id: i64,
    pub platform: String,
    pub url: String,
    pub icon_url: String,
    pub display_order: i32,
}

pub fn social_link(block: &ContentBlock) -> SocialLink {
    let meta = parse::metadata_object(block.id, block.metadata.as_ref());
    let links = Links::of(block);

    SocialLink {
        id: block.id,
        platform: parse::str_in(&meta, &["platform"]).unwrap_or_else(|| block.title.clone()),
        url: resolve(
            &meta,
            &["url", "web_url"],
            &links,
            &["web_url", "website_url", "url"],
            links.plain.as_deref(),
        ),
        icon_url: resolve(
            &meta,
            &["icon_url"],
            &links,
            &["img_url", "icon_url", "image_url"],
            None,
        ),
        display_order: block.display_order,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Role {
    pub id: i64,
    pub title: String,
    pub display_order: i32,
}

pub fn role(block: &ContentBlock) -> Role {
    Role {
        id: block.id,
        title: block.title.clone(),
        display_order: block.display_order,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::models::BlockKind;
    use serde_json::json;

    fn block(kind: BlockKind, metadata: Option<Value>, url: Option<Value>) -> ContentBlock {
        ContentBlock {
            id: 42,
            kind,
            title: "Title".to_string(),
            subtitle: None,
            description: None,
            long_description: None,
            url,
            metadata,
            is_featured: false,
            display_order: 3,
            created_at: "2024-05-01T00:00:00Z".parse().unwrap(),
            updated_at: "2024-05-02T00:00:00Z".parse().unwrap(),
        }
    }

    #[test]
    fn test_project_fields_always_defined_with_nothing_to_go_on() {
        let projected = project(&block(BlockKind::Project, None, None));
        assert_eq!(projected.image_url, "");
        assert_eq!(projected.url, "");
        assert_eq!(projected.github_url, "");
        assert_eq!(projected.category, "website");
        assert!(projected.tech_stack.is_empty());
        assert_eq!(projected.duration_months, 0);
    }

    #[test]
    fn test_malformed_metadata_projects_to_empty_tech_stack() {
        let projected = project(&block(
            BlockKind::Project,
            Some(json!("{invalid json")),
            None,
        ));
        assert!(projected.tech_stack.is_empty());
        assert_eq!(projected.category, "website");
    }

    #[test]
    fn test_metadata_wins_over_url_derived_fields() {
        let projected = project(&block(
            BlockKind::Project,
            Some(json!({"github_url": "https://github.com/meta"})),
            Some(json!({"github_url": "https://github.com/url"})),
        ));
        assert_eq!(projected.github_url, "https://github.com/meta");
    }

    #[test]
    fn test_url_object_fills_missing_metadata_fields() {
        let projected = project(&block(
            BlockKind::Project,
            Some(json!({"category": "app"})),
            Some(json!({
                "img_url": "https://example.com/shot.png",
                "web_url": "https://example.com",
                "github_url": "https://github.com/x/y"
            })),
        ));
        assert_eq!(projected.image_url, "https://example.com/shot.png");
        assert_eq!(projected.url, "https://example.com");
        assert_eq!(projected.github_url, "https://github.com/x/y");
        assert_eq!(projected.category, "app");
    }

    #[test]
    fn test_plain_url_string_becomes_project_image() {
        let projected = project(&block(
            BlockKind::Project,
            None,
            Some(json!("https://example.com/legacy.png")),
        ));
        assert_eq!(projected.image_url, "https://example.com/legacy.png");
        assert_eq!(projected.url, "");
    }

    #[test]
    fn test_url_json_string_is_unwrapped_like_an_object() {
        let projected = project(&block(
            BlockKind::Project,
            None,
            Some(json!("{\"web_url\":\"https://example.com\"}")),
        ));
        assert_eq!(projected.url, "https://example.com");
        assert_eq!(projected.image_url, "");
    }

    #[test]
    fn test_tech_stack_accepts_plain_strings() {
        let projected = project(&block(
            BlockKind::Project,
            Some(json!({"tech_stack": ["React", " Go ", ""]})),
            None,
        ));
        assert_eq!(
            projected.tech_stack,
            vec![TechTag::plain("React"), TechTag::plain("Go")]
        );
        assert!(!projected.tech_stack[0].is_linked());
    }

    #[test]
    fn test_tech_stack_accepts_joined_records_and_keeps_color() {
        let projected = project(&block(
            BlockKind::Project,
            Some(json!({"technologies": [
                {"id": 4, "name": "React", "color": "#61dafb"},
                {"id": 9, "name": "Go"}
            ]})),
            None,
        ));
        assert_eq!(projected.tech_stack.len(), 2);
        assert!(projected.tech_stack[0].is_linked());
        assert_eq!(projected.tech_stack[0].color.as_deref(), Some("#61dafb"));
        assert_eq!(projected.tech_stack[1].id, Some(9));
    }

    #[test]
    fn test_skill_category_prefers_metadata_then_subtitle() {
        let mut raw = block(BlockKind::Skill, Some(json!({"category": "Frontend"})), None);
        raw.subtitle = Some("Backend".to_string());
        assert_eq!(skill(&raw).category, "Frontend");

        let mut raw = block(BlockKind::Skill, None, None);
        raw.subtitle = Some("Backend".to_string());
        assert_eq!(skill(&raw).category, "Backend");

        let raw = block(BlockKind::Skill, None, None);
        assert_eq!(skill(&raw).category, "General");
    }

    #[test]
    fn test_certificate_link_and_issuer() {
        let mut raw = block(
            BlockKind::Certificate,
            Some(json!({"link": "https://certs.example.com/123", "credential_id": "ABC-123"})),
            None,
        );
        raw.subtitle = Some("Coursera".to_string());
        let projected = certificate(&raw);
        assert_eq!(projected.issuer, "Coursera");
        assert_eq!(projected.link, "https://certs.example.com/123");
        assert_eq!(projected.credential_id, "ABC-123");
    }

    #[test]
    fn test_social_link_platform_falls_back_to_title() {
        let raw = block(
            BlockKind::Social,
            Some(json!({"icon_url": "https://cdn.example.com/gh.svg"})),
            Some(json!("https://github.com/someone")),
        );
        let projected = social_link(&raw);
        assert_eq!(projected.platform, "Title");
        assert_eq!(projected.url, "https://github.com/someone");
        assert_eq!(projected.icon_url, "https://cdn.example.com/gh.svg");
    }

    #[test]
    fn test_role_projection_is_minimal() {
        let projected = role(&block(BlockKind::Role, None, None));
        assert_eq!(projected.title, "Title");
        assert_eq!(projected.display_order, 3);
    }

    #[test]
    fn test_projection_never_panics_on_hostile_shapes() {
        for metadata in [
            Some(json!(17)),
            Some(json!(["not", "an", "object"])),
            Some(json!("")),
            Some(json!("[1,2,3]")),
        ] {
            for url in [Some(json!(17)), Some(json!({"web_url": 5})), None] {
                let raw = block(BlockKind::Project, metadata.clone(), url.clone());
                let _ = project(&raw);
                let _ = skill(&raw);
                let _ = certificate(&raw);
                let _ = social_link(&raw);
            }
        }
    }
}

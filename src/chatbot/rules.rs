//! Deterministic reply generation: knowledge-base lookup first, then a
//! fixed set of topic responses composed from the live context.

use super::ChatContext;
use crate::store::models::KnowledgeEntry;

/// Knowledge entries relevant to a message: case-insensitive substring
/// match over question and answer, plus containment in either direction
/// between the message and each keyword.
pub fn search_knowledge<'a>(
    message: &str,
    knowledge: &'a [KnowledgeEntry],
) -> Vec<&'a KnowledgeEntry> {
    let needle = message.to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    knowledge
        .iter()
        .filter(|entry| {
            entry.question.to_lowercase().contains(&needle)
                || entry.answer.to_lowercase().contains(&needle)
                || entry.keywords.iter().any(|keyword| {
                    let keyword = keyword.to_lowercase();
                    !keyword.is_empty()
                        && (needle.contains(&keyword) || keyword.contains(&needle))
                })
        })
        .collect()
}

fn matches_any(message: &str, triggers: &[&str]) -> bool {
    triggers.iter().any(|trigger| message.contains(trigger))
}

fn bullets<'a>(items: impl Iterator<Item = &'a str>) -> String {
    items
        .map(|item| format!("- {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Compose a reply. Always returns something: the final arm is the default
/// topic response, so this function is the floor under every failure path
/// above it.
pub fn respond(message: &str, context: &ChatContext) -> String {
    // The knowledge base outranks every canned topic.
    if let Some(hit) = search_knowledge(message, &context.knowledge).first() {
        return hit.answer.clone();
    }

    let lower = message.to_lowercase();
    let profile = context.profile.as_ref();
    let display_name = profile
        .map(|p| p.display_name.clone().unwrap_or_else(|| p.name.clone()))
        .unwrap_or_else(|| "the site owner".to_string());
    let title = profile
        .and_then(|p| p.title.clone())
        .unwrap_or_else(|| "Full Stack Developer".to_string());

    if matches_any(&lower, &["your name", "who are you", "tên", "bạn là ai"]) {
        return format!(
            "Hi! I'm the assistant for {display_name}, a {title}. \
             Ask me about skills, projects, certificates or how to get in touch."
        );
    }

    if matches_any(&lower, &["skill", "kỹ năng", "công nghệ", "tech stack", "stack"]) {
        let featured: Vec<&str> = context
            .skills
            .iter()
            .filter(|s| s.is_featured)
            .map(|s| s.name.as_str())
            .collect();
        let listed: Vec<&str> = if featured.is_empty() {
            context.skills.iter().take(8).map(|s| s.name.as_str()).collect()
        } else {
            featured
        };
        if listed.is_empty() {
            return format!("{display_name} hasn't published a skills list yet.");
        }
        return format!(
            "Main technologies:\n{}\n\nWant details on any of them?",
            bullets(listed.into_iter())
        );
    }

    if matches_any(&lower, &["project", "dự án", "portfolio", "built"]) {
        let featured: Vec<&str> = context
            .projects
            .iter()
            .filter(|p| p.is_featured)
            .map(|p| p.title.as_str())
            .collect();
        let listed: Vec<&str> = if featured.is_empty() {
            context.projects.iter().take(5).map(|p| p.title.as_str()).collect()
        } else {
            featured
        };
        if listed.is_empty() {
            return format!("{display_name} hasn't published any projects yet.");
        }
        return format!(
            "Some projects worth a look:\n{}\n\nAsk about any of them for more detail.",
            bullets(listed.into_iter())
        );
    }

    if matches_any(&lower, &["contact", "liên hệ", "email", "reach you", "hire"]) {
        let email = profile
            .and_then(|p| p.email.clone())
            .unwrap_or_else(|| "the contact form on this site".to_string());
        return format!(
            "You can reach {display_name} at {email}, or through the contact form here."
        );
    }

    if matches_any(&lower, &["certificate", "chứng chỉ", "certification", "course"]) {
        let titles: Vec<&str> = context
            .certificates
            .iter()
            .take(5)
            .map(|c| c.title.as_str())
            .collect();
        if titles.is_empty() {
            return format!("{display_name} hasn't listed any certificates yet.");
        }
        return format!("Certificates:\n{}", bullets(titles.into_iter()));
    }

    if matches_any(&lower, &["hello", "hi", "hey", "xin chào", "chào"]) {
        return format!(
            "Hello! I'm {display_name}'s assistant. I can tell you about skills, \
             projects, certificates, or how to get in touch. What first?"
        );
    }

    if matches_any(&lower, &["thank", "cảm ơn"]) {
        return "You're welcome! Ask away if anything else about the portfolio comes up."
            .to_string();
    }

    format!(
        "I'm {display_name}'s assistant. I can help with skills, projects, \
         certificates and contact info. What would you like to know?"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::views::Skill;
    use crate::store::models::Profile;

    fn entry(question: &str, answer: &str, keywords: &[&str]) -> KnowledgeEntry {
        KnowledgeEntry {
            id: 1,
            question: question.to_string(),
            answer: answer.to_string(),
            category: None,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            is_active: true,
        }
    }

    fn context_with_knowledge(entries: Vec<KnowledgeEntry>) -> ChatContext {
        ChatContext {
            knowledge: entries,
            ..Default::default()
        }
    }

    #[test]
    fn test_keyword_inside_message_matches() {
        let kb = vec![entry("Kỹ năng của bạn?", "X", &["skill"])];
        let hits = search_knowledge("bạn có skill gì", &kb);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].answer, "X");
    }

    #[test]
    fn test_knowledge_answer_is_returned_verbatim() {
        let context = context_with_knowledge(vec![entry("Kỹ năng của bạn?", "X", &["skill"])]);
        assert_eq!(respond("bạn có skill gì", &context), "X");
    }

    #[test]
    fn test_message_inside_keyword_matches_too() {
        let kb = vec![entry("q", "a", &["availability"])];
        let hits = search_knowledge("avail", &kb);
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn test_question_substring_match_is_case_insensitive() {
        let kb = vec![entry("What is your RATE?", "50/h", &[])];
        let hits = search_knowledge("what is your rate?", &kb);
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn test_no_match_yields_empty() {
        let kb = vec![entry("q", "a", &["pricing"])];
        assert!(search_knowledge("weather", &kb).is_empty());
        assert!(search_knowledge("", &kb).is_empty());
    }

    #[test]
    fn test_knowledge_outranks_canned_topics() {
        let mut context = context_with_knowledge(vec![entry("skills?", "KB WINS", &["skill"])]);
        context.skills = vec![Skill {
            id: 1,
            name: "React".to_string(),
            category: "Frontend".to_string(),
            proficiency: String::new(),
            years_experience: 0,
            is_featured: true,
            display_order: 0,
        }];
        assert_eq!(respond("what skills do you have", &context), "KB WINS");
    }

    #[test]
    fn test_skills_topic_lists_featured_first() {
        let mut context = ChatContext::default();
        context.skills = vec![
            Skill {
                id: 1,
                name: "React".to_string(),
                category: "Frontend".to_string(),
                proficiency: String::new(),
                years_experience: 0,
                is_featured: true,
                display_order: 0,
            },
            Skill {
                id: 2,
                name: "Cobol".to_string(),
                category: "Legacy".to_string(),
                proficiency: String::new(),
                years_experience: 0,
                is_featured: false,
                display_order: 1,
            },
        ];
        let reply = respond("tell me about your skills", &context);
        assert!(reply.contains("React"));
        assert!(!reply.contains("Cobol"));
    }

    #[test]
    fn test_contact_topic_uses_profile_email() {
        let mut context = ChatContext::default();
        context.profile = Some(Profile {
            id: 1,
            name: "Dana".to_string(),
            display_name: None,
            title: None,
            bio: None,
            email: Some("dana@example.com".to_string()),
            phone: None,
            location: None,
            avatar_url: None,
            resume_url: None,
            created_at: None,
            updated_at: None,
        });
        let reply = respond("how do I contact you", &context);
        assert!(reply.contains("dana@example.com"));
        assert!(reply.contains("Dana"));
    }

    #[test]
    fn test_greeting_and_thanks() {
        let context = ChatContext::default();
        assert!(respond("hello there", &context).contains("Hello!"));
        assert!(respond("thank you so much", &context).contains("welcome"));
    }

    #[test]
    fn test_default_response_for_unrecognized_input() {
        let context = ChatContext::default();
        let reply = respond("what's the weather like", &context);
        assert!(reply.contains("assistant"));
    }
}

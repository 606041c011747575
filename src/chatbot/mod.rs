//! FAQ chatbot: a deterministic rule engine over the portfolio context,
//! with an optional generative call tried first when configured.

pub mod gemini;
pub mod rules;

use crate::content::views::{Certificate, Project, Skill, SocialLink};
use crate::portfolio;
use crate::store::models::{KnowledgeEntry, NewChatHistoryEntry, Profile};
use crate::store::query::Query;
use crate::store::{Store, StoreError};

pub const CHATBOT_KNOWLEDGE: &str = "chatbot_knowledge";
pub const CHAT_HISTORY: &str = "chat_history";

/// Everything the responder may draw on for one reply.
#[derive(Debug, Clone, Default)]
pub struct ChatContext {
    pub profile: Option<Profile>,
    pub skills: Vec<Skill>,
    pub projects: Vec<Project>,
    pub certificates: Vec<Certificate>,
    pub social_links: Vec<SocialLink>,
    pub knowledge: Vec<KnowledgeEntry>,
}

/// Active knowledge entries only; inactive ones never match.
pub async fn fetch_knowledge(store: &Store) -> Result<Vec<KnowledgeEntry>, StoreError> {
    store
        .select(CHATBOT_KNOWLEDGE, &Query::new().eq("is_active", true))
        .await
}

/// Assemble the context with one concurrent sweep. A failed slice degrades
/// to empty rather than failing the reply.
pub async fn load_context(store: &Store) -> ChatContext {
    let (profile, skills, projects, certificates, social_links, knowledge) = tokio::join!(
        portfolio::fetch_profile(store),
        portfolio::fetch_skills(store),
        portfolio::fetch_projects(store),
        portfolio::fetch_certificates(store),
        portfolio::fetch_social_links(store),
        fetch_knowledge(store),
    );

    ChatContext {
        profile: profile.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "chat context: profile fetch failed");
            None
        }),
        skills: skills.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "chat context: skills fetch failed");
            Vec::new()
        }),
        projects: projects.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "chat context: projects fetch failed");
            Vec::new()
        }),
        certificates: certificates.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "chat context: certificates fetch failed");
            Vec::new()
        }),
        social_links: social_links.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "chat context: social links fetch failed");
            Vec::new()
        }),
        knowledge: knowledge.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "chat context: knowledge fetch failed");
            Vec::new()
        }),
    }
}

/// Generative reply first when a key is configured; any failure falls back
/// transparently to the rule engine. The caller never sees the failure.
pub async fn generate_response(
    message: &str,
    context: &ChatContext,
    gemini_api_key: Option<&str>,
) -> String {
    if let Some(api_key) = gemini_api_key {
        match gemini::generate(api_key, message, context).await {
            Ok(text) => return text,
            Err(e) => {
                tracing::warn!(error = %e, "generative reply failed, using rule engine");
            }
        }
    }
    rules::respond(message, context)
}

/// Append one exchange to the history collection. Best-effort: a failure is
/// logged and swallowed, never surfaced to the visitor.
pub async fn save_history(
    store: &Store,
    session_id: &str,
    user_message: &str,
    bot_response: &str,
    response_time_ms: i64,
) {
    let entry = NewChatHistoryEntry {
        session_id: session_id.to_string(),
        user_message: user_message.to_string(),
        bot_response: bot_response.to_string(),
        response_time_ms,
    };
    if let Err(e) = store.insert_only(CHAT_HISTORY, &[entry]).await {
        tracing::warn!(error = %e, "failed to save chat history");
    }
}

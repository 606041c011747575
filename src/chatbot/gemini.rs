//! Optional generative reply via the Gemini REST API.
//!
//! Failures here are soft: the caller falls back to the rule engine on any
//! error, so everything maps to a message string instead of a typed error.

use once_cell::sync::Lazy;
use serde_json::{json, Value};

use super::ChatContext;
use crate::chatbot::rules::search_knowledge;

const GEMINI_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-pro:generateContent";

static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(reqwest::Client::new);

pub async fn generate(
    api_key: &str,
    message: &str,
    context: &ChatContext,
) -> Result<String, String> {
    let body = json!({
        "contents": [{ "parts": [{ "text": build_prompt(message, context) }] }]
    });

    let response = HTTP_CLIENT
        .post(GEMINI_ENDPOINT)
        .query(&[("key", api_key)])
        .json(&body)
        .send()
        .await
        .map_err(|e| format!("generative request failed: {e}"))?;

    let status = response.status();
    if !status.is_success() {
        return Err(format!("generative API returned {status}"));
    }

    let payload: Value = response
        .json()
        .await
        .map_err(|e| format!("failed to parse generative response: {e}"))?;
    extract_text(&payload).ok_or_else(|| "generative API returned no text".to_string())
}

/// Pull the reply text out of a generateContent response.
pub(crate) fn extract_text(payload: &Value) -> Option<String> {
    payload
        .get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .get(0)?
        .get("text")?
        .as_str()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn build_prompt(message: &str, context: &ChatContext) -> String {
    let profile = context.profile.as_ref();
    let name = profile.map(|p| p.name.as_str()).unwrap_or("the site owner");
    let title = profile
        .and_then(|p| p.title.as_deref())
        .unwrap_or("Full Stack Developer");
    let bio = profile.and_then(|p| p.bio.as_deref()).unwrap_or("");

    let skills = context
        .skills
        .iter()
        .take(8)
        .map(|s| format!("- {} ({})", s.name, s.category))
        .collect::<Vec<_>>()
        .join("\n");
    let projects = context
        .projects
        .iter()
        .take(3)
        .map(|p| format!("- {}: {}", p.title, p.description))
        .collect::<Vec<_>>()
        .join("\n");
    let certificates = context
        .certificates
        .iter()
        .take(3)
        .map(|c| format!("- {} ({})", c.title, c.issuer))
        .collect::<Vec<_>>()
        .join("\n");
    let knowledge = search_knowledge(message, &context.knowledge)
        .into_iter()
        .take(2)
        .map(|entry| format!("Q: {}\nA: {}", entry.question, entry.answer))
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "You are a friendly assistant for the portfolio of {name} ({title}).\n\
         Bio: {bio}\n\n\
         Key skills:\n{skills}\n\n\
         Highlighted projects:\n{projects}\n\n\
         Certificates:\n{certificates}\n\n\
         Relevant FAQ entries:\n{knowledge}\n\n\
         Answer briefly (under 150 words), stay on portfolio topics, and\n\
         suggest the contact form for anything you don't know.\n\n\
         Visitor question: {message}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_text_happy_path() {
        let payload = json!({
            "candidates": [{
                "content": { "parts": [{ "text": "  hello there  " }] }
            }]
        });
        assert_eq!(extract_text(&payload), Some("hello there".to_string()));
    }

    #[test]
    fn test_extract_text_rejects_empty_and_missing() {
        assert_eq!(extract_text(&json!({})), None);
        let blank = json!({
            "candidates": [{ "content": { "parts": [{ "text": "   " }] } }]
        });
        assert_eq!(extract_text(&blank), None);
    }

    #[test]
    fn test_prompt_carries_the_visitor_question() {
        let prompt = build_prompt("do you do freelance work?", &ChatContext::default());
        assert!(prompt.contains("do you do freelance work?"));
        assert!(prompt.contains("Full Stack Developer"));
    }
}

//! Contact-form forwarding to the transactional email service.
//!
//! Only constructed when all three credentials are configured; without
//! them the contact endpoint still stores the message and reports the
//! delivery feature as unavailable.

use once_cell::sync::Lazy;
use serde_json::{json, Value};

use crate::config::EmailConfig;

const SEND_ENDPOINT: &str = "https://api.emailjs.com/api/v1.0/email/send";

static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(reqwest::Client::new);

#[derive(Debug, Clone)]
pub struct Mailer {
    config: EmailConfig,
}

impl Mailer {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    fn payload(&self, name: &str, email: &str, message: &str) -> Value {
        json!({
            "service_id": self.config.service_id,
            "template_id": self.config.template_id,
            "user_id": self.config.public_key,
            "template_params": {
                "name": name,
                "email": email,
                "message": message,
            },
        })
    }

    /// Forward one contact submission through the email template.
    pub async fn send_contact(
        &self,
        name: &str,
        email: &str,
        message: &str,
    ) -> Result<(), String> {
        let response = HTTP_CLIENT
            .post(SEND_ENDPOINT)
            .json(&self.payload(name, email, message))
            .send()
            .await
            .map_err(|e| format!("email request failed: {e}"))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(format!("email service returned {status}: {body}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_carries_credentials_and_fields() {
        let mailer = Mailer::new(EmailConfig {
            service_id: "service_x".to_string(),
            template_id: "template_y".to_string(),
            public_key: "public_z".to_string(),
        });
        let payload = mailer.payload("Ada", "ada@example.com", "hello");
        assert_eq!(payload["service_id"], "service_x");
        assert_eq!(payload["template_id"], "template_y");
        assert_eq!(payload["user_id"], "public_z");
        assert_eq!(payload["template_params"]["name"], "Ada");
        assert_eq!(payload["template_params"]["email"], "ada@example.com");
        assert_eq!(payload["template_params"]["message"], "hello");
    }
}

//! Plain-language helpers backed by an external, OpenAI-compatible
//! chat-completions service.

use log::{debug, warn};
use rocket::serde::json::{serde_json, Value};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{api::BiasVerdict, db::BallotMeasure};

const SIMPLIFY_PROMPT: &str = "You explain ballot measures to voters. Rewrite the measure \
in plain language at an eighth-grade reading level, in at most four sentences. Stay strictly \
neutral: do not recommend a vote.";

const BIAS_PROMPT: &str = "You review voter information for partisan bias. Reply with only a \
JSON object of the form {\"biased\": true|false, \"explanation\": \"...\"}.";

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: String,
}

struct Endpoint {
    url: String,
    api_key: Option<String>,
    model: String,
}

/// A client for the external text service. Without a configured endpoint
/// every call reports the service as unavailable.
pub struct TextService {
    client: reqwest::Client,
    endpoint: Option<Endpoint>,
}

impl TextService {
    pub fn new(url: Option<String>, api_key: Option<String>, model: String) -> Self {
        let endpoint = url.map(|url| Endpoint {
            url: url.trim_end_matches('/').to_string(),
            api_key,
            model,
        });
        Self {
            client: reqwest::Client::new(),
            endpoint,
        }
    }

    pub fn disabled() -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.endpoint.is_some()
    }

    /// Send one system + user exchange and return the reply text.
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let endpoint = self
            .endpoint
            .as_ref()
            .ok_or_else(|| Error::Unavailable("No text service is configured".to_string()))?;

        let body = ChatRequest {
            model: &endpoint.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: 0.2,
        };
        let mut request = self.client.post(&endpoint.url).json(&body);
        if let Some(ref key) = endpoint.api_key {
            request = request.bearer_auth(key);
        }

        debug!("Calling text service at {}", endpoint.url);
        let resp = request.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!("Text service returned {status}: {body}");
            return Err(Error::TextService(format!("upstream returned {status}")));
        }
        let reply: ChatResponse = resp.json().await?;
        first_choice(reply)
    }

    /// Rewrite a ballot measure in plain language.
    pub async fn simplify(&self, measure: &BallotMeasure) -> Result<String> {
        let mut text = format!("Title: {}", measure.title);
        if let Some(ref description) = measure.description {
            text.push_str(&format!("\nDescription: {description}"));
        }
        if let Some(ref fiscal_impact) = measure.fiscal_impact {
            text.push_str(&format!("\nFiscal impact: {fiscal_impact}"));
        }
        self.complete(SIMPLIFY_PROMPT, &text).await
    }

    /// Judge whether a passage is politically slanted.
    pub async fn check_bias(&self, text: &str) -> Result<BiasVerdict> {
        let reply = self.complete(BIAS_PROMPT, text).await?;
        parse_verdict(&reply)
    }
}

fn first_choice(reply: ChatResponse) -> Result<String> {
    reply
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content.trim().to_string())
        .filter(|content| !content.is_empty())
        .ok_or_else(|| Error::TextService("upstream returned no answer".to_string()))
}

/// Parse a bias verdict, tolerating a Markdown code fence around the JSON.
fn parse_verdict(reply: &str) -> Result<BiasVerdict> {
    let trimmed = reply.trim();
    let json = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|inner| inner.strip_suffix("```"))
        .unwrap_or(trimmed)
        .trim();

    let value: Value = serde_json::from_str(json)
        .map_err(|e| Error::TextService(format!("unparseable verdict: {e}")))?;
    let biased = value["biased"]
        .as_bool()
        .ok_or_else(|| Error::TextService("verdict has no `biased` flag".to_string()))?;
    let explanation = value["explanation"].as_str().unwrap_or_default().to_string();
    Ok(BiasVerdict {
        biased,
        explanation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use rocket::serde::json::json;

    #[test]
    fn verdicts() {
        let plain = parse_verdict(r#"{"biased": true, "explanation": "loaded wording"}"#).unwrap();
        assert!(plain.biased);
        assert_eq!(plain.explanation, "loaded wording");

        let fenced = parse_verdict("```json\n{\"biased\": false}\n```").unwrap();
        assert!(!fenced.biased);
        assert_eq!(fenced.explanation, "");

        assert!(matches!(
            parse_verdict("Looks fine to me."),
            Err(Error::TextService(_))
        ));
        assert!(matches!(
            parse_verdict(r#"{"explanation": "no flag"}"#),
            Err(Error::TextService(_))
        ));
    }

    #[test]
    fn replies() {
        let reply: ChatResponse = serde_json::from_value(json!({
            "choices": [{"message": {"role": "assistant", "content": "  Plain words. "}}],
        }))
        .unwrap();
        assert_eq!(first_choice(reply).unwrap(), "Plain words.");

        let empty: ChatResponse = serde_json::from_value(json!({"choices": []})).unwrap();
        assert!(matches!(first_choice(empty), Err(Error::TextService(_))));
    }

    #[rocket::async_test]
    async fn unconfigured_is_unavailable() {
        let service = TextService::disabled();
        assert!(!service.is_enabled());
        assert!(matches!(
            service.check_bias("anything").await,
            Err(Error::Unavailable(_))
        ));
    }

    #[rocket::async_test]
    async fn unreachable_upstream_is_an_http_error() {
        let service = TextService::new(
            Some("http://127.0.0.1:1/v1/chat/completions/".to_string()),
            Some("key".to_string()),
            "model".to_string(),
        );
        assert!(service.is_enabled());
        let err = service.check_bias("anything").await.unwrap_err();
        assert!(matches!(err, Error::Http(_)));
        assert_eq!(err.status(), rocket::http::Status::BadGateway);
    }
}

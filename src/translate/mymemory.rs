// SPDX-License-Identifier: PMPL-1.0-or-later

//! MyMemory translation provider
//!
//! `GET {endpoint}?q=<text>&langpair=<source>|<target>[&de=<email>]`. The
//! service answers HTTP 200 even for most failures and reports the real
//! status inside the JSON body, sometimes as a number and sometimes as a
//! string. Quota exhaustion arrives as a "translation" that starts with
//! `MYMEMORY WARNING`.

use super::Translator;
use crate::error::ProviderError;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_ENDPOINT: &str = "https://api.mymemory.translated.net/get";
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

const QUOTA_MARKER: &str = "MYMEMORY WARNING";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MyMemoryConfig {
    pub endpoint: String,
    /// Contact address; raises the anonymous daily quota.
    pub email: Option<String>,
    pub timeout: Duration,
}

impl Default for MyMemoryConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            email: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

pub struct MyMemoryTranslator {
    client: Client,
    config: MyMemoryConfig,
}

impl MyMemoryTranslator {
    pub fn new(config: MyMemoryConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("locale-patch/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, config })
    }
}

impl Translator for MyMemoryTranslator {
    fn name(&self) -> &str {
        "mymemory"
    }

    fn translate(&self, text: &str, source: &str, target: &str) -> Result<String, ProviderError> {
        let langpair = format!("{}|{}", source, target);
        let mut query = vec![("q", text), ("langpair", langpair.as_str())];
        if let Some(email) = self.config.email.as_deref() {
            query.push(("de", email));
        }

        debug!(from = source, to = target, chars = text.len(), "requesting translation");
        let response = self
            .client
            .get(&self.config.endpoint)
            .query(&query)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().unwrap_or_default();
            return Err(ProviderError::Status {
                status: status.as_u16(),
                detail: truncate(&detail, 200),
            });
        }

        let body: MyMemoryResponse = response.json()?;
        interpret(body)
    }
}

#[derive(Debug, Deserialize)]
struct MyMemoryResponse {
    #[serde(rename = "responseData", default)]
    response_data: Option<ResponseData>,
    #[serde(rename = "responseStatus", default)]
    response_status: Value,
    #[serde(rename = "responseDetails", default)]
    response_details: Value,
}

#[derive(Debug, Deserialize)]
struct ResponseData {
    #[serde(rename = "translatedText", default)]
    translated_text: Option<String>,
}

fn interpret(body: MyMemoryResponse) -> Result<String, ProviderError> {
    let status = match &body.response_status {
        Value::Number(n) => n.as_u64().map(|n| n as u16),
        Value::String(s) => s.trim().parse::<u16>().ok(),
        _ => None,
    };
    let detail = match &body.response_details {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    };

    match status {
        Some(200) | None => {}
        Some(429) => return Err(ProviderError::Quota(detail)),
        Some(code) => {
            return Err(ProviderError::Status {
                status: code,
                detail: truncate(&detail, 200),
            })
        }
    }

    let text = body
        .response_data
        .and_then(|data| data.translated_text)
        .ok_or_else(|| ProviderError::Malformed("no translatedText in response".to_string()))?;

    if text.trim_start().starts_with(QUOTA_MARKER) {
        return Err(ProviderError::Quota(truncate(&text, 200)));
    }
    if text.trim().is_empty() {
        return Err(ProviderError::Malformed("empty translation".to_string()));
    }
    Ok(decode_entities(&text))
}

/// Undo the handful of HTML entities the service escapes.
fn decode_entities(text: &str) -> String {
    text.replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#039;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars).collect();
        format!("{}...", cut)
    }
}

//! Translator backed by the public Google Translate web endpoint.
//!
//! # Feature Gate
//!
//! This module requires the `google` feature.

use crate::defaults;
use crate::error::{OcrTransError, Result};
use crate::language::Language;
use crate::translate::translator::Translator;
use reqwest::blocking::Client;
use serde_json::Value;
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone)]
pub struct GoogleConfig {
    pub endpoint: String,
    pub timeout: Duration,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            endpoint: defaults::GOOGLE_ENDPOINT.to_string(),
            timeout: Duration::from_secs(defaults::TRANSLATION_TIMEOUT_SECS),
        }
    }
}

#[derive(Debug)]
pub struct GoogleTranslator {
    client: Client,
    endpoint: Url,
}

impl GoogleTranslator {
    pub fn new(config: GoogleConfig) -> Result<Self> {
        let endpoint = Url::parse(&config.endpoint).map_err(|e| OcrTransError::ConfigInvalidValue {
            key: "translation.endpoint".to_string(),
            message: format!("'{}': {}", config.endpoint, e),
        })?;
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| OcrTransError::Translation {
                message: format!("failed to build HTTP client: {}", e),
            })?;
        Ok(Self { client, endpoint })
    }

    fn request_url(&self, text: &str, from: Language, to: Language) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("client", "gtx")
            .append_pair("sl", google_code(from))
            .append_pair("tl", google_code(to))
            .append_pair("dt", "t")
            .append_pair("q", text);
        url
    }
}

impl Translator for GoogleTranslator {
    fn translate(&self, text: &str, from: Language, to: Language) -> Result<String> {
        let url = self.request_url(text, from, to);
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| OcrTransError::Translation {
                message: format!("request failed: {}", e),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(OcrTransError::Translation {
                message: format!("service returned HTTP {}", status),
            });
        }

        let body = response.text().map_err(|e| OcrTransError::Translation {
            message: format!("failed to read response: {}", e),
        })?;
        parse_response(&body)
    }

    fn name(&self) -> &str {
        "google"
    }
}

/// Language tag the endpoint expects.
fn google_code(language: Language) -> &'static str {
    match language {
        Language::Chinese => "zh-CN",
        other => other.iso_code(),
    }
}

/// Concatenates the translated segments of a `dt=t` response.
///
/// The body is `[[["<translated>", "<original>", ...], ...], ...]`; long
/// input is split into several segments.
fn parse_response(body: &str) -> Result<String> {
    let value: Value = serde_json::from_str(body).map_err(|e| OcrTransError::Translation {
        message: format!("malformed response: {}", e),
    })?;

    let segments = value
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| OcrTransError::Translation {
            message: "response has no translation segments".to_string(),
        })?;

    Ok(segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_segment() {
        let body = r#"[[["안녕 세상","Hello world",null,null,10]],null,"en"]"#;
        assert_eq!(parse_response(body).unwrap(), "안녕 세상");
    }

    #[test]
    fn concatenates_segments() {
        let body = r#"[[["Hallo. ","Hello. ",null,null,3],["Welt","World",null,null,3]],null,"en"]"#;
        assert_eq!(parse_response(body).unwrap(), "Hallo. Welt");
    }

    #[test]
    fn rejects_unexpected_shape() {
        assert!(matches!(
            parse_response(r#"{"error": "quota"}"#),
            Err(OcrTransError::Translation { .. })
        ));
        assert!(parse_response("not json").is_err());
        assert!(parse_response("[null]").is_err());
    }

    #[test]
    fn request_url_encodes_query() {
        let translator = GoogleTranslator::new(GoogleConfig::default()).unwrap();
        let url = translator.request_url("a & b", Language::English, Language::Chinese);

        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(pairs.contains(&("sl".to_string(), "en".to_string())));
        assert!(pairs.contains(&("tl".to_string(), "zh-CN".to_string())));
        assert!(pairs.contains(&("q".to_string(), "a & b".to_string())));
        assert!(url.as_str().starts_with(defaults::GOOGLE_ENDPOINT));
    }

    #[test]
    fn invalid_endpoint_is_config_error() {
        let config = GoogleConfig {
            endpoint: "not a url".to_string(),
            ..GoogleConfig::default()
        };
        assert!(matches!(
            GoogleTranslator::new(config),
            Err(OcrTransError::ConfigInvalidValue { .. })
        ));
    }
}

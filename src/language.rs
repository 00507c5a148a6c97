//! Languages understood by both the recognition engine and the translator.

use crate::error::{OcrTransError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A language the pipeline can recognize or translate into.
///
/// Serialized as its ISO-639-1 code so config files read `language = "en"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "en")]
    English,
    #[serde(rename = "ko")]
    Korean,
    #[serde(rename = "ja")]
    Japanese,
    #[serde(rename = "zh")]
    Chinese,
    #[serde(rename = "de")]
    German,
    #[serde(rename = "fr")]
    French,
    #[serde(rename = "es")]
    Spanish,
}

impl Language {
    pub const ALL: [Language; 7] = [
        Language::English,
        Language::Korean,
        Language::Japanese,
        Language::Chinese,
        Language::German,
        Language::French,
        Language::Spanish,
    ];

    /// ISO-639-1 code, as expected by translation services.
    pub fn iso_code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Korean => "ko",
            Language::Japanese => "ja",
            Language::Chinese => "zh",
            Language::German => "de",
            Language::French => "fr",
            Language::Spanish => "es",
        }
    }

    /// Name of the tesseract traineddata file for this language.
    pub fn tesseract_code(self) -> &'static str {
        match self {
            Language::English => "eng",
            Language::Korean => "kor",
            Language::Japanese => "jpn",
            Language::Chinese => "chi_sim",
            Language::German => "deu",
            Language::French => "fra",
            Language::Spanish => "spa",
        }
    }

    /// English display name.
    pub fn name(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Korean => "Korean",
            Language::Japanese => "Japanese",
            Language::Chinese => "Chinese",
            Language::German => "German",
            Language::French => "French",
            Language::Spanish => "Spanish",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.iso_code())
    }
}

impl FromStr for Language {
    type Err = OcrTransError;

    /// Accepts ISO codes, tesseract codes and English names, case-insensitively.
    fn from_str(s: &str) -> Result<Self> {
        let needle = s.trim().to_lowercase();
        Language::ALL
            .into_iter()
            .find(|lang| {
                needle == lang.iso_code()
                    || needle == lang.tesseract_code()
                    || needle == lang.name().to_lowercase()
            })
            .ok_or(OcrTransError::UnsupportedLanguage {
                code: s.to_string(),
            })
    }
}

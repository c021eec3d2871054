//! Supported languages for AI responses and canned fallbacks.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Languages the gateway can answer in.
///
/// Anything outside this set falls back to English; parsing is lenient so
/// a locale tag like `pt` or `pt_BR` still resolves to Brazilian
/// Portuguese.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    En,
    #[serde(rename = "pt-BR")]
    PtBr,
    #[serde(rename = "es")]
    Es,
    #[serde(rename = "ru")]
    Ru,
}

impl Language {
    /// All supported languages.
    pub const ALL: [Language; 4] = [Language::En, Language::PtBr, Language::Es, Language::Ru];

    /// The BCP-47 tag sent to providers and stored on records.
    pub fn as_tag(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::PtBr => "pt-BR",
            Language::Es => "es",
            Language::Ru => "ru",
        }
    }

    /// Parses a locale tag, defaulting to English for anything unknown.
    pub fn from_tag(tag: &str) -> Self {
        let normalized = tag.trim().replace('_', "-");
        let lower = normalized.to_ascii_lowercase();
        match lower.as_str() {
            "pt-br" | "pt" => Language::PtBr,
            "es" => Language::Es,
            "ru" => Language::Ru,
            _ => Language::En,
        }
    }

    /// Returns true for the default response language.
    pub fn is_default(&self) -> bool {
        *self == Language::En
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_tag())
    }
}

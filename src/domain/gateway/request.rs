//! Capability requests - the tagged union accepted by the dispatcher.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::foundation::{Language, SessionId, UserId};
use crate::domain::interaction::ClientContext;
use crate::domain::listing::{PropertyAttributes, PropertyType};
use crate::domain::user::PropertyPreferences;

/// The six AI-backed capabilities the gateway dispatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityKind {
    Chat,
    Recommend,
    PredictPrice,
    MarketAnalysis,
    Translate,
    AnalyzeImage,
}

/// Free-text conversational query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatPayload {
    pub query: String,
    /// Free-form caller context, stored verbatim on the interaction record.
    pub context: Option<Value>,
}

/// Preference overrides for property recommendations. Fields set here win
/// over the requester's stored preferences.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecommendPayload {
    #[serde(default)]
    pub overrides: PropertyPreferences,
}

/// Attributes of the property to value, plus caller-supplied market data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictPricePayload {
    pub attributes: PropertyAttributes,
    pub market_data: Option<Value>,
}

/// Market-analysis parameters. The timeframe is a caller token resolved
/// leniently (unknown tokens mean six months).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketAnalysisPayload {
    pub location: String,
    pub property_type: PropertyType,
    pub timeframe: String,
}

/// Text translation. A `None` source language asks the provider to detect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslatePayload {
    pub text: String,
    pub target_language: Language,
    pub source_language: Option<String>,
}

/// Instruction flavor for property image analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageAnalysisType {
    #[default]
    General,
    Damage,
    Features,
    Quality,
}

/// Image to analyze, by reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeImagePayload {
    pub image_url: String,
    #[serde(default)]
    pub analysis_type: ImageAnalysisType,
}

/// Capability-specific payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "capability", rename_all = "snake_case")]
pub enum CapabilityPayload {
    Chat(ChatPayload),
    Recommend(RecommendPayload),
    PredictPrice(PredictPricePayload),
    MarketAnalysis(MarketAnalysisPayload),
    Translate(TranslatePayload),
    AnalyzeImage(AnalyzeImagePayload),
}

impl CapabilityPayload {
    /// Which capability this payload targets.
    pub fn kind(&self) -> CapabilityKind {
        match self {
            CapabilityPayload::Chat(_) => CapabilityKind::Chat,
            CapabilityPayload::Recommend(_) => CapabilityKind::Recommend,
            CapabilityPayload::PredictPrice(_) => CapabilityKind::PredictPrice,
            CapabilityPayload::MarketAnalysis(_) => CapabilityKind::MarketAnalysis,
            CapabilityPayload::Translate(_) => CapabilityKind::Translate,
            CapabilityPayload::AnalyzeImage(_) => CapabilityKind::AnalyzeImage,
        }
    }
}

/// One request into the gateway.
///
/// The requester is nullable: market analysis and image analysis may run
/// system-triggered with no caller. A missing session id is generated at
/// dispatch time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapabilityRequest {
    pub requester: Option<UserId>,
    pub session: Option<SessionId>,
    #[serde(default)]
    pub language: Language,
    #[serde(default)]
    pub client: ClientContext,
    pub payload: CapabilityPayload,
}

impl CapabilityRequest {
    /// Creates a request with defaults for the common fields.
    pub fn new(payload: CapabilityPayload) -> Self {
        Self {
            requester: None,
            session: None,
            language: Language::default(),
            client: ClientContext::default(),
            payload,
        }
    }

    /// Convenience constructor for a chat query.
    pub fn chat(query: impl Into<String>) -> Self {
        Self::new(CapabilityPayload::Chat(ChatPayload {
            query: query.into(),
            context: None,
        }))
    }

    /// Convenience constructor for a translation.
    pub fn translate(text: impl Into<String>, target_language: Language) -> Self {
        Self::new(CapabilityPayload::Translate(TranslatePayload {
            text: text.into(),
            target_language,
            source_language: None,
        }))
    }

    /// Sets the requester.
    pub fn with_requester(mut self, requester: UserId) -> Self {
        self.requester = Some(requester);
        self
    }

    /// Sets the session id.
    pub fn with_session(mut self, session: SessionId) -> Self {
        self.session = Some(session);
        self
    }

    /// Sets the response language.
    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    /// Sets the client context hints.
    pub fn with_client(mut self, client: ClientContext) -> Self {
        self.client = client;
        self
    }

    /// Which capability this request targets.
    pub fn kind(&self) -> CapabilityKind {
        self.payload.kind()
    }

    /// The request's session id, generating one if the caller sent none.
    pub fn session_or_new(&self) -> SessionId {
        self.session.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_request_defaults() {
        let request = CapabilityRequest::chat("How many villas are listed?");
        assert_eq!(request.kind(), CapabilityKind::Chat);
        assert_eq!(request.language, Language::En);
        assert!(request.requester.is_none());
        assert!(request.session.is_none());
    }

    #[test]
    fn missing_session_is_generated() {
        let request = CapabilityRequest::chat("hi");
        let a = request.session_or_new();
        let b = request.session_or_new();
        // Each call mints a fresh id until the caller pins one.
        assert_ne!(a, b);

        let pinned = SessionId::new();
        let request = request.with_session(pinned);
        assert_eq!(request.session_or_new(), pinned);
    }

    #[test]
    fn payload_kind_matches_variant() {
        let request = CapabilityRequest::translate("hello", Language::Es);
        assert_eq!(request.kind(), CapabilityKind::Translate);
    }
}

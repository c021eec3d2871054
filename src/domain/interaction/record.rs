//! One record per user-facing AI capability invocation.
//!
//! A record is created at call time and owned by the dispatcher until it is
//! handed to the interaction store. Quality and business-impact fields are
//! filled in later by business-event hooks, never at creation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::foundation::{InteractionId, Language, SessionId, UserId};

/// Which capability produced this record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    Chatbot,
    Recommendation,
    PricePrediction,
    MarketAnalysis,
    ImageAnalysis,
}

impl InteractionKind {
    /// Stable string form stored in the log database.
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionKind::Chatbot => "chatbot",
            InteractionKind::Recommendation => "recommendation",
            InteractionKind::PricePrediction => "price_prediction",
            InteractionKind::MarketAnalysis => "market_analysis",
            InteractionKind::ImageAnalysis => "image_analysis",
        }
    }
}

/// What the caller asked for.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InteractionInput {
    pub query: Option<String>,
    #[serde(default)]
    pub language: Language,
    /// Free-form context supplied by the caller (session hints, filters).
    pub context: Option<Value>,
}

/// Descriptor of the model that served the request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub model_name: String,
    pub provider: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

/// Token accounting as reported by the provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl TokenUsage {
    /// Creates usage from prompt and completion counts.
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }

    /// Usage with only a total (some call sites discard the breakdown).
    pub fn total_only(total_tokens: u32) -> Self {
        Self {
            prompt_tokens: 0,
            completion_tokens: 0,
            total_tokens,
        }
    }
}

/// What came back, when the call reached the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseData {
    pub content: String,
    pub confidence: Option<f32>,
    pub processing_time_ms: u64,
    pub token_usage: Option<TokenUsage>,
}

/// User-supplied quality signals, filled in after the fact.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QualityMetrics {
    pub user_rating: Option<u8>,
    pub was_helpful: Option<bool>,
    pub user_feedback: Option<String>,
}

impl QualityMetrics {
    /// Quality block from a user rating. Ratings are clamped to the 1-5
    /// schema range; four and above counts as helpful.
    pub fn from_rating(rating: u8, feedback: Option<String>) -> Self {
        let rating = rating.clamp(1, 5);
        Self {
            user_rating: Some(rating),
            was_helpful: Some(rating >= 4),
            user_feedback: feedback,
        }
    }
}

/// Downstream business outcomes attributed to this interaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BusinessImpact {
    pub lead_generated: bool,
    pub property_viewed: bool,
    pub inquiry_sent: bool,
    pub booking_made: bool,
    pub conversion_value: f64,
}

impl BusinessImpact {
    /// Applies a partial update. Fields absent from the update keep their
    /// stored value, so updates applied in any order accumulate.
    pub fn apply(&mut self, update: BusinessImpactUpdate) {
        if let Some(v) = update.lead_generated {
            self.lead_generated = v;
        }
        if let Some(v) = update.property_viewed {
            self.property_viewed = v;
        }
        if let Some(v) = update.inquiry_sent {
            self.inquiry_sent = v;
        }
        if let Some(v) = update.booking_made {
            self.booking_made = v;
        }
        if let Some(v) = update.conversion_value {
            self.conversion_value = v;
        }
    }
}

/// Partial business-impact update; `None` fields leave the stored value
/// untouched, so successive updates compose instead of overwriting.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct BusinessImpactUpdate {
    pub lead_generated: Option<bool>,
    pub property_viewed: Option<bool>,
    pub inquiry_sent: Option<bool>,
    pub booking_made: Option<bool>,
    pub conversion_value: Option<f64>,
}

/// Error descriptor; `occurred = false` on the happy path.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InteractionError {
    pub occurred: bool,
    pub message: Option<String>,
    pub code: Option<String>,
}

/// Latency and delivery metrics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PerformanceInfo {
    pub response_time_ms: Option<u64>,
    pub cache_hit: bool,
    pub retry_count: u32,
}

/// Where the request came from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientContext {
    /// Originating platform: "web", "mobile", "whatsapp", "telegram", "api".
    pub platform: Option<String>,
    pub device_type: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
}

/// One user-facing AI interaction, success or failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiInteractionRecord {
    pub id: InteractionId,
    pub user_id: Option<UserId>,
    pub session_id: SessionId,
    pub kind: InteractionKind,
    pub input: InteractionInput,
    pub model_info: Option<ModelInfo>,
    pub response: Option<ResponseData>,
    pub quality: QualityMetrics,
    pub business_impact: BusinessImpact,
    pub error: InteractionError,
    pub performance: PerformanceInfo,
    pub client: ClientContext,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AiInteractionRecord {
    /// Creates a record at call time with no error and empty outcome fields.
    pub fn new(kind: InteractionKind, session_id: SessionId) -> Self {
        let now = Utc::now();
        Self {
            id: InteractionId::new(),
            user_id: None,
            session_id,
            kind,
            input: InteractionInput::default(),
            model_info: None,
            response: None,
            quality: QualityMetrics::default(),
            business_impact: BusinessImpact::default(),
            error: InteractionError::default(),
            performance: PerformanceInfo::default(),
            client: ClientContext::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets the requester.
    pub fn with_user(mut self, user_id: Option<UserId>) -> Self {
        self.user_id = user_id;
        self
    }

    /// Sets the input block.
    pub fn with_input(mut self, input: InteractionInput) -> Self {
        self.input = input;
        self
    }

    /// Sets the model descriptor.
    pub fn with_model_info(mut self, model_info: ModelInfo) -> Self {
        self.model_info = Some(model_info);
        self
    }

    /// Sets the response block and mirrors its latency into performance.
    pub fn with_response(mut self, response: ResponseData) -> Self {
        self.performance.response_time_ms = Some(response.processing_time_ms);
        self.response = Some(response);
        self
    }

    /// Sets the client context block.
    pub fn with_client(mut self, client: ClientContext) -> Self {
        self.client = client;
        self
    }

    /// Marks the record as failed with the provider's message.
    pub fn with_failure(mut self, message: impl Into<String>, code: Option<String>) -> Self {
        self.error = InteractionError {
            occurred: true,
            message: Some(message.into()),
            code,
        };
        self
    }

    /// Merges business-impact flags. Fields absent from the update keep
    /// their stored value, so updates applied in any order accumulate.
    pub fn record_business_impact(&mut self, update: BusinessImpactUpdate) {
        self.business_impact.apply(update);
        self.updated_at = Utc::now();
    }

    /// Records user feedback. Ratings of four and above count as helpful.
    pub fn mark_as_helpful(&mut self, rating: u8, feedback: Option<String>) {
        self.quality = QualityMetrics::from_rating(rating, feedback);
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_record_has_no_error() {
        let record = AiInteractionRecord::new(InteractionKind::Chatbot, SessionId::new());
        assert!(!record.error.occurred);
        assert!(record.response.is_none());
        assert_eq!(record.business_impact, BusinessImpact::default());
    }

    #[test]
    fn business_impact_updates_accumulate() {
        let mut record = AiInteractionRecord::new(InteractionKind::Chatbot, SessionId::new());

        record.record_business_impact(BusinessImpactUpdate {
            lead_generated: Some(true),
            ..Default::default()
        });
        record.record_business_impact(BusinessImpactUpdate {
            booking_made: Some(true),
            ..Default::default()
        });

        assert!(record.business_impact.lead_generated);
        assert!(record.business_impact.booking_made);
        assert!(!record.business_impact.inquiry_sent);
    }

    #[test]
    fn helpfulness_threshold_is_four() {
        let mut record =
            AiInteractionRecord::new(InteractionKind::Recommendation, SessionId::new());

        record.mark_as_helpful(4, None);
        assert_eq!(record.quality.was_helpful, Some(true));

        record.mark_as_helpful(3, Some("too generic".to_string()));
        assert_eq!(record.quality.was_helpful, Some(false));
        assert_eq!(record.quality.user_feedback.as_deref(), Some("too generic"));
    }

    #[test]
    fn rating_is_clamped_to_schema_range() {
        let mut record = AiInteractionRecord::new(InteractionKind::Chatbot, SessionId::new());
        record.mark_as_helpful(9, None);
        assert_eq!(record.quality.user_rating, Some(5));

        record.mark_as_helpful(0, None);
        assert_eq!(record.quality.user_rating, Some(1));
    }

    #[test]
    fn failure_sets_error_descriptor() {
        let record = AiInteractionRecord::new(InteractionKind::PricePrediction, SessionId::new())
            .with_failure("connection reset", None);
        assert!(record.error.occurred);
        assert_eq!(record.error.message.as_deref(), Some("connection reset"));
    }

    #[test]
    fn token_usage_totals() {
        let usage = TokenUsage::new(120, 80);
        assert_eq!(usage.total_tokens, 200);

        let total_only = TokenUsage::total_only(512);
        assert_eq!(total_only.total_tokens, 512);
        assert_eq!(total_only.prompt_tokens, 0);
    }

    #[test]
    fn response_latency_mirrors_into_performance() {
        let record = AiInteractionRecord::new(InteractionKind::Chatbot, SessionId::new())
            .with_response(ResponseData {
                content: "hi".to_string(),
                confidence: None,
                processing_time_ms: 420,
                token_usage: None,
            });
        assert_eq!(record.performance.response_time_ms, Some(420));
    }
}

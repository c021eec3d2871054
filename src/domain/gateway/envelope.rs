//! The uniform result envelope returned to every caller.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Language, SessionId};
use crate::domain::interaction::TokenUsage;
use crate::domain::listing::PropertySummary;

/// Conversational answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    pub content: String,
    pub token_usage: Option<TokenUsage>,
}

/// One ranked recommendation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedProperty {
    pub property: PropertySummary,
    pub rank: u32,
    /// Synthetic 0.7-1.0 compatibility score.
    pub match_score: f64,
    pub explanation: String,
}

/// Ranked recommendations plus the size of the candidate pool they came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationReply {
    pub recommendations: Vec<RankedProperty>,
    pub total_candidates: usize,
}

/// Low/high bounds of a price estimate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

/// Parsed valuation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricePrediction {
    pub estimated_price: f64,
    pub price_range: PriceRange,
    pub confidence: f64,
    /// The model's full answer, kept for operator review.
    pub explanation: String,
}

/// Market analysis with the full raw text retained.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketAnalysisReply {
    pub summary: String,
    pub trend: String,
    pub price_analysis: String,
    pub outlook: String,
    pub full_analysis: String,
    /// How many sold listings backed the aggregate statistics.
    pub data_points: u64,
}

/// Translated text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationReply {
    pub translated_text: String,
    pub source_language: Option<String>,
    pub target_language: Language,
}

/// Image analysis triple.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageAnalysisReply {
    pub description: String,
    pub features: Vec<String>,
    pub condition: String,
    /// Synthetic 0.7-1.0 quality score.
    pub score: f64,
}

/// Capability-specific payload of a successful invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "capability", rename_all = "snake_case")]
pub enum CapabilityReply {
    Chat(ChatReply),
    Recommendations(RecommendationReply),
    PricePrediction(PricePrediction),
    MarketAnalysis(MarketAnalysisReply),
    Translation(TranslationReply),
    ImageAnalysis(ImageAnalysisReply),
}

/// Uniform result shape for every capability invocation.
///
/// Exactly one of `payload` / `error` is populated. `fallback` carries the
/// localized apology string when the capability could not be fulfilled;
/// internal error detail stays in `error` for operator diagnostics only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    pub success: bool,
    pub payload: Option<CapabilityReply>,
    pub error: Option<String>,
    pub fallback: Option<String>,
    pub processing_time_ms: u64,
    pub session_id: SessionId,
}

impl Envelope {
    /// Successful invocation.
    pub fn success(payload: CapabilityReply, processing_time_ms: u64, session_id: SessionId) -> Self {
        Self {
            success: true,
            payload: Some(payload),
            error: None,
            fallback: None,
            processing_time_ms,
            session_id,
        }
    }

    /// Failed invocation with a localized fallback string.
    pub fn degraded(
        error: impl Into<String>,
        fallback: impl Into<String>,
        processing_time_ms: u64,
        session_id: SessionId,
    ) -> Self {
        Self {
            success: false,
            payload: None,
            error: Some(error.into()),
            fallback: Some(fallback.into()),
            processing_time_ms,
            session_id,
        }
    }

    /// Failed invocation with no fallback text (domain errors such as an
    /// unknown requester).
    pub fn failure(
        error: impl Into<String>,
        processing_time_ms: u64,
        session_id: SessionId,
    ) -> Self {
        Self {
            success: false,
            payload: None,
            error: Some(error.into()),
            fallback: None,
            processing_time_ms,
            session_id,
        }
    }
}

//! Gateway module - pure core of the capability dispatcher.
//!
//! Everything here is computable without I/O: request/response shapes,
//! the availability flags, prompt construction, response parsing, and the
//! canned fallback catalog.

mod availability;
mod envelope;
mod fallback;
mod parser;
mod prompts;
mod request;

pub use availability::CapabilityAvailability;
pub use envelope::{
    CapabilityReply, ChatReply, Envelope, ImageAnalysisReply, MarketAnalysisReply, PriceRange,
    PricePrediction, RankedProperty, RecommendationReply, TranslationReply,
};
pub use fallback::apology;
pub use parser::{
    parse_image_analysis, parse_market_analysis, parse_price_prediction, parse_recommendations,
    DEFAULT_PRICE_CONFIDENCE,
};
pub use prompts::{
    chat_system_prompt, image_analysis_prompt, market_analysis_prompt,
    market_analysis_system_prompt, price_prediction_prompt, price_prediction_system_prompt,
    recommendation_prompt, recommendation_system_prompt,
};
pub use request::{
    AnalyzeImagePayload, CapabilityKind, CapabilityPayload, CapabilityRequest, ChatPayload,
    ImageAnalysisType, MarketAnalysisPayload, PredictPricePayload, RecommendPayload,
    TranslatePayload,
};

//! Interaction module - the business-facing AI interaction trace.

mod record;

pub use record::{
    AiInteractionRecord, BusinessImpact, BusinessImpactUpdate, ClientContext, InteractionError,
    InteractionInput, InteractionKind, ModelInfo, PerformanceInfo, QualityMetrics, ResponseData,
    TokenUsage,
};

//! The capability dispatcher - façade over providers, entity readers and
//! log stores.
//!
//! For each capability the dispatcher checks availability, builds the
//! prompt, invokes the provider, parses the response, records the
//! interaction, and returns the uniform envelope. Every path returns an
//! envelope; nothing here raises a fatal error to the caller.
//!
//! The gateway is constructed once at process start and shared; the only
//! state it carries across requests is the read-only availability flags
//! and `Arc` handles to its collaborators.

use serde_json::json;
use std::sync::Arc;
use std::time::Instant;

use crate::config::AiConfig;
use crate::domain::foundation::{DomainError, ErrorCode, InteractionId, SessionId};
use crate::domain::gateway::{
    apology, chat_system_prompt, image_analysis_prompt, market_analysis_prompt,
    market_analysis_system_prompt, parse_image_analysis, parse_market_analysis,
    parse_price_prediction, parse_recommendations, price_prediction_prompt,
    price_prediction_system_prompt, recommendation_prompt, recommendation_system_prompt,
    AnalyzeImagePayload, CapabilityAvailability, CapabilityKind, CapabilityPayload,
    CapabilityReply, CapabilityRequest, ChatPayload, ChatReply, Envelope, MarketAnalysisPayload,
    PredictPricePayload, RecommendPayload, RecommendationReply, TranslatePayload,
    TranslationReply,
};
use crate::domain::integration::{
    ActionDescriptor, ActionType, IntegrationLogRecord, ServiceDescriptor, ServiceName,
};
use crate::domain::interaction::{
    AiInteractionRecord, BusinessImpactUpdate, InteractionInput, InteractionKind, ModelInfo,
    ResponseData, TokenUsage,
};
use crate::domain::listing::{MarketStats, MarketTimeframe, PropertyFilter};
use crate::ports::{
    ChatMessage, CompletionRequest, IntegrationStore, InteractionStore, ModelProvider,
    PropertyReader, TranslationProvider, UserReader,
};

use super::{IntegrationLogger, InteractionLogger};

const CHAT_TEMPERATURE: f32 = 0.7;
const CHAT_MAX_TOKENS: u32 = 1500;
const CHAT_PRESENCE_PENALTY: f32 = 0.6;
const CHAT_FREQUENCY_PENALTY: f32 = 0.3;

const RECOMMENDATION_TEMPERATURE: f32 = 0.5;
const RECOMMENDATION_MAX_TOKENS: u32 = 2000;
/// Candidate pool fetched per recommendation request.
const CANDIDATE_POOL_LIMIT: usize = 20;

const PRICE_TEMPERATURE: f32 = 0.3;
const PRICE_MAX_TOKENS: u32 = 1000;
/// Sold comparables fetched per valuation.
const COMPARABLE_LIMIT: usize = 10;

const MARKET_TEMPERATURE: f32 = 0.4;
const MARKET_MAX_TOKENS: u32 = 2500;

const IMAGE_TEMPERATURE: f32 = 0.3;
const IMAGE_MAX_TOKENS: u32 = 1000;

/// Builder wiring the gateway's optional collaborators.
///
/// Every dependency is optional; what is absent at `build` time is marked
/// unavailable for the process lifetime and the affected capabilities
/// degrade to canned fallbacks.
#[derive(Default)]
pub struct AiGatewayBuilder {
    model_provider: Option<Arc<dyn ModelProvider>>,
    translation_provider: Option<Arc<dyn TranslationProvider>>,
    user_reader: Option<Arc<dyn UserReader>>,
    property_reader: Option<Arc<dyn PropertyReader>>,
    interaction_store: Option<Arc<dyn InteractionStore>>,
    integration_store: Option<Arc<dyn IntegrationStore>>,
    chat_model: Option<String>,
    vision_model: Option<String>,
}

impl AiGatewayBuilder {
    /// Wires the model provider.
    pub fn with_model_provider(mut self, provider: Arc<dyn ModelProvider>) -> Self {
        self.model_provider = Some(provider);
        self
    }

    /// Wires the translation provider.
    pub fn with_translation_provider(mut self, provider: Arc<dyn TranslationProvider>) -> Self {
        self.translation_provider = Some(provider);
        self
    }

    /// Wires the user store reader.
    pub fn with_user_reader(mut self, reader: Arc<dyn UserReader>) -> Self {
        self.user_reader = Some(reader);
        self
    }

    /// Wires the property store reader.
    pub fn with_property_reader(mut self, reader: Arc<dyn PropertyReader>) -> Self {
        self.property_reader = Some(reader);
        self
    }

    /// Wires the interaction log store.
    pub fn with_interaction_store(mut self, store: Arc<dyn InteractionStore>) -> Self {
        self.interaction_store = Some(store);
        self
    }

    /// Wires the integration log store.
    pub fn with_integration_store(mut self, store: Arc<dyn IntegrationStore>) -> Self {
        self.integration_store = Some(store);
        self
    }

    /// Overrides the chat and vision model names.
    pub fn with_models(mut self, chat_model: impl Into<String>, vision_model: impl Into<String>) -> Self {
        self.chat_model = Some(chat_model.into());
        self.vision_model = Some(vision_model.into());
        self
    }

    /// Takes model names from the AI configuration section.
    pub fn with_model_config(self, config: &AiConfig) -> Self {
        self.with_models(config.chat_model.clone(), config.vision_model.clone())
    }

    /// Builds the gateway, freezing availability from what was wired.
    pub fn build(self) -> AiGateway {
        let availability = CapabilityAvailability {
            model_provider: self.model_provider.is_some(),
            translation_provider: self.translation_provider.is_some(),
            user_store: self.user_reader.is_some(),
            property_store: self.property_reader.is_some(),
            interaction_store: self.interaction_store.is_some(),
            integration_store: self.integration_store.is_some(),
        };

        AiGateway {
            availability,
            model_provider: self.model_provider,
            translation_provider: self.translation_provider,
            user_reader: self.user_reader,
            property_reader: self.property_reader,
            interactions: InteractionLogger::new(self.interaction_store),
            integrations: IntegrationLogger::new(self.integration_store),
            chat_model: self.chat_model.unwrap_or_else(|| "gpt-4".to_string()),
            vision_model: self.vision_model.unwrap_or_else(|| "gpt-4-vision".to_string()),
        }
    }
}

/// The AI capability gateway.
pub struct AiGateway {
    availability: CapabilityAvailability,
    model_provider: Option<Arc<dyn ModelProvider>>,
    translation_provider: Option<Arc<dyn TranslationProvider>>,
    user_reader: Option<Arc<dyn UserReader>>,
    property_reader: Option<Arc<dyn PropertyReader>>,
    interactions: InteractionLogger,
    integrations: IntegrationLogger,
    chat_model: String,
    vision_model: String,
}

impl AiGateway {
    /// Starts a builder.
    pub fn builder() -> AiGatewayBuilder {
        AiGatewayBuilder::default()
    }

    /// The availability flags frozen at construction.
    pub fn availability(&self) -> CapabilityAvailability {
        self.availability
    }

    /// Dispatches one capability request and returns the uniform envelope.
    pub async fn invoke(&self, request: CapabilityRequest) -> Envelope {
        let started = Instant::now();
        let session_id = request.session_or_new();

        if !self.availability.allows(request.kind()) {
            return self.gate_out(&request, session_id, started).await;
        }

        match &request.payload {
            CapabilityPayload::Chat(payload) => {
                self.chat(&request, payload, session_id, started).await
            }
            CapabilityPayload::Recommend(payload) => {
                self.recommend(&request, payload, session_id, started).await
            }
            CapabilityPayload::PredictPrice(payload) => {
                self.predict_price(&request, payload, session_id, started).await
            }
            CapabilityPayload::MarketAnalysis(payload) => {
                self.market_analysis(&request, payload, session_id, started).await
            }
            CapabilityPayload::Translate(payload) => {
                self.translate(&request, payload, session_id, started).await
            }
            CapabilityPayload::AnalyzeImage(payload) => {
                self.analyze_image(&request, payload, session_id, started).await
            }
        }
    }

    /// Merges business-impact flags into a persisted interaction record.
    pub async fn record_business_impact(
        &self,
        id: &InteractionId,
        update: BusinessImpactUpdate,
    ) -> Result<(), DomainError> {
        match self.interactions.store() {
            Some(store) => store.record_business_impact(id, update).await,
            None => Err(DomainError::new(
                ErrorCode::DependencyUnavailable,
                "interaction store not configured",
            )),
        }
    }

    /// Records user feedback on a persisted interaction record.
    pub async fn mark_interaction_helpful(
        &self,
        id: &InteractionId,
        rating: u8,
        feedback: Option<String>,
    ) -> Result<(), DomainError> {
        match self.interactions.store() {
            Some(store) => store.mark_as_helpful(id, rating, feedback).await,
            None => Err(DomainError::new(
                ErrorCode::DependencyUnavailable,
                "interaction store not configured",
            )),
        }
    }

    // ==== Capability handlers ====

    async fn chat(
        &self,
        request: &CapabilityRequest,
        payload: &ChatPayload,
        session_id: SessionId,
        started: Instant,
    ) -> Envelope {
        let Some(provider) = &self.model_provider else {
            return self.gate_out(request, session_id, started).await;
        };

        let mut role = None;
        if let (Some(user_id), Some(reader)) = (&request.requester, &self.user_reader) {
            match reader.find_by_id(user_id).await {
                Ok(profile) => role = profile.map(|p| p.role),
                Err(err) => {
                    tracing::warn!(user_id = %user_id, error = %err, "could not fetch user for chat context");
                }
            }
        }

        let system_prompt = chat_system_prompt(role, request.language);
        let completion = CompletionRequest::new(&self.chat_model, CHAT_TEMPERATURE, CHAT_MAX_TOKENS)
            .with_message(ChatMessage::system(system_prompt))
            .with_message(ChatMessage::user(&payload.query))
            .with_penalties(CHAT_PRESENCE_PENALTY, CHAT_FREQUENCY_PENALTY);

        match provider.complete(completion).await {
            Ok(response) => {
                let elapsed = elapsed_ms(started);
                let record = AiInteractionRecord::new(InteractionKind::Chatbot, session_id)
                    .with_user(request.requester)
                    .with_input(self.input_for(request))
                    .with_client(request.client.clone())
                    .with_model_info(self.model_info(
                        &self.chat_model,
                        provider.provider_name(),
                        CHAT_TEMPERATURE,
                        CHAT_MAX_TOKENS,
                    ))
                    .with_response(ResponseData {
                        content: response.content.clone(),
                        confidence: None,
                        processing_time_ms: elapsed,
                        token_usage: Some(response.usage),
                    });
                self.interactions.log(&record).await;

                Envelope::success(
                    CapabilityReply::Chat(ChatReply {
                        content: response.content,
                        token_usage: Some(response.usage),
                    }),
                    elapsed,
                    session_id,
                )
            }
            Err(err) => {
                self.fail_with_record(
                    request,
                    InteractionKind::Chatbot,
                    session_id,
                    started,
                    err.to_string(),
                )
                .await
            }
        }
    }

    async fn recommend(
        &self,
        request: &CapabilityRequest,
        payload: &RecommendPayload,
        session_id: SessionId,
        started: Instant,
    ) -> Envelope {
        let (Some(provider), Some(user_reader), Some(property_reader)) = (
            &self.model_provider,
            &self.user_reader,
            &self.property_reader,
        ) else {
            return self.gate_out(request, session_id, started).await;
        };

        let user = match &request.requester {
            Some(user_id) => match user_reader.find_by_id(user_id).await {
                Ok(user) => user,
                Err(err) => {
                    tracing::warn!(user_id = %user_id, error = %err, "could not fetch user for recommendations");
                    None
                }
            },
            None => None,
        };

        let Some(user) = user else {
            return Envelope::failure("User not found", elapsed_ms(started), session_id);
        };

        let preferences = user.preferences.merged_with(&payload.overrides);
        let filter = PropertyFilter::from_preferences(&preferences);

        let candidates = match property_reader.search(&filter, CANDIDATE_POOL_LIMIT).await {
            Ok(candidates) => candidates,
            Err(err) => {
                return self
                    .fail_with_record(
                        request,
                        InteractionKind::Recommendation,
                        session_id,
                        started,
                        err.to_string(),
                    )
                    .await;
            }
        };

        let prompt = recommendation_prompt(&candidates, &preferences, request.language);
        let completion = CompletionRequest::new(
            &self.chat_model,
            RECOMMENDATION_TEMPERATURE,
            RECOMMENDATION_MAX_TOKENS,
        )
        .with_message(ChatMessage::system(recommendation_system_prompt()))
        .with_message(ChatMessage::user(prompt));

        match provider.complete(completion).await {
            Ok(response) => {
                let ranked = parse_recommendations(&response.content, &candidates);
                let elapsed = elapsed_ms(started);

                let record = AiInteractionRecord::new(InteractionKind::Recommendation, session_id)
                    .with_user(request.requester)
                    .with_input(InteractionInput {
                        query: None,
                        language: request.language,
                        context: Some(json!({ "preferences": preferences })),
                    })
                    .with_client(request.client.clone())
                    .with_model_info(self.model_info(
                        &self.chat_model,
                        provider.provider_name(),
                        RECOMMENDATION_TEMPERATURE,
                        RECOMMENDATION_MAX_TOKENS,
                    ))
                    .with_response(ResponseData {
                        content: serde_json::to_string(&ranked).unwrap_or_default(),
                        confidence: None,
                        processing_time_ms: elapsed,
                        token_usage: Some(TokenUsage::total_only(response.usage.total_tokens)),
                    });
                self.interactions.log(&record).await;

                Envelope::success(
                    CapabilityReply::Recommendations(RecommendationReply {
                        recommendations: ranked,
                        total_candidates: candidates.len(),
                    }),
                    elapsed,
                    session_id,
                )
            }
            Err(err) => {
                self.fail_with_record(
                    request,
                    InteractionKind::Recommendation,
                    session_id,
                    started,
                    err.to_string(),
                )
                .await
            }
        }
    }

    async fn predict_price(
        &self,
        request: &CapabilityRequest,
        payload: &PredictPricePayload,
        session_id: SessionId,
        started: Instant,
    ) -> Envelope {
        let Some(provider) = &self.model_provider else {
            return self.gate_out(request, session_id, started).await;
        };

        // No property store just means no comparables to cite.
        let comparables = match &self.property_reader {
            Some(reader) => {
                match reader.find_similar_sold(&payload.attributes, COMPARABLE_LIMIT).await {
                    Ok(comparables) => comparables,
                    Err(err) => {
                        return self
                            .fail_with_record(
                                request,
                                InteractionKind::PricePrediction,
                                session_id,
                                started,
                                err.to_string(),
                            )
                            .await;
                    }
                }
            }
            None => Vec::new(),
        };

        let prompt = price_prediction_prompt(
            &payload.attributes,
            &comparables,
            payload.market_data.as_ref(),
            request.language,
        );
        let completion =
            CompletionRequest::new(&self.chat_model, PRICE_TEMPERATURE, PRICE_MAX_TOKENS)
                .with_message(ChatMessage::system(price_prediction_system_prompt()))
                .with_message(ChatMessage::user(prompt));

        match provider.complete(completion).await {
            Ok(response) => {
                let prediction = parse_price_prediction(&response.content);
                let elapsed = elapsed_ms(started);

                let record = AiInteractionRecord::new(InteractionKind::PricePrediction, session_id)
                    .with_user(request.requester)
                    .with_input(self.input_for(request))
                    .with_client(request.client.clone())
                    .with_model_info(self.model_info(
                        &self.chat_model,
                        provider.provider_name(),
                        PRICE_TEMPERATURE,
                        PRICE_MAX_TOKENS,
                    ))
                    .with_response(ResponseData {
                        content: serde_json::to_string(&prediction).unwrap_or_default(),
                        confidence: Some(prediction.confidence as f32),
                        processing_time_ms: elapsed,
                        token_usage: Some(TokenUsage::total_only(response.usage.total_tokens)),
                    });
                self.interactions.log(&record).await;

                Envelope::success(
                    CapabilityReply::PricePrediction(prediction),
                    elapsed,
                    session_id,
                )
            }
            Err(err) => {
                self.fail_with_record(
                    request,
                    InteractionKind::PricePrediction,
                    session_id,
                    started,
                    err.to_string(),
                )
                .await
            }
        }
    }

    async fn market_analysis(
        &self,
        request: &CapabilityRequest,
        payload: &MarketAnalysisPayload,
        session_id: SessionId,
        started: Instant,
    ) -> Envelope {
        let Some(provider) = &self.model_provider else {
            return self.gate_out(request, session_id, started).await;
        };

        let timeframe = MarketTimeframe::from_token(&payload.timeframe);

        // No property store just means zero-count statistics.
        let stats = match &self.property_reader {
            Some(reader) => {
                match reader
                    .market_stats(&payload.location, payload.property_type, timeframe)
                    .await
                {
                    Ok(stats) => stats,
                    Err(err) => {
                        return self
                            .fail_with_record(
                                request,
                                InteractionKind::MarketAnalysis,
                                session_id,
                                started,
                                err.to_string(),
                            )
                            .await;
                    }
                }
            }
            None => MarketStats::empty(),
        };

        let prompt = market_analysis_prompt(
            &payload.location,
            payload.property_type,
            &stats,
            timeframe,
            request.language,
        );
        let completion =
            CompletionRequest::new(&self.chat_model, MARKET_TEMPERATURE, MARKET_MAX_TOKENS)
                .with_message(ChatMessage::system(market_analysis_system_prompt()))
                .with_message(ChatMessage::user(prompt));

        match provider.complete(completion).await {
            Ok(response) => {
                let analysis = parse_market_analysis(&response.content, stats.total_sales);
                let elapsed = elapsed_ms(started);

                let record = AiInteractionRecord::new(InteractionKind::MarketAnalysis, session_id)
                    .with_user(request.requester)
                    .with_input(self.input_for(request))
                    .with_client(request.client.clone())
                    .with_model_info(self.model_info(
                        &self.chat_model,
                        provider.provider_name(),
                        MARKET_TEMPERATURE,
                        MARKET_MAX_TOKENS,
                    ))
                    .with_response(ResponseData {
                        content: serde_json::to_string(&analysis).unwrap_or_default(),
                        confidence: None,
                        processing_time_ms: elapsed,
                        token_usage: Some(TokenUsage::total_only(response.usage.total_tokens)),
                    });
                self.interactions.log(&record).await;

                Envelope::success(
                    CapabilityReply::MarketAnalysis(analysis),
                    elapsed,
                    session_id,
                )
            }
            Err(err) => {
                self.fail_with_record(
                    request,
                    InteractionKind::MarketAnalysis,
                    session_id,
                    started,
                    err.to_string(),
                )
                .await
            }
        }
    }

    async fn translate(
        &self,
        request: &CapabilityRequest,
        payload: &TranslatePayload,
        session_id: SessionId,
        started: Instant,
    ) -> Envelope {
        let Some(provider) = &self.translation_provider else {
            return self.gate_out(request, session_id, started).await;
        };

        // "auto" and absence both mean provider-side detection.
        let source = payload
            .source_language
            .as_deref()
            .filter(|s| !s.is_empty() && *s != "auto");

        let mut record = IntegrationLogRecord::new(
            ServiceDescriptor::named(ServiceName::GoogleTranslate).with_method("POST"),
            ActionDescriptor {
                kind: ActionType::TranslateText,
                description: None,
            },
        )
        .with_user(request.requester)
        .with_request_payload(json!({
            "text": payload.text,
            "target_language": payload.target_language,
            "source_language": source,
        }));

        match provider
            .translate(&payload.text, payload.target_language, source)
            .await
        {
            Ok(translation) => {
                let elapsed = elapsed_ms(started);
                record.record_success(json!({ "translation": translation.translated_text }));
                record.update_performance_metrics(elapsed, 0);
                self.integrations.log(&record).await;

                Envelope::success(
                    CapabilityReply::Translation(TranslationReply {
                        translated_text: translation.translated_text,
                        source_language: translation
                            .detected_source
                            .or_else(|| source.map(str::to_string)),
                        target_language: payload.target_language,
                    }),
                    elapsed,
                    session_id,
                )
            }
            Err(err) => {
                tracing::error!(error = %err, "translation failed");
                let elapsed = elapsed_ms(started);
                record.mark_as_error(err.to_string(), None);
                record.update_performance_metrics(elapsed, 0);
                self.integrations.log(&record).await;

                Envelope::degraded(
                    err.to_string(),
                    apology(request.language),
                    elapsed,
                    session_id,
                )
            }
        }
    }

    async fn analyze_image(
        &self,
        request: &CapabilityRequest,
        payload: &AnalyzeImagePayload,
        session_id: SessionId,
        started: Instant,
    ) -> Envelope {
        let Some(provider) = &self.model_provider else {
            return self.gate_out(request, session_id, started).await;
        };

        let prompt = image_analysis_prompt(payload.analysis_type, request.language);
        let completion =
            CompletionRequest::new(&self.vision_model, IMAGE_TEMPERATURE, IMAGE_MAX_TOKENS)
                .with_message(ChatMessage::user_with_image(prompt, &payload.image_url));

        match provider.complete(completion).await {
            Ok(response) => {
                let analysis = parse_image_analysis(&response.content);
                let elapsed = elapsed_ms(started);

                let record = AiInteractionRecord::new(InteractionKind::ImageAnalysis, session_id)
                    .with_user(request.requester)
                    .with_input(self.input_for(request))
                    .with_client(request.client.clone())
                    .with_model_info(self.model_info(
                        &self.vision_model,
                        provider.provider_name(),
                        IMAGE_TEMPERATURE,
                        IMAGE_MAX_TOKENS,
                    ))
                    .with_response(ResponseData {
                        content: serde_json::to_string(&analysis).unwrap_or_default(),
                        confidence: None,
                        processing_time_ms: elapsed,
                        token_usage: Some(TokenUsage::total_only(response.usage.total_tokens)),
                    });
                self.interactions.log(&record).await;

                Envelope::success(
                    CapabilityReply::ImageAnalysis(analysis),
                    elapsed,
                    session_id,
                )
            }
            Err(err) => {
                self.fail_with_record(
                    request,
                    InteractionKind::ImageAnalysis,
                    session_id,
                    started,
                    err.to_string(),
                )
                .await
            }
        }
    }

    // ==== Shared paths ====

    /// Short-circuits a capability whose dependencies are unavailable.
    ///
    /// No provider call is made. A gated-out interaction record (with
    /// `error.occurred = false` and no response) is persisted only when
    /// the interaction store is wired and the requester is known.
    async fn gate_out(
        &self,
        request: &CapabilityRequest,
        session_id: SessionId,
        started: Instant,
    ) -> Envelope {
        let kind = request.kind();
        let error = unavailable_message(kind);
        tracing::warn!(capability = ?kind, "capability gated out: dependency unavailable");

        if let Some(interaction_kind) = interaction_kind_of(kind) {
            if self.interactions.is_available() && request.requester.is_some() {
                let record = AiInteractionRecord::new(interaction_kind, session_id)
                    .with_user(request.requester)
                    .with_input(self.input_for(request))
                    .with_client(request.client.clone());
                self.interactions.log(&record).await;
            }
        }

        Envelope::degraded(
            error,
            apology(request.language),
            elapsed_ms(started),
            session_id,
        )
    }

    /// Uniform provider/store failure path: one error record, one degraded
    /// envelope with the localized apology.
    async fn fail_with_record(
        &self,
        request: &CapabilityRequest,
        kind: InteractionKind,
        session_id: SessionId,
        started: Instant,
        error: String,
    ) -> Envelope {
        tracing::error!(capability = kind.as_str(), error = %error, "capability invocation failed");

        let record = AiInteractionRecord::new(kind, session_id)
            .with_user(request.requester)
            .with_input(self.input_for(request))
            .with_client(request.client.clone())
            .with_failure(error.clone(), None);
        self.interactions.log(&record).await;

        Envelope::degraded(
            error,
            apology(request.language),
            elapsed_ms(started),
            session_id,
        )
    }

    fn model_info(
        &self,
        model: &str,
        provider: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> ModelInfo {
        ModelInfo {
            model_name: model.to_string(),
            provider: provider.to_string(),
            temperature: Some(temperature),
            max_tokens: Some(max_tokens),
        }
    }

    /// Input block for the interaction record, per payload shape.
    fn input_for(&self, request: &CapabilityRequest) -> InteractionInput {
        let (query, context) = match &request.payload {
            CapabilityPayload::Chat(p) => (Some(p.query.clone()), p.context.clone()),
            CapabilityPayload::Recommend(p) => {
                (None, Some(json!({ "overrides": p.overrides })))
            }
            CapabilityPayload::PredictPrice(p) => (
                None,
                Some(json!({
                    "attributes": p.attributes,
                    "market_data": p.market_data,
                })),
            ),
            CapabilityPayload::MarketAnalysis(p) => (
                None,
                Some(json!({
                    "location": p.location,
                    "property_type": p.property_type,
                    "timeframe": p.timeframe,
                })),
            ),
            CapabilityPayload::Translate(_) => (None, None),
            CapabilityPayload::AnalyzeImage(p) => (
                None,
                Some(json!({
                    "image_url": p.image_url,
                    "analysis_type": p.analysis_type,
                })),
            ),
        };

        InteractionInput {
            query,
            language: request.language,
            context,
        }
    }
}

/// Operator-facing message for a gated-out capability.
fn unavailable_message(kind: CapabilityKind) -> &'static str {
    match kind {
        CapabilityKind::Translate => "Translation service not available",
        CapabilityKind::Recommend => "AI service or entity store not available",
        _ => "AI service not available",
    }
}

/// Interaction-record kind for a capability; translation is traced as an
/// integration call instead.
fn interaction_kind_of(kind: CapabilityKind) -> Option<InteractionKind> {
    match kind {
        CapabilityKind::Chat => Some(InteractionKind::Chatbot),
        CapabilityKind::Recommend => Some(InteractionKind::Recommendation),
        CapabilityKind::PredictPrice => Some(InteractionKind::PricePrediction),
        CapabilityKind::MarketAnalysis => Some(InteractionKind::MarketAnalysis),
        CapabilityKind::AnalyzeImage => Some(InteractionKind::ImageAnalysis),
        CapabilityKind::Translate => None,
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::adapters::ai::MockModelProvider;
    use crate::adapters::memory::{
        InMemoryIntegrationStore, InMemoryInteractionStore, InMemoryPropertyReader,
        InMemoryUserReader,
    };
    use crate::adapters::translation::MockTranslationProvider;
    use crate::domain::foundation::{Language, PropertyId, UserId};
    use crate::domain::gateway::ImageAnalysisType;
    use crate::domain::integration::ResponseStatus;
    use crate::domain::listing::{PropertyAttributes, PropertySummary, PropertyType};
    use crate::domain::user::{PropertyPreferences, UserProfile, UserRole};
    use crate::ports::{MessageContent, ModelError};

    fn listing(views: u64) -> PropertySummary {
        PropertySummary {
            id: PropertyId::new(),
            project_id: None,
            property_type: PropertyType::Apartment,
            total_price: 250_000.0,
            price_per_sqm: 3_000.0,
            total_area_sqm: 83.0,
            bedrooms: 2,
            bathrooms: 1,
            location: "Lisbon".to_string(),
            features: vec!["balcony".to_string()],
            total_views: views,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn gated_chat_returns_localized_fallback() {
        let gateway = AiGateway::builder().build();
        let request = CapabilityRequest::chat("¿Cuántas propiedades hay en el proyecto X?")
            .with_language(Language::Es);

        let envelope = gateway.invoke(request).await;

        assert!(!envelope.success);
        assert_eq!(envelope.fallback.as_deref(), Some(apology(Language::Es)));
        assert_eq!(envelope.error.as_deref(), Some("AI service not available"));
        assert!(envelope.payload.is_none());
    }

    #[tokio::test]
    async fn gated_chat_makes_no_provider_call() {
        // Model provider missing entirely; translation wired to prove the
        // gate is per-capability.
        let translator = MockTranslationProvider::new();
        let gateway = AiGateway::builder()
            .with_translation_provider(Arc::new(translator.clone()))
            .build();

        let envelope = gateway.invoke(CapabilityRequest::chat("hello")).await;
        assert!(!envelope.success);
        assert!(translator.calls().is_empty());
    }

    #[tokio::test]
    async fn gated_chat_with_known_requester_logs_clean_record() {
        let store = Arc::new(InMemoryInteractionStore::new());
        let gateway = AiGateway::builder()
            .with_interaction_store(store.clone())
            .build();

        let request = CapabilityRequest::chat("hi").with_requester(UserId::new());
        let envelope = gateway.invoke(request).await;

        assert!(!envelope.success);
        assert_eq!(store.record_count(), 1);
        let record = &store.records()[0];
        assert!(!record.error.occurred);
        assert!(record.response.is_none());
        assert_eq!(record.kind, InteractionKind::Chatbot);
    }

    #[tokio::test]
    async fn gated_chat_without_requester_logs_nothing() {
        let store = Arc::new(InMemoryInteractionStore::new());
        let gateway = AiGateway::builder()
            .with_interaction_store(store.clone())
            .build();

        gateway.invoke(CapabilityRequest::chat("hi")).await;
        assert_eq!(store.record_count(), 0);
    }

    #[tokio::test]
    async fn chat_success_persists_usage_and_returns_content() {
        let provider = MockModelProvider::new()
            .with_response_full("There are 12 listed villas.", TokenUsage::new(40, 25));
        let store = Arc::new(InMemoryInteractionStore::new());
        let gateway = AiGateway::builder()
            .with_model_provider(Arc::new(provider.clone()))
            .with_interaction_store(store.clone())
            .build();

        let request = CapabilityRequest::chat("How many villas are listed?")
            .with_requester(UserId::new());
        let envelope = gateway.invoke(request).await;

        assert!(envelope.success);
        match envelope.payload {
            Some(CapabilityReply::Chat(reply)) => {
                assert_eq!(reply.content, "There are 12 listed villas.");
                assert_eq!(reply.token_usage.unwrap().total_tokens, 65);
            }
            other => panic!("expected chat reply, got {:?}", other),
        }

        assert_eq!(store.record_count(), 1);
        let record = &store.records()[0];
        assert!(!record.error.occurred);
        let usage = record.response.as_ref().unwrap().token_usage.unwrap();
        assert_eq!(usage.prompt_tokens, 40);
        assert_eq!(usage.completion_tokens, 25);
    }

    #[tokio::test]
    async fn chat_uses_role_persona_in_system_prompt() {
        let provider = MockModelProvider::new().with_response("ok");
        let user_id = UserId::new();
        let reader = InMemoryUserReader::new()
            .with_user(UserProfile::new(user_id, UserRole::Agent));
        let gateway = AiGateway::builder()
            .with_model_provider(Arc::new(provider.clone()))
            .with_user_reader(Arc::new(reader))
            .build();

        gateway
            .invoke(CapabilityRequest::chat("hola").with_requester(user_id).with_language(Language::Es))
            .await;

        let calls = provider.calls();
        assert_eq!(calls.len(), 1);
        match &calls[0].messages[0].content {
            MessageContent::Text(system) => {
                assert!(system.contains("real estate agents"));
                assert!(system.ends_with("Always respond in es."));
            }
            other => panic!("expected text system message, got {:?}", other),
        }
        assert_eq!(calls[0].temperature, CHAT_TEMPERATURE);
        assert_eq!(calls[0].max_tokens, CHAT_MAX_TOKENS);
        assert_eq!(calls[0].presence_penalty, Some(CHAT_PRESENCE_PENALTY));
    }

    #[tokio::test]
    async fn chat_survives_user_store_failure() {
        let provider = MockModelProvider::new().with_response("ok");
        let gateway = AiGateway::builder()
            .with_model_provider(Arc::new(provider.clone()))
            .with_user_reader(Arc::new(InMemoryUserReader::failing()))
            .build();

        let envelope = gateway
            .invoke(CapabilityRequest::chat("hi").with_requester(UserId::new()))
            .await;

        // Falls back to the default persona rather than failing the call.
        assert!(envelope.success);
    }

    #[tokio::test]
    async fn chat_provider_failure_persists_exactly_one_error_record() {
        let provider = MockModelProvider::new().with_error(ModelError::RateLimited);
        let store = Arc::new(InMemoryInteractionStore::new());
        let gateway = AiGateway::builder()
            .with_model_provider(Arc::new(provider))
            .with_interaction_store(store.clone())
            .build();

        let envelope = gateway
            .invoke(CapabilityRequest::chat("hi").with_language(Language::Ru))
            .await;

        assert!(!envelope.success);
        assert_eq!(envelope.fallback.as_deref(), Some(apology(Language::Ru)));
        assert_eq!(store.record_count(), 1);
        let record = &store.records()[0];
        assert!(record.error.occurred);
        assert!(!record.error.message.as_deref().unwrap_or_default().is_empty());
    }

    #[tokio::test]
    async fn recommend_unknown_user_fails_before_provider_call() {
        let provider = MockModelProvider::new();
        let store = Arc::new(InMemoryInteractionStore::new());
        let gateway = AiGateway::builder()
            .with_model_provider(Arc::new(provider.clone()))
            .with_user_reader(Arc::new(InMemoryUserReader::new()))
            .with_property_reader(Arc::new(InMemoryPropertyReader::new()))
            .with_interaction_store(store.clone())
            .build();

        let request = CapabilityRequest::new(CapabilityPayload::Recommend(
            RecommendPayload::default(),
        ))
        .with_requester(UserId::new());
        let envelope = gateway.invoke(request).await;

        assert!(!envelope.success);
        assert_eq!(envelope.error.as_deref(), Some("User not found"));
        assert!(envelope.fallback.is_none());
        assert_eq!(provider.call_count(), 0);
        assert_eq!(store.record_count(), 0);
    }

    #[tokio::test]
    async fn recommend_caps_results_at_five() {
        let user_id = UserId::new();
        let mut reader = InMemoryPropertyReader::new();
        for views in 0..20 {
            reader = reader.with_listing(listing(views));
        }

        let gateway = AiGateway::builder()
            .with_model_provider(Arc::new(MockModelProvider::new().with_response("ranking text")))
            .with_user_reader(Arc::new(
                InMemoryUserReader::new().with_user(
                    UserProfile::new(user_id, UserRole::Buyer)
                        .with_preferences(PropertyPreferences::default()),
                ),
            ))
            .with_property_reader(Arc::new(reader))
            .build();

        let request = CapabilityRequest::new(CapabilityPayload::Recommend(
            RecommendPayload::default(),
        ))
        .with_requester(user_id);
        let envelope = gateway.invoke(request).await;

        assert!(envelope.success);
        match envelope.payload {
            Some(CapabilityReply::Recommendations(reply)) => {
                assert_eq!(reply.recommendations.len(), 5);
                assert_eq!(reply.total_candidates, 20);
                assert_eq!(reply.recommendations[0].rank, 1);
            }
            other => panic!("expected recommendations, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn predict_price_parses_monetary_tokens() {
        let provider = MockModelProvider::new().with_response(
            "The estimate is $100,000 with a likely range of $100,000 to $120,000.",
        );
        let gateway = AiGateway::builder()
            .with_model_provider(Arc::new(provider))
            .build();

        let request = CapabilityRequest::new(CapabilityPayload::PredictPrice(PredictPricePayload {
            attributes: PropertyAttributes {
                property_type: PropertyType::Apartment,
                bedrooms: 2,
                bathrooms: 1,
                total_area_sqm: 80.0,
                location: None,
            },
            market_data: None,
        }));
        let envelope = gateway.invoke(request).await;

        assert!(envelope.success);
        match envelope.payload {
            Some(CapabilityReply::PricePrediction(prediction)) => {
                assert_eq!(prediction.estimated_price, 100_000.0);
                assert_eq!(prediction.price_range.min, 100_000.0);
                assert_eq!(prediction.price_range.max, 120_000.0);
            }
            other => panic!("expected price prediction, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn market_analysis_runs_without_requester_and_logs() {
        let store = Arc::new(InMemoryInteractionStore::new());
        let gateway = AiGateway::builder()
            .with_model_provider(Arc::new(
                MockModelProvider::new().with_response("Steady demand across the period."),
            ))
            .with_interaction_store(store.clone())
            .build();

        let request = CapabilityRequest::new(CapabilityPayload::MarketAnalysis(
            MarketAnalysisPayload {
                location: "Porto".to_string(),
                property_type: PropertyType::Villa,
                timeframe: "unrecognized".to_string(),
            },
        ));
        let envelope = gateway.invoke(request).await;

        assert!(envelope.success);
        match envelope.payload {
            Some(CapabilityReply::MarketAnalysis(analysis)) => {
                assert_eq!(analysis.data_points, 0);
                assert!(analysis.summary.starts_with("Steady demand"));
            }
            other => panic!("expected market analysis, got {:?}", other),
        }

        assert_eq!(store.record_count(), 1);
        assert!(store.records()[0].user_id.is_none());
    }

    #[tokio::test]
    async fn translate_success_logs_integration_record() {
        let integration_store = Arc::new(InMemoryIntegrationStore::new());
        let gateway = AiGateway::builder()
            .with_translation_provider(Arc::new(
                MockTranslationProvider::new().with_translation("hola"),
            ))
            .with_integration_store(integration_store.clone())
            .build();

        let envelope = gateway
            .invoke(CapabilityRequest::translate("hello", Language::Es))
            .await;

        assert!(envelope.success);
        match envelope.payload {
            Some(CapabilityReply::Translation(reply)) => {
                assert_eq!(reply.translated_text, "hola");
                assert_eq!(reply.target_language, Language::Es);
            }
            other => panic!("expected translation, got {:?}", other),
        }

        assert_eq!(integration_store.record_count(), 1);
        let record = &integration_store.records()[0];
        assert_eq!(record.response.status, Some(ResponseStatus::Success));
        assert_eq!(record.service.name, ServiceName::GoogleTranslate);
        assert_eq!(record.action.kind, ActionType::TranslateText);
    }

    #[tokio::test]
    async fn translate_failure_logs_error_record_and_falls_back() {
        let integration_store = Arc::new(InMemoryIntegrationStore::new());
        let gateway = AiGateway::builder()
            .with_translation_provider(Arc::new(MockTranslationProvider::new().with_error(
                crate::ports::TranslationError::api(503, "backend unavailable"),
            )))
            .with_integration_store(integration_store.clone())
            .build();

        let envelope = gateway
            .invoke(CapabilityRequest::translate("hello", Language::PtBr).with_language(Language::PtBr))
            .await;

        assert!(!envelope.success);
        assert_eq!(envelope.fallback.as_deref(), Some(apology(Language::PtBr)));

        assert_eq!(integration_store.record_count(), 1);
        let record = &integration_store.records()[0];
        assert_eq!(record.response.status, Some(ResponseStatus::Error));
        assert!(record.error.occurred);
    }

    #[tokio::test]
    async fn image_analysis_uses_vision_model() {
        let provider = MockModelProvider::new().with_response("Bright, well-kept interior.");
        let gateway = AiGateway::builder()
            .with_model_provider(Arc::new(provider.clone()))
            .build();

        let request = CapabilityRequest::new(CapabilityPayload::AnalyzeImage(AnalyzeImagePayload {
            image_url: "https://img.example/42.jpg".to_string(),
            analysis_type: ImageAnalysisType::Quality,
        }));
        let envelope = gateway.invoke(request).await;

        assert!(envelope.success);
        match envelope.payload {
            Some(CapabilityReply::ImageAnalysis(reply)) => {
                assert_eq!(reply.description, "Bright, well-kept interior.");
                assert_eq!(reply.condition, "Good");
                assert!(reply.features.is_empty());
            }
            other => panic!("expected image analysis, got {:?}", other),
        }

        let calls = provider.calls();
        assert_eq!(calls[0].model, "gpt-4-vision");
        match &calls[0].messages[0].content {
            MessageContent::Parts(parts) => assert_eq!(parts.len(), 2),
            other => panic!("expected multimodal parts, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn business_impact_hook_merges_through_store() {
        let store = Arc::new(InMemoryInteractionStore::new());
        let gateway = AiGateway::builder()
            .with_model_provider(Arc::new(MockModelProvider::new().with_response("ok")))
            .with_interaction_store(store.clone())
            .build();

        gateway
            .invoke(CapabilityRequest::chat("hi").with_requester(UserId::new()))
            .await;
        let id = store.records()[0].id;

        gateway
            .record_business_impact(
                &id,
                BusinessImpactUpdate {
                    lead_generated: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        gateway
            .record_business_impact(
                &id,
                BusinessImpactUpdate {
                    booking_made: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        gateway.mark_interaction_helpful(&id, 5, None).await.unwrap();

        let record = &store.records()[0];
        assert!(record.business_impact.lead_generated);
        assert!(record.business_impact.booking_made);
        assert_eq!(record.quality.was_helpful, Some(true));
    }

    #[tokio::test]
    async fn hooks_error_when_store_unwired() {
        let gateway = AiGateway::builder().build();
        let result = gateway
            .record_business_impact(&InteractionId::new(), BusinessImpactUpdate::default())
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn session_id_is_preserved_when_supplied() {
        let session = SessionId::new();
        let gateway = AiGateway::builder()
            .with_model_provider(Arc::new(MockModelProvider::new().with_response("ok")))
            .build();

        let envelope = gateway
            .invoke(CapabilityRequest::chat("hi").with_session(session))
            .await;
        assert_eq!(envelope.session_id, session);
    }
}

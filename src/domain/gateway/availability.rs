//! Process-wide dependency availability, fixed at startup.

use super::CapabilityKind;

/// One flag per external dependency, computed once when the gateway is
/// built and never mutated at request time. A capability is attempted only
/// if every dependency it needs is marked available; otherwise the
/// dispatcher short-circuits to the fallback catalog without any provider
/// call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CapabilityAvailability {
    pub model_provider: bool,
    pub translation_provider: bool,
    pub user_store: bool,
    pub property_store: bool,
    pub interaction_store: bool,
    pub integration_store: bool,
}

impl CapabilityAvailability {
    /// Nothing available; every capability gates out.
    pub fn none() -> Self {
        Self::default()
    }

    /// Marks the model provider available.
    pub fn with_model_provider(mut self) -> Self {
        self.model_provider = true;
        self
    }

    /// Marks the translation provider available.
    pub fn with_translation_provider(mut self) -> Self {
        self.translation_provider = true;
        self
    }

    /// Marks the user store available.
    pub fn with_user_store(mut self) -> Self {
        self.user_store = true;
        self
    }

    /// Marks the property store available.
    pub fn with_property_store(mut self) -> Self {
        self.property_store = true;
        self
    }

    /// Marks the interaction log store available.
    pub fn with_interaction_store(mut self) -> Self {
        self.interaction_store = true;
        self
    }

    /// Marks the integration log store available.
    pub fn with_integration_store(mut self) -> Self {
        self.integration_store = true;
        self
    }

    /// Whether a capability's hard dependencies are all available.
    ///
    /// Price prediction and market analysis treat the property store as an
    /// enrichment: with no store they run against empty comparables and
    /// zero-count statistics rather than gating out.
    pub fn allows(&self, kind: CapabilityKind) -> bool {
        match kind {
            CapabilityKind::Chat => self.model_provider,
            CapabilityKind::Recommend => {
                self.model_provider && self.user_store && self.property_store
            }
            CapabilityKind::PredictPrice => self.model_provider,
            CapabilityKind::MarketAnalysis => self.model_provider,
            CapabilityKind::Translate => self.translation_provider,
            CapabilityKind::AnalyzeImage => self.model_provider,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nothing_available_gates_everything() {
        let availability = CapabilityAvailability::none();
        for kind in [
            CapabilityKind::Chat,
            CapabilityKind::Recommend,
            CapabilityKind::PredictPrice,
            CapabilityKind::MarketAnalysis,
            CapabilityKind::Translate,
            CapabilityKind::AnalyzeImage,
        ] {
            assert!(!availability.allows(kind));
        }
    }

    #[test]
    fn chat_needs_only_the_model_provider() {
        let availability = CapabilityAvailability::none().with_model_provider();
        assert!(availability.allows(CapabilityKind::Chat));
        assert!(availability.allows(CapabilityKind::PredictPrice));
        assert!(!availability.allows(CapabilityKind::Translate));
    }

    #[test]
    fn recommend_needs_both_entity_stores() {
        let availability = CapabilityAvailability::none()
            .with_model_provider()
            .with_property_store();
        assert!(!availability.allows(CapabilityKind::Recommend));

        let availability = availability.with_user_store();
        assert!(availability.allows(CapabilityKind::Recommend));
    }

    #[test]
    fn translate_needs_only_the_translation_provider() {
        let availability = CapabilityAvailability::none().with_translation_provider();
        assert!(availability.allows(CapabilityKind::Translate));
        assert!(!availability.allows(CapabilityKind::Chat));
    }
}

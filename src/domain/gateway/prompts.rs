//! Prompt construction - pure functions of capability, role, language and
//! payload.
//!
//! Language directives are instructions to the model, not guarantees; the
//! gateway never verifies the output language.

use serde_json::json;

use crate::domain::foundation::Language;
use crate::domain::listing::{
    MarketStats, MarketTimeframe, PropertyAttributes, PropertySummary, PropertyType,
    SoldComparable,
};
use crate::domain::user::{PropertyPreferences, UserRole};

use super::ImageAnalysisType;

/// Persona sentence for a CRM role. Unknown callers get the buyer persona.
fn role_persona(role: Option<UserRole>) -> &'static str {
    match role.unwrap_or_default() {
        UserRole::Developer => {
            "You are an AI assistant for real estate developers. Help with project \
             management, sales optimization, and market insights."
        }
        UserRole::Agency => {
            "You are an AI assistant for real estate agencies. Help with client \
             management, property matching, and sales strategies."
        }
        UserRole::Agent => {
            "You are an AI assistant for real estate agents. Help with client \
             communication, property recommendations, and closing deals."
        }
        UserRole::Buyer => {
            "You are an AI assistant for property buyers. Help with property search, \
             market analysis, and investment advice."
        }
        UserRole::Admin => {
            "You are an AI assistant for system administrators. Help with platform \
             management and analytics."
        }
    }
}

/// Appends the respond-in-language directive for non-default languages.
fn language_directive(language: Language) -> String {
    if language.is_default() {
        String::new()
    } else {
        format!(" Always respond in {}.", language.as_tag())
    }
}

/// Role-aware system prompt for the chat capability.
pub fn chat_system_prompt(role: Option<UserRole>, language: Language) -> String {
    format!(
        "{} You have access to comprehensive real estate data and can provide \
         personalized recommendations.{}",
        role_persona(role),
        language_directive(language)
    )
}

/// System prompt for the recommendation capability.
pub fn recommendation_system_prompt() -> &'static str {
    "You are a real estate AI assistant that provides personalized property recommendations."
}

/// User prompt asking the model to rank the candidate set.
pub fn recommendation_prompt(
    candidates: &[PropertySummary],
    preferences: &PropertyPreferences,
    language: Language,
) -> String {
    let candidate_data: Vec<_> = candidates
        .iter()
        .map(|p| {
            json!({
                "id": p.id,
                "type": p.property_type,
                "price": p.total_price,
                "area": p.total_area_sqm,
                "bedrooms": p.bedrooms,
                "bathrooms": p.bathrooms,
                "location": p.location,
                "features": p.features,
            })
        })
        .collect();

    format!(
        "Based on the following user preferences: {} and available properties: {}, \
         provide personalized property recommendations. Rank the top 5 properties \
         and explain why each is a good match. Respond in {}.",
        serde_json::to_string(preferences).unwrap_or_default(),
        serde_json::to_string(&candidate_data).unwrap_or_default(),
        language.as_tag()
    )
}

/// System prompt for the price-prediction capability.
pub fn price_prediction_system_prompt() -> &'static str {
    "You are a real estate price prediction AI that provides accurate market valuations."
}

/// Valuation prompt combining the target, comparables, and market data.
pub fn price_prediction_prompt(
    attributes: &PropertyAttributes,
    comparables: &[SoldComparable],
    market_data: Option<&serde_json::Value>,
    language: Language,
) -> String {
    format!(
        "Predict the market price for this property: {}. \
         Similar properties: {}. \
         Market data: {}. \
         Provide a price range, confidence level, and explanation. Respond in {}.",
        serde_json::to_string(attributes).unwrap_or_default(),
        serde_json::to_string(comparables).unwrap_or_default(),
        market_data
            .map(|v| v.to_string())
            .unwrap_or_else(|| "{}".to_string()),
        language.as_tag()
    )
}

/// System prompt for the market-analysis capability.
pub fn market_analysis_system_prompt() -> &'static str {
    "You are a real estate market analyst providing comprehensive market insights."
}

/// Analysis prompt over aggregated sold-property statistics.
pub fn market_analysis_prompt(
    location: &str,
    property_type: PropertyType,
    stats: &MarketStats,
    timeframe: MarketTimeframe,
    language: Language,
) -> String {
    format!(
        "Analyze the real estate market for {} properties in {} over the last {}. \
         Market data: {}. \
         Provide trends, price analysis, supply/demand insights, and future outlook. \
         Respond in {}.",
        property_type.as_str(),
        location,
        timeframe.as_token(),
        serde_json::to_string(stats).unwrap_or_default(),
        language.as_tag()
    )
}

/// Analysis-type-specific instruction for property images.
pub fn image_analysis_prompt(analysis_type: ImageAnalysisType, language: Language) -> String {
    let instruction = match analysis_type {
        ImageAnalysisType::General => {
            "Analyze this property image and describe the features, condition, and overall appeal."
        }
        ImageAnalysisType::Damage => {
            "Analyze this property image for any visible damage, maintenance issues, or repairs needed."
        }
        ImageAnalysisType::Features => {
            "Identify and list all visible features and amenities in this property image."
        }
        ImageAnalysisType::Quality => {
            "Assess the quality and condition of this property based on the image."
        }
    };

    format!(
        "{} Provide a detailed analysis in {}.",
        instruction,
        language.as_tag()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_prompt_defaults_to_buyer_persona() {
        let prompt = chat_system_prompt(None, Language::En);
        assert!(prompt.contains("property buyers"));
        assert!(!prompt.contains("Always respond in"));
    }

    #[test]
    fn chat_prompt_uses_role_persona() {
        let prompt = chat_system_prompt(Some(UserRole::Agent), Language::En);
        assert!(prompt.contains("real estate agents"));
    }

    #[test]
    fn non_default_language_adds_directive() {
        let prompt = chat_system_prompt(Some(UserRole::Developer), Language::Es);
        assert!(prompt.ends_with("Always respond in es."));

        let prompt = chat_system_prompt(None, Language::PtBr);
        assert!(prompt.ends_with("Always respond in pt-BR."));
    }

    #[test]
    fn recommendation_prompt_embeds_candidates() {
        let prompt = recommendation_prompt(&[], &PropertyPreferences::default(), Language::En);
        assert!(prompt.contains("Rank the top 5 properties"));
        assert!(prompt.contains("Respond in en."));
    }

    #[test]
    fn image_prompt_varies_by_analysis_type() {
        let general = image_analysis_prompt(ImageAnalysisType::General, Language::En);
        let damage = image_analysis_prompt(ImageAnalysisType::Damage, Language::En);
        assert_ne!(general, damage);
        assert!(damage.contains("visible damage"));
    }

    #[test]
    fn market_prompt_names_type_location_and_window() {
        let prompt = market_analysis_prompt(
            "Lisbon",
            PropertyType::Apartment,
            &MarketStats::empty(),
            MarketTimeframe::Months12,
            Language::Ru,
        );
        assert!(prompt.contains("apartment properties in Lisbon"));
        assert!(prompt.contains("12months"));
        assert!(prompt.ends_with("Respond in ru."));
    }
}

//! Best-effort structured extraction from free-text model output.
//!
//! Parsing never fails: when nothing usable is found the result degrades
//! to zeros, empty lists, or placeholder strings. The extraction is
//! heuristic and approximate by design; the full raw text is retained
//! wherever a caller might need to re-read it.

use rand::Rng;

use crate::domain::listing::PropertySummary;

use super::{
    ImageAnalysisReply, MarketAnalysisReply, PricePrediction, PriceRange, RankedProperty,
};

/// Fixed confidence attached to every price prediction. The model is asked
/// for a confidence level but free text gives no reliable way to read one
/// back.
pub const DEFAULT_PRICE_CONFIDENCE: f64 = 0.85;

/// Maximum ranked recommendations returned per request.
const MAX_RECOMMENDATIONS: usize = 5;

/// Character prefix of the raw text used as the market-analysis summary.
const SUMMARY_PREFIX_CHARS: usize = 200;

/// Scans text for currency-like numeric tokens: a digit run with optional
/// thousands groups and an optional two-digit decimal part, optionally
/// prefixed with `$`. Returns the parsed values in order of appearance.
fn scan_monetary_tokens(text: &str) -> Vec<f64> {
    let bytes = text.as_bytes();
    let mut values = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        if !bytes[i].is_ascii_digit() {
            i += 1;
            continue;
        }

        let mut cleaned = String::new();
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            cleaned.push(bytes[i] as char);
            i += 1;
        }

        // Thousands groups: a comma followed by three digits, greedily.
        while i + 3 < bytes.len()
            && bytes[i] == b','
            && bytes[i + 1].is_ascii_digit()
            && bytes[i + 2].is_ascii_digit()
            && bytes[i + 3].is_ascii_digit()
        {
            cleaned.push(bytes[i + 1] as char);
            cleaned.push(bytes[i + 2] as char);
            cleaned.push(bytes[i + 3] as char);
            i += 4;
        }

        // Decimal part: a dot followed by two digits.
        if i + 2 < bytes.len()
            && bytes[i] == b'.'
            && bytes[i + 1].is_ascii_digit()
            && bytes[i + 2].is_ascii_digit()
        {
            cleaned.push('.');
            cleaned.push(bytes[i + 1] as char);
            cleaned.push(bytes[i + 2] as char);
            i += 3;
        }

        if let Ok(value) = cleaned.parse::<f64>() {
            values.push(value);
        }
    }

    values
}

/// Extracts a price estimate from the model's valuation text.
///
/// The first monetary token is the point estimate; the min/max of all
/// tokens form the range. With no tokens every numeric field is zero.
pub fn parse_price_prediction(text: &str) -> PricePrediction {
    let prices = scan_monetary_tokens(text);

    let estimated_price = prices.first().copied().unwrap_or(0.0);
    let price_range = if prices.is_empty() {
        PriceRange::default()
    } else {
        PriceRange {
            min: prices.iter().copied().fold(f64::INFINITY, f64::min),
            max: prices.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        }
    };

    PricePrediction {
        estimated_price,
        price_range,
        confidence: DEFAULT_PRICE_CONFIDENCE,
        explanation: text.to_string(),
    }
}

/// Shapes the market-analysis reply from raw model text.
///
/// Only the summary is derived from the text (a fixed-length prefix); the
/// trend, price-analysis, and outlook fields are static placeholders, with
/// the full text retained alongside.
pub fn parse_market_analysis(text: &str, data_points: u64) -> MarketAnalysisReply {
    MarketAnalysisReply {
        summary: text.chars().take(SUMMARY_PREFIX_CHARS).collect(),
        trend: "Positive growth trend observed".to_string(),
        price_analysis: "Prices have increased by 5-10% over the period".to_string(),
        outlook: "Market shows strong fundamentals".to_string(),
        full_analysis: text.to_string(),
        data_points,
    }
}

/// Ranks recommendations from the fetched candidate pool.
///
/// The model's ranking text is not consumed: the top candidates keep their
/// fetch order and receive a synthetic match score and a templated
/// explanation.
// TODO: parse the model's actual ranking once the provider emits a
// schema-constrained response.
pub fn parse_recommendations(
    _model_ranking: &str,
    candidates: &[PropertySummary],
) -> Vec<RankedProperty> {
    let mut rng = rand::thread_rng();

    candidates
        .iter()
        .take(MAX_RECOMMENDATIONS)
        .enumerate()
        .map(|(index, property)| {
            let compatibility = rng.gen_range(70..100);
            RankedProperty {
                property: property.clone(),
                rank: index as u32 + 1,
                match_score: rng.gen_range(0.7..1.0),
                explanation: format!(
                    "Property matches your preferences with {}% compatibility",
                    compatibility
                ),
            }
        })
        .collect()
}

/// Wraps image-analysis text. Description carries the raw text; features
/// stay empty, condition is fixed, and the score is synthetic.
pub fn parse_image_analysis(text: &str) -> ImageAnalysisReply {
    let mut rng = rand::thread_rng();
    ImageAnalysisReply {
        description: text.to_string(),
        features: Vec::new(),
        condition: "Good".to_string(),
        score: rng.gen_range(0.7..1.0),
    }
}

use crate::config::ProviderConfig;
use crate::summarizer::error::GenerationError;
use crate::summarizer::generator::{GeminiGenerator, TextGenerator};
use crate::summarizer::prose::describe;
use crate::types::field::Field;
use crate::types::readings::{
    AirQualityReading, EconomicIndicator, EnvironmentProfileStats, VegetationIndexSummary,
    WeatherReading,
};
use log::{debug, warn};
use std::collections::BTreeMap;
use std::fmt::Write;
use std::sync::Arc;

/// Narrative returned whenever no model output can be obtained.
pub const FALLBACK_NARRATIVE: &str = "AI model is not available.";

/// Everything the narrative is written from. Unavailable fields are passed
/// through so the model can mention the gap.
#[derive(Debug, Clone, Copy)]
pub struct SummaryContext<'a> {
    pub city_display_name: &'a str,
    pub weather: &'a Field<WeatherReading>,
    pub air_quality: &'a Field<AirQualityReading>,
    pub vegetation: &'a Field<VegetationIndexSummary>,
    pub environment_profile: &'a Field<EnvironmentProfileStats>,
    pub indicators: &'a BTreeMap<String, Field<EconomicIndicator>>,
}

/// Wraps a [`TextGenerator`] so that summarizing never fails.
#[derive(Clone, Default)]
pub struct Summarizer {
    generator: Option<Arc<dyn TextGenerator>>,
}

impl Summarizer {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator: Some(generator),
        }
    }

    /// A summarizer that always answers with [`FALLBACK_NARRATIVE`].
    pub fn disabled() -> Self {
        Self { generator: None }
    }

    /// Uses Gemini when a key is configured, otherwise [`Summarizer::disabled`].
    pub fn from_config(config: &ProviderConfig) -> Result<Self, GenerationError> {
        Ok(match GeminiGenerator::from_config(config)? {
            Some(generator) => Self::new(Arc::new(generator)),
            None => Self::disabled(),
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.generator.is_some()
    }

    /// Writes a short expert narrative for `context`.
    ///
    /// Returns [`FALLBACK_NARRATIVE`] if no generator is configured or the
    /// generator fails; the failure is logged, never returned.
    pub async fn summarize(&self, context: &SummaryContext<'_>) -> String {
        let Some(generator) = &self.generator else {
            debug!("No text generator configured, using fallback narrative");
            return FALLBACK_NARRATIVE.to_string();
        };

        match generator.generate(&build_prompt(context)).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Narrative generation for {} failed: {}", context.city_display_name, e);
                FALLBACK_NARRATIVE.to_string()
            }
        }
    }
}

/// Lists every input, placeholders included, under a numbered heading.
pub fn build_context(context: &SummaryContext<'_>) -> String {
    let mut block = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(block, "**1. Real-time Weather:** {}", describe(context.weather));
    let _ = writeln!(block, "**2. Real-time Air Quality:** {}", describe(context.air_quality));
    let _ = writeln!(block, "**3. Satellite Vegetation Index:** {}", describe(context.vegetation));
    let _ = writeln!(
        block,
        "**4. Natural Environment Profile:** {}",
        describe(context.environment_profile)
    );
    if !context.indicators.is_empty() {
        let _ = writeln!(block, "**5. Economic Indicators (national):**");
        for (label, field) in context.indicators {
            let _ = writeln!(block, "- {}: {}", label, describe(field));
        }
    }
    block
}

pub fn build_prompt(context: &SummaryContext<'_>) -> String {
    format!(
        "You are a top urban environmental expert.\n\
         \n\
         **Instructions:**\n\
         - Based on the provided 'Context' information, describe the current environmental situation of {city}.\n\
         - Write a concise expert summary of 3-5 sentences focusing on the key points.\n\
         - No preamble: get straight to the point without introductions or extra explanations.\n\
         - If some data is not available, say so briefly instead of guessing.\n\
         \n\
         **Context for {city}:**\n\
         {context}",
        city = context.city_display_name,
        context = build_context(context),
    )
}

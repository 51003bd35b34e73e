mod gemini;
pub(crate) mod parsing;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::InsightsSettings;

/// AI-generated content suggestions for a document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentInsights {
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub hashtags: Vec<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(default)]
    pub tone: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
}

/// Client for generating content insights.
///
/// Constructed disabled when no API key is configured; `generate` then
/// short-circuits to empty insights without a network call. Provider
/// failures also degrade to empty insights so extraction results are
/// never lost to a flaky upstream.
pub struct InsightsClient {
    provider: Option<gemini::GeminiProvider>,
}

impl InsightsClient {
    pub fn new(settings: &InsightsSettings) -> Self {
        let provider = match gemini::GeminiProvider::new(&settings.api_key, &settings.model) {
            Ok(provider) => Some(provider),
            Err(_) => {
                info!("No Gemini API key configured, content insights disabled");
                None
            }
        };
        Self { provider }
    }

    pub fn is_enabled(&self) -> bool {
        self.provider.is_some()
    }

    /// Generate insights for the given text. Best-effort: any failure
    /// returns empty insights.
    pub async fn generate(&self, text: &str) -> ContentInsights {
        let Some(provider) = &self.provider else {
            return ContentInsights::default();
        };

        match provider.generate_insights(text).await {
            Ok(insights) => insights,
            Err(e) => {
                warn!("Content insight generation failed: {e:#}");
                ContentInsights::default()
            }
        }
    }
}

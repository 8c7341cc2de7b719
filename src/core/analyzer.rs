use std::sync::Arc;

use crate::core::prompts::analysis_prompt;
use crate::services::{LanguageModel, LlmError};

/// Produces the narrative land-use analysis shown above the map
pub struct NarrativeAnalyzer {
    model: Arc<dyn LanguageModel>,
}

impl NarrativeAnalyzer {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    /// One round-trip to the model; the text is returned as-is
    pub async fn analyze(&self, query: &str) -> Result<String, LlmError> {
        let text = self.model.complete(&analysis_prompt(query)).await?;
        tracing::debug!("Received {} chars of analysis from {}", text.len(), self.model.model_name());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct RecordingModel {
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl LanguageModel for RecordingModel {
        async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok("## Summary\n- Built-up area grew".to_string())
        }

        fn model_name(&self) -> &str {
            "recording"
        }
    }

    #[tokio::test]
    async fn test_analysis_returned_verbatim() {
        let model = Arc::new(RecordingModel { prompts: Mutex::new(Vec::new()) });
        let analyzer = NarrativeAnalyzer::new(model.clone());

        let text = analyzer.analyze("Hyderabad 2015-2023").await.unwrap();

        assert_eq!(text, "## Summary\n- Built-up area grew");
        let prompts = model.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Hyderabad 2015-2023"));
    }
}

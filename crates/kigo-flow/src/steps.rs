//! Pipeline steps
//!
//! Each step is a transform over [`PipelineState`]: it reads the fields its
//! predecessors filled in and writes its own. Steps never truncate
//! `messages`.

use kigo_core::ChatMessage;
use kigo_llm::CompletionService;

use crate::error::FlowResult;
use crate::state::PipelineState;

/// Step 1: pick a word for the haiku from the conversation so far.
pub async fn find_word(
    state: &mut PipelineState,
    completion: &dyn CompletionService,
) -> FlowResult<()> {
    let prompt = format!(
        "Based on the following message history, suggest an appropriate and \
         interesting word that could be used in a haiku: \"{}\"\n\
         Respond with only the word, No Haiku, No additional text.",
        state.joined_contents()
    );

    let word = completion.complete(&prompt).await?;
    state.suggested_word = Some(word.trim().to_string());
    Ok(())
}

/// Step 2: generate the haiku from the conversation and the chosen word.
pub async fn create_haiku(
    state: &mut PipelineState,
    completion: &dyn CompletionService,
) -> FlowResult<()> {
    let suggested_word = state.suggested_word.as_deref().unwrap_or_default();
    let prompt = format!(
        "For given messages, create a haiku.\n\
         Messages: {}\n\
         Include the word chosen by the user.\n\
         Also include the word: {}\n\
         Respond with only the haiku, no additional text.",
        state.joined_contents(),
        suggested_word
    );

    let haiku = completion.complete(&prompt).await?;
    state.haiku = Some(haiku.trim().to_string());
    Ok(())
}

/// Step 3: wrap the haiku into the final AI-authored message.
///
/// Pure: no completion call. Appends to `messages` and sets `result`.
pub fn format_response(state: &mut PipelineState) {
    let word = state.suggested_word.as_deref().unwrap_or_default();
    let haiku = state.haiku.as_deref().unwrap_or_default();
    let formatted = format!("I've chosen the word \"{word}\" for your haiku. Here it is:\n\n{haiku}");
    state.messages.push(ChatMessage::ai(formatted.clone()));
    state.result = Some(formatted);
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use kigo_llm::{CompletionError, Result as LlmResult};
    use std::sync::Mutex;

    /// Records prompts and replays scripted responses.
    struct StaticCompletion {
        responses: Mutex<Vec<LlmResult<String>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl StaticCompletion {
        fn new(responses: Vec<LlmResult<String>>) -> Self {
            Self {
                responses: Mutex::new(responses),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl CompletionService for StaticCompletion {
        async fn complete(&self, prompt: &str) -> LlmResult<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            let mut responses = self.responses.lock().unwrap();
            if responses.is_empty() {
                return Err(CompletionError::Network("no scripted response".into()));
            }
            responses.remove(0)
        }
    }

    #[tokio::test]
    async fn find_word_trims_and_stores_the_word() {
        let completion = StaticCompletion::new(vec![Ok("  autumn \n".to_string())]);
        let mut state = PipelineState::default();
        state.messages.push(ChatMessage::human("cat"));

        find_word(&mut state, &completion).await.unwrap();
        assert_eq!(state.suggested_word.as_deref(), Some("autumn"));

        let prompts = completion.prompts.lock().unwrap();
        assert!(prompts[0].contains("cat"));
        assert!(prompts[0].contains("Respond with only the word"));
    }

    #[tokio::test]
    async fn create_haiku_prompt_includes_history_and_word() {
        let completion = StaticCompletion::new(vec![Ok("soft paws in moonlight".to_string())]);
        let mut state = PipelineState::default();
        state.messages.push(ChatMessage::human("cat"));
        state.messages.push(ChatMessage::ai("previous reply"));
        state.suggested_word = Some("moonlight".to_string());

        create_haiku(&mut state, &completion).await.unwrap();
        assert_eq!(state.haiku.as_deref(), Some("soft paws in moonlight"));

        let prompts = completion.prompts.lock().unwrap();
        assert!(prompts[0].contains("cat\nprevious reply"));
        assert!(prompts[0].contains("Also include the word: moonlight"));
    }

    #[test]
    fn format_response_appends_without_truncating() {
        let mut state = PipelineState {
            messages: vec![ChatMessage::human("cat")],
            suggested_word: Some("moonlight".to_string()),
            haiku: Some("soft paws in moonlight".to_string()),
            result: None,
        };

        format_response(&mut state);

        assert_eq!(state.messages.len(), 2);
        assert_eq!(state.messages[0].content, "cat");
        let last = state.messages.last().unwrap();
        assert!(last.content.contains("\"moonlight\""));
        assert!(last.content.contains("soft paws in moonlight"));
        assert_eq!(state.result.as_deref(), Some(last.content.as_str()));
    }
}

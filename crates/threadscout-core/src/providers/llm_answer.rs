//! Provider answering from the LLM's own knowledge

use crate::config::ResolvedProvider;
use crate::error::Result;
use crate::llm::templates::LLM_SEARCH_TEMPLATE;
use crate::llm::{ChatMessage, ChatOptions, LLMClient, TemplateStore};
use crate::models::{EvidenceItem, Question};
use crate::providers::SearchProvider;
use async_trait::async_trait;
use std::sync::Arc;

/// Title of the single evidence item this provider returns
pub const LLM_ANSWER_TITLE: &str = "LLM internal answer";

/// Wraps one chat completion as a single evidence item
pub struct LlmAnswerProvider {
    id: String,
    display_name: String,
    source_tag: String,
    client: Arc<dyn LLMClient>,
    system_prompt: String,
    model: Option<String>,
}

impl LlmAnswerProvider {
    /// Create with the default identity (`ollama_search`, source `llm:ollama`)
    pub fn new(client: Arc<dyn LLMClient>, templates: &TemplateStore) -> Result<Self> {
        Ok(Self {
            id: "ollama_search".to_string(),
            display_name: "Ollama (internal answer)".to_string(),
            source_tag: "llm:ollama".to_string(),
            client,
            system_prompt: templates.load(LLM_SEARCH_TEMPLATE)?,
            model: None,
        })
    }

    /// Create from a catalog entry; the source tag is `llm:<kind>`
    pub fn from_resolved(
        provider: &ResolvedProvider,
        client: Arc<dyn LLMClient>,
        templates: &TemplateStore,
    ) -> Result<Self> {
        let mut this = Self::new(client, templates)?;
        this.id = provider.id.clone();
        this.display_name = provider.friendly_name.clone();
        this.source_tag = format!("llm:{}", provider.kind);
        this.model = provider.model.clone();
        Ok(this)
    }

    pub fn source_tag(&self) -> &str {
        &self.source_tag
    }
}

#[async_trait]
impl SearchProvider for LlmAnswerProvider {
    fn provider_id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.display_name
    }

    async fn search(&self, question: &Question, keyword_query: &str) -> Result<Vec<EvidenceItem>> {
        let user_content = format!(
            "Title: {}\nBody: {}\n\nKeyword queries:\n{}\n\n\
             Answer this question as best as you can based on your own knowledge.",
            question.title,
            question.body_text(),
            keyword_query
        );

        let messages = vec![
            ChatMessage::system(self.system_prompt.clone()),
            ChatMessage::user(user_content),
        ];
        let options = ChatOptions::default().with_model(self.model.clone());

        let answer = self.client.chat_completion(messages, &options).await?;

        Ok(vec![EvidenceItem::new(self.source_tag.clone(), answer)
            .with_title(Some(LLM_ANSWER_TITLE.to_string()))])
    }
}

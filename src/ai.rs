use crate::constants::system_instruction;
use crate::error::AIError;
use crate::message::PlayerIdentity;
use crate::narrative::compose_player_message;
use crate::settings::Settings;
use async_openai::{
    Client,
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs, CreateImageRequestArgs, Image, ImageModel,
        ImageResponseFormat, ImageSize,
    },
};
use std::future::Future;
use tokio::sync::Mutex;
use tokio::time::{Duration, timeout};

const VALIDATION_TIMEOUT: Duration = Duration::from_secs(30);
const NARRATIVE_TIMEOUT: Duration = Duration::from_secs(300);
const IMAGE_TIMEOUT: Duration = Duration::from_secs(120);

/// The external generators a story session talks to.
///
/// Both calls are awaited to completion; there is no way to abort one once sent.
pub trait StoryService: Send + Sync {
    /// Continues the narrative with one player's prompt. `is_final_turn` asks for a conclusion.
    fn generate_story_segment(
        &self,
        player: PlayerIdentity,
        prompt: &str,
        is_final_turn: bool,
    ) -> impl Future<Output = Result<String, AIError>> + Send;

    /// Renders an illustration and returns a displayable reference (a data URI or a URL).
    fn generate_image(&self, prompt: &str) -> impl Future<Output = Result<String, AIError>> + Send;
}

// Story generation backed by the OpenAI chat and image endpoints.
pub struct GameAI {
    client: Client<OpenAIConfig>,
    text_model: String,
    image_model: String,
    // Running chat history, system instruction first. The generator sees the whole story.
    conversation: Mutex<Vec<ChatCompletionRequestMessage>>,
}

impl std::fmt::Debug for GameAI {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameAI")
            .field("text_model", &self.text_model)
            .field("image_model", &self.image_model)
            .finish_non_exhaustive()
    }
}

impl GameAI {
    // One-time setup: checks the key against the API and opens the conversation.
    pub async fn init(settings: &Settings) -> Result<Self, AIError> {
        let api_key = settings.resolve_api_key()?;
        let client = Client::with_config(OpenAIConfig::new().with_api_key(api_key));

        timeout(VALIDATION_TIMEOUT, client.models().list()).await??;
        log::info!("OpenAI key validated, text model {}", settings.text_model);

        let system_message = ChatCompletionRequestSystemMessageArgs::default()
            .content(system_instruction())
            .build()?;

        Ok(Self {
            client,
            text_model: settings.text_model.clone(),
            image_model: settings.image_model.clone(),
            conversation: Mutex::new(vec![system_message.into()]),
        })
    }

    fn image_model(&self) -> ImageModel {
        match self.image_model.as_str() {
            "dall-e-2" => ImageModel::DallE2,
            "dall-e-3" => ImageModel::DallE3,
            other => ImageModel::Other(other.to_string()),
        }
    }
}

impl StoryService for GameAI {
    async fn generate_story_segment(
        &self,
        player: PlayerIdentity,
        prompt: &str,
        is_final_turn: bool,
    ) -> Result<String, AIError> {
        let content = compose_player_message(player, prompt, is_final_turn);
        let user_message = ChatCompletionRequestUserMessageArgs::default()
            .content(content)
            .build()?;

        // Held for the whole exchange so turns reach the chat in order.
        let mut conversation = self.conversation.lock().await;
        let mut messages = conversation.clone();
        messages.push(user_message.into());

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.text_model)
            .messages(messages.clone())
            .build()?;

        let response = timeout(NARRATIVE_TIMEOUT, self.client.chat().create(request)).await??;
        let text = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or(AIError::NoContent)?;

        let assistant_message = ChatCompletionRequestAssistantMessageArgs::default()
            .content(text.clone())
            .build()?;
        messages.push(assistant_message.into());
        // A failed exchange never reaches this point, so the history only holds answered turns.
        *conversation = messages;

        log::debug!("{player} narrative received ({} chars)", text.len());
        Ok(text)
    }

    async fn generate_image(&self, prompt: &str) -> Result<String, AIError> {
        let request = CreateImageRequestArgs::default()
            .prompt(prompt)
            .model(self.image_model())
            .n(1)
            .response_format(ImageResponseFormat::B64Json)
            .size(ImageSize::S1024x1024)
            .build()?;

        let response = timeout(IMAGE_TIMEOUT, self.client.images().create(request)).await??;
        let image = response.data.first().ok_or(AIError::NoImage)?;

        match image.as_ref() {
            Image::B64Json { b64_json, .. } if !b64_json.is_empty() => {
                Ok(format!("data:image/png;base64,{b64_json}"))
            }
            Image::Url { url, .. } if !url.is_empty() => Ok(url.clone()),
            _ => Err(AIError::NoImage),
        }
    }
}

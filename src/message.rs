// src/message.rs

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use strum_macros::Display;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum PlayerIdentity {
    #[strum(to_string = "Player A")]
    A,
    #[strum(to_string = "Player B")]
    B,
}

impl PlayerIdentity {
    pub fn other(self) -> Self {
        match self {
            PlayerIdentity::A => PlayerIdentity::B,
            PlayerIdentity::B => PlayerIdentity::A,
        }
    }

    pub fn input_source(self) -> MessageSource {
        match self {
            PlayerIdentity::A => MessageSource::PlayerAInput,
            PlayerIdentity::B => MessageSource::PlayerBInput,
        }
    }
}

// Closed set of story item origins. Never changes once an item exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum MessageSource {
    #[strum(to_string = "Player A Input")]
    PlayerAInput,
    #[strum(to_string = "Player B Input")]
    PlayerBInput,
    #[strum(to_string = "AI Narrative")]
    AiNarrative,
    #[strum(to_string = "AI Image")]
    AiImage,
}

/// One unit of story history: a player prompt, a narrative segment or an illustration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryItem {
    pub id: Uuid,
    pub source: MessageSource,
    pub text: Option<String>,
    pub image_url: Option<String>,
    // Kept so a failed or unwanted image can be regenerated from the identical prompt.
    pub image_retry_prompt: Option<String>,
    pub timestamp: DateTime<Local>,
    pub player_identity: Option<PlayerIdentity>,
}

impl StoryItem {
    fn new(source: MessageSource) -> Self {
        StoryItem {
            id: Uuid::new_v4(),
            source,
            text: None,
            image_url: None,
            image_retry_prompt: None,
            timestamp: Local::now(),
            player_identity: None,
        }
    }

    pub fn player_input(player: PlayerIdentity, text: impl Into<String>) -> Self {
        StoryItem {
            text: Some(text.into()),
            player_identity: Some(player),
            ..Self::new(player.input_source())
        }
    }

    pub fn narrative(text: impl Into<String>) -> Self {
        StoryItem {
            text: Some(text.into()),
            ..Self::new(MessageSource::AiNarrative)
        }
    }

    pub fn image(url: impl Into<String>, prompt: impl Into<String>) -> Self {
        StoryItem {
            image_url: Some(url.into()),
            image_retry_prompt: Some(prompt.into()),
            ..Self::new(MessageSource::AiImage)
        }
    }

    pub fn text_or_empty(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }
}

/// Append-only, ordered story history. Insertion order is narrative order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoryLog {
    items: Vec<StoryItem>,
}

impl StoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, mut item: StoryItem) -> Uuid {
        // Keep timestamps non-decreasing even if the wall clock steps back.
        if let Some(last) = self.items.last() {
            if item.timestamp < last.timestamp {
                item.timestamp = last.timestamp;
            }
        }
        let id = item.id;
        self.items.push(item);
        id
    }

    pub fn get(&self, id: Uuid) -> Option<&StoryItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn position(&self, id: Uuid) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &StoryItem> {
        self.items.iter()
    }

    pub fn items(&self) -> &[StoryItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn last_n(&self, n: usize) -> &[StoryItem] {
        &self.items[self.items.len().saturating_sub(n)..]
    }

    pub fn for_player(&self, player: PlayerIdentity) -> impl Iterator<Item = &StoryItem> {
        self.items
            .iter()
            .filter(move |item| item.player_identity == Some(player))
    }

    pub fn latest_image(&self) -> Option<&StoryItem> {
        self.items
            .iter()
            .rev()
            .find(|item| item.source == MessageSource::AiImage)
    }

    /// Steps through the illustrations in story order, wrapping at both ends.
    ///
    /// `from` is the currently selected image; `None` (or an id that is not an image) counts as
    /// the latest one.
    pub fn step_image(&self, from: Option<Uuid>, forward: bool) -> Option<Uuid> {
        let images: Vec<Uuid> = self
            .items
            .iter()
            .filter(|item| item.source == MessageSource::AiImage)
            .map(|item| item.id)
            .collect();
        let last = images.len().checked_sub(1)?;
        let current = from
            .and_then(|id| images.iter().position(|image| *image == id))
            .unwrap_or(last);
        let next = match (forward, current == last, current == 0) {
            (true, true, _) => 0,
            (true, false, _) => current + 1,
            (false, _, true) => last,
            (false, _, false) => current - 1,
        };
        Some(images[next])
    }

    // The only in-place mutation: a retried image keeps its id, timestamp and position.
    pub fn replace_image(&mut self, id: Uuid, url: String, prompt: String) -> bool {
        match self.items.iter_mut().find(|item| item.id == id) {
            Some(item) => {
                item.image_url = Some(url);
                item.image_retry_prompt = Some(prompt);
                true
            }
            None => false,
        }
    }
}

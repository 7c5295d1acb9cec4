// src/illustration/context.rs

use crate::constants::{
    CONTEXT_ITEM_CHARS, CONTEXT_ITEM_COUNT, CONTEXT_SUMMARY_CHARS, FOCUS_SCENE_CHARS,
};
use crate::message::{MessageSource, PlayerIdentity, StoryItem, StoryLog};
use crate::utils::{char_len, truncate_chars};

/// The two variable parts of an image prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneContext {
    pub focus_scene: String,
    pub context_summary: String,
}

impl SceneContext {
    // `history` is the story as it stood before the current turn, oldest first.
    pub fn build(history: &StoryLog, narrative: &str) -> Self {
        SceneContext {
            focus_scene: truncate_chars(narrative, FOCUS_SCENE_CHARS).to_string(),
            context_summary: summarize_context(history),
        }
    }
}

pub fn summarize_context(history: &StoryLog) -> String {
    let digest = history
        .last_n(CONTEXT_ITEM_COUNT)
        .iter()
        .filter_map(context_line)
        .collect::<Vec<_>>()
        .join("\n");
    truncate_chars(&digest, CONTEXT_SUMMARY_CHARS).to_string()
}

// Image records have no label and are left out of the digest.
fn context_line(item: &StoryItem) -> Option<String> {
    let prefix = match (item.source, item.player_identity) {
        (MessageSource::PlayerAInput, Some(PlayerIdentity::A)) => "Player A prompted: ",
        (MessageSource::PlayerBInput, Some(PlayerIdentity::B)) => "Player B prompted: ",
        (MessageSource::AiNarrative, _) => "Previously, the AI narrated: ",
        _ => return None,
    };
    let text = item.text_or_empty();
    let ellipsis = if char_len(text) > CONTEXT_ITEM_CHARS {
        "..."
    } else {
        ""
    };
    Some(format!(
        "{prefix}{}{ellipsis}",
        truncate_chars(text, CONTEXT_ITEM_CHARS)
    ))
}

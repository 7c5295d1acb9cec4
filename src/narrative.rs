// src/narrative.rs

use crate::constants::{AI_IMAGE_PROMPT_TAG, TOTAL_MAX_TURNS};
use crate::message::PlayerIdentity;

// Removes the illustration marker from a narrative segment.
// Returns the cleaned text and whether the marker was there. Text without the marker is untouched.
pub fn strip_image_tag(raw: &str) -> (String, bool) {
    if raw.contains(AI_IMAGE_PROMPT_TAG) {
        (raw.replace(AI_IMAGE_PROMPT_TAG, "").trim().to_string(), true)
    } else {
        (raw.to_string(), false)
    }
}

// Outgoing chat message for one player submission.
pub fn compose_player_message(player: PlayerIdentity, prompt: &str, is_final_turn: bool) -> String {
    let mut content = format!("{player}: {prompt}");
    if is_final_turn {
        content.push_str(&format!(
            "\n\n[SYSTEM NOTE: This is the final turn of the story ({TOTAL_MAX_TURNS} total player turns). \
Please provide a satisfying concluding paragraph based on the entire story so far.]"
        ));
    }
    content
}

// src/constants.rs

// Turn limits. The story ends once both players together reach TOTAL_MAX_TURNS.
pub const MAX_PLAYER_TURNS_EACH: u32 = 25;
pub const TOTAL_MAX_TURNS: u32 = MAX_PLAYER_TURNS_EACH * 2;

// Player turns (total, both players) without an illustration before one is forced.
pub const IMAGE_GENERATION_INTERVAL: u32 = 3;
// Max characters for the image generation prompt.
pub const MAX_IMAGE_PROMPT_LENGTH: usize = 800;

// Context window for the image prompt.
pub const FOCUS_SCENE_CHARS: usize = 350;
pub const CONTEXT_ITEM_COUNT: usize = 5;
pub const CONTEXT_ITEM_CHARS: usize = 100;
pub const CONTEXT_SUMMARY_CHARS: usize = 400;

pub const AI_IMAGE_PROMPT_TAG: &str = "[IMAGE_WORTHY_SCENE]";

pub const DEFAULT_TEXT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_IMAGE_MODEL: &str = "dall-e-3";

// System prompt for the narrative chat, sent once when the conversation is created.
pub fn system_instruction() -> String {
    format!(
        "You are a master storyteller. Players will provide alternating inputs as 'Player A' and 'Player B'. \
Your role is to weave these inputs into a single, cohesive, and engaging narrative. \
Expand on their ideas with vivid descriptions, character reactions, and plot developments.
If a scene you describe is particularly vivid and an image would enhance it, include the exact tag \
{AI_IMAGE_PROMPT_TAG} in your narrative text. Do not add any other commentary around this tag.
The story will conclude after {TOTAL_MAX_TURNS} total player turns. \
On the {TOTAL_MAX_TURNS}th turn, provide a satisfying concluding paragraph.
Your responses should be one or two paragraphs long, but can be longer or shorter if the prompt necessitates. \
Maintain a consistent tone and style suitable for an unfolding story.
Do not directly refer to the players. Maintain the illusion of an ongoing story as if reading from a book."
    )
}

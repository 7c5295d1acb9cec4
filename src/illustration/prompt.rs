// src/illustration/prompt.rs

use super::SceneContext;
use crate::constants::MAX_IMAGE_PROMPT_LENGTH;
use crate::utils::{char_len, truncate_chars};

const ELLIPSIS: &str = "...";
const SCENE_INTRO: &str = "Illustrate this pivotal scene from an ongoing story: \"";
const CONTEXT_HEADING: &str =
    "\"\nThis scene occurs after the following recent story developments:\n";
const STYLE_INSTRUCTION: &str = "Desired artistic style: cinematic, vivid, detailed, slightly painterly. \
Ensure the image is safe for all audiences.";

/// Builds the image prompt and keeps it within `MAX_IMAGE_PROMPT_LENGTH` characters.
///
/// Over budget, the context summary is cut first. If the scene alone does not leave room for
/// any context, the context is dropped and the focus scene is cut instead. A final hard cut
/// catches whatever still overflows.
pub fn build_image_prompt(scene: &SceneContext) -> String {
    let SceneContext {
        focus_scene,
        context_summary,
    } = scene;
    let full = format!(
        "{SCENE_INTRO}{focus_scene}{CONTEXT_HEADING}{context_summary}\n{STYLE_INSTRUCTION}"
    );
    if char_len(&full) <= MAX_IMAGE_PROMPT_LENGTH {
        return full;
    }

    let style_block = format!("\n{STYLE_INSTRUCTION}");
    let focus_scene_part = format!("{SCENE_INTRO}{focus_scene}{CONTEXT_HEADING}");
    let budget =
        MAX_IMAGE_PROMPT_LENGTH as i64 - char_len(ELLIPSIS) as i64 - char_len(&style_block) as i64;

    let available = budget - char_len(&focus_scene_part) as i64;
    let prompt = if available >= 0 {
        let available = available as usize;
        let ellipsis = if char_len(context_summary) > available {
            ELLIPSIS
        } else {
            ""
        };
        format!(
            "{focus_scene_part}{}{ellipsis}{style_block}",
            truncate_chars(context_summary, available)
        )
    } else {
        // The empty scene wrapper: `Illustrate this pivotal scene from an ongoing story: ""`.
        let wrapper_len = char_len(SCENE_INTRO) as i64 + 1;
        let available = (budget - wrapper_len).max(0) as usize;
        format!(
            "{SCENE_INTRO}{}\"{ELLIPSIS}{style_block}",
            truncate_chars(focus_scene, available)
        )
    };

    if char_len(&prompt) > MAX_IMAGE_PROMPT_LENGTH {
        log::warn!("Image prompt still over budget after truncation, cutting hard");
        let keep = MAX_IMAGE_PROMPT_LENGTH - char_len(ELLIPSIS);
        return format!("{}{ELLIPSIS}", truncate_chars(&prompt, keep));
    }
    prompt
}

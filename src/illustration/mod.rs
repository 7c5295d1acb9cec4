// src/illustration/mod.rs

mod context;
mod prompt;
mod trigger;

pub use context::{SceneContext, summarize_context};
pub use prompt::build_image_prompt;
pub use trigger::ImageTrigger;

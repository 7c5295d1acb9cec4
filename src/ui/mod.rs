// ui/mod.rs

mod constants;
mod draw;
mod player;
pub mod spinner;
mod story;

pub use draw::{MIN_HEIGHT, MIN_WIDTH, center_rect, draw};
pub use story::{bottom_scroll, story_lines};

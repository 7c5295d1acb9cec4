pub mod ai;
pub mod app;
pub mod constants;
pub mod error;
pub mod illustration;
pub mod logging;
pub mod message;
pub mod narrative;
pub mod session;
pub mod settings;
pub mod tui;
pub mod turns;
pub mod ui;
pub mod utils;

// Re-export commonly used items for easier access
pub use ai::{GameAI, StoryService};
pub use error::{AIError, AppError};
pub use illustration::{ImageTrigger, SceneContext, build_image_prompt, summarize_context};
pub use message::{MessageSource, PlayerIdentity, StoryItem, StoryLog};
pub use narrative::{compose_player_message, strip_image_tag};
pub use session::{
    ImageOutcome, ImagePlan, InFlight, InitState, NarrativeOutcome, NarrativeSegment, StorySession,
    TurnOutcome, TurnPlan,
};
pub use settings::Settings;
pub use turns::{TurnState, is_final_turn};

// src/session.rs

use crate::ai::StoryService;
use crate::illustration::{ImageTrigger, SceneContext, build_image_prompt};
use crate::message::{PlayerIdentity, StoryItem, StoryLog};
use crate::narrative::strip_image_tag;
use crate::turns::{TurnState, is_final_turn};
use uuid::Uuid;

/// The single generation slot. At most one turn or image retry runs at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InFlight {
    Turn(PlayerIdentity),
    ImageRetry(Uuid),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitState {
    Pending,
    Ready,
    // Fatal for the session: nothing can be generated until a restart.
    Failed(String),
}

/// Everything `run_narrative` needs, captured when the submission is accepted.
#[derive(Debug, Clone)]
pub struct TurnPlan {
    pub player: PlayerIdentity,
    pub prompt: String,
    pub total_after_turn: u32,
    pub is_final_turn: bool,
    // Story as it stood before this player's input was appended.
    pub history: StoryLog,
    pub last_image_at_total_turn: u32,
    pub image_generation_enabled: bool,
}

#[derive(Debug, Clone)]
pub struct NarrativeSegment {
    pub text: String,
    pub tag_present: bool,
    // Set when this turn should be illustrated.
    pub image_prompt: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NarrativeOutcome {
    pub player: PlayerIdentity,
    pub total_after_turn: u32,
    pub result: Result<NarrativeSegment, String>,
}

/// The illustration step of a turn whose narrative is already in the story.
#[derive(Debug, Clone)]
pub struct ImagePlan {
    pub player: PlayerIdentity,
    pub total_after_turn: u32,
    pub prompt: String,
}

#[derive(Debug, Clone)]
pub struct ImageOutcome {
    pub player: PlayerIdentity,
    pub total_after_turn: u32,
    pub prompt: String,
    pub result: Result<String, String>,
}

/// Both steps of a turn, as reported by `StorySession::submit`.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub player: PlayerIdentity,
    pub total_after_turn: u32,
    pub narrative: Result<NarrativeSegment, String>,
    pub image: Option<ImageOutcome>,
}

#[derive(Debug, Clone)]
pub struct RetryPlan {
    pub item_id: Uuid,
    pub prompt: String,
}

#[derive(Debug, Clone)]
pub struct RetryOutcome {
    pub item_id: Uuid,
    pub prompt: String,
    pub result: Result<String, String>,
}

/// Read-only view for headers and status lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionStatus {
    pub player_a_turns: u32,
    pub player_b_turns: u32,
    pub total_turns: u32,
    pub is_game_over: bool,
    pub active_player: PlayerIdentity,
    pub busy: bool,
}

#[derive(Debug)]
pub struct StorySession {
    story: StoryLog,
    turns: TurnState,
    active_player: PlayerIdentity,
    image_generation_enabled: bool,
    init: InitState,
    error: Option<String>,
    in_flight: Option<InFlight>,
}

impl Default for StorySession {
    fn default() -> Self {
        Self::new(false)
    }
}

impl StorySession {
    pub fn new(image_generation_enabled: bool) -> Self {
        Self {
            story: StoryLog::new(),
            turns: TurnState::new(),
            active_player: PlayerIdentity::A,
            image_generation_enabled,
            init: InitState::Pending,
            error: None,
            in_flight: None,
        }
    }

    pub fn mark_initialized(&mut self) {
        log::info!("Story session ready");
        self.init = InitState::Ready;
    }

    pub fn init_failed(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::error!("AI service initialization failed: {message}");
        self.error = Some(message.clone());
        self.init = InitState::Failed(message);
    }

    pub fn init_state(&self) -> &InitState {
        &self.init
    }

    pub fn is_initialized(&self) -> bool {
        self.init == InitState::Ready
    }

    pub fn story(&self) -> &StoryLog {
        &self.story
    }

    pub fn turns(&self) -> &TurnState {
        &self.turns
    }

    pub fn active_player(&self) -> PlayerIdentity {
        self.active_player
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        if self.is_initialized() {
            self.error = None;
        }
    }

    pub fn in_flight(&self) -> Option<InFlight> {
        self.in_flight
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn is_game_over(&self) -> bool {
        self.turns.is_game_over()
    }

    pub fn image_generation_enabled(&self) -> bool {
        self.image_generation_enabled
    }

    pub fn set_image_generation(&mut self, enabled: bool) {
        self.image_generation_enabled = enabled;
    }

    // Whether `player`'s input should accept text right now.
    pub fn can_submit(&self, player: PlayerIdentity) -> bool {
        self.is_initialized()
            && !self.is_game_over()
            && !self.is_busy()
            && self.active_player == player
    }

    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            player_a_turns: self.turns.player_a_turns,
            player_b_turns: self.turns.player_b_turns,
            total_turns: self.turns.total(),
            is_game_over: self.is_game_over(),
            active_player: self.active_player,
            busy: self.is_busy(),
        }
    }

    /// Accepts a submission, or returns `None` when it must be ignored.
    ///
    /// The player's input and the turn count are committed here, before the narrative is known.
    pub fn begin_turn(&mut self, player: PlayerIdentity, prompt: &str) -> Option<TurnPlan> {
        let prompt = prompt.trim();
        if !self.can_submit(player) || prompt.is_empty() {
            log::debug!("Ignored submission from {player}");
            return None;
        }

        self.in_flight = Some(InFlight::Turn(player));
        self.error = None;
        let history = self.story.clone();
        self.story.push(StoryItem::player_input(player, prompt));
        let total_after_turn = self.turns.record_turn(player);
        log::info!("{player} submitted turn {total_after_turn}");

        Some(TurnPlan {
            player,
            prompt: prompt.to_string(),
            total_after_turn,
            is_final_turn: is_final_turn(total_after_turn),
            history,
            last_image_at_total_turn: self.turns.last_image_at_total_turn,
            image_generation_enabled: self.image_generation_enabled,
        })
    }

    /// Appends the narrative as soon as it arrives.
    ///
    /// Returns the image step when the turn is to be illustrated; the generation slot stays
    /// taken until `finish_image`. Otherwise the turn ends here.
    pub fn finish_narrative(&mut self, outcome: NarrativeOutcome) -> Option<ImagePlan> {
        let segment = match outcome.result {
            Ok(segment) => segment,
            Err(message) => {
                // The turn stays counted and the same player keeps the floor.
                self.in_flight = None;
                self.error = Some(format!("AI story generation failed: {message}"));
                return None;
            }
        };

        self.story.push(StoryItem::narrative(segment.text));
        match segment.image_prompt {
            Some(prompt) => Some(ImagePlan {
                player: outcome.player,
                total_after_turn: outcome.total_after_turn,
                prompt,
            }),
            None => {
                self.end_turn(outcome.player);
                None
            }
        }
    }

    pub fn finish_image(&mut self, outcome: ImageOutcome) {
        match outcome.result {
            Ok(url) => {
                self.story.push(StoryItem::image(url, outcome.prompt));
                self.turns.mark_image_generated(outcome.total_after_turn);
            }
            Err(message) => {
                log::warn!("Failed image prompt: {}", outcome.prompt);
                self.error = Some(format!("Image generation failed: {message}"));
            }
        }
        self.end_turn(outcome.player);
    }

    fn end_turn(&mut self, player: PlayerIdentity) {
        self.in_flight = None;
        self.active_player = player.other();
        if self.is_game_over() {
            log::info!("Story concluded after {} turns", self.turns.total());
        }
    }

    pub fn begin_retry(&mut self, item_id: Uuid) -> Option<RetryPlan> {
        if !self.is_initialized() || self.is_busy() {
            return None;
        }
        let Some(prompt) = self
            .story
            .get(item_id)
            .and_then(|item| item.image_retry_prompt.clone())
            .filter(|prompt| !prompt.is_empty())
        else {
            log::warn!("Retry image called with no prompt for item: {item_id}");
            return None;
        };

        self.in_flight = Some(InFlight::ImageRetry(item_id));
        self.error = None;
        Some(RetryPlan { item_id, prompt })
    }

    pub fn finish_retry(&mut self, outcome: RetryOutcome) {
        self.in_flight = None;
        match outcome.result {
            Ok(url) => {
                self.story.replace_image(outcome.item_id, url, outcome.prompt);
            }
            Err(message) => {
                log::warn!("Failed image retry prompt: {}", outcome.prompt);
                self.error = Some(format!("Image retry failed: {message}"));
            }
        }
    }

    /// Runs a whole turn in place. `None` when the submission was ignored.
    pub async fn submit<S: StoryService>(
        &mut self,
        service: &S,
        player: PlayerIdentity,
        prompt: &str,
    ) -> Option<TurnOutcome> {
        let plan = self.begin_turn(player, prompt)?;
        let narrative = run_narrative(service, plan).await;
        let mut outcome = TurnOutcome {
            player: narrative.player,
            total_after_turn: narrative.total_after_turn,
            narrative: narrative.result.clone(),
            image: None,
        };
        if let Some(image_plan) = self.finish_narrative(narrative) {
            let image = run_image(service, image_plan).await;
            self.finish_image(image.clone());
            outcome.image = Some(image);
        }
        Some(outcome)
    }

    pub async fn retry_image<S: StoryService>(
        &mut self,
        service: &S,
        item_id: Uuid,
    ) -> Option<RetryOutcome> {
        let plan = self.begin_retry(item_id)?;
        let outcome = run_retry(service, plan).await;
        self.finish_retry(outcome.clone());
        Some(outcome)
    }
}

/// Generates the narrative and decides, from the stripped text, whether to illustrate it.
pub async fn run_narrative<S: StoryService>(service: &S, plan: TurnPlan) -> NarrativeOutcome {
    let result = match service
        .generate_story_segment(plan.player, &plan.prompt, plan.is_final_turn)
        .await
    {
        Ok(raw) => {
            let (text, tag_present) = strip_image_tag(&raw);
            let image_prompt = plan_image(&plan, &text, tag_present);
            Ok(NarrativeSegment {
                text,
                tag_present,
                image_prompt,
            })
        }
        Err(e) => {
            log::error!("Story generation failed for {}: {e}", plan.player);
            Err(e.to_string())
        }
    };

    NarrativeOutcome {
        player: plan.player,
        total_after_turn: plan.total_after_turn,
        result,
    }
}

pub async fn run_image<S: StoryService>(service: &S, plan: ImagePlan) -> ImageOutcome {
    let result = service
        .generate_image(&plan.prompt)
        .await
        .map_err(|e| e.to_string());
    ImageOutcome {
        player: plan.player,
        total_after_turn: plan.total_after_turn,
        prompt: plan.prompt,
        result,
    }
}

// The image prompt for this turn, if the turn should be illustrated.
pub fn plan_image(plan: &TurnPlan, narrative: &str, tag_present: bool) -> Option<String> {
    let trigger = ImageTrigger {
        enabled: plan.image_generation_enabled,
        current_total: plan.total_after_turn,
        last_image_at_total_turn: plan.last_image_at_total_turn,
        tag_present,
        is_final_turn: plan.is_final_turn,
    };
    if !trigger.should_generate() {
        return None;
    }
    let scene = SceneContext::build(&plan.history, narrative);
    Some(build_image_prompt(&scene))
}

pub async fn run_retry<S: StoryService>(service: &S, plan: RetryPlan) -> RetryOutcome {
    let result = service
        .generate_image(&plan.prompt)
        .await
        .map_err(|e| e.to_string());
    RetryOutcome {
        item_id: plan.item_id,
        prompt: plan.prompt,
        result,
    }
}

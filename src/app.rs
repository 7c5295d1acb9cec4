// /app.rs
use crate::{
    ai::GameAI,
    error::AIError,
    message::PlayerIdentity,
    session::{self, ImageOutcome, ImagePlan, NarrativeOutcome, RetryOutcome, StorySession},
    settings::Settings,
    tui::{Tui, TuiEvent},
    ui::{self, spinner::Spinner},
};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::style::{Color, Style};
use std::sync::Arc;
use tokio::sync::mpsc;
use tui_textarea::TextArea;
use uuid::Uuid;

pub enum Action {
    Quit,
    Submit,
    ToggleImageGeneration,
    RetryImage,
    SelectPreviousImage,
    SelectNextImage,
    DismissError,
    ScrollUp,
    ScrollDown,
    Type(KeyEvent),
}

// Results of background work, delivered back to the event loop.
pub enum Completion {
    Initialized(Box<Result<GameAI, AIError>>),
    Narrative(NarrativeOutcome),
    Image(ImageOutcome),
    Retry(RetryOutcome),
}

pub struct App {
    running: bool,
    pub settings: Settings,
    pub session: StorySession,
    ai: Option<Arc<GameAI>>,

    pub player_a_input: TextArea<'static>,
    pub player_b_input: TextArea<'static>,

    pub spinner: Spinner,
    // Image targeted by Ctrl+R. `None` follows the latest illustration.
    pub selected_image: Option<Uuid>,
    // Lines scrolled up from the bottom of the story. Zero follows the newest segment.
    pub story_scroll_back: u16,

    completion_sender: mpsc::UnboundedSender<Completion>,
    completion_receiver: mpsc::UnboundedReceiver<Completion>,
}

fn new_input(player: PlayerIdentity) -> TextArea<'static> {
    let mut textarea = TextArea::default();
    textarea.set_placeholder_text(format!("{player}, what happens next?"));
    textarea.set_cursor_line_style(Style::default());
    textarea.set_placeholder_style(Style::default().fg(Color::DarkGray));
    textarea
}

impl App {
    pub fn new(settings: Settings) -> Self {
        let (completion_sender, completion_receiver) = mpsc::unbounded_channel();
        Self {
            running: true,
            session: StorySession::new(settings.image_generation_enabled),
            settings,
            ai: None,
            player_a_input: new_input(PlayerIdentity::A),
            player_b_input: new_input(PlayerIdentity::B),
            spinner: Spinner::new(),
            selected_image: None,
            story_scroll_back: 0,
            completion_sender,
            completion_receiver,
        }
    }

    // Asynchronous function to continuously run and update the application.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?
            .tick_rate(8.0) // 8 ticks per second
            .frame_rate(30.0); // 30 frames per second
        tui.enter()?;
        self.initialize();

        while self.running {
            tokio::select! {
                Some(event) = tui.next() => match event {
                    TuiEvent::Render | TuiEvent::Resize(_, _) | TuiEvent::Init => {
                        tui.draw(|frame| ui::draw(frame, &*self))?;
                    }
                    TuiEvent::Tick => self.spinner.tick(),
                    TuiEvent::Key(key) => {
                        if let Some(action) = self.on_key(key) {
                            self.dispatch(action);
                        }
                    }
                    TuiEvent::Error => log::warn!("Terminal event stream reported an error"),
                },
                Some(completion) = self.completion_receiver.recv() => self.on_completion(completion),
                else => break,
            }
        }

        tui.exit()?;
        Ok(())
    }

    // Kick off the one-time AI setup in the background.
    fn initialize(&mut self) {
        let settings = self.settings.clone();
        let sender = self.completion_sender.clone();
        self.spinner.start();
        tokio::spawn(async move {
            let result = GameAI::init(&settings).await;
            if sender.send(Completion::Initialized(Box::new(result))).is_err() {
                log::error!("App stopped before initialization finished");
            }
        });
    }

    pub fn on_key(&mut self, key: KeyEvent) -> Option<Action> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => Some(Action::Quit),
            KeyCode::Char('c') if ctrl => Some(Action::Quit),
            KeyCode::Char('g') if ctrl => Some(Action::ToggleImageGeneration),
            KeyCode::Char('r') if ctrl => Some(Action::RetryImage),
            KeyCode::Char('p') if ctrl => Some(Action::SelectPreviousImage),
            KeyCode::Char('n') if ctrl => Some(Action::SelectNextImage),
            KeyCode::Char('x') if ctrl => Some(Action::DismissError),
            KeyCode::PageUp => Some(Action::ScrollUp),
            KeyCode::PageDown => Some(Action::ScrollDown),
            KeyCode::Enter if !key.modifiers.contains(KeyModifiers::ALT) => Some(Action::Submit),
            _ => Some(Action::Type(key)),
        }
    }

    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::Submit => self.submit(),
            Action::ToggleImageGeneration => self.toggle_image_generation(),
            Action::RetryImage => self.retry_selected_image(),
            Action::SelectPreviousImage => self.step_image(false),
            Action::SelectNextImage => self.step_image(true),
            Action::DismissError => self.session.clear_error(),
            Action::ScrollUp => self.story_scroll_back = self.story_scroll_back.saturating_add(5),
            Action::ScrollDown => self.story_scroll_back = self.story_scroll_back.saturating_sub(5),
            Action::Type(key) => {
                let player = self.session.active_player();
                if self.session.can_submit(player) {
                    let key = if key.code == KeyCode::Enter {
                        // Alt+Enter inserts a line break.
                        KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)
                    } else {
                        key
                    };
                    self.input_mut(player).input(key);
                }
            }
        }
    }

    pub fn input(&self, player: PlayerIdentity) -> &TextArea<'static> {
        match player {
            PlayerIdentity::A => &self.player_a_input,
            PlayerIdentity::B => &self.player_b_input,
        }
    }

    fn input_mut(&mut self, player: PlayerIdentity) -> &mut TextArea<'static> {
        match player {
            PlayerIdentity::A => &mut self.player_a_input,
            PlayerIdentity::B => &mut self.player_b_input,
        }
    }

    fn submit(&mut self) {
        let Some(ai) = self.ai.clone() else {
            return;
        };
        let player = self.session.active_player();
        let prompt = self.input(player).lines().join("\n");
        let Some(plan) = self.session.begin_turn(player, &prompt) else {
            return;
        };

        *self.input_mut(player) = new_input(player);
        self.selected_image = None;
        self.story_scroll_back = 0;
        self.spinner.start();

        let sender = self.completion_sender.clone();
        tokio::spawn(async move {
            let outcome = session::run_narrative(ai.as_ref(), plan).await;
            if sender.send(Completion::Narrative(outcome)).is_err() {
                log::error!("App stopped before the turn finished");
            }
        });
    }

    fn spawn_image(&self, plan: ImagePlan) {
        let Some(ai) = self.ai.clone() else {
            return;
        };
        let sender = self.completion_sender.clone();
        tokio::spawn(async move {
            let outcome = session::run_image(ai.as_ref(), plan).await;
            if sender.send(Completion::Image(outcome)).is_err() {
                log::error!("App stopped before the illustration finished");
            }
        });
    }

    pub fn retry_target(&self) -> Option<Uuid> {
        self.selected_image
            .or_else(|| self.session.story().latest_image().map(|item| item.id))
    }

    fn step_image(&mut self, forward: bool) {
        if let Some(id) = self.session.story().step_image(self.selected_image, forward) {
            self.selected_image = Some(id);
        }
    }

    fn retry_selected_image(&mut self) {
        let Some(ai) = self.ai.clone() else {
            return;
        };
        let Some(item_id) = self.retry_target() else {
            return;
        };
        let Some(plan) = self.session.begin_retry(item_id) else {
            return;
        };

        self.spinner.start();
        let sender = self.completion_sender.clone();
        tokio::spawn(async move {
            let outcome = session::run_retry(ai.as_ref(), plan).await;
            if sender.send(Completion::Retry(outcome)).is_err() {
                log::error!("App stopped before the image retry finished");
            }
        });
    }

    fn toggle_image_generation(&mut self) {
        let enabled = !self.session.image_generation_enabled();
        self.session.set_image_generation(enabled);
        self.settings.image_generation_enabled = enabled;
        if let Err(e) = self.settings.save() {
            log::warn!("Could not persist settings: {e}");
        }
    }

    pub fn on_completion(&mut self, completion: Completion) {
        match completion {
            Completion::Initialized(result) => match *result {
                Ok(ai) => {
                    self.ai = Some(Arc::new(ai));
                    self.session.mark_initialized();
                }
                Err(e) => self.session.init_failed(format!(
                    "Failed to initialize AI Service: {e}. Ensure the API key is valid and correctly configured."
                )),
            },
            Completion::Narrative(outcome) => {
                if let Some(plan) = self.session.finish_narrative(outcome) {
                    self.spawn_image(plan);
                }
                self.story_scroll_back = 0;
            }
            Completion::Image(outcome) => {
                self.session.finish_image(outcome);
                self.story_scroll_back = 0;
            }
            Completion::Retry(outcome) => self.session.finish_retry(outcome),
        }
        if !self.session.is_busy() {
            self.spinner.stop();
        }
    }
}

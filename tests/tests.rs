// ../tests/tests.rs
use story_weaver::constants::*;
use story_weaver::*;

const STYLE: &str = "Desired artistic style: cinematic, vivid, detailed, slightly painterly. Ensure the image is safe for all audiences.";

fn chars(text: &str) -> usize {
    text.chars().count()
}

fn trigger(total: u32, last_image: u32, tag: bool) -> ImageTrigger {
    ImageTrigger {
        enabled: true,
        current_total: total,
        last_image_at_total_turn: last_image,
        tag_present: tag,
        is_final_turn: is_final_turn(total),
    }
}

#[test]
fn test_turn_state_counts_both_players() {
    let mut turns = TurnState::new();
    assert_eq!(turns.record_turn(PlayerIdentity::A), 1);
    assert_eq!(turns.record_turn(PlayerIdentity::B), 2);
    assert_eq!(turns.record_turn(PlayerIdentity::A), 3);

    assert_eq!(turns.turns_for(PlayerIdentity::A), 2);
    assert_eq!(turns.turns_for(PlayerIdentity::B), 1);
    assert_eq!(turns.total(), turns.player_a_turns + turns.player_b_turns);
    assert_eq!(turns.remaining(), TOTAL_MAX_TURNS - 3);
    assert!(!turns.is_game_over());
}

#[test]
fn test_game_over_at_total_max_turns() {
    assert_eq!(TOTAL_MAX_TURNS, 50);
    let mut turns = TurnState::new();
    for turn in 0..TOTAL_MAX_TURNS {
        let player = if turn % 2 == 0 {
            PlayerIdentity::A
        } else {
            PlayerIdentity::B
        };
        let total = turns.record_turn(player);
        assert_eq!(is_final_turn(total), total == TOTAL_MAX_TURNS);
    }
    assert!(turns.is_game_over());
    assert_eq!(turns.player_a_turns, MAX_PLAYER_TURNS_EACH);
    assert_eq!(turns.player_b_turns, MAX_PLAYER_TURNS_EACH);
    assert_eq!(turns.remaining(), 0);
}

#[test]
fn test_strip_without_tag_is_unchanged() {
    let raw = "  The lighthouse keeper lit the lamp.  ";
    let (cleaned, tag_present) = strip_image_tag(raw);
    assert_eq!(cleaned, raw);
    assert!(!tag_present);

    let (again, tag_present) = strip_image_tag(&cleaned);
    assert_eq!(again, cleaned);
    assert!(!tag_present);
}

#[test]
fn test_strip_removes_every_tag_and_trims() {
    let raw = "[IMAGE_WORTHY_SCENE] A dragon rose over the bay. [IMAGE_WORTHY_SCENE]\n";
    let (cleaned, tag_present) = strip_image_tag(raw);
    assert!(tag_present);
    assert_eq!(cleaned, "A dragon rose over the bay.");
}

#[test]
fn test_final_turn_message_asks_for_conclusion() {
    let message = compose_player_message(PlayerIdentity::B, "They sail home.", true);
    assert!(message.starts_with("Player B: They sail home."));
    assert!(message.contains("[SYSTEM NOTE: This is the final turn of the story (50 total player turns)."));

    let message = compose_player_message(PlayerIdentity::A, "A storm.", false);
    assert_eq!(message, "Player A: A storm.");
}

#[test]
fn test_system_instruction_mentions_tag_and_limit() {
    let instruction = system_instruction();
    assert!(instruction.contains(AI_IMAGE_PROMPT_TAG));
    assert!(instruction.contains("50 total player turns"));
}

#[test]
fn test_trigger_fires_on_first_turn() {
    assert!(trigger(1, 0, false).should_generate());
    assert!(trigger(1, 0, false).is_first_ever_turn());
}

#[test]
fn test_trigger_respects_toggle() {
    let disabled = ImageTrigger {
        enabled: false,
        ..trigger(1, 0, true)
    };
    assert!(!disabled.should_generate());
}

#[test]
fn test_trigger_never_fires_on_final_turn() {
    let last = trigger(TOTAL_MAX_TURNS, 0, true);
    assert!(last.is_final_turn);
    assert!(last.is_interval_due());
    assert!(!last.should_generate());
}

#[test]
fn test_trigger_tag_and_interval() {
    assert!(trigger(2, 1, true).should_generate());
    assert!(!trigger(2, 1, false).should_generate());
    assert!(!trigger(3, 1, false).should_generate());
    assert!(trigger(4, 1, false).should_generate());
    // A failed image leaves the clock alone, so the next turn is still due.
    assert!(trigger(5, 1, false).should_generate());
}

#[test]
fn test_interval_needs_positive_total() {
    let zero = ImageTrigger {
        current_total: 0,
        ..trigger(0, 0, false)
    };
    assert!(!zero.is_interval_due());
    assert!(!zero.should_generate());
}

#[test]
fn test_context_uses_last_five_items_only() {
    let mut story = StoryLog::new();
    for n in 0..7 {
        let player = if n % 2 == 0 {
            PlayerIdentity::A
        } else {
            PlayerIdentity::B
        };
        story.push(StoryItem::player_input(player, format!("prompt {n}")));
    }

    let summary = summarize_context(&story);
    assert!(!summary.contains("prompt 0"));
    assert!(!summary.contains("prompt 1"));
    assert_eq!(
        summary,
        "Player A prompted: prompt 2\nPlayer B prompted: prompt 3\nPlayer A prompted: prompt 4\nPlayer B prompted: prompt 5\nPlayer A prompted: prompt 6"
    );
}

#[test]
fn test_context_excerpts_and_total_are_bounded() {
    let mut story = StoryLog::new();
    for _ in 0..5 {
        story.push(StoryItem::narrative("é".repeat(250)));
    }

    let summary = summarize_context(&story);
    assert_eq!(chars(&summary), CONTEXT_SUMMARY_CHARS);
    for line in summary.lines() {
        let excerpt = line.trim_start_matches("Previously, the AI narrated: ");
        assert!(chars(excerpt) <= CONTEXT_ITEM_CHARS + 3);
    }
    assert!(summary.starts_with(&format!("Previously, the AI narrated: {}...\n", "é".repeat(100))));
}

#[test]
fn test_context_skips_images_and_mismatched_inputs() {
    let mut story = StoryLog::new();
    story.push(StoryItem::narrative("The gates opened."));
    story.push(StoryItem::image("data:image/png;base64,AAAA", "a gate"));
    let mut forged = StoryItem::player_input(PlayerIdentity::A, "forged");
    forged.player_identity = Some(PlayerIdentity::B);
    story.push(forged);

    let summary = summarize_context(&story);
    assert_eq!(summary, "Previously, the AI narrated: The gates opened.");
}

#[test]
fn test_focus_scene_is_first_350_chars() {
    let narrative = "n".repeat(500);
    let scene = SceneContext::build(&StoryLog::new(), &narrative);
    assert_eq!(chars(&scene.focus_scene), FOCUS_SCENE_CHARS);
    assert!(!scene.focus_scene.ends_with("..."));
    assert_eq!(scene.context_summary, "");
}

#[test]
fn test_prompt_within_budget_uses_template() {
    let scene = SceneContext {
        focus_scene: "A fox steals the moon.".to_string(),
        context_summary: "Player A prompted: a fox".to_string(),
    };
    let prompt = build_image_prompt(&scene);
    assert_eq!(
        prompt,
        format!(
            "Illustrate this pivotal scene from an ongoing story: \"A fox steals the moon.\"\nThis scene occurs after the following recent story developments:\nPlayer A prompted: a fox\n{STYLE}"
        )
    );
}

#[test]
fn test_prompt_over_budget_truncates_context() {
    let scene = SceneContext {
        focus_scene: "f".repeat(350),
        context_summary: "c".repeat(400),
    };
    let prompt = build_image_prompt(&scene);

    assert!(chars(&prompt) <= MAX_IMAGE_PROMPT_LENGTH);
    assert!(prompt.ends_with(&format!("...\n{STYLE}")));
    assert!(prompt.contains(&"f".repeat(350)));
    assert!(prompt.contains("This scene occurs after the following recent story developments:"));
    assert!(!prompt.contains(&"c".repeat(400)));
}

#[test]
fn test_prompt_with_huge_scene_drops_context() {
    let scene = SceneContext {
        focus_scene: "s".repeat(1000),
        context_summary: "Player B prompted: something".to_string(),
    };
    let prompt = build_image_prompt(&scene);

    assert!(chars(&prompt) <= MAX_IMAGE_PROMPT_LENGTH);
    assert!(!prompt.contains("Player B prompted"));
    assert!(prompt.starts_with("Illustrate this pivotal scene from an ongoing story: \"sss"));
    assert!(prompt.ends_with(&format!("\"...\n{STYLE}")));
}

#[test]
fn test_story_log_replace_image_in_place() {
    let mut story = StoryLog::new();
    story.push(StoryItem::narrative("Once."));
    let image_id = story.push(StoryItem::image("first", "prompt"));
    story.push(StoryItem::narrative("Twice."));
    let before = story.get(image_id).cloned().expect("image exists");

    assert!(story.replace_image(image_id, "second".to_string(), "prompt".to_string()));

    let after = story.get(image_id).expect("image exists");
    assert_eq!(after.image_url.as_deref(), Some("second"));
    assert_eq!(after.timestamp, before.timestamp);
    assert_eq!(story.position(image_id), Some(1));
    assert!(!story.replace_image(uuid::Uuid::new_v4(), "x".into(), "y".into()));
}

#[test]
fn test_story_log_steps_through_images() {
    let mut story = StoryLog::new();
    assert_eq!(story.step_image(None, true), None);

    let first = story.push(StoryItem::image("a", "first"));
    story.push(StoryItem::narrative("between"));
    let second = story.push(StoryItem::image("b", "second"));
    let third = story.push(StoryItem::image("c", "third"));

    // Nothing selected counts as the latest image.
    assert_eq!(story.step_image(None, false), Some(second));
    assert_eq!(story.step_image(None, true), Some(first));
    assert_eq!(story.step_image(Some(first), false), Some(third));
    assert_eq!(story.step_image(Some(second), true), Some(third));
    assert_eq!(story.last_n(2).len(), 2);
    assert_eq!(story.last_n(2)[1].id, third);
}

#[test]
fn test_story_log_timestamps_never_decrease() {
    let mut story = StoryLog::new();
    story.push(StoryItem::narrative("later"));
    let mut earlier = StoryItem::narrative("earlier clock");
    earlier.timestamp = earlier.timestamp - chrono::Duration::seconds(60);
    story.push(earlier);

    let items = story.items();
    assert!(items[1].timestamp >= items[0].timestamp);
}

#[test]
fn test_settings_round_trip() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("nested").join("settings.json");

    let settings = Settings {
        openai_api_key: Some("sk-test".to_string()),
        image_generation_enabled: true,
        ..Settings::default()
    };
    settings.save_to_file(&path).expect("Failed to save settings");

    let loaded = Settings::load_settings_from_file(&path).expect("Failed to load settings");
    assert_eq!(loaded, settings);
}

#[test]
fn test_debug_mode_selects_log_level() {
    let settings = Settings::default();
    assert!(!settings.debug_mode);
    assert_eq!(logging::level_for(settings.debug_mode), log::Level::Info);
    assert_eq!(logging::level_for(true), log::Level::Debug);
}

#[test]
fn test_settings_defaults_fill_missing_fields() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("settings.json");
    std::fs::write(&path, r#"{ "openai_api_key": "sk-old" }"#).expect("Failed to write settings");

    let loaded = Settings::load_settings_from_file(&path).expect("Failed to load settings");
    assert_eq!(loaded.openai_api_key.as_deref(), Some("sk-old"));
    assert!(!loaded.image_generation_enabled);
    assert_eq!(loaded.text_model, DEFAULT_TEXT_MODEL);
}

// ui/story.rs

use super::constants::EMPTY_STORY;
use crate::app::App;
use crate::message::{MessageSource, StoryItem, StoryLog};
use crate::session::InFlight;
use crate::utils::{char_len, truncate_chars};
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::*,
};
use uuid::Uuid;

fn wrapped(text: &str, width: usize, style: Style) -> Vec<Line<'static>> {
    textwrap::wrap(text, width.max(1))
        .into_iter()
        .map(|line| Line::from(Span::styled(line.into_owned(), style)))
        .collect()
}

// Terminals cannot show the image itself, so describe the reference instead.
fn describe_image(url: &str) -> String {
    match url.split_once(";base64,") {
        Some((kind, data)) => format!(
            "{} illustration, {} KB",
            kind.trim_start_matches("data:"),
            data.len() * 3 / 4 / 1024
        ),
        None => url.to_string(),
    }
}

/// Story panel content, pre-wrapped to `width` columns. Only AI items are shown.
///
/// The retry hint sits on `selected`, or on the latest illustration when nothing is selected.
pub fn story_lines(
    story: &StoryLog,
    width: usize,
    retrying: Option<Uuid>,
    selected: Option<Uuid>,
) -> Vec<Line<'static>> {
    let target = selected.or_else(|| story.latest_image().map(|item| item.id));
    let mut lines = Vec::new();

    for item in story.iter() {
        match item.source {
            MessageSource::AiNarrative => narrative_lines(item, width, &mut lines),
            MessageSource::AiImage if item.image_url.is_some() => {
                image_lines(item, width, retrying, target, &mut lines)
            }
            _ => {}
        }
    }
    lines
}

fn narrative_lines(item: &StoryItem, width: usize, lines: &mut Vec<Line<'static>>) {
    lines.push(Line::from(Span::styled(
        "AI Storyteller:",
        Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::BOLD),
    )));
    for paragraph in item.text_or_empty().split('\n') {
        lines.extend(wrapped(paragraph, width, Style::default().fg(Color::White)));
    }
    lines.push(
        Line::from(Span::styled(
            item.timestamp.format("%H:%M:%S").to_string(),
            Style::default().fg(Color::DarkGray),
        ))
        .alignment(Alignment::Right),
    );
    lines.push(Line::from(""));
}

fn image_lines(
    item: &StoryItem,
    width: usize,
    retrying: Option<Uuid>,
    target: Option<Uuid>,
    lines: &mut Vec<Line<'static>>,
) {
    let url = item.image_url.as_deref().unwrap_or_default();
    let marker = if target == Some(item.id) { "> " } else { "" };
    lines.push(Line::from(vec![
        Span::styled(
            format!("{marker}[Illustration] "),
            Style::default()
                .fg(Color::LightMagenta)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(describe_image(url), Style::default().fg(Color::Gray)),
    ]));

    if retrying == Some(item.id) {
        lines.push(Line::from(Span::styled(
            "Retrying...",
            Style::default().fg(Color::Yellow),
        )));
    } else if target == Some(item.id) {
        lines.push(Line::from(Span::styled(
            "Ctrl+R: Retry Image",
            Style::default().fg(Color::LightMagenta),
        )));
    }

    if let Some(prompt) = item.image_retry_prompt.as_deref() {
        let ellipsis = if char_len(prompt) > 100 { "..." } else { "" };
        let preview = format!("Prompt: \"{}{ellipsis}\"", truncate_chars(prompt, 100));
        lines.extend(wrapped(
            &preview,
            width,
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        ));
    }
    lines.push(Line::from(""));
}

/// Scroll offset that keeps the last `visible` lines in view, moved up by `scroll_back`.
/// Line counts past `u16::MAX` saturate.
pub fn bottom_scroll(line_count: usize, visible: u16, scroll_back: u16) -> u16 {
    u16::try_from(line_count)
        .unwrap_or(u16::MAX)
        .saturating_sub(visible)
        .saturating_sub(scroll_back)
}

pub fn draw_story(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Story ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Magenta));
    let inner = block.inner(area);

    let retrying = match app.session.in_flight() {
        Some(InFlight::ImageRetry(id)) => Some(id),
        _ => None,
    };
    let lines = story_lines(
        app.session.story(),
        inner.width as usize,
        retrying,
        app.selected_image,
    );

    if lines.is_empty() {
        let empty = Paragraph::new(EMPTY_STORY)
            .style(Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC))
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let scroll = bottom_scroll(lines.len(), inner.height, app.story_scroll_back);
    let story = Paragraph::new(lines).block(block).scroll((scroll, 0));
    f.render_widget(story, area);
}

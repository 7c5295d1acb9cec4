// ui/draw.rs

use super::{
    constants::{KEY_HINTS, TITLE},
    player::{draw_player_column, player_color},
    spinner::spinner_frame,
    story::draw_story,
};
use crate::app::App;
use crate::constants::TOTAL_MAX_TURNS;
use crate::message::PlayerIdentity;
use crate::session::InitState;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::*,
};

pub const MIN_WIDTH: u16 = 90;
pub const MIN_HEIGHT: u16 = 24;

pub fn center_rect(area: Rect, horizontal: Constraint, vertical: Constraint) -> Rect {
    let [area] = Layout::horizontal([horizontal])
        .flex(Flex::Center)
        .areas(area);
    let [area] = Layout::vertical([vertical]).flex(Flex::Center).areas(area);
    area
}

pub fn draw(f: &mut Frame, app: &App) {
    let size = f.area();

    if size.width < MIN_WIDTH || size.height < MIN_HEIGHT {
        let warning = Paragraph::new("Terminal too small. Please resize.")
            .style(Style::default().fg(Color::Red))
            .alignment(Alignment::Center);
        f.render_widget(warning, size);
        return;
    }

    match app.session.init_state() {
        InitState::Failed(message) => draw_config_error(f, message, size),
        InitState::Pending => draw_connecting(f, app, size),
        InitState::Ready => draw_game(f, app, size),
    }
}

// Replaces the whole surface. There is no way back without a restart.
fn draw_config_error(f: &mut Frame, message: &str, area: Rect) {
    let area = center_rect(area, Constraint::Percentage(70), Constraint::Length(9));
    let text = vec![
        Line::from(Span::styled(
            "API Key Configuration Needed",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(message.to_string()),
        Line::from(""),
        Line::from(Span::styled(
            "Set OPENAI_API_KEY or add openai_api_key to ~/story_weaver/data/settings.json, then restart. Esc quits.",
            Style::default().fg(Color::Gray),
        )),
    ];
    let paragraph = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(Color::Red)),
        );
    f.render_widget(paragraph, area);
}

fn draw_connecting(f: &mut Frame, app: &App, area: Rect) {
    let area = center_rect(area, Constraint::Percentage(50), Constraint::Length(3));
    let paragraph = Paragraph::new(format!(
        "Connecting to the storyteller {}",
        app.spinner.get_frame()
    ))
    .alignment(Alignment::Center)
    .style(Style::default().fg(Color::Magenta))
    .block(Block::bordered().border_type(BorderType::Rounded));
    f.render_widget(paragraph, area);
}

fn draw_game(f: &mut Frame, app: &App, size: Rect) {
    let session = &app.session;
    let mut constraints = vec![Constraint::Length(5)];
    if session.error().is_some() {
        constraints.push(Constraint::Length(3));
    }
    if session.is_game_over() {
        constraints.push(Constraint::Length(3));
    }
    constraints.push(Constraint::Min(0));
    constraints.push(Constraint::Length(KEY_HINTS.len() as u16));
    let chunks = Layout::vertical(constraints).split(size);

    let mut index = 0;
    draw_header(f, app, chunks[index]);
    index += 1;
    if let Some(error) = session.error() {
        draw_banner(f, &format!("Error: {error}"), Color::Red, Color::White, chunks[index]);
        index += 1;
    }
    if session.is_game_over() {
        let message = format!("The End! The story has concluded after {TOTAL_MAX_TURNS} turns.");
        draw_banner(f, &message, Color::Yellow, Color::Black, chunks[index]);
        index += 1;
    }

    let [left, center, right] = Layout::horizontal([
        Constraint::Percentage(25),
        Constraint::Percentage(50),
        Constraint::Percentage(25),
    ])
    .areas(chunks[index]);
    draw_player_column(f, app, PlayerIdentity::A, left);
    draw_story(f, app, center);
    draw_player_column(f, app, PlayerIdentity::B, right);

    if app.spinner.is_spinning() {
        let spinner_area = Rect::new(center.x + 1, center.bottom().saturating_sub(2), center.width.saturating_sub(2), 1);
        let spinner = Paragraph::new(spinner_frame(&app.spinner))
            .style(Style::default().fg(Color::Black).bg(Color::Magenta))
            .alignment(Alignment::Right);
        f.render_widget(spinner, spinner_area);
    }

    let hints = Paragraph::new(KEY_HINTS.map(Line::from).to_vec())
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    f.render_widget(hints, chunks[index + 1]);
}

fn draw_header(f: &mut Frame, app: &App, area: Rect) {
    let status = app.session.status();
    let mut lines = vec![
        Line::from(Span::styled(
            TITLE,
            Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!(
                "Turns: {} (Player A) + {} (Player B) = {} / {TOTAL_MAX_TURNS}",
                status.player_a_turns, status.player_b_turns, status.total_turns
            ),
            Style::default().fg(Color::Gray),
        )),
        Line::from(Span::styled(
            format!(
                "[{}] Enable Image Generation (requires billed API quota)",
                if app.session.image_generation_enabled() { "x" } else { " " }
            ),
            Style::default().fg(Color::Gray),
        )),
    ];
    if !status.is_game_over {
        lines.push(Line::from(Span::styled(
            format!("Current Turn: {}", status.active_player),
            Style::default()
                .fg(player_color(status.active_player))
                .add_modifier(Modifier::BOLD),
        )));
    }
    let header = Paragraph::new(lines).alignment(Alignment::Center);
    f.render_widget(header, area);
}

fn draw_banner(f: &mut Frame, message: &str, background: Color, foreground: Color, area: Rect) {
    let banner = Paragraph::new(message.to_string())
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(foreground).bg(background))
        .block(Block::default().padding(Padding::vertical(1)));
    f.render_widget(banner, area);
}

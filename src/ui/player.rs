// ui/player.rs

use super::story::bottom_scroll;
use crate::app::App;
use crate::message::PlayerIdentity;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::*,
};

pub fn player_color(player: PlayerIdentity) -> Color {
    match player {
        PlayerIdentity::A => Color::LightBlue,
        PlayerIdentity::B => Color::LightGreen,
    }
}

// Input box on top, the player's own prompts below.
pub fn draw_player_column(f: &mut Frame, app: &App, player: PlayerIdentity, area: Rect) {
    let [input_area, history_area] =
        Layout::vertical([Constraint::Length(7), Constraint::Min(0)]).areas(area);

    let enabled = app.session.can_submit(player);
    let color = player_color(player);
    let title = if enabled {
        format!(" {player} (your turn) ")
    } else {
        format!(" {player} ")
    };
    let input_block = Block::default()
        .title(Span::styled(
            title,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_type(if enabled {
            BorderType::Thick
        } else {
            BorderType::Rounded
        })
        .border_style(Style::default().fg(if enabled { color } else { Color::DarkGray }));
    let inner = input_block.inner(input_area);
    f.render_widget(input_block, input_area);
    f.render_widget(app.input(player), inner);

    draw_history(f, app, player, history_area);
}

fn draw_history(f: &mut Frame, app: &App, player: PlayerIdentity, area: Rect) {
    let block = Block::default()
        .title(format!(" {player} History "))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::DarkGray));
    let width = block.inner(area).width.max(1) as usize;
    let visible = block.inner(area).height;

    let mut lines = Vec::new();
    for item in app.session.story().for_player(player) {
        for line in textwrap::wrap(item.text_or_empty(), width) {
            lines.push(Line::from(Span::styled(
                line.into_owned(),
                Style::default().fg(player_color(player)),
            )));
        }
        lines.push(Line::from(Span::styled(
            item.timestamp.format("%H:%M:%S").to_string(),
            Style::default().fg(Color::DarkGray),
        )));
    }
    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "No prompts yet.",
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )));
    }

    // Newest prompts stay in view.
    let scroll = bottom_scroll(lines.len(), visible, 0);
    f.render_widget(Paragraph::new(lines).block(block).scroll((scroll, 0)), area);
}

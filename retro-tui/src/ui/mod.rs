//! UI rendering
//!
//! Render functions read `AppState` and draw; they never change it.

pub mod feed;

use libretroscroll::games::GameSurface;
use libretroscroll::router::View;
use libretroscroll::service::SESSION_XP;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Tabs, Wrap},
    Frame,
};

use crate::app::AppState;

/// Main rendering entry point
pub fn render(frame: &mut Frame, state: &AppState) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tabs
            Constraint::Min(3),    // Current view
            Constraint::Length(3), // Status bar
        ])
        .split(area);

    render_tabs(frame, chunks[0], state);

    match state.current_view {
        View::Feed => render_feed(frame, chunks[1], state),
        View::Games => render_games(frame, chunks[1], state),
        View::About => render_about(frame, chunks[1], state),
    }

    render_status_bar(frame, chunks[2], state);

    if state.game_active() {
        render_game_overlay(frame, area, state);
    }

    if state.help_visible {
        render_help_overlay(frame, area);
    }

    if let Some(ref error) = state.error {
        render_error_overlay(frame, area, error);
    }
}

fn render_tabs(frame: &mut Frame, area: Rect, state: &AppState) {
    let titles: Vec<Line> = View::ALL
        .iter()
        .map(|view| Line::from(view.title()))
        .collect();
    let selected = View::ALL
        .iter()
        .position(|view| *view == state.current_view)
        .unwrap_or(0);

    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL).title(" RetroScroll "))
        .select(selected)
        .highlight_style(
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_widget(tabs, area);
}

fn render_feed(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default()
        .title(format!(" Feed ({} items) ", state.feed.view.cards.len()))
        .borders(Borders::ALL);
    let width = usize::from(block.inner(area).width);

    let lines = feed::visible_lines(&state.feed, width, state.config.colors_enabled);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_games(frame: &mut Frame, area: Rect, state: &AppState) {
    let title = if state.games.parade {
        " Games (parade) "
    } else {
        " Games "
    };
    let block = Block::default().title(title).borders(Borders::ALL);

    if state.games.catalog.is_empty() {
        let loading = Paragraph::new("Loading catalog...")
            .block(block)
            .alignment(Alignment::Center);
        frame.render_widget(loading, area);
        return;
    }

    let items: Vec<ListItem> = state
        .games
        .catalog
        .iter()
        .map(|game| {
            ListItem::new(vec![
                Line::from(Span::styled(
                    game.title.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    format!("  {}", game.description),
                    Style::default().fg(Color::Gray),
                )),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().fg(Color::Black).bg(Color::Green))
        .highlight_symbol("▶ ");

    let mut list_state = ListState::default().with_selected(Some(state.games.selected));
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn render_about(frame: &mut Frame, area: Rect, state: &AppState) {
    let text = vec![
        Line::from(Span::styled(
            "RetroScroll",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("An endless feed of pixel art, retro facts and the odd sponsor."),
        Line::from("Scroll to load more. Play games to earn XP and level up."),
        Line::from(""),
        Line::from(format!("Signed in as {}", state.profile.username)),
        Line::from(""),
        Line::from("f: feed | g: games | i: about | F1: help | q: quit"),
    ];

    let about = Paragraph::new(text)
        .block(Block::default().title(" About ").borders(Borders::ALL))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false });

    frame.render_widget(about, area);
}

fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState) {
    let stats = &state.profile.stats;
    let mut spans = vec![
        Span::styled(
            state.profile.username.clone(),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw(format!(
            " | XP {} | Level {} | Streak {}",
            stats.xp, stats.level, stats.streak
        )),
    ];

    if let Some(level) = state.level_up {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(
            format!("★ LEVEL UP! Level {} ★", level),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::SLOW_BLINK),
        ));
    } else if let Some(ref message) = state.status.message {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(
            message.clone(),
            Style::default().fg(Color::Green),
        ));
    }

    let status = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, area);
}

fn render_game_overlay(frame: &mut Frame, area: Rect, state: &AppState) {
    let popup_area = centered_rect(60, 50, area);
    let surface = GameSurface::default();

    let title = state
        .games
        .catalog
        .iter()
        .find(|game| Some(&game.id) == state.games.active.as_ref())
        .map(|game| game.title.clone())
        .or_else(|| state.games.active.clone())
        .unwrap_or_default();

    let text = vec![
        Line::from(Span::styled(
            title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(format!("Surface {}x{}", surface.width, surface.height)),
        Line::from(format!("Controls: {}", surface.controls.join(" "))),
        Line::from(""),
        Line::from(format!("Esc to close (+{} XP)", SESSION_XP)),
    ];

    let overlay = Paragraph::new(text)
        .block(
            Block::default()
                .title(format!(" Playing: {} ", title))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Magenta)),
        )
        .alignment(Alignment::Center);

    frame.render_widget(Clear, popup_area);
    frame.render_widget(overlay, popup_area);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);

    let help_text = vec![
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Global:"),
        Line::from("  f / g / i  - Feed / Games / About"),
        Line::from("  q          - Quit"),
        Line::from("  F1         - Toggle help"),
        Line::from("  arcade     - Type it for a game parade"),
        Line::from(""),
        Line::from("Feed:"),
        Line::from("  j/k, ↑/↓   - Scroll"),
        Line::from("  PgUp/PgDn  - Scroll a page"),
        Line::from(""),
        Line::from("Games:"),
        Line::from("  j/k, ↑/↓   - Select"),
        Line::from("  Enter      - Launch"),
        Line::from("  Esc        - Close the game"),
        Line::from(""),
        Line::from("Press Esc or F1 to close"),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .title(" Help ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .wrap(Wrap { trim: false });

    frame.render_widget(Clear, popup_area);
    frame.render_widget(help, popup_area);
}

fn render_error_overlay(frame: &mut Frame, area: Rect, error: &str) {
    let popup_area = centered_rect(70, 30, area);

    let error_text = vec![
        Line::from(Span::styled(
            "Error",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(error.to_string()),
        Line::from(""),
        Line::from("Press Esc to dismiss"),
    ];

    let error_widget = Paragraph::new(error_text)
        .block(
            Block::default()
                .title(" Error ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
        .wrap(Wrap { trim: false })
        .alignment(Alignment::Center);

    frame.render_widget(Clear, popup_area);
    frame.render_widget(error_widget, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

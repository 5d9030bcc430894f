//! Feed card rendering
//!
//! Cards are drawn as framed text blocks in sequence order, followed by
//! the sentinel line. Row counts match `Card::height` so the scroll
//! offset in `FeedPane` lines up with what is drawn.

use libretroscroll::feed::{Card, FeedView};
use libretroscroll::types::ContentKind;
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

use crate::app::FeedPane;

fn kind_style(kind: ContentKind, colors: bool) -> Style {
    if !colors {
        return Style::default();
    }
    match kind {
        ContentKind::Fact => Style::default().fg(Color::Cyan),
        ContentKind::Image => Style::default().fg(Color::Magenta),
        ContentKind::Advertisement => Style::default().fg(Color::Yellow),
    }
}

fn card_lines(card: &Card, width: usize, colors: bool) -> Vec<Line<'static>> {
    let style = kind_style(card.kind, colors);
    let label = format!("┌ #{} {} ", card.id, card.kind);
    let fill = width.saturating_sub(label.chars().count());

    let mut lines = Vec::with_capacity(card.height());
    lines.push(Line::from(Span::styled(
        format!("{}{}", label, "─".repeat(fill)),
        style.add_modifier(Modifier::BOLD),
    )));
    for text in card.lines() {
        lines.push(Line::from(vec![
            Span::styled("│ ", style),
            Span::raw(text),
        ]));
    }
    lines.push(Line::from(Span::styled(
        format!("└{}", "─".repeat(width.saturating_sub(1))),
        style,
    )));
    lines
}

fn sentinel_line(loading: bool) -> Line<'static> {
    if loading {
        Line::from(Span::styled(
            "Loading more...",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::ITALIC),
        ))
    } else {
        Line::from(Span::styled("· · ·", Style::default().fg(Color::DarkGray)))
    }
}

/// Lines of `feed` visible from its scroll offset
///
/// Only cards overlapping the viewport are built.
pub fn visible_lines(feed: &FeedPane, width: usize, colors: bool) -> Vec<Line<'static>> {
    let FeedView {
        cards, sentinel, ..
    } = &feed.view;
    let top = feed.scroll;
    let bottom = top + feed.viewport_rows;

    let mut lines = Vec::with_capacity(feed.viewport_rows);
    let mut row = 0;
    for card in cards {
        let height = card.height();
        if row + height > top && row < bottom {
            let skip = top.saturating_sub(row);
            lines.extend(card_lines(card, width, colors).into_iter().skip(skip));
        }
        row += height;
        if row >= bottom {
            break;
        }
    }

    if sentinel.row >= top && sentinel.row < bottom {
        lines.push(sentinel_line(feed.view.loading || feed.requested));
    }

    lines.truncate(feed.viewport_rows);
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use libretroscroll::content::ContentGenerator;
    use libretroscroll::feed::{render_feed, FeedState};

    fn pane(items: usize, scroll: usize, rows: usize) -> FeedPane {
        let mut state = FeedState::new();
        state.begin_load();
        state.complete_load(&mut ContentGenerator::with_seed(3), items);
        FeedPane {
            view: render_feed(&state),
            scroll,
            viewport_rows: rows,
            requested: false,
        }
    }

    fn text(line: &Line) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    #[test]
    fn test_first_line_is_first_card_header() {
        let lines = visible_lines(&pane(5, 0, 10), 40, false);
        assert_eq!(lines.len(), 10);
        assert!(text(&lines[0]).starts_with("┌ #1 "));
    }

    #[test]
    fn test_scroll_skips_rows_of_partial_card() {
        let feed = pane(5, 1, 10);
        let lines = visible_lines(&feed, 40, false);
        let first_card = &feed.view.cards[0];
        assert_eq!(text(&lines[0]), format!("│ {}", first_card.lines()[0]));
    }

    #[test]
    fn test_sentinel_shown_at_end() {
        let feed = pane(2, 0, 40);
        let lines = visible_lines(&feed, 40, false);
        assert_eq!(lines.len(), feed.view.sentinel.row + 1);
        assert_eq!(text(lines.last().unwrap()), "· · ·");
    }

    #[test]
    fn test_empty_feed_shows_loading_when_requested() {
        let mut feed = pane(0, 0, 10);
        feed.requested = true;
        let lines = visible_lines(&feed, 40, false);
        assert_eq!(lines.len(), 1);
        assert_eq!(text(&lines[0]), "Loading more...");
    }
}

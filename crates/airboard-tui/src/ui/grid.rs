//! Responsive card grid for the selected tab.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use airboard_core::utils::{or_na, ticket_search_url, truncate_string};
use airboard_core::{AirlineRecord, BoardTab, CardView};

use crate::app::App;
use crate::ui::styles;

/// Rows per card, borders included
pub const CARD_HEIGHT: u16 = 8;

/// Width of the short skeleton bar, like a button placeholder
const SKELETON_BUTTON_WIDTH: usize = 12;

/// Number of card columns for a terminal width.
pub fn grid_columns(width: u16) -> usize {
    match width {
        0..=59 => 1,
        60..=99 => 2,
        100..=139 => 3,
        _ => 4,
    }
}

/// First grid row to draw so that `selected_row` stays on screen.
pub fn first_visible_row(selected_row: usize, visible_rows: usize) -> usize {
    selected_row.saturating_sub(visible_rows.saturating_sub(1))
}

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let cards = app.board.cards();

    if cards.is_empty() {
        render_empty(frame, app.board.selected_tab(), app.board.is_loading(), area);
        return;
    }

    let columns = grid_columns(area.width);
    let visible_rows = ((area.height / CARD_HEIGHT).max(1)) as usize;
    let total_rows = cards.len().div_ceil(columns);
    let first_row = first_visible_row(app.selection / columns, visible_rows);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(CARD_HEIGHT); visible_rows])
        .split(area);

    for (offset, row_area) in rows.iter().enumerate() {
        let row = first_row + offset;
        if row >= total_rows {
            break;
        }

        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, columns as u32); columns])
            .split(*row_area);

        for (col, cell) in cells.iter().enumerate() {
            let position = row * columns + col;
            let Some(card) = cards.get(position) else {
                break;
            };
            render_card(frame, *card, position, position == app.selection, *cell);
        }
    }
}

fn render_card(frame: &mut Frame, card: CardView<'_>, position: usize, selected: bool, area: Rect) {
    let inner_width = area.width.saturating_sub(2) as usize;

    let (title, lines) = match card {
        CardView::Airline(record) => {
            let title = record.identifier.as_deref().unwrap_or_default().to_string();
            (title, card_lines(record, inner_width))
        }
        CardView::Placeholder => (String::new(), skeleton_lines(inner_width)),
    };

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::card_border_style(position, selected));
    if !title.is_empty() {
        block = block
            .title(format!(" {} ", title))
            .title_style(styles::muted_style());
    }

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}

/// Text of a populated card: name, ICAO, country, callsign and ticket link.
pub fn card_lines(record: &AirlineRecord, width: usize) -> Vec<Line<'static>> {
    let field = |label: &str, value: Option<&str>| {
        Line::from(vec![
            Span::styled(format!("{}: ", label), styles::muted_style()),
            Span::styled(
                truncate_string(or_na(value), width.saturating_sub(label.len() + 2)),
                styles::list_item_style(),
            ),
        ])
    };

    vec![
        Line::from(Span::styled(
            truncate_string(or_na(record.name.as_deref()), width),
            styles::card_title_style(),
        )),
        field("ICAO", record.icao.as_deref()),
        field("Country", record.country.as_deref()),
        field("Callsign", record.callsign.as_deref()),
        Line::from(""),
        Line::from(Span::styled(
            truncate_string(&ticket_search_url(record.display_name()), width),
            styles::link_style(),
        )),
    ]
}

/// Skeleton bars standing in for a card that has no data yet.
pub fn skeleton_lines(width: usize) -> Vec<Line<'static>> {
    let bar = |len: usize| Line::from(Span::styled("▒".repeat(len), styles::skeleton_style()));

    vec![
        bar(width),
        Line::from(""),
        bar(width * 3 / 4),
        bar(width / 2),
        Line::from(""),
        bar(SKELETON_BUTTON_WIDTH.min(width)),
    ]
}

fn render_empty(frame: &mut Frame, tab: BoardTab, loading: bool, area: Rect) {
    let message = if loading {
        "Loading airlines...".to_string()
    } else {
        format!("No {} airlines to show", tab.title().to_lowercase())
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    let paragraph = Paragraph::new(Line::from(Span::styled(message, styles::muted_style())))
        .block(block);
    frame.render_widget(paragraph, area);
}

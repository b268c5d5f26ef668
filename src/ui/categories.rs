use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::App;
use crate::category::Category;
use crate::time_format;

const HINTS: &str = "↑/↓ select | (enter) use | (n)ew | (e)dit | (d)elete | (q)uit";

/// Pure presenter for one category row
pub fn present_row(category: &Category) -> Row<'static> {
    let pb_style = if category.personal_best().is_some() {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Row::new(vec![
        Cell::from(category.title.clone()),
        Cell::from(category.segments.len().to_string()),
        Cell::from(time_format::format_opt(category.personal_best())).style(pb_style),
        Cell::from(time_format::format_opt(category.sum_of_best())),
    ])
}

pub fn render(app: &App, f: &mut Frame, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // table
            Constraint::Length(4), // footer
        ])
        .split(area);

    let categories = app.store.categories();
    if categories.is_empty() {
        let empty = Paragraph::new("No categories yet.\nPress (n) to create one!")
            .block(Block::default().borders(Borders::ALL).title("Categories"))
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Center);
        f.render_widget(empty, chunks[0]);
    } else {
        let header = Row::new(vec!["Title", "Segments", "Personal best", "Sum of best"]).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
        let table = Table::new(
            categories.iter().map(present_row),
            [
                Constraint::Min(16),
                Constraint::Length(10),
                Constraint::Length(15),
                Constraint::Length(13),
            ],
        )
        .header(header)
        .block(Block::default().borders(Borders::ALL).title("Categories"))
        .row_highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("› ");

        let mut state = TableState::default().with_selected(Some(app.selected));
        f.render_stateful_widget(table, chunks[0], &mut state);
    }

    super::render_footer(HINTS, app.status.as_deref(), f, chunks[1]);
}

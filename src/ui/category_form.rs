use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;
use crate::form::{CategoryForm, FormColumn};

const HINTS: &str =
    "↑/↓ row | tab column | ctrl+n add segment | ctrl+d remove segment | ctrl+s save | (esc) cancel";

const COLUMNS: [FormColumn; 4] = [
    FormColumn::Description,
    FormColumn::Split,
    FormColumn::Segment,
    FormColumn::Best,
];

fn field_style(selected: bool) -> Style {
    if selected {
        Style::default()
            .add_modifier(Modifier::REVERSED)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    }
}

/// Cell text with a placeholder when blank.
fn field_text(text: &str, column: FormColumn) -> Span<'static> {
    if text.is_empty() {
        Span::styled(column.to_string(), Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(text.to_string())
    }
}

fn description_width(form: &CategoryForm) -> u16 {
    form.rows
        .iter()
        .map(|r| r.description.width())
        .max()
        .unwrap_or(0)
        .clamp(16, 40) as u16
}

pub fn render(app: &App, f: &mut Frame, area: Rect) {
    let Some(form) = app.form.as_ref() else {
        return;
    };
    let error_lines = form
        .error
        .as_ref()
        .map_or(0, |e| e.lines().count() as u16 + 2);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),           // title input
            Constraint::Min(3),              // segments
            Constraint::Length(error_lines), // validation errors
            Constraint::Length(3),           // footer
        ])
        .split(area);

    let title = Paragraph::new(Line::from(vec![
        Span::styled("Title: ", Style::default().fg(Color::Yellow)),
        Span::styled(form.title.clone(), field_style(form.on_title())),
    ]))
    .block(Block::default().borders(Borders::ALL).title(form.heading()));
    f.render_widget(title, chunks[0]);

    let selected_row = form.selected_row();
    let rows = form.rows.iter().enumerate().map(|(i, row)| {
        Row::new(COLUMNS.iter().map(|&column| {
            let selected = selected_row == Some(i) && form.column == column;
            Cell::from(field_text(row.field(column), column)).style(field_style(selected))
        }))
    });
    let header = Row::new(COLUMNS.iter().map(|c| Cell::from(c.to_string()))).style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );
    let table = Table::new(
        rows,
        [
            Constraint::Length(description_width(form)),
            Constraint::Length(13),
            Constraint::Length(13),
            Constraint::Length(13),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL).title("Segments"));
    f.render_widget(table, chunks[1]);

    if let Some(error) = &form.error {
        let errors = Paragraph::new(error.as_str())
            .style(Style::default().fg(Color::Red))
            .block(Block::default().borders(Borders::ALL))
            .wrap(Wrap { trim: true });
        f.render_widget(errors, chunks[2]);
    }

    super::render_footer(HINTS, None, f, chunks[3]);
}

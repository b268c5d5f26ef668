pub mod categories;
pub mod category_form;
pub mod screen;
pub mod splits;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::App;

const HORIZONTAL_MARGIN: u16 = 2;
const VERTICAL_MARGIN: u16 = 1;

pub fn draw(app: &App, f: &mut Frame) {
    let area = f.area();
    let inner = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([Constraint::Min(0)])
        .split(area)[0];

    screen::current_screen(&app.state).render(app, f, inner);

    if let Some(prompt) = &app.prompt {
        render_prompt(prompt.text(), f, area);
    }
}

/// Footer with key hints and the latest status message.
pub(crate) fn render_footer(hints: &str, status: Option<&str>, f: &mut Frame, area: Rect) {
    let mut lines = vec![Line::from(Span::styled(
        hints.to_string(),
        Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
    ))];
    if let Some(status) = status {
        lines.push(Line::from(Span::styled(
            status.to_string(),
            Style::default().fg(Color::Yellow),
        )));
    }
    let footer = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(footer, area);
}

fn render_prompt(text: &str, f: &mut Frame, area: Rect) {
    let popup = centered_rect(60, 7, area);
    let body = vec![
        Line::from(Span::styled(
            text.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "(y)es / (n)o",
            Style::default().fg(Color::Gray),
        )),
    ];
    let widget = Paragraph::new(body)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Confirm")
                .style(Style::default().fg(Color::Cyan)),
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(Clear, popup);
    f.render_widget(widget, popup);
}

/// Rect of `percent_x` width and `height` rows centered in `area`.
pub(crate) fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let height = height.min(area.height);
    let width = (area.width as u32 * percent_x.min(100) as u32 / 100) as u16;
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

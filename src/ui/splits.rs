use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::app::App;
use crate::time_format;
use crate::timer::TimerPhase;
use crate::view::{Highlight, SegmentView};

const HINTS: &str =
    "(space) start/split | (p)ause | (r)eset | ← undo | → skip | (esc) back to categories";

const GOLD: Color = Color::Rgb(255, 215, 0);

fn phase_style(phase: TimerPhase) -> Style {
    let color = match phase {
        TimerPhase::Idle => Color::Gray,
        TimerPhase::Running => Color::Green,
        TimerPhase::Paused => Color::Yellow,
        TimerPhase::Finished => Color::Cyan,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

/// Pure presenter for a single segment row
pub fn present_segment(segment: &SegmentView) -> Row<'static> {
    let style = match segment.highlight {
        Highlight::Active => Style::default()
            .fg(Color::Black)
            .bg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
        Highlight::Gold => Style::default().fg(GOLD).add_modifier(Modifier::BOLD),
        Highlight::None => Style::default(),
    };
    Row::new(vec![
        Cell::from(segment.description.clone()),
        Cell::from(time_format::format_opt(segment.segment_time)),
        Cell::from(time_format::format_opt(segment.split_time)),
        Cell::from(time_format::format_opt(segment.best_time))
            .style(Style::default().fg(Color::DarkGray)),
    ])
    .style(style)
}

pub fn render(app: &App, f: &mut Frame, area: Rect) {
    let Some(view) = app.run_view() else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // segments
            Constraint::Length(3), // main timer
            Constraint::Length(3), // footer
        ])
        .split(area);

    let title = format!(
        "{} ({}/{})",
        app.active_title().unwrap_or_default(),
        view.current_index.min(view.segments.len()),
        view.segments.len()
    );
    let header = Row::new(vec!["Segment", "Time", "Split", "Best"]).style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );
    let table = Table::new(
        view.visible().map(present_segment),
        [
            Constraint::Min(12),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(10),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(table, chunks[0]);

    let timer = Paragraph::new(Line::from(vec![
        Span::styled(time_format::format(view.elapsed), phase_style(view.phase)),
        Span::styled(
            format!("  {}", view.phase),
            Style::default().fg(Color::DarkGray),
        ),
    ]))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(timer, chunks[1]);

    super::render_footer(HINTS, app.status.as_deref(), f, chunks[2]);
}

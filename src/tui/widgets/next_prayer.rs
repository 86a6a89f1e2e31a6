use chrono::{DateTime, Utc};
use ratatui::{
    layout::{Alignment, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::models::Schedule;
use crate::platform::DisplayZone;
use crate::tui::theme;
use crate::utils::format::time_remaining;

pub const ALL_STARTED: &str = "All prayers have started today";

pub fn render(
    frame: &mut Frame,
    area: Rect,
    schedule: Option<&Schedule>,
    zone: DisplayZone,
    now: DateTime<Utc>,
) {
    let block = Block::default()
        .title(Span::styled(" Next Prayer ", theme::gold()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border())
        .style(theme::surface());

    let content: Vec<Line> = match schedule.map(|s| s.next_after(now)) {
        None => vec![Line::from(Span::styled("  No data", theme::dim()))],
        Some(None) => vec![Line::from(Span::styled(format!("  {}", ALL_STARTED), theme::dim()))],
        Some(Some((_, event))) => vec![
            Line::from(vec![
                Span::styled(
                    format!("  {}", event.name.display_name().to_uppercase()),
                    theme::gold().add_modifier(Modifier::BOLD),
                ),
                Span::styled(format!("  at {}", zone.clock(event.start_time)), theme::dim()),
            ]),
            Line::from(vec![
                Span::styled("  ", theme::dim()),
                Span::styled(
                    time_remaining(now, event.start_time),
                    theme::accent().add_modifier(Modifier::BOLD),
                ),
            ]),
        ],
    };

    let paragraph = Paragraph::new(content)
        .block(block)
        .alignment(Alignment::Left);

    frame.render_widget(paragraph, area);
}

use chrono::{DateTime, Utc};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::models::PrayerEvent;
use crate::platform::DisplayZone;
use crate::tui::theme;
use crate::utils::format::time_remaining;

pub const COLUMNS: usize = 3;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    prayers: &[PrayerEvent],
    zone: DisplayZone,
    now: DateTime<Utc>,
    focused_idx: usize,
) {
    if prayers.is_empty() {
        let waiting = Paragraph::new(Line::from(Span::styled(
            "Waiting for location to calculate prayer times",
            theme::dim(),
        )))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .title(Span::styled(" Prayers ", theme::gold()))
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(theme::border())
                .style(theme::surface()),
        );
        frame.render_widget(waiting, area);
        return;
    }

    let rows = prayers.len().div_ceil(COLUMNS);
    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(6); rows])
        .split(area);

    for (row, chunk) in prayers.chunks(COLUMNS).enumerate() {
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, COLUMNS as u32); COLUMNS])
            .split(row_areas[row]);

        for (col, prayer) in chunk.iter().enumerate() {
            let idx = row * COLUMNS + col;
            render_card(frame, cells[col], prayer, zone, now, idx == focused_idx);
        }
    }
}

fn render_card(
    frame: &mut Frame,
    area: Rect,
    prayer: &PrayerEvent,
    zone: DisplayZone,
    now: DateTime<Utc>,
    focused: bool,
) {
    let started = prayer.has_started(now);
    let name_style = if focused {
        theme::gold().add_modifier(Modifier::BOLD)
    } else {
        theme::bold()
    };

    let block = Block::default()
        .title(Span::styled(format!(" {} ", prayer.name.display_name()), name_style))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(if focused { theme::gold() } else { theme::border() })
        .style(theme::surface());

    let bell = if prayer.notification_enabled {
        Span::styled("◉ notify", theme::accent())
    } else {
        Span::styled("○ muted", theme::dim())
    };

    let countdown_style = if started {
        theme::dim()
    } else {
        theme::accent().add_modifier(Modifier::BOLD)
    };

    let lines = vec![
        Line::from(vec![Span::raw(" "), bell]),
        Line::from(Span::styled(
            format!(" {}", zone.clock(prayer.start_time)),
            theme::bold(),
        )),
        Line::from(Span::styled(
            format!(" {}", time_remaining(now, prayer.start_time)),
            countdown_style,
        )),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::tui::theme;

pub struct HeaderInfo<'a> {
    pub zone_name: Option<&'a str>,
    pub date_line: &'a str,
    pub hijri: Option<&'a str>,
    pub phone: &'a str,
}

pub fn render(frame: &mut Frame, area: Rect, info: &HeaderInfo) {
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_type(BorderType::Plain)
        .border_style(theme::border())
        .style(theme::base());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(inner);

    let mut dates = vec![Span::raw(" "), Span::styled(info.date_line, theme::dim())];
    if let Some(hijri) = info.hijri {
        dates.push(Span::styled("  ·  ", theme::dim()));
        dates.push(Span::styled(hijri, theme::gold()));
    }
    let left = Paragraph::new(vec![
        Line::from(Span::styled(
            " Prayer Dashboard",
            theme::bold().add_modifier(Modifier::BOLD),
        )),
        Line::from(dates),
    ]);
    frame.render_widget(left, halves[0]);

    let mut right_top = Vec::new();
    if let Some(zone) = info.zone_name {
        right_top.push(Span::styled("◷ ", theme::accent()));
        right_top.push(Span::styled(zone, theme::bold()));
        right_top.push(Span::raw("  "));
    }
    let right = Paragraph::new(vec![
        Line::from(right_top),
        Line::from(vec![
            Span::styled(info.phone, theme::dim()),
            Span::styled("  [L] sign out ", theme::dim()),
        ]),
    ])
    .alignment(Alignment::Right);
    frame.render_widget(right, halves[1]);
}

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::tui::theme;

pub fn render(frame: &mut Frame, area: Rect, text: &str, place: Option<&str>) {
    let title = match place {
        Some(name) => format!(" ⌖ Location · {} ", name),
        None => " ⌖ Location ".to_string(),
    };
    let block = Block::default()
        .title(Span::styled(title, theme::accent()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border())
        .style(theme::surface());

    let paragraph = Paragraph::new(Line::from(Span::styled(
        format!(" {}", text),
        theme::bold(),
    )))
    .block(block);
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::state::FETCHING_LOCATION;
    use crate::tui::widgets::buffer_text;
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn pending_location_shows_fetching_text() {
        let mut terminal = Terminal::new(TestBackend::new(50, 3)).unwrap();
        terminal
            .draw(|frame| render(frame, frame.area(), FETCHING_LOCATION, None))
            .unwrap();
        let text = buffer_text(terminal.backend().buffer());
        assert!(text.contains("Fetching location..."), "{}", text);
    }

    #[test]
    fn known_location_shows_coordinates() {
        let mut terminal = Terminal::new(TestBackend::new(60, 3)).unwrap();
        terminal
            .draw(|frame| {
                render(
                    frame,
                    frame.area(),
                    "Latitude: 21.4225, Longitude: 39.8262",
                    Some("Mecca"),
                )
            })
            .unwrap();
        let text = buffer_text(terminal.backend().buffer());
        assert!(text.contains("Latitude: 21.4225, Longitude: 39.8262"));
        assert!(text.contains("Mecca"));
    }
}

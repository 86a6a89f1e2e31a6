use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::dashboard::Toast;
use crate::tui::theme;

const TOAST_WIDTH: u16 = 44;
const TOAST_HEIGHT: u16 = 4;

/// Stack toasts in the bottom-right corner, newest at the bottom.
pub fn render(frame: &mut Frame, area: Rect, toasts: &[Toast]) {
    let width = TOAST_WIDTH.min(area.width);
    let fit = (area.height / TOAST_HEIGHT) as usize;
    let visible = &toasts[toasts.len().saturating_sub(fit)..];

    let mut bottom = area.y + area.height;
    for toast in visible.iter().rev() {
        let rect = Rect {
            x: area.x + area.width - width,
            y: bottom - TOAST_HEIGHT,
            width,
            height: TOAST_HEIGHT,
        };
        bottom -= TOAST_HEIGHT;

        let block = Block::default()
            .title(Span::styled(
                format!(" {} ", toast.title),
                theme::red().add_modifier(Modifier::BOLD),
            ))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::red())
            .style(theme::toast());

        let body = Paragraph::new(Line::from(Span::raw(toast.description.as_str())))
            .wrap(Wrap { trim: true })
            .block(block);

        frame.render_widget(Clear, rect);
        frame.render_widget(body, rect);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::widgets::buffer_text;
    use chrono::Utc;
    use ratatui::{backend::TestBackend, Terminal};

    fn toast(title: &str, description: &str) -> Toast {
        Toast {
            title: title.to_string(),
            description: description.to_string(),
            raised_at: Utc::now(),
        }
    }

    #[test]
    fn renders_title_and_description() {
        let mut terminal = Terminal::new(TestBackend::new(60, 10)).unwrap();
        let toasts = vec![toast("Timezone Error", "Unable to determine your timezone.")];
        terminal
            .draw(|frame| render(frame, frame.area(), &toasts))
            .unwrap();
        let text = buffer_text(terminal.backend().buffer());
        assert!(text.contains("Timezone Error"));
        assert!(text.contains("Unable to determine your timezone."));
    }

    #[test]
    fn drops_oldest_when_out_of_room() {
        let mut terminal = Terminal::new(TestBackend::new(60, 5)).unwrap();
        let toasts = vec![
            toast("Location Error", "first"),
            toast("Calculation Error", "second"),
        ];
        terminal
            .draw(|frame| render(frame, frame.area(), &toasts))
            .unwrap();
        let text = buffer_text(terminal.backend().buffer());
        assert!(!text.contains("Location Error"));
        assert!(text.contains("Calculation Error"));
    }

    #[test]
    fn tiny_area_renders_nothing() {
        let mut terminal = Terminal::new(TestBackend::new(20, 2)).unwrap();
        let toasts = vec![toast("Location Error", "x")];
        terminal
            .draw(|frame| render(frame, frame.area(), &toasts))
            .unwrap();
        assert!(!buffer_text(terminal.backend().buffer()).contains("Location"));
    }
}

use ratatui::style::{Color, Modifier, Style};

pub const BG: Color = Color::Rgb(14, 18, 20);
pub const SURFACE: Color = Color::Rgb(22, 28, 31);
pub const BORDER: Color = Color::Rgb(44, 58, 62);
pub const TEXT: Color = Color::Rgb(222, 230, 228);
pub const TEXT_DIM: Color = Color::Rgb(120, 138, 136);
pub const ACCENT: Color = Color::Rgb(72, 178, 150);
pub const GOLD: Color = Color::Rgb(204, 170, 84);
pub const RED: Color = Color::Rgb(196, 84, 70);
pub const TOAST_BG: Color = Color::Rgb(58, 24, 22);

pub fn base() -> Style {
    Style::default().fg(TEXT).bg(BG)
}

pub fn surface() -> Style {
    Style::default().fg(TEXT).bg(SURFACE)
}

pub fn border() -> Style {
    Style::default().fg(BORDER)
}

pub fn dim() -> Style {
    Style::default().fg(TEXT_DIM)
}

pub fn bold() -> Style {
    Style::default().fg(TEXT).add_modifier(Modifier::BOLD)
}

pub fn accent() -> Style {
    Style::default().fg(ACCENT)
}

pub fn gold() -> Style {
    Style::default().fg(GOLD)
}

pub fn red() -> Style {
    Style::default().fg(RED)
}

/// Destructive toast body.
pub fn toast() -> Style {
    Style::default().fg(TEXT).bg(TOAST_BG)
}

pub mod header;
pub mod location;
pub mod next_prayer;
pub mod prayers;
pub mod statusbar;
pub mod toasts;

/// Flatten a rendered buffer into newline-separated rows for assertions.
#[cfg(test)]
pub(crate) fn buffer_text(buffer: &ratatui::buffer::Buffer) -> String {
    let area = buffer.area;
    let mut out = String::new();
    for y in area.y..area.y + area.height {
        for x in area.x..area.x + area.width {
            out.push_str(buffer[(x, y)].symbol());
        }
        out.push('\n');
    }
    out
}

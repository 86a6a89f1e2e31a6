use anyhow::Result;
use chrono::{DateTime, Utc};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};
use rusqlite::Connection;

use crate::config::AppConfig;
use crate::dashboard::DashboardState;
use crate::db::repository::SessionRepo;
use crate::platform::{LocationProvider, SystemTimezone, TimezoneResolver};
use crate::prayer_times::SalahEngine;
use crate::tui::events::{Event, EventHandler};
use crate::tui::theme;
use crate::tui::widgets::header::HeaderInfo;
use crate::tui::widgets::{header, location, next_prayer, prayers, statusbar, toasts};
use crate::utils::hijri::hijri_string;

pub struct App {
    pub state: DashboardState,
    pub focus_idx: usize,
    pub show_help: bool,
    pub should_quit: bool,
    /// Set by `L`; the session is cleared once the terminal is restored.
    pub signed_out: bool,
    pub phone: String,
    pub place_name: Option<String>,
    pub hijri_offset: i32,
}

impl App {
    pub fn new(
        state: DashboardState,
        phone: String,
        place_name: Option<String>,
        hijri_offset: i32,
    ) -> Self {
        App {
            state,
            focus_idx: 0,
            show_help: false,
            should_quit: false,
            signed_out: false,
            phone,
            place_name,
            hijri_offset,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        // Only handle actual key presses; some terminals also report release/repeat
        if key.kind != KeyEventKind::Press {
            return;
        }

        if self.show_help {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                self.show_help = false;
            }
            return;
        }

        let count = self.state.prayers().len();
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => {
                self.should_quit = true;
            }
            KeyCode::Char('?') => {
                self.show_help = true;
            }
            KeyCode::Char('L') => {
                self.signed_out = true;
                self.should_quit = true;
            }
            KeyCode::Left => {
                self.focus_idx = self.focus_idx.saturating_sub(1);
            }
            KeyCode::Right => {
                if self.focus_idx + 1 < count {
                    self.focus_idx += 1;
                }
            }
            KeyCode::Up => {
                self.focus_idx = self.focus_idx.saturating_sub(prayers::COLUMNS);
            }
            KeyCode::Down => {
                if self.focus_idx + prayers::COLUMNS < count {
                    self.focus_idx += prayers::COLUMNS;
                }
            }
            KeyCode::Tab => {
                if count > 0 {
                    self.focus_idx = (self.focus_idx + 1) % count;
                }
            }
            KeyCode::Char(' ') | KeyCode::Enter | KeyCode::Char('n') => {
                self.state.toggle_notification(self.focus_idx);
            }
            _ => {}
        }
    }

    pub fn draw(&self, frame: &mut Frame, now: DateTime<Utc>) {
        let area = frame.area();

        // Clear background
        frame.render_widget(Block::default().style(theme::base()), area);

        let outer_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),  // header
                Constraint::Length(3),  // location
                Constraint::Length(12), // prayer grid
                Constraint::Length(4),  // next prayer
                Constraint::Min(0),
                Constraint::Length(1), // status bar
            ])
            .split(area);

        let zone = self.state.zone();
        let today = zone.date_of(now);
        let date_line = today.format("%A, %d %B %Y").to_string();
        let hijri = hijri_string(today, self.hijri_offset).ok();
        header::render(
            frame,
            outer_chunks[0],
            &HeaderInfo {
                zone_name: zone.name(),
                date_line: &date_line,
                hijri: hijri.as_deref(),
                phone: &self.phone,
            },
        );

        location::render(
            frame,
            outer_chunks[1],
            &self.state.location_text(),
            self.place_name.as_deref(),
        );

        prayers::render(
            frame,
            outer_chunks[2],
            self.state.prayers(),
            zone,
            now,
            self.focus_idx,
        );

        next_prayer::render(frame, outer_chunks[3], self.state.schedule(), zone, now);

        statusbar::render(frame, outer_chunks[5]);

        toasts::render(frame, area, self.state.toasts().items());

        if self.show_help {
            self.draw_help_overlay(frame);
        }
    }

    fn draw_help_overlay(&self, frame: &mut Frame) {
        let area = frame.area();

        // Center a help box
        let popup_area = Rect {
            x: area.width / 4,
            y: area.height / 4,
            width: area.width / 2,
            height: area.height / 2,
        };

        frame.render_widget(Clear, popup_area);

        let bindings = [
            ("  [← → ↑ ↓]    ", "Move between prayers"),
            ("  [Tab]        ", "Next prayer card"),
            ("  [Space] / n  ", "Toggle notification"),
            ("  [L]          ", "Sign out and quit"),
            ("  [?]          ", "Toggle help"),
            ("  [Esc] / q    ", "Quit"),
        ];

        let mut help_text = vec![
            Line::from(Span::styled(
                "  Keybindings",
                theme::gold().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        for (key, label) in bindings {
            help_text.push(Line::from(vec![
                Span::styled(key, theme::gold()),
                Span::styled(label, theme::dim()),
            ]));
        }
        help_text.push(Line::from(""));
        help_text.push(Line::from(Span::styled(
            format!("  Method: {}", self.state.method()),
            theme::dim(),
        )));

        let block = Block::default()
            .title(Span::styled(" Help ", theme::gold()))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::gold())
            .style(theme::surface());

        let paragraph = Paragraph::new(help_text).block(block);
        frame.render_widget(paragraph, popup_area);
    }
}

/// Run the dashboard event loop.
pub fn run(conn: &Connection, config: &AppConfig, provider: Box<dyn LocationProvider>) -> Result<()> {
    let mut state = DashboardState::new(
        Box::new(SalahEngine),
        config.calculation.method,
        config.calculation.madhab,
        config.display.toast_ttl(),
    );

    let resolver = SystemTimezone::new(config.display.timezone.clone());
    state.on_timezone(resolver.resolve(), Utc::now());

    let phone = SessionRepo::current(conn)?
        .map(|s| s.phone.to_string())
        .unwrap_or_default();
    let mut app = App::new(
        state,
        phone,
        config.location.name.clone(),
        config.display.hijri_offset,
    );

    let mut terminal = ratatui::init();
    let events = EventHandler::new(config.display.tick_rate());
    events.request_location(provider);

    let outcome = event_loop(&mut terminal, &events, &mut app);
    drop(events);
    ratatui::restore();
    outcome?;

    if app.signed_out {
        SessionRepo::clear(conn)?;
        log::info!("signed out");
        println!("Signed out.");
    }
    Ok(())
}

fn event_loop(
    terminal: &mut ratatui::DefaultTerminal,
    events: &EventHandler,
    app: &mut App,
) -> Result<()> {
    loop {
        let now = Utc::now();
        terminal.draw(|frame| app.draw(frame, now))?;

        match events.next()? {
            Event::Key(key) => {
                app.handle_key(key);
                if app.should_quit {
                    return Ok(());
                }
            }
            Event::Tick => {
                app.state.tick(Utc::now());
            }
            Event::Location(result) => {
                app.state.on_location(result, Utc::now());
            }
        }
    }
}

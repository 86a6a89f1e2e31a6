use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};
use rusqlite::Connection;
use std::time::Duration;

use crate::auth::{Authenticator, Credentials, Session, StubAuthenticator};
use crate::config::AppConfig;
use crate::db::repository::{MetaRepo, SessionRepo};
use crate::tui::events::{Event, EventHandler};
use crate::tui::theme;

// ─── Form state ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
enum Mode {
    Login,
    Register,
}

impl Mode {
    fn busy_text(self) -> &'static str {
        match self {
            Mode::Login => "Signing in…",
            Mode::Register => "Creating account…",
        }
    }

    fn submit_label(self) -> &'static str {
        match self {
            Mode::Login => "Sign in",
            Mode::Register => "Create account",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Field {
    Phone,
    Password,
}

struct LoginForm {
    mode: Mode,
    field: Field,
    phone: String,
    password: String,
    error: Option<String>,
    default_dial_code: String,
    // Validated credentials waiting to be sent.
    pending: Option<Credentials>,
    should_quit: bool,
}

impl LoginForm {
    fn new(mode: Mode, last_phone: Option<String>, default_dial_code: &str) -> Self {
        let field = if last_phone.is_some() {
            Field::Password
        } else {
            Field::Phone
        };
        Self {
            mode,
            field,
            phone: last_phone.unwrap_or_default(),
            password: String::new(),
            error: None,
            default_dial_code: default_dial_code.to_string(),
            pending: None,
            should_quit: false,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Left => self.set_mode(Mode::Login),
            KeyCode::Right => self.set_mode(Mode::Register),
            KeyCode::Tab | KeyCode::Down | KeyCode::Up | KeyCode::BackTab => {
                self.field = match self.field {
                    Field::Phone => Field::Password,
                    Field::Password => Field::Phone,
                };
            }
            KeyCode::Enter => match self.field {
                Field::Phone => self.field = Field::Password,
                Field::Password => self.submit(),
            },
            KeyCode::Backspace => {
                self.active_input().pop();
                self.error = None;
            }
            KeyCode::Char(c) => {
                self.active_input().push(c);
                self.error = None;
            }
            _ => {}
        }
    }

    fn set_mode(&mut self, mode: Mode) {
        if self.mode != mode {
            self.mode = mode;
            self.error = None;
        }
    }

    fn active_input(&mut self) -> &mut String {
        match self.field {
            Field::Phone => &mut self.phone,
            Field::Password => &mut self.password,
        }
    }

    fn submit(&mut self) {
        match Credentials::new(&self.phone, &self.password, &self.default_dial_code) {
            Ok(credentials) => {
                self.error = None;
                self.pending = Some(credentials);
            }
            Err(e) => self.error = Some(e.to_string()),
        }
    }
}

fn authenticate(
    authenticator: &dyn Authenticator,
    mode: Mode,
    credentials: &Credentials,
) -> Result<Session, crate::error::AuthError> {
    match mode {
        Mode::Login => authenticator.sign_in(credentials),
        Mode::Register => authenticator.register(credentials),
    }
}

// ─── Rendering ───────────────────────────────────────────────────────────────

fn draw(frame: &mut Frame, form: &LoginForm, busy: bool) {
    let area = frame.area();

    // Dark background
    frame.render_widget(Block::default().style(theme::base()), area);

    // Center the form box
    let vchunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(16),
            Constraint::Min(0),
        ])
        .split(area);

    let hchunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(54),
            Constraint::Min(0),
        ])
        .split(vchunks[1]);

    let box_area = hchunks[1];
    frame.render_widget(Clear, box_area);

    let outer_block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::gold())
        .style(theme::surface())
        .title(Span::styled(
            "  miqat  ·  Prayer Dashboard  ",
            theme::gold().add_modifier(Modifier::BOLD),
        ))
        .title_alignment(Alignment::Center);

    let inner = outer_block.inner(box_area);
    frame.render_widget(outer_block, box_area);

    let tab = |mode: Mode, label: &'static str| {
        if form.mode == mode {
            Span::styled(label, theme::gold().add_modifier(Modifier::BOLD | Modifier::UNDERLINED))
        } else {
            Span::styled(label, theme::dim())
        }
    };

    let mut lines = vec![
        Line::from(""),
        Line::from(vec![
            tab(Mode::Login, "Login"),
            Span::styled("    │    ", theme::border()),
            tab(Mode::Register, "Register"),
        ]),
        Line::from(""),
    ];

    let masked = "•".repeat(form.password.chars().count());
    lines.extend(field_lines("Phone", &form.phone, form.field == Field::Phone && !busy));
    lines.extend(field_lines("Password", &masked, form.field == Field::Password && !busy));

    if busy {
        lines.push(Line::from(Span::styled(
            form.mode.busy_text(),
            theme::accent().add_modifier(Modifier::BOLD),
        )));
    } else if let Some(err) = &form.error {
        lines.push(Line::from(Span::styled(format!("✗  {}", err), theme::red())));
    } else {
        lines.push(Line::from(Span::styled(
            format!("Enter  {}", form.mode.submit_label()),
            theme::dim(),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "←→  tab   ·   Tab  field   ·   Esc  cancel",
        theme::dim(),
    )));

    let para = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(para, inner);
}

fn field_lines<'a>(label: &'a str, value: &str, active: bool) -> Vec<Line<'a>> {
    let cursor = if active { "█" } else { "" };
    let style = if active {
        theme::accent().add_modifier(Modifier::BOLD)
    } else {
        theme::bold()
    };
    vec![
        Line::from(Span::styled(label, theme::dim())),
        Line::from(Span::styled(format!("{:<30}", format!("{}{}", value, cursor)), style)),
        Line::from(""),
    ]
}

// ─── Public entry point ──────────────────────────────────────────────────────

/// Show the login form until the user signs in or cancels.
///
/// Returns the new session, or `None` when the form was dismissed.
pub fn run_login_tui(conn: &Connection, config: &AppConfig, register: bool) -> Result<Option<Session>> {
    let mode = if register { Mode::Register } else { Mode::Login };
    let last_phone = MetaRepo::get(conn, "last_phone")?;
    let mut form = LoginForm::new(mode, last_phone, &config.auth.default_dial_code);
    let authenticator = StubAuthenticator::new(Duration::from_millis(config.auth.login_delay_ms));

    let mut terminal = ratatui::init();
    let events = EventHandler::new(Duration::from_millis(100));
    let outcome = form_loop(&mut terminal, &events, &mut form, conn, &authenticator);
    drop(events);
    ratatui::restore();
    outcome
}

fn form_loop(
    terminal: &mut ratatui::DefaultTerminal,
    events: &EventHandler,
    form: &mut LoginForm,
    conn: &Connection,
    authenticator: &dyn Authenticator,
) -> Result<Option<Session>> {
    loop {
        terminal.draw(|frame| draw(frame, form, false))?;

        match events.next()? {
            Event::Key(key) => {
                form.handle_key(key);
                if form.should_quit {
                    return Ok(None);
                }
                if let Some(credentials) = form.pending.take() {
                    terminal.draw(|frame| draw(frame, form, true))?;
                    match authenticate(authenticator, form.mode, &credentials) {
                        Ok(session) => {
                            SessionRepo::save(conn, &session)?;
                            return Ok(Some(session));
                        }
                        Err(e) => form.error = Some(e.to_string()),
                    }
                }
            }
            Event::Tick | Event::Location(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AuthError;
    use crate::tui::widgets::buffer_text;
    use crossterm::event::KeyModifiers;
    use ratatui::{backend::TestBackend, Terminal};

    fn press(form: &mut LoginForm, code: KeyCode) {
        form.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_str(form: &mut LoginForm, s: &str) {
        for c in s.chars() {
            press(form, KeyCode::Char(c));
        }
    }

    fn render(form: &LoginForm, busy: bool) -> String {
        let mut terminal = Terminal::new(TestBackend::new(70, 20)).unwrap();
        terminal.draw(|frame| draw(frame, form, busy)).unwrap();
        buffer_text(terminal.backend().buffer())
    }

    #[test]
    fn valid_input_produces_pending_credentials() {
        let mut form = LoginForm::new(Mode::Login, None, "1");
        type_str(&mut form, "555 123 4567");
        press(&mut form, KeyCode::Enter);
        type_str(&mut form, "hunter2");
        press(&mut form, KeyCode::Enter);

        let creds = form.pending.take().unwrap();
        assert_eq!(creds.phone.as_str(), "+15551234567");
        assert_eq!(creds.password, "hunter2");
        assert!(form.error.is_none());
    }

    #[test]
    fn missing_password_shows_error() {
        let mut form = LoginForm::new(Mode::Login, None, "1");
        type_str(&mut form, "5551234567");
        press(&mut form, KeyCode::Enter);
        press(&mut form, KeyCode::Enter);

        assert!(form.pending.is_none());
        assert_eq!(form.error.as_deref(), Some("Password is required"));
        assert!(render(&form, false).contains("Password is required"));
    }

    #[test]
    fn bad_phone_shows_error_and_typing_clears_it() {
        let mut form = LoginForm::new(Mode::Register, None, "1");
        type_str(&mut form, "12");
        press(&mut form, KeyCode::Tab);
        type_str(&mut form, "pw");
        press(&mut form, KeyCode::Enter);
        assert_eq!(
            form.error,
            Some(AuthError::InvalidPhone("12".into()).to_string())
        );

        press(&mut form, KeyCode::Backspace);
        assert!(form.error.is_none());
    }

    #[test]
    fn last_phone_is_prefilled_and_focus_starts_on_password() {
        let mut form = LoginForm::new(Mode::Login, Some("+447911123456".into()), "1");
        type_str(&mut form, "x");
        assert_eq!(form.phone, "+447911123456");
        assert_eq!(form.password, "x");
    }

    #[test]
    fn arrows_switch_tabs() {
        let mut form = LoginForm::new(Mode::Login, None, "1");
        press(&mut form, KeyCode::Right);
        assert_eq!(form.mode, Mode::Register);
        press(&mut form, KeyCode::Left);
        assert_eq!(form.mode, Mode::Login);
    }

    #[test]
    fn password_is_masked_and_busy_text_follows_mode() {
        let mut form = LoginForm::new(Mode::Register, Some("+15551234567".into()), "1");
        type_str(&mut form, "secret");
        let text = render(&form, true);
        assert!(!text.contains("secret"));
        assert!(text.contains("••••••"));
        assert!(text.contains("Creating account…"));

        form.set_mode(Mode::Login);
        assert!(render(&form, true).contains("Signing in…"));
    }

    #[test]
    fn authenticate_dispatches_on_mode() {
        let auth = StubAuthenticator::new(Duration::ZERO);
        let creds = Credentials::new("+15551234567", "pw", "1").unwrap();
        let session = authenticate(&auth, Mode::Register, &creds).unwrap();
        assert_eq!(session.phone, creds.phone);
        assert!(authenticate(&auth, Mode::Login, &creds).is_ok());
    }

    #[test]
    fn escape_cancels() {
        let mut form = LoginForm::new(Mode::Login, None, "1");
        press(&mut form, KeyCode::Esc);
        assert!(form.should_quit);
    }
}

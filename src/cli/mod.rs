pub mod args;
pub mod handlers;
pub mod login_tui;

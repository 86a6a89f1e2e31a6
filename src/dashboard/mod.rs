pub mod state;
pub mod toast;

pub use state::DashboardState;
pub use toast::{Toast, ToastQueue};

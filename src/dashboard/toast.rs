use chrono::{DateTime, Duration, Utc};

use crate::error::DashboardError;

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub title: String,
    pub description: String,
    pub raised_at: DateTime<Utc>,
}

/// Short-lived, non-blocking messages shown over the dashboard.
#[derive(Debug, Clone)]
pub struct ToastQueue {
    ttl: Duration,
    items: Vec<Toast>,
}

impl ToastQueue {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            items: Vec::new(),
        }
    }

    pub fn push_error(&mut self, err: &DashboardError, now: DateTime<Utc>) {
        log::warn!("{}", err);
        self.items.push(Toast {
            title: err.title().to_string(),
            description: err.description().to_string(),
            raised_at: now,
        });
    }

    pub fn expire(&mut self, now: DateTime<Utc>) {
        let ttl = self.ttl;
        self.items.retain(|t| now - t.raised_at < ttl);
    }

    pub fn items(&self) -> &[Toast] {
        &self.items
    }
}

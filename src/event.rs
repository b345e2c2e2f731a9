use crate::refresh::{RefreshReport, Trigger};

#[derive(Debug, Clone)]
pub enum AppEvent {
    RefreshStarted(Trigger),
    SignalsReady(RefreshReport),
    /// The cycle produced no table; the dashboard must not draw charts for it.
    DataUnavailable {
        trigger: Trigger,
        reason: String,
    },
    LogMessage(String),
    Error(String),
}

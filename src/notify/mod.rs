use serde::{Deserialize, Serialize};
use std::{fmt, sync::Arc};
use tracing::{info, warn};

pub mod toast;

pub use toast::{Toast, ToastNotifier, ToastPhase};

/// Severity of a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Success,
    Danger,
    Warning,
    Info,
}

impl Level {
    /// Stylesheet class used when rendering the notice
    pub fn css_class(&self) -> String {
        format!("alert-{}", self)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Danger => write!(f, "danger"),
            Self::Warning => write!(f, "warning"),
            Self::Info => write!(f, "info"),
        }
    }
}

/// Presents short-lived messages to the user.
///
/// Fire-and-forget: implementations must not block and callers never wait
/// for a notice to go away.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str, level: Level);
}

impl<T> Notifier for Arc<T>
where
    T: Notifier + ?Sized,
{
    fn notify(&self, message: &str, level: Level) {
        (**self).notify(message, level)
    }
}

/// Notifier for headless hosts that only writes notices to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str, level: Level) {
        match level {
            Level::Success | Level::Info => info!(%level, "{message}"),
            Level::Warning | Level::Danger => warn!(%level, "{message}"),
        }
    }
}

use crate::{
    config::ToastConfig,
    notify::{Level, Notifier},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::{runtime::Handle, time::sleep};
use tracing::debug;
use uuid::Uuid;

/// Where a toast is in its lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastPhase {
    Visible,
    /// Exit animation is running; removal follows
    Leaving,
}

/// A notice currently on screen
#[derive(Debug, Clone, Serialize)]
pub struct Toast {
    pub id: Uuid,
    pub message: String,
    pub level: Level,
    pub phase: ToastPhase,
    pub created_at: DateTime<Utc>,
}

/// Stack of auto-dismissing notices.
///
/// Each notice stays visible for the dwell time, then plays its exit
/// animation and is removed. Timers run on the current tokio runtime.
#[derive(Debug, Clone, Default)]
pub struct ToastNotifier {
    config: ToastConfig,
    toasts: Arc<Mutex<Vec<Toast>>>,
}

impl ToastNotifier {
    pub fn new(config: ToastConfig) -> Self {
        Self {
            config,
            toasts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Copy of the notices currently shown, oldest first
    pub fn toasts(&self) -> Vec<Toast> {
        lock(&self.toasts).clone()
    }

    /// Removes a notice right away
    pub fn dismiss(&self, id: Uuid) -> bool {
        let mut toasts = lock(&self.toasts);
        let before = toasts.len();
        toasts.retain(|t| t.id != id);
        toasts.len() != before
    }

    fn schedule_dismissal(&self, handle: Handle, id: Uuid) {
        let toasts = Arc::clone(&self.toasts);
        let config = self.config;

        handle.spawn(async move {
            sleep(config.dwell()).await;
            {
                let mut stack = lock(&toasts);
                if let Some(toast) = stack.iter_mut().find(|t| t.id == id) {
                    toast.phase = ToastPhase::Leaving;
                }
            }

            sleep(config.exit()).await;
            let mut stack = lock(&toasts);
            stack.retain(|t| t.id != id);
        });
    }
}

impl Notifier for ToastNotifier {
    fn notify(&self, message: &str, level: Level) {
        let toast = Toast {
            id: Uuid::new_v4(),
            message: message.to_string(),
            level,
            phase: ToastPhase::Visible,
            created_at: Utc::now(),
        };
        let id = toast.id;
        lock(&self.toasts).push(toast);

        match Handle::try_current() {
            Ok(handle) => self.schedule_dismissal(handle, id),
            Err(_) => debug!(%id, "no runtime available, toast stays until dismissed"),
        }
    }
}

// Poisoned locks still hold a consistent stack
fn lock(toasts: &Mutex<Vec<Toast>>) -> MutexGuard<'_, Vec<Toast>> {
    toasts.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

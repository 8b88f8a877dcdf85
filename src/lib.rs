//! # Dragboard Core
//!
//! Drag-and-drop synchronization for kanban status boards.
//!
//! A card dragged onto another column is moved only after the remote
//! status update succeeds; a failed update leaves the board as it was and
//! shows a notice. The crate has no dependency on a particular rendering
//! technology: hosts forward pointer events and render the board state.

pub mod config;
pub mod controller;
pub mod domain;
pub mod error;
pub mod initializer;
pub mod notify;
pub mod remote;

// Re-export commonly used types
pub use config::{DragPolicy, EndpointConfig, SyncConfig, ToastConfig};
pub use controller::{Claim, DragController, DragState, DropOutcome};
pub use domain::{
    board::{Board, BoardConfig, BoardSnapshot, Column},
    card::{Card, CardId, StatusId},
    counts::{reconcile_counts, ColumnCount},
};
pub use error::{BoardError, Result};
pub use initializer::{BoardEvent, BoardInitializer, WiredBoard};
pub use notify::{Level, LogNotifier, Notifier, ToastNotifier};
#[cfg(feature = "http-updater")]
pub use remote::HttpStatusUpdater;
pub use remote::{Outcome, StatusUpdater};

//! Drag session state machine.
//!
//! A card moves to another column only after the server confirms the new
//! status. Until then the board keeps showing the card where it was, so a
//! rejected update needs no rollback.

use crate::{
    config::DragPolicy,
    domain::{reconcile_counts, Board, CardId, ColumnCount, StatusId},
    notify::{Level, Notifier},
    remote::StatusUpdater,
};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

pub const MOVED_MESSAGE: &str = "Status updated successfully!";
pub const REJECTED_MESSAGE: &str = "Failed to update status";

/// Where the current drag gesture stands
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        card: CardId,
    },
    OverTarget {
        card: CardId,
        column: StatusId,
    },
}

impl DragState {
    /// The card being dragged, if any
    pub fn subject(&self) -> Option<&CardId> {
        match self {
            Self::Idle => None,
            Self::Dragging { card } | Self::OverTarget { card, .. } => Some(card),
        }
    }
}

/// Whether a handler took ownership of a gesture. The host suppresses its
/// default handling (propagation, browser drop refusal) for claimed ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Claim {
    Claimed,
    Unclaimed,
}

impl Claim {
    pub fn is_claimed(&self) -> bool {
        matches!(self, Self::Claimed)
    }
}

/// How a drop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// No drag was active or the column is unknown; nothing happened
    Ignored,
    /// The server accepted the status and the card changed column
    Moved,
    /// The update failed; the card stays where it was
    Rejected,
}

#[derive(Debug)]
struct Session {
    board: Board,
    state: DragState,
}

/// Counts one outstanding status update until dropped, including when the
/// `drop_on` future is cancelled mid-flight
struct InFlight(Arc<AtomicUsize>);

impl InFlight {
    fn start(pending: &Arc<AtomicUsize>) -> Self {
        pending.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(pending))
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Owns the board and the drag state machine.
///
/// Cloning is cheap and every clone drives the same board, so a host can
/// spawn `drop_on` and keep handling pointer events meanwhile.
pub struct DragController<U, N> {
    session: Arc<Mutex<Session>>,
    pending: Arc<AtomicUsize>,
    updater: Arc<U>,
    notifier: Arc<N>,
    policy: DragPolicy,
}

impl<U, N> Clone for DragController<U, N> {
    fn clone(&self) -> Self {
        Self {
            session: Arc::clone(&self.session),
            pending: Arc::clone(&self.pending),
            updater: Arc::clone(&self.updater),
            notifier: Arc::clone(&self.notifier),
            policy: self.policy,
        }
    }
}

impl<U, N> DragController<U, N>
where
    U: StatusUpdater,
    N: Notifier,
{
    pub fn new(board: Board, updater: U, notifier: N, policy: DragPolicy) -> Self {
        Self {
            session: Arc::new(Mutex::new(Session {
                board,
                state: DragState::Idle,
            })),
            pending: Arc::new(AtomicUsize::new(0)),
            updater: Arc::new(updater),
            notifier: Arc::new(notifier),
            policy,
        }
    }

    /// Starts dragging `card` and marks it as being dragged
    pub async fn drag_start(&self, card: &CardId) -> Claim {
        let mut session = self.session.lock().await;

        if self.policy.block_while_pending && self.pending.load(Ordering::SeqCst) > 0 {
            debug!(card = %card, "drag refused while a status update is pending");
            return Claim::Unclaimed;
        }
        if session.board.card(card).is_none() {
            debug!(card = %card, "drag start on unknown card");
            return Claim::Unclaimed;
        }

        if let Some(previous) = session.state.subject() {
            debug!(card = %card, previous = %previous, "replacing stale drag session");
        }
        session.board.clear_markers();
        session.board.set_dragging(Some(card.clone()));
        session.state = DragState::Dragging { card: card.clone() };
        debug!(card = %card, "drag started");
        Claim::Claimed
    }

    /// Pointer entered a column's drop zone; it becomes the only drop
    /// candidate
    pub async fn drag_over(&self, column: &StatusId) -> Claim {
        let mut session = self.session.lock().await;

        let Some(card) = session.state.subject().cloned() else {
            return Claim::Unclaimed;
        };
        if session.board.column(column).is_none() {
            return Claim::Unclaimed;
        }

        session.board.mark_drop_candidate(column.clone());
        session.state = DragState::OverTarget {
            card,
            column: column.clone(),
        };
        Claim::Claimed
    }

    /// Pointer left a column's drop zone without dropping
    pub async fn drag_leave(&self, column: &StatusId) {
        let mut session = self.session.lock().await;

        session.board.clear_drop_candidate(column);
        let left = match &session.state {
            DragState::OverTarget { card, column: over } if over == column => Some(card.clone()),
            _ => None,
        };
        if let Some(card) = left {
            session.state = DragState::Dragging { card };
        }
    }

    /// Drag gesture finished, with or without a drop
    pub async fn drag_end(&self, card: &CardId) {
        let mut session = self.session.lock().await;

        if session.board.is_dragging(card) {
            session.board.set_dragging(None);
        }
        if session.state.subject() == Some(card) {
            debug!(card = %card, "drag cancelled");
            session.board.clear_markers();
            session.state = DragState::Idle;
        }
    }

    /// Card released over `column`.
    ///
    /// Sends one status update and moves the card only once the server
    /// accepts it. The board lock is released while waiting, so other
    /// events keep being processed.
    pub async fn drop_on(&self, column: &StatusId) -> DropOutcome {
        let (card, in_flight) = {
            let mut session = self.session.lock().await;
            session.board.clear_drop_candidate(column);

            let Some(card) = std::mem::take(&mut session.state).subject().cloned() else {
                debug!(column = %column, "drop without an active drag ignored");
                return DropOutcome::Ignored;
            };
            if session.board.column(column).is_none() {
                debug!(card = %card, column = %column, "drop on unknown column ignored");
                return DropOutcome::Ignored;
            }

            (card, InFlight::start(&self.pending))
        };

        let outcome = self.updater.update_status(&card, column).await;

        let moved = {
            let mut session = self.session.lock().await;
            drop(in_flight);

            if outcome.is_success() {
                match session.board.move_card(&card, column) {
                    Ok(()) => {
                        reconcile_counts(&mut session.board);
                        true
                    }
                    Err(e) => {
                        warn!(card = %card, column = %column, "confirmed move not applied: {e}");
                        false
                    }
                }
            } else {
                false
            }
        };

        if moved {
            info!(card = %card, status = %column, "card moved");
            self.notifier.notify(MOVED_MESSAGE, Level::Success);
            DropOutcome::Moved
        } else {
            self.notifier.notify(REJECTED_MESSAGE, Level::Danger);
            DropOutcome::Rejected
        }
    }

    /// Recomputes every column badge
    pub async fn reconcile(&self) -> Vec<ColumnCount> {
        let mut session = self.session.lock().await;
        reconcile_counts(&mut session.board)
    }

    pub async fn state(&self) -> DragState {
        self.session.lock().await.state.clone()
    }

    /// Whether a status update is still waiting for the server
    pub async fn is_pending(&self) -> bool {
        self.pending.load(Ordering::SeqCst) > 0
    }

    pub async fn with_board<R>(&self, f: impl FnOnce(&Board) -> R) -> R {
        let session = self.session.lock().await;
        f(&session.board)
    }

    /// Gives the rendering layer write access, e.g. to add or remove cards
    pub async fn with_board_mut<R>(&self, f: impl FnOnce(&mut Board) -> R) -> R {
        let mut session = self.session.lock().await;
        f(&mut session.board)
    }
}

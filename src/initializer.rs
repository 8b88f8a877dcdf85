use crate::{
    config::DragPolicy,
    controller::{Claim, DragController},
    domain::{Board, CardId, StatusId},
    notify::Notifier,
    remote::StatusUpdater,
};
use std::collections::HashSet;
use tracing::debug;

/// Pointer events the host forwards to the board
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardEvent {
    DragStart(CardId),
    DragEnd(CardId),
    DragOver(StatusId),
    DragLeave(StatusId),
    Drop(StatusId),
    /// Plain click on a card; left to the host (navigation)
    Click(CardId),
}

/// Attaches the drag controller to every card and column present on the
/// board at startup
#[derive(Debug, Clone, Copy, Default)]
pub struct BoardInitializer {
    policy: DragPolicy,
}

impl BoardInitializer {
    pub fn new(policy: DragPolicy) -> Self {
        Self { policy }
    }

    pub fn wire<U, N>(self, board: Board, updater: U, notifier: N) -> WiredBoard<U, N>
    where
        U: StatusUpdater,
        N: Notifier,
    {
        let draggable: HashSet<CardId> = board.cards().map(|card| card.id.clone()).collect();
        let drop_zones: HashSet<StatusId> = board
            .columns()
            .iter()
            .map(|column| column.status.clone())
            .collect();
        debug!(
            cards = draggable.len(),
            columns = drop_zones.len(),
            "board wired for drag and drop"
        );

        WiredBoard {
            controller: DragController::new(board, updater, notifier, self.policy),
            draggable,
            drop_zones,
        }
    }
}

/// A board whose cards and columns respond to drag events
pub struct WiredBoard<U, N> {
    controller: DragController<U, N>,
    draggable: HashSet<CardId>,
    drop_zones: HashSet<StatusId>,
}

impl<U, N> WiredBoard<U, N>
where
    U: StatusUpdater,
    N: Notifier,
{
    pub fn controller(&self) -> &DragController<U, N> {
        &self.controller
    }

    pub fn is_draggable(&self, card: &CardId) -> bool {
        self.draggable.contains(card)
    }

    pub fn is_drop_zone(&self, column: &StatusId) -> bool {
        self.drop_zones.contains(column)
    }

    /// Routes a host event to the controller.
    ///
    /// Targets that did not exist when the board was wired have no
    /// handlers and stay unclaimed. A `Drop` waits for the status update;
    /// hosts that must not block spawn it on a clone of the controller.
    pub async fn dispatch(&self, event: BoardEvent) -> Claim {
        match event {
            BoardEvent::DragStart(card) if self.is_draggable(&card) => {
                self.controller.drag_start(&card).await
            }
            BoardEvent::DragEnd(card) if self.is_draggable(&card) => {
                self.controller.drag_end(&card).await;
                Claim::Unclaimed
            }
            BoardEvent::DragOver(column) if self.is_drop_zone(&column) => {
                self.controller.drag_over(&column).await
            }
            BoardEvent::DragLeave(column) if self.is_drop_zone(&column) => {
                self.controller.drag_leave(&column).await;
                Claim::Unclaimed
            }
            BoardEvent::Drop(column) if self.is_drop_zone(&column) => {
                self.controller.drop_on(&column).await;
                Claim::Claimed
            }
            BoardEvent::Click(_) => Claim::Unclaimed,
            other => {
                debug!(event = ?other, "event on element without drag handlers");
                Claim::Unclaimed
            }
        }
    }
}

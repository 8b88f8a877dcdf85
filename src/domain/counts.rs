use crate::domain::{board::Board, card::StatusId};

/// Number of cards displayed on a column badge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnCount {
    pub status: StatusId,
    pub count: usize,
}

/// Refreshes every column badge from the cards the column actually holds.
///
/// Returns the counts in column order. Running it again without moving
/// any card yields the same counts.
pub fn reconcile_counts(board: &mut Board) -> Vec<ColumnCount> {
    board
        .columns_mut()
        .iter_mut()
        .map(|column| {
            let count = column.len();
            column.set_displayed_count(count);
            ColumnCount {
                status: column.status.clone(),
                count,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::card::{Card, CardId};

    fn status(label: &str) -> StatusId {
        StatusId::from(label)
    }

    #[test]
    fn test_reconcile_updates_stale_badges() {
        let mut board = Board::default();
        board
            .insert_card(Card::new(CardId::from(1), status("New")))
            .unwrap();
        board
            .insert_card(Card::new(CardId::from(2), status("Repaired")))
            .unwrap();

        // Inserted after construction, so badges are still at zero
        assert_eq!(board.column(&status("New")).unwrap().displayed_count(), 0);

        let counts = reconcile_counts(&mut board);

        assert_eq!(
            counts,
            vec![
                ColumnCount { status: status("New"), count: 1 },
                ColumnCount { status: status("In Progress"), count: 0 },
                ColumnCount { status: status("Repaired"), count: 1 },
                ColumnCount { status: status("Scrap"), count: 0 },
            ]
        );
        assert_eq!(board.column(&status("New")).unwrap().displayed_count(), 1);
        assert_eq!(board.column(&status("Repaired")).unwrap().displayed_count(), 1);
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let mut board = Board::default();
        for id in 1..=3 {
            board
                .insert_card(Card::new(CardId::from(id), status("In Progress")))
                .unwrap();
        }

        let first = reconcile_counts(&mut board);
        let second = reconcile_counts(&mut board);

        assert_eq!(first, second);
        assert_eq!(
            board.column(&status("In Progress")).unwrap().displayed_count(),
            3
        );
    }

    #[test]
    fn test_reconcile_after_move() {
        let mut board = Board::default();
        board
            .insert_card(Card::new(CardId::from(1), status("New")))
            .unwrap();
        reconcile_counts(&mut board);

        board.move_card(&CardId::from(1), &status("Scrap")).unwrap();
        reconcile_counts(&mut board);

        assert_eq!(board.column(&status("New")).unwrap().displayed_count(), 0);
        assert_eq!(board.column(&status("Scrap")).unwrap().displayed_count(), 1);
    }
}

pub mod board;
pub mod card;
pub mod counts;

pub use board::{Board, BoardConfig, BoardSnapshot, Column, ColumnConfig, ColumnSnapshot};
pub use card::{Card, CardId, StatusId};
pub use counts::{reconcile_counts, ColumnCount};

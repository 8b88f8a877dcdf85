use crate::{
    domain::card::{Card, CardId, StatusId},
    error::{BoardError, Result},
};
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, path::Path};
use tokio::fs;

/// Configuration for a board column
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnConfig {
    pub name: String,
    pub status: StatusId,
}

impl ColumnConfig {
    pub fn new(name: impl Into<String>, status: impl Into<StatusId>) -> Self {
        Self {
            name: name.into(),
            status: status.into(),
        }
    }
}

/// Board configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    pub name: String,
    pub columns: Vec<ColumnConfig>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            name: "Maintenance Board".to_string(),
            columns: vec![
                ColumnConfig::new("New", "New"),
                ColumnConfig::new("In Progress", "In Progress"),
                ColumnConfig::new("Repaired", "Repaired"),
                ColumnConfig::new("Scrap", "Scrap"),
            ],
        }
    }
}

/// A status column and the cards it currently holds, in display order
#[derive(Debug, Clone)]
pub struct Column {
    pub name: String,
    pub status: StatusId,
    cards: Vec<CardId>,
    displayed_count: usize,
}

impl Column {
    fn new(config: ColumnConfig) -> Self {
        Self {
            name: config.name,
            status: config.status,
            cards: Vec::new(),
            displayed_count: 0,
        }
    }

    pub fn cards(&self) -> &[CardId] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// The count shown on the column badge, which lags behind `len()`
    /// until counts are reconciled
    pub fn displayed_count(&self) -> usize {
        self.displayed_count
    }

    pub(crate) fn set_displayed_count(&mut self, count: usize) {
        self.displayed_count = count;
    }

    pub fn contains(&self, id: &CardId) -> bool {
        self.cards.contains(id)
    }
}

/// Kanban board state as rendered to the user
#[derive(Debug, Clone)]
pub struct Board {
    pub name: String,
    columns: Vec<Column>,
    cards: HashMap<CardId, Card>,
    dragging: Option<CardId>,
    drop_candidate: Option<StatusId>,
}

impl Board {
    /// Creates an empty board with the configured columns
    pub fn new(config: BoardConfig) -> Result<Self> {
        let mut columns: Vec<Column> = Vec::with_capacity(config.columns.len());
        for column in config.columns {
            if columns.iter().any(|c| c.status == column.status) {
                return Err(BoardError::DuplicateColumn(column.status.to_string()));
            }
            columns.push(Column::new(column));
        }

        Ok(Self {
            name: config.name,
            columns,
            cards: HashMap::new(),
            dragging: None,
            drop_candidate: None,
        })
    }

    /// Builds the board from what the rendering layer produced. Badge
    /// counts start out matching the cards.
    pub fn from_snapshot(snapshot: BoardSnapshot) -> Result<Self> {
        let config = BoardConfig {
            name: snapshot.name,
            columns: snapshot
                .columns
                .iter()
                .map(|c| ColumnConfig::new(c.display_name(), c.status.clone()))
                .collect(),
        };
        let mut board = Self::new(config)?;

        for column in snapshot.columns {
            for card in column.cards {
                if card.status != column.status {
                    return Err(BoardError::StatusMismatch {
                        card: card.id.to_string(),
                        status: card.status.to_string(),
                        column: column.status.to_string(),
                    });
                }
                board.insert_card(card)?;
            }
        }

        for column in &mut board.columns {
            column.displayed_count = column.cards.len();
        }

        Ok(board)
    }

    /// Captures the current cards and columns
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            name: self.name.clone(),
            columns: self
                .columns
                .iter()
                .map(|column| ColumnSnapshot {
                    name: column.name.clone(),
                    status: column.status.clone(),
                    cards: column
                        .cards
                        .iter()
                        .filter_map(|id| self.cards.get(id).cloned())
                        .collect(),
                })
                .collect(),
        }
    }

    /// Places a card at the end of the column matching its status
    pub fn insert_card(&mut self, card: Card) -> Result<()> {
        if self.cards.contains_key(&card.id) {
            return Err(BoardError::DuplicateCard(card.id.to_string()));
        }

        let column = self
            .column_mut(&card.status)
            .ok_or_else(|| BoardError::ColumnNotFound(card.status.to_string()))?;
        column.cards.push(card.id.clone());
        self.cards.insert(card.id.clone(), card);
        Ok(())
    }

    /// Removes a card from the board entirely
    pub fn remove_card(&mut self, id: &CardId) -> Result<Card> {
        let card = self
            .cards
            .remove(id)
            .ok_or_else(|| BoardError::CardNotFound(id.to_string()))?;

        if let Some(column) = self.column_mut(&card.status) {
            column.cards.retain(|c| c != id);
        }
        if self.dragging.as_ref() == Some(id) {
            self.dragging = None;
        }
        Ok(card)
    }

    /// Moves a card to the end of the target column and updates its
    /// status in the same step
    pub fn move_card(&mut self, id: &CardId, target: &StatusId) -> Result<()> {
        if self.column(target).is_none() {
            return Err(BoardError::ColumnNotFound(target.to_string()));
        }
        let current = self
            .cards
            .get(id)
            .map(|card| card.status.clone())
            .ok_or_else(|| BoardError::CardNotFound(id.to_string()))?;

        if let Some(column) = self.column_mut(&current) {
            column.cards.retain(|c| c != id);
        }
        if let Some(column) = self.column_mut(target) {
            column.cards.push(id.clone());
        }
        if let Some(card) = self.cards.get_mut(id) {
            card.set_status(target.clone());
        }
        Ok(())
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub(crate) fn columns_mut(&mut self) -> &mut [Column] {
        &mut self.columns
    }

    /// Gets the column for a status
    pub fn column(&self, status: &StatusId) -> Option<&Column> {
        self.columns.iter().find(|col| &col.status == status)
    }

    fn column_mut(&mut self, status: &StatusId) -> Option<&mut Column> {
        self.columns.iter_mut().find(|col| &col.status == status)
    }

    pub fn card(&self, id: &CardId) -> Option<&Card> {
        self.cards.get(id)
    }

    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.cards.values()
    }

    /// Gets the status of the column currently holding a card
    pub fn column_of(&self, id: &CardId) -> Option<&StatusId> {
        self.columns
            .iter()
            .find(|col| col.contains(id))
            .map(|col| &col.status)
    }

    /// Verifies that every card sits in exactly one column and that the
    /// column matches the card's status
    pub fn check_invariants(&self) -> Result<()> {
        let mut placed = 0;
        for column in &self.columns {
            for id in &column.cards {
                let card = self
                    .cards
                    .get(id)
                    .ok_or_else(|| BoardError::CardNotFound(id.to_string()))?;
                if card.status != column.status {
                    return Err(BoardError::StatusMismatch {
                        card: id.to_string(),
                        status: card.status.to_string(),
                        column: column.status.to_string(),
                    });
                }
                placed += 1;
            }
        }

        if placed != self.cards.len() {
            let stray = self
                .cards
                .keys()
                .find(|id| self.columns.iter().filter(|c| c.contains(id)).count() != 1)
                .map(|id| id.to_string())
                .unwrap_or_default();
            return Err(BoardError::MisplacedCard(stray));
        }
        Ok(())
    }

    /// The card currently carrying the "being dragged" marker
    pub fn dragging(&self) -> Option<&CardId> {
        self.dragging.as_ref()
    }

    pub fn is_dragging(&self, id: &CardId) -> bool {
        self.dragging.as_ref() == Some(id)
    }

    pub(crate) fn set_dragging(&mut self, id: Option<CardId>) {
        self.dragging = id;
    }

    /// The column currently carrying the drop-candidate marker
    pub fn drop_candidate(&self) -> Option<&StatusId> {
        self.drop_candidate.as_ref()
    }

    pub fn is_drop_candidate(&self, status: &StatusId) -> bool {
        self.drop_candidate.as_ref() == Some(status)
    }

    /// Marks a column as the drop candidate, taking the marker away from
    /// any other column
    pub(crate) fn mark_drop_candidate(&mut self, status: StatusId) {
        self.drop_candidate = Some(status);
    }

    /// Clears the drop-candidate marker if `status` holds it
    pub(crate) fn clear_drop_candidate(&mut self, status: &StatusId) -> bool {
        if self.is_drop_candidate(status) {
            self.drop_candidate = None;
            true
        } else {
            false
        }
    }

    pub(crate) fn clear_markers(&mut self) {
        self.dragging = None;
        self.drop_candidate = None;
    }
}

impl Default for Board {
    fn default() -> Self {
        let config = BoardConfig::default();
        Self {
            name: config.name,
            columns: config.columns.into_iter().map(Column::new).collect(),
            cards: HashMap::new(),
            dragging: None,
            drop_candidate: None,
        }
    }
}

/// A rendered column as handed over by the rendering layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnSnapshot {
    #[serde(default)]
    pub name: String,
    pub status: StatusId,
    #[serde(default)]
    pub cards: Vec<Card>,
}

impl ColumnSnapshot {
    fn display_name(&self) -> String {
        if self.name.is_empty() {
            self.status.to_string()
        } else {
            self.name.clone()
        }
    }
}

/// The rendered board: its columns and the cards inside them
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardSnapshot {
    #[serde(default)]
    pub name: String,
    pub columns: Vec<ColumnSnapshot>,
}

impl BoardSnapshot {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a snapshot from a JSON file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref()).await?;
        Self::from_json_str(&contents)
    }
}

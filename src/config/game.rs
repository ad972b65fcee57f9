use serde::{Deserialize, Serialize};

use crate::components::PieceKind;
use crate::game::{BOARD_COLS, BOARD_ROWS, QUEUE_LOOKAHEAD};

// Gameplay tuning. Dimensions are read once at engine construction and
// stay fixed for the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameplayConfig {
    pub board_cols: usize,
    pub board_rows: usize,
    pub lookahead: usize,
}

impl Default for GameplayConfig {
    fn default() -> Self {
        Self {
            board_cols: BOARD_COLS,
            board_rows: BOARD_ROWS,
            lookahead: QUEUE_LOOKAHEAD,
        }
    }
}

impl GameplayConfig {
    /// Clamps the configured values to the smallest board the catalog can
    /// play on. Every shape must fit the grid, and the queue needs at
    /// least one pending piece.
    #[must_use]
    pub fn sanitized(&self) -> Self {
        Self {
            board_cols: self.board_cols.max(PieceKind::max_width()),
            board_rows: self.board_rows.max(PieceKind::max_height()),
            lookahead: self.lookahead.max(1),
        }
    }
}

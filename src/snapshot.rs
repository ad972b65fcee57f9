//! Read-only views of the engine state, consumed by the renderer and
//! audio trigger. Snapshots are owned values; readers never touch the
//! world directly.

use crate::components::{PieceKind, Position};

#[derive(Debug, Clone, PartialEq)]
pub struct ActiveView {
    pub kind: PieceKind,
    pub color: ratatui::style::Color,
    pub matrix: Vec<Vec<u8>>,
    pub position: Position,
    /// Row the piece would land on if dropped from its current position.
    pub ghost_row: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PiecePreview {
    pub kind: PieceKind,
    pub color: ratatui::style::Color,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameSnapshot {
    pub cols: usize,
    pub rows: usize,
    pub cells: Vec<Vec<Option<PieceKind>>>,
    pub active: Option<ActiveView>,
    pub queue: Vec<PiecePreview>,
    pub held: Option<PieceKind>,
    pub can_hold: bool,
    pub score: u32,
    pub level: u32,
    pub lines_cleared: u32,
    pub paused: bool,
    pub game_over: bool,
}

impl GameSnapshot {
    /// True while commands other than pause/restart have an effect.
    #[must_use]
    pub fn playable(&self) -> bool {
        !self.game_over && !self.paused
    }
}

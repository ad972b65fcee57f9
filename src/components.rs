#![warn(clippy::all, clippy::pedantic)]
#![allow(
    // Allow truncation when casting from usize to i32 since board dimensions are always small enough to fit in i32
    clippy::cast_possible_truncation,
    // Allow sign loss when going from signed to unsigned types since we validate values are non-negative before casting
    clippy::cast_sign_loss,
    // Allow potential wrapping when casting between types of same size as we validate values are in range
    clippy::cast_possible_wrap
)]

use bevy_ecs::prelude::*;
use std::collections::VecDeque;

use crate::game::{
    INITIAL_DROP_INTERVAL_MS, LINES_PER_LEVEL, LINE_SCORES, QUEUE_LOOKAHEAD, SPIN_NO_LINES_SCORE,
    SPIN_SCORES, drop_interval_ms,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    // Standard tetrominoes
    I,
    T,
    Z,
    S,
    O,
    L,
    J,
    // Pentominoes
    I5,
    Y,
    Plus,
    U,
    // Small pieces
    Dot,
    Line2,
    Line3,
}

impl PieceKind {
    pub const ALL: [PieceKind; 14] = [
        PieceKind::I,
        PieceKind::T,
        PieceKind::Z,
        PieceKind::S,
        PieceKind::O,
        PieceKind::L,
        PieceKind::J,
        PieceKind::I5,
        PieceKind::Y,
        PieceKind::Plus,
        PieceKind::U,
        PieceKind::Dot,
        PieceKind::Line2,
        PieceKind::Line3,
    ];

    /// Uniform draw over the whole catalog. No bag, no fairness guarantee.
    #[must_use]
    pub fn random() -> Self {
        Self::ALL[fastrand::usize(..Self::ALL.len())]
    }

    #[must_use]
    pub fn base_matrix(self) -> Vec<Vec<u8>> {
        match self {
            PieceKind::I => vec![vec![1, 1, 1, 1]],
            PieceKind::T => vec![vec![1, 1, 1], vec![0, 1, 0]],
            PieceKind::Z => vec![vec![1, 1, 0], vec![0, 1, 1]],
            PieceKind::S => vec![vec![0, 1, 1], vec![1, 1, 0]],
            PieceKind::O => vec![vec![1, 1], vec![1, 1]],
            PieceKind::L => vec![vec![1, 0, 0], vec![1, 1, 1]],
            PieceKind::J => vec![vec![0, 0, 1], vec![1, 1, 1]],
            PieceKind::I5 => vec![vec![1, 1, 1, 1, 1]],
            PieceKind::Y => vec![vec![1, 1, 0], vec![0, 1, 1], vec![0, 1, 0]],
            PieceKind::Plus => vec![vec![0, 1, 0], vec![1, 1, 1], vec![0, 1, 0]],
            PieceKind::U => vec![vec![1, 1, 1], vec![1, 0, 1]],
            PieceKind::Dot => vec![vec![1]],
            PieceKind::Line2 => vec![vec![1, 1]],
            PieceKind::Line3 => vec![vec![1, 1, 1]],
        }
    }

    /// Index into the fixed color palette; 0 is reserved for empty cells.
    #[must_use]
    pub fn palette_index(self) -> u8 {
        match self {
            PieceKind::I => 1,
            PieceKind::T => 2,
            PieceKind::Z => 3,
            PieceKind::S => 4,
            PieceKind::O => 5,
            PieceKind::L => 6,
            PieceKind::J => 7,
            PieceKind::I5 => 8,
            PieceKind::Y => 9,
            PieceKind::Plus => 10,
            PieceKind::U => 11,
            PieceKind::Dot => 12,
            PieceKind::Line2 => 13,
            PieceKind::Line3 => 14,
        }
    }

    #[must_use]
    pub fn color(self) -> ratatui::style::Color {
        use ratatui::style::Color;
        match self {
            PieceKind::I => Color::Cyan,
            PieceKind::T => Color::Magenta,
            PieceKind::Z => Color::Red,
            PieceKind::S => Color::Green,
            PieceKind::O => Color::Yellow,
            PieceKind::L => Color::LightYellow,
            PieceKind::J => Color::Blue,
            PieceKind::I5 => Color::Rgb(255, 0, 255),
            PieceKind::Y => Color::Rgb(51, 255, 221),
            PieceKind::Plus => Color::Rgb(255, 215, 0),
            PieceKind::U => Color::Rgb(124, 252, 0),
            PieceKind::Dot => Color::Rgb(255, 20, 147),
            PieceKind::Line2 => Color::Rgb(173, 255, 47),
            PieceKind::Line3 => Color::Rgb(123, 104, 238),
        }
    }

    /// Checks the shape table once at engine construction: rectangular
    /// matrices, 0/1 entries, at least one filled cell per shape. A broken
    /// table is a precondition violation, so this panics rather than
    /// returning an error.
    pub fn verify_catalog() {
        for kind in Self::ALL {
            let matrix = kind.base_matrix();
            assert!(!matrix.is_empty(), "piece {kind:?} has an empty shape");
            let width = matrix[0].len();
            assert!(width > 0, "piece {kind:?} has zero-width rows");
            for row in &matrix {
                assert_eq!(row.len(), width, "piece {kind:?} rows differ in length");
            }
            assert!(
                matrix.iter().flatten().all(|&cell| cell <= 1),
                "piece {kind:?} contains values other than 0/1"
            );
            assert!(
                matrix.iter().flatten().any(|&cell| cell == 1),
                "piece {kind:?} has no filled cells"
            );
        }
    }

    /// Widest shape in the catalog; the board must be at least this wide.
    #[must_use]
    pub fn max_width() -> usize {
        Self::ALL
            .iter()
            .map(|kind| kind.base_matrix()[0].len())
            .max()
            .unwrap_or(0)
    }

    /// Tallest shape in the catalog; the board must be at least this tall.
    #[must_use]
    pub fn max_height() -> usize {
        Self::ALL
            .iter()
            .map(|kind| kind.base_matrix().len())
            .max()
            .unwrap_or(0)
    }
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    pub kind: PieceKind,
    pub matrix: Vec<Vec<u8>>,
}

impl Piece {
    #[must_use]
    pub fn new(kind: PieceKind) -> Self {
        Self {
            kind,
            matrix: kind.base_matrix(),
        }
    }

    #[must_use]
    pub fn random() -> Self {
        Self::new(PieceKind::random())
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.matrix.first().map_or(0, Vec::len)
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.matrix.len()
    }

    /// Horizontally centered spawn position at the top of the board.
    #[must_use]
    pub fn spawn_position(&self, board_cols: usize) -> Position {
        Position {
            x: (board_cols / 2) as i32 - (self.width() / 2) as i32,
            y: 0,
        }
    }
}

#[derive(Resource, Debug, Clone)]
pub struct Board {
    pub cols: usize,
    pub rows: usize,
    pub cells: Vec<Vec<Option<PieceKind>>>,
}

impl Board {
    #[must_use]
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            cells: vec![vec![None; cols]; rows],
        }
    }

    pub fn clear(&mut self) {
        for row in &mut self.cells {
            row.fill(None);
        }
    }

    /// Collision test for a piece at a given position. Columns outside the
    /// board and rows below the floor collide; rows above the top of the
    /// board are ignored so a piece may spawn straddling the top edge.
    #[must_use]
    pub fn collides(&self, position: Position, piece: &Piece) -> bool {
        for (dy, matrix_row) in piece.matrix.iter().enumerate() {
            for (dx, &cell) in matrix_row.iter().enumerate() {
                if cell == 0 {
                    continue;
                }

                let col = position.x + dx as i32;
                let row = position.y + dy as i32;

                if col < 0 || col >= self.cols as i32 {
                    return true;
                }
                if row >= self.rows as i32 {
                    return true;
                }
                if row < 0 {
                    continue;
                }
                if self.cells[row as usize][col as usize].is_some() {
                    return true;
                }
            }
        }

        false
    }

    /// Writes the piece into the grid. Irreversible; called only at lock
    /// time, after `collides` has vetted the position.
    pub fn merge(&mut self, position: Position, piece: &Piece) {
        for (dy, matrix_row) in piece.matrix.iter().enumerate() {
            for (dx, &cell) in matrix_row.iter().enumerate() {
                if cell == 0 {
                    continue;
                }

                let col = position.x + dx as i32;
                let row = position.y + dy as i32;

                if col >= 0 && col < self.cols as i32 && row >= 0 && row < self.rows as i32 {
                    self.cells[row as usize][col as usize] = Some(piece.kind);
                }
            }
        }
    }

    /// Removes every full row, inserts empty rows at the top, and returns
    /// how many rows were cleared. The relative order of the remaining
    /// rows is preserved.
    pub fn sweep(&mut self) -> usize {
        let mut kept: Vec<Vec<Option<PieceKind>>> = Vec::with_capacity(self.rows);
        for row in self.cells.drain(..) {
            if row.iter().all(Option::is_some) {
                continue;
            }
            kept.push(row);
        }

        let cleared = self.rows - kept.len();
        let mut cells = vec![vec![None; self.cols]; cleared];
        cells.append(&mut kept);
        self.cells = cells;

        cleared
    }

    /// Lowest row the piece can occupy from its current position without
    /// colliding. Used for the ghost-piece preview.
    #[must_use]
    pub fn landing_row(&self, position: Position, piece: &Piece) -> i32 {
        let mut y = position.y;
        while !self.collides(Position { x: position.x, y: y + 1 }, piece) {
            y += 1;
        }
        y
    }
}

#[derive(Resource, Debug, Clone)]
pub struct PieceQueue {
    pending: VecDeque<Piece>,
    lookahead: usize,
}

impl PieceQueue {
    #[must_use]
    pub fn new(lookahead: usize) -> Self {
        let mut queue = Self {
            pending: VecDeque::with_capacity(lookahead),
            lookahead,
        };
        queue.refill();
        queue
    }

    pub fn refill(&mut self) {
        while self.pending.len() < self.lookahead {
            self.pending.push_back(Piece::random());
        }
    }

    /// Pops the front of the queue and tops it back up to the lookahead
    /// depth, so the preview never shrinks.
    pub fn pop_next(&mut self) -> Piece {
        self.refill();
        let piece = self.pending.pop_front().unwrap_or_else(Piece::random);
        self.refill();
        piece
    }

    #[must_use]
    pub fn lookahead(&self) -> usize {
        self.lookahead
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Piece> {
        self.pending.iter()
    }
}

impl Default for PieceQueue {
    fn default() -> Self {
        Self::new(QUEUE_LOOKAHEAD)
    }
}

#[derive(Resource, Debug, Clone)]
pub struct HoldSlot {
    pub kind: Option<PieceKind>,
    pub can_hold: bool,
}

impl Default for HoldSlot {
    fn default() -> Self {
        Self {
            kind: None,
            can_hold: true,
        }
    }
}

// Command surface consumed by the engine; invalid commands for the current
// state are no-ops, never errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    MoveLeft,
    MoveRight,
    SoftDrop,
    RotateCw,
    RotateCcw,
    HardDrop,
    Hold,
    TogglePause,
    Start,
    Restart,
}

// State changes the out-of-scope audio trigger listens for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Moved,
    Rotated,
    Locked,
    LinesCleared(usize),
    SpinBonus,
    LevelUp(u32),
    Held,
    GameOver,
}

#[derive(Debug, Resource, Clone)]
pub struct GameState {
    pub score: u32,
    pub level: u32,
    pub lines_cleared: u32,
    pub game_over: bool,
    pub spin_count: u32,
    pub last_move_was_rotate: bool,
    pub drop_interval_ms: f32,
    pub drop_timer_ms: f32,
    pub events: Vec<GameEvent>,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            score: 0,
            level: 0,
            lines_cleared: 0,
            game_over: false,
            spin_count: 0,
            last_move_was_rotate: false,
            drop_interval_ms: INITIAL_DROP_INTERVAL_MS,
            drop_timer_ms: 0.0,
            events: Vec::new(),
        }
    }
}

impl GameState {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // Spin test, evaluated before merging at lock time:
    // 1. The piece is the T kind
    // 2. The last successful move was a rotation
    // 3. At least 3 of the 4 corners of the 3x3 box at the piece position
    //    are occupied or outside the board
    // 4. The piece cannot move down one more row
    #[must_use]
    pub fn is_spin(&self, board: &Board, position: Position, piece: &Piece) -> bool {
        if piece.kind != PieceKind::T || !self.last_move_was_rotate {
            return false;
        }

        let corners = [
            (position.x, position.y),
            (position.x + 2, position.y),
            (position.x, position.y + 2),
            (position.x + 2, position.y + 2),
        ];

        let mut occupied = 0;
        for (x, y) in corners {
            if x < 0 || x >= board.cols as i32 || y < 0 || y >= board.rows as i32 {
                occupied += 1;
                continue;
            }
            if board.cells[y as usize][x as usize].is_some() {
                occupied += 1;
            }
        }

        if occupied < 3 {
            return false;
        }

        // Wedge check: a piece that can still fall one row is not a spin.
        let below = Position {
            x: position.x,
            y: position.y + 1,
        };
        board.collides(below, piece)
    }

    /// Applies lock scoring for `cleared` rows, with the spin flag decided
    /// before the merge. Points use the level in effect before this clear
    /// is counted; the level and drop interval update afterwards.
    pub fn update_score(&mut self, cleared: usize, spin: bool) {
        let multiplier = self.level + 1;

        let points = if spin {
            if cleared == 0 {
                self.spin_count += 1;
                self.push_event(GameEvent::SpinBonus);
                SPIN_NO_LINES_SCORE
            } else if cleared < SPIN_SCORES.len() {
                self.spin_count += 1;
                self.push_event(GameEvent::SpinBonus);
                SPIN_SCORES[cleared]
            } else {
                // The spin table has no four-row entry; score from the
                // line table instead of indexing out of range.
                LINE_SCORES[cleared.min(LINE_SCORES.len() - 1)]
            }
        } else {
            LINE_SCORES[cleared.min(LINE_SCORES.len() - 1)]
        };

        self.score += points * multiplier;
        self.lines_cleared += cleared as u32;

        let new_level = self.lines_cleared / LINES_PER_LEVEL;
        if new_level > self.level {
            self.level = new_level;
            self.drop_interval_ms = drop_interval_ms(new_level);
            self.push_event(GameEvent::LevelUp(new_level));
        }
    }
}

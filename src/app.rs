#![warn(clippy::all, clippy::pedantic)]

use bevy_ecs::prelude::*;
use log::info;

use crate::Time;
use crate::components::{
    Board, Command, GameEvent, GameState, HoldSlot, Piece, PieceKind, PieceQueue, Position,
};
use crate::config::Config;
use crate::config::game::GameplayConfig;
use crate::snapshot::{ActiveView, GameSnapshot, PiecePreview};
use crate::systems;

/// Game-loop state machine. `GameOver` is entered only through the spawn
/// collision check; every other transition is command-driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Running,
    Paused,
    GameOver,
}

pub struct App {
    pub world: World,
    pub phase: Phase,
}

impl App {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(&GameplayConfig::default())
    }

    /// Builds an engine from the on-disk configuration, falling back to
    /// defaults when the file is missing or malformed.
    #[must_use]
    pub fn from_config_file() -> Self {
        Self::with_config(&Config::load_or_default().game)
    }

    #[must_use]
    pub fn with_config(config: &GameplayConfig) -> Self {
        PieceKind::verify_catalog();
        let config = config.sanitized();

        let mut world = World::new();
        world.insert_resource(Time::new());
        world.insert_resource(GameState::default());
        world.insert_resource(Board::new(config.board_cols, config.board_rows));
        world.insert_resource(PieceQueue::new(config.lookahead));
        world.insert_resource(HoldSlot::default());

        Self {
            world,
            phase: Phase::Idle,
        }
    }

    /// Routes one command. Commands invalid for the current phase are
    /// silent no-ops.
    pub fn handle_command(&mut self, command: Command) {
        match (self.phase, command) {
            (Phase::Idle, Command::Start) => self.start(),
            (Phase::Running | Phase::Paused | Phase::GameOver, Command::Restart) => self.start(),
            (Phase::Running, Command::TogglePause) => {
                info!("Paused");
                self.phase = Phase::Paused;
            }
            (Phase::Paused, Command::TogglePause) => self.resume(),
            (Phase::Running, command) => {
                self.dispatch(command);
                self.sync_phase();
            }
            _ => {}
        }
    }

    /// One scheduler tick. Running games accumulate elapsed time toward
    /// the automatic drop; in any other phase the clock is left alone.
    pub fn tick(&mut self) {
        if self.phase != Phase::Running {
            return;
        }

        let delta_ms = {
            let mut time = self.world.resource_mut::<Time>();
            time.update();
            time.delta_millis()
        };

        systems::gravity_system(&mut self.world, delta_ms);
        self.sync_phase();
    }

    /// Pending events for the out-of-scope audio trigger. Draining is the
    /// only mutation a reader performs, and it goes through the engine.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.world.resource_mut::<GameState>().take_events()
    }

    #[must_use]
    pub fn snapshot(&mut self) -> GameSnapshot {
        let active = {
            let mut query = self.world.query::<(&Piece, &Position)>();
            query
                .iter(&self.world)
                .next()
                .map(|(piece, position)| (piece.clone(), *position))
        };

        let board = self.world.resource::<Board>();
        let queue = self.world.resource::<PieceQueue>();
        let hold = self.world.resource::<HoldSlot>();
        let game_state = self.world.resource::<GameState>();

        let active = active.map(|(piece, position)| ActiveView {
            kind: piece.kind,
            color: piece.kind.color(),
            ghost_row: board.landing_row(position, &piece),
            matrix: piece.matrix,
            position,
        });

        GameSnapshot {
            cols: board.cols,
            rows: board.rows,
            cells: board.cells.clone(),
            active,
            queue: queue
                .iter()
                .map(|piece| PiecePreview {
                    kind: piece.kind,
                    color: piece.kind.color(),
                })
                .collect(),
            held: hold.kind,
            can_hold: hold.can_hold,
            score: game_state.score,
            level: game_state.level,
            lines_cleared: game_state.lines_cleared,
            paused: self.phase == Phase::Paused,
            game_over: game_state.game_over,
        }
    }

    fn dispatch(&mut self, command: Command) {
        match command {
            Command::MoveLeft => systems::move_horizontal(&mut self.world, -1),
            Command::MoveRight => systems::move_horizontal(&mut self.world, 1),
            Command::SoftDrop => systems::soft_drop(&mut self.world),
            Command::HardDrop => systems::hard_drop(&mut self.world),
            Command::RotateCw => systems::rotate_active(&mut self.world, 1),
            Command::RotateCcw => systems::rotate_active(&mut self.world, -1),
            Command::Hold => systems::hold_piece(&mut self.world),
            Command::Start | Command::Restart | Command::TogglePause => {}
        }
    }

    /// Full reset: empty grid, fresh queue and hold slot, zeroed scores,
    /// then the first spawn. Grid dimensions and lookahead are fixed for
    /// the session and carry over.
    fn start(&mut self) {
        info!("Starting new game");

        let (cols, rows) = {
            let board = self.world.resource::<Board>();
            (board.cols, board.rows)
        };
        let lookahead = self.world.resource::<PieceQueue>().lookahead();

        let leftovers: Vec<Entity> = self
            .world
            .query_filtered::<Entity, With<Piece>>()
            .iter(&self.world)
            .collect();
        for entity in leftovers {
            self.world.despawn(entity);
        }

        self.world.insert_resource(GameState::default());
        self.world.insert_resource(Board::new(cols, rows));
        self.world.insert_resource(PieceQueue::new(lookahead));
        self.world.insert_resource(HoldSlot::default());
        self.world.resource_mut::<Time>().reset();

        systems::spawn_next_piece(&mut self.world);
        self.phase = Phase::Running;
    }

    fn resume(&mut self) {
        // Re-baseline the clock so the paused span never reaches the
        // drop timer.
        self.world.resource_mut::<Time>().reset();
        self.phase = Phase::Running;
        info!("Resumed");
    }

    fn sync_phase(&mut self) {
        if self.phase == Phase::Running && self.world.resource::<GameState>().game_over {
            self.phase = Phase::GameOver;
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

#![warn(clippy::all, clippy::pedantic)]

pub mod systems_tests;

// Shared test utilities
#[cfg(test)]
pub mod test_utils {
    use crate::Time;
    use crate::app::App;
    use crate::components::{
        Board, Command, GameState, HoldSlot, Piece, PieceKind, PieceQueue, Position,
    };
    use crate::game::{BOARD_COLS, BOARD_ROWS, QUEUE_LOOKAHEAD};
    use bevy_ecs::prelude::*;

    // Helper function to create a world with the standard game resources
    #[must_use]
    pub fn create_test_world() -> World {
        let mut world = World::new();
        world.insert_resource(Time::new());
        world.insert_resource(GameState::default());
        world.insert_resource(Board::new(BOARD_COLS, BOARD_ROWS));
        world.insert_resource(PieceQueue::new(QUEUE_LOOKAHEAD));
        world.insert_resource(HoldSlot::default());
        world
    }

    // Helper function to create an app that has already started a game
    #[must_use]
    pub fn create_running_app() -> App {
        let mut app = App::new();
        app.handle_command(Command::Start);
        app
    }

    // Spawn a specific piece as the active entity, bypassing the queue
    pub fn spawn_piece(world: &mut World, kind: PieceKind, x: i32, y: i32) -> Entity {
        world.spawn((Piece::new(kind), Position { x, y })).id()
    }

    // Clone out the single active piece and its position
    #[must_use]
    pub fn active(world: &mut World) -> (Piece, Position) {
        let mut query = world.query::<(&Piece, &Position)>();
        let (piece, position) = query.iter(world).next().expect("no active piece");
        (piece.clone(), *position)
    }

    #[must_use]
    pub fn active_count(world: &mut World) -> usize {
        world.query::<&Piece>().iter(world).count()
    }

    // Fill an entire board row with a single kind
    pub fn fill_row(board: &mut Board, row: usize, kind: PieceKind) {
        for col in 0..board.cols {
            board.cells[row][col] = Some(kind);
        }
    }
}

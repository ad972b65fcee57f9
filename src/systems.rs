use bevy_ecs::prelude::*;
use log::{debug, info, trace};

use crate::components::{Board, GameEvent, GameState, HoldSlot, Piece, PieceQueue, Position};
use crate::rotation::try_rotate;

// The single active piece, cloned out of the world to sidestep borrow
// conflicts while systems mutate resources.
fn active_piece(world: &mut World) -> Option<(Entity, Piece, Position)> {
    let mut query = world.query::<(Entity, &Piece, &Position)>();
    query
        .iter(world)
        .next()
        .map(|(entity, piece, position)| (entity, piece.clone(), *position))
}

/// Pops the queue front, refills the lookahead, and spawns the piece at
/// the top of the board. An immediately colliding spawn is the game-over
/// condition; no piece is spawned in that case.
pub fn spawn_next_piece(world: &mut World) {
    let piece = {
        let mut queue = world.resource_mut::<PieceQueue>();
        queue.pop_next()
    };

    let position = {
        let board = world.resource::<Board>();
        piece.spawn_position(board.cols)
    };

    {
        let mut game_state = world.resource_mut::<GameState>();
        game_state.last_move_was_rotate = false;
    }

    let blocked = {
        let board = world.resource::<Board>();
        board.collides(position, &piece)
    };

    if blocked {
        info!("Spawn position blocked, game over");
        let mut game_state = world.resource_mut::<GameState>();
        game_state.game_over = true;
        game_state.push_event(GameEvent::GameOver);
        return;
    }

    debug!("Spawning {:?} at column {}", piece.kind, position.x);
    world.spawn((piece, position));
}

pub fn move_horizontal(world: &mut World, dir: i32) {
    let Some((entity, piece, position)) = active_piece(world) else {
        return;
    };

    let new_position = Position {
        x: position.x + dir,
        y: position.y,
    };

    let blocked = {
        let board = world.resource::<Board>();
        board.collides(new_position, &piece)
    };

    if blocked {
        return;
    }

    world.entity_mut(entity).insert(new_position);

    let mut game_state = world.resource_mut::<GameState>();
    game_state.last_move_was_rotate = false;
    game_state.push_event(GameEvent::Moved);
}

/// Advances the active piece one row. A blocked descent locks the piece
/// instead: spin check, merge, sweep, scoring, then the next spawn.
pub fn soft_drop(world: &mut World) {
    let Some((entity, piece, position)) = active_piece(world) else {
        return;
    };

    let below = Position {
        x: position.x,
        y: position.y + 1,
    };

    let blocked = {
        let board = world.resource::<Board>();
        board.collides(below, &piece)
    };

    if blocked {
        lock_active(world, entity, position, &piece);
    } else {
        world.entity_mut(entity).insert(below);
        let mut game_state = world.resource_mut::<GameState>();
        game_state.last_move_was_rotate = false;
    }

    let mut game_state = world.resource_mut::<GameState>();
    game_state.drop_timer_ms = 0.0;
}

pub fn hard_drop(world: &mut World) {
    let Some((entity, piece, position)) = active_piece(world) else {
        return;
    };

    let final_position = {
        let board = world.resource::<Board>();
        Position {
            x: position.x,
            y: board.landing_row(position, &piece),
        }
    };

    world.entity_mut(entity).insert(final_position);

    {
        let mut game_state = world.resource_mut::<GameState>();
        // A hard drop never counts toward a spin.
        game_state.last_move_was_rotate = false;
        game_state.drop_timer_ms = 0.0;
    }

    lock_active(world, entity, final_position, &piece);
}

pub fn rotate_active(world: &mut World, dir: i32) {
    let Some((entity, mut piece, mut position)) = active_piece(world) else {
        return;
    };

    let rotated = {
        let board = world.resource::<Board>();
        try_rotate(board, &mut piece, &mut position, dir)
    };

    if !rotated {
        return;
    }

    world.entity_mut(entity).insert((piece, position));

    let mut game_state = world.resource_mut::<GameState>();
    game_state.last_move_was_rotate = true;
    game_state.push_event(GameEvent::Rotated);
}

/// Stores the active piece's kind, or swaps it with the held kind. Usable
/// once per lock cycle; the swapped-in piece respawns with its base matrix
/// at the spawn column.
pub fn hold_piece(world: &mut World) {
    let can_hold = world.resource::<HoldSlot>().can_hold;
    if !can_hold {
        return;
    }

    let Some((entity, piece, _)) = active_piece(world) else {
        return;
    };

    let swapped_out = {
        let mut hold = world.resource_mut::<HoldSlot>();
        hold.can_hold = false;
        hold.kind.replace(piece.kind)
    };

    {
        let mut game_state = world.resource_mut::<GameState>();
        game_state.last_move_was_rotate = false;
        game_state.push_event(GameEvent::Held);
    }

    world.despawn(entity);

    match swapped_out {
        Some(kind) => {
            let piece = Piece::new(kind);
            let position = {
                let board = world.resource::<Board>();
                piece.spawn_position(board.cols)
            };
            world.spawn((piece, position));
        }
        None => spawn_next_piece(world),
    }
}

/// Drives the automatic drop. The accumulator advances by the elapsed
/// milliseconds; crossing the drop interval triggers one soft drop.
pub fn gravity_system(world: &mut World, delta_ms: f32) {
    trace!("Gravity tick with delta: {delta_ms}ms");

    let game_over = {
        let game_state = world.resource::<GameState>();
        game_state.game_over
    };

    if game_over {
        return;
    }

    let should_drop = {
        let mut game_state = world.resource_mut::<GameState>();
        game_state.drop_timer_ms += delta_ms;
        let should_drop = game_state.drop_timer_ms >= game_state.drop_interval_ms;
        if should_drop {
            game_state.drop_timer_ms = 0.0;
        }
        should_drop
    };

    if should_drop {
        soft_drop(world);
    }
}

fn lock_active(world: &mut World, entity: Entity, position: Position, piece: &Piece) {
    info!(
        "Locking {:?} at column {}, row {}",
        piece.kind, position.x, position.y
    );

    // Spin qualification looks at the grid as it is before the merge.
    let spin = {
        let board = world.resource::<Board>();
        let game_state = world.resource::<GameState>();
        game_state.is_spin(board, position, piece)
    };

    let cleared = {
        let mut board = world.resource_mut::<Board>();
        board.merge(position, piece);
        board.sweep()
    };

    {
        let mut game_state = world.resource_mut::<GameState>();
        game_state.push_event(GameEvent::Locked);
        if cleared > 0 {
            debug!("Cleared {cleared} rows (spin: {spin})");
            game_state.push_event(GameEvent::LinesCleared(cleared));
        }
        game_state.update_score(cleared, spin);
        game_state.last_move_was_rotate = false;
    }

    {
        let mut hold = world.resource_mut::<HoldSlot>();
        hold.can_hold = true;
    }

    world.despawn(entity);
    spawn_next_piece(world);
}

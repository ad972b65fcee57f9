#[cfg(test)]
mod tests {
    use crate::components::{Board, GameEvent, GameState, HoldSlot, Piece, PieceKind};
    use crate::rotation::rotate_matrix;
    use crate::systems::*;
    use crate::tests::test_utils::{active, active_count, create_test_world, fill_row, spawn_piece};

    #[test]
    fn test_spawn_next_piece_spawns_entity() {
        let mut world = create_test_world();

        spawn_next_piece(&mut world);

        assert_eq!(active_count(&mut world), 1);
        let (_, position) = active(&mut world);
        assert_eq!(position.y, 0);

        // The queue is topped back up after the pop
        let queue = world.resource::<crate::components::PieceQueue>();
        assert_eq!(queue.len(), queue.lookahead());
    }

    #[test]
    fn test_spawn_blocked_sets_game_over() {
        let mut world = create_test_world();

        // Every catalog shape touches rows 0..3 at spawn, so filling them
        // blocks any draw.
        {
            let mut board = world.resource_mut::<Board>();
            for row in 0..4 {
                fill_row(&mut board, row, PieceKind::I);
            }
        }

        spawn_next_piece(&mut world);

        assert_eq!(active_count(&mut world), 0);
        let game_state = world.resource::<GameState>();
        assert!(game_state.game_over);
        assert!(game_state.events.contains(&GameEvent::GameOver));
    }

    #[test]
    fn test_move_horizontal() {
        let mut world = create_test_world();
        spawn_piece(&mut world, PieceKind::T, 5, 0);
        world.resource_mut::<GameState>().last_move_was_rotate = true;

        move_horizontal(&mut world, -1);

        let (_, position) = active(&mut world);
        assert_eq!(position.x, 4);
        assert_eq!(position.y, 0);

        let game_state = world.resource::<GameState>();
        assert!(!game_state.last_move_was_rotate);
        assert!(game_state.events.contains(&GameEvent::Moved));
    }

    #[test]
    fn test_move_blocked_by_wall() {
        let mut world = create_test_world();
        spawn_piece(&mut world, PieceKind::Dot, 0, 0);

        move_horizontal(&mut world, -1);

        let (_, position) = active(&mut world);
        assert_eq!(position.x, 0);
    }

    #[test]
    fn test_soft_drop_moves_down_and_resets_timer() {
        let mut world = create_test_world();
        spawn_piece(&mut world, PieceKind::T, 5, 0);
        world.resource_mut::<GameState>().drop_timer_ms = 500.0;

        soft_drop(&mut world);

        let (_, position) = active(&mut world);
        assert_eq!(position.y, 1);

        let game_state = world.resource::<GameState>();
        assert_eq!(game_state.drop_timer_ms, 0.0);
        assert!(!game_state.last_move_was_rotate);
    }

    #[test]
    fn test_soft_drop_locks_at_floor() {
        let mut world = create_test_world();
        spawn_piece(&mut world, PieceKind::Dot, 7, 23);

        soft_drop(&mut world);

        // The piece merged into the grid and a replacement spawned at the top
        let board = world.resource::<Board>();
        assert_eq!(board.cells[23][7], Some(PieceKind::Dot));
        assert_eq!(active_count(&mut world), 1);
        let (_, position) = active(&mut world);
        assert_eq!(position.y, 0);

        let game_state = world.resource::<GameState>();
        assert_eq!(game_state.score, 0);
        assert_eq!(game_state.lines_cleared, 0);
        assert!(game_state.events.contains(&GameEvent::Locked));

        assert!(world.resource::<HoldSlot>().can_hold);
    }

    #[test]
    fn test_lock_clears_full_row() {
        let mut world = create_test_world();
        {
            let mut board = world.resource_mut::<Board>();
            fill_row(&mut board, 23, PieceKind::I);
            board.cells[23][7] = None;
        }
        spawn_piece(&mut world, PieceKind::Dot, 7, 23);

        soft_drop(&mut world);

        let game_state = world.resource::<GameState>();
        assert_eq!(game_state.lines_cleared, 1);
        assert_eq!(game_state.score, 40);
        assert!(game_state.events.contains(&GameEvent::LinesCleared(1)));

        let board = world.resource::<Board>();
        assert!(board.cells[23].iter().all(Option::is_none));
    }

    #[test]
    fn test_hard_drop_locks_at_bottom() {
        let mut world = create_test_world();
        spawn_piece(&mut world, PieceKind::T, 5, 0);

        hard_drop(&mut world);

        let board = world.resource::<Board>();
        assert_eq!(board.cells[22][5], Some(PieceKind::T));
        assert_eq!(board.cells[22][6], Some(PieceKind::T));
        assert_eq!(board.cells[22][7], Some(PieceKind::T));
        assert_eq!(board.cells[23][6], Some(PieceKind::T));

        assert_eq!(active_count(&mut world), 1);
        assert!(!world.resource::<GameState>().last_move_was_rotate);
    }

    #[test]
    fn test_hard_drop_never_counts_as_spin() {
        let mut world = create_test_world();

        // The same wedge that qualifies as a spin on a blocked soft drop
        {
            let mut board = world.resource_mut::<Board>();
            board.cells[10][5] = Some(PieceKind::O);
            board.cells[10][7] = Some(PieceKind::O);
            board.cells[12][7] = Some(PieceKind::O);
            board.cells[13][6] = Some(PieceKind::O);
        }

        let entity = spawn_piece(&mut world, PieceKind::T, 5, 10);
        {
            let mut piece = world.get_mut::<Piece>(entity).unwrap();
            let rotated = rotate_matrix(&piece.matrix, 1);
            piece.matrix = rotated;
        }
        world.resource_mut::<GameState>().last_move_was_rotate = true;

        hard_drop(&mut world);

        let game_state = world.resource::<GameState>();
        assert_eq!(game_state.spin_count, 0);
        assert_eq!(game_state.score, 0);
    }

    #[test]
    fn test_blocked_soft_drop_scores_spin() {
        let mut world = create_test_world();

        {
            let mut board = world.resource_mut::<Board>();
            board.cells[10][5] = Some(PieceKind::O);
            board.cells[10][7] = Some(PieceKind::O);
            board.cells[12][7] = Some(PieceKind::O);
            board.cells[13][6] = Some(PieceKind::O);
        }

        let entity = spawn_piece(&mut world, PieceKind::T, 5, 10);
        {
            let mut piece = world.get_mut::<Piece>(entity).unwrap();
            let rotated = rotate_matrix(&piece.matrix, 1);
            piece.matrix = rotated;
        }
        world.resource_mut::<GameState>().last_move_was_rotate = true;

        soft_drop(&mut world);

        let game_state = world.resource::<GameState>();
        assert_eq!(game_state.spin_count, 1);
        // Spin without lines at level 0
        assert_eq!(game_state.score, 400);
        assert!(game_state.events.contains(&GameEvent::SpinBonus));
    }

    #[test]
    fn test_rotate_sets_flag() {
        let mut world = create_test_world();
        spawn_piece(&mut world, PieceKind::T, 5, 5);

        rotate_active(&mut world, 1);

        let (piece, _) = active(&mut world);
        assert_eq!(piece.height(), 3);
        assert_eq!(piece.width(), 2);

        let game_state = world.resource::<GameState>();
        assert!(game_state.last_move_was_rotate);
        assert!(game_state.events.contains(&GameEvent::Rotated));
    }

    #[test]
    fn test_failed_rotation_changes_nothing() {
        let mut world = create_test_world();
        let entity = spawn_piece(&mut world, PieceKind::I, 13, 5);
        {
            let mut piece = world.get_mut::<Piece>(entity).unwrap();
            let rotated = rotate_matrix(&piece.matrix, 1);
            piece.matrix = rotated;
        }

        rotate_active(&mut world, 1);

        let (piece, position) = active(&mut world);
        assert_eq!(piece.height(), 4);
        assert_eq!(position.x, 13);
        assert!(!world.resource::<GameState>().last_move_was_rotate);
    }

    #[test]
    fn test_hold_stores_kind_and_spawns_replacement() {
        let mut world = create_test_world();
        spawn_piece(&mut world, PieceKind::T, 5, 3);

        hold_piece(&mut world);

        let hold = world.resource::<HoldSlot>();
        assert_eq!(hold.kind, Some(PieceKind::T));
        assert!(!hold.can_hold);

        assert_eq!(active_count(&mut world), 1);
        assert!(world.resource::<GameState>().events.contains(&GameEvent::Held));
    }

    #[test]
    fn test_second_hold_is_noop() {
        let mut world = create_test_world();
        spawn_piece(&mut world, PieceKind::T, 5, 3);

        hold_piece(&mut world);
        let (first_swap, _) = active(&mut world);

        hold_piece(&mut world);

        let hold = world.resource::<HoldSlot>();
        assert_eq!(hold.kind, Some(PieceKind::T));
        let (second_swap, _) = active(&mut world);
        assert_eq!(second_swap.kind, first_swap.kind);
    }

    #[test]
    fn test_hold_swaps_and_respawns_at_spawn_position() {
        let mut world = create_test_world();
        world.resource_mut::<HoldSlot>().kind = Some(PieceKind::O);

        let entity = spawn_piece(&mut world, PieceKind::T, 3, 10);
        {
            // Rotation state must not survive the swap
            let mut piece = world.get_mut::<Piece>(entity).unwrap();
            let rotated = rotate_matrix(&piece.matrix, 1);
            piece.matrix = rotated;
        }

        hold_piece(&mut world);

        let hold = world.resource::<HoldSlot>();
        assert_eq!(hold.kind, Some(PieceKind::T));

        let (piece, position) = active(&mut world);
        assert_eq!(piece.kind, PieceKind::O);
        assert_eq!(piece.matrix, PieceKind::O.base_matrix());
        assert_eq!(position, Piece::new(PieceKind::O).spawn_position(14));
    }

    #[test]
    fn test_can_hold_restored_after_lock() {
        let mut world = create_test_world();
        spawn_piece(&mut world, PieceKind::T, 5, 0);

        hold_piece(&mut world);
        assert!(!world.resource::<HoldSlot>().can_hold);

        hard_drop(&mut world);
        assert!(world.resource::<HoldSlot>().can_hold);
    }

    #[test]
    fn test_gravity_drops_after_interval() {
        let mut world = create_test_world();
        spawn_piece(&mut world, PieceKind::Dot, 5, 0);

        gravity_system(&mut world, 500.0);
        let (_, position) = active(&mut world);
        assert_eq!(position.y, 0);

        gravity_system(&mut world, 600.0);
        let (_, position) = active(&mut world);
        assert_eq!(position.y, 1);
        assert_eq!(world.resource::<GameState>().drop_timer_ms, 0.0);
    }

    #[test]
    fn test_gravity_idle_after_game_over() {
        let mut world = create_test_world();
        spawn_piece(&mut world, PieceKind::Dot, 5, 0);
        world.resource_mut::<GameState>().game_over = true;

        gravity_system(&mut world, 5000.0);

        let (_, position) = active(&mut world);
        assert_eq!(position.y, 0);
    }
}

#![warn(clippy::all, clippy::pedantic)]

use crate::components::{Board, Piece, Position};

/// Rotates a rectangular 0/1 matrix by 90 degrees. `dir > 0` is clockwise,
/// anything else counter-clockwise; the result has swapped dimensions.
#[must_use]
pub fn rotate_matrix(matrix: &[Vec<u8>], dir: i32) -> Vec<Vec<u8>> {
    let height = matrix.len();
    let width = matrix.first().map_or(0, Vec::len);
    let mut rotated = vec![vec![0u8; height]; width];

    for (y, row) in matrix.iter().enumerate() {
        for (x, &cell) in row.iter().enumerate() {
            if dir > 0 {
                rotated[x][height - 1 - y] = cell;
            } else {
                rotated[width - 1 - x][y] = cell;
            }
        }
    }

    rotated
}

/// Rotates the piece in place, kicking horizontally when the rotated shape
/// collides. The probe walks the cumulative offsets +1, -2, +3, -4, ...
/// (net columns +1, -1, +2, -2, ...) and gives up once the probe value
/// exceeds the rotated matrix width, restoring the original matrix and
/// column. This is a plain linear probe, not a per-orientation kick table.
pub fn try_rotate(board: &Board, piece: &mut Piece, position: &mut Position, dir: i32) -> bool {
    let rotated = rotate_matrix(&piece.matrix, dir);
    let original_matrix = std::mem::replace(&mut piece.matrix, rotated);
    let original_x = position.x;
    let width = piece.width() as i32;

    let mut offset = 1;
    while board.collides(*position, piece) {
        position.x += offset;
        offset = -(offset + if offset > 0 { 1 } else { -1 });
        if offset > width {
            piece.matrix = original_matrix;
            position.x = original_x;
            return false;
        }
    }

    true
}

use crate::board::Board;
use enum_map::{enum_map, Enum, EnumMap};
use image::Rgba;
use lazy_static::lazy_static;
use nanorand::{RandomGen, Rng};
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PieceError {
    #[error("extent lists differ in length ({x} x offsets, {y} y offsets)")]
    MismatchedExtents { x: usize, y: usize },
    #[error("a piece needs at least one extent")]
    NoExtents,
}

/// One orientation of a tetromino: relative cell offsets from the anchor,
/// plus the bounding extents derived from them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    x_extents: Vec<i32>,
    y_extents: Vec<i32>,
    min_x: i32,
    max_x: i32,
    min_y: i32,
    max_y: i32,
}

impl Piece {
    pub fn new(x_extents: Vec<i32>, y_extents: Vec<i32>) -> Result<Self, PieceError> {
        if x_extents.len() != y_extents.len() {
            return Err(PieceError::MismatchedExtents {
                x: x_extents.len(),
                y: y_extents.len(),
            });
        }
        let min_x = x_extents.iter().min().copied().ok_or(PieceError::NoExtents)?;
        let max_x = x_extents.iter().max().copied().ok_or(PieceError::NoExtents)?;
        let min_y = y_extents.iter().min().copied().ok_or(PieceError::NoExtents)?;
        let max_y = y_extents.iter().max().copied().ok_or(PieceError::NoExtents)?;
        Ok(Self {
            x_extents,
            y_extents,
            min_x,
            max_x,
            min_y,
            max_y,
        })
    }

    pub fn offsets(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.x_extents
            .iter()
            .zip(&self.y_extents)
            .map(|(&dx, &dy)| (dx, dy))
    }

    pub fn min_x(&self) -> i32 {
        self.min_x
    }

    pub fn max_x(&self) -> i32 {
        self.max_x
    }

    pub fn min_y(&self) -> i32 {
        self.min_y
    }

    pub fn max_y(&self) -> i32 {
        self.max_y
    }
}

#[rustfmt::skip]
lazy_static! {
    static ref ORIENTATIONS: EnumMap<Tetromino, Vec<Piece>> = enum_map! {
        Tetromino::Stick => vec![
            Piece::new(vec![-2, -1,  0,  1], vec![ 0,  0,  0,  0]).unwrap(),
            Piece::new(vec![ 0,  0,  0,  0], vec![-2, -1,  0,  1]).unwrap(),
        ],
        Tetromino::Square => vec![
            Piece::new(vec![-1,  0, -1,  0], vec![-1, -1,  0,  0]).unwrap(),
        ],
        Tetromino::S => vec![
            Piece::new(vec![ 1,  0,  0, -1], vec![-1, -1,  0,  0]).unwrap(),
            Piece::new(vec![-1, -1,  0,  0], vec![-1,  0,  0,  1]).unwrap(),
        ],
        Tetromino::Z => vec![
            Piece::new(vec![-1,  0,  0,  1], vec![-1, -1,  0,  0]).unwrap(),
            Piece::new(vec![ 1,  1,  0,  0], vec![-1,  0,  0,  1]).unwrap(),
        ],
        Tetromino::J => vec![
            Piece::new(vec![-1,  0,  0,  0], vec![ 0,  0, -1, -2]).unwrap(),
            Piece::new(vec![ 0,  0, -1, -2], vec![ 0, -1, -1, -1]).unwrap(),
            Piece::new(vec![ 0, -1, -1, -1], vec![-1, -1,  0,  1]).unwrap(),
            Piece::new(vec![-1, -1,  0,  1], vec![-1,  0,  0,  0]).unwrap(),
        ],
        Tetromino::L => vec![
            Piece::new(vec![ 0, -1, -1, -1], vec![ 0,  0, -1, -2]).unwrap(),
            Piece::new(vec![ 0,  0, -1, -2], vec![-1,  0,  0,  0]).unwrap(),
            Piece::new(vec![-1,  0,  0,  0], vec![-1, -1,  0,  1]).unwrap(),
            Piece::new(vec![-1, -1,  0,  1], vec![ 0, -1, -1, -1]).unwrap(),
        ],
        Tetromino::T => vec![
            Piece::new(vec![-1,  0,  1,  0], vec![ 0,  0,  0,  1]).unwrap(),
            Piece::new(vec![ 0,  0,  0,  1], vec![-1,  0,  1,  0]).unwrap(),
            Piece::new(vec![-1,  0,  1,  0], vec![ 0,  0,  0, -1]).unwrap(),
            Piece::new(vec![ 0,  0,  0, -1], vec![-1,  0,  1,  0]).unwrap(),
        ],
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Enum)]
pub enum Tetromino {
    Stick,
    Square,
    S,
    Z,
    J,
    L,
    T,
}

impl Tetromino {
    pub const ALL: [Tetromino; 7] = [
        Tetromino::Stick,
        Tetromino::Square,
        Tetromino::S,
        Tetromino::Z,
        Tetromino::J,
        Tetromino::L,
        Tetromino::T,
    ];

    const COLORS: EnumMap<Tetromino, [u8; 4]> = EnumMap::from_array([
        [61, 133, 198, 255],
        [241, 194, 50, 255],
        [106, 168, 79, 255],
        [204, 0, 0, 255],
        [60, 64, 198, 255],
        [230, 145, 56, 255],
        [142, 68, 173, 255],
    ]);

    /// The distinct orientations this shape cycles through under rotation.
    pub fn orientations(&self) -> &'static [Piece] {
        &ORIENTATIONS[*self]
    }

    pub fn color(&self) -> Rgba<u8> {
        Rgba(Self::COLORS[*self])
    }
}

impl<Generator: Rng<OUTPUT>, const OUTPUT: usize> RandomGen<Generator, OUTPUT> for Tetromino {
    fn random(rng: &mut Generator) -> Self {
        Self::ALL[rng.generate_range(0..Self::ALL.len())]
    }
}

/// The one piece currently falling: anchor cell plus orientation index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivePiece {
    kind: Tetromino,
    rot: usize,
    x: i32,
    y: i32,
}

impl ActivePiece {
    /// Places a fresh piece horizontally centered with its topmost cell on
    /// row 0.
    pub fn spawn(kind: Tetromino, board: &Board) -> Self {
        let piece = &kind.orientations()[0];
        Self {
            kind,
            rot: 0,
            x: board.width() / 2,
            y: -piece.min_y(),
        }
    }

    pub fn kind(&self) -> Tetromino {
        self.kind
    }

    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    pub fn piece(&self) -> &'static Piece {
        &self.kind.orientations()[self.rot]
    }

    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> {
        let (x, y) = (self.x, self.y);
        self.piece().offsets().map(move |(dx, dy)| (x + dx, y + dy))
    }

    /// Attempts a translation and/or rotation. The candidate anchor and
    /// orientation are validated in full before anything is committed; on
    /// failure the piece is left untouched.
    pub fn try_move(&mut self, board: &Board, dx: i32, dy: i32, rotate: bool) -> bool {
        let orientations = self.kind.orientations();
        let rot = if rotate {
            (self.rot + 1) % orientations.len()
        } else {
            self.rot
        };
        let (x, y) = (self.x + dx, self.y + dy);
        if !board.can_place(x, y, &orientations[rot]) {
            return false;
        }
        self.x = x;
        self.y = y;
        self.rot = rot;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{BOARD_HEIGHT, BOARD_WIDTH};

    fn board() -> Board {
        Board::new(BOARD_WIDTH, BOARD_HEIGHT)
    }

    #[test]
    fn mismatched_extent_lists_are_rejected() {
        assert_eq!(
            Piece::new(vec![0, 1], vec![0]),
            Err(PieceError::MismatchedExtents { x: 2, y: 1 })
        );
    }

    #[test]
    fn empty_extent_lists_are_rejected() {
        assert_eq!(Piece::new(vec![], vec![]), Err(PieceError::NoExtents));
    }

    #[test]
    fn extents_are_derived_from_the_offsets() {
        let piece = Piece::new(vec![-2, -1, 0, 1], vec![0, 0, 0, 3]).unwrap();
        assert_eq!(piece.min_x(), -2);
        assert_eq!(piece.max_x(), 1);
        assert_eq!(piece.min_y(), 0);
        assert_eq!(piece.max_y(), 3);
    }

    #[test]
    fn every_orientation_has_four_cells() {
        for kind in Tetromino::ALL {
            for piece in kind.orientations() {
                assert_eq!(piece.offsets().count(), 4, "{:?}", kind);
            }
        }
    }

    #[test]
    fn rotation_cycles_match_shape_symmetry() {
        let expected = [
            (Tetromino::Stick, 2),
            (Tetromino::Square, 1),
            (Tetromino::S, 2),
            (Tetromino::Z, 2),
            (Tetromino::J, 4),
            (Tetromino::L, 4),
            (Tetromino::T, 4),
        ];
        for (kind, cycle) in expected {
            assert_eq!(kind.orientations().len(), cycle, "{:?}", kind);
        }
    }

    #[test]
    fn rotating_through_a_full_cycle_returns_to_the_start() {
        // a board large enough that the walls never interfere
        let board = Board::new(100, 100);
        for kind in Tetromino::ALL {
            let mut active = ActivePiece::spawn(kind, &board);
            assert!(active.try_move(&board, 0, 40, false));
            let before = active;
            for turn in 0..kind.orientations().len() {
                assert!(active.try_move(&board, 0, 0, true), "{:?} turn {}", kind, turn);
            }
            assert_eq!(active, before, "{:?}", kind);
        }
    }

    #[test]
    fn square_rotation_is_a_self_loop() {
        let board = board();
        let mut active = ActivePiece::spawn(Tetromino::Square, &board);
        let before = active;
        assert!(active.try_move(&board, 0, 0, true));
        assert_eq!(active, before);
    }

    #[test]
    fn spawn_centers_the_piece_with_its_top_row_at_zero() {
        let board = board();
        for kind in Tetromino::ALL {
            let active = ActivePiece::spawn(kind, &board);
            assert_eq!(active.position().0, BOARD_WIDTH / 2, "{:?}", kind);
            let top_row = active.cells().map(|(_, y)| y).min();
            assert_eq!(top_row, Some(0), "{:?}", kind);
            assert!(
                active.cells().all(|(x, y)| {
                    (0..BOARD_WIDTH).contains(&x) && (0..BOARD_HEIGHT).contains(&y)
                }),
                "{:?}",
                kind
            );
        }
    }

    #[test]
    fn failed_moves_leave_the_piece_untouched() {
        let board = board();
        let mut active = ActivePiece::spawn(Tetromino::Square, &board);
        while active.try_move(&board, -1, 0, false) {}
        let before = active;
        assert!(!active.try_move(&board, -1, 0, false));
        assert_eq!(active, before);
    }

    #[test]
    fn horizontal_stick_descends_to_the_floor_and_stops() {
        let board = board();
        let mut active = ActivePiece::spawn(Tetromino::Stick, &board);
        assert_eq!(active.position(), (5, 0));
        for row in 1..BOARD_HEIGHT {
            assert!(active.try_move(&board, 0, 1, false), "row {}", row);
        }
        // the next descent would put the anchor on row 17, off the board
        assert!(!active.try_move(&board, 0, 1, false));
        assert_eq!(active.position(), (5, BOARD_HEIGHT - 1));
    }
}

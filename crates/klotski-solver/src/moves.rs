//! Move model and legal-move generation.
//!
//! Only pieces touching a hole can ever slide, so successors are found by
//! probing the four neighbours of each hole cell instead of trying every
//! piece in every direction.

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::board::{Board, PieceId, PieceLocations};

/// Slide direction of a piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Neighbour probing order around a hole.
    pub const ALL: [Direction; 4] = [
        Direction::Down,
        Direction::Up,
        Direction::Right,
        Direction::Left,
    ];

    /// (row, column) displacement of one step.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Direction of a straight displacement, `None` for zero or diagonal.
    pub fn from_delta(drow: i32, dcol: i32) -> Option<Direction> {
        match (drow.signum(), dcol.signum()) {
            (-1, 0) => Some(Direction::Up),
            (1, 0) => Some(Direction::Down),
            (0, -1) => Some(Direction::Left),
            (0, 1) => Some(Direction::Right),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        })
    }
}

/// One piece slid by (`drow`, `dcol`) cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub piece: PieceId,
    pub drow: i8,
    pub dcol: i8,
}

impl Move {
    pub const fn new(piece: PieceId, drow: i8, dcol: i8) -> Self {
        Self { piece, drow, dcol }
    }

    /// A single-cell slide.
    pub fn unit(piece: PieceId, direction: Direction) -> Self {
        let (drow, dcol) = direction.delta();
        Self::new(piece, drow as i8, dcol as i8)
    }

    pub fn direction(&self) -> Option<Direction> {
        Direction::from_delta(self.drow as i32, self.dcol as i32)
    }

    /// Number of cells travelled.
    pub fn distance(&self) -> usize {
        self.drow.unsigned_abs() as usize + self.dcol.unsigned_abs() as usize
    }

    /// Same slide with twice the displacement.
    pub fn doubled(self) -> Self {
        Self::new(self.piece, self.drow * 2, self.dcol * 2)
    }

    pub fn reversed(self) -> Self {
        Self::new(self.piece, -self.drow, -self.dcol)
    }

    /// The single-cell slides this move is made of.
    pub fn unit_steps(self) -> impl Iterator<Item = Move> {
        let step = Self::new(self.piece, self.drow.signum(), self.dcol.signum());
        std::iter::repeat(step).take(self.distance())
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.direction() {
            Some(direction) if self.distance() > 1 => {
                write!(f, "{} {} x{}", self.piece, direction, self.distance())
            }
            Some(direction) => write!(f, "{} {}", self.piece, direction),
            None => write!(f, "{} ({}, {})", self.piece, self.drow, self.dcol),
        }
    }
}

/// A successor board together with the move that produced it.
pub type Successor = (Board, Move);

/// Slide a piece, locating its cells on the board first.
///
/// Returns `None` if the move is illegal.
pub fn apply_move(board: &Board, mv: Move) -> Option<Board> {
    let from: SmallVec<[usize; 8]> = board
        .cells()
        .iter()
        .enumerate()
        .filter(|(_, occupant)| **occupant == mv.piece)
        .map(|(index, _)| index)
        .collect();
    apply_move_from(board, mv, &from)
}

/// Slide the piece occupying the cell indices `from` by the move's
/// displacement.
///
/// Every target cell must be on the grid and held either by a hole or by the
/// piece itself. Cells the piece leaves behind receive the holes it displaced,
/// so the number of hole cells never changes.
pub fn apply_move_from(board: &Board, mv: Move, from: &[usize]) -> Option<Board> {
    if from.is_empty() || (mv.drow == 0 && mv.dcol == 0) {
        return None;
    }

    let mut targets: SmallVec<[usize; 8]> = SmallVec::new();
    let mut displaced: SmallVec<[PieceId; 4]> = SmallVec::new();
    for &index in from {
        let target = board.offset(index, mv.drow as i32, mv.dcol as i32)?;
        let occupant = board.occupant_at(target);
        if occupant.is_hole() && occupant != mv.piece {
            displaced.push(occupant);
        } else if occupant != mv.piece {
            return None;
        }
        targets.push(target);
    }

    let mut next = board.clone();
    for &target in &targets {
        next.set(target, mv.piece);
    }

    let mut displaced = displaced.into_iter();
    for &index in from {
        if !targets.contains(&index) {
            next.set(index, displaced.next()?);
        }
    }
    Some(next)
}

/// All boards reachable from `board` by one single-cell slide.
pub fn successors(board: &Board) -> SmallVec<[Successor; 8]> {
    let locations = PieceLocations::of(board);
    successors_with(board, &locations)
}

/// Like [`successors`], reusing locations already gathered for `board`.
pub fn successors_with(board: &Board, locations: &PieceLocations) -> SmallVec<[Successor; 8]> {
    let mut out = SmallVec::new();
    // A piece beside both holes is reached twice; the outcome is the same.
    let mut tried: SmallVec<[(PieceId, Direction); 8]> = SmallVec::new();

    for (_, hole_cells) in locations.holes() {
        for &hole in hole_cells {
            for direction in Direction::ALL {
                let (drow, dcol) = direction.delta();
                let Some(neighbor) = board.offset(hole, drow, dcol) else {
                    continue;
                };

                let piece = board.occupant_at(neighbor);
                if piece.is_hole() {
                    continue;
                }

                let slide = direction.opposite();
                if tried.contains(&(piece, slide)) {
                    continue;
                }
                tried.push((piece, slide));

                let mv = Move::unit(piece, slide);
                if let Some(next) = apply_move_from(board, mv, locations.get(piece)) {
                    out.push((next, mv));
                }
            }
        }
    }

    out
}

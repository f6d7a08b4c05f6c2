use std::fmt;

use super::board::WIN_LENGTH;
use super::{Board, Player};

/// Terminal result of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Win(Player),
    Draw,
}

impl GameOutcome {
    pub fn winner(self) -> Option<Player> {
        match self {
            GameOutcome::Win(player) => Some(player),
            GameOutcome::Draw => None,
        }
    }
}

impl fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameOutcome::Win(player) => write!(f, "{player} won"),
            GameOutcome::Draw => f.write_str("draw"),
        }
    }
}

/// Length of the current run of same-owner tiles along one scan line.
#[derive(Debug, Default)]
struct Run {
    owner: Option<Player>,
    length: usize,
}

impl Run {
    fn starting_at(tile: Option<Player>) -> Self {
        Run {
            owner: tile,
            length: usize::from(tile.is_some()),
        }
    }

    /// Feed the next tile of the line. Returns the owner once the run reaches
    /// four tiles.
    fn push(&mut self, tile: Option<Player>) -> Option<Player> {
        match tile {
            None => *self = Run::default(),
            Some(_) if tile != self.owner => *self = Run::starting_at(tile),
            Some(owner) => {
                self.length += 1;
                if self.length == WIN_LENGTH {
                    return Some(owner);
                }
            }
        }
        None
    }
}

/// A straight line across the board: start cell plus a step direction.
#[derive(Debug, Clone, Copy)]
struct Line {
    x: usize,
    y: usize,
    dx: isize,
    dy: isize,
}

impl Line {
    fn cells(self, board: &Board) -> impl Iterator<Item = (usize, usize)> + '_ {
        let (width, height) = (board.width() as isize, board.height() as isize);
        (0..)
            .map(move |step: isize| {
                (
                    self.x as isize + step * self.dx,
                    self.y as isize + step * self.dy,
                )
            })
            .take_while(move |&(x, y)| x >= 0 && y >= 0 && x < width && y < height)
            .map(|(x, y)| (x as usize, y as usize))
    }
}

/// Every scan line on the board in detection order: rows, columns, then
/// down-right diagonals, then down-left diagonals. Diagonals start on the
/// left (resp. right) edge and on the top edge so each one is scanned once.
fn scan_lines(width: usize, height: usize) -> impl Iterator<Item = Line> {
    let rows = (0..height).map(|y| Line { x: 0, y, dx: 1, dy: 0 });
    let columns = (0..width).map(|x| Line { x, y: 0, dx: 0, dy: 1 });
    let down_right = (0..height)
        .map(|y| Line { x: 0, y, dx: 1, dy: 1 })
        .chain((1..width).map(|x| Line { x, y: 0, dx: 1, dy: 1 }));
    let down_left = (0..height)
        .map(move |y| Line {
            x: width - 1,
            y,
            dx: -1,
            dy: 1,
        })
        .chain((0..width - 1).rev().map(|x| Line { x, y: 0, dx: -1, dy: 1 }));

    rows.chain(columns).chain(down_right).chain(down_left)
}

/// Determine whether the board is in a terminal position.
///
/// Returns the first four-in-a-row found, `Draw` for a full board without one,
/// and `None` while the game can go on.
pub fn detect_outcome(board: &Board) -> Option<GameOutcome> {
    for line in scan_lines(board.width(), board.height()) {
        let mut run = Run::default();
        for (x, y) in line.cells(board) {
            if let Some(winner) = run.push(board.get(x, y)) {
                return Some(GameOutcome::Win(winner));
            }
        }
    }

    if board.is_full() {
        Some(GameOutcome::Draw)
    } else {
        None
    }
}

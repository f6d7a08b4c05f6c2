use crate::game::{Board, GameState, Player, WIN_LENGTH};

use super::provider::{InputEvent, MoveProvider};

/// Trait for evaluating a board position from a player's perspective.
pub trait Heuristic: Send {
    fn evaluate(&self, board: &Board, player: Player) -> f64;
}

/// Default heuristic that scans all 4-cell windows and scores threats.
pub struct ConnectFourHeuristic;

impl ConnectFourHeuristic {
    fn score_window(own: usize, opp: usize, empty: usize) -> f64 {
        if own == 3 && empty == 1 {
            50.0
        } else if own == 2 && empty == 2 {
            10.0
        } else if opp == 3 && empty == 1 {
            -80.0
        } else if opp == 2 && empty == 2 {
            -10.0
        } else {
            0.0
        }
    }

    fn score_direction(board: &Board, player: Player, dx: isize, dy: isize) -> f64 {
        let span = WIN_LENGTH as isize - 1;
        let (width, height) = (board.width() as isize, board.height() as isize);
        let mut score = 0.0;

        for y in 0..height {
            for x in 0..width {
                let (end_x, end_y) = (x + span * dx, y + span * dy);
                if end_x < 0 || end_x >= width || end_y < 0 || end_y >= height {
                    continue;
                }
                let mut own = 0;
                let mut opp = 0;
                let mut empty = 0;
                for i in 0..WIN_LENGTH as isize {
                    match board.get((x + i * dx) as usize, (y + i * dy) as usize) {
                        Some(owner) if owner == player => own += 1,
                        Some(_) => opp += 1,
                        None => empty += 1,
                    }
                }
                score += Self::score_window(own, opp, empty);
            }
        }
        score
    }
}

impl Heuristic for ConnectFourHeuristic {
    fn evaluate(&self, board: &Board, player: Player) -> f64 {
        let mut score = 0.0;

        // Center column bonus
        let center = board.width() / 2;
        for y in 0..board.height() {
            match board.get(center, y) {
                Some(owner) if owner == player => score += 3.0,
                Some(_) => score -= 3.0,
                None => {}
            }
        }

        // Horizontal, vertical and both diagonals
        for (dx, dy) in [(1, 0), (0, 1), (1, 1), (1, -1)] {
            score += Self::score_direction(board, player, dx, dy);
        }

        score
    }
}

const WIN_SCORE: f64 = 100_000.0;

/// Columns ordered center-first for better alpha-beta pruning.
fn move_order(width: usize) -> Vec<usize> {
    let mut columns: Vec<usize> = (0..width).collect();
    let center = (width as isize - 1) as f64 / 2.0;
    columns.sort_by(|&a, &b| {
        let da = (a as f64 - center).abs();
        let db = (b as f64 - center).abs();
        da.total_cmp(&db)
    });
    columns
}

/// Negamax player with alpha-beta pruning, searching `depth` half-moves.
pub struct NegamaxPlayer {
    depth: usize,
    heuristic: Box<dyn Heuristic>,
    nodes: u64,
}

impl NegamaxPlayer {
    pub const NAME: &'static str = "negamax";

    pub fn new(depth: usize) -> Self {
        Self::with_heuristic(depth, Box::new(ConnectFourHeuristic))
    }

    pub fn with_heuristic(depth: usize, heuristic: Box<dyn Heuristic>) -> Self {
        NegamaxPlayer {
            depth: depth.max(1),
            heuristic,
            nodes: 0,
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Best column for `player` on `board`, or `None` if every column is full.
    pub fn best_move(&mut self, board: &Board, player: Player) -> Option<usize> {
        let mut board = board.clone();
        let order = move_order(board.width());

        let mut best: Option<(usize, f64)> = None;
        for &col in &order {
            let Some(score) =
                self.score_move(&mut board, &order, col, player, self.depth - 1, f64::NEG_INFINITY, f64::INFINITY)
            else {
                continue;
            };
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((col, score));
            }
        }

        best.map(|(col, _)| col)
    }

    /// Score of dropping into `col` from `player`'s perspective, `None` if the
    /// column is full. The board is restored before returning.
    #[allow(clippy::too_many_arguments)]
    fn score_move(
        &mut self,
        board: &mut Board,
        order: &[usize],
        col: usize,
        player: Player,
        depth: usize,
        alpha: f64,
        beta: f64,
    ) -> Option<f64> {
        let row = board.drop_tile(col, player)?;
        self.nodes += 1;

        let score = if board.is_winning_tile(col, row) {
            // Prefer faster wins
            WIN_SCORE + depth as f64
        } else if board.is_full() {
            0.0
        } else {
            // Negamax: opponent's score is negated
            -self.negamax(board, order, player.other(), depth, -beta, -alpha)
        };

        board.clear_cell(col, row);
        Some(score)
    }

    fn negamax(
        &mut self,
        board: &mut Board,
        order: &[usize],
        player: Player,
        depth: usize,
        mut alpha: f64,
        beta: f64,
    ) -> f64 {
        if depth == 0 {
            return self.heuristic.evaluate(board, player);
        }

        let mut best = f64::NEG_INFINITY;
        for &col in order {
            let Some(score) = self.score_move(board, order, col, player, depth - 1, alpha, beta) else {
                continue;
            };
            if score > best {
                best = score;
            }
            if score > alpha {
                alpha = score;
            }
            if alpha >= beta {
                break;
            }
        }

        best
    }
}

impl MoveProvider for NegamaxPlayer {
    fn read(&mut self, state: &GameState) -> Option<InputEvent> {
        let player = state.current_player();
        let column = self.best_move(state.board(), player)?;
        Some(InputEvent::Move { player, column })
    }

    fn take_moves_analyzed(&mut self) -> u64 {
        std::mem::take(&mut self.nodes)
    }
}

use std::fmt;

use super::Player;
use crate::error::BoardError;

/// Smallest accepted width and height.
pub const MIN_SIZE: usize = 4;

/// Tiles in a row needed to win.
pub const WIN_LENGTH: usize = 4;

/// Rectangular grid of tiles. `(0, 0)` is the top-left corner and row
/// `height - 1` is the bottom, where dropped tiles land first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: usize,
    height: usize,
    tiles: Vec<Option<Player>>,
    tile_count: usize,
}

impl Board {
    /// Standard 7x6 board.
    pub const STANDARD_WIDTH: usize = 7;
    pub const STANDARD_HEIGHT: usize = 6;

    /// Create a new empty board
    pub fn new(width: usize, height: usize) -> Result<Self, BoardError> {
        if width < MIN_SIZE || height < MIN_SIZE {
            return Err(BoardError::TooSmall { width, height });
        }
        Ok(Board {
            width,
            height,
            tiles: vec![None; width * height],
            tile_count: 0,
        })
    }

    pub fn standard() -> Self {
        Board {
            width: Self::STANDARD_WIDTH,
            height: Self::STANDARD_HEIGHT,
            tiles: vec![None; Self::STANDARD_WIDTH * Self::STANDARD_HEIGHT],
            tile_count: 0,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of occupied cells.
    pub fn tile_count(&self) -> usize {
        self.tile_count
    }

    fn offset(&self, x: usize, y: usize) -> usize {
        assert!(
            x < self.width && y < self.height,
            "({x},{y}) is outside the {}x{} board",
            self.width,
            self.height
        );
        x + y * self.width
    }

    /// Owner of the tile at `(x, y)`, `None` if the cell is empty.
    pub fn get(&self, x: usize, y: usize) -> Option<Player> {
        self.tiles[self.offset(x, y)]
    }

    /// Whether at least one more tile fits into the column.
    pub fn has_space_in_column(&self, column: usize) -> bool {
        column < self.width && self.get(column, 0).is_none()
    }

    /// Columns that still accept a tile, left to right.
    pub fn legal_columns(&self) -> Vec<usize> {
        (0..self.width)
            .filter(|&col| self.has_space_in_column(col))
            .collect()
    }

    /// Drop a tile into a column. Returns the row where it landed, or `None`
    /// (leaving the board untouched) when the column is full or off the board.
    pub fn drop_tile(&mut self, column: usize, player: Player) -> Option<usize> {
        if column >= self.width {
            return None;
        }
        let row = (0..self.height)
            .rev()
            .find(|&y| self.get(column, y).is_none())?;
        let offset = self.offset(column, row);
        self.tiles[offset] = Some(player);
        self.tile_count += 1;
        Some(row)
    }

    /// Put a tile at a given location. Fails if the cell is already owned.
    pub fn set(&mut self, x: usize, y: usize, player: Player) -> Result<(), BoardError> {
        let offset = self.offset(x, y);
        if let Some(owner) = self.tiles[offset] {
            return Err(BoardError::CellOccupied { x, y, owner });
        }
        self.tiles[offset] = Some(player);
        self.tile_count += 1;
        Ok(())
    }

    /// Remove the tile at `(x, y)`. Nothing happens if the cell is empty.
    pub fn clear_cell(&mut self, x: usize, y: usize) {
        let offset = self.offset(x, y);
        if self.tiles[offset].take().is_some() {
            self.tile_count -= 1;
        }
    }

    /// Remove every tile.
    pub fn clear(&mut self) {
        self.tiles.fill(None);
        self.tile_count = 0;
    }

    /// Check if the board is completely full
    pub fn is_full(&self) -> bool {
        self.tile_count == self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tile_count == 0
    }

    /// Whether the tile at `(x, y)` is part of four-in-a-row in any direction.
    /// Only looks at lines through this tile, so it is the cheap check to run
    /// right after a drop.
    pub fn is_winning_tile(&self, x: usize, y: usize) -> bool {
        let Some(owner) = self.get(x, y) else {
            return false;
        };

        const DIRECTIONS: [(isize, isize); 4] = [(1, 0), (0, 1), (1, 1), (1, -1)];
        DIRECTIONS.iter().any(|&(dx, dy)| {
            let count = 1
                + self.count_from(x, y, dx, dy, owner)
                + self.count_from(x, y, -dx, -dy, owner);
            count >= WIN_LENGTH
        })
    }

    /// Consecutive tiles owned by `owner` starting next to `(x, y)` and walking
    /// in direction `(dx, dy)`.
    fn count_from(&self, x: usize, y: usize, dx: isize, dy: isize, owner: Player) -> usize {
        let mut count = 0;
        let mut cx = x as isize + dx;
        let mut cy = y as isize + dy;
        while cx >= 0
            && cy >= 0
            && (cx as usize) < self.width
            && (cy as usize) < self.height
            && self.get(cx as usize, cy as usize) == Some(owner)
        {
            count += 1;
            cx += dx;
            cy += dy;
        }
        count
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            for x in 0..self.width {
                let symbol = self.get(x, y).map_or('.', Player::symbol);
                write!(f, "{symbol}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sized(width: usize, height: usize) -> Board {
        Board::new(width, height).unwrap()
    }

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::standard();
        for y in 0..board.height() {
            for x in 0..board.width() {
                assert_eq!(board.get(x, y), None);
            }
        }
        assert!(board.is_empty());
        assert!(!board.is_full());
    }

    #[test]
    fn test_rejects_small_boards() {
        assert_eq!(
            Board::new(3, 6),
            Err(BoardError::TooSmall { width: 3, height: 6 })
        );
        assert!(Board::new(7, 3).is_err());
        assert!(Board::new(4, 4).is_ok());
    }

    #[test]
    fn test_drop_tile() {
        let mut board = Board::standard();

        // First tile lands on the bottom row
        assert_eq!(board.drop_tile(3, Player::Red), Some(5));
        assert_eq!(board.get(3, 5), Some(Player::Red));

        // Second tile stacks on top
        assert_eq!(board.drop_tile(3, Player::Yellow), Some(4));
        assert_eq!(board.get(3, 4), Some(Player::Yellow));
        assert_eq!(board.tile_count(), 2);
    }

    #[test]
    fn test_column_full_is_sentinel() {
        let mut board = sized(5, 4);
        for _ in 0..4 {
            assert!(board.drop_tile(0, Player::Red).is_some());
        }
        assert!(!board.has_space_in_column(0));

        let before = board.clone();
        for _ in 0..3 {
            assert_eq!(board.drop_tile(0, Player::Yellow), None);
        }
        assert_eq!(board, before);
    }

    #[test]
    fn test_invalid_column() {
        let mut board = Board::standard();
        assert!(!board.has_space_in_column(7));
        assert_eq!(board.drop_tile(7, Player::Red), None);
        assert!(board.is_empty());
    }

    #[test]
    fn test_drop_fills_lowest_free_row() {
        let mut board = sized(4, 5);
        board.set(1, 4, Player::Red).unwrap();
        board.set(1, 2, Player::Yellow).unwrap();
        // Row 3 is the lowest free cell even though row 2 is occupied above it
        assert_eq!(board.drop_tile(1, Player::Red), Some(3));
        assert_eq!(board.get(1, 2), Some(Player::Yellow));
    }

    #[test]
    fn test_set_occupied_cell_fails() {
        let mut board = Board::standard();
        board.set(2, 2, Player::Red).unwrap();
        assert_eq!(
            board.set(2, 2, Player::Yellow),
            Err(BoardError::CellOccupied {
                x: 2,
                y: 2,
                owner: Player::Red
            })
        );
        assert_eq!(board.get(2, 2), Some(Player::Red));
        assert_eq!(board.tile_count(), 1);
    }

    #[test]
    fn test_clear_cell_and_clear() {
        let mut board = Board::standard();
        board.drop_tile(0, Player::Red);
        board.drop_tile(1, Player::Yellow);

        board.clear_cell(0, 5);
        assert_eq!(board.get(0, 5), None);
        assert_eq!(board.tile_count(), 1);

        // Clearing an empty cell leaves the count alone
        board.clear_cell(0, 5);
        assert_eq!(board.tile_count(), 1);

        board.clear();
        assert!(board.is_empty());
        assert_eq!(board.get(1, 5), None);
    }

    #[test]
    fn test_full_board() {
        let mut board = sized(4, 4);
        for col in 0..4 {
            for _ in 0..4 {
                board.drop_tile(col, Player::Red).unwrap();
            }
        }
        assert!(board.is_full());
        assert!(board.legal_columns().is_empty());
    }

    #[test]
    fn test_copy_is_independent() {
        let mut original = Board::standard();
        original.drop_tile(2, Player::Red);

        let mut copy = original.clone();
        copy.drop_tile(2, Player::Yellow);
        copy.clear_cell(2, 5);

        assert_eq!(original.get(2, 5), Some(Player::Red));
        assert_eq!(original.get(2, 4), None);
        assert_eq!(original.tile_count(), 1);
    }

    #[test]
    fn test_display() {
        let mut board = sized(4, 4);
        board.drop_tile(0, Player::Red);
        board.drop_tile(3, Player::Yellow);
        assert_eq!(board.to_string(), "....\n....\n....\nR..Y\n");
    }

    #[test]
    fn test_winning_tile_horizontal() {
        let mut board = Board::standard();
        for col in 0..4 {
            board.drop_tile(col, Player::Red);
        }
        assert!(board.is_winning_tile(2, 5));
    }

    #[test]
    fn test_winning_tile_vertical() {
        let mut board = Board::standard();
        for _ in 0..4 {
            board.drop_tile(3, Player::Yellow);
        }
        assert!(board.is_winning_tile(3, 2));
    }

    #[test]
    fn test_winning_tile_diagonals() {
        let mut board = sized(5, 5);
        for i in 0..4 {
            board.set(i, 4 - i, Player::Red).unwrap();
        }
        assert!(board.is_winning_tile(1, 3));

        let mut board = sized(5, 5);
        for i in 0..4 {
            board.set(i + 1, i + 1, Player::Yellow).unwrap();
        }
        assert!(board.is_winning_tile(4, 4));
    }

    #[test]
    fn test_no_win_with_three() {
        let mut board = Board::standard();
        for col in 0..3 {
            board.drop_tile(col, Player::Red);
        }
        assert!(!board.is_winning_tile(1, 5));
        assert!(!board.is_winning_tile(5, 5));
    }
}

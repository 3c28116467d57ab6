//! Board structure with move history and candidate generation

use crate::error::GameError;

use super::{GameOutcome, Move, Pos, Stone, DIRECTIONS, NEIGHBOR_RADIUS};

/// Game board: a square grid of cells plus the append-only move history.
///
/// All cell state is owned here. Game moves go through [`Board::place`],
/// which validates the move and derives the resulting [`GameOutcome`].
/// The raw [`Board::set_stone`]/[`Board::clear_stone`] pair skips
/// validation and history and exists for the search engine, which
/// explores hypothetical positions on a scratch clone.
#[derive(Debug, Clone)]
pub struct Board {
    size: usize,
    cells: Vec<Stone>,
    stones: usize,
    history: Vec<Move>,
}

impl Board {
    /// Create an empty board with the given side length.
    ///
    /// # Example
    ///
    /// ```
    /// use gomoku::board::Board;
    ///
    /// let board = Board::new(25);
    /// assert_eq!(board.size(), 25);
    /// assert!(board.is_board_empty());
    /// ```
    #[must_use]
    pub fn new(size: usize) -> Self {
        debug_assert!(size >= 5, "a winning line needs five cells");
        Self {
            size,
            cells: vec![Stone::Empty; size * size],
            stones: 0,
            history: Vec::with_capacity(size * size),
        }
    }

    /// Create an empty board of the default size.
    #[must_use]
    pub fn standard() -> Self {
        Self::new(super::DEFAULT_BOARD_SIZE)
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Center cell, the sole opening candidate.
    #[inline]
    pub fn center(&self) -> Pos {
        let mid = (self.size / 2) as u8;
        Pos::new(mid, mid)
    }

    #[inline]
    fn index(&self, pos: Pos) -> usize {
        pos.row as usize * self.size + pos.col as usize
    }

    /// Check signed coordinates against the grid bounds.
    #[inline]
    pub fn in_bounds(&self, row: i32, col: i32) -> bool {
        row >= 0 && row < self.size as i32 && col >= 0 && col < self.size as i32
    }

    /// Get stone at position
    #[inline]
    pub fn get(&self, pos: Pos) -> Stone {
        self.cells[self.index(pos)]
    }

    /// Check if position is empty
    #[inline]
    pub fn is_empty_at(&self, pos: Pos) -> bool {
        self.get(pos) == Stone::Empty
    }

    /// Place a stone without validation or history (search-internal).
    /// Use [`Board::place`] for game moves.
    #[inline]
    pub fn set_stone(&mut self, pos: Pos, stone: Stone) {
        let idx = self.index(pos);
        if self.cells[idx] == Stone::Empty && stone != Stone::Empty {
            self.stones += 1;
        }
        self.cells[idx] = stone;
    }

    /// Remove a stone (search-internal undo half of a set/clear pair).
    #[inline]
    pub fn clear_stone(&mut self, pos: Pos) {
        let idx = self.index(pos);
        if self.cells[idx] != Stone::Empty {
            self.stones -= 1;
        }
        self.cells[idx] = Stone::Empty;
    }

    /// Play a game move.
    ///
    /// Fails with [`GameError::IllegalMove`] if the cell is occupied or out
    /// of range; otherwise mutates the cell, appends to the history, and
    /// returns the updated outcome (win through the placed cell, draw on a
    /// full board, in-progress otherwise).
    pub fn place(&mut self, pos: Pos, stone: Stone) -> Result<GameOutcome, GameError> {
        if !self.in_bounds(i32::from(pos.row), i32::from(pos.col))
            || !self.is_empty_at(pos)
            || stone == Stone::Empty
        {
            return Err(GameError::IllegalMove {
                row: pos.row,
                col: pos.col,
            });
        }

        self.set_stone(pos, stone);
        self.history.push(Move { pos, stone });

        if self.check_win(pos) {
            Ok(GameOutcome::win_for(stone))
        } else if self.is_full() {
            Ok(GameOutcome::Draw)
        } else {
            Ok(GameOutcome::InProgress)
        }
    }

    /// Take back the most recent game move, returning it.
    pub fn undo(&mut self) -> Option<Move> {
        let last = self.history.pop()?;
        self.clear_stone(last.pos);
        Some(last)
    }

    /// Check whether the stone at `pos` completes five or more in a row.
    ///
    /// Scans the four axis directions through the cell, counting
    /// consecutive same-color stones both ways. Cheap enough to run after
    /// every move; no allocation.
    #[must_use]
    pub fn check_win(&self, pos: Pos) -> bool {
        let color = self.get(pos);
        if color == Stone::Empty {
            return false;
        }

        for &(dr, dc) in &DIRECTIONS {
            let mut count = 1;
            for dir in [1i32, -1] {
                let mut r = i32::from(pos.row) + dr * dir;
                let mut c = i32::from(pos.col) + dc * dir;
                while self.in_bounds(r, c) && self.get(Pos::new(r as u8, c as u8)) == color {
                    count += 1;
                    r += dr * dir;
                    c += dc * dir;
                }
            }
            if count >= 5 {
                return true;
            }
        }
        false
    }

    /// Candidate moves for the AI: empty cells within [`NEIGHBOR_RADIUS`]
    /// of any stone, in row-major order.
    ///
    /// The proximity restriction bounds the branching factor; it applies
    /// to AI search only, never to human input. On an empty board the
    /// center is the sole candidate. The result never contains an occupied
    /// cell and is empty exactly when the board is full.
    #[must_use]
    pub fn candidate_moves(&self) -> Vec<Pos> {
        self.candidate_moves_within(NEIGHBOR_RADIUS)
    }

    /// Candidate moves restricted to the given Chebyshev radius.
    #[must_use]
    pub fn candidate_moves_within(&self, radius: i32) -> Vec<Pos> {
        if self.is_board_empty() {
            return vec![self.center()];
        }

        let mut moves = Vec::with_capacity(64);
        for row in 0..self.size as i32 {
            for col in 0..self.size as i32 {
                let pos = Pos::new(row as u8, col as u8);
                if self.is_empty_at(pos) && self.has_neighbor(row, col, radius) {
                    moves.push(pos);
                }
            }
        }
        moves
    }

    fn has_neighbor(&self, row: i32, col: i32, radius: i32) -> bool {
        for dr in -radius..=radius {
            for dc in -radius..=radius {
                if dr == 0 && dc == 0 {
                    continue;
                }
                let (r, c) = (row + dr, col + dc);
                if self.in_bounds(r, c) && !self.is_empty_at(Pos::new(r as u8, c as u8)) {
                    return true;
                }
            }
        }
        false
    }

    /// Total stones on board
    #[inline]
    pub fn stone_count(&self) -> usize {
        self.stones
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.stones == self.size * self.size
    }

    /// Check if board is empty
    #[inline]
    pub fn is_board_empty(&self) -> bool {
        self.stones == 0
    }

    /// Ordered move history, oldest first.
    #[inline]
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    #[inline]
    pub fn last_move(&self) -> Option<Move> {
        self.history.last().copied()
    }

    /// Clear all cells and the history for a fresh game.
    pub fn reset(&mut self) {
        self.cells.fill(Stone::Empty);
        self.stones = 0;
        self.history.clear();
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_and_get() {
        let mut board = Board::new(25);
        let pos = Pos::new(12, 12);
        let outcome = board.place(pos, Stone::Black).unwrap();
        assert_eq!(outcome, GameOutcome::InProgress);
        assert_eq!(board.get(pos), Stone::Black);
        assert_eq!(board.stone_count(), 1);
        assert_eq!(
            board.last_move(),
            Some(Move {
                pos,
                stone: Stone::Black
            })
        );
    }

    #[test]
    fn test_place_occupied_cell_fails() {
        let mut board = Board::new(25);
        let pos = Pos::new(5, 5);
        board.place(pos, Stone::Black).unwrap();

        let err = board.place(pos, Stone::White).unwrap_err();
        assert!(matches!(err, GameError::IllegalMove { row: 5, col: 5 }));
        // The cell keeps its original stone
        assert_eq!(board.get(pos), Stone::Black);
    }

    #[test]
    fn test_place_out_of_range_fails() {
        let mut board = Board::new(5);
        let err = board.place(Pos::new(5, 0), Stone::Black).unwrap_err();
        assert!(matches!(err, GameError::IllegalMove { .. }));
    }

    #[test]
    fn test_undo_restores_cell() {
        let mut board = Board::new(25);
        let pos = Pos::new(3, 7);
        board.place(pos, Stone::White).unwrap();

        let undone = board.undo().unwrap();
        assert_eq!(undone.pos, pos);
        assert!(board.is_empty_at(pos));
        assert!(board.history().is_empty());
        assert!(board.undo().is_none());
    }

    #[test]
    fn test_check_win_horizontal() {
        let mut board = Board::new(25);
        for col in 10..14 {
            board.place(Pos::new(10, col), Stone::Black).unwrap();
            assert!(!board.check_win(Pos::new(10, col)));
        }

        let outcome = board.place(Pos::new(10, 14), Stone::Black).unwrap();
        assert_eq!(outcome, GameOutcome::BlackWins);
        assert!(board.check_win(Pos::new(10, 14)));
        // Any stone of the line sees the win
        assert!(board.check_win(Pos::new(10, 12)));
    }

    #[test]
    fn test_check_win_vertical_and_diagonals() {
        for (dr, dc) in [(1u8, 0u8), (1, 1)] {
            let mut board = Board::new(25);
            for i in 0..5u8 {
                board
                    .place(Pos::new(5 + i * dr, 5 + i * dc), Stone::White)
                    .unwrap();
            }
            assert!(board.check_win(Pos::new(5 + 4 * dr, 5 + 4 * dc)));
        }

        // Anti-diagonal
        let mut board = Board::new(25);
        for i in 0..5u8 {
            board.place(Pos::new(5 + i, 10 - i), Stone::White).unwrap();
        }
        assert!(board.check_win(Pos::new(9, 6)));
    }

    #[test]
    fn test_no_win_when_blocked_mid_line() {
        let mut board = Board::new(25);
        for col in [0u8, 1, 2, 4, 5] {
            board.place(Pos::new(0, col), Stone::Black).unwrap();
        }
        board.place(Pos::new(0, 3), Stone::White).unwrap();
        assert!(!board.check_win(Pos::new(0, 2)));
        assert!(!board.check_win(Pos::new(0, 4)));
    }

    #[test]
    fn test_overline_counts_as_win() {
        let mut board = Board::new(25);
        for col in 0..6u8 {
            board.set_stone(Pos::new(7, col), Stone::Black);
        }
        assert!(board.check_win(Pos::new(7, 3)));
    }

    #[test]
    fn test_candidates_empty_board_is_center() {
        let board = Board::new(25);
        assert_eq!(board.candidate_moves(), vec![Pos::new(12, 12)]);
    }

    #[test]
    fn test_candidates_exclude_occupied_and_are_placeable() {
        let mut board = Board::new(25);
        board.place(Pos::new(12, 12), Stone::Black).unwrap();
        board.place(Pos::new(12, 13), Stone::White).unwrap();

        let candidates = board.candidate_moves();
        assert!(!candidates.is_empty());
        for &pos in &candidates {
            assert!(board.is_empty_at(pos));
            let mut copy = board.clone();
            copy.place(pos, Stone::Black).unwrap();
        }
    }

    #[test]
    fn test_candidates_respect_radius() {
        let mut board = Board::new(25);
        board.place(Pos::new(12, 12), Stone::Black).unwrap();

        for &pos in &board.candidate_moves_within(2) {
            let dr = (i32::from(pos.row) - 12).abs();
            let dc = (i32::from(pos.col) - 12).abs();
            assert!(dr.max(dc) <= 2, "candidate {:?} outside radius", pos);
        }

        // Radius 1 is the 8-neighborhood of the lone stone
        assert_eq!(board.candidate_moves_within(1).len(), 8);
    }

    #[test]
    fn test_candidates_empty_iff_board_full() {
        let mut board = Board::new(5);
        for row in 0..5u8 {
            for col in 0..5u8 {
                let stone = if (row + col) % 2 == 0 {
                    Stone::Black
                } else {
                    Stone::White
                };
                board.set_stone(Pos::new(row, col), stone);
            }
        }
        assert!(board.is_full());
        assert!(board.candidate_moves().is_empty());
    }

    #[test]
    fn test_draw_on_full_board_without_five() {
        // 5x5 filled with a pattern that has no five-in-a-row on any axis.
        let rows = ["BBWBW", "BWWBB", "WBBWB", "BWBWW", "WWBBW"];
        let mut board = Board::new(5);
        let mut outcome = GameOutcome::InProgress;
        for (row, cells) in rows.iter().enumerate() {
            for (col, ch) in cells.chars().enumerate() {
                let stone = if ch == 'B' { Stone::Black } else { Stone::White };
                outcome = board.place(Pos::new(row as u8, col as u8), stone).unwrap();
            }
        }
        assert!(board.is_full());
        assert_eq!(outcome, GameOutcome::Draw);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut board = Board::new(25);
        board.place(Pos::new(1, 1), Stone::Black).unwrap();
        board.place(Pos::new(2, 2), Stone::White).unwrap();

        board.reset();
        assert!(board.is_board_empty());
        assert!(board.history().is_empty());
        assert!(board.is_empty_at(Pos::new(1, 1)));
    }
}

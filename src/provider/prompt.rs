//! Prompt construction for the LLM providers
//!
//! Coordinates use letters for columns (`A` upward) and 1-based numbers
//! for rows, so `A1` is the top-left corner. The move prompt asks for a
//! strict `MOVE: <col><row>` reply line that [`super::parse`] consumes.

use crate::board::{Board, Move, Pos, Stone};

use super::MoveRequest;

/// Moves of history included in the move prompt.
const HISTORY_WINDOW: usize = 10;

pub struct PromptBuilder;

impl PromptBuilder {
    /// Column letter for an index (`0 -> 'A'`).
    #[must_use]
    pub fn col_label(col: u8) -> char {
        (b'A' + col) as char
    }

    /// Render a position as its board label, e.g. `H8`.
    #[must_use]
    pub fn position_label(pos: Pos) -> String {
        format!("{}{}", Self::col_label(pos.col), pos.row + 1)
    }

    /// Parse a board label back into a position, bounds-checked against
    /// the board size. Accepts lowercase letters.
    #[must_use]
    pub fn parse_position(label: &str, size: usize) -> Option<Pos> {
        let label = label.trim();
        let mut chars = label.chars();
        let col_char = chars.next()?.to_ascii_uppercase();
        let row_str = chars.as_str();

        if !col_char.is_ascii_uppercase() || row_str.is_empty() || row_str.len() > 2 {
            return None;
        }

        let col = (col_char as u8).checked_sub(b'A')?;
        let row = row_str.parse::<u8>().ok()?.checked_sub(1)?;
        if (row as usize) < size && (col as usize) < size {
            Some(Pos::new(row, col))
        } else {
            None
        }
    }

    /// Render the board as a text grid for the model.
    #[must_use]
    pub fn board_to_text(board: &Board) -> String {
        let size = board.size();
        let mut lines = Vec::with_capacity(size + 1);

        let header: Vec<String> = (0..size as u8)
            .map(|col| Self::col_label(col).to_string())
            .collect();
        lines.push(format!("   {}", header.join(" ")));

        for row in 0..size as u8 {
            let cells: Vec<&str> = (0..size as u8)
                .map(|col| match board.get(Pos::new(row, col)) {
                    Stone::Empty => "·",
                    Stone::Black => "●",
                    Stone::White => "○",
                })
                .collect();
            lines.push(format!("{:>2} {}", row + 1, cells.join(" ")));
        }

        lines.join("\n")
    }

    /// Render the most recent moves, oldest first.
    #[must_use]
    pub fn history_to_text(history: &[Move]) -> String {
        if history.is_empty() {
            return "(no moves yet)".to_string();
        }

        let start = history.len().saturating_sub(HISTORY_WINDOW);
        history[start..]
            .iter()
            .enumerate()
            .map(|(i, mv)| {
                let symbol = if mv.stone == Stone::Black { "●" } else { "○" };
                format!("{}. {} {}", start + i + 1, symbol, Self::position_label(mv.pos))
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Build the full move-request prompt.
    #[must_use]
    pub fn build_move_prompt(req: &MoveRequest<'_>) -> String {
        let size = req.board.size();
        let (own, opponent) = match req.color {
            Stone::White => ("○ (white)", "● (black)"),
            _ => ("● (black)", "○ (white)"),
        };
        let last_col = Self::col_label(size as u8 - 1);

        let mut prompt = format!(
            "You are an expert Gomoku (five-in-a-row) player. It is your turn; \
you play {own} against {opponent}.\n\n\
## Rules\n\
1. The board is {size}x{size}.\n\
2. The first player to line up five stones (horizontally, vertically or diagonally) wins.\n\
3. Black moves first.\n\n\
## Current board\n\
Columns are letters A-{last_col}, rows are numbers 1-{size}; A1 is the top-left corner.\n\n\
{board}\n\n\
## Recent moves\n\
{history}\n",
            board = Self::board_to_text(req.board),
            history = Self::history_to_text(req.board.history()),
        );

        if let Some(suggested) = req.suggested {
            prompt.push_str(&format!(
                "\n## Engine suggestion\nThe built-in engine suggests {}. \
Feel free to follow it or to pick a stronger move.\n",
                Self::position_label(suggested)
            ));
        }

        if let Some(instruction) = req.instruction {
            prompt.push_str(&format!(
                "\n## Player instruction\nThe player asked: \"{instruction}\". \
Honor it if the cell is legal.\n"
            ));
        }

        prompt.push_str(
            "\n## Your task\n\
Analyze the position and pick the best move.\n\n\
Reply strictly in this format:\n\
1. One or two sentences of analysis.\n\
2. On its own line, your move as: MOVE: <column letter><row number>\n\n\
Example:\n\
Black threatens an open three; I block it while extending my row.\n\
MOVE: H8\n\n\
Your move:",
        );

        prompt
    }

    /// System prompt for the chat assistant, with optional board context.
    #[must_use]
    pub fn build_chat_prompt(board: Option<&Board>, color: Option<Stone>) -> String {
        let mut prompt = "You are a friendly Gomoku companion. You can discuss strategy \
and openings, explain the rules, analyze the current position, and answer \
any question about the game. Keep replies short and conversational, under \
100 words."
            .to_string();

        if let Some(board) = board {
            let to_move = match color {
                Some(Stone::Black) => "black",
                Some(Stone::White) => "white",
                _ => "unknown",
            };
            prompt.push_str(&format!(
                "\n\n## Current board ({to_move} to move)\n{}",
                Self::board_to_text(board)
            ));
        }

        prompt
    }
}

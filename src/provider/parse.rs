//! Parsing of model replies into board positions

use std::sync::OnceLock;

use regex::Regex;

use crate::board::Pos;

use super::prompt::PromptBuilder;

/// A move extracted from a model reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedMove {
    pub pos: Pos,
    /// Analysis text preceding the move line; may be empty.
    pub reasoning: String,
}

pub struct ResponseParser;

impl ResponseParser {
    /// Parse a move reply.
    ///
    /// The primary format is a `MOVE: <col><row>` line, as requested by
    /// the prompt. Models drift, so bare coordinates (`H8`) and numeric
    /// `(row, col)` tuples anywhere in the text are accepted as
    /// fallbacks. Out-of-range cells are rejected.
    #[must_use]
    pub fn parse_move_response(reply: &str, size: usize) -> Option<ParsedMove> {
        let mut reasoning = Vec::new();
        let mut pos = None;

        for line in reply.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if let Some(rest) = strip_move_prefix(line) {
                if pos.is_none() {
                    pos = PromptBuilder::parse_position(rest, size);
                }
            } else {
                reasoning.push(line);
            }
        }

        if let Some(pos) = pos {
            return Some(ParsedMove {
                pos,
                reasoning: reasoning.join(" "),
            });
        }

        Self::alternative_formats(reply, size).map(|pos| ParsedMove {
            pos,
            reasoning: String::new(),
        })
    }

    /// Fallback extraction for replies that ignored the requested format.
    fn alternative_formats(reply: &str, size: usize) -> Option<Pos> {
        static COORD: OnceLock<Regex> = OnceLock::new();
        static TUPLE: OnceLock<Regex> = OnceLock::new();

        let coord = COORD.get_or_init(|| {
            Regex::new(r"\b([A-Za-z])(\d{1,2})\b").expect("coordinate pattern compiles")
        });
        for cap in coord.captures_iter(reply) {
            let label = format!("{}{}", &cap[1], &cap[2]);
            if let Some(pos) = PromptBuilder::parse_position(&label, size) {
                return Some(pos);
            }
        }

        let tuple = TUPLE.get_or_init(|| {
            Regex::new(r"\((\d{1,2})\s*,\s*(\d{1,2})\)").expect("tuple pattern compiles")
        });
        for cap in tuple.captures_iter(reply) {
            let row: usize = cap[1].parse().ok()?;
            let col: usize = cap[2].parse().ok()?;
            if row < size && col < size {
                return Some(Pos::new(row as u8, col as u8));
            }
        }

        None
    }
}

/// Strip a leading `MOVE:` marker, case-insensitively.
///
/// `get` keeps the slice on a char boundary, so replies starting with
/// multibyte text cannot panic.
fn strip_move_prefix(line: &str) -> Option<&str> {
    let head = line.get(..5)?;
    head.eq_ignore_ascii_case("move:").then(|| line[5..].trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_primary_format() {
        let reply = "White threatens an open three, so I block it.\nMOVE: H8";
        let parsed = ResponseParser::parse_move_response(reply, 25).unwrap();
        assert_eq!(parsed.pos, Pos::new(7, 7));
        assert_eq!(parsed.reasoning, "White threatens an open three, so I block it.");
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        let parsed = ResponseParser::parse_move_response("move: a1", 25).unwrap();
        assert_eq!(parsed.pos, Pos::new(0, 0));
    }

    #[test]
    fn test_parse_bare_coordinate_fallback() {
        let reply = "I would go with J10 here.";
        let parsed = ResponseParser::parse_move_response(reply, 25).unwrap();
        assert_eq!(parsed.pos, Pos::new(9, 9));
        assert!(parsed.reasoning.is_empty());
    }

    #[test]
    fn test_parse_tuple_fallback() {
        let reply = "best cell: (10, 14)";
        let parsed = ResponseParser::parse_move_response(reply, 25).unwrap();
        assert_eq!(parsed.pos, Pos::new(10, 14));
    }

    #[test]
    fn test_parse_rejects_out_of_range() {
        assert!(ResponseParser::parse_move_response("MOVE: Z99", 25).is_none());
        assert!(ResponseParser::parse_move_response("(30, 2)", 25).is_none());
    }

    #[test]
    fn test_parse_rejects_no_coordinates() {
        assert!(ResponseParser::parse_move_response("I resign.", 25).is_none());
    }

    #[test]
    fn test_first_move_line_wins() {
        let reply = "MOVE: C3\nMOVE: D4";
        let parsed = ResponseParser::parse_move_response(reply, 25).unwrap();
        assert_eq!(parsed.pos, Pos::new(2, 2));
    }

    #[test]
    fn test_reasoning_spans_multiple_lines() {
        let reply = "First thought.\nSecond thought.\nMOVE: E5";
        let parsed = ResponseParser::parse_move_response(reply, 25).unwrap();
        assert_eq!(parsed.reasoning, "First thought. Second thought.");
    }
}

//! Position evaluation: pattern weights and threat scoring

pub mod heuristic;
pub mod patterns;

pub use heuristic::{evaluate, score_move};
pub use patterns::PatternScore;

//! Terminal user interface (ratatui/crossterm)

pub mod app;
pub mod board_view;
pub mod game_state;
pub mod theme;

pub use app::App;
pub use game_state::GameSession;

//! Color styles for the terminal interface

use ratatui::style::{Color, Modifier, Style};

pub fn title() -> Style {
    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
}

pub fn grid() -> Style {
    Style::default().fg(Color::DarkGray)
}

pub fn label() -> Style {
    Style::default().fg(Color::Yellow)
}

pub fn black_stone() -> Style {
    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
}

pub fn white_stone() -> Style {
    Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
}

/// The keyboard cursor cell.
pub fn cursor() -> Style {
    Style::default().fg(Color::Black).bg(Color::Red)
}

/// Highlight for the most recently played stone.
pub fn last_move() -> Style {
    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
}

pub fn chat_user() -> Style {
    Style::default().fg(Color::Green)
}

pub fn chat_assistant() -> Style {
    Style::default().fg(Color::Magenta)
}

pub fn input() -> Style {
    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
}

pub fn message() -> Style {
    Style::default().fg(Color::Yellow)
}

//! Rendering of the board, status, chat and help panes

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::board::{GameOutcome, Pos, Stone};
use crate::chat::ChatRole;

use super::app::{App, InputMode};
use super::game_state::HUMAN;
use super::theme;

pub fn render(frame: &mut Frame, app: &App) {
    let board_width = (3 + 2 * app.session.board.size() + 2) as u16;

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(board_width), Constraint::Min(34)])
        .split(frame.area());

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(10), Constraint::Length(3)])
        .split(columns[0]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7),
            Constraint::Min(8),
            Constraint::Length(5),
        ])
        .split(columns[1]);

    render_board(frame, app, left[0]);
    render_message(frame, app, left[1]);
    render_status(frame, app, right[0]);
    render_chat(frame, app, right[1]);
    render_controls(frame, right[2]);

    if app.show_help {
        render_help(frame);
    }
}

fn render_board(frame: &mut Frame, app: &App, area: Rect) {
    let board = &app.session.board;
    let size = board.size() as u8;
    let last_move = board.last_move().map(|mv| mv.pos);
    let cursor_active = app.input_mode == InputMode::Game && !app.session.is_over();

    let mut lines = Vec::with_capacity(board.size() + 1);

    let mut header = vec![Span::raw("   ")];
    for col in 0..size {
        header.push(Span::styled(
            format!("{} ", (b'A' + col) as char),
            theme::label(),
        ));
    }
    lines.push(Line::from(header));

    for row in 0..size {
        let mut spans = vec![Span::styled(format!("{:>2} ", row + 1), theme::label())];
        for col in 0..size {
            let pos = Pos::new(row, col);
            let (symbol, style) = match board.get(pos) {
                Stone::Black => ("●", theme::black_stone()),
                Stone::White => ("○", theme::white_stone()),
                Stone::Empty => ("·", theme::grid()),
            };

            let style = if cursor_active && pos == app.cursor {
                theme::cursor()
            } else if last_move == Some(pos) {
                theme::last_move()
            } else {
                style
            };

            spans.push(Span::styled(format!("{symbol} "), style));
        }
        lines.push(Line::from(spans));
    }

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(Span::styled(" Gomoku ", theme::title())),
    );
    frame.render_widget(widget, area);
}

fn render_message(frame: &mut Frame, app: &App, area: Rect) {
    let text = if app.thinking {
        "AI thinking...".to_string()
    } else {
        match app.session.outcome {
            GameOutcome::BlackWins => "You win! Press 'r' to play again".to_string(),
            GameOutcome::WhiteWins => "AI wins. Press 'r' to play again".to_string(),
            GameOutcome::Draw => "Draw - the board is full. Press 'r' to play again".to_string(),
            GameOutcome::InProgress => app.message.clone().unwrap_or_default(),
        }
    };

    let widget = Paragraph::new(text)
        .style(theme::message())
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(widget, area);
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    let session = &app.session;
    let to_move = if session.current_turn == HUMAN {
        "you (●)"
    } else {
        "AI (○)"
    };

    let lines = vec![
        Line::from(format!("Opponent: {}", session.mode_label())),
        Line::from(format!("Move: {}", session.turn + 1)),
        Line::from(format!("To play: {to_move}")),
        Line::from(match app.input_mode {
            InputMode::Game => "Mode: game",
            InputMode::Chat => "Mode: chat",
        }),
    ];

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(Span::styled(" Status ", theme::title())),
    );
    frame.render_widget(widget, area);
}

fn render_chat(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = Vec::new();

    for msg in app.session.chat.messages() {
        let (prefix, style) = match msg.role {
            ChatRole::User => ("You: ", theme::chat_user()),
            ChatRole::Assistant => ("AI:  ", theme::chat_assistant()),
        };
        lines.push(Line::from(vec![
            Span::styled(prefix, style),
            Span::raw(msg.content.clone()),
        ]));
    }

    if app.input_mode == InputMode::Chat {
        lines.push(Line::from(vec![Span::styled(
            format!("> {}_", app.chat_input),
            theme::input(),
        )]));
        lines.push(Line::from(Span::styled(
            "Enter: send | Esc: back to game",
            theme::grid(),
        )));
    }

    let widget = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(" Chat ", theme::title())),
        );
    frame.render_widget(widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from("Arrows/WASD: move   Enter/Space: place"),
        Line::from("c: chat   h: help   r: restart   q: quit"),
    ];
    let widget = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(" Controls ", theme::title())),
        );
    frame.render_widget(widget, area);
}

fn render_help(frame: &mut Frame) {
    let area = centered_rect(50, 60, frame.area());

    let lines = vec![
        Line::from(Span::styled("Gomoku Help", theme::title())),
        Line::from(""),
        Line::from("Goal: line up five stones before the AI does."),
        Line::from("You play black (●) and move first."),
        Line::from(""),
        Line::from("Arrows or WASD   move the cursor"),
        Line::from("Enter or Space   place a stone"),
        Line::from("c or /           chat with the AI"),
        Line::from("r                restart the game"),
        Line::from("q                quit"),
        Line::from(""),
        Line::from(Span::styled("Press any key to close", theme::grid())),
    ];

    frame.render_widget(Clear, area);
    let widget = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(widget, area);
}

/// A centered sub-rectangle taking the given percentages of the area.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

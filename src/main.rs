use std::io::{self, BufReader, Write};

use anyhow::Context;
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use gomoku::config::{self, CliOverrides, PlayMode};
use gomoku::engine::Difficulty;
use gomoku::logging;
use gomoku::provider::create_provider;
use gomoku::ui::{App, GameSession};

/// Terminal Gomoku with traditional and LLM-backed opponents.
#[derive(Debug, Parser)]
#[command(name = "gomoku", version, about)]
struct Cli {
    /// Opponent: easy/medium/hard (built-in) or ai (configured service)
    #[arg(short, long, default_value = "medium")]
    difficulty: String,

    /// API key for the AI service (overrides config file and environment)
    #[arg(long)]
    api_key: Option<String>,

    /// API endpoint for the AI service (overrides config file and environment)
    #[arg(long)]
    endpoint: Option<String>,

    /// Model name for the AI service (overrides config file and environment)
    #[arg(long)]
    model: Option<String>,

    /// Run the interactive AI service setup and exit
    #[arg(long)]
    config: bool,

    /// Print the current configuration and exit
    #[arg(long)]
    show_config: bool,

    /// Delete the config file (back to the built-in engine) and exit
    #[arg(long)]
    reset_config: bool,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.config {
        return run_setup();
    }
    if cli.show_config {
        return show_config();
    }
    if cli.reset_config {
        return reset_config();
    }

    logging::init();

    let mode: PlayMode = cli.difficulty.parse()?;

    let file = match config::config_file_path() {
        Some(path) => config::load_file_config(&path)?,
        None => None,
    };
    let game = config::resolve_game(file.as_ref())?;

    let overrides = CliOverrides {
        api_key: cli.api_key,
        endpoint: cli.endpoint,
        model: cli.model,
    };

    // In traditional mode a broken service config must not block the
    // game; the provider is still useful for chat when it resolves.
    let settings = match config::resolve(file.as_ref(), &overrides) {
        Ok(settings) => settings,
        Err(err) if matches!(mode, PlayMode::Traditional(_)) => {
            log::warn!("AI service unavailable: {err}");
            Default::default()
        }
        Err(err) => return Err(err).context("the 'ai' difficulty needs a configured service"),
    };

    let provider = create_provider(&settings)?;

    let (difficulty, use_service) = match mode {
        PlayMode::Traditional(difficulty) => (difficulty, false),
        PlayMode::Service => {
            if provider.is_none() {
                log::warn!("no AI service configured; falling back to the built-in engine");
            }
            // A failing service falls back to the strongest traditional
            // opponent.
            (Difficulty::Hard, provider.is_some())
        }
    };

    let provider_label = provider.as_ref().map(|p| {
        format!(
            "{} ({})",
            p.name(),
            settings.model_or_default().unwrap_or("default model")
        )
    });

    log::info!(
        "starting game: difficulty={difficulty}, service={use_service}, board={}x{}, depth={}",
        game.board_size,
        game.board_size,
        game.search_depth
    );

    let session = GameSession::new(difficulty, game, provider, use_service, provider_label);
    run_terminal(session)
}

fn run_terminal(session: GameSession) -> anyhow::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(session);
    let result = app.run(&mut terminal);

    // Restore the terminal even when the app loop failed
    let _ = disable_raw_mode();
    let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let _ = terminal.show_cursor();

    result.context("terminal loop failed")
}

fn run_setup() -> anyhow::Result<()> {
    let path = config::config_file_path().context("could not determine home directory")?;

    let stdin = io::stdin();
    let mut input = BufReader::new(stdin.lock());
    let mut output = io::stdout();

    let Some(new_config) = config::run_wizard(&mut input, &mut output)? else {
        return Ok(());
    };

    config::save_file_config(&path, &new_config)?;
    writeln!(output, "Configuration written to {}", path.display())?;
    Ok(())
}

fn show_config() -> anyhow::Result<()> {
    let path = config::config_file_path().context("could not determine home directory")?;
    println!("Config file: {}", path.display());

    let file = config::load_file_config(&path)?;
    if file.is_none() {
        println!("No config file found; the built-in engine is used.");
        println!("Run 'gomoku --config' to set up an AI service.");
    }

    match config::resolve(file.as_ref(), &CliOverrides::default()) {
        Ok(settings) => println!("\n{}", settings.summary()),
        Err(err) => println!("\nConfiguration problem: {err}"),
    }
    Ok(())
}

fn reset_config() -> anyhow::Result<()> {
    let path = config::config_file_path().context("could not determine home directory")?;
    if config::delete_file_config(&path)? {
        println!("Configuration removed; the built-in engine will be used.");
    } else {
        println!("No config file to remove.");
    }
    Ok(())
}

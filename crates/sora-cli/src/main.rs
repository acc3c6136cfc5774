mod app;
mod event;
mod theme;
mod ui;

use app::App;
use clap::{Parser, Subcommand};
use ratatui::DefaultTerminal;
use sora_client::{Client, GenerationStatus, RecordUpdate, Session};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sora-cli")]
#[command(about = "Terminal studio for Sora-2 video generation")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Base URL of the generation server
    #[arg(short, long, env = "SORA_SERVER_URL", default_value = "http://127.0.0.1:3000")]
    server: String,

    /// Directory for TUI log files
    #[arg(long, env = "SORA_LOG_DIR", default_value = "logs")]
    log_dir: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the TUI (Terminal User Interface) - Default
    Tui,
    /// Generate one video and print progress to stdout
    Generate {
        /// Prompt describing the video
        #[arg(required = true, num_args = 1..)]
        prompt: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    color_eyre::install().ok();
    let cli = Cli::parse();

    let client = Client::new(&cli.server)?;

    match cli.command.unwrap_or(Commands::Tui) {
        Commands::Tui => start_tui(client, cli.server, &cli.log_dir).await?,
        Commands::Generate { prompt } => handle_generate(client, &prompt.join(" ")).await?,
    }

    Ok(())
}

async fn handle_generate(client: Client, prompt: &str) -> anyhow::Result<()> {
    // stdout carries progress; logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    println!("POST {}", client.endpoint());
    let mut session = Session::new(client);
    let id = session.submit(prompt)?;

    while session.is_generating() {
        let Some((update, _)) = session.next_update().await else {
            break;
        };
        match update.update {
            RecordUpdate::Event(event) => match event.message() {
                Some(message) => println!("[{:>3}%] {}", event.progress(), message),
                None => println!("[{:>3}%] {}", event.progress(), event.status().as_str()),
            },
            RecordUpdate::TransportFailed(reason) => eprintln!("Connection error: {}", reason),
        }
    }

    let record = session
        .records()
        .get(&id)
        .ok_or_else(|| anyhow::anyhow!("record {} disappeared", id))?;

    println!(
        "Record {} submitted {}: {} at {}%",
        record.id,
        record.timestamp.to_rfc3339(),
        record.status.as_str(),
        record.progress
    );

    match record.status {
        GenerationStatus::Completed => {
            println!("Video ready: {}", record.video_url.as_deref().unwrap_or_default());
            Ok(())
        }
        _ => Err(anyhow::anyhow!("Generation failed")),
    }
}

async fn start_tui(client: Client, server_url: String, log_dir: &str) -> anyhow::Result<()> {
    // The terminal belongs to ratatui, so logs go to a daily file. A bad
    // directory must fail here, before the terminal is taken over.
    let file_appender = log_file_appender(log_dir)?;
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,sora_client=debug".into()),
        )
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();

    tracing::info!("Starting TUI against {}", server_url);

    // Initialize terminal (ratatui::init handles raw mode + alternate screen)
    let terminal = ratatui::init();

    let result = run_app(terminal, App::new(Session::new(client), server_url)).await;

    // Restore terminal (always, even on error)
    ratatui::restore();

    result
}

/// Daily rolling `sora-cli.<date>.log` in `log_dir`, created if missing.
fn log_file_appender(log_dir: &str) -> anyhow::Result<RollingFileAppender> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("sora-cli")
        .filename_suffix("log")
        .build(log_dir)
        .map_err(|e| anyhow::anyhow!("cannot log to {}: {}", log_dir, e))
}

async fn run_app(mut terminal: DefaultTerminal, mut app: App) -> anyhow::Result<()> {
    loop {
        // Apply whatever the generation tasks sent since the last frame
        app.on_tick();

        // Draw
        terminal.draw(|frame| ui::render(frame, &app))?;

        // Check quit flag
        if app.should_quit {
            break;
        }

        // Poll events with a 100ms timeout; blocking is fine, the
        // generation tasks run on other worker threads
        if let Some(evt) = tokio::task::block_in_place(|| event::poll_event(100))? {
            event::handle_event(&mut app, evt)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_dir_that_cannot_be_created_is_an_error() {
        let err = log_file_appender("/proc/sora-cli/logs").unwrap_err();
        assert!(err.to_string().contains("/proc/sora-cli/logs"));
    }

    #[test]
    fn test_log_dir_is_created() {
        let dir = std::env::temp_dir().join(format!("sora-cli-logs-{}", std::process::id()));
        let dir_str = dir.to_string_lossy().to_string();

        assert!(log_file_appender(&dir_str).is_ok());
        assert!(dir.is_dir());

        let _ = std::fs::remove_dir_all(&dir);
    }
}

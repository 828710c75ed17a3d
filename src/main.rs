use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

use meet_scribe::audio::{AudioSource, AudioSourceConfig, WavFileSource};
use meet_scribe::recording::{Recorder, RecorderConfig};
use meet_scribe::session::{SessionId, SessionStore};
use meet_scribe::stt::{ChatClient, OpenAiTranscriber};
use meet_scribe::{create_router, AppState, Config};

#[derive(Parser)]
#[command(name = "meet-scribe", about = "Meeting recording and transcription")]
struct Cli {
    /// Path to the config file (without extension)
    #[arg(long, default_value = "config/meet-scribe")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Record a session from a WAV file, transcribing as it streams
    Record {
        /// Input WAV file
        #[arg(long)]
        input: PathBuf,

        /// Language hint for transcription (overrides config)
        #[arg(long)]
        language: Option<String>,
    },
    /// List saved sessions, newest first
    List,
    /// Show a saved session's title and transcript
    Show {
        /// Session id (directory name, e.g. 2025-10-28_09-30-00)
        session_id: String,
    },
    /// Add a one-time title to a saved session
    Title {
        session_id: String,
        title: String,
    },
    /// Summarize a saved transcript with a chat completion
    Summarize {
        session_id: String,

        /// Chat model (overrides config)
        #[arg(long)]
        model: Option<String>,
    },
    /// Run the HTTP API server
    Serve,
}

fn api_key() -> Result<String> {
    std::env::var("OPENAI_API_KEY").context("OPENAI_API_KEY is not set")
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let cfg = Config::load(&cli.config)?;
    let store = SessionStore::new(&cfg.audio.recordings_path);

    match cli.command {
        Command::Record { input, language } => {
            let transcriber = OpenAiTranscriber::new(
                cfg.stt.base_url.clone(),
                api_key()?,
                cfg.stt.model.clone(),
            )?;

            let recorder_config = RecorderConfig {
                flush_interval: Duration::from_secs(cfg.stt.flush_interval_secs),
                language: language.unwrap_or_else(|| cfg.stt.language.clone()),
                response_format: cfg.stt.response_format.clone(),
                ..RecorderConfig::default()
            };

            let recorder = Recorder::new(store, Box::new(transcriber), recorder_config);

            let source_config = AudioSourceConfig {
                frame_duration_ms: cfg.audio.frame_duration_ms,
                ..AudioSourceConfig::default()
            };
            let mut source = WavFileSource::new(&input, source_config);
            let frames = source.start().await?;

            let outcome = recorder.record(frames).await?;
            source.stop().await?;

            println!(
                "Session {} recorded: {:.1}s, {} flushes",
                outcome.session_id,
                outcome.duration_ms as f64 / 1000.0,
                outcome.flushes
            );
            if !outcome.transcript.is_empty() {
                println!("\n{}", outcome.transcript);
            }
        }

        Command::List => {
            let entries = store.list()?;
            if entries.is_empty() {
                println!("No sessions found");
            }
            for entry in entries {
                let title = entry.title.as_deref().unwrap_or("(untitled)");
                println!("{}  {}  {}", entry.id, entry.label, title);
            }
        }

        Command::Show { session_id } => {
            let id: SessionId = session_id.parse()?;
            anyhow::ensure!(store.exists(id), "Session {} not found", id);

            match store.load_title(id)? {
                Some(title) => println!("# {}", title),
                None => println!("# (untitled - add one with `meet-scribe title`)"),
            }
            println!("\n{}", store.load_transcript(id)?);
        }

        Command::Title { session_id, title } => {
            let id: SessionId = session_id.parse()?;
            store.save_title(id, &title)?;
            println!("Title saved for session {}", id);
        }

        Command::Summarize { session_id, model } => {
            let id: SessionId = session_id.parse()?;
            let transcript = store.load_transcript(id)?;
            anyhow::ensure!(!transcript.is_empty(), "Session {} has no transcript", id);

            let chat = ChatClient::new(cfg.stt.base_url.clone(), api_key()?)?;
            let model = model.unwrap_or_else(|| cfg.stt.chat_model.clone());
            let prompt = format!(
                "Summarize the following meeting transcript:\n\n{}",
                transcript
            );

            println!("{}", chat.complete(&prompt, &model).await?);
        }

        Command::Serve => {
            let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);

            info!("{} listening on {}", cfg.service.name, addr);
            info!("Recordings root: {}", store.root().display());

            let router = create_router(AppState::new(store));
            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("Failed to bind {}", addr))?;

            axum::serve(listener, router).await?;
        }
    }

    Ok(())
}

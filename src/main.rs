use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use clawmini::adapters::console::console_message;
use clawmini::banner::{BannerInfo, print_banner, print_session_summary};
use clawmini::commands::{CommandRegistry, CommandResult, SessionInfo};
use clawmini::config::{Settings, StoreKind};
use clawmini::consts::{CLI_CONVERSATION_ID, CONSOLE_ADAPTER, DEFAULT_HANDLE_CAPACITY};
use clawmini::engine::Engine;
use clawmini::engine::chat::ChatEngine;
use clawmini::engine::handle::EngineHandle;
use clawmini::error::RouterError;

#[derive(Parser)]
#[command(name = "clawmini", version, about = "Record a message, route it, deliver the reply.")]
struct Cli {
    /// Memory store backend
    #[arg(short, long, value_enum, default_value_t = StoreKind::Json)]
    store: StoreKind,

    /// Memory file (json) or database (sqlite) path
    #[arg(short, long, env = "CLAWMINI_MEMORY")]
    memory: Option<PathBuf>,

    /// Backend to route messages to (defaults to the first registered)
    #[arg(short, long)]
    backend: Option<String>,

    /// Override the simulated backends' latency, in milliseconds
    #[arg(long)]
    latency_ms: Option<u64>,

    /// Conversation id for this session
    #[arg(short, long, default_value = CLI_CONVERSATION_ID)]
    conversation: String,

    /// Send a single message and exit (non-interactive)
    #[arg(short, long)]
    run: Option<String>,

    /// Log more (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn settings(&self) -> Settings {
        Settings {
            store: self.store,
            memory_path: self.memory.clone(),
            backend: self.backend.clone(),
            latency: self.latency_ms.map(Duration::from_millis),
            conversation_id: self.conversation.clone(),
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("clawmini={level}"))),
        )
        .with_writer(io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = cli.settings();
    let engine = Arc::new(ChatEngine::from_settings(&settings).await?);
    let (handle, _server) =
        EngineHandle::spawn(Arc::clone(&engine) as Arc<dyn Engine>, DEFAULT_HANDLE_CAPACITY);

    let backend = settings.backend.as_deref();
    if let Some(name) = backend
        && !engine.router().contains(name).await
    {
        let known = engine.router().names().await.join(", ");
        return Err(RouterError::UnknownBackend {
            name: Some(name.to_string()),
        })
        .with_context(|| format!("--backend must be one of: {known}"));
    }

    // Single message mode
    if let Some(text) = &cli.run {
        let message = console_message(text, &settings.conversation_id);
        if let Err(e) = handle.submit(CONSOLE_ADAPTER, message, backend).await {
            eprintln!("\nerror: {e}");
        }
        engine.scheduler().cancel_all();
        return Ok(());
    }

    let backends = engine.router().names().await;
    let active = match backend {
        Some(name) => name.to_string(),
        None => engine
            .router()
            .default_backend()
            .await
            .unwrap_or_else(|| "(none)".to_string()),
    };
    let memory_path = settings.memory_path();
    let store_label = settings.store.to_string();
    print_banner(&BannerInfo {
        backends: &backends,
        backend: &active,
        store: &store_label,
        memory: &memory_path,
        conversation: &settings.conversation_id,
    });

    let commands = CommandRegistry::new();
    let mut sent = 0usize;

    // REPL on async stdin so Ctrl+C is caught at the prompt too
    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        print!("\nyou> ");
        io::stdout().flush()?;

        let line = tokio::select! {
            result = lines.next_line() => {
                match result {
                    Ok(Some(line)) => line,
                    Ok(None) => {
                        // Ctrl+D (EOF)
                        println!();
                        break;
                    }
                    Err(e) => {
                        eprintln!("input error: {}", e);
                        break;
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                println!();
                break;
            }
        };

        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let info = SessionInfo {
            engine: &engine,
            conversation_id: &settings.conversation_id,
            backend,
        };
        match commands.dispatch(input, &info).await {
            CommandResult::Quit => break,
            CommandResult::Handled => continue,
            CommandResult::NotACommand => {}
        }

        let message = console_message(input, &settings.conversation_id);

        // Ctrl+C stops waiting for the reply, not the REPL. The request
        // itself keeps running on the engine side.
        tokio::select! {
            result = handle.submit(CONSOLE_ADAPTER, message, backend) => {
                match result {
                    Ok(_) => sent += 1,
                    Err(e) => eprintln!("\nerror: {}", e),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                println!("\n\ninterrupted");
            }
        }
    }

    let cancelled = engine.scheduler().cancel_all();
    if cancelled > 0 {
        tracing::info!(cancelled, "pending tasks cancelled on exit");
    }
    print_session_summary(sent);
    Ok(())
}

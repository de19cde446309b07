//! Parlance application binary - composition root.
//!
//! `parlance serve` loads configuration, checks the upstream settings and
//! starts the axum relay. `parlance chat` runs the widget state machine in
//! the terminal against a running relay.

mod cli;

use std::io::Write;
use std::sync::Arc;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use parlance_api::routes::start_server;
use parlance_api::{AppState, HttpDialogueClient};
use parlance_core::{Author, ParlanceConfig};
use parlance_widget::view_model::{ENDED_BANNER, RESET_LABEL};
use parlance_widget::{HttpRelay, Notice, ViewModel, Widget};

use cli::{CliArgs, Command};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config.
    let config_file = args.resolve_config_path();
    let mut config = ParlanceConfig::load_optional(&config_file)?;
    config.apply_env()?;

    // Tracing (stderr, stdout belongs to the chat transcript).
    let level = args
        .log_level
        .clone()
        .unwrap_or_else(|| config.general.log_level.clone());
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting Parlance v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration resolved");

    match args.command {
        Command::Serve { port } => serve(config, port).await,
        Command::Chat { relay_url } => chat(&config, relay_url).await,
    }
}

async fn serve(
    mut config: ParlanceConfig,
    port: Option<u16>,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(port) = port {
        config.server.port = port;
    }

    if let Err(e) = config.validate() {
        tracing::error!(error = %e, "Refusing to start with incomplete upstream configuration");
        return Err(e.into());
    }

    let dialogue = HttpDialogueClient::new(&config.upstream)?;
    tracing::info!(
        endpoint = %config.upstream.endpoint,
        version_id = ?config.upstream.version_id,
        timeout_secs = config.upstream.timeout_secs,
        "Upstream dialogue client ready"
    );

    let state = AppState::new(config.clone(), Arc::new(dialogue));
    start_server(&config, state).await?;
    Ok(())
}

async fn chat(
    config: &ParlanceConfig,
    relay_url: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let relay_url = relay_url.unwrap_or_else(|| config.widget.relay_url.clone());
    let relay = HttpRelay::new(&relay_url)?;
    tracing::info!(url = %relay.prompt_url(), "Chatting through relay");

    let mut widget = Widget::new(relay);
    let mut printed = 0;
    println!("Type a message. /reset starts over, /quit exits.");
    show_prompt(&widget.view())?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        let session_before = widget.state().session_id();

        match line {
            "/quit" => break,
            "/reset" => widget.reset().await,
            _ => widget.submit(line).await,
        }

        let view = widget.view();
        if view.session_id != session_before {
            printed = 0;
            println!("-- new conversation --");
        }
        printed = render(&view, printed);
        if let Some(Notice::RelayFailed { message, .. }) = widget.state().notice() {
            tracing::debug!(detail = %message, "Relay failure detail");
        }
        show_prompt(&view)?;
    }

    Ok(())
}

/// Print transcript entries past `printed` and any status lines.
/// Returns the new printed count.
fn render(view: &ViewModel, printed: usize) -> usize {
    for message in view.messages.iter().skip(printed) {
        if message.author == Author::Agent {
            println!("agent> {}", message.content);
        }
    }
    if let Some(notice) = &view.notice {
        println!("! {notice}");
    }
    if view.show_ended_banner {
        println!("{ENDED_BANNER} {RESET_LABEL} (/reset)");
    }
    view.messages.len()
}

fn show_prompt(view: &ViewModel) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    write!(stdout, "[{}] > ", view.placeholder)?;
    stdout.flush()
}

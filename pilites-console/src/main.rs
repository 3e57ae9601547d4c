//! PiLites console entry point.
//!
//! ```text
//! pilites-console channels                   List configured channels
//! pilites-console plays                      List plays
//! pilites-console layout <play>              Draw each channel's regions
//! pilites-console effects                    Dump the effect registry
//! pilites-console preview <play>             Run and follow a preview
//! pilites-console live [--start <play>]      Follow (or start) the live show
//! pilites-console test-region <play> <region>
//! pilites-console --gen-config               Dump default config and exit
//! ```

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use pilites_core::effects::ParamSpec;
use pilites_core::realtime::LIVE_STOP_PROMPT;
use pilites_core::{
    EffectKind, ReqwestTransport, RpcGateway, SessionClient, SessionKind, SessionOptions,
    WsConnector, segment_channel,
};

use pilites_console::config::ConsoleConfig;
use pilites_console::dashboard::Dashboard;
use pilites_console::input::{HELP, InputAction, is_affirmative, translate_line};
use pilites_console::render::{self, StripStyle};

type Gateway = RpcGateway<ReqwestTransport>;

// ── CLI ──────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "pilites-console", about = "PiLites LED controller console")]
struct Cli {
    /// Path to configuration TOML file.
    #[arg(short, long, default_value = "pilites-console.toml")]
    config: PathBuf,

    /// Controller base URL (overrides config). Example: http://pilites.local:8000
    #[arg(short, long)]
    server: Option<String>,

    /// Print the default configuration to stdout and exit.
    #[arg(long)]
    gen_config: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List configured channels.
    Channels,
    /// List plays.
    Plays,
    /// Draw the region layout of every channel for a play.
    Layout { play_id: String },
    /// Show every effect and its parameters.
    Effects,
    /// Start a preview of a play and follow it.
    Preview { play_id: String },
    /// Follow the live session.
    Live {
        /// Start this play on the live output first.
        #[arg(long)]
        start: Option<String>,
    },
    /// Light one region of a play on the hardware.
    TestRegion { play_id: String, region_id: String },
}

// ── Main ─────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.gen_config {
        println!("{}", ConsoleConfig::default_toml()?);
        return Ok(());
    }

    let mut config = ConsoleConfig::load(&cli.config);
    if let Some(url) = cli.server {
        config.server.base_url = url;
    }

    // Init tracing.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!("pilites-console v{}", env!("CARGO_PKG_VERSION"));

    let Some(command) = cli.command else {
        println!("no command given; see --help");
        return Ok(());
    };

    let transport =
        ReqwestTransport::new(&config.server.base_url, config.server.request_timeout())?;
    let gateway = Arc::new(RpcGateway::new(transport));
    let style = StripStyle {
        width: config.display.strip_width,
        color: config.display.color,
    };

    let result = match command {
        Command::Channels => list_channels(&gateway).await,
        Command::Plays => list_plays(&gateway).await,
        Command::Layout { play_id } => show_layout(&gateway, &play_id, style).await,
        Command::Effects => {
            list_effects();
            Ok(())
        }
        Command::Preview { play_id } => {
            follow(&config, gateway, SessionKind::Preview, Some(play_id), style).await
        }
        Command::Live { start } => {
            follow(&config, gateway, SessionKind::Live, start, style).await
        }
        Command::TestRegion { play_id, region_id } => gateway
            .test_region(&play_id, &region_id)
            .await
            .map(|()| println!("region {region_id} lit")),
    };

    if let Err(e) = result {
        error!("{e}");
        std::process::exit(1);
    }
    Ok(())
}

// ── One-shot commands ────────────────────────────────────────────

async fn list_channels(gateway: &Gateway) -> Result<(), pilites_core::PilitesError> {
    let channels = gateway.list_channels().await?;
    if channels.is_empty() {
        println!("no channels configured");
    }
    for channel in &channels {
        println!("{}  {}", channel.id, render::channel_header(channel));
    }
    Ok(())
}

async fn list_plays(gateway: &Gateway) -> Result<(), pilites_core::PilitesError> {
    let plays = gateway.list_plays().await?;
    if plays.is_empty() {
        println!("no plays");
    }
    for play in &plays {
        println!("{}  {}", play.id, play.name);
    }
    Ok(())
}

async fn show_layout(
    gateway: &Gateway,
    play_id: &str,
    style: StripStyle,
) -> Result<(), pilites_core::PilitesError> {
    let channels = gateway.list_channels().await?;
    let play = gateway.get_play(play_id).await?;

    println!("{} ({} regions, {} cues)", play.name, play.regions.len(), play.cues.len());
    for channel in &channels {
        let segments = segment_channel(channel.led_count, play.regions_on(&channel.id));
        println!();
        println!("{}", render::channel_header(channel));
        println!("{}", render::layout_bar(&segments, channel.led_count, style));
        println!("{}", render::ruler(channel.led_count, style.width));
        for line in render::legend(&segments, style) {
            println!("  {line}");
        }
    }

    for region in play.unknown_channel_refs(&channels) {
        warn!(region = %region.name, channel = %region.channel_id, "region on unknown channel");
    }
    for conflict in play.overlap_conflicts() {
        println!(
            "warning: cue '{}' drives overlapping regions {} and {} on {}",
            conflict.cue_name, conflict.first_region, conflict.second_region, conflict.channel_id
        );
    }
    Ok(())
}

fn describe_param(spec: &ParamSpec) -> String {
    match spec {
        ParamSpec::Color { default } => format!("color, default {default}"),
        ParamSpec::Number {
            default,
            min,
            max,
            step,
        } => format!("number {min}..={max} step {step}, default {default}"),
        ParamSpec::Select { default, options } => {
            let values: Vec<&str> = options.iter().map(|o| o.value).collect();
            format!("one of {}, default {default}", values.join("|"))
        }
    }
}

fn list_effects() {
    for kind in EffectKind::ALL {
        let schema = kind.schema();
        println!("{}  ({})", schema.label, kind.id());
        for param in schema.params {
            println!(
                "    {:<14} {:<16} {}",
                param.key,
                param.label,
                describe_param(&param.spec)
            );
        }
    }
}

// ── Sessions ─────────────────────────────────────────────────────

async fn follow(
    config: &ConsoleConfig,
    gateway: Arc<Gateway>,
    kind: SessionKind,
    start: Option<String>,
    style: StripStyle,
) -> Result<(), pilites_core::PilitesError> {
    let channels = gateway.list_channels().await?;
    let connector = Arc::new(WsConnector::new(&config.server.base_url)?);
    let options = SessionOptions {
        reconnect_delay: config.session.reconnect_delay(),
    };
    let (notice_tx, mut notices) = mpsc::unbounded_channel();
    let mut client = SessionClient::new(kind, gateway, connector, options, notice_tx);

    if let Err(e) = client.attach().await {
        warn!("could not fetch {kind} status: {e}");
    }
    if let Some(play_id) = start {
        client.start(&play_id).await?;
    }

    println!("{HELP}");
    let mut dashboard = Dashboard::new(channels, style);
    let mut state = client.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = std::io::stdout();
    dashboard.draw(&mut stdout, &state.borrow_and_update())?;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => break,

            changed = state.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = state.borrow_and_update().clone();
                dashboard.draw(&mut stdout, &snapshot)?;
            }

            Some(notice) = notices.recv() => {
                dashboard.detach();
                println!("! {notice}");
            }

            line = lines.next_line() => {
                let Some(line) = line? else { break };
                dashboard.detach();
                let Some(action) = translate_line(&line) else {
                    println!("{HELP}");
                    continue;
                };
                if action == InputAction::Quit {
                    break;
                }
                let outcome = match action {
                    InputAction::Next => client.advance().await,
                    InputAction::Blackout => client.toggle_blackout().await,
                    InputAction::Stop => {
                        let confirmed = if kind.stop_needs_confirmation() {
                            print!("{LIVE_STOP_PROMPT} [y/N] ");
                            stdout.flush()?;
                            lines.next_line().await?.is_some_and(|a| is_affirmative(&a))
                        } else {
                            true
                        };
                        client.stop(|_| confirmed).await.map(|stopped| {
                            if !stopped {
                                println!("stop cancelled");
                            }
                        })
                    }
                    InputAction::Quit => Ok(()),
                };
                if let Err(e) = outcome {
                    println!("! {e}");
                }
            }
        }
    }

    client.teardown().await;
    info!(%kind, "console detached");
    Ok(())
}

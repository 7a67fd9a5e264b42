//! Drives one profile screen session from the command line.
//!
//! Every state and presenter output is printed to stdout as a JSON line;
//! logs go to stderr or to the file named by `STATEFUL_SCREEN_LOG`.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use futures::stream::{self, BoxStream};
use futures::StreamExt;
use serde_json::{json, Value};

use stateful_screen::config::Config;
use stateful_screen::logging;
use stateful_screen::profile::{ProfileViewEvents, RecordingRouter, StubProfileService};
use stateful_screen::session::{ProfileDependencies, ProfileSession};

#[derive(Parser)]
#[command(name = "stateful-screen")]
#[command(about = "Run a profile screen session against the stub service", long_about = None)]
struct Cli {
    /// Config file path (default: platform config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// View events to replay, in order
    #[arg(long, value_enum, value_delimiter = ',')]
    taps: Vec<Tap>,

    /// Delay before each replayed view event
    #[arg(long, default_value = "1500")]
    tap_interval_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Tap {
    Refresh,
    Retry,
    Email,
    Orders,
}

impl Tap {
    fn emit(self, view: &ProfileViewEvents) {
        match self {
            Tap::Refresh => view.pull_to_refresh.emit(()),
            Tap::Retry => view.retry_button_tap.emit(()),
            Tap::Email => view.email_update_tap.emit(()),
            Tap::Orders => view.my_orders_tap.emit(()),
        }
    }
}

fn output_lines(session: &ProfileSession, router: &RecordingRouter) -> BoxStream<'static, Value> {
    let output = session.output();
    let sources: Vec<BoxStream<'static, Value>> = vec![
        session
            .state()
            .subscribe()
            .map(|state| {
                json!({
                    "output": "state",
                    "state": state.label(),
                    "profile": state.data(),
                    "error": state.error().map(ToString::to_string),
                })
            })
            .boxed(),
        output
            .view_model
            .subscribe()
            .map(|vm| json!({ "output": "view_model", "value": vm }))
            .boxed(),
        output
            .content_visible
            .subscribe()
            .map(|visible| json!({ "output": "content_visible", "value": visible }))
            .boxed(),
        output
            .initial_loading_indicator_visible
            .subscribe()
            .map(|visible| json!({ "output": "initial_loading_indicator_visible", "value": visible }))
            .boxed(),
        output
            .hide_refresh_control
            .subscribe()
            .map(|()| json!({ "output": "hide_refresh_control" }))
            .boxed(),
        output
            .error_message
            .subscribe()
            .map(|message| json!({ "output": "error_message", "value": message }))
            .boxed(),
        router
            .events()
            .subscribe()
            .map(|route| json!({ "output": "route", "value": route }))
            .boxed(),
    ];
    stream::select_all(sources).boxed()
}

async fn replay(view: &ProfileViewEvents, taps: &[Tap], interval: Duration, settle: Duration) {
    for tap in taps {
        tokio::time::sleep(interval).await;
        tracing::info!(?tap, "replaying view event");
        tap.emit(view);
    }
    tokio::time::sleep(settle).await;
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("loading configuration")?;

    let router = Arc::new(RecordingRouter::new());
    let deps = ProfileDependencies {
        service: Arc::new(StubProfileService::new(config.service.clone())),
        router: router.clone(),
    };
    let view = ProfileViewEvents::new();
    let mut session = ProfileSession::build(deps, &view, &config.session);

    let mut lines = output_lines(&session, &router);
    let printer = tokio::spawn(async move {
        while let Some(line) = lines.next().await {
            println!("{line}");
        }
    });

    session.activate().context("activating profile session")?;

    let interval = Duration::from_millis(cli.tap_interval_ms);
    let settle = Duration::from_millis(config.service.max_latency_ms) + interval;
    tokio::select! {
        _ = replay(&view, &cli.taps, interval, settle) => {}
        _ = tokio::signal::ctrl_c() => tracing::info!("interrupted"),
    }

    session.teardown();
    drop(session);
    // Route events never close; bound the final flush.
    let _ = tokio::time::timeout(Duration::from_millis(100), printer).await;
    Ok(())
}

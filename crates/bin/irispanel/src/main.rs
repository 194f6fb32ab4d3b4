//! # irispanel — gate panel CLI
//!
//! Composition root that wires the panel controller to the device adapter
//! and drives it from the command line.
//!
//! ## Responsibilities
//! - Parse configuration (TOML file, env vars)
//! - Initialize logging
//! - Construct the HTTP device adapter and the panel controller
//! - Dispatch one command: `status`, `toggle`, `schedule`, `clear`, `watch`
//! - Provide the interactive confirmation prompt
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use std::future::Future;
use std::io::Write as _;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use irispanel_adapter_device_http::HttpDeviceApi;
use irispanel_app::panel::{PanelController, PanelView, ToggleOutcome};
use irispanel_app::ports::{AlwaysConfirm, ConfirmationPrompt, DeviceApi};
use irispanel_domain::gate::GateId;

use config::Config;

/// How often watch mode re-fetches the snapshot.
const WATCH_REFRESH: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    let api = HttpDeviceApi::new(config.device_url())?;
    let panel = PanelController::new(api, config.panel.mode.page_mode());

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        None | Some("status") => {
            let view = panel.load().await?;
            print_view(&view);
        }
        Some("toggle") => {
            let gate = gate_arg(args.get(1))?;
            panel.load().await?;
            let outcome = if config.panel.assume_yes {
                panel.toggle_gate(gate, &AlwaysConfirm).await?
            } else {
                panel.toggle_gate(gate, &StdinPrompt).await?
            };
            match outcome {
                ToggleOutcome::Declined => println!("gate {gate} left alone"),
                ToggleOutcome::Toggled(position) => println!("gate {gate} is now {position}"),
            }
        }
        Some("schedule") => {
            let gate = gate_arg(args.get(1))?;
            let when = args
                .get(2)
                .ok_or("usage: irispanel schedule <gate> <YYYY-MM-DDTHH:MM>")?;
            panel.load().await?;
            let display = panel.set_schedule(gate, when).await?;
            println!("gate {gate} opens at {display}");
        }
        Some("clear") => {
            let gate = gate_arg(args.get(1))?;
            panel.load().await?;
            panel.clear_schedule(gate).await?;
            println!("schedule for gate {gate} cleared");
        }
        Some("watch") => watch(&panel).await?,
        Some(other) => {
            return Err(format!(
                "unknown command {other:?} (expected status, toggle, schedule, clear, or watch)"
            )
            .into());
        }
    }

    Ok(())
}

/// Follow the panel until interrupted: print banner changes as they happen
/// and re-fetch the snapshot periodically.
async fn watch<A: DeviceApi + 'static>(
    panel: &PanelController<A>,
) -> Result<(), Box<dyn std::error::Error>> {
    let view = panel.load().await?;
    print_view(&view);

    let mut notifications = panel.notifications();
    let start = tokio::time::Instant::now() + WATCH_REFRESH;
    let mut refresh = tokio::time::interval_at(start, WATCH_REFRESH);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = notifications.changed() => {
                if changed.is_err() {
                    break;
                }
                if let Some(banner) = notifications.borrow_and_update().clone() {
                    println!("[{}] {}", banner.kind, banner.message);
                }
            }
            _ = refresh.tick() => {
                match panel.refresh().await {
                    Ok(view) => print_view(&view),
                    Err(err) => tracing::warn!(error = %err, "refresh failed"),
                }
            }
        }
    }

    Ok(())
}

fn print_view(view: &PanelView) {
    if !view.connected {
        println!("warning: device reports lost connectivity");
    }
    if let Some(time) = &view.server_time {
        println!("device time: {time}");
    }
    for gate in &view.gates {
        println!(
            "gate {}: {} (schedule: {})",
            gate.id, gate.position, gate.schedule_text
        );
    }
}

fn gate_arg(arg: Option<&String>) -> Result<GateId, Box<dyn std::error::Error>> {
    let arg = arg.ok_or("missing gate number (1 or 2)")?;
    Ok(arg.parse()?)
}

/// Interactive `[y/N]` prompt on stdin.
struct StdinPrompt;

impl ConfirmationPrompt for StdinPrompt {
    fn confirm(&self, message: &str) -> impl Future<Output = bool> + Send {
        let message = message.to_string();
        async move {
            tokio::task::spawn_blocking(move || {
                print!("{message} [y/N] ");
                let _ = std::io::stdout().flush();
                let mut line = String::new();
                if std::io::stdin().read_line(&mut line).is_err() {
                    return false;
                }
                matches!(line.trim(), "y" | "Y" | "yes")
            })
            .await
            .unwrap_or(false)
        }
    }
}

//! # mediacenterd — media center daemon
//!
//! Composition root that wires all adapters together and runs until a
//! termination signal arrives.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars)
//! - Initialise logging
//! - Open the relay backend and the soundbar
//! - Construct the controller, injecting adapters via port traits
//! - Run the keypad loop and the Home Assistant bridge
//! - On SIGTERM/SIGINT, let the running command finish, then close the
//!   soundbar
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;
mod output;

use std::sync::Arc;

use anyhow::Context;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing_subscriber::EnvFilter;

use mediacenter_adapter_keypad::KeypadReader;
use mediacenter_adapter_shell::HostShell;
use mediacenter_adapter_virtual::VirtualAmplifier;
use mediacenter_app::keymap::Keymap;
use mediacenter_app::ports::TokioClock;
use mediacenter_app::services::amplifier::AmplifierFacade;
use mediacenter_app::services::controller::Controller;
use mediacenter_app::services::home_assistant::HomeAssistantBridge;
use mediacenter_app::services::relay_bank::RelayBank;

use crate::config::Config;
use crate::output::RelayOutput;

type MediaController = Controller<RelayOutput, Arc<VirtualAmplifier>, TokioClock, HostShell>;

const KEY_QUEUE: usize = 16;
const COMMAND_QUEUE: usize = 16;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("loading configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    let output = RelayOutput::open(&config).context("opening relay outputs")?;
    let relays = Arc::new(RelayBank::new(output, config.relay_pins()).context("resetting relays")?);

    let driver = Arc::new(VirtualAmplifier::default());
    let amplifier = Arc::new(
        AmplifierFacade::new(driver, TokioClock).with_settle_delay(config.settle_delay()),
    );

    let shell = HostShell::default().dry_run(config.shell.dry_run);
    let controller = Arc::new(
        Controller::new(relays, Arc::clone(&amplifier), shell).context("building controller")?,
    );

    let mut tasks = JoinSet::new();

    let events = amplifier.events();
    let listener = Arc::clone(&amplifier);
    tasks.spawn(async move { listener.listen(events).await });

    if config.keypad.enabled {
        let keymap = config.keymap()?;
        let (keys_tx, keys_rx) = mpsc::channel(KEY_QUEUE);
        tasks.spawn(KeypadReader::new(&config.keypad.device, keys_tx).run());
        tasks.spawn(keypad_loop(Arc::clone(&controller), keymap, keys_rx));
    }

    if config.mqtt.enabled {
        let (publisher, connection) = mediacenter_adapter_mqtt::connect(&config.mqtt);
        let (commands_tx, commands_rx) = mpsc::channel(COMMAND_QUEUE);
        tasks.spawn(connection.run(commands_tx));

        let bridge = HomeAssistantBridge::new(publisher, Arc::clone(&controller), &config.mqtt.node_id);
        let interval = config.mqtt.refresh_interval();
        tasks.spawn(async move { bridge.run(interval, commands_rx).await });
        tracing::info!(broker = %config.mqtt.broker_host, "home assistant bridge started");
    }

    tracing::info!(
        relays = controller.relays().size(),
        backend = ?config.relays.backend,
        "mediacenterd running"
    );

    shutdown_signal().await;
    tracing::info!("shutdown signal received");

    // a transition that already started runs to completion
    let _idle = controller.hold_dispatch().await;
    tasks.shutdown().await;
    amplifier.close();
    Ok(())
}

/// Resolve key names through `keymap` and dispatch them one at a time.
async fn keypad_loop(
    controller: Arc<MediaController>,
    keymap: Keymap,
    mut keys: mpsc::Receiver<String>,
) {
    while let Some(key) = keys.recv().await {
        let Some(action) = keymap.resolve(&key) else {
            tracing::debug!(%key, "unmapped key");
            continue;
        };
        tracing::info!(%key, %action, "key pressed");
        if let Err(err) = controller.dispatch(action, None).await {
            tracing::error!(%key, %action, error = %err, "keypad command failed");
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}

//! Lyrixa host entry point.

use lyrixa_host::config::HostConfig;
use lyrixa_host::driver::Driver;
use lyrixa_host::error::HostError;
use lyrixa_host::events::HostEvent;
use lyrixa_host::telemetry::init_tracing;
use std::io::BufRead;
use tokio::sync::mpsc;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), HostError> {
    let config = HostConfig::load()?;
    init_tracing(&config.log_filter, config.log_format)?;

    let mut driver = Driver::new(&config)?;
    tracing::info!(
        agents = driver.service().knowledge().len(),
        tick_interval_ms = config.lyrixa.tick_interval_ms,
        max_ticks = ?config.max_ticks,
        "lyrixa host started"
    );

    let (event_tx, event_rx) = mpsc::channel::<HostEvent>(64);
    spawn_input_reader(event_tx);

    let reason = driver.run(event_rx).await?;
    tracing::info!(?reason, ticks = driver.ticks(), "lyrixa host stopped");

    println!("{}", driver.summaries_json()?);
    Ok(())
}

fn spawn_input_reader(sender: mpsc::Sender<HostEvent>) {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if sender.blocking_send(HostEvent::Input(line)).is_err() {
                        return;
                    }
                }
                Err(_) => break,
            }
        }
        let _ = sender.blocking_send(HostEvent::InputClosed);
    });
}

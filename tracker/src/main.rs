use anyhow::Context;
use clap::Parser;
use generator::route::DriveGenerator;
use gpstrackcore::display::DisplayModel;
use gpstrackcore::geo::MapType;
use gpstrackcore::prelude::SystemClock;
use gpstrackcore::reducer::Session;
use gui_bridge::bridge::GuiBridge;
use gui_bridge::model::SharedDisplay;
use log::{error, info};
use mqtt::{publish_drive, MqttFeed};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use tokio::sync::mpsc;
use workflow::config::TrackerConfig;
use workflow::runner::{run_offline, Runner};

mod generator;
mod gui_bridge;
mod mqtt;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Live GPS track subscriber and display bridge")]
struct Args {
    /// Load tracker config from YAML
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    host: Option<String>,
    #[arg(long)]
    port: Option<u16>,
    #[arg(long)]
    topic: Option<String>,
    /// Page query selecting the map surface, e.g. `map=satellite`
    #[arg(long)]
    view: Option<String>,
    /// Replay a synthetic drive through the reducer and emit a summary
    #[arg(long, default_value_t = false)]
    offline: bool,
    /// Number of payloads for --offline, or a cap for --publish
    #[arg(long)]
    samples: Option<usize>,
    /// Publish a synthetic drive to the broker instead of subscribing
    #[arg(long, default_value_t = false)]
    publish: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = match args.config.as_ref() {
        Some(path) => TrackerConfig::load(path)?,
        None => TrackerConfig::default(),
    }
    .with_overrides(args.host.clone(), args.port, args.topic.clone());
    let map_type = MapType::from_query(args.view.as_deref());

    if args.offline {
        let samples = args.samples.unwrap_or(30);
        let summary = run_offline(&config.drive, samples, map_type)?;

        println!(
            "Offline run -> rendered {}/{}, dropped {}, markers {}, recenters {}",
            summary.metrics.rendered,
            summary.metrics.received,
            summary.metrics.dropped(),
            summary.marker_creations,
            summary.recenter_count
        );

        let report = format!(
            "samples={} rendered={} recenters={} final={} overlay={:?}\n",
            samples,
            summary.metrics.rendered,
            summary.recenter_count,
            summary
                .final_position
                .map(|p| p.to_string())
                .unwrap_or_else(|| "none".into()),
            summary.overlay.unwrap_or_default()
        );
        let report_path = PathBuf::from("tools/data/offline_track.log");
        if let Some(parent) = report_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(report_path)?;
        file.write_all(report.as_bytes())?;
        return Ok(());
    }

    let runtime = TokioBuilder::new_multi_thread()
        .enable_all()
        .build()
        .context("creating tracker runtime")?;

    if args.publish {
        let generator = DriveGenerator::new(config.drive.clone());
        let step = Duration::from_millis(config.drive.step_ms);
        let sent = runtime.block_on(async {
            tokio::select! {
                sent = publish_drive(&config.broker, &config.topic, generator, step, args.samples) => sent,
                _ = signal::ctrl_c() => Ok(0),
            }
        })?;
        info!("published {} payloads", sent);
        return Ok(());
    }

    runtime.block_on(serve(config, map_type))
}

async fn serve(config: TrackerConfig, map_type: MapType) -> anyhow::Result<()> {
    let (feed_tx, feed_rx) = mpsc::channel(config.channel_capacity.max(1));
    let display = SharedDisplay::new(DisplayModel::new(map_type));
    let session = Session::new(display.clone(), SystemClock::new());
    let metrics = session.metrics();

    let bridge = GuiBridge::spawn(config.bridge_bind, display, metrics.clone(), feed_tx.clone());
    let feed = MqttFeed::connect(&config.broker, &config.topic)?;
    let consumer = tokio::spawn(Runner::new(session).run(feed_rx));
    let mut subscriber = tokio::spawn(feed.run(feed_tx));

    info!(
        "tracking '{}' on {} ({} map), bridge at http://{}/display (Ctrl+C to stop)",
        config.topic,
        config.broker.display_url(),
        map_type,
        bridge.addr()
    );

    tokio::select! {
        res = signal::ctrl_c() => {
            res.context("awaiting Ctrl+C to exit")?;
            info!("shutdown requested");
            subscriber.abort();
        }
        res = &mut subscriber => {
            match res.context("subscriber task panicked")? {
                Ok(()) => info!("subscription ended"),
                Err(err) => error!("subscription failed: {err:#}"),
            }
        }
    }

    bridge.stop();
    consumer.abort();
    let snapshot = metrics.snapshot();
    info!(
        "session totals: received {}, rendered {}, dropped {}",
        snapshot.received,
        snapshot.rendered,
        snapshot.dropped()
    );
    Ok(())
}

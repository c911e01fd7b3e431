use crate::generator::route::{DriveConfig, DriveGenerator};
use gpstrackcore::diagnostics::MetricsSnapshot;
use gpstrackcore::display::DisplayModel;
use gpstrackcore::geo::{LatLon, MapType};
use gpstrackcore::prelude::{Clock, DisplayAdapter, ManualClock, TelemetrySubscriber};
use gpstrackcore::reducer::Session;
use log::info;
use tokio::sync::mpsc;

/// Everything that reaches the reducer, from MQTT or the HTTP bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedEvent {
    Connected,
    Message(Vec<u8>),
}

/// Sole owner of the session; drains the feed channel one event at a time.
pub struct Runner<A: DisplayAdapter, C: Clock> {
    session: Session<A, C>,
}

impl<A: DisplayAdapter, C: Clock> Runner<A, C> {
    pub fn new(session: Session<A, C>) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &Session<A, C> {
        &self.session
    }

    pub fn handle(&mut self, event: FeedEvent) {
        match event {
            FeedEvent::Connected => self.session.on_connect(),
            FeedEvent::Message(payload) => self.session.on_message(&payload),
        }
    }

    pub async fn run(mut self, mut events: mpsc::Receiver<FeedEvent>) -> Self {
        while let Some(event) = events.recv().await {
            self.handle(event);
        }
        info!("feed channel closed; runner stopping");
        self
    }
}

pub struct OfflineSummary {
    pub metrics: MetricsSnapshot,
    pub marker_creations: u32,
    pub recenter_count: u32,
    pub final_position: Option<LatLon>,
    pub overlay: Option<String>,
}

/// Replays `samples` generated payloads through a fresh session on a manual
/// clock that advances by the drive's step interval.
pub fn run_offline(
    drive: &DriveConfig,
    samples: usize,
    map_type: MapType,
) -> anyhow::Result<OfflineSummary> {
    let mut generator = DriveGenerator::new(drive.clone());
    let mut runner = Runner::new(Session::new(
        DisplayModel::new(map_type),
        ManualClock::starting_at(0),
    ));

    runner.handle(FeedEvent::Connected);
    for _ in 0..samples {
        runner.handle(FeedEvent::Message(generator.next_bytes()?));
        runner.session().clock().advance(drive.step_ms);
    }

    let session = runner.session();
    let model = session.adapter();
    Ok(OfflineSummary {
        metrics: session.metrics().snapshot(),
        marker_creations: model.marker_creations,
        recenter_count: model.recenter_count,
        final_position: session.state().last_known_position,
        overlay: model.overlay_text(),
    })
}

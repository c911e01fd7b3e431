use crate::gui_bridge::model::SharedDisplay;
use crate::workflow::runner::FeedEvent;
use gpstrackcore::diagnostics::MetricsRecorder;
use log::{info, warn};
use serde_json::json;
use std::{net::SocketAddr, sync::Arc};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use warp::{http::StatusCode, hyper::body::Bytes, Filter};

const MAX_INGEST_BYTES: u64 = 64 * 1024;

/// HTTP surface for the GUI: the current frame, counters, and a side door
/// that feeds raw payloads into the same queue as the MQTT subscription.
pub fn routes(
    display: SharedDisplay,
    metrics: Arc<MetricsRecorder>,
    feed: mpsc::Sender<FeedEvent>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let display_filter = warp::any().map(move || display.clone());
    let metrics_filter = warp::any().map(move || metrics.clone());
    let feed_filter = warp::any().map(move || feed.clone());

    let display_route = warp::path("display")
        .and(warp::path::end())
        .and(warp::get())
        .and(display_filter)
        .map(|display: SharedDisplay| warp::reply::json(&display.snapshot()));

    let metrics_route = warp::path("metrics")
        .and(warp::path::end())
        .and(warp::get())
        .and(metrics_filter)
        .map(|metrics: Arc<MetricsRecorder>| warp::reply::json(&metrics.snapshot()));

    let ingest_route = warp::path("ingest")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::content_length_limit(MAX_INGEST_BYTES))
        .and(warp::body::bytes())
        .and(feed_filter)
        .and_then(|body: Bytes, feed: mpsc::Sender<FeedEvent>| async move {
            match feed.send(FeedEvent::Message(body.to_vec())).await {
                Ok(()) => Ok::<_, warp::Rejection>(warp::reply::with_status(
                    warp::reply::json(&json!({"status": "accepted"})),
                    StatusCode::ACCEPTED,
                )),
                Err(_) => {
                    warn!("ingest rejected: feed channel closed");
                    Ok(warp::reply::with_status(
                        warp::reply::json(&json!({"status": "closed"})),
                        StatusCode::SERVICE_UNAVAILABLE,
                    ))
                }
            }
        });

    display_route.or(metrics_route).or(ingest_route)
}

/// Bridge that hosts the display endpoint on the current runtime.
pub struct GuiBridge {
    addr: SocketAddr,
    join: JoinHandle<()>,
}

impl GuiBridge {
    pub fn spawn(
        addr: SocketAddr,
        display: SharedDisplay,
        metrics: Arc<MetricsRecorder>,
        feed: mpsc::Sender<FeedEvent>,
    ) -> Self {
        let routes = routes(display, metrics, feed);
        let join = tokio::spawn(async move {
            warp::serve(routes).run(addr).await;
        });
        info!("display bridge listening on http://{}", addr);
        Self { addr, join }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn stop(self) {
        self.join.abort();
    }
}

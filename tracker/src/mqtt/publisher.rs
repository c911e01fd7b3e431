use crate::generator::route::DriveGenerator;
use crate::mqtt::{mqtt_options, CLIENT_QUEUE_CAPACITY};
use crate::workflow::config::BrokerConfig;
use anyhow::Context;
use log::{info, warn};
use rumqttc::{AsyncClient, QoS};
use std::time::Duration;

/// Publishes a synthetic drive to `topic` at the generator's step interval,
/// standing in for the vehicle. Runs until `limit` payloads are sent, or
/// forever when no limit is given.
pub async fn publish_drive(
    broker: &BrokerConfig,
    topic: &str,
    mut generator: DriveGenerator,
    step: Duration,
    limit: Option<usize>,
) -> anyhow::Result<usize> {
    let (client, mut eventloop) = AsyncClient::new(mqtt_options(broker), CLIENT_QUEUE_CAPACITY);
    let poller = tokio::spawn(async move {
        loop {
            if let Err(err) = eventloop.poll().await {
                warn!("MQTT poll error: {err} (retrying)");
                tokio::time::sleep(Duration::from_secs(1)).await;
            }
        }
    });

    info!("publishing synthetic drive to '{}' on {}", topic, broker.display_url());
    let mut ticker = tokio::time::interval(step.max(Duration::from_millis(10)));
    let mut sent = 0;
    while limit.map_or(true, |limit| sent < limit) {
        ticker.tick().await;
        let payload = generator.next_bytes()?;
        client
            .publish(topic, QoS::AtLeastOnce, false, payload)
            .await
            .context("publish failed")?;
        sent += 1;
    }

    client.disconnect().await.context("disconnect failed")?;
    poller.abort();
    Ok(sent)
}

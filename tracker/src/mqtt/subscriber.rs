use crate::mqtt::{mqtt_options, CLIENT_QUEUE_CAPACITY};
use crate::workflow::config::BrokerConfig;
use crate::workflow::runner::FeedEvent;
use log::{debug, info, warn};
use rumqttc::{AsyncClient, Event, EventLoop, Packet, QoS};
use std::time::Duration;
use tokio::sync::mpsc;

/// One-topic MQTT subscription forwarding every publish into the feed channel.
pub struct MqttFeed {
    client: AsyncClient,
    eventloop: EventLoop,
    topic: String,
}

impl MqttFeed {
    pub fn connect(broker: &BrokerConfig, topic: &str) -> anyhow::Result<Self> {
        let opts = mqtt_options(broker);
        let (client, eventloop) = AsyncClient::new(opts, CLIENT_QUEUE_CAPACITY);
        info!("connecting to MQTT broker {}", broker.display_url());
        Ok(Self {
            client,
            eventloop,
            topic: topic.to_string(),
        })
    }

    /// Polls until the receiving side of `events` goes away. Connection
    /// errors are logged and polling resumes after a pause; the client
    /// reconnects on the next poll.
    pub async fn run(mut self, events: mpsc::Sender<FeedEvent>) -> anyhow::Result<()> {
        loop {
            match self.eventloop.poll().await {
                Ok(Event::Incoming(Packet::ConnAck(_))) => {
                    info!("Connected to MQTT broker");
                    request_subscription(&self.client, &self.topic);
                    if events.send(FeedEvent::Connected).await.is_err() {
                        break;
                    }
                }
                Ok(Event::Incoming(Packet::SubAck(ack))) => {
                    debug!("subscription acknowledged: {:?}", ack.return_codes);
                }
                Ok(Event::Incoming(Packet::Publish(publish))) => {
                    debug!(
                        "message on '{}' ({} bytes)",
                        publish.topic,
                        publish.payload.len()
                    );
                    if events
                        .send(FeedEvent::Message(publish.payload.to_vec()))
                        .await
                        .is_err()
                    {
                        break;
                    }
                }
                Ok(_) => {}
                Err(err) => {
                    warn!("MQTT poll error: {err} (retrying)");
                    tokio::time::sleep(Duration::from_secs(1)).await;
                }
            }
        }

        warn!("feed receiver dropped; stopping MQTT subscription");
        Ok(())
    }
}

/// Queues a subscribe request. A refused request is logged and left for the
/// next ConnAck to retry.
fn request_subscription(client: &AsyncClient, topic: &str) -> bool {
    match client.try_subscribe(topic, QoS::AtLeastOnce) {
        Ok(()) => true,
        Err(err) => {
            warn!("subscribe failed for '{topic}': {err}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refused_subscribe_is_reported_not_raised() {
        let opts = mqtt_options(&BrokerConfig::default());
        let (client, _eventloop) = AsyncClient::new(opts, 1);

        assert!(request_subscription(&client, "vehicle/gps"));
        // Nothing polls the event loop, so the one-slot queue is now full.
        assert!(!request_subscription(&client, "vehicle/gps"));
        assert!(!request_subscription(&client, "vehicle/#/gps"));
    }
}

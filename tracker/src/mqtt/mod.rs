pub mod publisher;
pub mod subscriber;

pub use publisher::publish_drive;
pub use subscriber::MqttFeed;

use crate::workflow::config::{BrokerConfig, BrokerTransport};
use rumqttc::{MqttOptions, Transport};
use std::time::Duration;

/// Capacity of the request queue between an `AsyncClient` and its event loop.
pub const CLIENT_QUEUE_CAPACITY: usize = 10;

pub fn client_id(broker: &BrokerConfig) -> String {
    if broker.client_id.is_empty() {
        format!("gpstrack-{:08x}", rand::random::<u32>())
    } else {
        broker.client_id.clone()
    }
}

pub fn mqtt_options(broker: &BrokerConfig) -> MqttOptions {
    let mut opts = MqttOptions::new(client_id(broker), broker.broker_addr(), broker.port);
    opts.set_keep_alive(Duration::from_secs(broker.keep_alive_secs.max(5)));

    if let Some(username) = broker.username.clone() {
        opts.set_credentials(username, broker.password.clone().unwrap_or_default());
    }

    match broker.transport {
        BrokerTransport::Tcp => {}
        BrokerTransport::Tls => {
            opts.set_transport(Transport::tls_with_default_config());
        }
        BrokerTransport::Ws => {
            opts.set_transport(Transport::Ws);
        }
        BrokerTransport::Wss => {
            opts.set_transport(Transport::wss_with_default_config());
        }
    }
    opts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_client_ids_are_prefixed() {
        let broker = BrokerConfig::default();
        assert!(client_id(&broker).starts_with("gpstrack-"));

        let named = BrokerConfig {
            client_id: "dash-1".into(),
            ..Default::default()
        };
        assert_eq!(client_id(&named), "dash-1");
    }

    #[test]
    fn options_carry_keep_alive_and_credentials() {
        let broker = BrokerConfig {
            transport: BrokerTransport::Tcp,
            username: Some("viewer".into()),
            keep_alive_secs: 45,
            ..Default::default()
        };
        let opts = mqtt_options(&broker);
        assert_eq!(opts.keep_alive(), Duration::from_secs(45));
        assert_eq!(
            opts.credentials(),
            Some(("viewer".to_string(), String::new()))
        );
    }
}

use crate::generator::route::DriveConfig;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::Path;

pub const DEFAULT_TOPIC: &str = "vehicle/gps";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrokerTransport {
    Tcp,
    Tls,
    Ws,
    Wss,
}

impl BrokerTransport {
    pub fn is_websocket(&self) -> bool {
        matches!(self, BrokerTransport::Ws | BrokerTransport::Wss)
    }

    fn scheme(&self) -> &'static str {
        match self {
            BrokerTransport::Tcp => "mqtt",
            BrokerTransport::Tls => "mqtts",
            BrokerTransport::Ws => "ws",
            BrokerTransport::Wss => "wss",
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct BrokerConfig {
    pub host: String,
    pub port: u16,
    pub transport: BrokerTransport,
    /// Websocket path, ignored for plain MQTT transports.
    pub path: String,
    /// Empty means a random id is generated per run.
    pub client_id: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub keep_alive_secs: u64,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            host: "localhost".into(),
            port: 8884,
            transport: BrokerTransport::Wss,
            path: "/mqtt".into(),
            client_id: String::new(),
            username: None,
            password: None,
            keep_alive_secs: 30,
        }
    }
}

impl BrokerConfig {
    /// Address handed to the MQTT client: a full URL for websockets, the bare
    /// host otherwise.
    pub fn broker_addr(&self) -> String {
        if self.transport.is_websocket() {
            format!(
                "{}://{}:{}{}",
                self.transport.scheme(),
                self.host,
                self.port,
                self.path
            )
        } else {
            self.host.clone()
        }
    }

    pub fn display_url(&self) -> String {
        if self.transport.is_websocket() {
            self.broker_addr()
        } else {
            format!("{}://{}:{}", self.transport.scheme(), self.host, self.port)
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub broker: BrokerConfig,
    pub topic: String,
    pub bridge_bind: SocketAddr,
    pub channel_capacity: usize,
    pub drive: DriveConfig,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            broker: BrokerConfig::default(),
            topic: DEFAULT_TOPIC.into(),
            bridge_bind: SocketAddr::from(([127, 0, 0, 1], 9000)),
            channel_capacity: 64,
            drive: DriveConfig::default(),
        }
    }
}

impl TrackerConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading tracker config {}", path_ref.display()))?;
        let config: TrackerConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing tracker config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn with_overrides(
        mut self,
        host: Option<String>,
        port: Option<u16>,
        topic: Option<String>,
    ) -> Self {
        if let Some(host) = host {
            self.broker.host = host;
        }
        if let Some(port) = port {
            self.broker.port = port;
        }
        if let Some(topic) = topic {
            self.topic = topic;
        }
        self
    }
}

mod settings;

pub use settings::{AccountConfig, DaemonConfig, EndpointConfig, Settings, TargetConfig};

#[cfg(feature = "cli")]
pub mod cli;
pub mod proxy;
pub mod toml_config;

pub use proxy::ProxyConfig;
pub use toml_config::{SubmitMode, WidgetConfig};

#[cfg(feature = "cli")]
pub use cli::{CliConfig, Command};

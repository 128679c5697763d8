pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::adapters::{HubSpotClient, HubSpotFormSubmitter, ProxySubmitter, TerminalHost};
pub use crate::config::{ProxyConfig, SubmitMode, WidgetConfig};
pub use crate::core::{
    classifier::is_business_email, events::DemoModalEvents, modal::BookDemoModal,
    proxy::handle_contact_request,
};
pub use crate::utils::error::{BookingError, Result};

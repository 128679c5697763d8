// Adapters layer: concrete implementations for external systems (HubSpot, proxy endpoint, terminal).

pub mod forms;
pub mod hubspot;
pub mod proxy_client;
pub mod terminal;

pub use forms::HubSpotFormSubmitter;
pub use hubspot::HubSpotClient;
pub use proxy_client::ProxySubmitter;
pub use terminal::TerminalHost;

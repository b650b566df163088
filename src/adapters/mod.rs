// Adapters layer: concrete implementations for external systems (storage, http server, http client).

pub mod client;
pub mod http;
pub mod store;

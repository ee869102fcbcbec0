//! Core application primitives (poll loop, HTTP surface)

pub mod http;
pub mod poller;

pub use http::{create_router, start_server, AppState};
pub use poller::{PollerSettings, SignalPoller};

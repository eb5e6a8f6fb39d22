//! Eventos del flujo y trait `EventStore`.

mod store;
mod types;

pub use store::EventStore;
pub use store::InMemoryEventStore;
pub use types::{FlowEvent, FlowEventKind};

//! Host lifecycle integration

mod adapter;
mod events;

pub use adapter::HostLifecycleAdapter;
pub use events::{
    event_channel, ClientEvent, EventReceiver, EventSender, LifecycleEvent, OrchestratorEvent,
};

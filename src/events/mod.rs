mod listener;
mod pointer;

pub use listener::ListenerGuard;
pub use pointer::{wire_stage_events, StageWiring};

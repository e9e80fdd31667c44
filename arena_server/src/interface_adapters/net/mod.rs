// Network adapter modules: per-client sockets, outbound sinks and world fan-out.

pub mod broadcast;
pub mod client;
pub mod sink;

pub use broadcast::SnapshotBroadcaster;
pub use client::ws_handler;
pub use sink::WsSink;

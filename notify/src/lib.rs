pub mod api;
pub mod config;
pub mod event;
pub mod notify;
pub mod prometheus;
pub mod router;
pub mod server;
pub mod sink;

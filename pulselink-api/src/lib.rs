//! HTTP and realtime API for PulseLink.

pub mod http;
pub mod relay;

//! Driving adapters translating transports onto domain ports.

pub mod http;

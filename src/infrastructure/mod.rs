//! Adapters for the domain ports: catalog sources and the sandbox gateway.

pub mod in_memory;
pub mod json_file;
pub mod sandbox_gateway;
pub mod seed;

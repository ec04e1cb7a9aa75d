//! Domain layer: catalog entities, payment value objects, messaging and
//! safety records, and the ports adapters implement.

pub mod creator;
pub mod criteria;
pub mod message;
pub mod money;
pub mod payment;
pub mod ports;
pub mod safety;

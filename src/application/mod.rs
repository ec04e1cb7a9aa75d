//! Application layer containing the marketplace's logic.
//!
//! `catalog` is the discovery pipeline (search, filter, sort) over a
//! `CatalogSource`. `payment` is the payment dialog's state machine, with
//! `checkout` driving it end to end for prepared orders. `messaging` and
//! `dashboard` back the conversation view and the creator dashboard.

pub mod catalog;
pub mod checkout;
pub mod dashboard;
pub mod messaging;
pub mod payment;

//! Operator structs returned by the provided methods of
//! [`Signal`](crate::signal::Signal).
//!
//! Each operator holds its inputs and parameters. Its `actual_subscribe`
//! creates the per-subscription state, subscribes the inputs with the
//! operator's own observers and drives the downstream subscriber.

pub mod bind;
pub mod combine_previous;
pub mod concat;
pub mod distinct_until_changed;
mod fan_out;
pub mod filter;
pub mod flatten_map;
pub mod map;
pub mod named;
pub mod scan;
pub mod skip;
pub mod skip_until;
pub mod take;
pub mod take_until;
pub mod zip;

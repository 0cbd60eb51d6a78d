//! Project and task tracking built around a single reducer-driven store.
//!
//! Front ends construct a [`store::Store`] over some [`io::Storage`],
//! send it [`model::Action`]s, and render from [`store::Store::state`]
//! plus the read-only views in [`ops`].

pub mod cli;
pub mod io;
pub mod model;
pub mod ops;
pub mod store;

pub use store::{Store, StoreOptions};

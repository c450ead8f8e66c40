//! Remote synchronization: the HTTP boundary and the write-then-reconcile
//! policy built on top of it.

mod adapter;
mod api;

pub use adapter::SyncAdapter;
pub use api::{HttpUserApi, UserApi};

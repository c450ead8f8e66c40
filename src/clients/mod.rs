//! Typed handles onto the actors. Each client is cheap to clone and hides
//! the channel plumbing behind async methods.

#[macro_use]
mod macros;

mod manager_client;
mod user_client;

pub use manager_client::UserManagerClient;
pub use user_client::UserClient;

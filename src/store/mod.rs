//! Record stores: the authoritative list of user records behind the manager.
//!
//! [`UserClient`](crate::clients::UserClient) serves the local variants from
//! an in-process resource actor. [`RemoteUserStore`] mirrors a remote
//! collection through the [`SyncAdapter`](crate::sync::SyncAdapter).

mod local;
mod remote;

pub use remote::RemoteUserStore;

use async_trait::async_trait;

use crate::actor_framework::IdGenerator;
use crate::domain::{UserDraft, UserId, UserRecord};
use crate::user_actor::UserError;

/// The four operations a record store offers the manager.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Records in display order.
    async fn list(&self) -> Result<Vec<UserRecord>, UserError>;

    /// Fails with [`UserError::ValidationSkipped`] and leaves the store
    /// untouched when either field is empty.
    async fn add(&self, draft: UserDraft) -> Result<UserRecord, UserError>;

    /// `Ok(None)` when no record carries `id`.
    async fn update(&self, id: &UserId, draft: UserDraft) -> Result<Option<UserRecord>, UserError>;

    /// `Ok(false)` when no record carries `id`.
    async fn remove(&self, id: &UserId) -> Result<bool, UserError>;

    /// Called once when the manager is mounted and on explicit refresh.
    async fn load(&self) -> Result<(), UserError> {
        Ok(())
    }
}

/// How a local store numbers new records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum IdPolicy {
    /// `count + 1`. Reuses an existing id after a delete followed by an add.
    #[default]
    CountPlusOne,
    /// Never reuses an id. Starts past the highest numeric seed id.
    Monotonic,
}

impl IdPolicy {
    pub fn generator(self, seeded: &[UserRecord]) -> IdGenerator<UserRecord> {
        match self {
            IdPolicy::CountPlusOne => {
                Box::new(|records: &[UserRecord]| UserId::from(records.len() as u64 + 1))
            }
            IdPolicy::Monotonic => {
                let mut next = seeded
                    .iter()
                    .filter_map(|record| record.id.as_str().parse::<u64>().ok())
                    .max()
                    .unwrap_or(0)
                    + 1;
                Box::new(move |_: &[UserRecord]| {
                    let id = next;
                    next += 1;
                    UserId::from(id)
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::seed_users;

    #[test]
    fn count_plus_one_follows_current_length() {
        let mut next = IdPolicy::CountPlusOne.generator(&[]);
        let records = seed_users();
        assert_eq!(next(&records), UserId::from(3));
        assert_eq!(next(&records[..1]), UserId::from(2));
    }

    #[test]
    fn monotonic_never_reuses() {
        let records = seed_users();
        let mut next = IdPolicy::Monotonic.generator(&records);
        assert_eq!(next(&records), UserId::from(3));
        assert_eq!(next(&records[..1]), UserId::from(4));
        assert_eq!(next(&[]), UserId::from(5));
    }
}

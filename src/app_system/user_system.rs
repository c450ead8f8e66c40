use std::sync::Arc;

use tracing::{error, info};

use super::{Config, Mode};
use crate::actor_framework::ResourceActor;
use crate::clients::{UserClient, UserManagerClient};
use crate::domain::{seed_users, UserRecord};
use crate::manager::UserManagerService;
use crate::store::{IdPolicy, RecordStore, RemoteUserStore};
use crate::sync::{HttpUserApi, SyncAdapter, UserApi};

/// Starts the actors for one variant, wires them together, and stops them.
pub struct UserManagerSystem {
    pub manager: UserManagerClient,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl UserManagerSystem {
    pub fn from_config(config: &Config) -> Self {
        match config.mode {
            Mode::Local => {
                let seed = if config.no_seed { Vec::new() } else { seed_users() };
                Self::local(config.buffer_size, seed, config.id_policy)
            }
            Mode::Remote => {
                let api = HttpUserApi::new(config.api_url.clone());
                Self::remote(config.buffer_size, Arc::new(api))
            }
        }
    }

    /// Records live in an in-process resource actor.
    pub fn local(buffer_size: usize, seed: Vec<UserRecord>, id_policy: IdPolicy) -> Self {
        info!(seed_count = seed.len(), ?id_policy, "Starting local user manager");
        let next_id = id_policy.generator(&seed);
        let (store_actor, store_client) = ResourceActor::new(buffer_size, seed, next_id);
        let store_handle = tokio::spawn(store_actor.run());
        Self::mount(buffer_size, Box::new(UserClient::new(store_client)), store_handle)
    }

    /// Records are mirrored from `api`; the mirror is loaded on mount.
    pub fn remote(buffer_size: usize, api: Arc<dyn UserApi>) -> Self {
        info!("Starting remote user manager");
        let (mirror_actor, mirror_client) = ResourceActor::mirror(buffer_size);
        let mirror_handle = tokio::spawn(mirror_actor.run());
        let adapter = SyncAdapter::new(api, UserClient::new(mirror_client));
        Self::mount(buffer_size, Box::new(RemoteUserStore::new(adapter)), mirror_handle)
    }

    fn mount(
        buffer_size: usize,
        store: Box<dyn RecordStore>,
        store_handle: tokio::task::JoinHandle<()>,
    ) -> Self {
        let (service, manager) = UserManagerService::new(buffer_size, store);
        let manager_handle = tokio::spawn(service.run());
        Self {
            manager,
            handles: vec![manager_handle, store_handle],
        }
    }

    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down system...");
        // The manager owns the only store client, so once it stops the store
        // actor's channel closes as well.
        if let Err(e) = self.manager.shutdown().await {
            error!(error = %e, "Manager already stopped");
        }
        drop(self.manager);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(format!("Actor task failed: {:?}", e));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserDraft;
    use crate::mock_framework::FakeUserApi;

    #[tokio::test]
    async fn test_local_system_starts_with_seed_and_shuts_down() {
        let system = UserManagerSystem::local(8, seed_users(), IdPolicy::CountPlusOne);
        let view = system.manager.view().await.unwrap();
        assert_eq!(view.users, seed_users());
        assert_eq!(view.heading, "Add New User");

        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_remote_system_loads_on_mount() {
        let api = FakeUserApi::with_users(vec![UserRecord::new("a", "A", "a@x.com")]);
        let system = UserManagerSystem::remote(8, api.clone());

        let view = system.manager.view().await.unwrap();
        assert_eq!(view.users, api.users());
        assert_eq!(view.notice, None);

        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_remote_load_failure_becomes_a_notice() {
        let api = FakeUserApi::with_users(vec![UserRecord::new("a", "A", "a@x.com")]);
        api.fail_fetches(true);
        let system = UserManagerSystem::remote(8, api.clone());

        let view = system.manager.view().await.unwrap();
        assert!(view.users.is_empty());
        assert!(view.notice.unwrap().starts_with("Could not load users"));

        api.fail_fetches(false);
        system.manager.refresh().await.unwrap();
        let view = system.manager.view().await.unwrap();
        assert_eq!(view.users.len(), 1);
        assert_eq!(view.notice, None);

        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_config_selects_variant() {
        let config = Config {
            mode: Mode::Local,
            api_url: url::Url::parse("http://localhost:5000").unwrap(),
            id_policy: IdPolicy::Monotonic,
            no_seed: true,
            buffer_size: 4,
        };
        let system = UserManagerSystem::from_config(&config);
        system.manager.set_name("A".to_string()).await.unwrap();
        system.manager.set_email("a@x.com".to_string()).await.unwrap();
        system.manager.submit().await.unwrap();

        let view = system.manager.view().await.unwrap();
        assert_eq!(view.users, vec![UserRecord::new(1, "A", "a@x.com")]);
        assert_eq!(view.draft, UserDraft::default());
        system.shutdown().await.unwrap();
    }
}

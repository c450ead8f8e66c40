use clap::{Parser, ValueEnum};
use url::Url;

use crate::store::IdPolicy;

/// Where user records live.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// In-memory list, gone when the process exits.
    #[default]
    Local,
    /// Mirrored from the users HTTP service at `--api-url`.
    Remote,
}

/// Add, edit and delete user records from the terminal.
#[derive(Debug, Clone, Parser)]
#[command(name = "user_manager", version)]
pub struct Config {
    #[arg(long, env = "USER_MANAGER_MODE", value_enum, default_value_t = Mode::Local)]
    pub mode: Mode,

    /// Base URL of the users service; `/users` is appended.
    #[arg(long, env = "USER_MANAGER_API_URL", default_value = "http://localhost:5000")]
    pub api_url: Url,

    /// How the local store numbers new records.
    #[arg(long, env = "USER_MANAGER_ID_POLICY", value_enum, default_value_t = IdPolicy::CountPlusOne)]
    pub id_policy: IdPolicy,

    /// Start the local store empty instead of with the two sample users.
    #[arg(long, env = "USER_MANAGER_NO_SEED")]
    pub no_seed: bool,

    /// Capacity of each actor's request channel.
    #[arg(long, default_value_t = 32)]
    pub buffer_size: usize,
}

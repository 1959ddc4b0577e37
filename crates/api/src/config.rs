/// Which storage adapter serves this process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// In-memory map; data lives for the lifetime of the process.
    Memory,
    /// PostgreSQL via sqlx; requires `DATABASE_URL`.
    Postgres,
}

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Storage adapter (default: `memory`).
    pub store_backend: StoreBackend,
    /// Load the demo catalog into an empty memory store (default: `true`).
    pub seed_demo_data: bool,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var          | Default     | Values                |
    /// |------------------|-------------|-----------------------|
    /// | `HOST`           | `0.0.0.0`   |                       |
    /// | `PORT`           | `3000`      |                       |
    /// | `STORE_BACKEND`  | `memory`    | `memory` / `postgres` |
    /// | `SEED_DEMO_DATA` | `true`      | `true` / `false`      |
    ///
    /// `DATABASE_URL` is read separately by the binary when the backend is
    /// `postgres`.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let store_backend = match std::env::var("STORE_BACKEND")
            .unwrap_or_else(|_| "memory".into())
            .to_lowercase()
            .as_str()
        {
            "memory" => StoreBackend::Memory,
            "postgres" => StoreBackend::Postgres,
            other => panic!("STORE_BACKEND must be 'memory' or 'postgres', got '{other}'"),
        };

        let seed_demo_data: bool = std::env::var("SEED_DEMO_DATA")
            .unwrap_or_else(|_| "true".into())
            .parse()
            .expect("SEED_DEMO_DATA must be 'true' or 'false'");

        Self {
            host,
            port,
            store_backend,
            seed_demo_data,
        }
    }
}

use config::builder::{ConfigBuilder, DefaultState};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub auth: AuthConfig,
    pub web: WebConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub users_file: PathBuf,
    pub tasks_file: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub session_cookie: String,
    pub bcrypt_cost: u32,
    pub token_length: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WebConfig {
    pub templates_dir: PathBuf,
    pub static_dir: PathBuf,
    pub max_body_size: usize,  // in bytes
}

impl Config {
    /// Built-in defaults, then `config/default.toml` if present, then
    /// `APP_SECTION__KEY` environment variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = Self::defaults()?
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, config::ConfigError> {
        config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080_i64)?
            .set_default("storage.users_file", "users.json")?
            .set_default("storage.tasks_file", "tasks.json")?
            .set_default("auth.session_cookie", "session_id")?
            .set_default("auth.bcrypt_cost", i64::from(bcrypt::DEFAULT_COST))?
            .set_default("auth.token_length", 32_i64)?
            .set_default("web.templates_dir", "templates")?
            .set_default("web.static_dir", "static")?
            .set_default("web.max_body_size", 64 * 1024_i64)
    }
}

#[cfg(test)]
impl Config {
    /// Config rooted in a scratch directory, using the repository templates
    /// and the cheapest bcrypt cost.
    pub fn for_tests(data_dir: &std::path::Path) -> Self {
        let root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        Self {
            server: ServerConfig {
                host: "127.0.0.1".into(),
                port: 0,
            },
            storage: StorageConfig {
                users_file: data_dir.join("users.json"),
                tasks_file: data_dir.join("tasks.json"),
            },
            auth: AuthConfig {
                session_cookie: "session_id".into(),
                bcrypt_cost: 4,
                token_length: 32,
            },
            web: WebConfig {
                templates_dir: root.join("templates"),
                static_dir: root.join("static"),
                max_body_size: 64 * 1024,
            },
        }
    }
}

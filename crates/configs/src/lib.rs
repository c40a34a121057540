use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub hashing: HashingConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port(), worker_threads: Some(4) }
    }
}

/// Location of the JSON user store.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_store_path")]
    pub path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { path: default_store_path() }
    }
}

/// Argon2id work factor. Fixed for the lifetime of the process.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct HashingConfig {
    #[serde(default = "default_memory_kib")]
    pub memory_kib: u32,
    #[serde(default = "default_iterations")]
    pub iterations: u32,
    #[serde(default = "default_parallelism")]
    pub parallelism: u32,
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            memory_kib: default_memory_kib(),
            iterations: default_iterations(),
            parallelism: default_parallelism(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { format: default_log_format() }
    }
}

fn default_host() -> String { "127.0.0.1".into() }
fn default_port() -> u16 { 3000 }
fn default_store_path() -> String { "data/users.json".into() }
// argon2 crate defaults (Params::DEFAULT_M_COST / T_COST / P_COST)
fn default_memory_kib() -> u32 { 19 * 1024 }
fn default_iterations() -> u32 { 2 }
fn default_parallelism() -> u32 { 1 }
fn default_log_format() -> String { "compact".into() }

/// `CONFIG_PATH`, or `config.toml` in the working directory.
pub fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

/// Environment variables win over whatever the file (or the defaults) said:
/// `SERVER_HOST`, `PORT` / `SERVER_PORT`, `TOKIO_WORKER_THREADS`, `USERS_FILE`, `LOG_FORMAT`.
/// Unparseable numbers are ignored.
pub fn apply_env_overrides(cfg: &mut AppConfig) {
    if let Ok(host) = std::env::var("SERVER_HOST") {
        cfg.server.host = host;
    }
    if let Some(port) = std::env::var("PORT")
        .or_else(|_| std::env::var("SERVER_PORT"))
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
    {
        cfg.server.port = port;
    }
    if let Some(threads) = std::env::var("TOKIO_WORKER_THREADS").ok().and_then(|v| v.parse::<usize>().ok()) {
        cfg.server.worker_threads = Some(threads);
    }
    if let Ok(path) = std::env::var("USERS_FILE") {
        cfg.store.path = path;
    }
    if let Ok(format) = std::env::var("LOG_FORMAT") {
        cfg.log.format = format;
    }
}

impl AppConfig {
    /// Load `config.toml` (or `CONFIG_PATH`) when present, otherwise defaults,
    /// then apply env overrides. A file that exists but does not parse is an error.
    pub fn load_and_validate() -> Result<Self> {
        Self::load_from(&config_path())
    }

    fn load_from(path: &str) -> Result<Self> {
        let mut cfg = if std::path::Path::new(path).exists() { load_from_file(path)? } else { AppConfig::default() };
        apply_env_overrides(&mut cfg);
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.store.validate()?;
        self.hashing.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = default_host();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be within 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl StoreConfig {
    fn validate(&self) -> Result<()> {
        if self.path.trim().is_empty() {
            return Err(anyhow!("store.path is empty; set it in config.toml or via USERS_FILE"));
        }
        Ok(())
    }
}

impl HashingConfig {
    fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(anyhow!("hashing.iterations must be >= 1"));
        }
        if self.parallelism == 0 {
            return Err(anyhow!("hashing.parallelism must be >= 1"));
        }
        // argon2 requires at least 8 KiB per lane
        if self.memory_kib < self.parallelism.saturating_mul(8) {
            return Err(anyhow!("hashing.memory_kib must be >= 8 * parallelism"));
        }
        Ok(())
    }
}

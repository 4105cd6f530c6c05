use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub import: ImportConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "0.0.0.0".into(), port: 8080, worker_threads: Some(4) }
    }
}

/// Postgres connection settings.
///
/// `url` wins when present; otherwise the URL is assembled from the parts.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub ssl_mode: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
    pub sqlx_logging: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            host: "localhost".into(),
            port: 5432,
            user: "swiftuser".into(),
            password: "swiftpass".into(),
            name: "swiftcodesdb".into(),
            ssl_mode: "disable".into(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout_secs: 30,
            acquire_timeout_secs: 30,
            idle_timeout_secs: 600,
            max_lifetime_secs: 3600,
            sqlx_logging: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    pub enabled: bool,
    pub file_path: String,
    pub sheet: String,
    pub fail_on_error: bool,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            file_path: "swift_data.xlsx".into(),
            sheet: "Sheet1".into(),
            fail_on_error: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormat,
}

const SSL_MODES: [&str; 6] = ["disable", "allow", "prefer", "require", "verify-ca", "verify-full"];

pub fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

/// Load `config.toml` (or `CONFIG_PATH`) when it exists, falling back to defaults.
pub fn load_default() -> Result<AppConfig> {
    let path = config_path();
    if Path::new(&path).exists() {
        load_from_file(&path)
    } else {
        Ok(AppConfig::default())
    }
}

impl AppConfig {
    /// File, then `.env` and process environment, then validation.
    pub fn load_and_validate() -> Result<Self> {
        dotenvy::dotenv().ok();
        let mut cfg = load_default()?;
        cfg.apply_overrides(|key| std::env::var(key).ok())?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Apply `SERVER_*`, `DB_*`, `IMPORT_*` and `LOG_FORMAT` overrides from `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("SERVER_HOST") { self.server.host = v; }
        if let Some(v) = lookup("SERVER_PORT") { self.server.port = parse_var("SERVER_PORT", &v)?; }
        if let Some(v) = lookup("TOKIO_WORKER_THREADS") {
            self.server.worker_threads = Some(parse_var("TOKIO_WORKER_THREADS", &v)?);
        }

        if let Some(v) = lookup("DATABASE_URL") { self.database.url = Some(v); }
        if let Some(v) = lookup("DB_HOST") { self.database.host = v; }
        if let Some(v) = lookup("DB_PORT") { self.database.port = parse_var("DB_PORT", &v)?; }
        if let Some(v) = lookup("DB_USER") { self.database.user = v; }
        if let Some(v) = lookup("DB_PASSWORD") { self.database.password = v; }
        if let Some(v) = lookup("DB_NAME") { self.database.name = v; }
        if let Some(v) = lookup("DB_SSLMODE") { self.database.ssl_mode = v; }

        if let Some(v) = lookup("IMPORT_ENABLED") { self.import.enabled = parse_var("IMPORT_ENABLED", &v)?; }
        if let Some(v) = lookup("IMPORT_FILE") { self.import.file_path = v; }
        if let Some(v) = lookup("IMPORT_SHEET") { self.import.sheet = v; }
        if let Some(v) = lookup("IMPORT_FAIL_ON_ERROR") {
            self.import.fail_on_error = parse_var("IMPORT_FAIL_ON_ERROR", &v)?;
        }

        if let Some(v) = lookup("LOG_FORMAT") {
            self.logging.format = match v.trim().to_ascii_lowercase().as_str() {
                "json" => LogFormat::Json,
                "compact" | "" => LogFormat::Compact,
                other => return Err(anyhow!("LOG_FORMAT must be `compact` or `json`, got `{other}`")),
            };
        }
        Ok(())
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.database.validate()?;
        self.import.validate()?;
        Ok(())
    }
}

fn parse_var<T>(key: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| anyhow!("invalid {key} `{value}`: {e}"))
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "0.0.0.0".to_string();
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

impl DatabaseConfig {
    /// Connection URL handed to sea-orm.
    pub fn connection_url(&self) -> String {
        match self.url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => url.to_string(),
            _ => format!(
                "postgres://{}:{}@{}:{}/{}?sslmode={}",
                self.user, self.password, self.host, self.port, self.name, self.ssl_mode
            ),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(url) = self.url.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
            let lower = url.to_lowercase();
            if !(lower.starts_with("postgresql://") || lower.starts_with("postgres://")) {
                return Err(anyhow!("database.url must start with postgresql:// or postgres://"));
            }
        } else {
            if self.host.trim().is_empty() {
                return Err(anyhow!("database.host is empty; set it in config.toml or DB_HOST"));
            }
            if self.name.trim().is_empty() {
                return Err(anyhow!("database.name is empty; set it in config.toml or DB_NAME"));
            }
            if !SSL_MODES.contains(&self.ssl_mode.as_str()) {
                return Err(anyhow!("database.ssl_mode `{}` is not one of {:?}", self.ssl_mode, SSL_MODES));
            }
        }
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections must be >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections must be >= min_connections"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database timeouts must be positive seconds"));
        }
        Ok(())
    }
}

impl ImportConfig {
    fn validate(&self) -> Result<()> {
        if self.enabled && self.file_path.trim().is_empty() {
            return Err(anyhow!("import.file_path is empty while import is enabled"));
        }
        Ok(())
    }
}

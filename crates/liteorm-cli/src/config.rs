use crate::cli::DbArgs;
use liteorm::{HandleConfig, MonitorConfig};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct ProjectConfig {
    pub config_dir: PathBuf,
    pub file: ConfigFile,
}

impl ProjectConfig {
    pub fn load(config_path: &Path) -> anyhow::Result<Self> {
        let config_dir = config_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();

        let raw = std::fs::read_to_string(config_path).map_err(|e| {
            anyhow::anyhow!(
                "failed to read config file {}: {e}",
                config_path.display()
            )
        })?;

        let file: ConfigFile = toml::from_str(&raw).map_err(|e| {
            anyhow::anyhow!(
                "failed to parse config file {}: {e}",
                config_path.display()
            )
        })?;

        file.validate()?;

        Ok(Self { config_dir, file })
    }

    /// Paths in the config file are relative to the file itself.
    pub fn resolve_path(&self, p: impl AsRef<Path>) -> PathBuf {
        let p = p.as_ref();
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.config_dir.join(p)
        }
    }

    pub fn handle_config(&self) -> HandleConfig {
        HandleConfig::new(self.resolve_path(&self.file.database.path))
            .verbose(self.file.database.verbose)
            .monitor(self.file.monitor.clone())
            .log_sql(self.file.log_sql)
    }
}

/// `liteorm.toml`.
///
/// ```toml
/// log_sql = true
///
/// [database]
/// path = "people.db"
/// verbose = false
///
/// [monitor]
/// enabled = true
/// slow_query_ms = 50
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub database: DatabaseConfig,

    #[serde(default)]
    pub monitor: MonitorConfig,

    #[serde(default)]
    pub log_sql: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
    #[serde(default)]
    pub verbose: bool,
}

impl ConfigFile {
    fn validate(&self) -> anyhow::Result<()> {
        if self.database.path.trim().is_empty() {
            anyhow::bail!("database.path must not be empty");
        }
        Ok(())
    }
}

/// Settings for the handle a command opens.
///
/// `--database` overrides `database.path` but keeps the rest of the file.
/// Without a config file, `--database` is required.
pub fn resolve(db: &DbArgs) -> anyhow::Result<HandleConfig> {
    if db.config.exists() {
        let project = ProjectConfig::load(&db.config)?;
        let mut config = project.handle_config();
        if let Some(path) = &db.database {
            config.path = path.clone();
        }
        tracing::debug!(
            config = %db.config.display(),
            path = %config.path.display(),
            "using config file"
        );
        return Ok(config);
    }

    let Some(path) = &db.database else {
        anyhow::bail!(
            "failed to load config {}; provide --database or create it",
            db.config.display()
        );
    };
    Ok(HandleConfig::new(path))
}

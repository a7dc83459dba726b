use std::path::Path;

use anyhow::Context;
use lab_config::LabConfig;

use crate::cli::GlobalFlags;

/// Load layered configuration, apply `--db`, and make sure the database
/// directory exists.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<LabConfig> {
    let mut config = LabConfig::load_with_dotenv().context("failed to load labdesk config")?;
    apply_overrides(&mut config, flags);
    ensure_db_dir(&config)?;
    Ok(config)
}

fn apply_overrides(config: &mut LabConfig, flags: &GlobalFlags) {
    if let Some(path) = &flags.db {
        config.database.path.clone_from(path);
    }
}

fn ensure_db_dir(config: &LabConfig) -> anyhow::Result<()> {
    if config.database.is_in_memory() {
        return Ok(());
    }
    let Some(parent) = Path::new(&config.database.path).parent() else {
        return Ok(());
    };
    if parent.as_os_str().is_empty() || parent.exists() {
        return Ok(());
    }
    std::fs::create_dir_all(parent)
        .with_context(|| format!("failed to create database directory {}", parent.display()))
}

#[cfg(test)]
mod tests {
    use lab_config::LabConfig;

    use super::{apply_overrides, ensure_db_dir};
    use crate::cli::{GlobalFlags, OutputFormat};

    fn flags(db: Option<&str>) -> GlobalFlags {
        GlobalFlags {
            format: OutputFormat::Json,
            limit: None,
            actor: None,
            role: None,
            db: db.map(String::from),
        }
    }

    #[test]
    fn db_flag_overrides_config_path() {
        let mut config = LabConfig::default();
        apply_overrides(&mut config, &flags(Some(":memory:")));
        assert_eq!(config.database.path, ":memory:");
    }

    #[test]
    fn missing_db_flag_keeps_config_path() {
        let mut config = LabConfig::default();
        let before = config.database.path.clone();
        apply_overrides(&mut config, &flags(None));
        assert_eq!(config.database.path, before);
    }

    #[test]
    fn creates_missing_database_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        let db_path = dir.path().join("nested").join("labdesk.db");
        let mut config = LabConfig::default();
        config.database.path = db_path.to_string_lossy().into_owned();

        ensure_db_dir(&config).unwrap();
        assert!(dir.path().join("nested").is_dir());
    }
}

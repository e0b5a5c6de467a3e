use std::env;
use std::path::PathBuf;

/// Get the scanlog data directory
///
/// Priority:
/// 1. SCANLOG_HOME env var
/// 2. ~/.scanlog
/// 3. ./.scanlog when no home directory can be found
pub fn get_data_dir() -> PathBuf {
    if let Ok(home) = env::var("SCANLOG_HOME") {
        return PathBuf::from(home);
    }

    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".scanlog")
}

/// Get the config file path, honouring SCANLOG_CONFIG
pub fn get_config_path() -> PathBuf {
    if let Ok(path) = env::var("SCANLOG_CONFIG") {
        return PathBuf::from(path);
    }
    get_data_dir().join("config.toml")
}

/// Shell history file
pub fn get_history_path() -> PathBuf {
    get_data_dir().join("history")
}

/// Ensure the data directory exists
pub fn ensure_data_dir() -> std::io::Result<PathBuf> {
    let data_dir = get_data_dir();
    std::fs::create_dir_all(&data_dir)?;
    Ok(data_dir)
}

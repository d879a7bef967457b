/// Command line configuration for the hours planner server
///
/// Picks the storage backend, where the database lives and how noisy the
/// logs are.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Which store backs the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    /// In-memory session slot, gone when the process exits
    Session,
    /// SQLite database file
    Sqlite,
}

/// Command line arguments for the Hours Planner MCP server
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Storage backend to use
    #[arg(long, value_enum, default_value_t = Backend::Sqlite)]
    pub backend: Backend,

    /// Path to the SQLite database file
    /// If not provided, uses a default location in the user's home directory
    #[arg(long)]
    pub database: Option<PathBuf>,

    /// Insert the demo strategies when the store is empty
    #[arg(long)]
    pub seed: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,

    /// Enable verbose output (implies debug)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Log level implied by the flags
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.debug {
            "info"
        } else {
            "warn"
        }
    }

    /// Resolve the database path, creating its parent directory if needed
    pub fn database_path(&self) -> std::io::Result<PathBuf> {
        match &self.database {
            Some(path) => {
                if let Some(parent) = path.parent() {
                    if !parent.as_os_str().is_empty() && !parent.exists() {
                        std::fs::create_dir_all(parent)?;
                    }
                }
                Ok(path.clone())
            }
            None => default_database_path(),
        }
    }
}

/// Get the default database path, falling back through writable locations
pub fn default_database_path() -> std::io::Result<PathBuf> {
    let potential_paths = [
        dirs::home_dir().map(|p| p.join(".hours_planner")),
        dirs::data_dir().map(|p| p.join("hours_planner")),
        dirs::config_dir().map(|p| p.join("hours_planner")),
        std::env::current_dir().ok().map(|p| p.join(".hours_planner")),
    ];

    for dir in potential_paths.iter().flatten() {
        if is_writable_dir(dir) {
            return Ok(dir.join("strategies.db"));
        }
    }

    let temp_dir = std::env::temp_dir().join("hours_planner");
    std::fs::create_dir_all(&temp_dir)?;

    tracing::warn!("Using temporary directory for database: {}", temp_dir.display());
    Ok(temp_dir.join("strategies.db"))
}

fn is_writable_dir(dir: &std::path::Path) -> bool {
    if std::fs::create_dir_all(dir).is_err() {
        return false;
    }
    let probe = dir.join(".test_write");
    let writable = std::fs::write(&probe, "test").is_ok();
    let _ = std::fs::remove_file(&probe);
    writable
}

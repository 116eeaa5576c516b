use std::path::PathBuf;

/// Settings read from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// `CATALOG_PATH`, defaults to `data/catalog.csv`.
    pub catalog_path: PathBuf,
    /// `TIMETABLE_SEED`; entropy is used when unset.
    pub seed: Option<u64>,
}

pub const DEFAULT_CATALOG_PATH: &str = "data/catalog.csv";
pub const DEFAULT_PORT: u16 = 8080;

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup, so tests need not touch the process env.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let catalog_path = lookup("CATALOG_PATH")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CATALOG_PATH));

        let seed = match lookup("TIMETABLE_SEED") {
            Some(raw) if !raw.trim().is_empty() => Some(
                raw.trim()
                    .parse::<u64>()
                    .map_err(|_| format!("TIMETABLE_SEED must be an unsigned integer, got '{}'", raw))?,
            ),
            _ => None,
        };

        Ok(Config { catalog_path, seed })
    }
}

use config::ConfigError;
use flite_core::CabinGeometry;
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub dataset: DatasetConfig,
    pub cabin: CabinGeometry,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatasetConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub filter: String,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
        Self::load_from("config", &run_mode)
    }

    /// Layer, lowest precedence first: built-in defaults, `{dir}/default`,
    /// `{dir}/{run_mode}`, `{dir}/local`, then `FLITE__*` environment variables.
    pub fn load_from(dir: &str, run_mode: &str) -> Result<Self, ConfigError> {
        let s = config::Config::builder()
            .set_default("dataset.path", "Flite_passenger_Dataset.csv")?
            .set_default("cabin.rows", i64::from(CabinGeometry::DEFAULT_ROWS))?
            .set_default("cabin.columns", i64::from(CabinGeometry::DEFAULT_COLUMNS))?
            .set_default("logging.filter", "flite_cli=info,flite_store=info")?
            .add_source(config::File::with_name(&format!("{}/default", dir)).required(false))
            .add_source(config::File::with_name(&format!("{}/{}", dir, run_mode)).required(false))
            // Not checked in
            .add_source(config::File::with_name(&format!("{}/local", dir)).required(false))
            // Eg.. `FLITE__CABIN__ROWS=2` sets `cabin.rows`
            .add_source(
                config::Environment::with_prefix("FLITE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        // `cabin` is checked as it deserializes
        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_defaults_without_files() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(dir.path().to_str().unwrap(), "test").unwrap();
        assert_eq!(config.cabin, CabinGeometry::default());
        assert_eq!(config.dataset.path, PathBuf::from("Flite_passenger_Dataset.csv"));
        assert!(config.logging.filter.contains("flite_store"));
    }

    #[test]
    fn test_run_mode_file_overrides_default() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("default.toml"),
            "[cabin]\nrows = 10\ncolumns = 4\n[dataset]\npath = \"seed.csv\"\n",
        )
        .unwrap();
        fs::write(dir.path().join("small.toml"), "[cabin]\nrows = 2\n").unwrap();

        let config = Config::load_from(dir.path().to_str().unwrap(), "small").unwrap();
        assert_eq!(config.cabin, CabinGeometry::new(2, 4).unwrap());
        assert_eq!(config.dataset.path, PathBuf::from("seed.csv"));
    }

    #[test]
    fn test_invalid_cabin_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("default.toml"), "[cabin]\ncolumns = 30\n").unwrap();

        let err = Config::load_from(dir.path().to_str().unwrap(), "test").unwrap_err();
        assert!(err.to_string().contains("between 1 and 26"), "{}", err);
    }
}

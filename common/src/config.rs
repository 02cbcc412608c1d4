//! Configuration loading and logging setup shared by the sandbox binaries

use serde::de::DeserializeOwned;
use std::cmp::Ordering;
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to open config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Deserialize a YAML file into `T`
pub fn load_yaml<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let file = File::open(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let value = serde_yaml::from_reader(BufReader::new(file)).map_err(|source| {
        ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        }
    })?;
    log::info!("Loaded configuration from {}", path.display());
    Ok(value)
}

/// Load `T` from `path` if given, otherwise fall back to `T::default()`
pub fn load_or_default<T: DeserializeOwned + Default>(path: Option<&Path>) -> Result<T, ConfigError> {
    match path {
        Some(path) => load_yaml(path),
        None => Ok(T::default()),
    }
}

/// Initialize `env_logger` with an `info` default, overridable through `RUST_LOG`
pub fn init_logging() {
    let env = env_logger::Env::default().default_filter_or("info");
    // A second call (e.g. from tests) is harmless
    let _ = env_logger::Builder::from_env(env).try_init();
}

/// Clamp `value` into `[min, max]`, logging when it had to move. NaN maps to `min`.
pub fn clamp_logged<T>(name: &str, value: T, min: T, max: T) -> T
where
    T: PartialOrd + Copy + fmt::Display,
{
    let clamped = match (value.partial_cmp(&min), value.partial_cmp(&max)) {
        (None, _) | (Some(Ordering::Less), _) => min,
        (_, Some(Ordering::Greater)) => max,
        _ => value,
    };
    if clamped != value {
        log::warn!("{name} = {value} outside [{min}, {max}], clamped to {clamped}");
    }
    clamped
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::io::Write;

    #[derive(Debug, Default, Deserialize, PartialEq)]
    #[serde(default)]
    struct Sample {
        speed: f32,
        name: String,
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_yaml::<Sample>(Path::new("/definitely/not/here.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn yaml_file_round_trips_through_serde() {
        let path = std::env::temp_dir().join("sandbox_common_config_test.yaml");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "speed: 2.5\nname: probe").unwrap();

        let sample: Sample = load_yaml(&path).unwrap();
        assert_eq!(
            sample,
            Sample {
                speed: 2.5,
                name: "probe".into()
            }
        );
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn malformed_yaml_is_parse_error() {
        let path = std::env::temp_dir().join("sandbox_common_config_bad.yaml");
        std::fs::write(&path, "speed: [not, a, number").unwrap();
        let err = load_yaml::<Sample>(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn default_when_no_path() {
        let sample: Sample = load_or_default(None).unwrap();
        assert_eq!(sample, Sample::default());
    }

    #[test]
    fn clamp_handles_nan_and_range() {
        assert_eq!(clamp_logged("x", 5.0, 0.0, 1.0), 1.0);
        assert_eq!(clamp_logged("x", -5.0, 0.0, 1.0), 0.0);
        assert_eq!(clamp_logged("x", f32::NAN, 0.5, 1.0), 0.5);
        assert_eq!(clamp_logged("x", 0.25, 0.0, 1.0), 0.25);
        assert_eq!(clamp_logged("n", 12_u32, 2, 10), 10);
        assert_eq!(clamp_logged("d", 1.2_f64, 0.1, 3.0), 1.2);
    }
}

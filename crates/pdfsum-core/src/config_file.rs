use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{DEFAULT_WRAP_WIDTH, GenerationParams};

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub server: Option<ServerConfig>,
    pub model: Option<ModelConfig>,
    pub generation: Option<GenerationConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub max_upload_mb: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Directory holding `rust_model.ot`, `config.json`, `vocab.json` and
    /// `merges.txt`. When absent the weights are downloaded and cached.
    pub model_dir: Option<String>,
    pub device: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub min_length: Option<i64>,
    pub max_length: Option<i64>,
    pub num_beams: Option<i64>,
    pub length_penalty: Option<f64>,
    pub early_stopping: Option<bool>,
    pub prefix: Option<String>,
    pub wrap_width: Option<usize>,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
}

/// Platform config directory path: `<config_dir>/pdfsum/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("pdfsum").join("config.toml"))
}

/// Load config by cascading CWD `.pdfsum.toml` over platform config, then
/// `explicit` (if given) over both. Later values override earlier ones.
///
/// Missing cascade files are skipped silently; a missing or malformed
/// `explicit` file is an error.
pub fn load_config(explicit: Option<&Path>) -> Result<ConfigFile, ConfigError> {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".pdfsum.toml"));

    let mut config = match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    };

    if let Some(path) = explicit {
        config = merge(config, read_config(path)?);
    }
    Ok(config)
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    if !path.exists() {
        return None;
    }
    match read_config(path) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!(error = %e, "ignoring config file");
            None
        }
    }
}

fn read_config(path: &Path) -> Result<ConfigFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    let base_server = base.server.unwrap_or_default();
    let base_model = base.model.unwrap_or_default();
    let base_generation = base.generation.unwrap_or_default();
    let server = overlay.server.unwrap_or_default();
    let model = overlay.model.unwrap_or_default();
    let generation = overlay.generation.unwrap_or_default();

    ConfigFile {
        server: Some(ServerConfig {
            host: server.host.or(base_server.host),
            port: server.port.or(base_server.port),
            max_upload_mb: server.max_upload_mb.or(base_server.max_upload_mb),
        }),
        model: Some(ModelConfig {
            model_dir: model.model_dir.or(base_model.model_dir),
            device: model.device.or(base_model.device),
        }),
        generation: Some(GenerationConfig {
            min_length: generation.min_length.or(base_generation.min_length),
            max_length: generation.max_length.or(base_generation.max_length),
            num_beams: generation.num_beams.or(base_generation.num_beams),
            length_penalty: generation.length_penalty.or(base_generation.length_penalty),
            early_stopping: generation.early_stopping.or(base_generation.early_stopping),
            prefix: generation.prefix.or(base_generation.prefix),
            wrap_width: generation.wrap_width.or(base_generation.wrap_width),
        }),
    }
}

/// Which torch device the model runs on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeviceChoice {
    /// CUDA when available, CPU otherwise.
    #[default]
    Auto,
    Cpu,
    Cuda,
}

impl FromStr for DeviceChoice {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "cpu" => Ok(Self::Cpu),
            "cuda" | "gpu" => Ok(Self::Cuda),
            _ => Err(ConfigError::Invalid {
                key: "model.device",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for DeviceChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Auto => "auto",
            Self::Cpu => "cpu",
            Self::Cuda => "cuda",
        })
    }
}

/// Fully resolved runtime settings (defaults, then config file, then env).
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub max_upload_bytes: usize,
    pub model_dir: Option<PathBuf>,
    pub device: DeviceChoice,
    pub generation: GenerationParams,
    pub wrap_width: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            max_upload_bytes: 50 * 1024 * 1024,
            model_dir: None,
            device: DeviceChoice::Auto,
            generation: GenerationParams::default(),
            wrap_width: DEFAULT_WRAP_WIDTH,
        }
    }
}

impl Settings {
    /// Resolve settings from the process environment.
    pub fn from_env(config: &ConfigFile) -> Result<Self, ConfigError> {
        Self::resolve(config, |key| std::env::var(key).ok())
    }

    /// Resolve settings, looking up `PDFSUM_*` overrides through `env`.
    pub fn resolve(
        config: &ConfigFile,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut settings = Settings::default();

        if let Some(server) = &config.server {
            if let Some(host) = &server.host {
                settings.host = host.clone();
            }
            if let Some(port) = server.port {
                settings.port = port;
            }
            if let Some(mb) = server.max_upload_mb {
                settings.max_upload_bytes =
                    mb.checked_mul(1024 * 1024).ok_or_else(|| ConfigError::Invalid {
                        key: "server.max_upload_mb",
                        value: mb.to_string(),
                    })?;
            }
        }

        if let Some(model) = &config.model {
            settings.model_dir = model.model_dir.as_ref().map(PathBuf::from);
            if let Some(device) = &model.device {
                settings.device = device.parse()?;
            }
        }

        if let Some(generation) = &config.generation {
            let params = &mut settings.generation;
            if let Some(v) = generation.min_length {
                params.min_length = v;
            }
            if let Some(v) = generation.max_length {
                params.max_length = v;
            }
            if let Some(v) = generation.num_beams {
                params.num_beams = v;
            }
            if let Some(v) = generation.length_penalty {
                params.length_penalty = v;
            }
            if let Some(v) = generation.early_stopping {
                params.early_stopping = v;
            }
            if let Some(v) = &generation.prefix {
                params.prefix = v.clone();
            }
            if let Some(v) = generation.wrap_width {
                settings.wrap_width = v;
            }
        }

        if let Some(host) = env("PDFSUM_HOST") {
            settings.host = host;
        }
        if let Some(port) = env("PDFSUM_PORT") {
            settings.port = port.trim().parse().map_err(|_| ConfigError::Invalid {
                key: "PDFSUM_PORT",
                value: port.clone(),
            })?;
        }
        if let Some(dir) = env("PDFSUM_MODEL_DIR") {
            settings.model_dir = Some(PathBuf::from(dir));
        }
        if let Some(device) = env("PDFSUM_DEVICE") {
            settings.device = device.parse()?;
        }

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let params = &self.generation;
        if params.min_length < 0 || params.min_length > params.max_length {
            return Err(ConfigError::Invalid {
                key: "generation.min_length",
                value: params.min_length.to_string(),
            });
        }
        if params.num_beams < 1 {
            return Err(ConfigError::Invalid {
                key: "generation.num_beams",
                value: params.num_beams.to_string(),
            });
        }
        if self.wrap_width == 0 {
            return Err(ConfigError::Invalid {
                key: "generation.wrap_width",
                value: "0".to_string(),
            });
        }
        Ok(())
    }

    /// `host:port` string suitable for binding.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

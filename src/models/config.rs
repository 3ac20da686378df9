use eink_photo::ToneOptions;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::FrameSpec;

/// Application configuration loaded from config.yaml
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub frame: FrameConfig,
    pub tone: ToneConfig,
    pub faces: FacesConfig,
    pub server: ServerConfig,

    /// Directory of the config file, used to resolve relative paths
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

/// Where objects and records live
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    /// Root directory for the filesystem object store
    pub data_dir: PathBuf,

    /// Bucket that receives uploads and holds all artifacts
    pub bucket: String,

    /// JSON file for persisted image records (in-memory only when unset)
    pub metadata_file: Option<PathBuf>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            bucket: "photos".to_string(),
            metadata_file: Some(PathBuf::from("./data/images.json")),
        }
    }
}

/// Target panel
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct FrameConfig {
    pub width: u32,
    pub height: u32,

    /// Palette JSON file; the built-in palette is used when it is missing
    pub palette_path: PathBuf,

    /// Largest accepted upload in bytes
    pub max_input_bytes: usize,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            width: FrameSpec::DEFAULT.width,
            height: FrameSpec::DEFAULT.height,
            palette_path: PathBuf::from("palette.json"),
            max_input_bytes: FrameSpec::DEFAULT.max_input_bytes,
        }
    }
}

/// Tone adjustment applied before dithering
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ToneConfig {
    pub saturation: f32,
    pub contrast_amount: f32,
    pub blur_radius: f32,
    pub threshold: u8,
}

impl Default for ToneConfig {
    fn default() -> Self {
        let defaults = ToneOptions::default();
        Self {
            saturation: defaults.saturation,
            contrast_amount: defaults.contrast_amount,
            blur_radius: defaults.blur_radius,
            threshold: defaults.threshold,
        }
    }
}

impl ToneConfig {
    pub fn to_options(&self) -> ToneOptions {
        ToneOptions::new()
            .saturation(self.saturation)
            .contrast_amount(self.contrast_amount)
            .blur_radius(self.blur_radius)
            .threshold(self.threshold)
    }
}

/// Face detection service
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct FacesConfig {
    /// Detector endpoint; faces are not detected when unset
    pub endpoint: Option<String>,

    pub timeout_secs: u64,

    /// Fraction by which the union face box is expanded
    pub margin: f64,
}

impl Default for FacesConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_secs: 10,
            margin: eink_photo::DEFAULT_FACE_MARGIN,
        }
    }
}

/// HTTP API settings
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    /// Base URL used when issuing signed URLs
    pub public_url: String,

    /// HMAC secret for signed URLs; a random secret is used when unset
    pub signing_secret: Option<String>,

    pub image_url_ttl_secs: i64,
    pub upload_url_ttl_secs: i64,

    /// Records considered per random pick
    pub candidate_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            public_url: "http://localhost:3000".to_string(),
            signing_secret: None,
            image_url_ttl_secs: 3600,
            upload_url_ttl_secs: 300,
            candidate_limit: 20,
        }
    }
}

impl AppConfig {
    /// Load configuration from a YAML file, falling back to defaults
    pub fn load_from_file(path: &Path) -> Self {
        let mut config = match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str::<Self>(&content) {
                Ok(config) => {
                    tracing::info!(
                        path = %path.display(),
                        bucket = %config.storage.bucket,
                        width = config.frame.width,
                        height = config.frame.height,
                        "Loaded configuration"
                    );
                    config
                }
                Err(e) => {
                    tracing::warn!(%e, path = %path.display(), "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(%e, path = %path.display(), "Failed to read config, using defaults");
                Self::default()
            }
        };
        config.base_dir = path.parent().map(Path::to_path_buf);
        config
    }

    /// Apply `PALETTE_PATH` and `DATA_DIR` overrides from the environment
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(
            std::env::var_os("PALETTE_PATH").map(PathBuf::from),
            std::env::var_os("DATA_DIR").map(PathBuf::from),
        )
    }

    /// Override the palette path and data directory.
    ///
    /// A metadata file left at its default location moves into the new data
    /// directory along with the objects.
    pub fn with_overrides(
        mut self,
        palette_path: Option<PathBuf>,
        data_dir: Option<PathBuf>,
    ) -> Self {
        if let Some(path) = palette_path {
            self.frame.palette_path = path;
        }
        if let Some(dir) = data_dir {
            if self.storage.metadata_file == StorageConfig::default().metadata_file {
                self.storage.metadata_file = Some(dir.join("images.json"));
            }
            self.storage.data_dir = dir;
        }
        self
    }

    /// Palette location; relative paths that do not exist are retried
    /// relative to the config file's directory
    pub fn resolved_palette_path(&self) -> PathBuf {
        let path = &self.frame.palette_path;
        if path.is_absolute() || path.exists() {
            return path.clone();
        }
        match &self.base_dir {
            Some(base) if base.join(path).exists() => base.join(path),
            _ => path.clone(),
        }
    }

    pub fn frame_spec(&self) -> FrameSpec {
        FrameSpec {
            width: self.frame.width,
            height: self.frame.height,
            max_input_bytes: self.frame.max_input_bytes,
        }
    }
}

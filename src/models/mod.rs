pub mod config;
pub mod fingerprint;
pub mod frame_spec;
pub mod image_record;
pub mod input_format;

pub use config::{AppConfig, FacesConfig, FrameConfig, ServerConfig, StorageConfig, ToneConfig};
pub use fingerprint::ContentFingerprint;
pub use frame_spec::FrameSpec;
pub use image_record::{ImageId, ImageRecord, Location, PROCESSING_VERSION};
pub use input_format::{content_type_for_key, extension_of, InputFormat};

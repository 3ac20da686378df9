pub mod dedup;
pub mod face_detector;
pub mod image_pipeline;
pub mod metadata_store;
pub mod object_store;
pub mod selector;
pub mod url_signer;

pub use dedup::{DedupCheck, DedupGate, FingerprintClaim};
pub use face_detector::{FaceDetector, HttpFaceDetector, NoFaceDetector};
pub use image_pipeline::{prepare_artifacts, Artifacts, ImagePipeline, ProcessOutcome, INPUT_PREFIX};
pub use metadata_store::{InMemoryMetadataStore, MetadataStore};
pub use object_store::{FsObjectStore, InMemoryObjectStore, ObjectStore};
pub use selector::{pick_weighted, selection_weight};
pub use url_signer::{Signature, UrlSigner};

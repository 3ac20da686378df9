pub mod events;
pub mod image;
pub mod random;
pub mod upload;

pub use events::{handle_event, outcome_response, ObjectCreatedEvent, ProcessResponse, __path_handle_event};
pub use image::{handle_image, __path_handle_image};
pub use random::{handle_random_image, ImageMetadata, RandomImageResponse, __path_handle_random_image};
pub use upload::{
    handle_upload, handle_upload_url, signed_url, SignedQuery, UploadUrlResponse, __path_handle_upload,
    __path_handle_upload_url,
};

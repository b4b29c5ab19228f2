pub mod client;
pub mod error;
pub mod helpers;
pub mod store;

pub use client::S3Client;
pub use error::S3Error;
pub use helpers::detect_content_type;
pub use store::{ObjectStore, PutObject};

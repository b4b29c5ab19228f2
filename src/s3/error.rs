use thiserror::Error;

/// Errors returned by the object store
#[derive(Error, Debug)]
pub enum S3Error {
    /// S3 access denied
    #[error("S3 access denied for bucket '{bucket}': {message}")]
    AccessDenied { bucket: String, message: String },

    /// Destination bucket does not exist
    #[error("S3 bucket '{bucket}' does not exist")]
    NoSuchBucket { bucket: String },

    /// Network-related error
    #[error("Network error: {message}")]
    Network { message: String },

    /// AWS SDK error wrapper
    #[error("AWS error: {0}")]
    AwsSdk(String),
}

impl S3Error {
    /// Classify an AWS SDK error by its rendered message
    pub fn from_aws_error<E: std::fmt::Display>(bucket: &str, error: E) -> Self {
        let message = error.to_string();
        let lower = message.to_lowercase();

        if lower.contains("access denied") || lower.contains("forbidden") {
            Self::AccessDenied {
                bucket: bucket.to_string(),
                message,
            }
        } else if lower.contains("nosuchbucket") || lower.contains("no such bucket") {
            Self::NoSuchBucket {
                bucket: bucket.to_string(),
            }
        } else if lower.contains("dispatch failure")
            || lower.contains("timeout")
            || lower.contains("connection")
        {
            Self::Network { message }
        } else {
            Self::AwsSdk(message)
        }
    }
}

use anyhow::Result;
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::{
    Client, error::DisplayErrorContext, primitives::ByteStream, types::ObjectCannedAcl,
};
use tracing::debug;

use super::error::S3Error;
use super::store::{ObjectStore, PutObject};
use crate::config::Config;

/// `ObjectStore` backed by the AWS SDK. Credentials come from the default provider chain.
#[derive(Clone)]
pub struct S3Client {
    client: Client,
}

impl S3Client {
    pub async fn new(config: &Config) -> Result<Self> {
        let mut aws_config = aws_config::defaults(BehaviorVersion::latest());

        if let Some(region) = &config.region {
            aws_config = aws_config.region(aws_config::Region::new(region.clone()));
        }

        if let Some(profile) = &config.profile {
            aws_config = aws_config.profile_name(profile);
        }

        let sdk_config = aws_config.load().await;
        let client = Client::new(&sdk_config);

        Ok(Self { client })
    }
}

#[async_trait]
impl ObjectStore for S3Client {
    async fn put_object(&self, req: PutObject) -> Result<(), S3Error> {
        let size = req.body.len();
        let mut builder = self
            .client
            .put_object()
            .bucket(&req.bucket)
            .key(&req.key)
            .content_type(&req.content_type)
            .content_length(size as i64)
            .body(ByteStream::from(req.body));

        if req.public_read {
            builder = builder.acl(ObjectCannedAcl::PublicRead);
        }

        builder
            .send()
            .await
            .map_err(|e| S3Error::from_aws_error(&req.bucket, DisplayErrorContext(e)))?;

        debug!("put s3://{}/{} ({} bytes)", req.bucket, req.key, size);
        Ok(())
    }
}

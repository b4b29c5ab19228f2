use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

pub const DEFAULT_BUCKET: &str = "liminal.quuux.org";
pub const DEFAULT_ROOT: &str = "dist";
pub const DEFAULT_BUILD_COMMAND: &str = "yarn build";
pub const DEFAULT_BUILD_PATH: &str = "/opt/homebrew/bin";

/// Configuration for building and deploying the site
#[derive(Debug, Clone)]
pub struct Config {
    /// AWS region, falls back to the SDK default chain when unset
    pub region: Option<String>,
    pub profile: Option<String>,
    pub bucket: String,
    /// Local directory mirrored into the bucket
    pub root: PathBuf,
    pub build_command: String,
    /// Directory appended to `PATH` while the build command runs
    pub build_path: String,
}

impl Config {
    /// Load configuration from environment variables and .env file
    ///
    /// S3 settings are not checked here; see [`Config::validate_s3`].
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok(); // Load .env file if it exists

        let region = non_empty_var("AWS_REGION");
        let profile = non_empty_var("AWS_PROFILE");
        let bucket = non_empty_var("SITE_BUCKET").unwrap_or_else(|| DEFAULT_BUCKET.to_string());

        let root = non_empty_var("SITE_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ROOT));

        let build_command = non_empty_var("SITE_BUILD_COMMAND")
            .unwrap_or_else(|| DEFAULT_BUILD_COMMAND.to_string());
        let build_path =
            non_empty_var("SITE_BUILD_PATH").unwrap_or_else(|| DEFAULT_BUILD_PATH.to_string());

        Ok(Self {
            region,
            profile,
            bucket,
            root,
            build_command,
            build_path,
        })
    }

    pub fn with_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = bucket.into();
        self
    }

    /// Check the settings only a deploy needs: region format and bucket name
    ///
    /// # Errors
    ///
    /// Returns an error naming the first invalid setting
    pub fn validate_s3(&self) -> Result<()> {
        if let Some(region) = &self.region {
            Self::validate_region(region)?;
        }
        Self::validate_bucket_name(&self.bucket)
            .with_context(|| format!("Invalid bucket '{}'", self.bucket))
    }

    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// Validate AWS region format
    fn validate_region(region: &str) -> Result<()> {
        // Basic validation - ensure it looks like a region (contains a dash)
        if !region.contains('-') {
            anyhow::bail!(
                "AWS_REGION '{}' doesn't look like a valid region (e.g., us-west-2, eu-west-1)",
                region
            );
        }

        Ok(())
    }

    /// Validate S3 bucket name according to AWS rules
    pub fn validate_bucket_name(bucket: &str) -> Result<()> {
        if bucket.len() < 3 || bucket.len() > 63 {
            anyhow::bail!(
                "bucket '{}' must be between 3 and 63 characters (got {})",
                bucket,
                bucket.len()
            );
        }

        let edge_ok = |c: Option<char>| {
            c.is_some_and(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        };
        if !edge_ok(bucket.chars().next()) || !edge_ok(bucket.chars().last()) {
            anyhow::bail!(
                "bucket '{}' must start and end with a lowercase letter or number",
                bucket
            );
        }

        if let Some(c) = bucket
            .chars()
            .find(|c| !c.is_ascii_lowercase() && !c.is_ascii_digit() && *c != '-' && *c != '.')
        {
            anyhow::bail!(
                "bucket '{}' contains invalid character '{}'. Only lowercase letters, numbers, hyphens, and periods are allowed",
                bucket,
                c
            );
        }

        if bucket.contains("..") {
            anyhow::bail!("bucket '{}' cannot contain consecutive periods", bucket);
        }

        if bucket.split('.').all(|part| part.parse::<u8>().is_ok()) {
            anyhow::bail!("bucket '{}' cannot be formatted as an IP address", bucket);
        }

        Ok(())
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

use async_trait::async_trait;

use super::error::S3Error;

/// A single object write: body, key, content type and access flag
#[derive(Debug, Clone, PartialEq)]
pub struct PutObject {
    pub bucket: String,
    pub key: String,
    pub body: Vec<u8>,
    pub content_type: String,
    pub public_read: bool,
}

/// The one object-store operation a deploy needs.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Create or overwrite the object at `req.bucket`/`req.key`.
    async fn put_object(&self, req: PutObject) -> Result<(), S3Error>;
}

#[cfg(test)]
pub mod memory {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    /// In-memory store keyed by (bucket, key), optionally failing on the n-th put.
    #[derive(Default)]
    pub struct MemoryStore {
        pub objects: Mutex<BTreeMap<(String, String), PutObject>>,
        pub attempts: Mutex<Vec<String>>,
        fail_on: Option<usize>,
    }

    impl MemoryStore {
        pub fn failing_on(call: usize) -> Self {
            Self {
                fail_on: Some(call),
                ..Default::default()
            }
        }

        pub fn keys(&self) -> Vec<String> {
            self.objects
                .lock()
                .unwrap()
                .keys()
                .map(|(_, key)| key.clone())
                .collect()
        }

        pub fn get(&self, key: &str) -> Option<PutObject> {
            self.objects
                .lock()
                .unwrap()
                .iter()
                .find(|((_, k), _)| k == key)
                .map(|(_, obj)| obj.clone())
        }
    }

    #[async_trait]
    impl ObjectStore for MemoryStore {
        async fn put_object(&self, req: PutObject) -> Result<(), S3Error> {
            let call = {
                let mut attempts = self.attempts.lock().unwrap();
                attempts.push(req.key.clone());
                attempts.len()
            };

            if self.fail_on == Some(call) {
                return Err(S3Error::Network {
                    message: "connection reset".to_string(),
                });
            }

            self.objects
                .lock()
                .unwrap()
                .insert((req.bucket.clone(), req.key.clone()), req);
            Ok(())
        }
    }
}

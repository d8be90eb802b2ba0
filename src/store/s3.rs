//! MinIO-backed object store.
//!
//! The deployment points the AWS SDK at a MinIO endpoint, so the client is
//! built with an endpoint override and path-style addressing (MinIO does not
//! serve virtual-hosted bucket URLs).

use async_trait::async_trait;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::primitives::ByteStream;

use crate::config::StorageConfig;
use crate::error::{CleanError, CleanResult};
use crate::store::ObjectStore;

pub struct S3Store {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3Store {
    pub async fn connect(cfg: &StorageConfig) -> Self {
        let credentials = Credentials::new(
            cfg.access_key.clone(),
            cfg.secret_key.clone(),
            None,
            None,
            "minio-env",
        );
        let shared = aws_config::from_env()
            .endpoint_url(&cfg.endpoint)
            .credentials_provider(credentials)
            .region(Region::new("us-east-1"))
            .load()
            .await;
        let s3_config = aws_sdk_s3::config::Builder::from(&shared)
            .force_path_style(true)
            .build();

        Self {
            client: aws_sdk_s3::Client::from_conf(s3_config),
            bucket: cfg.bucket.clone(),
        }
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn get(&self, key: &str) -> CleanResult<Vec<u8>> {
        let object = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                let service_err = e.into_service_error();
                if service_err.is_no_such_key() {
                    CleanError::NotFound(key.to_string())
                } else {
                    CleanError::storage(key, service_err)
                }
            })?;

        let bytes = object
            .body
            .collect()
            .await
            .map_err(|e| CleanError::storage(key, e))?;
        Ok(bytes.into_bytes().to_vec())
    }

    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> CleanResult<()> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(bytes))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| CleanError::storage(key, e.into_service_error()))?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> CleanResult<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| CleanError::storage(key, e.into_service_error()))?;
        Ok(())
    }
}

/*!
 * Interface to the storage service that objects are copied from.
 */

use crate::error::CopyError;
use async_trait::async_trait;
use std::pin::Pin;
use tokio::io::AsyncRead;

/** Body of an object being downloaded. */
pub type ObjectReader = Pin<Box<dyn AsyncRead + Send>>;

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /**
     * Starts a download of `key` from `bucket`.  Errors are classified into
     * the matching [`CopyError`] variant; failures while reading the
     * returned body surface as I/O errors from the reader.
     */
    async fn get_object(
        &self,
        bucket: &str,
        key: &str,
    ) -> Result<ObjectReader, CopyError>;
}

/*!
 * [`ObjectStore`] backed by S3, using whatever credentials the execution
 * environment provides.
 */

use crate::error::CopyError;
use crate::error::ErrorKind;
use crate::store::ObjectReader;
use crate::store::ObjectStore;
use anyhow::Context;
use async_trait::async_trait;
use rusoto_core::HttpClient;
use rusoto_core::Region;
use rusoto_core::RusotoError;
use rusoto_credential::DefaultCredentialsProvider;
use rusoto_s3::GetObjectError;
use rusoto_s3::GetObjectRequest;
use rusoto_s3::S3Client;
use rusoto_s3::S3;

pub struct S3ObjectStore {
    client: S3Client,
}

impl S3ObjectStore {
    pub fn new(region: Region) -> Result<S3ObjectStore, anyhow::Error> {
        let provider = DefaultCredentialsProvider::new()
            .with_context(|| "creating credentials provider")?;
        let http_client =
            HttpClient::new().with_context(|| "creating HTTP client")?;
        Ok(S3ObjectStore {
            client: S3Client::new_with(http_client, provider, region),
        })
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn get_object(
        &self,
        bucket: &str,
        key: &str,
    ) -> Result<ObjectReader, CopyError> {
        let object_output = self
            .client
            .get_object(GetObjectRequest {
                bucket: bucket.to_owned(),
                key: key.to_owned(),
                ..Default::default()
            })
            .await
            .map_err(|error| {
                CopyError::for_object(
                    classify(&error),
                    bucket,
                    key,
                    Box::new(error),
                )
            })?;

        let body = object_output.body.ok_or_else(|| {
            CopyError::for_object(
                ErrorKind::TransferFailure,
                bucket,
                key,
                "object missing body".into(),
            )
        })?;
        Ok(Box::pin(body.into_async_read()))
    }
}

/*
 * rusoto only models NoSuchKey and InvalidObjectState for GetObject.  Missing
 * buckets and authorization failures come back as unparsed responses, so for
 * those we go by the HTTP status.
 */
fn classify(error: &RusotoError<GetObjectError>) -> ErrorKind {
    match error {
        RusotoError::Service(GetObjectError::NoSuchKey(_)) => {
            ErrorKind::ObjectNotFound
        }
        RusotoError::Credentials(_) => ErrorKind::AccessDenied,
        RusotoError::HttpDispatch(_) => ErrorKind::TransferFailure,
        RusotoError::Unknown(response) => {
            classify_status(response.status.as_u16())
        }
        _ => ErrorKind::Unknown,
    }
}

fn classify_status(status: u16) -> ErrorKind {
    match status {
        404 => ErrorKind::ObjectNotFound,
        401 | 403 => ErrorKind::AccessDenied,
        _ => ErrorKind::Unknown,
    }
}

/*!
 * The invocation request: which bucket to read and which keys to copy.
 */

use crate::error::CopyError;
use serde::Deserialize;
use serde_json::Value;

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct CopyRequest {
    pub bucket_name: String,
    /** Object keys, copied in this order. */
    pub s3_objects: Vec<String>,
}

impl CopyRequest {
    pub fn new(bucket_name: &str, s3_objects: &[&str]) -> CopyRequest {
        CopyRequest {
            bucket_name: bucket_name.to_owned(),
            s3_objects: s3_objects.iter().map(|k| (*k).to_owned()).collect(),
        }
    }

    /**
     * Parses the event payload.  Fields other than `bucket_name` and
     * `s3_objects` are ignored.
     */
    pub fn from_event(event: &Value) -> Result<CopyRequest, CopyError> {
        let request = CopyRequest::deserialize(event)
            .map_err(|e| CopyError::InvalidInput(e.to_string()))?;
        if request.bucket_name.is_empty() {
            return Err(CopyError::InvalidInput(
                "\"bucket_name\" is empty".to_string(),
            ));
        }
        Ok(request)
    }
}

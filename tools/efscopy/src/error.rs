/*!
 * Errors produced while copying objects into the destination directory.
 */

use serde::Serialize;
use std::error::Error as StdError;
use thiserror::Error;

pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/**
 * Failure of a single invocation.  Storage and transfer variants carry the
 * object they were working on and the underlying cause.
 */
#[derive(Debug, Error)]
pub enum CopyError {
    #[error("invalid request: {0}")]
    InvalidInput(String),

    #[error("object \"s3://{bucket}/{key}\" not found")]
    ObjectNotFound {
        bucket: String,
        key: String,
        #[source]
        source: BoxError,
    },

    #[error("access denied to object \"s3://{bucket}/{key}\"")]
    AccessDenied {
        bucket: String,
        key: String,
        #[source]
        source: BoxError,
    },

    #[error("transfer of \"s3://{bucket}/{key}\" failed")]
    TransferFailure {
        bucket: String,
        key: String,
        #[source]
        source: BoxError,
    },

    #[error("{context}")]
    Unknown {
        context: String,
        #[source]
        source: BoxError,
    },
}

/** Matchable, serializable tag for a [`CopyError`]. */
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidInput,
    ObjectNotFound,
    AccessDenied,
    TransferFailure,
    Unknown,
}

impl CopyError {
    /** Builds the variant for `kind` describing a failure on one object. */
    pub fn for_object(
        kind: ErrorKind,
        bucket: &str,
        key: &str,
        source: BoxError,
    ) -> CopyError {
        let bucket = bucket.to_owned();
        let key = key.to_owned();
        match kind {
            ErrorKind::InvalidInput => CopyError::InvalidInput(format!(
                "object \"s3://{}/{}\": {}",
                bucket, key, source
            )),
            ErrorKind::ObjectNotFound => CopyError::ObjectNotFound {
                bucket,
                key,
                source,
            },
            ErrorKind::AccessDenied => CopyError::AccessDenied {
                bucket,
                key,
                source,
            },
            ErrorKind::TransferFailure => CopyError::TransferFailure {
                bucket,
                key,
                source,
            },
            ErrorKind::Unknown => CopyError::Unknown {
                context: format!("fetching \"s3://{}/{}\"", bucket, key),
                source,
            },
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            CopyError::InvalidInput(_) => ErrorKind::InvalidInput,
            CopyError::ObjectNotFound { .. } => ErrorKind::ObjectNotFound,
            CopyError::AccessDenied { .. } => ErrorKind::AccessDenied,
            CopyError::TransferFailure { .. } => ErrorKind::TransferFailure,
            CopyError::Unknown { .. } => ErrorKind::Unknown,
        }
    }

    /**
     * Renders the error followed by each of its causes, separated by ": ".
     * This is what ends up in the log line and in a failed result.
     */
    pub fn describe(&self) -> String {
        let mut message = self.to_string();
        let mut cause = self.source();
        while let Some(c) = cause {
            message.push_str(": ");
            message.push_str(&c.to_string());
            cause = c.source();
        }
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_kind_matches_variant() {
        let err = CopyError::InvalidInput("missing field".to_string());
        assert_eq!(err.kind(), ErrorKind::InvalidInput);

        let err = CopyError::AccessDenied {
            bucket: "certs".to_string(),
            key: "tls/server.key".to_string(),
            source: "Forbidden".into(),
        };
        assert_eq!(err.kind(), ErrorKind::AccessDenied);
    }

    #[test]
    fn test_describe_includes_cause_chain() {
        let io_err = io::Error::new(io::ErrorKind::Other, "No space left");
        let source = anyhow::Error::new(io_err).context("writing \"/mnt/x\"");
        let err = CopyError::TransferFailure {
            bucket: "certs".to_string(),
            key: "a/b.pem".to_string(),
            source: source.into(),
        };

        let message = err.describe();
        assert!(message.starts_with(
            "transfer of \"s3://certs/a/b.pem\" failed: writing \"/mnt/x\""
        ));
        assert!(message.ends_with("No space left"));
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        let value = serde_json::to_value(ErrorKind::ObjectNotFound).unwrap();
        assert_eq!(value, serde_json::json!("object_not_found"));
    }
}

/*!
 * Entry point for one invocation: parse the event, copy the objects, and
 * report the outcome.
 */

use crate::error::CopyError;
use crate::error::ErrorKind;
use crate::fetcher::CopiedObject;
use crate::fetcher::ObjectFetcher;
use crate::request::CopyRequest;
use crate::store::ObjectStore;
use anyhow::Context;
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use std::path::PathBuf;

/** Outcome of an invocation, as handed back to whatever invoked us. */
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum InvocationResult {
    Succeeded {
        destination: PathBuf,
        copied: Vec<CopiedObject>,
        /** Names in the destination directory after the copy, sorted. */
        listing: Vec<String>,
    },
    Failed {
        destination: PathBuf,
        error: ErrorKind,
        message: String,
    },
}

impl InvocationResult {
    pub fn is_success(&self) -> bool {
        match self {
            InvocationResult::Succeeded { .. } => true,
            InvocationResult::Failed { .. } => false,
        }
    }
}

/**
 * Runs one invocation.  This never fails: any error is logged along with the
 * destination directory and returned as [`InvocationResult::Failed`].
 */
pub async fn handle_invocation<S: ObjectStore>(
    fetcher: &ObjectFetcher<S>,
    event: &Value,
) -> InvocationResult {
    let destination = fetcher.dest_dir().to_path_buf();
    match copy_and_list(fetcher, event).await {
        Ok((copied, listing)) => {
            log::info!(
                "directory listing of {}: {:?}",
                destination.display(),
                listing
            );
            InvocationResult::Succeeded {
                destination,
                copied,
                listing,
            }
        }
        Err(error) => {
            let message = error.describe();
            log::error!(
                "copying s3 objects to directory {} failed: {}",
                destination.display(),
                message
            );
            InvocationResult::Failed {
                destination,
                error: error.kind(),
                message,
            }
        }
    }
}

async fn copy_and_list<S: ObjectStore>(
    fetcher: &ObjectFetcher<S>,
    event: &Value,
) -> Result<(Vec<CopiedObject>, Vec<String>), CopyError> {
    let request = CopyRequest::from_event(event)?;
    let copied = fetcher.download_objects(&request).await?;
    let listing = list_directory(fetcher.dest_dir()).await.map_err(|e| {
        CopyError::Unknown {
            context: "listing destination directory".to_string(),
            source: e.into(),
        }
    })?;
    Ok((copied, listing))
}

/** Returns the sorted names of the entries in `dir`. */
pub async fn list_directory(dir: &Path) -> Result<Vec<String>, anyhow::Error> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .with_context(|| format!("reading directory {:?}", dir))?;
    let mut names = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .with_context(|| format!("reading directory {:?}", dir))?
    {
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    names.sort();
    Ok(names)
}

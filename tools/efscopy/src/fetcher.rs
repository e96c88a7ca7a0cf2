/*!
 * Copies a list of objects from one bucket into a flat destination directory.
 */

use crate::error::CopyError;
use crate::error::ErrorKind;
use crate::request::CopyRequest;
use crate::store::ObjectReader;
use crate::store::ObjectStore;
use anyhow::Context;
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;
use std::path::PathBuf;
use tokio::fs::File;

#[cfg(unix)]
use std::fs::Permissions;
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/** One object written to the destination directory. */
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CopiedObject {
    pub key: String,
    pub path: PathBuf,
    pub bytes: u64,
}

pub struct ObjectFetcher<S> {
    store: S,
    dest_dir: PathBuf,
}

impl<S: ObjectStore> ObjectFetcher<S> {
    pub fn new(store: S, dest_dir: PathBuf) -> ObjectFetcher<S> {
        ObjectFetcher { store, dest_dir }
    }

    /** The underlying store.  Tests use this to see what was requested. */
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn dest_dir(&self) -> &Path {
        &self.dest_dir
    }

    /**
     * Downloads each key of `request`, in order, into the destination
     * directory under the key's last path component.  Stops at the first
     * failure, including a key that doesn't name a file; objects already
     * copied are left in place.  A later key whose file name matches an
     * earlier one overwrites it.
     */
    pub async fn download_objects(
        &self,
        request: &CopyRequest,
    ) -> Result<Vec<CopiedObject>, CopyError> {
        let bucket = &request.bucket_name;
        let mut copied = Vec::with_capacity(request.s3_objects.len());
        let mut written_by: HashMap<&str, &str> = HashMap::new();
        for key in &request.s3_objects {
            let key = key.as_str();
            let file_name = local_file_name(key)?;
            if let Some(previous) = written_by.insert(file_name, key) {
                log::warn!(
                    "key \"{}\" overwrites \"{}\" (both map to \"{}\")",
                    key,
                    previous,
                    file_name
                );
            }

            let path = self.dest_dir.join(file_name);
            log::debug!("copying \"s3://{}/{}\" to {:?}", bucket, key, path);
            let reader = self.store.get_object(bucket, key).await?;
            let bytes = self.write_object(reader, &path).await.map_err(|e| {
                CopyError::for_object(
                    ErrorKind::TransferFailure,
                    bucket,
                    key,
                    e.into(),
                )
            })?;
            log::info!(
                "copied \"s3://{}/{}\" to {:?} ({} bytes)",
                bucket,
                key,
                path,
                bytes
            );

            copied.push(CopiedObject {
                key: key.to_owned(),
                path,
                bytes,
            });
        }

        Ok(copied)
    }

    /*
     * The body goes to a temporary file next to the final path and is renamed
     * into place once it has been flushed, so a transfer that fails partway
     * never leaves a truncated file under the final name.  The temporary file
     * is removed when it's dropped without being persisted.
     */
    async fn write_object(
        &self,
        mut reader: ObjectReader,
        path: &Path,
    ) -> Result<u64, anyhow::Error> {
        let tmp = tempfile::Builder::new()
            .prefix(".efscopy-")
            .tempfile_in(&self.dest_dir)
            .with_context(|| {
                format!("creating temporary file in {:?}", self.dest_dir)
            })?;
        /* tempfile creates files 0600; copies are meant to be shared. */
        #[cfg(unix)]
        tmp.as_file()
            .set_permissions(Permissions::from_mode(0o644))
            .with_context(|| format!("setting mode of {:?}", tmp.path()))?;
        let mut outfile = File::from_std(
            tmp.reopen()
                .with_context(|| format!("opening {:?}", tmp.path()))?,
        );

        let bytes = tokio::io::copy(&mut reader, &mut outfile)
            .await
            .with_context(|| format!("writing {:?}", tmp.path()))?;
        outfile
            .sync_all()
            .await
            .with_context(|| format!("flushing {:?}", tmp.path()))?;
        drop(outfile);

        tmp.persist(path)
            .with_context(|| format!("renaming into place at {:?}", path))?;
        Ok(bytes)
    }
}

/**
 * Returns the part of `key` after its last `/`, which is the name the object
 * is written under.  Keys that don't name a file (trailing `/`, `.`, `..`)
 * are rejected.
 */
pub fn local_file_name(key: &str) -> Result<&str, CopyError> {
    let name = match key.rfind('/') {
        Some(i) => &key[i + 1..],
        None => key,
    };

    if name.is_empty() || name == "." || name == ".." {
        return Err(CopyError::InvalidInput(format!(
            "key \"{}\" does not name a file",
            key
        )));
    }

    Ok(name)
}

/*!
 * efscopy: copies objects from an S3 bucket into a shared filesystem mount
 * (typically an EFS volume mounted into a Lambda function).
 *
 * An invocation names a bucket and a list of object keys.  Each object is
 * written into the configured destination directory under the last
 * component of its key, one at a time, stopping at the first failure.
 */

#[macro_use]
extern crate anyhow;

pub mod config;
pub mod error;
pub mod fetcher;
pub mod handler;
pub mod request;
pub mod s3;
pub mod store;

pub use config::Config;
pub use error::CopyError;
pub use error::ErrorKind;
pub use fetcher::CopiedObject;
pub use fetcher::ObjectFetcher;
pub use handler::handle_invocation;
pub use handler::InvocationResult;
pub use request::CopyRequest;
pub use s3::S3ObjectStore;
pub use store::ObjectReader;
pub use store::ObjectStore;

/**
 * Initializes logging for the binaries.  The filter defaults to "info" and
 * can be overridden with `RUST_LOG`.
 */
pub fn init_logging() {
    let env = env_logger::Env::default().default_filter_or("info");
    let _ = env_logger::Builder::from_env(env).try_init();
}

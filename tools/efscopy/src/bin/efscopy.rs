/*!
 * efscopy: Lambda function that copies the S3 objects named in its event into
 * the destination directory (see `efscopy::Config` for configuration).
 *
 * Event: {"bucket_name": "BUCKET", "s3_objects": ["KEY", ...]}
 */

use anyhow::Context;
use efscopy::handle_invocation;
use efscopy::Config;
use efscopy::InvocationResult;
use efscopy::ObjectFetcher;
use efscopy::ObjectStore;
use efscopy::S3ObjectStore;
use lambda_runtime::service_fn;
use lambda_runtime::LambdaEvent;
use serde_json::Value;

#[tokio::main]
async fn main() -> Result<(), lambda_runtime::Error> {
    efscopy::init_logging();

    let config = Config::from_env().with_context(|| "loading configuration")?;
    if !config.dest_dir.is_dir() {
        log::warn!(
            "destination {} is not a directory (yet); invocations will fail \
            until it is mounted",
            config.dest_dir.display()
        );
    }

    let store = S3ObjectStore::new(config.region.clone())?;
    let fetcher = ObjectFetcher::new(store, config.dest_dir.clone());
    lambda_runtime::run(service_fn(|event| function_handler(event, &fetcher)))
        .await
}

/*
 * Both outcomes are returned as the function's response.  A failed copy has
 * already been logged; the invocation itself still completes normally.
 */
async fn function_handler<S: ObjectStore>(
    event: LambdaEvent<Value>,
    fetcher: &ObjectFetcher<S>,
) -> Result<InvocationResult, lambda_runtime::Error> {
    log::debug!("request {}: {}", event.context.request_id, event.payload);
    Ok(handle_invocation(fetcher, &event.payload).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use efscopy::CopyError;
    use efscopy::ErrorKind;
    use efscopy::ObjectReader;
    use lambda_runtime::Context;
    use serde_json::json;
    use tempfile::TempDir;

    /* Holds nothing: every key is missing. */
    struct EmptyStore;

    #[async_trait]
    impl ObjectStore for EmptyStore {
        async fn get_object(
            &self,
            bucket: &str,
            key: &str,
        ) -> Result<ObjectReader, CopyError> {
            Err(CopyError::for_object(
                ErrorKind::ObjectNotFound,
                bucket,
                key,
                "The specified key does not exist.".into(),
            ))
        }
    }

    fn invoke(payload: Value) -> LambdaEvent<Value> {
        LambdaEvent::new(payload, Context::default())
    }

    #[tokio::test]
    async fn test_missing_bucket_completes_with_failed_status() {
        let dir = TempDir::new().unwrap();
        let fetcher = ObjectFetcher::new(EmptyStore, dir.path().to_path_buf());

        let result = function_handler(
            invoke(json!({ "s3_objects": ["a.pem"] })),
            &fetcher,
        )
        .await
        .unwrap();

        let response = serde_json::to_value(&result).unwrap();
        assert_eq!(response["status"], "failed");
        assert_eq!(response["error"], "invalid_input");
        assert!(response["message"]
            .as_str()
            .unwrap()
            .contains("missing field `bucket_name`"));
    }

    #[tokio::test]
    async fn test_missing_object_completes_with_failed_status() {
        let dir = TempDir::new().unwrap();
        let fetcher = ObjectFetcher::new(EmptyStore, dir.path().to_path_buf());

        let event = invoke(json!({
            "bucket_name": "certs",
            "s3_objects": ["tls/server.key"],
        }));
        let result = function_handler(event, &fetcher).await.unwrap();

        let response = serde_json::to_value(&result).unwrap();
        assert_eq!(response["status"], "failed");
        assert_eq!(response["error"], "object_not_found");
    }

    #[tokio::test]
    async fn test_success_returns_listing() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("ca.pem"), b"ca").unwrap();
        let fetcher = ObjectFetcher::new(EmptyStore, dir.path().to_path_buf());

        let event = invoke(json!({ "bucket_name": "certs", "s3_objects": [] }));
        let result = function_handler(event, &fetcher).await.unwrap();

        let response = serde_json::to_value(&result).unwrap();
        assert_eq!(response["status"], "succeeded");
        assert_eq!(response["copied"], json!([]));
        assert_eq!(response["listing"], json!(["ca.pem"]));
    }
}

/*!
 * efscopy-run BUCKET KEY...: copies the given S3 objects into the destination
 * directory exactly as the Lambda function would, and prints the result as
 * JSON.
 */

use anyhow::Context;
use efscopy::handle_invocation;
use efscopy::Config;
use efscopy::ObjectFetcher;
use efscopy::S3ObjectStore;
use serde_json::json;
use std::process;

const USAGE_MESSAGE: &str = "\
usage: efscopy-run S3_BUCKET S3_KEY...

Objects are written to $EFSCOPY_DEST_DIR (default /mnt/shared).";

fn usage() -> ! {
    eprintln!("{}", USAGE_MESSAGE);
    process::exit(2);
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    efscopy::init_logging();

    let args = std::env::args().collect::<Vec<String>>();
    if args.len() < 3 {
        usage();
    }

    let config = Config::from_env().with_context(|| "loading configuration")?;
    let store = S3ObjectStore::new(config.region.clone())?;
    let fetcher = ObjectFetcher::new(store, config.dest_dir.clone());

    let event = json!({
        "bucket_name": args[1],
        "s3_objects": &args[2..],
    });
    let result = handle_invocation(&fetcher, &event).await;
    println!(
        "{}",
        serde_json::to_string_pretty(&result)
            .with_context(|| "serializing result")?
    );

    if !result.is_success() {
        process::exit(1);
    }
    Ok(())
}

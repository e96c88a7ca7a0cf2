/*!
 * Runtime configuration, read from the environment at startup.
 */

use rusoto_core::Region;
use std::env;
use std::path::PathBuf;

/** Destination used when `EFSCOPY_DEST_DIR` is not set. */
pub const DEFAULT_DEST_DIR: &str = "/mnt/shared";

pub const ENV_DEST_DIR: &str = "EFSCOPY_DEST_DIR";
pub const ENV_S3_ENDPOINT: &str = "EFSCOPY_S3_ENDPOINT";

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /** Pre-mounted directory that objects are copied into. */
    pub dest_dir: PathBuf,
    pub region: Region,
}

impl Config {
    pub fn from_env() -> Result<Config, anyhow::Error> {
        Config::from_lookup(|name| env::var(name).ok())
    }

    /**
     * Builds the configuration from `lookup`, which maps a variable name to
     * its value.  The region itself comes from rusoto's usual
     * `AWS_DEFAULT_REGION` / `AWS_REGION` handling.
     */
    pub fn from_lookup<F>(lookup: F) -> Result<Config, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let dest_dir = match lookup(ENV_DEST_DIR) {
            Some(dir) if dir.is_empty() => {
                return Err(anyhow!("{} is set but empty", ENV_DEST_DIR));
            }
            Some(dir) => PathBuf::from(dir),
            None => PathBuf::from(DEFAULT_DEST_DIR),
        };

        let region = match lookup(ENV_S3_ENDPOINT) {
            Some(endpoint) if !endpoint.is_empty() => Region::Custom {
                name: Region::default().name().to_owned(),
                endpoint,
            },
            _ => Region::default(),
        };

        Ok(Config { dest_dir, region })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_in(
        vars: &[(&str, &str)],
    ) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_in(&[])).unwrap();
        assert_eq!(config.dest_dir, PathBuf::from("/mnt/shared"));
        match config.region {
            Region::Custom { .. } => panic!("unexpected custom region"),
            _ => (),
        }
    }

    #[test]
    fn test_dest_dir_override() {
        let config =
            Config::from_lookup(lookup_in(&[(ENV_DEST_DIR, "/mnt/efs/certs")]))
                .unwrap();
        assert_eq!(config.dest_dir, PathBuf::from("/mnt/efs/certs"));
    }

    #[test]
    fn test_empty_dest_dir() {
        let error =
            Config::from_lookup(lookup_in(&[(ENV_DEST_DIR, "")])).unwrap_err();
        assert!(error.to_string().contains(ENV_DEST_DIR));
    }

    #[test]
    fn test_custom_endpoint() {
        let config = Config::from_lookup(lookup_in(&[(
            ENV_S3_ENDPOINT,
            "http://localhost:4566",
        )]))
        .unwrap();
        match config.region {
            Region::Custom { endpoint, .. } => {
                assert_eq!(endpoint, "http://localhost:4566")
            }
            other => panic!("expected custom region, found {:?}", other),
        }
    }
}

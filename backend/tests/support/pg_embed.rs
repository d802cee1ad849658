//! Bootstrap of the embedded PostgreSQL cluster shared by repository suites.
//!
//! `pg-embed-setup-unpriv` keeps one cluster per test binary. The first caller
//! pins `PG_PASSWORD` so a data directory reused by a later process still
//! accepts the credentials it was initialised with.

use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use pg_embedded_setup_unpriv::ClusterHandle;

static BOOTSTRAP_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

/// Maximum number of retries for transient download or startup errors.
const MAX_RETRIES: u32 = 3;

/// Base delay between retries; doubles on each attempt.
const RETRY_DELAY_MS: u64 = 500;

const STABLE_PASSWORD: &str = "ticketing_embedded_test";

/// Returns true if the error text points at a transient network problem.
fn is_transient_error(err: &str) -> bool {
    let transient_patterns = [
        "error decoding response body",
        "connection reset",
        "connection refused",
        "timeout",
        "timed out",
        "temporarily unavailable",
        "network unreachable",
        "dns error",
        "failed to lookup",
    ];

    let err_lower = err.to_lowercase();
    transient_patterns
        .iter()
        .any(|pattern| err_lower.contains(pattern))
}

/// Start, or reuse, the cluster for this test binary.
///
/// Retries up to [`MAX_RETRIES`] times when the failure looks transient,
/// since the PostgreSQL binaries are downloaded on first use.
pub fn shared_cluster() -> Result<&'static ClusterHandle, String> {
    let _bootstrap_guard = BOOTSTRAP_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|err| err.into_inner());

    let _password_guard = std::env::var_os("PG_PASSWORD")
        .is_none()
        .then(|| env_lock::lock_env([("PG_PASSWORD", Some(STABLE_PASSWORD))]));

    let mut last_error = String::new();
    for attempt in 0..=MAX_RETRIES {
        match pg_embedded_setup_unpriv::test_support::shared_cluster_handle() {
            Ok(handle) => return Ok(handle),
            Err(err) => {
                last_error = format!("{err:?}");
                if attempt < MAX_RETRIES && is_transient_error(&last_error) {
                    let delay = Duration::from_millis(RETRY_DELAY_MS * (1 << attempt));
                    eprintln!(
                        "pg-embed: transient error on attempt {}/{}, retrying in {delay:?}: {last_error}",
                        attempt + 1,
                        MAX_RETRIES + 1,
                    );
                    std::thread::sleep(delay);
                } else {
                    break;
                }
            }
        }
    }

    Err(last_error)
}

#[cfg(test)]
mod tests {
    //! Classification of bootstrap failures.

    use rstest::rstest;

    #[rstest]
    #[case::reset("Connection reset by peer", true)]
    #[case::dns("dns error: failed to lookup address", true)]
    #[case::permission("permission denied", false)]
    fn transient_errors_are_retried(#[case] message: &str, #[case] expected: bool) {
        assert_eq!(super::is_transient_error(message), expected);
    }
}

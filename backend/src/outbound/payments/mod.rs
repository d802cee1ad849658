//! Mocked payment provider adapters.
//!
//! Neither adapter performs network I/O: charges are fabricated locally with
//! provider-shaped identifiers, and webhook payloads are parsed from the
//! provider's documented JSON shape.

mod paypal;
mod zoop;

pub use paypal::PaypalGateway;
pub use zoop::ZoopGateway;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

const REFERENCE_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const REFERENCE_SUFFIX_LEN: usize = 8;

/// Random lowercase base-36 suffix for provider references.
fn reference_suffix() -> String {
    let mut rng = SmallRng::from_entropy();
    (0..REFERENCE_SUFFIX_LEN)
        .filter_map(|_| REFERENCE_ALPHABET.choose(&mut rng).copied())
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn suffixes_vary_between_calls() {
        let suffixes: std::collections::HashSet<String> =
            (0..16).map(|_| reference_suffix()).collect();
        assert!(suffixes.len() > 1);
        assert!(suffixes.iter().all(|s| s.len() == REFERENCE_SUFFIX_LEN));
    }

    #[rstest]
    fn suffixes_are_short_base36() {
        let suffix = reference_suffix();
        assert_eq!(suffix.len(), REFERENCE_SUFFIX_LEN);
        assert!(
            suffix
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        );
    }
}

//! crates/capture_core/src/slug.rs
//!
//! Derivation of public slugs for shared documents.

use chrono::{DateTime, Utc};

/// Builds a URL-safe slug from the document title, with a millisecond
/// timestamp suffix to disambiguate documents sharing a title. Runs of
/// non-alphanumeric characters collapse to a single hyphen, matching the
/// shape `my-onboarding-process-1718000000000`.
pub fn public_slug(title: &str, now: DateTime<Utc>) -> String {
    let mut base = String::with_capacity(title.len());
    let mut pending_hyphen = false;
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !base.is_empty() {
                base.push('-');
            }
            pending_hyphen = false;
            base.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    if base.is_empty() {
        base.push_str("document");
    }

    format!("{}-{}", base, now.timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn slug_is_lowercase_hyphenated_with_timestamp() {
        let now = Utc.timestamp_millis_opt(1_718_000_000_000).unwrap();
        assert_eq!(
            public_slug("How I Onboard New Customers!", now),
            "how-i-onboard-new-customers-1718000000000"
        );
    }

    #[test]
    fn punctuation_runs_collapse_to_one_hyphen() {
        let now = Utc.timestamp_millis_opt(7).unwrap();
        assert_eq!(public_slug("a  --  b", now), "a-b-7");
    }

    #[test]
    fn empty_title_falls_back_to_generic_slug() {
        let now = Utc.timestamp_millis_opt(7).unwrap();
        assert_eq!(public_slug("???", now), "document-7");
    }
}

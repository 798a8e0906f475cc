//! Merging entries into existing `.netrc` content.
//!
//! Both operations are pure functions from the current file text to the new
//! file text. Content this crate did not write (other hosts, key entries,
//! comments, odd formatting) is carried through byte-for-byte.

use arnetrc_auth::KeySource;

use crate::codec::{self, Entry};
use crate::error::Result;
use crate::host::{HostPattern, Location};

/// Result of [`add_configs`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddOutcome {
    /// The new file content.
    pub netrc: String,
    /// Hosts that were appended, in order.
    pub added: Vec<String>,
    /// Hosts that already had an entry and were left alone, in order.
    pub skipped: Vec<String>,
}

impl AddOutcome {
    /// Whether the content differs from the input.
    pub fn changed(&self) -> bool {
        !self.added.is_empty()
    }
}

/// Replace the password of every Artifact Registry token entry with `token`.
///
/// Key entries and entries for other hosts are untouched. Text without any
/// token entry comes back unchanged.
pub fn refresh(netrc: &str, token: &str) -> String {
    let matches = codec::find_token_entries(netrc);
    if matches.is_empty() {
        return netrc.to_string();
    }

    let mut out = String::with_capacity(netrc.len() + matches.len() * token.len());
    let mut copied = 0;
    for m in &matches {
        tracing::debug!(host = m.host, "refreshing token entry");
        out.push_str(&netrc[copied..m.secret_range.start]);
        out.push_str(token);
        copied = m.secret_range.end;
    }
    out.push_str(&netrc[copied..]);

    tracing::info!(entries = matches.len(), "refreshed access tokens");
    out
}

/// Append an entry for every location that does not have one yet.
///
/// Locations are handled in order. A location whose host already appears as
/// a `machine <host>` line is skipped with a warning; the check runs against
/// the growing text, so repeats within `locations` are skipped too.
///
/// With no `key`, new entries are token placeholders to be filled in by
/// [`refresh`]. With a `key`, new entries carry the encoded key; the key is
/// resolved once, the first time it is needed. A key failure fails the whole
/// call and no partial text is returned.
pub fn add_configs(
    netrc: &str,
    locations: &[Location],
    pattern: &HostPattern,
    key: Option<&dyn KeySource>,
) -> Result<AddOutcome> {
    let mut out = netrc.to_string();
    let mut encoded_key: Option<String> = None;
    let mut added = Vec::new();
    let mut skipped = Vec::new();

    for location in locations {
        let host = pattern.host_for(location);

        if codec::contains_machine(&out, &host) {
            tracing::warn!(host = %host, "machine is already in the .netrc file, skipping");
            skipped.push(host);
            continue;
        }

        let entry = match key {
            None => Entry::token_placeholder(host.as_str()),
            Some(source) => {
                if encoded_key.is_none() {
                    encoded_key = Some(source.encoded_key()?);
                }
                let encoded = encoded_key.as_deref().unwrap_or_default();
                Entry::json_key(host.as_str(), encoded)
            }
        };

        out.push_str(separator(&out));
        out.push_str(&entry.render());

        tracing::debug!(host = %host, login = %entry.login, "appended entry");
        added.push(host);
    }

    Ok(AddOutcome {
        netrc: out,
        added,
        skipped,
    })
}

/// What to put between existing text and a new stanza so that exactly one
/// blank line separates them. Whitespace-only text counts as empty, so the
/// stanza only needs to start on a fresh line.
fn separator(text: &str) -> &'static str {
    let blank = text.trim().is_empty();
    let on_new_line = text.is_empty() || text.ends_with('\n');
    if on_new_line && (blank || text.ends_with("\n\n") || text.ends_with("\n\r\n")) {
        ""
    } else if on_new_line || blank {
        "\n"
    } else {
        "\n\n"
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use arnetrc_auth::{AuthError, StaticKey};

    use super::*;
    use crate::error::NetrcError;

    const KEY_B64: &str = "ewogICAgInRlc3Qta2V5IjogInRlc3QtdmFsdWUiCn0=";

    fn locations(names: &[&str]) -> Vec<Location> {
        names.iter().map(|n| Location::parse(n).unwrap()).collect()
    }

    fn add(netrc: &str, names: &[&str]) -> AddOutcome {
        add_configs(netrc, &locations(names), &HostPattern::default(), None).unwrap()
    }

    /// Counts how often the key was requested.
    struct CountingKey(Cell<usize>);

    impl KeySource for CountingKey {
        fn encoded_key(&self) -> arnetrc_auth::Result<String> {
            self.0.set(self.0.get() + 1);
            Ok(KEY_B64.to_string())
        }
    }

    struct BrokenKey;

    impl KeySource for BrokenKey {
        fn encoded_key(&self) -> arnetrc_auth::Result<String> {
            Err(AuthError::KeyFileUnreadable {
                path: "testdata/not-a-key.json".into(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            })
        }
    }

    // -- add_configs --------------------------------------------------------

    #[test]
    fn add_the_first_location() {
        let outcome = add("", &["us-west1"]);
        assert_eq!(
            outcome.netrc,
            "machine us-west1-go.pkg.dev\nlogin oauth2accesstoken\npassword <oauth2accesstoken>\n"
        );
        assert_eq!(outcome.added, vec!["us-west1-go.pkg.dev"]);
        assert!(outcome.skipped.is_empty());
    }

    #[test]
    fn add_the_first_location_with_host_pattern() {
        let pattern = HostPattern::parse("%s-different-go.pkg.dev").unwrap();
        let outcome = add_configs("", &locations(&["us-west1"]), &pattern, None).unwrap();
        assert_eq!(
            outcome.netrc,
            "machine us-west1-different-go.pkg.dev\n\
             login oauth2accesstoken\n\
             password <oauth2accesstoken>\n"
        );
    }

    #[test]
    fn add_the_first_location_with_json_key() {
        let key = StaticKey(KEY_B64.to_string());
        let outcome = add_configs(
            "",
            &locations(&["us-west1"]),
            &HostPattern::default(),
            Some(&key),
        )
        .unwrap();
        assert_eq!(
            outcome.netrc,
            format!("machine us-west1-go.pkg.dev\nlogin _json_key_base64\npassword {KEY_B64}\n")
        );
    }

    #[test]
    fn whitespace_only_file_gets_no_extra_blank_lines() {
        let outcome = add("\n", &["us-west1"]);
        assert_eq!(
            outcome.netrc,
            "\nmachine us-west1-go.pkg.dev\nlogin oauth2accesstoken\npassword <oauth2accesstoken>\n"
        );

        let outcome = add(" \t", &["us-west1"]);
        assert!(outcome.netrc.starts_with(" \t\nmachine us-west1-go.pkg.dev\n"));
    }

    #[test]
    fn add_two_locations_in_order() {
        let outcome = add("", &["us-west1", "europe-east1"]);
        assert_eq!(
            outcome.netrc,
            "machine us-west1-go.pkg.dev
login oauth2accesstoken
password <oauth2accesstoken>

machine europe-east1-go.pkg.dev
login oauth2accesstoken
password <oauth2accesstoken>
"
        );
    }

    #[test]
    fn add_locations_to_existing_config() {
        let existing = "machine asia-south1-go.pkg.dev
login oauth2accesstoken
password <oauth2accesstoken
";
        let outcome = add(existing, &["us-west1", "europe-east1"]);
        assert_eq!(
            outcome.netrc,
            "machine asia-south1-go.pkg.dev
login oauth2accesstoken
password <oauth2accesstoken

machine us-west1-go.pkg.dev
login oauth2accesstoken
password <oauth2accesstoken>

machine europe-east1-go.pkg.dev
login oauth2accesstoken
password <oauth2accesstoken>
"
        );
    }

    #[test]
    fn skip_existing_configs() {
        let existing = "machine us-west1-go.pkg.dev
login oauth2accesstoken
password <oauth2accesstoken
";
        let outcome = add(existing, &["us-west1", "europe-east1"]);
        assert_eq!(
            outcome.netrc,
            "machine us-west1-go.pkg.dev
login oauth2accesstoken
password <oauth2accesstoken

machine europe-east1-go.pkg.dev
login oauth2accesstoken
password <oauth2accesstoken>
"
        );
        assert_eq!(outcome.skipped, vec!["us-west1-go.pkg.dev"]);
        assert_eq!(outcome.added, vec!["europe-east1-go.pkg.dev"]);
    }

    #[test]
    fn existing_key_entry_blocks_token_entry() {
        let existing =
            format!("machine us-west1-go.pkg.dev\nlogin _json_key_base64\npassword {KEY_B64}\n");
        let outcome = add(&existing, &["us-west1"]);
        assert_eq!(outcome.netrc, existing);
        assert!(!outcome.changed());
    }

    #[test]
    fn adding_twice_is_idempotent() {
        let first = add("", &["us-west1"]);
        let second = add(&first.netrc, &["us-west1"]);
        assert_eq!(second.netrc, first.netrc);
        assert!(!second.changed());
    }

    #[test]
    fn repeated_location_in_one_call_is_added_once() {
        let outcome = add("", &["us-west1", "us-west1"]);
        assert_eq!(outcome.added.len(), 1);
        assert_eq!(outcome.skipped, vec!["us-west1-go.pkg.dev"]);
    }

    #[test]
    fn host_that_is_a_substring_is_not_a_duplicate() {
        let existing =
            "machine another-env-us-west1-go.pkg.dev\nlogin oauth2accesstoken\npassword x\n";
        let outcome = add(existing, &["us-west1"]);
        assert_eq!(outcome.added, vec!["us-west1-go.pkg.dev"]);
    }

    #[test]
    fn existing_content_without_trailing_newline_gets_a_blank_line() {
        let existing = "machine example.com\nlogin me\npassword secret";
        let outcome = add(existing, &["us-west1"]);
        assert_eq!(
            outcome.netrc,
            "machine example.com\nlogin me\npassword secret\n\n\
             machine us-west1-go.pkg.dev\nlogin oauth2accesstoken\npassword <oauth2accesstoken>\n"
        );
    }

    #[test]
    fn existing_blank_line_is_not_doubled() {
        let existing = "machine example.com\nlogin me\npassword secret\n\n";
        let outcome = add(existing, &["us-west1"]);
        assert!(
            outcome
                .netrc
                .starts_with("machine example.com\nlogin me\npassword secret\n\nmachine us-west1")
        );
        assert!(!outcome.netrc.contains("\n\n\n"));
    }

    #[test]
    fn json_key_is_resolved_once() {
        let key = CountingKey(Cell::new(0));
        let outcome = add_configs(
            "",
            &locations(&["us-west1", "europe-east1", "asia-south1"]),
            &HostPattern::default(),
            Some(&key),
        )
        .unwrap();
        assert_eq!(outcome.added.len(), 3);
        assert_eq!(key.0.get(), 1);
    }

    #[test]
    fn json_key_is_not_read_when_everything_is_skipped() {
        let existing = add("", &["us-west1"]).netrc;
        let key = CountingKey(Cell::new(0));
        add_configs(
            &existing,
            &locations(&["us-west1"]),
            &HostPattern::default(),
            Some(&key),
        )
        .unwrap();
        assert_eq!(key.0.get(), 0);
    }

    #[test]
    fn json_key_failure_fails_the_whole_call() {
        let err = add_configs(
            "",
            &locations(&["us-west1"]),
            &HostPattern::default(),
            Some(&BrokenKey),
        )
        .unwrap_err();

        match err {
            NetrcError::Key(AuthError::KeyFileUnreadable { source, .. }) => {
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    // -- refresh ------------------------------------------------------------

    #[test]
    fn replace_placeholder() {
        let netrc =
            "machine us-west1-go.pkg.dev\nlogin oauth2accesstoken\npassword <oauth2accesstoken>";
        assert_eq!(
            refresh(netrc, "a-token"),
            "machine us-west1-go.pkg.dev\nlogin oauth2accesstoken\npassword a-token"
        );
    }

    #[test]
    fn replace_old_token() {
        let netrc = "machine us-west1-go.pkg.dev\nlogin oauth2accesstoken\npassword old-token";
        assert_eq!(
            refresh(netrc, "new-token"),
            "machine us-west1-go.pkg.dev\nlogin oauth2accesstoken\npassword new-token"
        );
    }

    #[test]
    fn replace_all_ending_in_go_pkg_dev() {
        let netrc = "machine another-env-us-west1-go.pkg.dev\n\
                     login oauth2accesstoken\n\
                     password <oauth2accesstoken>";
        assert_eq!(
            refresh(netrc, "a-token"),
            "machine another-env-us-west1-go.pkg.dev\nlogin oauth2accesstoken\npassword a-token"
        );
    }

    #[test]
    fn keep_json_key_entry_unchanged() {
        let netrc =
            format!("machine us-west1-go.pkg.dev\nlogin _json_key_base64\npassword {KEY_B64}");
        assert_eq!(refresh(&netrc, "a-token"), netrc);
    }

    #[test]
    fn keep_non_go_pkg_dev_unchanged() {
        let netrc = "machine example.com\nlogin oauth2accesstoken\npassword <oauth2accesstoken>";
        assert_eq!(refresh(netrc, "a-token"), netrc);
    }

    #[test]
    fn refresh_without_entries_is_identity() {
        assert_eq!(refresh("", "a-token"), "");
        let netrc = "default login anonymous password me@example.com\n";
        assert_eq!(refresh(netrc, "a-token"), netrc);
    }

    #[test]
    fn refresh_is_idempotent_for_the_same_token() {
        let netrc = add("", &["us-west1", "europe-east1"]).netrc;
        let once = refresh(&netrc, "tok");
        assert_eq!(refresh(&once, "tok"), once);
    }

    #[test]
    fn refresh_keeps_crlf_line_endings() {
        let netrc = "machine us-west1-go.pkg.dev\r\nlogin oauth2accesstoken\r\npassword old\r\n";
        assert_eq!(
            refresh(netrc, "new"),
            "machine us-west1-go.pkg.dev\r\nlogin oauth2accesstoken\r\npassword new\r\n"
        );
    }

    #[test]
    fn put_everything_together() {
        let netrc = format!(
            "machine us-west1-go.pkg.dev
login oauth2accesstoken
password <oauth2accesstoken>

machine us-west1-go.pkg.dev
login oauth2accesstoken
password old-token

machine another-env-us-west1-go.pkg.dev
login oauth2accesstoken
password <oauth2accesstoken>

machine us-west1-go.pkg.dev
login _json_key_base64
password {KEY_B64}

machine example.com
login oauth2accesstoken
password <oauth2accesstoken>"
        );
        let want = format!(
            "machine us-west1-go.pkg.dev
login oauth2accesstoken
password a-token

machine us-west1-go.pkg.dev
login oauth2accesstoken
password a-token

machine another-env-us-west1-go.pkg.dev
login oauth2accesstoken
password a-token

machine us-west1-go.pkg.dev
login _json_key_base64
password {KEY_B64}

machine example.com
login oauth2accesstoken
password <oauth2accesstoken>"
        );
        assert_eq!(refresh(&netrc, "a-token"), want);
    }
}

//! Textual form of `.netrc` entries.
//!
//! An entry is a three-line stanza:
//!
//! ```text
//! machine us-west1-go.pkg.dev
//! login oauth2accesstoken
//! password <oauth2accesstoken>
//! ```
//!
//! Rendering produces exactly that shape. Discovery works on arbitrary file
//! text: it walks the lines and recognizes token stanzas for hosts under
//! [`SERVICE_DOMAIN_SUFFIX`], reporting where each secret sits so callers can
//! rewrite it without touching any other byte.

use std::fmt;
use std::ops::Range;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Every Artifact Registry Go endpoint ends in this suffix.
pub const SERVICE_DOMAIN_SUFFIX: &str = "go.pkg.dev";

/// Password written for token entries before the first refresh.
pub const TOKEN_PLACEHOLDER: &str = "<oauth2accesstoken>";

const MACHINE_PREFIX: &str = "machine ";
const LOGIN_PREFIX: &str = "login ";
const PASSWORD_PREFIX: &str = "password ";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// The login name of an entry, which decides how its password is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Login {
    /// Password is an OAuth access token (or the placeholder).
    AccessToken,
    /// Password is a base64-encoded service account key.
    JsonKey,
}

impl Login {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AccessToken => "oauth2accesstoken",
            Self::JsonKey => "_json_key_base64",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "oauth2accesstoken" => Some(Self::AccessToken),
            "_json_key_base64" => Some(Self::JsonKey),
            _ => None,
        }
    }
}

impl fmt::Display for Login {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `machine`/`login`/`password` stanza.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub host: String,
    pub login: Login,
    pub secret: String,
}

impl Entry {
    /// A token entry whose password will be filled in by a refresh.
    pub fn token_placeholder(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            login: Login::AccessToken,
            secret: TOKEN_PLACEHOLDER.to_string(),
        }
    }

    /// A token entry carrying a live access token.
    pub fn access_token(host: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            login: Login::AccessToken,
            secret: token.into(),
        }
    }

    /// A key entry carrying a base64-encoded service account key.
    pub fn json_key(host: impl Into<String>, encoded_key: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            login: Login::JsonKey,
            secret: encoded_key.into(),
        }
    }

    /// Render the stanza, newline-terminated.
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// The HTTP `Authorization` value equivalent to this entry.
    pub fn basic_auth_header(&self) -> String {
        let credentials = format!("{}:{}", self.login, self.secret);
        format!("Basic {}", STANDARD.encode(credentials))
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{MACHINE_PREFIX}{}", self.host)?;
        writeln!(f, "{LOGIN_PREFIX}{}", self.login)?;
        writeln!(f, "{PASSWORD_PREFIX}{}", self.secret)
    }
}

/// A token stanza found in file text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenEntryMatch<'a> {
    pub host: &'a str,
    pub secret: &'a str,
    /// Byte range of `secret` within the scanned text.
    pub secret_range: Range<usize>,
}

// ---------------------------------------------------------------------------
// Discovery
// ---------------------------------------------------------------------------

/// A line of text without its terminator, plus where it starts.
struct Line<'a> {
    start: usize,
    content: &'a str,
}

fn split_lines(text: &str) -> Vec<Line<'_>> {
    let mut offset = 0;
    text.split_inclusive('\n')
        .map(|raw| {
            let start = offset;
            offset += raw.len();
            let content = raw.strip_suffix('\n').unwrap_or(raw);
            let content = content.strip_suffix('\r').unwrap_or(content);
            Line { start, content }
        })
        .collect()
}

/// Find every token stanza whose host ends in [`SERVICE_DOMAIN_SUFFIX`].
///
/// Stanzas are matched in file order and never overlap. Key entries and
/// token entries for other hosts are not reported.
pub fn find_token_entries(text: &str) -> Vec<TokenEntryMatch<'_>> {
    let lines = split_lines(text);
    let mut found = Vec::new();

    let mut i = 0;
    while i + 2 < lines.len() {
        match token_stanza_at(&lines[i..i + 3]) {
            Some(m) => {
                found.push(m);
                i += 3;
            }
            None => i += 1,
        }
    }

    found
}

fn token_stanza_at<'a>(lines: &[Line<'a>]) -> Option<TokenEntryMatch<'a>> {
    let [machine, login, password] = lines else {
        return None;
    };

    let host = machine.content.strip_prefix(MACHINE_PREFIX)?;
    if !host.ends_with(SERVICE_DOMAIN_SUFFIX) {
        return None;
    }

    let login_name = login.content.strip_prefix(LOGIN_PREFIX)?;
    if Login::parse(login_name) != Some(Login::AccessToken) {
        return None;
    }

    let secret = password.content.strip_prefix(PASSWORD_PREFIX)?;
    let start = password.start + PASSWORD_PREFIX.len();

    Some(TokenEntryMatch {
        host,
        secret,
        secret_range: start..start + secret.len(),
    })
}

/// Whether some line of `text` is exactly `machine <host>`.
///
/// Trailing whitespace and line terminators are ignored; nothing else is.
pub fn contains_machine(text: &str, host: &str) -> bool {
    text.lines()
        .any(|line| line.trim_end().strip_prefix(MACHINE_PREFIX) == Some(host))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

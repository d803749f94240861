//! URL handling for the URL, Host and Domain families of directives.
//!
//! The URL directive comes in three documented shapes:
//!
//! ```text
//! URL http://www.somedb.com                                        (version 1)
//! URL -Redirect -Append -Encoded otherdb http://www.otherdb.com/?q= (version 2)
//! URL -Form=post -RewriteHost somedb http://www.somedb.com/login   (version 3)
//! ```
//!
//! In each case the starting point URL is the last token.

use once_cell::sync::Lazy;
use regex::Regex;
use url::{ParseError, Url};

static URL_V1: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^U(RL)?\s+(\S+)$").expect("valid URL v1 pattern"));

static URL_V2: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^U(RL)?\s+(-Refresh )?\s*(-Redirect )?\s*(-Append -Encoded )?\s*(\S+)\s+(\S+)$",
    )
    .expect("valid URL v2 pattern")
});

static URL_V3: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^U(RL)?\s+(-Form)=([A-Za-z]+ )\s*(-RewriteHost )?\s*(\S+)\s+(\S+)$")
        .expect("valid URL v3 pattern")
});

/// Extract the starting point URL from a URL directive line, trying each
/// documented shape in turn. Returns `None` if the line fits none of them.
pub fn find_url_from_line(line: &str) -> Option<&str> {
    [&*URL_V1, &*URL_V2, &*URL_V3].iter().find_map(|re| {
        re.captures(line)
            .and_then(|caps| caps.iter().last().flatten())
            .map(|m| m.as_str())
    })
}

/// Scheme, host and (non-default) port of a URL.
pub fn origin(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{}://{}:{}", url.scheme(), host, port),
        None => format!("{}://{}", url.scheme(), host),
    }
}

fn has_host(url: &Url) -> bool {
    url.host_str().is_some_and(|h| !h.is_empty())
}

/// Parse a starting point URL.
///
/// `Ok(None)` means the value parsed but has no host, which is how a value
/// without an `http://` or `https://` prefix shows up.
pub fn parse_starting_point(value: &str) -> Result<Option<Url>, ParseError> {
    match Url::parse(value) {
        Ok(url) if has_host(&url) => Ok(Some(url)),
        Ok(_) => Ok(None),
        Err(ParseError::RelativeUrlWithoutBase) | Err(ParseError::EmptyHost) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Parse the value of a Host or HostJavaScript directive. A bare hostname is
/// allowed and means `http://`.
pub fn parse_host_value(value: &str) -> Result<Url, ParseError> {
    match Url::parse(value) {
        Ok(url) if has_host(&url) => return Ok(url),
        Ok(_) | Err(ParseError::RelativeUrlWithoutBase) => {}
        Err(e) => return Err(e),
    }
    let url = Url::parse(&format!("http://{}", value))?;
    if has_host(&url) {
        Ok(url)
    } else {
        Err(ParseError::EmptyHost)
    }
}

/// Whether a Domain or DomainJavaScript value names only a domain: no scheme
/// and no path.
pub fn is_bare_domain(value: &str) -> Result<bool, ParseError> {
    match Url::parse(value) {
        // Anything that parses on its own has a scheme.
        Ok(_) => Ok(false),
        Err(ParseError::RelativeUrlWithoutBase) => {
            let path = value.split(['?', '#']).next().unwrap_or_default();
            Ok(!path.contains('/'))
        }
        Err(e) => Err(e),
    }
}

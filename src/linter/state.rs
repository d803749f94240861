//! Per-stanza state carried between lines.

use std::collections::BTreeMap;

use regex::Regex;
use serde::{Serialize, Serializer};

use super::directive::Directive;

/// Everything the processor remembers about the stanza it is inside.
///
/// A stanza boundary replaces the whole value with `StanzaState::default()`,
/// so nothing here outlives its stanza.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StanzaState {
    pub title: String,
    #[serde(rename = "URL")]
    pub url: String,
    /// Origin of the URL directive, added to the run's origin map when the
    /// stanza closes.
    #[serde(rename = "URLOrigin")]
    pub url_origin: String,
    #[serde(rename = "URLAt")]
    pub url_at: String,
    #[serde(rename = "PreviousDirective")]
    pub previous: Directive,
    #[serde(rename = "PreviousLabel")]
    pub label: String,
    pub open_options: Vec<Directive>,
    #[serde(rename = "AnonymousURLNeedsClosing")]
    pub anonymous_url_open: bool,
    #[serde(rename = "AddUserHeaderNeedsClosing")]
    pub add_user_header_open: bool,
    /// Set by a Description line; a Title followed only by Descriptions is a
    /// menu separator and needs no URL.
    pub is_separator: bool,
    pub in_multiline: bool,
    #[serde(rename = "PreviousMultilineSegments")]
    pub pending_segments: String,
    pub source: String,
    #[serde(rename = "OCLCTitle")]
    pub oclc_title: String,
    #[serde(rename = "ProxyHostnameEditPatterns", serialize_with = "pattern_sources")]
    pub proxy_hostname_edit_patterns: Vec<(String, Regex)>,
    /// Host/HostJavaScript origins seen in this stanza and where.
    pub stanza_origins: BTreeMap<String, String>,
}

fn pattern_sources<S: Serializer>(
    patterns: &[(String, Regex)],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_map(patterns.iter().map(|(find, re)| (find, re.as_str())))
}

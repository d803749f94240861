//! Line-at-a-time stanza state machine.
//!
//! [`StanzaProcessor::process_line`] is called once per physical line, in
//! file order. Each call may update the current [`StanzaState`] and the
//! run-wide memory of titles and origins, and returns the diagnostics for
//! that line. A blank line (or a bare `#`) closes the stanza and returns the
//! diagnostics that can only be judged for a whole stanza.
//!
//! Ordering checks compare the directive on the current line against the
//! previous directive of the stanza. A violation is reported but never stops
//! the state from advancing.

use std::collections::HashMap;

use regex::Regex;

use super::diagnostic::{Code, Diagnostic};
use super::directive::{self, Directive, LabelMatch};
use super::state::StanzaState;
use super::url_format;
use crate::config::LintConfig;
use crate::source::{self, OclcClient, SourceError, TitleLookup, SOURCE_PREFIX};

/// The state of a file interrupted by an IncludeFile, restored once the
/// included file is done.
#[derive(Debug)]
pub struct SuspendedFile {
    state: StanzaState,
    last_line_empty: bool,
}

/// Stanza state machine with run-wide duplicate tracking.
///
/// One processor serves one lint run, including every file reached through
/// IncludeFile. It is not meant to be shared between concurrent runs.
pub struct StanzaProcessor {
    config: LintConfig,
    state: StanzaState,
    last_line_empty: bool,
    current: Option<Directive>,
    previous_titles: HashMap<String, String>,
    previous_origins: HashMap<String, String>,
    title_lookup: Option<Box<dyn TitleLookup>>,
}

impl StanzaProcessor {
    pub fn new(config: LintConfig) -> Self {
        Self {
            config,
            state: StanzaState::default(),
            last_line_empty: false,
            current: None,
            previous_titles: HashMap::new(),
            previous_origins: HashMap::new(),
            title_lookup: None,
        }
    }

    /// Use `lookup` instead of the OCLC website for Source comments.
    pub fn with_title_lookup(mut self, lookup: Box<dyn TitleLookup>) -> Self {
        self.title_lookup = Some(lookup);
        self
    }

    pub fn config(&self) -> &LintConfig {
        &self.config
    }

    pub fn state(&self) -> &StanzaState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut StanzaState {
        &mut self.state
    }

    /// Whether the most recent line closed a stanza.
    pub fn last_line_empty(&self) -> bool {
        self.last_line_empty
    }

    /// The directive the most recent line was classified as, if any.
    pub fn current_directive(&self) -> Option<Directive> {
        self.current
    }

    /// Set aside the current file's stanza and start fresh for a new file.
    pub fn suspend_file(&mut self) -> SuspendedFile {
        SuspendedFile {
            state: std::mem::take(&mut self.state),
            last_line_empty: std::mem::replace(&mut self.last_line_empty, false),
        }
    }

    /// Return to a file set aside by [`suspend_file`](Self::suspend_file).
    pub fn resume_file(&mut self, suspended: SuspendedFile) {
        self.state = suspended.state;
        self.last_line_empty = suspended.last_line_empty;
    }

    /// Process one physical line found at `at` (usually `path:line`).
    pub fn process_line(&mut self, line: &str, at: &str) -> Vec<Diagnostic> {
        let mut m = Vec::new();
        self.current = None;

        if self.config.whitespace && ends_in_space_or_tab(line) {
            m.push(Diagnostic::new(
                Code::TrailingWhitespace,
                "Line ends in a space or tab character",
            ));
        }

        let line = line.trim();

        // An empty line or an empty comment ends the stanza.
        if line.is_empty() || line == "#" {
            m.extend(self.close_stanza());
            return m;
        }
        self.last_line_empty = false;

        if line.starts_with('#') {
            if self.config.source && line.starts_with(SOURCE_PREFIX) {
                if let Err(e) = self.process_source_line(line) {
                    tracing::warn!("Source check failed at {}: {}", at, e);
                    m.push(Diagnostic::new(
                        Code::SourceLineError,
                        format!("Error processing Source line: {}", e),
                    ));
                }
            }
            return m;
        }

        let joined: String;
        let line = if let Some(segment) = line.strip_suffix('\\') {
            self.state.pending_segments.push_str(segment);
            self.state.in_multiline = true;
            return m;
        } else if self.state.in_multiline {
            joined = std::mem::take(&mut self.state.pending_segments) + line;
            self.state.in_multiline = false;
            joined.as_str()
        } else {
            line
        };

        self.state.is_separator = false;

        let tokens: Vec<&str> = line.split(' ').collect();
        let mut label = tokens[0];

        // Option directives are named by two words.
        if label == "Option" {
            if tokens.len() != 2 {
                m.push(Diagnostic::new(
                    Code::MalformedOption,
                    "Option directive not in the form \"Option OPTIONNAME\"",
                ));
                return m;
            }
            label = line;
        }

        let directive = match directive::lookup(label) {
            Some(LabelMatch::Exact(d)) => d,
            Some(LabelMatch::WrongCase(d)) => {
                if self.config.directive_case {
                    m.push(Diagnostic::new(
                        Code::WrongCase,
                        format!(
                            "{:?} directive does not have the right letter casing. It should be replaced by {:?}",
                            label,
                            d.label()
                        ),
                    ));
                }
                d
            }
            None => {
                m.push(Diagnostic::new(
                    Code::UnknownDirective,
                    format!("Unknown directive {:?}", label),
                ));
                return m;
            }
        };
        self.current = Some(directive);
        self.state.label = label.to_string();

        // Checked here so no other directive needs to know about Find.
        if self.state.previous == Directive::Find && directive != Directive::Replace {
            m.push(Diagnostic::new(
                Code::FindWithoutReplace,
                "\"Find\" directive must be immediately followed by a \"Replace\" directive",
            ));
        }

        // An Option Cookie before the Title that closes nothing sets
        // stanza-wide cookie handling.
        if directive == Directive::OptionCookie
            && self.state.title.is_empty()
            && !self
                .state
                .open_options
                .iter()
                .any(|o| o.required_closer() == Some(Directive::OptionCookie))
        {
            self.state.previous = Directive::OptionCookie;
            return m;
        }

        if directive.is_option_opener() {
            m.extend(self.process_option_opener(directive));
        } else if directive.is_option_closer() {
            m.extend(self.process_option_closer(directive));
        }

        match directive {
            Directive::ProxyHostnameEdit => m.extend(self.process_proxy_hostname_edit(line)),
            Directive::AddUserHeader => m.extend(self.process_add_user_header(line)),
            Directive::AnonymousURL => m.extend(self.process_anonymous_url(line)),
            Directive::Title => m.extend(self.process_title(line, at)),
            Directive::Description => m.extend(self.process_description()),
            Directive::URL => m.extend(self.process_url(line, at)),
            Directive::Host | Directive::HostJavaScript => {
                m.extend(self.process_host(line, at))
            }
            Directive::Domain | Directive::DomainJavaScript => {
                m.extend(self.process_domain(line))
            }
            _ => {}
        }

        self.state.previous = directive;
        m
    }

    fn close_stanza(&mut self) -> Vec<Diagnostic> {
        let mut m = Vec::new();
        let state = std::mem::take(&mut self.state);
        self.last_line_empty = true;

        if !state.title.is_empty() && state.url.is_empty() && !state.is_separator {
            m.push(Diagnostic::new(
                Code::TitleWithoutUrl,
                format!("Stanza {:?} has Title but no URL", state.title),
            ));
        }
        if state.add_user_header_open {
            m.push(Diagnostic::new(
                Code::UnclosedAddUserHeader,
                format!(
                    "Stanza {:?} uses AddUserHeader but doesn't have a corresponding \"AddUserHeader\" line at the end of the stanza",
                    state.title
                ),
            ));
        }
        if state.anonymous_url_open {
            m.push(Diagnostic::new(
                Code::UnclosedAnonymousUrl,
                format!(
                    "Stanza {:?} has AnonymousURL but doesn't have a corresponding \"AnonymousURL -*\" line at the end of the stanza",
                    state.title
                ),
            ));
        }
        for option in &state.open_options {
            let closer = option.required_closer().unwrap_or_default();
            m.push(Diagnostic::new(
                Code::UnclosedOption,
                format!(
                    "Stanza {:?} has {:?} but doesn't have a corresponding {:?} line at the end of the stanza",
                    state.title,
                    option.label(),
                    closer.label()
                ),
            ));
        }

        // Origins only count against other stanzas once their own stanza is done.
        if !state.url_origin.is_empty() {
            self.previous_origins
                .entry(state.url_origin)
                .or_insert(state.url_at);
        }
        for (origin, at) in state.stanza_origins {
            self.previous_origins.entry(origin).or_insert(at);
        }

        m
    }

    fn process_source_line(&mut self, line: &str) -> Result<(), SourceError> {
        let url = source::parse_source_line(line)?;
        let lookup: Box<dyn TitleLookup> = match self.title_lookup.take() {
            Some(lookup) => lookup,
            None => Box::new(OclcClient::new()?),
        };
        let title = lookup.expected_title(&url);
        self.title_lookup = Some(lookup);
        let title = title?;
        self.state.source = url.to_string();
        self.state.oclc_title = title.unwrap_or_default();
        Ok(())
    }

    fn out_of_order(&self, directive: &str, code: Code) -> Diagnostic {
        Diagnostic::new(
            code,
            format!(
                "{:?} directive is out of order, previous directive: {:?}",
                directive,
                self.state.previous.label()
            ),
        )
    }

    /// Whether the previous directive may come right before something that
    /// opens a section of the stanza (an opener option, AnonymousURL,
    /// AddUserHeader or ProxyHostnameEdit).
    fn previous_starts_section(&self) -> bool {
        let previous = self.state.previous;
        previous.is_db_var()
            || previous.is_option_opener()
            || matches!(
                previous,
                Directive::Undefined
                    | Directive::Group
                    | Directive::HTTPMethod
                    | Directive::AddUserHeader
                    | Directive::AnonymousURL
            )
    }

    /// Whether the previous directive may come right before something that
    /// closes a section of the stanza.
    fn previous_ends_section(&self) -> bool {
        let previous = self.state.previous;
        previous.is_option_closer()
            || matches!(
                previous,
                Directive::URL
                    | Directive::Host
                    | Directive::HostJavaScript
                    | Directive::Domain
                    | Directive::DomainJavaScript
                    | Directive::Replace
                    | Directive::NeverProxy
            )
    }

    fn process_option_opener(&mut self, directive: Directive) -> Vec<Diagnostic> {
        let mut m = Vec::new();
        if !(self.previous_starts_section() || self.state.previous == Directive::OptionCookie) {
            m.push(self.out_of_order(directive.label(), Code::OptionOpenerOutOfOrder));
        }
        self.state.open_options.push(directive);
        m
    }

    fn process_option_closer(&mut self, directive: Directive) -> Vec<Diagnostic> {
        let mut m = Vec::new();
        let previous = self.state.previous;
        let allowed = self.previous_ends_section()
            || previous.is_db_var()
            || matches!(previous, Directive::AddUserHeader | Directive::AnonymousURL);
        if !allowed {
            m.push(self.out_of_order(directive.label(), Code::OptionCloserOutOfOrder));
        }
        self.state
            .open_options
            .retain(|o| o.required_closer() != Some(directive));
        m
    }

    /// ProxyHostnameEdit find and replace pairs, deepest domain first:
    ///
    /// ```text
    /// ProxyHostnameEdit www.somedb.com$ www-somedb-com
    /// ProxyHostnameEdit somedb.com$ somedb-com
    /// ```
    fn process_proxy_hostname_edit(&mut self, line: &str) -> Vec<Diagnostic> {
        let mut m = Vec::new();
        let previous = self.state.previous;
        if !(self.previous_starts_section()
            || matches!(
                previous,
                Directive::Cookie | Directive::OptionCookie | Directive::ProxyHostnameEdit
            ))
        {
            m.push(self.out_of_order("ProxyHostnameEdit", Code::ProxyHostnameEditOutOfOrder));
        }

        let payload = trim_label(line, &self.state.label);
        let pair: Vec<&str> = payload.split_whitespace().collect();
        let &[find, replace] = &pair[..] else {
            m.push(Diagnostic::new(
                Code::ProxyHostnameEditPair,
                "\"ProxyHostnameEdit\" directive must have both a find and replace qualifier",
            ));
            return m;
        };

        if !self.config.additional_phe_checks {
            return m;
        }

        let find = match find.strip_suffix('$') {
            Some(stripped) => stripped,
            None => {
                m.push(Diagnostic::new(
                    Code::ProxyHostnameEditFindSuffix,
                    "Find part of \"ProxyHostnameEdit\" directive should end with a $",
                ));
                find
            }
        };

        if find.replace('.', "-") != replace {
            m.push(Diagnostic::new(
                Code::ProxyHostnameEditReplace,
                "Replace part of \"ProxyHostnameEdit\" directive is malformed",
            ));
        }

        for (pattern, re) in &self.state.proxy_hostname_edit_patterns {
            if re.is_match(find) {
                m.push(Diagnostic::new(
                    Code::ProxyHostnameEditDepthOrder,
                    format!(
                        "\"ProxyHostnameEdit\" domains should be placed in deepest-to-shallowest order, previous pattern: {:?}",
                        pattern
                    ),
                ));
            }
        }

        // Later finds must not be subdomains of this one.
        let seen = self
            .state
            .proxy_hostname_edit_patterns
            .iter()
            .any(|(pattern, _)| pattern == find);
        if !seen {
            if let Ok(re) = Regex::new(&format!("[.]{}$", regex::escape(find))) {
                self.state
                    .proxy_hostname_edit_patterns
                    .push((find.to_string(), re));
            }
        }
        m
    }

    /// AddUserHeader with qualifiers opens a header section; a bare
    /// AddUserHeader closes it.
    fn process_add_user_header(&mut self, line: &str) -> Vec<Diagnostic> {
        let mut m = Vec::new();
        let previous = self.state.previous;
        if trim_label(line, &self.state.label).is_empty() {
            let allowed = self.previous_ends_section() || previous == Directive::AnonymousURL;
            if !allowed {
                m.push(Diagnostic::new(
                    Code::AddUserHeaderCloseOutOfOrder,
                    format!(
                        "\"AddUserHeader\" directive with no qualifiers is out of order, previous directive: {:?}",
                        previous.label()
                    ),
                ));
            }
            self.state.add_user_header_open = false;
        } else {
            let allowed = self.previous_starts_section()
                || matches!(
                    previous,
                    Directive::Cookie | Directive::OptionCookie | Directive::ProxyHostnameEdit
                );
            if !allowed {
                m.push(self.out_of_order("AddUserHeader", Code::AddUserHeaderOutOfOrder));
            }
            self.state.add_user_header_open = true;
        }
        m
    }

    /// `AnonymousURL -*` closes what earlier AnonymousURL lines opened.
    fn process_anonymous_url(&mut self, line: &str) -> Vec<Diagnostic> {
        let mut m = Vec::new();
        let previous = self.state.previous;
        if trim_label(line, &self.state.label) == "-*" {
            let allowed = self.previous_ends_section() || previous == Directive::AddUserHeader;
            if !allowed {
                m.push(self.out_of_order("AnonymousURL -*", Code::AnonymousUrlCloseOutOfOrder));
            }
            self.state.anonymous_url_open = false;
        } else {
            let allowed = self.previous_starts_section()
                || matches!(previous, Directive::Cookie | Directive::ProxyHostnameEdit);
            if !allowed {
                m.push(self.out_of_order("AnonymousURL", Code::AnonymousUrlOutOfOrder));
            }
            self.state.anonymous_url_open = true;
        }
        m
    }

    fn process_title(&mut self, line: &str, at: &str) -> Vec<Diagnostic> {
        let mut m = Vec::new();
        let previous = self.state.previous;
        let allowed = self.previous_starts_section()
            || matches!(
                previous,
                Directive::ProxyHostnameEdit
                    | Directive::Referer
                    | Directive::Cookie
                    | Directive::OptionEbraryUnencodedTokens
                    | Directive::OptionCookie
            );
        if !allowed {
            m.push(self.out_of_order("Title", Code::TitleOutOfOrder));
        }
        // A Title straight after `AnonymousURL -*` is just as misplaced.
        if previous == Directive::AnonymousURL && !self.state.anonymous_url_open {
            m.push(self.out_of_order("Title", Code::TitleOutOfOrder));
        }

        let title = trim_label(line, &self.state.label).to_string();
        if self.state.title.is_empty() {
            self.state.title = title.clone();
        } else {
            m.push(Diagnostic::new(
                Code::DuplicateTitle,
                "Duplicate \"Title\" directive in stanza",
            ));
        }

        match self.previous_titles.get(&title) {
            Some(seen_at) => m.push(Diagnostic::new(
                Code::TitleAlreadySeen,
                format!("\"Title\" directive value already seen at {:?}", seen_at),
            )),
            None => {
                self.previous_titles.insert(title.clone(), at.to_string());
            }
        }

        let oclc_title = &self.state.oclc_title;
        let without_hide = title.strip_prefix("-Hide ").unwrap_or(&title);
        if !oclc_title.is_empty() && title != *oclc_title && without_hide != oclc_title.as_str() {
            m.push(Diagnostic::new(
                Code::SourceTitleMismatch,
                format!(
                    "Source title {:?} doesn't match {:?}, you might need to update this stanza",
                    oclc_title, title
                ),
            ));
        }
        m
    }

    /// A Title followed only by Description lines is a menu separator.
    fn process_description(&mut self) -> Vec<Diagnostic> {
        let mut m = Vec::new();
        if !matches!(
            self.state.previous,
            Directive::Title | Directive::Description
        ) {
            m.push(self.out_of_order("Description", Code::DescriptionOutOfOrder));
        }
        self.state.is_separator = true;
        m
    }

    fn process_url(&mut self, line: &str, at: &str) -> Vec<Diagnostic> {
        let mut m = Vec::new();
        if !matches!(
            self.state.previous,
            Directive::AllowVars
                | Directive::Description
                | Directive::EBLSecret
                | Directive::EbrarySite
                | Directive::EncryptVar
                | Directive::HTTPHeader
                | Directive::MimeFilter
                | Directive::Title
        ) {
            m.push(self.out_of_order("URL", Code::UrlOutOfOrder));
        }

        if self.state.title.is_empty() {
            m.push(Diagnostic::new(
                Code::UrlBeforeTitle,
                "\"URL\" directive is before \"Title\" directive",
            ));
        }
        if !self.state.url.is_empty() {
            m.push(Diagnostic::new(
                Code::DuplicateUrl,
                "Duplicate \"URL\" directive in stanza",
            ));
        }

        let value = url_format::find_url_from_line(line).unwrap_or_default();
        if value.is_empty() {
            m.push(Diagnostic::new(
                Code::UrlWrongFormat,
                "\"URL\" directive is not in the right format",
            ));
        }
        if self.state.url.is_empty() {
            self.state.url = value.to_string();
        }

        let parsed = match url_format::parse_starting_point(value) {
            Ok(Some(url)) => url,
            Ok(None) => {
                m.push(Diagnostic::new(
                    Code::UrlMissingScheme,
                    "URL does not start with http or https",
                ));
                return m;
            }
            Err(e) => {
                m.push(unparseable(e));
                return m;
            }
        };

        if self.config.https && parsed.scheme() != "https" {
            m.push(Diagnostic::new(
                Code::UrlNotHttps,
                "URL is not using HTTPS scheme",
            ));
        }

        // Stanzas commonly repeat their URL's origin in an H or HJ line, so
        // the origin is only recorded once the stanza closes.
        let origin = url_format::origin(&parsed);
        if let Some(seen_at) = self.previous_origins.get(&origin) {
            m.push(origin_seen(Code::OriginAlreadySeen, seen_at));
        }
        if self.state.url_origin.is_empty() {
            self.state.url_origin = origin;
            self.state.url_at = at.to_string();
        }
        m
    }

    fn process_host(&mut self, line: &str, at: &str) -> Vec<Diagnostic> {
        let mut m = Vec::new();
        let parsed = match url_format::parse_host_value(trim_label(line, &self.state.label)) {
            Ok(url) => url,
            Err(e) => {
                m.push(unparseable(e));
                return m;
            }
        };
        let origin = url_format::origin(&parsed);

        if let Some(seen_at) = self.previous_origins.get(&origin) {
            m.push(origin_seen(Code::OriginAlreadySeen, seen_at));
        }
        match self.state.stanza_origins.get(&origin) {
            Some(seen_at) => {
                if self.config.origins {
                    m.push(origin_seen(Code::OriginAlreadySeenInStanza, seen_at));
                }
            }
            None => {
                self.state.stanza_origins.insert(origin, at.to_string());
            }
        }
        m
    }

    fn process_domain(&mut self, line: &str) -> Vec<Diagnostic> {
        let mut m = Vec::new();
        match url_format::is_bare_domain(trim_label(line, &self.state.label)) {
            Ok(true) => {}
            Ok(false) => m.push(Diagnostic::new(
                Code::DomainNotBare,
                "Domain and DomainJavaScript directives should only specify domains",
            )),
            Err(e) => m.push(unparseable(e)),
        }
        m
    }
}

fn unparseable(e: url::ParseError) -> Diagnostic {
    Diagnostic::new(
        Code::UrlUnparseable,
        format!("Unable to parse URL, might be malformed: {}", e),
    )
}

fn origin_seen(code: Code, seen_at: &str) -> Diagnostic {
    Diagnostic::new(code, format!("Origin already seen at {:?}", seen_at))
}

/// Whether the untrimmed line ends in a space or tab character.
pub fn ends_in_space_or_tab(line: &str) -> bool {
    line.ends_with([' ', '\t'])
}

/// The directive's payload: the line with its label removed, trimmed.
pub fn trim_label<'a>(line: &'a str, label: &str) -> &'a str {
    line.strip_prefix(label).unwrap_or(line).trim()
}

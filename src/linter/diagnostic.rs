//! Lint findings and their stable codes.
//!
//! Codes are grouped by the hundreds digit of the first block:
//! - `L1xxx` ordering
//! - `L2xxx` duplication
//! - `L3xxx` malformed values
//! - `L4xxx` missing pairs at stanza end
//! - `L5xxx` style
//! - `L9xxx` everything else

use std::fmt;

use serde::Serialize;

/// Stable identifier for a kind of finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Code {
    TitleOutOfOrder,
    UrlOutOfOrder,
    AnonymousUrlCloseOutOfOrder,
    AnonymousUrlOutOfOrder,
    OptionOpenerOutOfOrder,
    OptionCloserOutOfOrder,
    ProxyHostnameEditOutOfOrder,
    ProxyHostnameEditDepthOrder,
    UrlBeforeTitle,
    AddUserHeaderCloseOutOfOrder,
    AddUserHeaderOutOfOrder,
    DescriptionOutOfOrder,
    DuplicateTitle,
    OriginAlreadySeen,
    DuplicateUrl,
    TitleAlreadySeen,
    OriginAlreadySeenInStanza,
    ProxyHostnameEditPair,
    ProxyHostnameEditFindSuffix,
    ProxyHostnameEditReplace,
    DomainNotBare,
    UrlUnparseable,
    UrlMissingScheme,
    UrlNotHttps,
    MalformedOption,
    UrlWrongFormat,
    UnclosedAnonymousUrl,
    UnclosedOption,
    TitleWithoutUrl,
    FindWithoutReplace,
    UnclosedAddUserHeader,
    WrongCase,
    TrailingWhitespace,
    UnknownDirective,
    SourceTitleMismatch,
    SourceLineError,
}

impl Code {
    pub fn as_str(&self) -> &'static str {
        match self {
            Code::TitleOutOfOrder => "L1001",
            Code::UrlOutOfOrder => "L1002",
            Code::AnonymousUrlCloseOutOfOrder => "L1003",
            Code::AnonymousUrlOutOfOrder => "L1004",
            Code::OptionOpenerOutOfOrder => "L1005",
            Code::OptionCloserOutOfOrder => "L1006",
            Code::ProxyHostnameEditOutOfOrder => "L1008",
            Code::ProxyHostnameEditDepthOrder => "L1009",
            Code::UrlBeforeTitle => "L1010",
            Code::AddUserHeaderCloseOutOfOrder => "L1011",
            Code::AddUserHeaderOutOfOrder => "L1012",
            Code::DescriptionOutOfOrder => "L1013",
            Code::DuplicateTitle => "L2001",
            Code::OriginAlreadySeen => "L2002",
            Code::DuplicateUrl => "L2003",
            Code::TitleAlreadySeen => "L2004",
            Code::OriginAlreadySeenInStanza => "L2005",
            Code::ProxyHostnameEditPair => "L3001",
            Code::ProxyHostnameEditFindSuffix => "L3002",
            Code::ProxyHostnameEditReplace => "L3003",
            Code::DomainNotBare => "L3004",
            Code::UrlUnparseable => "L3005",
            Code::UrlMissingScheme => "L3006",
            Code::UrlNotHttps => "L3007",
            Code::MalformedOption => "L3008",
            Code::UrlWrongFormat => "L3009",
            Code::UnclosedAnonymousUrl => "L4001",
            Code::UnclosedOption => "L4002",
            Code::TitleWithoutUrl => "L4003",
            Code::FindWithoutReplace => "L4004",
            Code::UnclosedAddUserHeader => "L4005",
            Code::WrongCase => "L5001",
            Code::TrailingWhitespace => "L5002",
            Code::UnknownDirective => "L9001",
            Code::SourceTitleMismatch => "L9002",
            Code::SourceLineError => "L9003",
        }
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Code {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A single finding for one line or one stanza.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub code: Code,
    pub message: String,
}

impl Diagnostic {
    pub fn new(code: Code, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.code)
    }
}

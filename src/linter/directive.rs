//! The closed set of EZproxy config directives and the label table used to
//! classify a line.
//!
//! Every directive has exactly one canonical label (its `Display` form).
//! Documented shorthand spellings such as `H`, `HJ`, `T` and `U` are
//! registered as aliases. The lowercase table is derived from the exact
//! table at first use and is only consulted to report letter-casing
//! mistakes.

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;
use serde::{Serialize, Serializer};

macro_rules! directives {
    ($($variant:ident => $label:literal,)+) => {
        /// A config-file instruction kind.
        ///
        /// `Undefined` is the sentinel for "no directive seen yet in this stanza".
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        pub enum Directive {
            #[default]
            $($variant,)+
        }

        impl Directive {
            /// Every directive, in declaration order.
            pub const ALL: &'static [Directive] = &[$(Directive::$variant,)+];

            /// The canonical label for this directive.
            pub fn label(&self) -> &'static str {
                match self {
                    $(Directive::$variant => $label,)+
                }
            }
        }
    };
}

directives! {
    Undefined => "Undefined",
    AddUserHeader => "AddUserHeader",
    AllowIP => "AllowIP",
    AllowVars => "AllowVars",
    AnonymousURL => "AnonymousURL",
    Audit => "Audit",
    AuditPurge => "AuditPurge",
    AutoLoginIP => "AutoLoginIP",
    AutoLoginIPBanner => "AutoLoginIPBanner",
    BinaryTimeout => "BinaryTimeout",
    Books24x7Site => "Books24x7Site",
    ByteServe => "ByteServe",
    CASServiceURL => "CASServiceURL",
    ChargeSetLatency => "ChargeSetLatency",
    Charset => "Charset",
    ClientTimeout => "ClientTimeout",
    ConnectWindow => "ConnectWindow",
    Cookie => "Cookie",
    CookieFilter => "CookieFilter",
    DbVar => "DbVar",
    DbVar0 => "DbVar0",
    DbVar1 => "DbVar1",
    DbVar2 => "DbVar2",
    DbVar3 => "DbVar3",
    DbVar4 => "DbVar4",
    DbVar5 => "DbVar5",
    DbVar6 => "DbVar6",
    DbVar7 => "DbVar7",
    DbVar8 => "DbVar8",
    DbVar9 => "DbVar9",
    DenyIfRequestHeader => "DenyIfRequestHeader",
    Description => "Description",
    DNS => "DNS",
    Domain => "Domain",
    DomainJavaScript => "DomainJavaScript",
    EBLSecret => "EBLSecret",
    EbrarySite => "ebrarySite",
    EncryptVar => "EncryptVar",
    ExcludeIP => "ExcludeIP",
    ExcludeIPBanner => "ExcludeIPBanner",
    ExtraLoginCookie => "ExtraLoginCookie",
    Find => "Find",
    FirstPort => "FirstPort",
    FormSelect => "FormSelect",
    FormSubmit => "FormSubmit",
    FormVariable => "FormVariable",
    Gartner => "Gartner",
    Group => "Group",
    HAName => "HAName",
    HAPeer => "HAPeer",
    Host => "Host",
    HostJavaScript => "HostJavaScript",
    HTTPHeader => "HTTPHeader",
    HTTPMethod => "HTTPMethod",
    Identifier => "Identifier",
    IncludeFile => "IncludeFile",
    IncludeIP => "IncludeIP",
    Interface => "Interface",
    IntruderIPAttempts => "IntruderIPAttempts",
    IntruderLog => "IntruderLog",
    IntruderUserAttempts => "IntruderUserAttempts",
    IntrusionAPI => "IntrusionAPI",
    LBPeer => "LBPeer",
    Location => "Location",
    LogFile => "LogFile",
    LogFilter => "LogFilter",
    LogFormat => "LogFormat",
    LoginCookieDomain => "LoginCookieDomain",
    LoginCookieName => "LoginCookieName",
    LoginMenu => "LoginMenu",
    LoginPort => "LoginPort",
    LoginPortSSL => "LoginPortSSL",
    LogSPU => "LogSPU",
    MaxConcurrentTransfers => "MaxConcurrentTransfers",
    MaxLifetime => "MaxLifetime",
    MaxSessions => "MaxSessions",
    MaxVirtualHosts => "MaxVirtualHosts",
    MessagesFile => "MessagesFile",
    MetaFind => "MetaFind",
    MimeFilter => "MimeFilter",
    Name => "Name",
    NeverProxy => "NeverProxy",
    OptionAcceptXForwardedFor => "Option AcceptX-Forwarded-For",
    OptionAllowSendGZip => "Option AllowSendGZip",
    OptionAllowWebSubdirectories => "Option AllowWebSubdirectories",
    OptionAnyDNSHostname => "Option AnyDNSHostname",
    OptionBlockCountryChange => "Option BlockCountryChange",
    OptionCookie => "Option Cookie",
    OptionCookiePassThrough => "Option CookiePassThrough",
    OptionCSRFToken => "Option CSRFToken",
    OptionDisableSSL40bit => "Option DisableSSL40bit",
    OptionDisableSSL56bit => "Option DisableSSL56bit",
    OptionDisableSSLv2 => "Option DisableSSLv2",
    OptionDomainCookieOnly => "Option DomainCookieOnly",
    OptionEbraryUnencodedTokens => "Option ebraryUnencodedTokens",
    OptionExcludeIPMenu => "Option ExcludeIPMenu",
    OptionForceHTTPSAdmin => "Option ForceHTTPSAdmin",
    OptionForceHTTPSLogin => "Option ForceHTTPSLogin",
    OptionForceWildcardCertificate => "Option ForceWildcardCertificate",
    OptionHideEZproxy => "Option HideEZproxy",
    OptionHttpsHyphens => "Option HttpsHyphens",
    OptionIChooseToUseDomainLinesThatThreatenTheSecurityOfMyNetwork => "Option I choose to use Domain lines that threaten the security of my network",
    OptionIgnoreWildcardCertificate => "Option IgnoreWildcardCertificate",
    OptionIPv6 => "Option IPv6",
    OptionLoginReplaceGroups => "Option LoginReplaceGroups",
    OptionLogReferer => "Option LogReferer",
    OptionLogSAML => "Option LogSAML",
    OptionLogSession => "Option LogSession",
    OptionLogSPUEdit => "Option LogSPUEdit",
    OptionLogUser => "Option LogUser",
    OptionMenuByGroups => "Option MenuByGroups",
    OptionMetaEZproxyRewriting => "Option MetaEZproxyRewriting",
    OptionNoCookie => "Option NoCookie",
    OptionNoHideEZproxy => "Option NoHideEZproxy",
    OptionNoHttpsHyphens => "Option NoHttpsHyphens",
    OptionNoMetaEZproxyRewriting => "Option NoMetaEZproxyRewriting",
    OptionNoProxyFTP => "Option NoProxyFTP",
    OptionNoUTF16 => "Option NoUTF16",
    OptionNoXForwardedFor => "Option NoX-Forwarded-For",
    OptionProxyByHostname => "Option ProxyByHostname",
    OptionProxyFTP => "Option ProxyFTP",
    OptionRecordPeaks => "Option RecordPeaks",
    OptionRedirectUnknown => "Option RedirectUnknown",
    OptionReferInHostname => "Option ReferInHostname",
    OptionRelaxedRADIUS => "Option RelaxedRADIUS",
    OptionRequireAuthenticate => "Option RequireAuthenticate",
    OptionSafariCookiePatch => "Option SafariCookiePatch",
    OptionStatusUser => "Option StatusUser",
    OptionTicketIgnoreExcludeIP => "Option TicketIgnoreExcludeIP",
    OptionUnsafeRedirectUnknown => "Option UnsafeRedirectUnknown",
    OptionUsernameCaretN => "Option UsernameCaretN",
    OptionUTF16 => "Option UTF16",
    OptionXForwardedFor => "Option X-Forwarded-For",
    OverDriveSite => "OverDriveSite",
    PDFRefresh => "PDFRefresh",
    PDFRefreshPost => "PDFRefreshPost",
    PDFRefreshPre => "PDFRefreshPre",
    PidFile => "PidFile",
    Proxy => "Proxy",
    ProxyHostnameEdit => "ProxyHostnameEdit",
    ProxySSL => "ProxySSL",
    RADIUSRetry => "RADIUSRetry",
    RedirectSafe => "RedirectSafe",
    Referer => "Referer",
    RejectIP => "RejectIP",
    RemoteIPHeader => "RemoteIPHeader",
    RemoteIPInternalProxy => "RemoteIPInternalProxy",
    RemoteIPTrustedProxy => "RemoteIPTrustedProxy",
    RemoteTimeout => "RemoteTimeout",
    Replace => "Replace",
    RunAs => "RunAs",
    ShibbolethDisable => "ShibbolethDisable",
    ShibbolethMetadata => "ShibbolethMetadata",
    SkipPort => "SkipPort",
    SPUEdit => "SPUEdit",
    SPUEditVar => "SPUEditVar",
    SQLiteTempDir => "SQLiteTempDir",
    SSLCipherSuite => "SSLCipherSuite",
    SSLHonorCipherOrder => "SSLHonorCipherOrder",
    SSLOpenSSLConfCmd => "SSLOpenSSLConfCmd",
    SSOUsername => "SSOUsername",
    Title => "Title",
    TokenKey => "TokenKey",
    TokenSignatureKey => "TokenSignatureKey",
    UMask => "UMask",
    URL => "URL",
    URLAppendEncoded => "URLAppendEncoded",
    URLRedirect => "URLRedirect",
    URLRedirectAppend => "URLRedirectAppend",
    URLRedirectAppendEncoded => "URLRedirectAppendEncoded",
    UsageLimit => "UsageLimit",
    Validate => "Validate",
    XDebug => "XDebug",
}

/// Abbreviated or alternate spellings accepted by EZproxy.
const ALIASES: &[(&str, Directive)] = &[
    ("A", Directive::AutoLoginIP),
    ("D", Directive::Domain),
    ("DJ", Directive::DomainJavaScript),
    ("E", Directive::ExcludeIP),
    ("H", Directive::Host),
    ("HJ", Directive::HostJavaScript),
    ("I", Directive::IncludeIP),
    ("MC", Directive::MaxConcurrentTransfers),
    ("ML", Directive::MaxLifetime),
    ("MS", Directive::MaxSessions),
    ("MV", Directive::MaxVirtualHosts),
    ("PHE", Directive::ProxyHostnameEdit),
    ("PIDFile", Directive::PidFile),
    ("T", Directive::Title),
    ("U", Directive::URL),
];

static LABEL_TO_DIRECTIVE: Lazy<HashMap<&'static str, Directive>> = Lazy::new(|| {
    let mut table: HashMap<&'static str, Directive> = Directive::ALL
        .iter()
        .filter(|d| **d != Directive::Undefined)
        .map(|d| (d.label(), *d))
        .collect();
    table.extend(ALIASES.iter().copied());
    table
});

static LOWERCASE_LABEL_TO_DIRECTIVE: Lazy<HashMap<String, Directive>> = Lazy::new(|| {
    LABEL_TO_DIRECTIVE
        .iter()
        .map(|(label, directive)| (label.to_lowercase(), *directive))
        .collect()
});

/// How a label was matched against the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelMatch {
    /// The label is spelled exactly as documented.
    Exact(Directive),
    /// The label only matched when compared case-insensitively.
    WrongCase(Directive),
}

/// Look up a label exactly, falling back to a case-insensitive match.
pub fn lookup(label: &str) -> Option<LabelMatch> {
    if let Some(directive) = LABEL_TO_DIRECTIVE.get(label) {
        return Some(LabelMatch::Exact(*directive));
    }
    LOWERCASE_LABEL_TO_DIRECTIVE
        .get(&label.to_lowercase())
        .map(|d| LabelMatch::WrongCase(*d))
}

impl Directive {
    /// `DbVar` and its numbered forms `DbVar0` through `DbVar9`.
    pub fn is_db_var(&self) -> bool {
        matches!(
            self,
            Directive::DbVar
                | Directive::DbVar0
                | Directive::DbVar1
                | Directive::DbVar2
                | Directive::DbVar3
                | Directive::DbVar4
                | Directive::DbVar5
                | Directive::DbVar6
                | Directive::DbVar7
                | Directive::DbVar8
                | Directive::DbVar9
        )
    }

    /// The closing option required before the stanza ends, if this directive
    /// is an opener.
    pub fn required_closer(&self) -> Option<Directive> {
        OPTION_PAIRS
            .iter()
            .find(|(opener, _)| opener == self)
            .map(|(_, closer)| *closer)
    }

    pub fn is_option_opener(&self) -> bool {
        self.required_closer().is_some()
    }

    pub fn is_option_closer(&self) -> bool {
        OPTION_PAIRS.iter().any(|(_, closer)| closer == self)
    }
}

/// Opener options and the closer each one must be paired with.
pub const OPTION_PAIRS: &[(Directive, Directive)] = &[
    (Directive::OptionDomainCookieOnly, Directive::OptionCookie),
    (Directive::OptionNoCookie, Directive::OptionCookie),
    (Directive::OptionCookiePassThrough, Directive::OptionCookie),
    (Directive::OptionHideEZproxy, Directive::OptionNoHideEZproxy),
    (Directive::OptionNoHttpsHyphens, Directive::OptionHttpsHyphens),
    (
        Directive::OptionMetaEZproxyRewriting,
        Directive::OptionNoMetaEZproxyRewriting,
    ),
    (Directive::OptionProxyFTP, Directive::OptionNoProxyFTP),
    (Directive::OptionUTF16, Directive::OptionNoUTF16),
    (Directive::OptionXForwardedFor, Directive::OptionNoXForwardedFor),
];

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Directive {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

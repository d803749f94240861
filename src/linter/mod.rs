//! EZproxy config linting
//!
//! The linter works one physical line at a time. [`StanzaProcessor`] keeps
//! the state of the stanza being read and the run-wide memory of titles and
//! origins; everything file-shaped (reading, IncludeFile, printing) lives in
//! [`crate::runner`].

pub mod diagnostic;
pub mod directive;
pub mod processor;
pub mod state;
pub mod url_format;

pub use diagnostic::{Code, Diagnostic};
pub use directive::{lookup, Directive, LabelMatch, OPTION_PAIRS};
pub use processor::{StanzaProcessor, SuspendedFile};
pub use state::StanzaState;

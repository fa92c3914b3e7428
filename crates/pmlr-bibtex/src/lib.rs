//! Normalization of PMLR proceedings BibTeX.
//!
//! Proceedings arrive as one `@Proceedings` entry describing the venue plus
//! one `@InProceedings` entry per paper, usually with text pasted from PDFs
//! and word processors. This crate turns such a batch into something the
//! publishing toolchain accepts:
//!
//! - non-ASCII letters, dashes and symbols become TeX escapes ([`charmap`])
//! - straight and curly quotes become ``` `` ```/`''` pairs, leaving TeX
//!   commands alone ([`quotes`])
//! - non-ASCII entry keys are folded to unique ASCII keys ([`identifier`])
//! - the venue entry is checked strictly, paper entries advisorily
//!   ([`validate`])
//! - fields are written in a fixed order ([`order`])
//!
//! # Example
//!
//! ```rust
//! use pmlr_bibtex::{FixOptions, NoopObserver, fix_bibtex};
//!
//! let source = r#"
//! @Proceedings{corl24, booktitle = {B}, name = {N}, shortname = {S},
//!   year = {2024}, editor = {E}, volume = {270}, start = {2024-11-06},
//!   end = {2024-11-09}, published = {2025-01-01}, address = {Munich},
//!   conference_url = {https://corl.org}}
//! @InProceedings{müller24, title = {“Grasping” in the wild}, author = {Jürgen Müller},
//!   pages = {1-10}, abstract = {Works 100% of the time}}
//! "#;
//!
//! let (output, outcome) = fix_bibtex(source, &FixOptions::default(), &NoopObserver).unwrap();
//! assert!(output.contains("@InProceedings{muller24,"));
//! assert!(output.contains("title = {``Grasping'' in the wild}"));
//! assert!(output.contains("100\\% of the time"));
//! assert!(outcome.issues.is_empty());
//! ```
//!
//! # Errors
//!
//! A batch without exactly one complete Proceedings entry, or input that
//! cannot be parsed, is rejected with an [`Error`]. Everything else that
//! looks wrong is reported as an [`Issue`] and the output is still produced.

pub mod bibtex;
pub mod charmap;
pub mod error;
pub mod identifier;
pub mod options;
pub mod order;
pub mod pipeline;
pub mod quotes;
pub mod record;
pub mod rename;
pub mod validate;

pub use bibtex::{parse_bibtex, write_bibtex};
pub use charmap::normalize_text;
pub use error::{Error, Result};
pub use identifier::{IdentifierMap, IdentifierRegistry, fold_identifier, resolve_identifier};
pub use options::FixOptions;
pub use order::order_fields;
pub use pipeline::{
    FixObserver, FixOutcome, NoopObserver, TracingObserver, fix_bibtex, fix_records,
    normalize_field_text,
};
pub use quotes::rewrite_quotes;
pub use record::{FieldValue, Record, RecordKind};
pub use rename::{AlwaysConfirm, Confirm, FileRename, RenameOutcome, rename_associated_files};
pub use validate::{Issue, IssueLog, validate_proceedings};

//! Reading and writing the BibTeX files proceedings are delivered in.
//!
//! Only what a proceedings file uses is supported: `@Proceedings` and
//! `@InProceedings` entries, `@string` macros, and the usual month macros.
//! `@comment`, `@preamble` and any text between entries are skipped.

mod parser;
mod writer;

pub use parser::{parse_bibtex, split_names};
pub use writer::{write_bibtex, write_record};

//! Character tables and the text normalization pass.
//!
//! Two static tables drive the conversion:
//!
//! - [`ESCAPE_TABLE`]: accented Latin and Greek letters, punctuation and
//!   dashes, mapped to their TeX escape.
//! - [`LIGATURE_TABLE`]: fused glyphs (usually left behind by PDF text
//!   extraction) mapped to the letters they stand for.
//!
//! Quote characters are deliberately absent from both tables. They pass
//! through [`normalize_text`] untouched so that [`crate::quotes`] can see the
//! original character and decide on pairing from context.

use once_cell::sync::Lazy;
use std::collections::{BTreeSet, HashMap};

/// Code points that belong to the quote rewriter, never to the escape table.
pub const QUOTE_CODE_POINTS: &[char] = &['"', '\'', '\u{201C}', '\u{201D}', '\u{2018}', '\u{2019}'];

/// Code point to TeX escape. One entry per code point.
pub static ESCAPE_TABLE: &[(char, &str)] = &[
    // Diaeresis
    ('ä', r#"{\"{a}}"#),
    ('ë', r#"{\"{e}}"#),
    ('ï', r#"{\"{i}}"#),
    ('ö', r#"{\"{o}}"#),
    ('ü', r#"{\"{u}}"#),
    ('ÿ', r#"{\"{y}}"#),
    ('Ä', r#"{\"{A}}"#),
    ('Ë', r#"{\"{E}}"#),
    ('Ï', r#"{\"{I}}"#),
    ('Ö', r#"{\"{O}}"#),
    ('Ü', r#"{\"{U}}"#),
    ('Ÿ', r#"{\"{Y}}"#),
    // Acute
    ('á', r"{\'{a}}"),
    ('é', r"{\'{e}}"),
    ('í', r"{\'{i}}"),
    ('ó', r"{\'{o}}"),
    ('ú', r"{\'{u}}"),
    ('ý', r"{\'{y}}"),
    ('Á', r"{\'{A}}"),
    ('É', r"{\'{E}}"),
    ('Í', r"{\'{I}}"),
    ('Ó', r"{\'{O}}"),
    ('Ú', r"{\'{U}}"),
    ('Ý', r"{\'{Y}}"),
    ('ć', r"\'c"),
    ('ń', r"\'n"),
    ('ś', r"\'s"),
    ('ź', r"\'z"),
    ('Ć', r"\'C"),
    ('Ń', r"\'N"),
    ('Ś', r"\'S"),
    ('Ź', r"\'Z"),
    // Grave
    ('à', r"{\`{a}}"),
    ('è', r"{\`{e}}"),
    ('ì', r"{\`{i}}"),
    ('ò', r"{\`{o}}"),
    ('ù', r"{\`{u}}"),
    ('À', r"{\`{A}}"),
    ('È', r"{\`{E}}"),
    ('Ì', r"{\`{I}}"),
    ('Ò', r"{\`{O}}"),
    ('Ù', r"{\`{U}}"),
    // Circumflex
    ('â', r"{\^{a}}"),
    ('ê', r"{\^{e}}"),
    ('î', r"{\^{i}}"),
    ('ô', r"{\^{o}}"),
    ('û', r"{\^{u}}"),
    ('Â', r"{\^{A}}"),
    ('Ê', r"{\^{E}}"),
    ('Î', r"{\^{I}}"),
    ('Ô', r"{\^{O}}"),
    ('Û', r"{\^{U}}"),
    // Tilde
    ('ã', r"{\~{a}}"),
    ('ñ', r"{\~{n}}"),
    ('õ', r"{\~{o}}"),
    ('Ã', r"{\~{A}}"),
    ('Ñ', r"{\~{N}}"),
    ('Õ', r"{\~{O}}"),
    // Ogonek, dot, stroke
    ('ą', r"\k{a}"),
    ('ę', r"\k{e}"),
    ('Ą', r"\k{A}"),
    ('Ę', r"\k{E}"),
    ('ż', r"\.z"),
    ('Ż', r"\.Z"),
    ('ė', r"\.e"),
    ('İ', r"\.I"),
    ('ł', r"\l{}"),
    ('Ł', r"\L{}"),
    // Caron and ring
    ('č', r"\v{c}"),
    ('ď', r"\v{d}"),
    ('ě', r"\v{e}"),
    ('ň', r"\v{n}"),
    ('ř', r"\v{r}"),
    ('š', r"\v{s}"),
    ('ť', r"\v{t}"),
    ('ž', r"\v{z}"),
    ('Č', r"\v{C}"),
    ('Ď', r"\v{D}"),
    ('Ě', r"\v{E}"),
    ('Ň', r"\v{N}"),
    ('Ř', r"\v{R}"),
    ('Š', r"\v{S}"),
    ('Ť', r"\v{T}"),
    ('Ž', r"\v{Z}"),
    ('ů', r"\r{u}"),
    ('Ů', r"\r{U}"),
    // Cedilla, breve, double acute, macron
    ('ç', r"\c{c}"),
    ('Ç', r"\c{C}"),
    ('ş', r"\c{s}"),
    ('Ş', r"\c{S}"),
    ('ğ', r"\u{g}"),
    ('Ğ', r"\u{G}"),
    ('ő', r"\H{o}"),
    ('ű', r"\H{u}"),
    ('Ő', r"\H{O}"),
    ('Ű', r"\H{U}"),
    ('ā', r"\={a}"),
    ('ē', r"\={e}"),
    ('ī', r"\={i}"),
    ('ō', r"\={o}"),
    ('ū', r"\={u}"),
    ('ı', r"{\i}"),
    // Nordic and ligature letters
    ('ø', r"\o{}"),
    ('Ø', r"\O{}"),
    ('å', r"\aa{}"),
    ('Å', r"\AA{}"),
    ('æ', r"\ae{}"),
    ('Æ', r"\AE{}"),
    ('œ', r"\oe{}"),
    ('Œ', r"\OE{}"),
    ('ß', r"\ss{}"),
    // Punctuation and dashes
    ('¡', "!`"),
    ('¿', "?`"),
    ('\u{201A}', ","),
    ('\u{201E}', ",,"),
    ('\u{2010}', "-"),
    ('\u{2011}', "-"),
    ('\u{2013}', "--"),
    ('\u{2014}', "---"),
    ('\u{2212}', "-"),
    ('\u{2026}', r"\ldots{}"),
    ('\u{200B}', ""),
    ('©', r"\copyright{}"),
    // Math symbols
    ('≥', r"$\geq$"),
    ('≤', r"$\leq$"),
    ('≈', r"$\approx$"),
    ('±', r"$\pm$"),
    ('×', r"$\times$"),
    ('°', r"$^\circ$"),
    ('→', r"$\rightarrow$"),
    ('∞', r"$\infty$"),
    // Greek
    ('α', r"$\alpha$"),
    ('β', r"$\beta$"),
    ('γ', r"$\gamma$"),
    ('δ', r"$\delta$"),
    ('ε', r"$\epsilon$"),
    ('η', r"$\eta$"),
    ('θ', r"$\theta$"),
    ('κ', r"$\kappa$"),
    ('λ', r"$\lambda$"),
    ('μ', r"$\mu$"),
    ('π', r"$\pi$"),
    ('ρ', r"$\rho$"),
    ('σ', r"$\sigma$"),
    ('τ', r"$\tau$"),
    ('φ', r"$\phi$"),
    ('χ', r"$\chi$"),
    ('ψ', r"$\psi$"),
    ('ω', r"$\omega$"),
    ('Δ', r"$\Delta$"),
    ('Σ', r"$\Sigma$"),
    ('Ω', r"$\Omega$"),
];

/// Ligature glyph to ASCII letters.
pub static LIGATURE_TABLE: &[(char, &str)] = &[
    ('\u{FB00}', "ff"),
    ('\u{FB01}', "fi"),
    ('\u{FB02}', "fl"),
    ('\u{FB03}', "ffi"),
    ('\u{FB04}', "ffl"),
    ('\u{FB05}', "ft"),
    ('\u{FB06}', "st"),
    ('\u{0132}', "IJ"),
    ('\u{0133}', "ij"),
    ('\u{A732}', "AA"),
    ('\u{A733}', "aa"),
    ('\u{A734}', "AO"),
    ('\u{A735}', "ao"),
    ('\u{A736}', "AU"),
    ('\u{A737}', "au"),
    ('\u{A738}', "AV"),
    ('\u{A739}', "av"),
    ('\u{A73A}', "AV"),
    ('\u{A73B}', "av"),
    ('\u{A73C}', "AY"),
    ('\u{A73D}', "ay"),
    ('\u{A74E}', "OO"),
    ('\u{A74F}', "oo"),
];

static ESCAPES: Lazy<HashMap<char, &'static str>> =
    Lazy::new(|| ESCAPE_TABLE.iter().copied().collect());

static LIGATURES: Lazy<HashMap<char, &'static str>> =
    Lazy::new(|| LIGATURE_TABLE.iter().copied().collect());

/// Whether `c` is handled by the quote rewriter rather than the tables.
pub fn is_quote(c: char) -> bool {
    QUOTE_CODE_POINTS.contains(&c)
}

/// TeX escape for `c`, if the escape table has one.
pub fn escape_for(c: char) -> Option<&'static str> {
    ESCAPES.get(&c).copied()
}

/// ASCII expansion for a ligature glyph.
pub fn ligature_for(c: char) -> Option<&'static str> {
    LIGATURES.get(&c).copied()
}

/// Collapse every whitespace run (line breaks and no-break spaces included)
/// to a single space and trim both ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whitespace collapse, then table substitution.
///
/// Quote characters and unmapped code points are copied through unchanged.
pub fn normalize_text(text: &str) -> String {
    let collapsed = collapse_whitespace(text);
    let mut result = String::with_capacity(collapsed.len() + collapsed.len() / 4);

    for c in collapsed.chars() {
        if c.is_ascii() || is_quote(c) {
            result.push(c);
        } else if let Some(escape) = escape_for(c) {
            result.push_str(escape);
        } else if let Some(letters) = ligature_for(c) {
            result.push_str(letters);
        } else {
            result.push(c);
        }
    }

    result
}

/// Escape `%` and `&` unless they already follow a backslash.
pub fn escape_specials(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut prev = None;

    for c in text.chars() {
        if matches!(c, '%' | '&') && prev != Some('\\') {
            result.push('\\');
        }
        result.push(c);
        prev = Some(c);
    }

    result
}

/// Distinct code points above ASCII remaining in `text`, in code point order.
pub fn residual_non_ascii(text: &str) -> Vec<char> {
    text.chars()
        .filter(|c| !c.is_ascii())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

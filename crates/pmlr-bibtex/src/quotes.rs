//! Context-aware quote conversion.
//!
//! Straight quotes are rewritten into TeX open/close pairs (``` ``...'' ```
//! and `` `...' ``) when they delimit a span at word boundaries. Quotes that
//! are part of a markup command, such as `\"{u}` or `\command{"quoted"}`, are
//! left alone.
//!
//! The work is split in two:
//!
//! 1. [`split_escape_regions`] walks the text once with a small state
//!    machine and cuts it into plain text and opaque escape regions.
//! 2. The whole text goes through the double-quote pass and then the
//!    single-quote pass. Characters of an opaque region are never paired
//!    and are copied back unchanged, apart from typographic quotes.

/// A slice of the input as seen by the escape-region scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Ordinary text, eligible for quote rewriting.
    Text(&'a str),
    /// A markup command and its balanced-brace argument, copied verbatim.
    Escape(&'a str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Normal,
    /// Just consumed a backslash at `start`; the command name comes next.
    EscapeIntroducer { start: usize },
    /// Inside the argument of the command starting at `start`. `open` is the
    /// char index of the opening brace, kept so the scan can fail open.
    EscapeBrace {
        start: usize,
        open: usize,
        depth: usize,
    },
}

/// Cut `text` into plain segments and opaque escape regions.
///
/// A backslash starts a command whose name is either a run of ASCII letters
/// or a single other character. If a `{` follows the name directly, the
/// balanced brace group (nesting counted, `\{` and `\}` ignored) belongs to
/// the region. A command without an argument is a region on its own. When
/// the brace group never closes, the command is demoted to plain text and
/// the scan resumes at the brace.
pub fn split_escape_regions(text: &str) -> Vec<Segment<'_>> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let byte_at = |k: usize| chars.get(k).map_or(text.len(), |&(b, _)| b);

    let mut segments = Vec::new();
    let mut state = ScanState::Normal;
    // Char index where the pending plain run begins.
    let mut text_start = 0;
    let mut k = 0;

    while k < chars.len() {
        let c = chars[k].1;
        match state {
            ScanState::Normal => {
                if c == '\\' {
                    state = ScanState::EscapeIntroducer { start: k };
                }
                k += 1;
            }
            ScanState::EscapeIntroducer { start } => {
                let mut name_end = k + 1;
                if c.is_ascii_alphabetic() {
                    while name_end < chars.len() && chars[name_end].1.is_ascii_alphabetic() {
                        name_end += 1;
                    }
                }

                if chars.get(name_end).is_some_and(|&(_, next)| next == '{') {
                    state = ScanState::EscapeBrace {
                        start,
                        open: name_end,
                        depth: 1,
                    };
                    k = name_end + 1;
                } else {
                    push_text(&mut segments, &text[byte_at(text_start)..byte_at(start)]);
                    segments.push(Segment::Escape(&text[byte_at(start)..byte_at(name_end)]));
                    text_start = name_end;
                    state = ScanState::Normal;
                    k = name_end;
                }
            }
            ScanState::EscapeBrace { start, open, depth } => {
                match c {
                    // Escaped character inside the argument: skip it.
                    '\\' => k += 1,
                    '{' => {
                        state = ScanState::EscapeBrace {
                            start,
                            open,
                            depth: depth + 1,
                        }
                    }
                    '}' if depth == 1 => {
                        push_text(&mut segments, &text[byte_at(text_start)..byte_at(start)]);
                        segments.push(Segment::Escape(&text[byte_at(start)..byte_at(k + 1)]));
                        text_start = k + 1;
                        state = ScanState::Normal;
                    }
                    '}' => {
                        state = ScanState::EscapeBrace {
                            start,
                            open,
                            depth: depth - 1,
                        }
                    }
                    _ => {}
                }
                k += 1;
            }
        }

        // Unbalanced argument: fail open and rescan from the brace.
        if k >= chars.len()
            && let ScanState::EscapeBrace { open, .. } = state
        {
            state = ScanState::Normal;
            k = open;
        }
    }

    // A lone trailing backslash is plain text, which the pending run covers.
    push_text(&mut segments, &text[byte_at(text_start)..]);
    segments
}

fn push_text<'a>(segments: &mut Vec<Segment<'a>>, text: &'a str) {
    if !text.is_empty() {
        segments.push(Segment::Text(text));
    }
}

/// Rewrite quotes everywhere outside escape regions.
///
/// Characters of an escape region are never paired, but a straight-quoted
/// span may run across a region, as in `"Schr{\"{o}}dinger"`. Typographic
/// quotes become markers wherever they appear, escape arguments included.
pub fn rewrite_quotes(text: &str) -> String {
    let mut glyphs = Vec::with_capacity(text.len() + 8);
    for segment in split_escape_regions(text) {
        let (raw, protected) = match segment {
            Segment::Text(raw) => (raw, false),
            Segment::Escape(raw) => (raw, true),
        };
        for c in raw.chars() {
            push_glyph(&mut glyphs, c, protected);
        }
    }
    convert_single_quotes(&convert_double_quotes(&glyphs))
}

/// One output character. Protected glyphs are emitted quote markers or
/// escape-region characters and are never paired.
#[derive(Debug, Clone, Copy)]
struct Glyph {
    c: char,
    protected: bool,
}

fn is_straight_double(g: &Glyph) -> bool {
    g.c == '"' && !g.protected
}

fn opens_double(glyphs: &[Glyph], i: usize) -> bool {
    i == 0 || {
        let prev = glyphs[i - 1].c;
        prev.is_whitespace() || matches!(prev, '(' | '[' | '{')
    }
}

fn closes_double(glyphs: &[Glyph], j: usize) -> bool {
    j + 1 == glyphs.len() || {
        let next = glyphs[j + 1].c;
        next.is_whitespace() || matches!(next, ')' | ']' | '}')
    }
}

fn push_marker(out: &mut Vec<Glyph>, marker: &str) {
    out.extend(marker.chars().map(|c| Glyph { c, protected: true }));
}

/// Typographic quotes already carry their direction and map straight to
/// markers.
fn push_glyph(out: &mut Vec<Glyph>, c: char, protected: bool) {
    match c {
        '\u{201C}' => push_marker(out, "``"),
        '\u{201D}' => push_marker(out, "''"),
        '\u{2018}' => push_marker(out, "`"),
        '\u{2019}' => push_marker(out, "'"),
        _ => out.push(Glyph { c, protected }),
    }
}

fn convert_double_quotes(glyphs: &[Glyph]) -> Vec<Glyph> {
    let mut out = Vec::with_capacity(glyphs.len() + 4);
    let mut i = 0;

    while i < glyphs.len() {
        if is_straight_double(&glyphs[i]) && opens_double(glyphs, i) {
            let close = glyphs[i + 1..]
                .iter()
                .position(is_straight_double)
                .map(|offset| i + 1 + offset)
                .filter(|&j| closes_double(glyphs, j));

            if let Some(close) = close {
                push_marker(&mut out, "``");
                out.extend_from_slice(&glyphs[i + 1..close]);
                push_marker(&mut out, "''");
                i = close + 1;
                continue;
            }
        }

        out.push(glyphs[i]);
        i += 1;
    }

    out
}

fn is_open_single(glyphs: &[Glyph], i: usize) -> bool {
    let g = glyphs[i];
    g.c == '\'' && !g.protected && (i == 0 || !glyphs[i - 1].c.is_alphanumeric())
}

fn convert_single_quotes(glyphs: &[Glyph]) -> String {
    let mut result = String::with_capacity(glyphs.len());
    let mut i = 0;

    while i < glyphs.len() {
        if is_open_single(glyphs, i) {
            let close = (i + 1..glyphs.len())
                .find(|&j| glyphs[j].c == '\'' && !glyphs[j].protected)
                .filter(|&j| j > i + 1)
                .filter(|&j| glyphs.get(j + 1).is_none_or(|next| !next.c.is_alphanumeric()));

            if let Some(close) = close {
                result.push('`');
                result.extend(glyphs[i + 1..close].iter().map(|g| g.c));
                result.push('\'');
                i = close + 1;
                continue;
            }
        }

        result.push(glyphs[i].c);
        i += 1;
    }

    result
}

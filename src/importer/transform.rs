//! Text rewrites applied to every imported document
//!
//! The site generator renders docs as MDX, which rejects raw `{...}` and
//! is picky about fence and heading syntax. Each rewrite is a separate
//! function so the passes can be tested on their own; [`transform_body`]
//! runs them in the fixed order the importer relies on.

use super::options::ExpressionPolicy;
use regex::Regex;
use std::sync::LazyLock;

static FENCE_OPENER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"```(\w+)\r?\n").unwrap());
static EXPRESSION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{[^}]+\}").unwrap());
static HEADER_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(#+)([^#\s])").unwrap());
static LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").unwrap());

/// Front matter block carrying the sidebar position
pub fn front_matter(position: usize) -> String {
    format!("---\nsidebar_position: {position}\n---\n\n")
}

/// Build the full output document for one source file.
pub fn render_document(position: usize, body: &str, expressions: ExpressionPolicy) -> String {
    let mut output = front_matter(position);
    output.push_str(&transform_body(body, expressions));
    output
}

/// Apply every rewrite to a document body, in order.
pub fn transform_body(body: &str, expressions: ExpressionPolicy) -> String {
    let text = fix_code_fences(body);
    let text = strip_expressions(&text, expressions);
    let text = fix_headers(&text, expressions);
    let text = space_inline_code(&text);
    normalize_links(&text)
}

/// ```` ```lang\r\n ```` becomes ```` ```lang\n ````.
pub fn fix_code_fences(text: &str) -> String {
    FENCE_OPENER.replace_all(text, "```${1}\n").into_owned()
}

/// Remove `{...}` placeholders. No nesting: `{a{b}c}` leaves `c}`.
pub fn strip_expressions(text: &str, policy: ExpressionPolicy) -> String {
    let strip = |s: &str| EXPRESSION.replace_all(s, "").into_owned();
    match policy {
        ExpressionPolicy::StripAll => strip(text),
        ExpressionPolicy::OutsideCode => {
            map_outside_fences(text, |prose| map_outside_code_spans(prose, &strip))
        }
    }
}

/// Insert the missing space in `##Title`.
///
/// Under [`ExpressionPolicy::OutsideCode`] fenced blocks are left alone,
/// so `#include` and shebang lines survive.
pub fn fix_headers(text: &str, policy: ExpressionPolicy) -> String {
    let fix = |s: &str| HEADER_MARKER.replace_all(s, "${1} ${2}").into_owned();
    match policy {
        ExpressionPolicy::StripAll => fix(text),
        ExpressionPolicy::OutsideCode => map_outside_fences(text, fix),
    }
}

/// Surround each single-backtick code span with exactly one space per side.
///
/// Spans never cross a line break, and double backticks or fence lines
/// are left alone. A span opening a line keeps the line's indentation
/// as is and gets no leading space.
pub fn space_inline_code(text: &str) -> String {
    map_outside_fences(text, space_inline_code_in_prose)
}

/// Identity for well-formed links.
pub fn normalize_links(text: &str) -> String {
    LINK.replace_all(text, "[${1}](${2})").into_owned()
}

fn space_inline_code_in_prose(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len() + 8);
    let mut copied = 0;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'`' {
            i += 1;
            continue;
        }
        let run = backtick_run(bytes, i);
        if run != 1 {
            i += run;
            continue;
        }
        let Some(close) = single_tick_close(text, i + 1) else {
            i += 1;
            continue;
        };

        out.push_str(&text[copied..i]);
        let line_start = out.rfind('\n').map_or(0, |nl| nl + 1);
        let kept = out.trim_end_matches([' ', '\t']).len();
        if kept > line_start {
            out.truncate(kept);
            out.push(' ');
        }
        out.push_str(&text[i..=close]);
        out.push(' ');

        let mut next = close + 1;
        while matches!(bytes.get(next), Some(b' ' | b'\t')) {
            next += 1;
        }
        copied = next;
        i = next;
    }
    out.push_str(&text[copied..]);
    out
}

/// Index of the backtick closing a single-tick span opened before `from`.
fn single_tick_close(text: &str, from: usize) -> Option<usize> {
    let rest = &text[from..];
    let offset = rest.find(['`', '\n'])?;
    if offset == 0 || rest.as_bytes()[offset] != b'`' {
        return None;
    }
    let close = from + offset;
    if text.as_bytes().get(close + 1) == Some(&b'`') {
        return None;
    }
    Some(close)
}

fn backtick_run(bytes: &[u8], start: usize) -> usize {
    bytes[start..].iter().take_while(|&&b| b == b'`').count()
}

struct Segment<'a> {
    text: &'a str,
    fenced: bool,
}

/// Split text into alternating prose and fenced-code segments.
/// Fence lines belong to the fenced segment; an unclosed fence runs to the end.
fn split_fences(text: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut offset = 0;
    let mut in_fence = false;

    for line in text.split_inclusive('\n') {
        let is_fence = line.trim_start().starts_with("```");
        if is_fence && !in_fence {
            if offset > start {
                segments.push(Segment {
                    text: &text[start..offset],
                    fenced: false,
                });
            }
            start = offset;
            in_fence = true;
            offset += line.len();
        } else if is_fence {
            offset += line.len();
            segments.push(Segment {
                text: &text[start..offset],
                fenced: true,
            });
            start = offset;
            in_fence = false;
        } else {
            offset += line.len();
        }
    }
    if offset > start {
        segments.push(Segment {
            text: &text[start..offset],
            fenced: in_fence,
        });
    }
    segments
}

fn map_outside_fences(text: &str, f: impl Fn(&str) -> String) -> String {
    let mut out = String::with_capacity(text.len());
    for segment in split_fences(text) {
        if segment.fenced {
            out.push_str(segment.text);
        } else {
            out.push_str(&f(segment.text));
        }
    }
    out
}

/// Apply `f` to the text between code spans. A span opens with a run of
/// backticks and closes at the next run of the same length.
fn map_outside_code_spans(text: &str, f: &impl Fn(&str) -> String) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut plain_start = 0;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'`' {
            i += 1;
            continue;
        }
        let open = backtick_run(bytes, i);
        match closing_run(bytes, i + open, open) {
            Some(end) => {
                out.push_str(&f(&text[plain_start..i]));
                out.push_str(&text[i..end]);
                plain_start = end;
                i = end;
            }
            None => i += open,
        }
    }
    out.push_str(&f(&text[plain_start..]));
    out
}

fn closing_run(bytes: &[u8], from: usize, len: usize) -> Option<usize> {
    let mut j = from;
    while j < bytes.len() {
        if bytes[j] == b'`' {
            let run = backtick_run(bytes, j);
            if run == len {
                return Some(j + run);
            }
            j += run;
        } else {
            j += 1;
        }
    }
    None
}

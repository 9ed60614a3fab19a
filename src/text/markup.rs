// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Markup handling: tag stripping and HTML entity decoding.
//!
//! Stripping keeps entities encoded. The tokenizer decodes them on the fly and
//! keeps byte spans into the stripped text, so a snippet can highlight
//! `сущностях` and still print `&plus;` exactly as the author wrote it.

use quick_xml::escape::resolve_html5_entity;
use std::borrow::Cow;

/// Tags that end a block of text. They become line breaks, which the snippet
/// builder treats as sentence boundaries.
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt", "figcaption",
    "figure", "footer", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main", "nav",
    "ol", "p", "pre", "section", "table", "td", "th", "tr", "ul",
];

/// Tags whose whole body is dropped.
const SKIPPED_TAGS: &[&str] = &["script", "style"];

/// Longest entity name we try to resolve (`&CounterClockwiseContourIntegral;`).
const MAX_ENTITY_LEN: usize = 40;

/// Remove tags and comments, keeping entities as they are.
///
/// Block-level tags turn into `\n`, inline tags disappear so `wo<b>rd</b>`
/// still reads as one word. A `<` that does not open a tag is kept as text.
pub fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(lt) = rest.find('<') {
        out.push_str(&rest[..lt]);
        let tail = &rest[lt..];

        if let Some(comment) = tail.strip_prefix("<!--") {
            rest = match comment.find("-->") {
                Some(end) => &comment[end + 3..],
                None => "",
            };
            continue;
        }

        let Some(tag) = parse_tag(tail) else {
            out.push('<');
            rest = &tail[1..];
            continue;
        };

        if BLOCK_TAGS.contains(&tag.name.as_str()) {
            out.push('\n');
        }

        rest = &tail[tag.len..];
        if !tag.closing && SKIPPED_TAGS.contains(&tag.name.as_str()) {
            rest = skip_element_body(rest, &tag.name);
        }
    }

    out.push_str(rest);
    out
}

struct Tag {
    name: String,
    closing: bool,
    len: usize,
}

/// Parse `<name ...>`, `</name>` or `<!doctype ...>` at the start of `input`.
fn parse_tag(input: &str) -> Option<Tag> {
    let body = &input[1..];
    let (closing, body) = match body.strip_prefix('/') {
        Some(stripped) => (true, stripped),
        None => (false, body),
    };

    let first = body.chars().next()?;
    if !(first.is_ascii_alphabetic() || first == '!' || first == '?') {
        return None;
    }

    let end = input.find('>')?;
    let name = body
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase();

    Some(Tag {
        name,
        closing,
        len: end + 1,
    })
}

/// Skip everything up to and including `</name>`.
fn skip_element_body<'a>(input: &'a str, name: &str) -> &'a str {
    let closing = format!("</{}", name);
    let lower = input.to_ascii_lowercase();
    match lower.find(&closing) {
        Some(start) => match input[start..].find('>') {
            Some(end) => &input[start + end + 1..],
            None => "",
        },
        None => "",
    }
}

/// Decode the entity at the start of `input` (which must begin with `&`).
///
/// Returns the decoded text and the number of bytes consumed, or `None` when
/// the ampersand does not start a known entity.
pub fn decode_entity(input: &str) -> Option<(Cow<'static, str>, usize)> {
    let body = input.strip_prefix('&')?;
    let end = body.find(';')?;
    if end == 0 || end > MAX_ENTITY_LEN {
        return None;
    }
    let name = &body[..end];
    let consumed = end + 2;

    if let Some(number) = name.strip_prefix('#') {
        let code = match number.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => number.parse::<u32>().ok()?,
        };
        let decoded = char::from_u32(code)?;
        return Some((Cow::Owned(decoded.to_string()), consumed));
    }

    if !name.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    resolve_html5_entity(name).map(|decoded| (Cow::Borrowed(decoded), consumed))
}

/// Decode every entity in `text`; unknown ones are left untouched.
pub fn decode_entities(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        match decode_entity(tail) {
            Some((decoded, consumed)) => {
                out.push_str(&decoded);
                rest = &tail[consumed..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

//! Text normalization around the translation engine
//!
//! Japanese input is cleaned before it reaches the engine (invisible marks
//! removed, enclosing brackets detected) and the engine's English output is
//! cleaned before it reaches the caller (unknown-token markers, punctuation
//! glyphs, stray quotes). When the source was a bracketed quotation, the
//! English result is re-wrapped in ASCII double quotes.
//!
//! # Example
//!
//! ```
//! use ja2en::normalize::{post_filter, pre_filter, wrap_if_bracketed};
//!
//! let pre = pre_filter("「こんにちは」");
//! assert!(pre.is_bracket);
//!
//! let english = post_filter("Hello<unk>there");
//! assert_eq!(wrap_if_bracketed(&english, pre.is_bracket), "\"Hello there\"");
//! ```

use crate::mt::error::{MtError, MtResult};
use regex::Regex;
use std::sync::LazyLock;

/// Characters that open a bracketed span
pub const OPENING_BRACKETS: [char; 3] = ['『', '「', '('];

/// Characters that close a bracketed span
pub const CLOSING_BRACKETS: [char; 3] = ['」', '』', ')'];

/// Removed anywhere in the input: zero-width space, newline, ideographic space
pub const STRIPPED_CHARS: [char; 3] = ['\u{200b}', '\n', '\u{3000}'];

/// Quote-like characters dropped from either end of the engine output
pub const QUOTE_CHARS: [char; 6] = ['「', '」', '”', '“', '"', '\''];

/// Placeholder the engine emits for tokens it cannot translate
pub const UNKNOWN_TOKEN: &str = "<unk>";

/// Sentence terminators recognised by [`split_sentences`]
pub const SENTENCE_TERMINATORS: [char; 12] =
    ['.', '。', '?', '？', '!', '！', '♪', ':', '：', '」', '』', '〟'];

// Openers the truncated-quotation recovery searches for
const QUOTE_OPENERS: [char; 2] = ['「', '『'];

static UNICODE_ESCAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\u([0-9a-fA-F]{4})").unwrap());

/// Result of [`pre_filter`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreFiltered {
    /// Text to hand to the engine
    pub text: String,
    /// Whether the text is enclosed in a recognised bracket pair
    pub is_bracket: bool,
}

/// Decode literal `\uXXXX` escapes into the characters they name
///
/// An escape directly preceded by a backslash (`\\u3042`) is an escaped
/// backslash and is left alone. Two adjacent escapes forming a UTF-16
/// surrogate pair decode to a single character.
///
/// # Returns
///
/// * `Ok(String)` - The decoded text; input without escapes is returned as is
/// * `Err(MtError::DecodeError)` - If an escape names a lone surrogate
///
/// # Example
///
/// ```
/// use ja2en::normalize::decode_escapes;
///
/// assert_eq!(decode_escapes(r"\u3053\u3093").unwrap(), "こん");
/// assert_eq!(decode_escapes(r"\\u3053").unwrap(), r"\\u3053");
/// ```
pub fn decode_escapes(input: &str) -> MtResult<String> {
    // (start, end, code unit) of every escape that is not itself escaped
    let escapes: Vec<(usize, usize, u32)> = UNICODE_ESCAPE
        .captures_iter(input)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            if input[..whole.start()].ends_with('\\') {
                return None;
            }
            let code = u32::from_str_radix(&caps[1], 16).ok()?;
            Some((whole.start(), whole.end(), code))
        })
        .collect();

    if escapes.is_empty() {
        return Ok(input.to_string());
    }

    let mut decoded = String::with_capacity(input.len());
    let mut cursor = 0;
    let mut i = 0;

    while i < escapes.len() {
        let (start, end, code) = escapes[i];
        decoded.push_str(&input[cursor..start]);

        let (ch, consumed_to, consumed) = match code {
            0xD800..=0xDBFF => match escapes.get(i + 1) {
                Some(&(next_start, next_end, low @ 0xDC00..=0xDFFF)) if next_start == end => {
                    let scalar = 0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00);
                    (char::from_u32(scalar), next_end, 2)
                }
                _ => (None, end, 1),
            },
            _ => (char::from_u32(code), end, 1),
        };

        let ch = ch.ok_or_else(|| {
            MtError::DecodeError(format!(
                "'{}' is not a valid Unicode scalar value",
                &input[start..end]
            ))
        })?;

        decoded.push(ch);
        cursor = consumed_to;
        i += consumed;
    }

    decoded.push_str(&input[cursor..]);
    Ok(decoded)
}

/// Prepare raw Japanese input for the engine
///
/// Trims the text, strips [`STRIPPED_CHARS`] everywhere, and detects whether
/// the result is enclosed in brackets. When the text ends with a closing
/// bracket, everything up to and including the first `「` or `『` is replaced
/// by a single `「`, which collapses several concatenated quotation fragments
/// into one quoted span. Without any opener the text is left unchanged.
///
/// Empty input yields empty text with `is_bracket == false`.
pub fn pre_filter(input: &str) -> PreFiltered {
    let mut text: String = input
        .trim()
        .chars()
        .filter(|c| !STRIPPED_CHARS.contains(c))
        .collect();

    if text
        .chars()
        .next_back()
        .is_some_and(|c| CLOSING_BRACKETS.contains(&c))
    {
        if let Some((pos, opener)) = text
            .char_indices()
            .find(|(_, c)| QUOTE_OPENERS.contains(c))
        {
            text = format!("「{}", &text[pos + opener.len_utf8()..]);
        }
    }

    let is_bracket = matches!(
        (text.chars().next(), text.chars().next_back()),
        (Some(first), Some(last))
            if OPENING_BRACKETS.contains(&first) && CLOSING_BRACKETS.contains(&last)
    );

    PreFiltered { text, is_bracket }
}

/// Clean the engine's English output
///
/// Replaces [`UNKNOWN_TOKEN`] with a space, maps `―`, `’` and `` ` `` to
/// their ASCII equivalents, then drops one quote-like character from the
/// start and one from the end if present. Never fails, including on empty
/// or single-character input.
pub fn post_filter(translated: &str) -> String {
    let text = translated
        .trim()
        .replace(UNKNOWN_TOKEN, " ")
        .replace('―', "-")
        .replace('’', "'")
        .replace('`', "'");

    let is_quote = |c: char| QUOTE_CHARS.contains(&c);
    let body = text.strip_prefix(is_quote).unwrap_or(&text);
    let body = body.strip_suffix(is_quote).unwrap_or(body);

    body.to_string()
}

/// Surround `text` with ASCII double quotes when `is_bracket` is set
pub fn wrap_if_bracketed(text: &str, is_bracket: bool) -> String {
    if is_bracket {
        format!("\"{}\"", text)
    } else {
        text.to_string()
    }
}

/// Split text after every run of [`SENTENCE_TERMINATORS`]
///
/// Each sentence keeps its terminators; trailing text without a terminator
/// forms the last sentence. No empty sentences are produced.
///
/// # Example
///
/// ```
/// use ja2en::normalize::split_sentences;
///
/// assert_eq!(
///     split_sentences("はい。そうです！！本当"),
///     vec!["はい。", "そうです！！", "本当"]
/// );
/// ```
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut in_terminators = false;

    for c in text.chars() {
        let is_terminator = SENTENCE_TERMINATORS.contains(&c);
        if in_terminators && !is_terminator {
            sentences.push(std::mem::take(&mut current));
        }
        current.push(c);
        in_terminators = is_terminator;
    }

    if !current.is_empty() {
        sentences.push(current);
    }

    sentences
}

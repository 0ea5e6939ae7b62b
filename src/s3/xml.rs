//! Streaming XML parser for S3 response bodies
//!
//! A character-driven finite state machine that flattens one well-formed
//! XML document into an ordered sequence of leaf records. Each record pairs
//! the dotted root-to-leaf tag path (`ListBucketResult.Contents.Key`) with
//! the entity-decoded character data of that leaf. Only leaves with
//! non-empty text are emitted, in document order; repeated sibling
//! containers therefore show up as runs of identical paths, which is what
//! the response decoders key off.
//!
//! Attributes and processing instructions are recognized and discarded.

use crate::error::S3Error;

/// One leaf of the parsed document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlNode {
    /// Dotted root-to-leaf tag path
    pub path: String,
    /// Concatenated, entity-decoded character data
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Skipping until the next `<`
    Start,
    /// Just after `<`: a `?` means processing instruction, anything else
    /// starts a tag name
    Processing,
    /// Accumulating an element name
    TagName,
    /// Discarding attributes until `>`
    TagAttr,
    /// Accumulating character data
    Body,
    /// Accumulating an entity name until `;`
    Entity,
    /// Just after `<` inside a body: `/` means closing tag, anything else a
    /// child element
    Tag,
    /// Matching a closing tag name character by character
    TagClose,
    /// Closing tag fully matched; emit the leaf and pop
    Emit,
}

/// Parse one XML document into its ordered leaf sequence.
pub fn parse(xml: &str) -> Result<Vec<XmlNode>, S3Error> {
    let mut nodes = Vec::new();
    let mut state = State::Start;

    let mut tag = String::new();
    let mut body = String::new();
    let mut path = String::new();
    let mut entity = String::new();
    let mut close_chars: Vec<char> = Vec::new();
    let mut close_idx = 0usize;
    let mut stack: Vec<String> = Vec::new();

    for ch in xml.chars() {
        match state {
            State::Start => {
                if ch == '<' {
                    state = State::Processing;
                }
            }
            State::Processing => {
                // Processing instructions are self-contained; skip back to
                // Start, which eats the PI contents until the next '<'.
                if ch == '?' {
                    state = State::Start;
                } else {
                    state = State::TagName;
                    tag.push(ch);
                    let bytes = path.as_bytes();
                    if bytes.len() >= 2 && bytes[bytes.len() - 2] != b'.' {
                        path.push('.');
                    }
                    path.push(ch);
                }
            }
            State::TagName => {
                if ch == ' ' {
                    state = State::TagAttr;
                } else if ch == '>' {
                    state = State::Body;
                    stack.push(std::mem::take(&mut tag));
                } else {
                    tag.push(ch);
                    path.push(ch);
                }
            }
            State::TagAttr => {
                if ch == '>' {
                    state = State::Body;
                    stack.push(std::mem::take(&mut tag));
                }
            }
            State::Body => {
                if ch == '<' {
                    state = State::Tag;
                } else if ch == '&' {
                    state = State::Entity;
                } else {
                    body.push(ch);
                }
            }
            State::Entity => {
                if ch == ';' {
                    state = State::Body;
                    body.push(decode_entity(&entity)?);
                    entity.clear();
                } else {
                    entity.push(ch);
                }
            }
            State::Tag => {
                if ch == '/' {
                    state = State::TagClose;
                    if close_idx == 0 {
                        let expected = stack.last().ok_or_else(|| {
                            S3Error::Decode("closing tag without an open element".to_string())
                        })?;
                        close_chars = expected.chars().collect();
                    }
                } else {
                    tag.push(ch);
                    path.push('.');
                    path.push(ch);
                    state = State::Processing;
                }
            }
            State::TagClose => {
                if close_chars.get(close_idx).copied() != Some(ch) {
                    return Err(S3Error::Decode(format!(
                        "invalid closing tag: expected </{}>, found {:?}",
                        close_chars.iter().collect::<String>(),
                        ch
                    )));
                }
                close_idx += 1;
                if close_idx == close_chars.len() {
                    state = State::Emit;
                    close_idx = 0;
                }
            }
            State::Emit => {
                // The current character is the '>' of the closing tag; it is
                // consumed here without inspection.
                if stack.pop().is_none() {
                    return Err(S3Error::Decode("tag stack is empty".to_string()));
                }
                if !body.is_empty() {
                    nodes.push(XmlNode {
                        path: path.clone(),
                        value: std::mem::take(&mut body),
                    });
                }
                state = State::Body;
                if let Some(pos) = path.rfind('.') {
                    path.truncate(pos);
                }
                close_chars.clear();
            }
        }
    }

    if tag.is_empty() && close_chars.is_empty() && body.is_empty() && stack.is_empty() {
        Ok(nodes)
    } else {
        Err(S3Error::Decode(
            "unexpected end of XML document".to_string(),
        ))
    }
}

/// Decode a single entity name (the text between `&` and `;`).
///
/// Named entities cover the XML built-ins; numeric entities (`#34`,
/// `#x22`) decode their code point. Anything else is malformed.
fn decode_entity(entity: &str) -> Result<char, S3Error> {
    match entity {
        "quot" => Ok('"'),
        "apos" => Ok('\''),
        "lt" => Ok('<'),
        "gt" => Ok('>'),
        "amp" => Ok('&'),
        _ if entity.starts_with('#') => {
            let code = parse_int::<u32>(entity)?;
            char::from_u32(code)
                .ok_or_else(|| S3Error::Decode(format!("invalid character code in entity: &{entity};")))
        }
        _ => Err(S3Error::Decode(format!("unknown XML entity: &{entity};"))),
    }
}

/// Parse an integer: plain base-10, or an XML numeric entity form where a
/// leading `#` selects decimal and `#x`/`#X` selects hexadecimal.
pub fn parse_int<T>(s: &str) -> Result<T, S3Error>
where
    T: TryFrom<i64>,
{
    let (digits, radix) = if let Some(rest) = s.strip_prefix('#') {
        if let Some(hex) = rest.strip_prefix(['x', 'X']) {
            (hex, 16)
        } else {
            (rest, 10)
        }
    } else {
        (s, 10)
    };

    let value = i64::from_str_radix(digits, radix)
        .map_err(|_| S3Error::Decode(format!("unable to parse number from {s:?}")))?;
    T::try_from(value).map_err(|_| S3Error::Decode(format!("number out of range: {s:?}")))
}

/// Parse a boolean, accepting exactly `true`, `True`, `false`, `False`.
pub fn parse_bool(s: &str) -> Result<bool, S3Error> {
    match s {
        "true" | "True" => Ok(true),
        "false" | "False" => Ok(false),
        _ => Err(S3Error::Decode(format!(
            "unable to parse boolean from {s:?}"
        ))),
    }
}

//! Minimal XML tree reader for `svn log --xml` output
//!
//! Uses winnow for parsing (not regex) so malformed exports are rejected
//! with a position instead of being half-read. Supports what Subversion
//! emits: declaration, comments, elements with quoted attributes, text,
//! CDATA and the predefined/numeric entity references. No DTD processing.

use crate::core::error::LogError;
use std::fmt;
use winnow::ascii::{multispace0, multispace1};
use winnow::combinator::{alt, cut_err, delimited, fail, opt, preceded, repeat};
use winnow::error::StrContext;
use winnow::prelude::*;
use winnow::token::{take_till, take_until, take_while};

/// Deepest element nesting accepted; `svn log --xml` needs four levels
const MAX_DEPTH: usize = 64;

/// An element with its attributes and children, in document order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
  pub name: String,
  pub attributes: Vec<(String, String)>,
  pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
  Element(Element),
  Text(String),
}

impl Element {
  /// Attribute value by name
  pub fn attribute(&self, name: &str) -> Option<&str> {
    self
      .attributes
      .iter()
      .find(|(key, _)| key == name)
      .map(|(_, value)| value.as_str())
  }

  /// Child elements, skipping text
  pub fn elements(&self) -> impl Iterator<Item = &Element> {
    self.children.iter().filter_map(|node| match node {
      Node::Element(element) => Some(element),
      Node::Text(_) => None,
    })
  }

  /// First child element with the given name
  pub fn child(&self, name: &str) -> Option<&Element> {
    self.elements().find(|element| element.name == name)
  }

  /// Concatenated direct text content
  pub fn text(&self) -> String {
    self
      .children
      .iter()
      .filter_map(|node| match node {
        Node::Text(text) => Some(text.as_str()),
        Node::Element(_) => None,
      })
      .collect()
  }
}

/// Parse a complete document and return its root element
pub fn parse_document(input: &str) -> Result<Element, LogError> {
  let normalized = input.strip_prefix('\u{feff}').unwrap_or(input).replace("\r\n", "\n");

  document.parse(normalized.as_str()).map_err(|e| {
    let offset = e.offset();
    let line = normalized.as_bytes()[..offset.min(normalized.len())]
      .iter()
      .filter(|b| **b == b'\n')
      .count()
      + 1;
    LogError::Malformed {
      line,
      reason: e.inner().to_string(),
    }
  })
}

fn document(input: &mut &str) -> ModalResult<Element> {
  misc(input)?;
  let root = (|i: &mut &str| element(i, 0))
    .context(StrContext::Label("root element"))
    .parse_next(input)?;
  misc(input)?;
  Ok(root)
}

/// Whitespace, comments, processing instructions and doctype outside the root
fn misc(input: &mut &str) -> ModalResult<()> {
  repeat(
    0..,
    alt((multispace1.void(), comment, processing_instruction, doctype)),
  )
  .parse_next(input)
}

fn comment(input: &mut &str) -> ModalResult<()> {
  ("<!--", take_until(0.., "-->"), "-->").void().parse_next(input)
}

fn processing_instruction(input: &mut &str) -> ModalResult<()> {
  ("<?", take_until(0.., "?>"), "?>").void().parse_next(input)
}

fn doctype(input: &mut &str) -> ModalResult<()> {
  ("<!DOCTYPE", take_till(0.., '>'), '>').void().parse_next(input)
}

fn name<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
  take_while(1.., |c: char| c.is_alphanumeric() || matches!(c, '_' | '-' | ':' | '.')).parse_next(input)
}

fn element(input: &mut &str, depth: usize) -> ModalResult<Element> {
  let tag = preceded('<', name).parse_next(input)?;
  if depth >= MAX_DEPTH {
    return cut_err(fail)
      .context(StrContext::Label("element nesting depth"))
      .parse_next(input);
  }
  let attributes: Vec<(String, String)> = repeat(0.., preceded(multispace1, attribute)).parse_next(input)?;
  multispace0.parse_next(input)?;

  if opt("/>").parse_next(input)?.is_some() {
    return Ok(Element {
      name: tag.to_string(),
      attributes,
      children: Vec::new(),
    });
  }

  cut_err('>').context(StrContext::Label("start tag")).parse_next(input)?;
  let children: Vec<Option<Node>> = repeat(0.., |i: &mut &str| node(i, depth + 1)).parse_next(input)?;
  cut_err(delimited(
    "</",
    name.verify(move |close: &str| close == tag),
    (multispace0, '>'),
  ))
  .context(StrContext::Label("matching end tag"))
  .parse_next(input)?;

  Ok(Element {
    name: tag.to_string(),
    attributes,
    children: children.into_iter().flatten().collect(),
  })
}

fn attribute(input: &mut &str) -> ModalResult<(String, String)> {
  let key = name.parse_next(input)?;
  (multispace0, '=', multispace0).void().parse_next(input)?;
  let value = alt((
    delimited('"', take_till(0.., '"'), '"'),
    delimited('\'', take_till(0.., '\''), '\''),
  ))
  .try_map(unescape)
  .parse_next(input)?;
  Ok((key.to_string(), value))
}

fn node(input: &mut &str, depth: usize) -> ModalResult<Option<Node>> {
  alt((
    comment.value(None),
    cdata.map(|text: &str| Some(Node::Text(text.to_string()))),
    (|i: &mut &str| element(i, depth)).map(|element| Some(Node::Element(element))),
    text.map(|text| Some(Node::Text(text))),
  ))
  .parse_next(input)
}

fn cdata<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
  delimited("<![CDATA[", take_until(0.., "]]>"), "]]>").parse_next(input)
}

fn text(input: &mut &str) -> ModalResult<String> {
  take_till(1.., '<').try_map(unescape).parse_next(input)
}

/// Unknown or unterminated entity reference
#[derive(Debug)]
struct EntityError(String);

impl fmt::Display for EntityError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "invalid entity reference '&{}'", self.0)
  }
}

impl std::error::Error for EntityError {}

fn unescape(raw: &str) -> Result<String, EntityError> {
  if !raw.contains('&') {
    return Ok(raw.to_string());
  }

  let mut out = String::with_capacity(raw.len());
  let mut rest = raw;
  while let Some(start) = rest.find('&') {
    out.push_str(&rest[..start]);
    let after = &rest[start + 1..];
    let end = after.find(';').ok_or_else(|| EntityError(after.chars().take(8).collect()))?;
    let entity = &after[..end];
    let decoded = match entity {
      "amp" => '&',
      "lt" => '<',
      "gt" => '>',
      "quot" => '"',
      "apos" => '\'',
      _ => decode_char_ref(entity).ok_or_else(|| EntityError(entity.to_string()))?,
    };
    out.push(decoded);
    rest = &after[end + 1..];
  }
  out.push_str(rest);

  Ok(out)
}

fn decode_char_ref(entity: &str) -> Option<char> {
  let digits = entity.strip_prefix('#')?;
  let code = match digits.strip_prefix('x').or_else(|| digits.strip_prefix('X')) {
    Some(hex) => u32::from_str_radix(hex, 16).ok()?,
    None => digits.parse().ok()?,
  };
  char::from_u32(code)
}

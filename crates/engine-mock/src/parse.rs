use std::sync::Arc;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use renderpath::ParseError;

use crate::node::{Content, Element, MockDocument};

struct OpenElement {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<BuiltChild>,
}

enum BuiltChild {
    Element(Arc<Element>),
    Text(String),
}

impl OpenElement {
    /// Adjacent text runs (plain text, resolved references, CDATA) are merged
    /// into one text node.
    fn push_text(&mut self, text: &str) {
        if let Some(BuiltChild::Text(existing)) = self.children.last_mut() {
            existing.push_str(text);
        } else {
            self.children.push(BuiltChild::Text(text.to_owned()));
        }
    }

    /// Whitespace-only text runs (indentation between elements) are dropped
    /// when the element closes.
    fn close(self) -> Arc<Element> {
        let children = self
            .children
            .into_iter()
            .filter_map(|child| match child {
                BuiltChild::Element(element) => Some(Content::Element(element)),
                BuiltChild::Text(text) => {
                    if text.chars().all(char::is_whitespace) {
                        None
                    } else {
                        Some(Content::Text(Arc::from(text.as_str())))
                    }
                }
            })
            .collect();
        Arc::new(Element { name: self.name, attributes: self.attributes, children })
    }
}

/// quick-xml events folded into an owned element tree. Comments, declarations
/// and processing instructions are skipped.
pub(crate) fn parse_document(raw_xml: &str) -> Result<MockDocument, ParseError> {
    let mut reader = Reader::from_str(raw_xml);
    let mut stack: Vec<OpenElement> = Vec::new();
    let mut root: Option<Arc<Element>> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref start)) => {
                if root.is_some() && stack.is_empty() {
                    return Err(ParseError::new("content after the root element"));
                }
                stack.push(open_element(start)?);
            }
            Ok(Event::Empty(ref start)) => {
                if root.is_some() && stack.is_empty() {
                    return Err(ParseError::new("content after the root element"));
                }
                attach(&mut stack, &mut root, open_element(start)?.close());
            }
            Ok(Event::End(ref end)) => {
                let open = stack
                    .pop()
                    .ok_or_else(|| ParseError::new("closing tag without an open element"))?;
                let name = decode(end.name().as_ref())?;
                if name != open.name {
                    return Err(ParseError::new(format!(
                        "mismatched closing tag </{name}>, expected </{}>",
                        open.name
                    )));
                }
                attach(&mut stack, &mut root, open.close());
            }
            Ok(Event::Text(ref text)) => {
                let text =
                    text.decode().map_err(|error| ParseError::new(error.to_string()))?;
                match stack.last_mut() {
                    Some(open) => open.push_text(&text),
                    None if text.chars().all(char::is_whitespace) => {}
                    None => return Err(ParseError::new("text outside the root element")),
                }
            }
            Ok(Event::GeneralRef(ref reference)) => {
                let name = decode(reference)?;
                let Some(value) = resolve_reference(&name) else {
                    return Err(ParseError::new(format!("unknown entity reference &{name};")));
                };
                match stack.last_mut() {
                    Some(open) => open.push_text(&value),
                    None => return Err(ParseError::new("reference outside the root element")),
                }
            }
            Ok(Event::CData(ref cdata)) => {
                let text = std::str::from_utf8(cdata.as_ref())
                    .map_err(|error| ParseError::new(error.to_string()))?;
                match stack.last_mut() {
                    Some(open) => open.push_text(text),
                    None => return Err(ParseError::new("content after the root element")),
                }
            }
            Ok(Event::Eof) => {
                if let Some(open) = stack.last() {
                    return Err(ParseError::new(format!("unclosed element <{}>", open.name)));
                }
                break;
            }
            Ok(_) => {}
            Err(error) => {
                return Err(ParseError::new(format!(
                    "{error} at position {}",
                    reader.error_position()
                )));
            }
        }
    }

    match root {
        Some(root) => Ok(MockDocument { root }),
        None => Err(ParseError::new("no root element")),
    }
}

fn open_element(start: &BytesStart) -> Result<OpenElement, ParseError> {
    let name = decode(start.name().as_ref())?;
    let mut attributes = Vec::new();
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|error| ParseError::new(error.to_string()))?;
        let key = decode(attribute.key.as_ref())?;
        let value = attribute
            .unescape_value()
            .map_err(|error| ParseError::new(error.to_string()))?
            .into_owned();
        attributes.push((key, value));
    }
    Ok(OpenElement { name, attributes, children: Vec::new() })
}

fn attach(stack: &mut [OpenElement], root: &mut Option<Arc<Element>>, element: Arc<Element>) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(BuiltChild::Element(element)),
        None => *root = Some(element),
    }
}

fn decode(bytes: &[u8]) -> Result<String, ParseError> {
    std::str::from_utf8(bytes)
        .map(str::to_owned)
        .map_err(|error| ParseError::new(error.to_string()))
}

/// Predefined entities and numeric character references; anything else is an
/// unknown entity (no DTD support).
fn resolve_reference(name: &str) -> Option<String> {
    match name {
        "amp" => Some("&".to_owned()),
        "lt" => Some("<".to_owned()),
        "gt" => Some(">".to_owned()),
        "apos" => Some("'".to_owned()),
        "quot" => Some("\"".to_owned()),
        _ => {
            let digits = name.strip_prefix('#')?;
            let code = if let Some(hex) =
                digits.strip_prefix('x').or_else(|| digits.strip_prefix('X'))
            {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                digits.parse().ok()?
            };
            char::from_u32(code).map(String::from)
        }
    }
}

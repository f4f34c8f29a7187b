//! Minimal element tree over `quick-xml`.
//!
//! Pencil documents are small attribute-only trees, so the whole file is read
//! into [`XmlElement`]s and written back out in one pass. Text nodes are not
//! kept.

use std::path::Path;
use std::str::FromStr;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::constants::XML_INDENT_SIZE;
use crate::error::{FileError, FileResult};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_attr(mut self, key: &str, value: impl ToString) -> Self {
        self.set_attr(key, value);
        self
    }

    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(child);
        self
    }

    pub fn set_attr(&mut self, key: &str, value: impl ToString) {
        let value = value.to_string();
        match self.attributes.iter_mut().find(|(k, _)| k == key) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((key.to_string(), value)),
        }
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Typed attribute with a fallback for both missing and unparsable values.
    pub fn attr_or<T: FromStr>(&self, key: &str, default: T) -> T {
        self.attr(key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }

    /// `"true"` is the only truthy spelling, as written by the editor.
    pub fn attr_flag(&self, key: &str) -> bool {
        self.attr(key) == Some("true")
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.children.iter().filter(move |c| c.name == name)
    }
}

/// A parsed file: the `<!DOCTYPE ...>` name and the root element.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct XmlDocument {
    pub doctype: Option<String>,
    pub root: Option<XmlElement>,
}

/// Read and parse the XML file at `path`.
///
/// Only failing to read the file is `CannotOpen`; content that is not UTF-8
/// is invalid XML.
pub fn read_document(path: &Path) -> FileResult<XmlDocument> {
    let bytes = std::fs::read(path).map_err(|e| FileError::cannot_open(path, e))?;
    let text = String::from_utf8(bytes).map_err(|e| {
        FileError::invalid_xml(format!("{} is not UTF-8: {}", path.display(), e))
    })?;
    parse_document(&text)
}

pub fn parse_document(text: &str) -> FileResult<XmlDocument> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut document = XmlDocument::default();
    let mut stack: Vec<XmlElement> = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if stack.is_empty() && document.root.is_some() {
                    return Err(FileError::invalid_xml("more than one root element"));
                }
                stack.push(element_from(&e)?);
            }
            Ok(Event::Empty(e)) => {
                let element = element_from(&e)?;
                attach(&mut stack, &mut document.root, element)?;
            }
            Ok(Event::End(_)) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| FileError::invalid_xml("unbalanced end tag"))?;
                attach(&mut stack, &mut document.root, element)?;
            }
            Ok(Event::DocType(e)) => {
                let raw = String::from_utf8_lossy(&e).into_owned();
                document.doctype = raw.split_whitespace().next().map(str::to_string);
            }
            Ok(Event::Text(e)) => {
                if stack.is_empty() && !e.iter().all(u8::is_ascii_whitespace) {
                    return Err(FileError::invalid_xml("text outside of the root element"));
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(FileError::invalid_xml(format!(
                    "at byte {}: {}",
                    reader.buffer_position(),
                    e
                )));
            }
        }
    }

    if let Some(open) = stack.last() {
        return Err(FileError::invalid_xml(format!(
            "element <{}> is never closed",
            open.name
        )));
    }
    if document.doctype.is_none() && document.root.is_none() {
        return Err(FileError::invalid_xml("document is empty"));
    }
    Ok(document)
}

fn element_from(start: &BytesStart<'_>) -> FileResult<XmlElement> {
    let mut element = XmlElement::new(String::from_utf8_lossy(start.name().as_ref()));
    for attr in start.attributes() {
        let attr = attr.map_err(|e| FileError::invalid_xml(e.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| FileError::invalid_xml(e.to_string()))?
            .into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> FileResult<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
    } else if root.is_some() {
        return Err(FileError::invalid_xml("more than one root element"));
    } else {
        *root = Some(element);
    }
    Ok(())
}

/// Serialize `root` under `<!DOCTYPE doctype>` with two-space indentation.
pub fn write_document(doctype: &str, root: &XmlElement) -> FileResult<Vec<u8>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', XML_INDENT_SIZE);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(write_error)?;
    writer
        .write_event(Event::DocType(BytesText::from_escaped(format!(" {}", doctype))))
        .map_err(write_error)?;
    write_element(&mut writer, root)?;

    let mut bytes = writer.into_inner();
    bytes.push(b'\n');
    Ok(bytes)
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &XmlElement) -> FileResult<()> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children.is_empty() {
        writer.write_event(Event::Empty(start)).map_err(write_error)?;
        return Ok(());
    }

    writer.write_event(Event::Start(start)).map_err(write_error)?;
    for child in &element.children {
        write_element(writer, child)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(element.name.as_str())))
        .map_err(write_error)?;
    Ok(())
}

fn write_error(e: impl std::fmt::Display) -> FileError {
    FileError::Io(std::io::Error::other(e.to_string()))
}

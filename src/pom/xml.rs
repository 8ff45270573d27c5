//! Lossless XML element tree built on the quick-xml event reader/writer.
//!
//! Every node the reader produces is kept, including inter-element
//! whitespace, comments and the XML declaration, so a document that is
//! parsed and written back without edits comes out byte-identical (modulo
//! end-tag whitespace such as `</a >`). Edits only touch the nodes they
//! target and indent new elements to match their siblings.

use std::borrow::Cow;

use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesPI, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

#[derive(Debug, thiserror::Error)]
pub enum XmlError {
    #[error("malformed XML at byte {position}: {message}")]
    Malformed { position: u64, message: String },
    #[error("unclosed element <{0}> at end of document")]
    Unclosed(String),
    #[error("document has no root element")]
    NoRoot,
    #[error("expected root element <{expected}>, found <{found}>")]
    UnexpectedRoot {
        expected: &'static str,
        found: String,
    },
    #[error("failed to serialize XML: {0}")]
    Write(String),
}

/// Whitespace applied to nodes the editor inserts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// One level of indentation.
    pub unit: String,
    /// Line terminator, `"\n"` or `"\r\n"`.
    pub newline: &'static str,
}

impl Layout {
    pub fn new(unit: impl Into<String>, newline: &'static str) -> Self {
        Self {
            unit: unit.into(),
            newline,
        }
    }

    /// Line terminator of the first line break in `content`, LF when there is none.
    pub fn detect_newline(content: &str) -> &'static str {
        match content.find('\n') {
            Some(i) if content[..i].ends_with('\r') => "\r\n",
            _ => "\n",
        }
    }

    fn break_to(&self, indent: &str) -> Node {
        Node::Text(format!("{}{indent}", self.newline))
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::new("    ", "\n")
    }
}

/// A single node inside an element or at document level.
///
/// Textual payloads are stored exactly as they appear in the source
/// (still escaped), so writing them back is a verbatim copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    CData(String),
    Comment(String),
    ProcessingInstruction(String),
    Declaration(String),
    DocType(String),
}

impl Node {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Element(e) => Some(e),
            _ => None,
        }
    }

    fn is_whitespace(&self) -> bool {
        matches!(self, Node::Text(t) if t.chars().all(char::is_whitespace))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    /// Raw start-tag content: the name followed by attributes as written.
    start: String,
    children: Vec<Node>,
    self_closing: bool,
    /// Leading whitespace of the line this element starts on, when known.
    indent: Option<String>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            start: name.clone(),
            name,
            children: Vec::new(),
            self_closing: false,
            indent: None,
        }
    }

    /// Create an element holding a single (escaped) text value.
    pub fn with_text(name: impl Into<String>, value: &str) -> Self {
        let mut element = Self::new(name);
        element.set_text(value);
        element
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name without any namespace prefix.
    pub fn local_name(&self) -> &str {
        self.name.rsplit(':').next().unwrap_or(&self.name)
    }

    pub fn indent(&self) -> Option<&str> {
        self.indent.as_deref()
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(Node::as_element_mut)
    }

    pub fn child(&self, name: &str) -> Option<&Element> {
        self.elements().find(|e| e.local_name() == name)
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut Element> {
        self.elements_mut().find(|e| e.local_name() == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.elements().filter(move |e| e.local_name() == name)
    }

    /// Walk a path of child names, returning the first match at each level.
    pub fn descendant(&self, path: &[&str]) -> Option<&Element> {
        path.iter().try_fold(self, |el, name| el.child(name))
    }

    pub fn descendant_mut(&mut self, path: &[&str]) -> Option<&mut Element> {
        let mut current = self;
        for name in path {
            current = current.child_mut(name)?;
        }
        Some(current)
    }

    /// Unescaped, trimmed text content of this element.
    pub fn text(&self) -> String {
        let mut raw = String::new();
        for node in &self.children {
            match node {
                Node::Text(t) => raw.push_str(&unescape_lossy(t)),
                Node::CData(c) => raw.push_str(c),
                _ => {}
            }
        }
        raw.trim().to_string()
    }

    pub fn child_text(&self, name: &str) -> Option<String> {
        self.child(name).map(Element::text)
    }

    /// Replace all content with a single text node.
    pub fn set_text(&mut self, value: &str) {
        self.children = vec![Node::Text(quick_xml::escape::escape(value).into_owned())];
        self.self_closing = false;
    }

    /// Set the text of child `name`, appending the child if missing.
    pub fn set_child_text(&mut self, name: &str, value: &str, layout: &Layout) {
        match self.child_mut(name) {
            Some(child) => child.set_text(value),
            None => {
                self.append_element(Element::with_text(name, value), layout);
            }
        }
    }

    /// Return child `name`, appending an empty one if missing.
    pub fn ensure_child(&mut self, name: &str, layout: &Layout) -> &mut Element {
        let index = match self.position_of(name) {
            Some(i) => i,
            None => self.append_element(Element::new(name), layout),
        };
        self.element_at_mut(index)
    }

    /// Append `child` after the last existing node, matching sibling
    /// indentation. Returns the node index of the inserted element.
    pub fn append_element(&mut self, mut child: Element, layout: &Layout) -> usize {
        let own_indent = self.indent.clone().unwrap_or_default();
        let child_indent = self
            .elements()
            .find_map(|e| e.indent.clone())
            .unwrap_or_else(|| format!("{own_indent}{}", layout.unit));
        child.reindent(&child_indent, layout);
        self.self_closing = false;

        if trailing_indent(&self.children).is_some() {
            let at = self.children.len() - 1;
            self.children.insert(at, layout.break_to(&child_indent));
            self.children.insert(at + 1, Node::Element(child));
            at + 1
        } else {
            self.children.push(layout.break_to(&child_indent));
            self.children.push(Node::Element(child));
            self.children.push(layout.break_to(&own_indent));
            self.children.len() - 2
        }
    }

    /// Insert `child` directly after the first child named `anchor`, or at
    /// the end when there is no such child.
    pub fn insert_element_after(&mut self, anchor: &str, mut child: Element, layout: &Layout) {
        let Some(anchor_index) = self.position_of(anchor) else {
            self.append_element(child, layout);
            return;
        };
        let child_indent = self.children[anchor_index]
            .as_element()
            .and_then(|e| e.indent.clone())
            .unwrap_or_else(|| {
                format!("{}{}", self.indent.clone().unwrap_or_default(), layout.unit)
            });
        child.reindent(&child_indent, layout);
        self.children
            .insert(anchor_index + 1, layout.break_to(&child_indent));
        self.children.insert(anchor_index + 2, Node::Element(child));
    }

    /// Remove the first child element matching `predicate`, together with
    /// the whitespace run directly before it.
    pub fn remove_first_element_where<F>(&mut self, predicate: F) -> Option<Element>
    where
        F: Fn(&Element) -> bool,
    {
        let index = self
            .children
            .iter()
            .position(|n| n.as_element().is_some_and(&predicate))?;
        let removed = self.children.remove(index);
        if index > 0 && self.children[index - 1].is_whitespace() {
            self.children.remove(index - 1);
        }
        match removed {
            Node::Element(e) => Some(e),
            _ => None,
        }
    }

    fn position_of(&self, name: &str) -> Option<usize> {
        self.children
            .iter()
            .position(|n| n.as_element().is_some_and(|e| e.local_name() == name))
    }

    fn element_at_mut(&mut self, index: usize) -> &mut Element {
        match &mut self.children[index] {
            Node::Element(e) => e,
            _ => unreachable!("node {index} was located as an element"),
        }
    }

    /// Re-derive indentation for a freshly built element and its
    /// whitespace-laid-out children.
    fn reindent(&mut self, indent: &str, layout: &Layout) {
        self.indent = Some(indent.to_string());
        let has_elements = self.elements().next().is_some();
        if !has_elements {
            return;
        }
        let inner = format!("{indent}{}", layout.unit);
        let mut rebuilt = Vec::with_capacity(self.children.len());
        for node in self.children.drain(..) {
            match node {
                Node::Element(mut e) => {
                    e.reindent(&inner, layout);
                    rebuilt.push(layout.break_to(&inner));
                    rebuilt.push(Node::Element(e));
                }
                n if n.is_whitespace() => {}
                other => rebuilt.push(other),
            }
        }
        rebuilt.push(layout.break_to(indent));
        self.children = rebuilt;
    }
}

const BOM: char = '\u{FEFF}';

/// A parsed XML document: the nodes before the root element, the root
/// element itself, and whatever trails it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDocument {
    /// Input started with a UTF-8 byte order mark.
    bom: bool,
    prolog: Vec<Node>,
    root: Element,
    epilog: Vec<Node>,
}

impl XmlDocument {
    pub fn parse(content: &str) -> Result<Self, XmlError> {
        let bom = content.starts_with(BOM);
        let content = content.strip_prefix(BOM).unwrap_or(content);
        let mut reader = Reader::from_str(content);
        reader.config_mut().trim_text(false);

        let mut nodes: Vec<Node> = Vec::new();
        let mut stack: Vec<Element> = Vec::new();

        loop {
            let event = reader.read_event().map_err(|e| XmlError::Malformed {
                position: reader.error_position(),
                message: e.to_string(),
            })?;

            let node = match event {
                Event::Start(e) => {
                    let indent = trailing_indent(stack.last().map_or(&nodes, |p| &p.children));
                    stack.push(Element {
                        name: String::from_utf8_lossy(e.name().as_ref()).into_owned(),
                        start: String::from_utf8_lossy(&e).into_owned(),
                        children: Vec::new(),
                        self_closing: false,
                        indent,
                    });
                    continue;
                }
                Event::End(_) => match stack.pop() {
                    Some(element) => Node::Element(element),
                    None => {
                        return Err(XmlError::Malformed {
                            position: reader.buffer_position(),
                            message: "unexpected closing tag".to_string(),
                        })
                    }
                },
                Event::Empty(e) => Node::Element(Element {
                    name: String::from_utf8_lossy(e.name().as_ref()).into_owned(),
                    start: String::from_utf8_lossy(&e).into_owned(),
                    children: Vec::new(),
                    self_closing: true,
                    indent: trailing_indent(stack.last().map_or(&nodes, |p| &p.children)),
                }),
                Event::Text(e) => Node::Text(String::from_utf8_lossy(&e).into_owned()),
                Event::GeneralRef(e) => Node::Text(format!("&{};", String::from_utf8_lossy(&e))),
                Event::CData(e) => Node::CData(String::from_utf8_lossy(&e).into_owned()),
                Event::Comment(e) => Node::Comment(String::from_utf8_lossy(&e).into_owned()),
                Event::Decl(e) => Node::Declaration(String::from_utf8_lossy(&e).into_owned()),
                Event::PI(e) => {
                    Node::ProcessingInstruction(String::from_utf8_lossy(&e).into_owned())
                }
                Event::DocType(e) => Node::DocType(String::from_utf8_lossy(&e).into_owned()),
                Event::Eof => break,
            };

            match stack.last_mut() {
                Some(parent) => parent.children.push(node),
                None => nodes.push(node),
            }
        }

        if let Some(open) = stack.pop() {
            return Err(XmlError::Unclosed(open.name));
        }

        let root_index = nodes
            .iter()
            .position(|n| n.as_element().is_some())
            .ok_or(XmlError::NoRoot)?;
        let epilog = nodes.split_off(root_index + 1);
        let root = match nodes.pop() {
            Some(Node::Element(root)) => root,
            _ => return Err(XmlError::NoRoot),
        };

        Ok(Self {
            bom,
            prolog: nodes,
            root,
            epilog,
        })
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Element {
        &mut self.root
    }

    pub fn to_xml_string(&self) -> Result<String, XmlError> {
        let mut writer = Writer::new(Vec::new());
        for node in &self.prolog {
            write_node(&mut writer, node)?;
        }
        write_element(&mut writer, &self.root)?;
        for node in &self.epilog {
            write_node(&mut writer, node)?;
        }
        let body =
            String::from_utf8(writer.into_inner()).map_err(|e| XmlError::Write(e.to_string()))?;
        Ok(if self.bom { format!("{BOM}{body}") } else { body })
    }
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &Element) -> Result<(), XmlError> {
    let start = BytesStart::from_content(element.start.as_str(), element.name.len());
    if element.children.is_empty() && element.self_closing {
        return emit(writer, Event::Empty(start));
    }
    emit(writer, Event::Start(start))?;
    for child in &element.children {
        write_node(writer, child)?;
    }
    emit(writer, Event::End(BytesEnd::new(element.name.as_str())))
}

fn write_node(writer: &mut Writer<Vec<u8>>, node: &Node) -> Result<(), XmlError> {
    match node {
        Node::Element(element) => write_element(writer, element),
        Node::Text(raw) => emit(writer, Event::Text(BytesText::from_escaped(raw.as_str()))),
        Node::CData(raw) => emit(writer, Event::CData(BytesCData::new(raw.as_str()))),
        Node::Comment(raw) => emit(writer, Event::Comment(BytesText::from_escaped(raw.as_str()))),
        Node::ProcessingInstruction(raw) => emit(writer, Event::PI(BytesPI::new(raw.as_str()))),
        Node::Declaration(raw) => emit(
            writer,
            Event::Decl(BytesDecl::from_start(BytesStart::from_content(raw.as_str(), 3))),
        ),
        Node::DocType(raw) => emit(writer, Event::DocType(BytesText::from_escaped(raw.as_str()))),
    }
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), XmlError> {
    writer
        .write_event(event)
        .map_err(|e| XmlError::Write(e.to_string()))
}

/// Indentation implied by a trailing whitespace node containing a newline.
fn trailing_indent(siblings: &[Node]) -> Option<String> {
    match siblings.last() {
        Some(Node::Text(t)) if t.chars().all(char::is_whitespace) => {
            t.rfind('\n').map(|i| t[i + 1..].to_string())
        }
        _ => None,
    }
}

fn unescape_lossy(raw: &str) -> Cow<'_, str> {
    quick_xml::escape::unescape(raw).unwrap_or(Cow::Borrowed(raw))
}

//! Namespace-aware XML document model.
//!
//! Captured messages and target metadata are small, so they are parsed
//! eagerly into an arena of elements. Elements are addressed by index and
//! handed out as cheap [`XmlElement`] views borrowing the document.

use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;

use crate::error::{ProtocolError, ProtocolResult};

#[derive(Debug, Clone)]
struct Attribute {
    namespace: Option<String>,
    local_name: String,
    value: String,
}

#[derive(Debug, Clone)]
struct Node {
    namespace: Option<String>,
    local_name: String,
    attributes: Vec<Attribute>,
    children: Vec<usize>,
    parent: Option<usize>,
    text: String,
}

/// A parsed XML document.
#[derive(Debug, Clone)]
pub struct XmlDocument {
    nodes: Vec<Node>,
}

impl XmlDocument {
    /// Parses `xml` into a document.
    ///
    /// The input must contain exactly one root element.
    pub fn parse(xml: &str) -> ProtocolResult<Self> {
        let mut reader = NsReader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut nodes: Vec<Node> = Vec::new();
        let mut stack: Vec<usize> = Vec::new();
        let mut root_closed = false;

        loop {
            let (ns, event) = reader.read_resolved_event()?;
            let namespace = owned_namespace(&ns)?;

            match event {
                Event::Start(ref e) | Event::Empty(ref e) => {
                    if root_closed || (stack.is_empty() && !nodes.is_empty()) {
                        return Err(ProtocolError::XmlParse(
                            "document has more than one root element".to_string(),
                        ));
                    }

                    let mut attributes = Vec::new();
                    for attr in e.attributes() {
                        let attr = attr.map_err(|err| ProtocolError::XmlParse(err.to_string()))?;
                        if attr.key.as_namespace_binding().is_some() {
                            continue;
                        }
                        let (attr_ns, local) = reader.resolve_attribute(attr.key);
                        attributes.push(Attribute {
                            namespace: owned_namespace(&attr_ns)?,
                            local_name: utf8(local.as_ref())?,
                            value: attr.unescape_value()?.into_owned(),
                        });
                    }

                    let index = nodes.len();
                    let parent = stack.last().copied();
                    nodes.push(Node {
                        namespace,
                        local_name: utf8(e.local_name().as_ref())?,
                        attributes,
                        children: Vec::new(),
                        parent,
                        text: String::new(),
                    });
                    if let Some(parent) = parent {
                        nodes[parent].children.push(index);
                    }

                    if matches!(event, Event::Start(_)) {
                        stack.push(index);
                    } else if stack.is_empty() {
                        root_closed = true;
                    }
                }
                Event::End(_) => {
                    stack.pop();
                    if stack.is_empty() {
                        root_closed = true;
                    }
                }
                Event::Text(e) => {
                    let text = e.unescape()?;
                    match stack.last() {
                        Some(&current) => nodes[current].text.push_str(&text),
                        None if text.trim().is_empty() => {}
                        None => {
                            return Err(ProtocolError::XmlParse(
                                "text content outside the root element".to_string(),
                            ))
                        }
                    }
                }
                Event::CData(e) => {
                    if let Some(&current) = stack.last() {
                        nodes[current].text.push_str(&utf8(&e)?);
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if nodes.is_empty() {
            return Err(ProtocolError::XmlParse("document has no root element".to_string()));
        }
        if !stack.is_empty() {
            return Err(ProtocolError::XmlParse("unexpected end of document".to_string()));
        }

        Ok(Self { nodes })
    }

    /// Returns the root element.
    #[must_use]
    pub fn root(&self) -> XmlElement<'_> {
        XmlElement { doc: self, index: 0 }
    }

    /// Returns every element with the given namespace and local name, in
    /// document order.
    #[must_use]
    pub fn elements_by_name_ns(&self, namespace: &str, local_name: &str) -> Vec<XmlElement<'_>> {
        (0..self.nodes.len())
            .map(|index| XmlElement { doc: self, index })
            .filter(|el| el.is_named(namespace, local_name))
            .collect()
    }
}

/// A borrowed view of one element in an [`XmlDocument`].
#[derive(Debug, Clone, Copy)]
pub struct XmlElement<'a> {
    doc: &'a XmlDocument,
    index: usize,
}

impl<'a> XmlElement<'a> {
    fn node(&self) -> &'a Node {
        &self.doc.nodes[self.index]
    }

    /// Namespace URI of the element, if it is in one.
    #[must_use]
    pub fn namespace(&self) -> Option<&'a str> {
        self.node().namespace.as_deref()
    }

    /// Local name of the element (without prefix).
    #[must_use]
    pub fn local_name(&self) -> &'a str {
        &self.node().local_name
    }

    /// Returns true if the element has the given namespace and local name.
    #[must_use]
    pub fn is_named(&self, namespace: &str, local_name: &str) -> bool {
        self.namespace() == Some(namespace) && self.local_name() == local_name
    }

    /// Value of an unqualified attribute.
    #[must_use]
    pub fn attribute(&self, local_name: &str) -> Option<&'a str> {
        self.node()
            .attributes
            .iter()
            .find(|a| a.namespace.is_none() && a.local_name == local_name)
            .map(|a| a.value.as_str())
    }

    /// Value of a namespace-qualified attribute.
    #[must_use]
    pub fn attribute_ns(&self, namespace: &str, local_name: &str) -> Option<&'a str> {
        self.node()
            .attributes
            .iter()
            .find(|a| a.namespace.as_deref() == Some(namespace) && a.local_name == local_name)
            .map(|a| a.value.as_str())
    }

    /// Parent element, `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<XmlElement<'a>> {
        self.node().parent.map(|index| XmlElement { doc: self.doc, index })
    }

    /// Child elements in document order.
    pub fn children(&self) -> impl Iterator<Item = XmlElement<'a>> + 'a {
        let doc = self.doc;
        self.node()
            .children
            .iter()
            .map(move |&index| XmlElement { doc, index })
    }

    /// Child elements with the given namespace and local name.
    pub fn child_elements_named(
        &self,
        namespace: &'a str,
        local_name: &'a str,
    ) -> impl Iterator<Item = XmlElement<'a>> + 'a {
        self.children()
            .filter(move |child| child.is_named(namespace, local_name))
    }

    /// All descendant elements with the given namespace and local name, in
    /// document order.
    #[must_use]
    pub fn descendants_named(&self, namespace: &str, local_name: &str) -> Vec<XmlElement<'a>> {
        let mut found = Vec::new();
        let mut pending: Vec<usize> = self.node().children.iter().rev().copied().collect();
        while let Some(index) = pending.pop() {
            let el = XmlElement { doc: self.doc, index };
            if el.is_named(namespace, local_name) {
                found.push(el);
            }
            pending.extend(el.node().children.iter().rev().copied());
        }
        found
    }

    /// Text directly contained in this element.
    #[must_use]
    pub fn text(&self) -> &'a str {
        &self.node().text
    }
}

fn owned_namespace(ns: &ResolveResult<'_>) -> ProtocolResult<Option<String>> {
    match ns {
        ResolveResult::Bound(Namespace(uri)) => Ok(Some(utf8(uri)?)),
        ResolveResult::Unbound => Ok(None),
        ResolveResult::Unknown(prefix) => Err(ProtocolError::XmlParse(format!(
            "unknown namespace prefix '{}'",
            String::from_utf8_lossy(prefix)
        ))),
    }
}

fn utf8(bytes: &[u8]) -> ProtocolResult<String> {
    std::str::from_utf8(bytes)
        .map(str::to_owned)
        .map_err(|e| ProtocolError::XmlParse(e.to_string()))
}

use crate::error::{Result, RwsError};
use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// XML namespace of the registration service's core payload schema.
pub const CORE_NAMESPACE: &str = "http://www.arin.net/regrws/core/v1";

/// One node of the structured payload tree: a tag name, ordered
/// attributes, ordered children, and optional text content. Every codec
/// conversion builds a fresh tree; nothing holds a tree across stages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Element>,
    pub text: Option<String>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Element {
            name: name.into(),
            ..Element::default()
        }
    }

    pub fn with_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        let mut element = Element::new(name);
        element.text = Some(text.into());
        element
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn push(&mut self, child: Element) {
        self.children.push(child);
    }

    pub fn attr_value(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// First child with the given tag name, wherever it sits among its
    /// siblings. Decoders use this so they never depend on child order.
    pub fn first(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|child| child.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |child| child.name == name)
    }

    /// Text of the first child with the given name. A present-but-empty
    /// child yields `Some("")`, distinct from an absent child.
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.first(name).map(|child| child.text.as_deref().unwrap_or(""))
    }

    /// Serializes the tree as wire-format XML text. This is the payload
    /// handed to the transport and the byte-for-byte content of cache
    /// files.
    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        self.write_into(&mut out);
        out
    }

    fn write_into(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for (name, value) in &self.attributes {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape(value.as_str()));
            out.push('"');
        }
        if self.children.is_empty() && self.text.is_none() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        if let Some(text) = &self.text {
            out.push_str(&escape(text.as_str()));
        }
        for child in &self.children {
            child.write_into(out);
        }
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }

    /// Parses wire-format XML text back into a tree. Namespace prefixes
    /// are dropped from tag names; whitespace-only text between child
    /// elements is not content and is discarded.
    pub fn parse(xml: &str) -> Result<Element> {
        let mut reader = Reader::from_reader(xml.as_bytes());
        let mut buf = Vec::new();
        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref event)) => {
                    stack.push(element_from_start(event)?);
                }
                Ok(Event::Empty(ref event)) => {
                    let element = element_from_start(event)?;
                    attach(&mut stack, &mut root, element)?;
                }
                Ok(Event::End(_)) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| RwsError::Xml("unbalanced end tag".to_string()))?;
                    attach(&mut stack, &mut root, finalize(element))?;
                }
                Ok(Event::Text(event)) => {
                    if let Some(parent) = stack.last_mut() {
                        let value = event
                            .unescape()
                            .map_err(|err| RwsError::Xml(err.to_string()))?;
                        append_text(parent, &value);
                    }
                }
                Ok(Event::CData(event)) => {
                    if let Some(parent) = stack.last_mut() {
                        let value = String::from_utf8_lossy(event.as_ref());
                        append_text(parent, &value);
                    }
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(err) => return Err(RwsError::Xml(err.to_string())),
            }
            buf.clear();
        }

        if !stack.is_empty() {
            return Err(RwsError::Xml("unclosed element".to_string()));
        }
        root.ok_or_else(|| RwsError::Xml("document has no root element".to_string()))
    }
}

fn element_from_start(start: &BytesStart<'_>) -> Result<Element> {
    let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
    let mut element = Element::new(name);
    for attr in start.attributes() {
        let attr = attr.map_err(|err| RwsError::Xml(err.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|err| RwsError::Xml(err.to_string()))?
            .into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

fn append_text(parent: &mut Element, value: &str) {
    match &mut parent.text {
        Some(existing) => existing.push_str(value),
        None => parent.text = Some(value.to_string()),
    }
}

// Indentation between child elements arrives as text events; once the
// element is complete, whitespace-only text alongside children is layout,
// not content.
fn finalize(mut element: Element) -> Element {
    if let Some(text) = &element.text {
        if !element.children.is_empty() && text.trim().is_empty() {
            element.text = None;
        }
    }
    element
}

pub(crate) fn required_text(element: &Element, record: &'static str, name: &str) -> Result<String> {
    element
        .child_text(name)
        .map(str::to_string)
        .ok_or_else(|| RwsError::malformed(record, format!("missing {name}")))
}

/// Multi-line fields travel as a wrapper of `line` children. The
/// `number` attribute mirrors what the service emits; readers go by
/// document order instead.
pub(crate) fn numbered_lines(name: &str, lines: &[String]) -> Element {
    let mut wrapper = Element::new(name);
    for (index, line) in lines.iter().enumerate() {
        wrapper.push(Element::with_text("line", line.as_str()).attr("number", (index + 1).to_string()));
    }
    wrapper
}

pub(crate) fn lines_of(wrapper: Option<&Element>) -> Vec<String> {
    wrapper
        .map(|wrapper| {
            wrapper
                .children_named("line")
                .map(|line| line.text.clone().unwrap_or_default())
                .collect()
        })
        .unwrap_or_default()
}

fn attach(stack: &mut Vec<Element>, root: &mut Option<Element>, element: Element) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(element);
            Ok(())
        }
        None if root.is_none() => {
            *root = Some(element);
            Ok(())
        }
        None => Err(RwsError::Xml(
            "document has more than one root element".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::Element;

    #[test]
    fn build_and_query() {
        let tree = Element::new("poc")
            .child(Element::with_text("city", "Chantilly"))
            .child(Element::new("emails").child(Element::with_text("email", "a@example.com")));

        assert_eq!(tree.child_text("city"), Some("Chantilly"));
        assert!(tree.first("phones").is_none());
        let emails: Vec<_> = tree
            .first("emails")
            .expect("emails wrapper")
            .children_named("email")
            .collect();
        assert_eq!(emails.len(), 1);
    }

    #[test]
    fn xml_round_trip_preserves_structure() {
        let tree = Element::new("ticket")
            .attr("xmlns", super::CORE_NAMESPACE)
            .child(Element::with_text("ticketNo", "20121012-X1"))
            .child(Element::with_text("note", "a < b & c"))
            .child(Element::new("empty"));

        let parsed = Element::parse(&tree.to_xml()).expect("parse");
        assert_eq!(parsed, tree);
    }

    #[test]
    fn parse_drops_layout_whitespace_but_keeps_leaf_text() {
        let xml = "<poc>\n  <city>Chantilly</city>\n  <state></state>\n</poc>";
        let tree = Element::parse(xml).expect("parse");
        assert_eq!(tree.text, None);
        assert_eq!(tree.child_text("city"), Some("Chantilly"));
        assert_eq!(tree.child_text("state"), Some(""));
        assert_eq!(tree.child_text("country"), None);
    }

    #[test]
    fn parse_reads_attributes_and_entities() {
        let xml = r#"<line number="2">a &amp; b</line>"#;
        let tree = Element::parse(xml).expect("parse");
        assert_eq!(tree.attr_value("number"), Some("2"));
        assert_eq!(tree.text.as_deref(), Some("a & b"));
    }

    #[test]
    fn parse_strips_namespace_prefixes_from_tags() {
        let xml = r#"<ns2:ticket xmlns:ns2="urn:example"><ns2:ticketNo>X</ns2:ticketNo></ns2:ticket>"#;
        let tree = Element::parse(xml).expect("parse");
        assert_eq!(tree.name, "ticket");
        assert_eq!(tree.child_text("ticketNo"), Some("X"));
    }

    #[test]
    fn parse_rejects_empty_and_unbalanced_documents() {
        assert!(Element::parse("").is_err());
        assert!(Element::parse("<a><b></a>").is_err());
    }
}

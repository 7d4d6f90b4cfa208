//! A minimal element tree the page projects its state onto.
//!
//! The tree is rebuilt from view state on every render; nothing here is a
//! source of truth. It supports exactly what the projection and the
//! accessibility pass need: attributes, classes, inline styles, class lookup
//! and HTML serialization.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::Serialize;

/// Elements serialized without a closing tag.
const VOID_ELEMENTS: &[&str] = &["input", "br", "hr", "img", "meta", "link"];

/// A node in the element tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// An element with attributes, classes, inline style and children.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Element {
    pub tag: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub style: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    /// Builder: set the `id` attribute.
    pub fn id(self, id: impl Into<String>) -> Self {
        self.attr("id", id)
    }

    /// Builder: add one or more space-separated classes.
    pub fn class(mut self, classes: &str) -> Self {
        for class in classes.split_whitespace() {
            self.add_class(class);
        }
        self
    }

    /// Builder: set an attribute.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    /// Builder: set an inline style property.
    pub fn css(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.style.insert(property.into(), value.into());
        self
    }

    /// Builder: append a child element.
    pub fn child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    /// Builder: append child elements.
    pub fn children(mut self, children: impl IntoIterator<Item = Element>) -> Self {
        self.children
            .extend(children.into_iter().map(Node::Element));
        self
    }

    /// Builder: append a text node.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
    }

    pub fn remove_class(&mut self, class: &str) {
        self.classes.retain(|c| c != class);
    }

    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        self.attrs.insert(name.to_string(), value.into());
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn get_style(&self, property: &str) -> Option<&str> {
        self.style.get(property).map(String::as_str)
    }

    /// The space-joined class list, as the `class` attribute would read.
    pub fn class_name(&self) -> String {
        self.classes.join(" ")
    }

    /// Concatenated text of this element and its descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                Node::Text(text) => out.push_str(text),
                Node::Element(element) => element.collect_text(out),
            }
        }
    }

    /// First descendant (depth-first, self excluded) carrying `class`.
    pub fn find_by_class(&self, class: &str) -> Option<&Element> {
        for child in self.child_elements() {
            if child.has_class(class) {
                return Some(child);
            }
            if let Some(found) = child.find_by_class(class) {
                return Some(found);
            }
        }
        None
    }

    /// Every descendant carrying `class`, depth-first.
    pub fn find_all_by_class(&self, class: &str) -> Vec<&Element> {
        let mut found = Vec::new();
        self.collect_by(&|e: &Element| e.has_class(class), &mut found);
        found
    }

    /// Descendant with the given `id` attribute.
    pub fn find_by_id(&self, id: &str) -> Option<&Element> {
        let mut found = Vec::new();
        self.collect_by(&|e: &Element| e.get_attr("id") == Some(id), &mut found);
        found.into_iter().next()
    }

    /// Descendants with the given tag name.
    pub fn find_all_by_tag(&self, tag: &str) -> Vec<&Element> {
        let mut found = Vec::new();
        self.collect_by(&|e: &Element| e.tag == tag, &mut found);
        found
    }

    fn collect_by<'a>(&'a self, pred: &dyn Fn(&Element) -> bool, found: &mut Vec<&'a Element>) {
        for child in self.child_elements() {
            if pred(child) {
                found.push(child);
            }
            child.collect_by(pred, found);
        }
    }

    /// Apply `f` to every descendant carrying `class`.
    pub fn for_each_with_class(&mut self, class: &str, f: &mut dyn FnMut(&mut Element)) {
        for child in self.child_elements_mut() {
            if child.has_class(class) {
                f(child);
            }
            child.for_each_with_class(class, f);
        }
    }

    /// Apply `f` to every descendant element.
    pub fn for_each_descendant(&mut self, f: &mut dyn FnMut(&mut Element)) {
        for child in self.child_elements_mut() {
            f(child);
            child.for_each_descendant(f);
        }
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        })
    }

    pub fn child_elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        })
    }

    /// Serialize to HTML.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        if !self.classes.is_empty() {
            let _ = write!(out, " class=\"{}\"", escape(&self.class_name()));
        }
        for (name, value) in &self.attrs {
            let _ = write!(out, " {}=\"{}\"", name, escape(value));
        }
        if !self.style.is_empty() {
            let style = self
                .style
                .iter()
                .map(|(property, value)| format!("{}: {}", property, value))
                .collect::<Vec<_>>()
                .join("; ");
            let _ = write!(out, " style=\"{}\"", escape(&style));
        }
        out.push('>');
        if VOID_ELEMENTS.contains(&self.tag.as_str()) {
            return;
        }
        for child in &self.children {
            match child {
                Node::Text(text) => out.push_str(&escape(text)),
                Node::Element(element) => element.write_html(out),
            }
        }
        let _ = write!(out, "</{}>", self.tag);
    }
}

/// Escape text for use in HTML content and double-quoted attributes.
pub fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

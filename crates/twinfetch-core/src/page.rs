//! Page model the client renders into
//!
//! A `Page` is a cheaply cloneable handle to a shared set of elements keyed
//! by id. Writers never create elements: every setter fails with
//! [`FetchError::MissingElement`] when the id is unknown.

use crate::error::FetchError;
use dashmap::DashMap;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::sync::Arc;

pub const TOKEN_ID: &str = "token_id";
pub const SOURCE_NAME: &str = "source_name";
pub const SOURCE_IMG: &str = "source_img";
pub const SOURCE_OWNER: &str = "source_owner";
pub const SOURCE_HYPERLINK: &str = "source_hyperlink";
pub const TWIN_NAME: &str = "twin_name";
pub const TWIN_IMG: &str = "twin_img";
pub const TWIN_OWNER: &str = "twin_owner";
pub const TWIN_HYPERLINK: &str = "twin_hyperlink";

/// What kind of element this is; decides how it is emitted as HTML
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ElementKind {
    Input,
    Text,
    Image,
    Link,
}

impl ElementKind {
    fn tag(self) -> &'static str {
        match self {
            ElementKind::Input => "input",
            ElementKind::Text => "span",
            ElementKind::Image => "img",
            ElementKind::Link => "a",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Element {
    pub kind: ElementKind,
    pub text: String,
    pub value: String,
    pub attributes: BTreeMap<String, String>,
}

impl Element {
    pub fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            text: String::new(),
            value: String::new(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

/// Shared element registry
#[derive(Debug, Clone, Default)]
pub struct Page {
    elements: Arc<DashMap<String, Element>>,
}

impl Page {
    /// Create an empty page
    pub fn new() -> Self {
        Self::default()
    }

    /// The fixed twin lookup template: one input and the eight output elements
    pub fn twin_template() -> Self {
        let page = Self::new();
        page.insert(TOKEN_ID, Element::new(ElementKind::Input));
        for (name, img, owner, link) in [
            (SOURCE_NAME, SOURCE_IMG, SOURCE_OWNER, SOURCE_HYPERLINK),
            (TWIN_NAME, TWIN_IMG, TWIN_OWNER, TWIN_HYPERLINK),
        ] {
            page.insert(name, Element::new(ElementKind::Text));
            page.insert(img, Element::new(ElementKind::Image));
            page.insert(owner, Element::new(ElementKind::Text));
            page.insert(link, Element::new(ElementKind::Link));
        }
        page
    }

    pub fn insert(&self, id: impl Into<String>, element: Element) {
        self.elements.insert(id.into(), element);
    }

    pub fn remove(&self, id: &str) -> Option<Element> {
        self.elements.remove(id).map(|(_, element)| element)
    }

    /// Snapshot of a single element
    pub fn element(&self, id: &str) -> Option<Element> {
        self.elements.get(id).map(|e| e.clone())
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Read the `value` property of an element (input controls)
    pub fn value(&self, id: &str) -> Result<String, FetchError> {
        self.elements
            .get(id)
            .map(|e| e.value.clone())
            .ok_or_else(|| FetchError::MissingElement(id.to_string()))
    }

    pub fn set_value(&self, id: &str, value: impl Into<String>) -> Result<(), FetchError> {
        self.with_element(id, |e| e.value = value.into())
    }

    pub fn set_text(&self, id: &str, text: impl Into<String>) -> Result<(), FetchError> {
        self.with_element(id, |e| e.text = text.into())
    }

    pub fn set_attribute(
        &self,
        id: &str,
        name: &str,
        value: impl Into<String>,
    ) -> Result<(), FetchError> {
        self.with_element(id, |e| {
            e.attributes.insert(name.to_string(), value.into());
        })
    }

    fn with_element(&self, id: &str, f: impl FnOnce(&mut Element)) -> Result<(), FetchError> {
        let mut element = self
            .elements
            .get_mut(id)
            .ok_or_else(|| FetchError::MissingElement(id.to_string()))?;
        f(element.value_mut());
        Ok(())
    }

    /// Emit every element as an HTML fragment, ordered by id
    pub fn to_html(&self) -> String {
        let mut entries: Vec<(String, Element)> = self
            .elements
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        let mut html = String::new();
        for (id, element) in entries {
            let tag = element.kind.tag();
            let _ = write!(html, "<{tag} id=\"{}\"", escape(&id));
            if element.kind == ElementKind::Input {
                let _ = write!(html, " name=\"{}\" value=\"{}\"", escape(&id), escape(&element.value));
            }
            for (name, value) in &element.attributes {
                let _ = write!(html, " {}=\"{}\"", escape(name), escape(value));
            }
            match element.kind {
                ElementKind::Input | ElementKind::Image => html.push_str(">\n"),
                _ => {
                    let _ = writeln!(html, ">{}</{tag}>", escape(&element.text));
                }
            }
        }
        html
    }
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

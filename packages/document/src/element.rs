//! The closed vocabulary of element types an instance can have.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ElementType {
    /// Page root
    Body,
    Section,
    Header,
    Footer,
    Container,
    Block,
    Heading,
    Paragraph,
    Text,
    Link,
    Button,
    Image,
    List,
    ListItem,
    Form,
    Input,
    /// Composite navigation bar
    Navbar,
    NavBrand,
    NavMenu,
    NavLink,
}

impl ElementType {
    pub const ALL: [ElementType; 20] = [
        ElementType::Body,
        ElementType::Section,
        ElementType::Header,
        ElementType::Footer,
        ElementType::Container,
        ElementType::Block,
        ElementType::Heading,
        ElementType::Paragraph,
        ElementType::Text,
        ElementType::Link,
        ElementType::Button,
        ElementType::Image,
        ElementType::List,
        ElementType::ListItem,
        ElementType::Form,
        ElementType::Input,
        ElementType::Navbar,
        ElementType::NavBrand,
        ElementType::NavMenu,
        ElementType::NavLink,
    ];

    /// Structural page regions; these may not nest inside one another
    pub fn is_page_region(self) -> bool {
        matches!(self, ElementType::Section | ElementType::Header | ElementType::Footer)
    }

    /// Whether instances of this type may have children
    pub fn accepts_children(self) -> bool {
        !matches!(
            self,
            ElementType::Heading
                | ElementType::Paragraph
                | ElementType::Text
                | ElementType::Image
                | ElementType::Input
        )
    }

    /// Types with a settings schema plus a synchronized child tree
    pub fn is_composite(self) -> bool {
        matches!(self, ElementType::Navbar)
    }

    /// Kebab-case name, also the auto-naming prefix for its style sources
    pub fn as_str(self) -> &'static str {
        match self {
            ElementType::Body => "body",
            ElementType::Section => "section",
            ElementType::Header => "header",
            ElementType::Footer => "footer",
            ElementType::Container => "container",
            ElementType::Block => "block",
            ElementType::Heading => "heading",
            ElementType::Paragraph => "paragraph",
            ElementType::Text => "text",
            ElementType::Link => "link",
            ElementType::Button => "button",
            ElementType::Image => "image",
            ElementType::List => "list",
            ElementType::ListItem => "list-item",
            ElementType::Form => "form",
            ElementType::Input => "input",
            ElementType::Navbar => "navbar",
            ElementType::NavBrand => "nav-brand",
            ElementType::NavMenu => "nav-menu",
            ElementType::NavLink => "nav-link",
        }
    }

    /// HTML tag a renderer would emit
    pub fn html_tag(self) -> &'static str {
        match self {
            ElementType::Body => "body",
            ElementType::Section => "section",
            ElementType::Header => "header",
            ElementType::Footer => "footer",
            ElementType::Container | ElementType::Block => "div",
            ElementType::Heading => "h2",
            ElementType::Paragraph => "p",
            ElementType::Text => "span",
            ElementType::Link | ElementType::NavBrand | ElementType::NavLink => "a",
            ElementType::Button => "button",
            ElementType::Image => "img",
            ElementType::List => "ul",
            ElementType::ListItem => "li",
            ElementType::Form => "form",
            ElementType::Input => "input",
            ElementType::Navbar => "nav",
            ElementType::NavMenu => "div",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ElementType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ElementType::ALL
            .into_iter()
            .find(|ty| ty.as_str() == s)
            .ok_or_else(|| format!("unknown element type: {}", s))
    }
}

//! # Build Guide Document
//!
//! Backend-neutral model of the printed build guide: a cover, a table of
//! contents derived from the section list, and fifteen numbered sections of
//! headings, prose, lists, tables, warnings and diagram references.
//!
//! Prose is a list of [`Inline`] runs. Any quantity taken from the design is
//! an [`Inline::Value`] holding a [`FieldValue`], never text formatted by the
//! assembler, so a number reads the same in a paragraph, a table and a
//! drawing label.
//!
//! ## Example
//!
//! ```rust
//! use forge_core::document::Inline;
//! use forge_core::runs;
//!
//! let line = runs!["Close the ", Inline::strong("needle valve"), " first"];
//! assert_eq!(line.len(), 3);
//! ```

pub mod assemble;

use serde::Serialize;

use crate::calculations::specification::FieldValue;
use crate::drawing::ViewKind;

pub use assemble::assemble;

/// Build a `Vec<Inline>` from anything convertible into [`Inline`].
#[macro_export]
macro_rules! runs {
    ($($part:expr),* $(,)?) => {
        vec![$($crate::document::Inline::from($part)),*]
    };
}

/// One run of prose.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value")]
pub enum Inline {
    Text(String),
    Strong(String),
    Value(FieldValue),
}

impl Inline {
    pub fn strong(text: impl Into<String>) -> Self {
        Inline::Strong(text.into())
    }
}

impl From<&str> for Inline {
    fn from(text: &str) -> Self {
        Inline::Text(text.to_string())
    }
}

impl From<String> for Inline {
    fn from(text: String) -> Self {
        Inline::Text(text)
    }
}

impl From<FieldValue> for Inline {
    fn from(value: FieldValue) -> Self {
        Inline::Value(value)
    }
}

/// Table cell or list item
pub type Runs = Vec<Inline>;

/// Plain-text rendering of a run list, as printed
pub fn plain_text(runs: &[Inline]) -> String {
    runs.iter()
        .map(|run| match run {
            Inline::Text(text) | Inline::Strong(text) => text.clone(),
            Inline::Value(value) => value.to_string(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "node")]
pub enum Node {
    /// Sub-heading inside a section
    Heading { text: String },
    Paragraph { runs: Runs },
    Bullets { items: Vec<Runs> },
    /// Numbered procedure
    Steps { items: Vec<Runs> },
    Table { headers: Vec<String>, rows: Vec<Vec<Runs>> },
    /// Highlighted safety callout
    Warning { runs: Runs },
    /// Embedded drawing, looked up in the diagram set by kind
    Diagram { view: ViewKind },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub number: u32,
    pub title: String,
    pub nodes: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cover {
    pub title: String,
    pub subtitle: String,
    /// Headline figures printed under the title
    pub facts: Vec<(String, FieldValue)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub cover: Cover,
    pub sections: Vec<Section>,
}

impl Document {
    /// Table of contents, in section order
    pub fn contents(&self) -> Vec<(u32, &str)> {
        self.sections.iter().map(|s| (s.number, s.title.as_str())).collect()
    }

    pub fn section(&self, number: u32) -> Option<&Section> {
        self.sections.iter().find(|s| s.number == number)
    }

    /// Drawings referenced anywhere in the document
    pub fn diagrams(&self) -> impl Iterator<Item = ViewKind> + '_ {
        self.sections.iter().flat_map(|s| {
            s.nodes.iter().filter_map(|n| match n {
                Node::Diagram { view } => Some(*view),
                _ => None,
            })
        })
    }
}

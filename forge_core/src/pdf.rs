//! # PDF Generation Module
//!
//! Renders the build guide to PDF using Typst.
//!
//! ## Architecture
//!
//! - The [`Document`] is translated node by node into Typst markup
//! - Drawings are emitted as clipped boxes of `place`d lines, rectangles,
//!   polygons and text taken from [`DiagramView::page_shapes`]
//! - Fonts come from `typst-assets`, so no files are read at render time
//! - Output is raw PDF bytes (`Vec<u8>`)
//!
//! ## Example
//!
//! ```rust,no_run
//! use chrono::NaiveDate;
//! use forge_core::config::ForgeConfig;
//! use forge_core::calculations::door::DoorConfiguration;
//! use forge_core::calculations::geometry::ChamberInput;
//! use forge_core::pdf::{render_build_guide, RenderOptions};
//! use forge_core::pipeline::build;
//!
//! let config = ForgeConfig::default();
//! let input = ChamberInput {
//!     internal_width_in: 7.0,
//!     internal_height_in: 8.0,
//!     internal_length_in: 14.0,
//!     insulation_in: 2.0,
//!     door_configuration: DoorConfiguration::FrontOnly,
//! };
//! let package = build(&input, &config).unwrap();
//! let date = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
//! let options = RenderOptions::new(date, &config.layout);
//! let pdf = render_build_guide(&package.document, &package.diagrams, &options).unwrap();
//! std::fs::write("forge_build_guide.pdf", pdf).unwrap();
//! ```

use std::fmt::Write as _;

use chrono::{Datelike, NaiveDate};
use typst::diag::{FileError, FileResult};
use typst::foundations::{Bytes, Datetime};
use typst::syntax::{FileId, Source};
use typst::text::{Font, FontBook};
use typst::utils::LazyHash;
use typst::{Library, LibraryExt, World};
use typst_pdf::PdfOptions;

use crate::config::LayoutPolicy;
use crate::document::{Document, Inline, Node, Section};
use crate::drawing::{DiagramSet, DiagramView, PageShape, PageSize, TextAnchor};
use crate::errors::{ForgeError, ForgeResult};

// ============================================================================
// Typst World Implementation
// ============================================================================

/// A minimal Typst world for compiling documents without external files.
struct PdfWorld {
    /// The main source document
    main: Source,
    /// Font book
    book: LazyHash<FontBook>,
    /// Available fonts
    fonts: Vec<Font>,
    /// Library (standard functions)
    library: LazyHash<Library>,
    /// Date reported to `datetime.today()`
    today: NaiveDate,
}

impl PdfWorld {
    fn new(source: String, today: NaiveDate) -> Self {
        let fonts = Self::load_fonts();
        let book = FontBook::from_fonts(&fonts);

        PdfWorld {
            main: Source::detached(source),
            book: LazyHash::new(book),
            fonts,
            library: LazyHash::new(Library::default()),
            today,
        }
    }

    fn load_fonts() -> Vec<Font> {
        let mut fonts = Vec::new();
        for font_bytes in typst_assets::fonts() {
            let buffer = Bytes::new(font_bytes.to_vec());
            for font in Font::iter(buffer) {
                fonts.push(font);
            }
        }
        fonts
    }
}

impl World for PdfWorld {
    fn library(&self) -> &LazyHash<Library> {
        &self.library
    }

    fn book(&self) -> &LazyHash<FontBook> {
        &self.book
    }

    fn main(&self) -> FileId {
        self.main.id()
    }

    fn source(&self, id: FileId) -> FileResult<Source> {
        if id == self.main.id() {
            Ok(self.main.clone())
        } else {
            Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
        }
    }

    fn file(&self, id: FileId) -> FileResult<Bytes> {
        Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
    }

    fn font(&self, index: usize) -> Option<Font> {
        self.fonts.get(index).cloned()
    }

    fn today(&self, _offset: Option<i64>) -> Option<Datetime> {
        Datetime::from_ymd(
            self.today.year(),
            u8::try_from(self.today.month()).ok()?,
            u8::try_from(self.today.day()).ok()?,
        )
    }
}

// ============================================================================
// Options
// ============================================================================

/// Backend settings that are not part of the design itself.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Printed on the cover and in the footer
    pub date: NaiveDate,
    pub page: PageSize,
    pub margin_pt: f64,
    /// Footer reference, e.g. `FW rev A`
    pub drawing_set: String,
}

impl RenderOptions {
    /// Options matching the page the drawings were laid out for
    pub fn new(date: NaiveDate, layout: &LayoutPolicy) -> Self {
        RenderOptions {
            date,
            page: layout.page,
            margin_pt: layout.page_margin_pt,
            drawing_set: format!("{} rev {}", layout.drawing_prefix, layout.revision),
        }
    }
}

// ============================================================================
// Markup
// ============================================================================

/// Escape special Typst characters in generated text
fn escape_typst(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '*' => "\\*".to_string(),
            '_' => "\\_".to_string(),
            '#' => "\\#".to_string(),
            '$' => "\\$".to_string(),
            '@' => "\\@".to_string(),
            '<' => "\\<".to_string(),
            '>' => "\\>".to_string(),
            '[' => "\\[".to_string(),
            ']' => "\\]".to_string(),
            '~' => "\\~".to_string(),
            '\\' => "\\\\".to_string(),
            '`' => "\\`".to_string(),
            _ => c.to_string(),
        })
        .collect()
}

/// Quote-safe body for a Typst string literal
fn typst_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

fn inline_markup(runs: &[Inline]) -> String {
    runs.iter()
        .map(|run| match run {
            Inline::Text(text) => escape_typst(text),
            Inline::Strong(text) => format!("*{}*", escape_typst(text.trim_end())) + trailing_space(text),
            Inline::Value(value) => escape_typst(&value.to_string()),
        })
        .collect()
}

/// Strong markers must hug the text; keep any trailing space outside them
fn trailing_space(text: &str) -> &'static str {
    if text.ends_with(' ') {
        " "
    } else {
        ""
    }
}

fn pt(value: f64) -> String {
    format!("{value:.2}pt")
}

fn shape_markup(shape: &PageShape) -> String {
    match shape {
        PageShape::Line { from, to, stroke_pt } => format!(
            "#place(top + left, line(start: ({}, {}), end: ({}, {}), stroke: {}))\n",
            pt(from.x),
            pt(from.y),
            pt(to.x),
            pt(to.y),
            pt(*stroke_pt)
        ),
        PageShape::Rect { rect, stroke_pt } => format!(
            "#place(top + left, dx: {}, dy: {}, rect(width: {}, height: {}, stroke: {}))\n",
            pt(rect.x),
            pt(rect.y),
            pt(rect.width),
            pt(rect.height),
            pt(*stroke_pt)
        ),
        PageShape::Polygon { points, filled, stroke_pt } => {
            let vertices = points
                .iter()
                .map(|p| format!("({}, {})", pt(p.x), pt(p.y)))
                .collect::<Vec<_>>()
                .join(", ");
            format!(
                "#place(top + left, polygon(fill: {}, stroke: {}, {}))\n",
                if *filled { "black" } else { "none" },
                pt(*stroke_pt),
                vertices
            )
        }
        PageShape::Text { at, text, size_pt, rotation_deg, anchor } => {
            let align = match anchor {
                TextAnchor::Start => "left + horizon",
                TextAnchor::Middle => "center + horizon",
                TextAnchor::End => "right + horizon",
            };
            let body = format!("text(size: {})[{}]", pt(*size_pt), escape_typst(text));
            let body = if *rotation_deg == 0.0 {
                body
            } else {
                format!("rotate({rotation_deg}deg, reflow: false, {body})")
            };
            // Zero-size anchor box so alignment is relative to `at`
            format!(
                "#place(top + left, dx: {}, dy: {}, box(width: 0pt, height: 0pt, place({align}, {body})))\n",
                pt(at.x),
                pt(at.y)
            )
        }
    }
}

fn diagram_markup(view: &DiagramView) -> String {
    let mut out = format!(
        "#align(center)[#box(width: {}, height: {}, clip: true)[\n",
        pt(view.frame_width_pt),
        pt(view.frame_height_pt)
    );
    for shape in view.page_shapes() {
        out.push_str(&shape_markup(&shape));
    }
    out.push_str("]]\n");
    let note = if view.truncated { " (reduced, not to scale)" } else { "" };
    let _ = writeln!(
        out,
        "#align(center)[#text(size: 9pt)[{} at {}{}]]\n",
        escape_typst(view.kind.name()),
        escape_typst(&view.scale.label()),
        note
    );
    out
}

fn table_markup(headers: &[String], rows: &[Vec<Vec<Inline>>]) -> String {
    let header_cells = headers
        .iter()
        .map(|h| format!("[*{}*]", escape_typst(h)))
        .collect::<Vec<_>>()
        .join(", ");
    let mut out = format!(
        "#table(\n  columns: {},\n  inset: 6pt,\n  stroke: 0.5pt,\n  table.header({}),\n",
        headers.len(),
        header_cells
    );
    for row in rows {
        let cells = row
            .iter()
            .map(|cell| format!("[{}]", inline_markup(cell)))
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(out, "  {cells},");
    }
    out.push_str(")\n\n");
    out
}

fn section_markup(section: &Section, diagrams: &DiagramSet) -> ForgeResult<String> {
    let mut out = format!(
        "#pagebreak()\n#heading(level: 1, \"{}\")\n\n",
        typst_string(&format!("{}. {}", section.number, section.title))
    );
    for node in &section.nodes {
        match node {
            Node::Heading { text } => {
                let _ = writeln!(out, "== {}\n", escape_typst(text));
            }
            Node::Paragraph { runs } => {
                let _ = writeln!(out, "{}\n", inline_markup(runs));
            }
            Node::Bullets { items } => {
                for item in items {
                    let _ = writeln!(out, "- {}", inline_markup(item));
                }
                out.push('\n');
            }
            Node::Steps { items } => {
                for item in items {
                    let _ = writeln!(out, "+ {}", inline_markup(item));
                }
                out.push('\n');
            }
            Node::Table { headers, rows } => out.push_str(&table_markup(headers, rows)),
            Node::Warning { runs } => {
                let _ = writeln!(
                    out,
                    "#block(width: 100%, fill: rgb(\"#f8d7da\"), inset: 10pt, radius: 4pt)[{}]\n",
                    inline_markup(runs)
                );
            }
            Node::Diagram { view } => {
                let diagram = diagrams.view(*view).ok_or_else(|| {
                    ForgeError::render("markup", format!("{} is referenced but was not drawn", view.name()))
                })?;
                out.push_str(&diagram_markup(diagram));
            }
        }
    }
    Ok(out)
}

/// Complete Typst source for the build guide.
fn build_markup(document: &Document, diagrams: &DiagramSet, options: &RenderOptions) -> ForgeResult<String> {
    let date = options.date.format("%Y-%m-%d").to_string();
    let mut source = format!(
        r##"
#set page(
  width: {width},
  height: {height},
  margin: {margin},
  header: align(right)[
    #text(size: 9pt, fill: gray)[{title} - {subtitle}]
  ],
  footer: context [
    #line(length: 100%, stroke: 0.5pt + gray)
    #v(4pt)
    #grid(
      columns: (1fr, 1fr, 1fr),
      align(left)[#text(size: 9pt)[{drawing_set}]],
      align(center)[#text(size: 9pt)[Page #counter(page).display()]],
      align(right)[#text(size: 9pt)[{date}]],
    )
  ]
)

#set text(font: "DejaVu Sans Mono", size: 10pt)
#set smartquote(enabled: false)
#set heading(numbering: none)

#align(center)[
  #block(width: 100%, fill: rgb("#f0f0f0"), inset: 16pt, radius: 4pt)[
    #text(size: 22pt, weight: "bold")[{title}]
    #v(6pt)
    #text(size: 14pt)[{subtitle}]
  ]
]

#v(16pt)

#table(
  columns: (1fr, auto),
  stroke: none,
  row-gutter: 4pt,
"##,
        width = pt(options.page.width_pt),
        height = pt(options.page.height_pt),
        margin = pt(options.margin_pt),
        title = escape_typst(&document.cover.title),
        subtitle = escape_typst(&document.cover.subtitle),
        drawing_set = escape_typst(&options.drawing_set),
        date = date,
    );
    for (label, value) in &document.cover.facts {
        let _ = writeln!(
            source,
            "  [{}:], [{}],",
            escape_typst(label),
            escape_typst(&value.to_string())
        );
    }
    let _ = writeln!(source, "  [Generated:], [{date}],\n)\n");

    source.push_str("#pagebreak()\n#heading(level: 1, \"Table of Contents\")\n\n#table(\n  columns: (auto, 1fr),\n  stroke: none,\n");
    for (number, title) in document.contents() {
        let _ = writeln!(source, "  [{number}.], [{}],", escape_typst(title));
    }
    source.push_str(")\n\n");

    for section in &document.sections {
        source.push_str(&section_markup(section, diagrams)?);
    }
    Ok(source)
}

// ============================================================================
// PDF Rendering Functions
// ============================================================================

/// Render the build guide to PDF.
///
/// # Returns
///
/// * `Ok(Vec<u8>)` - PDF file as bytes
/// * `Err(ForgeError::Render)` - If markup generation, compilation or PDF
///   encoding fails
pub fn render_build_guide(document: &Document, diagrams: &DiagramSet, options: &RenderOptions) -> ForgeResult<Vec<u8>> {
    let source = build_markup(document, diagrams, options)?;

    // Compile the Typst document
    let world = PdfWorld::new(source, options.date);
    let warned = typst::compile(&world);

    let document = warned.output.map_err(|errors| {
        let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        ForgeError::render("compile", error_msgs.join("; "))
    })?;

    // Render to PDF
    let pdf_bytes = typst_pdf::pdf(&document, &PdfOptions::default()).map_err(|errors| {
        let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        ForgeError::render("pdf", error_msgs.join("; "))
    })?;

    tracing::debug!(bytes = pdf_bytes.len(), "rendered build guide");
    Ok(pdf_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::door::DoorConfiguration;
    use crate::calculations::geometry::ChamberInput;
    use crate::config::ForgeConfig;
    use crate::drawing::{PagePoint, ViewKind};
    use crate::pipeline::{build, BuildPackage};

    fn package() -> (BuildPackage, RenderOptions) {
        let config = ForgeConfig::default();
        let input = ChamberInput {
            internal_width_in: 7.0,
            internal_height_in: 8.0,
            internal_length_in: 14.0,
            insulation_in: 2.0,
            door_configuration: DoorConfiguration::FrontAndRear,
        };
        let date = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
        (build(&input, &config).unwrap(), RenderOptions::new(date, &config.layout))
    }

    #[test]
    fn test_escape_typst() {
        assert_eq!(escape_typst("$470"), "\\$470");
        assert_eq!(escape_typst("[x] #1"), "\\[x\\] \\#1");
        assert_eq!(escape_typst("11\""), "11\"");
    }

    #[test]
    fn test_strong_keeps_trailing_space_outside() {
        let runs = vec![Inline::strong("Burns: "), Inline::Text("cool".to_string())];
        assert_eq!(inline_markup(&runs), "*Burns:* cool");
    }

    #[test]
    fn test_text_shape_uses_anchor_box() {
        let shape = PageShape::Text {
            at: PagePoint::new(10.0, 20.0),
            text: "12\"".to_string(),
            size_pt: 7.0,
            rotation_deg: -90.0,
            anchor: TextAnchor::Middle,
        };
        let markup = shape_markup(&shape);
        assert!(markup.contains("dx: 10.00pt, dy: 20.00pt"));
        assert!(markup.contains("rotate(-90deg"));
        assert!(markup.contains("center + horizon"));
    }

    #[test]
    fn test_markup_contains_every_section_and_view() {
        let (package, options) = package();
        let source = build_markup(&package.document, &package.diagrams, &options).unwrap();
        for (number, title) in package.document.contents() {
            assert!(source.contains(&format!("#heading(level: 1, \"{number}. {}\")", typst_string(title))));
        }
        for kind in [ViewKind::Front, ViewKind::SideSection, ViewKind::Rear, ViewKind::BurnerDetail] {
            assert!(source.contains(kind.name()));
        }
        assert!(source.contains("2026-10-17"));
    }

    #[test]
    fn test_missing_diagram_is_a_render_error() {
        let (package, options) = package();
        let mut diagrams = package.diagrams.clone();
        diagrams.views.retain(|v| v.kind != ViewKind::Rear);
        let err = build_markup(&package.document, &diagrams, &options).unwrap_err();
        assert_eq!(err.error_code(), "RENDER_ERROR");
    }

    #[test]
    fn test_pdf_generation() {
        let (package, options) = package();
        let pdf = render_build_guide(&package.document, &package.diagrams, &options);

        // Should succeed
        assert!(pdf.is_ok(), "PDF generation failed: {:?}", pdf.err());

        let pdf_bytes = pdf.unwrap();
        // PDF should start with %PDF
        assert!(pdf_bytes.starts_with(b"%PDF"), "Output is not a valid PDF");
        assert!(pdf_bytes.len() > 1000, "PDF seems too small");
    }
}

//! Structured report model. Sections are assembled from collected data in
//! [`assemble`] and turned into text by [`render`].

pub mod assemble;
pub mod render;

pub use assemble::{assemble_report, ReportInput};
pub use render::render_report;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub title: String,
    pub align: Align,
}

impl Column {
    pub fn left(title: &str) -> Self {
        Self {
            title: title.to_string(),
            align: Align::Left,
        }
    }

    pub fn right(title: &str) -> Self {
        Self {
            title: title.to_string(),
            align: Align::Right,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SectionBody {
    /// Label/value pairs, one per line.
    Fields(Vec<(String, String)>),
    Table(Table),
    /// Free lines; `empty` is printed when there are none.
    Lines { lines: Vec<String>, empty: String },
    /// Collection failed; the reason is shown in place of the data.
    Unavailable(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub title: String,
    pub body: SectionBody,
}

impl Section {
    pub fn new(title: &str, body: SectionBody) -> Self {
        Self {
            title: title.to_string(),
            body,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub title: String,
    pub sections: Vec<Section>,
}

#![allow(dead_code)]

use std::io::Write;

use docxide_layout::LayoutOptions;
use docxide_layout::fonts::MemoryCatalog;
use docxide_layout::layout::{LayoutBlock, ParagraphLayout, Region, TableBlock};
use docxide_layout::model::Document;

pub const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
pub const R_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
pub const A_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";

/// In-memory `.docx` assembled from XML fragments.
#[derive(Default)]
pub struct Package {
    body: String,
    styles: Option<String>,
    numbering: Option<String>,
    theme: Option<String>,
    extra: Vec<(String, String)>,
}

impl Package {
    pub fn new(body: &str) -> Self {
        Self {
            body: body.to_string(),
            ..Default::default()
        }
    }

    /// Children of `w:styles`.
    pub fn styles(mut self, inner: &str) -> Self {
        self.styles = Some(format!(r#"<w:styles xmlns:w="{W_NS}">{inner}</w:styles>"#));
        self
    }

    /// Children of `w:numbering`.
    pub fn numbering(mut self, inner: &str) -> Self {
        self.numbering = Some(format!(r#"<w:numbering xmlns:w="{W_NS}">{inner}</w:numbering>"#));
        self
    }

    /// Contents of `a:fontScheme`.
    pub fn theme(mut self, font_scheme: &str) -> Self {
        self.theme = Some(format!(
            r#"<a:theme xmlns:a="{A_NS}"><a:themeElements><a:fontScheme name="Office">{font_scheme}</a:fontScheme></a:themeElements></a:theme>"#
        ));
        self
    }

    /// Any other part, stored verbatim.
    pub fn part(mut self, name: &str, xml: &str) -> Self {
        self.extra.push((name.to_string(), xml.to_string()));
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut zip = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
        let options = zip::write::SimpleFileOptions::default();
        let document = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="{W_NS}" xmlns:r="{R_NS}"><w:body>{}</w:body></w:document>"#,
            self.body
        );
        let mut files = vec![("word/document.xml".to_string(), document)];
        if let Some(styles) = &self.styles {
            files.push(("word/styles.xml".to_string(), styles.clone()));
        }
        if let Some(numbering) = &self.numbering {
            files.push(("word/numbering.xml".to_string(), numbering.clone()));
        }
        if let Some(theme) = &self.theme {
            files.push(("word/theme/theme1.xml".to_string(), theme.clone()));
        }
        files.extend(self.extra.iter().cloned());
        for (name, content) in files {
            zip.start_file(name, options).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
        zip.finish().unwrap().into_inner()
    }

    pub fn load(&self) -> Document {
        docxide_layout::docx::load_bytes(&self.build()).expect("package should load")
    }
}

/// Families the tests expect to be installed.
pub fn catalog() -> MemoryCatalog {
    MemoryCatalog::new()
        .with_family("Times New Roman")
        .with_family("Calibri")
        .with_face("Calibri Light", false, false)
        .with_face("Arial", false, false)
        .with_face("MS Mincho", false, false)
        .with_face("PMingLiU", false, false)
        .with_face("Courier New", false, false)
        .with_face("Symbol", false, false)
}

pub fn options() -> LayoutOptions {
    LayoutOptions {
        scan_system_fonts: false,
        ..Default::default()
    }
}

pub fn layout(doc: &Document) -> Vec<(Region, LayoutBlock)> {
    let mut blocks = Vec::new();
    docxide_layout::layout_document(doc, &catalog(), &options(), &mut blocks);
    blocks
}

pub fn body_paragraphs(blocks: &[(Region, LayoutBlock)]) -> Vec<&ParagraphLayout> {
    blocks
        .iter()
        .filter(|(region, _)| *region == Region::Body)
        .filter_map(|(_, block)| match block {
            LayoutBlock::Paragraph(p) => Some(p),
            LayoutBlock::Table(_) => None,
        })
        .collect()
}

pub fn first_table(blocks: &[(Region, LayoutBlock)]) -> &TableBlock {
    blocks
        .iter()
        .find_map(|(_, block)| match block {
            LayoutBlock::Table(t) => Some(t),
            LayoutBlock::Paragraph(_) => None,
        })
        .expect("document should contain a table")
}

/// `<w:p>` with a single run of `text`.
pub fn para(text: &str) -> String {
    format!("<w:p><w:r><w:t xml:space=\"preserve\">{text}</w:t></w:r></w:p>")
}

pub fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 1e-3,
        "expected {expected}, got {actual}"
    );
}

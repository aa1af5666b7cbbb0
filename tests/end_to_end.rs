mod common;

use common::{Package, W_NS, body_paragraphs, layout, options, para};
use docxide_layout::Error;
use docxide_layout::layout::{LayoutBlock, Region, TextDump};

fn header_package() -> Package {
    let rels = r#"<?xml version="1.0" encoding="UTF-8"?>
        <Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
            <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/header" Target="header1.xml"/>
            <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/footer" Target="/word/footer1.xml"/>
            <Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/header" Target="header2.xml"/>
        </Relationships>"#;
    let header = |text: &str| format!(r#"<w:hdr xmlns:w="{W_NS}">{}</w:hdr>"#, para(text));
    let footer = format!(r#"<w:ftr xmlns:w="{W_NS}">{}</w:ftr>"#, para("page foot"));
    let sect = r#"<w:sectPr>
            <w:headerReference w:type="first" r:id="rId3"/>
            <w:headerReference w:type="default" r:id="rId1"/>
            <w:footerReference w:type="default" r:id="rId2"/>
            <w:pgSz w:w="11906" w:h="16838"/><w:pgMar w:left="1134" w:right="1134"/>
        </w:sectPr>"#;
    Package::new(&format!("{}{sect}", para("body text")))
        .part("word/_rels/document.xml.rels", rels)
        .part("word/header1.xml", &header("running head"))
        .part("word/header2.xml", &header("title page head"))
        .part("word/footer1.xml", &footer)
}

fn region_text(blocks: &[(Region, LayoutBlock)], region: Region) -> Vec<String> {
    blocks
        .iter()
        .filter(|(r, _)| *r == region)
        .filter_map(|(_, block)| match block {
            LayoutBlock::Paragraph(p) => Some(p.text()),
            LayoutBlock::Table(_) => None,
        })
        .collect()
}

#[test]
fn rejects_data_that_is_not_a_zip() {
    let err = docxide_layout::docx::load_bytes(b"plain text, not a package").unwrap_err();
    assert!(matches!(err, Error::InvalidDocx(_)), "got {err}");
}

#[test]
fn rejects_package_without_main_document() {
    let mut zip = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    zip.start_file("word/styles.xml", zip::write::SimpleFileOptions::default())
        .unwrap();
    let bytes = zip.finish().unwrap().into_inner();
    let err = docxide_layout::docx::load_bytes(&bytes).unwrap_err();
    assert!(matches!(err, Error::InvalidDocx(_)), "got {err}");
}

#[test]
fn malformed_document_xml_is_an_error() {
    let bytes = Package::new("<w:p><w:r><w:t>unclosed</w:r></w:p>").build();
    let err = docxide_layout::docx::load_bytes(&bytes).unwrap_err();
    assert!(matches!(err, Error::Xml(_)), "got {err}");
}

#[test]
fn malformed_styles_fall_back_to_defaults() {
    let bytes = Package::new(&para("still here"))
        .part("word/styles.xml", "<w:styles><broken")
        .build();
    let doc = docxide_layout::docx::load_bytes(&bytes).unwrap();
    assert!(doc.styles.is_empty());
    let blocks = layout(&doc);
    assert_eq!(body_paragraphs(&blocks)[0].text(), "still here");
}

#[test]
fn default_header_and_footer_follow_the_body() {
    let _ = env_logger::try_init();
    let doc = header_package().load();
    let blocks = layout(&doc);
    assert_eq!(region_text(&blocks, Region::Body), ["body text"]);
    assert_eq!(region_text(&blocks, Region::Header), ["running head"]);
    assert_eq!(region_text(&blocks, Region::Footer), ["page foot"]);
    let regions: Vec<Region> = blocks.iter().map(|(r, _)| *r).collect();
    assert_eq!(regions, [Region::Body, Region::Header, Region::Footer]);
}

#[test]
fn section_margins_set_printable_width() {
    let doc = header_package().load();
    let width = doc.section.printable_width().unwrap();
    assert!((width - (11906.0 - 2268.0) / 20.0).abs() < 1e-3);
}

#[test]
fn inline_containers_are_transparent() {
    let body = format!(
        r#"<w:p>
            <w:r><w:t xml:space="preserve">see </w:t></w:r>
            <w:hyperlink r:id="rId9"><w:r><w:t>link</w:t></w:r></w:hyperlink>
            <w:ins w:id="1"><w:r><w:t xml:space="preserve"> added</w:t></w:r></w:ins>
            <w:smartTag><w:r><w:t xml:space="preserve"> tagged</w:t></w:r></w:smartTag>
            <w:sdt><w:sdtContent><w:r><w:t xml:space="preserve"> field</w:t></w:r></w:sdtContent></w:sdt>
        </w:p>
        <w:sdt><w:sdtPr/><w:sdtContent>{}</w:sdtContent></w:sdt>"#,
        para("inside control")
    );
    let doc = Package::new(&body).load();
    let blocks = layout(&doc);
    let ps = body_paragraphs(&blocks);
    assert_eq!(ps.len(), 2);
    assert_eq!(ps[0].text(), "see link added tagged field");
    assert_eq!(ps[1].text(), "inside control");
}

#[test]
fn text_dump_lists_regions_and_tables() {
    let table = r#"<w:tbl><w:tblGrid><w:gridCol w:w="2000"/></w:tblGrid>
        <w:tr><w:tc><w:p><w:r><w:t>cell</w:t></w:r></w:p></w:tc></w:tr></w:tbl>"#;
    let doc = Package::new(&format!("{}{table}", para("intro"))).load();
    let mut dump = TextDump::new();
    docxide_layout::layout_document(&doc, &common::catalog(), &options(), &mut dump);
    let out = dump.into_string();
    assert!(out.starts_with("[Body]\n  paragraph"), "{out}");
    assert!(out.contains("\"intro\" font=\"Times New Roman\" size=11.00"));
    assert!(out.contains("table columns=[100.00]"));
    assert!(out.contains("cell 0 at 0,0 span=1x1 width=100.00"));
    assert!(out.contains("\"cell\""));
}

#[test]
fn lays_out_a_file_from_disk() {
    let path = std::env::temp_dir().join(format!("docxide-layout-{}.docx", std::process::id()));
    std::fs::write(&path, Package::new(&para("from disk")).build()).unwrap();
    let mut blocks: Vec<(Region, LayoutBlock)> = Vec::new();
    let result = docxide_layout::layout_docx(&path, &options(), &mut blocks);
    std::fs::remove_file(&path).ok();
    result.unwrap();
    assert_eq!(region_text(&blocks, Region::Body), ["from disk"]);
}

#[test]
fn missing_file_reports_its_path() {
    let path = std::env::temp_dir().join("docxide-layout-does-not-exist.docx");
    let err = docxide_layout::docx::load(&path).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
    assert!(err.to_string().contains("docxide-layout-does-not-exist.docx"));
}

//! DOCX package loader: builds the arena [`Document`] from `word/document.xml`
//! and its styles, numbering, theme and default header/footer parts.

mod numbering;
mod props;
mod styles;

use std::collections::HashMap;
use std::io::{Read, Seek};
use std::path::Path;
use std::time::Instant;

use crate::error::Error;
use crate::model::{Document, NodeId, NodeKind, Props, RunItem, Section};
use crate::numbering::symbol_pua_to_unicode;
use crate::units::on_off;

use props::{cell_props, paragraph_props, row_props, run_props, table_props};

pub(crate) const WML_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
pub(crate) const DML_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

pub(crate) fn wml<'a>(node: roxmltree::Node<'a, 'a>, name: &str) -> Option<roxmltree::Node<'a, 'a>> {
    node.children()
        .find(|n| n.tag_name().name() == name && n.tag_name().namespace() == Some(WML_NS))
}

pub(crate) fn wml_attr<'a>(node: roxmltree::Node<'a, 'a>, child: &str) -> Option<&'a str> {
    wml(node, child).and_then(|n| n.attribute((WML_NS, "val")))
}

pub(crate) fn wml_bool(parent: roxmltree::Node, name: &str) -> Option<bool> {
    wml(parent, name).map(|n| on_off(n.attribute((WML_NS, "val"))))
}

pub(crate) fn twips_attr(node: roxmltree::Node, attr: &str) -> Option<f32> {
    node.attribute((WML_NS, attr))
        .and_then(|v| v.trim().parse::<f32>().ok())
        .map(crate::units::twips_to_pts)
}

fn is_wml(node: &roxmltree::Node, name: &str) -> bool {
    node.tag_name().name() == name && node.tag_name().namespace() == Some(WML_NS)
}

/// Block-level children with `w:sdt` content controls flattened.
fn collect_block_nodes<'a>(parent: roxmltree::Node<'a, 'a>) -> Vec<roxmltree::Node<'a, 'a>> {
    let mut nodes = Vec::new();
    for child in parent.children() {
        if is_wml(&child, "sdt") {
            if let Some(content) = wml(child, "sdtContent") {
                nodes.extend(collect_block_nodes(content));
            }
        } else if child.is_element() {
            nodes.push(child);
        }
    }
    nodes
}

fn read_zip_text<R: Read + Seek>(zip: &mut zip::ZipArchive<R>, name: &str) -> Option<String> {
    let mut content = String::new();
    zip.by_name(name).ok()?.read_to_string(&mut content).ok()?;
    Some(content)
}

fn parse_rels_xml(xml_content: &str) -> HashMap<String, String> {
    let mut rels = HashMap::new();
    let Ok(xml) = roxmltree::Document::parse(xml_content) else {
        return rels;
    };
    for node in xml.root_element().children() {
        if node.tag_name().name() == "Relationship"
            && let (Some(id), Some(target)) = (node.attribute("Id"), node.attribute("Target"))
        {
            rels.insert(id.to_string(), target.to_string());
        }
    }
    rels
}

/// Relationships of `part_path`, read from its sibling `_rels/*.rels` part.
fn parse_part_relationships<R: Read + Seek>(
    zip: &mut zip::ZipArchive<R>,
    part_path: &str,
) -> HashMap<String, String> {
    let (dir, file) = match part_path.rsplit_once('/') {
        Some((d, f)) => (d, f),
        None => ("", part_path),
    };
    let rels_path = if dir.is_empty() {
        format!("_rels/{}.rels", file)
    } else {
        format!("{}/_rels/{}.rels", dir, file)
    };
    let Some(xml_content) = read_zip_text(zip, &rels_path) else {
        return HashMap::new();
    };
    parse_rels_xml(&xml_content)
}

/// Map a `w:sym` code out of the Symbol-font private-use area.
fn symbol_char(code: &str) -> Option<char> {
    let cp = u32::from_str_radix(code.trim(), 16).ok()?;
    if cp >= 0xF000 {
        symbol_pua_to_unicode(cp)
    } else {
        char::from_u32(cp)
    }
}

/// Load a `.docx` file from disk.
pub fn load(path: &Path) -> Result<Document, Error> {
    let file = std::fs::File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied => Error::Io(
            std::io::Error::new(e.kind(), format!("{}: {}", e, path.display())),
        ),
        _ => Error::Io(e),
    })?;
    let mut zip = zip::ZipArchive::new(file)
        .map_err(|_| Error::InvalidDocx("file is not a ZIP archive".into()))?;
    load_archive(&mut zip)
}

/// Load a `.docx` package held in memory.
pub fn load_bytes(bytes: &[u8]) -> Result<Document, Error> {
    let mut zip = zip::ZipArchive::new(std::io::Cursor::new(bytes))
        .map_err(|_| Error::InvalidDocx("data is not a ZIP archive".into()))?;
    load_archive(&mut zip)
}

fn load_archive<R: Read + Seek>(zip: &mut zip::ZipArchive<R>) -> Result<Document, Error> {
    let t0 = Instant::now();
    let mut doc = Document::new();

    let theme_name = zip
        .file_names()
        .find(|n| n.starts_with("word/theme/") && n.ends_with(".xml"))
        .map(str::to_string);
    if let Some(xml) = theme_name.and_then(|name| read_zip_text(zip, &name)) {
        match styles::parse_theme(&xml) {
            Ok(theme) => doc.theme = theme,
            Err(e) => log::warn!("Ignoring malformed theme: {e}"),
        }
    }
    if let Some(xml) = read_zip_text(zip, "word/styles.xml") {
        match styles::parse_styles(&xml) {
            Ok(sheet) => doc.styles = sheet,
            Err(e) => log::warn!("Ignoring malformed styles.xml: {e}"),
        }
    }
    if let Some(xml) = read_zip_text(zip, "word/numbering.xml") {
        match numbering::parse_numbering(&xml) {
            Ok(defs) => doc.numbering = defs,
            Err(e) => log::warn!("Ignoring malformed numbering.xml: {e}"),
        }
    }

    let mut xml_content = String::new();
    zip.by_name("word/document.xml")
        .map_err(|_| Error::InvalidDocx("missing word/document.xml (is this a DOCX file?)".into()))?
        .read_to_string(&mut xml_content)?;
    let xml = roxmltree::Document::parse(&xml_content)?;
    let body = wml(xml.root_element(), "body")
        .ok_or_else(|| Error::InvalidDocx("missing w:body".into()))?;

    let body_id = doc.body();
    parse_blocks(&mut doc, body_id, body);

    if let Some(sect) = wml(body, "sectPr") {
        doc.section = parse_section(sect);
        let rels = parse_part_relationships(zip, "word/document.xml");
        doc.header = load_part(zip, &mut doc, sect, "headerReference", &rels, NodeKind::Header);
        doc.footer = load_part(zip, &mut doc, sect, "footerReference", &rels, NodeKind::Footer);
    }

    log::info!(
        "Loaded {} styles, {} nodes in {:.1}ms",
        doc.styles.len(),
        doc.node_count(),
        t0.elapsed().as_secs_f64() * 1000.0
    );
    Ok(doc)
}

fn parse_section(sect: roxmltree::Node) -> Section {
    let pg_sz = wml(sect, "pgSz");
    let pg_mar = wml(sect, "pgMar");
    Section {
        page_width: pg_sz.and_then(|n| twips_attr(n, "w")),
        margin_left: pg_mar.and_then(|n| twips_attr(n, "left")),
        margin_right: pg_mar.and_then(|n| twips_attr(n, "right")),
    }
}

/// The section's default header or footer, parsed into a detached root.
fn load_part<R: Read + Seek>(
    zip: &mut zip::ZipArchive<R>,
    doc: &mut Document,
    sect: roxmltree::Node,
    reference: &str,
    rels: &HashMap<String, String>,
    kind: NodeKind,
) -> Option<NodeId> {
    let rel_id = sect
        .children()
        .filter(|n| is_wml(n, reference))
        .find(|n| n.attribute((WML_NS, "type")).is_none_or(|t| t == "default"))
        .and_then(|n| n.attribute((REL_NS, "id")))?;
    let Some(target) = rels.get(rel_id) else {
        log::debug!("{reference} {rel_id} has no relationship");
        return None;
    };
    let part_path = match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("word/{target}"),
    };
    let xml_content = read_zip_text(zip, &part_path)?;
    let xml = match roxmltree::Document::parse(&xml_content) {
        Ok(xml) => xml,
        Err(e) => {
            log::warn!("Ignoring malformed {part_path}: {e}");
            return None;
        }
    };
    let root = doc.add_root(kind);
    parse_blocks(doc, root, xml.root_element());
    Some(root)
}

fn parse_blocks(doc: &mut Document, parent: NodeId, container: roxmltree::Node) {
    for node in collect_block_nodes(container) {
        if node.tag_name().namespace() != Some(WML_NS) {
            continue;
        }
        match node.tag_name().name() {
            "p" => {
                let p = doc.push(parent, NodeKind::Paragraph, paragraph_props(node));
                parse_inline(doc, p, node);
            }
            "tbl" => parse_table(doc, parent, node),
            _ => {}
        }
    }
}

fn parse_inline(doc: &mut Document, container: NodeId, node: roxmltree::Node) {
    for child in node.children() {
        if child.tag_name().namespace() != Some(WML_NS) {
            continue;
        }
        match child.tag_name().name() {
            "r" => parse_run(doc, container, child),
            "hyperlink" | "fldSimple" => {
                let link = doc.push(container, NodeKind::Hyperlink, Props::default());
                parse_inline(doc, link, child);
            }
            "ins" | "smartTag" => parse_inline(doc, container, child),
            "sdt" => {
                if let Some(content) = wml(child, "sdtContent") {
                    parse_inline(doc, container, content);
                }
            }
            _ => {}
        }
    }
}

fn parse_run(doc: &mut Document, parent: NodeId, r: roxmltree::Node) {
    let mut items: Vec<RunItem> = Vec::new();
    for child in r.children() {
        if child.tag_name().namespace() != Some(WML_NS) {
            continue;
        }
        match child.tag_name().name() {
            "t" => {
                let text = child.text().unwrap_or("");
                if let Some(RunItem::Text(prev)) = items.last_mut() {
                    prev.push_str(text);
                } else if !text.is_empty() {
                    items.push(RunItem::Text(text.to_string()));
                }
            }
            "tab" => items.push(RunItem::Tab),
            "br" => match child.attribute((WML_NS, "type")) {
                Some("page") => items.push(RunItem::PageBreak),
                _ => items.push(RunItem::LineBreak),
            },
            "cr" => items.push(RunItem::LineBreak),
            "sym" => {
                if let Some(ch) = child.attribute((WML_NS, "char")).and_then(symbol_char) {
                    items.push(RunItem::Symbol {
                        font: child.attribute((WML_NS, "font")).map(str::to_string),
                        ch,
                    });
                }
            }
            _ => {}
        }
    }
    let props = Props {
        run: wml(r, "rPr").map(run_props).unwrap_or_default(),
        ..Default::default()
    };
    doc.push(parent, NodeKind::Run(items), props);
}

fn parse_table(doc: &mut Document, parent: NodeId, tbl: roxmltree::Node) {
    let grid: Vec<f32> = wml(tbl, "tblGrid")
        .into_iter()
        .flat_map(|grid| grid.children())
        .filter(|n| is_wml(n, "gridCol"))
        .map(|n| twips_attr(n, "w").unwrap_or(0.0))
        .collect();
    let props = Props {
        table: wml(tbl, "tblPr").map(table_props).unwrap_or_default(),
        ..Default::default()
    };
    let table = doc.push(
        parent,
        NodeKind::Table {
            grid: (!grid.is_empty()).then_some(grid),
        },
        props,
    );

    for tr in collect_block_nodes(tbl).into_iter().filter(|n| is_wml(n, "tr")) {
        let props = Props {
            row: wml(tr, "trPr").map(row_props).unwrap_or_default(),
            ..Default::default()
        };
        let row = doc.push(table, NodeKind::TableRow, props);
        for tc in collect_block_nodes(tr).into_iter().filter(|n| is_wml(n, "tc")) {
            let props = Props {
                cell: wml(tc, "tcPr").map(cell_props).unwrap_or_default(),
                ..Default::default()
            };
            let cell = doc.push(row, NodeKind::TableCell, props);
            parse_blocks(doc, cell, tc);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_codes_leave_private_use_area() {
        assert_eq!(symbol_char("F0B7"), Some('\u{2022}'));
        assert_eq!(symbol_char("F041"), Some('A'));
        assert_eq!(symbol_char("2713"), Some('\u{2713}'));
        assert_eq!(symbol_char("zz"), None);
    }

    #[test]
    fn sdt_blocks_are_flattened() {
        let xml = format!(
            r#"<w:body xmlns:w="{WML_NS}"><w:p/><w:sdt><w:sdtContent><w:p/><w:tbl/></w:sdtContent></w:sdt></w:body>"#
        );
        let doc = roxmltree::Document::parse(&xml).unwrap();
        let names: Vec<&str> = collect_block_nodes(doc.root_element())
            .iter()
            .map(|n| n.tag_name().name())
            .collect();
        assert_eq!(names, ["p", "p", "tbl"]);
    }

    #[test]
    fn rels_targets_by_id() {
        let rels = parse_rels_xml(
            r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
                <Relationship Id="rId7" Type="header" Target="header1.xml"/>
            </Relationships>"#,
        );
        assert_eq!(rels.get("rId7").map(String::as_str), Some("header1.xml"));
    }
}

use crate::model::{AbstractNumbering, NumberFormat, NumberingDefinitions, NumberingLevel};

use super::props::{para_props, run_props};
use super::{WML_NS, wml, wml_attr};

fn is_wml(node: &roxmltree::Node, name: &str) -> bool {
    node.tag_name().name() == name && node.tag_name().namespace() == Some(WML_NS)
}

fn level(node: roxmltree::Node) -> Option<NumberingLevel> {
    let ilvl = node.attribute((WML_NS, "ilvl"))?.parse::<u8>().ok()?;
    let format = wml_attr(node, "numFmt").map_or(NumberFormat::Decimal, NumberFormat::parse);
    let mut level = NumberingLevel::new(ilvl, format, wml_attr(node, "lvlText").unwrap_or(""));
    level.start = wml_attr(node, "start").and_then(|v| v.parse::<i32>().ok());
    level.paragraph_style = wml_attr(node, "pStyle").map(str::to_string);
    if let Some(ppr) = wml(node, "pPr") {
        level.para = para_props(ppr);
    }
    if let Some(rpr) = wml(node, "rPr") {
        level.run = run_props(rpr);
    }
    Some(level)
}

/// `word/numbering.xml`: abstract definitions and `w:num` instances.
pub(super) fn parse_numbering(xml_content: &str) -> Result<NumberingDefinitions, roxmltree::Error> {
    let xml = roxmltree::Document::parse(xml_content)?;
    let mut defs = NumberingDefinitions::default();

    for node in xml.root_element().children() {
        if is_wml(&node, "abstractNum") {
            let Some(id) = node
                .attribute((WML_NS, "abstractNumId"))
                .and_then(|v| v.parse::<i32>().ok())
            else {
                continue;
            };
            let levels = node
                .children()
                .filter(|n| is_wml(n, "lvl"))
                .filter_map(level)
                .collect();
            defs.abstract_nums.insert(id, AbstractNumbering { id, levels });
        } else if is_wml(&node, "num")
            && let Some(num_id) = node.attribute((WML_NS, "numId")).and_then(|v| v.parse::<i32>().ok())
            && let Some(abs_id) = wml_attr(node, "abstractNumId").and_then(|v| v.parse::<i32>().ok())
        {
            defs.instances.insert(num_id, abs_id);
        }
    }

    log::debug!(
        "Numbering: {} abstract definitions, {} instances",
        defs.abstract_nums.len(),
        defs.instances.len()
    );
    Ok(defs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abstract_levels_and_instances() {
        let xml = r#"<w:numbering xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
            <w:abstractNum w:abstractNumId="3">
                <w:lvl w:ilvl="0"><w:start w:val="5"/><w:numFmt w:val="upperRoman"/><w:lvlText w:val="%1."/>
                    <w:pPr><w:ind w:left="720" w:hanging="360"/></w:pPr></w:lvl>
                <w:lvl w:ilvl="1"><w:numFmt w:val="bullet"/><w:lvlText w:val="o"/><w:pStyle w:val="ListBullet"/>
                    <w:rPr><w:rFonts w:ascii="Courier New"/></w:rPr></w:lvl>
            </w:abstractNum>
            <w:num w:numId="1"><w:abstractNumId w:val="3"/></w:num>
        </w:numbering>"#;
        let defs = parse_numbering(xml).unwrap();
        let abs = defs.abstract_for(1).unwrap();
        let first = abs.level(0).unwrap();
        assert_eq!(first.start, Some(5));
        assert_eq!(first.format, NumberFormat::UpperRoman);
        assert_eq!(first.para.indentation.and_then(|i| i.hanging), Some(18.0));
        let second = abs.level(1).unwrap();
        assert_eq!(second.paragraph_style.as_deref(), Some("ListBullet"));
        assert_eq!(
            second.run.fonts.as_ref().and_then(|f| f.ascii.as_deref()),
            Some("Courier New")
        );
        assert!(defs.abstract_for(2).is_none());
    }
}

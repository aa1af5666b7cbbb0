use crate::model::{Props, Style, StyleKind, StyleSheet, Theme, ThemeFontScheme};
use crate::units::on_off;

use super::props::{para_props, props_under, run_props};
use super::{DML_NS, WML_NS, wml, wml_attr};

fn dml<'a>(node: roxmltree::Node<'a, 'a>, name: &str) -> Option<roxmltree::Node<'a, 'a>> {
    node.children()
        .find(|n| n.tag_name().name() == name && n.tag_name().namespace() == Some(DML_NS))
}

fn typeface<'a>(node: roxmltree::Node<'a, 'a>, slot: &str) -> Option<String> {
    dml(node, slot)
        .and_then(|n| n.attribute("typeface"))
        .filter(|tf| !tf.is_empty())
        .map(str::to_string)
}

fn font_scheme(node: roxmltree::Node) -> ThemeFontScheme {
    ThemeFontScheme {
        latin: typeface(node, "latin"),
        east_asian: typeface(node, "ea"),
        complex_script: typeface(node, "cs"),
        supplemental: node
            .children()
            .filter(|n| n.tag_name().name() == "font" && n.tag_name().namespace() == Some(DML_NS))
            .filter_map(|n| Some((n.attribute("script")?.to_string(), n.attribute("typeface")?.to_string())))
            .collect(),
    }
}

/// Major and minor font schemes of `word/theme/themeN.xml`.
pub(super) fn parse_theme(xml_content: &str) -> Result<Theme, roxmltree::Error> {
    let xml = roxmltree::Document::parse(xml_content)?;
    let mut theme = Theme::default();
    for node in xml.descendants() {
        if node.tag_name().namespace() != Some(DML_NS) {
            continue;
        }
        match node.tag_name().name() {
            "majorFont" => theme.major = font_scheme(node),
            "minorFont" => theme.minor = font_scheme(node),
            _ => {}
        }
    }
    Ok(theme)
}

fn style_kind(val: &str) -> Option<StyleKind> {
    match val {
        "paragraph" => Some(StyleKind::Paragraph),
        "character" => Some(StyleKind::Character),
        "table" => Some(StyleKind::Table),
        "numbering" => Some(StyleKind::Numbering),
        _ => None,
    }
}

fn doc_defaults(node: roxmltree::Node) -> Props {
    let mut props = Props::default();
    if let Some(rpr) = wml(node, "rPrDefault").and_then(|n| wml(n, "rPr")) {
        props.run = run_props(rpr);
    }
    if let Some(ppr) = wml(node, "pPrDefault").and_then(|n| wml(n, "pPr")) {
        props.para = para_props(ppr);
    }
    props
}

/// `word/styles.xml`: document defaults and every style, with linked
/// styles folded.
pub(super) fn parse_styles(xml_content: &str) -> Result<StyleSheet, roxmltree::Error> {
    let xml = roxmltree::Document::parse(xml_content)?;
    let root = xml.root_element();
    let mut sheet = StyleSheet::default();

    if let Some(defaults) = wml(root, "docDefaults") {
        sheet.doc_defaults = doc_defaults(defaults);
    }

    for node in root.children() {
        if node.tag_name().name() != "style" || node.tag_name().namespace() != Some(WML_NS) {
            continue;
        }
        let Some(id) = node.attribute((WML_NS, "styleId")) else {
            log::debug!("Skipping style without styleId");
            continue;
        };
        let Some(kind) = node.attribute((WML_NS, "type")).and_then(style_kind) else {
            log::debug!("Skipping style {id} of unknown type");
            continue;
        };
        let mut style = Style::new(id, kind);
        style.name = wml_attr(node, "name").map(str::to_string);
        style.based_on = wml_attr(node, "basedOn").map(str::to_string);
        style.link = wml_attr(node, "link").map(str::to_string);
        style.is_default = node.attribute((WML_NS, "default")).is_some_and(|v| on_off(Some(v)));
        style.props = props_under(node);
        sheet.insert(style);
    }

    sheet.resolve_links();
    Ok(sheet)
}

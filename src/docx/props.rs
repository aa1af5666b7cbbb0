//! `w:rPr`, `w:pPr`, `w:tblPr`, `w:trPr` and `w:tcPr` into typed properties.

use crate::model::{
    Alignment, Border, BorderSet, BorderStyle, CellMargins, CellProps, CellVAlign, Color,
    FontHint, HeightRule, Indentation, Languages, LineRule, NumberingRef, ParaProps, Props,
    RowHeight, RowProps, RunFonts, RunProps, Shading, Spacing, TableProps, VMerge, VertAlign,
    WidthSpec,
};
use crate::units::{eighth_points_to_pts, half_points_to_pts, parse_hex_color, percentage, twips_to_pts};

use super::{WML_NS, twips_attr, wml, wml_attr, wml_bool};

type Node<'a> = roxmltree::Node<'a, 'a>;

fn attr<'a>(node: Node<'a>, name: &str) -> Option<&'a str> {
    node.attribute((WML_NS, name))
}

fn num_attr<T: std::str::FromStr>(node: Node, name: &str) -> Option<T> {
    attr(node, name).and_then(|v| v.trim().parse::<T>().ok())
}

fn color(val: &str) -> Option<Color> {
    if val == "auto" {
        return Some(Color::Auto);
    }
    parse_hex_color(val).map(Color::Rgb)
}

fn parse_alignment(val: &str) -> Alignment {
    match val {
        "center" => Alignment::Center,
        "right" | "end" => Alignment::Right,
        "both" | "distribute" => Alignment::Justify,
        _ => Alignment::Left,
    }
}

/// Properties of a style or of `w:docDefaults`-like containers: any of the
/// five property elements found directly under `node`.
pub(super) fn props_under(node: Node) -> Props {
    let mut props = Props::default();
    if let Some(ppr) = wml(node, "pPr") {
        props.para = para_props(ppr);
    }
    if let Some(rpr) = wml(node, "rPr") {
        props.run = run_props(rpr);
    }
    if let Some(tbl_pr) = wml(node, "tblPr") {
        props.table = table_props(tbl_pr);
    }
    if let Some(tr_pr) = wml(node, "trPr") {
        props.row = row_props(tr_pr);
    }
    if let Some(tc_pr) = wml(node, "tcPr") {
        props.cell = cell_props(tc_pr);
    }
    props
}

/// Direct properties of a paragraph: `w:pPr` plus its paragraph-mark `w:rPr`.
pub(super) fn paragraph_props(p: Node) -> Props {
    let Some(ppr) = wml(p, "pPr") else {
        return Props::default();
    };
    Props {
        para: para_props(ppr),
        run: wml(ppr, "rPr").map(run_props).unwrap_or_default(),
        ..Default::default()
    }
}

pub(super) fn run_props(rpr: Node) -> RunProps {
    RunProps {
        style: wml_attr(rpr, "rStyle").map(str::to_string),
        fonts: wml(rpr, "rFonts").map(run_fonts),
        bold: wml_bool(rpr, "b"),
        italic: wml_bool(rpr, "i"),
        strike: wml_bool(rpr, "strike").or_else(|| wml_bool(rpr, "dstrike")),
        caps: wml_bool(rpr, "caps"),
        vanish: wml_bool(rpr, "vanish"),
        rtl: wml_bool(rpr, "rtl"),
        complex_script: wml_bool(rpr, "cs"),
        underline: wml(rpr, "u").map(|u| attr(u, "val").is_none_or(|v| v != "none")),
        vert_align: wml_attr(rpr, "vertAlign").map(|v| match v {
            "superscript" => VertAlign::Superscript,
            "subscript" => VertAlign::Subscript,
            _ => VertAlign::Baseline,
        }),
        size: wml(rpr, "sz").and_then(|n| num_attr::<f32>(n, "val")).map(half_points_to_pts),
        size_cs: wml(rpr, "szCs").and_then(|n| num_attr::<f32>(n, "val")).map(half_points_to_pts),
        color: wml_attr(rpr, "color").and_then(color),
        lang: wml(rpr, "lang").map(|n| Languages {
            val: attr(n, "val").map(str::to_string),
            east_asia: attr(n, "eastAsia").map(str::to_string),
            bidi: attr(n, "bidi").map(str::to_string),
        }),
        shading: wml(rpr, "shd").map(shading),
    }
}

fn run_fonts(node: Node) -> RunFonts {
    let name = |a: &str| attr(node, a).map(str::to_string);
    RunFonts {
        ascii: name("ascii"),
        h_ansi: name("hAnsi"),
        east_asia: name("eastAsia"),
        cs: name("cs"),
        ascii_theme: name("asciiTheme"),
        h_ansi_theme: name("hAnsiTheme"),
        east_asia_theme: name("eastAsiaTheme"),
        cs_theme: name("cstheme"),
        hint: attr(node, "hint").map(|h| match h {
            "eastAsia" => FontHint::EastAsia,
            "cs" => FontHint::ComplexScript,
            _ => FontHint::Default,
        }),
    }
}

fn shading(node: Node) -> Shading {
    Shading {
        fill: attr(node, "fill").and_then(color),
    }
}

pub(super) fn para_props(ppr: Node) -> ParaProps {
    ParaProps {
        style: wml_attr(ppr, "pStyle").map(str::to_string),
        numbering: wml(ppr, "numPr").map(|n| NumberingRef {
            num_id: wml(n, "numId").and_then(|id| num_attr(id, "val")),
            ilvl: wml(n, "ilvl").and_then(|lvl| num_attr(lvl, "val")),
        }),
        spacing: wml(ppr, "spacing").map(spacing),
        indentation: wml(ppr, "ind").map(indentation),
        alignment: wml_attr(ppr, "jc").map(parse_alignment),
        keep_lines: wml_bool(ppr, "keepLines"),
        keep_next: wml_bool(ppr, "keepNext"),
        contextual_spacing: wml_bool(ppr, "contextualSpacing"),
        auto_space_de: wml_bool(ppr, "autoSpaceDE"),
        auto_space_dn: wml_bool(ppr, "autoSpaceDN"),
        shading: wml(ppr, "shd").map(shading),
    }
}

fn spacing(node: Node) -> Spacing {
    Spacing {
        before: twips_attr(node, "before"),
        after: twips_attr(node, "after"),
        before_lines: num_attr(node, "beforeLines"),
        after_lines: num_attr(node, "afterLines"),
        line: num_attr(node, "line"),
        line_rule: attr(node, "lineRule").map(|r| match r {
            "exact" => LineRule::Exact,
            "atLeast" => LineRule::AtLeast,
            _ => LineRule::Auto,
        }),
    }
}

fn indentation(node: Node) -> Indentation {
    Indentation {
        left: twips_attr(node, "left"),
        start: twips_attr(node, "start"),
        right: twips_attr(node, "right"),
        end: twips_attr(node, "end"),
        hanging: twips_attr(node, "hanging"),
        first_line: twips_attr(node, "firstLine"),
        left_chars: num_attr(node, "leftChars"),
        start_chars: num_attr(node, "startChars"),
        right_chars: num_attr(node, "rightChars"),
        end_chars: num_attr(node, "endChars"),
        hanging_chars: num_attr(node, "hangingChars"),
        first_line_chars: num_attr(node, "firstLineChars"),
    }
}

/// `ST_TblWidth`: `w:w` with `w:type` of `dxa` (default), `pct`, `auto` or
/// `nil`.
pub(super) fn width_spec(node: Node) -> WidthSpec {
    let value = attr(node, "w").unwrap_or("0");
    match attr(node, "type").unwrap_or("dxa") {
        "auto" => WidthSpec::Auto,
        "nil" => WidthSpec::Nil,
        "pct" => WidthSpec::Pct(percentage(value)),
        _ => WidthSpec::Dxa(value.trim().parse::<f32>().map(twips_to_pts).unwrap_or(0.0)),
    }
}

fn border(node: Node) -> Border {
    Border {
        style: attr(node, "val").map_or(BorderStyle::None, BorderStyle::parse),
        width: num_attr::<f32>(node, "sz").map(eighth_points_to_pts),
        color: attr(node, "color").and_then(color),
    }
}

fn border_set(node: Node) -> BorderSet {
    let edge = |names: &[&str]| names.iter().find_map(|name| wml(node, name)).map(border);
    BorderSet {
        top: edge(&["top"]),
        bottom: edge(&["bottom"]),
        left: edge(&["left", "start"]),
        right: edge(&["right", "end"]),
        inside_h: edge(&["insideH"]),
        inside_v: edge(&["insideV"]),
        tl2br: edge(&["tl2br"]),
        tr2bl: edge(&["tr2bl"]),
    }
}

fn cell_margins(node: Node) -> CellMargins {
    let side = |names: &[&str]| {
        names
            .iter()
            .find_map(|name| wml(node, name))
            .and_then(|n| match width_spec(n) {
                WidthSpec::Dxa(pt) => Some(pt),
                WidthSpec::Nil => Some(0.0),
                _ => None,
            })
    };
    CellMargins {
        top: side(&["top"]),
        left: side(&["left", "start"]),
        bottom: side(&["bottom"]),
        right: side(&["right", "end"]),
    }
}

pub(super) fn table_props(tbl_pr: Node) -> TableProps {
    TableProps {
        style: wml_attr(tbl_pr, "tblStyle").map(str::to_string),
        width: wml(tbl_pr, "tblW").map(width_spec),
        borders: wml(tbl_pr, "tblBorders").map(border_set),
        alignment: wml_attr(tbl_pr, "jc").map(parse_alignment),
        indent: wml(tbl_pr, "tblInd").map(width_spec),
        cell_margins: wml(tbl_pr, "tblCellMar").map(cell_margins),
        shading: wml(tbl_pr, "shd").map(shading),
    }
}

pub(super) fn row_props(tr_pr: Node) -> RowProps {
    RowProps {
        grid_before: wml(tr_pr, "gridBefore").and_then(|n| num_attr(n, "val")),
        grid_after: wml(tr_pr, "gridAfter").and_then(|n| num_attr(n, "val")),
        width_before: wml(tr_pr, "wBefore").map(width_spec),
        width_after: wml(tr_pr, "wAfter").map(width_spec),
        height: wml(tr_pr, "trHeight").and_then(|n| {
            Some(RowHeight {
                value: twips_attr(n, "val")?,
                rule: match attr(n, "hRule") {
                    Some("exact") => HeightRule::Exact,
                    Some("auto") => HeightRule::Auto,
                    _ => HeightRule::AtLeast,
                },
            })
        }),
    }
}

pub(super) fn cell_props(tc_pr: Node) -> CellProps {
    CellProps {
        width: wml(tc_pr, "tcW").map(width_spec),
        grid_span: wml(tc_pr, "gridSpan").and_then(|n| num_attr(n, "val")),
        v_merge: wml(tc_pr, "vMerge").map(|n| match attr(n, "val") {
            Some("restart") => VMerge::Restart,
            _ => VMerge::Continue,
        }),
        borders: wml(tc_pr, "tcBorders").map(border_set),
        margins: wml(tc_pr, "tcMar").map(cell_margins),
        shading: wml(tc_pr, "shd").map(shading),
        v_align: wml_attr(tc_pr, "vAlign").map(|v| match v {
            "center" => CellVAlign::Center,
            "bottom" => CellVAlign::Bottom,
            _ => CellVAlign::Top,
        }),
    }
}

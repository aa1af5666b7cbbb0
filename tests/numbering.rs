mod common;

use common::{Package, body_paragraphs, layout};
use docxide_layout::layout::{ChunkContent, LABEL_DEFAULT_SIZE};
use docxide_layout::model::NumberFormat;
use docxide_layout::numbering::{NumberingCounter, format_number};

const NUMBERING: &str = r#"
    <w:abstractNum w:abstractNumId="0">
        <w:lvl w:ilvl="0"><w:start w:val="1"/><w:numFmt w:val="decimal"/><w:lvlText w:val="%1."/>
            <w:pPr><w:ind w:left="720" w:hanging="360"/></w:pPr></w:lvl>
        <w:lvl w:ilvl="1"><w:start w:val="1"/><w:numFmt w:val="lowerLetter"/><w:lvlText w:val="%1.%2)"/>
            <w:pPr><w:ind w:left="1440" w:hanging="360"/></w:pPr></w:lvl>
    </w:abstractNum>
    <w:abstractNum w:abstractNumId="1">
        <w:lvl w:ilvl="0"><w:start w:val="3"/><w:numFmt w:val="upperRoman"/><w:lvlText w:val="%1"/></w:lvl>
    </w:abstractNum>
    <w:abstractNum w:abstractNumId="2">
        <w:lvl w:ilvl="0"><w:numFmt w:val="bullet"/><w:lvlText w:val="&#xF0B7;"/>
            <w:rPr><w:rFonts w:ascii="Symbol" w:hAnsi="Symbol"/><w:sz w:val="18"/></w:rPr></w:lvl>
    </w:abstractNum>
    <w:abstractNum w:abstractNumId="3">
        <w:lvl w:ilvl="0"><w:numFmt w:val="decimal"/><w:lvlText w:val="%1."/><w:pStyle w:val="ListHeading"/></w:lvl>
        <w:lvl w:ilvl="1"><w:numFmt w:val="taiwaneseCountingThousand"/><w:lvlText w:val="%2、"/><w:pStyle w:val="ListSub"/></w:lvl>
    </w:abstractNum>
    <w:num w:numId="1"><w:abstractNumId w:val="0"/></w:num>
    <w:num w:numId="2"><w:abstractNumId w:val="1"/></w:num>
    <w:num w:numId="3"><w:abstractNumId w:val="2"/></w:num>
    <w:num w:numId="4"><w:abstractNumId w:val="3"/></w:num>
    <w:num w:numId="5"><w:abstractNumId w:val="0"/></w:num>
"#;

fn item(num_id: i32, ilvl: Option<u8>, text: &str) -> String {
    let ilvl = ilvl.map(|l| format!(r#"<w:ilvl w:val="{l}"/>"#)).unwrap_or_default();
    format!(
        r#"<w:p><w:pPr><w:numPr>{ilvl}<w:numId w:val="{num_id}"/></w:numPr></w:pPr><w:r><w:t>{text}</w:t></w:r></w:p>"#
    )
}

fn labels(body: &str, styles: &str) -> Vec<Option<String>> {
    let doc = Package::new(body).numbering(NUMBERING).styles(styles).load();
    let blocks = layout(&doc);
    body_paragraphs(&blocks)
        .iter()
        .map(|p| p.numbering_label().map(str::to_string))
        .collect()
}

#[test]
fn nested_levels_restart_below_and_read_above() {
    let body = [
        item(1, Some(0), "one"),
        item(1, Some(1), "a"),
        item(1, Some(1), "b"),
        item(1, Some(0), "two"),
        item(1, Some(1), "a again"),
    ]
    .concat();
    let got = labels(&body, "");
    let expected = ["1.", "1.a)", "1.b)", "2.", "2.a)"];
    assert_eq!(got, expected.map(|s| Some(s.to_string())));
}

#[test]
fn instances_of_one_abstract_share_counters() {
    let body = [item(1, Some(0), "x"), item(5, Some(0), "y")].concat();
    assert_eq!(labels(&body, ""), vec![Some("1.".into()), Some("2.".into())]);
}

#[test]
fn start_value_and_roman_format() {
    let body = [item(2, Some(0), "x"), item(2, Some(0), "y")].concat();
    assert_eq!(labels(&body, ""), vec![Some("III".into()), Some("IV".into())]);
}

#[test]
fn non_positive_num_id_disables_numbering() {
    let body = [item(0, Some(0), "x"), item(42, Some(0), "y")].concat();
    assert_eq!(labels(&body, ""), vec![None, None]);
}

#[test]
fn level_found_through_paragraph_style() {
    let styles = r#"
        <w:style w:type="paragraph" w:styleId="ListHeading"><w:pPr><w:numPr><w:numId w:val="4"/></w:numPr></w:pPr></w:style>
        <w:style w:type="paragraph" w:styleId="ListSub"><w:pPr><w:numPr><w:numId w:val="4"/></w:numPr></w:pPr></w:style>"#;
    let para = |style: &str, text: &str| {
        format!(r#"<w:p><w:pPr><w:pStyle w:val="{style}"/></w:pPr><w:r><w:t>{text}</w:t></w:r></w:p>"#)
    };
    let body = [
        para("ListHeading", "h"),
        para("ListSub", "s1"),
        para("ListSub", "s2"),
    ]
    .concat();
    assert_eq!(
        labels(&body, styles),
        vec![Some("1.".into()), Some("一、".into()), Some("二、".into())]
    );
}

#[test]
fn bullet_label_uses_level_font_and_is_normalised() {
    let doc = Package::new(&item(3, Some(0), "point")).numbering(NUMBERING).load();
    let blocks = layout(&doc);
    let p = body_paragraphs(&blocks)[0];
    let label = &p.chunks[0];
    assert!(label.numbering);
    assert_eq!(label.text(), Some("\u{2022}"));
    assert_eq!(label.font.family, "Symbol");
    assert_eq!(label.size, 9.0);
}

#[test]
fn label_without_any_size_uses_the_label_default() {
    let doc = Package::new(&item(1, Some(0), "text")).numbering(NUMBERING).load();
    let blocks = layout(&doc);
    let label = &body_paragraphs(&blocks)[0].chunks[0];
    assert!(label.numbering);
    assert_eq!(label.size, LABEL_DEFAULT_SIZE);
    assert_eq!(LABEL_DEFAULT_SIZE, 12.0);
}

#[test]
fn hanging_indent_is_padded_after_the_label() {
    let doc = Package::new(&item(1, Some(0), "text")).numbering(NUMBERING).load();
    let blocks = layout(&doc);
    let p = body_paragraphs(&blocks)[0];
    assert_eq!(p.indent_left, 36.0);
    assert_eq!(p.first_line_indent, -18.0);
    let ChunkContent::Spacer(pad) = p.chunks[1].content else {
        panic!("label should be followed by a spacer");
    };
    assert!(pad > 0.0 && pad < 18.0);
    assert!(p.chunks[1].numbering);
    assert_eq!(p.chunks[2].text(), Some("text"));
}

#[test]
fn counter_counts_up_and_restarts_deeper_levels() {
    let mut counter = NumberingCounter::new();
    counter.set_start(1, 0, 1);
    counter.set_start(1, 1, 1);
    assert_eq!(counter.advance(1, 0), vec![1]);
    assert_eq!(counter.advance(1, 1), vec![1, 1]);
    assert_eq!(counter.advance(1, 1), vec![1, 2]);
    assert_eq!(counter.advance(1, 0), vec![2]);
    assert_eq!(counter.advance(1, 0), vec![3]);
    assert_eq!(counter.advance(1, 1), vec![3, 1]);
}

#[test]
fn counter_start_rules() {
    let mut counter = NumberingCounter::new();
    counter.set_start(7, 0, 0);
    assert_eq!(counter.advance(7, 0), vec![0]);
    counter.set_start(7, 1, -4);
    assert_eq!(counter.current(7, 1), None);
    assert_eq!(counter.advance(7, 1), vec![0]);
}

#[test]
fn numeral_formats() {
    assert_eq!(format_number(7, &NumberFormat::DecimalZero), "07");
    assert_eq!(format_number(14, &NumberFormat::LowerRoman), "xiv");
    assert_eq!(format_number(28, &NumberFormat::UpperLetter), "AB");
    assert_eq!(format_number(105, &NumberFormat::TaiwaneseCountingThousand), "一百零五");
    assert_eq!(format_number(20, &NumberFormat::TaiwaneseCountingThousand), "二十");
    assert_eq!(format_number(9, &NumberFormat::Other("ordinal".into())), "9");
}

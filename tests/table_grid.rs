mod common;

use common::{Package, assert_close, first_table, layout};
use docxide_layout::cascade::StyleResolver;
use docxide_layout::layout::{LayoutBlock, TableBlock};
use docxide_layout::model::{Alignment, CellVAlign, HeightRule};
use docxide_layout::table::{TableGrid, resolve_table};

const SECTION: &str = r#"<w:sectPr><w:pgSz w:w="12240" w:h="15840"/><w:pgMar w:left="1440" w:right="1440"/></w:sectPr>"#;

fn cell(props: &str, text: &str) -> String {
    format!("<w:tc><w:tcPr>{props}</w:tcPr><w:p><w:r><w:t>{text}</w:t></w:r></w:p></w:tc>")
}

fn table(tbl_pr: &str, grid: &[u32], rows: &[String]) -> String {
    let grid: String = grid
        .iter()
        .map(|w| format!(r#"<w:gridCol w:w="{w}"/>"#))
        .collect();
    let grid = if grid.is_empty() {
        String::new()
    } else {
        format!("<w:tblGrid>{grid}</w:tblGrid>")
    };
    format!("<w:tbl><w:tblPr>{tbl_pr}</w:tblPr>{grid}{}</w:tbl>", rows.concat())
}

fn row(tr_pr: &str, cells: &[String]) -> String {
    format!("<w:tr><w:trPr>{tr_pr}</w:trPr>{}</w:tr>", cells.concat())
}

fn resolve(body: &str) -> TableBlock {
    let doc = Package::new(&format!("{body}{SECTION}")).load();
    first_table(&layout(&doc)).clone()
}

fn cell_text(block: &TableBlock, cell_id: usize) -> String {
    block.cells[&cell_id]
        .iter()
        .filter_map(|b| match b {
            LayoutBlock::Paragraph(p) => Some(p.text()),
            LayoutBlock::Table(_) => None,
        })
        .collect()
}

#[test]
fn plain_grid_assigns_ids_in_reading_order() {
    let block = resolve(&table(
        "",
        &[2000, 3000],
        &[
            row("", &[cell("", "a"), cell("", "b")]),
            row("", &[cell("", "c"), cell("", "d")]),
        ],
    ));
    let t = &block.layout;
    assert_eq!(t.column_widths, vec![100.0, 150.0]);
    assert_eq!(t.cells.len(), 4);
    assert_eq!(t.cell_at(1, 0).map(|c| c.cell_id), Some(2));
    assert_eq!(t.cell(3).map(|c| c.width), Some(150.0));
    assert_eq!(cell_text(&block, 1), "b");
}

#[test]
fn grid_span_covers_columns_with_one_id() {
    let block = resolve(&table(
        "",
        &[2000, 3000],
        &[
            row("", &[cell(r#"<w:gridSpan w:val="2"/>"#, "wide")]),
            row("", &[cell("", "c"), cell("", "d")]),
        ],
    ));
    let t = &block.layout;
    let wide = t.cell_at(0, 1).unwrap();
    assert_eq!(wide.cell_id, 0);
    assert_eq!(wide.col_span, 2);
    assert_eq!(wide.width, 250.0);
    assert_eq!(t.cell_at(1, 0).map(|c| c.cell_id), Some(1));
    assert_eq!(t.cell_at(1, 1).map(|c| c.cell_id), Some(2));
}

#[test]
fn vertical_merge_continues_the_cell_above() {
    let block = resolve(&table(
        "",
        &[2000, 2000],
        &[
            row("", &[cell(r#"<w:vMerge w:val="restart"/>"#, "tall"), cell("", "b")]),
            row("", &[cell("<w:vMerge/>", ""), cell("", "c")]),
            row("", &[cell("", "d"), cell("", "e")]),
        ],
    ));
    let t = &block.layout;
    assert_eq!(t.cells.len(), 5);
    let tall = t.cell(0).unwrap();
    assert_eq!(tall.row_span, 2);
    assert_eq!(t.cell_at(1, 0).map(|c| c.cell_id), Some(0));
    assert_eq!(t.cell_at(1, 1).map(|c| c.cell_id), Some(2));
    assert_eq!(t.cell_at(2, 0).map(|c| c.cell_id), Some(3));
    assert_eq!(cell_text(&block, 0), "tall");
}

#[test]
fn merge_continue_in_first_row_gets_a_fresh_id() {
    let block = resolve(&table(
        "",
        &[2000, 2000],
        &[row("", &[cell("<w:vMerge/>", "x"), cell("", "y")])],
    ));
    let t = &block.layout;
    assert_eq!(t.cells.len(), 2);
    assert_eq!(t.cell_at(0, 0).map(|c| c.cell_id), Some(0));
    assert_eq!(t.cell_at(0, 1).map(|c| c.cell_id), Some(1));
}

#[test]
fn grid_before_and_after_are_placeholders() {
    let block = resolve(&table(
        "",
        &[1000, 1000, 1000],
        &[
            row(
                r#"<w:gridBefore w:val="1"/><w:gridAfter w:val="1"/>"#,
                &[cell("", "mid")],
            ),
            row("", &[cell("", "a"), cell("", "b"), cell("", "c")]),
        ],
    ));
    let t = &block.layout;
    // ids 0 and 2 are the blanks of the first row
    let mid = t.cell_at(0, 1).unwrap();
    assert_eq!(mid.cell_id, 1);
    assert!(t.cell_at(0, 0).is_none());
    assert!(t.cell_at(0, 2).is_none());
    assert_eq!(t.cells.len(), 4);
    assert_eq!(t.cell_at(1, 0).map(|c| c.cell_id), Some(3));
}

#[test]
fn grid_slots_match_layout() {
    let doc = Package::new(&table(
        "",
        &[1000, 1000],
        &[row(r#"<w:gridBefore w:val="1"/>"#, &[cell("", "x")])],
    ))
    .load();
    let resolver = StyleResolver::new(&doc);
    let tbl = doc.children(doc.body())[0];
    let grid = TableGrid::build(&doc, &resolver, tbl, 2);
    assert!(grid.slot(0, 0).unwrap().is_blank());
    assert_eq!(grid.cell_id_at(0, 0), None);
    assert_eq!(grid.cell_id_at(0, 1), Some(1));
    assert_eq!(grid.cells().len(), 1);
}

#[test]
fn missing_grid_splits_printable_width() {
    let block = resolve(&table(
        "",
        &[],
        &[row("", &[cell("", "a"), cell("", "b"), cell("", "c")])],
    ));
    assert_eq!(block.layout.column_widths, vec![156.0, 156.0, 156.0]);
}

#[test]
fn percentage_cells_without_grid() {
    let block = resolve(&table(
        r#"<w:tblW w:w="5000" w:type="pct"/>"#,
        &[],
        &[row(
            "",
            &[
                cell(r#"<w:tcW w:w="25%" w:type="pct"/>"#, "a"),
                cell(r#"<w:tcW w:w="3750" w:type="pct"/>"#, "b"),
            ],
        )],
    ));
    let cols = &block.layout.column_widths;
    assert_close(cols[0], 117.0);
    assert_close(cols[1], 351.0);
}

#[test]
fn declared_cell_width_widens_its_column() {
    let block = resolve(&table(
        "",
        &[1000, 1000],
        &[row(
            "",
            &[cell(r#"<w:tcW w:w="2000" w:type="dxa"/>"#, "a"), cell("", "b")],
        )],
    ));
    assert_eq!(block.layout.column_widths, vec![100.0, 50.0]);
}

#[test]
fn fixed_table_width_scales_columns_down() {
    let block = resolve(&table(
        r#"<w:tblW w:w="4000" w:type="dxa"/>"#,
        &[2000, 6000],
        &[row("", &[cell("", "a"), cell("", "b")])],
    ));
    let cols = &block.layout.column_widths;
    assert_close(cols[0], 50.0);
    assert_close(cols[1], 150.0);
    assert_close(cols[1] / cols[0], 3.0);
    assert_close(block.layout.total_width(), 200.0);
}

#[test]
fn oversized_span_without_grid_is_capped() {
    let block = resolve(&table(
        "",
        &[],
        &[
            row("", &[cell(r#"<w:gridSpan w:val="400000000"/>"#, "wide")]),
            row("", &[cell("", "a"), cell("", "b")]),
        ],
    ));
    let t = &block.layout;
    assert_eq!(t.column_widths.len(), 63);
    assert!((t.total_width() - 468.0).abs() < 0.01);
    assert_eq!(t.cell(0).map(|c| c.col_span), Some(63));
    assert_eq!(cell_text(&block, 0), "wide");
}

#[test]
fn oversized_spans_are_clamped_to_the_grid() {
    let block = resolve(&table(
        "",
        &[2000, 3000],
        &[
            row(
                r#"<w:gridBefore w:val="400000000"/><w:gridAfter w:val="400000000"/>"#,
                &[cell("", "lost")],
            ),
            row("", &[cell(r#"<w:gridSpan w:val="400000000"/>"#, "wide")]),
            row("", &[cell("", "a"), cell("", "b")]),
        ],
    ));
    let t = &block.layout;
    assert_eq!(t.column_widths, vec![100.0, 150.0]);
    let wide = t.cell_at(1, 0).unwrap();
    assert_eq!(wide.col_span, 2);
    assert_eq!(cell_text(&block, wide.cell_id), "wide");
    assert_eq!(t.cell_at(2, 1).map(|c| c.col_span), Some(1));
}

#[test]
fn table_and_row_attributes() {
    let block = resolve(&table(
        r#"<w:jc w:val="center"/><w:tblInd w:w="144" w:type="dxa"/>"#,
        &[2000],
        &[
            row(
                r#"<w:trHeight w:val="720" w:hRule="exact"/>"#,
                &[cell(r#"<w:vAlign w:val="bottom"/><w:shd w:val="clear" w:fill="D9E2F3"/>"#, "a")],
            ),
            row(r#"<w:trHeight w:val="400"/>"#, &[cell(r#"<w:shd w:fill="auto"/>"#, "b")]),
        ],
    ));
    let t = &block.layout;
    assert_eq!(t.alignment, Alignment::Center);
    assert_eq!(t.indent, 7.2);
    let first = t.rows[0].height.unwrap();
    assert_eq!((first.value, first.rule), (36.0, HeightRule::Exact));
    assert_eq!(t.rows[1].height.map(|h| h.rule), Some(HeightRule::AtLeast));
    assert_eq!(t.cell(0).map(|c| c.v_align), Some(CellVAlign::Bottom));
    assert_eq!(t.cell(0).and_then(|c| c.fill), Some([0xD9, 0xE2, 0xF3]));
    assert_eq!(t.cell(1).and_then(|c| c.fill), None);
}

pub mod cascade;
pub mod config;
pub mod docx;
mod error;
pub mod fonts;
pub mod layout;
pub mod model;
pub mod numbering;
pub mod script;
pub mod table;
pub mod units;

pub use config::LayoutOptions;
pub use error::Error;

use std::path::Path;
use std::time::Instant;

use fonts::{FontCatalog, SystemFonts};
use layout::{LayoutEngine, LayoutSink};
use model::Document;

/// Load `input` and stream its resolved layout into `sink`.
pub fn layout_docx(input: &Path, options: &LayoutOptions, sink: &mut impl LayoutSink) -> Result<(), Error> {
    let t0 = Instant::now();
    let doc = docx::load(input)?;
    let t_parse = t0.elapsed();
    layout_loaded(&doc, options, sink, t0, t_parse);
    Ok(())
}

pub fn layout_docx_bytes(input: &[u8], options: &LayoutOptions, sink: &mut impl LayoutSink) -> Result<(), Error> {
    let t0 = Instant::now();
    let doc = docx::load_bytes(input)?;
    let t_parse = t0.elapsed();
    layout_loaded(&doc, options, sink, t0, t_parse);
    Ok(())
}

/// Resolve an already loaded document against `catalog`.
pub fn layout_document(
    doc: &Document,
    catalog: &dyn FontCatalog,
    options: &LayoutOptions,
    sink: &mut impl LayoutSink,
) {
    LayoutEngine::new(doc, catalog, options).run(sink);
}

fn layout_loaded(
    doc: &Document,
    options: &LayoutOptions,
    sink: &mut impl LayoutSink,
    t0: Instant,
    t_parse: std::time::Duration,
) {
    let catalog = SystemFonts::new(options.font_directories());
    let t_fonts = t0.elapsed();

    layout_document(doc, &catalog, options, sink);
    let t_total = t0.elapsed();

    log::info!(
        "Timing: parse={:.1}ms, fonts={:.1}ms, layout={:.1}ms, total={:.1}ms ({} font families)",
        t_parse.as_secs_f64() * 1000.0,
        (t_fonts - t_parse).as_secs_f64() * 1000.0,
        (t_total - t_fonts).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        catalog.family_count(),
    );
}

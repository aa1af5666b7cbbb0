use std::path::PathBuf;
use std::process;

use clap::Parser;
use docxide_layout::LayoutOptions;
use docxide_layout::layout::TextDump;

#[derive(Parser)]
#[command(
    name = "docxide-layout",
    version,
    about = "Print the resolved layout values of a DOCX document"
)]
struct Cli {
    /// Input .docx file
    input: PathBuf,

    /// Write the dump here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Extra font directory, searched before the system ones (repeatable)
    #[arg(long = "fonts", value_name = "DIR")]
    fonts: Vec<PathBuf>,

    /// Family used when nothing in the document resolves to an installed face
    #[arg(long, value_name = "NAME")]
    fallback_font: Option<String>,
}

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn run() -> Result<(), docxide_layout::Error> {
    let cli = Cli::parse();

    let mut options = LayoutOptions::from_env();
    let mut font_dirs = cli.fonts;
    font_dirs.append(&mut options.font_dirs);
    options.font_dirs = font_dirs;
    if let Some(family) = cli.fallback_font {
        options.fallback_font = family;
    }

    let mut dump = TextDump::new();
    docxide_layout::layout_docx(&cli.input, &options, &mut dump)?;

    match cli.output {
        Some(path) => std::fs::write(&path, dump.as_str())?,
        None => print!("{}", dump.as_str()),
    }
    Ok(())
}

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

use memmap2::Mmap;
use ttf_parser::Face;

use super::metrics;

/// A face found for a requested family and style.
#[derive(Clone, Debug, PartialEq)]
pub struct FaceMatch {
    pub family: String,
    pub path: Option<PathBuf>,
    pub face_index: u32,
    /// The face has the requested bold/italic style; otherwise the renderer
    /// must synthesise it.
    pub exact: bool,
}

/// Font-face enumeration service.
pub trait FontCatalog {
    /// Find a face of `family` (case-insensitive). Prefers the face with the
    /// requested style, else the first face of the family with
    /// `exact = false`.
    fn find(&self, family: &str, bold: bool, italic: bool) -> Option<FaceMatch>;

    /// Advance width of `text` in points.
    fn measure(&self, face: &FaceMatch, text: &str, size: f32) -> f32 {
        let _ = face;
        metrics::approximate_width(text, size)
    }
}

#[derive(Clone, Debug)]
struct IndexedFace {
    family: String,
    bold: bool,
    italic: bool,
    path: PathBuf,
    face_index: u32,
}

/// lowercase family name -> faces in scan order
type FontLookup = HashMap<String, Vec<IndexedFace>>;

fn lookup(index: &FontLookup, family: &str, bold: bool, italic: bool) -> Option<FaceMatch> {
    let faces = index.get(&family.to_lowercase())?;
    let (face, exact) = match faces.iter().find(|f| f.bold == bold && f.italic == italic) {
        Some(face) => (face, true),
        None => (faces.first()?, false),
    };
    Some(FaceMatch {
        family: face.family.clone(),
        path: Some(face.path.clone()),
        face_index: face.face_index,
        exact,
    })
}

/// Faces found in font directories. The directories are scanned once, on
/// first lookup.
pub struct SystemFonts {
    dirs: Vec<PathBuf>,
    index: OnceLock<FontLookup>,
    mapped: Mutex<HashMap<PathBuf, Option<Mmap>>>,
}

impl SystemFonts {
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self {
            dirs,
            index: OnceLock::new(),
            mapped: Mutex::new(HashMap::new()),
        }
    }

    fn index(&self) -> &FontLookup {
        self.index.get_or_init(|| scan_font_dirs(&self.dirs))
    }

    pub fn family_count(&self) -> usize {
        self.index().len()
    }

    fn measure_with_face(&self, path: &Path, face_index: u32, text: &str, size: f32) -> Option<f32> {
        let mut mapped = self.mapped.lock().ok()?;
        let data = mapped.entry(path.to_path_buf()).or_insert_with(|| {
            let file = std::fs::File::open(path).ok()?;
            unsafe { Mmap::map(&file) }.ok()
        });
        let face = Face::parse(data.as_ref()?, face_index).ok()?;
        let upem = face.units_per_em() as f32;
        let width = text
            .chars()
            .map(|ch| {
                face.glyph_index(ch)
                    .and_then(|gid| face.glyph_hor_advance(gid))
                    .map(|adv| adv as f32 / upem * size)
                    .unwrap_or_else(|| metrics::approximate_width_char(ch, size))
            })
            .sum();
        Some(width)
    }
}

impl FontCatalog for SystemFonts {
    fn find(&self, family: &str, bold: bool, italic: bool) -> Option<FaceMatch> {
        lookup(self.index(), family, bold, italic)
    }

    fn measure(&self, face: &FaceMatch, text: &str, size: f32) -> f32 {
        face.path
            .as_deref()
            .and_then(|path| self.measure_with_face(path, face.face_index, text, size))
            .unwrap_or_else(|| metrics::approximate_width(text, size))
    }
}

fn font_family_name(face: &Face) -> Option<String> {
    // Name ID 1 distinguishes "Aptos Display" from "Aptos"; the typographic
    // family (ID 16) would merge them.
    for name in face.names() {
        if name.name_id == ttf_parser::name_id::FAMILY
            && name.is_unicode()
            && let Some(s) = name.to_string()
        {
            return Some(s);
        }
    }
    None
}

fn read_font_style(data: &[u8], face_index: u32) -> Option<(String, bool, bool)> {
    let face = Face::parse(data, face_index).ok()?;
    let family = font_family_name(&face)?;
    Some((family, face.is_bold(), face.is_italic()))
}

fn is_font_file(path: &Path) -> bool {
    matches!(
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref(),
        Some("ttf" | "otf" | "ttc" | "otc")
    )
}

fn is_font_collection(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("ttc") || e.eq_ignore_ascii_case("otc"))
}

fn scan_font_dirs(dirs: &[PathBuf]) -> FontLookup {
    let t0 = std::time::Instant::now();
    let mut index = FontLookup::new();
    let mut files_scanned = 0u32;
    let mut visited_dirs: std::collections::HashSet<PathBuf> = std::collections::HashSet::new();

    // Configured directories come first; reverse so the stack pops them first.
    let mut stack: Vec<PathBuf> = dirs.iter().rev().cloned().collect();
    while let Some(dir) = stack.pop() {
        if !visited_dirs.insert(dir.clone()) {
            continue;
        }
        let Ok(entries) = std::fs::read_dir(&dir) else {
            continue;
        };

        let mut subdirs = Vec::new();
        let mut font_files = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                subdirs.push(path);
            } else if is_font_file(&path) {
                font_files.push(path);
            }
        }
        subdirs.sort();
        font_files.sort();
        stack.extend(subdirs.into_iter().rev());

        for file_path in font_files {
            files_scanned += 1;
            let Ok(file) = std::fs::File::open(&file_path) else {
                continue;
            };
            let Ok(data) = (unsafe { Mmap::map(&file) }) else {
                continue;
            };
            let face_count = if is_font_collection(&file_path) {
                ttf_parser::fonts_in_collection(&data).unwrap_or(1)
            } else {
                1
            };
            for face_index in 0..face_count {
                if let Some((family, bold, italic)) = read_font_style(&data, face_index) {
                    index
                        .entry(family.to_lowercase())
                        .or_default()
                        .push(IndexedFace {
                            family,
                            bold,
                            italic,
                            path: file_path.clone(),
                            face_index,
                        });
                }
            }
        }
    }

    log::info!(
        "Font scan: {:.1}ms, {} dirs, {} files parsed → {} families",
        t0.elapsed().as_secs_f64() * 1000.0,
        visited_dirs.len(),
        files_scanned,
        index.len(),
    );

    index
}

/// In-memory catalog: a fixed list of (family, bold, italic) faces with no
/// backing files. Useful for tests and for callers with their own font store.
#[derive(Clone, Debug, Default)]
pub struct MemoryCatalog {
    index: FontLookup,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_face(mut self, family: &str, bold: bool, italic: bool) -> Self {
        self.add_face(family, bold, italic);
        self
    }

    /// Regular, bold, italic and bold-italic faces of `family`.
    pub fn with_family(self, family: &str) -> Self {
        self.with_face(family, false, false)
            .with_face(family, true, false)
            .with_face(family, false, true)
            .with_face(family, true, true)
    }

    pub fn add_face(&mut self, family: &str, bold: bool, italic: bool) {
        self.index
            .entry(family.to_lowercase())
            .or_default()
            .push(IndexedFace {
                family: family.to_string(),
                bold,
                italic,
                path: PathBuf::new(),
                face_index: 0,
            });
    }
}

impl FontCatalog for MemoryCatalog {
    fn find(&self, family: &str, bold: bool, italic: bool) -> Option<FaceMatch> {
        lookup(&self.index, family, bold, italic).map(|m| FaceMatch { path: None, ..m })
    }
}

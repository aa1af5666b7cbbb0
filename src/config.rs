use std::path::PathBuf;

/// Letter page with 1" margins.
pub const LETTER_PRINTABLE_WIDTH: f32 = 468.0;

#[derive(Clone, Debug)]
pub struct LayoutOptions {
    /// Extra directories scanned for font faces, searched before the
    /// platform directories.
    pub font_dirs: Vec<PathBuf>,
    /// Skip the platform font directories entirely.
    pub scan_system_fonts: bool,
    pub fallback_font: String,
    /// Run font size when nothing in the cascade defines one.
    pub default_font_size: f32,
    pub default_printable_width: f32,
    /// Upper bound on `basedOn` hops before a chain is treated as cyclic.
    pub max_style_depth: usize,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            font_dirs: Vec::new(),
            scan_system_fonts: true,
            fallback_font: "Times New Roman".to_string(),
            default_font_size: 11.0,
            default_printable_width: LETTER_PRINTABLE_WIDTH,
            max_style_depth: 32,
        }
    }
}

impl LayoutOptions {
    /// Defaults plus `DOCXIDE_FONTS` (a platform path list) and
    /// `DOCXIDE_NO_FONT_SCAN`.
    pub fn from_env() -> Self {
        let mut options = Self::default();
        if let Ok(val) = std::env::var("DOCXIDE_FONTS") {
            let sep = if cfg!(windows) { ';' } else { ':' };
            options.font_dirs.extend(
                val.split(sep)
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(PathBuf::from),
            );
        }
        if std::env::var_os("DOCXIDE_NO_FONT_SCAN").is_some() {
            options.scan_system_fonts = false;
        }
        options
    }

    /// Directories to scan: configured ones first, then the platform's.
    pub fn font_directories(&self) -> Vec<PathBuf> {
        let mut dirs = self.font_dirs.clone();
        if self.scan_system_fonts {
            dirs.extend(system_font_directories());
        }
        dirs
    }
}

fn system_font_directories() -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = Vec::new();

    #[cfg(target_os = "macos")]
    {
        dirs.extend([
            "/Applications/Microsoft Word.app/Contents/Resources/DFonts".into(),
            "/Library/Fonts".into(),
            "/Library/Fonts/Microsoft".into(),
            "/System/Library/Fonts".into(),
            "/System/Library/Fonts/Supplemental".into(),
        ]);
        if let Ok(home) = std::env::var("HOME") {
            dirs.push(PathBuf::from(home).join("Library/Fonts"));
        }
    }

    #[cfg(target_os = "linux")]
    {
        dirs.extend(["/usr/share/fonts".into(), "/usr/local/share/fonts".into()]);
        if let Ok(home) = std::env::var("HOME") {
            dirs.push(PathBuf::from(home).join(".local/share/fonts"));
        }
    }

    #[cfg(target_os = "windows")]
    {
        if let Ok(windir) = std::env::var("WINDIR") {
            dirs.push(PathBuf::from(windir).join("Fonts"));
        } else {
            dirs.push("C:\\Windows\\Fonts".into());
        }
    }

    dirs
}

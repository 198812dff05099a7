//! File pipeline: font loading, per-file processing, batch processing,
//! and format-aware saving.

use std::path::{Path, PathBuf};

use ab_glyph::FontVec;
use image::{DynamicImage, ImageFormat, RgbaImage};

use crate::compose::Compositor;
use crate::error::{Error, Result};
use crate::spec::WatermarkSpec;

/// JPEG encode quality for saved output.
const JPEG_QUALITY: u8 = 95;

/// Options controlling pipeline output behavior.
#[derive(Debug, Clone, Default)]
pub struct ProcessOptions {
    /// Enable verbose logging.
    pub verbose: bool,
    /// Suppress non-error output.
    pub quiet: bool,
}

/// Result of processing a single image file.
///
/// The pipeline reports failures per file instead of aborting a batch.
#[derive(Debug)]
pub struct ProcessResult {
    /// Path of the processed file.
    pub path: PathBuf,
    /// Whether processing succeeded.
    pub success: bool,
    /// Human-readable status message.
    pub message: String,
}

/// Well-known font locations probed when no explicit path is given.
const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Find the first usable system font, if any.
#[must_use]
pub fn find_system_font() -> Option<PathBuf> {
    SYSTEM_FONT_CANDIDATES
        .iter()
        .map(Path::new)
        .find(|p| p.is_file())
        .map(Path::to_path_buf)
}

/// Load a font for text watermarks.
///
/// An explicit `path` wins; otherwise a short list of common system
/// font locations is probed.
///
/// # Errors
///
/// Returns [`Error::FontLoad`] if the file cannot be read or parsed, or
/// if no candidate exists when probing.
pub fn load_font(path: Option<&Path>) -> Result<FontVec> {
    let resolved = match path {
        Some(p) => p.to_path_buf(),
        None => find_system_font().ok_or_else(|| {
            Error::FontLoad("no system font found; pass an explicit font path".to_string())
        })?,
    };

    let bytes = std::fs::read(&resolved)
        .map_err(|e| Error::FontLoad(format!("{}: {e}", resolved.display())))?;
    FontVec::try_from_vec(bytes)
        .map_err(|e| Error::FontLoad(format!("{}: {e}", resolved.display())))
}

/// Process a single image file: load, watermark, save.
///
/// Returns a [`ProcessResult`] indicating success or failure; I/O and
/// compositing errors are folded into the result message.
#[must_use]
pub fn process_file(
    compositor: &Compositor,
    input: &Path,
    output: &Path,
    spec: &WatermarkSpec,
) -> ProcessResult {
    let mut result = ProcessResult {
        path: input.to_path_buf(),
        success: false,
        message: String::new(),
    };

    let base = match image::open(input) {
        Ok(img) => img.to_rgba8(),
        Err(e) => {
            result.message = format!("Failed to load: {e}");
            return result;
        }
    };

    let marked = match compositor.apply(&base, spec) {
        Ok(img) => img,
        Err(e) => {
            result.message = format!("Failed to watermark: {e}");
            return result;
        }
    };

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                result.message = format!("Failed to create output directory: {e}");
                return result;
            }
        }
    }

    match save_image(&marked, output) {
        Ok(()) => {
            result.success = true;
            result.message = format!("Watermark applied -> {}", output.display());
        }
        Err(e) => {
            result.message = format!("Failed to save: {e}");
        }
    }

    result
}

/// Process all supported images in a directory.
///
/// Uses parallel iteration when the `cli` feature is enabled (via rayon).
/// Returns a [`ProcessResult`] for each image found.
#[must_use]
pub fn process_directory(
    compositor: &Compositor,
    input_dir: &Path,
    output_dir: &Path,
    spec: &WatermarkSpec,
) -> Vec<ProcessResult> {
    let entries: Vec<PathBuf> = match std::fs::read_dir(input_dir) {
        Ok(rd) => rd
            .filter_map(std::result::Result::ok)
            .filter(|e| e.file_type().map(|ft| ft.is_file()).unwrap_or(false))
            .map(|e| e.path())
            .filter(|p| is_supported_image(p))
            .collect(),
        Err(e) => {
            return vec![ProcessResult {
                path: input_dir.to_path_buf(),
                success: false,
                message: format!("Failed to read directory: {e}"),
            }];
        }
    };

    if !output_dir.exists() {
        if let Err(e) = std::fs::create_dir_all(output_dir) {
            return vec![ProcessResult {
                path: output_dir.to_path_buf(),
                success: false,
                message: format!("Failed to create output directory: {e}"),
            }];
        }
    }

    let run = |input_path: &PathBuf| -> ProcessResult {
        let output_path = match input_path.file_name() {
            Some(name) => output_dir.join(name),
            None => {
                return ProcessResult {
                    path: input_path.clone(),
                    success: false,
                    message: "Entry has no filename".to_string(),
                };
            }
        };
        process_file(compositor, input_path, &output_path, spec)
    };

    #[cfg(feature = "cli")]
    {
        use rayon::prelude::*;
        entries.par_iter().map(run).collect()
    }

    #[cfg(not(feature = "cli"))]
    {
        entries.iter().map(run).collect()
    }
}

/// Check if a file has a supported image extension.
#[must_use]
pub fn is_supported_image(path: &Path) -> bool {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => matches!(
            ext.to_lowercase().as_str(),
            "jpg" | "jpeg" | "png" | "webp" | "bmp"
        ),
        None => false,
    }
}

/// Save an RGBA image with format-specific encoding.
///
/// JPEG has no alpha channel, so the raster is flattened to RGB and
/// encoded at quality 95. PNG, WebP, and BMP keep the alpha channel.
///
/// # Errors
///
/// Returns an error if the format is unsupported or writing fails.
pub fn save_image(img: &RgbaImage, path: &Path) -> Result<()> {
    let format =
        ImageFormat::from_path(path).map_err(|e| Error::UnsupportedFormat(e.to_string()))?;

    match format {
        ImageFormat::Jpeg => {
            let rgb = DynamicImage::ImageRgba8(img.clone()).to_rgb8();
            let file = std::fs::File::create(path)?;
            let mut encoder =
                image::codecs::jpeg::JpegEncoder::new_with_quality(file, JPEG_QUALITY);
            encoder.encode_image(&DynamicImage::ImageRgb8(rgb))?;
        }
        ImageFormat::Png | ImageFormat::WebP | ImageFormat::Bmp => {
            DynamicImage::ImageRgba8(img.clone()).save(path)?;
        }
        _ => {
            return Err(Error::UnsupportedFormat(format!("{format:?}")));
        }
    }

    Ok(())
}

/// Generate a default output path from an input path.
///
/// Example: `"photo.jpg"` becomes `"photo_marked.jpg"`.
#[must_use]
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    let ext = input.extension().unwrap_or_default().to_string_lossy();
    let parent = input.parent().unwrap_or(Path::new("."));
    parent.join(format!("{stem}_marked.{ext}"))
}

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, ValueEnum};

use photomark::{
    default_output_path, engine, parse_hex_color, Anchor, Compositor, ProcessOptions,
    ProcessResult, WatermarkSpec,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Position {
    TopLeft,
    TopCenter,
    TopRight,
    CenterLeft,
    Center,
    CenterRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

impl From<Position> for Anchor {
    fn from(p: Position) -> Self {
        match p {
            Position::TopLeft => Anchor::TopLeft,
            Position::TopCenter => Anchor::TopCenter,
            Position::TopRight => Anchor::TopRight,
            Position::CenterLeft => Anchor::CenterLeft,
            Position::Center => Anchor::Center,
            Position::CenterRight => Anchor::CenterRight,
            Position::BottomLeft => Anchor::BottomLeft,
            Position::BottomCenter => Anchor::BottomCenter,
            Position::BottomRight => Anchor::BottomRight,
        }
    }
}

#[derive(Parser)]
#[command(
    name = "photomark",
    about = "Stamp a text or image watermark onto photos",
    version,
    group(clap::ArgGroup::new("watermark").required(true).args(["text", "image"])),
    after_help = "Simple usage: photomark photo.jpg --text \"(c) me\"  \
                  (writes photo_marked.jpg)"
)]
struct Cli {
    /// Input image file or directory
    input: String,

    /// Output file or directory (default: {name}_marked.{ext})
    #[arg(short, long)]
    output: Option<String>,

    /// Text to stamp
    #[arg(short, long)]
    text: Option<String>,

    /// Image file to stamp (PNG recommended for alpha)
    #[arg(short, long)]
    image: Option<String>,

    /// Named anchor position
    #[arg(short, long, value_enum, default_value = "bottom-right")]
    position: Position,

    /// Absolute top-left placement "X,Y" (overrides --position)
    #[arg(long, value_name = "X,Y")]
    at: Option<String>,

    /// Watermark opacity (0.0-1.0)
    #[arg(long, default_value = "0.5")]
    opacity: f32,

    /// Uniform scale factor applied to the watermark layer
    #[arg(long, default_value = "1.0")]
    scale: f32,

    /// Clockwise rotation in degrees
    #[arg(long, default_value = "0", value_name = "DEG")]
    rotate: f32,

    /// Text color as #RGB, #RRGGBB or #RRGGBBAA
    #[arg(long, default_value = "#FFFFFF")]
    color: String,

    /// Font file for text watermarks (default: probe system fonts)
    #[arg(long)]
    font: Option<String>,

    /// Font size in pixels
    #[arg(long, default_value = "36")]
    font_size: f32,

    /// Edge margin in pixels for named anchors
    #[arg(long, default_value = "16")]
    margin: u32,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();

    if !(0.0..=1.0).contains(&cli.opacity) {
        eprintln!("Error: Opacity must be between 0.0 and 1.0");
        process::exit(1);
    }
    if cli.scale <= 0.0 {
        eprintln!("Error: Scale must be greater than 0");
        process::exit(1);
    }

    let anchor = match &cli.at {
        Some(s) => match parse_at(s) {
            Some(anchor) => anchor,
            None => {
                eprintln!("Error: --at expects \"X,Y\" integer coordinates, got '{s}'");
                process::exit(1);
            }
        },
        None => cli.position.into(),
    };

    let spec = match build_spec(&cli, anchor) {
        Ok(spec) => spec,
        Err(msg) => {
            eprintln!("Error: {msg}");
            process::exit(1);
        }
    };

    let compositor = if cli.text.is_some() {
        match engine::load_font(cli.font.as_deref().map(Path::new)) {
            Ok(font) => Compositor::new(font),
            Err(e) => {
                eprintln!("Fatal: {e}");
                process::exit(1);
            }
        }
    } else {
        Compositor::image_only()
    };

    let opts = ProcessOptions {
        verbose: cli.verbose,
        quiet: cli.quiet,
    };

    let input_path = Path::new(&cli.input);
    if !input_path.exists() {
        eprintln!("Error: Input path does not exist: {}", cli.input);
        process::exit(1);
    }

    let results = if input_path.is_dir() {
        let output_dir = if let Some(o) = &cli.output {
            PathBuf::from(o)
        } else {
            eprintln!("Error: Output directory is required for batch processing");
            eprintln!("Usage: photomark <input_dir> --text STR -o <output_dir>");
            process::exit(1);
        };
        engine::process_directory(&compositor, input_path, &output_dir, &spec)
    } else {
        let output_path = match &cli.output {
            Some(o) => PathBuf::from(o),
            None => default_output_path(input_path),
        };
        vec![engine::process_file(
            &compositor,
            input_path,
            &output_path,
            &spec,
        )]
    };

    let mut success_count = 0u32;
    let mut fail_count = 0u32;

    for r in &results {
        print_result(r, &opts);
        if r.success {
            success_count += 1;
        } else {
            fail_count += 1;
        }
    }

    if results.len() > 1 && !opts.quiet {
        eprintln!();
        eprint!("[Summary] Processed: {success_count}");
        if fail_count > 0 {
            eprint!(", Failed: {fail_count}");
        }
        eprintln!(" (Total: {})", results.len());
    }

    if fail_count > 0 {
        process::exit(1);
    }
}

/// Parse "X,Y" into an absolute anchor.
fn parse_at(s: &str) -> Option<Anchor> {
    let (x, y) = s.split_once(',')?;
    let x = x.trim().parse::<i64>().ok()?;
    let y = y.trim().parse::<i64>().ok()?;
    Some(Anchor::Absolute { x, y })
}

fn build_spec(cli: &Cli, anchor: Anchor) -> Result<WatermarkSpec, String> {
    let spec = if let Some(text) = &cli.text {
        let color = parse_hex_color(&cli.color).map_err(|e| e.to_string())?;
        WatermarkSpec::text(text.clone())
            .with_color(color)
            .with_font_size(cli.font_size)
    } else if let Some(image_path) = &cli.image {
        let layer = image::open(image_path)
            .map_err(|e| format!("Failed to load watermark image '{image_path}': {e}"))?
            .to_rgba8();
        WatermarkSpec::image(layer)
    } else {
        // clap's arg group guarantees one of --text/--image is present
        return Err("one of --text or --image is required".to_string());
    };

    Ok(spec
        .with_anchor(anchor)
        .with_margin(cli.margin)
        .with_opacity(cli.opacity)
        .with_scale(cli.scale)
        .with_rotation(cli.rotate))
}

fn print_result(result: &ProcessResult, opts: &ProcessOptions) {
    if opts.quiet && result.success {
        return;
    }

    let filename = result.path.file_name().map_or_else(
        || result.path.display().to_string(),
        |f| f.to_string_lossy().to_string(),
    );

    if result.success {
        if !opts.quiet {
            eprintln!("[OK] {filename}");
        }
    } else {
        eprintln!("[FAIL] {filename}: {}", result.message);
    }

    if opts.verbose && !result.message.is_empty() {
        eprintln!("  -> {}", result.message);
    }
}

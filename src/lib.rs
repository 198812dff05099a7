//! Stamp text or image watermarks onto photos via alpha compositing.
//!
//! The core is a pure [`Compositor`]: it takes a decoded RGBA raster
//! and a [`WatermarkSpec`] (what to stamp, where, how opaque, at what
//! scale and rotation) and returns a new raster with the watermark
//! blended on top using the Porter-Duff "over" operator. File loading,
//! saving, and batch processing live in the [`engine`] module.
//!
//! # Quick Start
//!
//! ```no_run
//! use photomark::{engine, Anchor, Compositor, WatermarkSpec};
//!
//! let font = engine::load_font(None).expect("no usable font");
//! let compositor = Compositor::new(font);
//!
//! let base = image::open("photo.jpg").unwrap().to_rgba8();
//! let spec = WatermarkSpec::text("© 2026 Example")
//!     .with_anchor(Anchor::BottomRight)
//!     .with_opacity(0.6);
//!
//! let marked = compositor.apply(&base, &spec).unwrap();
//! engine::save_image(&marked, "photo_marked.png".as_ref()).unwrap();
//! ```
//!
//! # Image watermarks
//!
//! ```no_run
//! use photomark::{Anchor, Compositor, WatermarkSpec};
//!
//! let logo = image::open("logo.png").unwrap().to_rgba8();
//! let base = image::open("photo.jpg").unwrap().to_rgba8();
//!
//! let spec = WatermarkSpec::image(logo)
//!     .with_anchor(Anchor::TopLeft)
//!     .with_scale(0.5)
//!     .with_opacity(0.4);
//!
//! let marked = Compositor::image_only().apply(&base, &spec).unwrap();
//! ```

#![deny(missing_docs)]

pub mod compose;
pub mod engine;
pub mod error;
pub mod position;
pub mod spec;
pub mod text;
pub mod transform;

pub use compose::Compositor;
pub use engine::{
    default_output_path, find_system_font, is_supported_image, load_font, process_directory,
    process_file, save_image, ProcessOptions, ProcessResult,
};
pub use error::{Error, Result};
pub use position::{Anchor, Placement};
pub use spec::{WatermarkKind, WatermarkSpec, DEFAULT_FONT_SIZE, DEFAULT_MARGIN};
pub use text::parse_hex_color;

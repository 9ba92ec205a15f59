pub mod buffer;
pub mod error;
pub mod export;
pub mod raster;
pub mod recorder;
pub mod surface;
pub mod tree;

pub use buffer::RenderBuffer;
pub use error::RenderError;
pub use export::{export_png, ExportMetadata};
pub use raster::RasterSurface;
pub use recorder::{PaintCall, RecordingSurface};
pub use surface::{Point, StrokeStyle, Surface};
pub use tree::{draw_branch, render_tree, Branch, RenderStats};

/// Convenience result type for the render crate.
pub type Result<T> = std::result::Result<T, RenderError>;

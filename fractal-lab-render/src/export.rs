//! PNG export with embedded metadata (tEXt chunks).

use std::io::BufWriter;
use std::path::Path;

use tracing::debug;

use fractal_lab_core::{FractalParameters, ShareQuery};

use crate::buffer::RenderBuffer;
use crate::error::RenderError;

/// Metadata to embed in an exported PNG as tEXt chunks.
pub struct ExportMetadata {
    pub params: FractalParameters,
    /// Base URL the share link in the metadata should point at, if any.
    pub share_base: Option<String>,
}

/// Write a render buffer as a PNG file with embedded tree parameters.
///
/// Uses the `png` crate directly to inject custom tEXt chunks readable by
/// exiftool, IrfanView, XnView, etc.
pub fn export_png(
    buffer: &RenderBuffer,
    path: &Path,
    metadata: &ExportMetadata,
) -> crate::Result<()> {
    if buffer.is_empty() {
        return Err(RenderError::InvalidDimensions {
            width: buffer.width,
            height: buffer.height,
        });
    }
    let expected = buffer.width as usize * buffer.height as usize * 4;
    if buffer.pixels.len() != expected {
        return Err(RenderError::BufferSize {
            expected,
            actual: buffer.pixels.len(),
        });
    }

    let file = std::fs::File::create(path)?;
    let writer = BufWriter::new(file);

    let mut encoder = png::Encoder::new(writer, buffer.width, buffer.height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::Default);

    encoder.add_text_chunk("Software".to_string(), "FractalLab".to_string())?;
    encoder.add_text_chunk("Description".to_string(), build_description(metadata))?;
    for (key, value) in build_metadata_pairs(buffer, metadata) {
        encoder.add_text_chunk(key, value)?;
    }

    let mut png_writer = encoder.write_header()?;
    png_writer.write_image_data(&buffer.pixels)?;

    debug!(
        "Exported PNG {}x{} to {}",
        buffer.width,
        buffer.height,
        path.display()
    );
    Ok(())
}

fn build_description(meta: &ExportMetadata) -> String {
    let p = &meta.params;
    format!(
        "Fractal tree - Angle: {:.1} deg, Scale: {:.2}, Depth: {}, Colors: {} -> {}",
        p.branch_angle_degrees, p.scale_factor, p.depth, p.color_start, p.color_end,
    )
}

fn build_metadata_pairs(buffer: &RenderBuffer, meta: &ExportMetadata) -> Vec<(String, String)> {
    let p = &meta.params;
    let query = ShareQuery::from_params(p);
    let mut pairs = vec![
        ("FractalLab.BranchAngle".into(), format!("{:.1}", p.branch_angle_degrees)),
        ("FractalLab.ScaleFactor".into(), format!("{:.2}", p.scale_factor)),
        ("FractalLab.Depth".into(), p.depth.to_string()),
        ("FractalLab.ColorStart".into(), p.color_start.to_hex()),
        ("FractalLab.ColorEnd".into(), p.color_end.to_hex()),
        ("FractalLab.Resolution".into(), format!("{}x{}", buffer.width, buffer.height)),
        ("FractalLab.ShareQuery".into(), query.to_string()),
    ];
    if let Some(base) = &meta.share_base {
        pairs.push(("FractalLab.ShareUrl".into(), query.to_url(base)));
    }
    pairs
}

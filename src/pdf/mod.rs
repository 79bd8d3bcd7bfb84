//! Rendering of laid-out sheets to PDF.

mod content;
mod document;
mod fonts;
mod symbol;

use std::path::Path;

use tracing::info;

use crate::error::{RenderError, SheetError};
use crate::layout::{Coordinate, Placement, Sheet};

pub use fonts::StandardFont;
pub use symbol::QrSymbolEncoder;

/// Produces an output document from a list of placements.
pub trait PlacementRenderer {
    fn render(&self, page: Coordinate, placements: &[Placement<'_>], path: &Path) -> Result<(), RenderError>;
}

/// Writes a single-page PDF with a standard font.
#[derive(Debug, Clone, Copy)]
pub struct PdfRenderer {
    pub font: StandardFont,
    /// Text size in mm
    pub font_size: f64,
}

impl PlacementRenderer for PdfRenderer {
    fn render(&self, page: Coordinate, placements: &[Placement<'_>], path: &Path) -> Result<(), RenderError> {
        let mut doc = document::build_document(page, self.font, self.font_size, placements)?;
        doc.compress();
        doc.save(path).map_err(|source| RenderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(())
    }
}

/// Hand every cell of `sheet` to `renderer`. The sheet is left untouched on failure.
pub fn render_sheet<R: PlacementRenderer>(sheet: &Sheet, renderer: &R, path: &Path) -> Result<(), SheetError> {
    let placements: Vec<Placement<'_>> = sheet.placements().collect();
    info!(cells = placements.len(), ?path, "Rendering sheet");
    renderer.render(sheet.page(), &placements, path)?;
    Ok(())
}

use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};
use printpdf::{Mm, Pt};

use super::content::ContentBuilder;
use super::fonts::{StandardFont, create_font};
use crate::error::RenderError;
use crate::layout::{Coordinate, Placement};

/// Font resource name used in content streams
const FONT_RESOURCE: &str = "F1";

/// Space kept between a cell's edge and what is drawn in it, in mm
const CELL_PADDING: f64 = 2.0;

fn to_pt(mm: f64) -> f32 {
    Pt::from(Mm(mm as f32)).0
}

/// Where the symbol and the tag text go inside one cell, in mm from the top left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct CellDrawing {
    /// Top-left corner and side of the square symbol, if it fits
    pub symbol: Option<(f64, f64, f64)>,
    /// Start of the text baseline
    pub text: (f64, f64),
}

pub(crate) fn cell_drawing(placement: &Placement<'_>, font_size: f64) -> CellDrawing {
    let text_band = font_size * 1.5;
    let side = (placement.width - 2.0 * CELL_PADDING)
        .min(placement.height - text_band - 2.0 * CELL_PADDING);
    let symbol = (placement.image.is_some() && side > 0.0).then(|| {
        let x = placement.x + (placement.width - side) / 2.0;
        (x, placement.y + CELL_PADDING, side)
    });
    let text = (
        placement.x + CELL_PADDING,
        placement.y + placement.height - CELL_PADDING - font_size * 0.25,
    );
    CellDrawing { symbol, text }
}

/// Page resources: our font plus every image XObject
fn page_resources(font_id: ObjectId, xobjects: Dictionary) -> Dictionary {
    let mut resources = dictionary! {
        "Font" => dictionary! { FONT_RESOURCE => font_id },
    };
    if !xobjects.is_empty() {
        resources.set("XObject", Object::Dictionary(xobjects));
    }
    resources
}

/// Build a one-page document drawing every placement
pub fn build_document(
    page: Coordinate,
    font: StandardFont,
    font_size: f64,
    placements: &[Placement<'_>],
) -> Result<Document, RenderError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = create_font(&mut doc, font);

    let page_height = page.height;
    let mut builder = ContentBuilder::new(FONT_RESOURCE.to_string());

    for placement in placements {
        let drawing = cell_drawing(placement, font_size);
        if let (Some((x, top, side)), Some(png)) = (drawing.symbol, placement.image) {
            // PDF y runs upwards from the bottom edge
            let y = page_height - top - side;
            builder.add_image(png, to_pt(x), to_pt(y), to_pt(side), to_pt(side), &mut doc)?;
        }
        let (x, baseline) = drawing.text;
        builder.add_text(
            placement.text,
            to_pt(x),
            to_pt(page_height - baseline),
            to_pt(font_size),
        );
    }

    let content_id = doc.add_object(Stream::new(Dictionary::new(), builder.build_content_bytes()));
    let resources_id = doc.add_object(page_resources(font_id, builder.xobjects));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), to_pt(page.width).into(), to_pt(page.height).into()],
    });

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    Ok(doc)
}

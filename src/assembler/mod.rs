//! Multi-page PDF assembly from scanned dossier images.
//!
//! Each dossier's scans become one PDF: one page per image, page size equal
//! to the image's pixel dimensions (placed at 72 dpi, so one pixel maps to
//! one PDF point), image drawn from the origin filling the page. Page order
//! matches input order; nothing is reordered or sorted.

mod error;

pub use error::AssembleError;

use image::DynamicImage;
use printpdf::{
    ColorBits, ColorSpace, Image, ImageTransform, ImageXObject, Mm, PdfDocument,
    PdfDocumentReference, Px,
};
use tracing::debug;

use crate::fetch::HttpClient;

/// Assembles ordered lists of image URLs into single multi-page PDFs.
#[derive(Debug, Clone)]
pub struct PdfAssembler {
    client: HttpClient,
}

impl PdfAssembler {
    /// Creates a new assembler using the given HTTP capability.
    #[must_use]
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    /// Fetches every image and returns the serialized multi-page document.
    ///
    /// # Errors
    ///
    /// Returns [`AssembleError`] when the list is empty, any image fails to
    /// fetch or decode, or the document cannot be serialized. A failed image
    /// aborts the whole assembly; no partial document is produced.
    #[tracing::instrument(level = "debug", skip(self, image_urls), fields(images = image_urls.len()))]
    pub async fn assemble(&self, image_urls: &[String]) -> Result<Vec<u8>, AssembleError> {
        if image_urls.is_empty() {
            return Err(AssembleError::NoImages);
        }

        let mut document: Option<PdfDocumentReference> = None;

        for (index, url) in image_urls.iter().enumerate() {
            debug!(page = index + 1, total = image_urls.len(), url = %url, "adding image page");

            let resource = self.client.get(url).await?;
            let decoded = image::load_from_memory(&resource.bytes)
                .map_err(|e| AssembleError::decode(url, e))?;

            document = Some(append_page(document, &decoded));
        }

        let Some(document) = document else {
            return Err(AssembleError::NoImages);
        };
        document
            .save_to_bytes()
            .map_err(|e| AssembleError::document(e.to_string()))
    }
}

/// Appends one page sized to the image's pixel dimensions, creating the
/// document on the first page.
fn append_page(document: Option<PdfDocumentReference>, decoded: &DynamicImage) -> PdfDocumentReference {
    // Normalize to 8-bit RGB; scans arrive in assorted modes (gray, RGBA).
    let rgb = decoded.to_rgb8();
    let (width, height) = rgb.dimensions();

    // 72 dpi placement maps one pixel to one PDF point.
    let page_width = Mm::from(Px(width as usize).into_pt(72.0));
    let page_height = Mm::from(Px(height as usize).into_pt(72.0));

    let (document, page, layer) = match document {
        None => PdfDocument::new("Dossier scans", page_width, page_height, "scan"),
        Some(existing) => {
            let (page, layer) = existing.add_page(page_width, page_height, "scan");
            (existing, page, layer)
        }
    };

    let xobject = ImageXObject {
        width: Px(width as usize),
        height: Px(height as usize),
        color_space: ColorSpace::Rgb,
        bits_per_component: ColorBits::Bit8,
        interpolate: false,
        image_data: rgb.into_raw(),
        image_filter: None,
        clipping_bbox: None,
    };
    Image::from(xobject).add_to_layer(
        document.get_page(page).get_layer(layer),
        ImageTransform {
            dpi: Some(72.0),
            ..ImageTransform::default()
        },
    );

    document
}

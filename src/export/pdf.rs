//! PDF exporter: paginated A4 layout with embedded thumbnails.
//!
//! Geometry is absolute-positioned in points on A4 pages. Each record
//! occupies a fixed-height block: a square thumbnail on the left, the file
//! name and word-wrapped description on the right. A vertical cursor walks
//! down the page; a record whose cursor would cross the bottom margin
//! starts a new page instead.
//!
//! Wrapping is greedy and counted in characters, not rendered units, so
//! visual alignment is approximate. An image that cannot be
//! decoded is replaced with a placeholder string; the export continues with
//! the remaining records.

use crate::error::AeroscribeError;
use crate::output::ImageRecord;
use printpdf::image_crate::GenericImageView;
use printpdf::{
    image_crate, BuiltinFont, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument,
    PdfLayerReference, Pt,
};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::debug;

// A4 in points, 1 inch margins. f32 to match printpdf's unit types.
const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const PAGE_HEIGHT_PT: f32 = 841.89;
const MARGIN_PT: f32 = 72.0;

/// Thumbnail square side (3 in).
const IMAGE_SIDE_PT: f32 = 216.0;
/// Text column offset from the left margin (3.2 in).
const TEXT_OFFSET_PT: f32 = 230.4;
/// Vertical advance per wrapped description line.
const LINE_STEP_PT: f32 = 20.0;
/// Vertical advance per record block (4 in).
const BLOCK_HEIGHT_PT: f32 = 288.0;

const WRAP_WIDTH: usize = 50;
const FONT_SIZE: f32 = 11.0;

/// Drawn in place of a thumbnail that cannot be decoded.
const IMAGE_PLACEHOLDER: &str = "Error loading image";

/// Write `records` as a paginated PDF at `path`.
pub fn write(records: &[ImageRecord], path: &Path) -> Result<(), AeroscribeError> {
    let export_err = |detail: String| AeroscribeError::ExportFailed {
        path: path.to_path_buf(),
        detail,
    };

    let (doc, first_page, first_layer) = PdfDocument::new(
        "Image Descriptions",
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "content",
    );
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| export_err(e.to_string()))?;

    let mut layer = doc.get_page(first_page).get_layer(first_layer);
    let mut current_page = 0usize;

    for (record, (page, y)) in records.iter().zip(layout_positions(records.len())) {
        while current_page < page {
            let (p, l) = doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "content");
            layer = doc.get_page(p).get_layer(l);
            current_page += 1;
        }
        draw_record(&layer, &font, record, y);
    }

    let file = File::create(path).map_err(|source| AeroscribeError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    })?;
    doc.save(&mut BufWriter::new(file))
        .map_err(|e| export_err(e.to_string()))?;
    Ok(())
}

/// Draw one record block with its top edge at `y` points.
fn draw_record(layer: &PdfLayerReference, font: &IndirectFontRef, record: &ImageRecord, y: f32) {
    match image_crate::open(&record.path) {
        Ok(img) => {
            let (px_w, px_h) = img.dimensions();
            let embedded = Image::from_dynamic_image(&img);
            // At 72 dpi the natural size in points equals the pixel size,
            // so these scale factors produce an exact square.
            embedded.add_to_layer(
                layer.clone(),
                ImageTransform {
                    translate_x: Some(Mm::from(Pt(MARGIN_PT))),
                    translate_y: Some(Mm::from(Pt(y - IMAGE_SIDE_PT))),
                    scale_x: Some(IMAGE_SIDE_PT / px_w.max(1) as f32),
                    scale_y: Some(IMAGE_SIDE_PT / px_h.max(1) as f32),
                    dpi: Some(72.0),
                    ..ImageTransform::default()
                },
            );
        }
        Err(err) => {
            debug!("Could not embed {}: {}", record.path.display(), err);
            layer.use_text(
                IMAGE_PLACEHOLDER,
                FONT_SIZE,
                Mm::from(Pt(MARGIN_PT)),
                Mm::from(Pt(y)),
                font,
            );
        }
    }

    let text_x = MARGIN_PT + TEXT_OFFSET_PT;
    layer.use_text(
        format!("Image: {}", record.file_name()),
        FONT_SIZE,
        Mm::from(Pt(text_x)),
        Mm::from(Pt(y)),
        font,
    );

    let mut text_y = y - 72.0;
    layer.use_text(
        "Description:",
        FONT_SIZE,
        Mm::from(Pt(text_x)),
        Mm::from(Pt(text_y)),
        font,
    );
    for line in wrap_text(record.description_text(), WRAP_WIDTH) {
        text_y -= LINE_STEP_PT;
        layer.use_text(line, FONT_SIZE, Mm::from(Pt(text_x)), Mm::from(Pt(text_y)), font);
    }
}

/// Cursor position (page index, top y in points) for each record.
///
/// The cursor starts one margin below the page top and advances one block
/// per record; a record whose cursor has crossed the bottom margin is
/// placed at the top of a fresh page.
fn layout_positions(count: usize) -> Vec<(usize, f32)> {
    let mut positions = Vec::with_capacity(count);
    let mut page = 0usize;
    let mut y = PAGE_HEIGHT_PT - MARGIN_PT;
    for _ in 0..count {
        if y < MARGIN_PT {
            page += 1;
            y = PAGE_HEIGHT_PT - MARGIN_PT;
        }
        positions.push((page, y));
        y -= BLOCK_HEIGHT_PT;
    }
    positions
}

/// Greedy word wrap at `width` characters.
///
/// Words accumulate while the running line (including separating spaces)
/// stays within `width`; a word that no longer fits starts the next line.
/// A single word longer than `width` is emitted on its own line, unsplit.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.len()
        } else {
            current.len() + 1 + word.len()
        };
        if candidate <= width {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        } else if current.is_empty() {
            lines.push(word.to_string());
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── wrap_text ────────────────────────────────────────────────────────

    #[test]
    fn wrap_empty_text_is_no_lines() {
        assert!(wrap_text("", 50).is_empty());
    }

    #[test]
    fn wrap_short_text_is_one_line() {
        assert_eq!(wrap_text("a wing over clouds", 50), vec!["a wing over clouds"]);
    }

    #[test]
    fn word_of_exactly_width_chars_stays_on_one_line() {
        let word = "x".repeat(50);
        assert_eq!(wrap_text(&word, 50), vec![word]);
    }

    #[test]
    fn word_longer_than_width_is_emitted_unsplit() {
        let word = "x".repeat(60);
        assert_eq!(wrap_text(&word, 50), vec![word]);
    }

    #[test]
    fn space_at_width_boundary_splits_there() {
        // "aaaa bbbbb" is exactly 10 characters; "cc" must wrap.
        assert_eq!(
            wrap_text("aaaa bbbbb cc", 10),
            vec!["aaaa bbbbb", "cc"]
        );
    }

    #[test]
    fn greedy_accumulation_prefers_full_lines() {
        assert_eq!(
            wrap_text("one two three four", 9),
            vec!["one two", "three", "four"]
        );
    }

    // ── layout ───────────────────────────────────────────────────────────

    #[test]
    fn three_blocks_fit_on_the_first_page() {
        let positions = layout_positions(3);
        assert!(positions.iter().all(|&(page, _)| page == 0));
    }

    #[test]
    fn page_break_comes_before_the_fourth_record() {
        let positions = layout_positions(5);
        assert_eq!(positions[2].0, 0, "third record stays on page one");
        assert_eq!(positions[3].0, 1, "fourth record opens page two");
        assert_eq!(positions[4].0, 1);
        // The fresh page restarts the cursor at the top margin.
        assert!((positions[3].1 - (PAGE_HEIGHT_PT - MARGIN_PT)).abs() < 1e-4);
    }

    #[test]
    fn cursor_advances_one_block_per_record() {
        let positions = layout_positions(2);
        assert!((positions[0].1 - positions[1].1 - BLOCK_HEIGHT_PT).abs() < 1e-4);
    }

    // ── writer ───────────────────────────────────────────────────────────

    #[test]
    fn unreadable_images_fall_back_to_placeholder_and_export_succeeds() {
        let dir = tempfile::tempdir().expect("tempdir");
        let out = dir.path().join("descriptions.pdf");

        let mut a = ImageRecord::new("/no/such/a.jpg");
        a.description = Some("A wing over clouds.".to_string());
        let mut b = ImageRecord::new("/no/such/b.jpg");
        b.description = Some("Error generating description: backend down".to_string());

        write(&[a, b], &out).expect("export");

        let bytes = std::fs::read(&out).expect("read");
        assert!(bytes.starts_with(b"%PDF"), "not a PDF file");
    }

    #[test]
    fn unwritable_destination_is_fatal() {
        let err = write(&[], Path::new("/no/such/dir/out.pdf")).unwrap_err();
        assert!(matches!(err, AeroscribeError::OutputWriteFailed { .. }));
    }
}

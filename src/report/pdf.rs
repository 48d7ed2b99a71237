//! PDF output for a [`Layout`]

use std::borrow::Cow;
use std::path::Path;
use printpdf::{BuiltinFont, IndirectFontRef, Line, Mm, PdfDocument, Point};
use crate::{Error, Result};
use super::layout::{Element, FontWeight, Layout, LEFT_MARGIN, PAGE_HEIGHT, PAGE_WIDTH};

const LAYER_NAME: &str = "Layer 1";
const RULE_THICKNESS: f32 = 0.5;

/// Points to millimetres
fn mm(points: f32) -> Mm {
    Mm(points * 25.4 / 72.0)
}

/// Characters WinAnsi maps into 0x80..=0x9F
const WIN_ANSI_EXTRAS: &str = "€‚ƒ„…†‡ˆ‰Š‹ŒŽ‘’“”•–—˜™š›œžŸ";

/// Stand-in for characters the builtin fonts cannot encode
const UNENCODABLE: char = '?';

fn pdf_error(err: printpdf::Error) -> Error {
    Error::Pdf(err.to_string())
}

fn is_encodable(c: char) -> bool {
    matches!(c, ' '..='~' | '\u{A0}'..='\u{FF}') || WIN_ANSI_EXTRAS.contains(c)
}

/// Replace characters outside the WinAnsi set with `?`
pub fn encodable_text(text: &str) -> Cow<'_, str> {
    if text.chars().all(is_encodable) {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(
            text.chars()
                .map(|c| if is_encodable(c) { c } else { UNENCODABLE })
                .collect(),
        )
    }
}

/// Write every page of `layout` to `path`, replacing any existing file.
///
/// The document is rendered in memory first; `path` is only touched once
/// rendering succeeded.
pub fn write_pdf(layout: &Layout, title: &str, path: &Path) -> Result<()> {
    let bytes = pdf_bytes(layout, title)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

/// Render every page of `layout` to PDF bytes
pub fn pdf_bytes(layout: &Layout, title: &str) -> Result<Vec<u8>> {
    let (doc, first_page, first_layer) =
        PdfDocument::new(title, mm(PAGE_WIDTH), mm(PAGE_HEIGHT), LAYER_NAME);
    let regular = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_error)?;
    let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(pdf_error)?;

    for (index, page) in layout.pages().iter().enumerate() {
        let (page_index, layer_index) = if index == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(mm(PAGE_WIDTH), mm(PAGE_HEIGHT), LAYER_NAME)
        };
        let canvas = doc.get_page(page_index).get_layer(layer_index);

        for element in &page.elements {
            match element {
                Element::Text { x, y, size, weight, text } => {
                    let font: &IndirectFontRef = match weight {
                        FontWeight::Regular => &regular,
                        FontWeight::Bold => &bold,
                    };
                    canvas.use_text(encodable_text(text), *size, mm(*x), mm(*y), font);
                }
                Element::Rule { y } => {
                    canvas.set_outline_thickness(RULE_THICKNESS);
                    canvas.add_line(Line {
                        points: vec![
                            (Point::new(mm(LEFT_MARGIN), mm(*y)), false),
                            (Point::new(mm(PAGE_WIDTH - LEFT_MARGIN), mm(*y)), false),
                        ],
                        is_closed: false,
                    });
                }
            }
        }
    }

    doc.save_to_bytes().map_err(pdf_error)
}

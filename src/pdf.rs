//! Small drawing layer over `printpdf` for single-page reports.
//!
//! `printpdf` places everything by absolute coordinate from the bottom-left
//! corner, so [`Canvas`] keeps a cursor that walks down the page the way a
//! flowing document would.

use printpdf::*;

use crate::error::ReportError;

pub const LETTER_WIDTH: f32 = 215.9;
pub const LETTER_HEIGHT: f32 = 279.4;
pub const MARGIN: f32 = 25.4;

const PT_TO_MM: f32 = 0.352_778;
// Helvetica averages a little over half an em per glyph.
const HELVETICA_AVG_ADVANCE: f32 = 0.52;

pub fn inch(value: f32) -> f32 {
    value * 25.4
}

pub fn hex(rgb: u32) -> Color {
    let channel = |shift: u32| ((rgb >> shift) & 0xff) as f32 / 255.0;
    Color::Rgb(Rgb::new(channel(16), channel(8), channel(0), None))
}

pub fn whitesmoke() -> Color {
    hex(0xf5f5f5)
}

pub fn black() -> Color {
    hex(0x000000)
}

/// Approximate rendered width of `text` in millimetres.
pub fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * HELVETICA_AVG_ADVANCE * PT_TO_MM
}

/// How a single line of paragraph text is set.
#[derive(Debug, Clone)]
pub struct TextStyle {
    pub size: f32,
    pub bold: bool,
    pub color: Color,
    pub centred: bool,
}

impl TextStyle {
    /// Left-aligned black regular text.
    pub fn body(size: f32) -> Self {
        Self {
            size,
            bold: false,
            color: black(),
            centred: false,
        }
    }

    /// Left-aligned black bold text.
    pub fn heading(size: f32) -> Self {
        Self {
            bold: true,
            ..Self::body(size)
        }
    }
}

#[derive(Debug, Clone)]
pub struct TableStyle {
    pub header_fill: Color,
    pub header_text: Color,
    pub header_size: f32,
    pub body_fill: Color,
    pub body_size: f32,
    pub header_height: f32,
    pub row_height: f32,
    pub grid_thickness: f32,
}

fn line_height(size: f32) -> f32 {
    size * PT_TO_MM * 1.2
}

fn paragraph_x(text: &str, style: &TextStyle) -> f32 {
    if style.centred {
        (LETTER_WIDTH - text_width(text, style.size)) / 2.0
    } else {
        MARGIN
    }
}

pub struct Canvas {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    cursor: f32,
}

impl Canvas {
    pub fn letter(title: &str) -> Result<Self, ReportError> {
        let (doc, page, layer) =
            PdfDocument::new(title, Mm(LETTER_WIDTH), Mm(LETTER_HEIGHT), "Layer 1");
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ReportError::Font(e.to_string()))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| ReportError::Font(e.to_string()))?;
        let layer = doc.get_page(page).get_layer(layer);

        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            cursor: LETTER_HEIGHT - MARGIN,
        })
    }

    pub fn space(&mut self, mm: f32) {
        self.cursor -= mm;
    }

    /// Writes one line of text and advances the cursor past it.
    pub fn paragraph(&mut self, text: &str, style: &TextStyle) {
        self.cursor -= line_height(style.size);
        let x = paragraph_x(text, style);
        self.layer.set_fill_color(style.color.clone());
        let font = if style.bold { &self.bold } else { &self.regular };
        self.layer
            .use_text(text, style.size, Mm(x), Mm(self.cursor), font);
    }

    /// Draws a centred table whose first row is the header.
    pub fn table(&mut self, rows: &[Vec<String>], widths: &[f32], style: &TableStyle) {
        if rows.is_empty() {
            return;
        }
        let total_width: f32 = widths.iter().sum();
        let left = (LETTER_WIDTH - total_width) / 2.0;
        let top = self.cursor;

        let mut row_tops = Vec::with_capacity(rows.len() + 1);
        let mut y = top;
        for (index, row) in rows.iter().enumerate() {
            let header = index == 0;
            let height = if header {
                style.header_height
            } else {
                style.row_height
            };
            row_tops.push(y);

            let fill = if header {
                style.header_fill.clone()
            } else {
                style.body_fill.clone()
            };
            self.layer.set_fill_color(fill);
            self.layer
                .add_rect(Rect::new(Mm(left), Mm(y - height), Mm(left + total_width), Mm(y)));

            let (size, font, color) = if header {
                (style.header_size, &self.bold, style.header_text.clone())
            } else {
                (style.body_size, &self.regular, black())
            };
            self.layer.set_fill_color(color);

            let mut x = left;
            for (cell, width) in row.iter().zip(widths) {
                let text_x = x + (width - text_width(cell, size)).max(0.0) / 2.0;
                let baseline = if header {
                    // Extra padding sits below the header text.
                    y - height / 2.0
                } else {
                    y - height / 2.0 - size * PT_TO_MM * 0.35
                };
                self.layer.use_text(cell.as_str(), size, Mm(text_x), Mm(baseline), font);
                x += width;
            }
            y -= height;
        }
        row_tops.push(y);

        self.layer.set_outline_color(black());
        self.layer.set_outline_thickness(style.grid_thickness);
        for row_y in &row_tops {
            self.line(left, *row_y, left + total_width, *row_y);
        }
        let mut x = left;
        self.line(x, top, x, y);
        for width in widths {
            x += width;
            self.line(x, top, x, y);
        }

        self.cursor = y;
    }

    fn line(&self, x1: f32, y1: f32, x2: f32, y2: f32) {
        self.layer.add_line(Line {
            points: vec![
                (Point::new(Mm(x1), Mm(y1)), false),
                (Point::new(Mm(x2), Mm(y2)), false),
            ],
            is_closed: false,
        });
    }

    pub fn into_bytes(self) -> Result<Vec<u8>, ReportError> {
        self.doc
            .save_to_bytes()
            .map_err(|e| ReportError::Render(e.to_string()))
    }
}

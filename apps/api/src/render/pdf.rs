//! PDF export of a laid-out document.
//!
//! Uses the standard Type1 Times faces (no embedding) with WinAnsiEncoding.
//! For ASCII, Latin-1 and the mapped punctuation the measured widths are the
//! AFM widths the viewer draws; other characters are written as '?'. Layout
//! coordinates are top-down; PDF user space is bottom-up.

use chrono::Utc;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream, StringFormat};
use tracing::debug;

use crate::layout::{DrawOp, FontStyle, LaidOutDocument, Page, PageConfig};
use crate::render::RenderError;

const PRODUCER: &str = concat!("resume-render-api ", env!("CARGO_PKG_VERSION"));

fn font_resource(style: FontStyle) -> &'static str {
    match style {
        FontStyle::Normal => "F1",
        FontStyle::Bold => "F2",
        FontStyle::Italic => "F3",
    }
}

/// Encodes text for a WinAnsi simple font. Latin-1 maps through, the common
/// typographic punctuation maps to its cp1252 slot, anything else becomes '?'.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201C}' => 0x93,
            '\u{201D}' => 0x94,
            '\u{2026}' => 0x85,
            '\u{20AC}' => 0x80,
            c if (c as u32) < 0x80 || (0xA0..=0xFF).contains(&(c as u32)) => c as u8,
            _ => b'?',
        })
        .collect()
}

/// Serializes `doc` to PDF bytes, one PDF page per layout page.
pub fn export_pdf(
    doc: &LaidOutDocument,
    config: &PageConfig,
    compress: bool,
) -> Result<Vec<u8>, RenderError> {
    let mut pdf = Document::with_version("1.5");
    let pages_id = pdf.new_object_id();

    let mut fonts = lopdf::Dictionary::new();
    for (style, base_font) in [
        (FontStyle::Normal, "Times-Roman"),
        (FontStyle::Bold, "Times-Bold"),
        (FontStyle::Italic, "Times-Italic"),
    ] {
        let font_id = pdf.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => base_font,
            "Encoding" => "WinAnsiEncoding",
        });
        fonts.set(font_resource(style), font_id);
    }
    let resources_id = pdf.add_object(dictionary! { "Font" => fonts });

    let mut kids: Vec<Object> = Vec::with_capacity(doc.pages.len());
    for page in &doc.pages {
        let content = Content {
            operations: page_operations(page, config.page_height),
        };
        let content_id = pdf.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id: ObjectId = pdf.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(page_id.into());
    }

    pdf.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Count" => Object::Integer(kids.len() as i64),
            "Kids" => kids,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                config.page_width.into(),
                config.page_height.into(),
            ],
        }),
    );

    let catalog_id = pdf.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    pdf.trailer.set("Root", catalog_id);

    let stamp = Utc::now().format("D:%Y%m%d%H%M%SZ").to_string();
    let info_id = pdf.add_object(dictionary! {
        "Title" => Object::String(encode_win_ansi(&doc.title), StringFormat::Literal),
        "Producer" => Object::string_literal(PRODUCER),
        "CreationDate" => Object::string_literal(stamp),
    });
    pdf.trailer.set("Info", info_id);

    if compress {
        pdf.compress();
    }

    let mut buffer = Vec::new();
    pdf.save_to(&mut buffer)?;
    debug!(pages = doc.pages.len(), bytes = buffer.len(), "pdf serialized");
    Ok(buffer)
}

fn page_operations(page: &Page, page_height: f32) -> Vec<Operation> {
    let mut ops = vec![
        Operation::new("g", vec![Object::Integer(0)]),
        Operation::new("G", vec![Object::Integer(0)]),
    ];

    for op in &page.ops {
        match op {
            DrawOp::Text { text, x, y, font } => {
                if text.is_empty() {
                    continue;
                }
                ops.push(Operation::new("BT", vec![]));
                ops.push(Operation::new(
                    "Tf",
                    vec![font_resource(font.style).into(), font.size.into()],
                ));
                ops.push(Operation::new("Td", vec![(*x).into(), (page_height - y).into()]));
                ops.push(Operation::new(
                    "Tj",
                    vec![Object::String(encode_win_ansi(text), StringFormat::Literal)],
                ));
                ops.push(Operation::new("ET", vec![]));
            }
            DrawOp::Rule { x1, x2, y, weight } => {
                let pdf_y = page_height - y;
                ops.push(Operation::new("w", vec![(*weight).into()]));
                ops.push(Operation::new("m", vec![(*x1).into(), pdf_y.into()]));
                ops.push(Operation::new("l", vec![(*x2).into(), pdf_y.into()]));
                ops.push(Operation::new("S", vec![]));
            }
        }
    }
    ops
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{default_page_config, render_document, StaticMetrics};
    use crate::models::resume::{ExperienceEntry, ResumeDocument};

    fn sample(bullets: usize) -> ResumeDocument {
        ResumeDocument {
            full_name: "Jane Doe".into(),
            contact_info: "jane@example.com".into(),
            experience: vec![ExperienceEntry {
                role: "Engineer".into(),
                company: "Acme".into(),
                location: Some("Berlin".into()),
                duration: "2020-2022".into(),
                points: (0..bullets)
                    .map(|i| {
                        format!(
                            "Item {i}: rebuilt the reporting stack on columnar storage, \
                             bringing nightly jobs from four hours to eleven minutes and \
                             retiring two legacy clusters in the process"
                        )
                    })
                    .collect(),
            }],
            ..Default::default()
        }
    }

    fn export(doc: &ResumeDocument, compress: bool) -> (usize, Vec<u8>) {
        let config = default_page_config();
        let laid_out = render_document(doc, &config, &StaticMetrics).unwrap();
        let bytes = export_pdf(&laid_out, &config, compress).unwrap();
        (laid_out.page_count(), bytes)
    }

    #[test]
    fn test_encode_win_ansi_maps_bullet_and_latin1() {
        assert_eq!(encode_win_ansi("\u{2022}"), vec![0x95]);
        assert_eq!(encode_win_ansi("café"), vec![b'c', b'a', b'f', 0xE9]);
        assert_eq!(encode_win_ansi("日本"), vec![b'?', b'?']);
    }

    #[test]
    fn test_export_produces_pdf_header() {
        let (_, bytes) = export(&sample(3), true);
        assert!(bytes.starts_with(b"%PDF-1.5"));
    }

    #[test]
    fn test_export_page_count_matches_layout() {
        let (pages, bytes) = export(&sample(40), true);
        assert!(pages > 1);
        let parsed = Document::load_mem(&bytes).unwrap();
        assert_eq!(parsed.get_pages().len(), pages);
    }

    #[test]
    fn test_uncompressed_export_contains_text_ops() {
        let (_, bytes) = export(&sample(1), false);
        let parsed = Document::load_mem(&bytes).unwrap();
        let page_id = *parsed.get_pages().get(&1).unwrap();
        let content = parsed.get_and_decode_page_content(page_id).unwrap();
        let shown: Vec<Vec<u8>> = content
            .operations
            .iter()
            .filter(|op| op.operator == "Tj")
            .filter_map(|op| match op.operands.first() {
                Some(Object::String(bytes, _)) => Some(bytes.clone()),
                _ => None,
            })
            .collect();
        assert!(shown.contains(&b"JANE DOE".to_vec()));
        assert!(shown.contains(&vec![0x95]));
        assert!(content.operations.iter().any(|op| op.operator == "S"));
    }

    #[test]
    fn test_text_y_is_flipped_to_pdf_space() {
        let config = default_page_config();
        let page = Page {
            index: 0,
            ops: vec![DrawOp::Text {
                text: "x".into(),
                x: 36.0,
                y: 36.0,
                font: crate::layout::font_metrics::Font::normal(11.0),
            }],
        };
        let ops = page_operations(&page, config.page_height);
        let td = ops.iter().find(|op| op.operator == "Td").unwrap();
        assert_eq!(td.operands[1].as_float().unwrap(), 756.0);
    }

    #[test]
    fn test_empty_text_runs_are_skipped() {
        let page = Page {
            index: 0,
            ops: vec![DrawOp::Text {
                text: String::new(),
                x: 0.0,
                y: 0.0,
                font: crate::layout::font_metrics::Font::normal(11.0),
            }],
        };
        let ops = page_operations(&page, 792.0);
        assert!(ops.iter().all(|op| op.operator != "Tj"));
    }
}

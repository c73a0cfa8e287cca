//! PDF encoding of an export artifact
//!
//! Text is written with the standard Helvetica / Helvetica-Bold fonts;
//! every placed image becomes an RGB image XObject (alpha flattened onto
//! white). Layout coordinates are top-down, PDF user space is bottom-up.
//!
//! Both fonts use `WinAnsiEncoding`, so every string is transcoded to
//! CP1252 one byte per char; unmappable chars become `?`.

use crate::artifact::{PlacedImage, PlacedText};
use crate::typography::{self, FontWeight};
use crate::{ExportArtifact, PlacedItem, Result};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};
use tracing::debug;

const REGULAR_FONT: &str = "F1";
const BOLD_FONT: &str = "F2";

fn real(value: f64) -> Object {
    Object::Real(value as f32)
}

/// Encode the artifact as a PDF byte stream
pub fn encode_pdf(artifact: &ExportArtifact, title: &str) -> Result<Vec<u8>> {
    let geometry = &artifact.geometry;
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });

    let mut kids: Vec<Object> = Vec::with_capacity(artifact.pages.len());

    for (page_index, page) in artifact.pages.iter().enumerate() {
        let mut operations = Vec::new();
        let mut xobjects = Dictionary::new();

        for item in &page.items {
            match item {
                PlacedItem::Text(text) => write_text(&mut operations, text, geometry.height),
                PlacedItem::Image(image) => {
                    let name = format!("Im{}", xobjects.len() + 1);
                    let image_id = add_image(&mut doc, image);
                    xobjects.set(name.as_bytes().to_vec(), image_id);
                    write_image(&mut operations, &name, image, geometry.height);
                }
            }
        }

        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));

        let resources = dictionary! {
            "Font" => dictionary! {
                REGULAR_FONT => regular_id,
                BOLD_FONT => bold_id,
            },
            "XObject" => xobjects,
        };

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), real(geometry.width), real(geometry.height)],
            "Contents" => content_id,
            "Resources" => resources,
        });
        kids.push(page_id.into());

        debug!(page = page_index, items = page.items.len(), "Encoded page");
    }

    let page_count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal(win_ansi(title)),
        "Producer" => Object::string_literal("reportkit"),
        "CreationDate" => Object::string_literal(pdf_date(&artifact.generated_at)),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)?;
    Ok(buffer)
}

fn write_text(operations: &mut Vec<Operation>, text: &PlacedText, page_height: f64) {
    let font = match text.weight {
        FontWeight::Regular => REGULAR_FONT,
        FontWeight::Bold => BOLD_FONT,
    };
    let line_height = typography::line_height(text.size);
    let [r, g, b] = text.color;

    operations.push(Operation::new("BT", vec![]));
    operations.push(Operation::new("Tf", vec![font.into(), real(text.size)]));
    operations.push(Operation::new(
        "rg",
        vec![
            real(r as f64 / 255.0),
            real(g as f64 / 255.0),
            real(b as f64 / 255.0),
        ],
    ));

    for (i, line) in text.lines.iter().enumerate() {
        if line.is_empty() {
            continue;
        }
        let x = text.x + typography::line_offset(line, text.size, text.width, text.alignment);
        let baseline = text.y + i as f64 * line_height + text.size;

        // Tm positions absolutely, so lines do not depend on each other
        operations.push(Operation::new(
            "Tm",
            vec![
                1.into(),
                0.into(),
                0.into(),
                1.into(),
                real(x),
                real(page_height - baseline),
            ],
        ));
        operations.push(Operation::new("Tj", vec![Object::string_literal(win_ansi(line))]));
    }

    operations.push(Operation::new("ET", vec![]));
}

fn add_image(doc: &mut Document, image: &PlacedImage) -> ObjectId {
    let bitmap = &image.bitmap;
    let mut stream = Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => bitmap.width as i64,
            "Height" => bitmap.height as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
        },
        bitmap.to_rgb_over_white(),
    );
    // Uncompressed data is still valid if compression fails
    let _ = stream.compress();
    doc.add_object(stream)
}

fn write_image(operations: &mut Vec<Operation>, name: &str, image: &PlacedImage, page_height: f64) {
    let bottom = page_height - image.y - image.height;

    operations.push(Operation::new("q", vec![]));
    operations.push(Operation::new(
        "cm",
        vec![
            real(image.width),
            0.into(),
            0.into(),
            real(image.height),
            real(image.x),
            real(bottom),
        ],
    ));
    operations.push(Operation::new("Do", vec![Object::Name(name.as_bytes().to_vec())]));
    operations.push(Operation::new("Q", vec![]));
}

/// Transcode to CP1252 (WinAnsiEncoding)
pub(crate) fn win_ansi(text: &str) -> Vec<u8> {
    text.chars().map(win_ansi_byte).collect()
}

fn win_ansi_byte(c: char) -> u8 {
    match c {
        '\u{0}'..='\u{7f}' | '\u{a0}'..='\u{ff}' => c as u8,
        '€' => 0x80,
        '‚' => 0x82,
        'ƒ' => 0x83,
        '„' => 0x84,
        '…' => 0x85,
        '†' => 0x86,
        '‡' => 0x87,
        'ˆ' => 0x88,
        '‰' => 0x89,
        'Š' => 0x8a,
        '‹' => 0x8b,
        'Œ' => 0x8c,
        'Ž' => 0x8e,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201c}' => 0x93,
        '\u{201d}' => 0x94,
        '•' => 0x95,
        '\u{2013}' => 0x96,
        '\u{2014}' => 0x97,
        '˜' => 0x98,
        '™' => 0x99,
        'š' => 0x9a,
        '›' => 0x9b,
        'œ' => 0x9c,
        'ž' => 0x9e,
        'Ÿ' => 0x9f,
        _ => b'?',
    }
}

/// RFC 3339 → PDF date string (`D:YYYYMMDDHHmmSSZ`)
fn pdf_date(rfc3339: &str) -> String {
    match chrono::DateTime::parse_from_rfc3339(rfc3339) {
        Ok(date) => date
            .with_timezone(&chrono::Utc)
            .format("D:%Y%m%d%H%M%SZ")
            .to_string(),
        Err(_) => String::from("D:19700101000000Z"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::artifact::Page;
    use crate::typography::Alignment;
    use crate::PageGeometry;
    use reportkit_blocks::BlockId;

    fn text_artifact(line: &str) -> ExportArtifact {
        ExportArtifact {
            geometry: PageGeometry::a4(),
            pages: vec![Page {
                items: vec![PlacedItem::Text(PlacedText {
                    block_id: BlockId::from("t"),
                    x: 40.0,
                    y: 40.0,
                    width: 500.0,
                    size: 12.0,
                    weight: FontWeight::Regular,
                    color: [0, 0, 0],
                    alignment: Alignment::Left,
                    lines: vec![line.to_string()],
                })],
            }],
            generated_at: "2024-03-05T10:20:30+00:00".to_string(),
        }
    }

    fn shown_strings(bytes: &[u8]) -> Vec<Vec<u8>> {
        let pdf = Document::load_mem(bytes).unwrap();
        let (_, page_id) = pdf.get_pages().into_iter().next().unwrap();
        let content = Content::decode(&pdf.get_page_content(page_id).unwrap()).unwrap();
        content
            .operations
            .into_iter()
            .filter(|op| op.operator == "Tj")
            .filter_map(|op| match op.operands.first() {
                Some(Object::String(bytes, _)) => Some(bytes.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_text_written_as_win_ansi() {
        let bytes = encode_pdf(&text_artifact("Atenção"), "Relatório").unwrap();

        assert_eq!(shown_strings(&bytes), vec![b"Aten\xe7\xe3o".to_vec()]);
    }

    #[test]
    fn test_win_ansi_one_byte_per_char() {
        assert_eq!(win_ansi("“Olá” – 5€"), b"\x93Ol\xe1\x94 \x96 5\x80".to_vec());
        assert_eq!(win_ansi("数据"), b"??".to_vec());
        assert_eq!(win_ansi("plain"), b"plain".to_vec());
    }

    #[test]
    fn test_pdf_date() {
        assert_eq!(pdf_date("2024-03-05T10:20:30+00:00"), "D:20240305102030Z");
        assert_eq!(pdf_date("garbage"), "D:19700101000000Z");
    }
}

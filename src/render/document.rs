//! Assembles drawn pages into a PDF file with lopdf.

use crate::render::canvas::Canvas;
use crate::render::fonts::Font;
use crate::utils::error::{AgroError, Result};
use chrono::NaiveDateTime;
use lopdf::{dictionary, Document, Object, Stream, StringFormat};

#[derive(Debug, Clone)]
pub struct DocumentInfo {
    pub title: String,
    pub author: String,
    pub subject: String,
    pub created: NaiveDateTime,
}

/// PDF text string: plain ASCII as a literal, anything else as UTF-16BE
/// with a byte-order mark.
fn info_string(text: &str) -> Object {
    if text.is_ascii() {
        return Object::String(text.as_bytes().to_vec(), StringFormat::Literal);
    }
    let mut bytes = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

/// Builds the document and returns the serialized bytes.
pub fn assemble(pages: Vec<Canvas>, info: &DocumentInfo) -> Result<Vec<u8>> {
    if pages.is_empty() {
        return Err(AgroError::processing("cannot build a PDF without pages"));
    }

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut fonts = lopdf::Dictionary::new();
    for font in Font::ALL {
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => font.base_font(),
            "Encoding" => "WinAnsiEncoding",
        });
        fonts.set(font.resource_name(), font_id);
    }
    let resources_id = doc.add_object(dictionary! {
        "Font" => fonts,
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for canvas in pages {
        let media_box = vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(canvas.width),
            Object::Real(canvas.height),
        ];
        let content = canvas.into_content();
        let content_id = doc.add_object(Stream::new(lopdf::Dictionary::new(), content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => media_box,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let info_id = doc.add_object(dictionary! {
        "Title" => info_string(&info.title),
        "Author" => info_string(&info.author),
        "Subject" => info_string(&info.subject),
        "Creator" => info_string("agro-reports"),
        "CreationDate" => info_string(&info.created.format("D:%Y%m%d%H%M%S").to_string()),
    });
    doc.trailer.set("Info", info_id);

    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok(bytes)
}

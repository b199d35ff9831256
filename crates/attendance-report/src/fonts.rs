//! Font loading and PDF font embedding.
//!
//! TrueType fonts are embedded whole as `Type0` fonts with `Identity-H`
//! encoding, so content strings carry raw glyph ids. Only the glyphs a page
//! actually uses get widths and `ToUnicode` entries.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;

use ab_glyph::{Font, FontVec};
use lopdf::{Document, Object, ObjectId, Stream, StringFormat, dictionary};

use crate::error::{ReportError, Result};
use crate::shaping::shape_for_display;

/// Average Helvetica advance in em units, used to center built-in text.
const BUILTIN_ADVANCE: f32 = 0.55;

/// A TrueType font read from disk.
pub struct EmbeddedFont {
    base_name: String,
    data: Vec<u8>,
    face: FontVec,
}

impl std::fmt::Debug for EmbeddedFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddedFont")
            .field("base_name", &self.base_name)
            .field("bytes", &self.data.len())
            .finish()
    }
}

impl EmbeddedFont {
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read(path).map_err(|e| ReportError::io(path, e))?;
        let face = FontVec::try_from_vec(data.clone()).map_err(|e| ReportError::Font {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let base_name: String = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default()
            .chars()
            .filter(|ch| ch.is_ascii_alphanumeric() || *ch == '-')
            .collect();
        Ok(Self {
            base_name: if base_name.is_empty() {
                "EmbeddedFont".to_string()
            } else {
                base_name
            },
            data,
            face,
        })
    }

    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    fn scale(&self) -> f32 {
        1000.0 / self.face.units_per_em().unwrap_or(1000.0)
    }

    /// Advance of a glyph in thousandths of an em.
    fn advance(&self, glyph: ab_glyph::GlyphId) -> f32 {
        self.face.h_advance_unscaled(glyph) * self.scale()
    }
}

/// Source of glyphs for one font slot of a report.
#[derive(Debug)]
pub enum FontFace {
    Embedded(EmbeddedFont),
    /// One of the standard 14 fonts, WinAnsi-encoded.
    Builtin(&'static str),
}

impl FontFace {
    /// Loads a font file, falling back to `fallback` when the path is unset
    /// or unusable.
    pub fn load_or(path: Option<&Path>, fallback: &'static str) -> Self {
        let Some(path) = path else {
            return Self::Builtin(fallback);
        };
        match EmbeddedFont::load(path) {
            Ok(font) => Self::Embedded(font),
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, fallback, "font unavailable, using built-in font");
                Self::Builtin(fallback)
            }
        }
    }

    pub fn is_embedded(&self) -> bool {
        matches!(self, Self::Embedded(_))
    }
}

/// Text prepared for one `Tj` operator.
#[derive(Debug, Clone)]
pub struct TextRun {
    pub operand: Object,
    pub width: f32,
}

#[derive(Debug, Clone, Copy)]
struct GlyphUse {
    width: f32,
    ch: char,
}

/// A font as used on one page: tracks glyphs so the PDF objects can be
/// written once layout is done.
pub struct PageFont<'a> {
    resource: &'static str,
    face: &'a FontFace,
    used: BTreeMap<u16, GlyphUse>,
}

impl<'a> PageFont<'a> {
    pub fn new(resource: &'static str, face: &'a FontFace) -> Self {
        Self {
            resource,
            face,
            used: BTreeMap::new(),
        }
    }

    pub fn resource(&self) -> &'static str {
        self.resource
    }

    /// Shapes `text` and encodes it for this font at `size` points.
    pub fn run(&mut self, text: &str, size: f32) -> TextRun {
        match self.face {
            FontFace::Embedded(font) => {
                let shaped = shape_for_display(text);
                let mut bytes = Vec::with_capacity(shaped.len() * 2);
                let mut advance = 0.0;
                for ch in shaped.chars() {
                    let glyph = font.face.glyph_id(ch);
                    let width = font.advance(glyph);
                    advance += width;
                    self.used.entry(glyph.0).or_insert(GlyphUse { width, ch });
                    bytes.extend_from_slice(&glyph.0.to_be_bytes());
                }
                TextRun {
                    operand: Object::String(bytes, StringFormat::Hexadecimal),
                    width: advance * size / 1000.0,
                }
            }
            FontFace::Builtin(_) => {
                let bytes = win_ansi_bytes(text);
                TextRun {
                    width: bytes.len() as f32 * BUILTIN_ADVANCE * size,
                    operand: Object::String(bytes, StringFormat::Literal),
                }
            }
        }
    }

    /// Writes the font dictionary (and for embedded fonts its descendants)
    /// into `doc`.
    pub fn write(self, doc: &mut Document) -> ObjectId {
        match self.face {
            FontFace::Builtin(name) => doc.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => *name,
                "Encoding" => "WinAnsiEncoding",
            }),
            FontFace::Embedded(font) => write_type0(font, &self.used, doc),
        }
    }
}

fn write_type0(font: &EmbeddedFont, used: &BTreeMap<u16, GlyphUse>, doc: &mut Document) -> ObjectId {
    let scale = font.scale();
    let ascent = font.face.ascent_unscaled() * scale;
    let descent = font.face.descent_unscaled() * scale;
    let base_name = Object::Name(font.base_name.clone().into_bytes());

    let file_id = doc.add_object(Stream::new(
        dictionary! { "Length1" => font.data.len() as i64 },
        font.data.clone(),
    ));
    let descriptor_id = doc.add_object(dictionary! {
        "Type" => "FontDescriptor",
        "FontName" => base_name.clone(),
        "Flags" => 4,
        "FontBBox" => vec![0.into(), descent.into(), 1000.into(), ascent.into()],
        "ItalicAngle" => 0,
        "Ascent" => ascent,
        "Descent" => descent,
        "CapHeight" => ascent,
        "StemV" => 80,
        "FontFile2" => file_id,
    });

    let widths: Vec<Object> = used
        .iter()
        .flat_map(|(glyph, usage)| {
            [
                Object::Integer(i64::from(*glyph)),
                Object::Array(vec![usage.width.round().into()]),
            ]
        })
        .collect();
    let descendant_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "CIDFontType2",
        "BaseFont" => base_name.clone(),
        "CIDSystemInfo" => dictionary! {
            "Registry" => Object::string_literal("Adobe"),
            "Ordering" => Object::string_literal("Identity"),
            "Supplement" => 0,
        },
        "FontDescriptor" => descriptor_id,
        "CIDToGIDMap" => "Identity",
        "DW" => 1000,
        "W" => widths,
    });
    let to_unicode_id = doc.add_object(Stream::new(dictionary! {}, to_unicode_cmap(used).into_bytes()));

    doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type0",
        "BaseFont" => base_name,
        "Encoding" => "Identity-H",
        "DescendantFonts" => vec![descendant_id.into()],
        "ToUnicode" => to_unicode_id,
    })
}

fn to_unicode_cmap(used: &BTreeMap<u16, GlyphUse>) -> String {
    let mut cmap = String::from(
        "/CIDInit /ProcSet findresource begin\n\
         12 dict begin\n\
         begincmap\n\
         /CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n\
         /CMapName /Adobe-Identity-UCS def\n\
         /CMapType 2 def\n\
         1 begincodespacerange\n<0000> <FFFF>\nendcodespacerange\n",
    );
    let entries: Vec<(&u16, &GlyphUse)> = used.iter().collect();
    // bfchar blocks are limited to 100 entries.
    for chunk in entries.chunks(100) {
        let _ = writeln!(cmap, "{} beginbfchar", chunk.len());
        for (glyph, usage) in chunk {
            let mut units = [0u16; 2];
            let hex: String = usage
                .ch
                .encode_utf16(&mut units)
                .iter()
                .map(|unit| format!("{unit:04X}"))
                .collect();
            let _ = writeln!(cmap, "<{glyph:04X}> <{hex}>");
        }
        cmap.push_str("endbfchar\n");
    }
    cmap.push_str(
        "endcmap\n\
         CMapName currentdict /CMap defineresource pop\n\
         end\n\
         end\n",
    );
    cmap
}

/// Maps text onto WinAnsi bytes; characters outside Latin-1 become `?`.
fn win_ansi_bytes(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| match u8::try_from(u32::from(ch)) {
            Ok(byte) if !(0x80..0xA0).contains(&byte) => byte,
            _ => b'?',
        })
        .collect()
}

use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Mutex;
use ttf_parser::Face;

static TEXT_MEASURER: Lazy<Mutex<TextMeasurer>> = Lazy::new(|| Mutex::new(TextMeasurer::new()));

/// Width in pixels of `text` set in the first installed face of
/// `font_family`, or `None` when no usable font is found.
pub fn measure_text_width(text: &str, font_size: f32, font_family: &str) -> Option<f32> {
    if text.is_empty() || font_size <= 0.0 {
        return Some(0.0);
    }
    let mut guard = TEXT_MEASURER.lock().ok()?;
    guard.measure(text, font_size, font_family)
}

struct TextMeasurer {
    db: Database,
    loaded_system_fonts: bool,
    cache: HashMap<String, Option<FontFace>>,
}

impl TextMeasurer {
    fn new() -> Self {
        Self {
            db: Database::new(),
            loaded_system_fonts: false,
            cache: HashMap::new(),
        }
    }

    fn measure(&mut self, text: &str, font_size: f32, font_family: &str) -> Option<f32> {
        let key = normalize_family_key(font_family);
        if !self.cache.contains_key(&key) {
            let face = self.load_face(font_family);
            self.cache.insert(key.clone(), face);
        }
        let face = self.cache.get(&key)?.as_ref()?;
        Some(face.measure_width(text, font_size))
    }

    fn load_face(&mut self, font_family: &str) -> Option<FontFace> {
        let names: Vec<String> = font_family
            .split(',')
            .map(|part| part.trim().trim_matches('"').trim_matches('\'').to_string())
            .filter(|part| !part.is_empty())
            .collect();
        let mut families: Vec<Family<'_>> = names
            .iter()
            .map(|name| match name.to_ascii_lowercase().as_str() {
                "serif" => Family::Serif,
                "sans-serif" | "system-ui" | "-apple-system" | "ui-sans-serif" => {
                    Family::SansSerif
                }
                "monospace" | "ui-monospace" => Family::Monospace,
                _ => Family::Name(name.as_str()),
            })
            .collect();
        if families.is_empty() {
            families.push(Family::SansSerif);
        }

        if !self.loaded_system_fonts {
            self.db.load_system_fonts();
            self.loaded_system_fonts = true;
        }

        let query = Query {
            families: &families,
            weight: Weight::NORMAL,
            stretch: Stretch::Normal,
            style: Style::Normal,
        };
        let id = self.db.query(&query)?;
        let mut loaded = None;
        self.db.with_face_data(id, |data, index| {
            loaded = FontFace::parse(data, index);
        });
        loaded
    }
}

/// Horizontal advances extracted once from a parsed face.
struct FontFace {
    units_per_em: f32,
    ascii_advances: [u16; 128],
    advances: HashMap<char, u16>,
}

impl FontFace {
    fn parse(data: &[u8], index: u32) -> Option<Self> {
        let face = Face::parse(data, index).ok()?;
        let mut ascii_advances = [0u16; 128];
        for byte in 0u8..=127 {
            if let Some(glyph) = face.glyph_index(byte as char) {
                ascii_advances[byte as usize] = face.glyph_hor_advance(glyph).unwrap_or(0);
            }
        }
        // Ellipsis is the only non-ASCII glyph labels are guaranteed to use.
        let mut advances = HashMap::new();
        if let Some(glyph) = face.glyph_index('\u{2026}') {
            advances.insert('\u{2026}', face.glyph_hor_advance(glyph).unwrap_or(0));
        }
        Some(Self {
            units_per_em: face.units_per_em().max(1) as f32,
            ascii_advances,
            advances,
        })
    }

    fn measure_width(&self, text: &str, font_size: f32) -> f32 {
        let scale = font_size / self.units_per_em;
        let fallback = font_size * 0.56;
        let mut width = 0.0f32;
        for ch in text.chars() {
            let advance = if ch.is_ascii() {
                self.ascii_advances[ch as usize]
            } else {
                self.advances.get(&ch).copied().unwrap_or(0)
            };
            if advance == 0 {
                width += if ch.is_ascii() { fallback } else { font_size };
            } else {
                width += advance as f32 * scale;
            }
        }
        width.max(0.0)
    }
}

fn normalize_family_key(font_family: &str) -> String {
    let trimmed = font_family.trim();
    if trimmed.is_empty() {
        "sans-serif".to_string()
    } else {
        trimmed.to_string()
    }
}

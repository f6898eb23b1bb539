//! Base-14 Helvetica family: resource names, WinAnsi encoding and glyph
//! widths (from the Adobe AFM files, in 1/1000 em).

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Regular,
    Bold,
    Oblique,
}

impl Font {
    pub const ALL: [Font; 3] = [Font::Regular, Font::Bold, Font::Oblique];

    pub fn resource_name(self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
            Font::Oblique => "F3",
        }
    }

    pub fn base_font(self) -> &'static str {
        match self {
            Font::Regular => "Helvetica",
            Font::Bold => "Helvetica-Bold",
            Font::Oblique => "Helvetica-Oblique",
        }
    }
}

// Widths for ASCII 32..=126.
const REGULAR_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
    278, 278, 584, 584, 584, 556, 1015, // ':'..'@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // 'A'..'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
    278, 278, 278, 469, 556, 333, // '['..'`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // 'a'..'m'
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // 'n'..'z'
    334, 260, 334, 584, // '{'..'~'
];

const BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    333, 333, 584, 584, 584, 611, 975,
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    333, 278, 333, 584, 556, 333,
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
    389, 280, 389, 584,
];

/// Encodes text for a WinAnsiEncoding simple font. Characters outside the
/// code page become `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '€' => 0x80,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            c if (c as u32) < 0x80 => c as u8,
            c if (0xA0..=0xFF).contains(&(c as u32)) => c as u32 as u8,
            _ => b'?',
        })
        .collect()
}

fn glyph_width(c: char, font: Font) -> u16 {
    let table = match font {
        Font::Bold => &BOLD_WIDTHS,
        Font::Regular | Font::Oblique => &REGULAR_WIDTHS,
    };

    let ascii = match c {
        ' '..='~' => c,
        '•' => return 350,
        '–' => return 556,
        '—' => return 1000,
        '°' => return 400,
        'º' | 'ª' => return 365,
        '\u{a0}' => ' ',
        other => fold_accent(other),
    };

    if (' '..='~').contains(&ascii) {
        table[(ascii as usize) - 32]
    } else {
        556
    }
}

/// Base letter of an accented Latin-1 letter; the accent does not change
/// the advance width.
fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'Á' | 'À' | 'Â' | 'Ã' | 'Ä' | 'Å' => 'A',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'É' | 'È' | 'Ê' | 'Ë' => 'E',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => 'O',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
        'ç' => 'c',
        'Ç' => 'C',
        'ñ' => 'n',
        'Ñ' => 'N',
        other => other,
    }
}

/// Advance width of `text` in points.
pub fn string_width(text: &str, font: Font, size: f32) -> f32 {
    let units: u32 = text.chars().map(|c| glyph_width(c, font) as u32).sum();
    units as f32 * size / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_win_ansi_encoding() {
        assert_eq!(encode_win_ansi("Área"), vec![0xC1, b'r', b'e', b'a']);
        assert_eq!(encode_win_ansi("a • b"), vec![b'a', b' ', 0x95, b' ', b'b']);
        assert_eq!(encode_win_ansi("€"), vec![0x80]);
        assert_eq!(encode_win_ansi("漢"), vec![b'?']);
    }

    #[test]
    fn test_string_width() {
        // "Hi": H=722, i=222
        assert!((string_width("Hi", Font::Regular, 10.0) - 9.44).abs() < 1e-4);
        // bold "Hi": H=722, i=278
        assert!((string_width("Hi", Font::Bold, 10.0) - 10.0).abs() < 1e-4);
        assert_eq!(
            string_width("São", Font::Regular, 12.0),
            string_width("Sao", Font::Regular, 12.0)
        );
        assert_eq!(string_width("", Font::Bold, 12.0), 0.0);
    }

    #[test]
    fn test_width_tables_cover_printable_ascii() {
        assert_eq!(REGULAR_WIDTHS.len(), ('~' as usize) - (' ' as usize) + 1);
        assert_eq!(glyph_width('@', Font::Regular), 1015);
        assert_eq!(glyph_width('z', Font::Bold), 500);
        assert_eq!(glyph_width('~', Font::Regular), 584);
    }
}

//! Advance widths of the builtin Helvetica pair.
//!
//! Widths are in thousandths of an em for ASCII 0x20..=0x7E, taken from the
//! Adobe core font metrics.  Characters outside the table (accented Latin
//! letters mostly) use the width of their unaccented base letter when known,
//! otherwise an average width.

use super::{pt_to_mm, FontWeight, TextMetrics};

const FALLBACK_WIDTH: u16 = 556;

#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Static-table metrics for the builtin Helvetica fonts.
#[derive(Clone, Copy, Debug, Default)]
pub struct BuiltinMetrics;

impl BuiltinMetrics {
    fn char_width(ch: char, weight: FontWeight) -> u16 {
        let table = match weight {
            FontWeight::Regular => &HELVETICA,
            FontWeight::Bold => &HELVETICA_BOLD,
        };
        let base = fold_accent(ch);
        match base as u32 {
            code @ 0x20..=0x7E => table[(code - 0x20) as usize],
            _ => FALLBACK_WIDTH,
        }
    }
}

impl TextMetrics for BuiltinMetrics {
    fn text_width(&self, text: &str, weight: FontWeight, size_pt: f64) -> f64 {
        let units: u32 = text
            .chars()
            .map(|ch| u32::from(Self::char_width(ch, weight)))
            .sum();
        pt_to_mm(units as f64 * size_pt / 1000.0)
    }
}

/// Maps common accented Latin letters to their ASCII base letter.
///
/// The builtin fonts are written without an embedded encoding, so the PDF
/// surface prints folded text with them as well.
pub fn fold_accent(ch: char) -> char {
    match ch {
        'á' | 'à' | 'â' | 'ä' | 'ã' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'ö' | 'õ' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ñ' => 'n',
        'ç' => 'c',
        'Á' | 'À' | 'Â' | 'Ä' | 'Ã' => 'A',
        'É' | 'È' | 'Ê' | 'Ë' => 'E',
        'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
        'Ó' | 'Ò' | 'Ô' | 'Ö' | 'Õ' => 'O',
        'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
        'Ñ' => 'N',
        'Ç' => 'C',
        '—' | '–' => '-',
        '“' | '”' => '"',
        '‘' | '’' => '\'',
        other => other,
    }
}

/// Folds every character of `text` with [`fold_accent`].
pub fn fold_text(text: &str) -> String {
    text.chars().map(fold_accent).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn space_width_matches_table() {
        let width = BuiltinMetrics.text_width(" ", FontWeight::Regular, 1000.0);
        assert!((width - pt_to_mm(278.0)).abs() < 1e-9);
    }

    #[test]
    fn accented_letters_use_base_width() {
        let plain = BuiltinMetrics.text_width("Formacion", FontWeight::Bold, 12.0);
        let accented = BuiltinMetrics.text_width("Formación", FontWeight::Bold, 12.0);
        assert!((plain - accented).abs() < 1e-9);
    }

    #[test]
    fn folding_strips_spanish_accents() {
        assert_eq!(fold_text("GALERÍA — Año"), "GALERIA - Ano");
    }
}

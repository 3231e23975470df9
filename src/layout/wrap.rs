//! Greedy word wrapping against measured text widths.

use crate::fonts::{FontWeight, TextMetrics};

/// Splits `text` into lines no wider than `max_width` millimetres.
///
/// Explicit newlines always start a new line and blank input yields a single
/// empty line, so every produced line wraps back to itself.  Words are never
/// broken: a single word wider than `max_width` gets a line of its own.
/// Interior blank lines are kept as empty strings so paragraph spacing
/// survives.
pub fn wrap_text<M: TextMetrics + ?Sized>(
    metrics: &M,
    text: &str,
    weight: FontWeight,
    size_pt: f64,
    max_width: f64,
) -> Vec<String> {
    if text.trim().is_empty() {
        return vec![String::new()];
    }

    let space = metrics.text_width(" ", weight, size_pt);
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current = String::new();
        let mut current_width = 0.0;

        for word in paragraph.split_whitespace() {
            let word_width = metrics.text_width(word, weight, size_pt);
            if current.is_empty() {
                current.push_str(word);
                current_width = word_width;
            } else if current_width + space + word_width <= max_width {
                current.push(' ');
                current.push_str(word);
                current_width += space + word_width;
            } else {
                lines.push(std::mem::take(&mut current));
                current.push_str(word);
                current_width = word_width;
            }
        }

        lines.push(current);
    }

    lines
}

/// Number of explicit lines in `body`, used by the card height heuristic.
pub fn explicit_line_count(body: &str) -> usize {
    if body.is_empty() {
        1
    } else {
        body.split('\n').count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::builtin::BuiltinMetrics;

    const BODY: &str = "Desarrollo de servicios web en Rust y mantenimiento de la \
        plataforma de facturación electrónica para más de doscientos clientes \
        corporativos, incluyendo integraciones con pasarelas de pago.";

    #[test]
    fn lines_respect_the_width() {
        let lines = wrap_text(&BuiltinMetrics, BODY, FontWeight::Regular, 10.0, 60.0);
        assert!(lines.len() > 2);
        for line in &lines {
            assert!(BuiltinMetrics.text_width(line, FontWeight::Regular, 10.0) <= 60.0);
        }
        assert_eq!(lines.join(" "), BODY.split_whitespace().collect::<Vec<_>>().join(" "));
    }

    #[test]
    fn rewrapping_wrapped_lines_is_idempotent() {
        for width in [30.0, 54.0, 112.0] {
            let lines = wrap_text(&BuiltinMetrics, BODY, FontWeight::Regular, 10.0, width);
            for line in &lines {
                let again = wrap_text(&BuiltinMetrics, line, FontWeight::Regular, 10.0, width);
                assert_eq!(again, vec![line.clone()]);
            }
        }
    }

    #[test]
    fn overlong_words_stay_whole() {
        let lines = wrap_text(
            &BuiltinMetrics,
            "a supercalifragilisticexpialidocious b",
            FontWeight::Bold,
            12.0,
            20.0,
        );
        assert_eq!(lines, ["a", "supercalifragilisticexpialidocious", "b"]);
    }

    #[test]
    fn newlines_and_blank_input() {
        assert_eq!(
            wrap_text(&BuiltinMetrics, "  \n ", FontWeight::Regular, 9.0, 50.0),
            [""]
        );
        let lines = wrap_text(&BuiltinMetrics, "uno\n\ndos", FontWeight::Regular, 9.0, 50.0);
        assert_eq!(lines, ["uno", "", "dos"]);
    }

    #[test]
    fn blank_interior_lines_rewrap_to_one_line() {
        let body = "Primer párrafo con varias palabras.\n\nSegundo párrafo.";
        let lines = wrap_text(&BuiltinMetrics, body, FontWeight::Regular, 10.0, 40.0);
        assert!(lines.iter().any(String::is_empty));
        for line in &lines {
            let again = wrap_text(&BuiltinMetrics, line, FontWeight::Regular, 10.0, 40.0);
            assert_eq!(again, vec![line.clone()]);
        }
    }

    #[test]
    fn explicit_line_count_defaults_to_one() {
        assert_eq!(explicit_line_count(""), 1);
        assert_eq!(explicit_line_count("a\nb\nc"), 3);
    }
}

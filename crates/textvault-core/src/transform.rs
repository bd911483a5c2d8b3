//! Case inversion

/// Swap the case of every cased character, leaving everything else as is.
///
/// Uses Unicode case properties, so Cyrillic or Greek letters invert just
/// like Latin ones and uncased scripts pass through. Some mappings expand
/// (`ß` uppercases to `SS`), which is why the involution only holds for
/// text whose letters have one-to-one case pairs.
pub fn swap_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_uppercase() {
            out.extend(c.to_lowercase());
        } else if c.is_lowercase() {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swap_case_latin() {
        assert_eq!(swap_case("Hello, World!"), "hELLO, wORLD!");
    }

    #[test]
    fn test_swap_case_cyrillic() {
        assert_eq!(swap_case("Привет, мир!"), "пРИВЕТ, МИР!");
    }

    #[test]
    fn test_swap_case_empty_is_identity() {
        assert_eq!(swap_case(""), "");
    }

    #[test]
    fn test_uncased_scripts_pass_through() {
        assert_eq!(swap_case("日本語 123 ¡!"), "日本語 123 ¡!");
    }

    #[test]
    fn test_involution() {
        for s in [
            "Hello, World!",
            "¡Hola mundo!",
            "Привет, мир!",
            "Ελληνικά ΚΕΙΜΕΝΟ",
            "MiXeD 42 case\ttabs\nlines",
        ] {
            assert_eq!(swap_case(&swap_case(s)), s);
        }
    }

    #[test]
    fn test_expanding_mapping() {
        assert_eq!(swap_case("ß"), "SS");
    }
}

//! Small helpers shared by the catalog walker and the listing extractor.

/// Arbitrarily nested sequence of values.
#[derive(Debug, Clone, PartialEq)]
pub enum Nested<T> {
    Leaf(T),
    Seq(Vec<Nested<T>>),
}

impl<T> From<Vec<T>> for Nested<T> {
    fn from(items: Vec<T>) -> Self {
        Nested::Seq(items.into_iter().map(Nested::Leaf).collect())
    }
}

/// Flatten nested sequences into their leaves, depth-first, preserving order.
pub fn flatten<T>(container: Vec<Nested<T>>) -> Vec<T> {
    let mut out = Vec::new();
    flatten_into(container, &mut out);
    out
}

fn flatten_into<T>(container: Vec<Nested<T>>, out: &mut Vec<T>) {
    for item in container {
        match item {
            Nested::Leaf(value) => out.push(value),
            Nested::Seq(items) => flatten_into(items, out),
        }
    }
}

/// Parse every ASCII digit in `text` as one integer, ignoring everything else
/// (currency symbols, grouping spaces, labels).
///
/// "parter" (ground floor) counts as `0`. The word is replaced in place and
/// every digit is then concatenated, so "parter / 4" reads as `04`, i.e. `4`.
/// Returns `None` when no digits are present or the number overflows.
pub fn parse_digits(text: &str) -> Option<i64> {
    let text = text.to_lowercase().replace("parter", "0");
    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// `round(price / surface)`, or `None` when either side is missing or the
/// surface is zero.
pub fn price_per_surface(price: Option<i64>, surface: Option<f64>) -> Option<i64> {
    let price = price?;
    let surface = surface?;
    if surface == 0.0 || !surface.is_finite() {
        return None;
    }
    Some((price as f64 / surface).round() as i64)
}

/// Collapse runs of whitespace (NBSP included) into single spaces and trim.
pub fn normalize_whitespace(text: &str) -> String {
    text.replace('\u{a0}', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flatten_yields_leaves_in_order() {
        // [[2], [[3], [1]], [4, [0]]]
        let nested = vec![
            Nested::Seq(vec![Nested::Leaf(2)]),
            Nested::Seq(vec![
                Nested::Seq(vec![Nested::Leaf(3)]),
                Nested::Seq(vec![Nested::Leaf(1)]),
            ]),
            Nested::Seq(vec![Nested::Leaf(4), Nested::Seq(vec![Nested::Leaf(0)])]),
        ];

        assert_eq!(flatten(nested), vec![2, 3, 1, 4, 0]);
    }

    #[test]
    fn flatten_handles_empty_and_flat_input() {
        assert!(flatten::<u8>(vec![]).is_empty());
        assert!(flatten::<u8>(vec![Nested::Seq(vec![]), Nested::Seq(vec![])]).is_empty());
        assert_eq!(
            flatten(vec![Nested::Leaf("a"), Nested::Leaf("b")]),
            vec!["a", "b"]
        );
    }

    #[test]
    fn batches_convert_into_sequences() {
        let pages: Vec<Nested<&str>> = vec![vec!["a", "b"].into(), vec!["c"].into()];
        assert_eq!(flatten(pages), vec!["a", "b", "c"]);
    }

    #[test]
    fn digits_ignore_currency_and_grouping() {
        assert_eq!(parse_digits("1 250 000 zł"), Some(1_250_000));
        assert_eq!(parse_digits("2\u{a0}400 zł"), Some(2_400));
    }

    #[test]
    fn ground_floor_is_zero() {
        assert_eq!(parse_digits("parter"), Some(0));
        assert_eq!(parse_digits("Parter"), Some(0));
        assert_eq!(parse_digits("3 piętro"), Some(3));
    }

    #[test]
    fn ground_floor_joins_other_digits() {
        assert_eq!(parse_digits("parter / 4"), Some(4));
        assert_eq!(parse_digits("1 / parter"), Some(10));
    }

    #[test]
    fn no_digits_is_none() {
        assert_eq!(parse_digits("do negocjacji"), None);
        assert_eq!(parse_digits(""), None);
        assert_eq!(parse_digits("99999999999999999999999"), None);
    }

    #[test]
    fn price_per_surface_rounds() {
        assert_eq!(price_per_surface(Some(300_000), Some(65.0)), Some(4615));
        assert_eq!(price_per_surface(Some(0), Some(42.0)), Some(0));
        assert_eq!(price_per_surface(Some(100), Some(3.0)), Some(33));
        assert_eq!(price_per_surface(Some(200), Some(3.0)), Some(67));
    }

    #[test]
    fn price_per_surface_never_divides_by_zero() {
        assert_eq!(price_per_surface(Some(300_000), Some(0.0)), None);
        assert_eq!(price_per_surface(Some(300_000), None), None);
        assert_eq!(price_per_surface(None, Some(50.0)), None);
    }

    #[test]
    fn whitespace_is_collapsed() {
        assert_eq!(
            normalize_whitespace("  Ładne\u{a0}mieszkanie\n\n w   centrum \r\n"),
            "Ładne mieszkanie w centrum"
        );
    }
}

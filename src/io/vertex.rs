//! `v x y z` vertex line parsing.

use crate::core::types::DVec3;

/// Parse a vertex line.
///
/// Accepts optional leading whitespace, the `v` tag, then three decimal
/// numbers (optional sign, optional fractional part). Anything after the
/// third number is ignored. Every other line yields `None`.
pub fn parse_vertex_line(line: &str) -> Option<DVec3> {
    let mut tokens = line.split_whitespace();
    if tokens.next()? != "v" {
        return None;
    }
    let mut next = || tokens.next().and_then(parse_decimal);
    Some(DVec3::new(next()?, next()?, next()?))
}

/// `[+-]?\d+(\.\d+)?` only; rejects exponents, `inf`, `nan`.
fn parse_decimal(token: &str) -> Option<f64> {
    let digits = token.strip_prefix(['+', '-']).unwrap_or(token);
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits, None),
    };
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(int_part) || frac_part.is_some_and(|f| !all_digits(f)) {
        return None;
    }
    token.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_vertex() {
        assert_eq!(parse_vertex_line("v 1.5 -2 +3.25"), Some(DVec3::new(1.5, -2.0, 3.25)));
        assert_eq!(parse_vertex_line("   v\t0 0 0 1.0"), Some(DVec3::ZERO));
    }

    #[test]
    fn test_rejects_other_lines() {
        for line in [
            "",
            "# comment",
            "vn 0 0 1",
            "vt 0.5 0.5",
            "f 1 2 3",
            "v 1 2",
            "v 1 2 x",
            "v 1e3 0 0",
            "v inf 0 0",
            "v .5 0 0",
            "v 5. 0 0",
        ] {
            assert_eq!(parse_vertex_line(line), None, "accepted {:?}", line);
        }
    }
}

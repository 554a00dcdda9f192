/// Thousands-grouped rendering of a raw field value, `NaN` for values
/// that never joined or failed to parse.
pub fn group_thousands(v: f64) -> String {
    if v.is_nan() {
        return "NaN".to_string();
    }

    let s = format!("{v}");
    let (sign, rest) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s.as_str()),
    };
    let (int_part, frac) = match rest.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (rest, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    match frac {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}

#[cfg(test)]
mod tests {
    use super::group_thousands;

    #[test]
    fn groups_integer_digits() {
        assert_eq!(group_thousands(30.0), "30");
        assert_eq!(group_thousands(1234.0), "1,234");
        assert_eq!(group_thousands(1373339.0), "1,373,339");
    }

    #[test]
    fn keeps_sign_and_fraction() {
        assert_eq!(group_thousands(-1234567.5), "-1,234,567.5");
        assert_eq!(group_thousands(0.25), "0.25");
    }

    #[test]
    fn nan_renders_as_nan() {
        assert_eq!(group_thousands(f64::NAN), "NaN");
    }
}

//! Value label formatting.
//!
//! Templates use the brace syntax common to chart settings: `"{x}"`,
//! `"{x:.1f}"`, `"{:,.0f}"`, `"{x:.1%}"`, `"{x:d}"`. Text outside the braces
//! is kept verbatim.

/// Format used when a chart does not set one.
pub const DEFAULT_VALUE_FORMAT: &str = "{x}";

/// Renders `value` through a brace template.
///
/// Unrecognized specs fall back to the plain value.
#[must_use]
pub fn format_value(template: &str, value: f64) -> String {
    let Some(open) = template.find('{') else {
        return template.to_owned();
    };
    let Some(close_offset) = template[open..].find('}') else {
        return template.to_owned();
    };
    let close = open + close_offset;
    let field = &template[open + 1..close];
    let spec = field.split_once(':').map_or("", |(_, spec)| spec);

    let mut rendered = String::with_capacity(template.len() + 8);
    rendered.push_str(&template[..open]);
    rendered.push_str(&format_with_spec(spec, value));
    rendered.push_str(&template[close + 1..]);
    rendered
}

fn format_with_spec(spec: &str, value: f64) -> String {
    if spec.is_empty() {
        return plain(value);
    }
    let (grouped, rest) = match spec.strip_prefix(',') {
        Some(rest) => (true, rest),
        None => (false, spec),
    };
    let (precision, kind) = match rest.strip_prefix('.') {
        Some(rest) => {
            let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
            (digits.parse::<usize>().ok(), &rest[digits.len()..])
        }
        None => (None, rest),
    };

    let text = match kind {
        "f" | "" => format!("{value:.*}", precision.unwrap_or(6)),
        "%" => format!("{:.*}%", precision.unwrap_or(6), value * 100.0),
        "d" => format!("{}", value.round() as i64),
        "e" => format!("{value:.*e}", precision.unwrap_or(6)),
        _ => plain(value),
    };
    if grouped { group_thousands(&text) } else { text }
}

/// Shortest readable form; whole numbers keep one decimal.
fn plain(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

fn group_thousands(text: &str) -> String {
    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text),
    };
    let split = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    let (integer, tail) = unsigned.split_at(split);

    let mut grouped = String::with_capacity(text.len() + integer.len() / 3);
    for (index, digit) in integer.chars().enumerate() {
        if index > 0 && (integer.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    format!("{sign}{grouped}{tail}")
}

/// Human-readable axis number without scientific notation.
#[must_use]
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_owned();
    }
    let magnitude = value.abs();
    if magnitude >= 1000.0 {
        group_thousands(&format!("{value:.0}"))
    } else if magnitude >= 10.0 {
        format!("{value:.1}")
    } else if magnitude >= 0.1 {
        format!("{value:.2}")
    } else {
        format!("{value:.3}")
    }
}

//! Number, document and label formatting for the report pages.

use crate::render::fonts::{self, Font};

/// Table value: `-` for zero, `1.2M`, `12K`, or a plain integer.
pub fn compact(value: f64) -> String {
    if value == 0.0 {
        "-".to_string()
    } else if value.abs() >= 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if value.abs() >= 1_000.0 {
        format!("{:.0}K", value / 1_000.0)
    } else {
        format!("{:.0}", value)
    }
}

/// `R$ 12.3M`
pub fn brl_millions(value: f64) -> String {
    format!("R$ {:.1}M", value / 1_000_000.0)
}

/// Currency with the scale that fits the magnitude: `R$ 1.2M`, `R$ 350K`,
/// `R$ 900`.
pub fn brl_short(value: f64) -> String {
    if value.abs() >= 1_000_000.0 {
        format!("R$ {:.1}M", value / 1_000_000.0)
    } else if value.abs() >= 1_000.0 {
        format!("R$ {:.0}K", value / 1_000.0)
    } else {
        format!("R$ {:.0}", value)
    }
}

/// Integer with `.` as thousands separator (`12.345`).
pub fn thousands(value: f64) -> String {
    let rounded = value.round();
    let negative = rounded < 0.0;
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    if negative {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// `-` for zero, else one decimal with `%`.
pub fn percent(value: f64) -> String {
    if value == 0.0 {
        "-".to_string()
    } else {
        format!("{:.1}%", value)
    }
}

/// `+12.5%` / `-3.0%`
pub fn signed_percent(value: f64) -> String {
    if value >= 0.0 {
        format!("+{:.1}%", value)
    } else {
        format!("{:.1}%", value)
    }
}

/// Growth from `initial` to `last` in percent; zero when there is no base.
pub fn growth(initial: f64, last: f64) -> f64 {
    if initial > 0.0 {
        (last - initial) / initial * 100.0
    } else {
        0.0
    }
}

fn digits_only(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Applies a `#`-pattern when the digit count matches, else returns the
/// input unchanged.
fn mask(raw: &str, pattern: &str) -> String {
    let digits = digits_only(raw);
    let slots = pattern.chars().filter(|&c| c == '#').count();
    if digits.len() != slots {
        return raw.trim().to_string();
    }

    let mut source = digits.chars();
    pattern
        .chars()
        .map(|c| match c {
            '#' => source.next().unwrap_or('#'),
            other => other,
        })
        .collect()
}

pub fn cpf(raw: &str) -> String {
    mask(raw, "###.###.###-##")
}

pub fn cnpj(raw: &str) -> String {
    mask(raw, "##.###.###/####-##")
}

pub fn phone(raw: &str) -> String {
    mask(raw, "(##) #####-####")
}

pub fn cep(raw: &str) -> String {
    mask(raw, "#####-###")
}

/// `2021/2022` → `21/22`; other shapes are returned as is.
pub fn short_season(season: &str) -> String {
    match season.split_once('/') {
        Some((a, b)) => {
            let tail = |s: &str| -> String {
                let s = s.trim();
                if s.chars().count() > 2 {
                    s.chars().skip(s.chars().count() - 2).collect()
                } else {
                    s.to_string()
                }
            };
            format!("{}/{}", tail(a), tail(b))
        }
        None => season.to_string(),
    }
}

/// A four-digit year `2021` names the season `21/22`.
pub fn season_from_year(year: &str) -> String {
    match year.trim().parse::<u32>() {
        Ok(y) if (1000..=9999).contains(&y) => {
            format!("{:02}/{:02}", y % 100, (y + 1) % 100)
        }
        _ => short_season(year),
    }
}

/// Keeps `keep` characters and appends `suffix` when `text` is longer than
/// `limit` characters.
pub fn truncate(text: &str, limit: usize, keep: usize, suffix: &str) -> String {
    if text.chars().count() > limit {
        let head: String = text.chars().take(keep).collect();
        format!("{}{}", head, suffix)
    } else {
        text.to_string()
    }
}

/// Greedy word wrap to a maximum line width in points.
pub fn wrap_text(text: &str, font: Font, size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };

        if fonts::string_width(&candidate, font, size) <= max_width || current.is_empty() {
            current = candidate;
        } else {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compact() {
        assert_eq!(compact(0.0), "-");
        assert_eq!(compact(1_260_000.0), "1.3M");
        assert_eq!(compact(-2_500_000.0), "-2.5M");
        assert_eq!(compact(12_400.0), "12K");
        assert_eq!(compact(999.0), "999");
        assert_eq!(compact(-12.0), "-12");
    }

    #[test]
    fn test_currency_and_percent() {
        assert_eq!(brl_millions(12_340_000.0), "R$ 12.3M");
        assert_eq!(brl_short(350_000.0), "R$ 350K");
        assert_eq!(percent(0.0), "-");
        assert_eq!(percent(12.34), "12.3%");
        assert_eq!(signed_percent(5.0), "+5.0%");
        assert_eq!(signed_percent(-3.26), "-3.3%");
        assert_eq!(growth(0.0, 10.0), 0.0);
        assert_eq!(growth(100.0, 150.0), 50.0);
    }

    #[test]
    fn test_thousands() {
        assert_eq!(thousands(0.0), "0");
        assert_eq!(thousands(999.0), "999");
        assert_eq!(thousands(12_345.4), "12.345");
        assert_eq!(thousands(1_234_567.0), "1.234.567");
        assert_eq!(thousands(-4_500.0), "-4.500");
    }

    #[test]
    fn test_documents() {
        assert_eq!(cpf("12345678901"), "123.456.789-01");
        assert_eq!(cpf("123.456.789-01"), "123.456.789-01");
        assert_eq!(cnpj("12345678000195"), "12.345.678/0001-95");
        assert_eq!(phone("77999726069"), "(77) 99972-6069");
        assert_eq!(cep("47810112"), "47810-112");
        assert_eq!(cpf("123"), "123");
        assert_eq!(phone(""), "");
    }

    #[test]
    fn test_seasons() {
        assert_eq!(short_season("2021/2022"), "21/22");
        assert_eq!(short_season("2021/22"), "21/22");
        assert_eq!(short_season("21/22"), "21/22");
        assert_eq!(short_season("2025"), "2025");
        assert_eq!(season_from_year("2021"), "21/22");
        assert_eq!(season_from_year("2099"), "99/00");
        assert_eq!(season_from_year("2021/2022"), "21/22");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Fazenda Santa Maria", 10, 8, ".."), "Fazenda ..");
        assert_eq!(truncate("Sítio", 10, 8, ".."), "Sítio");
        let long = "A".repeat(51);
        assert_eq!(truncate(&long, 50, 47, "...").chars().count(), 50);
    }

    #[test]
    fn test_wrap_text() {
        let lines = wrap_text("one two three four five six", Font::Regular, 10.0, 40.0);
        assert!(lines.len() > 1);
        assert!(lines
            .iter()
            .all(|l| fonts::string_width(l, Font::Regular, 10.0) <= 40.0 || !l.contains(' ')));
        assert_eq!(lines.join(" "), "one two three four five six");
        assert!(wrap_text("", Font::Regular, 10.0, 40.0).is_empty());
    }
}

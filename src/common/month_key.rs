// src/common/month_key.rs

use std::cmp::Ordering;
use std::sync::LazyLock;

use regex::Regex;

pub const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June",
    "July", "August", "September", "October", "November", "December",
];

// 1. Nome completo do mês seguido do ano ("February 2011", "APRIL 2024")
static MONTH_NAME_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(january|february|march|april|may|june|july|august|september|october|november|december)\s+(\d{4})\b",
    )
    .expect("regex de mês/ano inválida")
});

// 2. Data numérica DD/MM/YYYY ou DD-MM-YYYY
static NUMERIC_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{1,2})[/-](\d{1,2})[/-](\d{4})\b").expect("regex de data numérica inválida")
});

/// Normaliza uma data livre no rótulo canônico "<Mês> <Ano>".
///
/// Retorna `None` quando nenhum formato conhecido casa; quem chama deve
/// rejeitar o registro em vez de chutar um mês.
pub fn extract_month_key(raw: Option<&str>) -> Option<String> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }

    if let Some(caps) = MONTH_NAME_YEAR.captures(raw) {
        let month = canonical_month_name(&caps[1])?;
        return Some(format!("{} {}", month, &caps[2]));
    }

    if let Some(caps) = NUMERIC_DATE.captures(raw) {
        let month_number: usize = caps[2].parse().ok()?;
        let month = month_name(month_number)?;
        return Some(format!("{} {}", month, &caps[3]));
    }

    None
}

/// 1..=12 -> "January".."December"
pub fn month_name(number: usize) -> Option<&'static str> {
    number.checked_sub(1).and_then(|idx| MONTH_NAMES.get(idx)).copied()
}

fn canonical_month_name(name: &str) -> Option<&'static str> {
    MONTH_NAMES
        .iter()
        .find(|m| m.eq_ignore_ascii_case(name))
        .copied()
}

/// Quebra um rótulo canônico em (ano, mês 1..=12).
pub fn parse_month_key(key: &str) -> Option<(i32, u32)> {
    let (name, year) = key.trim().split_once(' ')?;
    let idx = MONTH_NAMES.iter().position(|m| m.eq_ignore_ascii_case(name))?;
    let year: i32 = year.trim().parse().ok()?;
    Some((year, idx as u32 + 1))
}

/// Ordem cronológica entre rótulos. Rótulos que não são meses válidos vão
/// para o fim, em ordem alfabética entre si.
pub fn compare_month_keys(a: &str, b: &str) -> Ordering {
    match (parse_month_key(a), parse_month_key(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

pub fn sort_month_keys(keys: &mut [String]) {
    keys.sort_by(|a, b| compare_month_keys(a, b));
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    // =========================================================================
    // extract_month_key
    // =========================================================================

    #[test]
    fn month_name_and_year_is_kept() {
        assert_eq!(extract_month_key(Some("February 2011")), Some("February 2011".to_string()));
    }

    #[test]
    fn month_name_is_found_inside_longer_text() {
        assert_eq!(
            extract_month_key(Some("Payslip for the month of April 2024")),
            Some("April 2024".to_string())
        );
    }

    #[test]
    fn month_name_case_is_normalized() {
        assert_eq!(extract_month_key(Some("APRIL 2024")), Some("April 2024".to_string()));
    }

    #[test]
    fn slash_date_maps_to_month() {
        assert_eq!(extract_month_key(Some("15/03/2024")), Some("March 2024".to_string()));
    }

    #[test]
    fn dash_date_maps_to_month() {
        assert_eq!(extract_month_key(Some("01-12-2023")), Some("December 2023".to_string()));
    }

    #[test]
    fn month_out_of_range_is_not_found() {
        assert_eq!(extract_month_key(Some("15/13/2024")), None);
        assert_eq!(extract_month_key(Some("15/00/2024")), None);
    }

    #[test]
    fn unrecognized_text_is_not_found() {
        assert_eq!(extract_month_key(Some("not a date")), None);
        assert_eq!(extract_month_key(Some("2024-03-15")), None);
        assert_eq!(extract_month_key(Some("Apr 2024")), None);
    }

    #[test]
    fn empty_and_absent_are_not_found() {
        assert_eq!(extract_month_key(Some("")), None);
        assert_eq!(extract_month_key(None), None);
    }

    // =========================================================================
    // ordering
    // =========================================================================

    #[test]
    fn parse_month_key_splits_label() {
        assert_eq!(parse_month_key("March 2024"), Some((2024, 3)));
        assert_eq!(parse_month_key("Smarch 2024"), None);
    }

    #[test]
    fn sort_is_chronological_not_alphabetical() {
        // Em ordem alfabética "April 2024" viria antes de "January 2024".
        let mut keys = vec![
            "April 2024".to_string(),
            "January 2024".to_string(),
            "December 2023".to_string(),
            "February 2024".to_string(),
        ];

        sort_month_keys(&mut keys);

        assert_eq!(
            keys,
            vec!["December 2023", "January 2024", "February 2024", "April 2024"]
        );
    }

    #[test]
    fn unparsable_keys_sort_last() {
        let mut keys = vec![
            "zzz".to_string(),
            "March 2024".to_string(),
            "aaa".to_string(),
        ];

        sort_month_keys(&mut keys);

        assert_eq!(keys, vec!["March 2024", "aaa", "zzz"]);
    }
}

//! Relevance ordering for Lands Department search results.
//!
//! The location search ranks by its own notion of relevance, which often puts
//! a nearby landmark ahead of the premises actually asked for. Records are
//! re-ranked by how much of the (normalised) query appears, in order, in
//! each record's address or name.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::{Address, Language};

/// Floor, flat, room and shop qualifiers. The location search only knows
/// buildings, so these only add noise to the comparison.
///
/// Chinese qualifiers must end the query or a comma-separated part of it,
/// and English ones need a unit number, so words such as 地下鐵路 or
/// Shopping survive.
static UNIT_QUALIFIERS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\s*[0-9A-Za-z\-]+\s*[樓層]\s*(?:[0-9A-Za-z\-]+\s*[室號]?)?\s*(?:[,，]|$)",
        r"\s*[0-9A-Za-z\-]+\s*號?\s*[舖鋪]\s*(?:[,，]|$)",
        r"\s*地[下庫]\s*(?:[,，]|$)",
        r"(?i)\b(flat|rm|room|unit|shop|suite)\s*[0-9][0-9a-z\-]*\b,?",
        r"(?i)\b(g/f|ground floor|[0-9]+\s*/\s*f|[0-9]+(st|nd|rd|th)?\s+floor)\b,?",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("static pattern"))
    .collect()
});

/// Strip unit qualifiers, fold case, drop whitespace and punctuation.
pub fn normalize_query(query: &str) -> String {
    let mut text = query.to_string();
    for re in UNIT_QUALIFIERS.iter() {
        text = re.replace_all(&text, "").into_owned();
    }
    normalize(&text)
}

fn normalize(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Length of the longest common subsequence of `a` and `b`, by character.
fn lcs_len(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for ca in a {
        for (j, cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                curr[j].max(prev[j + 1])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Share of the normalised query found in order within `candidate`, 0.0-1.0.
fn match_ratio(query: &[char], candidate: &str) -> f64 {
    if query.is_empty() {
        return 0.0;
    }
    let candidate: Vec<char> = normalize(candidate).chars().collect();
    lcs_len(query, &candidate) as f64 / query.len() as f64
}

/// Relevance of one address to an already-normalised query.
pub fn relevance(normalized_query: &str, address: &Address) -> f64 {
    let query: Vec<char> = normalized_query.chars().collect();

    let mut texts = vec![
        address.full_address(Language::English),
        address.full_address(Language::Chinese),
    ];
    texts.extend(
        [Language::English, Language::Chinese]
            .into_iter()
            .filter_map(|lang| address.name(lang).map(String::from)),
    );

    texts
        .iter()
        .map(|t| match_ratio(&query, t))
        .fold(0.0, f64::max)
}

/// Reorder `records` by descending relevance to `query`.
///
/// The sort is stable, so the provider's own order breaks ties.
pub fn sort_land_results(query: &str, records: Vec<Address>) -> Vec<Address> {
    let normalized = normalize_query(query);

    let mut scored: Vec<(f64, Address)> = records
        .into_iter()
        .map(|a| (relevance(&normalized, &a), a))
        .collect();
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));

    scored.into_iter().map(|(_, a)| a).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::land_record;

    fn names(addrs: &[Address]) -> Vec<&str> {
        addrs
            .iter()
            .map(|a| a.name(Language::English).unwrap_or(""))
            .collect()
    }

    #[test]
    fn test_normalize_query_strips_floor() {
        assert_eq!(normalize_query("太古城道18號 12樓A室"), "太古城道18號");
        assert_eq!(normalize_query("Flat 3, 18 Taikoo Shing Road"), "18taikooshingroad");
        assert_eq!(normalize_query("G/F, 5 Edinburgh Place"), "5edinburghplace");
    }

    #[test]
    fn test_normalize_query_keeps_address_words() {
        assert_eq!(normalize_query("Cityplaza Shopping Centre"), "cityplazashoppingcentre");
        assert_eq!(normalize_query("港鐵地下鐵路大樓"), "港鐵地下鐵路大樓");
        assert_eq!(normalize_query("九龍灣地下鐵路車廠"), "九龍灣地下鐵路車廠");
    }

    #[test]
    fn test_normalize_query_strips_ground_floor_shop() {
        assert_eq!(normalize_query("太古城道18號地下5號舖"), "太古城道18號");
        assert_eq!(normalize_query("太古城道18號地庫"), "太古城道18號");
        assert_eq!(normalize_query("12樓A室, 太古城道18號"), "太古城道18號");
        assert_eq!(normalize_query("Shop 12, Cityplaza"), "cityplaza");
    }

    #[test]
    fn test_exact_name_beats_partial_when_query_has_floor_words() {
        let records = vec![
            land_record("Kowloon Bay Sports Centre", "九龍灣體育館", "", ""),
            land_record("Kowloon Bay Depot", "九龍灣地下鐵路車廠", "", ""),
        ];
        let sorted = sort_land_results("九龍灣地下鐵路車廠", records);
        assert_eq!(names(&sorted), vec!["Kowloon Bay Depot", "Kowloon Bay Sports Centre"]);

        let records = vec![
            land_record("Cityplaza Centre", "", "", ""),
            land_record("Cityplaza Shopping Centre", "", "", ""),
        ];
        let sorted = sort_land_results("Cityplaza Shopping Centre", records);
        assert_eq!(
            names(&sorted),
            vec!["Cityplaza Shopping Centre", "Cityplaza Centre"]
        );
    }

    #[test]
    fn test_lcs_len() {
        let a: Vec<char> = "abcde".chars().collect();
        let b: Vec<char> = "axcye".chars().collect();
        assert_eq!(lcs_len(&a, &b), 3);
        assert_eq!(lcs_len(&a, &[]), 0);
    }

    #[test]
    fn test_best_match_first() {
        let records = vec![
            land_record("Edinburgh Place Ferry Pier", "愛丁堡廣場碼頭", "", ""),
            land_record("Hong Kong City Hall", "香港大會堂", "", "香港中環愛丁堡廣場5號"),
        ];
        let sorted = sort_land_results("愛丁堡廣場5號", records);
        assert_eq!(names(&sorted), vec!["Hong Kong City Hall", "Edinburgh Place Ferry Pier"]);
    }

    #[test]
    fn test_ties_keep_provider_order() {
        let records = vec![
            land_record("First", "", "", ""),
            land_record("Second", "", "", ""),
            land_record("Third", "", "", ""),
        ];
        let sorted = sort_land_results("完全無關", records);
        assert_eq!(names(&sorted), vec!["First", "Second", "Third"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(sort_land_results("anything", Vec::new()).is_empty());
    }
}

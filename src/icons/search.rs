//! Fuzzy ranking of icons against a free-text query
//!
//! Every icon is scored on its name, aliases, tags and codepoint. A field's
//! score is how well it matches (exact > prefix > substring > subsequence)
//! times the field's weight, and the icon keeps its best field score.

use crate::icons::icon::Icon;

const NAME_WEIGHT: f64 = 4.0;
const ALIAS_WEIGHT: f64 = 3.0;
const TAG_WEIGHT: f64 = 2.0;
const CODEPOINT_WEIGHT: f64 = 1.0;

const EXACT: f64 = 1.0;
const PREFIX: f64 = 0.8;
const SUBSTRING: f64 = 0.6;
const SUBSEQUENCE: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchedField {
    Name,
    Alias,
    Tag,
    Codepoint,
}

#[derive(Debug, Clone)]
pub struct SearchHit<'a> {
    pub icon: &'a Icon,
    pub score: f64,
    pub field: MatchedField,
}

/// Icons matching `query`, best first; ties are ordered by name
pub fn search<'a>(icons: &'a [Icon], query: &str) -> Vec<SearchHit<'a>> {
    let query = normalize(query);
    if query.is_empty() {
        return Vec::new();
    }

    let mut hits: Vec<SearchHit<'a>> = icons
        .iter()
        .filter_map(|icon| score_icon(icon, &query))
        .collect();

    hits.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.icon.name().cmp(b.icon.name()))
    });
    hits
}

fn score_icon<'a>(icon: &'a Icon, query: &str) -> Option<SearchHit<'a>> {
    let fields = std::iter::once((MatchedField::Name, NAME_WEIGHT, icon.name()))
        .chain(
            icon.aliases()
                .iter()
                .map(|alias| (MatchedField::Alias, ALIAS_WEIGHT, alias.as_str())),
        )
        .chain(
            icon.raw_tags()
                .iter()
                .map(|tag| (MatchedField::Tag, TAG_WEIGHT, tag.as_str())),
        )
        .chain(std::iter::once((
            MatchedField::Codepoint,
            CODEPOINT_WEIGHT,
            icon.codepoint(),
        )));

    fields
        .filter_map(|(field, weight, candidate)| {
            let quality = match_quality(&normalize(candidate), query)?;
            Some(SearchHit {
                icon,
                score: weight * quality,
                field,
            })
        })
        .max_by(|a, b| a.score.total_cmp(&b.score))
}

fn match_quality(candidate: &str, query: &str) -> Option<f64> {
    if candidate.is_empty() {
        None
    } else if candidate == query {
        Some(EXACT)
    } else if candidate.starts_with(query) {
        Some(PREFIX)
    } else if candidate.contains(query) {
        Some(SUBSTRING)
    } else if is_subsequence(query, candidate) {
        Some(SUBSEQUENCE)
    } else {
        None
    }
}

fn is_subsequence(needle: &str, haystack: &str) -> bool {
    let mut haystack = haystack.chars();
    needle.chars().all(|c| haystack.any(|h| h == c))
}

/// Lowercase and join words with `-`, the way icon names are written
fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::icons::types::IconMeta;
    use rstest::rstest;

    fn icon(name: &str, aliases: &[&str], tags: &[&str], codepoint: &str) -> Icon {
        Icon::new(
            IconMeta {
                id: None,
                name: name.to_string(),
                codepoint: codepoint.to_string(),
                aliases: aliases.iter().map(|s| s.to_string()).collect(),
                tags: tags.iter().map(|s| s.to_string()).collect(),
                author: String::new(),
                version: String::new(),
            },
            String::new(),
        )
    }

    fn names<'a>(hits: &[SearchHit<'a>]) -> Vec<&'a str> {
        hits.iter().map(|hit| hit.icon.name()).collect()
    }

    #[test]
    fn name_match_outranks_alias_match() {
        let icons = vec![
            icon("human", &["account"], &[], "F0002"),
            icon("account", &[], &[], "F0001"),
        ];

        let hits = search(&icons, "account");

        assert_eq!(names(&hits), vec!["account", "human"]);
        assert_eq!(hits[0].field, MatchedField::Name);
        assert_eq!(hits[1].field, MatchedField::Alias);
    }

    #[test]
    fn alias_match_outranks_tag_match_outranks_codepoint() {
        let icons = vec![
            icon("c-icon", &[], &[], "F0BELL"),
            icon("b-icon", &[], &["bell"], "F0003"),
            icon("a-icon", &["bell"], &[], "F0004"),
        ];

        let hits = search(&icons, "bell");

        assert_eq!(names(&hits), vec!["a-icon", "b-icon", "c-icon"]);
    }

    #[test]
    fn words_are_joined_like_icon_names() {
        let icons = vec![icon("arrow-left", &[], &[], "F004D"), icon("arrow", &[], &[], "F0001")];

        let hits = search(&icons, "Arrow Left");

        assert_eq!(names(&hits), vec!["arrow-left"]);
    }

    #[test]
    fn ties_are_ordered_by_name() {
        let icons = vec![
            icon("bell-ring", &[], &[], "F0001"),
            icon("bell-off", &[], &[], "F0002"),
        ];

        let hits = search(&icons, "bell");

        assert_eq!(names(&hits), vec!["bell-off", "bell-ring"]);
    }

    #[test]
    fn empty_query_matches_nothing() {
        let icons = vec![icon("account", &[], &[], "F0001")];
        assert!(search(&icons, "   ").is_empty());
    }

    #[rstest]
    #[case("account", "account", Some(EXACT))]
    #[case("account-box", "account", Some(PREFIX))]
    #[case("box-account", "account", Some(SUBSTRING))]
    #[case("alpha-circle-outline", "aco", Some(SUBSEQUENCE))]
    #[case("bell", "account", None)]
    #[case("", "a", None)]
    fn test_match_quality(
        #[case] candidate: &str,
        #[case] query: &str,
        #[case] expected: Option<f64>,
    ) {
        assert_eq!(match_quality(candidate, query), expected);
    }
}

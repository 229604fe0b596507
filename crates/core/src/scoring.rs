use crate::normalize::normalize;

/// Relevance of `title` to `query` in `[0, 1]`.
///
/// First rule that applies wins: exact match 1.0, title contains query 0.9,
/// query contains title 0.8, otherwise the share of query words that
/// overlap some title word (either direction of substring). A query that
/// normalizes to nothing is contained in every title, so it lands on 0.9
/// (or 1.0 against an empty title).
pub fn score(title: &str, query: &str) -> f64 {
    let title = normalize(title);
    let query = normalize(query);

    if title == query {
        return 1.0;
    }
    if title.contains(&query) {
        return 0.9;
    }
    if query.contains(&title) {
        return 0.8;
    }

    let title_words: Vec<&str> = title.split(' ').filter(|w| !w.is_empty()).collect();
    let query_words: Vec<&str> = query.split(' ').filter(|w| !w.is_empty()).collect();
    // no words to divide by
    if query_words.is_empty() {
        return 0.0;
    }

    let matched = query_words
        .iter()
        .filter(|q| title_words.iter().any(|t| t.contains(**q) || q.contains(*t)))
        .count();
    matched as f64 / query_words.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_scores_one() {
        assert_eq!(score("One Piece", "one piece"), 1.0);
        assert_eq!(score("Shingeki no Kyojin", "shingeki  no kyojin!"), 1.0);
    }

    #[test]
    fn title_containing_query_scores_point_nine() {
        assert_eq!(score("One Piece Chapter 5", "one piece"), 0.9);
    }

    #[test]
    fn query_containing_title_scores_point_eight() {
        assert_eq!(score("Naruto", "naruto shippuden"), 0.8);
    }

    #[test]
    fn unrelated_short_title_uses_word_overlap() {
        // "op" is not a substring of "one piece" and vice versa, so this lands
        // in the word branch: "one" vs "op" and "piece" vs "op" never overlap.
        assert_eq!(score("op", "one piece"), 0.0);
    }

    #[test]
    fn word_overlap_counts_each_query_word_once() {
        // "dragon" hits "dragons", "ball" hits nothing, "z" hits "z".
        let s = score("Dragons Z", "dragon ball z");
        assert!((s - 2.0 / 3.0).abs() < 1e-9, "got {s}");
    }

    #[test]
    fn accents_do_not_affect_matching() {
        assert_eq!(score("L'Épée Maudite", "l epee maudite"), 1.0);
    }

    #[test]
    fn wordless_query_is_contained_in_every_title() {
        assert_eq!(score("", ""), 1.0);
        assert_eq!(score("X", "!!!"), 0.9);
        assert_eq!(score("Naruto", "!!!!"), 0.9);
        assert_eq!(score("Anything", ""), 0.9);
    }

    #[test]
    fn scores_stay_in_unit_interval() {
        for (t, q) in [("a b c", "a"), ("x", "x y z w"), ("", "query"), ("Solo", "solo leveling")] {
            let s = score(t, q);
            assert!((0.0..=1.0).contains(&s), "{t:?} vs {q:?} gave {s}");
        }
    }
}

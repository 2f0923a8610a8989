//! "Did you mean" suggestions for unknown unit names.

/// Damerau-Levenshtein distance (adjacent transpositions count as one edit).
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (m, n) = (a.len(), b.len());
    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }

    let mut matrix = vec![vec![0; n + 1]; m + 1];
    for (i, row) in matrix.iter_mut().enumerate() {
        row[0] = i;
    }
    for j in 0..=n {
        matrix[0][j] = j;
    }

    for i in 1..=m {
        for j in 1..=n {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            matrix[i][j] = (matrix[i - 1][j] + 1)
                .min(matrix[i][j - 1] + 1)
                .min(matrix[i - 1][j - 1] + cost);
            if i > 1 && j > 1 && a[i - 1] == b[j - 2] && a[i - 2] == b[j - 1] {
                matrix[i][j] = matrix[i][j].min(matrix[i - 2][j - 2] + cost);
            }
        }
    }
    matrix[m][n]
}

/// Largest edit distance worth suggesting for a name of this length.
fn max_distance(name: &str) -> usize {
    match name.chars().count() {
        0..=2 => 1,
        3..=5 => 2,
        _ => 3,
    }
}

/// Up to `limit` candidates close to `name`, nearest first (ties alphabetical).
/// Case-only differences rank ahead of everything else.
pub fn suggest<'a>(
    name: &str,
    candidates: impl IntoIterator<Item = &'a str>,
    limit: usize,
) -> Vec<String> {
    let lower = name.to_lowercase();
    let max = max_distance(name);
    let mut scored: Vec<(usize, &str)> = candidates
        .into_iter()
        .filter(|c| *c != name)
        .filter_map(|c| {
            let d = if c.to_lowercase() == lower {
                0
            } else {
                edit_distance(name, c)
            };
            (d <= max).then_some((d, c))
        })
        .collect();
    scored.sort();
    scored.dedup_by(|a, b| a.1 == b.1);
    scored
        .into_iter()
        .take(limit)
        .map(|(_, c)| c.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_basics() {
        assert_eq!(edit_distance("", "abc"), 3);
        assert_eq!(edit_distance("meter", "meter"), 0);
        assert_eq!(edit_distance("metr", "meter"), 1);
        assert_eq!(edit_distance("kitten", "sitting"), 3);
    }

    #[test]
    fn transposition_is_one_edit() {
        assert_eq!(edit_distance("mtere", "meter"), 2);
        assert_eq!(edit_distance("ohm", "hom"), 1);
    }

    #[test]
    fn suggests_nearest_first() {
        let candidates = ["meter", "meters", "liter", "second"];
        assert_eq!(suggest("metr", candidates, 3), vec!["meter", "meters"]);
        assert_eq!(suggest("metr", candidates, 1), vec!["meter"]);
    }

    #[test]
    fn case_difference_ranks_first() {
        let candidates = ["kw", "kW", "kWh"];
        assert_eq!(suggest("KW", candidates, 2), vec!["kW", "kw"]);
    }

    #[test]
    fn nothing_close() {
        assert!(suggest("zzzzzz", ["meter", "second"], 3).is_empty());
    }
}

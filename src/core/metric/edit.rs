// src/core/metric/edit.rs

use super::Metric;

/// Levenshtein edit distance over strings, counted in Unicode scalar values.
///
/// Strings have no meaningful mean, so this metric pairs with the uncentered
/// tree variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Levenshtein;

impl Levenshtein {
    fn edits(a: &str, b: &str) -> usize {
        let b_chars: Vec<char> = b.chars().collect();
        let mut previous: Vec<usize> = (0..=b_chars.len()).collect();
        let mut current = vec![0usize; b_chars.len() + 1];

        for (i, ca) in a.chars().enumerate() {
            current[0] = i + 1;
            for (j, cb) in b_chars.iter().enumerate() {
                let substitution = previous[j] + usize::from(ca != *cb);
                current[j + 1] = substitution.min(previous[j + 1] + 1).min(current[j] + 1);
            }
            std::mem::swap(&mut previous, &mut current);
        }
        previous[b_chars.len()]
    }
}

impl Metric<String> for Levenshtein {
    #[allow(clippy::cast_precision_loss)]
    fn distance(&self, a: &String, b: &String) -> f64 {
        Self::edits(a, b) as f64
    }

    fn name(&self) -> &'static str {
        "levenshtein"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(a: &str, b: &str) -> f64 {
        Levenshtein.distance(&a.to_string(), &b.to_string())
    }

    #[test]
    fn test_levenshtein_known_values() {
        assert_eq!(d("kitten", "sitting"), 3.0);
        assert_eq!(d("", "abc"), 3.0);
        assert_eq!(d("abc", ""), 3.0);
        assert_eq!(d("flaw", "lawn"), 2.0);
        assert_eq!(d("same", "same"), 0.0);
    }

    #[test]
    fn test_levenshtein_is_symmetric() {
        assert_eq!(d("gumbo", "gambol"), d("gambol", "gumbo"));
    }

    #[test]
    fn test_levenshtein_squared_default() {
        let sq = Levenshtein.distance_sq(&"ab".to_string(), &"ba".to_string());
        assert_eq!(sq, 4.0);
    }
}

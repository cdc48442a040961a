use std::collections::HashMap;
use std::hash::Hash;

/// Most frequent value; ties go to the value seen first.
pub fn majority_vote<T, I>(values: I) -> Option<T>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    let mut counts: HashMap<T, (usize, usize)> = HashMap::new();
    for (order, value) in values.into_iter().enumerate() {
        counts.entry(value).or_insert((0, order)).0 += 1;
    }
    counts
        .into_iter()
        .max_by(|(_, (ca, oa)), (_, (cb, ob))| ca.cmp(cb).then(ob.cmp(oa)))
        .map(|(value, _)| value)
}

/// Occurrences of `target` in `values`.
pub fn count_of<T: PartialEq>(values: &[T], target: &T) -> usize {
    values.iter().filter(|v| *v == target).count()
}

/// Median of integer readings, averaging the middle pair for even counts.
pub fn median(values: &[u8]) -> Option<f32> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] as f32 + sorted[mid] as f32) / 2.0)
    } else {
        Some(sorted[mid] as f32)
    }
}

pub fn mean(values: &[f32]) -> f32 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f32>() / values.len() as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_majority_vote_tie_keeps_first() {
        assert_eq!(majority_vote(vec!["KEN", "RYU", "RYU", "KEN"]), Some("KEN"));
        assert_eq!(majority_vote(vec!["KEN", "RYU", "RYU"]), Some("RYU"));
        assert_eq!(majority_vote(Vec::<&str>::new()), None);
    }

    #[test]
    fn test_median() {
        assert_eq!(median(&[64, 60, 62, 61, 63]), Some(62.0));
        assert_eq!(median(&[99, 98]), Some(98.5));
        assert_eq!(median(&[]), None);
    }
}

//! Slice helpers, default-value helpers and weighted scoring.

/// Maps every element together with its index.
pub fn map_indexed<T, V>(items: &[T], mut f: impl FnMut(&T, usize) -> V) -> Vec<V> {
    items.iter().enumerate().map(|(index, item)| f(item, index)).collect()
}

/// Returns the first element matching `predicate`.
pub fn find_first<T>(items: &[T], mut predicate: impl FnMut(&T) -> bool) -> Option<&T> {
    items.iter().find(|item| predicate(item))
}

/// `None` when `value` equals `T::default()`.
pub fn none_if_default<T>(value: T) -> Option<T>
where
    T: Default + PartialEq,
{
    if value == T::default() { None } else { Some(value) }
}

/// `value` unless it is missing or holds `T::default()`, in which case
/// `fallback`.
pub fn nullish_coalescing<T>(value: Option<T>, fallback: Option<T>) -> Option<T>
where
    T: Default + PartialEq,
{
    value.and_then(none_if_default).or(fallback)
}

#[derive(Debug, Clone, Copy)]
pub struct WeightedProportionCheck {
    pub score: u32,
    pub condition: bool,
}

/// Share of the total score held by the checks whose condition holds, in
/// `[0, 1]`. Zero when the total score is zero.
pub fn weighted_proportion(checks: &[WeightedProportionCheck]) -> f64 {
    let (max_score, current_score) = checks.iter().fold((0u64, 0u64), |(max, current), check| {
        let score = u64::from(check.score);
        (max + score, if check.condition { current + score } else { current })
    });

    if max_score == 0 {
        return 0.0;
    }
    current_score as f64 / max_score as f64
}

#[derive(Debug, Clone, Copy)]
pub struct WeightedSumCheck {
    pub weight: f64,
    pub value: f64,
}

pub fn weighted_sum(checks: &[WeightedSumCheck]) -> f64 {
    checks.iter().map(|check| check.weight * check.value).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_indexed() {
        let out = map_indexed(&["a", "b"], |item, index| format!("{index}:{item}"));
        assert_eq!(out, vec!["0:a", "1:b"]);
    }

    #[test]
    fn test_find_first() {
        let items = [1, 4, 6, 7];
        assert_eq!(find_first(&items, |n| n % 2 == 0), Some(&4));
        assert_eq!(find_first(&items, |n| *n > 10), None);
    }

    #[test]
    fn test_default_helpers() {
        assert_eq!(none_if_default(0), None);
        assert_eq!(none_if_default(3), Some(3));
        assert_eq!(nullish_coalescing(Some(String::new()), Some("x".to_string())), Some("x".to_string()));
        assert_eq!(nullish_coalescing(None, Some(2)), Some(2));
        assert_eq!(nullish_coalescing(Some(5), Some(2)), Some(5));
    }

    #[test]
    fn test_weighted_proportion() {
        let checks = [
            WeightedProportionCheck { score: 3, condition: true },
            WeightedProportionCheck { score: 1, condition: false },
        ];
        assert_eq!(weighted_proportion(&checks), 0.75);
        assert_eq!(weighted_proportion(&[]), 0.0);
    }

    #[test]
    fn test_weighted_sum() {
        let checks = [
            WeightedSumCheck { weight: 0.5, value: 4.0 },
            WeightedSumCheck { weight: 2.0, value: 1.5 },
        ];
        assert_eq!(weighted_sum(&checks), 5.0);
    }
}

/// Arithmetic shared by the aggregation endpoints
///
/// Budgets report how much of the allocation is used, savings goals report
/// progress towards the target. Both are percentages guarded against a zero
/// denominator.

/// Rounds to two decimal places
pub fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `part / whole * 100`, or 0 when `whole` is not positive
pub fn percent_of(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        part / whole * 100.0
    } else {
        0.0
    }
}

/// Progress towards a target, capped at 100
pub fn capped_progress(current: f64, target: f64) -> f64 {
    percent_of(current, target).min(100.0)
}

/// Sum of group totals
pub fn grand_total<I>(totals: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    totals.into_iter().sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to_cents() {
        assert_eq!(round_to_cents(33.333_333), 33.33);
        assert_eq!(round_to_cents(66.666_666), 66.67);
        assert_eq!(round_to_cents(0.0), 0.0);
    }

    #[test]
    fn test_percent_of_zero_whole() {
        assert_eq!(percent_of(50.0, 0.0), 0.0);
        assert_eq!(percent_of(50.0, 200.0), 25.0);
    }

    #[test]
    fn test_capped_progress() {
        assert_eq!(capped_progress(250.0, 1000.0), 25.0);
        assert_eq!(capped_progress(1500.0, 1000.0), 100.0);
        assert_eq!(capped_progress(10.0, 0.0), 0.0);
    }

    #[test]
    fn test_grand_total() {
        assert_eq!(grand_total(vec![10.5, 20.25, 0.25]), 31.0);
        assert_eq!(grand_total(Vec::<f64>::new()), 0.0);
    }
}

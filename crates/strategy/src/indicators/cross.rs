/// `true` where `a` moves from at-or-below `b` to strictly above it.
pub fn crossed_above(a: &[f64], b: &[f64]) -> Vec<bool> {
    crossed(a, b, |prev_a, prev_b, a, b| prev_a <= prev_b && a > b)
}

/// `true` where `a` moves from at-or-above `b` to strictly below it.
pub fn crossed_below(a: &[f64], b: &[f64]) -> Vec<bool> {
    crossed(a, b, |prev_a, prev_b, a, b| prev_a >= prev_b && a < b)
}

fn crossed(a: &[f64], b: &[f64], test: impl Fn(f64, f64, f64, f64) -> bool) -> Vec<bool> {
    let len = a.len().min(b.len());
    let mut out = vec![false; len];
    for i in 1..len {
        out[i] = test(a[i - 1], b[i - 1], a[i], b[i]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_crossings_both_ways() {
        let a = [1.0, 2.0, 3.0, 2.0, 1.0];
        let b = [2.0, 2.0, 2.0, 2.0, 2.0];
        assert_eq!(crossed_above(&a, &b), vec![false, false, true, false, false]);
        assert_eq!(crossed_below(&a, &b), vec![false, false, false, false, true]);
    }

    #[test]
    fn touching_is_not_crossing() {
        let a = [1.0, 2.0, 1.0];
        let b = [2.0, 2.0, 2.0];
        assert!(crossed_above(&a, &b).iter().all(|c| !c));
    }

    #[test]
    fn nan_never_crosses() {
        let a = [f64::NAN, 3.0, f64::NAN, 3.0];
        let b = [2.0, f64::NAN, 2.0, 2.0];
        assert!(crossed_above(&a, &b).iter().all(|c| !c));
        assert!(crossed_below(&a, &b).iter().all(|c| !c));
    }
}

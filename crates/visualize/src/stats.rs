//! Correlation and histogram binning.

/// Pearson correlation of `(x, y)` pairs.
///
/// `None` with fewer than two pairs or when either side has zero variance.
pub fn pearson_correlation(pairs: &[(f64, f64)]) -> Option<f64> {
    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (x, y) in pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some((cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0))
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: u32,
}

/// Equal-width bins spanning `[min, max]`; the last bin includes `max`.
/// A single distinct value gets the span `[v - 0.5, v + 0.5]`.
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    let bins = bins.max(1);
    let (min, max) = match values.iter().copied().fold(None, |acc: Option<(f64, f64)>, v| {
        Some(acc.map_or((v, v), |(lo, hi)| (lo.min(v), hi.max(v))))
    }) {
        Some((min, max)) if min < max => (min, max),
        Some((v, _)) => (v - 0.5, v + 0.5),
        None => return Vec::new(),
    };

    let width = (max - min) / bins as f64;
    let mut result: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            lower: min + width * i as f64,
            upper: if i + 1 == bins { max } else { min + width * (i + 1) as f64 },
            count: 0,
        })
        .collect();

    for v in values {
        let index = (((v - min) / width).floor() as usize).min(bins - 1);
        result[index].count += 1;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_correlation() {
        let pairs: Vec<(f64, f64)> = (0..5).map(|i| (i as f64, 10.0 + 0.5 * i as f64)).collect();
        assert!((pearson_correlation(&pairs).unwrap() - 1.0).abs() < 1e-12);

        let inverse: Vec<(f64, f64)> = (0..5).map(|i| (i as f64, -(i as f64))).collect();
        assert!((pearson_correlation(&inverse).unwrap() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_known_correlation() {
        let pairs = [(1.0, 2.0), (2.0, 4.0), (3.0, 5.0), (4.0, 4.0), (5.0, 5.0)];
        let r = pearson_correlation(&pairs).unwrap();
        assert!((r - 0.7745966692414834).abs() < 1e-9, "{}", r);
    }

    #[test]
    fn test_undefined_correlation() {
        assert_eq!(pearson_correlation(&[]), None);
        assert_eq!(pearson_correlation(&[(1.0, 2.0)]), None);
        assert_eq!(pearson_correlation(&[(3.0, 1.0), (3.0, 2.0), (3.0, 9.0)]), None);
    }

    #[test]
    fn test_histogram_bins() {
        let values = [0.0, 1.0, 2.0, 3.0, 4.0];
        let bins = histogram(&values, 2);
        assert_eq!(bins.len(), 2);
        assert_eq!((bins[0].lower, bins[0].upper, bins[0].count), (0.0, 2.0, 2));
        // max lands in the last bin
        assert_eq!((bins[1].lower, bins[1].upper, bins[1].count), (2.0, 4.0, 3));
    }

    #[test]
    fn test_histogram_single_value_and_empty() {
        let bins = histogram(&[3.0, 3.0], 4);
        assert_eq!(bins.first().unwrap().lower, 2.5);
        assert_eq!(bins.last().unwrap().upper, 3.5);
        assert_eq!(bins.iter().map(|b| b.count).sum::<u32>(), 2);

        assert!(histogram(&[], 20).is_empty());
    }
}

//! Numeric helpers for summaries and correlation charts.

/// Descriptive statistics of one numeric column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub q50: f64,
    pub q75: f64,
    pub max: f64,
}

impl Summary {
    /// Summarizes the given values; everything but `count` is NaN when empty.
    #[must_use]
    pub fn from_values(values: &[f64]) -> Self {
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        Self {
            count: values.len(),
            mean: mean(values),
            std: sample_std(values),
            min: sorted.first().copied().unwrap_or(f64::NAN),
            q25: quantile_sorted(&sorted, 0.25),
            q50: quantile_sorted(&sorted, 0.5),
            q75: quantile_sorted(&sorted, 0.75),
            max: sorted.last().copied().unwrap_or(f64::NAN),
        }
    }
}

#[must_use]
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Standard deviation with one degree of freedom removed.
#[must_use]
pub fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let avg = mean(values);
    let sum_sq: f64 = values.iter().map(|value| (value - avg).powi(2)).sum();
    (sum_sq / (values.len() - 1) as f64).sqrt()
}

/// Linearly interpolated quantile of already sorted values.
#[must_use]
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    match sorted.len() {
        0 => f64::NAN,
        1 => sorted[0],
        len => {
            let position = q * (len - 1) as f64;
            let lower = position.floor() as usize;
            let upper = position.ceil() as usize;
            let weight = position - lower as f64;
            (sorted[upper] - sorted[lower]).mul_add(weight, sorted[lower])
        }
    }
}

/// Pearson correlation coefficient; NaN when undefined.
#[must_use]
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return f64::NAN;
    }
    let (xs, ys) = (&xs[..n], &ys[..n]);
    let mean_x = mean(xs);
    let mean_y = mean(ys);
    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov = dx.mul_add(dy, cov);
        var_x = dx.mul_add(dx, var_x);
        var_y = dy.mul_add(dy, var_y);
    }
    if var_x == 0.0 || var_y == 0.0 {
        return f64::NAN;
    }
    (cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0)
}

/// Square correlation matrix over the given series; the diagonal is 1.
#[must_use]
pub fn correlation_matrix(series: &[&[f64]]) -> Vec<Vec<f64>> {
    series
        .iter()
        .enumerate()
        .map(|(i, left)| {
            series
                .iter()
                .enumerate()
                .map(|(j, right)| if i == j { 1.0 } else { pearson(left, right) })
                .collect()
        })
        .collect()
}

/// First-degree least squares fit `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    /// Returns `None` for fewer than two points or a constant `x`.
    #[must_use]
    pub fn fit(xs: &[f64], ys: &[f64]) -> Option<Self> {
        let n = xs.len().min(ys.len());
        if n < 2 {
            return None;
        }
        let (xs, ys) = (&xs[..n], &ys[..n]);
        let mean_x = mean(xs);
        let mean_y = mean(ys);
        let mut cov = 0.0;
        let mut var_x = 0.0;
        for (x, y) in xs.iter().zip(ys) {
            let dx = x - mean_x;
            cov = dx.mul_add(y - mean_y, cov);
            var_x = dx.mul_add(dx, var_x);
        }
        if var_x == 0.0 {
            return None;
        }
        let slope = cov / var_x;
        Some(Self {
            slope,
            intercept: (-slope).mul_add(mean_x, mean_y),
        })
    }

    #[must_use]
    pub fn predict(&self, x: f64) -> f64 {
        self.slope.mul_add(x, self.intercept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn summary_matches_known_values() {
        let summary = Summary::from_values(&[4.0, 1.0, 3.0, 2.0]);
        assert_eq!(summary.count, 4);
        assert!(close(summary.mean, 2.5));
        assert!(close(summary.std, 1.290_994_448_735_805_6));
        assert!(close(summary.min, 1.0));
        assert!(close(summary.q25, 1.75));
        assert!(close(summary.q50, 2.5));
        assert!(close(summary.q75, 3.25));
        assert!(close(summary.max, 4.0));
    }

    #[test]
    fn summary_of_nothing_is_nan() {
        let summary = Summary::from_values(&[]);
        assert_eq!(summary.count, 0);
        assert!(summary.mean.is_nan());
        assert!(summary.max.is_nan());
    }

    #[test]
    fn pearson_detects_perfect_relationships() {
        assert!(close(pearson(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]), 1.0));
        assert!(close(pearson(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]), -1.0));
        assert!(pearson(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]).is_nan());
        assert!(pearson(&[1.0], &[1.0]).is_nan());
    }

    #[test]
    fn matrix_has_unit_diagonal_and_is_symmetric() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [2.0, 1.0, 4.0, 3.0];
        let matrix = correlation_matrix(&[&x, &y]);
        assert!(close(matrix[0][0], 1.0));
        assert!(close(matrix[1][1], 1.0));
        assert!(close(matrix[0][1], matrix[1][0]));
        assert!(close(matrix[0][1], 0.6));
    }

    #[test]
    fn linear_fit_recovers_line() {
        let fit = LinearFit::fit(&[0.0, 1.0, 2.0], &[1.0, 3.0, 5.0]).expect("fit exists");
        assert!(close(fit.slope, 2.0));
        assert!(close(fit.intercept, 1.0));
        assert!(close(fit.predict(3.0), 7.0));
        assert!(LinearFit::fit(&[2.0, 2.0], &[1.0, 3.0]).is_none());
    }
}

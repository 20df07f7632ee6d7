use super::model::{Field, Record};

/// Fields the heatmap correlates, in display order.
pub const HEATMAP_FIELDS: [Field; 4] = Field::ALL;

/// Square matrix of pairwise Pearson coefficients.
///
/// A cell is `None` when the coefficient is undefined: fewer than two
/// records, or a zero-variance field on either side of the pair.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    fields: Vec<Field>,
    cells: Vec<Option<f64>>,
}

impl CorrelationMatrix {
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn size(&self) -> usize {
        self.fields.len()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        let n = self.size();
        if row >= n || col >= n {
            return None;
        }
        self.cells[row * n + col]
    }

    /// Whether every cell is undefined.
    pub fn is_undefined(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }
}

/// Pearson correlation of every pair of `fields` over `records`.
pub fn correlation_matrix(records: &[&Record], fields: &[Field]) -> CorrelationMatrix {
    let n = fields.len();
    let mut cells = vec![None; n * n];

    if records.len() >= 2 {
        let columns: Vec<Vec<f64>> = fields
            .iter()
            .map(|&f| records.iter().map(|r| r.value(f)).collect())
            .collect();

        for i in 0..n {
            for j in i..n {
                let r = pearson(&columns[i], &columns[j]);
                cells[i * n + j] = r;
                cells[j * n + i] = r;
            }
        }
    }

    CorrelationMatrix {
        fields: fields.to_vec(),
        cells,
    }
}

/// Two-pass Pearson coefficient; `None` if either side has no variance.
fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    let n = xs.len();
    if n < 2 || n != ys.len() {
        return None;
    }
    let mean_x = xs.iter().sum::<f64>() / n as f64;
    let mean_y = ys.iter().sum::<f64>() / n as f64;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (&x, &y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    if is_flat(sxx, mean_x, n) || is_flat(syy, mean_y, n) {
        return None;
    }
    let r = sxy / (sxx * syy).sqrt();
    r.is_finite().then(|| r.clamp(-1.0, 1.0))
}

/// Sum of squared deviations indistinguishable from rounding noise in the
/// mean. A constant column like 0.1 leaves a tiny positive residue.
fn is_flat(ss: f64, mean: f64, n: usize) -> bool {
    ss <= f64::EPSILON * n as f64 * mean * mean
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::{cohort, record};
    use crate::data::model::{Diagnosis, Gender};

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_single_record_is_all_undefined() {
        let data = vec![record(50, Gender::Male, 70.0, 2.0, 0.01, Diagnosis::Normal)];
        let refs: Vec<&Record> = data.iter().collect();
        let m = correlation_matrix(&refs, &HEATMAP_FIELDS);
        assert_eq!(m.size(), 4);
        assert!(m.is_undefined());
    }

    #[test]
    fn test_empty_input_is_all_undefined() {
        let m = correlation_matrix(&[], &HEATMAP_FIELDS);
        assert!(m.is_undefined());
        assert_eq!(m.fields(), &HEATMAP_FIELDS);
    }

    #[test]
    fn test_perfect_correlations() {
        let data = vec![
            record(30, Gender::Male, 60.0, 9.0, 0.5, Diagnosis::Normal),
            record(40, Gender::Male, 70.0, 6.0, 0.5, Diagnosis::Normal),
            record(50, Gender::Male, 80.0, 3.0, 0.5, Diagnosis::Normal),
        ];
        let refs: Vec<&Record> = data.iter().collect();
        let m = correlation_matrix(&refs, &HEATMAP_FIELDS);

        assert!(close(m.get(0, 0).unwrap(), 1.0));
        assert!(close(m.get(0, 1).unwrap(), 1.0));
        assert!(close(m.get(0, 2).unwrap(), -1.0));
        assert!(close(m.get(2, 1).unwrap(), -1.0));
        // Troponin is constant: its row and column are undefined.
        for k in 0..4 {
            assert_eq!(m.get(3, k), None);
            assert_eq!(m.get(k, 3), None);
        }
    }

    #[test]
    fn test_constant_inexact_value_is_undefined() {
        // 0.1 has no exact binary form, so its mean carries rounding error.
        let data = vec![
            record(30, Gender::Male, 61.0, 2.5, 0.1, Diagnosis::Normal),
            record(47, Gender::Female, 83.0, 7.1, 0.1, Diagnosis::Abnormal),
            record(62, Gender::Male, 74.0, 3.9, 0.1, Diagnosis::Normal),
        ];
        let refs: Vec<&Record> = data.iter().collect();
        let m = correlation_matrix(&refs, &HEATMAP_FIELDS);

        for k in 0..4 {
            assert_eq!(m.get(3, k), None);
            assert_eq!(m.get(k, 3), None);
        }
        assert!(close(m.get(0, 0).unwrap(), 1.0));
        assert!(m.get(0, 1).is_some());
    }

    #[test]
    fn test_matrix_is_symmetric_and_bounded() {
        let data = cohort();
        let refs: Vec<&Record> = data.iter().collect();
        let m = correlation_matrix(&refs, &HEATMAP_FIELDS);
        for i in 0..m.size() {
            assert!(close(m.get(i, i).unwrap(), 1.0));
            for j in 0..m.size() {
                let v = m.get(i, j).unwrap();
                assert!((-1.0..=1.0).contains(&v));
                assert_eq!(m.get(i, j), m.get(j, i));
            }
        }
    }

    #[test]
    fn test_out_of_bounds_cell() {
        let m = correlation_matrix(&[], &HEATMAP_FIELDS);
        assert_eq!(m.get(4, 0), None);
    }
}

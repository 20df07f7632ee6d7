use std::cmp::Ordering;

use super::correlation::{correlation_matrix, CorrelationMatrix, HEATMAP_FIELDS};
use super::filter::{filtered_indices, FilterParams};
use super::model::{Diagnosis, Field, Marker, Record, RecordStore, TrendMetric};

/// Number of equal-width age bins in the trend view.
pub const TREND_BIN_COUNT: usize = 10;

/// Fixed age-group edges for the heart-rate bar chart, `[lo, hi)` each.
pub const AGE_GROUP_EDGES: [u32; 7] = [20, 30, 40, 50, 60, 70, 80];

// ---------------------------------------------------------------------------
// View types
// ---------------------------------------------------------------------------

/// Headline scalars.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Summary {
    /// `None` when there is no data to average.
    pub mean_troponin: Option<f64>,
    /// Share of abnormal results in percent, `0.0` for an empty subset.
    pub abnormal_pct: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterPoint {
    pub age: u32,
    pub value: f64,
    pub result: Diagnosis,
}

/// Mean of a metric over one non-empty age bin, `(lower, upper]`.
#[derive(Debug, Clone, PartialEq)]
pub struct BinMean {
    pub lower: f64,
    pub upper: f64,
    pub label: String,
    pub mean: f64,
    pub count: usize,
}

/// Mean heart rate over one non-empty age group, `[lower, upper)`.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupMean {
    pub lower: u32,
    pub upper: u32,
    pub label: String,
    pub mean: f64,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn flipped(self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }
}

/// Column and direction for the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSort {
    pub key: Field,
    pub order: SortOrder,
}

impl Default for TableSort {
    fn default() -> Self {
        TableSort {
            key: Field::Age,
            order: SortOrder::Ascending,
        }
    }
}

// ---------------------------------------------------------------------------
// Pipeline operations
// ---------------------------------------------------------------------------

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

pub fn summarize(filtered: &[&Record]) -> Summary {
    if filtered.is_empty() {
        return Summary {
            mean_troponin: None,
            abnormal_pct: 0.0,
        };
    }
    let abnormal = filtered.iter().filter(|r| r.result.is_abnormal()).count();
    Summary {
        mean_troponin: mean(filtered.iter().map(|r| r.troponin)),
        abnormal_pct: 100.0 * abnormal as f64 / filtered.len() as f64,
    }
}

pub fn scatter_view(filtered: &[&Record], marker: Marker) -> Vec<ScatterPoint> {
    let field = marker.field();
    filtered
        .iter()
        .map(|r| ScatterPoint {
            age: r.age,
            value: r.value(field),
            result: r.result,
        })
        .collect()
}

/// Accumulate `(bin, value)` pairs and return `(bin, mean, count)` for
/// every bin that received at least one value, in bin order.
fn bin_means(n_bins: usize, pairs: impl Iterator<Item = (usize, f64)>) -> Vec<(usize, f64, usize)> {
    let mut sums = vec![(0.0, 0usize); n_bins];
    for (bin, v) in pairs {
        sums[bin].0 += v;
        sums[bin].1 += 1;
    }
    sums.into_iter()
        .enumerate()
        .filter(|(_, (_, n))| *n > 0)
        .map(|(bin, (sum, n))| (bin, sum / n as f64, n))
        .collect()
}

/// `bin_count + 1` equal-width edges over `[min, max]`, right-closed bins.
///
/// The first edge sits 0.1% of the span below `min` so the minimum lands in
/// bin 0; a degenerate span is widened by 0.1% on each side.
fn equal_width_edges(min: f64, max: f64, bin_count: usize) -> Vec<f64> {
    let widen = |v: f64| if v == 0.0 { 0.001 } else { 0.001 * v.abs() };
    let (lo, hi) = if min == max {
        (min - widen(min), max + widen(max))
    } else {
        (min, max)
    };

    let step = (hi - lo) / bin_count as f64;
    let mut edges: Vec<f64> = (0..=bin_count).map(|i| lo + step * i as f64).collect();
    edges[bin_count] = hi;
    if min != max {
        edges[0] -= (max - min) * 0.001;
    }
    edges
}

fn format_edge(v: f64) -> String {
    let s = format!("{v:.3}");
    let s = s.trim_end_matches('0');
    if s.ends_with('.') {
        format!("{s}0")
    } else {
        s.to_string()
    }
}

/// Mean of `metric` per equal-width age bin over the filtered subset.
///
/// Bin edges follow the subset's own age span, so they move with the filter.
/// Empty bins are dropped.
pub fn trend_view(filtered: &[&Record], metric: TrendMetric, bin_count: usize) -> Vec<BinMean> {
    let (Some(min), Some(max)) = (
        filtered.iter().map(|r| r.age).min(),
        filtered.iter().map(|r| r.age).max(),
    ) else {
        return Vec::new();
    };
    if bin_count == 0 {
        return Vec::new();
    }

    let edges = equal_width_edges(min as f64, max as f64, bin_count);
    let field = metric.field();
    let pairs = filtered.iter().filter_map(|r| {
        let age = r.age as f64;
        // first edge >= age; the bin is the one ending there
        let j = edges.partition_point(|&e| e < age);
        (1..=bin_count).contains(&j).then(|| (j - 1, r.value(field)))
    });

    bin_means(bin_count, pairs)
        .into_iter()
        .map(|(bin, mean, count)| BinMean {
            lower: edges[bin],
            upper: edges[bin + 1],
            label: format!("({}, {}]", format_edge(edges[bin]), format_edge(edges[bin + 1])),
            mean,
            count,
        })
        .collect()
}

/// Mean heart rate per fixed age group (see [`AGE_GROUP_EDGES`]).
///
/// Ages outside `[20, 80)` belong to no group. Empty groups are dropped.
pub fn age_group_bar_view(filtered: &[&Record]) -> Vec<GroupMean> {
    let n_groups = AGE_GROUP_EDGES.len() - 1;
    let pairs = filtered.iter().filter_map(|r| {
        AGE_GROUP_EDGES
            .windows(2)
            .position(|w| w[0] <= r.age && r.age < w[1])
            .map(|g| (g, r.heart_rate))
    });

    bin_means(n_groups, pairs)
        .into_iter()
        .map(|(g, mean, count)| {
            let (lower, upper) = (AGE_GROUP_EDGES[g], AGE_GROUP_EDGES[g + 1]);
            GroupMean {
                lower,
                upper,
                label: format!("[{lower}, {upper})"),
                mean,
                count,
            }
        })
        .collect()
}

fn compare(a: &Record, b: &Record, sort: TableSort) -> Ordering {
    let ord = a.value(sort.key).total_cmp(&b.value(sort.key));
    match sort.order {
        SortOrder::Ascending => ord,
        SortOrder::Descending => ord.reverse(),
    }
}

/// Order `rows` (indices into `records`) for the table.
///
/// Stable: rows with equal keys keep their input order, in both directions.
pub fn sorted_table(records: &[Record], rows: &[usize], sort: TableSort) -> Vec<usize> {
    let mut rows = rows.to_vec();
    rows.sort_by(|&a, &b| compare(&records[a], &records[b], sort));
    rows
}

// ---------------------------------------------------------------------------
// Full recomputation
// ---------------------------------------------------------------------------

/// Everything the user can change. A fresh [`DashboardViews`] is computed
/// from this on every change.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DashboardParams {
    pub filter: FilterParams,
    pub marker: Marker,
    pub trend_metric: TrendMetric,
    pub table_sort: TableSort,
}

/// All derived views for one parameter set.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardViews {
    /// Indices into the store of the filtered subset, in store order.
    pub visible: Vec<usize>,
    pub summary: Summary,
    pub scatter: Vec<ScatterPoint>,
    pub trend: Vec<BinMean>,
    pub bars: Vec<GroupMean>,
    pub correlation: CorrelationMatrix,
    /// `visible` reordered for the table.
    pub table: Vec<usize>,
}

impl DashboardViews {
    pub fn compute(store: &RecordStore, params: &DashboardParams) -> Self {
        let records = store.records();
        let visible = filtered_indices(records, &params.filter);
        let filtered: Vec<&Record> = visible.iter().map(|&i| &records[i]).collect();

        DashboardViews {
            summary: summarize(&filtered),
            scatter: scatter_view(&filtered, params.marker),
            trend: trend_view(&filtered, params.trend_metric, TREND_BIN_COUNT),
            bars: age_group_bar_view(&filtered),
            correlation: correlation_matrix(&filtered, &HEATMAP_FIELDS),
            table: sorted_table(records, &visible, params.table_sort),
            visible,
        }
    }
}

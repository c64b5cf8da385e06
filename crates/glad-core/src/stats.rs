//! Patch statistics table and the series derived from it.

use std::collections::BTreeMap;
use std::path::Path;

use csv::{ReaderBuilder, Trim, Writer};
use serde::Serialize;

use crate::error::{GladError, Result};

/// One patch of the histogram output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PatchStats {
    pub patch_id: u64,
    pub nb_pixel: u64,
    pub no_data: u64,
    pub no_alerts: u64,
    /// Probable alert pixels.
    pub prob: u64,
    /// Confirmed alert pixels.
    pub conf: u64,
}

/// Column count of a statistics row.
const STATS_COLUMNS: usize = 6;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StatsTable {
    pub rows: Vec<PatchStats>,
}

impl StatsTable {
    /// Load a whitespace-delimited, header-less statistics file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(GladError::MissingStatistics(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Parse the table text. Columns may be separated by any run of spaces
    /// or tabs; blank lines are skipped.
    pub fn parse(text: &str) -> Result<Self> {
        let mut rdr = ReaderBuilder::new()
            .delimiter(b' ')
            .has_headers(false)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(text.as_bytes());

        let mut rows = Vec::new();
        for (idx, record) in rdr.records().enumerate() {
            let record = record?;
            // Records split on spaces only; tabs stay inside a field.
            let fields: Vec<&str> = record.iter().flat_map(str::split_whitespace).collect();
            if fields.is_empty() {
                continue;
            }
            let line = idx + 1;
            if fields.len() != STATS_COLUMNS {
                return Err(GladError::MalformedStatistics {
                    line,
                    reason: format!("expected {STATS_COLUMNS} columns, got {}", fields.len()),
                });
            }
            let mut values = [0u64; STATS_COLUMNS];
            for (value, field) in values.iter_mut().zip(&fields) {
                *value = parse_count(field).ok_or_else(|| GladError::MalformedStatistics {
                    line,
                    reason: format!("not a count: {field:?}"),
                })?;
            }
            let [patch_id, nb_pixel, no_data, no_alerts, prob, conf] = values;
            rows.push(PatchStats {
                patch_id,
                nb_pixel,
                no_data,
                no_alerts,
                prob,
                conf,
            });
        }
        Ok(Self { rows })
    }

    /// Non-zero confirmed pixel counts, one per patch.
    pub fn confirmed_sizes(&self) -> Vec<u64> {
        self.rows.iter().map(|r| r.conf).filter(|&v| v != 0).collect()
    }

    /// Non-zero probable pixel counts, one per patch.
    pub fn probable_sizes(&self) -> Vec<u64> {
        self.rows.iter().map(|r| r.prob).filter(|&v| v != 0).collect()
    }
}

/// Counts may be written as integral floats (`12.0`).
fn parse_count(field: &str) -> Option<u64> {
    if let Ok(v) = field.parse::<u64>() {
        return Some(v);
    }
    let v = field.parse::<f64>().ok()?;
    (v >= 0.0 && v.fract() == 0.0).then_some(v as u64)
}

/// Series ready for charting. A series without any span (empty, or a single
/// distinct value) gets a trailing zero so its range is anchored at zero.
pub fn chart_series(sizes: &[u64]) -> Vec<u64> {
    let mut series = sizes.to_vec();
    let has_span = match (series.iter().min(), series.iter().max()) {
        (Some(min), Some(max)) => min != max,
        _ => false,
    };
    if !has_span {
        series.push(0);
    }
    series
}

/// Equal-width histogram where every value is weighted by itself.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WeightedHistogram {
    /// `counts.len() + 1` bin edges.
    pub edges: Vec<f64>,
    /// Total pixels of the patches falling in each bin.
    pub counts: Vec<f64>,
}

impl WeightedHistogram {
    /// Bin `values` into `bins` bins over `[min, max]`; the last bin is closed.
    /// A degenerate range is widened to `[v - 0.5, v + 0.5]`.
    pub fn new(values: &[u64], bins: usize) -> Self {
        let bins = bins.max(1);
        let (lo, hi) = match (values.iter().min(), values.iter().max()) {
            (Some(&min), Some(&max)) if min != max => (min as f64, max as f64),
            (Some(&v), _) => (v as f64 - 0.5, v as f64 + 0.5),
            _ => (0.0, 1.0),
        };
        Self::with_range(values, bins, lo, hi)
    }

    /// Bin `values` over an explicit `[lo, hi]` range; values outside are ignored.
    pub fn with_range(values: &[u64], bins: usize, lo: f64, hi: f64) -> Self {
        let bins = bins.max(1);
        let width = (hi - lo) / bins as f64;
        let edges = (0..=bins).map(|i| lo + width * i as f64).collect();
        let mut counts = vec![0.0; bins];
        for &v in values {
            let x = v as f64;
            if x < lo || x > hi {
                continue;
            }
            let idx = (((x - lo) / width) as usize).min(bins - 1);
            counts[idx] += x;
        }
        Self { edges, counts }
    }

    pub fn max_count(&self) -> f64 {
        self.counts.iter().copied().fold(0.0, f64::max)
    }
}

/// Patch-count distribution of confirmed and probable alerts by patch size.
///
/// Both maps always share the same keys; a size seen in only one category is
/// zero-filled in the other.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Distribution {
    pub confirmed: BTreeMap<u64, u64>,
    pub probable: BTreeMap<u64, u64>,
}

impl Distribution {
    pub fn from_table(table: &StatsTable) -> Self {
        let mut confirmed = value_counts(&table.confirmed_sizes());
        let mut probable = value_counts(&table.probable_sizes());
        for key in confirmed.keys() {
            probable.entry(*key).or_insert(0);
        }
        for key in probable.keys() {
            confirmed.entry(*key).or_insert(0);
        }
        Self {
            confirmed,
            probable,
        }
    }

    /// Write as CSV: one column per patch size, one row per category.
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        let mut wtr = Writer::from_path(path)?;
        let mut header = vec![String::new()];
        header.extend(self.confirmed.keys().map(u64::to_string));
        wtr.write_record(&header)?;
        for (label, counts) in [
            ("confirmed alerts", &self.confirmed),
            ("Potential alerts", &self.probable),
        ] {
            let mut row = vec![label.to_string()];
            row.extend(counts.values().map(u64::to_string));
            wtr.write_record(&row)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

fn value_counts(values: &[u64]) -> BTreeMap<u64, u64> {
    let mut counts = BTreeMap::new();
    for &v in values {
        *counts.entry(v).or_insert(0) += 1;
    }
    counts
}

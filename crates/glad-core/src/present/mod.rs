//! Turns a completed run into downloadable artifacts, chart data and a map
//! description. Rendering those into a UI is left to the host.

pub mod chart;

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::config::{MapSource, PresentationConfig};
use crate::consts::HISTOGRAM_BINS;
use crate::eo::{local_alert_layer, EarthEngineSession, MapLayer};
use crate::error::Result;
use crate::paths::{ArtifactPaths, DateRange};
use crate::stats::{chart_series, Distribution, StatsTable, WeightedHistogram};

use chart::{render_stacked_histogram, StackedSeries};

/// Files offered for download.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Downloads {
    pub tif: PathBuf,
    pub csv: PathBuf,
    pub png: PathBuf,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HistogramChart {
    pub title: String,
    pub label: String,
    pub color: String,
    /// Patch sizes charted, including the zero anchor when added.
    pub values: Vec<u64>,
    pub histogram: WeightedHistogram,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LegendEntry {
    pub label: String,
    pub color: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MapView {
    /// Layers from bottom to top.
    pub layers: Vec<MapLayer>,
    /// Feature collection the view is centered on.
    pub center_on: String,
    pub legend: Vec<LegendEntry>,
}

/// Everything a front end needs to show the results of one run.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResultsReport {
    pub aoi_name: String,
    pub year: i32,
    pub range: DateRange,
    pub downloads: Downloads,
    pub charts: Vec<HistogramChart>,
    pub distribution: Distribution,
    pub map: MapView,
}

impl ResultsReport {
    /// Serialize as pretty JSON to `path`.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Whether the probable-alert series is shown for `year`.
///
/// The most recently updated year is still provisional and is kept out of the
/// comparison.
pub fn shows_probable(year: i32, config: &PresentationConfig) -> bool {
    year != config.last_updated_year
}

/// Build the report of a completed run and write its derived files
/// (distribution CSV, histogram PNG, report JSON) into the working directory.
pub fn present_results(
    session: &EarthEngineSession,
    config: &PresentationConfig,
    results_root: &Path,
    asset_id: &str,
    year: i32,
    range: &DateRange,
) -> Result<ResultsReport> {
    let paths = ArtifactPaths::for_asset(results_root, asset_id, range)?;
    let table = StatsTable::load(&paths.alert_stats)?;
    info!(patches = table.rows.len(), stats = %paths.alert_stats.display(), "Loaded statistics");

    let distribution = Distribution::from_table(&table);
    distribution.write_csv(&paths.distrib_csv)?;

    let [conf_color, prob_color] = &config.palette;
    let aoi = &paths.aoi_name;
    let conf_values = chart_series(&table.confirmed_sizes());
    let prob_values = chart_series(&table.probable_sizes());
    let x_max = conf_values
        .iter()
        .chain(&prob_values)
        .copied()
        .max()
        .unwrap_or(0);

    let mut charts = vec![histogram_chart(
        format!("Distribution of the confirmed GLAD alerts for {aoi} in {year}"),
        "confirmed alert",
        conf_color,
        conf_values,
    )];
    if shows_probable(year, config) {
        charts.push(histogram_chart(
            format!("Distribution of the potential GLAD alerts for {aoi} in {year}"),
            "potential alert",
            prob_color,
            prob_values,
        ));
    }

    let stacked: Vec<StackedSeries<'_>> = charts
        .iter()
        .map(|c| StackedSeries {
            values: &c.values,
            color: &c.color,
        })
        .collect();
    render_stacked_histogram(&stacked, HISTOGRAM_BINS, x_max, &paths.hist_png)?;

    let map = alert_map(session, config, asset_id, year, range, &paths)?;

    let report = ResultsReport {
        aoi_name: paths.aoi_name.clone(),
        year,
        range: range.clone(),
        downloads: Downloads {
            tif: paths.alert_map.clone(),
            csv: paths.distrib_csv.clone(),
            png: paths.hist_png.clone(),
        },
        charts,
        distribution,
        map,
    };
    report.write_json(&paths.report_json)?;
    info!(report = %paths.report_json.display(), "Results written");
    Ok(report)
}

fn histogram_chart(title: String, label: &str, color: &str, values: Vec<u64>) -> HistogramChart {
    let histogram = WeightedHistogram::new(&values, HISTOGRAM_BINS);
    HistogramChart {
        title,
        label: label.to_string(),
        color: color.to_string(),
        values,
        histogram,
    }
}

/// Map of the alerts with the AOI outline and a potential/confirmed legend.
pub fn alert_map(
    session: &EarthEngineSession,
    config: &PresentationConfig,
    asset_id: &str,
    year: i32,
    range: &DateRange,
    paths: &ArtifactPaths,
) -> Result<MapView> {
    let alerts = match config.map_source {
        MapSource::Live => session.alert_layer(asset_id, year, range, &config.palette)?,
        MapSource::Local => local_alert_layer(paths.alert_map.clone(), &config.palette),
    };
    let outline = session.outline_layer(asset_id)?;

    let [conf_color, prob_color] = &config.palette;
    let legend = vec![
        LegendEntry {
            label: "potential alerts".into(),
            color: prob_color.clone(),
        },
        LegendEntry {
            label: "confirmed alerts".into(),
            color: conf_color.clone(),
        },
    ];

    Ok(MapView {
        layers: vec![alerts, outline],
        center_on: asset_id.to_string(),
        legend,
    })
}

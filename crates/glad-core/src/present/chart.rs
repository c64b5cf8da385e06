use std::path::Path;

use image::{ImageFormat, Rgb, RgbImage};

use crate::consts::{PNG_HEIGHT, PNG_WIDTH};
use crate::error::Result;
use crate::stats::WeightedHistogram;

const MARGIN: u32 = 40;
const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const AXIS: Rgb<u8> = Rgb([40, 40, 40]);
const FALLBACK: Rgb<u8> = Rgb([128, 128, 128]);

/// One stacked layer of the exported chart.
pub struct StackedSeries<'a> {
    pub values: &'a [u64],
    pub color: &'a str,
}

/// Stacked bar histogram over `[0, x_max]` with a log-scaled y axis.
///
/// Each series is binned on the same edges so the bars stack.
pub fn render_stacked_histogram(
    series: &[StackedSeries<'_>],
    bins: usize,
    x_max: u64,
    path: &Path,
) -> Result<()> {
    let hi = x_max.max(1) as f64;
    let hists: Vec<WeightedHistogram> = series
        .iter()
        .map(|s| WeightedHistogram::with_range(s.values, bins, 0.0, hi))
        .collect();
    let bins = hists.first().map_or(bins.max(1), |h| h.counts.len());

    let totals: Vec<f64> = (0..bins)
        .map(|i| hists.iter().map(|h| h.counts[i]).sum())
        .collect();
    let top = log_height(totals.iter().copied().fold(0.0, f64::max)).max(1.0);

    let mut img = RgbImage::from_pixel(PNG_WIDTH, PNG_HEIGHT, BACKGROUND);
    let plot_w = PNG_WIDTH - 2 * MARGIN;
    let plot_h = PNG_HEIGHT - 2 * MARGIN;
    let baseline = PNG_HEIGHT - MARGIN;
    let bar_w = (plot_w / bins as u32).max(1);

    for bin in 0..bins {
        let x0 = MARGIN + bin as u32 * bar_w;
        let mut stacked = 0.0;
        for (hist, s) in hists.iter().zip(series) {
            let below = pixel_height(stacked, top, plot_h);
            stacked += hist.counts[bin];
            let above = pixel_height(stacked, top, plot_h);
            let color = parse_hex_color(s.color).unwrap_or(FALLBACK);
            fill_rect(&mut img, x0, baseline - above, bar_w.saturating_sub(1), above - below, color);
        }
    }

    fill_rect(&mut img, MARGIN, baseline, plot_w, 1, AXIS);
    fill_rect(&mut img, MARGIN, MARGIN, 1, plot_h, AXIS);

    img.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

fn log_height(v: f64) -> f64 {
    (1.0 + v).log10()
}

fn pixel_height(value: f64, top: f64, plot_h: u32) -> u32 {
    ((log_height(value) / top) * plot_h as f64).round().min(plot_h as f64) as u32
}

fn fill_rect(img: &mut RgbImage, x: u32, y: u32, w: u32, h: u32, color: Rgb<u8>) {
    for py in y..(y + h).min(img.height()) {
        for px in x..(x + w).min(img.width()) {
            img.put_pixel(px, py, color);
        }
    }
}

/// `#rrggbb` or `rrggbb` to a pixel.
pub fn parse_hex_color(s: &str) -> Option<Rgb<u8>> {
    let hex = s.strip_prefix('#').unwrap_or(s);
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(Rgb([channel(0)?, channel(2)?, channel(4)?]))
}

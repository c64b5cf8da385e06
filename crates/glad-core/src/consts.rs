/// Highest confidence class written by the histogram step
/// (0 = no data, 1 = no alert, 2 = probable, 3 = confirmed).
pub const MAX_CONFIDENCE_CLASS: u32 = 3;

/// Number of equal-width bins in the patch-size histograms.
pub const HISTOGRAM_BINS: usize = 30;

/// Lower bound of the alert layer visualization range (probable).
pub const ALERT_VIS_MIN: u32 = 2;

/// Upper bound of the alert layer visualization range (confirmed).
pub const ALERT_VIS_MAX: u32 = 3;

/// Outline color of the AOI boundary on the result map.
pub const AOI_OUTLINE_COLOR: &str = "283593";

/// Outline width in pixels of the AOI boundary.
pub const AOI_OUTLINE_WIDTH: u32 = 3;

/// Prefix stripped from asset names to obtain the AOI short name.
pub const AOI_ASSET_PREFIX: &str = "aoi_";

/// Prefix of the exported alert rasters in the remote store.
pub const REMOTE_EXPORT_PREFIX: &str = "alerts";

/// Creation option passed to the recompression pass.
pub const LZW_CREATION_OPTION: &str = "COMPRESS=LZW";

/// Width of the exported histogram image in pixels.
pub const PNG_WIDTH: u32 = 640;

/// Height of the exported histogram image in pixels.
pub const PNG_HEIGHT: u32 = 480;

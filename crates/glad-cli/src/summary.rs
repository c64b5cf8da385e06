use console::Style;
use glad_core::pipeline::ToolOutput;
use glad_core::present::ResultsReport;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            path: Style::new().underlined(),
        }
    }
}

pub fn print_report_summary(report: &ResultsReport) {
    let s = Styles::new();

    println!();
    println!(
        "  {}",
        s.title
            .apply_to(format!("GLAD alerts for {} in {}", report.aoi_name, report.year))
    );
    println!();

    println!("  {}", s.header.apply_to("Downloads"));
    for (label, path) in [
        ("Raster", &report.downloads.tif),
        ("CSV", &report.downloads.csv),
        ("Histogram", &report.downloads.png),
    ] {
        println!(
            "    {:<12}{}",
            s.label.apply_to(label),
            s.path.apply_to(path.display())
        );
    }
    println!();

    println!("  {}", s.header.apply_to("Patches"));
    for chart in &report.charts {
        let patches = chart.values.iter().filter(|&&v| v != 0).count();
        let pixels: u64 = chart.values.iter().sum();
        let largest = chart.values.iter().copied().max().unwrap_or(0);
        println!(
            "    {:<18}{} patches, {} px, largest {} px",
            s.label.apply_to(&chart.label),
            s.value.apply_to(patches),
            s.value.apply_to(pixels),
            s.value.apply_to(largest)
        );
    }
    println!();

    println!("  {}", s.header.apply_to("Map"));
    for layer in &report.map.layers {
        println!("    {:<12}{:?}", s.label.apply_to(&layer.name), layer.source);
    }
    println!();
}

pub fn print_tool_log(log: &[ToolOutput]) {
    let s = Styles::new();
    for entry in log {
        println!(
            "{} {}",
            s.header.apply_to(&entry.tool),
            s.label.apply_to(format!("({})", entry.stage))
        );
        println!("{}", entry.text.trim_end());
    }
}

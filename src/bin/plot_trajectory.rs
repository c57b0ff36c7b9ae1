use clap::{Parser, ValueEnum};
use csv::ReaderBuilder;
use plotters::prelude::*;
use std::fs;
use std::path::PathBuf;
use trajectory::units::{au_to_m, m_to_au};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Render the x-y tracks of a trajectory CSV to PNG"
)]
struct Cli {
    #[arg(long)]
    input: String,
    #[arg(long, default_value = "artifacts/trajectory.png")]
    output: PathBuf,
    #[arg(long, default_value_t = 1000)]
    width: u32,
    #[arg(long, default_value_t = 1000)]
    height: u32,
    #[arg(long, value_enum, default_value_t = Units::Auto)]
    units: Units,
    /// Only plot these bodies (repeatable, case-insensitive)
    #[arg(long = "body")]
    bodies: Vec<String>,
    /// Skip caption, axis labels and legend
    #[arg(long)]
    plain: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Units {
    Auto,
    M,
    Au,
}

#[derive(Debug, Clone)]
struct Track {
    name: String,
    points: Vec<(f64, f64)>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut tracks = read_tracks(&cli.input)?;
    if !cli.bodies.is_empty() {
        tracks.retain(|t| cli.bodies.iter().any(|b| b.eq_ignore_ascii_case(&t.name)));
    }
    if tracks.iter().all(|t| t.points.is_empty()) {
        return Err(anyhow::anyhow!("No samples to plot in the provided CSV"));
    }

    let (x_min, x_max, y_min, y_max) = bounds(&tracks);
    let extent = (x_max - x_min).max(y_max - y_min);
    let use_au = match cli.units {
        Units::Au => true,
        Units::M => false,
        Units::Auto => extent > au_to_m(0.01),
    };
    let (scale, unit_label) = if use_au { (m_to_au(1.0), "AU") } else { (1.0, "m") };

    // square window centred on the tracks, padded by 5%
    let span = if extent > 0.0 { extent } else { 1.0 };
    let half = 0.5 * span * 1.05 * scale;
    let cx = 0.5 * (x_min + x_max) * scale;
    let cy = 0.5 * (y_min + y_max) * scale;

    if let Some(parent) = cli.output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let output_str = cli
        .output
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("Output path contains invalid UTF-8"))?;
    let root = BitMapBackend::new(output_str, (cli.width, cli.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut builder = ChartBuilder::on(&root);
    builder.margin(20);
    if !cli.plain {
        let font_family = select_font_family();
        builder
            .caption(
                "Body tracks (x-y plane)".to_string(),
                FontDesc::new(font_family, 24.0, FontStyle::Bold),
            )
            .x_label_area_size(50)
            .y_label_area_size(80);
    }
    let mut chart = builder.build_cartesian_2d((cx - half)..(cx + half), (cy - half)..(cy + half))?;

    if !cli.plain {
        let label_font = FontDesc::new(select_font_family(), 16.0, FontStyle::Normal);
        chart
            .configure_mesh()
            .x_desc(format!("x ({unit_label})"))
            .y_desc(format!("y ({unit_label})"))
            .label_style(label_font)
            .x_labels(6)
            .y_labels(6)
            .x_label_formatter(&|v| format!("{v:.3}"))
            .y_label_formatter(&|v| format!("{v:.3}"))
            .draw()?;
    }

    for (index, track) in tracks.iter().enumerate() {
        if track.points.is_empty() {
            continue;
        }
        let color = Palette99::pick(index).to_rgba();
        let scaled: Vec<(f64, f64)> = track
            .points
            .iter()
            .map(|&(x, y)| (x * scale, y * scale))
            .collect();
        let series = chart.draw_series(LineSeries::new(
            scaled.iter().copied(),
            ShapeStyle::from(&color).stroke_width(2),
        ))?;
        if !cli.plain {
            series
                .label(track.name.clone())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &color));
        }
        if let Some(&last) = scaled.last() {
            chart.draw_series(std::iter::once(Circle::new(last, 4, color.filled())))?;
        }
    }

    if !cli.plain {
        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .label_font(FontDesc::new(select_font_family(), 14.0, FontStyle::Normal))
            .draw()?;
    }

    root.present()?;
    Ok(())
}

fn select_font_family() -> FontFamily<'static> {
    if cfg!(target_os = "macos") {
        FontFamily::Name("Helvetica")
    } else if cfg!(target_os = "windows") {
        FontFamily::Name("Arial")
    } else {
        FontFamily::Name("DejaVu Sans")
    }
}

/// Group CSV rows into one track per body, in order of first appearance.
fn read_tracks(path: &str) -> anyhow::Result<Vec<Track>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let headers = rdr.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .ok_or_else(|| anyhow::anyhow!("CSV missing '{}' column", name))
    };
    let body_idx = column("body")?;
    let x_idx = column("x_m")?;
    let y_idx = column("y_m")?;

    let mut tracks: Vec<Track> = Vec::new();
    for rec in rdr.records() {
        let r = rec?;
        let name = r.get(body_idx).unwrap_or("");
        let x: f64 = r.get(x_idx).unwrap_or("").parse().unwrap_or(f64::NAN);
        let y: f64 = r.get(y_idx).unwrap_or("").parse().unwrap_or(f64::NAN);
        if !(x.is_finite() && y.is_finite()) {
            continue;
        }
        match tracks.iter_mut().find(|t| t.name == name) {
            Some(track) => track.points.push((x, y)),
            None => tracks.push(Track {
                name: name.to_string(),
                points: vec![(x, y)],
            }),
        }
    }
    Ok(tracks)
}

fn bounds(tracks: &[Track]) -> (f64, f64, f64, f64) {
    let mut x_min = f64::INFINITY;
    let mut x_max = f64::NEG_INFINITY;
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;
    for &(x, y) in tracks.iter().flat_map(|t| t.points.iter()) {
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }
    (x_min, x_max, y_min, y_max)
}

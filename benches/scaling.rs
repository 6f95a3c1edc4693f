use criterion::{criterion_group, BenchmarkId, Criterion};
use plotters::prelude::*;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use vorosweep::{BorderEdgeGeneration, BoundingBox, Tessellation, TessellationConfig};

#[derive(Deserialize)]
struct Estimates {
    mean: Stats,
}

#[derive(Deserialize)]
struct Stats {
    point_estimate: f64,
}

const SIZES: [usize; 5] = [10, 100, 1000, 10_000, 100_000];

fn benchmark_scaling(c: &mut Criterion) {
    let bounds = BoundingBox::new([0.0, 0.0], [100.0, 100.0]);

    let mut group = c.benchmark_group("scaling");
    group.sample_size(10);

    for &size in &SIZES {
        group.bench_with_input(BenchmarkId::new("open", size), &size, |b, &s| {
            let mut tess = Tessellation::new(bounds);
            tess.random_sites(s);
            b.iter(|| {
                tess.calculate().unwrap();
            })
        });

        group.bench_with_input(BenchmarkId::new("border", size), &size, |b, &s| {
            let config = TessellationConfig::default().with_border(BorderEdgeGeneration::MakeBorderEdges);
            let mut tess = Tessellation::with_config(bounds, config);
            tess.random_sites(s);
            b.iter(|| {
                tess.calculate().unwrap();
            })
        });
    }
    group.finish();
}

/// Mean time per site count for one benchmark, in milliseconds.
fn read_means(root: &Path, method: &str) -> Result<Vec<(f64, f64)>, Box<dyn std::error::Error>> {
    let mut points = Vec::new();
    for &size in &SIZES {
        let path = root.join(method).join(size.to_string()).join("base/estimates.json");
        if path.exists() {
            let estimates: Estimates = serde_json::from_reader(BufReader::new(File::open(&path)?))?;
            points.push((size as f64, estimates.mean.point_estimate / 1_000_000.0));
        }
    }
    Ok(points)
}

fn plot_scaling_results() -> Result<(), Box<dyn std::error::Error>> {
    let root = Path::new("target/criterion/scaling");
    let open = read_means(root, "open")?;
    let border = read_means(root, "border")?;
    if open.is_empty() && border.is_empty() {
        return Ok(());
    }

    std::fs::create_dir_all("benches/results")?;
    let out_file = Path::new("benches/results/bench_scaling.png");
    let area = BitMapBackend::new(out_file, (1024, 768)).into_drawing_area();
    area.fill(&WHITE)?;

    let times = open.iter().chain(&border).map(|p| p.1);
    let (min_t, max_t) = times.fold((f64::INFINITY, 0.0f64), |(lo, hi), t| (lo.min(t), hi.max(t)));
    let mut chart = ChartBuilder::on(&area)
        .caption("Sweep scaling", ("sans-serif", 40).into_font())
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(80)
        .build_cartesian_2d(
            (SIZES[0] as f64..SIZES[SIZES.len() - 1] as f64).log_scale(),
            (min_t * 0.8..max_t * 1.25).log_scale(),
        )?;
    chart.configure_mesh().x_desc("Sites").y_desc("Time (ms)").draw()?;

    for (label, points, color) in [("open", open, RED), ("border", border, BLUE)] {
        chart
            .draw_series(LineSeries::new(points, &color))?
            .label(label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &color));
    }
    chart.configure_series_labels().background_style(&WHITE.mix(0.8)).border_style(&BLACK).draw()?;

    println!("Plot saved to {:?}", out_file);
    Ok(())
}

criterion_group!(benches, benchmark_scaling);

fn main() {
    benches();
    if let Err(e) = plot_scaling_results() {
        eprintln!("Error generating plot: {}", e);
    }
}

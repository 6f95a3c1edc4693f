use plotters::prelude::*;
use rand::Rng;
use vorosweep::{BorderEdgeGeneration, BoundingBox, Point, TessellationConfig, tessellate_with};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut rng = rand::thread_rng();
    let sites: Vec<Point> = (0..500)
        .map(|_| Point::new(rng.gen_range(0.0..100.0), rng.gen_range(0.0..100.0)))
        .collect();

    run_example("voronoi_open.svg", &sites, BorderEdgeGeneration::DoNotMakeBorderEdges)?;
    run_example("voronoi_border.svg", &sites, BorderEdgeGeneration::MakeBorderEdges)?;

    // Degenerate layouts: a lattice is full of cocircular quadruples.
    let lattice: Vec<Point> = (0..10)
        .flat_map(|i| (0..10).map(move |j| Point::new(5.0 + 10.0 * i as f64, 5.0 + 10.0 * j as f64)))
        .collect();
    run_example("voronoi_lattice.svg", &lattice, BorderEdgeGeneration::MakeBorderEdges)?;

    Ok(())
}

fn run_example(filename: &str, sites: &[Point], border: BorderEdgeGeneration) -> Result<(), Box<dyn std::error::Error>> {
    let root = SVGBackend::new(filename, (1024, 1024)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .build_cartesian_2d(0.0..100.0, 0.0..100.0)?;

    let bounds = BoundingBox::new([0.0, 0.0], [100.0, 100.0]);
    let config = TessellationConfig::default().with_border(border);
    let diagram = tessellate_with(sites, bounds, &config)?;

    // Draw bounding box
    chart.draw_series(std::iter::once(PathElement::new(
        vec![(0.0, 0.0), (100.0, 0.0), (100.0, 100.0), (0.0, 100.0), (0.0, 0.0)],
        BLACK.stroke_width(2),
    )))?;

    // Draw edges
    chart.draw_series(diagram.internal_edges().iter().map(|e| {
        PathElement::new(vec![(e.start.x, e.start.y), (e.end.x, e.end.y)], BLUE.mix(0.7))
    }))?;
    chart.draw_series(diagram.border_edges().iter().map(|e| {
        PathElement::new(vec![(e.start.x, e.start.y), (e.end.x, e.end.y)], GREEN.stroke_width(3))
    }))?;

    // Draw sites
    chart.draw_series(sites.iter().map(|p| Circle::new((p.x, p.y), 2, RED.filled())))?;

    root.present()?;
    println!("{} edges ({} border), output saved to {}", diagram.edges().len(), diagram.border_edges().len(), filename);
    Ok(())
}

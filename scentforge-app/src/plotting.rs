//! Charts for an analysis run, written as PNG files next to the report.

use anyhow::Result;
use plotters::prelude::*;
use scentforge_core::{aggregate::CostBucket, decay::IntensityPoint, report::FormulationReport};

/// Generates and saves every chart for one report.
pub fn generate_all_plots(output_dir: &str, report: &FormulationReport) -> Result<()> {
    println!("[Plotting] Generating charts for '{}'...", report.formula_name);

    if report.decay_timeline.is_empty() {
        println!("[Plotting] Warning: formula has no weight, skipping longevity chart.");
    } else {
        plot_longevity(output_dir, &report.decay_timeline)?;
    }
    plot_cost_breakdown(output_dir, &report.cost_breakdown)?;

    println!("[Plotting] Charts have been saved to '{}'.", output_dir);
    Ok(())
}

/// Line chart of projected intensity against hours on skin.
fn plot_longevity(output_dir: &str, timeline: &[IntensityPoint]) -> Result<()> {
    let path = format!("{}/longevity.png", output_dir);
    let root = BitMapBackend::new(&path, (1024, 768)).into_drawing_area();
    root.fill(&WHITE)?;

    let max_hour = timeline.last().map_or(1.0, |p| p.hour).max(1.0);
    let max_intensity = timeline.iter().map(|p| p.intensity).fold(0.0, f64::max).max(1.0);

    let mut chart = ChartBuilder::on(&root)
        .caption("Projected Longevity", ("sans-serif", 50).into_font())
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(50)
        .build_cartesian_2d(0f64..max_hour, 0f64..max_intensity * 1.1)?;

    chart
        .configure_mesh()
        .x_desc("Time on skin (hours)")
        .y_desc("Intensity")
        .draw()?;

    chart
        .draw_series(LineSeries::new(
            timeline.iter().map(|p| (p.hour, p.intensity)),
            MAGENTA.stroke_width(3),
        ))?
        .label("Intensity")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], MAGENTA.filled()));

    chart.draw_series(
        timeline
            .iter()
            .map(|p| Circle::new((p.hour, p.intensity), 4, MAGENTA.filled())),
    )?;

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;
    root.present()?;
    Ok(())
}

/// Bar chart of the normalized cost buckets.
fn plot_cost_breakdown(output_dir: &str, buckets: &[CostBucket]) -> Result<()> {
    let path = format!("{}/cost_breakdown.png", output_dir);
    let root = BitMapBackend::new(&path, (1024, 512)).into_drawing_area();
    root.fill(&WHITE)?;

    let max_value = buckets.iter().map(|b| b.value).fold(0.0, f64::max).max(1.0);

    let mut chart = ChartBuilder::on(&root)
        .caption("Cost Breakdown", ("sans-serif", 40).into_font())
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d((0..buckets.len()).into_segmented(), 0f64..max_value * 1.1)?;

    let bucket_label = |value: &SegmentValue<usize>| match value {
        SegmentValue::CenterOf(i) => buckets.get(*i).map(|b| b.name.clone()).unwrap_or_default(),
        _ => String::new(),
    };
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_label_formatter(&bucket_label)
        .y_desc("USD")
        .draw()?;

    chart.draw_series(
        Histogram::vertical(&chart)
            .style(BLUE.filled())
            .margin(40)
            .data(buckets.iter().enumerate().map(|(i, b)| (i, b.value))),
    )?;

    root.present()?;
    Ok(())
}

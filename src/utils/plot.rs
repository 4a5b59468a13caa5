use crate::model::prediction::ClassProbability;
use plotters::prelude::*;
use std::error::Error;
use std::path::Path;

pub fn create_probability_chart(
    probabilities: &[ClassProbability],
    path: &Path,
) -> Result<(), Box<dyn Error>> {
    let root = BitMapBackend::new(path, (800, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let labels: Vec<&str> = probabilities.iter().map(|p| p.label.as_str()).collect();
    let label_of = |v: &SegmentValue<usize>| match v {
        SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => {
            labels.get(*i).map(|l| l.to_string()).unwrap_or_default()
        }
        SegmentValue::Last => String::new(),
    };

    let mut chart = ChartBuilder::on(&root)
        .caption("Segment Confidence", ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d((0usize..probabilities.len()).into_segmented(), 0f64..1f64)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_label_formatter(&label_of)
        .y_label_formatter(&|y| format!("{:.0}%", y * 100.0))
        .x_desc("Segment")
        .y_desc("Probability")
        .draw()?;

    chart.draw_series(
        Histogram::vertical(&chart)
            .style(BLUE.mix(0.7).filled())
            .margin(20)
            .data(probabilities.iter().enumerate().map(|(i, p)| (i, p.probability))),
    )?;

    root.present()?;
    Ok(())
}

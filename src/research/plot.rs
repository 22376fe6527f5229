//! Draws ROC curves and decision regions as SVG files.
use plotters::prelude::*;

use std::fmt::Display;
use std::path::Path;

use crate::{Classifier, Sample};
use crate::error::{Result, VoteError};
use super::metrics::{auc, RocCurve};


const FONT: &str = "sans-serif";
const MESH_STEP: f64 = 0.1;
const MARGIN: f64 = 1.0;


fn plot_err<E: Display>(e: E) -> VoteError {
    VoteError::Plot(e.to_string())
}


/// Draws the ROC curves in `curves` into one chart,
/// with the chance diagonal as reference.
/// Each legend entry shows the label and the area under the curve.
pub fn plot_roc_curves<P>(path: P, curves: &[(&str, &RocCurve)]) -> Result<()>
    where P: AsRef<Path>
{
    let root = SVGBackend::new(path.as_ref(), (640, 480))
        .into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Receiver Operating Characteristic", (FONT, 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(-0.1_f64..1.1_f64, -0.1_f64..1.1_f64)
        .map_err(plot_err)?;

    chart.configure_mesh()
        .x_desc("False positive rate")
        .y_desc("True positive rate")
        .draw()
        .map_err(plot_err)?;

    let gray = BLACK.mix(0.4);
    chart.draw_series(LineSeries::new([(0.0, 0.0), (1.0, 1.0)], gray))
        .map_err(plot_err)?
        .label("random guessing")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], gray));

    for (i, (label, curve)) in curves.iter().enumerate() {
        let area = auc(&curve.fpr, &curve.tpr)?;
        let color = Palette99::pick(i).to_rgba();
        let points = curve.fpr.iter()
            .copied()
            .zip(curve.tpr.iter().copied());
        chart.draw_series(LineSeries::new(points, color.stroke_width(2)))
            .map_err(plot_err)?
            .label(format!("{label} (auc = {area:.2})"))
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
            });
    }

    chart.configure_series_labels()
        .position(SeriesLabelPosition::LowerRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(plot_err)?;

    root.present().map_err(plot_err)?;
    Ok(())
}


/// Draws one panel per fitted classifier in `panels`,
/// two panels per row.
///
/// Each panel colors a grid over the range of the two features
/// (extended by `1.0` on every side, with step `0.1`)
/// by the predicted class, then draws the examples of `sample`
/// colored by `target`.
pub fn plot_decision_regions<P>(
    path: P,
    sample: &Sample,
    target: &[usize],
    panels: &[(&str, &dyn Classifier)],
) -> Result<()>
    where P: AsRef<Path>
{
    let (n_sample, n_feature) = sample.shape();
    if n_feature != 2 {
        return Err(VoteError::ShapeMismatch {
            what: "decision regions need exactly 2 features",
            expected: 2,
            got: n_feature,
        });
    }
    sample.check_target_len(target.len())?;
    if panels.is_empty() || n_sample == 0 {
        return Err(VoteError::Configuration(
            "nothing to draw".to_string()
        ));
    }

    let x_range = padded_range(sample.features()[0].min_max());
    let y_range = padded_range(sample.features()[1].min_max());
    let (xs, ys) = (grid_axis(x_range), grid_axis(y_range));
    let mesh = mesh_grid(&xs, &ys)?;

    let n_cols = panels.len().min(2);
    let n_rows = (panels.len() + 1) / 2;
    let root = SVGBackend::new(path.as_ref(), (480 * n_cols as u32, 400 * n_rows as u32))
        .into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let areas = root.split_evenly((n_rows, n_cols));
    for (area, (label, clf)) in areas.iter().zip(panels) {
        let predicted = clf.predict(&mesh)?;

        let mut chart = ChartBuilder::on(area)
            .caption(*label, (FONT, 16))
            .margin(10)
            .x_label_area_size(30)
            .y_label_area_size(30)
            .build_cartesian_2d(x_range.0..x_range.1, y_range.0..y_range.1)
            .map_err(plot_err)?;
        chart.configure_mesh()
            .disable_mesh()
            .draw()
            .map_err(plot_err)?;

        // mesh rows are laid out with `y` varying fastest.
        let cells = predicted.iter()
            .enumerate()
            .map(|(i, &k)| {
                let (x, y) = (xs[i / ys.len()], ys[i % ys.len()]);
                let color = Palette99::pick(k).mix(0.3);
                Rectangle::new(
                    [(x, y), (x + MESH_STEP, y + MESH_STEP)],
                    color.filled(),
                )
            });
        chart.draw_series(cells).map_err(plot_err)?;

        let points = (0..n_sample)
            .map(|i| {
                let color = Palette99::pick(target[i]).to_rgba();
                Circle::new(
                    (sample.value(i, 0), sample.value(i, 1)),
                    4,
                    color.filled(),
                )
            });
        chart.draw_series(points).map_err(plot_err)?;
    }

    root.present().map_err(plot_err)?;
    Ok(())
}


fn padded_range(min_max: Option<(f64, f64)>) -> (f64, f64) {
    let (lo, hi) = min_max.unwrap_or((0.0, 0.0));
    (lo - MARGIN, hi + MARGIN)
}


/// Returns `lo, lo + step, ...` below `hi`.
fn grid_axis((lo, hi): (f64, f64)) -> Vec<f64> {
    let n = ((hi - lo) / MESH_STEP).ceil().max(1.0) as usize;
    (0..n).map(|i| lo + i as f64 * MESH_STEP).collect()
}


/// Returns the sample of every grid point `(x, y)`,
/// with `y` varying fastest.
pub(crate) fn mesh_grid(xs: &[f64], ys: &[f64]) -> Result<Sample> {
    let rows = xs.iter()
        .flat_map(|&x| ys.iter().map(move |&y| [x, y]))
        .collect::<Vec<_>>();
    Sample::from_rows(&rows)
}

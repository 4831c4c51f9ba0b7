//! SVG chart rendering
//!
//! Renders the per-date grouped bar chart and metric/point trend charts to
//! SVG files. The drawing functions are generic over the backend so they can
//! also target an in-memory buffer.

use chrono::NaiveDate;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;

use crate::chart::bar_rows;
use crate::error::AnalysisError;
use crate::types::{Corridor, Observation};

const LEFT_COLOR: RGBColor = RGBColor(31, 119, 180);
const RIGHT_COLOR: RGBColor = RGBColor(255, 127, 14);
const CORRIDOR_COLOR: RGBColor = RGBColor(170, 170, 170);

fn chart_error<E: std::fmt::Display>(error: E) -> AnalysisError {
    AnalysisError::ChartError(error.to_string())
}

/// Render the grouped left/right bar chart for one observation to an SVG file
pub fn render_bar_chart(
    observation: &Observation,
    corridor: Option<&Corridor>,
    path: &Path,
) -> Result<(), AnalysisError> {
    let root = SVGBackend::new(path, (960, 540)).into_drawing_area();
    draw_bar_chart(root, observation, corridor)
}

/// Render a dated value series as a line chart to an SVG file
pub fn render_series_chart(
    series: &[(NaiveDate, f64)],
    title: &str,
    path: &Path,
) -> Result<(), AnalysisError> {
    let root = SVGBackend::new(path, (960, 540)).into_drawing_area();
    draw_series_chart(root, series, title)
}

pub fn draw_bar_chart<DB>(
    root: DrawingArea<DB, Shift>,
    observation: &Observation,
    corridor: Option<&Corridor>,
) -> Result<(), AnalysisError>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let bars = bar_rows(observation);

    let value_max = bars
        .iter()
        .flat_map(|bar| [bar.left, bar.right])
        .flatten()
        .chain(corridor.map(|c| c.upper))
        .fold(0.0_f64, f64::max);
    let y_max = if value_max > 0.0 { value_max * 1.15 } else { 1.0 };

    root.fill(&WHITE).map_err(chart_error)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("Channel readings, {}", observation.date.format("%d-%m-%Y")),
            ("sans-serif", 22),
        )
        .margin(12)
        .x_label_area_size(44)
        .y_label_area_size(56)
        .build_cartesian_2d(0f64..12f64, 0f64..y_max)
        .map_err(chart_error)?;

    let labels: Vec<&'static str> = bars.iter().map(|bar| bar.channel.as_str()).collect();
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(13)
        .x_label_formatter(&|x| {
            labels
                .get(x.round() as usize)
                .map(|label| label.to_string())
                .unwrap_or_default()
        })
        .x_desc("Channel")
        .y_desc("Reading")
        .draw()
        .map_err(chart_error)?;

    chart
        .draw_series(bars.iter().enumerate().filter_map(|(i, bar)| {
            bar.left.map(|value| {
                Rectangle::new(
                    [(i as f64 + 0.12, 0.0), (i as f64 + 0.46, value)],
                    LEFT_COLOR.filled(),
                )
            })
        }))
        .map_err(chart_error)?
        .label("Left")
        .legend(|(x, y)| Rectangle::new([(x, y - 4), (x + 10, y + 4)], LEFT_COLOR.filled()));

    chart
        .draw_series(bars.iter().enumerate().filter_map(|(i, bar)| {
            bar.right.map(|value| {
                Rectangle::new(
                    [(i as f64 + 0.54, 0.0), (i as f64 + 0.88, value)],
                    RIGHT_COLOR.filled(),
                )
            })
        }))
        .map_err(chart_error)?
        .label("Right")
        .legend(|(x, y)| Rectangle::new([(x, y - 4), (x + 10, y + 4)], RIGHT_COLOR.filled()));

    if let Some(corridor) = corridor {
        for bound in [corridor.lower, corridor.upper] {
            chart
                .draw_series(DashedLineSeries::new(
                    [(0.0, bound), (12.0, bound)],
                    6,
                    4,
                    CORRIDOR_COLOR.stroke_width(1),
                ))
                .map_err(chart_error)?;
        }
    }

    chart
        .configure_series_labels()
        .border_style(CORRIDOR_COLOR)
        .background_style(WHITE.mix(0.85))
        .draw()
        .map_err(chart_error)?;

    root.present().map_err(chart_error)?;
    Ok(())
}

pub fn draw_series_chart<DB>(
    root: DrawingArea<DB, Shift>,
    series: &[(NaiveDate, f64)],
    title: &str,
) -> Result<(), AnalysisError>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    if series.is_empty() {
        return Err(AnalysisError::ChartError(format!(
            "no data points for {title}"
        )));
    }

    let values: Vec<f64> = series.iter().map(|(_, value)| *value).collect();
    let mut y_min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let mut y_max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let padding = if y_max > y_min {
        (y_max - y_min) * 0.1
    } else {
        1.0
    };
    y_min -= padding;
    y_max += padding;

    let x_max = (series.len() - 1).max(1) as f64;
    let labels: Vec<String> = series
        .iter()
        .map(|(date, _)| date.format("%d-%m-%Y").to_string())
        .collect();

    root.fill(&WHITE).map_err(chart_error)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 22))
        .margin(12)
        .x_label_area_size(44)
        .y_label_area_size(56)
        .build_cartesian_2d(0f64..x_max, y_min..y_max)
        .map_err(chart_error)?;

    chart
        .configure_mesh()
        .x_labels(labels.len().min(10))
        .x_label_formatter(&|x| {
            labels
                .get(x.round() as usize)
                .cloned()
                .unwrap_or_default()
        })
        .x_desc("Date")
        .y_desc("Value")
        .draw()
        .map_err(chart_error)?;

    chart
        .draw_series(LineSeries::new(
            values.iter().enumerate().map(|(i, value)| (i as f64, *value)),
            LEFT_COLOR.stroke_width(2),
        ))
        .map_err(chart_error)?;

    chart
        .draw_series(
            values
                .iter()
                .enumerate()
                .map(|(i, value)| Circle::new((i as f64, *value), 3, LEFT_COLOR.filled())),
        )
        .map_err(chart_error)?;

    root.present().map_err(chart_error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::PointCode;
    use std::str::FromStr;

    fn observation() -> Observation {
        let mut obs = Observation::new(NaiveDate::from_ymd_opt(2024, 3, 11).unwrap());
        obs.set(PointCode::from_str("H1L").unwrap(), Some(120.0));
        obs.set(PointCode::from_str("H1R").unwrap(), Some(110.0));
        obs.set(PointCode::from_str("F6R").unwrap(), Some(90.0));
        obs
    }

    #[test]
    fn test_bar_chart_renders_svg() {
        let corridor = Corridor {
            mean_all: 106.0,
            lower: 95.4,
            upper: 116.6,
        };
        let mut buffer = String::new();
        {
            let root = SVGBackend::with_string(&mut buffer, (960, 540)).into_drawing_area();
            draw_bar_chart(root, &observation(), Some(&corridor)).unwrap();
        }
        assert!(buffer.contains("<svg"));
        assert!(buffer.contains("Channel readings, 11-03-2024"));
    }

    #[test]
    fn test_series_chart_renders_svg() {
        let date = |d: u32| NaiveDate::from_ymd_opt(2024, 3, d).unwrap();
        let series = vec![(date(10), 100.0), (date(11), 105.0), (date(12), 95.0)];
        let mut buffer = String::new();
        {
            let root = SVGBackend::with_string(&mut buffer, (960, 540)).into_drawing_area();
            draw_series_chart(root, &series, "MeanAll").unwrap();
        }
        assert!(buffer.contains("<svg"));
    }

    #[test]
    fn test_series_chart_rejects_empty_series() {
        let mut buffer = String::new();
        let root = SVGBackend::with_string(&mut buffer, (960, 540)).into_drawing_area();
        let result = draw_series_chart(root, &[], "MeanAll");
        assert!(matches!(result, Err(AnalysisError::ChartError(_))));
    }
}

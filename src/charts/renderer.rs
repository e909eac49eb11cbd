//! Static Chart Renderer
//! Renders chart data to PNG files with plotters.
//!
//! Every chart is drawn on a white canvas with its title as caption.
//! Categorical axes place one category per integer position and draw the
//! category names under the plot area themselves.

use crate::charts::catalog::ChartKind;
use crate::charts::data::{shares, ChartData, ChartSeries};
use crate::charts::plotter::{ChartPlotter, PALETTE};
use crate::data::aggregate::{directions, group_keys, CategoryCount, DatedTotal, GroupTotal};
use crate::data::model::{date_to_days, days_to_date};
use crate::stats::{BoxSummary, HistogramBin, StatsCalculator};
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

const FONT: &str = "sans-serif";
const BOX_HALF_WIDTH: f64 = 0.3;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Cannot create chart directory {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to draw chart '{chart}': {message}")]
    Draw { chart: String, message: String },
}

type Chart2d<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;
type DrawResult<T, DB> = Result<T, DrawingAreaErrorKind<<DB as DrawingBackend>::ErrorType>>;

/// Renders charts to static PNG images.
pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render every chart into `dir` as `<id>.png`, in parallel.
    pub fn render_all(
        charts: &[ChartData],
        dir: &Path,
        size: (u32, u32),
    ) -> Result<Vec<PathBuf>, RenderError> {
        std::fs::create_dir_all(dir).map_err(|source| RenderError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let paths: Vec<PathBuf> = charts
            .par_iter()
            .map(|chart| {
                let path = Self::file_name_for(dir, chart);
                Self::render_chart(chart, &path, size)?;
                Ok(path)
            })
            .collect::<Result<_, RenderError>>()?;

        log::info!("Rendered {} charts into {}", paths.len(), dir.display());
        Ok(paths)
    }

    pub fn file_name_for(dir: &Path, chart: &ChartData) -> PathBuf {
        dir.join(format!("{}.png", chart.descriptor.id))
    }

    /// Render a single chart to `path`.
    pub fn render_chart(chart: &ChartData, path: &Path, size: (u32, u32)) -> Result<(), RenderError> {
        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE).map_err(|e| draw_error(chart, e))?;

        let d = &chart.descriptor;
        let result = if chart.series.is_empty() {
            Self::draw_empty(&root, d.title, size)
        } else {
            match (&chart.series, d.kind) {
                (ChartSeries::Boxes(boxes), _) => {
                    Self::draw_boxplot(&root, d.title, boxes, d.x_label, d.y_label)
                }
                (ChartSeries::Points(points), _) => {
                    Self::draw_scatter(&root, d.title, points, d.x_label, d.y_label)
                }
                (ChartSeries::Histogram(bins), _) => {
                    Self::draw_histogram(&root, d.title, bins, d.x_label, d.y_label)
                }
                (ChartSeries::Counts(counts), ChartKind::Pie) => {
                    Self::draw_pie(&root, d.title, counts, size)
                }
                (ChartSeries::Counts(counts), _) => {
                    Self::draw_count_bars(&root, d.title, counts, d.x_label, d.y_label)
                }
                (ChartSeries::Grouped(groups), _) => {
                    Self::draw_stacked_bars(&root, d.title, groups, d.x_label, d.y_label)
                }
                (ChartSeries::Timeline(points), _) => {
                    Self::draw_timeline(&root, d.title, points, d.x_label, d.y_label)
                }
            }
        };

        result.map_err(|e| draw_error(chart, e))?;
        root.present().map_err(|e| draw_error(chart, e))?;
        Ok(())
    }

    fn draw_empty<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        title: &str,
        (width, height): (u32, u32),
    ) -> DrawResult<(), DB> {
        let centered = TextStyle::from((FONT, 20).into_font()).pos(Pos::new(HPos::Center, VPos::Center));
        root.draw(&Text::new(title.to_string(), (width as i32 / 2, 30), centered.clone()))?;
        root.draw(&Text::new(
            "No data for the current filters".to_string(),
            (width as i32 / 2, height as i32 / 2),
            centered.color(&RGBColor(128, 128, 128)),
        ))?;
        Ok(())
    }

    /// Cartesian chart with caption, axis descriptions and blank x labels
    /// when `categorical` is set.
    fn build_chart<'a, DB: DrawingBackend>(
        root: &'a DrawingArea<DB, Shift>,
        title: &str,
        x_range: (f64, f64),
        y_range: (f64, f64),
        x_label: &str,
        y_label: &str,
        categorical: bool,
    ) -> DrawResult<Chart2d<'a, DB>, DB> {
        let mut chart = ChartBuilder::on(root)
            .margin(30)
            .caption(title, (FONT, 22))
            .x_label_area_size(if categorical { 60 } else { 40 })
            .y_label_area_size(70)
            .build_cartesian_2d(x_range.0..x_range.1, y_range.0..y_range.1)?;

        let blank = |_: &f64| String::new();
        {
            let mut mesh = chart.configure_mesh();
            mesh.x_desc(x_label).y_desc(y_label);
            if categorical {
                mesh.disable_x_mesh().x_label_formatter(&blank);
            }
            mesh.draw()?;
        }
        Ok(chart)
    }

    /// Category names centered under integer x positions.
    fn draw_category_labels<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        chart: &Chart2d<'_, DB>,
        labels: &[String],
        y_min: f64,
    ) -> DrawResult<(), DB> {
        let style = TextStyle::from((FONT, 14).into_font()).pos(Pos::new(HPos::Center, VPos::Top));
        for (i, label) in labels.iter().enumerate() {
            let (x, y) = chart.backend_coord(&(i as f64, y_min));
            root.draw(&Text::new(label.clone(), (x, y + 8), style.clone()))?;
        }
        Ok(())
    }

    fn draw_boxplot<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        title: &str,
        boxes: &[BoxSummary],
        x_label: &str,
        y_label: &str,
    ) -> DrawResult<(), DB> {
        let all: Vec<f64> = boxes.iter().flat_map(|b| [b.min, b.max]).collect();
        let (y_min, y_max) = StatsCalculator::value_range(&all);
        let x_max = boxes.len() as f64 - 0.5;
        let mut chart =
            Self::build_chart(root, title, (-0.5, x_max), (y_min, y_max), x_label, y_label, true)?;

        for (i, summary) in boxes.iter().enumerate() {
            let x = i as f64;
            let color = rgb(PALETTE[i % PALETTE.len()]);
            let outline = color.stroke_width(2);

            chart.draw_series(std::iter::once(Rectangle::new(
                [(x - BOX_HALF_WIDTH, summary.q1), (x + BOX_HALF_WIDTH, summary.q3)],
                color.mix(0.3).filled(),
            )))?;
            chart.draw_series(std::iter::once(Rectangle::new(
                [(x - BOX_HALF_WIDTH, summary.q1), (x + BOX_HALF_WIDTH, summary.q3)],
                outline,
            )))?;
            chart.draw_series(
                [
                    vec![(x - BOX_HALF_WIDTH, summary.median), (x + BOX_HALF_WIDTH, summary.median)],
                    vec![(x, summary.whisker_low), (x, summary.q1)],
                    vec![(x, summary.q3), (x, summary.whisker_high)],
                    vec![(x - 0.15, summary.whisker_low), (x + 0.15, summary.whisker_low)],
                    vec![(x - 0.15, summary.whisker_high), (x + 0.15, summary.whisker_high)],
                ]
                .into_iter()
                .map(|path| PathElement::new(path, outline)),
            )?;
            chart.draw_series(
                summary
                    .outliers
                    .iter()
                    .map(|&v| Circle::new((x, v), 3, color.mix(0.7).filled())),
            )?;
        }

        let labels: Vec<String> = boxes.iter().map(|b| b.group_name.clone()).collect();
        Self::draw_category_labels(root, &chart, &labels, y_min)
    }

    fn draw_scatter<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        title: &str,
        points: &[[f64; 2]],
        x_label: &str,
        y_label: &str,
    ) -> DrawResult<(), DB> {
        let xs: Vec<f64> = points.iter().map(|p| p[0]).collect();
        let ys: Vec<f64> = points.iter().map(|p| p[1]).collect();
        let mut chart = Self::build_chart(
            root,
            title,
            StatsCalculator::value_range(&xs),
            StatsCalculator::value_range(&ys),
            x_label,
            y_label,
            false,
        )?;

        let color = rgb(PALETTE[0]);
        chart.draw_series(
            points
                .iter()
                .map(|p| Circle::new((p[0], p[1]), 3, color.mix(0.8).filled())),
        )?;
        Ok(())
    }

    fn draw_histogram<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        title: &str,
        bins: &[HistogramBin],
        x_label: &str,
        y_label: &str,
    ) -> DrawResult<(), DB> {
        let x_min = bins.first().map_or(0.0, |b| b.start);
        let x_max = bins.last().map_or(1.0, |b| b.end);
        let y_max = bins.iter().map(|b| b.count).max().unwrap_or(0) as f64 * 1.1 + 1.0;
        let mut chart =
            Self::build_chart(root, title, (x_min, x_max), (0.0, y_max), x_label, y_label, false)?;

        let color = rgb(PALETTE[0]);
        chart.draw_series(bins.iter().map(|bin| {
            Rectangle::new([(bin.start, 0.0), (bin.end, bin.count as f64)], color.filled())
        }))?;
        chart.draw_series(bins.iter().map(|bin| {
            Rectangle::new([(bin.start, 0.0), (bin.end, bin.count as f64)], BLACK.stroke_width(1))
        }))?;
        Ok(())
    }

    fn draw_count_bars<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        title: &str,
        counts: &[CategoryCount],
        x_label: &str,
        y_label: &str,
    ) -> DrawResult<(), DB> {
        let y_max = counts.iter().map(|c| c.count).max().unwrap_or(0) as f64 * 1.15 + 1.0;
        let x_max = counts.len() as f64 - 0.5;
        let mut chart =
            Self::build_chart(root, title, (-0.5, x_max), (0.0, y_max), x_label, y_label, true)?;

        chart.draw_series(counts.iter().enumerate().map(|(i, c)| {
            let x = i as f64;
            Rectangle::new(
                [(x - BOX_HALF_WIDTH, 0.0), (x + BOX_HALF_WIDTH, c.count as f64)],
                rgb(PALETTE[i % PALETTE.len()]).filled(),
            )
        }))?;

        // Count annotation above every bar
        let above = TextStyle::from((FONT, 14).into_font()).pos(Pos::new(HPos::Center, VPos::Bottom));
        chart.draw_series(counts.iter().enumerate().map(|(i, c)| {
            Text::new(c.count.to_string(), (i as f64, c.count as f64), above.clone())
        }))?;

        let labels: Vec<String> = counts.iter().map(|c| c.value.clone()).collect();
        Self::draw_category_labels(root, &chart, &labels, 0.0)
    }

    fn draw_stacked_bars<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        title: &str,
        groups: &[GroupTotal],
        x_label: &str,
        y_label: &str,
    ) -> DrawResult<(), DB> {
        let keys = group_keys(groups);
        let directions = directions(groups);

        let stack_height = |key: &String| -> f64 {
            groups.iter().filter(|g| &g.key == key).map(|g| g.total).sum()
        };
        let y_max = keys.iter().map(stack_height).fold(0.0, f64::max) * 1.1 + 1.0;
        let x_max = keys.len() as f64 - 0.5;
        let mut chart =
            Self::build_chart(root, title, (-0.5, x_max), (0.0, y_max), x_label, y_label, true)?;

        let mut base = vec![0.0; keys.len()];
        for (d_idx, direction) in directions.iter().enumerate() {
            let color = rgb(ChartPlotter::direction_color(direction, d_idx));
            let mut bars = Vec::new();
            for (k_idx, key) in keys.iter().enumerate() {
                let total = groups
                    .iter()
                    .find(|g| &g.key == key && &g.direction == direction)
                    .map_or(0.0, |g| g.total);
                let x = k_idx as f64;
                bars.push(Rectangle::new(
                    [
                        (x - BOX_HALF_WIDTH, base[k_idx]),
                        (x + BOX_HALF_WIDTH, base[k_idx] + total),
                    ],
                    color.filled(),
                ));
                base[k_idx] += total;
            }
            chart
                .draw_series(bars)?
                .label(direction.as_str())
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
        }

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;

        Self::draw_category_labels(root, &chart, &keys, 0.0)
    }

    fn draw_timeline<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        title: &str,
        points: &[DatedTotal],
        x_label: &str,
        y_label: &str,
    ) -> DrawResult<(), DB> {
        let series: Vec<(f64, f64)> = points
            .iter()
            .map(|p| (date_to_days(p.date) as f64, p.total))
            .collect();
        let xs: Vec<f64> = series.iter().map(|p| p.0).collect();
        let ys: Vec<f64> = series.iter().map(|p| p.1).collect();

        let (x_min, x_max) = StatsCalculator::value_range(&xs);
        let (y_min, y_max) = StatsCalculator::value_range(&ys);

        let mut chart = ChartBuilder::on(root)
            .margin(30)
            .caption(title, (FONT, 22))
            .x_label_area_size(40)
            .y_label_area_size(70)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

        let date_label = |v: &f64| {
            days_to_date(v.round() as i32)
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default()
        };
        chart
            .configure_mesh()
            .x_desc(x_label)
            .y_desc(y_label)
            .x_labels(6)
            .x_label_formatter(&date_label)
            .draw()?;

        chart.draw_series(LineSeries::new(series, rgb(PALETTE[0]).stroke_width(2)))?;
        Ok(())
    }

    fn draw_pie<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        title: &str,
        counts: &[CategoryCount],
        (width, height): (u32, u32),
    ) -> DrawResult<(), DB> {
        let caption = TextStyle::from((FONT, 22).into_font()).pos(Pos::new(HPos::Center, VPos::Top));
        root.draw(&Text::new(title.to_string(), (width as i32 / 2, 15), caption))?;

        let radius = (height.min(width) as f64 * 0.35).max(10.0);
        let center = (width as f64 * 0.4, height as f64 * 0.55);
        let label_style =
            TextStyle::from((FONT, 14).into_font()).pos(Pos::new(HPos::Center, VPos::Center));
        let legend_style = TextStyle::from((FONT, 15).into_font()).pos(Pos::new(HPos::Left, VPos::Center));

        for (i, slice) in pie_slices(counts).iter().enumerate() {
            let color = rgb(PALETTE[i % PALETTE.len()]);
            root.draw(&Polygon::new(slice.outline(center, radius), color.filled()))?;

            let (lx, ly) = slice.label_anchor(center, radius * 0.65);
            root.draw(&Text::new(
                format!("{:.2}%", slice.share),
                (lx, ly),
                label_style.clone(),
            ))?;

            let legend_x = (center.0 + radius + 40.0) as i32;
            let legend_y = (height as f64 * 0.2) as i32 + i as i32 * 24;
            root.draw(&Rectangle::new(
                [(legend_x, legend_y - 7), (legend_x + 14, legend_y + 7)],
                color.filled(),
            ))?;
            root.draw(&Text::new(
                slice.label.clone(),
                (legend_x + 22, legend_y),
                legend_style.clone(),
            ))?;
        }
        Ok(())
    }
}

/// One pie wedge, angles in radians clockwise from twelve o'clock.
#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub label: String,
    pub share: f64,
    pub start: f64,
    pub end: f64,
}

impl PieSlice {
    fn point(center: (f64, f64), radius: f64, angle: f64) -> (i32, i32) {
        (
            (center.0 + radius * angle.sin()).round() as i32,
            (center.1 - radius * angle.cos()).round() as i32,
        )
    }

    /// Polygon approximating the wedge.
    pub fn outline(&self, center: (f64, f64), radius: f64) -> Vec<(i32, i32)> {
        let steps = (((self.end - self.start) / 0.05).ceil() as usize).max(1);
        let mut points = vec![(center.0.round() as i32, center.1.round() as i32)];
        for s in 0..=steps {
            let angle = self.start + (self.end - self.start) * s as f64 / steps as f64;
            points.push(Self::point(center, radius, angle));
        }
        points
    }

    pub fn label_anchor(&self, center: (f64, f64), radius: f64) -> (i32, i32) {
        Self::point(center, radius, (self.start + self.end) / 2.0)
    }
}

/// Split a full turn proportionally to the counts.
pub fn pie_slices(counts: &[CategoryCount]) -> Vec<PieSlice> {
    let mut start = 0.0;
    shares(counts)
        .into_iter()
        .map(|(label, share)| {
            let end = start + share / 100.0 * std::f64::consts::TAU;
            let slice = PieSlice {
                label,
                share,
                start,
                end,
            };
            start = end;
            slice
        })
        .collect()
}

fn draw_error(chart: &ChartData, e: impl std::fmt::Display) -> RenderError {
    RenderError::Draw {
        chart: chart.descriptor.id.to_string(),
        message: e.to_string(),
    }
}

fn rgb(color: egui::Color32) -> RGBColor {
    RGBColor(color.r(), color.g(), color.b())
}

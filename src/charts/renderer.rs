//! Static Chart Renderer
//! Draws the manufacturer bar chart to a PNG file with plotters.
//!
//! Layout:
//! 1. Header: attribution (left), title (centered), total records (right)
//! 2. Horizontal bars, largest make on top, "Other" at the bottom in gray
//! 3. Footer: generation date, centered

use crate::charts::labels::{bar_annotation, footer_text, format_thousands, total_text};
use crate::charts::style::{ChartStyle, Rgb};
use crate::data::{EntryKind, MakeSeries, SeriesEntry};
use chrono::NaiveDate;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;
use thiserror::Error;

/// Half the height of a bar, in row units.
const BAR_HALF_HEIGHT: f64 = 0.4;
/// Number of slices in the background wash.
const WASH_STEPS: usize = 100;
/// Extra x range past the longest bar, leaving room for its annotation.
const X_HEADROOM: f64 = 1.15;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("No entries to render")]
    EmptySeries,
    #[error("Failed to prepare output: {0}")]
    Io(#[from] std::io::Error),
    #[error("Drawing failed: {0}")]
    Drawing(String),
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for RenderError {
    fn from(e: DrawingAreaErrorKind<E>) -> Self {
        RenderError::Drawing(e.to_string())
    }
}

/// Per-run values printed on the chart.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext {
    pub generated_on: NaiveDate,
}

impl RenderContext {
    pub fn now() -> Self {
        Self {
            generated_on: chrono::Local::now().date_naive(),
        }
    }
}

pub struct BarChartRenderer;

impl BarChartRenderer {
    /// Render the series and write it as a PNG to `output`.
    pub fn render(
        series: &MakeSeries,
        style: &ChartStyle,
        ctx: &RenderContext,
        output: &Path,
    ) -> Result<(), RenderError> {
        if series.is_empty() {
            return Err(RenderError::EmptySeries);
        }
        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let root = BitMapBackend::new(output, style.canvas_px()).into_drawing_area();
        Self::draw(&root, series, style, ctx)?;
        root.present()?;
        Ok(())
    }

    fn draw<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        series: &MakeSeries,
        style: &ChartStyle,
        ctx: &RenderContext,
    ) -> Result<(), RenderError> {
        let bg: RGBColor = style.background.into();
        root.fill(&bg)?;

        let (_, height) = root.dim_in_pixel();
        let header_h = style.scaled(70.0);
        let footer_h = style.scaled(30.0);
        let (header, rest) = root.split_vertically(header_h);
        let (body, footer) = rest.split_vertically(height.saturating_sub(header_h + footer_h));

        Self::draw_header(&header, series, style)?;
        Self::draw_bars(&body, series, style)?;
        Self::draw_footer(&footer, style, ctx)?;
        Ok(())
    }

    fn draw_header<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        series: &MakeSeries,
        style: &ChartStyle,
    ) -> Result<(), RenderError> {
        let (w, h) = area.dim_in_pixel();
        let (w, h) = (w as i32, h as i32);
        let fg: RGBColor = style.foreground.into();
        let accent: RGBColor = style.accent.into();
        let family = FontFamily::Name(&style.font_family);

        let title_style = FontDesc::new(family, style.px(style.title_pt) as f64, FontStyle::Bold)
            .color(&fg)
            .pos(Pos::new(HPos::Center, VPos::Center));
        area.draw(&Text::new(
            style.title.as_str(),
            (w / 2, h * 3 / 5),
            title_style,
        ))?;

        let attribution_style =
            FontDesc::new(family, style.px(style.axis_label_pt) as f64, FontStyle::Bold)
                .color(&accent.mix(0.9))
                .pos(Pos::new(HPos::Left, VPos::Center));
        area.draw(&Text::new(
            style.attribution.as_str(),
            (w * 12 / 100, h / 5),
            attribution_style,
        ))?;

        if style.show_total {
            let total_style =
                FontDesc::new(family, style.px(style.annotation_pt) as f64, FontStyle::Normal)
                    .color(&fg.mix(0.8))
                    .pos(Pos::new(HPos::Right, VPos::Center));
            area.draw(&Text::new(
                total_text(series.total()),
                (w * 88 / 100, h / 5),
                total_style,
            ))?;
        }
        Ok(())
    }

    fn draw_bars<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        series: &MakeSeries,
        style: &ChartStyle,
    ) -> Result<(), RenderError> {
        let fg: RGBColor = style.foreground.into();
        let spine: RGBColor = style.spine.into();
        let family = FontFamily::Name(&style.font_family);
        let line_px = style.scaled(1.0).max(1);

        let order = series.display_order();
        let rows = order.len();
        let names: Vec<&str> = order.iter().map(|e| e.label.as_str()).collect();
        let max_count = series.max_count() as f64;
        let x_max = (max_count * X_HEADROOM).max(1.0);

        let mut chart = ChartBuilder::on(area)
            .margin_left(style.scaled(20.0))
            .margin_right(style.scaled(40.0))
            .margin_top(style.scaled(10.0))
            .x_label_area_size(style.scaled(60.0))
            .y_label_area_size(style.scaled(140.0))
            .build_cartesian_2d(0f64..x_max, -0.5f64..rows as f64 - 0.5)?;

        let tick_style = FontDesc::new(family, style.px(style.tick_pt) as f64, FontStyle::Normal)
            .color(&fg);
        let desc_style =
            FontDesc::new(family, style.px(style.axis_label_pt) as f64, FontStyle::Normal)
                .color(&fg);

        chart
            .configure_mesh()
            .disable_y_mesh()
            .bold_line_style(fg.mix(style.grid_alpha).stroke_width(line_px))
            .light_line_style(TRANSPARENT)
            .axis_style(spine.stroke_width(line_px))
            .x_labels(8)
            .y_labels(rows)
            .x_label_formatter(&|v| format_thousands(v.max(0.0).round() as u64))
            .y_label_formatter(&|v| row_label(&names, *v))
            .x_desc(style.x_label.as_str())
            .y_desc(style.y_label.as_str())
            .label_style(tick_style)
            .axis_desc_style(desc_style)
            .draw()?;

        // Faint gradient wash behind the bars
        chart.draw_series((0..WASH_STEPS).map(|i| {
            let x0 = x_max * i as f64 / WASH_STEPS as f64;
            let x1 = x_max * (i + 1) as f64 / WASH_STEPS as f64;
            let t = i as f64 / (WASH_STEPS - 1) as f64;
            let color: RGBColor = style.gradient_start.lerp(style.gradient_end, t).into();
            Rectangle::new(
                [(x0, -0.5), (x1, rows as f64 - 0.5)],
                color.mix(style.wash_alpha).filled(),
            )
        }))?;

        chart.draw_series(order.iter().enumerate().map(|(i, entry)| {
            let y = i as f64;
            let color: RGBColor = bar_color(style, series.ranked_len(), entry).into();
            Rectangle::new(
                [(0.0, y - BAR_HALF_HEIGHT), (entry.count as f64, y + BAR_HALF_HEIGHT)],
                color.mix(style.bar_alpha).filled(),
            )
        }))?;

        if series.other().is_some() && series.ranked_len() > 0 {
            chart.draw_series(LineSeries::new(
                vec![(0.0, 0.5), (x_max, 0.5)],
                spine.stroke_width(line_px * 2),
            ))?;
        }

        let annotation_style =
            FontDesc::new(family, style.px(style.annotation_pt) as f64, FontStyle::Bold)
                .color(&fg)
                .pos(Pos::new(HPos::Left, VPos::Center));
        let offset = max_count * 0.01;
        chart.draw_series(order.iter().enumerate().map(|(i, entry)| {
            Text::new(
                bar_annotation(series, entry, style.show_percentages),
                (entry.count as f64 + offset, i as f64),
                annotation_style.clone(),
            )
        }))?;

        Ok(())
    }

    fn draw_footer<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        style: &ChartStyle,
        ctx: &RenderContext,
    ) -> Result<(), RenderError> {
        let (w, h) = area.dim_in_pixel();
        let fg: RGBColor = style.foreground.into();
        let footer_style = FontDesc::new(
            FontFamily::Name(&style.font_family),
            style.px(style.footer_pt) as f64,
            FontStyle::Italic,
        )
        .color(&fg.mix(0.7))
        .pos(Pos::new(HPos::Center, VPos::Center));

        area.draw(&Text::new(
            footer_text(&style.footer_prefix, ctx.generated_on),
            (w as i32 / 2, h as i32 / 2),
            footer_style,
        ))?;
        Ok(())
    }
}

/// Gradient color by rank for top-K entries, flat color for "Other".
pub fn bar_color(style: &ChartStyle, ranked_len: usize, entry: &SeriesEntry) -> Rgb {
    match entry.kind {
        EntryKind::Ranked { rank } => style.gradient_color(rank, ranked_len),
        EntryKind::Other => style.other_color,
    }
}

/// Y tick label: the make drawn at row `y`, empty between rows.
fn row_label(names: &[&str], y: f64) -> String {
    let row = y.round();
    if row < 0.0 || (y - row).abs() > 1e-6 {
        return String::new();
    }
    names
        .get(row as usize)
        .map(|name| name.to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{BucketPolicy, MakeTally};

    fn sample_series(top_k: usize) -> MakeSeries {
        let makes = ["Ford", "BMW", "Ford", "Audi", "Ford", "BMW", "Kia"];
        MakeTally::from_makes(makes.iter().map(|m| Some(*m))).bucket(&BucketPolicy {
            top_k,
            bucket_overflow: true,
        })
    }

    #[test]
    fn other_is_gray_and_ranks_follow_gradient() {
        let style = ChartStyle::default();
        let series = sample_series(2);
        let colors: Vec<Rgb> = series
            .entries()
            .iter()
            .map(|e| bar_color(&style, series.ranked_len(), e))
            .collect();

        assert_eq!(
            colors,
            vec![style.gradient_start, style.gradient_end, style.other_color]
        );
    }

    #[test]
    fn row_labels_only_on_whole_rows() {
        let names = ["Other", "BMW", "Ford"];
        assert_eq!(row_label(&names, 0.0), "Other");
        assert_eq!(row_label(&names, 2.0), "Ford");
        assert_eq!(row_label(&names, 0.5), "");
        assert_eq!(row_label(&names, -0.5), "");
        assert_eq!(row_label(&names, 3.0), "");
    }

    #[test]
    fn empty_series_is_rejected_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("chart.png");
        let series = MakeTally::default().bucket(&BucketPolicy::default());

        let err = BarChartRenderer::render(
            &series,
            &ChartStyle::default(),
            &RenderContext::now(),
            &output,
        )
        .unwrap_err();
        assert!(matches!(err, RenderError::EmptySeries));
        assert!(!output.exists());
    }

    fn font_available(style: &ChartStyle) -> bool {
        FontDesc::new(FontFamily::Name(&style.font_family), 12.0, FontStyle::Normal)
            .box_size("Ford")
            .is_ok()
    }

    #[test]
    fn renders_png_at_configured_size() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("nested").join("chart.png");
        let style = ChartStyle {
            dpi: 50,
            ..ChartStyle::default()
        };
        let ctx = RenderContext {
            generated_on: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        };
        if !font_available(&style) {
            eprintln!("skipping: no '{}' font on this host", style.font_family);
            return;
        }

        BarChartRenderer::render(&sample_series(2), &style, &ctx, &output).unwrap();

        let img = image::open(&output).unwrap();
        assert_eq!((img.width(), img.height()), (700, 400));
    }
}

use std::{f64::consts::PI, io::Cursor};

use anyhow::{Context, anyhow};
use image::{DynamicImage, ImageFormat, RgbImage};
use plotters::{
    coord::Shift,
    prelude::*,
    style::text_anchor::{HPos, Pos, VPos},
};

use crate::{
    domain::{
        chart::ports::ChartRenderer,
        common::{ChartConfig, entities::app_errors::CoreError},
        consumption::value_objects::{CategoryTotals, DailySeries},
        forecast::entities::{ForecastMethod, ForecastSeries},
    },
    infrastructure::chart::fonts::{CHART_FONT_FAMILY, ensure_chart_font},
};

const PIE_SIZE: (u32, u32) = (800, 800);
const LINE_SIZE: (u32, u32) = (1200, 600);
const PREDICTION_SIZE: (u32, u32) = (1400, 800);

const PIE_TITLE: &str = "Distribución del Consumo por Tipo de Alimento";
const LINE_TITLE: &str = "Consumo Diario de Alimentos";
const LINE_LEGEND: &str = "Consumo Diario";
const PREDICTION_TITLE: &str = "Predicciones del Consumo Diario";
const ACTUAL_LEGEND: &str = "Datos Reales";
const DATE_AXIS: &str = "Fecha";
const QUANTITY_AXIS: &str = "Cantidad Consumida (gr)";

/// Arc resolution of pie slices, in degrees
const ARC_STEP_DEGREES: f64 = 1.0;

/// Dash and gap length of forecast lines, in pixels
const FORECAST_DASH: (u32, u32) = (10, 6);

/// Renders charts into an in-memory RGB bitmap and encodes it as PNG.
#[derive(Debug, Clone)]
pub struct PlottersChartRenderer {
    font_family: &'static str,
}

impl PlottersChartRenderer {
    /// Fails when the chart font cannot be registered
    pub fn new(config: &ChartConfig) -> Result<Self, CoreError> {
        ensure_chart_font(config.font_path.as_deref())?;
        Ok(Self {
            font_family: CHART_FONT_FAMILY,
        })
    }

    fn text_style(&self, size: u32) -> TextStyle<'static> {
        TextStyle::from((self.font_family, size).into_font()).color(&BLACK)
    }

    fn pie(&self, totals: &CategoryTotals) -> anyhow::Result<Vec<u8>> {
        let (width, height) = PIE_SIZE;
        let center = (width as i32 / 2, height as i32 / 2 + 20);
        let radius = f64::from(width.min(height)) * 0.33;
        let grand_total = totals.grand_total();

        render_png(PIE_SIZE, |root| {
            root.draw_text(
                PIE_TITLE,
                &self.text_style(28).pos(Pos::new(HPos::Center, VPos::Top)),
                (width as i32 / 2, 30),
            )?;

            if grand_total <= 0.0 {
                return Ok(());
            }

            let mut start_angle = 90.0;
            for (index, (label, total)) in totals.iter().enumerate() {
                let sweep = 360.0 * total / grand_total;
                if sweep <= 0.0 {
                    continue;
                }

                root.draw(&Polygon::new(
                    slice_points(center, radius, start_angle, sweep),
                    Palette99::pick(index).filled(),
                ))?;

                let middle = start_angle + sweep / 2.0;
                let style = self.text_style(16).pos(Pos::new(HPos::Center, VPos::Center));
                root.draw_text(label, &style, polar(center, radius * 1.15, middle))?;
                root.draw_text(
                    &format!("{:.1}%", 100.0 * total / grand_total),
                    &style,
                    polar(center, radius * 0.65, middle),
                )?;

                start_angle += sweep;
            }

            Ok(())
        })
    }

    fn daily(&self, series: &DailySeries) -> anyhow::Result<Vec<u8>> {
        let (y_min, y_max) = calculate_y_range(&series.values);
        let x_max = series.len().max(2) - 1;

        render_png(LINE_SIZE, |root| {
            let mut chart = ChartBuilder::on(root)
                .margin(30)
                .caption(LINE_TITLE, (self.font_family, 32))
                .x_label_area_size(60)
                .y_label_area_size(80)
                .build_cartesian_2d(0..x_max, y_min..y_max)?;

            chart
                .configure_mesh()
                .x_desc(DATE_AXIS)
                .y_desc(QUANTITY_AXIS)
                .x_labels(10)
                .y_labels(10)
                .x_label_formatter(&|x| series.date_at(*x).format("%Y-%m-%d").to_string())
                .draw()?;

            chart
                .draw_series(LineSeries::new(
                    series.values.iter().enumerate().map(|(i, v)| (i, *v)),
                    ShapeStyle::from(&BLUE).stroke_width(2),
                ))?
                .label(LINE_LEGEND)
                .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLUE));

            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .background_style(&WHITE.mix(0.8))
                .border_style(&BLACK)
                .label_font((self.font_family, 16))
                .draw()?;

            Ok(())
        })
    }

    fn prediction(
        &self,
        series: &DailySeries,
        forecasts: &[ForecastSeries],
    ) -> anyhow::Result<Vec<u8>> {
        let observed = series.len();
        let horizon = forecasts.iter().map(ForecastSeries::len).max().unwrap_or(0);
        let x_max = (observed + horizon).max(2) - 1;

        let all_values: Vec<f64> = series
            .values
            .iter()
            .copied()
            .chain(forecasts.iter().flat_map(|f| f.values()))
            .collect();
        let (y_min, y_max) = calculate_y_range(&all_values);

        render_png(PREDICTION_SIZE, |root| {
            let mut chart = ChartBuilder::on(root)
                .margin(30)
                .caption(PREDICTION_TITLE, (self.font_family, 32))
                .x_label_area_size(60)
                .y_label_area_size(80)
                .build_cartesian_2d(0..x_max, y_min..y_max)?;

            chart
                .configure_mesh()
                .x_desc(DATE_AXIS)
                .y_desc(QUANTITY_AXIS)
                .x_labels(12)
                .y_labels(10)
                .x_label_formatter(&|x| series.date_at(*x).format("%Y-%m-%d").to_string())
                .draw()?;

            chart
                .draw_series(LineSeries::new(
                    series.values.iter().enumerate().map(|(i, v)| (i, *v)),
                    ShapeStyle::from(&BLUE).stroke_width(2),
                ))?
                .label(ACTUAL_LEGEND)
                .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLUE));

            let (dash, gap) = FORECAST_DASH;
            for forecast in forecasts {
                let color = method_color(forecast.method);
                chart
                    .draw_series(DashedLineSeries::new(
                        forecast_points(observed, forecast),
                        dash,
                        gap,
                        ShapeStyle::from(&color).stroke_width(2),
                    ))?
                    .label(forecast.method.label())
                    .legend(move |(x, y)| {
                        PathElement::new(vec![(x, y), (x + 20, y)], ShapeStyle::from(&color))
                    });
            }

            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperLeft)
                .background_style(&WHITE.mix(0.8))
                .border_style(&BLACK)
                .label_font((self.font_family, 16))
                .draw()?;

            Ok(())
        })
    }
}

impl ChartRenderer for PlottersChartRenderer {
    fn render_category_share(&self, totals: &CategoryTotals) -> Result<Vec<u8>, CoreError> {
        self.pie(totals)
            .map_err(|e| CoreError::RenderError(format!("pie chart: {e:#}")))
    }

    fn render_daily_series(&self, series: &DailySeries) -> Result<Vec<u8>, CoreError> {
        self.daily(series)
            .map_err(|e| CoreError::RenderError(format!("line chart: {e:#}")))
    }

    fn render_forecast(
        &self,
        series: &DailySeries,
        forecasts: &[ForecastSeries],
    ) -> Result<Vec<u8>, CoreError> {
        self.prediction(series, forecasts)
            .map_err(|e| CoreError::RenderError(format!("prediction chart: {e:#}")))
    }
}

/// Draws onto a white RGB canvas of `size` and returns it PNG-encoded
fn render_png<F>(size: (u32, u32), draw: F) -> anyhow::Result<Vec<u8>>
where
    F: FnOnce(&DrawingArea<BitMapBackend<'_>, Shift>) -> anyhow::Result<()>,
{
    let (width, height) = size;
    let mut buffer = vec![0u8; width as usize * height as usize * 3];

    {
        let root = BitMapBackend::with_buffer(&mut buffer, size).into_drawing_area();
        root.fill(&WHITE)?;
        draw(&root)?;
        root.present()?;
    }

    let image = RgbImage::from_raw(width, height, buffer)
        .ok_or_else(|| anyhow!("bitmap buffer does not match {width}x{height}"))?;

    let mut png = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(image)
        .write_to(&mut png, ImageFormat::Png)
        .context("PNG encoding failed")?;

    Ok(png.into_inner())
}

/// Forecast values placed on the x axis right after the `observed` days
fn forecast_points(
    observed: usize,
    forecast: &ForecastSeries,
) -> impl Iterator<Item = (usize, f64)> + Clone + '_ {
    forecast
        .points
        .iter()
        .enumerate()
        .map(move |(h, point)| (observed + h, point.value))
}

fn method_color(method: ForecastMethod) -> RGBColor {
    match method {
        ForecastMethod::Sarima => RED,
        ForecastMethod::HoltWinters => GREEN,
    }
}

/// Pixel position at `angle` degrees, counter-clockwise from the x axis
fn polar(center: (i32, i32), radius: f64, angle: f64) -> (i32, i32) {
    let radians = angle * PI / 180.0;
    (
        center.0 + (radius * radians.cos()).round() as i32,
        center.1 - (radius * radians.sin()).round() as i32,
    )
}

fn slice_points(center: (i32, i32), radius: f64, start: f64, sweep: f64) -> Vec<(i32, i32)> {
    let steps = (sweep / ARC_STEP_DEGREES).ceil().max(1.0) as usize;
    let mut points = Vec::with_capacity(steps + 2);
    points.push(center);
    for step in 0..=steps {
        let angle = start + sweep * step as f64 / steps as f64;
        points.push(polar(center, radius, angle));
    }
    points
}

/// Value range with 10% padding, floored at zero for non-negative data
fn calculate_y_range(values: &[f64]) -> (f64, f64) {
    let finite = values.iter().copied().filter(|v| v.is_finite());
    let (min, max) = finite.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if min > max {
        return (0.0, 100.0);
    }

    let padding = ((max - min) * 0.1).max(1.0);
    let y_min = if min >= 0.0 {
        (min - padding).max(0.0)
    } else {
        min - padding
    };

    (y_min, max + padding)
}

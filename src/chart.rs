//! JavaScript interop for Chart.js visualization.
//! Provides Rust bindings to chart helper functions defined in chart_helpers.js.

use scraper_ui::config::{CONTENT_LENGTH_CANVAS, ELEMENT_TYPE_CANVAS};
use scraper_ui::visualization::{chart_colors, ChartSeries};
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(module = "/chart_helpers.js")]
extern "C" {
    #[wasm_bindgen(js_name = renderDoughnutChart)]
    fn render_doughnut_chart(canvas_id: &str, title: &str, data: JsValue);

    #[wasm_bindgen(js_name = renderBarChart)]
    fn render_bar_chart(canvas_id: &str, title: &str, data: JsValue);
}

#[derive(Serialize)]
struct ChartData<'a> {
    labels: &'a [String],
    counts: &'a [u32],
    colors: Vec<&'static str>,
}

/// Doughnut of element types, one palette color per type.
pub fn draw_element_type_chart(series: &ChartSeries) -> Result<(), serde_wasm_bindgen::Error> {
    let data = serde_wasm_bindgen::to_value(&ChartData {
        labels: &series.labels,
        counts: &series.counts,
        colors: chart_colors(series.labels.len()),
    })?;
    render_doughnut_chart(ELEMENT_TYPE_CANVAS, "Element Types Distribution", data);
    Ok(())
}

/// Bar chart of content-length buckets.
pub fn draw_content_length_chart(series: &ChartSeries) -> Result<(), serde_wasm_bindgen::Error> {
    let data = serde_wasm_bindgen::to_value(&ChartData {
        labels: &series.labels,
        counts: &series.counts,
        colors: Vec::new(),
    })?;
    render_bar_chart(CONTENT_LENGTH_CANVAS, "Content Length Distribution", data);
    Ok(())
}

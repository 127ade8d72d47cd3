//! Binding between history series and the one live chart
//!
//! The chart is mounted on the first update and only ever mutated after
//! that, so renderer-side state such as zoom or hidden legend entries
//! survives refreshes.

use std::sync::Arc;

use serde::Serialize;
use shared::{ChartSeries, Measurement};
use tracing::debug;

/// Style of one dataset in the chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetStyle {
    pub measurement: Measurement,
    pub label: &'static str,
    pub color: &'static str,
}

/// Fixed layout of the history chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartLayout {
    pub kind: &'static str,
    /// All datasets are drawn against one value axis
    pub shared_value_axis: bool,
    pub datasets: Vec<DatasetStyle>,
}

impl ChartLayout {
    /// Temperature, soil moisture and soil pH as coloured bars
    pub fn three_series() -> Self {
        Self {
            kind: "bar",
            shared_value_axis: true,
            datasets: Measurement::ALL
                .iter()
                .map(|m| DatasetStyle {
                    measurement: *m,
                    label: m.label(),
                    color: m.color(),
                })
                .collect(),
        }
    }
}

/// Rendering capability of the charting library
pub trait ChartRenderer: Send + Sync {
    /// Create the chart with its initial data
    fn mount(&self, layout: &ChartLayout, series: &ChartSeries);

    /// Draw the mounted chart again after its data changed
    fn redraw(&self, series: &ChartSeries);
}

/// Renderer for headless hosts: the page pulls frames over HTTP, so drawing
/// is reduced to a trace line
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingRenderer;

impl ChartRenderer for TracingRenderer {
    fn mount(&self, layout: &ChartLayout, series: &ChartSeries) {
        debug!(
            kind = layout.kind,
            datasets = layout.datasets.len(),
            points = series.len(),
            "chart mounted"
        );
    }

    fn redraw(&self, series: &ChartSeries) {
        debug!(points = series.len(), "chart redrawn");
    }
}

/// What an update did to the chart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartUpdate {
    Mounted,
    Redrawn,
    Unchanged,
}

/// One dataset as sent to the page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetFrame {
    pub label: &'static str,
    pub color: &'static str,
    pub data: Vec<Option<f64>>,
}

/// Current chart contents as sent to the page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartFrame {
    pub kind: &'static str,
    pub revision: u64,
    pub labels: Vec<String>,
    pub datasets: Vec<DatasetFrame>,
}

struct ChartInstance {
    layout: ChartLayout,
    series: ChartSeries,
    revision: u64,
}

/// Owns the live chart instance
pub struct ChartBindingAdapter {
    renderer: Arc<dyn ChartRenderer>,
    instance: Option<ChartInstance>,
}

impl ChartBindingAdapter {
    pub fn new(renderer: Arc<dyn ChartRenderer>) -> Self {
        Self {
            renderer,
            instance: None,
        }
    }

    /// Show `series`. Mounts on first use, otherwise swaps the data of the
    /// existing chart in place. Repeating the current series is a no-op.
    pub fn update(&mut self, series: ChartSeries) -> ChartUpdate {
        match &mut self.instance {
            None => {
                let layout = ChartLayout::three_series();
                self.renderer.mount(&layout, &series);
                self.instance = Some(ChartInstance {
                    layout,
                    series,
                    revision: 0,
                });
                ChartUpdate::Mounted
            }
            Some(instance) if instance.series == series => ChartUpdate::Unchanged,
            Some(instance) => {
                instance.series = series;
                instance.revision += 1;
                self.renderer.redraw(&instance.series);
                ChartUpdate::Redrawn
            }
        }
    }

    /// Empty the chart. Does not mount a chart that does not exist yet.
    pub fn clear(&mut self) -> ChartUpdate {
        if self.instance.is_none() {
            return ChartUpdate::Unchanged;
        }
        self.update(ChartSeries::empty())
    }

    pub fn is_mounted(&self) -> bool {
        self.instance.is_some()
    }

    pub fn frame(&self) -> Option<ChartFrame> {
        self.instance.as_ref().map(|instance| ChartFrame {
            kind: instance.layout.kind,
            revision: instance.revision,
            labels: instance.series.labels().to_vec(),
            datasets: instance
                .layout
                .datasets
                .iter()
                .map(|style| DatasetFrame {
                    label: style.label,
                    color: style.color,
                    data: instance.series.values(style.measurement).to_vec(),
                })
                .collect(),
        })
    }
}

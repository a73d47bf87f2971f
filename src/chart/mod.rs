//! Chart data model: kinds, typed series records, settings and descriptors.

mod binding;
mod descriptor;
pub mod format;
mod kind;
mod rendered;
mod series;
mod settings;

pub use binding::{AxisRequest, AxisSide, OverlayMetadata, OverlayOptions, ResolvedBinding};
pub use descriptor::ChartDescriptor;
pub use kind::ChartKind;
pub use rendered::RenderedChart;
pub use series::{
    BarSeries, BoxObservation, BoxSeries, DimensionValue, HeatmapSeries, HistogramSeries,
    LineSeries, ParallelSeries, RefLine, ReferenceLines, ScatterSeries, SeriesRecord, SeriesStyle,
};
pub use settings::ChartSettings;

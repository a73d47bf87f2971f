pub mod histogram;
pub mod primitives;
pub mod scale;
pub mod stats;
pub mod types;

pub use histogram::{bin_counts, bin_edges, histogram, shape_counts};
pub use primitives::{datetime_to_unix_seconds, decimal_to_f64, decimals_to_f64};
pub use scale::LinearScale;
pub use stats::{
    BoxStats, LinearFit, normal_quantile, normalize_sizes, pearson_correlation, quantile,
    student_t_quantile,
};
pub use types::{
    BarMode, DataRange, DrawStyle, FigureSize, GridAxis, Orientation, StepPosition, Viewport,
};

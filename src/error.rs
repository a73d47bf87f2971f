use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChartError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("at least one chart is required")]
    EmptyChartList,

    #[error("chart at index {index} is missing its figure")]
    MissingFigure { index: usize },

    #[error(
        "figure at index {index} is missing chart metadata; it was not created by a chart constructor"
    )]
    MissingDescriptor { index: usize },

    #[error("invalid chart descriptor: {0}")]
    InvalidDescriptor(String),

    #[error("unrecognized chart type `{0}`")]
    UnknownChartType(String),

    #[error("invalid grid layout: {0}")]
    InvalidLayout(String),
}

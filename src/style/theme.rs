use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Named starting points for a `StyleConfig`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Default,
    Greyscale,
}

impl Theme {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Greyscale => "greyscale",
        }
    }
}

impl FromStr for Theme {
    type Err = ChartError;

    fn from_str(name: &str) -> ChartResult<Self> {
        match name.to_ascii_lowercase().as_str() {
            "default" => Ok(Self::Default),
            "greyscale" | "grayscale" => Ok(Self::Greyscale),
            _ => Err(ChartError::InvalidData(format!("unknown theme `{name}`"))),
        }
    }
}

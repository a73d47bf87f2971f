use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::chart::{ChartKind, ChartSettings, OverlayMetadata, SeriesRecord};
use crate::error::{ChartError, ChartResult};
use crate::style::StyleConfig;

/// Record of how a chart was produced, sufficient to paint it again.
///
/// `style` is the configuration the chart was rendered with; replay always
/// uses it instead of the caller's current style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDescriptor {
    pub kind: ChartKind,
    pub series: Vec<SeriesRecord>,
    #[serde(default)]
    pub settings: ChartSettings,
    #[serde(default)]
    pub style: StyleConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overlay: Option<OverlayMetadata>,
}

impl ChartDescriptor {
    #[must_use]
    pub fn new(
        kind: ChartKind,
        series: Vec<SeriesRecord>,
        settings: ChartSettings,
        style: StyleConfig,
    ) -> Self {
        Self {
            kind,
            series,
            settings,
            style,
            overlay: None,
        }
    }

    /// Checks the structural invariants replay relies on.
    pub fn validate(&self) -> ChartResult<()> {
        if self.series.is_empty() {
            return Err(ChartError::InvalidDescriptor(format!(
                "{} descriptor has an empty chart list",
                self.kind
            )));
        }

        match (self.kind, &self.overlay) {
            (ChartKind::Overlay, None) => Err(ChartError::InvalidDescriptor(
                "overlay descriptor has no binding records".to_owned(),
            )),
            (ChartKind::Overlay, Some(overlay)) => {
                if overlay.bindings.is_empty() {
                    return Err(ChartError::InvalidDescriptor(
                        "overlay descriptor has no binding records".to_owned(),
                    ));
                }
                overlay
                    .bindings
                    .iter()
                    .try_for_each(|binding| binding.descriptor.validate())
            }
            (kind, Some(_)) => Err(ChartError::InvalidDescriptor(format!(
                "{kind} descriptor carries overlay bindings"
            ))),
            (kind, None) => {
                match self.series.iter().find(|series| series.kind() != kind) {
                    Some(series) => Err(ChartError::InvalidDescriptor(format!(
                        "{kind} descriptor holds a {} series",
                        series.kind()
                    ))),
                    None => Ok(()),
                }
            }
        }
    }

    /// Series labels in chart-list order, `None` for unlabelled series.
    #[must_use]
    pub fn series_labels(&self) -> Vec<Option<&str>> {
        self.series.iter().map(SeriesRecord::label).collect()
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize descriptor: {e}")))
    }

    /// Parses and validates a descriptor snapshot.
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let value: Value = serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse descriptor: {e}")))?;

        match value.get("kind") {
            Some(Value::String(kind)) => {
                kind.parse::<ChartKind>()?;
            }
            Some(_) => {
                return Err(ChartError::InvalidDescriptor(
                    "descriptor type must be a string".to_owned(),
                ));
            }
            None => {
                return Err(ChartError::InvalidDescriptor(
                    "descriptor is missing its type".to_owned(),
                ));
            }
        }
        if value.get("series").is_none() {
            return Err(ChartError::InvalidDescriptor(
                "descriptor is missing its chart list".to_owned(),
            ));
        }

        let descriptor: Self = serde_json::from_value(value)
            .map_err(|e| ChartError::InvalidDescriptor(format!("malformed descriptor: {e}")))?;
        descriptor.validate()?;
        Ok(descriptor)
    }
}

use std::fmt;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::common::entities::app_errors::CoreError;

const MAX_CHART_NAME_LEN: usize = 128;
const CHART_EXTENSION: &str = ".png";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Pie,
    Line,
    Prediction,
}

impl ChartKind {
    pub const ALL: [ChartKind; 3] = [ChartKind::Pie, ChartKind::Line, ChartKind::Prediction];

    pub fn file_stem(&self) -> &'static str {
        match self {
            ChartKind::Pie => "grafica_pastel",
            ChartKind::Line => "grafica_linea",
            ChartKind::Prediction => "grafica_predicciones",
        }
    }
}

/// File name of a generated chart, guaranteed to be a single safe path
/// component ending in `.png`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
pub struct ChartName(String);

impl ChartName {
    pub fn for_run(run_id: Uuid, kind: ChartKind) -> Self {
        Self(format!("{}_{}{}", run_id.simple(), kind.file_stem(), CHART_EXTENSION))
    }

    pub fn parse(value: &str) -> Result<Self, CoreError> {
        let invalid = || CoreError::InvalidChartName(value.to_string());

        if value.is_empty() || value.len() > MAX_CHART_NAME_LEN {
            return Err(invalid());
        }
        if value.starts_with('.') || value.contains("..") {
            return Err(invalid());
        }
        if !value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        {
            return Err(invalid());
        }
        if !value.ends_with(CHART_EXTENSION) || value.len() == CHART_EXTENSION.len() {
            return Err(invalid());
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChartName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ChartName {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ChartName> for String {
    fn from(name: ChartName) -> Self {
        name.0
    }
}

/// PNG bytes produced by the renderer, not yet persisted
#[derive(Debug, Clone)]
pub struct RenderedChart {
    pub kind: ChartKind,
    pub png: Bytes,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StoredChart {
    pub name: ChartName,
    pub size_bytes: u64,
    pub checksum_sha256: String,
}

/// A chart read back from storage
#[derive(Debug, Clone)]
pub struct ChartFile {
    pub name: ChartName,
    pub content: Bytes,
    pub content_type: &'static str,
    pub checksum_sha256: String,
}

impl ChartFile {
    pub fn new(name: ChartName, content: Bytes) -> Self {
        let checksum_sha256 = sha256_hex(&content);
        Self {
            name,
            content,
            content_type: "image/png",
            checksum_sha256,
        }
    }
}

/// Outcome of a generation run, naming the three charts it wrote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GeneratedCharts {
    pub run_id: Uuid,
    pub pie_chart: String,
    pub line_chart: String,
    pub prediction_chart: String,
}

pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

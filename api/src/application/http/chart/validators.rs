use foodcast_core::domain::chart::entities::ChartName;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DownloadChartQuery {
    /// File name returned by the generation endpoint
    #[validate(
        length(min = 1, max = 128, message = "filename must be 1 to 128 characters"),
        custom(function = "validate_chart_filename")
    )]
    pub filename: String,
}

fn validate_chart_filename(filename: &str) -> Result<(), ValidationError> {
    ChartName::parse(filename).map(|_| ()).map_err(|_| {
        ValidationError::new("chart_filename")
            .with_message("filename must be a plain .png name without path separators".into())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(filename: &str) -> DownloadChartQuery {
        DownloadChartQuery {
            filename: filename.to_string(),
        }
    }

    #[test]
    fn test_generated_names_pass() {
        assert!(query("0190f3a1b2c37d4e8f9a0b1c2d3e4f50_grafica_linea.png").validate().is_ok());
    }

    #[test]
    fn test_traversal_names_fail() {
        for name in ["", "../app.py", "..%2Fapp.png", "/etc/passwd", ".env.png", "a/b.png"] {
            assert!(query(name).validate().is_err(), "{name:?}");
        }
        assert!(query(&format!("{}.png", "x".repeat(200))).validate().is_err());
    }
}

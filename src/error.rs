use thiserror::Error;

pub type Result<T> = std::result::Result<T, GridError>;

#[derive(Debug, Error)]
pub enum GridError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown zoom level {0}, expected 0 (week), 1 (day) or 2 (hour)")]
    InvalidZoom(u8),

    #[error("grid geometry field `{field}` is out of range, got {value}")]
    InvalidGeometry { field: &'static str, value: f64 },

    #[error("invalid grid anchor {year}-{month:02}-{day:02} {hour:02}:00")]
    InvalidAnchor {
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::GridError;

    #[test]
    fn geometry_error_names_the_field() {
        let error = GridError::InvalidGeometry {
            field: "day_width",
            value: 0.0,
        };
        assert_eq!(
            error.to_string(),
            "grid geometry field `day_width` is out of range, got 0"
        );
    }

    #[test]
    fn anchor_error_is_zero_padded() {
        let error = GridError::InvalidAnchor {
            year: 2024,
            month: 2,
            day: 30,
            hour: 7,
        };
        assert_eq!(error.to_string(), "invalid grid anchor 2024-02-30 07:00");
    }
}

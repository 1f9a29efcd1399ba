use thiserror::Error;

/// Failures surfaced by palette, equivalency and harmony operations.
///
/// Empty harmony companions and short allocations are not errors; those
/// requests succeed with fewer colors.
#[derive(Debug, Error)]
pub enum PaletteError {
    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Color code '{code}' not found for brand '{brand}'")]
    NotFound { brand: String, code: String },

    #[error("No colors found for brand '{brand}' and set '{set_name}'")]
    EmptyCatalog { brand: String, set_name: String },

    #[error("Color store unavailable: {0:#}")]
    Store(#[from] anyhow::Error),
}

impl PaletteError {
    pub fn validation(message: impl Into<String>) -> Self {
        PaletteError::Validation(message.into())
    }

    /// HTTP-equivalent status for this failure.
    pub fn status(&self) -> u16 {
        match self {
            PaletteError::Validation(_) => 400,
            PaletteError::NotFound { .. } | PaletteError::EmptyCatalog { .. } => 404,
            PaletteError::Store(_) => 500,
        }
    }

    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status())
    }
}

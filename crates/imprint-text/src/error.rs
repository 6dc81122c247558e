/// Errors that can occur while laying out or rasterizing a text entity.
#[derive(Debug, Clone, PartialEq)]
pub enum TextError {
    /// Width budget or font size was not a positive, finite number.
    InvalidLayoutInput { width_budget: f32, font_size: f32 },

    /// The canvas cannot host a text entity at all.
    InvalidCanvas { width: u32, height: u32 },

    /// A raster buffer of the requested size could not be allocated.
    BufferAllocation {
        width: u32,
        height: u32,
        reason: String,
    },

    /// Font loading failed.
    FontLoad(String),

    /// Lock was poisoned (RwLock/Mutex).
    LockPoisoned(String),

    /// Configuration values are out of range.
    InvalidConfig(String),

    /// The entity was disposed and no longer owns a buffer.
    Disposed,
}

impl TextError {
    /// Recoverable errors leave the entity fully usable with its previous
    /// buffer and are reported at warning level.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, TextError::BufferAllocation { .. })
    }
}

impl std::fmt::Display for TextError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TextError::InvalidLayoutInput {
                width_budget,
                font_size,
            } => write!(
                f,
                "Invalid layout input: width budget {} px, font size {} px",
                width_budget, font_size
            ),
            TextError::InvalidCanvas { width, height } => {
                write!(f, "Invalid canvas size {}x{}", width, height)
            }
            TextError::BufferAllocation {
                width,
                height,
                reason,
            } => write!(
                f,
                "Failed to allocate {}x{} raster buffer: {}",
                width, height, reason
            ),
            TextError::FontLoad(msg) => write!(f, "Failed to load font: {}", msg),
            TextError::LockPoisoned(msg) => write!(f, "Font system lock poisoned: {}", msg),
            TextError::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
            TextError::Disposed => write!(f, "Text entity was disposed"),
        }
    }
}

impl std::error::Error for TextError {}

impl From<std::io::Error> for TextError {
    fn from(err: std::io::Error) -> Self {
        TextError::FontLoad(err.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for TextError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        TextError::LockPoisoned(err.to_string())
    }
}

/// Result type for text operations.
pub type TextResult<T> = Result<T, TextError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_allocation_failures_are_recoverable() {
        let alloc = TextError::BufferAllocation {
            width: 1,
            height: 1,
            reason: String::from("limit"),
        };
        assert!(alloc.is_recoverable());
        assert!(
            !TextError::InvalidLayoutInput {
                width_budget: 0.0,
                font_size: 12.0
            }
            .is_recoverable()
        );
    }

    #[test]
    fn test_display_mentions_dimensions() {
        let err = TextError::BufferAllocation {
            width: 600,
            height: 90000,
            reason: String::from("exceeds pixel limit"),
        };
        assert_eq!(
            err.to_string(),
            "Failed to allocate 600x90000 raster buffer: exceeds pixel limit"
        );
    }

    #[test]
    fn test_display_single_line_variants() {
        assert_eq!(
            TextError::LockPoisoned(String::from("shaper panicked")).to_string(),
            "Font system lock poisoned: shaper panicked"
        );
        assert_eq!(TextError::Disposed.to_string(), "Text entity was disposed");
        assert!(!TextError::Disposed.is_recoverable());
    }
}

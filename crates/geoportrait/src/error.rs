use core::fmt;

/// Image acquisition failure, distinct from "still loading" and from a
/// valid empty mesh so callers can fall back to the procedural silhouette.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    Decode(String),
    EmptyImage,
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decode(msg) => write!(f, "image decode failed: {msg}"),
            Self::EmptyImage => write!(f, "image or target dimensions are empty"),
        }
    }
}

impl std::error::Error for LoadError {}

impl From<image::ImageError> for LoadError {
    fn from(err: image::ImageError) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<gp_core::Error> for LoadError {
    fn from(err: gp_core::Error) -> Self {
        match err {
            gp_core::Error::EmptyImage => Self::EmptyImage,
            other => Self::Decode(other.to_string()),
        }
    }
}

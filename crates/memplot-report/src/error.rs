use std::path::Path;

use plotters::drawing::DrawingAreaErrorKind;

pub type Result<T> = std::result::Result<T, ReportError>;

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("failed to read input file: {path}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode {path} as {encoding}")]
    Decode { path: String, encoding: String },
    #[error("no usable rows parsed from: {0}")]
    NoUsableRows(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("plot render error: {0}")]
    Plot(String),
}

impl ReportError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn read(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.as_ref().display().to_string(),
            source,
        }
    }

    pub fn decode(path: impl AsRef<Path>, encoding: impl Into<String>) -> Self {
        Self::Decode {
            path: path.as_ref().display().to_string(),
            encoding: encoding.into(),
        }
    }

    /// Fatal "zero usable rows" error naming every offending input path.
    pub fn no_usable_rows<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let joined = paths
            .into_iter()
            .map(|p| p.as_ref().display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        Self::NoUsableRows(joined)
    }
}

impl<E> From<DrawingAreaErrorKind<E>> for ReportError
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn from(value: DrawingAreaErrorKind<E>) -> Self {
        Self::Plot(value.to_string())
    }
}

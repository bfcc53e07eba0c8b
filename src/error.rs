use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("graphic tag `{0}` is already registered")]
    DuplicateTag(String),

    #[error("unknown graphic tag `{0}`")]
    UnknownTag(String),

    #[error("decoration `{tag}` has unrecognized position `{position}`")]
    UnknownPosition { tag: String, position: String },

    #[error("ticker `{ticker}` cannot drive a `{scale}` scale")]
    IncompatibleTicker {
        scale: &'static str,
        ticker: &'static str,
    },

    #[error("graphic `{tag}` does not support property `{property}`")]
    PropertyMismatch { tag: String, property: String },

    #[error("graphic `{tag}` is still a mapping source for `{dependent}`")]
    MappingSourceInUse { tag: String, dependent: String },

    #[error("value outside scale domain: {0}")]
    Domain(String),

    #[error("venn input expects {expected} values, got {actual}")]
    VennInput { expected: &'static str, actual: usize },
}

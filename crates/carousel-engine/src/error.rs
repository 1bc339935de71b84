//! Engine errors

use carousel_dom::NodeId;

/// Error returned by a slider engine
#[derive(Debug, thiserror::Error)]
pub enum SliderError {
    #[error("no wrapper element inside container {0}")]
    MissingWrapper(NodeId),

    #[error("slider construction failed: {0}")]
    Construction(String),
}

/// Media condition parse error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BreakpointError {
    #[error("empty media condition")]
    Empty,

    #[error("malformed media clause: {0}")]
    Malformed(String),

    #[error("unsupported media feature: {0}")]
    UnsupportedFeature(String),

    #[error("invalid length: {0}")]
    InvalidLength(String),
}

/// Engine error
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("no slider engine available, carousel initialization aborted")]
    MissingSliderEngine,

    #[error("unknown instance: {0}")]
    UnknownInstance(String),

    #[error("failed to initialize carousel on {container}: {source}")]
    Construction {
        container: String,
        #[source]
        source: SliderError,
    },

    #[error("breakpoint rule {name}: {source}")]
    Breakpoint {
        name: String,
        #[source]
        source: BreakpointError,
    },

    #[error("invalid engine configuration: {0}")]
    Config(#[from] serde_json::Error),
}

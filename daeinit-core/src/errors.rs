use thiserror::Error;

/// Error type for invalid operations.
#[derive(Error, Debug)]
pub enum InitCondError {
    #[error("{0}")]
    Error(String),
    #[error("{point} is not in set {set}")]
    InvalidPoint { point: String, set: String },
    #[error("{component} has no index {index}")]
    MissingIndex { component: String, index: String },
    #[error("{component} has already been visited. The only way this should happen is if the model has nested blocks indexed by the same set, which is not supported.")]
    UnsupportedNesting { component: String },
    #[error("{0} discretization scheme is not supported")]
    UnsupportedScheme(String),
    #[error("Component {component} must be indexed exactly once by set {set}, found {occurrences} occurrences")]
    NotIndexed {
        component: String,
        set: String,
        occurrences: usize,
    },
    #[error("Solver failed: {0}")]
    Solver(String),
    #[error("Invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience type for `Result<T, InitCondError>`.
pub type InitCondResult<T> = Result<T, InitCondError>;

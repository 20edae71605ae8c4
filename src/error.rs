use thiserror::Error;

pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Error, Debug)]
pub enum EngineError {
    /// A component id recurred on its own ancestry chain during a tree
    /// build. Fatal to the current `process_messages` call; the affected
    /// surface's tree is set to `None` before this propagates.
    #[error("Circular dependency for component \"{id}\".")]
    CircularDependency { id: String },

    /// A message batch could not be decoded from JSON. Raised only by the
    /// explicit parse helpers, never by `process_messages` itself.
    #[error("Failed to decode message: {0}")]
    Decode(#[from] serde_json::Error),
}

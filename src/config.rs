//! Load configuration (ambient; generalizes `gltf-importer::Config`).

/// Describes how strictly the JSON body is checked before the post-load
/// pipeline runs.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ValidationStrategy {
    /// Check every invariant this crate depends on, plus recoverable but
    /// suspicious conditions (e.g. an accessor declaring a `min`/`max` of the
    /// wrong arity).
    Complete,

    /// Check only the invariants required to load without panicking or
    /// corrupting memory (in-bounds indices, in-range accessor extents).
    Minimal,

    /// Skip validation entirely. Malformed assets may panic or produce
    /// garbage geometry; only use this for assets already known to be valid.
    Skip,
}

impl Default for ValidationStrategy {
    fn default() -> Self {
        ValidationStrategy::Complete
    }
}

/// A complete load configuration.
#[derive(Clone, Debug, Default)]
pub struct Config {
    /// How strictly the JSON body is checked.
    pub validation: ValidationStrategy,

    /// Overrides the base URI used to resolve relative buffer/image URIs.
    /// When `None`, the path passed to [`crate::source::FsSource::new`] (or
    /// equivalent) is used.
    pub base_uri: Option<String>,
}

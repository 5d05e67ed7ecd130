//! High-level analysis API.
//!
//! [`Aligner`] is the primary entry point: it wraps an [`AnalysisConfig`]
//! and runs the full aggregate-locate-align-score pipeline over a set of
//! detected shapes.

use crate::config::AnalysisConfig;
use crate::pipeline::{self, AnalysisError, AnalysisResult, ShapeInput};

/// Primary analysis interface.
///
/// Create once, analyze many populations.
///
/// # Examples
///
/// ```no_run
/// use morphalign::{Aligner, ShapeInput};
///
/// let shapes: Vec<ShapeInput> = Vec::new(); // from the detection subsystem
/// let aligner = Aligner::new();
/// let result = aligner.analyze(shapes).unwrap();
/// println!("representative: {:?}", result.representative_id);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Aligner {
    config: AnalysisConfig,
}

impl Aligner {
    /// Aligner with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Aligner with an explicit configuration.
    pub fn with_config(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Mutable configuration access for field-level overrides.
    pub fn config_mut(&mut self) -> &mut AnalysisConfig {
        &mut self.config
    }

    /// Run the full population analysis.
    pub fn analyze(&self, shapes: Vec<ShapeInput>) -> Result<AnalysisResult, AnalysisError> {
        pipeline::analyze(shapes, &self.config)
    }
}

//! Custom transformers: stages, resolution, and the resolved set handed to
//! the translator.

use std::fmt;

use tsr_config::{TransformerSpec, Transformers};

use crate::error::TransformError;

/// When in the pipeline a transformer runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransformStage {
    /// Before the built-in transforms.
    Before,
    /// After the built-in transforms.
    After,
    /// On emitted declarations.
    AfterDeclarations,
}

impl fmt::Display for TransformStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformStage::Before => write!(f, "before"),
            TransformStage::After => write!(f, "after"),
            TransformStage::AfterDeclarations => write!(f, "afterDeclarations"),
        }
    }
}

/// Turns a transformer specifier into something the translator can run.
pub trait TransformResolver {
    /// What a resolved transformer is for the translator in use.
    type Transform;

    /// Resolves `specifier`, listed under `stage`.
    fn resolve(&self, specifier: &str, stage: TransformStage) -> Result<Self::Transform, TransformError>;
}

/// Resolved transformers, per stage, in configuration order.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformSet<T> {
    /// Resolved `before` transformers.
    pub before: Vec<T>,
    /// Resolved `after` transformers.
    pub after: Vec<T>,
    /// Resolved `afterDeclarations` transformers.
    pub after_declarations: Vec<T>,
}

impl<T> Default for TransformSet<T> {
    fn default() -> Self {
        Self {
            before: Vec::new(),
            after: Vec::new(),
            after_declarations: Vec::new(),
        }
    }
}

impl<T> TransformSet<T> {
    /// Resolves every spec. The first failure aborts.
    pub fn resolve<R>(specs: Option<&Transformers>, resolver: &R) -> Result<Self, TransformError>
    where
        R: TransformResolver<Transform = T> + ?Sized,
    {
        let Some(specs) = specs else {
            return Ok(Self::default());
        };

        let resolve_stage = |list: &Option<Vec<TransformerSpec>>, stage: TransformStage| {
            list.iter()
                .flatten()
                .map(|spec| {
                    tracing::debug!(transform = %spec.transform, %stage, "resolving transformer");
                    resolver.resolve(&spec.transform, stage)
                })
                .collect::<Result<Vec<_>, _>>()
        };

        Ok(Self {
            before: resolve_stage(&specs.before, TransformStage::Before)?,
            after: resolve_stage(&specs.after, TransformStage::After)?,
            after_declarations: resolve_stage(&specs.after_declarations, TransformStage::AfterDeclarations)?,
        })
    }

    /// Returns `true` if no stage holds a transformer.
    pub fn is_empty(&self) -> bool {
        self.before.is_empty() && self.after.is_empty() && self.after_declarations.is_empty()
    }
}

//! Ordered composition of same-type transformations.
//!
//! A [`PipelineBuilder`] collects stages; [`PipelineBuilder::build`] snapshots
//! them into an immutable [`Pipeline`]. The builder can keep growing after a
//! build without affecting pipelines it already produced.
//!
//! ```
//! use kiln_types::PipelineBuilder;
//!
//! let pipeline = PipelineBuilder::new()
//!     .add(|s: String| s.trim().to_string())
//!     .add(|s: String| s.to_lowercase())
//!     .build();
//! assert_eq!(pipeline.apply("  HELLO  ".to_string()), "hello");
//! ```

use std::fmt;
use std::sync::Arc;

type Stage<T> = Arc<dyn Fn(T) -> T + Send + Sync>;
type TryStage<T, E> = Arc<dyn Fn(T) -> Result<T, E> + Send + Sync>;

const UNNAMED_STAGE: &str = "<anonymous>";

#[derive(Clone)]
struct Named<S> {
    name: Arc<str>,
    stage: S,
}

fn stage_names<S>(stages: &[Named<S>]) -> Vec<&str> {
    stages.iter().map(|s| &*s.name).collect()
}

/// Accumulates stages for a [`Pipeline`].
pub struct PipelineBuilder<T> {
    stages: Vec<Named<Stage<T>>>,
}

impl<T> Default for PipelineBuilder<T> {
    fn default() -> Self {
        Self { stages: Vec::new() }
    }
}

impl<T> PipelineBuilder<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stage. Stages run in the order they were added.
    pub fn add<F>(&mut self, stage: F) -> &mut Self
    where
        F: Fn(T) -> T + Send + Sync + 'static,
    {
        self.add_named(UNNAMED_STAGE, stage)
    }

    /// Append a stage with a label that shows up in logs and [`Pipeline::stage_names`].
    pub fn add_named<F>(&mut self, name: impl Into<Arc<str>>, stage: F) -> &mut Self
    where
        F: Fn(T) -> T + Send + Sync + 'static,
    {
        self.stages.push(Named {
            name: name.into(),
            stage: Arc::new(stage),
        });
        self
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Snapshot the current stages into a pipeline.
    #[must_use]
    pub fn build(&self) -> Pipeline<T> {
        Pipeline {
            stages: self.stages.clone().into(),
        }
    }
}

impl<T> fmt::Debug for PipelineBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineBuilder")
            .field("stages", &stage_names(&self.stages))
            .finish()
    }
}

/// An immutable sequence of `T -> T` stages.
///
/// Cloning is cheap; the stage list is shared.
pub struct Pipeline<T> {
    stages: Arc<[Named<Stage<T>>]>,
}

impl<T> Clone for Pipeline<T> {
    fn clone(&self) -> Self {
        Self {
            stages: Arc::clone(&self.stages),
        }
    }
}

impl<T> Pipeline<T> {
    /// A pipeline with no stages. Returns its input unchanged.
    pub fn identity() -> Self {
        Self {
            stages: Arc::new([]),
        }
    }

    pub fn builder() -> PipelineBuilder<T> {
        PipelineBuilder::new()
    }

    /// Feed `input` through every stage, left to right.
    pub fn apply(&self, input: T) -> T {
        self.stages
            .iter()
            .fold(input, |value, named| (named.stage)(value))
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn stage_names(&self) -> Vec<&str> {
        stage_names(&self.stages)
    }

    /// Convert into a plain closure.
    pub fn into_fn(self) -> impl Fn(T) -> T {
        move |input| self.apply(input)
    }
}

impl<T> fmt::Debug for Pipeline<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("stages", &self.stage_names())
            .finish()
    }
}

/// Accumulates fallible stages for a [`TryPipeline`].
pub struct TryPipelineBuilder<T, E> {
    stages: Vec<Named<TryStage<T, E>>>,
}

impl<T, E> Default for TryPipelineBuilder<T, E> {
    fn default() -> Self {
        Self { stages: Vec::new() }
    }
}

impl<T, E> TryPipelineBuilder<T, E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<F>(&mut self, stage: F) -> &mut Self
    where
        F: Fn(T) -> Result<T, E> + Send + Sync + 'static,
    {
        self.add_named(UNNAMED_STAGE, stage)
    }

    pub fn add_named<F>(&mut self, name: impl Into<Arc<str>>, stage: F) -> &mut Self
    where
        F: Fn(T) -> Result<T, E> + Send + Sync + 'static,
    {
        self.stages.push(Named {
            name: name.into(),
            stage: Arc::new(stage),
        });
        self
    }

    /// Append an infallible stage.
    pub fn map<F>(&mut self, stage: F) -> &mut Self
    where
        F: Fn(T) -> T + Send + Sync + 'static,
    {
        self.add(move |value| Ok(stage(value)))
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    #[must_use]
    pub fn build(&self) -> TryPipeline<T, E> {
        TryPipeline {
            stages: self.stages.clone().into(),
        }
    }
}

impl<T, E> fmt::Debug for TryPipelineBuilder<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TryPipelineBuilder")
            .field("stages", &stage_names(&self.stages))
            .finish()
    }
}

/// An immutable sequence of fallible `T -> T` stages.
///
/// The first stage error is returned as-is and the remaining stages are
/// skipped.
pub struct TryPipeline<T, E> {
    stages: Arc<[Named<TryStage<T, E>>]>,
}

impl<T, E> Clone for TryPipeline<T, E> {
    fn clone(&self) -> Self {
        Self {
            stages: Arc::clone(&self.stages),
        }
    }
}

impl<T, E> TryPipeline<T, E> {
    pub fn identity() -> Self {
        Self {
            stages: Arc::new([]),
        }
    }

    pub fn apply(&self, input: T) -> Result<T, E> {
        let mut value = input;
        for (index, named) in self.stages.iter().enumerate() {
            value = match (named.stage)(value) {
                Ok(next) => next,
                Err(err) => {
                    tracing::debug!(stage = %named.name, index, "Pipeline stage failed");
                    return Err(err);
                }
            };
        }
        Ok(value)
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn stage_names(&self) -> Vec<&str> {
        stage_names(&self.stages)
    }
}

impl<T, E> fmt::Debug for TryPipeline<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TryPipeline")
            .field("stages", &self.stage_names())
            .finish()
    }
}

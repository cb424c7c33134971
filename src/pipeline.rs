//! Step sequencing for build pipelines.
//!
//! A pipeline is an ordered list of named steps, each a transformation from
//! one context to the next. The runner folds the steps over a seed context,
//! strictly in order; the first failing step aborts the rest and the error
//! propagates to the caller tagged with the step's name.

use crate::context::Context;
use anyhow::{Context as _, Result};
use thiserror::Error;

/// Errors in pipeline construction.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("pipeline has no steps")]
    Empty,
}

/// A single named transformation from one context to the next.
pub trait Step: Sync {
    fn name(&self) -> &str;

    /// Consume the incoming context and produce the next one.
    fn apply(&self, ctx: Context) -> Result<Context>;
}

/// A step backed by a closure.
pub struct FnStep<'a> {
    name: &'static str,
    run: Box<dyn Fn(Context) -> Result<Context> + Sync + 'a>,
}

/// Wrap a closure as a named step.
pub fn step<'a, F>(name: &'static str, f: F) -> FnStep<'a>
where
    F: Fn(Context) -> Result<Context> + Sync + 'a,
{
    FnStep {
        name,
        run: Box::new(f),
    }
}

impl Step for FnStep<'_> {
    fn name(&self) -> &str {
        self.name
    }

    fn apply(&self, ctx: Context) -> Result<Context> {
        (self.run)(ctx)
    }
}

/// Run `steps` in order against `seed`.
///
/// Each step receives the previous step's output; the first receives the
/// seed. Execution stops at the first failure and no partial context is
/// returned. An empty step list is a configuration error, not a no-op:
/// silently returning the seed would mask a miswired pipeline.
pub fn run<S: Step>(seed: Context, steps: &[S]) -> Result<Context> {
    if steps.is_empty() {
        return Err(PipelineError::Empty.into());
    }

    let mut ctx = seed;
    for step in steps {
        ctx = step
            .apply(ctx)
            .with_context(|| format!("step `{}` failed", step.name()))?;
    }
    Ok(ctx)
}

// ============================================================================
// Tests
// ============================================================================

//! Benchmark Cases
//!
//! A [`CaseSpec`] is the builder a caller fills in; [`Scheduler::add`](crate::Scheduler::add)
//! validates it into an immutable [`Case`]. Hooks are async closures returning
//! `Result<(), StoreError>`; they are stored behind `Arc` so a run can snapshot the case
//! list without borrowing the registry.

use crate::database::Capabilities;
use crate::error::{BenchError, StoreError};
use futures::FutureExt;
use futures::future::BoxFuture;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Future returned by every case hook
pub type HookFuture = BoxFuture<'static, Result<(), StoreError>>;

/// Hook receiving the iteration index
pub type IndexHook = Arc<dyn Fn(u64) -> HookFuture + Send + Sync>;

/// Hook receiving the case name
pub type NameHook = Arc<dyn Fn(String) -> HookFuture + Send + Sync>;

fn index_hook<F, Fut>(f: F) -> IndexHook
where
    F: Fn(u64) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), StoreError>> + Send + 'static,
{
    Arc::new(move |i| f(i).boxed())
}

fn name_hook<F, Fut>(f: F) -> NameHook
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), StoreError>> + Send + 'static,
{
    Arc::new(move |name| f(name).boxed())
}

/// Builder for a benchmark case
#[derive(Clone)]
pub struct CaseSpec {
    bulk_factor: u32,
    iterations: Option<u64>,
    requires: Capabilities,
    before: Option<NameHook>,
    pre_measure: Option<(u64, IndexHook)>,
    measure: Option<IndexHook>,
    post_measure: Option<IndexHook>,
    after: Option<NameHook>,
}

impl Default for CaseSpec {
    fn default() -> Self {
        Self {
            bulk_factor: 1,
            iterations: None,
            requires: Capabilities::empty(),
            before: None,
            pre_measure: None,
            measure: None,
            post_measure: None,
            after: None,
        }
    }
}

impl CaseSpec {
    /// Empty spec with a bulk factor of 1
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of logical operations one `measure` call performs
    pub fn bulk_factor(mut self, factor: u32) -> Self {
        self.bulk_factor = factor;
        self
    }

    /// Override the scheduler's iteration count for this case
    pub fn iterations(mut self, iterations: u64) -> Self {
        self.iterations = Some(iterations);
        self
    }

    /// Backend capabilities the case needs; it is skipped when they are missing
    pub fn requires(mut self, capabilities: Capabilities) -> Self {
        self.requires |= capabilities;
        self
    }

    /// Hook run once before any iteration
    pub fn before<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), StoreError>> + Send + 'static,
    {
        self.before = Some(name_hook(f));
        self
    }

    /// Untimed warm-up hook run `count` times before measurement
    pub fn pre_measure<F, Fut>(mut self, count: u64, f: F) -> Self
    where
        F: Fn(u64) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), StoreError>> + Send + 'static,
    {
        self.pre_measure = Some((count, index_hook(f)));
        self
    }

    /// The timed operation
    pub fn measure<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(u64) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), StoreError>> + Send + 'static,
    {
        self.measure = Some(index_hook(f));
        self
    }

    /// Untimed hook run after each measured iteration
    pub fn post_measure<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(u64) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), StoreError>> + Send + 'static,
    {
        self.post_measure = Some(index_hook(f));
        self
    }

    /// Hook run once after the case, including when it failed or was aborted
    pub fn after<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), StoreError>> + Send + 'static,
    {
        self.after = Some(name_hook(f));
        self
    }
}

impl fmt::Debug for CaseSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaseSpec")
            .field("bulk_factor", &self.bulk_factor)
            .field("iterations", &self.iterations)
            .field("requires", &self.requires)
            .field("before", &self.before.is_some())
            .field("pre_measure", &self.pre_measure.as_ref().map(|(n, _)| *n))
            .field("measure", &self.measure.is_some())
            .field("post_measure", &self.post_measure.is_some())
            .field("after", &self.after.is_some())
            .finish()
    }
}

/// A validated, immutable benchmark case
#[derive(Clone)]
pub struct Case {
    name: String,
    bulk_factor: u32,
    iterations: Option<u64>,
    requires: Capabilities,
    before: Option<NameHook>,
    pre_measure: Option<(u64, IndexHook)>,
    measure: IndexHook,
    post_measure: Option<IndexHook>,
    after: Option<NameHook>,
}

impl Case {
    /// Validate a spec into a case
    pub fn new(name: impl Into<String>, spec: CaseSpec) -> Result<Self, BenchError> {
        let name = name.into();

        let Some(measure) = spec.measure else {
            return Err(BenchError::Configuration(format!(
                "case '{name}' has no measure function"
            )));
        };
        if spec.bulk_factor == 0 {
            return Err(BenchError::Configuration(format!(
                "case '{name}' has a bulk factor of zero"
            )));
        }
        if spec.iterations == Some(0) {
            return Err(BenchError::Configuration(format!(
                "case '{name}' has an iteration count of zero"
            )));
        }
        if let Some((0, _)) = spec.pre_measure {
            return Err(BenchError::Configuration(format!(
                "case '{name}' has a pre-measure iteration count of zero"
            )));
        }

        Ok(Self {
            name,
            bulk_factor: spec.bulk_factor,
            iterations: spec.iterations,
            requires: spec.requires,
            before: spec.before,
            pre_measure: spec.pre_measure,
            measure,
            post_measure: spec.post_measure,
            after: spec.after,
        })
    }

    /// Case name, the key used in every callback
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared operations per `measure` call
    pub fn bulk_factor(&self) -> u32 {
        self.bulk_factor
    }

    /// Per-case iteration override
    pub fn iterations(&self) -> Option<u64> {
        self.iterations
    }

    /// Capabilities the case needs
    pub fn requires(&self) -> Capabilities {
        self.requires
    }

    /// Warm-up iteration count (0 when the case has no pre-measure hook)
    pub fn pre_measure_iterations(&self) -> u64 {
        self.pre_measure.as_ref().map_or(0, |(n, _)| *n)
    }

    pub(crate) fn before_hook(&self) -> Option<&NameHook> {
        self.before.as_ref()
    }

    pub(crate) fn pre_measure_hook(&self) -> Option<(u64, &IndexHook)> {
        self.pre_measure.as_ref().map(|(n, hook)| (*n, hook))
    }

    pub(crate) fn measure_hook(&self) -> &IndexHook {
        &self.measure
    }

    pub(crate) fn post_measure_hook(&self) -> Option<&IndexHook> {
        self.post_measure.as_ref()
    }

    pub(crate) fn after_hook(&self) -> Option<&NameHook> {
        self.after.as_ref()
    }
}

impl fmt::Debug for Case {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Case")
            .field("name", &self.name)
            .field("bulk_factor", &self.bulk_factor)
            .field("iterations", &self.iterations)
            .field("requires", &self.requires)
            .field("pre_measure_iterations", &self.pre_measure_iterations())
            .finish_non_exhaustive()
    }
}

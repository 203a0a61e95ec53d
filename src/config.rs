//! Engine configuration and step reporting.

use std::fmt;

use crate::math::CoordType;
use crate::mesh::{Edge, Mesh, Triangle};
use crate::supra::DEFAULT_MARGIN;

/// Checkpoints at which the engine reports its state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// A point is about to be inserted; nothing changed yet.
    BeforeCavityDetection,
    /// The bad triangles have been taken out of the mesh.
    AfterCavityRemoval,
    /// The cavity boundary is known.
    AfterBoundaryExtraction,
    /// The cavity has been filled with triangles fanning from the point.
    AfterRetriangulation,
    /// Triangles touching the supra-triangle have been dropped.
    AfterCleanup,
}

/// Snapshot handed to [`Config::on_step`] callbacks.
#[derive(Debug)]
pub struct Step<'s, T>
where
    T: CoordType,
{
    pub stage: Stage,
    /// Input index of the point being inserted, `None` during cleanup.
    pub point: Option<usize>,
    pub mesh: &'s Mesh<T>,
    /// Triangles removed or created by this stage.
    pub changed: &'s [Triangle<T>],
    /// Cavity boundary, only filled at [`Stage::AfterBoundaryExtraction`].
    pub boundary: &'s [Edge],
}

type StepCallback<'a, T> = Box<dyn FnMut(&Step<'_, T>) + 'a>;

/// Options for a triangulation run.
///
/// ```
/// use bowyer_watson::Config;
///
/// let mut stages = Vec::new();
/// let config = Config::new()
///     .margin(10.0)
///     .on_step(|step| stages.push(step.stage));
/// # drop(config);
/// ```
pub struct Config<'a, T>
where
    T: CoordType,
{
    pub(crate) debug: bool,
    pub(crate) margin: T,
    pub(crate) on_step: Option<StepCallback<'a, T>>,
}

impl<'a, T> Config<'a, T>
where
    T: CoordType,
{
    pub fn new() -> Self {
        Self {
            debug: false,
            margin: T::from(DEFAULT_MARGIN).unwrap(),
            on_step: None,
        }
    }

    /// Emit a `tracing` debug event at every checkpoint.
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Scale of the supra-triangle relative to the half extent of the input.
    pub fn margin(mut self, margin: T) -> Self {
        self.margin = margin;
        self
    }

    /// Callback invoked at every [`Stage`]. It only sees shared references,
    /// so it cannot influence the run.
    pub fn on_step<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&Step<'_, T>) + 'a,
    {
        self.on_step = Some(Box::new(callback));
        self
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    pub fn supra_margin(&self) -> T {
        self.margin
    }

    pub(crate) fn reporting(&self) -> bool {
        self.debug || self.on_step.is_some()
    }

    pub(crate) fn report(&mut self, step: Step<'_, T>) {
        if self.debug {
            tracing::debug!(
                stage = ?step.stage,
                point = ?step.point,
                live = step.mesh.len(),
                changed = step.changed.len(),
                boundary = step.boundary.len(),
                "bowyer-watson step"
            );
        }
        if let Some(callback) = self.on_step.as_mut() {
            callback(&step);
        }
    }
}

impl<T> Default for Config<'_, T>
where
    T: CoordType,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Config<'_, T>
where
    T: CoordType,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("debug", &self.debug)
            .field("margin", &self.margin)
            .field("on_step", &self.on_step.is_some())
            .finish()
    }
}

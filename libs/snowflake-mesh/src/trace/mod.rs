//! # Contour Tracing
//!
//! Walks a boundary mask from a seed cell and produces an ordered arm of
//! lattice vertices.
//!
//! ## Algorithm
//!
//! Per step, from the current position and tangent:
//! 1. Collect every mask offset whose target cell is on the boundary
//! 2. Fail with [`MeshError::StuckTracer`] if there is none
//! 3. Pick the candidate with the largest column displacement, breaking
//!    ties by alignment with the tangent, then by mask order
//! 4. Move there and make the displacement the new tangent
//!
//! The walk runs for a fixed step budget, or stops early when closure
//! detection is enabled and the walk comes back to the seed.

mod mask;


pub use mask::TraceMask;

use config::settings::TraceConfig;
use glam::IVec2;
use tracing::{debug, info, instrument, trace, warn};

use crate::error::{MeshError, MeshResult};
use crate::field::{find_seed, is_boundary, BoundaryMask};

/// How a traced arm ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Every step of the budget was taken.
    BudgetExhausted,
    /// The walk returned within the closure radius of the seed.
    Closed,
}

/// Ordered lattice vertices of one traced arm, seed first.
#[derive(Debug, Clone, PartialEq)]
pub struct Arm {
    vertices: Vec<IVec2>,
    termination: Termination,
}

impl Arm {
    /// Creates an arm from explicit vertices.
    pub fn new(vertices: Vec<IVec2>, termination: Termination) -> Self {
        Self {
            vertices,
            termination,
        }
    }

    /// Vertices in walk order.
    #[inline]
    pub fn vertices(&self) -> &[IVec2] {
        &self.vertices
    }

    /// Number of vertices, including the seed.
    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Returns true if the arm has no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn termination(&self) -> Termination {
        self.termination
    }

    /// Consumes the arm, returning its vertices.
    pub fn into_vertices(self) -> Vec<IVec2> {
        self.vertices
    }
}

/// Boundary offsets around `position` allowed by `trace_mask`, in mask order.
pub fn candidates(mask: &BoundaryMask, position: IVec2, trace_mask: &TraceMask) -> Vec<IVec2> {
    trace_mask
        .offsets()
        .iter()
        .copied()
        .filter(|&offset| is_boundary(mask, position + offset))
        .collect()
}

/// Chooses the next displacement.
///
/// Ordering is lexicographic: column displacement first, then the dot product
/// with `tangent`. On a full tie the earliest candidate wins.
///
/// # Example
///
/// ```rust
/// use glam::IVec2;
/// use snowflake_mesh::trace::select_candidate;
///
/// // Column displacement dominates tangent alignment
/// let chosen = select_candidate(&[IVec2::new(2, 0), IVec2::new(1, 1)], IVec2::new(2, 0));
/// assert_eq!(chosen, Some(IVec2::new(1, 1)));
/// ```
pub fn select_candidate(candidates: &[IVec2], tangent: IVec2) -> Option<IVec2> {
    let mut best: Option<(IVec2, (i32, i32))> = None;
    for &candidate in candidates {
        let key = (candidate.y, tangent.dot(candidate));
        match best {
            Some((_, best_key)) if key <= best_key => {}
            _ => best = Some((candidate, key)),
        }
    }
    best.map(|(candidate, _)| candidate)
}

/// Traces arms over a boundary mask.
#[derive(Debug, Clone)]
pub struct ContourTracer<'a> {
    mask: &'a BoundaryMask,
    trace_mask: TraceMask,
    seed: IVec2,
    initial_tangent: IVec2,
    steps: usize,
    closure_radius: Option<f64>,
}

impl<'a> ContourTracer<'a> {
    /// Creates a tracer seeded at the first boundary cell in row-major order.
    ///
    /// # Errors
    ///
    /// [`MeshError::EmptyBoundary`] if the mask has no marked cell.
    pub fn new(mask: &'a BoundaryMask, config: &TraceConfig) -> MeshResult<Self> {
        let seed = find_seed(mask).ok_or(MeshError::EmptyBoundary {
            rows: mask.nrows(),
            cols: mask.ncols(),
        })?;
        Ok(Self {
            mask,
            trace_mask: TraceMask::from_shape(&config.mask)?,
            seed,
            initial_tangent: IVec2::from_array(config.initial_tangent),
            steps: config.steps,
            closure_radius: config.closure_radius,
        })
    }

    /// Starts the walk from another boundary cell.
    pub fn with_seed(mut self, seed: IVec2) -> Self {
        self.seed = seed;
        self
    }

    /// Overrides the step budget.
    pub fn with_steps(mut self, steps: usize) -> Self {
        self.steps = steps;
        self
    }

    #[inline]
    pub fn seed(&self) -> IVec2 {
        self.seed
    }

    #[inline]
    pub fn trace_mask(&self) -> &TraceMask {
        &self.trace_mask
    }

    /// Returns a fresh walker positioned at the seed.
    ///
    /// Every call restarts the walk; walkers are independent.
    pub fn walk(&self) -> ArmWalker<'_> {
        ArmWalker {
            mask: self.mask,
            trace_mask: &self.trace_mask,
            seed: self.seed,
            state: WalkState {
                position: self.seed,
                tangent: self.initial_tangent,
            },
            step: 0,
            budget: self.steps,
            closure_radius: self.closure_radius,
            left_seed: false,
            emitted_seed: false,
            closed: false,
            failed: false,
        }
    }

    /// Runs the walk to completion.
    ///
    /// Returns an arm of `steps + 1` vertices, or fewer when closure
    /// detection stopped the walk at the seed.
    ///
    /// # Errors
    ///
    /// [`MeshError::StuckTracer`] with the partial arm if a step has no
    /// candidate. The walk never truncates silently.
    #[instrument(skip_all, fields(seed = ?self.seed, steps = self.steps))]
    pub fn trace(&self) -> MeshResult<Arm> {
        let mut walker = self.walk();
        let mut vertices = Vec::with_capacity(self.steps + 1);

        for item in walker.by_ref() {
            match item {
                Ok(vertex) => vertices.push(vertex),
                Err(MeshError::StuckTracer { step, row, col, .. }) => {
                    return Err(MeshError::StuckTracer {
                        step,
                        row,
                        col,
                        partial: vertices,
                    });
                }
                Err(other) => return Err(other),
            }
        }

        let termination = if walker.is_closed() {
            Termination::Closed
        } else {
            Termination::BudgetExhausted
        };
        if termination == Termination::BudgetExhausted && self.closure_radius.is_some() {
            warn!(
                steps = self.steps,
                "Step budget exhausted before the walk returned to the seed"
            );
        }

        info!(
            vertices = vertices.len(),
            ?termination,
            tip = ?vertices.last(),
            "Traced arm"
        );
        Ok(Arm::new(vertices, termination))
    }
}

/// Position and walking direction of a walk in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkState {
    pub position: IVec2,
    pub tangent: IVec2,
}

/// Lazy, finite walk along the boundary.
///
/// Yields the seed first, then one vertex per step. After an error the
/// walker is exhausted.
#[derive(Debug, Clone)]
pub struct ArmWalker<'t> {
    mask: &'t BoundaryMask,
    trace_mask: &'t TraceMask,
    seed: IVec2,
    state: WalkState,
    step: usize,
    budget: usize,
    closure_radius: Option<f64>,
    left_seed: bool,
    emitted_seed: bool,
    closed: bool,
    failed: bool,
}

impl ArmWalker<'_> {
    /// Current position and tangent.
    pub fn state(&self) -> WalkState {
        self.state
    }

    /// Number of steps taken so far.
    pub fn steps_taken(&self) -> usize {
        self.step
    }

    /// Returns true once the walk has come back to the seed.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Takes one step regardless of budget or closure.
    ///
    /// # Errors
    ///
    /// [`MeshError::StuckTracer`] with an empty partial arm if no boundary
    /// cell lies under the mask.
    pub fn step(&mut self) -> MeshResult<IVec2> {
        let WalkState { position, tangent } = self.state;
        let found = candidates(self.mask, position, self.trace_mask);

        let Some(displacement) = select_candidate(&found, tangent) else {
            return Err(MeshError::StuckTracer {
                step: self.step,
                row: position.x,
                col: position.y,
                partial: Vec::new(),
            });
        };

        let next = position + displacement;
        trace!(
            step = self.step,
            ?position,
            ?displacement,
            candidates = found.len(),
            "Tracing step"
        );
        self.state = WalkState {
            position: next,
            tangent: displacement,
        };
        self.step += 1;
        self.update_closure(next);
        Ok(next)
    }

    fn update_closure(&mut self, position: IVec2) {
        let Some(radius) = self.closure_radius else {
            return;
        };
        let distance = (position - self.seed).as_dvec2().length();
        if !self.left_seed {
            self.left_seed = distance > radius;
        } else if distance <= radius {
            debug!(step = self.step, ?position, "Walk returned to seed");
            self.closed = true;
        }
    }
}

impl Iterator for ArmWalker<'_> {
    type Item = MeshResult<IVec2>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        if !self.emitted_seed {
            self.emitted_seed = true;
            return Some(Ok(self.seed));
        }
        if self.closed || self.step >= self.budget {
            return None;
        }
        let result = self.step();
        self.failed = result.is_err();
        Some(result)
    }
}

impl std::iter::FusedIterator for ArmWalker<'_> {}

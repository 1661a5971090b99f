use crate::memory::Primitive;

/// Tracks the inertia across iterations and decides when the refine loop may
/// stop: as soon as the drop between two consecutive iterations falls below
/// the configured tolerance.
///
/// Lloyd iterations never increase the inertia, so with `tol == 0` the check
/// only fires once the inertia is bit-for-bit stable (`drop < 0` cannot occur
/// in exact arithmetic and a zero drop is not `< 0`), which means the loop
/// runs until `max_iter`.
pub(crate) struct ConvergenceCheck<T: Primitive> {
    tol: T,
    prev_inertia: T,
}

impl<T: Primitive> ConvergenceCheck<T> {
    pub fn new(tol: T) -> Self {
        Self { tol, prev_inertia: T::infinity() }
    }

    /// Feed the inertia of the iteration that just finished. Returns `true`
    /// when the fit has converged.
    pub fn converged(&mut self, inertia: T) -> bool {
        let drop = self.prev_inertia - inertia;
        self.prev_inertia = inertia;
        drop < self.tol
    }
}

use super::{Evaluation, Solution, Status};

/// Tracks the evaluation with the smallest residual magnitude.
///
/// A tracker always holds at least one evaluation, so finishing from it
/// cannot fail.
pub(crate) struct Best<I, O> {
    eval: Evaluation<I, O, 1>,
}

impl<I, O> Best<I, O> {
    /// Starts tracking from a first evaluation.
    pub(crate) fn new(eval: Evaluation<I, O, 1>) -> Self {
        Self { eval }
    }

    /// Starts from whichever of two evaluations has the smaller residual.
    pub(crate) fn of(a: Evaluation<I, O, 1>, b: Evaluation<I, O, 1>) -> Self {
        let mut best = Self::new(a);
        best.update(b);
        best
    }

    /// Replaces the tracked evaluation if `eval` has a smaller residual.
    pub(crate) fn update(&mut self, eval: Evaluation<I, O, 1>) {
        if eval.residual().abs() < self.eval.residual().abs() {
            self.eval = eval;
        }
    }

    /// Builds a solution from the tracked evaluation.
    pub(crate) fn finish(self, status: Status, iters: usize) -> Solution<I, O> {
        Solution::from_eval(self.eval, status, iters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use chemeng_core::Snapshot;

    fn eval(x: f64, residual: f64) -> Evaluation<(), (), 1> {
        Evaluation {
            x: [x],
            residuals: [residual],
            snapshot: Snapshot::new((), ()),
        }
    }

    #[test]
    fn update_keeps_best_residual() {
        let mut best = Best::new(eval(1.0, 2.0));
        best.update(eval(2.0, -1.5));
        best.update(eval(3.0, 1.0));

        let solution = best.finish(Status::StoppedByObserver, 0);

        assert_relative_eq!(solution.x, 3.0);
        assert_relative_eq!(solution.residual, 1.0);
    }

    #[test]
    fn update_ignores_worse_residual() {
        let mut best = Best::new(eval(1.0, -0.5));
        best.update(eval(2.0, 2.0));

        let solution = best.finish(Status::StoppedByObserver, 0);
        assert_relative_eq!(solution.x, 1.0);
        assert_relative_eq!(solution.residual, -0.5);
    }

    #[test]
    fn of_picks_smaller_residual() {
        let best = Best::of(eval(2.0, 5.0), eval(10.0, -91.0));
        let solution = best.finish(Status::MaxIters, 0);
        assert_relative_eq!(solution.x, 2.0);
    }

    #[test]
    fn finish_builds_solution() {
        let best = Best::new(eval(2.0, -1.25));
        let solution = best.finish(Status::Converged, 4);

        assert_eq!(solution.status, Status::Converged);
        assert_eq!(solution.iters, 4);
        assert_relative_eq!(solution.x, 2.0);
        assert_relative_eq!(solution.residual, -1.25);
    }
}

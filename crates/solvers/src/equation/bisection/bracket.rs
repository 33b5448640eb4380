use thiserror::Error;

/// Errors that can occur when validating a bracket.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum BracketError {
    /// One or both endpoints are non-finite.
    #[error("non-finite endpoint(s)")]
    NonFinite,
    /// Endpoints are equal, giving zero width.
    #[error("zero width")]
    ZeroWidth,
    /// Residual signs at the endpoints do not bracket a root.
    #[error("no sign change: r({left}) = {left_residual}, r({right}) = {right_residual}")]
    NoSignChange {
        left: f64,
        right: f64,
        left_residual: f64,
        right_residual: f64,
    },
}

/// The sign of a residual for bracket logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    /// Residual is positive (or zero).
    Positive,
    /// Residual is negative.
    Negative,
}

impl Sign {
    /// Returns the sign of a residual value.
    #[must_use]
    pub fn of(value: f64) -> Self {
        if value >= 0.0 {
            Sign::Positive
        } else {
            Sign::Negative
        }
    }
}

/// Ordered finite endpoints, validated before any evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct Bounds {
    pub(super) left: f64,
    pub(super) right: f64,
}

impl Bounds {
    /// Validates and orders the bracket endpoints.
    pub(super) fn new(bracket: [f64; 2]) -> Result<Self, BracketError> {
        let [left, right] = bracket;

        if !left.is_finite() || !right.is_finite() {
            return Err(BracketError::NonFinite);
        }

        #[allow(clippy::float_cmp)]
        if left == right {
            return Err(BracketError::ZeroWidth);
        }

        if left < right {
            Ok(Self { left, right })
        } else {
            Ok(Self {
                left: right,
                right: left,
            })
        }
    }
}

/// Current bracket bounds and the residual sign at the left end.
///
/// The right end always has the opposite sign.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct Bracket {
    left: f64,
    right: f64,
    left_sign: Sign,
}

impl Bracket {
    /// Creates a bracket from bounds and their endpoint residuals.
    pub(super) fn new(
        bounds: Bounds,
        left_residual: f64,
        right_residual: f64,
    ) -> Result<Self, BracketError> {
        let left_sign = Sign::of(left_residual);
        if left_sign == Sign::of(right_residual) {
            return Err(BracketError::NoSignChange {
                left: bounds.left,
                right: bounds.right,
                left_residual,
                right_residual,
            });
        }

        Ok(Self {
            left: bounds.left,
            right: bounds.right,
            left_sign,
        })
    }

    pub(super) fn as_array(&self) -> [f64; 2] {
        [self.left, self.right]
    }

    pub(super) fn midpoint(&self) -> f64 {
        0.5 * (self.left + self.right)
    }

    /// Returns true if the bracket width satisfies the x tolerances.
    pub(super) fn is_x_converged(&self, x_abs_tol: f64, x_rel_tol: f64) -> bool {
        self.right - self.left <= x_abs_tol + x_rel_tol * self.midpoint().abs()
    }

    /// Replaces the endpoint whose residual has the same sign as `x`'s.
    pub(super) fn shrink(&mut self, x: f64, sign: Sign) {
        if self.left_sign == sign {
            self.left = x;
        } else {
            self.right = x;
        }
    }
}

//! Fuchsian equation descriptor built over a Klein group of functions.

use std::fmt;

use crate::types::SpecialFunctionError;

/// A real function of one variable held by the equation.
pub type KleinGroupFunction = Box<dyn Fn(f64) -> f64 + Send + Sync>;

/// Fuchsian equation with `n` Klein group functions.
///
/// The Coxeter singularity index is the function count `n`; the isomorphy
/// order is `n! · 2^{n−1}`.
pub struct FuchsianEquation {
    functions: Vec<KleinGroupFunction>,
}

impl FuchsianEquation {
    /// Build from a non-empty set of functions.
    pub fn new(functions: Vec<KleinGroupFunction>) -> Result<Self, SpecialFunctionError> {
        if functions.is_empty() {
            return Err(SpecialFunctionError::OutOfDomain {
                x: 0.0,
                reason: "Fuchsian equation needs at least one function",
            });
        }
        Ok(Self { functions })
    }

    /// Number of Klein group functions.
    pub fn coxeter_singularity_index(&self) -> usize {
        self.functions.len()
    }

    /// `n! · 2^{n−1}`, or `None` on overflow.
    pub fn isomorphy_order(&self) -> Option<u128> {
        let n = self.functions.len() as u128;
        let factorial = (1..=n).try_fold(1u128, |acc, k| acc.checked_mul(k))?;
        let power = 1u128.checked_shl(u32::try_from(n - 1).ok()?)?;
        factorial.checked_mul(power)
    }

    /// Evaluate every function at `x`.
    pub fn evaluate(&self, x: f64) -> Vec<f64> {
        self.functions.iter().map(|f| f(x)).collect()
    }
}

impl fmt::Debug for FuchsianEquation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FuchsianEquation")
            .field("coxeter_singularity_index", &self.coxeter_singularity_index())
            .finish()
    }
}

//! Chemical rate laws.
//!
//! Each variant computes `dα/dt` from (extent, temperature) plus its fitted
//! parameters. Parameter vectors are positional; the expected order is part
//! of each variant's contract and is documented on `param_len`.

use crate::error::KineticError;
use crate::laws::arrhenius_rate_constant;

/// Closed registry of chemical rate laws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLaw {
    /// `dα/dt = A·exp(-Ea/RT)·(1-α)^n`, params `(A, Ea, n)`.
    NthOrder,
    /// `dα/dt = A·exp(-Ea/RT)·α^m·(1-α)^n`, params `(A, Ea, m, n)`.
    ///
    /// Undefined at extent 0: the rate is pinned at 0 and the reaction can
    /// never start, so evaluation at extent <= 0 is an error.
    Autocatalytic,
    /// Kamal equation,
    /// `dα/dt = (A1·exp(-E1/RT) + A2·exp(-E2/RT)·α^m)·(1-α)^n`,
    /// params `(A1, E1, A2, E2, m, n)`.
    Kamal,
}

impl RateLaw {
    /// Human-readable label for errors and reports.
    pub fn display_name(self) -> &'static str {
        match self {
            RateLaw::NthOrder => "nth-order",
            RateLaw::Autocatalytic => "autocatalytic",
            RateLaw::Kamal => "Kamal",
        }
    }

    /// Number of fitted parameters this law consumes from the parameter
    /// vector.
    pub fn param_len(self) -> usize {
        match self {
            RateLaw::NthOrder => 3,
            RateLaw::Autocatalytic => 4,
            RateLaw::Kamal => 6,
        }
    }

    /// Evaluate the rate at a single (extent, temperature) state.
    pub fn rate(
        self,
        extent: f64,
        temperature: f64,
        params: &[f64],
    ) -> Result<f64, KineticError> {
        self.rate_at(extent, temperature, params, 0)
    }

    /// Evaluate the rate over aligned extent/temperature series.
    pub fn rate_series(
        self,
        extent: &[f64],
        temperature: &[f64],
        params: &[f64],
    ) -> Result<Vec<f64>, KineticError> {
        if temperature.len() != extent.len() {
            return Err(KineticError::MismatchedLengths {
                context: "Rate law temperature series",
                expected: extent.len(),
                actual: temperature.len(),
            });
        }
        extent
            .iter()
            .zip(temperature)
            .enumerate()
            .map(|(i, (&a, &t))| self.rate_at(a, t, params, i))
            .collect()
    }

    fn rate_at(
        self,
        extent: f64,
        temperature: f64,
        params: &[f64],
        index: usize,
    ) -> Result<f64, KineticError> {
        match self {
            RateLaw::NthOrder => {
                let &[a, ea, n] = params else {
                    return Err(self.param_count_error(params.len()));
                };
                Ok(arrhenius_rate_constant(temperature, a, ea) * (1.0 - extent).powf(n))
            }
            RateLaw::Autocatalytic => {
                let &[a, ea, m, n] = params else {
                    return Err(self.param_count_error(params.len()));
                };
                if extent <= 0.0 {
                    return Err(KineticError::AutocatalyticExtent { extent, index });
                }
                Ok(arrhenius_rate_constant(temperature, a, ea)
                    * extent.powf(m)
                    * (1.0 - extent).powf(n))
            }
            RateLaw::Kamal => {
                let &[a1, e1, a2, e2, m, n] = params else {
                    return Err(self.param_count_error(params.len()));
                };
                let k1 = arrhenius_rate_constant(temperature, a1, e1);
                let k2 = arrhenius_rate_constant(temperature, a2, e2);
                Ok((k1 + k2 * extent.powf(m)) * (1.0 - extent).powf(n))
            }
        }
    }

    fn param_count_error(self, actual: usize) -> KineticError {
        KineticError::ParameterCount {
            law: self.display_name(),
            expected: self.param_len(),
            actual,
        }
    }
}

/// Analytic Jacobian of the Kamal rate with respect to its parameters
/// `(A1, E1, A2, E2, m, n)` at a single state, for gradient-based minimizers.
pub fn kamal_rate_jacobian(
    extent: f64,
    temperature: f64,
    params: &[f64],
) -> Result<[f64; 6], KineticError> {
    let &[a1, e1, a2, e2, m, n] = params else {
        return Err(KineticError::ParameterCount {
            law: "Kamal",
            expected: 6,
            actual: params.len(),
        });
    };
    let rt = crate::laws::GAS_CONSTANT * temperature;
    let exp1 = (-e1 / rt).exp();
    let exp2 = (-e2 / rt).exp();
    let x_m = extent.powf(m);
    let one_minus_x_n = (1.0 - extent).powf(n);
    let ln_x = extent.ln();
    let ln_one_minus_x = (1.0 - extent).ln();

    Ok([
        one_minus_x_n * exp1,
        -(a1 * one_minus_x_n * exp1) / rt,
        x_m * one_minus_x_n * exp2,
        -(a2 * x_m * one_minus_x_n * exp2) / rt,
        a2 * x_m * one_minus_x_n * ln_x * exp2,
        one_minus_x_n * ln_one_minus_x * (a2 * x_m * exp2 + a1 * exp1),
    ])
}

use std::f64;

use log::warn;

use crate::math::ln_gamma;

/// Accepted relative error for hyp1f1
const ACCEPTABLE_RTOL: f64 = 1e-9;

/// Largest argument for which the series with only positive terms is used
/// directly. Above this, the series needs too many terms to converge.
const POSITIVE_SERIES_MAX_X: f64 = 300.0;

/// Confluent hypergeometric function `1F1(a; b; x)` with fixed parameters
/// `a` and `b`, evaluated for many different values of `x`.
///
/// This is used to seed the downward recursion of
/// [`ModifiedSphericalBessel`](crate::ModifiedSphericalBessel), with `a = l +
/// 1` and `b = 2 l + 2`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hyp1F1 {
    a: f64,
    b: f64,
}

impl Hyp1F1 {
    /// Create a new `Hyp1F1` with the given parameters.
    ///
    /// # Panics
    ///
    /// If `a` or `b` are not finite, or if `b` is not positive.
    pub fn new(a: f64, b: f64) -> Hyp1F1 {
        assert!(a.is_finite() && b.is_finite(), "a and b must be finite numbers for Hyp1F1");
        assert!(b > 0.0, "b must be positive for Hyp1F1");
        Hyp1F1 { a, b }
    }

    /// Get the `a` parameter of this function
    pub fn a(&self) -> f64 {
        self.a
    }

    /// Get the `b` parameter of this function
    pub fn b(&self) -> f64 {
        self.b
    }

    /// Evaluate `1F1(a; b; x)`
    #[inline]
    pub fn calc(&self, x: f64) -> f64 {
        hyp1f1(self.a, self.b, x)
    }
}

/// Compute the 1F1 confluent hypergeometric function.
///
/// The general case is translated from scipy, and distributed under the
/// CSD-3-Clauses license, Copyright (c) 2001-2002 Enthought, Inc. 2003-2022,
/// scipy Developers.
#[allow(clippy::float_cmp)]
pub fn hyp1f1(a: f64, b: f64, x: f64) -> f64 {
    assert!(a.is_finite() && b.is_finite() && x.is_finite());
    assert!(b > 0.0, "b must be positive");

    if a == 0.0 || x == 0.0 {
        return 1.0;
    } else if a == -1.0 {
        return 1.0 - x / b;
    } else if a == b {
        return f64::exp(x);
    } else if a - b == 1.0 {
        return (1.0 + x / b) * f64::exp(x);
    } else if a <= 0.0 && a == f64::floor(a) {
        // The geometric series is finite in this case, but it could
        // still suffer from cancellation.
        return hyp1f1_series_track_convergence(a, b, x);
    }

    if a > 0.0 && x > 0.0 && x <= POSITIVE_SERIES_MAX_X {
        // all the terms of the series are positive, so there is no
        // cancellation and the sum is accurate to a few ulp. The recurrence
        // on `a` used below loses precision for large `a` and small `x`.
        return hyp1f1_series(a, b, x);
    }

    if (f64::abs(a) + 1.0) * f64::abs(x) < 0.9 * b {
        // For the kth term of the series we are multiplying by
        //
        // t_k = (a + k) * x / ((b + k) * (k + 1))
        //
        // We have that |t_k| < (|a| + 1) * |x| / |b|, which means that in
        // this branch we get geometric convergence.
        return hyp1f1_series(a, b, x);
    }

    return chgm(a, b, x);
}

fn hyp1f1_series_track_convergence(a: f64, b: f64, x: f64) -> f64 {
    let mut n_steps_to_converge = None;

    let mut term = 1.0;
    let mut result = 1.0;
    let mut abssum = result;

    for k in (0..1000).map(|k| k as f64) {
        let a_p_k = a + k;
        let b_p_k = b + k;
        if b_p_k != 0.0 {
            term *= a_p_k * x / b_p_k / (k + 1.0);
        } else if a_p_k == 0.0 {
            // The Pochammer symbol in the denominator has become zero,
            // but we still have the continuation formula DLMF 13.2.5.
            term = 0.0;
        } else {
            // We hit a pole
            return f64::NAN;
        }

        abssum += f64::abs(term);
        result += term;
        if f64::abs(term) <= f64::EPSILON * f64::abs(result) {
            n_steps_to_converge = Some(k);
            break;
        }
    }

    match n_steps_to_converge {
        Some(n_steps) if n_steps * f64::EPSILON * abssum <= ACCEPTABLE_RTOL * f64::abs(result) => result,
        Some(_) => {
            warn!("cancellation in hyp1f1 series for a={}, b={}, x={}", a, b, x);
            f64::NAN
        }
        None => {
            warn!("failed to converge hyp1f1 series for a={}, b={}, x={}", a, b, x);
            f64::NAN
        }
    }
}

fn hyp1f1_series(a: f64, b: f64, x: f64) -> f64 {
    let mut term = 1.0;
    let mut result = 1.0;

    for k in (0..1000).map(|k| k as f64) {
        term *= (a + k) * x / (b + k) / (k + 1.0);
        result += term;
        if f64::abs(term) <= f64::EPSILON * f64::abs(result) {
            return result;
        }
    }

    warn!("failed to converge hyp1f1 series for a={}, b={}, x={}", a, b, x);
    return f64::NAN;
}

/// Rust version of the CHGM fortran subroutine in scipy, combining a series
/// or an asymptotic expansion for `a` in `[0, 1]` with a recurrence on `a`.
///
/// DLMF refers to <https://dlmf.nist.gov/>
#[allow(clippy::similar_names)]
fn chgm(mut a: f64, b: f64, mut x: f64) -> f64 {
    let mut a0 = a;
    let x0 = x;

    /* DLMF 13.2.39 */
    if x < 0. {
        a = b - a;
        a0 = a;
        x = f64::abs(x);
    }

    let mut nl = 0;
    let mut la = 0;
    if a >= 2.0 {
        /* preparing terms for DLMF 13.3.1 */
        nl = 1;
        la = a as i32;
        a = a - (la as f64) - 1.0;
    }

    let mut y0 = 0.0;
    let mut y1 = 0.0;
    let mut result = 0.0;

    for n in 0..=nl {
        if a0 >= 2.0 {
            a += 1.0;
        }

        if x <= f64::abs(b) + 30.0 || a < 0.0 {
            result = 1.0;
            let mut term = 1.0;
            for j in (1..=500).map(|j| j as f64) {
                term *= (a + j - 1.) / (j * (b + j - 1.)) * x;
                result += term;
                if result != 0. && f64::abs(term / result) < 1e-15 {
                    /* DLMF 13.2.39 (cf. above) */
                    if x0 < 0.0 {
                        result *= f64::exp(x0);
                    }
                    break;
                }
            }
        } else {
            /* DLMF 13.7.2 & 13.2.4, the first sum is the one from 13.7.2 */
            let ln_gamma_a = ln_gamma(a);
            let ln_gamma_b = ln_gamma(b);
            let ln_gamma_ba = ln_gamma(b - a);

            let mut sum_1 = 1.0;
            let mut sum_2 = 1.0;
            let mut term_1 = 1.0;
            let mut term_2 = 1.0;

            // 30 terms instead of 8 in the fortran version for better
            // accuracy
            for i in (1..=30).map(|i| i as f64) {
                term_1 = -term_1 * (a + i - 1.) * (a - b + i) / (x * i);
                term_2 = -term_2 * (b - a + i - 1.) * (a - i) / (x * i);
                sum_1 += term_1;
                sum_2 += term_2;
            }

            let (hg1, hg2) = if x0 >= 0.0 {
                (
                    f64::exp(ln_gamma_b - ln_gamma_ba) * f64::powf(x, -a) * f64::cos(f64::consts::PI * a) * sum_1,
                    f64::exp(ln_gamma_b - ln_gamma_a + x) * f64::powf(x, a - b) * sum_2,
                )
            } else {
                /* DLMF 13.2.39 (cf. above) */
                (
                    f64::exp(ln_gamma_b - ln_gamma_ba + x0) * f64::powf(x, -a) * f64::cos(f64::consts::PI * a) * sum_1,
                    f64::exp(ln_gamma_b - ln_gamma_a) * f64::powf(x, a - b) * sum_2,
                )
            };
            result = hg1 + hg2;
        }

        if n == 0 {
            y0 = result;
        } else {
            y1 = result;
        }
    }

    if a0 >= 2.0 {
        /* DLMF 13.3.1 */
        for _ in 1..la {
            result = ((a * 2.0 - b + x) * y1 + (b - a) * y0) / a;
            y0 = y1;
            y1 = result;
            a += 1.0;
        }
    }

    return result;
}

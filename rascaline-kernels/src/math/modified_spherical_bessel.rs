use std::ops::Range;

use log::debug;
use ndarray::{s, Array1, Array2, ArrayView1, ArrayView2};

use crate::math::Hyp1F1;
use crate::radial_basis::ModifiedSphericalBesselParameters;
use crate::Error;

/// Bessel arguments above this value use the upward recursion, and the ones
/// below use the downward recursion.
const UPWARD_RECURSION_THRESHOLD: f64 = 50.0;

/// Values smaller than this are set to zero at the end of the calculation
const SMALL_VALUES_CUTOFF: f64 = 1e-100;

/// Below this, `sinh(z) / z` is evaluated with its Taylor series
const SMALL_ARGUMENT: f64 = 1e-4;

/// Starting point of the downward recursion: the ratio `i_{l+1}(z) / i_l(z)`
/// for the two highest orders, using the representation of modified
/// spherical Bessel functions as `1F1`:
///
/// ```text
/// i_l(z) = exp(-z) √π / (2 Γ(l + 3/2)) (z/2)^l 1F1(l + 1, 2 l + 2, 2 z)
/// ```
///
/// The gamma functions and powers of `z` cancel in the ratio, which stays
/// finite for any `l` and `z`.
#[derive(Debug, Clone)]
struct DownwardSeed {
    /// `l`, the second highest order
    order: usize,
    /// `1F1(l + 1, 2 l + 2, x)`
    lower: Hyp1F1,
    /// `1F1(l + 2, 2 l + 4, x)`
    upper: Hyp1F1,
}

impl DownwardSeed {
    fn new(order: usize) -> DownwardSeed {
        let l = order as f64;
        DownwardSeed {
            order: order,
            lower: Hyp1F1::new(l + 1.0, 2.0 * l + 2.0),
            upper: Hyp1F1::new(l + 2.0, 2.0 * l + 4.0),
        }
    }

    /// Compute `i_{l+1}(z) / i_l(z)`
    #[inline]
    fn ratio(&self, z: f64) -> f64 {
        z / (2.0 * self.order as f64 + 3.0) * self.upper.calc(2.0 * z) / self.lower.calc(2.0 * z)
    }
}

/// `sinh(z) / z` for `z > 0`
#[inline]
fn sinh_over_z(z: f64) -> f64 {
    if z < SMALL_ARGUMENT {
        let z2 = z * z;
        1.0 + z2 / 6.0 * (1.0 + z2 / 20.0)
    } else {
        f64::sinh(z) / z
    }
}

/// Modified spherical Bessel functions of the first kind `i_l`, multiplied by
/// two gaussian factors:
///
/// ```text
/// f_l(r; x_n, a) = exp(-a r^2) exp(-a x_n^2) i_l(2 a r x_n)
/// ```
///
/// for a fixed set of reference points `x_n` and all `0 <= l <= max_angular`.
/// The two exponentials "complete the square" and keep `f` finite even when
/// `i_l` itself would overflow.
///
/// Call [`ModifiedSphericalBessel::precompute`] once, then
/// [`ModifiedSphericalBessel::calc`] for every distance, and read the results
/// with [`ModifiedSphericalBessel::values`] and
/// [`ModifiedSphericalBessel::gradients`].
///
/// The functions are evaluated with the recursion relations
///
/// ```text
/// i_0(z) = sinh(z) / z
/// i_1(z) = cosh(z) / z - i_0(z) / z
/// i_l(z) = i_{l-2}(z) - (2l - 1) / z i_{l-1}(z)     (upward)
/// i_l(z) = i_{l+2}(z) + (2l + 3) / z i_{l+1}(z)     (downward)
/// ```
///
/// The upward recursion is only stable for large arguments (`z > 50`), so the
/// downward recursion is used for smaller arguments. It is applied to the
/// ratios `i_{l+1} / i_l`, starting from the ratio of the two highest orders
/// computed with the confluent hypergeometric function, and the values are
/// then rebuilt upward from `i_0(z) = sinh(z) / z`.
///
/// The gradients with respect to `r` are computed from
///
/// ```text
/// i'_0(z) = i_1(z)
/// i'_l(z) = (l i_{l-1}(z) + (l + 1) i_{l+1}(z)) / (2l + 1)
/// ```
///
/// which requires the values for one more order than `max_angular`.
///
/// A single instance must not be shared between threads while calling `calc`,
/// use one instance per thread instead (see
/// [`ParallelRadialBasis`](crate::ParallelRadialBasis)).
#[derive(Debug, Clone, Default)]
pub struct ModifiedSphericalBessel {
    max_angular: usize,
    /// Number of orders stored in `values`, `max_angular + 2` when computing
    /// gradients and `max_angular + 1` otherwise
    n_orders: usize,
    /// Reference points `x_n`, sorted in increasing order
    reference_points: Array1<f64>,
    /// Values for all reference points (rows) and orders (columns)
    values: Array2<f64>,
    /// Gradients w.r.t. the distance, only if they were requested
    gradients: Option<Array2<f64>>,
    /// Starting point of the downward recursion, `None` if there is a single
    /// order
    seed: Option<DownwardSeed>,
    /// Bessel function argument `z_n = 2 a r x_n`
    bessel_arg: Array1<f64>,
    /// `1 / z_n`
    bessel_arg_inv: Array1<f64>,
    /// `exp(-a r^2) exp(-a x_n^2)`
    prefactor: Array1<f64>,
}

impl ModifiedSphericalBessel {
    /// Create a new, empty `ModifiedSphericalBessel`. [`Self::precompute`]
    /// must be called before anything else.
    pub fn new() -> ModifiedSphericalBessel {
        ModifiedSphericalBessel::default()
    }

    /// Create a new `ModifiedSphericalBessel` ready to be used with the given
    /// `parameters`.
    pub fn with_parameters(parameters: &ModifiedSphericalBesselParameters) -> Result<ModifiedSphericalBessel, Error> {
        let mut bessel = ModifiedSphericalBessel::new();
        bessel.precompute(parameters.max_angular, &parameters.reference_points, parameters.gradients)?;
        return Ok(bessel);
    }

    /// Set the reference points and maximal angular order, and allocate the
    /// memory for all subsequent calls to `calc`.
    ///
    /// The reference points must be finite, positive, and sorted in
    /// increasing order. If `compute_gradients` is true, `calc` will also
    /// compute the gradients of the functions with respect to the distance.
    pub fn precompute(
        &mut self,
        max_angular: usize,
        reference_points: &[f64],
        compute_gradients: bool,
    ) -> Result<(), Error> {
        validate_reference_points(reference_points)?;

        let n_max = reference_points.len();
        // one extra order is needed to compute the gradients
        let n_orders = if compute_gradients { max_angular + 2 } else { max_angular + 1 };

        self.max_angular = max_angular;
        self.n_orders = n_orders;
        self.reference_points = Array1::from(reference_points.to_vec());

        self.values = Array2::zeros((n_max, n_orders));
        self.gradients = if compute_gradients {
            Some(Array2::zeros((n_max, max_angular + 1)))
        } else {
            None
        };

        self.bessel_arg = Array1::zeros(n_max);
        self.bessel_arg_inv = Array1::zeros(n_max);
        self.prefactor = Array1::zeros(n_max);

        self.seed = if n_orders >= 2 {
            Some(DownwardSeed::new(n_orders - 2))
        } else {
            None
        };

        debug!(
            "modified spherical Bessel functions: max_angular={}, {} reference points, gradients={}",
            max_angular, n_max, compute_gradients
        );

        Ok(())
    }

    /// Get the maximal angular order of the functions
    pub fn max_angular(&self) -> usize {
        self.max_angular
    }

    /// Get the reference points used in the calculation
    pub fn reference_points(&self) -> ArrayView1<'_, f64> {
        self.reference_points.view()
    }

    /// Are the gradients computed together with the values?
    pub fn compute_gradients(&self) -> bool {
        self.gradients.is_some()
    }

    /// Get the values computed by the last call to `calc`, as an array of
    /// shape `[n_reference_points, max_angular + 1]`.
    pub fn values(&self) -> ArrayView2<'_, f64> {
        // values may contain one more order, used for the gradients
        self.values.slice(s![.., ..self.max_angular + 1])
    }

    /// Get the gradients with respect to the distance computed by the last
    /// call to `calc`, with the same shape as the values. This is `None` if
    /// gradients were not requested in `precompute`.
    pub fn gradients(&self) -> Option<ArrayView2<'_, f64>> {
        self.gradients.as_ref().map(|gradients| gradients.view())
    }

    /// Compute the functions for all reference points and angular orders at
    /// the given `distance` (`r` above), using `scale` as the `a` factor.
    ///
    /// Values smaller than `1e-100` are set to zero, since the recursions
    /// lose accuracy in this regime.
    ///
    /// # Panics
    ///
    /// If `precompute` was not called, if `distance` is negative or if
    /// `scale` is not strictly positive.
    #[time_graph::instrument(name = "ModifiedSphericalBessel::calc")]
    pub fn calc(&mut self, distance: f64, scale: f64) {
        self.calc_with_threshold(distance, scale, UPWARD_RECURSION_THRESHOLD);
    }

    fn calc_with_threshold(&mut self, distance: f64, scale: f64, threshold: f64) {
        assert!(!self.reference_points.is_empty(), "precompute must be called before calc");
        assert!(distance >= 0.0 && distance.is_finite(), "distance must be a positive number, got {}", distance);
        assert!(scale > 0.0 && scale.is_finite(), "scale must be a strictly positive number, got {}", scale);

        let factor = 2.0 * scale * distance;
        for (i, &x) in self.reference_points.iter().enumerate() {
            let z = factor * x;
            self.bessel_arg[i] = z;
            self.bessel_arg_inv[i] = 1.0 / z;
        }

        // reference points are sorted, so all the zero arguments come first
        let n_max = self.reference_points.len();
        let n_zero = self.bessel_arg.iter().take_while(|&&z| z == 0.0).count();
        if n_zero > 0 {
            self.zero_argument(distance, scale, 0..n_zero);
        }

        let n_down = n_zero + self.bessel_arg.iter()
            .skip(n_zero)
            .take_while(|&&z| z <= threshold)
            .count();

        if n_down > n_zero {
            self.downward_recursion(distance, scale, n_zero..n_down);
        }

        if n_max > n_down {
            if self.n_orders == 1 {
                // the upward recursion needs at least two orders
                self.direct_order_zero(distance, scale, n_down..n_max);
            } else {
                self.upward_recursion(distance, scale, n_down..n_max);
            }
        }

        assert!(
            self.values.iter().all(|v| v.is_finite()),
            "got non-finite modified spherical Bessel function for distance={}, scale={}",
            distance, scale
        );

        self.values.mapv_inplace(|v| if v < SMALL_VALUES_CUTOFF { 0.0 } else { v });

        if self.gradients.is_some() {
            self.gradient_recursion(distance, scale);
        }
    }

    /// For `z = 0`, `i_0(0) = 1` and `i_l(0) = 0` for `l > 0`
    fn zero_argument(&mut self, distance: f64, scale: f64, rows: Range<usize>) {
        let exp_r2 = f64::exp(-scale * distance * distance);
        for i in rows {
            let x = self.reference_points[i];
            let mut row = self.values.row_mut(i);
            row.fill(0.0);
            row[0] = exp_r2 * f64::exp(-scale * x * x);
        }
    }

    /// `i_0(z) = sinh(z) / z`, expanding the gaussian factors into the
    /// hyperbolic sine
    fn direct_order_zero(&mut self, distance: f64, scale: f64, rows: Range<usize>) {
        for i in rows {
            let x = self.reference_points[i];
            let exp_minus = f64::exp(-scale * (x - distance) * (x - distance));
            let exp_plus = f64::exp(-scale * (x + distance) * (x + distance));

            self.values[[i, 0]] = (exp_minus - exp_plus) * 0.5 * self.bessel_arg_inv[i];
        }
    }

    /// Upward recursion, stable when `z > 50`. The gaussian factors are
    /// included in the starting values, which avoids overflow in `sinh(z)`
    /// and `cosh(z)`.
    fn upward_recursion(&mut self, distance: f64, scale: f64, rows: Range<usize>) {
        for i in rows {
            let x = self.reference_points[i];
            let z_inv = self.bessel_arg_inv[i];
            let exp_minus = f64::exp(-scale * (x - distance) * (x - distance));
            let exp_plus = f64::exp(-scale * (x + distance) * (x + distance));

            let mut row = self.values.row_mut(i);
            row[0] = (exp_minus - exp_plus) * 0.5 * z_inv;
            row[1] = (exp_minus + exp_plus) * 0.5 * z_inv - row[0] * z_inv;

            for order in 2..self.n_orders {
                row[order] = row[order - 2] - row[order - 1] * (2.0 * order as f64 - 1.0) * z_inv;
            }
        }
    }

    /// Downward recursion on the ratios `ρ_l = i_{l+1} / i_l`, used when
    /// `z <= 50`:
    ///
    /// ```text
    /// ρ_l = z / (2l + 3 + z ρ_{l+1})
    /// ```
    ///
    /// The values are then rebuilt upward from the exact `i_0`, without
    /// dividing by `z`. This stays accurate for arbitrarily small `z`.
    fn downward_recursion(&mut self, distance: f64, scale: f64, rows: Range<usize>) {
        let exp_r2 = f64::exp(-scale * distance * distance);
        for i in rows.clone() {
            let x = self.reference_points[i];
            self.prefactor[i] = exp_r2 * f64::exp(-scale * x * x);
        }

        for i in rows {
            let z = self.bessel_arg[i];
            let mut row = self.values.row_mut(i);

            // row[l + 1] stores ρ_l until the values are rebuilt
            if let Some(ref seed) = self.seed {
                row[seed.order + 1] = seed.ratio(z);
                for order in (0..seed.order).rev() {
                    row[order + 1] = z / (2.0 * order as f64 + 3.0 + z * row[order + 2]);
                }
            }

            row[0] = self.prefactor[i] * sinh_over_z(z);
            for order in 1..self.n_orders {
                let previous = row[order - 1];
                row[order] *= previous;
            }
        }
    }

    /// Compute the gradients w.r.t. `r` from the values:
    ///
    /// ```text
    /// df/dr = -2 a r f_l + 2 a x_n exp(-a r^2) exp(-a x_n^2) i'_l(2 a r x_n)
    /// ```
    fn gradient_recursion(&mut self, distance: f64, scale: f64) {
        let Some(gradients) = self.gradients.as_mut() else {
            return;
        };

        let r_factor = -2.0 * scale * distance;
        for (i, mut gradient) in gradients.outer_iter_mut().enumerate() {
            let x_factor = 2.0 * scale * self.reference_points[i];
            let values = self.values.row(i);

            gradient[0] = r_factor * values[0] + x_factor * values[1];
            for l in 1..=self.max_angular {
                let l_f64 = l as f64;
                let derivative = (l_f64 * values[l - 1] + (l_f64 + 1.0) * values[l + 1]) / (2.0 * l_f64 + 1.0);
                gradient[l] = r_factor * values[l] + x_factor * derivative;
            }
        }

        assert!(
            gradients.iter().all(|v| v.is_finite()),
            "got non-finite gradients of modified spherical Bessel function for distance={}, scale={}",
            distance, scale
        );
    }
}

/// Check that reference points are finite, positive and sorted
pub(crate) fn validate_reference_points(reference_points: &[f64]) -> Result<(), Error> {
    if reference_points.is_empty() {
        return Err(Error::InvalidParameter(
            "reference points can not be empty for modified spherical Bessel functions".into()
        ));
    }

    if let Some(x) = reference_points.iter().find(|x| !x.is_finite() || **x < 0.0) {
        return Err(Error::InvalidParameter(format!(
            "reference points must be positive numbers for modified spherical Bessel functions, got {}", x
        )));
    }

    if reference_points.windows(2).any(|w| w[0] > w[1]) {
        return Err(Error::InvalidParameter(
            "reference points must be sorted in increasing order for modified spherical Bessel functions".into()
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use ndarray::Array2;

    use super::ModifiedSphericalBessel;

    /// `exp(-a r^2) exp(-a x^2) i_0(2 a r x)` computed directly
    fn order_zero(distance: f64, scale: f64, x: f64) -> f64 {
        let z = 2.0 * scale * distance * x;
        f64::exp(-scale * distance * distance) * f64::exp(-scale * x * x) * f64::sinh(z) / z
    }

    #[test]
    #[should_panic = "reference points can not be empty"]
    fn empty_reference_points() {
        ModifiedSphericalBessel::new().precompute(3, &[], false).unwrap();
    }

    #[test]
    #[should_panic = "reference points must be sorted in increasing order"]
    fn unsorted_reference_points() {
        ModifiedSphericalBessel::new().precompute(3, &[1.0, 0.5], false).unwrap();
    }

    #[test]
    #[should_panic = "reference points must be positive numbers"]
    fn negative_reference_points() {
        ModifiedSphericalBessel::new().precompute(3, &[-1.0, 0.5], false).unwrap();
    }

    #[test]
    #[should_panic = "reference points must be positive numbers"]
    fn nan_reference_points() {
        ModifiedSphericalBessel::new().precompute(3, &[0.5, f64::NAN], false).unwrap();
    }

    #[test]
    #[should_panic = "precompute must be called before calc"]
    fn calc_without_precompute() {
        ModifiedSphericalBessel::new().calc(1.0, 1.0);
    }

    #[test]
    #[should_panic = "distance must be a positive number, got -1"]
    fn negative_distance() {
        let mut bessel = ModifiedSphericalBessel::new();
        bessel.precompute(3, &[0.5, 1.0], false).unwrap();
        bessel.calc(-1.0, 1.0);
    }

    #[test]
    #[should_panic = "scale must be a strictly positive number, got 0"]
    fn zero_scale() {
        let mut bessel = ModifiedSphericalBessel::new();
        bessel.precompute(3, &[0.5, 1.0], false).unwrap();
        bessel.calc(1.0, 0.0);
    }

    #[test]
    fn shapes() {
        let mut bessel = ModifiedSphericalBessel::new();
        bessel.precompute(4, &[0.5, 1.0, 1.5], false).unwrap();
        assert_eq!(bessel.max_angular(), 4);
        assert!(!bessel.compute_gradients());
        bessel.calc(1.0, 1.0);
        assert_eq!(bessel.values().shape(), [3, 5]);
        assert!(bessel.gradients().is_none());

        // precompute can be called again to change the setup
        bessel.precompute(2, &[0.5, 1.0], true).unwrap();
        assert!(bessel.compute_gradients());
        bessel.calc(1.0, 1.0);
        assert_eq!(bessel.values().shape(), [2, 3]);
        assert_eq!(bessel.gradients().unwrap().shape(), [2, 3]);
        assert_eq!(bessel.reference_points().to_vec(), [0.5, 1.0]);
    }

    #[test]
    fn closed_form_order_zero() {
        let reference_points = [0.5, 1.0, 2.0];
        let (distance, scale) = (1.0, 0.5);

        let mut bessel = ModifiedSphericalBessel::new();
        bessel.precompute(0, &reference_points, false).unwrap();
        bessel.calc(distance, scale);

        let values = bessel.values();
        for (i, &x) in reference_points.iter().enumerate() {
            assert_relative_eq!(values[[i, 0]], order_zero(distance, scale, x), max_relative=1e-14);
        }

        // the recursions give the same result for i_0
        bessel.precompute(3, &reference_points, true).unwrap();
        bessel.calc(distance, scale);

        let values = bessel.values();
        for (i, &x) in reference_points.iter().enumerate() {
            assert_relative_eq!(values[[i, 0]], order_zero(distance, scale, x), max_relative=1e-13);
        }
    }

    #[test]
    fn recursions_agree_at_threshold() {
        // 2 a r x goes from 48 to 52
        let reference_points = [4.8, 4.9, 4.95, 5.0, 5.05, 5.1, 5.2];
        let (distance, scale) = (5.0, 1.0);

        for max_angular in [1, 4, 6, 10] {
            let mut upward = ModifiedSphericalBessel::new();
            upward.precompute(max_angular, &reference_points, true).unwrap();
            upward.calc_with_threshold(distance, scale, -1.0);

            let mut downward = ModifiedSphericalBessel::new();
            downward.precompute(max_angular, &reference_points, true).unwrap();
            downward.calc_with_threshold(distance, scale, f64::INFINITY);

            assert_relative_eq!(upward.values(), downward.values(), max_relative=1e-8);
            assert_relative_eq!(
                upward.gradients().unwrap(), downward.gradients().unwrap(),
                max_relative=1e-8, epsilon=1e-12
            );
        }
    }

    #[test]
    fn small_values_are_zero() {
        let reference_points = [0.1, 0.5, 1.0, 2.0, 4.0, 8.0];
        let mut bessel = ModifiedSphericalBessel::new();
        bessel.precompute(12, &reference_points, false).unwrap();

        for &distance in &[0.0, 0.3, 1.5, 4.0, 12.0] {
            bessel.calc(distance, 3.0);
            for &value in bessel.values() {
                assert!(value == 0.0 || value >= 1e-100);
            }
        }

        // all values are far below the cutoff
        bessel.calc(30.0, 3.0);
        assert!(bessel.values().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn zero_distance() {
        let reference_points = [0.0, 0.5, 1.0];
        let mut bessel = ModifiedSphericalBessel::new();
        bessel.precompute(3, &reference_points, true).unwrap();
        bessel.calc(0.0, 1.0);

        let values = bessel.values();
        let gradients = bessel.gradients().unwrap();
        for (i, &x) in reference_points.iter().enumerate() {
            let gaussian = f64::exp(-x * x);
            assert_eq!(values[[i, 0]], gaussian);
            assert_eq!(values[[i, 1]], 0.0);
            assert_eq!(values[[i, 3]], 0.0);

            // i_1(z) ~ z / 3 around 0
            assert_eq!(gradients[[i, 0]], 0.0);
            assert_relative_eq!(gradients[[i, 1]], 2.0 * x * gaussian / 3.0);
            assert_eq!(gradients[[i, 2]], 0.0);
        }
    }

    #[test]
    fn tiny_distances() {
        let reference_points = [0.0, 0.5, 1.0, 3.0];
        let scale = 1.0;

        for max_angular in [6, 20, 40] {
            let mut bessel = ModifiedSphericalBessel::new();
            bessel.precompute(max_angular, &reference_points, true).unwrap();

            for distance in [1e-8, 1e-30] {
                bessel.calc(distance, scale);

                let values = bessel.values();
                let gradients = bessel.gradients().unwrap();
                for (i, &x) in reference_points.iter().enumerate() {
                    let gaussian = f64::exp(-scale * x * x);
                    let z = 2.0 * scale * distance * x;

                    // i_0(z) ~ 1 and i_1(z) ~ z / 3 around 0
                    assert_relative_eq!(values[[i, 0]], gaussian, max_relative=1e-12);
                    assert_relative_eq!(values[[i, 1]], gaussian * z / 3.0, max_relative=1e-12);
                    assert_relative_eq!(gradients[[i, 1]], 2.0 * scale * x * gaussian / 3.0, max_relative=1e-10);
                }

                assert!(values.iter().all(|v| v.is_finite() && *v >= 0.0));
                assert!(gradients.iter().all(|v| v.is_finite()));
            }
        }
    }

    #[test]
    fn subnormal_distance() {
        let mut bessel = ModifiedSphericalBessel::new();
        bessel.precompute(3, &[1.0], true).unwrap();
        bessel.calc(1e-320, 1.0);

        let values = bessel.values();
        assert_relative_eq!(values[[0, 0]], f64::exp(-1.0), max_relative=1e-14);
        assert_eq!(values[[0, 1]], 0.0);
        assert!(bessel.gradients().unwrap().iter().all(|v| v.is_finite()));

        bessel.precompute(0, &[0.5, 1.0], false).unwrap();
        bessel.calc(1e-320, 1.0);
        assert_relative_eq!(bessel.values()[[0, 0]], f64::exp(-0.25), max_relative=1e-14);
        assert_relative_eq!(bessel.values()[[1, 0]], f64::exp(-1.0), max_relative=1e-14);
    }

    #[test]
    fn large_max_angular() {
        let reference_points = [0.5, 1.0];
        let mut bessel = ModifiedSphericalBessel::new();
        bessel.precompute(175, &reference_points, true).unwrap();
        bessel.calc(1.0, 1.0);

        let values = bessel.values();
        assert_eq!(values.shape(), [2, 176]);
        for (i, &x) in reference_points.iter().enumerate() {
            assert_relative_eq!(values[[i, 0]], order_zero(1.0, 1.0, x), max_relative=1e-13);
        }

        assert!(values.iter().all(|v| v.is_finite() && *v >= 0.0));
        assert!(bessel.gradients().unwrap().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn finite_differences() {
        let systems = [
            (2.0, 1.0, vec![0.5, 1.0, 1.5]),
            // the last two points use the upward recursion
            (3.0, 4.0, vec![0.5, 1.0, 2.5, 3.0]),
            (0.8, 0.5, vec![0.0, 0.3, 0.9, 2.0]),
        ];

        for (distance, scale, reference_points) in systems {
            for max_angular in [0, 1, 3, 6, 8] {
                let mut bessel = ModifiedSphericalBessel::new();
                bessel.precompute(max_angular, &reference_points, true).unwrap();
                bessel.calc(distance, scale);
                let gradients = bessel.gradients().unwrap().to_owned();

                let mut values = ModifiedSphericalBessel::new();
                values.precompute(max_angular, &reference_points, false).unwrap();

                let mut finite_differences = |delta: f64| -> Array2<f64> {
                    values.calc(distance + delta, scale);
                    let plus = values.values().to_owned();
                    values.calc(distance - delta, scale);
                    let minus = values.values().to_owned();
                    (plus - minus) / (2.0 * delta)
                };

                assert_relative_eq!(finite_differences(1e-3), gradients, epsilon=1e-6);
                assert_relative_eq!(finite_differences(1e-4), gradients, epsilon=1e-8);
                assert_relative_eq!(finite_differences(1e-5), gradients, epsilon=1e-9);
            }
        }
    }

    #[test]
    fn end_to_end() {
        let reference_points = [0.5, 1.0, 1.5];
        let mut bessel = ModifiedSphericalBessel::new();
        bessel.precompute(3, &reference_points, true).unwrap();
        bessel.calc(2.0, 1.0);

        let values = bessel.values();
        assert_eq!(values.shape(), [3, 4]);
        assert!(values.iter().all(|v| v.is_finite() && *v >= 0.0));
        assert_eq!(bessel.gradients().unwrap().shape(), [3, 4]);
        assert!(bessel.gradients().unwrap().iter().all(|v| v.is_finite()));

        assert_relative_eq!(values[[0, 0]], order_zero(2.0, 1.0, 0.5), max_relative=1e-13);
    }
}

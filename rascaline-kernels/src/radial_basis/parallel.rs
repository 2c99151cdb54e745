use std::cell::RefCell;

use ndarray::{Array3, ArrayViewMut2, Axis};
use rayon::prelude::*;
use thread_local::ThreadLocal;

use crate::{Error, ModifiedSphericalBessel};
use super::ModifiedSphericalBesselParameters;

/// Values (and optionally gradients) of the radial basis for a batch of
/// distances
#[derive(Debug, Clone)]
pub struct RadialBasisBatch {
    /// Array of shape `[n_distances, n_reference_points, max_angular + 1]`
    pub values: Array3<f64>,
    /// Gradients w.r.t. the distances, with the same shape as `values`. This
    /// is only set if the gradients where requested in the parameters.
    pub gradients: Option<Array3<f64>>,
}

/// Evaluate modified spherical Bessel functions for many distances in
/// parallel, using one [`ModifiedSphericalBessel`] per thread.
pub struct ParallelRadialBasis {
    parameters: ModifiedSphericalBesselParameters,
    bessel: ThreadLocal<RefCell<ModifiedSphericalBessel>>,
}

impl std::fmt::Debug for ParallelRadialBasis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.parameters)
    }
}

impl ParallelRadialBasis {
    /// Create a new `ParallelRadialBasis` with the given parameters
    pub fn new(parameters: ModifiedSphericalBesselParameters) -> Result<ParallelRadialBasis, Error> {
        // validate parameters once in the constructor, so that we can use
        // expect("invalid parameters") in the main code.
        parameters.validate()?;

        return Ok(ParallelRadialBasis {
            parameters,
            bessel: ThreadLocal::new(),
        });
    }

    /// Get the parameters used to create this `ParallelRadialBasis`
    pub fn parameters(&self) -> &ModifiedSphericalBesselParameters {
        &self.parameters
    }

    /// Compute the radial basis for all the `distances`, with the same
    /// `scale` factor.
    #[time_graph::instrument(name = "ParallelRadialBasis::compute")]
    pub fn compute(&self, distances: &[f64], scale: f64) -> RadialBasisBatch {
        let shape = (
            distances.len(),
            self.parameters.reference_points.len(),
            self.parameters.max_angular + 1,
        );

        let mut values = Array3::from_elem(shape, 0.0);
        let mut gradients = if self.parameters.gradients {
            Some(Array3::from_elem(shape, 0.0))
        } else {
            None
        };

        if let Some(ref mut gradients) = gradients {
            values.axis_iter_mut(Axis(0)).into_par_iter()
                .zip_eq(gradients.axis_iter_mut(Axis(0)).into_par_iter())
                .zip_eq(distances.par_iter())
                .for_each(|((values, gradients), &distance)| {
                    self.compute_single(distance, scale, values, Some(gradients));
                });
        } else {
            values.axis_iter_mut(Axis(0)).into_par_iter()
                .zip_eq(distances.par_iter())
                .for_each(|(values, &distance)| {
                    self.compute_single(distance, scale, values, None);
                });
        }

        return RadialBasisBatch { values, gradients };
    }

    fn compute_single(
        &self,
        distance: f64,
        scale: f64,
        mut values: ArrayViewMut2<f64>,
        gradients: Option<ArrayViewMut2<f64>>,
    ) {
        let mut bessel = self.bessel.get_or(|| {
            let bessel = ModifiedSphericalBessel::with_parameters(&self.parameters).expect("invalid parameters");
            RefCell::new(bessel)
        }).borrow_mut();

        bessel.calc(distance, scale);
        values.assign(&bessel.values());

        if let Some(mut gradients) = gradients {
            let bessel_gradients = bessel.gradients().expect("missing gradients in ModifiedSphericalBessel");
            gradients.assign(&bessel_gradients);
        }
    }
}

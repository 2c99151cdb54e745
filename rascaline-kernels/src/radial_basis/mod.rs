//! Configuration and batch evaluation of the modified spherical Bessel
//! functions used as radial basis.
use crate::Error;
use crate::math::validate_reference_points;

mod parallel;
pub use self::parallel::{ParallelRadialBasis, RadialBasisBatch};

/// Parameters for [`ModifiedSphericalBessel`](crate::ModifiedSphericalBessel)
#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Deserialize, serde::Serialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ModifiedSphericalBesselParameters {
    /// Maximal angular order `l` of the functions
    pub max_angular: usize,
    /// Reference points `x_n`, which must be positive and sorted in
    /// increasing order
    pub reference_points: Vec<f64>,
    /// Should we also compute gradients with respect to the distance?
    #[serde(default)]
    pub gradients: bool,
}

impl ModifiedSphericalBesselParameters {
    /// Parse parameters from their JSON representation, and validate them
    pub fn from_json(json: &str) -> Result<ModifiedSphericalBesselParameters, Error> {
        let parameters = serde_json::from_str::<ModifiedSphericalBesselParameters>(json)?;
        parameters.validate()?;
        return Ok(parameters);
    }

    /// Get the JSON representation of these parameters
    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string(self)?)
    }

    /// Check that these parameters can be used to create a
    /// `ModifiedSphericalBessel`
    pub fn validate(&self) -> Result<(), Error> {
        validate_reference_points(&self.reference_points)
    }
}

//! Special functions

mod gamma;
pub use self::gamma::{gamma, ln_gamma};

mod hyp1f1;
pub use self::hyp1f1::{hyp1f1, Hyp1F1};

mod modified_spherical_bessel;
pub use self::modified_spherical_bessel::ModifiedSphericalBessel;
pub(crate) use self::modified_spherical_bessel::validate_reference_points;

//! Numerical kernels used when building atom-centered representations:
//!
//! - [`ModifiedSphericalBessel`] evaluates modified spherical Bessel functions
//!   of the first kind, multiplied by two gaussian factors, for a set of
//!   reference points and all angular orders up to `max_angular`;
//! - [`TripletPermutation`] finds the minimal set of atom orderings (and the
//!   associated weights) a three-body function has to be evaluated on, given
//!   which atoms in the triplet share the same species.

#![warn(clippy::all, clippy::pedantic)]

// disable some style lints
#![allow(clippy::needless_return, clippy::must_use_candidate, clippy::comparison_chain)]
#![allow(clippy::redundant_field_names, clippy::redundant_closure_for_method_calls)]
#![allow(clippy::unreadable_literal, clippy::option_if_let_else, clippy::range_plus_one)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc, clippy::module_name_repetitions)]

#![allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap, clippy::cast_lossless, clippy::cast_sign_loss)]

// Tests lints
#![cfg_attr(test, allow(clippy::float_cmp))]

pub mod types;
pub use types::StackVec;

pub mod math;
pub use math::{ModifiedSphericalBessel, Hyp1F1};

mod errors;
pub use self::errors::Error;

pub mod radial_basis;
pub use radial_basis::{ModifiedSphericalBesselParameters, ParallelRadialBasis, RadialBasisBatch};

pub mod permutation;
pub use permutation::{RepeatedSpecies, PairPermutation, TripletPermutation};
pub use permutation::{TripletOrdering, TripletReduction};

//! Handling of the atoms ordering inside clusters (pairs and triplets), and
//! of the symmetries coming from atoms with the same species.

mod species;
pub use self::species::RepeatedSpecies;

mod cluster;
pub use self::cluster::{PairPermutation, TripletPermutation};
pub use self::cluster::{TripletOrdering, TripletReduction};

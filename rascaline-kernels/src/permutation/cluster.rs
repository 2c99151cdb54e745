use crate::{Error, StackVec};
use super::RepeatedSpecies;

fn check_slots(slots: &[usize]) -> Result<(), Error> {
    for (i, &slot) in slots.iter().enumerate() {
        if slot >= slots.len() {
            return Err(Error::InvalidParameter(format!(
                "slot index {} is out of bounds for a cluster of {} atoms", slot, slots.len()
            )));
        }

        if slots[..i].contains(&slot) {
            return Err(Error::InvalidParameter(format!(
                "slot index {} is used more than once in {:?}", slot, slots
            )));
        }
    }

    return Ok(());
}

/// Assignment of the two atoms of a pair (as produced when iterating over a
/// minimal neighbors list, where `first < second`) to the roles a two-body
/// function uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PairPermutation {
    first: usize,
    second: usize,
}

impl PairPermutation {
    /// Create a new `PairPermutation` where the atom in slot `first` of the
    /// pair plays the first role and the atom in slot `second` the second
    /// one.
    pub fn new(first: usize, second: usize) -> Result<PairPermutation, Error> {
        check_slots(&[first, second])?;
        return Ok(PairPermutation { first, second });
    }

    /// Slot of the pair playing the first role
    pub fn first(&self) -> usize {
        self.first
    }

    /// Slot of the pair playing the second role
    pub fn second(&self) -> usize {
        self.second
    }

    /// Is the pair seen by the function inverted compared to the minimal
    /// neighbors list?
    pub fn pair_inversion(&self) -> [bool; 1] {
        [self.first > self.second]
    }

    /// Get the direction vector going from the first to the second role,
    /// given the `direction` vector stored in the minimal neighbors list.
    pub fn flip_direction<T: std::ops::Neg<Output = T>>(&self, direction: T) -> T {
        if self.pair_inversion()[0] {
            -direction
        } else {
            direction
        }
    }

    /// Map the values associated with the slots of a pair onto the roles
    pub fn apply<T: Clone>(&self, pair: &[T; 2]) -> [T; 2] {
        [pair[self.first].clone(), pair[self.second].clone()]
    }
}

/// A single ordering of the atoms in a triplet, for which a three-body
/// function should be evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TripletOrdering {
    /// Slots in the cluster of the atoms playing the `i`, `j` and `k` roles
    pub atoms: [usize; 3],
    /// Are the pairs `ij`, `jk` and `ki` inverted compared to the minimal
    /// neighbors list?
    pub inverted: [bool; 3],
}

impl TripletOrdering {
    fn new(atoms: [usize; 3]) -> TripletOrdering {
        let [i, j, k] = atoms;
        TripletOrdering {
            atoms,
            inverted: [i > j, j > k, k > i],
        }
    }

    /// Get the same ordering with the atoms in the `j` and `k` roles
    /// exchanged
    fn swap_jk(&self) -> TripletOrdering {
        let [i, j, k] = self.atoms;
        TripletOrdering::new([i, k, j])
    }

    /// Map the values associated with the slots of a cluster (atom indexes,
    /// species, positions, ...) onto the roles of this ordering
    pub fn apply<T: Clone>(&self, cluster: &[T; 3]) -> [T; 3] {
        let [i, j, k] = self.atoms;
        [cluster[i].clone(), cluster[j].clone(), cluster[k].clone()]
    }
}

/// Set of orderings of a triplet a three-body function has to be evaluated
/// on, together with the weight of each of them.
#[derive(Debug, Clone, PartialEq)]
pub struct TripletReduction {
    /// Orderings to evaluate, there are at most 6 of them
    pub orderings: StackVec<[TripletOrdering; 6]>,
    /// Weight to multiply the contribution of each ordering by
    pub weight: usize,
}

impl TripletReduction {
    /// Total number of orderings accounted for by this reduction, i.e. the
    /// number of orderings times their weight.
    pub fn contributions(&self) -> usize {
        self.orderings.len() * self.weight
    }
}

/// Assignment of the three atoms of a triplet (as produced when iterating
/// over clusters built from a minimal neighbors list) to the `i`, `j` and `k`
/// roles a three-body function uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TripletPermutation {
    leading: usize,
    second: usize,
    third: usize,
}

impl TripletPermutation {
    /// Create a new `TripletPermutation`. `leading`, `second` and `third`
    /// must be a permutation of `[0, 1, 2]`.
    pub fn new(leading: usize, second: usize, third: usize) -> Result<TripletPermutation, Error> {
        check_slots(&[leading, second, third])?;
        return Ok(TripletPermutation { leading, second, third });
    }

    /// Get the slots playing the `i`, `j` and `k` roles
    pub fn slots(&self) -> [usize; 3] {
        [self.leading, self.second, self.third]
    }

    /// Are the pairs `ij`, `jk` and `ki` inverted compared to the minimal
    /// neighbors list?
    pub fn pair_inversion(&self) -> [bool; 3] {
        TripletOrdering::new(self.slots()).inverted
    }

    /// Map the values associated with the slots of a cluster onto the roles
    pub fn apply<T: Clone>(&self, cluster: &[T; 3]) -> [T; 3] {
        TripletOrdering::new(self.slots()).apply(cluster)
    }

    /// Get the repeated species pattern as seen by the `i`, `j` and `k`
    /// roles, from the pattern of the cluster in slot order.
    pub fn permute(&self, pattern: RepeatedSpecies) -> Result<RepeatedSpecies, Error> {
        let representation = pattern.representation()?;
        return Ok(RepeatedSpecies::from_species(self.apply(&representation)));
    }

    /// Get all the orderings of a triplet a three-body function should be
    /// evaluated on, when the species of the `i`, `j` and `k` roles follow
    /// `pattern`.
    ///
    /// Orderings that give the same species to every role also give the same
    /// contribution when summed over all triplets, so only one representative
    /// of each group is returned. If the function is symmetric when
    /// exchanging `j` and `k` (`jk_indistinguishable`) and these share the
    /// same species, the swapped orderings are not evaluated and the
    /// representatives get a weight of 2. Otherwise the swapped orderings are
    /// returned as well.
    ///
    /// In `legacy` mode, the weight is always 1, matching the counting used
    /// by previous versions of the descriptors.
    pub fn triplet_orderings(
        &self,
        pattern: RepeatedSpecies,
        jk_indistinguishable: bool,
        legacy: bool,
    ) -> Result<TripletReduction, Error> {
        let [l, s, t] = self.slots();

        let representatives: StackVec<[[usize; 3]; 3]> = match pattern {
            RepeatedSpecies::NoneRepeated | RepeatedSpecies::LastTwo => [[l, s, t]].into_iter().collect(),
            RepeatedSpecies::FirstTwo => [[l, s, t], [s, l, t]].into_iter().collect(),
            RepeatedSpecies::OuterTwo => [[l, s, t], [t, s, l]].into_iter().collect(),
            RepeatedSpecies::AllSame => [[l, s, t], [s, t, l], [t, l, s]].into_iter().collect(),
            RepeatedSpecies::Unknown => return Err(Error::InvalidPattern(pattern)),
        };

        let jk_same_species = pattern.jk_same_species()?;
        let mut orderings = StackVec::new();
        for &atoms in &representatives {
            let ordering = TripletOrdering::new(atoms);
            orderings.push(ordering);
            if jk_same_species && !jk_indistinguishable {
                orderings.push(ordering.swap_jk());
            }
        }

        let weight = if jk_same_species && jk_indistinguishable && !legacy {
            2
        } else {
            1
        };

        debug_assert_eq!(orderings.len(), pattern.nb_triplet_orderings(jk_indistinguishable)?);

        return Ok(TripletReduction { orderings, weight });
    }
}

use crate::Error;

/// Pattern of repeated species in a triplet of atoms, as seen by a three-body
/// function evaluated on the atoms in a given order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(serde::Deserialize, serde::Serialize)]
pub enum RepeatedSpecies {
    /// The pattern has not been determined yet
    Unknown,
    /// All three atoms have different species
    NoneRepeated,
    /// All three atoms have the same species
    AllSame,
    /// The first and second atoms have the same species
    FirstTwo,
    /// The second and third atoms have the same species
    LastTwo,
    /// The first and third atoms have the same species
    OuterTwo,
}

impl RepeatedSpecies {
    /// All the patterns that can be used to reduce a triplet, i.e. everything
    /// except `Unknown`.
    pub const KNOWN: [RepeatedSpecies; 5] = [
        RepeatedSpecies::NoneRepeated,
        RepeatedSpecies::AllSame,
        RepeatedSpecies::FirstTwo,
        RepeatedSpecies::LastTwo,
        RepeatedSpecies::OuterTwo,
    ];

    /// Classify the species of the three atoms in a triplet
    pub fn from_species<S: PartialEq>(species: [S; 3]) -> RepeatedSpecies {
        let [first, second, third] = species;
        if first == second {
            if second == third {
                RepeatedSpecies::AllSame
            } else {
                RepeatedSpecies::FirstTwo
            }
        } else if first == third {
            RepeatedSpecies::OuterTwo
        } else if second == third {
            RepeatedSpecies::LastTwo
        } else {
            RepeatedSpecies::NoneRepeated
        }
    }

    /// Get a canonical set of species labels with this pattern, where the
    /// first atom always has the label 0.
    pub fn representation(self) -> Result<[usize; 3], Error> {
        match self {
            RepeatedSpecies::NoneRepeated => Ok([0, 1, 2]),
            RepeatedSpecies::AllSame => Ok([0, 0, 0]),
            RepeatedSpecies::FirstTwo => Ok([0, 0, 1]),
            RepeatedSpecies::LastTwo => Ok([0, 1, 1]),
            RepeatedSpecies::OuterTwo => Ok([0, 1, 0]),
            RepeatedSpecies::Unknown => Err(Error::InvalidPattern(self)),
        }
    }

    /// Do the second and third atoms (usually called `j` and `k`) share the
    /// same species?
    pub fn jk_same_species(self) -> Result<bool, Error> {
        let representation = self.representation()?;
        return Ok(representation[1] == representation[2]);
    }

    /// Number of orderings of a triplet with this pattern that need to be
    /// evaluated by a three-body function, keeping the species of each role
    /// fixed.
    ///
    /// If the function gives the same result for the triplets `ijk` and `ikj`
    /// (`jk_indistinguishable`), a single one of these is evaluated and
    /// weighted by 2; otherwise both are evaluated.
    ///
    /// Only the patterns where `j` and `k` share a species get twice as many
    /// orderings when `jk_indistinguishable` is false, not all of them. For
    /// the other patterns, exchanging `j` and `k` changes the species seen by
    /// these roles, and the swapped ordering belongs to a different species
    /// triplet. This keeps `nb_triplet_orderings(false)` equal to
    /// [`RepeatedSpecies::nb_leading_fixed_permutations`].
    pub fn nb_triplet_orderings(self, jk_indistinguishable: bool) -> Result<usize, Error> {
        let representatives = match self {
            RepeatedSpecies::NoneRepeated | RepeatedSpecies::LastTwo => 1,
            RepeatedSpecies::FirstTwo | RepeatedSpecies::OuterTwo => 2,
            RepeatedSpecies::AllSame => 3,
            RepeatedSpecies::Unknown => return Err(Error::InvalidPattern(self)),
        };

        if !jk_indistinguishable && self.jk_same_species()? {
            return Ok(2 * representatives);
        }

        return Ok(representatives);
    }

    /// Number of distinct orderings of a triplet with this pattern that give
    /// the same species for each role. This is the total contribution a
    /// reduction must account for.
    pub fn nb_leading_fixed_permutations(self) -> Result<usize, Error> {
        match self {
            RepeatedSpecies::NoneRepeated => Ok(1),
            RepeatedSpecies::FirstTwo | RepeatedSpecies::LastTwo | RepeatedSpecies::OuterTwo => Ok(2),
            RepeatedSpecies::AllSame => Ok(6),
            RepeatedSpecies::Unknown => Err(Error::InvalidPattern(self)),
        }
    }
}

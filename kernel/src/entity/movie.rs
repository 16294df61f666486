mod adults_only;
mod id;
mod name;

pub use self::{adults_only::*, id::*, name::*};
use crate::entity::{RentalId, UserAge};
use destructure::{Destructure, Mutation};
use vodca::References;

#[derive(Debug, Clone, Eq, PartialEq, References, Destructure, Mutation)]
pub struct Movie {
    id: MovieId,
    name: MovieName,
    adults_only: AdultsOnly,
    rental_id: Option<RentalId>,
}

impl Movie {
    pub fn new(
        id: MovieId,
        name: MovieName,
        adults_only: AdultsOnly,
        rental_id: Option<RentalId>,
    ) -> Self {
        Self {
            id,
            name,
            adults_only,
            rental_id,
        }
    }

    /// A movie is available while no open rental holds it.
    pub fn is_available(&self) -> bool {
        self.rental_id.is_none()
    }

    pub fn can_be_seen_by(&self, age: &UserAge) -> bool {
        !self.adults_only.as_ref() || age.is_adult()
    }
}

#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct MovieDraft {
    name: MovieName,
    adults_only: AdultsOnly,
}

impl MovieDraft {
    pub fn new(name: MovieName, adults_only: AdultsOnly) -> Self {
        Self { name, adults_only }
    }

    pub fn into_movie(self, id: MovieId) -> Movie {
        let DestructMovieDraft { name, adults_only } = self.into_destruct();
        Movie::new(id, name, adults_only, None)
    }
}

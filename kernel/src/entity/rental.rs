mod closed;
mod date;
mod id;

pub use self::{closed::*, date::*, id::*};
use crate::entity::{MovieId, UserId};
use destructure::{Destructure, Mutation};
use vodca::References;

#[derive(Debug, Clone, Eq, PartialEq, References, Destructure, Mutation)]
pub struct Rental {
    id: RentalId,
    user_id: UserId,
    date: RentalDate,
    end_date: RentalEndDate,
    closed: RentalClosed,
    movies: Vec<MovieId>,
}

impl Rental {
    pub const MAX_MOVIES: usize = 4;

    pub fn new(
        id: RentalId,
        user_id: UserId,
        date: RentalDate,
        end_date: RentalEndDate,
        closed: RentalClosed,
        movies: Vec<MovieId>,
    ) -> Self {
        Self {
            id,
            user_id,
            date,
            end_date,
            closed,
            movies,
        }
    }

    pub fn is_open(&self) -> bool {
        !self.closed.as_ref()
    }
}

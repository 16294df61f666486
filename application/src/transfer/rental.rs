use kernel::prelude::entity::{DestructRental, Rental, SelectLimit, SelectOffset};
use time::OffsetDateTime;

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct RentalDto {
    pub id: i32,
    pub user_id: i32,
    pub date: OffsetDateTime,
    pub end_date: OffsetDateTime,
    pub closed: bool,
    pub movies: Vec<i32>,
}

impl From<Rental> for RentalDto {
    fn from(value: Rental) -> Self {
        let DestructRental {
            id,
            user_id,
            date,
            end_date,
            closed,
            movies,
        } = value.into_destruct();
        Self {
            id: id.into(),
            user_id: user_id.into(),
            date: date.into(),
            end_date: end_date.into(),
            closed: closed.into(),
            movies: movies.into_iter().map(i32::from).collect(),
        }
    }
}

#[derive(Debug)]
pub struct GetAllRentalDto {
    pub limit: SelectLimit,
    pub offset: SelectOffset,
}

pub struct GetRentalDto {
    pub id: i32,
}

#[derive(Debug)]
pub struct CreateRentalDto {
    pub user_id: i32,
    pub movie_ids: Vec<i32>,
}

pub struct FinishRentalDto {
    pub rental_id: i32,
}

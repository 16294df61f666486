use crate::controller::{Intake, TryIntake};
use application::transfer::{CreateRentalDto, FinishRentalDto, GetAllRentalDto, GetRentalDto};
use error_stack::Report;
use kernel::prelude::entity::{Rental, SelectLimit, SelectOffset};
use kernel::KernelError;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequest {
    user_id: i32,
    movies_id: Vec<i32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinishRequest {
    rental_id: i32,
}

// I want to use primitive type(i64) in these fields, but default attribute not supported for literals(https://github.com/serde-rs/serde/issues/368)
#[derive(Debug, Deserialize)]
pub struct GetAllRequest {
    #[serde(default)]
    limit: SelectLimit,
    #[serde(default)]
    offset: SelectOffset,
}

#[derive(Debug)]
pub struct GetRequest {
    id: i32,
}

impl GetRequest {
    pub fn new(id: i32) -> Self {
        Self { id }
    }
}

pub struct Transformer;

impl TryIntake<CreateRequest> for Transformer {
    type To = CreateRentalDto;
    type Error = Report<KernelError>;
    fn emit(&self, input: CreateRequest) -> Result<Self::To, Self::Error> {
        let count = input.movies_id.len();
        if !(1..=Rental::MAX_MOVIES).contains(&count) {
            return Err(Report::new(KernelError::InvalidInput).attach_printable(format!(
                "A rental takes 1 to {} movies, got {count}",
                Rental::MAX_MOVIES
            )));
        }
        Ok(CreateRentalDto {
            user_id: input.user_id,
            movie_ids: input.movies_id,
        })
    }
}

impl Intake<FinishRequest> for Transformer {
    type To = FinishRentalDto;
    fn emit(&self, input: FinishRequest) -> Self::To {
        FinishRentalDto {
            rental_id: input.rental_id,
        }
    }
}

impl TryIntake<GetAllRequest> for Transformer {
    type To = GetAllRentalDto;
    type Error = Report<KernelError>;
    fn emit(&self, input: GetAllRequest) -> Result<Self::To, Self::Error> {
        let limit = i64::from(input.limit.clone());
        let offset = i64::from(input.offset.clone());
        if limit < 0 || offset < 0 {
            return Err(Report::new(KernelError::InvalidInput).attach_printable(format!(
                "Paging must not be negative, got limit={limit} offset={offset}"
            )));
        }
        Ok(GetAllRentalDto {
            limit: input.limit,
            offset: input.offset,
        })
    }
}

impl Intake<GetRequest> for Transformer {
    type To = GetRentalDto;
    fn emit(&self, input: GetRequest) -> Self::To {
        GetRentalDto { id: input.id }
    }
}

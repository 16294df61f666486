use crate::controller::Exhaust;
use application::transfer::RentalDto;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use time::OffsetDateTime;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RentalResponse {
    id: i32,
    #[serde(with = "time::serde::rfc3339")]
    date: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    end_date: OffsetDateTime,
    user_id: i32,
    closed: bool,
    movies: Vec<i32>,
}

impl From<RentalDto> for RentalResponse {
    fn from(value: RentalDto) -> Self {
        Self {
            id: value.id,
            date: value.date,
            end_date: value.end_date,
            user_id: value.user_id,
            closed: value.closed,
            movies: value.movies,
        }
    }
}

impl IntoResponse for RentalResponse {
    fn into_response(self) -> axum::response::Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse(RentalResponse);

impl IntoResponse for CreatedResponse {
    fn into_response(self) -> axum::response::Response {
        (StatusCode::CREATED, Json(self.0)).into_response()
    }
}

pub struct Presenter;

impl Exhaust<RentalDto> for Presenter {
    type To = RentalResponse;
    fn emit(&self, input: RentalDto) -> Self::To {
        RentalResponse::from(input)
    }
}

impl Exhaust<Option<RentalDto>> for Presenter {
    type To = Option<RentalResponse>;
    fn emit(&self, input: Option<RentalDto>) -> Self::To {
        input.map(RentalResponse::from)
    }
}

impl Exhaust<Vec<RentalDto>> for Presenter {
    type To = Json<Vec<RentalResponse>>;
    fn emit(&self, input: Vec<RentalDto>) -> Self::To {
        let result = input
            .into_iter()
            .map(RentalResponse::from)
            .collect::<Vec<_>>();

        Json::from(result)
    }
}

pub struct CreatedPresenter;

impl Exhaust<RentalDto> for CreatedPresenter {
    type To = CreatedResponse;
    fn emit(&self, input: RentalDto) -> Self::To {
        CreatedResponse(RentalResponse::from(input))
    }
}

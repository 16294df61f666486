mod request;
mod response;

use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::handler::AppModule;
use crate::route::rental::request::{
    CreateRequest, FinishRequest, GetAllRequest, GetRequest, Transformer,
};
use crate::route::rental::response::{CreatedPresenter, Presenter};
use application::service::{CreateRentalService, FinishRentalService, GetRentalService};
use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use error_stack::Report;
use kernel::{KernelError, Resource};

pub trait RentalRouter {
    fn route_rental(self) -> Self;
}

impl RentalRouter for Router<AppModule> {
    fn route_rental(self) -> Self {
        self.route(
            "/rentals",
            get(
                |State(module): State<AppModule>, Query(req): Query<GetAllRequest>| async move {
                    let rentals = Controller::new(Transformer, Presenter)
                        .try_intake(req)
                        .map_err(ErrorStatus::from)?
                        .handle(|dto| async move { module.database().get_all_rentals(dto).await })
                        .await
                        .map_err(ErrorStatus::from)?;
                    Ok::<_, ErrorStatus>(rentals)
                },
            )
            .post(
                |State(module): State<AppModule>, Json(req): Json<CreateRequest>| async move {
                    let created = Controller::new(Transformer, CreatedPresenter)
                        .try_intake(req)
                        .map_err(ErrorStatus::from)?
                        .handle(|dto| async move { module.database().create_rental(dto).await })
                        .await
                        .map_err(ErrorStatus::from)?;
                    Ok::<_, ErrorStatus>(created)
                },
            ),
        )
        .route(
            "/rentals/finish",
            post(
                |State(module): State<AppModule>, Json(req): Json<FinishRequest>| async move {
                    Controller::new(Transformer, Presenter)
                        .intake(req)
                        .handle(|dto| async move { module.database().finish_rental(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/rentals/:id",
            get(
                |State(module): State<AppModule>, Path(id): Path<i32>| async move {
                    Controller::new(Transformer, Presenter)
                        .intake(GetRequest::new(id))
                        .handle(|dto| async move { module.database().get_rental(dto).await })
                        .await
                        .map_err(ErrorStatus::from)?
                        .ok_or_else(|| {
                            ErrorStatus::from(Report::new(KernelError::NotFound(Resource::Rental)))
                        })
                },
            ),
        )
    }
}

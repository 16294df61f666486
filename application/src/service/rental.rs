use error_stack::Report;
use time::OffsetDateTime;

use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::query::{
    DependOnMovieQuery, DependOnRentalQuery, DependOnUserQuery, MovieQuery, RentalQuery,
    UserQuery,
};
use kernel::interface::update::{
    DependOnMovieModifier, DependOnRentalModifier, MovieModifier, RentalModifier,
};
use kernel::prelude::entity::{
    MovieId, Rental, RentalClosed, RentalDate, RentalEndDate, RentalId, UserId,
};
use kernel::{KernelError, Resource};

use crate::transfer::{
    CreateRentalDto, FinishRentalDto, GetAllRentalDto, GetRentalDto, RentalDto,
};

type TransactionOf<T> =
    <<T as DependOnDatabaseConnection>::DatabaseConnection as DatabaseConnection>::Transaction;

async fn settle<C: Transaction, T>(
    connection: C,
    result: error_stack::Result<T, KernelError>,
) -> error_stack::Result<T, KernelError> {
    match result {
        Ok(value) => {
            connection.commit().await?;
            Ok(value)
        }
        Err(report) => {
            if let Err(rollback) = connection.roll_back().await {
                tracing::error!("Failed to roll back: {rollback:?}");
            }
            Err(report)
        }
    }
}

#[async_trait::async_trait]
pub trait GetRentalService: 'static + Sync + Send + DependOnRentalQuery {
    async fn get_all_rentals(
        &self,
        dto: GetAllRentalDto,
    ) -> error_stack::Result<Vec<RentalDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let rentals = self
            .rental_query()
            .find_all(&mut connection, &dto.limit, &dto.offset)
            .await;
        let rentals = settle(connection, rentals).await?;
        Ok(rentals.into_iter().map(RentalDto::from).collect())
    }

    async fn get_rental(
        &self,
        dto: GetRentalDto,
    ) -> error_stack::Result<Option<RentalDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let id = RentalId::new(dto.id);
        let rental = self.rental_query().find_by_id(&mut connection, &id).await;
        let rental = settle(connection, rental).await?;
        Ok(rental.map(RentalDto::from))
    }
}

impl<T> GetRentalService for T where T: DependOnRentalQuery {}

#[async_trait::async_trait]
pub trait CreateRentalService:
    'static
    + Sync
    + Send
    + DependOnUserQuery
    + DependOnMovieQuery
    + DependOnMovieModifier
    + DependOnRentalQuery
    + DependOnRentalModifier
{
    /// Rents the movies to the user.
    ///
    /// Checks run in this order and the first failing one is reported:
    /// user exists, user holds no open rental, every movie exists,
    /// every movie is allowed for the user's age, every movie is available.
    async fn create_rental(
        &self,
        dto: CreateRentalDto,
    ) -> error_stack::Result<RentalDto, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let rental = self.rent_movies(&mut connection, dto).await;
        let rental = settle(connection, rental).await?;
        tracing::info!(
            "Rental {} created for user {}",
            i32::from(*rental.id()),
            i32::from(*rental.user_id())
        );
        Ok(RentalDto::from(rental))
    }

    async fn rent_movies(
        &self,
        connection: &mut TransactionOf<Self>,
        dto: CreateRentalDto,
    ) -> error_stack::Result<Rental, KernelError> {
        let user_id = UserId::new(dto.user_id);

        let mut movie_ids: Vec<MovieId> = Vec::with_capacity(dto.movie_ids.len());
        for id in dto.movie_ids.into_iter().map(MovieId::new) {
            if !movie_ids.contains(&id) {
                movie_ids.push(id);
            }
        }
        if movie_ids.is_empty() {
            return Err(Report::new(KernelError::InvalidInput)
                .attach_printable("A rental needs at least one movie"));
        }

        let user = self
            .user_query()
            .find_by_id(connection, &user_id)
            .await?
            .ok_or_else(|| {
                Report::new(KernelError::NotFound(Resource::User))
                    .attach_printable(format!("user_id: {}", dto.user_id))
            })?;

        let rentals = self
            .rental_query()
            .find_by_user_id(connection, &user_id)
            .await?;
        if let Some(open) = rentals.iter().find(|rental| rental.is_open()) {
            return Err(Report::new(KernelError::PendentRental)
                .attach_printable(format!("open rental: {}", i32::from(*open.id()))));
        }

        let now = OffsetDateTime::now_utc();
        let age = user.birth_date().age_at(now.date());

        let mut movies = Vec::with_capacity(movie_ids.len());
        for id in &movie_ids {
            let movie = self
                .movie_query()
                .find_by_id(connection, id)
                .await?
                .ok_or_else(|| {
                    Report::new(KernelError::NotFound(Resource::Movie))
                        .attach_printable(format!("movie_id: {}", i32::from(*id)))
                })?;
            movies.push(movie);
        }

        if let Some(movie) = movies.iter().find(|movie| !movie.can_be_seen_by(&age)) {
            return Err(Report::new(KernelError::InsufficientAge).attach_printable(format!(
                "movie {} is adults only, user is {}",
                i32::from(*movie.id()),
                i32::from(age)
            )));
        }
        if let Some(movie) = movies.iter().find(|movie| !movie.is_available()) {
            return Err(Report::new(KernelError::MovieInRental)
                .attach_printable(format!("movie_id: {}", i32::from(*movie.id()))));
        }

        let date = RentalDate::new(now);
        let end_date = RentalEndDate::starting_at(&date);
        let rental = self
            .rental_modifier()
            .create(connection, &user_id, &movie_ids, &date, &end_date)
            .await?;
        self.movie_modifier()
            .attach(connection, &movie_ids, rental.id())
            .await?;

        Ok(rental)
    }
}

impl<T> CreateRentalService for T where
    T: DependOnUserQuery
        + DependOnMovieQuery
        + DependOnMovieModifier
        + DependOnRentalQuery
        + DependOnRentalModifier
{
}

#[async_trait::async_trait]
pub trait FinishRentalService:
    'static + Sync + Send + DependOnRentalQuery + DependOnRentalModifier + DependOnMovieModifier
{
    /// Closes the rental and makes its movies available again.
    /// Finishing a closed rental changes nothing.
    async fn finish_rental(
        &self,
        dto: FinishRentalDto,
    ) -> error_stack::Result<RentalDto, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let rental = self.close_rental(&mut connection, dto).await;
        let rental = settle(connection, rental).await?;
        Ok(RentalDto::from(rental))
    }

    async fn close_rental(
        &self,
        connection: &mut TransactionOf<Self>,
        dto: FinishRentalDto,
    ) -> error_stack::Result<Rental, KernelError> {
        let rental_id = RentalId::new(dto.rental_id);
        let rental = self
            .rental_query()
            .find_by_id(connection, &rental_id)
            .await?
            .ok_or_else(|| {
                Report::new(KernelError::NotFound(Resource::Rental))
                    .attach_printable(format!("rental_id: {}", dto.rental_id))
            })?;

        if !rental.is_open() {
            tracing::debug!("Rental {} is already closed", dto.rental_id);
            return Ok(rental);
        }

        self.rental_modifier()
            .close(connection, &rental_id)
            .await?;
        self.movie_modifier()
            .release(connection, &rental_id)
            .await?;
        tracing::info!("Rental {} finished", dto.rental_id);

        Ok(rental.reconstruct(|rental| rental.closed = RentalClosed::new(true)))
    }
}

impl<T> FinishRentalService for T where
    T: DependOnRentalQuery + DependOnRentalModifier + DependOnMovieModifier
{
}

use error_stack::Report;
use sqlx::PgConnection;

use kernel::interface::query::MovieQuery;
use kernel::interface::update::MovieModifier;
use kernel::prelude::entity::{AdultsOnly, Movie, MovieDraft, MovieId, MovieName, RentalId};
use kernel::KernelError;

use crate::database::postgres::PostgresConnection;
use crate::error::ConvertError;

pub struct PostgresMovieRepository;

#[async_trait::async_trait]
impl MovieQuery for PostgresMovieRepository {
    type Transaction = PostgresConnection;
    async fn find_by_id(
        &self,
        con: &mut PostgresConnection,
        id: &MovieId,
    ) -> error_stack::Result<Option<Movie>, KernelError> {
        PgMovieInternal::find_by_id(con, id).await
    }
}

#[async_trait::async_trait]
impl MovieModifier for PostgresMovieRepository {
    type Transaction = PostgresConnection;
    async fn create(
        &self,
        con: &mut PostgresConnection,
        movie: &MovieDraft,
    ) -> error_stack::Result<Movie, KernelError> {
        PgMovieInternal::create(con, movie).await
    }

    async fn attach(
        &self,
        con: &mut PostgresConnection,
        movie_ids: &[MovieId],
        rental_id: &RentalId,
    ) -> error_stack::Result<(), KernelError> {
        PgMovieInternal::attach(con, movie_ids, rental_id).await
    }

    async fn release(
        &self,
        con: &mut PostgresConnection,
        rental_id: &RentalId,
    ) -> error_stack::Result<(), KernelError> {
        PgMovieInternal::release(con, rental_id).await
    }
}

#[derive(sqlx::FromRow)]
struct MovieRow {
    id: i32,
    name: String,
    adults_only: bool,
    rental_id: Option<i32>,
}

impl From<MovieRow> for Movie {
    fn from(value: MovieRow) -> Self {
        Movie::new(
            MovieId::new(value.id),
            MovieName::new(value.name),
            AdultsOnly::new(value.adults_only),
            value.rental_id.map(RentalId::new),
        )
    }
}

pub(in crate::database) struct PgMovieInternal;

impl PgMovieInternal {
    async fn find_by_id(
        con: &mut PgConnection,
        id: &MovieId,
    ) -> error_stack::Result<Option<Movie>, KernelError> {
        let row = sqlx::query_as::<_, MovieRow>(
            // language=postgresql
            r#"
            SELECT id, name, adults_only, rental_id
            FROM movies
            WHERE id = $1
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        Ok(row.map(Movie::from))
    }

    async fn create(
        con: &mut PgConnection,
        movie: &MovieDraft,
    ) -> error_stack::Result<Movie, KernelError> {
        let id = sqlx::query_scalar::<_, i32>(
            // language=postgresql
            r#"
            INSERT INTO movies (name, adults_only)
            VALUES ($1, $2)
            RETURNING id
            "#,
        )
        .bind(movie.name().as_ref())
        .bind(movie.adults_only().as_ref())
        .fetch_one(con)
        .await
        .convert_error()?;
        Ok(movie.clone().into_movie(MovieId::new(id)))
    }

    async fn attach(
        con: &mut PgConnection,
        movie_ids: &[MovieId],
        rental_id: &RentalId,
    ) -> error_stack::Result<(), KernelError> {
        let ids = movie_ids.iter().copied().map(i32::from).collect::<Vec<i32>>();
        // The availability condition is re-checked here, under the row locks of the update.
        let claimed = sqlx::query(
            // language=postgresql
            r#"
            UPDATE movies
            SET rental_id = $1
            WHERE id = ANY($2) AND rental_id IS NULL
            "#,
        )
        .bind(rental_id.as_ref())
        .bind(&ids)
        .execute(con)
        .await
        .convert_error()?
        .rows_affected();

        if usize::try_from(claimed).ok() != Some(ids.len()) {
            return Err(Report::new(KernelError::MovieInRental).attach_printable(format!(
                "claimed {claimed} of {} movies for rental {}",
                ids.len(),
                i32::from(*rental_id)
            )));
        }
        Ok(())
    }

    async fn release(
        con: &mut PgConnection,
        rental_id: &RentalId,
    ) -> error_stack::Result<(), KernelError> {
        sqlx::query(
            // language=postgresql
            r#"
            UPDATE movies
            SET rental_id = NULL
            WHERE rental_id = $1
            "#,
        )
        .bind(rental_id.as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }
}

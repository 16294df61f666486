use error_stack::Report;
use sqlx::PgConnection;
use time::OffsetDateTime;

use kernel::interface::query::RentalQuery;
use kernel::interface::update::RentalModifier;
use kernel::prelude::entity::{
    MovieId, Rental, RentalClosed, RentalDate, RentalEndDate, RentalId, SelectLimit,
    SelectOffset, UserId,
};
use kernel::KernelError;

use crate::database::postgres::PostgresConnection;
use crate::error::ConvertError;

pub struct PostgresRentalRepository;

#[async_trait::async_trait]
impl RentalQuery for PostgresRentalRepository {
    type Transaction = PostgresConnection;

    async fn find_all(
        &self,
        con: &mut PostgresConnection,
        limit: &SelectLimit,
        offset: &SelectOffset,
    ) -> error_stack::Result<Vec<Rental>, KernelError> {
        PgRentalInternal::find_all(con, limit, offset).await
    }

    async fn find_by_id(
        &self,
        con: &mut PostgresConnection,
        id: &RentalId,
    ) -> error_stack::Result<Option<Rental>, KernelError> {
        PgRentalInternal::find_by_id(con, id).await
    }

    async fn find_by_user_id(
        &self,
        con: &mut PostgresConnection,
        user_id: &UserId,
    ) -> error_stack::Result<Vec<Rental>, KernelError> {
        PgRentalInternal::find_by_user_id(con, user_id).await
    }
}

#[async_trait::async_trait]
impl RentalModifier for PostgresRentalRepository {
    type Transaction = PostgresConnection;

    async fn create(
        &self,
        con: &mut PostgresConnection,
        user_id: &UserId,
        movie_ids: &[MovieId],
        date: &RentalDate,
        end_date: &RentalEndDate,
    ) -> error_stack::Result<Rental, KernelError> {
        PgRentalInternal::create(con, user_id, movie_ids, date, end_date).await
    }

    async fn close(
        &self,
        con: &mut PostgresConnection,
        rental_id: &RentalId,
    ) -> error_stack::Result<(), KernelError> {
        PgRentalInternal::close(con, rental_id).await
    }
}

#[derive(sqlx::FromRow)]
struct RentalRow {
    id: i32,
    user_id: i32,
    date: OffsetDateTime,
    end_date: OffsetDateTime,
    closed: bool,
    movies: Vec<i32>,
}

impl From<RentalRow> for Rental {
    fn from(value: RentalRow) -> Self {
        Rental::new(
            RentalId::new(value.id),
            UserId::new(value.user_id),
            RentalDate::new(value.date),
            RentalEndDate::new(value.end_date),
            RentalClosed::new(value.closed),
            value.movies.into_iter().map(MovieId::new).collect(),
        )
    }
}

pub(in crate::database) struct PgRentalInternal;

impl PgRentalInternal {
    async fn find_all(
        con: &mut PgConnection,
        limit: &SelectLimit,
        offset: &SelectOffset,
    ) -> error_stack::Result<Vec<Rental>, KernelError> {
        let rows = sqlx::query_as::<_, RentalRow>(
            // language=postgresql
            r#"
            SELECT
                rentals.id,
                rentals.user_id,
                rentals.date,
                rentals.end_date,
                rentals.closed,
                COALESCE(
                    array_agg(rental_movies.movie_id ORDER BY rental_movies.position)
                        FILTER (WHERE rental_movies.movie_id IS NOT NULL),
                    '{}'
                ) AS movies
            FROM
                rentals
                LEFT JOIN rental_movies ON rental_movies.rental_id = rentals.id
            GROUP BY rentals.id
            ORDER BY rentals.id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit.as_ref())
        .bind(offset.as_ref())
        .fetch_all(con)
        .await
        .convert_error()?;
        Ok(rows.into_iter().map(Rental::from).collect())
    }

    async fn find_by_id(
        con: &mut PgConnection,
        id: &RentalId,
    ) -> error_stack::Result<Option<Rental>, KernelError> {
        let row = sqlx::query_as::<_, RentalRow>(
            // language=postgresql
            r#"
            SELECT
                rentals.id,
                rentals.user_id,
                rentals.date,
                rentals.end_date,
                rentals.closed,
                COALESCE(
                    array_agg(rental_movies.movie_id ORDER BY rental_movies.position)
                        FILTER (WHERE rental_movies.movie_id IS NOT NULL),
                    '{}'
                ) AS movies
            FROM
                rentals
                LEFT JOIN rental_movies ON rental_movies.rental_id = rentals.id
            WHERE
                rentals.id = $1
            GROUP BY rentals.id
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        Ok(row.map(Rental::from))
    }

    async fn find_by_user_id(
        con: &mut PgConnection,
        user_id: &UserId,
    ) -> error_stack::Result<Vec<Rental>, KernelError> {
        let rows = sqlx::query_as::<_, RentalRow>(
            // language=postgresql
            r#"
            SELECT
                rentals.id,
                rentals.user_id,
                rentals.date,
                rentals.end_date,
                rentals.closed,
                COALESCE(
                    array_agg(rental_movies.movie_id ORDER BY rental_movies.position)
                        FILTER (WHERE rental_movies.movie_id IS NOT NULL),
                    '{}'
                ) AS movies
            FROM
                rentals
                LEFT JOIN rental_movies ON rental_movies.rental_id = rentals.id
            WHERE
                rentals.user_id = $1
            GROUP BY rentals.id
            ORDER BY rentals.id
            "#,
        )
        .bind(user_id.as_ref())
        .fetch_all(con)
        .await
        .convert_error()?;
        Ok(rows.into_iter().map(Rental::from).collect())
    }

    async fn create(
        con: &mut PgConnection,
        user_id: &UserId,
        movie_ids: &[MovieId],
        date: &RentalDate,
        end_date: &RentalEndDate,
    ) -> error_stack::Result<Rental, KernelError> {
        let id = sqlx::query_scalar::<_, i32>(
            // language=postgresql
            r#"
            INSERT INTO rentals (user_id, date, end_date)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(user_id.as_ref())
        .bind(date.as_ref())
        .bind(end_date.as_ref())
        .fetch_one(&mut *con)
        .await
        .convert_error()?;

        let ids = movie_ids.iter().copied().map(i32::from).collect::<Vec<i32>>();
        sqlx::query(
            // language=postgresql
            r#"
            INSERT INTO rental_movies (rental_id, movie_id, position)
            SELECT $1, movie.id, movie.ord::INTEGER
            FROM UNNEST($2::INTEGER[]) WITH ORDINALITY AS movie(id, ord)
            "#,
        )
        .bind(id)
        .bind(&ids)
        .execute(&mut *con)
        .await
        .convert_error()?;

        let id = RentalId::new(id);
        Self::find_by_id(con, &id).await?.ok_or_else(|| {
            Report::new(KernelError::Internal)
                .attach_printable(format!("Rental {} vanished after insert", i32::from(id)))
        })
    }

    async fn close(
        con: &mut PgConnection,
        rental_id: &RentalId,
    ) -> error_stack::Result<(), KernelError> {
        sqlx::query(
            // language=postgresql
            r#"
            UPDATE rentals
            SET closed = TRUE
            WHERE id = $1
            "#,
        )
        .bind(rental_id.as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use time::macros::date;
    use time::OffsetDateTime;

    use kernel::interface::database::{DatabaseConnection, Transaction};
    use kernel::interface::query::RentalQuery;
    use kernel::interface::update::{MovieModifier, RentalModifier, UserModifier};
    use kernel::prelude::entity::{RentalDate, RentalEndDate, SelectLimit, SelectOffset};
    use kernel::KernelError;

    use crate::database::postgres::{
        fixture, PostgresDatabase, PostgresMovieRepository, PostgresRentalRepository,
        PostgresUserRepository,
    };

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn create_and_close() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        let mut con = db.transact().await?;

        let user = PostgresUserRepository
            .create(&mut con, &fixture::user(date!(1990 - 01 - 01)))
            .await?;
        let second = PostgresMovieRepository
            .create(&mut con, &fixture::movie(true))
            .await?;
        let first = PostgresMovieRepository
            .create(&mut con, &fixture::movie(false))
            .await?;
        let movie_ids = [*second.id(), *first.id()];

        let date = RentalDate::new(OffsetDateTime::now_utc());
        let end_date = RentalEndDate::starting_at(&date);
        let rental = PostgresRentalRepository
            .create(&mut con, user.id(), &movie_ids, &date, &end_date)
            .await?;
        assert!(rental.is_open());
        assert_eq!(rental.movies(), &movie_ids.to_vec());

        let found = PostgresRentalRepository
            .find_by_id(&mut con, rental.id())
            .await?;
        assert_eq!(found, Some(rental.clone()));

        let all = PostgresRentalRepository
            .find_all(&mut con, &SelectLimit::new(1000), &SelectOffset::default())
            .await?;
        assert!(all.contains(&rental));

        PostgresRentalRepository.close(&mut con, rental.id()).await?;
        let by_user = PostgresRentalRepository
            .find_by_user_id(&mut con, user.id())
            .await?;
        assert_eq!(by_user.len(), 1);
        assert!(!by_user[0].is_open());
        assert_eq!(by_user[0].movies(), &movie_ids.to_vec());

        con.roll_back().await?;
        Ok(())
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn second_open_rental_is_rejected() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        let mut con = db.transact().await?;

        let user = PostgresUserRepository
            .create(&mut con, &fixture::user(date!(1990 - 01 - 01)))
            .await?;
        let date = RentalDate::new(OffsetDateTime::now_utc());
        let end_date = RentalEndDate::starting_at(&date);
        PostgresRentalRepository
            .create(&mut con, user.id(), &[], &date, &end_date)
            .await?;

        let report = PostgresRentalRepository
            .create(&mut con, user.id(), &[], &date, &end_date)
            .await
            .unwrap_err();
        assert_eq!(report.current_context(), &KernelError::PendentRental);

        con.roll_back().await?;
        Ok(())
    }
}

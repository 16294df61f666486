use std::ops::{Deref, DerefMut};

use error_stack::{Report, ResultExt};
use sqlx::postgres::PgPoolOptions;
use sqlx::{Error, PgConnection, Pool, Postgres};

use kernel::interface::database::{DatabaseConnection, Transaction};
use kernel::interface::query::{DependOnMovieQuery, DependOnRentalQuery, DependOnUserQuery};
use kernel::interface::update::{
    DependOnMovieModifier, DependOnRentalModifier, DependOnUserModifier,
};
use kernel::KernelError;

use crate::env;
use crate::error::ConvertError;

pub use self::{movie::*, rental::*, user::*};

mod movie;
mod rental;
mod user;

static POSTGRES_URL: &str = "POSTGRES_URL";

/// Index that keeps a single open rental per user.
const OPEN_RENTAL_INDEX: &str = "rentals_one_open_per_user";

#[derive(Clone)]
pub struct PostgresDatabase {
    pool: Pool<Postgres>,
}

impl PostgresDatabase {
    pub async fn new() -> error_stack::Result<Self, KernelError> {
        let url = env(POSTGRES_URL)?;
        let pool = PgPoolOptions::new().connect(&url).await.convert_error()?;
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .change_context_lazy(|| KernelError::Internal)
            .attach_printable("Failed to apply migrations")?;
        tracing::info!("Connected to postgres");
        Ok(Self { pool })
    }
}

pub struct PostgresConnection(sqlx::Transaction<'static, Postgres>);

impl Deref for PostgresConnection {
    type Target = PgConnection;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for PostgresConnection {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

#[async_trait::async_trait]
impl Transaction for PostgresConnection {
    async fn commit(self) -> error_stack::Result<(), KernelError> {
        self.0.commit().await.convert_error()
    }

    async fn roll_back(self) -> error_stack::Result<(), KernelError> {
        self.0.rollback().await.convert_error()
    }
}

#[async_trait::async_trait]
impl DatabaseConnection for PostgresDatabase {
    type Transaction = PostgresConnection;
    async fn transact(&self) -> error_stack::Result<PostgresConnection, KernelError> {
        let con = self.pool.begin().await.convert_error()?;
        Ok(PostgresConnection(con))
    }
}

impl DependOnUserQuery for PostgresDatabase {
    type UserQuery = PostgresUserRepository;
    fn user_query(&self) -> &Self::UserQuery {
        &PostgresUserRepository
    }
}

impl DependOnUserModifier for PostgresDatabase {
    type UserModifier = PostgresUserRepository;
    fn user_modifier(&self) -> &Self::UserModifier {
        &PostgresUserRepository
    }
}

impl DependOnMovieQuery for PostgresDatabase {
    type MovieQuery = PostgresMovieRepository;
    fn movie_query(&self) -> &Self::MovieQuery {
        &PostgresMovieRepository
    }
}

impl DependOnMovieModifier for PostgresDatabase {
    type MovieModifier = PostgresMovieRepository;
    fn movie_modifier(&self) -> &Self::MovieModifier {
        &PostgresMovieRepository
    }
}

impl DependOnRentalQuery for PostgresDatabase {
    type RentalQuery = PostgresRentalRepository;
    fn rental_query(&self) -> &Self::RentalQuery {
        &PostgresRentalRepository
    }
}

impl DependOnRentalModifier for PostgresDatabase {
    type RentalModifier = PostgresRentalRepository;
    fn rental_modifier(&self) -> &Self::RentalModifier {
        &PostgresRentalRepository
    }
}

impl<T> ConvertError for Result<T, Error>
where
    T: 'static,
{
    type Ok = T;
    fn convert_error(self) -> error_stack::Result<T, KernelError> {
        self.map_err(|error| {
            let context = match &error {
                Error::PoolTimedOut => KernelError::Timeout,
                Error::Database(database) if database.constraint() == Some(OPEN_RENTAL_INDEX) => {
                    KernelError::PendentRental
                }
                // serialization_failure
                Error::Database(database) if database.code().as_deref() == Some("40001") => {
                    KernelError::Concurrency
                }
                _ => KernelError::Internal,
            };
            Report::from(error).change_context(context)
        })
    }
}

#[cfg(test)]
pub(crate) mod fixture {
    use time::Date;

    use kernel::prelude::entity::{
        AdultsOnly, BirthDate, MovieDraft, MovieName, UserCpf, UserDraft, UserEmail,
        UserFirstName, UserLastName,
    };

    pub fn user(birth_date: Date) -> UserDraft {
        let seed: u32 = rand::random();
        UserDraft::new(
            UserFirstName::new("Maria"),
            UserLastName::new("Silva"),
            UserEmail::new(format!("maria.{seed}@example.com")),
            UserCpf::new(format!("{seed:011}")),
            BirthDate::new(birth_date),
        )
    }

    pub fn movie(adults_only: bool) -> MovieDraft {
        let seed: u16 = rand::random();
        MovieDraft::new(
            MovieName::new(format!("Movie {seed}")),
            AdultsOnly::new(adults_only),
        )
    }
}

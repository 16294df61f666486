use sqlx::PgConnection;
use time::Date;

use kernel::interface::query::UserQuery;
use kernel::interface::update::UserModifier;
use kernel::prelude::entity::{
    BirthDate, User, UserCpf, UserDraft, UserEmail, UserFirstName, UserId, UserLastName,
};
use kernel::KernelError;

use crate::database::postgres::PostgresConnection;
use crate::error::ConvertError;

pub struct PostgresUserRepository;

#[async_trait::async_trait]
impl UserQuery for PostgresUserRepository {
    type Transaction = PostgresConnection;
    async fn find_by_id(
        &self,
        con: &mut PostgresConnection,
        id: &UserId,
    ) -> error_stack::Result<Option<User>, KernelError> {
        PgUserInternal::find_by_id(con, id).await
    }
}

#[async_trait::async_trait]
impl UserModifier for PostgresUserRepository {
    type Transaction = PostgresConnection;
    async fn create(
        &self,
        con: &mut PostgresConnection,
        user: &UserDraft,
    ) -> error_stack::Result<User, KernelError> {
        PgUserInternal::create(con, user).await
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i32,
    first_name: String,
    last_name: String,
    email: String,
    cpf: String,
    birth_date: Date,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User::new(
            UserId::new(row.id),
            UserFirstName::new(row.first_name),
            UserLastName::new(row.last_name),
            UserEmail::new(row.email),
            UserCpf::new(row.cpf),
            BirthDate::new(row.birth_date),
        )
    }
}

pub(in crate::database) struct PgUserInternal;

impl PgUserInternal {
    async fn find_by_id(
        con: &mut PgConnection,
        id: &UserId,
    ) -> error_stack::Result<Option<User>, KernelError> {
        let row = sqlx::query_as::<_, UserRow>(
            // language=postgresql
            r#"
            SELECT id, first_name, last_name, email, cpf, birth_date
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        let found = row.map(User::from);
        Ok(found)
    }

    async fn create(
        con: &mut PgConnection,
        user: &UserDraft,
    ) -> error_stack::Result<User, KernelError> {
        let id = sqlx::query_scalar::<_, i32>(
            // language=postgresql
            r#"
            INSERT INTO users (first_name, last_name, email, cpf, birth_date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(user.first_name().as_ref())
        .bind(user.last_name().as_ref())
        .bind(user.email().as_ref())
        .bind(user.cpf().as_ref())
        .bind(user.birth_date().as_ref())
        .fetch_one(con)
        .await
        .convert_error()?;
        Ok(user.clone().into_user(UserId::new(id)))
    }
}

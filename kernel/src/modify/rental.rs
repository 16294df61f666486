use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{MovieId, Rental, RentalDate, RentalEndDate, RentalId, UserId};
use crate::KernelError;

#[async_trait::async_trait]
pub trait RentalModifier: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn create(
        &self,
        con: &mut Self::Transaction,
        user_id: &UserId,
        movie_ids: &[MovieId],
        date: &RentalDate,
        end_date: &RentalEndDate,
    ) -> error_stack::Result<Rental, KernelError>;

    async fn close(
        &self,
        con: &mut Self::Transaction,
        rental_id: &RentalId,
    ) -> error_stack::Result<(), KernelError>;
}

pub trait DependOnRentalModifier: 'static + Sync + Send + DependOnDatabaseConnection {
    type RentalModifier: RentalModifier<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn rental_modifier(&self) -> &Self::RentalModifier;
}

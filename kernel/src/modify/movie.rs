use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{Movie, MovieDraft, MovieId, RentalId};
use crate::KernelError;

#[async_trait::async_trait]
pub trait MovieModifier: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn create(
        &self,
        con: &mut Self::Transaction,
        movie: &MovieDraft,
    ) -> error_stack::Result<Movie, KernelError>;

    /// Hands every movie over to the rental.
    ///
    /// Fails with [`KernelError::MovieInRental`] unless all movies were still available,
    /// so that the availability check and the claim cannot interleave with another rental.
    async fn attach(
        &self,
        con: &mut Self::Transaction,
        movie_ids: &[MovieId],
        rental_id: &RentalId,
    ) -> error_stack::Result<(), KernelError>;

    /// Makes every movie held by the rental available again.
    async fn release(
        &self,
        con: &mut Self::Transaction,
        rental_id: &RentalId,
    ) -> error_stack::Result<(), KernelError>;
}

pub trait DependOnMovieModifier: 'static + Sync + Send + DependOnDatabaseConnection {
    type MovieModifier: MovieModifier<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn movie_modifier(&self) -> &Self::MovieModifier;
}

use std::sync::{Arc, Mutex};

use error_stack::Report;
use time::Date;

use kernel::interface::database::{DatabaseConnection, Transaction};
use kernel::interface::query::{
    DependOnMovieQuery, DependOnRentalQuery, DependOnUserQuery, MovieQuery, RentalQuery,
    UserQuery,
};
use kernel::interface::update::{
    DependOnMovieModifier, DependOnRentalModifier, MovieModifier, RentalModifier,
};
use kernel::prelude::entity::{
    AdultsOnly, BirthDate, Movie, MovieDraft, MovieId, MovieName, Rental, RentalClosed,
    RentalDate, RentalEndDate, RentalId, SelectLimit, SelectOffset, User, UserCpf, UserDraft,
    UserEmail, UserFirstName, UserId, UserLastName,
};
use kernel::KernelError;

#[derive(Debug, Clone, Default)]
pub struct MemoryState {
    pub users: Vec<User>,
    pub movies: Vec<Movie>,
    pub rentals: Vec<Rental>,
    sequence: i32,
}

impl MemoryState {
    fn next_id(&mut self) -> i32 {
        self.sequence += 1;
        self.sequence
    }
}

/// Store whose transactions work on a copy of the state and only publish it on commit.
#[derive(Debug, Clone, Default)]
pub struct MemoryDatabase {
    store: Arc<Mutex<MemoryState>>,
}

pub struct MemoryTransaction {
    store: Arc<Mutex<MemoryState>>,
    state: MemoryState,
}

impl MemoryDatabase {
    pub fn snapshot(&self) -> MemoryState {
        self.store.lock().unwrap().clone()
    }

    pub fn insert_user(&self, birth_date: Date) -> UserId {
        let mut state = self.store.lock().unwrap();
        let id = UserId::new(state.next_id());
        let draft = UserDraft::new(
            UserFirstName::new("Ana"),
            UserLastName::new("Souza"),
            UserEmail::new(format!("user{}@example.com", i32::from(id))),
            UserCpf::new(format!("{:011}", i32::from(id))),
            BirthDate::new(birth_date),
        );
        state.users.push(draft.into_user(id));
        id
    }

    pub fn insert_movie(&self, adults_only: bool, rental_id: Option<RentalId>) -> MovieId {
        let mut state = self.store.lock().unwrap();
        let id = MovieId::new(state.next_id());
        state.movies.push(Movie::new(
            id,
            MovieName::new(format!("Movie {}", i32::from(id))),
            AdultsOnly::new(adults_only),
            rental_id,
        ));
        id
    }

    pub fn insert_rental(&self, user_id: UserId, closed: bool) -> RentalId {
        let mut state = self.store.lock().unwrap();
        let id = RentalId::new(state.next_id());
        let date = RentalDate::new(time::OffsetDateTime::now_utc());
        state.rentals.push(Rental::new(
            id,
            user_id,
            date,
            RentalEndDate::starting_at(&date),
            RentalClosed::new(closed),
            Vec::new(),
        ));
        id
    }
}

#[async_trait::async_trait]
impl Transaction for MemoryTransaction {
    async fn commit(self) -> error_stack::Result<(), KernelError> {
        *self.store.lock().unwrap() = self.state;
        Ok(())
    }

    async fn roll_back(self) -> error_stack::Result<(), KernelError> {
        Ok(())
    }
}

#[async_trait::async_trait]
impl DatabaseConnection for MemoryDatabase {
    type Transaction = MemoryTransaction;
    async fn transact(&self) -> error_stack::Result<Self::Transaction, KernelError> {
        let state = self.store.lock().unwrap().clone();
        Ok(MemoryTransaction {
            store: Arc::clone(&self.store),
            state,
        })
    }
}

pub struct MemoryUserRepository;

#[async_trait::async_trait]
impl UserQuery for MemoryUserRepository {
    type Transaction = MemoryTransaction;
    async fn find_by_id(
        &self,
        con: &mut MemoryTransaction,
        id: &UserId,
    ) -> error_stack::Result<Option<User>, KernelError> {
        Ok(con.state.users.iter().find(|user| user.id() == id).cloned())
    }
}

pub struct MemoryMovieRepository;

#[async_trait::async_trait]
impl MovieQuery for MemoryMovieRepository {
    type Transaction = MemoryTransaction;
    async fn find_by_id(
        &self,
        con: &mut MemoryTransaction,
        id: &MovieId,
    ) -> error_stack::Result<Option<Movie>, KernelError> {
        Ok(con.state.movies.iter().find(|movie| movie.id() == id).cloned())
    }
}

#[async_trait::async_trait]
impl MovieModifier for MemoryMovieRepository {
    type Transaction = MemoryTransaction;
    async fn create(
        &self,
        con: &mut MemoryTransaction,
        movie: &MovieDraft,
    ) -> error_stack::Result<Movie, KernelError> {
        let movie = movie.clone().into_movie(MovieId::new(con.state.next_id()));
        con.state.movies.push(movie.clone());
        Ok(movie)
    }

    async fn attach(
        &self,
        con: &mut MemoryTransaction,
        movie_ids: &[MovieId],
        rental_id: &RentalId,
    ) -> error_stack::Result<(), KernelError> {
        for movie in con
            .state
            .movies
            .iter_mut()
            .filter(|movie| movie_ids.contains(movie.id()))
        {
            if !movie.is_available() {
                return Err(Report::new(KernelError::MovieInRental));
            }
            movie.substitute(|movie| *movie.rental_id = Some(*rental_id));
        }
        Ok(())
    }

    async fn release(
        &self,
        con: &mut MemoryTransaction,
        rental_id: &RentalId,
    ) -> error_stack::Result<(), KernelError> {
        con.state
            .movies
            .iter_mut()
            .filter(|movie| movie.rental_id() == &Some(*rental_id))
            .for_each(|movie| movie.substitute(|movie| *movie.rental_id = None));
        Ok(())
    }
}

pub struct MemoryRentalRepository;

#[async_trait::async_trait]
impl RentalQuery for MemoryRentalRepository {
    type Transaction = MemoryTransaction;
    async fn find_all(
        &self,
        con: &mut MemoryTransaction,
        limit: &SelectLimit,
        offset: &SelectOffset,
    ) -> error_stack::Result<Vec<Rental>, KernelError> {
        let skip = usize::try_from(i64::from(offset.clone())).unwrap_or_default();
        let take = usize::try_from(i64::from(limit.clone())).unwrap_or_default();
        Ok(con
            .state
            .rentals
            .iter()
            .skip(skip)
            .take(take)
            .cloned()
            .collect())
    }

    async fn find_by_id(
        &self,
        con: &mut MemoryTransaction,
        id: &RentalId,
    ) -> error_stack::Result<Option<Rental>, KernelError> {
        Ok(con.state.rentals.iter().find(|rental| rental.id() == id).cloned())
    }

    async fn find_by_user_id(
        &self,
        con: &mut MemoryTransaction,
        user_id: &UserId,
    ) -> error_stack::Result<Vec<Rental>, KernelError> {
        Ok(con
            .state
            .rentals
            .iter()
            .filter(|rental| rental.user_id() == user_id)
            .cloned()
            .collect())
    }
}

#[async_trait::async_trait]
impl RentalModifier for MemoryRentalRepository {
    type Transaction = MemoryTransaction;
    async fn create(
        &self,
        con: &mut MemoryTransaction,
        user_id: &UserId,
        movie_ids: &[MovieId],
        date: &RentalDate,
        end_date: &RentalEndDate,
    ) -> error_stack::Result<Rental, KernelError> {
        let pending = con
            .state
            .rentals
            .iter()
            .any(|rental| rental.user_id() == user_id && rental.is_open());
        if pending {
            return Err(Report::new(KernelError::PendentRental));
        }
        let rental = Rental::new(
            RentalId::new(con.state.next_id()),
            *user_id,
            *date,
            *end_date,
            RentalClosed::default(),
            movie_ids.to_vec(),
        );
        con.state.rentals.push(rental.clone());
        Ok(rental)
    }

    async fn close(
        &self,
        con: &mut MemoryTransaction,
        rental_id: &RentalId,
    ) -> error_stack::Result<(), KernelError> {
        con.state
            .rentals
            .iter_mut()
            .filter(|rental| rental.id() == rental_id)
            .for_each(|rental| rental.substitute(|rental| *rental.closed = RentalClosed::new(true)));
        Ok(())
    }
}

impl DependOnUserQuery for MemoryDatabase {
    type UserQuery = MemoryUserRepository;
    fn user_query(&self) -> &Self::UserQuery {
        &MemoryUserRepository
    }
}

impl DependOnMovieQuery for MemoryDatabase {
    type MovieQuery = MemoryMovieRepository;
    fn movie_query(&self) -> &Self::MovieQuery {
        &MemoryMovieRepository
    }
}

impl DependOnMovieModifier for MemoryDatabase {
    type MovieModifier = MemoryMovieRepository;
    fn movie_modifier(&self) -> &Self::MovieModifier {
        &MemoryMovieRepository
    }
}

impl DependOnRentalQuery for MemoryDatabase {
    type RentalQuery = MemoryRentalRepository;
    fn rental_query(&self) -> &Self::RentalQuery {
        &MemoryRentalRepository
    }
}

impl DependOnRentalModifier for MemoryDatabase {
    type RentalModifier = MemoryRentalRepository;
    fn rental_modifier(&self) -> &Self::RentalModifier {
        &MemoryRentalRepository
    }
}

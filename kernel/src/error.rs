use std::fmt::Display;

use error_stack::Context;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Resource {
    User,
    Movie,
    Rental,
}

impl Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Resource::User => write!(f, "User"),
            Resource::Movie => write!(f, "Movie"),
            Resource::Rental => write!(f, "Rental"),
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum KernelError {
    NotFound(Resource),
    PendentRental,
    InsufficientAge,
    MovieInRental,
    InvalidInput,
    Concurrency,
    Timeout,
    Internal,
}

impl KernelError {
    /// Stable identifier exposed to clients next to the message.
    pub fn name(&self) -> &'static str {
        match self {
            KernelError::NotFound(_) => "NotFoundError",
            KernelError::PendentRental => "PendentRentalError",
            KernelError::InsufficientAge => "InsufficientAgeError",
            KernelError::MovieInRental => "MovieInRentalError",
            KernelError::InvalidInput => "InvalidDataError",
            KernelError::Concurrency => "ConcurrencyError",
            KernelError::Timeout => "TimeoutError",
            KernelError::Internal => "InternalError",
        }
    }
}

impl Display for KernelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KernelError::NotFound(resource) => write!(f, "{resource} not found."),
            KernelError::PendentRental => write!(f, "The user already have a rental!"),
            KernelError::InsufficientAge => write!(f, "Cannot see that movie."),
            KernelError::MovieInRental => write!(f, "Movie already in a rental."),
            KernelError::InvalidInput => write!(f, "Invalid data."),
            KernelError::Concurrency => write!(f, "Concurrency error"),
            KernelError::Timeout => write!(f, "Process timed out"),
            KernelError::Internal => write!(f, "Internal kernel error"),
        }
    }
}

impl Context for KernelError {}

#[cfg(test)]
mod test {
    use super::{KernelError, Resource};

    #[test]
    fn messages() {
        assert_eq!(
            KernelError::NotFound(Resource::User).to_string(),
            "User not found."
        );
        assert_eq!(
            KernelError::NotFound(Resource::Movie).to_string(),
            "Movie not found."
        );
        assert_eq!(
            KernelError::PendentRental.to_string(),
            "The user already have a rental!"
        );
        assert_eq!(
            KernelError::InsufficientAge.to_string(),
            "Cannot see that movie."
        );
        assert_eq!(
            KernelError::MovieInRental.to_string(),
            "Movie already in a rental."
        );
    }

    #[test]
    fn names() {
        assert_eq!(KernelError::NotFound(Resource::Rental).name(), "NotFoundError");
        assert_eq!(KernelError::PendentRental.name(), "PendentRentalError");
        assert_eq!(KernelError::InsufficientAge.name(), "InsufficientAgeError");
        assert_eq!(KernelError::MovieInRental.name(), "MovieInRentalError");
    }
}

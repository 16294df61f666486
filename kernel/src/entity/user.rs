mod age;
mod birth_date;
mod cpf;
mod email;
mod id;
mod name;

pub use self::{age::*, birth_date::*, cpf::*, email::*, id::*, name::*};
use destructure::Destructure;
use vodca::References;

#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct User {
    id: UserId,
    first_name: UserFirstName,
    last_name: UserLastName,
    email: UserEmail,
    cpf: UserCpf,
    birth_date: BirthDate,
}

impl User {
    pub fn new(
        id: UserId,
        first_name: UserFirstName,
        last_name: UserLastName,
        email: UserEmail,
        cpf: UserCpf,
        birth_date: BirthDate,
    ) -> Self {
        Self {
            id,
            first_name,
            last_name,
            email,
            cpf,
            birth_date,
        }
    }
}

/// A user that has not been stored yet. The id is assigned by the database.
#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct UserDraft {
    first_name: UserFirstName,
    last_name: UserLastName,
    email: UserEmail,
    cpf: UserCpf,
    birth_date: BirthDate,
}

impl UserDraft {
    pub fn new(
        first_name: UserFirstName,
        last_name: UserLastName,
        email: UserEmail,
        cpf: UserCpf,
        birth_date: BirthDate,
    ) -> Self {
        Self {
            first_name,
            last_name,
            email,
            cpf,
            birth_date,
        }
    }

    pub fn into_user(self, id: UserId) -> User {
        let DestructUserDraft {
            first_name,
            last_name,
            email,
            cpf,
            birth_date,
        } = self.into_destruct();
        User::new(id, first_name, last_name, email, cpf, birth_date)
    }
}

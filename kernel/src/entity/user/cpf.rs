use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

// Brazilian individual taxpayer registry number, stored as the 11 digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Fromln, AsRefln, Serialize, Deserialize)]
pub struct UserCpf(String);

impl UserCpf {
    pub fn new(cpf: impl Into<String>) -> Self {
        Self(cpf.into())
    }
}

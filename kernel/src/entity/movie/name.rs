use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, Eq, PartialEq, Fromln, AsRefln)]
pub struct MovieName(String);

impl MovieName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

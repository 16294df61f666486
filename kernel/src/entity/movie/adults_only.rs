use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Fromln, AsRefln)]
pub struct AdultsOnly(bool);

impl AdultsOnly {
    pub fn new(value: impl Into<bool>) -> Self {
        Self(value.into())
    }
}

use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Fromln, AsRefln)]
pub struct RentalClosed(bool);

impl RentalClosed {
    pub fn new(value: impl Into<bool>) -> Self {
        Self(value.into())
    }
}

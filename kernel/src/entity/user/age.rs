use vodca::{AsRefln, Fromln};

/// Completed years of life.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Fromln, AsRefln)]
pub struct UserAge(i32);

impl UserAge {
    pub const ADULT: i32 = 18;

    pub fn new(age: impl Into<i32>) -> Self {
        Self(age.into())
    }

    pub fn is_adult(&self) -> bool {
        self.0 >= Self::ADULT
    }
}

use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Fromln, AsRefln, Serialize, Deserialize)]
pub struct RentalDate(OffsetDateTime);

impl RentalDate {
    pub fn new(time: impl Into<OffsetDateTime>) -> Self {
        Self(time.into())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Fromln, AsRefln, Serialize, Deserialize)]
pub struct RentalEndDate(OffsetDateTime);

impl RentalEndDate {
    pub const PERIOD: Duration = Duration::days(3);

    pub fn new(time: impl Into<OffsetDateTime>) -> Self {
        Self(time.into())
    }

    pub fn starting_at(date: &RentalDate) -> Self {
        Self(date.0 + Self::PERIOD)
    }
}

#[cfg(test)]
mod test {
    use time::macros::datetime;

    use crate::entity::{RentalDate, RentalEndDate};

    #[test]
    fn due_after_period() {
        let date = RentalDate::new(datetime!(2024-01-30 10:00 UTC));
        let end = RentalEndDate::starting_at(&date);
        assert_eq!(end, RentalEndDate::new(datetime!(2024-02-02 10:00 UTC)));
    }
}

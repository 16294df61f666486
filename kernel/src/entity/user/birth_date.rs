use serde::{Deserialize, Serialize};
use time::Date;
use vodca::{AsRefln, Fromln};

use crate::entity::UserAge;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Fromln, AsRefln, Serialize, Deserialize)]
pub struct BirthDate(Date);

impl BirthDate {
    pub fn new(date: impl Into<Date>) -> Self {
        Self(date.into())
    }

    pub fn age_at(&self, today: Date) -> UserAge {
        let born = self.0;
        let mut years = today.year() - born.year();
        if (u8::from(today.month()), today.day()) < (u8::from(born.month()), born.day()) {
            years -= 1;
        }
        UserAge::new(years.max(0))
    }
}

#[cfg(test)]
mod test {
    use time::macros::date;

    use crate::entity::{BirthDate, UserAge};

    #[test]
    fn counts_completed_years() {
        let born = BirthDate::new(date!(2000 - 06 - 15));
        assert_eq!(born.age_at(date!(2018 - 06 - 14)), UserAge::new(17));
        assert_eq!(born.age_at(date!(2018 - 06 - 15)), UserAge::new(18));
        assert_eq!(born.age_at(date!(2018 - 12 - 01)), UserAge::new(18));
    }

    #[test]
    fn born_today_is_zero() {
        let today = date!(2024 - 03 - 01);
        let age = BirthDate::new(today).age_at(today);
        assert_eq!(age, UserAge::new(0));
        assert!(!age.is_adult());
    }

    #[test]
    fn leap_day_birthday() {
        let born = BirthDate::new(date!(2004 - 02 - 29));
        assert_eq!(born.age_at(date!(2022 - 02 - 28)), UserAge::new(17));
        assert_eq!(born.age_at(date!(2022 - 03 - 01)), UserAge::new(18));
    }
}

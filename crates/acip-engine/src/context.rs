//! Per-vaccine evaluation context handed to each recommender.

use chrono::NaiveDate;

use acip_model::SpecialConditions;
use acip_model::VaccineId;
use acip_schedule::CdcRule;

use crate::datemath;
use crate::normalize;

/// One administered dose after parsing, ordered by date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dose {
    pub date: NaiveDate,
    pub product: Option<String>,
}

impl Dose {
    pub fn new(date: NaiveDate) -> Self {
        Dose {
            date,
            product: None,
        }
    }
}

/// Everything one recommender sees for one vaccine. Built fresh per
/// request; recommenders never share mutable state.
#[derive(Debug)]
pub struct VaccineContext<'a> {
    pub id: VaccineId,
    pub birth_date: NaiveDate,
    pub current_date: NaiveDate,
    /// Doses that count toward the series, ascending by date.
    pub counted: Vec<Dose>,
    /// Every submitted dose after merging and sorting, including excluded
    /// ones.
    pub all_doses: &'a [Dose],
    pub conditions: &'a SpecialConditions,
    pub rule: &'static CdcRule,
}

impl VaccineContext<'_> {
    pub fn age_days(&self) -> i64 {
        datemath::days_between(self.birth_date, self.current_date)
    }

    pub fn age_months(&self) -> i64 {
        datemath::months_between(self.birth_date, self.current_date)
    }

    pub fn age_years(&self) -> i64 {
        datemath::years_between(self.birth_date, self.current_date)
    }

    /// Ratio age in months on some other date (bucket selection at the
    /// first counted dose).
    pub fn age_months_at(&self, date: NaiveDate) -> i64 {
        datemath::months_between(self.birth_date, date)
    }

    /// Ratio age in years on some other date.
    pub fn age_years_at(&self, date: NaiveDate) -> i64 {
        datemath::years_between(self.birth_date, date)
    }

    /// Counted doses only; excluded doses never advance the series.
    pub fn dose_count(&self) -> usize {
        self.counted.len()
    }

    pub fn first_counted(&self) -> Option<&Dose> {
        self.counted.first()
    }

    pub fn last_counted(&self) -> Option<&Dose> {
        self.counted.last()
    }

    /// Age-sensitive display name for this vaccine at the current age.
    pub fn display_name(&self) -> String {
        normalize::display_name(&self.id, self.age_years())
    }
}

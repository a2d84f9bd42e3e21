//! Rule types for the static CDC schedule table.
//!
//! A [`CdcRule`] holds everything the dose validator and the per-vaccine
//! recommenders need to know about one series: minimum age, dose counts,
//! minimum intervals, product variants, age-bucketed catch-up sub-rules,
//! and static advisory text. Dose counts and intervals may be constant or
//! resolved from the patient's age, matching how the printed CDC catch-up
//! tables are written.

use chrono::{Days, Months, NaiveDate};

use acip_model::VaccineId;

/// A minimum spacing, measured from birth or from a prior dose.
///
/// Calendar months use chrono's month addition, which clamps the day to
/// the end of a short target month (Jan 31 + 1 month = Feb 28/29).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gap {
    Days(u64),
    Weeks(u64),
    Months(u32),
}

impl Gap {
    /// The earliest date this gap permits, counting from `start`.
    pub fn after(&self, start: NaiveDate) -> NaiveDate {
        match *self {
            Gap::Days(d) => start.checked_add_days(Days::new(d)).unwrap_or(NaiveDate::MAX),
            Gap::Weeks(w) => start
                .checked_add_days(Days::new(w * 7))
                .unwrap_or(NaiveDate::MAX),
            Gap::Months(m) => start
                .checked_add_months(Months::new(m))
                .unwrap_or(NaiveDate::MAX),
        }
    }
}

/// Doses required to complete a series.
#[derive(Debug, Clone, Copy)]
pub enum DoseCount {
    Fixed(usize),
    /// Resolved from the patient's age in whole years.
    ByAge(fn(i64) -> usize),
}

impl DoseCount {
    pub fn resolve(&self, age_years: i64) -> usize {
        match *self {
            DoseCount::Fixed(n) => n,
            DoseCount::ByAge(f) => f(age_years),
        }
    }
}

/// Minimum inter-dose intervals. `intervals[0]` is the gap before dose 2;
/// series longer than the list reuse the final listed gap.
#[derive(Debug, Clone, Copy)]
pub enum Intervals {
    Fixed(&'static [Gap]),
    /// Resolved from the patient's age in whole years on the dose date
    /// being examined.
    ByAge(fn(i64) -> &'static [Gap]),
}

impl Intervals {
    pub fn resolve(&self, age_years: i64) -> &'static [Gap] {
        match *self {
            Intervals::Fixed(gaps) => gaps,
            Intervals::ByAge(f) => f(age_years),
        }
    }

    /// Minimum gap before counted dose `k` (1-indexed), or `None` for the
    /// first dose or an empty interval list.
    pub fn before_dose(&self, k: usize, age_years: i64) -> Option<Gap> {
        if k < 2 {
            return None;
        }
        let gaps = self.resolve(age_years);
        if gaps.is_empty() {
            return None;
        }
        let idx = (k - 2).min(gaps.len() - 1);
        Some(gaps[idx])
    }
}

/// Brand/formulation override. `match_token` is compared case-insensitively
/// as a substring of the recorded product name.
#[derive(Debug, Clone, Copy)]
pub struct ProductVariant {
    pub match_token: &'static str,
    pub doses: usize,
    pub intervals: &'static [Gap],
    pub note: &'static str,
}

/// One age-at-first-dose bracket of a catch-up sub-table. `min_months` is
/// inclusive, `max_months_exclusive` exclusive, both in completed months
/// at the first counted dose.
#[derive(Debug, Clone, Copy)]
pub struct CatchUpBucket {
    pub min_months: i64,
    pub max_months_exclusive: i64,
    pub doses: usize,
    pub intervals: &'static [Gap],
    /// Extra floor on the final dose, from birth (e.g. a booster given no
    /// earlier than 12 months of age).
    pub final_dose_min_age: Option<Gap>,
    pub note: &'static str,
}

/// Static schedule entry for one canonical vaccine identity.
#[derive(Debug, Clone)]
pub struct CdcRule {
    pub id: VaccineId,
    /// Base display name. `dtap_tdap` resolves its age-sensitive name
    /// through the normalizer instead.
    pub display_name: &'static str,
    /// Minimum age for the first counted dose, from birth.
    pub minimum_age: Gap,
    /// Series no longer given past this age (rotavirus final-dose limit).
    pub maximum_age: Option<Gap>,
    /// First dose must fall strictly before this age (rotavirus 15w0d).
    pub start_deadline: Option<Gap>,
    pub doses: DoseCount,
    pub intervals: Intervals,
    /// Floor on the final dose of the series, from birth (IPV dose 4 at
    /// age 4 years or later).
    pub final_dose_min_age: Option<Gap>,
    pub products: &'static [ProductVariant],
    pub catch_up: &'static [CatchUpBucket],
    /// Live attenuated; blocked under pregnancy or immunocompromise.
    pub live: bool,
    pub contraindications: &'static [&'static str],
    pub precautions: &'static [&'static str],
    /// Advisory text keyed by the wire name of a risk flag.
    pub special_situations: &'static [(&'static str, &'static str)],
}

impl CdcRule {
    /// A rule with no variants, buckets, caps, or advisory text. The table
    /// builds on this with struct update syntax.
    pub(crate) fn base(
        id: VaccineId,
        display_name: &'static str,
        minimum_age: Gap,
        doses: DoseCount,
        intervals: Intervals,
    ) -> Self {
        CdcRule {
            id,
            display_name,
            minimum_age,
            maximum_age: None,
            start_deadline: None,
            doses,
            intervals,
            final_dose_min_age: None,
            products: &[],
            catch_up: &[],
            live: false,
            contraindications: &[],
            precautions: &[],
            special_situations: &[],
        }
    }

    /// True for entries that carry no dosing schedule at all (the travel
    /// vaccines). Their recommenders emit fixed guidance and the dose
    /// validator leaves their histories untouched.
    pub fn advisory_only(&self) -> bool {
        matches!(self.doses, DoseCount::Fixed(0))
    }

    /// Variant whose token appears in the recorded product name.
    pub fn product_variant(&self, product: &str) -> Option<&'static ProductVariant> {
        let product = product.to_lowercase();
        self.products
            .iter()
            .find(|variant| product.contains(variant.match_token))
    }

    /// Catch-up bucket covering the given age in completed months at the
    /// first counted dose.
    pub fn bucket_for_start_age(&self, age_months: i64) -> Option<&'static CatchUpBucket> {
        self.catch_up
            .iter()
            .find(|bucket| age_months >= bucket.min_months && age_months < bucket.max_months_exclusive)
    }

    /// Advisory text for one active risk flag, if this rule carries any.
    pub fn special_situation(&self, condition: &str) -> Option<&'static str> {
        self.special_situations
            .iter()
            .find(|(flag, _)| *flag == condition)
            .map(|(_, text)| *text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn gap_after_clamps_month_overflow() {
        assert_eq!(Gap::Months(1).after(date(2024, 1, 31)), date(2024, 2, 29));
        assert_eq!(Gap::Months(1).after(date(2023, 1, 31)), date(2023, 2, 28));
        assert_eq!(Gap::Months(6).after(date(2024, 8, 31)), date(2025, 2, 28));
    }

    #[test]
    fn gap_after_days_and_weeks() {
        assert_eq!(Gap::Days(4).after(date(2024, 2, 27)), date(2024, 3, 2));
        assert_eq!(Gap::Weeks(4).after(date(2024, 1, 1)), date(2024, 1, 29));
    }

    #[test]
    fn intervals_reuse_last_gap_past_the_list() {
        let intervals = Intervals::Fixed(&[Gap::Weeks(4), Gap::Weeks(8)]);
        assert_eq!(intervals.before_dose(1, 0), None);
        assert_eq!(intervals.before_dose(2, 0), Some(Gap::Weeks(4)));
        assert_eq!(intervals.before_dose(3, 0), Some(Gap::Weeks(8)));
        // Dose 4 has no listed gap; the final one applies again.
        assert_eq!(intervals.before_dose(4, 0), Some(Gap::Weeks(8)));
    }
}

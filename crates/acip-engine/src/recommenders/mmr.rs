//! MMR: 2 doses from 12 months, 4 weeks apart. Live; the dispatch gate
//! blocks it under pregnancy or immunocompromise.

use acip_model::Recommendation;

use crate::context::VaccineContext;
use crate::recommenders::simple_series;

pub fn recommend(ctx: &VaccineContext<'_>) -> Option<Recommendation> {
    Some(simple_series(ctx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use acip_model::{DecisionType, SpecialConditions, VaccineId};

    use crate::recommenders::harness::{context, date, doses};

    #[test]
    fn first_dose_waits_for_the_first_birthday() {
        let none = SpecialConditions::default();
        let all = doses(&[]);
        let ctx = context(VaccineId::Mmr, "2025-03-10", "2025-08-25", &all, &none);
        let rec = recommend(&ctx).expect("recommendation");
        assert_eq!(
            rec.recommendation_text,
            "Give dose 1 on or after 2026-03-10"
        );
        assert_eq!(rec.next_dose_date, Some(date("2026-03-10")));
        assert_eq!(rec.decision_type, DecisionType::Routine);
    }

    #[test]
    fn overdue_second_dose_is_catch_up() {
        let none = SpecialConditions::default();
        let all = doses(&["2021-04-01"]);
        let ctx = context(VaccineId::Mmr, "2020-03-10", "2025-08-25", &all, &none);
        let rec = recommend(&ctx).expect("recommendation");
        assert_eq!(rec.recommendation_text, "Give dose 2 now");
        assert_eq!(rec.decision_type, DecisionType::CatchUp);
    }

    #[test]
    fn two_doses_complete() {
        let none = SpecialConditions::default();
        let all = doses(&["2021-04-01", "2025-05-01"]);
        let ctx = context(VaccineId::Mmr, "2020-03-10", "2025-08-25", &all, &none);
        let rec = recommend(&ctx).expect("recommendation");
        assert!(rec.series_complete);
    }
}

//! COVID-19. Required doses depend on age bracket and product: under 5
//! the product's primary series applies (3 Pfizer, 2 Moderna, default 3),
//! from 5 up a single dose suffices, and immunocompromise forces at
//! least 3 regardless. The decision type is shared clinical
//! decision-making under 18 unless immunocompromised, routine otherwise.

use acip_model::{DecisionType, Recommendation};

use crate::context::VaccineContext;
use crate::recommenders::{dose_word, give_dose, series_complete};
use crate::validator;

pub fn recommend(ctx: &VaccineContext<'_>) -> Option<Recommendation> {
    let age = ctx.age_years();
    let immunocompromised = ctx.conditions.immunocompromised;
    let count = ctx.dose_count();
    let variant = validator::resolve_variant(ctx.rule, ctx.all_doses);
    let required = if immunocompromised {
        3
    } else if age < 5 {
        variant.map(|v| v.doses).unwrap_or(3)
    } else {
        1
    };
    let decision = if age < 18 && !immunocompromised {
        DecisionType::SharedClinicalDecision
    } else {
        DecisionType::Routine
    };

    if count >= required {
        let mut rec = series_complete(
            ctx,
            &format!("Initial series complete ({required} {})", dose_word(required)),
        );
        rec.decision_type = decision;
        if let Some(v) = variant {
            rec.note(v.note);
        }
        return Some(rec);
    }

    let start_months = ctx
        .first_counted()
        .map(|d| ctx.age_months_at(d.date))
        .unwrap_or_else(|| ctx.age_months());
    let schedule =
        validator::effective_schedule(ctx.rule, ctx.all_doses, Some(start_months), age);
    let next = count + 1;
    let min_date = match ctx.last_counted() {
        None => ctx.rule.minimum_age.after(ctx.birth_date),
        Some(last) => match schedule.intervals.before_dose(next, age) {
            Some(gap) => gap.after(last.date),
            None => last.date,
        },
    };
    let mut rec = give_dose(ctx, next, min_date);
    rec.decision_type = decision;
    if let Some(v) = variant {
        rec.note(v.note);
    }
    Some(rec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use acip_model::{SpecialConditions, VaccineId};

    use crate::recommenders::harness::{context, date, doses, doses_of};

    #[test]
    fn one_dose_suffices_from_age_five() {
        let none = SpecialConditions::default();
        let empty = doses(&[]);
        let ctx = context(VaccineId::Covid19, "2015-01-01", "2025-07-01", &empty, &none);
        let rec = recommend(&ctx).expect("recommendation");
        assert_eq!(rec.recommendation_text, "Give dose 1 now");
        assert_eq!(rec.decision_type, DecisionType::SharedClinicalDecision);

        let one = doses(&["2025-01-01"]);
        let ctx = context(VaccineId::Covid19, "2015-01-01", "2025-07-01", &one, &none);
        let rec = recommend(&ctx).expect("recommendation");
        assert!(rec.series_complete);
        assert_eq!(rec.recommendation_text, "Initial series complete (1 dose)");
    }

    #[test]
    fn pfizer_toddler_series_runs_to_three_doses() {
        let none = SpecialConditions::default();
        let all = doses_of("Pfizer-BioNTech", &["2025-01-15", "2025-02-05"]);
        let ctx = context(VaccineId::Covid19, "2024-06-01", "2025-04-15", &all, &none);
        let rec = recommend(&ctx).expect("recommendation");
        assert_eq!(rec.recommendation_text, "Give dose 3 now");
    }

    #[test]
    fn moderna_toddler_series_completes_at_two() {
        let none = SpecialConditions::default();
        let all = doses_of("Moderna", &["2025-01-15", "2025-02-12"]);
        let ctx = context(VaccineId::Covid19, "2024-06-01", "2025-04-15", &all, &none);
        let rec = recommend(&ctx).expect("recommendation");
        assert!(rec.series_complete);
        assert!(rec.notes.iter().any(|n| n.contains("Moderna")));
    }

    #[test]
    fn immunocompromised_adults_need_three_doses() {
        let conditions = SpecialConditions {
            immunocompromised: true,
            ..SpecialConditions::default()
        };
        let all = doses(&["2025-01-01"]);
        let ctx = context(VaccineId::Covid19, "1990-01-01", "2025-07-01", &all, &conditions);
        let rec = recommend(&ctx).expect("recommendation");
        assert_eq!(rec.recommendation_text, "Give dose 2 now");
        assert_eq!(rec.decision_type, DecisionType::Routine);
    }

    #[test]
    fn infants_wait_for_six_months() {
        let none = SpecialConditions::default();
        let empty = doses(&[]);
        let ctx = context(VaccineId::Covid19, "2025-07-20", "2025-08-25", &empty, &none);
        let rec = recommend(&ctx).expect("recommendation");
        assert_eq!(rec.next_dose_date, Some(date("2026-01-20")));
    }
}

//! Meningococcal B: shared clinical decision-making at 16 through 23,
//! risk-based from age 10 for asplenia, HIV, and immunocompromise.
//! Bexsero and Trumenba carry their own dose counts and spacing and are
//! not interchangeable; high-risk patients on a non-Bexsero product need
//! a third dose at the later of 6 months after dose 1 and 4 weeks after
//! dose 2.

use std::collections::BTreeSet;

use acip_model::{DecisionType, Recommendation};
use acip_schedule::Gap;

use crate::context::VaccineContext;
use crate::recommenders::{give_dose, series_complete};
use crate::validator;

const MIXED_PRODUCT_NOTE: &str =
    "Bexsero and Trumenba are not interchangeable; complete the series with a single product";

pub fn recommend(ctx: &VaccineContext<'_>) -> Option<Recommendation> {
    let age = ctx.age_years();
    let count = ctx.dose_count();
    let high_risk = ctx.conditions.high_risk_meningococcal();
    let variant = validator::resolve_variant(ctx.rule, ctx.all_doses);
    let bexsero = variant.map(|v| v.match_token == "bexsero").unwrap_or(false);
    let required = if bexsero {
        2
    } else if high_risk {
        3
    } else {
        variant.map(|v| v.doses).unwrap_or(2)
    };
    let mixed = mixed_products(ctx);

    if count > 0 && count >= required {
        let mut rec = series_complete(ctx, &format!("Series complete ({required} doses)"));
        if let Some(v) = variant {
            rec.note(v.note);
        }
        if mixed {
            rec.note(MIXED_PRODUCT_NOTE);
        }
        return Some(rec);
    }

    if age < 10 {
        if high_risk {
            let mut rec = Recommendation::new(
                ctx.display_name(),
                DecisionType::RiskBased,
                "Begin the risk-based meningococcal B schedule",
            );
            rec.note("MenB is licensed from 10 years of age; high-risk dosing below that is a specialist decision");
            return Some(rec);
        }
        if ctx.all_doses.is_empty() {
            return None;
        }
        return Some(Recommendation::new(
            ctx.display_name(),
            DecisionType::NotRecommended,
            "Not recommended before 10 years of age",
        ));
    }

    if age >= 24 {
        if count == 0 && ctx.all_doses.is_empty() {
            return None;
        }
        let mut rec = Recommendation::new(
            ctx.display_name(),
            DecisionType::AgedOut,
            "The shared clinical decision-making window of 16 through 23 years has passed",
        );
        rec.note(format!("{count} of {required} doses received"));
        return Some(rec);
    }

    if count > 0 {
        let next = count + 1;
        let min_date = if next == 2 {
            let first = ctx.counted[0].date;
            let gap = if bexsero || high_risk || variant.is_none() {
                Gap::Weeks(4)
            } else {
                Gap::Months(6)
            };
            gap.after(first)
        } else {
            Gap::Months(6)
                .after(ctx.counted[0].date)
                .max(Gap::Weeks(4).after(ctx.counted[1].date))
        };
        let mut rec = give_dose(ctx, next, min_date);
        rec.decision_type = if high_risk {
            DecisionType::RiskBased
        } else {
            DecisionType::SharedClinicalDecision
        };
        if let Some(v) = variant {
            rec.note(v.note);
        }
        if mixed {
            rec.note(MIXED_PRODUCT_NOTE);
        }
        return Some(rec);
    }

    if high_risk {
        let mut rec = give_dose(ctx, 1, ctx.rule.minimum_age.after(ctx.birth_date));
        rec.decision_type = DecisionType::RiskBased;
        return Some(rec);
    }
    if (16..=23).contains(&age) {
        return Some(Recommendation::new(
            ctx.display_name(),
            DecisionType::SharedClinicalDecision,
            "May be given at 16 through 23 years based on shared clinical decision-making, preferably at 16 through 18",
        ));
    }
    if ctx.all_doses.is_empty() {
        return None;
    }
    Some(Recommendation::new(
        ctx.display_name(),
        DecisionType::NotRecommended,
        "Not routinely recommended outside 16 through 23 years except for high-risk conditions",
    ))
}

/// True when the history names more than one distinct product line.
fn mixed_products(ctx: &VaccineContext<'_>) -> bool {
    let notes: BTreeSet<&str> = ctx
        .all_doses
        .iter()
        .filter_map(|d| d.product.as_deref())
        .filter_map(|p| ctx.rule.product_variant(p))
        .map(|v| v.note)
        .collect();
    notes.len() > 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use acip_model::{SpecialConditions, VaccineId};

    use crate::context::Dose;
    use crate::recommenders::harness::{context, date, doses, doses_of};

    #[test]
    fn healthy_seventeen_year_old_gets_shared_decision_guidance() {
        let none = SpecialConditions::default();
        let all = doses(&[]);
        let ctx = context(
            VaccineId::MeningococcalB,
            "2008-01-01",
            "2025-07-01",
            &all,
            &none,
        );
        let rec = recommend(&ctx).expect("recommendation");
        assert_eq!(rec.decision_type, DecisionType::SharedClinicalDecision);
        assert!(rec.next_dose_date.is_none());
    }

    #[test]
    fn bexsero_doses_are_four_weeks_apart() {
        let none = SpecialConditions::default();
        let all = doses_of("Bexsero", &["2025-05-01"]);
        let ctx = context(
            VaccineId::MeningococcalB,
            "2008-01-01",
            "2025-07-01",
            &all,
            &none,
        );
        let rec = recommend(&ctx).expect("recommendation");
        assert_eq!(rec.recommendation_text, "Give dose 2 now");
        assert_eq!(rec.decision_type, DecisionType::SharedClinicalDecision);
    }

    #[test]
    fn trumenba_doses_are_six_months_apart() {
        let none = SpecialConditions::default();
        let all = doses_of("Trumenba", &["2025-01-02"]);
        let ctx = context(
            VaccineId::MeningococcalB,
            "2008-01-01",
            "2025-07-01",
            &all,
            &none,
        );
        let rec = recommend(&ctx).expect("recommendation");
        assert_eq!(rec.next_dose_date, Some(date("2025-07-02")));
    }

    #[test]
    fn high_risk_patients_need_a_third_dose() {
        let conditions = SpecialConditions {
            asplenia: true,
            ..SpecialConditions::default()
        };
        let all = doses_of("Trumenba", &["2025-01-02", "2025-07-02"]);
        let ctx = context(
            VaccineId::MeningococcalB,
            "2008-01-01",
            "2025-08-20",
            &all,
            &conditions,
        );
        let rec = recommend(&ctx).expect("recommendation");
        assert_eq!(rec.recommendation_text, "Give dose 3 now");
        assert_eq!(rec.decision_type, DecisionType::RiskBased);
    }

    #[test]
    fn mixed_products_are_flagged() {
        let none = SpecialConditions::default();
        let all = vec![
            Dose {
                date: date("2025-01-02"),
                product: Some("Bexsero".into()),
            },
            Dose {
                date: date("2025-03-01"),
                product: Some("Trumenba".into()),
            },
        ];
        let ctx = context(
            VaccineId::MeningococcalB,
            "2008-01-01",
            "2025-07-01",
            &all,
            &none,
        );
        let rec = recommend(&ctx).expect("recommendation");
        assert!(rec.notes.iter().any(|n| n.contains("not interchangeable")));
    }

    #[test]
    fn window_passes_at_twenty_four() {
        let none = SpecialConditions::default();
        let all = doses(&["2020-01-01"]);
        let ctx = context(
            VaccineId::MeningococcalB,
            "2000-06-01",
            "2025-07-01",
            &all,
            &none,
        );
        let rec = recommend(&ctx).expect("recommendation");
        assert_eq!(rec.decision_type, DecisionType::AgedOut);
    }
}

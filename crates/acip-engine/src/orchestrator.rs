//! Whole-request evaluation: parse, normalize, merge, dispatch, sort.
//!
//! One call takes a [`CatchUpRequest`] and returns a [`CatchUpResult`]
//! with exactly one recommendation per applicable vaccine. "Applicable"
//! means every vaccine in the submitted history plus every vaccine of the
//! standard childhood panel; travel vaccines appear only when the history
//! mentions them.
//!
//! Evaluation is pure and deterministic. Identical requests produce
//! byte-identical serialized results, which is why `processed_at` derives
//! from the evaluation date instead of the wall clock.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{NaiveTime, Utc};

use acip_model::{CatchUpError, CatchUpRequest, CatchUpResult, Recommendation, Result, VaccineId};
use acip_schedule::{CDC_GUIDELINE_VERSION, STANDARD_PANEL};

use crate::context::Dose;
use crate::datemath;
use crate::normalize;
use crate::recommenders;

/// Evaluates one request against the full schedule.
///
/// Fails only on malformed input: an unparseable date, or a birth date
/// after the evaluation date. Unrecognized vaccine names never fail; they
/// surface as default recommendations.
pub fn run_catch_up(request: &CatchUpRequest) -> Result<CatchUpResult> {
    let birth_date = datemath::parse_date("birthDate", &request.birth_date)?;
    let current_date = match request.current_date.as_deref() {
        Some(value) => datemath::parse_date("currentDate", value)?,
        None => Utc::now().date_naive(),
    };
    if birth_date > current_date {
        return Err(CatchUpError::Message(format!(
            "birth date {} is after the evaluation date {}",
            datemath::format_iso(birth_date),
            datemath::format_iso(current_date)
        )));
    }

    let immunity = immune_ids(request);
    let histories = merged_histories(request)?;

    tracing::debug!(
        birth = %datemath::format_iso(birth_date),
        current = %datemath::format_iso(current_date),
        histories = histories.len(),
        immune = immunity.len(),
        "evaluating catch-up request"
    );

    let mut recommendations: Vec<Recommendation> = Vec::new();
    let mut seen_names: BTreeSet<String> = BTreeSet::new();
    let mut push = |rec: Option<Recommendation>| {
        if let Some(rec) = rec
            && seen_names.insert(rec.vaccine_name.to_lowercase())
        {
            recommendations.push(rec);
        }
    };

    for (id, doses) in &histories {
        push(recommenders::evaluate(
            id,
            birth_date,
            current_date,
            doses,
            &request.special_conditions,
            &immunity,
        ));
    }
    for id in STANDARD_PANEL {
        if histories.contains_key(id) {
            continue;
        }
        push(recommenders::evaluate(
            id,
            birth_date,
            current_date,
            &[],
            &request.special_conditions,
            &immunity,
        ));
    }

    recommendations.sort_by(|a, b| a.vaccine_name.cmp(&b.vaccine_name));

    Ok(CatchUpResult {
        patient_age: datemath::describe_age(birth_date, current_date),
        recommendations,
        cdc_version: CDC_GUIDELINE_VERSION.to_string(),
        processed_at: current_date.and_time(NaiveTime::MIN).and_utc(),
    })
}

/// Normalized identities with affirmative immunity evidence. `false`
/// entries are ignored.
fn immune_ids(request: &CatchUpRequest) -> BTreeSet<VaccineId> {
    request
        .immunity_evidence
        .iter()
        .filter(|(_, reported)| **reported)
        .map(|(name, _)| normalize::to_internal(name))
        .collect()
}

/// Merges history entries into one date-sorted dose timeline per
/// canonical identity, so "DTaP" and "Tdap" entries land in the same
/// series.
fn merged_histories(request: &CatchUpRequest) -> Result<BTreeMap<VaccineId, Vec<Dose>>> {
    let mut histories: BTreeMap<VaccineId, Vec<Dose>> = BTreeMap::new();
    for entry in &request.vaccine_history {
        let id = normalize::to_internal(&entry.vaccine_name);
        let timeline = histories.entry(id).or_default();
        for record in &entry.doses {
            let field = format!("dose date for {}", entry.vaccine_name);
            let date = datemath::parse_date(&field, &record.date)?;
            timeline.push(Dose {
                date,
                product: record.product.clone(),
            });
        }
    }
    for timeline in histories.values_mut() {
        timeline.sort_by_key(|dose| dose.date);
    }
    Ok(histories)
}

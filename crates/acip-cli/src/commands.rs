use std::fs;

use anyhow::{Context, Result};
use comfy_table::Table;
use tracing::info;

use acip_cli::summary::{apply_table_style, print_result};
use acip_engine::run_catch_up;
use acip_model::CatchUpRequest;
use acip_schedule::{DoseCount, Gap, registry};

use crate::cli::{EvaluateArgs, OutputArg};

pub fn run_evaluate(args: &EvaluateArgs) -> Result<()> {
    let raw = fs::read_to_string(&args.request)
        .with_context(|| format!("read request {}", args.request.display()))?;
    let request: CatchUpRequest = serde_json::from_str(&raw)
        .with_context(|| format!("parse request {}", args.request.display()))?;
    let result = run_catch_up(&request)?;
    info!(
        patient_age = %result.patient_age,
        recommendations = result.recommendations.len(),
        "evaluation complete"
    );
    match args.output {
        OutputArg::Table => print_result(&result),
        OutputArg::Json => println!(
            "{}",
            serde_json::to_string_pretty(&result).context("serialize result")?
        ),
    }
    Ok(())
}

pub fn run_vaccines() {
    let registry = registry();
    let mut rules: Vec<_> = registry.ids().filter_map(|id| registry.rule(id)).collect();
    rules.sort_by_key(|rule| rule.display_name);

    let mut table = Table::new();
    table.set_header(vec!["Vaccine", "Code", "Minimum age", "Doses", "Live"]);
    apply_table_style(&mut table);
    for rule in rules {
        table.add_row(vec![
            rule.display_name.to_string(),
            rule.id.to_string(),
            gap_label(rule.minimum_age),
            dose_label(rule.doses),
            if rule.live { "yes".to_string() } else { "-".to_string() },
        ]);
    }
    println!("{table}");
}

fn gap_label(gap: Gap) -> String {
    match gap {
        Gap::Days(0) => "birth".to_string(),
        Gap::Days(1) => "1 day".to_string(),
        Gap::Days(d) => format!("{d} days"),
        Gap::Weeks(1) => "1 week".to_string(),
        Gap::Weeks(w) => format!("{w} weeks"),
        Gap::Months(m) if m >= 24 && m % 12 == 0 => format!("{} years", m / 12),
        Gap::Months(1) => "1 month".to_string(),
        Gap::Months(m) => format!("{m} months"),
    }
}

fn dose_label(doses: DoseCount) -> String {
    match doses {
        DoseCount::Fixed(0) => "advisory".to_string(),
        DoseCount::Fixed(n) => n.to_string(),
        DoseCount::ByAge(_) => "by age".to_string(),
    }
}

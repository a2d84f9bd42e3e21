use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use acip_model::{CatchUpResult, DecisionType, Recommendation};

pub fn print_result(result: &CatchUpResult) {
    println!("Patient age: {}", result.patient_age);
    println!("Guidelines: CDC {}", result.cdc_version);
    let table = result_table(result);
    println!("{table}");
    print_advisories(&result.recommendations);
}

pub fn result_table(result: &CatchUpResult) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Vaccine"),
        header_cell("Decision"),
        header_cell("Recommendation"),
        header_cell("Next dose"),
        header_cell("Complete"),
        header_cell("Notes"),
    ]);
    apply_result_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Center);
    align_column(&mut table, 4, CellAlignment::Center);
    for recommendation in &result.recommendations {
        table.add_row(vec![
            Cell::new(&recommendation.vaccine_name)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            decision_cell(recommendation.decision_type),
            Cell::new(&recommendation.recommendation_text),
            next_dose_cell(recommendation),
            complete_cell(recommendation.series_complete),
            notes_cell(&recommendation.notes),
        ]);
    }
    table
}

fn print_advisories(recommendations: &[Recommendation]) {
    let mut advisories = Vec::new();
    for recommendation in recommendations {
        for text in recommendation
            .special_situations
            .iter()
            .chain(&recommendation.contraindications)
            .chain(&recommendation.precautions)
        {
            advisories.push((recommendation.vaccine_name.as_str(), text.as_str()));
        }
    }
    if advisories.is_empty() {
        return;
    }
    println!();
    println!("Advisories:");
    for (vaccine, text) in advisories {
        println!("- {vaccine}: {text}");
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_result_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(160);
    if table.column_count() >= 6 {
        table.set_constraints(vec![
            ColumnConstraint::UpperBoundary(Width::Fixed(24)),
            ColumnConstraint::UpperBoundary(Width::Fixed(26)),
            ColumnConstraint::UpperBoundary(Width::Percentage(35)),
            ColumnConstraint::LowerBoundary(Width::Fixed(12)),
            ColumnConstraint::LowerBoundary(Width::Fixed(10)),
            ColumnConstraint::UpperBoundary(Width::Percentage(30)),
        ]);
    }
}

fn decision_cell(decision: DecisionType) -> Cell {
    let cell = Cell::new(decision.as_str());
    match decision {
        DecisionType::Routine => cell.fg(Color::Green),
        DecisionType::CatchUp => cell.fg(Color::Yellow),
        DecisionType::SharedClinicalDecision => cell.fg(Color::Cyan),
        DecisionType::RiskBased => cell.fg(Color::Magenta),
        DecisionType::NotRecommended => cell.fg(Color::Red).add_attribute(Attribute::Bold),
        DecisionType::InternationalAdvisory => cell.fg(Color::DarkCyan),
        DecisionType::AgedOut => cell.fg(Color::DarkGrey),
    }
}

fn next_dose_cell(recommendation: &Recommendation) -> Cell {
    match recommendation.next_dose_date {
        Some(date) => Cell::new(date),
        None => dim_cell("-"),
    }
}

fn complete_cell(complete: bool) -> Cell {
    if complete {
        Cell::new("yes")
            .fg(Color::Green)
            .add_attribute(Attribute::Bold)
    } else {
        dim_cell("-")
    }
}

fn notes_cell(notes: &[String]) -> Cell {
    if notes.is_empty() {
        dim_cell("-")
    } else {
        Cell::new(notes.join("\n"))
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

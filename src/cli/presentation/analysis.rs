//! Analysis presentation: colored verdict, metrics table and findings.

use super::shared::{bullet_list, format_section_heading};
use crate::types::{AnalysisResult, Verdict};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;

fn format_verdict(verdict: Verdict) -> String {
    match verdict {
        Verdict::Feasible => verdict.as_str().green().bold().to_string(),
        Verdict::Plausible => verdict.as_str().blue().bold().to_string(),
        Verdict::Implausible => verdict.as_str().yellow().bold().to_string(),
        Verdict::Impossible => verdict.as_str().red().bold().to_string(),
    }
}

pub fn format_analysis_text(result: &AnalysisResult) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", format_section_heading("AEGIS Analysis")));
    out.push_str(&format!("  Verdict: {}\n", format_verdict(result.verdict)));
    out.push_str(&format!("  Risk: {:.0}%\n", result.risk_score * 100.0));
    out.push_str(&format!("  Domain: {}\n\n", result.domain));
    out.push_str(&format!("{}\n\n", result.summary));

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Physics", "Engineering", "Economics", "Safety"]);
    let scores = &result.scores;
    table.add_row(vec![
        scores.physics.to_string(),
        scores.engineering.to_string(),
        scores.economics.to_string(),
        scores.safety.to_string(),
    ]);
    out.push_str(&format!("{}\n\n", table));

    out.push_str(&format!(
        "{}\n  {} - {}\n\n",
        format_section_heading("Manufacturability"),
        result.manufacturability.rating,
        result.manufacturability.assessment
    ));

    for (title, items) in [
        ("Components", &result.component_breakdown),
        ("Physics laws", &result.applied_physics_laws),
        ("Key calculations", &result.key_calculations),
        ("Violated constraints", &result.violated_constraints),
    ] {
        out.push_str(&format!("{}\n", format_section_heading(title)));
        bullet_list(&mut out, items);
        out.push('\n');
    }

    if !result.failure_modes.is_empty() {
        out.push_str(&format!("{}\n\n", format_section_heading("Failure modes")));
        let mut table = Table::new();
        table.load_preset(UTF8_BORDERS_ONLY);
        table.set_header(vec!["Scenario", "Probability", "Impact", "Mitigation"]);
        for mode in &result.failure_modes {
            table.add_row(vec![
                mode.scenario.clone(),
                mode.probability.to_string(),
                mode.impact.to_string(),
                mode.mitigation.clone().unwrap_or_else(|| "-".to_string()),
            ]);
        }
        out.push_str(&format!("{}\n\n", table));
    }

    out.push_str(&format!("{}\n", format_section_heading("Optimizations")));
    bullet_list(&mut out, &result.optimizations);
    out.push('\n');

    out.push_str(&format!("{}\n", format_section_heading("Reasoning")));
    out.push_str(result.reasoning.trim_end());
    out
}

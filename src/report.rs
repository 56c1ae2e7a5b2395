//! Markdown engineering report for a finished analysis.

use crate::types::AnalysisResult;
use chrono::{DateTime, Utc};

/// Render the exportable report. `generated_at` is stamped under the heading.
pub fn render_markdown(result: &AnalysisResult, generated_at: DateTime<Utc>) -> String {
    let mut out = String::new();

    out.push_str(&format!("# AEGIS Engineering Report: {}\n\n", result.verdict));
    out.push_str(&format!(
        "_Generated {}_\n\n",
        generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    out.push_str(&format!("**Summary:** {}\n", result.summary));
    out.push_str(&format!("**Risk Score:** {:.0}%\n", result.risk_score * 100.0));
    out.push_str(&format!("**Domain:** {}\n", result.domain));

    section(&mut out, "System Metrics");
    let scores = &result.scores;
    for (label, value) in [
        ("Physics", scores.physics),
        ("Engineering", scores.engineering),
        ("Economics", scores.economics),
        ("Safety", scores.safety),
    ] {
        out.push_str(&format!("- {}: {}/100\n", label, value));
    }

    section(&mut out, "Manufacturability");
    out.push_str(&format!("- Rating: {}\n", result.manufacturability.rating));
    out.push_str(&format!(
        "- Assessment: {}\n",
        result.manufacturability.assessment
    ));

    bullets(&mut out, "Component Breakdown", &result.component_breakdown);
    bullets(&mut out, "Physics Laws Applied", &result.applied_physics_laws);
    bullets(&mut out, "Key Calculations", &result.key_calculations);

    section(&mut out, "Detailed Logic");
    out.push_str(&format!("{}\n", result.reasoning.trim_end()));

    bullets(&mut out, "Critical Violations", &result.violated_constraints);

    section(&mut out, "Failure Modes");
    if result.failure_modes.is_empty() {
        out.push_str("- None identified\n");
    }
    for mode in &result.failure_modes {
        out.push_str(&format!(
            "- [{}] {} (Prob: {})",
            mode.impact, mode.scenario, mode.probability
        ));
        if let Some(mitigation) = &mode.mitigation {
            out.push_str(&format!(" Mitigation: {}", mitigation));
        }
        out.push('\n');
    }

    bullets(&mut out, "Optimizations", &result.optimizations);
    out
}

fn section(out: &mut String, title: &str) {
    out.push_str(&format!("\n## {}\n", title));
}

fn bullets(out: &mut String, title: &str, items: &[String]) {
    section(out, title);
    for item in items {
        out.push_str(&format!("- {}\n", item));
    }
}

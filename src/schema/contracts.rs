//! The two output shapes: idea analysis and blueprint part list.

use super::{Field, Rule, SchemaContract};
use crate::types::{Impact, ManufacturabilityRating, PrimitiveType, Probability, Verdict};

/// Upper bound on blueprint primitives per response
pub const MAX_BLUEPRINT_PARTS: usize = 12;

fn score(name: &'static str, description: &'static str) -> Field {
    Field::required(name, Rule::number_between(0.0, 100.0)).describe(description)
}

fn string_list(name: &'static str, description: &'static str) -> Field {
    Field::required(name, Rule::array(Rule::string()).min_items(1)).describe(description)
}

fn vector3(name: &'static str, description: &'static str) -> Field {
    Field::required(name, Rule::array(Rule::number()).exact_items(3)).describe(description)
}

impl SchemaContract {
    /// Contract for a feasibility analysis.
    ///
    /// `domain` is optional: the service stamps the requested domain onto every
    /// result regardless of what the model returns.
    pub fn analysis() -> Self {
        let scores = Rule::object(vec![
            score("physics", "Adherence to physical laws (0-100)."),
            score("engineering", "Implementation feasibility (0-100)."),
            score("economics", "Cost/value viability (0-100)."),
            score("safety", "User and environmental safety (0-100)."),
        ]);

        let manufacturability = Rule::object(vec![
            Field::required("rating", Rule::one_of(&ManufacturabilityRating::LITERALS)),
            Field::required("assessment", Rule::string())
                .describe("Material availability and assembly assessment."),
        ]);

        let failure_mode = Rule::object(vec![
            Field::required("scenario", Rule::string()),
            Field::required("probability", Rule::one_of(&Probability::LITERALS)),
            Field::required("impact", Rule::one_of(&Impact::LITERALS)),
            Field::optional("mitigation", Rule::string())
                .describe("Potential fix, or 'None' if impossible."),
        ]);

        Self::new(
            "analysis",
            Rule::object(vec![
                Field::required("summary", Rule::string())
                    .describe("A concise executive summary of the analysis."),
                Field::required("riskScore", Rule::number_between(0.0, 1.0))
                    .describe("Risk from 0.0 (safe) to 1.0 (critical failure)."),
                Field::required("verdict", Rule::one_of(&Verdict::LITERALS)),
                Field::optional("domain", Rule::string())
                    .describe("The primary physics domain used for this analysis."),
                Field::required("scores", scores),
                string_list(
                    "componentBreakdown",
                    "Fundamental engineering components identified in step 1.",
                ),
                string_list(
                    "appliedPhysicsLaws",
                    "Specific physics laws applied in step 2.",
                ),
                string_list(
                    "keyCalculations",
                    "Calculations from step 3, e.g. 'Thrust = 500kN'.",
                ),
                Field::required("manufacturability", manufacturability),
                string_list(
                    "violatedConstraints",
                    "Physical laws, mathematical principles or logical constraints violated.",
                ),
                Field::required("failureModes", Rule::array(failure_mode)),
                string_list(
                    "optimizations",
                    "Concrete steps to improve feasibility, reduce mass, raise efficiency or lower risk.",
                ),
                Field::required("reasoning", Rule::string())
                    .describe("Detailed Markdown explanation citing laws and calculations."),
            ]),
        )
    }

    /// Contract for a blueprint: up to twelve primitives with distinct ids.
    pub fn blueprint() -> Self {
        let part = Rule::object(vec![
            Field::required("id", Rule::string()),
            Field::required("type", Rule::one_of(&PrimitiveType::LITERALS)),
            vector3("position", "[x, y, z] centre position"),
            vector3("rotation", "Euler angles in radians [x, y, z]"),
            vector3("scale", "[x, y, z] dimensions"),
            Field::required("color", Rule::hex_color()).describe("Hex colour code, e.g. #22d3ee"),
            Field::required("name", Rule::string()),
        ]);

        Self::new(
            "blueprint",
            Rule::array(part)
                .max_items(MAX_BLUEPRINT_PARTS)
                .unique_by("id"),
        )
    }
}

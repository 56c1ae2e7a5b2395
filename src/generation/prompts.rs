//! Prompt and system-instruction builders for the two generation operations.

use crate::schema::MAX_BLUEPRINT_PARTS;
use crate::types::{AnalysisRequest, EnvironmentalConditions, PhysicalProperties};

/// System instruction for idea analysis
pub const ANALYSIS_SYSTEM_INSTRUCTION: &str = "\
You are AEGIS, an autonomous engineering agent. You evaluate, design and validate \
ideas using fundamental physics laws, mathematical calculations and system logic \
before real-world implementation.

Your knowledge spans classical mechanics and dynamics, thermodynamics and statistical \
mechanics, electrodynamics and magnetism, quantum and particle physics, special and \
general relativity, fluid dynamics and aerodynamics, material science and \
crystallography, and chemistry and chemical kinetics.

Be rigorous: apply actual equations and physics laws.
Be objective: assign risk scores from failure probability, not optimism.
Be precise: use SI units and specific material properties.
Be context-aware: adhere strictly to any provided environmental conditions.

Do not exaggerate certainty. If a design violates physics, state it clearly as IMPOSSIBLE.";

const PROTOCOL_STEPS: &[(&str, &str)] = &[
    (
        "IDEA DECOMPOSITION",
        "Break the idea into fundamental engineering components (function, interfaces, constraints).",
    ),
    (
        "PHYSICS LAW APPLICATION",
        "Select and apply the relevant laws (e.g. Navier-Stokes, Maxwell's equations, General Relativity, Ideal Gas Law, Stefan-Boltzmann, Hooke's Law).",
    ),
    (
        "MATHEMATICAL CALCULATIONS",
        "Perform approximate but realistic calculations for forces, loads, temperatures and energy requirements using the stated conditions. Show equations.",
    ),
    (
        "DIMENSIONAL & SIZE ANALYSIS",
        "Analyze the provided dimensions or estimate them. Check tolerances.",
    ),
    (
        "FAILURE PREDICTION",
        "Predict primary and cascading failure modes with probabilities, specifically considering the {environment}.",
    ),
    (
        "MANUFACTURABILITY CHECK",
        "Evaluate material availability, assembly feasibility and precision requirements.",
    ),
    (
        "OPTIMIZATION SUGGESTIONS",
        "Suggest concrete redesigns or improvements.",
    ),
];

/// Build the user prompt for an idea analysis.
pub fn analysis_prompt(request: &AnalysisRequest) -> String {
    let domain = request.domain.label();
    let mut prompt = format!(
        "Execute the AEGIS Engineering Protocol for the following concept.\n\n\
         Input Concept: \"{}\"\n\n\
         Target Analysis Domain: {}\n\
         (Focus specifically on {} constraints and failure modes)\n",
        request.description.trim(),
        domain,
        domain
    );

    if let Some(props) = &request.physical_properties {
        prompt.push_str(&physical_section(props));
    }
    if let Some(env) = &request.environment {
        prompt.push_str(&environment_section(env));
    }

    let environment_label = if request.environment.is_some() {
        "DEFINED ENVIRONMENTAL CONDITIONS"
    } else {
        "environment"
    };

    prompt.push_str("\nPROTOCOL EXECUTION STEPS:\n");
    for (i, (title, body)) in PROTOCOL_STEPS.iter().enumerate() {
        prompt.push_str(&format!(
            "\nSTEP {}: {}\n{}\n",
            i + 1,
            title,
            body.replace("{environment}", environment_label)
        ));
    }
    prompt.push_str("\nOutput the final analysis in strict JSON format matching the schema.");
    prompt
}

fn physical_section(props: &PhysicalProperties) -> String {
    format!(
        "\nDefined Physical Constraints:\n\
         - Dimensions: {}m (W) x {}m (H) x {}m (D)\n\
         - Material: {}\n\
         - Estimated Volume: {:.2} m³\n\n\
         INSTRUCTION: Incorporate these physical dimensions and material properties into \
         your physics simulation (Step 4). If analyzing Structural Integrity, calculate \
         stress based on these dimensions.\n",
        props.width,
        props.height,
        props.depth,
        props.material,
        props.volume()
    )
}

fn environment_section(env: &EnvironmentalConditions) -> String {
    format!(
        "\nCRITICAL ENVIRONMENTAL CONDITIONS (SIMULATION PARAMETERS):\n\
         - Ambient Temperature: {}°C\n\
         - Atmospheric Pressure: {} atm\n\
         - Gravity: {} m/s²\n\
         - Humidity: {}%\n\
         - Wind Speed: {} m/s\n\
         - Atmosphere Composition: {}\n\n\
         INSTRUCTION: You MUST apply these specific environmental factors to your analysis.\n\
         - If Temperature is extreme (e.g. < -100C or > 500C), evaluate material phase changes, brittleness, or melting.\n\
         - If Pressure is high (e.g. > 10 atm) or low (vacuum), evaluate implosion/explosion risks and seal integrity.\n\
         - If Gravity is different from Earth (9.81), re-calculate structural loads and fluid dynamics.\n\
         - If Atmosphere is corrosive or lacks oxygen, evaluate oxidation, combustion viability, and chemical reactions.\n",
        env.temperature,
        env.pressure,
        env.gravity,
        env.humidity,
        env.wind_speed,
        env.atmosphere
    )
}

/// Build the prompt for blueprint synthesis.
pub fn blueprint_prompt(description: &str) -> String {
    format!(
        "You are the AEGIS CAD Submodule.\n\
         Decompose the following object/idea into a structural composition of basic \
         geometric primitives for preliminary engineering visualization.\n\n\
         Object to visualize: \"{}\"\n\n\
         Return a JSON array of up to {} parts.\n\
         Supported types: 'box', 'cylinder', 'sphere', 'cone', 'capsule'.\n\n\
         Coordinate system: Y is up. Center is (0,0,0).\n\
         Keep the total size roughly within a 5x5x5 unit box.\n\
         Give every part a unique id.\n\
         Use distinct colors (hex codes) for different components to make it look like a technical schematic.\n\
         Ensure the parts connect to form a cohesive structure representing the object.\n\
         Make it look engineered and structural.",
        description.trim(),
        MAX_BLUEPRINT_PARTS
    )
}

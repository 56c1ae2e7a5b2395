//! Domain types shared by the generation layer: requests, analysis results and
//! blueprint primitives.

use crate::error::AegisError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Physics domain that focuses an idea analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PhysicsDomain {
    #[default]
    General,
    #[serde(rename = "Structural Integrity")]
    StructuralIntegrity,
    Thermodynamics,
    Aerodynamics,
    Electromagnetism,
    #[serde(rename = "Fluid Dynamics")]
    FluidDynamics,
    #[serde(rename = "Quantum Mechanics")]
    QuantumMechanics,
    #[serde(rename = "Relativistic Physics")]
    RelativisticPhysics,
    Acoustics,
    Optics,
    #[serde(rename = "Chemical Kinetics")]
    ChemicalKinetics,
    Biomechanics,
    Astrophysics,
    Geophysics,
    #[serde(rename = "Material Science")]
    MaterialScience,
    #[serde(rename = "Nuclear Physics")]
    NuclearPhysics,
    #[serde(rename = "Plasma Physics")]
    PlasmaPhysics,
    Cybernetics,
    #[serde(rename = "Control Theory")]
    ControlTheory,
    #[serde(rename = "Orbital Mechanics")]
    OrbitalMechanics,
    Nanotechnology,
    Cryogenics,
    #[serde(rename = "High Energy Physics")]
    HighEnergyPhysics,
    Meteorology,
    Hydrodynamics,
}

impl PhysicsDomain {
    pub const ALL: [PhysicsDomain; 25] = [
        PhysicsDomain::General,
        PhysicsDomain::StructuralIntegrity,
        PhysicsDomain::Thermodynamics,
        PhysicsDomain::Aerodynamics,
        PhysicsDomain::Electromagnetism,
        PhysicsDomain::FluidDynamics,
        PhysicsDomain::QuantumMechanics,
        PhysicsDomain::RelativisticPhysics,
        PhysicsDomain::Acoustics,
        PhysicsDomain::Optics,
        PhysicsDomain::ChemicalKinetics,
        PhysicsDomain::Biomechanics,
        PhysicsDomain::Astrophysics,
        PhysicsDomain::Geophysics,
        PhysicsDomain::MaterialScience,
        PhysicsDomain::NuclearPhysics,
        PhysicsDomain::PlasmaPhysics,
        PhysicsDomain::Cybernetics,
        PhysicsDomain::ControlTheory,
        PhysicsDomain::OrbitalMechanics,
        PhysicsDomain::Nanotechnology,
        PhysicsDomain::Cryogenics,
        PhysicsDomain::HighEnergyPhysics,
        PhysicsDomain::Meteorology,
        PhysicsDomain::Hydrodynamics,
    ];

    /// Human-readable label, identical to the serialized form
    pub fn label(self) -> &'static str {
        match self {
            PhysicsDomain::General => "General",
            PhysicsDomain::StructuralIntegrity => "Structural Integrity",
            PhysicsDomain::Thermodynamics => "Thermodynamics",
            PhysicsDomain::Aerodynamics => "Aerodynamics",
            PhysicsDomain::Electromagnetism => "Electromagnetism",
            PhysicsDomain::FluidDynamics => "Fluid Dynamics",
            PhysicsDomain::QuantumMechanics => "Quantum Mechanics",
            PhysicsDomain::RelativisticPhysics => "Relativistic Physics",
            PhysicsDomain::Acoustics => "Acoustics",
            PhysicsDomain::Optics => "Optics",
            PhysicsDomain::ChemicalKinetics => "Chemical Kinetics",
            PhysicsDomain::Biomechanics => "Biomechanics",
            PhysicsDomain::Astrophysics => "Astrophysics",
            PhysicsDomain::Geophysics => "Geophysics",
            PhysicsDomain::MaterialScience => "Material Science",
            PhysicsDomain::NuclearPhysics => "Nuclear Physics",
            PhysicsDomain::PlasmaPhysics => "Plasma Physics",
            PhysicsDomain::Cybernetics => "Cybernetics",
            PhysicsDomain::ControlTheory => "Control Theory",
            PhysicsDomain::OrbitalMechanics => "Orbital Mechanics",
            PhysicsDomain::Nanotechnology => "Nanotechnology",
            PhysicsDomain::Cryogenics => "Cryogenics",
            PhysicsDomain::HighEnergyPhysics => "High Energy Physics",
            PhysicsDomain::Meteorology => "Meteorology",
            PhysicsDomain::Hydrodynamics => "Hydrodynamics",
        }
    }
}

impl fmt::Display for PhysicsDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PhysicsDomain {
    type Err = String;

    /// Accepts labels case-insensitively, with spaces, dashes or underscores
    /// between words (`structural-integrity`, `Structural Integrity`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize_label(s);
        PhysicsDomain::ALL
            .iter()
            .copied()
            .find(|domain| normalize_label(domain.label()) == wanted)
            .ok_or_else(|| format!("Unknown physics domain: {}", s))
    }
}

fn normalize_label(s: &str) -> String {
    s.trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Categorical feasibility outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    Feasible,
    Plausible,
    Implausible,
    Impossible,
}

impl Verdict {
    pub const LITERALS: [&'static str; 4] = ["FEASIBLE", "PLAUSIBLE", "IMPLAUSIBLE", "IMPOSSIBLE"];

    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::Feasible => "FEASIBLE",
            Verdict::Plausible => "PLAUSIBLE",
            Verdict::Implausible => "IMPLAUSIBLE",
            Verdict::Impossible => "IMPOSSIBLE",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Probability {
    Low,
    Medium,
    High,
    Certain,
}

impl Probability {
    pub const LITERALS: [&'static str; 4] = ["Low", "Medium", "High", "Certain"];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Impact {
    Minor,
    Major,
    Catastrophic,
}

impl Impact {
    pub const LITERALS: [&'static str; 3] = ["Minor", "Major", "Catastrophic"];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ManufacturabilityRating {
    High,
    Medium,
    Low,
    None,
}

impl ManufacturabilityRating {
    pub const LITERALS: [&'static str; 4] = ["High", "Medium", "Low", "None"];
}

impl fmt::Display for Probability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(Probability::LITERALS[*self as usize])
    }
}

impl fmt::Display for Impact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(Impact::LITERALS[*self as usize])
    }
}

impl fmt::Display for ManufacturabilityRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(ManufacturabilityRating::LITERALS[*self as usize])
    }
}

/// Geometric primitive of a blueprint part
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    Box,
    Cylinder,
    Sphere,
    Cone,
    Capsule,
}

impl PrimitiveType {
    pub const LITERALS: [&'static str; 5] = ["box", "cylinder", "sphere", "cone", "capsule"];

    pub fn as_str(self) -> &'static str {
        match self {
            PrimitiveType::Box => "box",
            PrimitiveType::Cylinder => "cylinder",
            PrimitiveType::Sphere => "sphere",
            PrimitiveType::Cone => "cone",
            PrimitiveType::Capsule => "capsule",
        }
    }
}

/// Physical envelope of the artifact (metres)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicalProperties {
    pub width: f64,
    pub height: f64,
    pub depth: f64,
    pub material: String,
}

impl PhysicalProperties {
    /// Bounding volume in cubic metres
    pub fn volume(&self) -> f64 {
        self.width * self.height * self.depth
    }

    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("width", self.width),
            ("height", self.height),
            ("depth", self.depth),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(format!("{} must be a positive number, got {}", name, value));
            }
        }
        if self.material.trim().is_empty() {
            return Err("material cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Simulation environment for an analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentalConditions {
    /// Celsius
    pub temperature: f64,
    /// Atmospheres
    pub pressure: f64,
    /// m/s²
    pub gravity: f64,
    /// Percent
    pub humidity: f64,
    /// m/s
    pub wind_speed: f64,
    /// Composition, e.g. "Earth Standard", "Mars CO2", "Vacuum"
    pub atmosphere: String,
}

impl Default for EnvironmentalConditions {
    fn default() -> Self {
        Self {
            temperature: 20.0,
            pressure: 1.0,
            gravity: 9.81,
            humidity: 50.0,
            wind_speed: 0.0,
            atmosphere: "Earth Standard".to_string(),
        }
    }
}

impl EnvironmentalConditions {
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("temperature", self.temperature),
            ("pressure", self.pressure),
            ("gravity", self.gravity),
            ("humidity", self.humidity),
            ("windSpeed", self.wind_speed),
        ] {
            if !value.is_finite() {
                return Err(format!("{} must be a finite number", name));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub description: String,
    #[serde(default)]
    pub domain: PhysicsDomain,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical_properties: Option<PhysicalProperties>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<EnvironmentalConditions>,
}

impl AnalysisRequest {
    pub fn new(description: impl Into<String>, domain: PhysicsDomain) -> Self {
        Self {
            description: description.into(),
            domain,
            physical_properties: None,
            environment: None,
        }
    }

    pub fn with_physical_properties(mut self, properties: PhysicalProperties) -> Self {
        self.physical_properties = Some(properties);
        self
    }

    pub fn with_environment(mut self, environment: EnvironmentalConditions) -> Self {
        self.environment = Some(environment);
        self
    }

    /// Reject requests that could never produce a meaningful call.
    pub fn validate(&self) -> Result<(), AegisError> {
        validate_description(&self.description)?;
        if let Some(props) = &self.physical_properties {
            props
                .validate()
                .map_err(|e| AegisError::Request(format!("Invalid physical properties: {}", e)))?;
        }
        if let Some(env) = &self.environment {
            env.validate().map_err(|e| {
                AegisError::Request(format!("Invalid environmental conditions: {}", e))
            })?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlueprintRequest {
    pub description: String,
}

impl BlueprintRequest {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }

    pub fn validate(&self) -> Result<(), AegisError> {
        validate_description(&self.description)
    }
}

fn validate_description(description: &str) -> Result<(), AegisError> {
    if description.trim().is_empty() {
        return Err(AegisError::Request(
            "Description cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// A single generation call, consumed once
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GenerationRequest {
    Analysis(AnalysisRequest),
    Blueprint(BlueprintRequest),
}

/// Typed result of a [`GenerationRequest`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "result", rename_all = "snake_case")]
pub enum GenerationOutcome {
    Analysis(AnalysisResult),
    Blueprint(Vec<BlueprintPart>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scores {
    pub physics: f64,
    pub engineering: f64,
    pub economics: f64,
    pub safety: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manufacturability {
    pub rating: ManufacturabilityRating,
    pub assessment: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureMode {
    pub scenario: String,
    pub probability: Probability,
    pub impact: Impact,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mitigation: Option<String>,
}

/// Structured feasibility evaluation of an idea
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub summary: String,
    pub risk_score: f64,
    pub verdict: Verdict,
    pub domain: PhysicsDomain,
    pub scores: Scores,
    pub component_breakdown: Vec<String>,
    pub applied_physics_laws: Vec<String>,
    pub key_calculations: Vec<String>,
    pub manufacturability: Manufacturability,
    pub violated_constraints: Vec<String>,
    pub failure_modes: Vec<FailureMode>,
    pub optimizations: Vec<String>,
    pub reasoning: String,
}

/// One geometric primitive of a blueprint (Y up, centred on the origin)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlueprintPart {
    pub id: String,
    #[serde(rename = "type")]
    pub primitive: PrimitiveType,
    pub position: [f64; 3],
    /// Euler angles in radians
    pub rotation: [f64; 3],
    pub scale: [f64; 3],
    pub color: String,
    pub name: String,
}

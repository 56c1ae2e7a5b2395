//! Integration tests for the declarative output contracts

use super::test_utils::{analysis, blueprint, part};
use aegis::schema::{SchemaContract, MAX_BLUEPRINT_PARTS};
use aegis::types::{AnalysisResult, BlueprintPart, PhysicsDomain};
use serde_json::json;

#[test]
fn test_analysis_response_schema_lists_required_fields() {
    let schema = SchemaContract::analysis().response_schema();
    assert_eq!(schema["type"], "OBJECT");

    let required: Vec<&str> = schema["required"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    for field in ["summary", "riskScore", "verdict", "scores", "failureModes", "reasoning"] {
        assert!(required.contains(&field), "{} should be required", field);
    }
    assert!(!required.contains(&"domain"));
    assert_eq!(
        schema["properties"]["verdict"]["enum"],
        json!(["FEASIBLE", "PLAUSIBLE", "IMPLAUSIBLE", "IMPOSSIBLE"])
    );
    assert_eq!(schema["properties"]["scores"]["properties"]["safety"]["maximum"], json!(100.0));
}

#[test]
fn test_valid_analysis_decodes_into_typed_result() {
    let raw = analysis("Structural Integrity");
    SchemaContract::analysis().validate(&raw).unwrap();
    let result: AnalysisResult = serde_json::from_value(raw).unwrap();
    assert_eq!(result.domain, PhysicsDomain::StructuralIntegrity);
    assert_eq!(result.failure_modes[0].mitigation.as_deref(), Some("Containment ring"));
}

#[test]
fn test_extra_fields_are_tolerated() {
    let mut raw = analysis("General");
    raw["confidence"] = json!("high");
    assert!(SchemaContract::analysis().validate(&raw).is_ok());
}

#[test]
fn test_missing_required_field_is_named() {
    let mut raw = analysis("General");
    raw.as_object_mut().unwrap().remove("reasoning");
    let err = SchemaContract::analysis().validate(&raw).unwrap_err();
    assert_eq!(err.field, "reasoning");
}

#[test]
fn test_blueprint_bound_is_inclusive() {
    let contract = SchemaContract::blueprint();
    assert!(contract.validate(&blueprint(MAX_BLUEPRINT_PARTS)).is_ok());
    assert!(contract.validate(&blueprint(MAX_BLUEPRINT_PARTS + 1)).is_err());
}

#[test]
fn test_blueprint_part_rules() {
    let contract = SchemaContract::blueprint();

    let mut bad_type = part("a");
    bad_type["type"] = json!("torus");
    assert_eq!(contract.validate(&json!([bad_type])).unwrap_err().field, "[0].type");

    let mut bad_color = part("a");
    bad_color["color"] = json!("teal");
    assert_eq!(contract.validate(&json!([bad_color])).unwrap_err().field, "[0].color");

    let mut with_alpha = part("a");
    with_alpha["color"] = json!("#22d3eeff");
    assert!(contract.validate(&json!([with_alpha])).is_ok());

    let parts: Vec<BlueprintPart> = serde_json::from_value(blueprint(3)).unwrap();
    assert_eq!(parts[2].name, "Part p2");
}

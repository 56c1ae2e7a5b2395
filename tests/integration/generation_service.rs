//! Integration tests for the typed generation operations

use super::test_utils::{analysis, blueprint, executor, part, ScriptedClient};
use aegis::error::AegisError;
use aegis::provider::GenerationResponse;
use aegis::types::{
    AnalysisRequest, EnvironmentalConditions, GenerationOutcome, GenerationRequest,
    PhysicsDomain, PrimitiveType, Verdict,
};
use aegis::GenerationService;
use serde_json::json;

fn service_returning(body: serde_json::Value) -> (GenerationService, std::sync::Arc<ScriptedClient>) {
    let text = body.to_string();
    let client = ScriptedClient::new(move |_, _| Ok(GenerationResponse::text(text.clone())));
    (GenerationService::new(executor(&["k1"], client.clone())), client)
}

#[tokio::test]
async fn test_requested_domain_wins_over_model_domain() {
    let (service, _) = service_returning(analysis("Optics"));
    let request = AnalysisRequest::new("Flywheel energy store", PhysicsDomain::Thermodynamics);

    let result = service.analyze_idea(&request).await.unwrap();

    assert_eq!(result.domain, PhysicsDomain::Thermodynamics);
    assert_eq!(result.verdict, Verdict::Plausible);
    assert_eq!(result.scores.physics, 85.0);
    assert_eq!(result.component_breakdown.len(), 3);
}

#[tokio::test]
async fn test_missing_model_domain_is_filled_in() {
    let mut body = analysis("ignored");
    body.as_object_mut().unwrap().remove("domain");
    let (service, _) = service_returning(body);

    let request = AnalysisRequest::new("Arctic shelter", PhysicsDomain::Cryogenics)
        .with_environment(EnvironmentalConditions {
            temperature: -50.0,
            ..EnvironmentalConditions::default()
        });
    let result = service.analyze_idea(&request).await.unwrap();
    assert_eq!(result.domain, PhysicsDomain::Cryogenics);
}

#[tokio::test]
async fn test_malformed_model_domain_is_overwritten_before_validation() {
    for bad_domain in [json!({ "primary": "Optics" }), json!(42), json!(null)] {
        let mut body = analysis("General");
        body["domain"] = bad_domain;
        let (service, client) = service_returning(body);

        let request = AnalysisRequest::new("Solar kiln", PhysicsDomain::Thermodynamics);
        let result = service.analyze_idea(&request).await.unwrap();

        assert_eq!(result.domain, PhysicsDomain::Thermodynamics);
        assert_eq!(client.calls(), 1);
    }
}

#[tokio::test]
async fn test_analysis_score_out_of_range_names_field() {
    let mut body = analysis("General");
    body["scores"]["economics"] = json!(140);
    let (service, _) = service_returning(body);

    let err = service
        .analyze_idea(&AnalysisRequest::new("Space elevator", PhysicsDomain::General))
        .await
        .unwrap_err();
    match err {
        AegisError::Validation(e) => assert_eq!(e.field, "scores.economics"),
        other => panic!("expected validation error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_empty_blueprint_is_success() {
    let (service, _) = service_returning(json!([]));
    let parts = service.generate_blueprint("An abstract idea").await.unwrap();
    assert!(parts.is_empty());
}

#[tokio::test]
async fn test_blueprint_over_twelve_parts_is_rejected() {
    let (service, _) = service_returning(blueprint(13));
    let err = service.generate_blueprint("A city").await.unwrap_err();
    assert_eq!(err.kind(), "validation");
}

#[tokio::test]
async fn test_blueprint_duplicate_ids_are_rejected() {
    let (service, _) = service_returning(json!([part("a"), part("b"), part("a")]));
    match service.generate_blueprint("A table").await.unwrap_err() {
        AegisError::Validation(e) => assert_eq!(e.field, "[2].id"),
        other => panic!("expected validation error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_blueprint_parts_decode() {
    let (service, _) = service_returning(blueprint(12));
    let parts = service.generate_blueprint("A robot arm").await.unwrap();
    assert_eq!(parts.len(), 12);
    assert!(parts.iter().all(|p| p.primitive == PrimitiveType::Box));
    assert_eq!(parts[11].id, "p11");
}

#[tokio::test]
async fn test_missing_payload_is_empty_response() {
    let client = ScriptedClient::new(|_, _| Ok(GenerationResponse::empty()));
    let service = GenerationService::new(executor(&["k1"], client.clone()));

    let err = service.generate_blueprint("A lamp").await.unwrap_err();
    assert_eq!(err.kind(), "empty_response");
    assert_eq!(client.calls(), 1);
}

#[tokio::test]
async fn test_blank_description_makes_no_call() {
    let (service, client) = service_returning(json!([]));
    let err = service.generate_blueprint("   ").await.unwrap_err();
    assert_eq!(err.kind(), "request");
    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn test_generate_accepts_tagged_requests() {
    let (service, _) = service_returning(analysis("General"));
    let request: GenerationRequest = serde_json::from_value(json!({
        "kind": "analysis",
        "description": "Solar sail",
        "domain": "Orbital Mechanics"
    }))
    .unwrap();

    match service.generate(request).await.unwrap() {
        GenerationOutcome::Analysis(result) => {
            assert_eq!(result.domain, PhysicsDomain::OrbitalMechanics)
        }
        other => panic!("expected analysis, got {:?}", other),
    }
}

//! Integration test: Server API endpoints

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use loan_approval::inference::InferenceService;
use loan_approval::models::{LogisticRegression, Model};
use loan_approval::preprocessing::{EncoderSet, FeatureSchema, StandardScaler, REQUIRED_FIELDS};
use loan_approval::server::{create_router, AppState};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceExt;

fn test_app() -> axum::Router {
    let model_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("model");
    let state = Arc::new(AppState::load(model_dir));
    create_router(state)
}

fn degraded_app(dir: &tempfile::TempDir) -> axum::Router {
    let state = Arc::new(AppState::load(dir.path()));
    create_router(state)
}

/// Logistic model over unscaled features that approves on credit history alone
fn mock_app() -> axum::Router {
    let schema = FeatureSchema::new(REQUIRED_FIELDS.iter().map(|f| f.to_string()).collect()).unwrap();
    let scaler = StandardScaler::new(vec![0.0; 11], vec![1.0; 11]).unwrap();
    let mut coefficients = vec![0.0; 11];
    coefficients[9] = 6.0;
    let model = Model::LogisticRegression(LogisticRegression::new(coefficients, -3.0).unwrap());
    let encoders: EncoderSet = serde_json::from_value(json!({
        "Gender": {"classes": ["Female", "Male"]},
        "Married": {"classes": ["No", "Yes"]},
        "Dependents": {"classes": ["0", "1", "2", "3+"]},
        "Education": {"classes": ["Graduate", "Not Graduate"]},
        "Self_Employed": {"classes": ["No", "Yes"]},
        "Property_Area": {"classes": ["Rural", "Semiurban", "Urban"]}
    }))
    .unwrap();
    let service = InferenceService::new(schema, encoders, scaler, model).unwrap();

    let state = AppState::with_service(service);
    create_router(Arc::new(state))
}

fn application() -> Value {
    json!({
        "Gender": "Male",
        "Married": "Yes",
        "Dependents": "1",
        "Education": "Graduate",
        "Self_Employed": "No",
        "ApplicantIncome": 5849,
        "CoapplicantIncome": 0,
        "LoanAmount": 146,
        "Loan_Amount_Term": 360,
        "Credit_History": 1,
        "Property_Area": "Urban"
    })
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_home_endpoint() {
    let response = test_app().oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["message"], "Loan Approval Prediction API");
    assert_eq!(json["status"], "running");
    assert_eq!(json["model_loaded"], true);
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn test_health_endpoint() {
    let response = test_app().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["model_loaded"], true);
    for component in ["model", "scaler", "encoders", "features"] {
        assert_eq!(json["components"][component], true, "component {}", component);
    }
}

#[tokio::test]
async fn test_model_info_endpoint() {
    let response = test_app().oneshot(get("/model-info")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["model_type"], "RandomForestClassifier");
    assert_eq!(json["model_loaded"], true);
    assert_eq!(json["features"].as_array().unwrap().len(), 11);
    assert_eq!(json["features"][0], "Gender");
    assert!(json["description"].is_string());

    let importance = json["feature_importance"].as_object().unwrap();
    assert_eq!(importance.len(), 11);
    let scores: Vec<f64> = importance.values().map(|v| v.as_f64().unwrap()).collect();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    assert_eq!(importance.keys().next().unwrap(), "Credit_History");
}

#[tokio::test]
async fn test_predict_reference_application() {
    let response = test_app()
        .oneshot(post_json("/predict", application().to_string()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let prediction = json["prediction"].as_str().unwrap();
    assert!(prediction == "Approved" || prediction == "Rejected");
    let confidence = json["confidence"].as_f64().unwrap();
    assert!((0.5..=1.0).contains(&confidence));
    assert!(json["message"].is_string());
    assert_eq!(json["input_data"], application());
    assert!(json["feature_importance"].is_object());
}

#[tokio::test]
async fn test_predict_missing_credit_history() {
    let mut input = application();
    input.as_object_mut().unwrap().remove("Credit_History");

    let response = test_app()
        .oneshot(post_json("/predict", input.to_string()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("Credit_History"));
}

#[tokio::test]
async fn test_predict_unseen_category() {
    let mut input = application();
    input["Property_Area"] = json!("Moon");

    let response = test_app()
        .oneshot(post_json("/predict", input.to_string()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert!(json["prediction"].is_string());
}

#[tokio::test]
async fn test_predict_empty_body() {
    let response = test_app()
        .oneshot(post_json("/predict", "{}".to_string()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "No data provided");
}

#[tokio::test]
async fn test_predict_invalid_json() {
    let response = test_app()
        .oneshot(post_json("/predict", "{not json".to_string()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["error"].is_string());
}

#[tokio::test]
async fn test_predict_unparseable_number() {
    let mut input = application();
    input["LoanAmount"] = json!("plenty");

    let response = test_app()
        .oneshot(post_json("/predict", input.to_string()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Error processing input data");
}

#[tokio::test]
async fn test_degraded_without_artifacts() {
    let dir = tempfile::tempdir().unwrap();

    let response = degraded_app(&dir).oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["model_loaded"], false);
    assert_eq!(json["components"]["model"], false);

    let response = degraded_app(&dir).oneshot(get("/model-info")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["model_loaded"], false);
    assert!(json["model_type"].is_null());
    assert!(json.get("feature_importance").is_none());

    let response = degraded_app(&dir)
        .oneshot(post_json("/predict", application().to_string()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert!(body_json(response).await["error"].is_string());
}

#[tokio::test]
async fn test_degraded_still_validates_input_first() {
    let dir = tempfile::tempdir().unwrap();

    let response = degraded_app(&dir)
        .oneshot(post_json("/predict", json!({"Gender": "Male"}).to_string()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error = body_json(response).await["error"].as_str().unwrap().to_string();
    assert!(error.starts_with("Missing required fields: Married"));
    assert!(error.contains("Credit_History"));

    let response = degraded_app(&dir)
        .oneshot(post_json("/predict", "{}".to_string()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "No data provided");
}

#[tokio::test]
async fn test_unknown_route() {
    let response = test_app().oneshot(get("/nonexistent")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_json(response).await["error"].is_string());
}

#[tokio::test]
async fn test_wrong_method() {
    let response = test_app().oneshot(get("/predict")).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_mock_model_without_importances() {
    let response = mock_app()
        .oneshot(post_json("/predict", application().to_string()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["prediction"], "Approved");
    assert!(json["feature_importance"].is_null());

    let response = mock_app().oneshot(get("/model-info")).await.unwrap();
    let json = body_json(response).await;
    assert_eq!(json["model_type"], "LogisticRegression");
    assert!(json.get("feature_importance").is_none());
}

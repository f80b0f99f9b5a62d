use std::sync::{Arc, Mutex};

use crate::advisor::domain::UserProfile;
use crate::advisor::eligibility::EligibilityEngine;
use crate::advisor::generation::{GenerationError, TextGenerator};
use crate::advisor::router::advisor_router;
use crate::advisor::service::AdvisorService;
use crate::advisor::store::MemoryConversationStore;
use crate::catalog::{Scheme, SchemeCatalog, SchemeLevel};

pub(super) fn base_scheme(name: &str, level: SchemeLevel) -> Scheme {
    Scheme {
        scheme_name: name.to_string(),
        scheme_level: level,
        state: None,
        category: None,
        min_age: 0,
        max_age: 100,
        education_level: "Any".to_string(),
        eligible_gender: Vec::new(),
        eligible_occupation: vec!["All".to_string()],
        description: String::new(),
        benefits: String::new(),
        how_to_apply: String::new(),
        documents_required: Vec::new(),
        last_date: None,
        application_url: None,
    }
}

pub(super) fn merit_scholarship() -> Scheme {
    let mut scheme = base_scheme("National Merit Scholarship", SchemeLevel::Central);
    scheme.category = Some("Scholarship".to_string());
    scheme.min_age = 18;
    scheme.max_age = 25;
    scheme.description =
        "Merit-based financial support for students enrolled in recognised institutions."
            .to_string();
    scheme.benefits = "Annual grant of Rs 50,000 plus book allowance.".to_string();
    scheme.how_to_apply = "Apply online through the National Scholarship Portal.".to_string();
    scheme.documents_required = vec![
        "Aadhaar Card".to_string(),
        "Previous year marksheet".to_string(),
        "Bank passbook".to_string(),
    ];
    scheme.last_date = Some("2026-10-31".to_string());
    scheme.application_url = Some("https://scholarships.gov.in".to_string());
    scheme
}

pub(super) fn bihar_student_credit() -> Scheme {
    let mut scheme = base_scheme("Bihar Student Credit Card", SchemeLevel::State);
    scheme.state = Some("Bihar".to_string());
    scheme.category = Some("Education Loan".to_string());
    scheme.min_age = 18;
    scheme.max_age = 30;
    scheme.education_level = "Undergraduate".to_string();
    scheme.eligible_occupation = vec!["Student".to_string()];
    scheme.description = "Education loan support for students of Bihar.".to_string();
    scheme.benefits = "Loan up to Rs 4 lakh at subsidised interest.".to_string();
    scheme.last_date = Some("rolling".to_string());
    scheme
}

pub(super) fn maharashtra_farmer_support() -> Scheme {
    let mut scheme = base_scheme("Maharashtra Farmer Support", SchemeLevel::State);
    scheme.state = Some("Maharashtra".to_string());
    scheme.min_age = 18;
    scheme.eligible_occupation = vec!["Farmer".to_string()];
    scheme.description = "Direct income support for farmers of Maharashtra.".to_string();
    scheme
}

pub(super) fn senior_pension() -> Scheme {
    let mut scheme = base_scheme("National Senior Pension", SchemeLevel::Central);
    scheme.min_age = 60;
    scheme.eligible_occupation = vec!["Senior Citizen".to_string()];
    scheme.description = "Monthly pension for senior citizens.".to_string();
    scheme
}

pub(super) fn skill_training_scheme() -> Scheme {
    let mut scheme = base_scheme("National Skill Training Mission", SchemeLevel::Central);
    scheme.education_level = "Skill Training".to_string();
    scheme.eligible_occupation = vec!["Unemployed".to_string(), "Job Seeker".to_string()];
    scheme.description = "Free vocational training with placement assistance.".to_string();
    scheme
}

pub(super) fn women_entrepreneur_grant() -> Scheme {
    let mut scheme = base_scheme("Women Entrepreneur Grant", SchemeLevel::Central);
    scheme.min_age = 18;
    scheme.max_age = 60;
    scheme.eligible_gender = vec!["Female".to_string()];
    scheme.eligible_occupation = vec!["Entrepreneur".to_string(), "Self-Employed".to_string()];
    scheme
}

pub(super) fn catalog() -> SchemeCatalog {
    SchemeCatalog::from_schemes(vec![
        merit_scholarship(),
        bihar_student_credit(),
        maharashtra_farmer_support(),
        senior_pension(),
        skill_training_scheme(),
        women_entrepreneur_grant(),
    ])
}

pub(super) fn student_profile() -> UserProfile {
    UserProfile {
        age: Some(22),
        education: Some("Undergraduate".to_string()),
        gender: Some("Female".to_string()),
        occupation: Some("Student".to_string()),
        state: Some("Bihar".to_string()),
    }
}

pub(super) fn engine() -> EligibilityEngine {
    EligibilityEngine::default()
}

/// Deterministic backend that records every prompt it is asked to complete.
pub(super) struct RecordingGenerator {
    pub(super) prompts: Mutex<Vec<String>>,
    pub(super) response: String,
}

impl RecordingGenerator {
    pub(super) fn new(response: &str) -> Self {
        Self {
            prompts: Mutex::new(Vec::new()),
            response: response.to_string(),
        }
    }

    pub(super) fn recorded_prompts(&self) -> Vec<String> {
        self.prompts.lock().expect("prompt mutex poisoned").clone()
    }
}

impl TextGenerator for RecordingGenerator {
    fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        self.prompts
            .lock()
            .expect("prompt mutex poisoned")
            .push(prompt.to_string());
        Ok(self.response.clone())
    }
}

pub(super) struct FailingGenerator;

impl TextGenerator for FailingGenerator {
    fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
        Err(GenerationError::Unavailable("backend offline".to_string()))
    }
}

pub(super) fn build_service() -> (
    AdvisorService<MemoryConversationStore, RecordingGenerator>,
    Arc<MemoryConversationStore>,
    Arc<RecordingGenerator>,
) {
    let store = Arc::new(MemoryConversationStore::default());
    let generator = Arc::new(RecordingGenerator::new("A short plain-language summary."));
    let service = AdvisorService::new(Arc::new(catalog()), store.clone(), generator.clone());
    (service, store, generator)
}

pub(super) fn build_service_with_response(
    response: &str,
) -> (
    AdvisorService<MemoryConversationStore, RecordingGenerator>,
    Arc<RecordingGenerator>,
) {
    let generator = Arc::new(RecordingGenerator::new(response));
    let service = AdvisorService::new(
        Arc::new(catalog()),
        Arc::new(MemoryConversationStore::default()),
        generator.clone(),
    );
    (service, generator)
}

pub(super) fn build_failing_service() -> AdvisorService<MemoryConversationStore, FailingGenerator> {
    AdvisorService::new(
        Arc::new(catalog()),
        Arc::new(MemoryConversationStore::default()),
        Arc::new(FailingGenerator),
    )
}

pub(super) fn router_with_service(
    service: AdvisorService<MemoryConversationStore, RecordingGenerator>,
) -> axum::Router {
    advisor_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

use std::sync::Arc;

use anyhow::Result;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use hospital_api::{
    api::rest::{routes, AppState},
    domain::auth::TokenSigner,
    domain::service::Service,
    infra::storage::migrations::Migrator,
};

/// Create a fresh test database for each test
async fn create_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// Router plus a handle on the service for direct state manipulation
async fn create_test_app() -> (Router, Arc<Service>) {
    let db = create_test_db().await;
    let service = Arc::new(Service::new(db, TokenSigner::new("test-secret", 30)));
    let router = routes::router(AppState::new(service.clone(), false));
    (router, service)
}

/// Fire one request and decode the JSON body.
async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(value) => builder
            .header("content-type", "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn register(app: &Router, body: Value) -> Value {
    let (status, value) = send(app, "POST", "/api/auth/register", None, Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {value}");
    value
}

fn patient_body(name: &str, email: &str) -> Value {
    json!({ "name": name, "email": email, "password": "secret123" })
}

fn doctor_body(name: &str, email: &str, specialization: &str, license: &str) -> Value {
    json!({
        "name": name,
        "email": email,
        "password": "secret123",
        "role": "doctor",
        "specialization": specialization,
        "licenseNumber": license,
        "experienceYears": 7,
    })
}

fn admin_body(name: &str, email: &str) -> Value {
    json!({ "name": name, "email": email, "password": "secret123", "role": "admin" })
}

fn token_of(session: &Value) -> String {
    session["token"].as_str().expect("token in session").to_string()
}

/// Register a doctor and a patient, return (doctor token, doctor profile id,
/// patient token, patient profile id).
async fn seed_doctor_and_patient(app: &Router) -> (String, Uuid, String, Uuid) {
    let doctor = register(
        app,
        doctor_body("Dr. Grey", "grey@example.com", "Cardiology", "LIC-100"),
    )
    .await;
    let doctor_token = token_of(&doctor);
    let doctor_user_id = doctor["id"].as_str().unwrap().to_string();

    let patient = register(app, patient_body("Pat Doe", "pat@example.com")).await;
    let patient_token = token_of(&patient);
    let patient_user_id = patient["id"].as_str().unwrap().to_string();

    let (status, doctor_profile) = send(
        app,
        "GET",
        &format!("/api/doctors/profile/{doctor_user_id}"),
        Some(&doctor_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let doctor_id: Uuid = doctor_profile["id"].as_str().unwrap().parse().unwrap();

    let (status, patient_profile) = send(
        app,
        "GET",
        &format!("/api/patients/profile/{patient_user_id}"),
        Some(&patient_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let patient_id: Uuid = patient_profile["id"].as_str().unwrap().parse().unwrap();

    (doctor_token, doctor_id, patient_token, patient_id)
}

fn booking(patient_id: Uuid, doctor_id: Uuid, date: &str, time: &str) -> Value {
    json!({
        "patientId": patient_id,
        "doctorId": doctor_id,
        "appointmentDate": date,
        "appointmentTime": time,
        "reason": "Checkup",
    })
}

#[tokio::test]
async fn test_register_returns_session_without_password() -> Result<()> {
    let (app, _) = create_test_app().await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/register")
        .header("content-type", "application/json")
        .body(Body::from(
            patient_body("Pat Doe", "pat@example.com").to_string(),
        ))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let raw = String::from_utf8(bytes.to_vec())?;
    assert!(!raw.to_lowercase().contains("password"));

    let session: Value = serde_json::from_str(&raw)?;
    assert_eq!(session["role"], "patient");
    assert_eq!(session["email"], "pat@example.com");
    assert!(!token_of(&session).is_empty());

    Ok(())
}

#[tokio::test]
async fn test_duplicate_email_conflicts() -> Result<()> {
    let (app, _) = create_test_app().await;

    register(&app, patient_body("Pat Doe", "pat@example.com")).await;
    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(patient_body("Other", "pat@example.com")),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "User already exists");

    Ok(())
}

#[tokio::test]
async fn test_doctor_registration_requires_license() -> Result<()> {
    let (app, _) = create_test_app().await;

    let mut body = doctor_body("Dr. Grey", "grey@example.com", "Cardiology", "LIC-1");
    body.as_object_mut().unwrap().remove("licenseNumber");
    let (status, _) = send(&app, "POST", "/api/auth/register", None, Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Duplicate license is a conflict, not a validation error.
    register(
        &app,
        doctor_body("Dr. Grey", "grey@example.com", "Cardiology", "LIC-1"),
    )
    .await;
    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(doctor_body("Dr. Shepherd", "shep@example.com", "Neurology", "LIC-1")),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    Ok(())
}

#[tokio::test]
async fn test_login_failures_are_uniform() -> Result<()> {
    let (app, service) = create_test_app().await;

    let session = register(&app, patient_body("Pat Doe", "pat@example.com")).await;
    let user_id: Uuid = session["id"].as_str().unwrap().parse()?;

    // Happy path first.
    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "pat@example.com", "password": "secret123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(!token_of(&body).is_empty());

    // Wrong password, unknown email and a deactivated account all produce
    // the same response.
    let cases = [
        json!({ "email": "pat@example.com", "password": "wrong-pass" }),
        json!({ "email": "nobody@example.com", "password": "secret123" }),
    ];
    for case in cases {
        let (status, body) = send(&app, "POST", "/api/auth/login", None, Some(case)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Not authorized");
    }

    service.set_active(user_id, false).await?;
    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "pat@example.com", "password": "secret123" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Not authorized");

    Ok(())
}

#[tokio::test]
async fn test_protected_routes_require_token() -> Result<()> {
    let (app, service) = create_test_app().await;

    let (status, _) = send(&app, "GET", "/api/auth/profile", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "GET", "/api/auth/profile", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // A token of a since-deactivated account is rejected at the gate too.
    let session = register(&app, patient_body("Pat Doe", "pat@example.com")).await;
    let token = token_of(&session);
    let user_id: Uuid = session["id"].as_str().unwrap().parse()?;
    service.set_active(user_id, false).await?;
    let (status, _) = send(&app, "GET", "/api/auth/profile", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn test_cookie_token_is_accepted() -> Result<()> {
    let (app, _) = create_test_app().await;

    let session = register(&app, patient_body("Pat Doe", "pat@example.com")).await;
    let token = token_of(&session);

    // No Authorization header; the session cookie alone authenticates.
    let request = Request::builder()
        .method("GET")
        .uri("/api/auth/profile")
        .header("cookie", format!("token={token}"))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // A garbage cookie value is rejected.
    let request = Request::builder()
        .method("GET")
        .uri("/api/auth/profile")
        .header("cookie", "token=garbage")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn test_bearer_header_wins_over_cookie() -> Result<()> {
    let (app, _) = create_test_app().await;

    let session = register(&app, patient_body("Pat Doe", "pat@example.com")).await;
    let token = token_of(&session);

    // Valid header plus a stale cookie: the header is used.
    let request = Request::builder()
        .method("GET")
        .uri("/api/auth/profile")
        .header("authorization", format!("Bearer {token}"))
        .header("cookie", "token=stale-garbage")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // A bad header is not rescued by a valid cookie.
    let request = Request::builder()
        .method("GET")
        .uri("/api/auth/profile")
        .header("authorization", "Bearer garbage")
        .header("cookie", format!("token={token}"))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn test_profile_includes_role_record() -> Result<()> {
    let (app, _) = create_test_app().await;

    let session = register(&app, patient_body("Pat Doe", "pat@example.com")).await;
    let token = token_of(&session);

    let (status, body) = send(&app, "GET", "/api/auth/profile", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], "pat@example.com");
    assert!(body["profile"].is_object());
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));

    // Profile update is reflected on the next read.
    let (status, _) = send(
        &app,
        "PUT",
        "/api/auth/profile",
        Some(&token),
        Some(json!({ "name": "Patricia Doe", "phone": "555-0100" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, "GET", "/api/auth/profile", Some(&token), None).await;
    assert_eq!(body["user"]["name"], "Patricia Doe");
    assert_eq!(body["profile"]["phone"], "555-0100");

    Ok(())
}

#[tokio::test]
async fn test_profile_update_cannot_change_license() -> Result<()> {
    let (app, _) = create_test_app().await;

    let doctor = register(
        &app,
        doctor_body("Dr. Grey", "grey@example.com", "Cardiology", "LIC-100"),
    )
    .await;
    let token = token_of(&doctor);

    let (status, _) = send(
        &app,
        "PUT",
        "/api/auth/profile",
        Some(&token),
        Some(json!({ "licenseNumber": "LIC-999", "phone": "555-0100" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, "GET", "/api/auth/profile", Some(&token), None).await;
    assert_eq!(body["profile"]["licenseNumber"], "LIC-100");
    assert_eq!(body["profile"]["phone"], "555-0100");

    Ok(())
}

#[tokio::test]
async fn test_slot_conflict_and_rebooking() -> Result<()> {
    let (app, _) = create_test_app().await;
    let (doctor_token, doctor_id, _, patient_id) = seed_doctor_and_patient(&app).await;

    let slot = booking(patient_id, doctor_id, "2026-09-01", "10:00");
    let (status, appt) = send(
        &app,
        "POST",
        "/api/appointments",
        Some(&doctor_token),
        Some(slot.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(appt["status"], "scheduled");
    assert_eq!(appt["doctor"]["specialization"], "Cardiology");
    let appt_id = appt["id"].as_str().unwrap().to_string();

    // Same doctor, date and time is a conflict.
    let (status, body) = send(
        &app,
        "POST",
        "/api/appointments",
        Some(&doctor_token),
        Some(slot.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Time slot already booked");

    // A different time on the same day is free.
    let (status, _) = send(
        &app,
        "POST",
        "/api/appointments",
        Some(&doctor_token),
        Some(booking(patient_id, doctor_id, "2026-09-01", "11:00")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // Cancelling releases the slot.
    let (status, cancelled) = send(
        &app,
        "PUT",
        &format!("/api/appointments/{appt_id}"),
        Some(&doctor_token),
        Some(json!({ "status": "cancelled" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cancelled["status"], "cancelled");

    let (status, _) = send(
        &app,
        "POST",
        "/api/appointments",
        Some(&doctor_token),
        Some(slot),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    Ok(())
}

#[tokio::test]
async fn test_patient_cannot_book_or_list() -> Result<()> {
    let (app, _) = create_test_app().await;
    let (_, doctor_id, patient_token, patient_id) = seed_doctor_and_patient(&app).await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/appointments",
        Some(&patient_token),
        Some(booking(patient_id, doctor_id, "2026-09-01", "10:00")),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "GET", "/api/appointments", Some(&patient_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    Ok(())
}

#[tokio::test]
async fn test_update_appointment_drops_empty_strings() -> Result<()> {
    let (app, _) = create_test_app().await;
    let (doctor_token, doctor_id, _, patient_id) = seed_doctor_and_patient(&app).await;

    let (_, appt) = send(
        &app,
        "POST",
        "/api/appointments",
        Some(&doctor_token),
        Some(booking(patient_id, doctor_id, "2026-09-01", "10:00")),
    )
    .await;
    let appt_id = appt["id"].as_str().unwrap().to_string();

    let (status, updated) = send(
        &app,
        "PUT",
        &format!("/api/appointments/{appt_id}"),
        Some(&doctor_token),
        Some(json!({ "notes": "", "diagnosis": "Flu" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(updated["notes"].is_null());
    assert_eq!(updated["diagnosis"], "Flu");

    // Status transitions are unconstrained.
    let (_, completed) = send(
        &app,
        "PUT",
        &format!("/api/appointments/{appt_id}"),
        Some(&doctor_token),
        Some(json!({ "status": "completed" })),
    )
    .await;
    assert_eq!(completed["status"], "completed");
    let (status, reopened) = send(
        &app,
        "PUT",
        &format!("/api/appointments/{appt_id}"),
        Some(&doctor_token),
        Some(json!({ "status": "scheduled" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reopened["status"], "scheduled");

    Ok(())
}

#[tokio::test]
async fn test_delete_appointment_is_admin_only() -> Result<()> {
    let (app, _) = create_test_app().await;
    let (doctor_token, doctor_id, _, patient_id) = seed_doctor_and_patient(&app).await;
    let admin = register(&app, admin_body("Root", "root@example.com")).await;
    let admin_token = token_of(&admin);

    let (_, appt) = send(
        &app,
        "POST",
        "/api/appointments",
        Some(&doctor_token),
        Some(booking(patient_id, doctor_id, "2026-09-01", "10:00")),
    )
    .await;
    let appt_id = appt["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/appointments/{appt_id}"),
        Some(&doctor_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/appointments/{appt_id}"),
        Some(&admin_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        "GET",
        &format!("/api/appointments/{appt_id}"),
        Some(&admin_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn test_doctor_deletion_cascades() -> Result<()> {
    let (app, _) = create_test_app().await;
    let (doctor_token, doctor_id, _, patient_id) = seed_doctor_and_patient(&app).await;
    let admin = register(&app, admin_body("Root", "root@example.com")).await;
    let admin_token = token_of(&admin);

    let (status, assigned) = send(
        &app,
        "PUT",
        &format!("/api/doctors/{doctor_id}/assign-patient/{patient_id}"),
        Some(&admin_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        assigned["assignedDoctor"]["id"].as_str().unwrap(),
        doctor_id.to_string()
    );

    let (status, _) = send(
        &app,
        "POST",
        "/api/appointments",
        Some(&doctor_token),
        Some(booking(patient_id, doctor_id, "2026-09-01", "10:00")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/doctors/{doctor_id}"),
        Some(&admin_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Patient is unassigned and the doctor's appointments are gone.
    let (status, patient) = send(
        &app,
        "GET",
        &format!("/api/patients/{patient_id}"),
        Some(&admin_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(patient["assignedDoctor"].is_null());

    let (status, appointments) = send(&app, "GET", "/api/appointments", Some(&admin_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(appointments.as_array().unwrap().len(), 0);

    Ok(())
}

#[tokio::test]
async fn test_patient_deletion_cascades() -> Result<()> {
    let (app, _) = create_test_app().await;
    let (doctor_token, doctor_id, _, patient_id) = seed_doctor_and_patient(&app).await;
    let admin = register(&app, admin_body("Root", "root@example.com")).await;
    let admin_token = token_of(&admin);

    let (_, _) = send(
        &app,
        "POST",
        "/api/appointments",
        Some(&doctor_token),
        Some(booking(patient_id, doctor_id, "2026-09-01", "10:00")),
    )
    .await;

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/patients/{patient_id}"),
        Some(&admin_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, appointments) = send(&app, "GET", "/api/appointments", Some(&admin_token), None).await;
    assert_eq!(appointments.as_array().unwrap().len(), 0);

    Ok(())
}

#[tokio::test]
async fn test_update_patient_record() -> Result<()> {
    let (app, _) = create_test_app().await;
    let (doctor_token, _, patient_token, patient_id) = seed_doctor_and_patient(&app).await;

    // Patients cannot edit patient records through this route.
    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/patients/{patient_id}"),
        Some(&patient_token),
        Some(json!({ "phone": "555-0199" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, updated) = send(
        &app,
        "PUT",
        &format!("/api/patients/{patient_id}"),
        Some(&doctor_token),
        Some(json!({ "phone": "555-0199", "address": "12 Main St" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["phone"], "555-0199");
    assert_eq!(updated["address"], "12 Main St");
    // Untouched fields survive the partial update.
    assert_eq!(updated["user"]["name"], "Pat Doe");

    Ok(())
}

#[tokio::test]
async fn test_assigned_patients_listing() -> Result<()> {
    let (app, _) = create_test_app().await;
    let (doctor_token, doctor_id, patient_token, patient_id) = seed_doctor_and_patient(&app).await;
    let admin = register(&app, admin_body("Root", "root@example.com")).await;
    let admin_token = token_of(&admin);

    // Empty before any assignment.
    let (status, assigned) = send(
        &app,
        "GET",
        &format!("/api/patients/assigned/{doctor_id}"),
        Some(&doctor_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(assigned.as_array().unwrap().len(), 0);

    send(
        &app,
        "PUT",
        &format!("/api/doctors/{doctor_id}/assign-patient/{patient_id}"),
        Some(&admin_token),
        None,
    )
    .await;

    let (status, assigned) = send(
        &app,
        "GET",
        &format!("/api/patients/assigned/{doctor_id}"),
        Some(&doctor_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let assigned = assigned.as_array().unwrap();
    assert_eq!(assigned.len(), 1);
    assert_eq!(assigned[0]["id"].as_str().unwrap(), patient_id.to_string());

    // The listing is gated to admin and doctor callers.
    let (status, _) = send(
        &app,
        "GET",
        &format!("/api/patients/assigned/{doctor_id}"),
        Some(&patient_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    Ok(())
}

#[tokio::test]
async fn test_my_and_doctor_appointment_views() -> Result<()> {
    let (app, _) = create_test_app().await;
    let (doctor_token, doctor_id, patient_token, patient_id) = seed_doctor_and_patient(&app).await;

    send(
        &app,
        "POST",
        "/api/appointments",
        Some(&doctor_token),
        Some(booking(patient_id, doctor_id, "2026-09-01", "10:00")),
    )
    .await;

    let (status, mine) = send(
        &app,
        "GET",
        "/api/appointments/my",
        Some(&patient_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine.as_array().unwrap().len(), 1);
    assert_eq!(mine[0]["patient"]["user"]["name"], "Pat Doe");

    let (status, schedule) = send(
        &app,
        "GET",
        "/api/appointments/doctor",
        Some(&doctor_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(schedule.as_array().unwrap().len(), 1);
    assert_eq!(schedule[0]["doctor"]["user"]["name"], "Dr. Grey");

    Ok(())
}

#[tokio::test]
async fn test_appointment_filtering() -> Result<()> {
    let (app, _) = create_test_app().await;
    let (doctor_token, doctor_id, _, patient_id) = seed_doctor_and_patient(&app).await;

    send(
        &app,
        "POST",
        "/api/appointments",
        Some(&doctor_token),
        Some(booking(patient_id, doctor_id, "2026-09-01", "10:00")),
    )
    .await;
    send(
        &app,
        "POST",
        "/api/appointments",
        Some(&doctor_token),
        Some(booking(patient_id, doctor_id, "2026-09-02", "09:00")),
    )
    .await;

    let (status, all) = send(&app, "GET", "/api/appointments", Some(&doctor_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 2);
    // Ordered by date then time.
    assert_eq!(all[0]["appointmentDate"], "2026-09-01");

    let (_, filtered) = send(
        &app,
        "GET",
        "/api/appointments?date=2026-09-02",
        Some(&doctor_token),
        None,
    )
    .await;
    assert_eq!(filtered.as_array().unwrap().len(), 1);
    assert_eq!(filtered[0]["appointmentTime"], "09:00");

    let (_, by_status) = send(
        &app,
        "GET",
        "/api/appointments?status=completed",
        Some(&doctor_token),
        None,
    )
    .await;
    assert_eq!(by_status.as_array().unwrap().len(), 0);

    Ok(())
}

#[tokio::test]
async fn test_specialization_search_is_case_insensitive() -> Result<()> {
    let (app, _) = create_test_app().await;
    let (doctor_token, _, _, _) = seed_doctor_and_patient(&app).await;

    register(
        &app,
        doctor_body("Dr. Who", "who@example.com", "Neurology", "LIC-200"),
    )
    .await;

    let (status, matches) = send(
        &app,
        "GET",
        "/api/doctors/specialization/CARDIO",
        Some(&doctor_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let matches = matches.as_array().unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0]["specialization"], "Cardiology");

    // Unavailable doctors never show up.
    let (_, doctor_profile) = send(
        &app,
        "GET",
        "/api/doctors/specialization/cardiology",
        Some(&doctor_token),
        None,
    )
    .await;
    let doctor_id = doctor_profile[0]["id"].as_str().unwrap().to_string();
    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/doctors/{doctor_id}"),
        Some(&doctor_token),
        Some(json!({ "isAvailable": false })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, matches) = send(
        &app,
        "GET",
        "/api/doctors/specialization/cardiology",
        Some(&doctor_token),
        None,
    )
    .await;
    assert_eq!(matches.as_array().unwrap().len(), 0);

    Ok(())
}

#[tokio::test]
async fn test_stats_requires_admin() -> Result<()> {
    let (app, _) = create_test_app().await;
    let (_, _, patient_token, _) = seed_doctor_and_patient(&app).await;
    let admin = register(&app, admin_body("Root", "root@example.com")).await;
    let admin_token = token_of(&admin);

    let (status, _) = send(&app, "GET", "/api/auth/stats", Some(&patient_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, stats) = send(&app, "GET", "/api/auth/stats", Some(&admin_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["totalUsers"], 3);
    assert_eq!(stats["totalPatients"], 1);
    assert_eq!(stats["totalDoctors"], 1);
    assert_eq!(stats["totalAppointments"], 0);

    Ok(())
}

#[tokio::test]
async fn test_analytics_is_public_and_ordered() -> Result<()> {
    let (app, _) = create_test_app().await;

    register(&app, patient_body("Pat One", "one@example.com")).await;
    register(&app, patient_body("Pat Two", "two@example.com")).await;

    // No token on purpose.
    let (status, buckets) = send(&app, "GET", "/api/analytics/patients-per-week", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let buckets = buckets.as_array().unwrap();
    assert_eq!(buckets.len(), 6);
    for bucket in buckets {
        assert!(bucket["week"].as_str().unwrap().starts_with("Week "));
    }
    // Oldest first; the two fresh registrations land in the current week.
    for bucket in &buckets[..5] {
        assert_eq!(bucket["count"], 0);
    }
    assert_eq!(buckets[5]["count"], 2);

    Ok(())
}

#[tokio::test]
async fn test_unknown_ids_return_not_found() -> Result<()> {
    let (app, _) = create_test_app().await;
    let session = register(&app, admin_body("Root", "root@example.com")).await;
    let token = token_of(&session);

    let missing = Uuid::new_v4();
    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/appointments/{missing}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Appointment not found");

    let (status, _) = send(
        &app,
        "GET",
        &format!("/api/patients/{missing}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "GET",
        &format!("/api/doctors/{missing}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn test_health_and_fallback() -> Result<()> {
    let (app, _) = create_test_app().await;

    let (status, body) = send(&app, "GET", "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "OK");
    assert!(body["timestamp"].as_str().is_some());

    let (status, body) = send(&app, "GET", "/api/nothing-here", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Route not found");

    Ok(())
}

#[tokio::test]
async fn test_malformed_body_returns_message_json() -> Result<()> {
    let (app, _) = create_test_app().await;

    // Broken JSON syntax.
    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/register")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let body: Value = serde_json::from_slice(&bytes)?;
    assert!(body["message"].as_str().is_some_and(|m| !m.is_empty()));

    // Well-formed JSON that fails deserialization (unknown role value).
    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "name": "Pat Doe",
            "email": "pat@example.com",
            "password": "secret123",
            "role": "superuser",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().is_some());

    Ok(())
}

#[tokio::test]
async fn test_logout_clears_cookie() -> Result<()> {
    let (app, _) = create_test_app().await;
    let session = register(&app, patient_body("Pat Doe", "pat@example.com")).await;
    let token = token_of(&session);

    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/logout")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get("set-cookie")
        .expect("set-cookie on logout")
        .to_str()?;
    assert!(set_cookie.starts_with("token="));
    assert!(set_cookie.contains("Max-Age=0"));

    Ok(())
}

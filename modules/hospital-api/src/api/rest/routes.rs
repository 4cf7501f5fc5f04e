use axum::http::StatusCode;
use axum::middleware;
use axum::response::Json;
use axum::routing::{get, post, put};
use axum::Router;

use crate::api::rest::dto::MessageDto;
use crate::api::rest::{auth, handlers, AppState};

/// Build the full API router. Public surface: register, login, analytics and
/// the health probe; everything else sits behind the authorization gate.
pub fn router(state: AppState) -> Router {
    let gate = middleware::from_fn_with_state(state.clone(), auth::require_auth);

    let auth_private = Router::new()
        .route("/logout", post(handlers::auth::logout))
        .route(
            "/profile",
            get(handlers::auth::get_profile).put(handlers::auth::update_profile),
        )
        .route("/stats", get(handlers::auth::stats))
        .route_layer(gate.clone());

    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .merge(auth_private);

    let appointment_routes = Router::new()
        .route(
            "/",
            post(handlers::appointments::create_appointment)
                .get(handlers::appointments::list_appointments),
        )
        .route("/my", get(handlers::appointments::my_appointments))
        .route("/doctor", get(handlers::appointments::doctor_appointments))
        .route(
            "/{id}",
            get(handlers::appointments::get_appointment)
                .put(handlers::appointments::update_appointment)
                .delete(handlers::appointments::delete_appointment),
        )
        .route_layer(gate.clone());

    let patient_routes = Router::new()
        .route("/", get(handlers::patients::list_patients))
        .route(
            "/{id}",
            get(handlers::patients::get_patient)
                .put(handlers::patients::update_patient)
                .delete(handlers::patients::delete_patient),
        )
        .route("/profile/{user_id}", get(handlers::patients::get_patient_by_user))
        .route(
            "/assigned/{doctor_id}",
            get(handlers::patients::assigned_patients),
        )
        .route_layer(gate.clone());

    let doctor_routes = Router::new()
        .route("/", get(handlers::doctors::list_doctors))
        .route(
            "/{id}",
            get(handlers::doctors::get_doctor)
                .put(handlers::doctors::update_doctor)
                .delete(handlers::doctors::delete_doctor),
        )
        .route("/profile/{user_id}", get(handlers::doctors::get_doctor_by_user))
        .route(
            "/specialization/{specialization}",
            get(handlers::doctors::doctors_by_specialization),
        )
        .route(
            "/{id}/assign-patient/{patient_id}",
            put(handlers::doctors::assign_patient),
        )
        .route_layer(gate);

    // Deliberately outside the gate; see handler notes.
    let analytics_routes = Router::new().route(
        "/patients-per-week",
        get(handlers::analytics::patients_per_week),
    );

    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api/appointments", appointment_routes)
        .nest("/api/patients", patient_routes)
        .nest("/api/doctors", doctor_routes)
        .nest("/api/analytics", analytics_routes)
        .route("/api/health", get(handlers::health::health_check))
        .fallback(not_found)
        .with_state(state)
}

async fn not_found() -> (StatusCode, Json<MessageDto>) {
    (
        StatusCode::NOT_FOUND,
        Json(MessageDto::new("Route not found")),
    )
}


//! API route handlers

pub mod auth;
pub mod familles;
pub mod health;
pub mod inscriptions;
pub mod pages;
pub mod paiements;
pub mod projets;
pub mod sejours;
pub mod villes;
pub mod webhook;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use crate::middleware::{redirect_authenticated, session_gate};
use crate::state::AppState;

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    // reachable without a session
    let public = Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/api/auth/signup", post(auth::signup))
        .route("/api/auth/reset-password", post(auth::reset_password))
        .route("/api/stripe/webhook", post(webhook::stripe_webhook));

    // login/signup pages bounce authenticated visitors home
    let entry = Router::new()
        .route("/login", get(pages::login))
        .route("/signup", get(pages::signup))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            redirect_authenticated,
        ));

    // everything else requires a session
    let protected = Router::new()
        .route("/", get(pages::accueil))
        // Project endpoints
        .route("/api/projects/generate", post(projets::generate))
        .route("/api/projects/delete", delete(projets::delete_project))
        // Family endpoints
        .route(
            "/api/v1/familles",
            post(familles::create_famille).get(familles::list_familles),
        )
        .route(
            "/api/v1/familles/:famille_id",
            get(familles::get_famille)
                .put(familles::update_famille)
                .delete(familles::delete_famille),
        )
        .route(
            "/api/v1/familles/:famille_id/paiements",
            get(paiements::list_paiements),
        )
        // Centre and séjour endpoints
        .route(
            "/api/v1/centres",
            post(sejours::create_centre).get(sejours::list_centres),
        )
        .route("/api/v1/centres/:centre_id", get(sejours::get_centre))
        .route(
            "/api/v1/sejours",
            post(sejours::create_sejour).get(sejours::list_sejours),
        )
        .route("/api/v1/sejours/:sejour_id", get(sejours::get_sejour))
        // Inscription endpoints
        .route(
            "/api/v1/inscriptions",
            post(inscriptions::create_inscription).get(inscriptions::list_inscriptions),
        )
        .route(
            "/api/v1/inscriptions/:inscription_id/statut",
            put(inscriptions::update_statut),
        )
        // Transport endpoints
        .route(
            "/api/v1/transports",
            post(inscriptions::create_transport).get(inscriptions::list_transports),
        )
        // Staff endpoints
        .route(
            "/api/v1/animateurs",
            post(inscriptions::create_animateur).get(inscriptions::list_animateurs),
        )
        .route(
            "/api/v1/animateurs/:animateur_id/sejour",
            put(inscriptions::assign_animateur),
        )
        // City lookup
        .route("/api/v1/villes", get(villes::lookup_villes))
        .route_layer(middleware::from_fn_with_state(state.clone(), session_gate));

    public.merge(entry).merge(protected).with_state(state)
}

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::{
    handlers::{comment, content, submission, upload},
    state::AppState,
    utils::jwt::admin_middleware,
};

pub fn create_routes(state: AppState) -> Router {
    // 1. Rutas Públicas (Todo el mundo)
    let public_routes = Router::new()
        .route("/api/newsletter", post(submission::subscribe_handler))
        .route("/api/contact", post(submission::contact_handler))
        .route("/api/:kind", get(content::list_content_handler))
        .route("/api/:kind/:id", get(content::get_content_handler))
        .route("/api/:kind/:id/view", post(content::record_view_handler))
        .route("/api/:kind/:id/like", post(content::record_like_handler))
        .route("/api/:kind/:id/download", post(content::record_download_handler))
        .route(
            "/api/:kind/:id/comments",
            get(comment::list_comments_handler).post(comment::submit_comment_handler),
        );

    // 2. Rutas de ADMIN (crear, editar, borrar, moderar, subir) - Requieren token de admin
    let admin_routes = Router::new()
        .route(
            "/api/admin/upload",
            post(upload::upload_image_handler)
                .layer(DefaultBodyLimit::max(upload::MAX_IMAGE_BYTES + 1024 * 1024)),
        )
        .route("/api/admin/comments/:id", put(comment::moderate_comment_handler))
        .route("/api/admin/:kind", post(content::create_content_handler))
        .route(
            "/api/admin/:kind/:id",
            put(content::update_content_handler).delete(content::delete_content_handler),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), admin_middleware));

    // Fusionamos todo
    Router::new()
        .merge(public_routes)
        .merge(admin_routes)
        .with_state(state)
}

pub mod config;
pub mod dataset_store;
pub mod errors;
pub mod gnuplot;
pub mod handlers;
pub mod openapi;
pub mod request_id;

use axum::{
    Extension, Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, post},
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
    timeout::TimeoutLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    config::ServerConfig,
    dataset_store::DatasetStore,
    errors::AppError,
    gnuplot::PlotRunner,
    handlers::{
        delete_dataset, generate_terrain, get_dataset, health_check, index, render_plot,
        upload_dataset,
    },
    openapi::ApiDoc,
    request_id::request_id_middleware,
};

pub fn create_router(config: &ServerConfig) -> Result<Router, AppError> {
    let store = DatasetStore::new_local(&config.data_dir)?;
    let runner = PlotRunner::new(&config.gnuplot_bin, config.max_concurrent_plots);

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers(Any)
        .allow_origin(Any);

    let router = Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/datasets", post(upload_dataset))
        .route("/datasets/terrain", post(generate_terrain))
        .route("/datasets/{id}", get(get_dataset).delete(delete_dataset))
        .route("/plot", post(render_plot))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(Extension(store))
        .layer(Extension(runner))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
        .layer(CompressionLayer::new())
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::REFERRER_POLICY,
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ));

    Ok(router)
}

pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let app = create_router(&config)?;

    let listener = tokio::net::TcpListener::bind(config.listen_addr()).await?;

    tracing::info!("Server running on http://{}", config.listen_addr());

    axum::serve(listener, app).await?;

    Ok(())
}

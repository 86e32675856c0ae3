//! OpenAPI document served alongside Swagger UI.

use utoipa::OpenApi;

use crate::handlers::{DatasetResponse, PlotRequest, PlotResponse};

#[derive(OpenApi)]
#[openapi(
    info(title = "Gnuplot on Server", description = "Upload datasets and render them with gnuplot"),
    paths(
        crate::handlers::pages::health_check,
        crate::handlers::datasets::upload_dataset,
        crate::handlers::datasets::get_dataset,
        crate::handlers::datasets::delete_dataset,
        crate::handlers::generated::generate_terrain,
        crate::handlers::plot::render_plot,
    ),
    components(schemas(DatasetResponse, PlotRequest, PlotResponse)),
    tags(
        (name = "datasets", description = "Dataset upload and generation"),
        (name = "plot", description = "Script rendering"),
        (name = "status", description = "Service health")
    )
)]
pub struct ApiDoc;

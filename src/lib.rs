use actix_cors::Cors;
use actix_web::middleware::Compress;
use actix_web::{http::header, web, App, HttpServer};
use actix_web_prometheus::PrometheusMetricsBuilder;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

pub mod config;
pub mod document;
pub mod export;
pub mod handlers;
pub mod refine;
pub mod report;
pub mod session;
pub mod state;

pub use crate::config::AppConfig;
use crate::report::{ValidationError, ValidationErrors};
pub use crate::state::AppState;

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub timestamp: String,
    /// Per-field problems, present on validation failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationError>>,
}

impl ErrorResponse {
    pub fn new(error_type: &str, message: &str) -> Self {
        Self {
            error: error_type.to_string(),
            message: message.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            details: None,
        }
    }

    pub fn validation(errors: &ValidationErrors) -> Self {
        Self {
            details: Some(errors.errors().to_vec()),
            ..Self::new("ValidationError", &errors.summary())
        }
    }

    pub fn not_found(message: &str) -> Self {
        Self::new("NotFound", message)
    }

    pub fn bad_request(message: &str) -> Self {
        Self::new("BadRequest", message)
    }

    pub fn conflict(message: &str) -> Self {
        Self::new("Conflict", message)
    }

    pub fn internal_error(message: &str) -> Self {
        Self::new("InternalServerError", message)
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::get_report,
        crate::handlers::update_report,
        crate::handlers::reset_report,
        crate::handlers::get_status,
        crate::handlers::refine_field,
        crate::handlers::get_document,
        crate::handlers::preview_page,
        crate::handlers::preview_toggle,
        crate::handlers::preview_upload,
        crate::handlers::print_page,
        crate::handlers::export_pdf,
        crate::handlers::upload_cloud,
        crate::handlers::get_share,
        crate::handlers::load_share,
        crate::handlers::get_view,
        crate::handlers::set_view,
        crate::handlers::toggle_view
    ),
    components(
        schemas(
            report::ReportRecord,
            report::ReportUpdate,
            report::AreaStatus,
            report::DisciplineStatus,
            report::Presence,
            report::TextField,
            report::CompletionItem,
            report::ValidationError,
            document::ReportDocument,
            document::Letterhead,
            document::InfoCell,
            document::Section,
            document::Block,
            document::Tone,
            document::Signature,
            export::UploadReceipt,
            session::ViewMode,
            session::ViewAction,
            handlers::StatusResponse,
            handlers::RefineResponse,
            handlers::ShareResponse,
            handlers::ShareRequest,
            handlers::ViewResponse,
            handlers::SetViewRequest,
            handlers::PreviewNotice,
            ErrorResponse,
        )
    ),
    tags(
        (name = "Report", description = "Daily duty report editing endpoints."),
        (name = "Document", description = "Rendered report layout and HTML preview."),
        (name = "Export", description = "PDF, print and school drive export."),
        (name = "Share", description = "Shareable link encoding."),
        (name = "View", description = "Editor and preview switching.")
    ),
    servers(
        (url = "http://127.0.0.1:8080", description = "Localhost server")
    )
)]
pub struct ApiDoc;

pub async fn run() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration. Please check your .env file. Error: {}", e);
            std::process::exit(1);
        }
    };
    if config.gemini_api_key.is_none() {
        log::warn!("GEMINI_API_KEY is not set; Bantu Tulis will return notes unchanged");
    }

    let app_state = match AppState::from_config(&config) {
        Ok(state) => web::Data::new(state),
        Err(e) => {
            log::error!("Failed to build the text generation client. Error: {}", e);
            std::process::exit(1);
        }
    };

    let prometheus = PrometheusMetricsBuilder::new("laporan_harian_server")
        .endpoint("/metrics")
        .build()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;

    log::info!("Starting server at http://{}", config.bind_address);

    HttpServer::new(move || {
        let app_state = app_state.clone();
        let prometheus = prometheus.clone();
        let cors = Cors::default()
            .allowed_origin("http://localhost:5173")
            .allowed_origin("http://localhost:3000")
            .allowed_origin("http://localhost:8080")
            .allowed_origin("http://127.0.0.1:8080")
            .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "OPTIONS"])
            .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
            .max_age(3600);

        App::new()
            .wrap(Compress::default())
            .wrap(prometheus)
            .wrap(cors)
            .app_data(app_state)
            .service(web::scope("/api").configure(handlers::config))
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
    })
    .keep_alive(actix_web::http::KeepAlive::Os)
    .bind(config.bind_address.as_str())?
    .run()
    .await
}

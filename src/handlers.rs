//! HTTP handlers for the report session.

use actix_web::http::header::{self, ContentDisposition};
use actix_web::{web, HttpResponse, Responder};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::document::html::{to_html, to_html_with_notice, ToolbarAction};
use crate::document::{render, ReportDocument};
use crate::export::adapter::{SIMULATED_UPLOAD_NOTE, UPLOAD_SUCCESS_MESSAGE};
use crate::export::{ExportError, ExportOperation, UploadReceipt};
use crate::report::share::share_link;
use crate::report::{
    completion_status, decode_or_default, encode_fragment, CompletionItem, ReportRecord,
    ReportUpdate, TextField, Validator,
};
use crate::session::{available_actions, ViewAction, ViewMode};
use crate::{AppState, ErrorResponse};

pub const EMPTY_NOTE_MESSAGE: &str = "Sila masukkan nota ringkas dahulu.";
pub const PREVIEW_REQUIRED_MESSAGE: &str = "Sila semak laporan (mod pratonton) sebelum mengeksport.";
pub const EDITING_REQUIRED_MESSAGE: &str = "Sila kembali ke mod edit untuk mengubah laporan.";
pub const PREVIEW_PAGE: &str = "/api/report/preview";

#[derive(Serialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub items: Vec<CompletionItem>,
    pub view: ViewMode,
    pub generating_pdf: bool,
    pub uploading: bool,
    pub refining: Vec<TextField>,
}

#[derive(Serialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RefineResponse {
    pub field: TextField,
    /// The refined text, or the original note when refinement fell back.
    pub refined: String,
    /// False when the field was edited while the refinement was running.
    pub applied: bool,
    pub record: ReportRecord,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct ShareResponse {
    pub fragment: String,
    pub link: String,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct ShareRequest {
    pub fragment: String,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct ViewResponse {
    pub mode: ViewMode,
    pub actions: Vec<ViewAction>,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct SetViewRequest {
    pub mode: ViewMode,
}

/// Outcome of a toolbar form post, carried back to the preview page.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum PreviewNotice {
    Uploaded,
    Simulated,
    UploadFailed,
    UploadBusy,
    PreviewRequired,
}

impl PreviewNotice {
    pub fn message(&self) -> String {
        match self {
            Self::Uploaded => UPLOAD_SUCCESS_MESSAGE.to_string(),
            Self::Simulated => format!("{} {}", UPLOAD_SUCCESS_MESSAGE, SIMULATED_UPLOAD_NOTE),
            Self::UploadFailed => ExportOperation::CloudUpload.failure_message().to_string(),
            Self::UploadBusy => ExportOperation::CloudUpload.busy_message().to_string(),
            Self::PreviewRequired => PREVIEW_REQUIRED_MESSAGE.to_string(),
        }
    }

    fn key(&self) -> &'static str {
        match self {
            Self::Uploaded => "uploaded",
            Self::Simulated => "simulated",
            Self::UploadFailed => "upload-failed",
            Self::UploadBusy => "upload-busy",
            Self::PreviewRequired => "preview-required",
        }
    }
}

#[derive(Deserialize, Debug, Default)]
pub struct PreviewQuery {
    pub notice: Option<PreviewNotice>,
}

fn redirect_to_preview(notice: Option<PreviewNotice>) -> HttpResponse {
    let location = match notice {
        Some(notice) => format!("{}?notice={}", PREVIEW_PAGE, notice.key()),
        None => PREVIEW_PAGE.to_string(),
    };
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

fn view_response(mode: ViewMode) -> ViewResponse {
    ViewResponse {
        mode,
        actions: available_actions(mode),
    }
}

fn require_preview(state: &AppState) -> Result<(), HttpResponse> {
    if state.session.read().view() == ViewMode::Previewing {
        Ok(())
    } else {
        Err(HttpResponse::Conflict().json(ErrorResponse::conflict(PREVIEW_REQUIRED_MESSAGE)))
    }
}

fn require_editing(state: &AppState) -> Result<(), HttpResponse> {
    if state.session.read().view() == ViewMode::Editing {
        Ok(())
    } else {
        Err(HttpResponse::Conflict().json(ErrorResponse::conflict(EDITING_REQUIRED_MESSAGE)))
    }
}

fn export_error_response(operation: ExportOperation, err: ExportError) -> HttpResponse {
    match err {
        ExportError::Busy(busy) => {
            warn!("{:?} rejected: {:?} already in progress", operation, busy);
            HttpResponse::Conflict().json(ErrorResponse::conflict(busy.busy_message()))
        }
        other => {
            error!("{:?} export failed: {}", operation, other);
            HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error(operation.failure_message()))
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/report",
    tag = "Report",
    responses(
        (status = 200, description = "Current report", body = ReportRecord)
    )
)]
pub async fn get_report(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(state.snapshot())
}

#[utoipa::path(
    patch,
    path = "/api/report",
    tag = "Report",
    request_body = ReportUpdate,
    responses(
        (status = 200, description = "Updated report", body = ReportRecord),
        (status = 400, description = "Value outside the editor's range", body = ErrorResponse),
        (status = 409, description = "Report is in preview mode", body = ErrorResponse)
    )
)]
pub async fn update_report(
    state: web::Data<AppState>,
    item: web::Json<ReportUpdate>,
) -> impl Responder {
    if let Err(response) = require_editing(&state) {
        return response;
    }
    let update = item.into_inner();
    if let Err(errors) = update.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse::validation(&errors));
    }

    let record = state.session.write().update(update).clone();
    HttpResponse::Ok().json(record)
}

#[utoipa::path(
    post,
    path = "/api/report/reset",
    tag = "Report",
    responses(
        (status = 200, description = "Fresh report for today", body = ReportRecord)
    )
)]
pub async fn reset_report(state: web::Data<AppState>) -> impl Responder {
    let record = ReportRecord::today();
    state.session.write().replace(record.clone());
    info!("Report reset for {}", record.date);
    HttpResponse::Ok().json(record)
}

#[utoipa::path(
    get,
    path = "/api/report/status",
    tag = "Report",
    responses(
        (status = 200, description = "Completion checklist and in-flight operations", body = StatusResponse)
    )
)]
pub async fn get_status(state: web::Data<AppState>) -> impl Responder {
    let (items, view) = {
        let session = state.session.read();
        (completion_status(session.record()), session.view())
    };

    HttpResponse::Ok().json(StatusResponse {
        items,
        view,
        generating_pdf: state.exporter.is_generating(),
        uploading: state.exporter.is_uploading(),
        refining: state.refinements.in_flight(),
    })
}

#[utoipa::path(
    post,
    path = "/api/report/refine/{field}",
    tag = "Report",
    params(
        ("field" = String, Path, description = "Free-text field key, e.g. mealMenu")
    ),
    responses(
        (status = 200, description = "Refinement finished", body = RefineResponse),
        (status = 400, description = "Field is empty", body = ErrorResponse),
        (status = 404, description = "Field cannot be refined", body = ErrorResponse),
        (status = 409, description = "Refinement already running for this field, or report is in preview mode", body = ErrorResponse)
    )
)]
pub async fn refine_field(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    if let Err(response) = require_editing(&state) {
        return response;
    }
    let key = path.into_inner();
    let Some(field) = TextField::from_key(&key) else {
        return HttpResponse::NotFound().json(ErrorResponse::not_found(&format!(
            "Medan '{}' tidak boleh dibantu tulis",
            key
        )));
    };

    let Some(_guard) = state.refinements.begin(field) else {
        return HttpResponse::Conflict().json(ErrorResponse::conflict(
            "Bantu Tulis sedang berjalan untuk medan ini.",
        ));
    };

    let (note, revision) = {
        let session = state.session.read();
        (session.record().text(field).to_string(), session.revision(field))
    };
    if note.trim().is_empty() {
        return HttpResponse::BadRequest().json(ErrorResponse::bad_request(EMPTY_NOTE_MESSAGE));
    }

    let refined = state.refiner.refine(field, &note).await;

    let (applied, record) = {
        let mut session = state.session.write();
        let applied = session.apply_refinement(field, revision, refined.clone());
        (applied, session.record().clone())
    };
    if !applied {
        info!("Discarded stale refinement for {}", field.key());
    }

    HttpResponse::Ok().json(RefineResponse {
        field,
        refined,
        applied,
        record,
    })
}

#[utoipa::path(
    get,
    path = "/api/report/document",
    tag = "Document",
    responses(
        (status = 200, description = "Laid-out report", body = ReportDocument)
    )
)]
pub async fn get_document(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(render(&state.snapshot()))
}

fn toolbar_for(mode: ViewMode) -> Vec<ToolbarAction> {
    available_actions(mode)
        .into_iter()
        .filter_map(|action| {
            let (method, href) = match action {
                ViewAction::Review | ViewAction::BackToEdit => {
                    ("post", "/api/report/preview/toggle")
                }
                ViewAction::SaveToDrive => ("post", "/api/report/preview/cloud"),
                ViewAction::SavePdf => ("post", "/api/report/pdf"),
                ViewAction::Print => ("get", "/api/report/print"),
                ViewAction::UpdateField | ViewAction::RefineField => return None,
            };
            Some(ToolbarAction {
                label: action.label().to_string(),
                method,
                href: href.to_string(),
            })
        })
        .collect()
}

#[utoipa::path(
    get,
    path = "/api/report/preview",
    tag = "Document",
    params(
        ("notice" = Option<PreviewNotice>, Query, description = "Outcome of the last toolbar action")
    ),
    responses(
        (status = 200, description = "HTML preview with action toolbar", content_type = "text/html")
    )
)]
pub async fn preview_page(
    state: web::Data<AppState>,
    query: web::Query<PreviewQuery>,
) -> impl Responder {
    let (record, mode) = {
        let session = state.session.read();
        (session.record().clone(), session.view())
    };
    let doc = render(&record);
    let toolbar = toolbar_for(mode);
    let html = match query.notice {
        Some(notice) => to_html_with_notice(&doc, &toolbar, &notice.message()),
        None => to_html(&doc, &toolbar),
    };
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html)
}

#[utoipa::path(
    post,
    path = "/api/report/preview/toggle",
    tag = "Document",
    responses(
        (status = 303, description = "View toggled; back to the preview page")
    )
)]
pub async fn preview_toggle(state: web::Data<AppState>) -> impl Responder {
    state.session.write().toggle_view();
    redirect_to_preview(None)
}

#[utoipa::path(
    post,
    path = "/api/report/preview/cloud",
    tag = "Export",
    responses(
        (status = 303, description = "Upload attempted; back to the preview page with its outcome")
    )
)]
pub async fn preview_upload(state: web::Data<AppState>) -> impl Responder {
    if require_preview(&state).is_err() {
        return redirect_to_preview(Some(PreviewNotice::PreviewRequired));
    }

    let record = state.snapshot();
    let notice = match state.exporter.upload_to_cloud(&record).await {
        Ok(receipt) if receipt.simulated => PreviewNotice::Simulated,
        Ok(_) => PreviewNotice::Uploaded,
        Err(ExportError::Busy(_)) => PreviewNotice::UploadBusy,
        Err(e) => {
            error!("Cloud upload from preview failed: {}", e);
            PreviewNotice::UploadFailed
        }
    };
    redirect_to_preview(Some(notice))
}

#[utoipa::path(
    get,
    path = "/api/report/print",
    tag = "Export",
    responses(
        (status = 200, description = "Print page that opens the print dialog", content_type = "text/html"),
        (status = 409, description = "Not in preview mode", body = ErrorResponse)
    )
)]
pub async fn print_page(state: web::Data<AppState>) -> impl Responder {
    if let Err(response) = require_preview(&state) {
        return response;
    }
    let html = state.exporter.print_view(&state.snapshot());
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html)
}

#[utoipa::path(
    post,
    path = "/api/report/pdf",
    tag = "Export",
    responses(
        (status = 200, description = "PDF attachment", content_type = "application/pdf"),
        (status = 409, description = "Not in preview mode or already generating", body = ErrorResponse),
        (status = 500, description = "PDF generation failed", body = ErrorResponse)
    )
)]
pub async fn export_pdf(state: web::Data<AppState>) -> impl Responder {
    if let Err(response) = require_preview(&state) {
        return response;
    }

    let record = state.snapshot();
    match state.exporter.export_pdf(&record).await {
        Ok(document) => HttpResponse::Ok()
            .content_type("application/pdf")
            .insert_header(ContentDisposition::attachment(document.filename))
            .body(document.pdf),
        Err(e) => export_error_response(ExportOperation::Pdf, e),
    }
}

#[utoipa::path(
    post,
    path = "/api/report/cloud",
    tag = "Export",
    responses(
        (status = 200, description = "Report uploaded (simulated)", body = UploadReceipt),
        (status = 409, description = "Not in preview mode or an export is running", body = ErrorResponse),
        (status = 500, description = "Upload failed", body = ErrorResponse)
    )
)]
pub async fn upload_cloud(state: web::Data<AppState>) -> impl Responder {
    if let Err(response) = require_preview(&state) {
        return response;
    }

    let record = state.snapshot();
    match state.exporter.upload_to_cloud(&record).await {
        Ok(receipt) => HttpResponse::Ok().json(receipt),
        Err(e) => export_error_response(ExportOperation::CloudUpload, e),
    }
}

#[utoipa::path(
    get,
    path = "/api/report/share",
    tag = "Share",
    responses(
        (status = 200, description = "Share fragment and link", body = ShareResponse)
    )
)]
pub async fn get_share(state: web::Data<AppState>) -> impl Responder {
    match encode_fragment(&state.snapshot()) {
        Ok(fragment) => {
            let link = share_link(&state.public_url, &fragment);
            HttpResponse::Ok().json(ShareResponse { fragment, link })
        }
        Err(e) => {
            error!("Failed to encode share fragment: {}", e);
            HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error("Gagal menjana pautan perkongsian."))
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/report/share",
    tag = "Share",
    request_body = ShareRequest,
    responses(
        (status = 200, description = "Report loaded from the fragment, or a fresh report if it was malformed", body = ReportRecord)
    )
)]
pub async fn load_share(
    state: web::Data<AppState>,
    item: web::Json<ShareRequest>,
) -> impl Responder {
    let record = decode_or_default(&item.fragment, ReportRecord::today);
    state.session.write().replace(record.clone());
    HttpResponse::Ok().json(record)
}

#[utoipa::path(
    get,
    path = "/api/view",
    tag = "View",
    responses(
        (status = 200, description = "Current view and its actions", body = ViewResponse)
    )
)]
pub async fn get_view(state: web::Data<AppState>) -> impl Responder {
    let mode = state.session.read().view();
    HttpResponse::Ok().json(view_response(mode))
}

#[utoipa::path(
    put,
    path = "/api/view",
    tag = "View",
    request_body = SetViewRequest,
    responses(
        (status = 200, description = "View switched", body = ViewResponse)
    )
)]
pub async fn set_view(
    state: web::Data<AppState>,
    item: web::Json<SetViewRequest>,
) -> impl Responder {
    let mode = item.mode;
    state.session.write().set_view(mode);
    HttpResponse::Ok().json(view_response(mode))
}

#[utoipa::path(
    post,
    path = "/api/view/toggle",
    tag = "View",
    responses(
        (status = 200, description = "View toggled", body = ViewResponse)
    )
)]
pub async fn toggle_view(state: web::Data<AppState>) -> impl Responder {
    let mode = state.session.write().toggle_view();
    HttpResponse::Ok().json(view_response(mode))
}

/// Register the report routes; mounted under `/api`.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/report")
            .route(web::get().to(get_report))
            .route(web::patch().to(update_report)),
    )
    .service(web::resource("/report/reset").route(web::post().to(reset_report)))
    .service(web::resource("/report/status").route(web::get().to(get_status)))
    .service(web::resource("/report/refine/{field}").route(web::post().to(refine_field)))
    .service(web::resource("/report/document").route(web::get().to(get_document)))
    .service(web::resource("/report/preview").route(web::get().to(preview_page)))
    .service(web::resource("/report/preview/toggle").route(web::post().to(preview_toggle)))
    .service(web::resource("/report/preview/cloud").route(web::post().to(preview_upload)))
    .service(web::resource("/report/print").route(web::get().to(print_page)))
    .service(web::resource("/report/pdf").route(web::post().to(export_pdf)))
    .service(web::resource("/report/cloud").route(web::post().to(upload_cloud)))
    .service(
        web::resource("/report/share")
            .route(web::get().to(get_share))
            .route(web::post().to(load_share)),
    )
    .service(
        web::resource("/view")
            .route(web::get().to(get_view))
            .route(web::put().to(set_view)),
    )
    .service(web::resource("/view/toggle").route(web::post().to(toggle_view)));
}

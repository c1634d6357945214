use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{Path, Request, State},
    http::{HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;

use nutricalc_core::Error as CoreError;
use nutricalc_core::models::{
    FavoriteList, FavoriteListDetail, Menu, MenuDetail, NewFavoriteList, NewMenu, NewRecord,
    NewUser, Record, RecordDetail, UpdateFavoriteList, UpdateMenu, UpdateRecord, UpdateUser, User,
    parse_event_timestamp,
};
use nutricalc_core::recovery::{RecoverMenuRequest, RecoveryFailure, RecoveryReport, RecoveryStep};
use nutricalc_core::service::NutritionService;

const BODY_LIMIT: usize = 50 * 1024 * 1024; // 50 MB

#[derive(Clone)]
struct AppState {
    service: Arc<Mutex<NutritionService>>,
}

impl AppState {
    fn service(&self) -> std::sync::MutexGuard<'_, NutritionService> {
        self.service
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

// --- Request / Response types ---

#[derive(Deserialize)]
struct LoginRequest {
    user_id: String,
    password: String,
}

#[derive(Serialize)]
struct LoginResponse {
    authenticated: bool,
}

#[derive(Deserialize)]
struct UpdateUserRequest {
    user_id: String,
    #[serde(flatten)]
    update: UpdateUser,
}

#[derive(Deserialize)]
struct UpdateMenuRequest {
    id: i64,
    #[serde(flatten)]
    update: UpdateMenu,
}

#[derive(Deserialize)]
struct UpdateFavoriteListRequest {
    id: i64,
    #[serde(flatten)]
    update: UpdateFavoriteList,
}

#[derive(Deserialize)]
struct CreateRecordRequest {
    user_id: String,
    list: String,
    #[serde(default)]
    note: String,
    #[serde(default)]
    weight: f64,
    /// `YYYY-MM-DD HH:MM:SS`
    event_timestamp: String,
}

#[derive(Deserialize)]
struct UpdateRecordRequest {
    id: i64,
    list: Option<String>,
    note: Option<String>,
    weight: Option<f64>,
    event_timestamp: Option<String>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Serialize)]
struct RecoveryErrorResponse {
    error: String,
    applied: Vec<RecoveryStep>,
}

// --- Error handling ---

enum ApiError {
    Core(CoreError),
    Recovery(RecoveryFailure),
}

fn status_for(err: &CoreError) -> (StatusCode, String) {
    match err {
        CoreError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
        CoreError::Validation(_) => (StatusCode::BAD_REQUEST, err.to_string()),
        CoreError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
        CoreError::InvalidInput(_) | CoreError::Infrastructure(_) => {
            tracing::error!("Internal server error: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            )
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Core(err) => {
                let (status, message) = status_for(&err);
                (status, Json(ErrorResponse { error: message })).into_response()
            }
            Self::Recovery(failure) => {
                let (status, message) = status_for(&failure.source);
                (
                    status,
                    Json(RecoveryErrorResponse {
                        error: message,
                        applied: failure.applied,
                    }),
                )
                    .into_response()
            }
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        Self::Core(err)
    }
}

impl From<RecoveryFailure> for ApiError {
    fn from(failure: RecoveryFailure) -> Self {
        Self::Recovery(failure)
    }
}

// --- Middleware ---

async fn security_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert(
        "x-content-type-options",
        HeaderValue::from_static("nosniff"),
    );
    headers.insert("x-frame-options", HeaderValue::from_static("DENY"));
    headers.insert(
        "content-security-policy",
        HeaderValue::from_static("default-src 'none'"),
    );
    response
}

// --- Users ---

async fn register_user(
    State(state): State<AppState>,
    Json(req): Json<NewUser>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let user = state.service().register_user(&req)?;
    Ok((StatusCode::CREATED, Json(user)))
}

async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(state.service().user_detail(&user_id)?))
}

async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let authenticated = state.service().login(&req.user_id, &req.password)?;
    Ok(Json(LoginResponse { authenticated }))
}

async fn update_user(
    State(state): State<AppState>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(state.service().update_user(&req.user_id, &req.update)?))
}

async fn list_user_favorite_lists(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<FavoriteListDetail>>, ApiError> {
    Ok(Json(state.service().favorite_lists(&user_id)?))
}

async fn list_user_records(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<RecordDetail>>, ApiError> {
    Ok(Json(state.service().records(&user_id)?))
}

// --- Menus ---

async fn create_menu(
    State(state): State<AppState>,
    Json(req): Json<NewMenu>,
) -> Result<(StatusCode, Json<Menu>), ApiError> {
    let menu = state.service().create_menu(&req)?;
    Ok((StatusCode::CREATED, Json(menu)))
}

async fn list_menus(State(state): State<AppState>) -> Result<Json<Vec<MenuDetail>>, ApiError> {
    Ok(Json(state.service().list_menus()?))
}

async fn get_menu(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Menu>, ApiError> {
    Ok(Json(state.service().get_menu(id)?))
}

async fn update_menu(
    State(state): State<AppState>,
    Json(req): Json<UpdateMenuRequest>,
) -> Result<Json<Menu>, ApiError> {
    Ok(Json(state.service().update_menu(req.id, &req.update)?))
}

async fn delete_menu(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.service().delete_menu(id)?;
    Ok(StatusCode::NO_CONTENT)
}

// --- Favorite lists ---

async fn create_favorite_list(
    State(state): State<AppState>,
    Json(req): Json<NewFavoriteList>,
) -> Result<(StatusCode, Json<FavoriteList>), ApiError> {
    let favorite_list = state.service().create_favorite_list(&req)?;
    Ok((StatusCode::CREATED, Json(favorite_list)))
}

async fn get_favorite_list(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<FavoriteListDetail>, ApiError> {
    Ok(Json(state.service().favorite_list_detail(id)?))
}

async fn update_favorite_list(
    State(state): State<AppState>,
    Json(req): Json<UpdateFavoriteListRequest>,
) -> Result<Json<FavoriteList>, ApiError> {
    Ok(Json(
        state.service().update_favorite_list(req.id, &req.update)?,
    ))
}

async fn delete_favorite_list(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.service().delete_favorite_list(id)?;
    Ok(StatusCode::NO_CONTENT)
}

// --- Records ---

async fn create_record(
    State(state): State<AppState>,
    Json(req): Json<CreateRecordRequest>,
) -> Result<(StatusCode, Json<Record>), ApiError> {
    let event_timestamp = parse_event_timestamp(&req.event_timestamp)?;
    let record = state.service().create_record(&NewRecord {
        user_id: req.user_id,
        list: req.list,
        note: req.note,
        weight: req.weight,
        event_timestamp,
    })?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn get_record(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<RecordDetail>, ApiError> {
    Ok(Json(state.service().record_detail(id)?))
}

async fn update_record(
    State(state): State<AppState>,
    Json(req): Json<UpdateRecordRequest>,
) -> Result<Json<Record>, ApiError> {
    let event_timestamp = req
        .event_timestamp
        .as_deref()
        .map(parse_event_timestamp)
        .transpose()?;
    let update = UpdateRecord {
        list: req.list,
        note: req.note,
        weight: req.weight,
        event_timestamp,
    };
    Ok(Json(state.service().update_record(req.id, &update)?))
}

async fn delete_record(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.service().delete_record(id)?;
    Ok(StatusCode::NO_CONTENT)
}

// --- Recovery ---

async fn recover_menu(
    State(state): State<AppState>,
    Json(req): Json<RecoverMenuRequest>,
) -> Result<Json<RecoveryReport>, ApiError> {
    Ok(Json(state.service().recover_deleted_menu(&req)?))
}

fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    Router::new()
        .route("/api/users", post(register_user).put(update_user))
        .route("/api/users/login", put(login))
        .route("/api/users/{user_id}", get(get_user))
        .route("/api/users/{user_id}/favlists", get(list_user_favorite_lists))
        .route("/api/users/{user_id}/records", get(list_user_records))
        .route(
            "/api/menus",
            post(create_menu).get(list_menus).put(update_menu),
        )
        .route("/api/menus/{id}", get(get_menu).delete(delete_menu))
        .route(
            "/api/favlists",
            post(create_favorite_list).put(update_favorite_list),
        )
        .route(
            "/api/favlists/{id}",
            get(get_favorite_list).delete(delete_favorite_list),
        )
        .route("/api/records", post(create_record).put(update_record))
        .route("/api/records/{id}", get(get_record).delete(delete_record))
        .route("/api/recover", put(recover_menu))
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT))
        .layer(cors)
        .layer(middleware::from_fn(security_headers))
        .with_state(state)
}

// --- Server startup ---

pub async fn start_server(service: NutritionService, port: u16, bind: &str) -> anyhow::Result<()> {
    let state = AppState {
        service: Arc::new(Mutex::new(service)),
    };

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(format!("{bind}:{port}")).await?;
    tracing::info!("Listening on http://{bind}:{port}");
    axum::serve(listener, app).await?;

    Ok(())
}

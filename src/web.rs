use actix_files::NamedFile;
use actix_session::storage::CookieSessionStore;
use actix_session::{Session, SessionMiddleware};
use actix_web::cookie::Key;
use actix_web::{middleware, web, App, HttpResponse, HttpServer};
use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::admin::{self, Authenticator, PlainTextAuthenticator};
use crate::config::AppConfig;
use crate::error::PortalError;
use crate::portal::catalog::{
    build_lecture_catalog, list_simple_files, list_subfolders, DescriptionMap,
};
use crate::portal::deadlines::{classify_deadlines, DeadlineRecord};
use crate::portal::schedule::{generate_schedule, ScheduleConfig};
use crate::store::{pretty_json, JsonStore};

const LOGGED_IN_KEY: &str = "logged_in";
const NOTICE_KEY: &str = "notice";

/// Shared across all workers. Nothing here is mutable: every request
/// reloads from disk, so the JSON files stay the single source of truth.
pub struct AppState {
    pub config: AppConfig,
    pub store: JsonStore,
    pub auth: Box<dyn Authenticator>,
}

/// One transient flash message, stored in the cookie session until the next
/// page pulls it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notice {
    pub kind: String,
    pub text: String,
}

fn flash(session: &Session, kind: &str, text: impl Into<String>) {
    let _ = session.insert(
        NOTICE_KEY,
        Notice {
            kind: kind.to_string(),
            text: text.into(),
        },
    );
}

fn take_notice(session: &Session) -> Option<Notice> {
    let notice = session.get::<Notice>(NOTICE_KEY).ok().flatten();
    if notice.is_some() {
        session.remove(NOTICE_KEY);
    }
    notice
}

fn is_logged_in(session: &Session) -> bool {
    session
        .get::<bool>(LOGGED_IN_KEY)
        .ok()
        .flatten()
        .unwrap_or(false)
}

fn require_login(session: &Session) -> Result<(), PortalError> {
    if is_logged_in(session) {
        Ok(())
    } else {
        Err(PortalError::Unauthorized)
    }
}

fn redirect(to: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header(("Location", to))
        .finish()
}

fn page(html: &'static str) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html)
}

// HTML page shells; all data comes from the /api endpoints below.

async fn index_page() -> HttpResponse {
    page(include_str!("../templates/index.html"))
}

async fn materials_page() -> HttpResponse {
    page(include_str!("../templates/materials.html"))
}

async fn schedule_page() -> HttpResponse {
    page(include_str!("../templates/schedule.html"))
}

async fn deadlines_page() -> HttpResponse {
    page(include_str!("../templates/deadlines.html"))
}

async fn login_page() -> HttpResponse {
    page(include_str!("../templates/login.html"))
}

async fn admin_page(session: Session) -> HttpResponse {
    if !is_logged_in(&session) {
        return redirect("/login");
    }
    page(include_str!("../templates/admin.html"))
}

// JSON data endpoints.

async fn api_catalog(state: web::Data<AppState>) -> HttpResponse {
    let descriptions: DescriptionMap = state
        .store
        .load_or_default(&state.config.lectures_file, DescriptionMap::new());
    let groups = build_lecture_catalog(&state.config.lectures_dir, &descriptions);
    HttpResponse::Ok().json(groups)
}

async fn api_materials(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(list_simple_files(&state.config.materials_dir))
}

async fn api_schedule(state: web::Data<AppState>) -> HttpResponse {
    let config: ScheduleConfig = state
        .store
        .load_or_create(&state.config.schedule_file, ScheduleConfig::default());
    HttpResponse::Ok().json(generate_schedule(&config))
}

async fn api_deadlines(state: web::Data<AppState>) -> HttpResponse {
    let records: Vec<DeadlineRecord> = state
        .store
        .load_or_default(&state.config.deadlines_file, Vec::new());
    let today = Local::now().date_naive();
    HttpResponse::Ok().json(classify_deadlines(&records, today))
}

async fn api_notice(session: Session) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "notice": take_notice(&session) }))
}

/// Serves one file, searching the content roots in order: materials, labs,
/// the lectures root, then each lecture subfolder. A bare filename is enough
/// even when the PDF sits inside a semester folder.
async fn download(
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<NamedFile, PortalError> {
    let rel = path.into_inner();
    // Only plain relative components may pass: an absolute path would make
    // `root.join` discard the content root, and `..` would climb out of it.
    let is_contained = std::path::Path::new(&rel)
        .components()
        .all(|c| matches!(c, std::path::Component::Normal(_)));
    if !is_contained {
        return Err(PortalError::InvalidFilename(rel));
    }

    let config = &state.config;
    let mut roots = vec![
        config.materials_dir.clone(),
        config.labs_dir.clone(),
        config.lectures_dir.clone(),
    ];
    for sub in list_subfolders(&config.lectures_dir) {
        roots.push(config.lectures_dir.join(sub));
    }

    for root in roots {
        let candidate = root.join(&rel);
        if candidate.is_file() {
            return Ok(NamedFile::open(candidate)?);
        }
    }
    Err(PortalError::FileNotFound(rel))
}

// Login state.

#[derive(Deserialize)]
pub struct LoginForm {
    password: String,
}

async fn login_post(
    form: web::Form<LoginForm>,
    session: Session,
    state: web::Data<AppState>,
) -> HttpResponse {
    if state.auth.verify(&form.password) {
        let _ = session.insert(LOGGED_IN_KEY, true);
        redirect("/admin")
    } else {
        flash(&session, "error", "Неверный код доступа");
        redirect("/login")
    }
}

async fn logout(session: Session) -> HttpResponse {
    session.remove(LOGGED_IN_KEY);
    redirect("/")
}

// Admin panel.

#[derive(Serialize)]
struct AdminState {
    schedule_text: String,
    deadlines_text: String,
    semesters: Vec<String>,
    materials_files: Vec<String>,
    labs_files: Vec<String>,
}

async fn api_admin_state(
    session: Session,
    state: web::Data<AppState>,
) -> Result<HttpResponse, PortalError> {
    require_login(&session)?;
    let config = &state.config;

    let schedule: ScheduleConfig = state
        .store
        .load_or_create(&config.schedule_file, ScheduleConfig::default());
    let deadlines: Vec<serde_json::Value> = state
        .store
        .load_or_default(&config.deadlines_file, Vec::new());

    Ok(HttpResponse::Ok().json(AdminState {
        schedule_text: pretty_json(&schedule).unwrap_or_default(),
        deadlines_text: pretty_json(&deadlines).unwrap_or_default(),
        semesters: list_subfolders(&config.lectures_dir),
        materials_files: list_simple_files(&config.materials_dir)
            .into_iter()
            .map(|f| f.name)
            .collect(),
        labs_files: list_simple_files(&config.labs_dir)
            .into_iter()
            .map(|f| f.name)
            .collect(),
    }))
}

/// The dashboard posts one urlencoded form; which fields are present decides
/// whether this is an add-deadline or a raw-JSON save.
#[derive(Deserialize)]
pub struct AdminForm {
    add_deadline_btn: Option<String>,
    subject: Option<String>,
    title: Option<String>,
    date: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    file_select: Option<String>,
    schedule_json: Option<String>,
    deadlines_json: Option<String>,
}

async fn admin_post(
    form: web::Form<AdminForm>,
    session: Session,
    state: web::Data<AppState>,
) -> HttpResponse {
    if !is_logged_in(&session) {
        return redirect("/login");
    }
    let form = form.into_inner();

    if form.add_deadline_btn.is_some() {
        let record = DeadlineRecord {
            subject: form.subject.unwrap_or_default(),
            title: form.title.unwrap_or_default(),
            date: form.date.unwrap_or_default(),
            kind: form.kind.unwrap_or_default(),
            file: form.file_select.filter(|f| !f.is_empty()),
        };
        match admin::append_deadline(&state.config, &state.store, record) {
            Ok(()) => flash(&session, "success", "Дедлайн успешно добавлен!"),
            Err(err) => flash(&session, "error", format!("Ошибка добавления: {}", err)),
        }
    } else if form.schedule_json.is_some() || form.deadlines_json.is_some() {
        match admin::save_raw_json(
            &state.config,
            &state.store,
            form.schedule_json.as_deref(),
            form.deadlines_json.as_deref(),
        ) {
            Ok(()) => flash(&session, "success", "Текстовые данные сохранены!"),
            Err(err) => flash(&session, "error", format!("Ошибка JSON: {}", err)),
        }
    }
    redirect("/admin")
}

#[derive(Deserialize)]
pub struct UploadQuery {
    category: String,
    filename: String,
}

/// Raw-body upload; the page supplies the original filename and the target
/// category in the query string.
async fn admin_upload(
    query: web::Query<UploadQuery>,
    body: web::Bytes,
    session: Session,
    state: web::Data<AppState>,
) -> HttpResponse {
    if !is_logged_in(&session) {
        return redirect("/login");
    }
    match admin::save_upload(&state.config, &query.category, &query.filename, &body) {
        Ok(_) => flash(
            &session,
            "success",
            format!("Файл \"{}\" загружен!", query.filename),
        ),
        Err(err) => flash(&session, "error", format!("Ошибка: {}", err)),
    }
    redirect("/admin")
}

#[derive(Deserialize)]
pub struct DeleteForm {
    category: String,
    filename: String,
}

async fn admin_delete(
    form: web::Form<DeleteForm>,
    session: Session,
    state: web::Data<AppState>,
) -> HttpResponse {
    if !is_logged_in(&session) {
        return redirect("/login");
    }
    match admin::delete_file(&state.config, &form.category, &form.filename) {
        Ok(()) => flash(
            &session,
            "success",
            format!("Файл {} удален.", form.filename),
        ),
        Err(err) => flash(&session, "error", format!("Ошибка удаления: {}", err)),
    }
    redirect("/admin")
}

/// Route table, shared between the real server and the tests.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index_page))
        .route("/materials", web::get().to(materials_page))
        .route("/schedule", web::get().to(schedule_page))
        .route("/deadlines", web::get().to(deadlines_page))
        .route("/login", web::get().to(login_page))
        .route("/login", web::post().to(login_post))
        .route("/logout", web::get().to(logout))
        .route("/admin", web::get().to(admin_page))
        .route("/admin", web::post().to(admin_post))
        .route("/admin/upload", web::post().to(admin_upload))
        .route("/admin/delete_file", web::post().to(admin_delete))
        .route("/download/{filepath:.*}", web::get().to(download))
        .route("/api/catalog", web::get().to(api_catalog))
        .route("/api/materials", web::get().to(api_materials))
        .route("/api/schedule", web::get().to(api_schedule))
        .route("/api/deadlines", web::get().to(api_deadlines))
        .route("/api/notice", web::get().to(api_notice))
        .route("/api/admin/state", web::get().to(api_admin_state));
}

pub async fn start_server(port: u16, config: AppConfig) -> std::io::Result<()> {
    let auth = Box::new(PlainTextAuthenticator::new(config.admin_password.clone()));
    let state = web::Data::new(AppState {
        auth,
        store: JsonStore::new(),
        config,
    });
    // Sessions do not survive a restart; admins just log in again.
    let session_key = Key::generate();

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(middleware::Logger::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), session_key.clone())
                    .cookie_secure(false)
                    .build(),
            )
            .configure(routes)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}

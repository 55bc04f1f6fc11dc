use actix_web::{App, HttpResponse, HttpServer, Responder, web};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::clipboard::CommandClipboard;
use crate::color::{self, ColorFormat};
use crate::config::{Config, StoreType};
use crate::popup::Popup;
use crate::sampler::{CommandSampler, SampleError, Sampler};
use crate::storage::{FileStore, KeyValueStore, MemoryStore};

pub type AppStore = Box<dyn KeyValueStore + Send>;
pub type AppPopup = Popup<AppStore, CommandSampler, CommandClipboard>;
pub type SharedPopup = web::Data<Mutex<AppPopup>>;

#[derive(Deserialize)]
struct ColorBody {
    color: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

fn error_body(message: impl Into<String>) -> ErrorBody {
    ErrorBody { error: message.into() }
}

pub fn build_popup(config: &Config) -> AppPopup {
    let store: AppStore = match config.store_type {
        StoreType::Memory => Box::new(MemoryStore::new()),
        StoreType::File => Box::new(FileStore::new(&config.store_file_path)),
    };
    Popup::activate(
        store,
        CommandSampler::new(config.sampler_command.as_deref()),
        CommandClipboard::new(config.clipboard_command.as_deref()),
    )
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/session", web::get().to(session_handler))
        .route("/sample", web::post().to(sample_handler))
        .route("/pick", web::post().to(pick_handler))
        .route("/format/{format}", web::post().to(format_handler))
        .route("/theme/toggle", web::post().to(theme_handler))
        .route("/recent/select", web::post().to(select_recent_handler))
        .route("/recent/delete", web::post().to(delete_recent_handler))
        .route("/clear", web::post().to(clear_handler))
        .route("/copy", web::post().to(copy_handler));
}

pub async fn run_api_server() -> std::io::Result<()> {
    let config = Config::from_env();

    info!("Starting host bridge on {}:{}", config.host, config.port);
    info!(
        "Store: {:?} ({}), sampler: {}, clipboard: {}",
        config.store_type,
        config.store_file_path,
        config.sampler_command.as_deref().unwrap_or("none"),
        config.clipboard_command.as_deref().unwrap_or("none"),
    );

    let popup = web::Data::new(Mutex::new(build_popup(&config)));

    HttpServer::new(move || App::new().app_data(popup.clone()).configure(configure))
        .bind((config.host.as_str(), config.port))?
        .run()
        .await
}

async fn session_handler(popup: SharedPopup) -> impl Responder {
    let popup = popup.lock().await;
    HttpResponse::Ok().json(popup.view())
}

/// The picker can stay open for as long as the user likes, so the popup is
/// only locked to check availability and to apply the outcome.
async fn sample_handler(popup: SharedPopup) -> impl Responder {
    let sampler = {
        let popup = popup.lock().await;
        if !popup.sampler().is_available() {
            warn!("Color sampling requested but no sampler is available");
            return HttpResponse::NotImplemented().json(error_body(SampleError::Unsupported.to_string()));
        }
        popup.sampler().clone()
    };
    let outcome = sampler.open().await;

    let mut popup = popup.lock().await;
    match popup.accept_sample(outcome) {
        Ok(_) => HttpResponse::Ok().json(popup.view()),
        Err(e @ SampleError::Unsupported) => HttpResponse::NotImplemented().json(error_body(e.to_string())),
        Err(e) => HttpResponse::InternalServerError().json(error_body(e.to_string())),
    }
}

async fn pick_handler(popup: SharedPopup, body: web::Json<ColorBody>) -> impl Responder {
    if !color::is_color_token(&body.color) {
        warn!("Rejected pick of unparsable color '{}'", body.color);
        return HttpResponse::BadRequest().json(error_body(format!("invalid color '{}'", body.color)));
    }
    let mut popup = popup.lock().await;
    popup.pick_color(&body.color);
    HttpResponse::Ok().json(popup.view())
}

async fn format_handler(popup: SharedPopup, path: web::Path<String>) -> impl Responder {
    let format = match path.into_inner().parse::<ColorFormat>() {
        Ok(format) => format,
        Err(e) => return HttpResponse::BadRequest().json(error_body(e)),
    };
    let mut popup = popup.lock().await;
    popup.select_format(format);
    HttpResponse::Ok().json(popup.view())
}

async fn theme_handler(popup: SharedPopup) -> impl Responder {
    let mut popup = popup.lock().await;
    popup.toggle_theme();
    HttpResponse::Ok().json(popup.view())
}

async fn select_recent_handler(popup: SharedPopup, body: web::Json<ColorBody>) -> impl Responder {
    if !color::is_color_token(&body.color) {
        return HttpResponse::BadRequest().json(error_body(format!("invalid color '{}'", body.color)));
    }
    let mut popup = popup.lock().await;
    popup.select_recent_color(&body.color);
    HttpResponse::Ok().json(popup.view())
}

async fn delete_recent_handler(popup: SharedPopup, body: web::Json<ColorBody>) -> impl Responder {
    let mut popup = popup.lock().await;
    popup.delete_recent_color(&body.color);
    HttpResponse::Ok().json(popup.view())
}

async fn clear_handler(popup: SharedPopup) -> impl Responder {
    let mut popup = popup.lock().await;
    popup.clear_all();
    HttpResponse::Ok().json(popup.view())
}

async fn copy_handler(popup: SharedPopup) -> impl Responder {
    let mut popup = popup.lock().await;
    popup.copy_formatted().await;
    HttpResponse::Ok().json(popup.view())
}

use std::sync::{Mutex, MutexGuard};

use actix_web::{middleware, web, App, HttpResponse, HttpServer, Result};
use serde::Serialize;
use tracing::info;

use crate::request::PlacementRequest;
use crate::schedule::{grid_slots, Placement, PlacementId};
use crate::sections::Sections;

// In-memory only; nothing survives a restart
pub struct AppState {
    pub sections: Mutex<Sections>,
}

impl AppState {
    pub fn new(sections: Sections) -> Self {
        AppState {
            sections: Mutex::new(sections),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Sections>> {
        self.sections
            .lock()
            .map_err(|_| actix_web::error::ErrorInternalServerError("section state is unavailable"))
    }
}

#[derive(Serialize)]
pub struct PlacementView<'a> {
    #[serde(flatten)]
    placement: &'a Placement,
    assigned_hours: f64,
}

impl<'a> From<&'a Placement> for PlacementView<'a> {
    fn from(placement: &'a Placement) -> Self {
        PlacementView {
            placement,
            assigned_hours: placement.assigned_hours(),
        }
    }
}

#[derive(Serialize)]
pub struct GridSlot {
    slot: u8,
    start: String,
    end: String,
}

#[derive(Serialize)]
pub struct BudgetEntry<'a> {
    subject: &'a str,
    remaining_hours: f64,
}

async fn get_catalog(state: web::Data<AppState>) -> Result<HttpResponse> {
    let sections = state.lock()?;
    Ok(HttpResponse::Ok().json(sections.catalog()))
}

async fn get_grid() -> Result<HttpResponse> {
    let slots: Vec<GridSlot> = grid_slots()
        .into_iter()
        .map(|(slot, range)| GridSlot {
            slot,
            start: range.start.to_string(),
            end: range.end.to_string(),
        })
        .collect();
    Ok(HttpResponse::Ok().json(slots))
}

async fn list_placements(section: web::Path<String>, state: web::Data<AppState>) -> Result<HttpResponse> {
    let sections = state.lock()?;
    let placements: Vec<PlacementView> = match sections.get(&section) {
        Some(grid) => grid.sorted_placements().into_iter().map(PlacementView::from).collect(),
        None => Vec::new(),
    };
    Ok(HttpResponse::Ok().json(placements))
}

async fn propose_placement(
    section: web::Path<String>,
    req: web::Json<PlacementRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let mut sections = state.lock()?;
    match sections.submit(&section, &req) {
        Ok(commit) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "commit": commit,
        }))),
        Err(e) => Ok(HttpResponse::UnprocessableEntity().json(serde_json::json!({
            "success": false,
            "kind": e.kind(),
            "error": e.to_string(),
        }))),
    }
}

async fn delete_placement(path: web::Path<(String, String)>, state: web::Data<AppState>) -> Result<HttpResponse> {
    let (section, raw_id) = path.into_inner();
    let id: PlacementId = match raw_id.parse() {
        Ok(id) => id,
        Err(_) => {
            return Ok(HttpResponse::BadRequest().json(serde_json::json!({"error": "Invalid placement id"})))
        }
    };

    let mut sections = state.lock()?;
    let removed = sections
        .get_mut(&section)
        .and_then(|grid| grid.delete_placement(id));

    match removed {
        Some(placement) => Ok(HttpResponse::Ok().json(PlacementView::from(&placement))),
        None => Ok(HttpResponse::NotFound().json(serde_json::json!({"error": "Placement not found"}))),
    }
}

async fn get_budget(section: web::Path<String>, state: web::Data<AppState>) -> Result<HttpResponse> {
    let sections = state.lock()?;
    // Sections nobody has touched yet still have their full budget
    let budget = match sections.get(&section) {
        Some(grid) => grid.budget().clone(),
        None => sections.catalog().initial_budget(),
    };
    let entries: Vec<BudgetEntry> = budget
        .entries()
        .into_iter()
        .map(|(subject, remaining_hours)| BudgetEntry {
            subject,
            remaining_hours,
        })
        .collect();
    Ok(HttpResponse::Ok().json(entries))
}

/// Registers the JSON API routes.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/catalog", web::get().to(get_catalog))
        .route("/api/grid", web::get().to(get_grid))
        .service(
            web::resource("/api/sections/{section}/placements")
                .route(web::get().to(list_placements))
                .route(web::post().to(propose_placement)),
        )
        .service(web::resource("/api/sections/{section}/placements/{id}").route(web::delete().to(delete_placement)))
        .service(web::resource("/api/sections/{section}/budget").route(web::get().to(get_budget)));
}

pub async fn start_server(port: u16, sections: Sections) -> std::io::Result<()> {
    let app_state = web::Data::new(AppState::new(sections));

    info!(port, "starting web server");

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(middleware::Logger::default())
            .configure(routes)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}

use class_timetable::catalog::load_catalog;
use class_timetable::config::{Config, DEFAULT_PORT};
use class_timetable::replay::{log_budget_summary, replay_file};
use class_timetable::sections::Sections;
use class_timetable::web;
use tracing::info;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: class-timetable serve [port] | class-timetable replay <catalog.csv> <actions.csv>";

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = Config::from_env()?;
    let args: Vec<String> = std::env::args().collect();

    match args.get(1).map(String::as_str) {
        Some("serve") => {
            let port = args.get(2)
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(DEFAULT_PORT);

            let catalog = load_catalog(&config.catalog_path)?;
            info!(
                path = %config.catalog_path.display(),
                teachers = catalog.teachers.len(),
                rooms = catalog.rooms.len(),
                subjects = catalog.subjects.len(),
                "catalog loaded"
            );
            info!("access the API at http://localhost:{}/api/catalog", port);

            web::start_server(port, Sections::new(catalog, config.seed)).await?;
        }
        Some("replay") => {
            let (catalog_path, actions_path) = match (args.get(2), args.get(3)) {
                (Some(catalog), Some(actions)) => (catalog, actions),
                _ => return Err(USAGE.into()),
            };

            let catalog = load_catalog(catalog_path)?;
            let mut sections = Sections::new(catalog, config.seed);
            let outcomes = replay_file(actions_path, &mut sections)?;

            let committed = outcomes.iter().filter(|o| o.is_committed()).count();
            info!(rows = outcomes.len(), committed, "replay finished");
            log_budget_summary(&sections);
        }
        _ => return Err(USAGE.into()),
    }

    Ok(())
}

//! Classroom services
//!
//! Student, teacher, task and badge HTTP services backed by flat JSON files.
//! One process runs one service; the teacher service also forwards part of the
//! student and badges APIs.

mod api;
mod config;
mod db;
mod errors;
mod models;
mod proxy;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use clap::Parser;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::{Config, ServiceKind};
use db::{BadgeRepository, StudentRepository, TaskCatalog, TeacherRepository};
use proxy::Upstream;

#[derive(Parser, Debug)]
#[command(name = "classroom-services")]
#[command(version, about = "Runs one of the classroom HTTP services")]
struct Args {
    /// Service to run.
    #[arg(value_enum)]
    service: ServiceKind,
}

/// State of the teacher service: its own records plus the services it forwards to.
#[derive(Clone)]
pub struct TeacherState {
    pub teachers: Arc<TeacherRepository>,
    pub students: Upstream,
    pub badges: Upstream,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Load configuration
    let config = Config::from_env(args.service)?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting {}", config.service);
    tracing::info!("Data directory: {:?}", config.data_dir);
    if config.service == ServiceKind::Teacher {
        tracing::info!("Student service: {}", config.student_service_url);
        tracing::info!("Badges service: {}", config.badges_service_url);
        if config.proxy_timeout.is_none() {
            tracing::warn!("PROXY_TIMEOUT_SECS=0: forwarded calls wait indefinitely");
        }
    }

    // Build router
    let app = create_router(&config)?;

    // Start server
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("{} listening on {}", config.service, config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the router for the service selected in `config`.
pub fn create_router(config: &Config) -> Result<Router, reqwest::Error> {
    let routes = match config.service {
        ServiceKind::Student => student_routes(config),
        ServiceKind::Teacher => teacher_routes(config)?,
        ServiceKind::Tasks => task_routes(config),
        ServiceKind::Badges => badge_routes(config),
    };

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Ok(routes
        .route("/health", get(api::health_check))
        .fallback(api::not_found)
        .layer(CatchPanicLayer::custom(api::panic_response))
        .layer(cors)
        .layer(TraceLayer::new_for_http()))
}

fn student_routes(config: &Config) -> Router {
    let repo = Arc::new(StudentRepository::new(config.students_file()));

    Router::new()
        .route(
            "/students",
            get(api::list_students).post(api::create_student),
        )
        .route(
            "/students/{login}",
            get(api::get_student).put(api::update_student),
        )
        .route("/students/{login}/badges", post(api::add_student_badge))
        .with_state(repo)
}

fn teacher_routes(config: &Config) -> Result<Router, reqwest::Error> {
    let state = TeacherState {
        teachers: Arc::new(TeacherRepository::new(config.teachers_file())),
        students: Upstream::new(
            ServiceKind::Student.name(),
            &config.student_service_url,
            config.proxy_timeout,
        )?,
        badges: Upstream::new(
            ServiceKind::Badges.name(),
            &config.badges_service_url,
            config.proxy_timeout,
        )?,
    };

    Ok(Router::new()
        .route(
            "/teachers",
            get(api::list_teachers).post(api::create_teacher),
        )
        // Forwarded to the student service
        .route("/students", get(api::proxy_list_students))
        .route(
            "/students/{login}/badges",
            post(api::proxy_add_student_badge),
        )
        // Forwarded to the badges service
        .route(
            "/badges",
            get(api::proxy_list_badges).post(api::proxy_create_badge),
        )
        .with_state(state))
}

fn task_routes(config: &Config) -> Router {
    let catalog = Arc::new(TaskCatalog::new(config.tasks_file()));

    Router::new()
        .route("/tasks", get(api::list_tasks))
        .nest_service("/images", ServeDir::new(&config.images_dir))
        .with_state(catalog)
}

fn badge_routes(config: &Config) -> Router {
    let repo = Arc::new(BadgeRepository::new(config.badges_file()));

    Router::new()
        .route("/badges", get(api::list_badges).post(api::create_badge))
        .with_state(repo)
}

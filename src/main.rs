//! Workshop Catalog server binary.

use std::sync::Arc;

use sqlx::PgPool;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use workshop_catalog::adapters::auth::{JwtConfig, JwtTokenValidator};
use workshop_catalog::adapters::http::{app_router, CourseHandlers, SessionHandlers};
use workshop_catalog::adapters::postgres::{
    PostgresCalendarProvider, PostgresCourseRepository, PostgresInstructorReader,
    PostgresPermissionOracle, PostgresSessionRepository, PostgresTemplateTextReader,
};
use workshop_catalog::adapters::ticketing::{EventbriteConfig, EventbriteGateway};
use workshop_catalog::application::{
    CancelSessionHandler, ChangeCourseStateHandler, ConvertEventToCourseHandler,
    CreateSessionHandler, GetSessionHandler, ListSessionsHandler, LoadAttendeesHandler,
    PublicationSynchronizer, PublishSessionHandler, SubmitForApprovalHandler,
    SynchronizerSettings,
};
use workshop_catalog::config::AppConfig;
use workshop_catalog::ports::{
    CalendarProvider, CourseRepository, InstructorReader, PermissionOracle, SessionRepository,
    TemplateTextReader, TicketingGateway, TokenValidator,
};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = AppConfig::load()?;
    init_tracing(&config);
    config.validate()?;

    tracing::info!(
        environment = ?config.server.environment,
        "starting workshop catalog"
    );

    let pool = config.database.pool_options().connect(&config.database.url).await?;
    if config.database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("database migrations applied");
    }

    let (sessions, courses) = build_handlers(&config, pool)?;

    let auth_config = {
        let base = JwtConfig::new(&config.auth.jwt_secret).with_leeway(config.auth.leeway_secs);
        match &config.auth.issuer {
            Some(issuer) => base.with_issuer(issuer),
            None => base,
        }
    };
    let validator: Arc<dyn TokenValidator> = Arc::new(JwtTokenValidator::new(auth_config));

    let app = app_router(
        sessions,
        courses,
        validator,
        config.server.cors_origins_list(),
        config.server.request_timeout(),
    );

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    if config.is_production() {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer())
            .init();
    }
}

fn build_handlers(
    config: &AppConfig,
    pool: PgPool,
) -> Result<(SessionHandlers, CourseHandlers), BoxError> {
    let currency = config.ticketing.currency()?;
    let call_timeout = config.ticketing.call_timeout();
    let retries = config.lifecycle.conflict_retries;

    let session_repo: Arc<dyn SessionRepository> =
        Arc::new(PostgresSessionRepository::new(pool.clone()));
    let course_repo: Arc<dyn CourseRepository> =
        Arc::new(PostgresCourseRepository::new(pool.clone()));
    let instructors: Arc<dyn InstructorReader> =
        Arc::new(PostgresInstructorReader::new(pool.clone()));
    let templates: Arc<dyn TemplateTextReader> =
        Arc::new(PostgresTemplateTextReader::new(pool.clone()));
    let oracle: Arc<dyn PermissionOracle> =
        Arc::new(PostgresPermissionOracle::new(pool.clone()));
    let calendar: Arc<dyn CalendarProvider> = Arc::new(PostgresCalendarProvider::new(pool));

    let gateway: Arc<dyn TicketingGateway> = Arc::new(EventbriteGateway::new(
        EventbriteConfig::new(&config.ticketing.api_token)
            .with_base_url(config.ticketing.base_url()),
    ));

    let synchronizer = Arc::new(PublicationSynchronizer::new(
        gateway.clone(),
        calendar,
        templates,
        session_repo.clone(),
        SynchronizerSettings {
            call_timeout,
            currency: currency.clone(),
            timezone: config.ticketing.timezone.clone(),
            conflict_retries: retries,
        },
    ));

    let sessions = SessionHandlers::new(
        Arc::new(
            SubmitForApprovalHandler::new(session_repo.clone(), oracle.clone())
                .with_conflict_retries(retries),
        ),
        Arc::new(
            PublishSessionHandler::new(session_repo.clone(), oracle.clone(), synchronizer.clone())
                .with_conflict_retries(retries),
        ),
        Arc::new(
            CancelSessionHandler::new(session_repo.clone(), oracle.clone(), synchronizer)
                .with_conflict_retries(retries),
        ),
        Arc::new(GetSessionHandler::new(session_repo.clone())),
        Arc::new(ListSessionsHandler::new(session_repo.clone())),
        Arc::new(LoadAttendeesHandler::new(
            session_repo.clone(),
            oracle.clone(),
            gateway.clone(),
            call_timeout,
        )),
    );

    let courses = CourseHandlers::new(
        Arc::new(CreateSessionHandler::new(
            course_repo.clone(),
            session_repo,
            instructors,
            oracle.clone(),
        )),
        Arc::new(ConvertEventToCourseHandler::new(
            course_repo.clone(),
            oracle.clone(),
            gateway,
            currency,
            call_timeout,
        )),
        Arc::new(ChangeCourseStateHandler::new(course_repo, oracle)),
    );

    Ok((sessions, courses))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    tracing::info!("shutdown signal received");
}

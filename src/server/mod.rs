//! Server composition: configuration, adapter wiring, and the Actix app.

pub mod config;

pub use config::{AppConfig, ConfigError};

use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use tracing::info;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use crate::domain::ports::InvitationMailer;
use crate::domain::{RespondService, SurveyService};
use crate::inbound::http::auth::AdminAuth;
use crate::inbound::http::health::{live, ready, HealthState};
use crate::inbound::http::responses::{resolve_invitation, submit_response};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::surveys::{create_survey, get_survey, issue_invitations, list_surveys};
use crate::outbound::email::{DropDirectoryMailer, LogOnlyMailer};
use crate::outbound::persistence::{
    run_migrations_with_retry, DbPool, DieselInvitationLedger, DieselResponseStore,
    DieselSurveyStore, PoolConfig, DEFAULT_MAX_ATTEMPTS,
};

/// Wire the Diesel adapters and domain services into the handler state.
fn build_http_state<M>(pool: DbPool, response_base_url: &str, mailer: Arc<M>) -> HttpState
where
    M: InvitationMailer + 'static,
{
    let store = Arc::new(DieselSurveyStore::new(pool.clone()));
    let ledger = Arc::new(DieselInvitationLedger::new(pool.clone()));
    let responses = Arc::new(DieselResponseStore::new(pool));

    let admin = Arc::new(SurveyService::new(
        Arc::clone(&store),
        Arc::clone(&ledger),
        mailer,
        response_base_url,
    ));
    let respondent = Arc::new(RespondService::new(store, ledger, responses));

    HttpState::new(admin, respondent)
}

/// Run the HTTP server until shutdown.
///
/// Bootstraps the schema (retrying while the database comes up), wires the
/// adapters, and binds the Actix server. Marks the health state ready only
/// once storage is migrated.
pub async fn run(config: AppConfig) -> std::io::Result<()> {
    run_migrations_with_retry(&config.database_url, DEFAULT_MAX_ATTEMPTS)
        .await
        .map_err(std::io::Error::other)?;

    let pool = DbPool::new(
        PoolConfig::new(&config.database_url).with_max_size(config.pool_max_size),
    )
    .await
    .map_err(std::io::Error::other)?;

    let state = match &config.mail_drop_dir {
        Some(dir) => {
            info!(directory = %dir, "invitation emails will be written to the drop directory");
            build_http_state(
                pool,
                &config.response_base_url,
                Arc::new(DropDirectoryMailer::new(dir)),
            )
        }
        None => build_http_state(pool, &config.response_base_url, Arc::new(LogOnlyMailer)),
    };
    let auth = AdminAuth::new(config.admin_token.clone());

    let health_state = web::Data::new(HealthState::new());
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || {
        let api = web::scope("/api/v1")
            .service(create_survey)
            .service(list_surveys)
            .service(get_survey)
            .service(issue_invitations)
            .service(resolve_invitation)
            .service(submit_response);

        #[allow(unused_mut)]
        let mut app = App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(web::Data::new(auth.clone()))
            .app_data(server_health_state.clone())
            .service(api)
            .service(ready)
            .service(live);

        #[cfg(debug_assertions)]
        {
            app = app.service(
                SwaggerUi::new("/docs/{_:.*}")
                    .url("/api-docs/openapi.json", crate::doc::ApiDoc::openapi()),
            );
        }

        app
    })
    .bind(config.bind_addr)?;

    info!(addr = %config.bind_addr, "listening");
    health_state.mark_ready();
    server.run().await
}

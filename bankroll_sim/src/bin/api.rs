use actix_web::{
    body::BoxBody,
    error, get,
    http::{header::ContentType, StatusCode},
    post, web, App, HttpResponse, HttpServer,
};
use bankroll_sim::config::SimulatorConfigFile;
use bankroll_sim::write::SimulationReport;
use bankroll_sim::{BlackjackSimulator, SimulatorConfigBuilder};
use serde::Deserialize;
use std::sync::Mutex;

const DEFAULT_BINS: usize = 20;

type AppSimulator = web::Data<Mutex<Option<BlackjackSimulator>>>;

/// An enum that will handle user facing errors
#[derive(thiserror::Error, Debug)]
enum UserError {
    #[error("an internal error occured")]
    InternalError,
    #[error("unable to run, a simulator has not been configured")]
    SimulatorNotCreated,
    #[error("{0}")]
    BadInput(String),
}

impl error::ResponseError for UserError {
    fn error_response(&self) -> HttpResponse<BoxBody> {
        HttpResponse::build(self.status_code())
            .content_type(ContentType::plaintext())
            .body(self.to_string())
    }

    fn status_code(&self) -> StatusCode {
        match *self {
            UserError::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            UserError::SimulatorNotCreated => StatusCode::BAD_REQUEST,
            UserError::BadInput(_) => StatusCode::BAD_REQUEST,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RunParams {
    bins: Option<usize>,
}

/// A handler that validates the configuration in the body of the request and replaces the current
/// simulator with one built from it.
#[post("/config-game-params")]
async fn configure_simulation_parameters(
    params: web::Json<SimulatorConfigFile>,
    app_sim: AppSimulator,
) -> Result<HttpResponse, UserError> {
    let config = SimulatorConfigBuilder::from(params.into_inner())
        .build()
        .map_err(|e| UserError::BadInput(e.to_string()))?;
    log::info!("configured simulator: {:?}", config);

    let mut guard = app_sim.lock().map_err(|_| UserError::InternalError)?;
    *guard = Some(BlackjackSimulator::new(config));
    Ok(HttpResponse::Ok().body("simulator created successfully"))
}

/// A handler that will run the configured simulator and respond with the report as JSON.
/// Will return an error response if the simulator has not been configured.
#[get("/run-sim")]
async fn run_simulation(
    query: web::Query<RunParams>,
    app_sim: AppSimulator,
) -> Result<HttpResponse, UserError> {
    // Release the lock before running so the configuration can be replaced meanwhile
    let simulator = app_sim
        .lock()
        .map_err(|_| UserError::InternalError)?
        .clone()
        .ok_or(UserError::SimulatorNotCreated)?;
    let bins = query.bins.unwrap_or(DEFAULT_BINS);

    let report = web::block(move || {
        let run = simulator.run()?;
        Ok::<_, bankroll_sim::SimulationError>(SimulationReport::new(
            simulator.config(),
            &run,
            bins,
        ))
    })
    .await
    .map_err(|_| UserError::InternalError)?
    .map_err(|e| {
        log::error!("simulation failed: {e}");
        UserError::InternalError
    })?
    .ok_or_else(|| UserError::BadInput(String::from("no sessions were simulated")))?;

    Ok(HttpResponse::Ok().json(report))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let address = "127.0.0.1";
    let port = 8080;
    log::info!("listening at {}:{}", address, port);

    let app_sim: AppSimulator = web::Data::new(Mutex::new(None));

    HttpServer::new(move || {
        App::new()
            .app_data(app_sim.clone())
            .service(configure_simulation_parameters)
            .service(run_simulation)
    })
    .bind((address, port))?
    .run()
    .await
}

extern crate actix_web;
extern crate chrono;
extern crate env_logger;
#[macro_use]
extern crate failure;
#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;
#[macro_use]
extern crate serde_json;

pub mod channels;
pub mod config;
pub mod database;
pub mod error;
pub mod forms;
pub mod handlers;
pub mod names;
pub mod schema;
pub mod subs_and_channels;
pub mod templates;
pub mod videos;
pub mod youtube_search;

use actix_web::{middleware, web, App, HttpServer};
use crate::config::Config;
use crate::handlers::AppState;
use crate::youtube_search::YoutubeSearch;

#[actix_web::main]
async fn main() -> Result<(), failure::Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Loading configuration");
    let config = Config::load()?;

    info!("Registering templates");
    let hb = templates::register()?;

    info!("Setting up database");
    let pool = database::setup(&config.database)?;

    let state = web::Data::new(AppState {
        db: pool,
        hb,
        search: Box::new(YoutubeSearch::new(&config)?),
    });

    info!("Starting server on {}", config.bind);
    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(handlers::routes)
    })
    .bind(config.bind.as_str())?
    .run()
    .await?;

    Ok(())
}

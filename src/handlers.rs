use actix_web::{web, HttpResponse};
use actix_web::http::{StatusCode, header};
use handlebars::Handlebars;
use serde::Serialize;
use crate::channels::{self, SubmitOutcome};
use crate::database::{DbPool, with_conn};
use crate::error::AppError;
use crate::forms::{ChannelForm, NameForm, VideoForm, VideoSearchQuery};
use crate::names;
use crate::videos;
use crate::youtube_search::{VideoSearch, only_videos};

const DUPLICATE_NOTICE: &str = "This channel has already been submitted.";

pub struct AppState {
    pub db: DbPool,
    pub hb: Handlebars<'static>,
    pub search: Box<dyn VideoSearch>,
}

#[derive(Deserialize)]
pub struct ResultsQuery {
    notice: Option<String>,
}

fn render<T: Serialize>(state: &AppState, name: &str, data: &T) -> Result<HttpResponse, AppError> {
    let body = state.hb.render(name, data)?;
    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body))
}

fn redirect(location: &str) -> HttpResponse {
    HttpResponse::build(StatusCode::FOUND)
        .insert_header((header::LOCATION, location))
        .finish()
}

async fn name_form(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    render(&state, "name_form", &json!({ "form": NameForm::default() }))
}

async fn submit_name(state: web::Data<AppState>, form: web::Form<NameForm>) -> Result<HttpResponse, AppError> {
    let form = form.into_inner();
    match form.validate() {
        Ok(name) => {
            let name = name.to_string();
            with_conn(&state.db, move |conn| names::submit_name(conn, &name)).await?;
            Ok(redirect("/names"))
        }
        Err(errors) => render(&state, "name_form", &json!({ "form": form, "errors": errors.errors })),
    }
}

async fn all_names(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let names = with_conn(&state.db, names::list_names).await?;
    render(&state, "names", &json!({ "names": names }))
}

async fn channel_form(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let num_submissions = with_conn(&state.db, channels::count_channels).await?;
    render(&state, "channel_form", &json!({
        "form": ChannelForm::default(),
        "num_submissions": num_submissions,
    }))
}

async fn submit_channel(state: web::Data<AppState>, form: web::Form<ChannelForm>) -> Result<HttpResponse, AppError> {
    let form = form.into_inner();
    let valid = match form.validate() {
        Ok(v) => v,
        Err(errors) => {
            let num_submissions = with_conn(&state.db, channels::count_channels).await?;
            return render(&state, "channel_form", &json!({
                "form": form,
                "errors": errors.errors,
                "num_submissions": num_submissions,
            }));
        }
    };

    let outcome = with_conn(&state.db, move |conn| channels::submit_channel(conn, &valid)).await?;

    match outcome {
        SubmitOutcome::Created { .. } => Ok(redirect("/channelresults")),
        SubmitOutcome::AlreadySubmitted => Ok(redirect("/channelresults?notice=duplicate")),
    }
}

async fn all_channels(state: web::Data<AppState>, query: web::Query<ResultsQuery>) -> Result<HttpResponse, AppError> {
    let listing = with_conn(&state.db, channels::list_channels).await?;
    let notice = match query.notice.as_deref() {
        Some("duplicate") => Some(DUPLICATE_NOTICE),
        _ => None,
    };
    render(&state, "channel_results", &json!({
        "channels": listing.channels,
        "subscribers": listing.subscribers,
        "notice": notice,
    }))
}

async fn video_form(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    render(&state, "video_form", &json!({ "form": VideoForm::default() }))
}

async fn video_results(state: web::Data<AppState>, query: web::Query<VideoSearchQuery>) -> Result<HttpResponse, AppError> {
    let query = query.into_inner();
    let title = match query.validate() {
        Ok(t) => t.to_string(),
        Err(errors) => {
            return render(&state, "video_form", &json!({
                "form": VideoForm { title: query.title.clone() },
                "errors": errors.errors,
            }));
        }
    };

    let recent = with_conn(&state.db, move |conn| videos::record_search(conn, &title)).await?;
    let items = state.search.search(&recent.title).await?;
    let objects = only_videos(items);
    let videos = with_conn(&state.db, videos::list_search_history).await?;

    render(&state, "video_results", &json!({
        "recent": recent,
        "videos": videos,
        "objects": objects,
    }))
}

async fn search_history(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let videos = with_conn(&state.db, videos::list_search_history).await?;
    render(&state, "search_history", &json!({ "videos": videos }))
}

async fn not_found(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let body = state.hb.render("not_found", &json!({}))?;
    Ok(HttpResponse::NotFound()
        .content_type("text/html; charset=utf-8")
        .body(body))
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/")
            .route(web::get().to(name_form))
            .route(web::post().to(submit_name)))
        .service(web::resource("/names").route(web::get().to(all_names)))
        .service(web::resource("/channels")
            .route(web::get().to(channel_form))
            .route(web::post().to(submit_channel)))
        .service(web::resource("/channelresults").route(web::get().to(all_channels)))
        .service(web::resource("/videos")
            .route(web::get().to(video_form))
            .route(web::post().to(video_form)))
        .service(web::resource("/videoresults").route(web::get().to(video_results)))
        .service(web::resource("/search_history").route(web::get().to(search_history)))
        .default_service(web::to(not_found));
}

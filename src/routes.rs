//! HTTP surface: the category pages and the round commands.
//!
//! Every command redirects back to the category the browser last viewed.

use askama::Template;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, Redirect, Response},
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::commands::{
    CompleteCommand, PageParams, PageQuery, SkipCommand, StartCommand, StartQuery, WordQuery,
};
use crate::error::AppError;
use crate::session::Session;
use crate::state::{AppState, PageVisit};
use crate::types::*;

/// Round length offered by the start form when none is known yet
const DEFAULT_ROUND_MINUTES: f64 = 1.0;

#[derive(Debug, Clone, PartialEq)]
pub struct NavLink {
    pub title: String,
    pub href: String,
}

#[derive(Debug, Clone)]
pub struct CategoryLink {
    pub slug: &'static str,
    pub name: &'static str,
    pub active: bool,
}

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    title: String,
    nav_title: String,
    nav_links: Vec<NavLink>,
    category_links: Vec<CategoryLink>,
    category: Option<Category>,
    word: Option<String>,
    timeleft: Option<i64>,
    running: bool,
    default_minutes: f64,
    completed: Vec<WordEntry>,
    skipped: Vec<WordEntry>,
    score: Option<u32>,
    skipped_count: Option<u32>,
}

pub fn create_router(state: Arc<AppState>) -> Router {
    let mut router = Router::new()
        .route("/", get(home_page))
        .route("/start", get(start))
        .route("/stop", get(stop))
        .route("/complete", get(complete))
        .route("/skip", get(skip))
        .route("/health", get(health));

    for category in Category::ALL {
        router = router.route(
            &format!("/{}", category.slug()),
            get(
                move |state: State<Arc<AppState>>, session: Session, query: Query<PageQuery>| {
                    category_page(state, session, query, category)
                },
            ),
        );
    }

    router
        .fallback_service(ServeDir::new(&state.config.public_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn home_page(
    state: State<Arc<AppState>>,
    session: Session,
    query: Query<PageQuery>,
) -> Result<Response, AppError> {
    render_page(state, session, query, None).await
}

async fn category_page(
    state: State<Arc<AppState>>,
    session: Session,
    query: Query<PageQuery>,
    category: Category,
) -> Result<Response, AppError> {
    render_page(state, session, query, Some(category)).await
}

async fn render_page(
    State(state): State<Arc<AppState>>,
    session: Session,
    Query(query): Query<PageQuery>,
    category: Option<Category>,
) -> Result<Response, AppError> {
    let params = PageParams::from(query);
    let visit = state.visit_page(&session.id, category).await?;
    let path = visit.round.last_category.redirect_path();

    let template = page_template(&state, visit, params, &path);
    let html = template.render()?;

    Ok(session.finish(Html(html), &state.config))
}

fn page_template(state: &AppState, visit: PageVisit, params: PageParams, path: &str) -> IndexTemplate {
    let PageVisit {
        category,
        word,
        timeleft,
        round,
    } = visit;

    IndexTemplate {
        title: format!("Word Description :: {}", state.config.title_suffix),
        nav_title: state.config.title_suffix.clone(),
        nav_links: nav_links(state.config.login_url.as_deref(), path),
        category_links: Category::ALL
            .into_iter()
            .map(|c| CategoryLink {
                slug: c.slug(),
                name: c.display_name(),
                active: Some(c) == category,
            })
            .collect(),
        category,
        word,
        timeleft,
        running: round.running,
        default_minutes: params
            .time
            .filter(|t| *t > 0.0)
            .or(round.duration_minutes)
            .unwrap_or(DEFAULT_ROUND_MINUTES),
        completed: round.completed,
        skipped: round.skipped,
        score: params.score,
        skipped_count: params.skipped,
    }
}

/// Navigation links. No user is known to this service, so the only link
/// is the external login page, when configured.
pub fn nav_links(login_url: Option<&str>, path: &str) -> Vec<NavLink> {
    login_url
        .map(|url| NavLink {
            title: "Login".to_string(),
            href: format!("{}?redirect={}", url, path),
        })
        .into_iter()
        .collect()
}

async fn start(
    State(state): State<Arc<AppState>>,
    session: Session,
    Query(query): Query<StartQuery>,
) -> Result<Response, AppError> {
    let cmd = StartCommand::parse(query)?;
    let round = state.start_round(&session.id, &cmd).await?;
    Ok(redirect_back(&state, &session, &round))
}

async fn stop(State(state): State<Arc<AppState>>, session: Session) -> Result<Response, AppError> {
    let round = state.stop_round(&session.id).await?;
    Ok(redirect_back(&state, &session, &round))
}

async fn complete(
    State(state): State<Arc<AppState>>,
    session: Session,
    Query(query): Query<WordQuery>,
) -> Result<Response, AppError> {
    let cmd = CompleteCommand::parse(query)?;
    let round = state.complete_word(&session.id, &cmd).await?;
    Ok(redirect_back(&state, &session, &round))
}

async fn skip(
    State(state): State<Arc<AppState>>,
    session: Session,
    Query(query): Query<WordQuery>,
) -> Result<Response, AppError> {
    let cmd = SkipCommand::parse(query)?;
    let round = state.skip_word(&session.id, &cmd).await?;
    Ok(redirect_back(&state, &session, &round))
}

async fn health() -> (StatusCode, &'static str) {
    (StatusCode::OK, "healthy")
}

fn redirect_back(state: &AppState, session: &Session, round: &Round) -> Response {
    let target = round.last_category.redirect_path();
    session.finish(Redirect::to(&target), &state.config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nav_links_without_login() {
        assert!(nav_links(None, "/person").is_empty());
    }

    #[test]
    fn test_nav_links_with_login() {
        let links = nav_links(Some("https://auth.example.com/login"), "/world");
        assert_eq!(
            links,
            vec![NavLink {
                title: "Login".to_string(),
                href: "https://auth.example.com/login?redirect=/world".to_string(),
            }]
        );
    }
}

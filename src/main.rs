use std::{process, sync::Arc};

use postdeck::{
    application::{
        controller::PostListController,
        error::AppError,
        repos::PostFeed,
        routes::{self, InitialRoute},
        search::SearchOptions,
    },
    config::{self, Command},
    domain::view_state::ViewState,
    infra::{error::InfraError, http::HttpPostFeed, telemetry},
    presentation::views::render_listing,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{Dispatch, Level, debug, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, kind = error.kind(), "application error");
        return;
    }

    let subscriber = tracing_fmt()
        .with_max_level(Level::ERROR)
        .with_writer(std::io::stderr)
        .finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, kind = error.kind(), "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()?;

    telemetry::init(&settings.logging)?;

    let feed: Arc<dyn PostFeed> = Arc::new(HttpPostFeed::new(&settings.api)?);
    info!(base_url = %settings.api.base_url, "Using blog read API");

    match cli_args.command {
        Command::List(args) => {
            let route = InitialRoute::Index { page: args.page };
            run_listing(feed.as_ref(), &route, "Posts").await
        }
        Command::Keyword(args) => {
            let heading = format!("Keyword: {}", args.keyword);
            let route = InitialRoute::Keyword {
                keyword: args.keyword,
            };
            run_listing(feed.as_ref(), &route, &heading).await
        }
        Command::Search => run_search(feed, SearchOptions::from(&settings.search)).await,
    }
}

async fn run_listing(
    feed: &dyn PostFeed,
    route: &InitialRoute,
    heading: &str,
) -> Result<(), AppError> {
    let page = routes::resolve(feed, route).await?;
    print_listing(heading, &ViewState::from_page(page))
}

async fn run_search(feed: Arc<dyn PostFeed>, options: SearchOptions) -> Result<(), AppError> {
    let initial = routes::resolve(feed.as_ref(), &InitialRoute::default()).await?;
    let (controller, mut failures) = PostListController::new(feed, initial, options);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut last_query = None;
    while let Some(line) = lines.next_line().await.map_err(InfraError::from)? {
        debug!(query = %line, "Search input");
        controller.search(line.clone());
        last_query = Some(line);
    }

    controller.settle().await;

    let mut last_failure = None;
    while let Ok(failure) = failures.try_recv() {
        warn!(error = %failure, "Search request failed");
        last_failure = Some(failure);
    }
    if let Some(failure) = last_failure {
        return Err(failure.into());
    }

    let heading = match last_query {
        Some(query) => format!("Search: {query}"),
        None => "Posts".to_string(),
    };
    print_listing(&heading, &controller.state())
}

fn print_listing(heading: &str, state: &ViewState) -> Result<(), AppError> {
    let text = render_listing(heading, state)?;
    println!("{}", text.trim_end());
    Ok(())
}

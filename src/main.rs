use std::{path::Path, process, sync::Arc};

use atelier::{
    application::{
        error::AppError,
        render::{PortableTextRenderer, RenderOptions, RenderService},
        repos::ContentRepo,
        site::SiteBuilder,
        syndication::FeedChannel,
    },
    config::{self, Command, FeedArgs, RenderArgs, Settings},
    domain::portable_text::RichDocument,
    infra::{
        error::InfraError,
        sanity::{SanityClient, SanityFileUrlResolver, SanityImageUrlBuilder, SanityRepository},
        telemetry,
    },
};
use serde_json::Value;
use time::OffsetDateTime;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::{Dispatch, Level, dispatcher, error, info};
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
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt()
        .with_writer(std::io::stderr)
        .with_max_level(Level::ERROR)
        .finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    telemetry::init(&settings.logging)?;

    match cli_args.command {
        Command::Render(args) => run_render(&settings, args).await,
        Command::Build(_) => run_build(&settings).await,
        Command::Feed(args) => run_feed(&settings, args).await,
    }
}

async fn run_render(settings: &Settings, args: RenderArgs) -> Result<(), AppError> {
    let output = match args.slug {
        Some(slug) => build_site(settings)?
            .render_post(&slug)
            .await?
            .ok_or_else(|| AppError::not_found(format!("post `{slug}`")))?,
        None => {
            let input = read_input(args.file.as_deref()).await?;
            let value: Value = serde_json::from_str(&input)
                .map_err(|err| AppError::validation(format!("input is not valid JSON: {err}")))?;
            let document = RichDocument::from_json(body_of(value));
            build_renderer(settings).render_output(&document)
        }
    };

    info!(
        target = "atelier::render",
        images = output.metrics.images_count,
        images_missing_alt = output.metrics.images_missing_alt,
        videos = output.metrics.videos_count,
        galleries = output.metrics.galleries_count,
        skipped_blocks = output.metrics.skipped_blocks,
        "rendered document"
    );

    write_stdout(&output.html).await
}

async fn run_build(settings: &Settings) -> Result<(), AppError> {
    let output_dir = &settings.build.output_dir;
    info!(
        target = "atelier::build",
        output = %output_dir.display(),
        "Starting site build"
    );

    build_site(settings)?
        .build(output_dir, OffsetDateTime::now_utc())
        .await?;
    Ok(())
}

async fn run_feed(settings: &Settings, args: FeedArgs) -> Result<(), AppError> {
    let feed = build_site(settings)?.feed(OffsetDateTime::now_utc()).await;

    match args.output {
        Some(path) => {
            tokio::fs::write(&path, feed.as_bytes())
                .await
                .map_err(InfraError::from)?;
            info!(
                target = "atelier::feed",
                path = %path.display(),
                "Feed written"
            );
            Ok(())
        }
        None => write_stdout(&feed).await,
    }
}

fn build_renderer(settings: &Settings) -> Arc<PortableTextRenderer> {
    Arc::new(PortableTextRenderer::new(
        Arc::new(SanityImageUrlBuilder::new(&settings.sanity)),
        Arc::new(SanityFileUrlResolver::new(&settings.sanity)),
        RenderOptions::new(settings.site.domain.clone()),
    ))
}

fn build_site(settings: &Settings) -> Result<SiteBuilder, AppError> {
    let client = SanityClient::new(&settings.sanity)?;
    let repo: Arc<dyn ContentRepo> = Arc::new(SanityRepository::new(client));
    let channel = FeedChannel {
        title: settings.site.title.clone(),
        description: settings.site.description.clone(),
        site_url: settings.site.url.to_string(),
        language: settings.site.language.clone(),
    };
    Ok(SiteBuilder::new(repo, build_renderer(settings), channel))
}

/// Accept either a bare block array or a whole document carrying `body`.
fn body_of(value: Value) -> Value {
    match value {
        Value::Object(mut document) => document.remove("body").unwrap_or(Value::Null),
        other => other,
    }
}

async fn read_input(path: Option<&Path>) -> Result<String, AppError> {
    let input = match path {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .map_err(InfraError::from)?,
        None => {
            let mut buffer = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buffer)
                .await
                .map_err(InfraError::from)?;
            buffer
        }
    };
    Ok(input)
}

async fn write_stdout(contents: &str) -> Result<(), AppError> {
    let mut stdout = tokio::io::stdout();
    stdout
        .write_all(contents.as_bytes())
        .await
        .map_err(InfraError::from)?;
    stdout.flush().await.map_err(InfraError::from)?;
    Ok(())
}

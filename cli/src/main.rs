//! CLI entrypoint for school-tutor
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;
use tutor_application::{DispatchQueryUseCase, QueryInput, RunOrchestrationUseCase};
use tutor_infrastructure::config::{FileLoggingConfig, FileServerConfig};
use tutor_infrastructure::tools::web::http_client;
use tutor_infrastructure::{
    ConfigLoader, FileConfig, FileToolsConfig, LocalToolExecutor, OpenAiSchemaToolConverter,
    NewsSearchTool, OpenRouterGateway, StaticSchoolContext, WebSearchTool, WikipediaTool,
};
use tutor_presentation::{ApiError, AppState, Cli, Command, QueryResponseDto, router};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("Failed to load configuration")?
    };

    if cli.show_config {
        return show_config(&cli, &config);
    }

    let _log_guard = init_logging(cli.verbose, &config.logging)?;

    let problems = config.validate();
    if !problems.is_empty() {
        for problem in &problems {
            eprintln!("config error: {}", problem);
        }
        bail!("Invalid configuration ({} problem(s))", problems.len());
    }

    // === Dependency Injection ===
    let dispatcher = Arc::new(build_dispatcher(&config)?);

    match cli.command {
        Some(Command::Ask {
            question,
            model,
            platform,
            school_id,
            phone,
        }) => {
            let mut input = QueryInput::new(phone, question).with_platform(platform);
            if let Some(model) = model {
                input = input.with_model(model);
            }
            if let Some(school_id) = school_id {
                input = input.with_school_id(school_id);
            }
            ask(&dispatcher, input).await
        }
        Some(Command::Serve { host, port }) => serve(dispatcher, &config.server, host, port).await,
        None => serve(dispatcher, &config.server, None, None).await,
    }
}

/// Stderr logging filtered by `-v` (or `RUST_LOG`), plus an optional daily
/// rolling file. The returned guard flushes the file writer on drop.
fn init_logging(verbose: u8, logging: &FileLoggingConfig) -> Result<Option<WorkerGuard>> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let (file_layer, guard) = match &logging.dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
            let appender = tracing_appender::rolling::daily(dir, &logging.file_prefix);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(guard)
}

fn show_config(cli: &Cli, config: &FileConfig) -> Result<()> {
    println!("Configuration sources:");
    if cli.no_config {
        println!("  (--no-config: built-in defaults only)");
    } else {
        for source in ConfigLoader::config_sources(cli.config.as_ref()) {
            println!("  {}", source);
        }
    }

    let mut shown = config.clone();
    if shown.provider.api_key.is_some() {
        shown.provider.api_key = Some("<redacted>".to_string());
    }
    println!();
    println!("{}", toml::to_string_pretty(&shown)?);
    Ok(())
}

fn build_tool_executor(tools: &FileToolsConfig) -> Result<LocalToolExecutor> {
    let mut executor = LocalToolExecutor::new(tools.tool_settings());
    if !tools.any_enabled() {
        warn!("All tools are disabled; only online model variants can ground answers");
        return Ok(executor);
    }

    let client = http_client(&tools.user_agent)?;
    if tools.web_search.enabled {
        executor = executor.with_handler(Arc::new(WebSearchTool::new(
            client.clone(),
            tools.web_search.endpoint.as_str(),
        )));
    }
    if tools.news.enabled {
        executor = executor.with_handler(Arc::new(NewsSearchTool::new(
            client.clone(),
            tools.web_search.endpoint.as_str(),
            tools.news.max_results,
        )));
    }
    if tools.wikipedia.enabled {
        executor = executor.with_handler(Arc::new(WikipediaTool::new(
            client,
            tools.wikipedia.language.as_str(),
            tools.wikipedia.max_results,
        )));
    }
    Ok(executor.with_default_aliases())
}

fn build_dispatcher(config: &FileConfig) -> Result<DispatchQueryUseCase> {
    let registry = config.models.to_registry()?;
    let gateway = OpenRouterGateway::new(&config.provider)?;
    let tools = build_tool_executor(&config.tools)?;
    let grounding = config.grounding.build_policy();

    info!(
        "Default model {} ({} models), grounding policy: {}",
        registry.default_model(),
        registry.entries().count(),
        grounding.name()
    );

    let orchestration = RunOrchestrationUseCase::new(
        Arc::new(gateway),
        Arc::new(tools),
        Arc::new(OpenAiSchemaToolConverter),
        Arc::new(registry),
        Arc::from(grounding),
    );
    let schools = StaticSchoolContext::from_config(&config.schools);

    Ok(DispatchQueryUseCase::new(
        orchestration,
        Arc::new(schools),
        config.execution.to_execution_params(),
    ))
}

async fn serve(
    dispatcher: Arc<DispatchQueryUseCase>,
    server: &FileServerConfig,
    host: Option<String>,
    port: Option<u16>,
) -> Result<()> {
    let address = format!(
        "{}:{}",
        host.as_deref().unwrap_or(&server.host),
        port.unwrap_or(server.port)
    );

    let shutdown = CancellationToken::new();
    let app = router(AppState::new(dispatcher).with_shutdown(shutdown.clone()));

    let listener = tokio::net::TcpListener::bind(address.as_str())
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    info!("Listening on {}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Shutting down");
            }
            shutdown.cancel();
        })
        .await?;
    Ok(())
}

async fn ask(dispatcher: &DispatchQueryUseCase, input: QueryInput) -> Result<()> {
    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    match dispatcher.execute(input, &cancel).await {
        Ok(response) => {
            let dto = QueryResponseDto::from(response);
            println!("{}", serde_json::to_string_pretty(&dto)?);
            Ok(())
        }
        Err(e) => {
            let error = ApiError(e);
            println!("{}", serde_json::to_string_pretty(&error.body())?);
            bail!("{}", error.0)
        }
    }
}

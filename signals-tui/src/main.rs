mod brands;
mod cli;
mod dashboard;
mod error;
mod interactive;
mod keys;
mod logging;
mod paths;

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use log::{error, info, warn};
use signals_lib::boundary::{BoundaryConfig, ErrorBoundary};
use signals_lib::error::{Error, ErrorHandler, ErrorHandlerConfig, LogSink};
use signals_lib::retry::Retry;
use tokio::sync::Notify;

use brands::BrandSource;
use cli::Args;
use dashboard::Status;
use error::AppError;
use interactive::Session;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = logging::init(args.log_level) {
        eprintln!("warning: file logging disabled: {}", e);
    }
    info!("Starting signals");

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), AppError> {
    let data = args
        .data
        .clone()
        .or_else(|| paths::brands_file().filter(|p| p.exists()));
    let source = Arc::new(BrandSource::new(data).fail_first(args.fail_first));

    let handler = ErrorHandler::new(ErrorHandlerConfig::default().report_errors(true))
        .with_sink(LogSink);

    let mut retry = Retry::<Error>::new(args.retry_config()).retry_if(Error::is_retryable);
    if !args.interactive {
        retry = retry.on_retry(|attempt, e| eprintln!("load attempt {} failed: {}", attempt, e));
    }
    let load = retry.run(move || {
        let source = source.clone();
        async move { source.fetch().await }
    });

    let redraw = Arc::new(Notify::new());
    let reset_signal = redraw.clone();
    let boundary_handler = handler.clone();
    let boundary = ErrorBoundary::new(
        BoundaryConfig::named("brands")
            .reset_on_props_change(true)
            .retry(args.retry_config()),
    )
    .on_error(move |fault, context| {
        boundary_handler.handle_error(fault.message.as_str(), Some(context.boundary.as_str()));
    })
    .on_reset(move || reset_signal.notify_one());

    let status = Status::default();
    let mut table = dashboard::build_table(args.selectable, &status);
    if let Some(column) = &args.sort {
        dashboard::apply_sort(&mut table, column, args.desc)?;
    }
    boundary.update_props(table.sort_state());

    if args.interactive {
        let session = Session {
            table: &mut table,
            boundary: &boundary,
            handler: &handler,
            status: &status,
            redraw,
        };
        return interactive::run(session, load).await;
    }

    match load.await {
        Ok(brands) => table.set_data(brands),
        Err(e) => {
            handler.handle_error(e.to_string(), Some("load"));
            return Err(AppError::Load(e.to_string()));
        }
    }
    table.set_loading(false);

    print!("{}", dashboard::render(&boundary, &table));
    if boundary.is_faulted() {
        warn!("brand table could not be rendered");
    }
    Ok(())
}

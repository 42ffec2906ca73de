//! Petfinder dashboard - entry point

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use petboard::{Config, DashboardScreen, DashboardView, DetailScreen, DetailView, Session};
use petboard_core::{PetfinderClient, Route, TypeFilter, ViewState};
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Browse adoptable animals from the Petfinder API
#[derive(Parser, Debug)]
#[command(name = "petboard", version)]
struct Args {
    /// Route to open: `/` for the dashboard or `/pet/<id>` for one animal
    #[arg(default_value = "/")]
    route: String,

    /// Only list animals whose name, description, or breed contains this text
    #[arg(short, long, default_value = "")]
    search: String,

    /// Only list animals of this type (`all` for every type)
    #[arg(short = 't', long = "type", default_value = "all")]
    type_filter: String,

    /// Override the API root (defaults to PETFINDER_BASE_URL or production)
    #[arg(long)]
    base_url: Option<String>,

    /// Log HTTP traffic at debug level
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let args = Args::parse();
    petboard::logging::init(args.verbose)?;

    let mut config = Config::load()?;
    if let Some(base_url) = &args.base_url {
        config = config.with_base_url(base_url)?;
    }
    info!(base_url = %config.base_url, "starting");

    let session = Arc::new(Session::connect(PetfinderClient::new(&config.base_url), config.credentials));

    let failed = match Route::parse(&args.route) {
        Route::Dashboard => {
            let mut view = DashboardView::mount(Arc::clone(&session), CancellationToken::new());
            view.wait();
            view.set_search(args.search);
            view.set_type_filter(TypeFilter::parse(&args.type_filter));
            print!("{}", DashboardScreen(view.state()));
            matches!(view.state(), ViewState::Error(_))
        }
        Route::PetDetail { id } => {
            let mut view = DetailView::mount(Arc::clone(&session), id, CancellationToken::new());
            view.wait();
            print!("{}", DetailScreen(view.state()));
            matches!(view.state(), ViewState::Error(_))
        }
        Route::NotFound => {
            eprintln!("no such page: {}", args.route);
            true
        }
    };

    Ok(if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}

use std::{
    io::{self, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::PdfServiceClient;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod controller;
mod ui;

use commands::{parse_command, Command, HELP};
use config::{load_settings, DEFAULT_CONFIG_FILE};
use controller::ClientController;
use ui::{
    prompt::StdinPrompt,
    view::{HtmlPageSurface, Surface, Surfaces, TerminalSurface},
};

/// Terminal front end for the PDF outline and persona analysis service.
#[derive(Parser, Debug)]
#[command(name = "pdf-console", version)]
struct Args {
    /// Any URL served by the analysis service; requests go to its origin.
    #[arg(long)]
    server_url: Option<String>,
    /// Directory that receives the rendered `index.html`.
    #[arg(long)]
    output_dir: Option<PathBuf>,
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    let settings = load_settings(&args.config).with_overrides(args.server_url, args.output_dir);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let backend = PdfServiceClient::new(&settings.server_url)
        .with_context(|| format!("invalid server url '{}'", settings.server_url))?;
    let page = HtmlPageSurface::create(&settings.output_dir, settings.page_title.clone())?;
    info!(
        base_url = backend.base_url(),
        page = %page.page_path().display(),
        "pdf console ready"
    );
    println!("Rendering results into {}", page.page_path().display());
    println!("{HELP}");

    let surfaces: Vec<Box<dyn Surface + Send>> =
        vec![Box::new(page), Box::new(TerminalSurface::stdout())];
    let surface = Surfaces(surfaces);
    let mut controller = ClientController::new(backend, StdinPrompt, Box::new(surface));

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        io::stdout().flush()?;
        line.clear();
        if stdin.read_line(&mut line).context("failed to read command")? == 0 {
            break;
        }

        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                println!("{err}");
                continue;
            }
        };
        match command {
            Command::Quit => break,
            Command::Help => println!("{HELP}"),
            Command::State => println!("{:#?}", controller.state()),
            command => match command.into_actions() {
                Ok(actions) => {
                    for action in actions {
                        controller.dispatch(action).await;
                    }
                }
                Err(err) => println!("{err:#}"),
            },
        }
    }

    info!("pdf console exiting");
    Ok(())
}

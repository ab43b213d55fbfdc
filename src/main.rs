//! DataGrid - Command-line Entry Point
//!
//! Loads a grid configuration, renders one page and prints the snapshot as JSON.
//!
//! Usage: `datagrid <config.toml|config.json> [page] [--sort col]... [--filter col=keyword]...`

use std::path::PathBuf;
use std::process::ExitCode;

use datagrid::services::block_on;
use datagrid::{Error, GridConfig, GridController, Result};

#[derive(Debug, Default, PartialEq)]
struct CliArgs {
    config: PathBuf,
    page: Option<usize>,
    sorts: Vec<String>,
    filters: Vec<(String, String)>,
}

fn usage_error(message: impl Into<String>) -> Error {
    Error::configuration(format!(
        "{}\nusage: datagrid <config> [page] [--sort column]... [--filter column=keyword]...",
        message.into()
    ))
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<CliArgs> {
    let mut args = args.into_iter();
    let mut cli = CliArgs::default();
    let mut config = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--sort" => {
                let column = args.next().ok_or_else(|| usage_error("--sort needs a column"))?;
                cli.sorts.push(column);
            }
            "--filter" => {
                let pair = args
                    .next()
                    .ok_or_else(|| usage_error("--filter needs column=keyword"))?;
                let (column, keyword) = pair
                    .split_once('=')
                    .ok_or_else(|| usage_error(format!("invalid filter `{pair}`")))?;
                cli.filters.push((column.to_string(), keyword.to_string()));
            }
            _ if config.is_none() => config = Some(PathBuf::from(&arg)),
            _ if cli.page.is_none() => {
                let page = arg
                    .parse()
                    .map_err(|_| usage_error(format!("invalid page `{arg}`")))?;
                cli.page = Some(page);
            }
            _ => return Err(usage_error(format!("unexpected argument `{arg}`"))),
        }
    }

    cli.config = config.ok_or_else(|| usage_error("missing config path"))?;
    Ok(cli)
}

fn run(cli: CliArgs) -> Result<String> {
    let config = GridConfig::load(&cli.config)?;
    let mut grid = GridController::new(config, None)?;

    block_on(async {
        grid.render().await?;
        for (column, keyword) in &cli.filters {
            grid.change_filter(column.as_str(), keyword.as_str()).await?;
        }
        for column in &cli.sorts {
            grid.change_sort(column).await?;
        }
        if let Some(page) = cli.page {
            grid.change_page(page).await?;
        }
        Ok::<_, Error>(())
    })?;

    Ok(serde_json::to_string_pretty(&grid.snapshot())?)
}

fn main() -> ExitCode {
    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = parse_args(std::env::args().skip(1)).and_then(run);
    match result {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

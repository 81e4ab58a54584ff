use clap::Parser;
use owo_colors::{OwoColorize, Stream};
use tracing_subscriber::EnvFilter;

use crate::{
    cli::{Cli, Command},
    config::Config,
    convert::{RunOptions, Summary},
    files::FileState,
    identifier::info_uri,
    translator::{Translator, auth::Session, uri_api::UriApi},
};

mod citation;
mod cli;
mod config;
mod convert;
mod dates;
mod error;
mod files;
mod identifier;
mod timestamp;
mod translator;

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("crossref_citations=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();
    match args.command {
        Command::Dates { range } => {
            for day in range.range()? {
                println!("{day}");
            }
        }
        Command::Plan { range, output } => {
            for day in convert::plan(range.range()?, &output.out_dir, &output.extension) {
                let status = match day.state {
                    FileState::Usable => "cached".to_string(),
                    FileState::Empty | FileState::Missing => "pending".to_string(),
                    FileState::Inaccessible(kind) => format!("pending ({kind})"),
                };
                println!("{}\t{status}", day.output.display());
            }
        }
        Command::Timestamp { year, file_date } => {
            println!("{}", timestamp::reconcile(&year, &file_date)?);
        }
        Command::Uri { doi } => println!("{}", info_uri(&doi)),
        Command::Convert {
            input,
            output,
            offline,
        } => {
            let (path, summary) = with_translator(offline, |translator| {
                convert::convert_file(&input, &output.out_dir, &output.extension, translator)
            })?;
            println!("{}", path.display());
            report(&summary);
        }
        Command::Run {
            range,
            in_dir,
            output,
            offline,
            force,
        } => {
            let range = range.range()?;
            let opts = RunOptions {
                in_dir: &in_dir,
                out_dir: &output.out_dir,
                extension: &output.extension,
                force,
            };
            let summary =
                with_translator(offline, |translator| convert::run(range, &opts, translator))?;
            report(&summary);
        }
    }
    Ok(())
}

/// Log in once and hand the translation client to `f`, or hand it nothing when offline.
fn with_translator<T>(
    offline: bool,
    f: impl FnOnce(Option<&dyn Translator>) -> anyhow::Result<T>,
) -> anyhow::Result<T> {
    if offline {
        return f(None);
    }
    let config = Config::from_env()?;
    let agent = translator::agent();
    let session = Session::establish(&agent, &config)?;
    let api = UriApi::new(agent, &config, &session);
    f(Some(&api))
}

fn report(summary: &Summary) {
    eprintln!(
        "{} {} {} {} ({} rows)",
        "✓".if_supports_color(Stream::Stderr, |t| t.green()),
        summary.resolved,
        "✗".if_supports_color(Stream::Stderr, |t| t.red()),
        summary.unresolved,
        summary.rows
    );
}

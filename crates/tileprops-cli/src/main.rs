use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use serde::Serialize;
use tileprops_document::{documents_from_json, documents_from_path, DocumentRecord};
use tileprops_flatten::{FlattenConfig, PropertyFlattener};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("tileprops")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Flatten search hits into vector tile feature properties")
        .subcommand_required(true)
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON on stderr"),
        )
        .subcommand(
            Command::new("flatten")
                .about("Flatten a search response, a hit array, or a single hit")
                .arg(
                    Arg::new("input")
                        .long("input")
                        .short('i')
                        .value_parser(value_parser!(PathBuf))
                        .help("Input JSON file (stdin when omitted)"),
                )
                .arg(
                    Arg::new("geometry-field")
                        .long("geometry-field")
                        .short('g')
                        .help("Dotted path of the geometry field"),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .short('c')
                        .value_parser(value_parser!(PathBuf))
                        .help("Flattener config (toml, yaml or json)"),
                )
                .arg(
                    Arg::new("features")
                        .long("features")
                        .action(ArgAction::SetTrue)
                        .help("Emit GeoJSON features instead of bare properties"),
                )
                .arg(
                    Arg::new("pretty")
                        .long("pretty")
                        .action(ArgAction::SetTrue)
                        .help("Emit one pretty-printed document instead of JSON lines"),
                ),
        )
        .subcommand(
            Command::new("check-config")
                .about("Validate a config file and print the effective settings")
                .arg(
                    Arg::new("file")
                        .required(true)
                        .value_parser(value_parser!(PathBuf)),
                ),
        )
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Settings for one `flatten` run
#[derive(Debug, Clone, PartialEq)]
struct FlattenArgs {
    input: Option<PathBuf>,
    config: FlattenConfig,
    features: bool,
    pretty: bool,
}

impl FlattenArgs {
    fn from_matches(args: &ArgMatches) -> Result<Self> {
        let mut config = match args.get_one::<PathBuf>("config") {
            Some(path) => FlattenConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => FlattenConfig::default(),
        };

        // Flags override the file.
        if let Some(field) = args.get_one::<String>("geometry-field") {
            config.geometry_field.clone_from(field);
        }

        Ok(Self {
            input: args.get_one::<PathBuf>("input").cloned(),
            config,
            features: args.get_flag("features"),
            pretty: args.get_flag("pretty"),
        })
    }
}

fn read_input(path: Option<&Path>) -> Result<Vec<DocumentRecord>> {
    let Some(path) = path else {
        let mut json = String::new();
        io::stdin()
            .read_to_string(&mut json)
            .context("reading stdin")?;
        return documents_from_json(&json).context("parsing documents from stdin");
    };

    documents_from_path(path).with_context(|| format!("reading documents from {}", path.display()))
}

fn write_lines<T: Serialize>(out: &mut impl Write, items: impl IntoIterator<Item = T>) -> Result<()> {
    for item in items {
        serde_json::to_writer(&mut *out, &item)?;
        out.write_all(b"\n")?;
    }
    Ok(())
}

fn run_flatten(args: &FlattenArgs, documents: &[DocumentRecord], out: &mut impl Write) -> Result<()> {
    let flattener = PropertyFlattener::from_config(&args.config);
    info!(
        documents = documents.len(),
        geometry_field = %flattener.geometry(),
        features = args.features,
        "flattening"
    );

    match (args.features, args.pretty) {
        (true, true) => {
            let collection = flattener.to_feature_collection(documents);
            serde_json::to_writer_pretty(&mut *out, &collection)?;
            out.write_all(b"\n")?;
        }
        (true, false) => write_lines(&mut *out, flattener.to_feature_collection(documents).features)?,
        (false, true) => {
            serde_json::to_writer_pretty(&mut *out, &flattener.flatten_all(documents))?;
            out.write_all(b"\n")?;
        }
        (false, false) => write_lines(&mut *out, flattener.flatten_all(documents))?,
    }

    out.flush()?;
    Ok(())
}

fn run_check_config(path: &Path, out: &mut impl Write) -> Result<()> {
    let config = FlattenConfig::load(path).with_context(|| format!("loading config {}", path.display()))?;
    serde_json::to_writer_pretty(&mut *out, &config)?;
    out.write_all(b"\n")?;
    Ok(())
}

fn main() -> Result<()> {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("log-json"));

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    match matches.subcommand() {
        Some(("flatten", args)) => {
            let args = FlattenArgs::from_matches(args)?;
            let documents = read_input(args.input.as_deref())?;
            run_flatten(&args, &documents, &mut out)
        }
        Some(("check-config", args)) => {
            let path = args
                .get_one::<PathBuf>("file")
                .context("missing config file argument")?;
            run_check_config(path, &mut out)
        }
        _ => {
            cli().print_help()?;
            Ok(())
        }
    }
}

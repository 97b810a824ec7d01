use hierpack::render::HeadlessPacker;
use hierpack::{ColumnMapping, FocusChange, HierpackConfig, Row};
use serde::Serialize;
use std::io::Read;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "HIERPACK_LOG";

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Hierpack(hierpack::Error),
    Headless(hierpack::render::HeadlessError),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Hierpack(err) => write!(f, "{err}"),
            CliError::Headless(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<hierpack::Error> for CliError {
    fn from(value: hierpack::Error) -> Self {
        Self::Hierpack(value)
    }
}

impl From<hierpack::render::HeadlessError> for CliError {
    fn from(value: hierpack::render::HeadlessError) -> Self {
        Self::Headless(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Tree,
    Layout,
    Search,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    pretty: bool,
    config: Option<String>,
    width: f64,
    height: f64,
    padding: Option<f64>,
    focus: Option<String>,
    query: Option<String>,
    limit: Option<usize>,
    weight_column: Option<String>,
    name_column: Option<String>,
    level_columns: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchOut<'a> {
    query: &'a str,
    results: Vec<&'a hierpack::SearchRecord>,
}

fn usage() -> &'static str {
    "hierpack-cli\n\
\n\
USAGE:\n\
  hierpack-cli [tree] [--pretty] [--config <path>] [COLUMNS] [<path>|-]\n\
  hierpack-cli layout [--pretty] [--config <path>] [--width <w>] [--height <h>] [--padding <p>] [--focus <path-key>] [COLUMNS] [<path>|-]\n\
  hierpack-cli search --query <q> [--limit <n>] [--pretty] [--config <path>] [COLUMNS] [<path>|-]\n\
\n\
COLUMNS:\n\
  --level-columns <a,b,...> [--weight-column <name>] [--name-column <name>]\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', input is read from stdin.\n\
  - Input is a JSON array of rows ({\"weight\", \"descriptiveName\", \"levels\"}).\n\
  - With --level-columns, input is a JSON array of records keyed by column name instead.\n\
  - --config merges a JSON document onto the built-in defaults.\n\
  - Logging goes to stderr; set HIERPACK_LOG (e.g. debug) to change the filter.\n\
"
}

fn next_value<'a>(it: &mut impl Iterator<Item = &'a String>) -> Result<&'a String, CliError> {
    it.next().ok_or(CliError::Usage(usage()))
}

fn parse_number<T: std::str::FromStr>(raw: &str) -> Result<T, CliError> {
    raw.trim().parse::<T>().map_err(|_| CliError::Usage(usage()))
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args {
        command: Command::Tree,
        width: 800.0,
        height: 600.0,
        ..Default::default()
    };

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "tree" => args.command = Command::Tree,
            "layout" => args.command = Command::Layout,
            "search" => args.command = Command::Search,
            "--pretty" => args.pretty = true,
            "--config" => args.config = Some(next_value(&mut it)?.clone()),
            "--width" => args.width = parse_number(next_value(&mut it)?)?,
            "--height" => args.height = parse_number(next_value(&mut it)?)?,
            "--padding" => {
                let padding: f64 = parse_number(next_value(&mut it)?)?;
                if !(padding.is_finite() && padding >= 0.0) {
                    return Err(CliError::Usage(usage()));
                }
                args.padding = Some(padding);
            }
            "--focus" => args.focus = Some(next_value(&mut it)?.clone()),
            "--query" => args.query = Some(next_value(&mut it)?.clone()),
            "--limit" => args.limit = Some(parse_number(next_value(&mut it)?)?),
            "--weight-column" => args.weight_column = Some(next_value(&mut it)?.clone()),
            "--name-column" => args.name_column = Some(next_value(&mut it)?.clone()),
            "--level-columns" => {
                args.level_columns = next_value(&mut it)?
                    .split(',')
                    .map(|c| c.trim().to_string())
                    .filter(|c| !c.is_empty())
                    .collect();
            }
            "--" => {
                if let Some(rest) = it.next() {
                    if args.input.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    args.input = Some(rest.clone());
                }
                if it.next().is_some() {
                    return Err(CliError::Usage(usage()));
                }
            }
            other if other.starts_with('-') && other != "-" => {
                return Err(CliError::Usage(usage()));
            }
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    if matches!(args.command, Command::Search) && args.query.is_none() {
        return Err(CliError::Usage(usage()));
    }
    if args.level_columns.is_empty()
        && (args.weight_column.is_some() || args.name_column.is_some())
    {
        return Err(CliError::Usage(usage()));
    }

    Ok(args)
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(std::io::stdout().lock(), value)?;
    } else {
        serde_json::to_writer(std::io::stdout().lock(), value)?;
    }
    println!();
    Ok(())
}

fn load_config(args: &Args) -> Result<HierpackConfig, CliError> {
    let mut cfg = match args.config.as_deref() {
        Some(path) => HierpackConfig::from_json_str(&std::fs::read_to_string(path)?)?,
        None => HierpackConfig::defaults(),
    };
    if let Some(padding) = args.padding {
        cfg.set_value("pack.padding", serde_json::json!(padding));
    }
    if let Some(limit) = args.limit {
        cfg.set_value("search.limit", serde_json::json!(limit));
    }
    Ok(cfg)
}

fn load_rows(args: &Args, text: &str) -> Result<Vec<Row>, CliError> {
    if args.level_columns.is_empty() {
        return Ok(serde_json::from_str(text)?);
    }
    let mapping = ColumnMapping {
        weight: args
            .weight_column
            .clone()
            .unwrap_or_else(|| "weight".to_string()),
        descriptive_name: args.name_column.clone(),
        levels: args.level_columns.clone(),
    };
    Ok(hierpack::rows_from_json_records(text, &mapping)?)
}

fn run(args: Args) -> Result<(), CliError> {
    let config = load_config(&args)?;
    let text = read_input(args.input.as_deref())?;
    let rows = load_rows(&args, &text)?;
    tracing::debug!(rows = rows.len(), "loaded rows");

    let mut packer = HeadlessPacker::from_rows(&rows, &config)?;

    match args.command {
        Command::Tree => write_json(packer.hierarchy().root(), args.pretty),
        Command::Layout => {
            if let Some(key) = args.focus.as_deref() {
                if packer.focus_key(key) == FocusChange::Unchanged {
                    tracing::info!(path_key = key, "focus target unknown or childless; using root");
                }
            }
            write_json(&packer.view(args.width, args.height), args.pretty)
        }
        Command::Search => {
            let query = args.query.as_deref().unwrap_or_default();
            let out = SearchOut {
                query,
                results: packer.search(query),
            };
            write_json(&out, args.pretty)
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    init_tracing();

    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

use journey_map_core::{
    GraphConfig, JourneyGraph, RenderOptions, SubjourneyRegistry, collect_options,
    journey_map_from_json_str, subjourney_registry_from_json_str,
};
use serde::Serialize;
use std::io::Read;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    JourneyMap(journey_map_core::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::JourneyMap(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<journey_map_core::Error> for CliError {
    fn from(value: journey_map_core::Error) -> Self {
        Self::JourneyMap(value)
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
    Render,
    Options,
    Normalize,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    nested: Option<String>,
    config: Option<String>,
    options: RenderOptions,
    pretty: bool,
    out: Option<String>,
}

fn usage() -> &'static str {
    "journey-map-cli\n\
\n\
USAGE:\n\
  journey-map-cli [render] [--nested <path>] [--config <path>] [--disabled <cri>]... [--flag <flag>]... [--include-errors] [--include-failures] [--expand-nested] [--only-orphans] [--query <qs>] [--out <path>] [<path>|-]\n\
  journey-map-cli options [--pretty] [--out <path>] [<path>|-]\n\
  journey-map-cli normalize [--nested <path>] [--expand-nested] [--pretty] [--out <path>] [<path>|-]\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', the journey map JSON is read from stdin.\n\
  - render prints a Mermaid flowchart; options prints the disabled/feature-flag keys as JSON;\n\
    normalize prints the expanded journey map as JSON.\n\
  - --query accepts viewer form parameters, e.g. 'disabledCri=dcmaw&flag=x&includeErrors'.\n\
  - --config reads root/error/failure state lists from JSON, or YAML for .yaml/.yml files.\n\
  - Warnings about the journey map go to stderr; set RUST_LOG to adjust verbosity.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1).peekable();
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "render" => args.command = Command::Render,
            "options" => args.command = Command::Options,
            "normalize" => args.command = Command::Normalize,
            "--pretty" => args.pretty = true,
            "--include-errors" => args.options.include_errors = true,
            "--include-failures" => args.options.include_failures = true,
            "--expand-nested" => args.options.expand_nested_journeys = true,
            "--only-orphans" => args.options.only_orphan_states = true,
            "--disabled" | "--disabled-cri" => {
                let Some(key) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.options.disabled.insert(key.clone());
            }
            "--flag" => {
                let Some(key) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.options.feature_flags.insert(key.clone());
            }
            "--query" => {
                let Some(query) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.options.merge_query(query);
            }
            "--nested" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.nested = Some(path.clone());
            }
            "--config" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.config = Some(path.clone());
            }
            "--out" => {
                let Some(out) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.out = Some(out.clone());
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
            "-" => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some("-".to_string());
            }
            other if other.starts_with('-') => return Err(CliError::Usage(usage())),
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
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

fn load_registry(path: Option<&str>) -> Result<SubjourneyRegistry, CliError> {
    let Some(path) = path else {
        return Ok(SubjourneyRegistry::new());
    };
    let text = std::fs::read_to_string(path)?;
    Ok(subjourney_registry_from_json_str(&text)?)
}

fn load_config(path: Option<&str>) -> Result<GraphConfig, CliError> {
    let Some(path) = path else {
        return Ok(GraphConfig::default());
    };
    let text = std::fs::read_to_string(path)?;
    let is_yaml = std::path::Path::new(path)
        .extension()
        .is_some_and(|ext| ext == "yaml" || ext == "yml");
    if is_yaml {
        Ok(GraphConfig::from_yaml_str(&text)?)
    } else {
        Ok(GraphConfig::from_json_str(&text)?)
    }
}

fn write_text(text: &str, out: Option<&str>) -> Result<(), CliError> {
    match out {
        None => {
            print!("{text}");
            Ok(())
        }
        Some(path) => {
            std::fs::write(path, text)?;
            Ok(())
        }
    }
}

fn write_json(value: &impl Serialize, pretty: bool, out: Option<&str>) -> Result<(), CliError> {
    let mut text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    text.push('\n');
    write_text(&text, out)
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: Args) -> Result<(), CliError> {
    let journey_map = journey_map_from_json_str(&read_input(args.input.as_deref())?)?;

    match args.command {
        Command::Options => write_json(
            &collect_options(&journey_map),
            args.pretty,
            args.out.as_deref(),
        ),
        Command::Normalize => {
            let registry = load_registry(args.nested.as_deref())?;
            let normalized =
                JourneyGraph::new().normalize(&journey_map, &registry, &args.options);
            write_json(&normalized, args.pretty, args.out.as_deref())
        }
        Command::Render => {
            let registry = load_registry(args.nested.as_deref())?;
            let graph = JourneyGraph::new().with_config(load_config(args.config.as_deref())?);
            let mermaid = graph.render(&journey_map, &registry, &args.options);
            write_text(&mermaid, args.out.as_deref())
        }
    }
}

fn main() {
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

    init_tracing();

    if let Err(err) = run(args) {
        tracing::debug!(error = ?err, "journey-map-cli failed");
        eprintln!("{err}");
        std::process::exit(1);
    }
}

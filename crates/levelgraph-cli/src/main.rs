use levelgraph::{AnalysisOptions, Graph, analyze, parse};
use serde::Serialize;
use std::io::Read;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Graph(levelgraph::Error),
    Json(serde_json::Error),
    Diagnostics(usize),
    TooLarge { vertices: usize, max: usize },
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Graph(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::Diagnostics(count) => write!(f, "{count} problem(s) found"),
            CliError::TooLarge { vertices, max } => write!(
                f,
                "graph has {vertices} vertices, above the configured maxVertices of {max}"
            ),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<levelgraph::Error> for CliError {
    fn from(value: levelgraph::Error) -> Self {
        Self::Graph(value)
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
    Check,
    Analyze,
    Format,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    pretty: bool,
    order: Option<usize>,
    config: Option<String>,
    out: Option<String>,
}

fn usage() -> &'static str {
    "levelgraph\n\
\n\
USAGE:\n\
  levelgraph [check] [<path>|-]\n\
  levelgraph analyze [--order <n>] [--config <json-path>] [--pretty] [<path>|-]\n\
  levelgraph format [--out <path>] [<path>|-]\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', input is read from stdin.\n\
  - check lists every malformed line and exits 1 if there is any.\n\
  - analyze prints connectivity, Cheeger constants and the stability factor as JSON.\n\
  - format prints the canonical text form; use --out to write a file.\n\
  - Set RUST_LOG=debug to trace mutations and timings on stderr.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "check" => args.command = Command::Check,
            "analyze" => args.command = Command::Analyze,
            "format" => args.command = Command::Format,
            "--pretty" => args.pretty = true,
            "--order" => {
                let Some(order) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.order = Some(order.parse::<usize>().map_err(|_| CliError::Usage(usage()))?);
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

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(std::io::stdout().lock(), value)?;
    } else {
        serde_json::to_writer(std::io::stdout().lock(), value)?;
    }
    println!();
    Ok(())
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

fn load_options(args: &Args) -> Result<AnalysisOptions, CliError> {
    let mut options = match args.config.as_deref() {
        Some(path) => AnalysisOptions::from_json(&std::fs::read_to_string(path)?)?,
        None => AnalysisOptions::default(),
    };
    if let Some(order) = args.order {
        options = options.with_order(order);
    }
    Ok(options)
}

fn run(args: Args) -> Result<(), CliError> {
    let text = read_input(args.input.as_deref())?;
    let parsed = parse(&text);
    debug!(
        vertices = parsed.graph.vertex_count(),
        edges = parsed.graph.edge_count(),
        diagnostics = parsed.diagnostics.len(),
        "input parsed"
    );

    match args.command {
        Command::Check => {
            if parsed.diagnostics.is_empty() {
                println!(
                    "ok: {} vertices, {} edges",
                    parsed.graph.vertex_count(),
                    parsed.graph.edge_count()
                );
                return Ok(());
            }
            for diagnostic in &parsed.diagnostics {
                println!("{diagnostic}");
            }
            Err(CliError::Diagnostics(parsed.diagnostics.len()))
        }
        Command::Analyze => {
            let options = load_options(&args)?;
            let graph: &Graph = &parsed.graph;
            if !options.admits(graph.vertex_count()) {
                return Err(CliError::TooLarge {
                    vertices: graph.vertex_count(),
                    max: options.max_vertices.unwrap_or_default(),
                });
            }
            let report = analyze(graph, &options);
            write_json(&report, args.pretty)
        }
        Command::Format => write_text(&parsed.graph.to_string(), args.out.as_deref()),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

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

    match run(args) {
        Ok(()) => {}
        Err(err @ CliError::TooLarge { .. }) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}

use gvarrange_core::{ArrangeConfig, ArrangeOptions, Arranger, PreviewTarget, Theme};
use gvarrange_graph::{GraphDocument, NodeGraph};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::Read;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Arrange(gvarrange_core::Error),
    Graph(gvarrange_graph::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Arrange(err) => write!(f, "{err}"),
            CliError::Graph(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<gvarrange_core::Error> for CliError {
    fn from(value: gvarrange_core::Error) -> Self {
        Self::Arrange(value)
    }
}

impl From<gvarrange_graph::Error> for CliError {
    fn from(value: gvarrange_graph::Error) -> Self {
        Self::Graph(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl CliError {
    fn is_editor_precondition(&self) -> bool {
        matches!(
            self,
            CliError::Arrange(gvarrange_core::Error::NoEditor | gvarrange_core::Error::MultipleEditors)
        )
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Arrange,
    Dot,
    Detect,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    pretty: bool,
    out: Option<String>,
    emit_dot: Option<String>,
    preview: Option<String>,
    config: Option<String>,
    dot: Option<String>,
    node_sep: Option<f64>,
    rank_sep: Option<f64>,
    timeout_secs: Option<u64>,
}

/// What the host hands over: its theme and the open node editors.
#[derive(Debug, Serialize, Deserialize)]
struct Session {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    theme: Option<Theme>,
    #[serde(default)]
    editors: Vec<GraphDocument>,
}

fn usage() -> &'static str {
    "gvarrange-cli\n\
\n\
USAGE:\n\
  gvarrange-cli [arrange] [--preview <pdf>] [--out <path>] [--emit-dot <path>] [--pretty] [CONFIG] [<session.json>|-]\n\
  gvarrange-cli dot [--out <path>] [CONFIG] [<session.json>|-]\n\
  gvarrange-cli detect [--dot <path>]\n\
\n\
CONFIG:\n\
  --config <json>      settings object, e.g. '{\"rank_sep\": 40}'\n\
  --dot <path>         Graphviz `dot` executable (default: search PATH)\n\
  --node-sep <n>       separation between nodes of a rank\n\
  --rank-sep <n>       separation between ranks\n\
  --timeout <secs>     stop Graphviz after this many seconds\n\
\n\
NOTES:\n\
  - If <session.json> is omitted or '-', input is read from stdin.\n\
  - The session is {\"theme\": {...}, \"editors\": [graph, ...]} with exactly one editor.\n\
  - arrange prints the arranged session as JSON; use --out to write a file.\n\
  - dot prints the DOT description Graphviz would receive.\n\
  - Set GVARRANGE_LOG (e.g. 'debug') for diagnostics on stderr.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "arrange" => args.command = Command::Arrange,
            "dot" => args.command = Command::Dot,
            "detect" => args.command = Command::Detect,
            "--pretty" => args.pretty = true,
            "--out" => {
                let Some(out) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.out = Some(out.clone());
            }
            "--emit-dot" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.emit_dot = Some(path.clone());
            }
            "--preview" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.preview = Some(path.clone());
            }
            "--config" => {
                let Some(json) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.config = Some(json.clone());
            }
            "--dot" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.dot = Some(path.clone());
            }
            "--node-sep" => {
                let Some(v) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.node_sep = Some(parse_separation(v)?);
            }
            "--rank-sep" => {
                let Some(v) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.rank_sep = Some(parse_separation(v)?);
            }
            "--timeout" => {
                let Some(v) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                let secs = v.parse::<u64>().map_err(|_| CliError::Usage(usage()))?;
                if secs == 0 {
                    return Err(CliError::Usage(usage()));
                }
                args.timeout_secs = Some(secs);
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

    Ok(args)
}

fn parse_separation(raw: &str) -> Result<f64, CliError> {
    let v = raw.parse::<f64>().map_err(|_| CliError::Usage(usage()))?;
    if !(v.is_finite() && v >= 0.0) {
        return Err(CliError::Usage(usage()));
    }
    Ok(v)
}

fn build_config(args: &Args) -> Result<ArrangeConfig, CliError> {
    let mut config = ArrangeConfig::default();
    if let Some(raw) = args.config.as_deref() {
        let overrides: Value = serde_json::from_str(raw)?;
        config.merge_json(&overrides)?;
    }
    if let Some(dot) = args.dot.as_deref() {
        config.dot_path = Some(PathBuf::from(dot));
    }
    if let Some(v) = args.node_sep {
        config.node_sep = v;
    }
    if let Some(v) = args.rank_sep {
        config.rank_sep = v;
    }
    if let Some(v) = args.timeout_secs {
        config.timeout_secs = Some(v);
    }
    Ok(config)
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

fn write_json(value: &impl Serialize, pretty: bool, out: Option<&str>) -> Result<(), CliError> {
    let mut text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    text.push('\n');
    write_text(&text, out)
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

fn read_session(input: Option<&str>) -> Result<(Theme, NodeGraph), CliError> {
    let text = read_input(input)?;
    let session: Session = serde_json::from_str(&text)?;
    let editor = gvarrange_core::single_editor(session.editors)?;
    let graph = NodeGraph::from_document(&editor)?;
    Ok((session.theme.unwrap_or_default(), graph))
}

fn run(args: Args) -> Result<(), CliError> {
    let config = build_config(&args)?;
    debug!(?config, "effective configuration");

    match args.command {
        Command::Detect => {
            let dot = gvarrange_core::graphviz::locate(&config)?;
            println!("{}", dot.display());
            Ok(())
        }
        Command::Dot => {
            let (theme, graph) = read_session(args.input.as_deref())?;
            let description = Arranger::new(config, theme).describe(&graph)?;
            write_text(&description.text, args.out.as_deref())
        }
        Command::Arrange => {
            let (theme, mut graph) = read_session(args.input.as_deref())?;
            let arranger = Arranger::new(config, theme);
            let mut options = ArrangeOptions::default();
            if let Some(path) = args.preview.as_deref() {
                options = options.with_preview(PreviewTarget::Path(PathBuf::from(path)));
            }

            let report = arranger.arrange(&mut graph, &options)?;
            if let Some(path) = args.emit_dot.as_deref() {
                std::fs::write(path, &report.description)?;
            }
            if let Some(preview) = &report.preview {
                eprintln!("preview: {}", preview.display());
            }

            let session = Session {
                theme: Some(arranger.theme().clone()),
                editors: vec![graph.to_document()],
            };
            write_json(&session, args.pretty, args.out.as_deref())
        }
    }
}

fn init_logging() {
    let filter =
        EnvFilter::try_from_env("GVARRANGE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
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

    init_logging();

    match run(args) {
        Ok(()) => {}
        Err(err) if err.is_editor_precondition() => {
            eprintln!("{err}");
            std::process::exit(3);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}

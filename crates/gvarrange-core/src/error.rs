use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Graph(#[from] gvarrange_graph::Error),

    /// The layout tool could not be located. The message tells the user how to fix it.
    #[error("{0}")]
    GraphvizNotFound(&'static str),

    #[error("failed to run {}: {source}", program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}", tool_failure_message(.status, .stderr))]
    ToolFailed { status: String, stderr: String },

    #[error("Graphviz did not finish within {seconds}s and was stopped")]
    ToolTimedOut { seconds: u64 },

    #[error("layout output parse error (line {line}): {message}")]
    LayoutParse { line: usize, message: String },

    #[error("No node editor is open")]
    NoEditor,

    #[error("More than one node editor is open")]
    MultipleEditors,

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn tool_failure_message(status: &str, stderr: &str) -> String {
    if stderr.is_empty() {
        format!("Graphviz exited with {status}")
    } else {
        stderr.to_string()
    }
}

impl Error {
    pub(crate) fn layout_parse(line: usize, message: impl Into<String>) -> Self {
        Self::LayoutParse {
            line,
            message: message.into(),
        }
    }
}

//! Locating and running the Graphviz `dot` executable.

use std::ffi::OsStr;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tempfile::TempPath;
use tracing::{debug, info};

use crate::config::ArrangeConfig;
use crate::error::{Error, Result};

const NOT_FOUND_LINUX: &str =
    "Graphviz wasn't found. Please install it through your OS's package manager and try again.";
const NOT_FOUND_OTHER: &str = "Graphviz wasn't found. If it's not installed, please install it \
from http://graphviz.org/ and try again. If it is installed, you may need to specify its location \
with the `dot_path` setting.";

const POLL_INTERVAL: Duration = Duration::from_millis(10);

fn not_found_message() -> &'static str {
    if cfg!(target_os = "linux") {
        NOT_FOUND_LINUX
    } else {
        NOT_FOUND_OTHER
    }
}

fn executable_name() -> &'static str {
    if cfg!(windows) { "dot.exe" } else { "dot" }
}

/// Searches `PATH` for `dot`.
pub fn find_in_path() -> Option<PathBuf> {
    let paths = std::env::var_os("PATH")?;
    std::env::split_paths(&paths)
        .map(|dir| dir.join(executable_name()))
        .find(|candidate| candidate.is_file())
}

/// The configured `dot_path`, or the first `dot` on `PATH`.
pub fn locate(config: &ArrangeConfig) -> Result<PathBuf> {
    if let Some(path) = config
        .dot_path
        .as_ref()
        .filter(|p| !p.as_os_str().is_empty())
    {
        return Ok(path.clone());
    }
    find_in_path().ok_or(Error::GraphvizNotFound(not_found_message()))
}

/// Writes `text` to a fresh temporary file. The file is deleted when the returned path drops.
pub fn write_transient(text: &str, suffix: &str) -> Result<TempPath> {
    let mut file = tempfile::Builder::new()
        .prefix("gvarrange-")
        .suffix(suffix)
        .tempfile()?;
    file.write_all(text.as_bytes())?;
    file.flush()?;
    Ok(file.into_temp_path())
}

#[derive(Debug, Clone)]
pub struct Graphviz {
    dot: PathBuf,
    timeout: Option<Duration>,
}

impl Graphviz {
    pub fn new(dot: impl Into<PathBuf>) -> Self {
        Self {
            dot: dot.into(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn dot(&self) -> &Path {
        &self.dot
    }

    /// Runs `dot -Tplain-ext` on a DOT file and returns its stdout.
    pub fn layout(&self, description: &Path) -> Result<String> {
        let stdout = self.run(&[OsStr::new("-Tplain-ext"), description.as_os_str()])?;
        let text = String::from_utf8_lossy(&stdout).into_owned();
        debug!(target: "gvarrange::gv_output", "{text}");
        Ok(text)
    }

    /// Renders a DOT file to a PDF document at `out`.
    pub fn render_pdf(&self, description: &Path, out: &Path) -> Result<()> {
        self.run(&[
            OsStr::new("-Tpdf"),
            OsStr::new("-o"),
            out.as_os_str(),
            description.as_os_str(),
        ])?;
        Ok(())
    }

    /// Renders a preview PDF. Persisted to `target` when given, otherwise kept in the temp
    /// directory. Nothing is left behind on failure.
    pub fn render_preview(&self, description: &Path, target: Option<&Path>) -> Result<PathBuf> {
        let pdf = write_transient("", ".pdf")?;
        self.render_pdf(description, &pdf)?;
        let path = match target {
            Some(target) => {
                std::fs::copy(&pdf, target)?;
                target.to_path_buf()
            }
            None => pdf.keep().map_err(|e| Error::Io(e.error))?,
        };
        info!(path = %path.display(), "rendered preview");
        Ok(path)
    }

    fn run(&self, args: &[&OsStr]) -> Result<Vec<u8>> {
        debug!(dot = %self.dot.display(), ?args, "running graphviz");
        let mut child = Command::new(&self.dot)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| Error::Spawn {
                program: self.dot.clone(),
                source,
            })?;

        // Drain both pipes concurrently; a full pipe would otherwise stall the child.
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let status = match self.timeout {
            None => child.wait()?,
            Some(limit) => match wait_with_deadline(&mut child, limit)? {
                Some(status) => status,
                // Readers finish on their own once the killed child's pipes close.
                None => {
                    return Err(Error::ToolTimedOut {
                        seconds: limit.as_secs(),
                    });
                }
            },
        };
        let stdout = join(stdout)?;
        let stderr = join(stderr)?;

        if !status.success() {
            return Err(Error::ToolFailed {
                status: status.to_string(),
                stderr: String::from_utf8_lossy(&stderr).trim_end().to_string(),
            });
        }
        Ok(stdout)
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> JoinHandle<std::io::Result<Vec<u8>>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            pipe.read_to_end(&mut buf)?;
        }
        Ok(buf)
    })
}

fn join(handle: JoinHandle<std::io::Result<Vec<u8>>>) -> Result<Vec<u8>> {
    match handle.join() {
        Ok(result) => Ok(result?),
        Err(_) => Err(Error::Io(std::io::Error::other("pipe reader panicked"))),
    }
}

/// Waits for `child` up to `limit`. On expiry the child is killed and `None` returned.
fn wait_with_deadline(child: &mut Child, limit: Duration) -> Result<Option<ExitStatus>> {
    let start = Instant::now();
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if start.elapsed() >= limit {
            child.kill()?;
            child.wait()?;
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

#![forbid(unsafe_code)]

//! Graphviz round trip for node editors (headless).
//!
//! The pipeline, run by [`Arranger::arrange`]:
//! - elide pass-through reroute nodes ([`reroute`])
//! - write the tree as a DOT `digraph` with one port per visible socket ([`dot`])
//! - run `dot -Tplain-ext` ([`graphviz`])
//! - read node centers and edge splines back ([`plain`])
//! - move the nodes and turn bent edges into reroute chains ([`rewrite`])
//!
//! The caller's graph is only replaced once every step has succeeded.

pub mod address;
pub mod config;
pub mod dot;
pub mod error;
pub mod graphviz;
pub mod plain;
pub mod reroute;
pub mod rewrite;
pub mod theme;

pub use address::{Polarity, PortAddress};
pub use config::ArrangeConfig;
pub use dot::{Description, PortIndex};
pub use error::{Error, Result};
pub use graphviz::Graphviz;
pub use plain::PlainLayout;
pub use reroute::ElisionReport;
pub use rewrite::RewriteReport;
pub use theme::Theme;

use gvarrange_graph::NodeTree;
use std::path::PathBuf;
use tracing::info;

/// Where the optional PDF preview goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewTarget {
    /// Kept in the temp directory; the path is reported back.
    Temporary,
    Path(PathBuf),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArrangeOptions {
    pub preview: Option<PreviewTarget>,
}

impl ArrangeOptions {
    pub fn with_preview(mut self, target: PreviewTarget) -> Self {
        self.preview = Some(target);
        self
    }
}

#[derive(Debug, Clone)]
pub struct ArrangeReport {
    /// The DOT text handed to Graphviz, for mirroring to a clipboard.
    pub description: String,
    pub elision: ElisionReport,
    pub rewrite: RewriteReport,
    pub preview: Option<PathBuf>,
}

#[derive(Debug, Clone, Default)]
pub struct Arranger {
    config: ArrangeConfig,
    theme: Theme,
}

impl Arranger {
    pub fn new(config: ArrangeConfig, theme: Theme) -> Self {
        Self { config, theme }
    }

    pub fn config(&self) -> &ArrangeConfig {
        &self.config
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// The DOT description `arrange` would hand to Graphviz. `graph` is not modified.
    pub fn describe<G: NodeTree + Clone>(&self, graph: &G) -> Result<Description> {
        let mut scratch = graph.clone();
        reroute::elide(&mut scratch)?;
        Ok(dot::write_description(&scratch, &self.config, &self.theme))
    }

    /// Lays `graph` out with Graphviz.
    ///
    /// Runs on a copy; `graph` is left exactly as it was when any step fails.
    pub fn arrange<G: NodeTree + Clone>(
        &self,
        graph: &mut G,
        options: &ArrangeOptions,
    ) -> Result<ArrangeReport> {
        let dot_path = graphviz::locate(&self.config)?;
        let tool = Graphviz::new(dot_path).with_timeout(self.config.timeout());

        if graph.node_count() == 0 {
            info!("empty node tree; nothing to arrange");
            return Ok(ArrangeReport {
                description: String::new(),
                elision: ElisionReport::default(),
                rewrite: RewriteReport::default(),
                preview: None,
            });
        }

        let mut scratch = graph.clone();
        let elision = reroute::elide(&mut scratch)?;
        let description = dot::write_description(&scratch, &self.config, &self.theme);

        let dot_file = graphviz::write_transient(&description.text, ".dot")?;
        let output = tool.layout(&dot_file)?;
        let layout = plain::parse(&output)?;
        let rewrite = rewrite::apply(&mut scratch, &description.index, &layout)?;

        let preview = match &options.preview {
            None => None,
            Some(PreviewTarget::Temporary) => Some(tool.render_preview(&dot_file, None)?),
            Some(PreviewTarget::Path(path)) => {
                Some(tool.render_preview(&dot_file, Some(path))?)
            }
        };

        *graph = scratch;
        info!(
            placed = rewrite.placed,
            rerouted = rewrite.rerouted,
            reroutes = rewrite.reroutes.len(),
            "arranged node tree"
        );
        Ok(ArrangeReport {
            description: description.text,
            elision,
            rewrite,
            preview,
        })
    }
}

/// Returns the only item of `editors`.
pub fn single_editor<I: IntoIterator>(editors: I) -> Result<I::Item> {
    let mut iter = editors.into_iter();
    let first = iter.next().ok_or(Error::NoEditor)?;
    if iter.next().is_some() {
        return Err(Error::MultipleEditors);
    }
    Ok(first)
}

#[cfg(test)]
mod tests;

//! Colours taken from the host's active theme, formatted for Graphviz.

use serde::{Deserialize, Serialize};

/// Linear 0..1 RGB triple, as the host stores theme colours.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rgb(pub [f64; 3]);

/// Linear 0..1 RGBA quadruple.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rgba(pub [f64; 4]);

fn channel_to_u8(v: f64) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

impl Rgb {
    /// `#rrggbb`
    pub fn to_dot(self) -> String {
        let [r, g, b] = self.0.map(channel_to_u8);
        format!("#{r:02x}{g:02x}{b:02x}")
    }
}

impl Rgba {
    /// `#rrggbbaa`
    pub fn to_dot(self) -> String {
        let [r, g, b, a] = self.0.map(channel_to_u8);
        format!("#{r:02x}{g:02x}{b:02x}{a:02x}")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    /// Header colour of input nodes; used for the top band of every node.
    pub node_header: Rgb,
    pub node_backdrop: Rgba,
    pub text: Rgb,
    /// Regular widget item colour, used as the canvas background.
    pub background: Rgba,
    pub wire: Rgba,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            node_header: Rgb([0.796, 0.239, 0.290]),
            node_backdrop: Rgba([0.4, 0.4, 0.4, 1.0]),
            text: Rgb([0.9, 0.9, 0.9]),
            background: Rgba([0.157, 0.157, 0.157, 1.0]),
            wire: Rgba([0.1, 0.1, 0.1, 1.0]),
        }
    }
}

//! `node_<index>[:o<port>|:i<port>]` addressing shared by the DOT writer and the plain-ext
//! reader. Indices are positions in the serialized node order and among the node's visible
//! sockets of one polarity, never raw host indices.

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Polarity {
    Output,
    Input,
}

impl Polarity {
    fn letter(self) -> char {
        match self {
            Polarity::Output => 'o',
            Polarity::Input => 'i',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PortAddress {
    pub node: usize,
    pub polarity: Polarity,
    /// `None` when the link touches a hidden socket and only the node was named.
    pub port: Option<usize>,
}

impl PortAddress {
    pub fn output(node: usize, port: usize) -> Self {
        Self {
            node,
            polarity: Polarity::Output,
            port: Some(port),
        }
    }

    pub fn input(node: usize, port: usize) -> Self {
        Self {
            node,
            polarity: Polarity::Input,
            port: Some(port),
        }
    }

    pub fn bare(node: usize, polarity: Polarity) -> Self {
        Self {
            node,
            polarity,
            port: None,
        }
    }

    /// The port name inside the node record, e.g. `o1`. Empty for a bare address.
    pub fn port_tag(&self) -> String {
        match self.port {
            Some(port) => format!("{}{port}", self.polarity.letter()),
            None => String::new(),
        }
    }

    /// Parses an address whose port (if any) must have the given polarity.
    pub fn parse(s: &str, polarity: Polarity) -> Option<Self> {
        let caps = address_re().captures(s)?;
        let node = caps.get(1)?.as_str().parse().ok()?;
        let port = match (caps.get(2), caps.get(3)) {
            (Some(letter), Some(index)) => {
                if !letter.as_str().starts_with(polarity.letter()) {
                    return None;
                }
                Some(index.as_str().parse().ok()?)
            }
            _ => None,
        };
        Some(Self {
            node,
            polarity,
            port,
        })
    }
}

/// `node_<index>`
pub fn node_name(index: usize) -> String {
    format!("node_{index}")
}

/// Inverse of [`node_name`].
pub fn parse_node_name(s: &str) -> Option<usize> {
    let digits = s.strip_prefix("node_")?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

fn address_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^node_(\d+)(?::([oi])(\d+))?$").expect("address regex"))
}

impl fmt::Display for PortAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node_{}", self.node)?;
        if self.port.is_some() {
            write!(f, ":{}", self.port_tag())?;
        }
        Ok(())
    }
}

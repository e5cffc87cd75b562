//! Sentinel-region injection.
//!
//! The target file is an opaque sequence of lines. Two regions, SETUP and
//! BODY, are each bounded by a BEGIN line and an END line, recognised by
//! substring match. Region contents are replaced wholesale; every other
//! line, the sentinel lines included, passes through byte for byte.
//!
//! A region must appear exactly once, BEGIN before END, and regions may
//! not nest. Anything else is rejected before output is produced.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::InjectError;

/// One of the two replaceable regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    /// Struct declarations and type-hash constants.
    Setup,
    /// Getter functions.
    Body,
}

impl Region {
    const ALL: [Region; 2] = [Region::Setup, Region::Body];

    fn index(self) -> usize {
        match self {
            Self::Setup => 0,
            Self::Body => 1,
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Setup => "SETUP",
            Self::Body => "BODY",
        })
    }
}

/// Marker substrings identifying the sentinel lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionMarkers {
    pub setup_begin: String,
    pub setup_end: String,
    pub body_begin: String,
    pub body_end: String,
}

impl Default for RegionMarkers {
    fn default() -> Self {
        Self {
            setup_begin: "// BEGIN EIP712 AUTOGENERATED SETUP".to_string(),
            setup_end: "// END EIP712 AUTOGENERATED SETUP".to_string(),
            body_begin: "// BEGIN EIP712 AUTOGENERATED BODY".to_string(),
            body_end: "// END EIP712 AUTOGENERATED BODY".to_string(),
        }
    }
}

impl RegionMarkers {
    fn begin(&self, region: Region) -> &str {
        match region {
            Region::Setup => &self.setup_begin,
            Region::Body => &self.body_begin,
        }
    }

    fn end(&self, region: Region) -> &str {
        match region {
            Region::Setup => &self.setup_end,
            Region::Body => &self.body_end,
        }
    }

    fn all(&self) -> [&str; 4] {
        [
            &self.setup_begin,
            &self.setup_end,
            &self.body_begin,
            &self.body_end,
        ]
    }

    fn classify(&self, line: &str) -> Option<Marker> {
        for region in Region::ALL {
            if line.contains(self.begin(region)) {
                return Some(Marker::Begin(region));
            }
            if line.contains(self.end(region)) {
                return Some(Marker::End(region));
            }
        }
        None
    }
}

#[derive(Clone, Copy)]
enum Marker {
    Begin(Region),
    End(Region),
}

#[derive(Clone, Copy, Default)]
struct RegionState {
    /// 1-based line of the BEGIN marker, once seen.
    opened_at: Option<usize>,
    closed: bool,
}

/// Replace the SETUP and BODY regions of `text`.
///
/// Lines are split on `\n` only, so `\r\n` endings and a trailing newline
/// survive unchanged. An empty block leaves the region empty.
pub fn inject(
    text: &str,
    setup: &str,
    body: &str,
    markers: &RegionMarkers,
) -> Result<String, InjectError> {
    for (region, block) in [(Region::Setup, setup), (Region::Body, body)] {
        if markers.all().iter().any(|m| block.contains(m)) {
            return Err(InjectError::MarkerInGeneratedCode { region });
        }
    }

    let mut state = [RegionState::default(); 2];
    let mut open: Option<Region> = None;
    let mut out: Vec<&str> = Vec::new();

    for (index, line) in text.split('\n').enumerate() {
        let line_no = index + 1;
        match markers.classify(line) {
            Some(Marker::Begin(region)) => {
                if let Some(inside) = open {
                    let opened_at = state[inside.index()].opened_at.unwrap_or(line_no);
                    return Err(InjectError::NestedRegion {
                        region,
                        line: line_no,
                        inside,
                        opened_at,
                    });
                }
                if let Some(first) = state[region.index()].opened_at {
                    return Err(InjectError::DuplicateRegion {
                        region,
                        first,
                        line: line_no,
                    });
                }
                state[region.index()].opened_at = Some(line_no);
                open = Some(region);
                out.push(line);
                let block = match region {
                    Region::Setup => setup,
                    Region::Body => body,
                };
                if !block.is_empty() {
                    out.push(block);
                }
            }
            Some(Marker::End(region)) => {
                if open != Some(region) {
                    return Err(InjectError::UnmatchedEnd {
                        region,
                        line: line_no,
                    });
                }
                state[region.index()].closed = true;
                open = None;
                out.push(line);
            }
            None if open.is_some() => {}
            None => out.push(line),
        }
    }

    if let Some(region) = open {
        let opened_at = state[region.index()].opened_at.unwrap_or(0);
        return Err(InjectError::UnterminatedRegion { region, opened_at });
    }
    for region in Region::ALL {
        if !state[region.index()].closed {
            return Err(InjectError::MissingRegion { region });
        }
    }

    Ok(out.join("\n"))
}

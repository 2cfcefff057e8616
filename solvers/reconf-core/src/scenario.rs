//! Scenario file parser.
//!
//! A scenario names its map on the second line (relative to the parent
//! of the scenario's folder), then lists agents under an
//! `agent & start` heading and destination cells under a `destination`
//! heading.

use thiserror::Error;

/// Errors from parsing a scenario file.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("missing map path on line 2")]
    MissingMapPath,

    #[error("missing section: {0}")]
    MissingSection(&'static str),

    #[error("malformed entry on line {line}: {reason}")]
    MalformedEntry { line: usize, reason: String },
}

/// A parsed reconfiguration scenario.
///
/// Agent and destination order is the file order; it is the canonical
/// iteration order downstream.
#[derive(Debug, Clone)]
pub struct Scenario {
    map_path: String,
    agents: Vec<(u32, (u32, u32))>,
    destinations: Vec<(u32, u32)>,
}

impl Scenario {
    /// Parse a scenario file content.
    ///
    /// Expected format:
    /// ```text
    /// <title>
    /// <relative map path>
    /// agent & start
    /// <agent_id> <x> <y>
    /// ...
    /// destination
    /// <x> <y>
    /// ...
    /// ```
    pub fn parse(input: &str) -> Result<Self, ScenarioError> {
        let lines: Vec<&str> = input.lines().map(|l| l.trim()).collect();

        let map_path = lines
            .get(1)
            .filter(|l| !l.is_empty())
            .ok_or(ScenarioError::MissingMapPath)?
            .to_string();

        let section = |name: &'static str| -> Result<usize, ScenarioError> {
            lines
                .iter()
                .position(|l| *l == name)
                .ok_or(ScenarioError::MissingSection(name))
        };
        let starts_idx = section("agent & start")?;
        let dest_idx = section("destination")?;

        let mut agents = Vec::new();
        for (line_no, line) in lines.iter().enumerate().take(dest_idx).skip(starts_idx + 1) {
            if line.is_empty() {
                continue;
            }
            let fields = Self::parse_fields(line, 3, line_no)?;
            agents.push((fields[0], (fields[1], fields[2])));
        }

        let mut destinations = Vec::new();
        for (line_no, line) in lines.iter().enumerate().skip(dest_idx + 1) {
            if line.is_empty() {
                continue;
            }
            let fields = Self::parse_fields(line, 2, line_no)?;
            destinations.push((fields[0], fields[1]));
        }

        Ok(Self {
            map_path,
            agents,
            destinations,
        })
    }

    fn parse_fields(line: &str, expected: usize, line_no: usize) -> Result<Vec<u32>, ScenarioError> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() != expected {
            return Err(ScenarioError::MalformedEntry {
                line: line_no + 1,
                reason: format!("expected {} columns, got {}", expected, parts.len()),
            });
        }
        parts
            .iter()
            .map(|p| {
                p.parse().map_err(|_| ScenarioError::MalformedEntry {
                    line: line_no + 1,
                    reason: format!("invalid coordinate: {p}"),
                })
            })
            .collect()
    }

    /// Map path relative to the parent of the scenario's folder.
    pub fn map_path(&self) -> &str {
        &self.map_path
    }

    /// Agents as `(id, (x, y))` pairs, in file order.
    pub fn agents(&self) -> &[(u32, (u32, u32))] {
        &self.agents
    }

    /// Destination cells, in file order.
    pub fn destinations(&self) -> &[(u32, u32)] {
        &self.destinations
    }
}

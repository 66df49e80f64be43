//! Parser for the plain-text army list export.
//!
//! ```text
//! Strike Team (1995 points)
//! Space Marines
//! Dark Angels
//! Strike Force (2000 points)
//! Gladius Task Force
//!
//!
//! CHARACTER
//!
//! Captain (80 points)
//!   • 1x Captain
//!     1x Master-crafted power weapon
//! ```

use std::sync::OnceLock;

use regex::Regex;

use crate::error::Error;
use crate::model::{ArmyList, ListHeader, Unit};

static HEADER_RE: OnceLock<Regex> = OnceLock::new();
static UNIT_RE: OnceLock<Regex> = OnceLock::new();

fn header_re() -> &'static Regex {
    HEADER_RE.get_or_init(|| {
        Regex::new(concat!(
            r"^(?P<header>(?P<list_name>[^\n]+?) \((?P<total_points>[0-9]+) points\)\n",
            r"(?P<army>[^\n]+?(?:\n[^\n]+?)?)\n",
            r"(?P<game_format>[^\n]+? \((?P<max_points>[0-9]+) points\))\n",
            r"(?P<detachment>[^\n]+?))\n",
            r"\n\n",
            r"(?P<rest>(?s:.*))\z",
        ))
        .expect("header regex")
    })
}

fn unit_re() -> &'static Regex {
    UNIT_RE.get_or_init(|| {
        Regex::new(concat!(
            r"(?P<name>[^\n]+?) \((?P<points>[0-9]+) points\)\n",
            r"(?P<wargear>(?:  [^\n]*?(?:\n|\z))+)",
        ))
        .expect("unit regex")
    })
}

fn parse_points(raw: &str) -> Result<u32, Error> {
    raw.parse()
        .map_err(|_| Error::InvalidList(format!("points value out of range: {raw}")))
}

pub fn parse_list(content: &str) -> Result<ArmyList, Error> {
    let content = content.replace("\r\n", "\n");
    let caps = header_re().captures(&content).ok_or_else(|| {
        Error::InvalidList(
            "expected '<name> (<N> points)', the army, '<format> (<M> points)', \
             the detachment, then two blank lines"
                .into(),
        )
    })?;

    let header = ListHeader {
        text: caps["header"].to_string(),
        list_name: caps["list_name"].to_string(),
        total_points: parse_points(&caps["total_points"])?,
        army_name: caps["army"].replace('\n', " -- "),
        game_format: caps["game_format"].to_string(),
        max_points: parse_points(&caps["max_points"])?,
        detachment: caps["detachment"].to_string(),
    };
    let body = caps["rest"].to_string();
    let units = parse_units(&body)?;

    log::info!(
        "Parsed army header of '{}' ({}) with {}/{} points, {} unit entries",
        header.list_name,
        header.army_name,
        header.total_points,
        header.max_points,
        units.len(),
    );

    Ok(ArmyList {
        header,
        body,
        units,
    })
}

/// Parse the unit blocks of a list body, fusing runs of identical units.
pub fn parse_units(body: &str) -> Result<Vec<Unit>, Error> {
    let mut units = Vec::new();
    let mut run: Vec<Unit> = Vec::new();

    for caps in unit_re().captures_iter(body) {
        let name = caps["name"].to_string();
        let current = Unit {
            id: name.trim().to_uppercase(),
            points: parse_points(&caps["points"])?,
            full_text: caps[0].trim().to_string(),
            name,
        };
        if run.last().is_some_and(|prev| prev.id != current.id) {
            units.push(fuse(std::mem::take(&mut run))?);
        }
        run.push(current);
    }
    if !run.is_empty() {
        units.push(fuse(run)?);
    }
    Ok(units)
}

/// Merge consecutive entries of the same unit into one annotated entry.
fn fuse(mut run: Vec<Unit>) -> Result<Unit, Error> {
    if run.len() == 1 {
        return Ok(run.remove(0));
    }
    let total_points = run
        .iter()
        .try_fold(0u32, |total, u| total.checked_add(u.points))
        .ok_or_else(|| {
            Error::InvalidList(format!("points total of '{}' out of range", run[0].name))
        })?;
    let head = &run[0];

    let mut lines = vec![
        format!("{} u. of {} ({} points)", run.len(), head.name, total_points),
        String::new(),
    ];
    for unit in &run {
        let mut unit_lines = unit.full_text.split('\n');
        if let Some(first) = unit_lines.next() {
            lines.push(format!("  \u{2022} {first}"));
        }
        lines.extend(
            unit_lines
                .filter(|l| !l.is_empty())
                .map(|l| format!("    {l}")),
        );
    }

    Ok(Unit {
        name: head.name.clone(),
        id: head.id.clone(),
        points: total_points,
        full_text: lines.join("\n").trim().to_string(),
    })
}

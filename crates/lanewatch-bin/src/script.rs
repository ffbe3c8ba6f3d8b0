//! Event scripts for replaying a session.
//!
//! One entry per line, `#` starts a comment:
//!
//! ```text
//! 0     down a
//! 120.5 up   key:30
//! 300   bind 2 key:33 f
//! 400   unbind clear
//! ```
//!
//! A code is `key:<scan code>`, a mouse button name such as `Button-1`, or the
//! name of a current binding. Slots are lane numbers counted from 1, `clear`
//! or `toggle-analysis`. Times are milliseconds and must not go backwards.

use std::collections::HashMap;

use anyhow::{Context, Result, bail};
use lanewatch_config::Binding;
use lanewatch_input::{BindingTable, ControlAction, RawInputEvent, SessionMessage, Slot};
use lanewatch_types::{InputCode, MouseButton, PressKind};

/// Latest accepted time, about 31 years.
const MAX_TIME_MS: f64 = 1e12;

/// Parse a script into session messages, resolving binding names against
/// `bindings` as updated by the script's own `bind` lines.
pub fn parse_script(text: &str, bindings: &BindingTable) -> Result<Vec<SessionMessage>> {
    let mut names = binding_names(bindings);
    let mut messages = Vec::new();
    let mut last_ms = f64::NEG_INFINITY;

    for (index, raw) in text.lines().enumerate() {
        let line = raw.split('#').next().unwrap_or_default().trim();
        if line.is_empty() {
            continue;
        }
        let number = index + 1;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let (time_ms, message) = parse_line(&tokens, &mut names, bindings.lane_count())
            .with_context(|| format!("line {number}: {line:?}"))?;
        if time_ms < last_ms {
            bail!("line {number}: time {time_ms}ms is before {last_ms}ms");
        }
        last_ms = time_ms;
        messages.push(message);
    }
    log::debug!("parsed {} script entries", messages.len());
    Ok(messages)
}

fn binding_names(bindings: &BindingTable) -> HashMap<String, InputCode> {
    let lanes = (0..bindings.lane_count()).map(Slot::Lane);
    let controls = [
        Slot::Control(ControlAction::Clear),
        Slot::Control(ControlAction::ToggleAnalysis),
    ];
    lanes
        .chain(controls)
        .filter_map(|slot| bindings.binding(slot))
        .map(|b| (b.name.clone(), b.code))
        .collect()
}

fn parse_line(
    tokens: &[&str],
    names: &mut HashMap<String, InputCode>,
    lane_count: usize,
) -> Result<(f64, SessionMessage)> {
    let [time, verb, rest @ ..] = tokens else {
        bail!("expected `<time_ms> <action> ...`");
    };
    let time_ms: f64 = time.parse().context("invalid time")?;
    if !time_ms.is_finite() || time_ms < 0.0 {
        bail!("time must be a non-negative number");
    }
    if time_ms > MAX_TIME_MS {
        bail!("time {time_ms}ms is past the {MAX_TIME_MS}ms limit");
    }
    let time_us = (time_ms * 1000.0).round() as i64;

    let message = match (*verb, rest) {
        ("down", [code]) => SessionMessage::Input(RawInputEvent::new(
            resolve(code, names)?,
            PressKind::Press,
            time_us,
        )),
        ("up", [code]) => SessionMessage::Input(RawInputEvent::new(
            resolve(code, names)?,
            PressKind::Release,
            time_us,
        )),
        ("bind", [slot, code, name @ ..]) if name.len() <= 1 => {
            let slot = parse_slot(slot, lane_count)?;
            let code = resolve_code(code)?;
            let name = name.first().map_or_else(|| default_name(code), |n| n.to_string());
            names.insert(name.clone(), code);
            SessionMessage::Rebind {
                slot,
                binding: Binding::new(code, name),
            }
        }
        ("unbind", [slot]) => SessionMessage::Unbind(parse_slot(slot, lane_count)?),
        (verb, _) => bail!("unknown action or wrong arguments for {verb:?}"),
    };
    Ok((time_ms, message))
}

/// A literal code, without name lookup.
fn resolve_code(token: &str) -> Result<InputCode> {
    if let Some(scan) = token.strip_prefix("key:") {
        let scan = scan.parse().with_context(|| format!("invalid scan code {scan:?}"))?;
        return Ok(InputCode::Key(scan));
    }
    match MouseButton::from_name(token) {
        Some(button) => Ok(InputCode::Mouse(button)),
        None => bail!("{token:?} is not a key code or mouse button"),
    }
}

fn resolve(token: &str, names: &HashMap<String, InputCode>) -> Result<InputCode> {
    if let Some(&code) = names.get(token) {
        return Ok(code);
    }
    resolve_code(token).with_context(|| format!("{token:?} is not a bound name either"))
}

fn default_name(code: InputCode) -> String {
    match code {
        InputCode::Mouse(button) => button.name().to_string(),
        InputCode::Key(_) => code.to_string(),
    }
}

fn parse_slot(token: &str, lane_count: usize) -> Result<Slot> {
    match token {
        "clear" => Ok(Slot::Control(ControlAction::Clear)),
        "toggle-analysis" => Ok(Slot::Control(ControlAction::ToggleAnalysis)),
        _ => {
            let lane: usize = token
                .parse()
                .with_context(|| format!("invalid slot {token:?}"))?;
            if lane == 0 || lane > lane_count {
                bail!("lane {lane} is outside 1..={lane_count}");
            }
            Ok(Slot::Lane(lane - 1))
        }
    }
}

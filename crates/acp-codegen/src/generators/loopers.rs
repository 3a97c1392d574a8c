//! Scheduling code for loopers (array strategy).

use crate::template::{merge_lines, render_template, Replacements, INDENT};
use acp_types::{AcpError, Component, ComponentType, Result, Timing};

const HANDLER_PREFIX: &str = "looper_handler_";

/// A looper bound to a concrete controller object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LooperRecord {
    /// Fully qualified controller object.
    pub controller: String,
    pub method: String,
    /// Milliseconds between calls; `None` lets the method return its own delay.
    pub interval: Option<i64>,
    pub initial_delay: i64,
}

impl LooperRecord {
    pub fn resolve(
        controller: &str,
        method: &str,
        interval: &Timing,
        initial_delay: &Timing,
        component: &Component,
        component_type: &ComponentType,
    ) -> Result<Self> {
        let interval = resolve_timing(interval, component, component_type).map_err(|e| {
            AcpError::compile(format!(
                "Invalid value of interval of looper of the component '{}'.",
                component.name
            ))
            .caused_by(e)
        })?;
        let initial_delay =
            resolve_timing(initial_delay, component, component_type).map_err(|e| {
                AcpError::compile(format!(
                    "Invalid value of initial delay of looper of the component '{}'.",
                    component.name
                ))
                .caused_by(e)
            })?;
        Ok(Self {
            controller: controller.to_string(),
            method: method.to_string(),
            interval: interval.filter(|ms| *ms >= 0),
            initial_delay: initial_delay.unwrap_or(0).max(0),
        })
    }
}

/// Resolve a literal or a property reference; blank values are unset.
pub fn resolve_timing(
    timing: &Timing,
    component: &Component,
    component_type: &ComponentType,
) -> Result<Option<i64>> {
    let name = match timing {
        Timing::Unset => return Ok(None),
        Timing::Millis(ms) => return Ok(Some(*ms)),
        Timing::Property(name) => name,
    };
    let property = component_type
        .property(name)
        .ok_or_else(|| AcpError::compile(format!("Undefined property '{name}'.")))?;
    match property.effective_value(component.property(name)).map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => text.parse::<i64>().map(Some).map_err(|_| {
            AcpError::compile(format!(
                "The value of property '{name}' cannot be converted to an integer value."
            ))
        }),
    }
}

/// Render the loopers section and return it with the lines for `loop()`.
///
/// Produces nothing when there are no loopers.
pub fn array_section(records: &[LooperRecord], namespace: &str) -> Result<(String, Vec<String>)> {
    if records.is_empty() {
        return Ok((String::new(), Vec::new()));
    }

    let mut handlers = Vec::new();
    for (i, record) in records.iter().enumerate() {
        if i != 0 {
            handlers.push(String::new());
        }
        let call = format!("{}.{}()", record.controller, record.method);
        handlers.push(format!("unsigned long {HANDLER_PREFIX}{i}() {{"));
        match record.interval {
            Some(ms) => {
                handlers.push(format!("{INDENT}{call};"));
                handlers.push(format!("{INDENT}return {ms};"));
            }
            None => handlers.push(format!("{INDENT}return {call};")),
        }
        handlers.push("}".to_string());
    }

    let last = records.len() - 1;
    let rows: Vec<String> = records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let sep = if i == last { "" } else { "," };
            format!("{{{}, ENABLED, {HANDLER_PREFIX}{i}}}{sep}", record.initial_delay)
        })
        .collect();

    let mut by_delay: Vec<usize> = (0..records.len()).collect();
    by_delay.sort_by_key(|&i| records[i].initial_delay);
    let pq: Vec<String> = by_delay.iter().map(|i| format!("loopers + {i}")).collect();

    let mut replacements = Replacements::new();
    replacements.insert("privateNamespace".into(), namespace.to_string());
    replacements.insert("numberOfLoopers".into(), records.len().to_string());
    replacements.insert("looperHandlers".into(), merge_lines(&handlers, ""));
    replacements.insert("loopersInit".into(), merge_lines(&rows, INDENT));
    replacements.insert("pqInit".into(), format!("{{{}}}", pq.join(", ")));
    let section = render_template("acp_core_loopers_array.cpp", &replacements)?;

    let loop_lines = vec![
        "// Process loopers".to_string(),
        format!("{namespace}::processLoopers();"),
    ];
    Ok((section, loop_lines))
}

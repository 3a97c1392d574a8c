//! Skeleton sketch shipped in the library's `examples/` directory.

use crate::context::{GenerationContext, SharedState};
use crate::pipeline::{Artifacts, ContentGenerator, Output};
use crate::template::{dedup_lines, merge_lines, render_template};
use acp_types::{Result, ON_LOOP, ON_START};

const SEPARATOR_LINE: &str =
    "//----------------------------------------------------------------------";

const STUB_BODY: &str = "  // TODO Auto-generated callback stub";

/// Generates `examples/<library>Skeleton/<library>Skeleton.ino` with the
/// available objects and empty callbacks for every bound handler.
#[derive(Debug, Default)]
pub struct ExampleGenerator;

impl ContentGenerator for ExampleGenerator {
    fn name(&self) -> &'static str {
        "example"
    }

    fn prepare(
        &self,
        cx: &GenerationContext<'_>,
        state: &mut SharedState,
        output: &mut Output,
    ) -> Result<()> {
        let mut includes = vec![format!("#include <{}.h>", cx.settings.library_name)];
        for module in cx.modules.values() {
            for header in &module.platform_includes {
                includes.push(format!("#include <{header}>"));
            }
        }
        if state.eeprom_usage > 0 {
            includes.push("#include <EEPROM.h>".into());
        }

        let objects = object_summary(cx)?;
        let mut summary = Vec::new();
        if !objects.is_empty() {
            summary.push(SEPARATOR_LINE.to_string());
            summary.push("// Summary of available objects:".into());
            summary.extend(objects);
            summary.push(SEPARATOR_LINE.into());
        }

        output.insert("includes".into(), merge_lines(&dedup_lines(includes), ""));
        output.insert("objectSummary".into(), merge_lines(&summary, ""));
        output.insert("callbacks".into(), merge_lines(&callbacks(cx)?, ""));
        Ok(())
    }

    fn generate(
        &self,
        cx: &GenerationContext<'_>,
        _state: &SharedState,
        output: &Output,
        artifacts: &mut Artifacts,
    ) -> Result<()> {
        let content = render_template("example.ino", output)?;
        artifacts.write(&cx.settings.example_file(), &content)
    }
}

fn object_summary(cx: &GenerationContext<'_>) -> Result<Vec<String>> {
    let mut lines = Vec::new();
    for component in &cx.project.components {
        if cx.component_type(component)?.view.is_none() {
            continue;
        }
        lines.push(format!("// {} ({})", component.name, component.type_name));
        push_description(&mut lines, &component.description);
    }
    for item in &cx.project.eeprom {
        match item.array_length {
            Some(length) => lines.push(format!(
                "// {} (eeprom array of type {} with length {length})",
                item.name, item.ty
            )),
            None => lines.push(format!(
                "// {} (eeprom variable of type {})",
                item.name, item.ty
            )),
        }
        push_description(&mut lines, &item.description);
    }
    Ok(lines)
}

fn push_description(lines: &mut Vec<String>, description: &str) {
    lines.extend(
        description
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(|l| format!("//   {l}")),
    );
}

/// Callback stubs keyed by signature; a handler bound to several events gets
/// one stub, attributed to its first binding.
fn callbacks(cx: &GenerationContext<'_>) -> Result<Vec<String>> {
    let mut stubs: Vec<(String, String)> = Vec::new();
    let mut add = |origin: String, header: String| {
        if !stubs.iter().any(|(_, h)| *h == header) {
            stubs.push((origin, header));
        }
    };

    for event in [ON_START, ON_LOOP] {
        if let Some(handler) = cx.project.program_event(event) {
            add(format!("Program.{event}"), format!("void {handler}()"));
        }
    }
    for component in &cx.project.components {
        let component_type = cx.component_type(component)?;
        for event in &component_type.events {
            if event.binding.is_none() {
                continue;
            }
            if let Some(handler) = component.events.get(&event.name) {
                add(
                    format!("{}.{}", component.name, event.name),
                    event.handler_header(handler, true),
                );
            }
        }
    }

    let mut lines = Vec::new();
    for (origin, header) in stubs {
        lines.push(SEPARATOR_LINE.to_string());
        lines.push(format!("// Event callback for {origin}"));
        lines.push(format!("{header} {{"));
        lines.push(STUB_BODY.to_string());
        lines.push("}".into());
        lines.push(String::new());
    }
    Ok(lines)
}

//! The library's main header, included by sketches.

use super::EEPROM_HEADER_FILE;
use crate::context::{GenerationContext, SharedState};
use crate::instance;
use crate::pipeline::{Artifacts, ContentGenerator, Output};
use crate::template::{dedup_lines, merge_lines, merge_slashes, render_template};
use acp_types::{module_path, AcpError, Result};

/// Generates `src/<library>.h`: view externs, library includes and EEPROM
/// item externs.
#[derive(Debug, Default)]
pub struct ProjectHeaderGenerator;

impl ContentGenerator for ProjectHeaderGenerator {
    fn name(&self) -> &'static str {
        "project-header"
    }

    fn prepare(
        &self,
        cx: &GenerationContext<'_>,
        state: &mut SharedState,
        output: &mut Output,
    ) -> Result<()> {
        let mut includes = Vec::new();
        let mut views = Vec::new();

        for component in &cx.project.components {
            let component_type = cx.component_type(component)?;
            let Some(view) = &component_type.view else {
                continue;
            };
            let prefix = module_path(&component.type_name);
            for file in &view.includes {
                includes.push(merge_slashes(&format!("#include <{prefix}/{file}>")));
            }
            let replacements =
                instance::component_replacements(cx, state, component, component_type);
            let class_type = instance::class_type(view, &replacements);
            if class_type.is_empty() {
                return Err(AcpError::compile(format!(
                    "Class type for view of component {} is invalid.",
                    component.name
                )));
            }
            views.push(format!("extern {class_type} {};", component.name));
        }

        for import in &cx.project.library_imports {
            let library = cx
                .modules
                .get(import)
                .and_then(|m| m.as_library())
                .ok_or_else(|| {
                    AcpError::compile(format!(
                        "Library {import} imported by program is not a library module."
                    ))
                })?;
            let prefix = module_path(import);
            for file in &library.includes {
                includes.push(merge_slashes(&format!("#include <{prefix}/{file}>")));
            }
        }

        if !state.eeprom_externs.is_empty() {
            includes.push(format!("#include <{EEPROM_HEADER_FILE}>"));
        }

        output.insert("includes".into(), merge_lines(&dedup_lines(includes), ""));
        output.insert("views".into(), merge_lines(&views, ""));
        output.insert("eepromUsage".into(), state.eeprom_usage.to_string());
        output.insert("eepromVars".into(), merge_lines(&state.eeprom_externs, ""));
        Ok(())
    }

    fn generate(
        &self,
        cx: &GenerationContext<'_>,
        _state: &SharedState,
        output: &Output,
        artifacts: &mut Artifacts,
    ) -> Result<()> {
        let content = render_template("acp_project.h", output)?;
        artifacts.write(&cx.settings.project_header_file(), &content)
    }
}

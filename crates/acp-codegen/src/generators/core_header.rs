use super::CORE_HEADER_FILE;
use crate::context::{GenerationContext, SharedState};
use crate::pipeline::{Artifacts, ContentGenerator, Output};
use crate::template::render_template;
use acp_types::Result;

/// Generates `src/acp/core.h`, included by every module.
#[derive(Debug, Default)]
pub struct CoreHeaderGenerator;

impl ContentGenerator for CoreHeaderGenerator {
    fn name(&self) -> &'static str {
        "core-header"
    }

    fn prepare(
        &self,
        cx: &GenerationContext<'_>,
        _state: &mut SharedState,
        output: &mut Output,
    ) -> Result<()> {
        let debug_mode = if cx.settings.debug_mode { "1" } else { "0" };
        output.insert("debugMode".into(), debug_mode.into());
        Ok(())
    }

    fn generate(
        &self,
        cx: &GenerationContext<'_>,
        _state: &SharedState,
        output: &Output,
        artifacts: &mut Artifacts,
    ) -> Result<()> {
        let content = render_template("acp_core.h", output)?;
        artifacts.write(&cx.settings.include_dir().join(CORE_HEADER_FILE), &content)
    }
}

use super::{EEPROM_HEADER_FILE, EEPROM_SOURCE_FILE};
use crate::context::{GenerationContext, SharedState};
use crate::pipeline::{Artifacts, ContentGenerator, Output};
use crate::template::render_template;
use acp_types::Result;

/// Generates the EEPROM wrapper header and source, only when EEPROM is used.
#[derive(Debug, Default)]
pub struct EepromVarsGenerator;

impl ContentGenerator for EepromVarsGenerator {
    fn name(&self) -> &'static str {
        "eeprom-vars"
    }

    fn prepare(
        &self,
        _cx: &GenerationContext<'_>,
        state: &mut SharedState,
        output: &mut Output,
    ) -> Result<()> {
        output.insert("privateNamespace".into(), state.private_namespace.clone());
        output.insert("acpEepromHeaderFile".into(), EEPROM_HEADER_FILE.into());
        Ok(())
    }

    fn generate(
        &self,
        cx: &GenerationContext<'_>,
        state: &SharedState,
        output: &Output,
        artifacts: &mut Artifacts,
    ) -> Result<()> {
        if state.eeprom_usage == 0 {
            return Ok(());
        }
        let header = render_template("acp_eeprom_vars.h", output)?;
        artifacts.write(&cx.settings.include_dir().join(EEPROM_HEADER_FILE), &header)?;
        let source = render_template("acp_eeprom_vars.cpp", output)?;
        artifacts.write(&cx.settings.source_dir().join(EEPROM_SOURCE_FILE), &source)
    }
}

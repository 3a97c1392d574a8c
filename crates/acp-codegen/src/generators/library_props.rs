use crate::context::{GenerationContext, SharedState};
use crate::pipeline::{Artifacts, ContentGenerator, Output};
use crate::template::render_template;
use acp_types::Result;

/// Generates `library.properties` for the Arduino library manager.
#[derive(Debug, Default)]
pub struct LibraryPropsGenerator;

impl ContentGenerator for LibraryPropsGenerator {
    fn name(&self) -> &'static str {
        "library-properties"
    }

    fn prepare(
        &self,
        cx: &GenerationContext<'_>,
        _state: &mut SharedState,
        output: &mut Output,
    ) -> Result<()> {
        output.insert("libraryName".into(), cx.settings.library_name.clone());
        Ok(())
    }

    fn generate(
        &self,
        cx: &GenerationContext<'_>,
        _state: &SharedState,
        output: &Output,
        artifacts: &mut Artifacts,
    ) -> Result<()> {
        let content = render_template("library.properties", output)?;
        artifacts.write(&cx.settings.library_properties_file(), &content)
    }
}

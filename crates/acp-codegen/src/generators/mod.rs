//! The standard content generators.

mod core_header;
mod eeprom_vars;
mod example;
mod library_props;
pub mod loopers;
mod project_code;
mod project_header;

pub use core_header::CoreHeaderGenerator;
pub use eeprom_vars::EepromVarsGenerator;
pub use example::ExampleGenerator;
pub use library_props::LibraryPropsGenerator;
pub use project_code::ProjectCodeGenerator;
pub use project_header::ProjectHeaderGenerator;

use crate::pipeline::Pipeline;

/// Project source, relative to the source directory.
pub const CORE_SOURCE_FILE: &str = "core.cpp";
/// Runtime header, relative to the include directory.
pub const CORE_HEADER_FILE: &str = "acp/core.h";
/// EEPROM wrapper header, relative to the include directory.
pub const EEPROM_HEADER_FILE: &str = "acp/eeprom_vars.h";
/// EEPROM wrapper source, relative to the source directory.
pub const EEPROM_SOURCE_FILE: &str = "eeprom_vars.cpp";

/// All six generators. The project code generator prepares first because
/// the header, EEPROM and example generators read what it publishes.
pub fn standard_pipeline() -> Pipeline {
    let mut pipeline = Pipeline::new();
    let code = pipeline.add(ProjectCodeGenerator);
    let header = pipeline.add(ProjectHeaderGenerator);
    pipeline.add(CoreHeaderGenerator);
    let eeprom = pipeline.add(EepromVarsGenerator);
    let example = pipeline.add(ExampleGenerator);
    pipeline.add(LibraryPropsGenerator);

    pipeline.depends_on(header, code);
    pipeline.depends_on(eeprom, code);
    pipeline.depends_on(example, code);
    pipeline
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_order_starts_with_project_code() {
        let order = standard_pipeline().execution_order().unwrap();
        assert_eq!(order.len(), 6);
        assert_eq!(order[0], "project-code");
        for dependent in ["project-header", "eeprom-vars", "example"] {
            assert!(order.contains(&dependent));
        }
    }
}

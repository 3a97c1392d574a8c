//! The project source file: component objects, bindings, method wrappers,
//! EEPROM variables, loopers, `setup()` and `loop()`.

use super::loopers::{self, LooperRecord};
use super::{CORE_SOURCE_FILE, EEPROM_HEADER_FILE};
use crate::context::{GenerationContext, SharedState};
use crate::eeprom::{self, VersionMode};
use crate::instance;
use crate::pipeline::{Artifacts, ContentGenerator, Output};
use crate::template::{dedup_lines, merge_lines, merge_slashes, render_template, INDENT};
use acp_types::{
    AcpError, Component, ComponentType, Instance, LooperStrategy, Result, ON_LOOP, ON_START,
};
use tracing::debug;

/// Generates `src/sources/core.cpp`.
#[derive(Debug, Default)]
pub struct ProjectCodeGenerator;

/// Code collected while walking the project.
#[derive(Debug, Default)]
struct CodeBuffer {
    /// Signatures of user handlers referenced by the generated code.
    handlers: Vec<String>,
    includes: Vec<String>,
    public_objects: Vec<String>,
    private_objects: Vec<String>,
    setup: Vec<String>,
    loop_code: Vec<String>,
    loopers: Vec<LooperRecord>,
    wrapper_declarations: Vec<String>,
    wrapper_definitions: Vec<String>,
    eeprom_vars: Vec<String>,
    eeprom_init: Vec<String>,
}

/// Per-compile numbering of generated objects.
#[derive(Debug, Default)]
struct Counters {
    controllers: usize,
    wrappers: usize,
}

impl ContentGenerator for ProjectCodeGenerator {
    fn name(&self) -> &'static str {
        "project-code"
    }

    fn prepare(
        &self,
        cx: &GenerationContext<'_>,
        state: &mut SharedState,
        output: &mut Output,
    ) -> Result<()> {
        state.autogenerated.clear();
        let namespace = state.private_namespace.clone();
        let mut code = CodeBuffer::default();

        eeprom_variables(cx, state, &mut code, &namespace)?;

        let mut counters = Counters::default();
        for component in &cx.project.components {
            let component_type = cx.component_type(component)?;
            component_objects(cx, state, &mut code, &mut counters, component, component_type)?;
        }

        let loopers_section = match cx.settings.looper_strategy {
            LooperStrategy::Array => {
                let (section, loop_lines) = loopers::array_section(&code.loopers, &namespace)?;
                code.loop_code.extend(loop_lines);
                section
            }
        };

        program_events(cx, &mut code);
        watchdog(cx, &mut code);

        let handlers: Vec<String> = dedup_lines(code.handlers)
            .into_iter()
            .map(|h| format!("extern {h};"))
            .collect();
        let includes = dedup_lines(code.includes);
        debug!(
            loopers = code.loopers.len(),
            wrappers = counters.wrappers,
            controllers = counters.controllers,
            "project code prepared"
        );

        let mut put = |key: &str, value: String| {
            output.insert(key.to_string(), value);
        };
        put("includes", merge_lines(&includes, ""));
        put("handlers", merge_lines(&handlers, ""));
        put("publicObjects", merge_lines(&code.public_objects, ""));
        put("privateNamespace", namespace.clone());
        put("privateObjects", merge_lines(&code.private_objects, INDENT));
        put("loopersSection", loopers_section);
        put(
            "methodWrapperDeclarations",
            merge_lines(&code.wrapper_declarations, INDENT),
        );
        put("methodWrappersSection", merge_lines(&code.wrapper_definitions, ""));
        put("eepromVars", merge_lines(&code.eeprom_vars, ""));
        put("eepromVarsInitialization", merge_lines(&code.eeprom_init, INDENT));
        put("setup", merge_lines(&code.setup, INDENT));
        put("loop", merge_lines(&code.loop_code, INDENT));
        Ok(())
    }

    fn generate(
        &self,
        cx: &GenerationContext<'_>,
        _state: &SharedState,
        output: &Output,
        artifacts: &mut Artifacts,
    ) -> Result<()> {
        let content = render_template("acp_core.cpp", output)?;
        artifacts.write(&cx.settings.source_dir().join(CORE_SOURCE_FILE), &content)
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// EEPROM
// ══════════════════════════════════════════════════════════════════════════════

fn eeprom_variables(
    cx: &GenerationContext<'_>,
    state: &mut SharedState,
    code: &mut CodeBuffer,
    namespace: &str,
) -> Result<()> {
    let layout = eeprom::allocate(cx.platform, &cx.project.eeprom)?;
    state.eeprom_usage = layout.usage;
    state.eeprom_externs = layout.slots.iter().map(|s| s.extern_declaration()).collect();
    if layout.is_empty() {
        return Ok(());
    }

    code.includes.push(format!("#include <{EEPROM_HEADER_FILE}>"));
    code.eeprom_vars = layout.declarations();
    for slot in &layout.slots {
        if let Some(statement) = slot.initialization(cx.platform)? {
            code.eeprom_init.push(statement);
        }
    }

    let version = VersionMode::parse(&cx.project.eeprom_layout_version)?.version(&code.eeprom_vars);
    debug!(usage = layout.usage, version, "eeprom layout");

    code.setup.push("// Initialize eeprom variables".into());
    code.setup.push("eeprom_busy_wait();".into());
    for slot in &layout.slots {
        code.setup.push(format!("{}.init();", slot.item.name));
    }
    code.setup.push("// Set default value of eeprom variables (if necessary)".into());
    code.setup.push(format!("if (!{namespace}::checkEepromVersion({version}ul)) {{"));
    code.setup.push(format!("{INDENT}{namespace}::initializeEepromVars();"));
    code.setup.push(format!("{INDENT}{namespace}::writeEepromVersion({version}ul);"));
    code.setup.push("}".into());
    Ok(())
}

// ══════════════════════════════════════════════════════════════════════════════
// Components
// ══════════════════════════════════════════════════════════════════════════════

fn component_objects(
    cx: &GenerationContext<'_>,
    state: &mut SharedState,
    code: &mut CodeBuffer,
    counters: &mut Counters,
    component: &Component,
    component_type: &ComponentType,
) -> Result<()> {
    let module_path = acp_types::module_path(&component.type_name);
    let include = |file: &str| merge_slashes(&format!("#include <{module_path}/{file}>"));

    if let Some(controller) = &component_type.controller {
        code.includes.extend(controller.includes.iter().map(|f| include(f)));
        controller_code(cx, state, code, counters, component, component_type, controller)?;
    }

    if let Some(view) = &component_type.view {
        code.includes.extend(view.includes.iter().map(|f| include(f)));
        let replacements = instance::component_replacements(cx, state, component, component_type);
        code.public_objects
            .push(instance::declaration(view, &component.name, &replacements));
    }
    Ok(())
}

fn controller_code(
    cx: &GenerationContext<'_>,
    state: &mut SharedState,
    code: &mut CodeBuffer,
    counters: &mut Counters,
    component: &Component,
    component_type: &ComponentType,
    controller: &Instance,
) -> Result<()> {
    let namespace = state.private_namespace.clone();
    let object = format!("controller_{}", counters.controllers);
    let qualified = format!("{namespace}::{object}");
    counters.controllers += 1;
    state.set_autogenerated(&component.name, "controller", qualified.as_str());

    let comment = format!("// Controller for {}", component.name);
    let setup_mark = code.setup.len();
    code.setup.push(comment.clone());

    // Loopers
    for looper in &component_type.loopers {
        if let Some(binding) = &looper.id_binding {
            let id = code.loopers.len().to_string();
            code.setup.push(binding.render(&qualified, &id));
        }
        code.loopers.push(LooperRecord::resolve(
            &qualified,
            &looper.method,
            &looper.interval,
            &looper.initial_delay,
            component,
            component_type,
        )?);
    }

    // Properties
    for property in &component_type.properties {
        let Some(binding) = &property.binding else {
            continue;
        };
        let value = property.effective_value(component.property(&property.name));
        let escaped = cx.platform.escape_value(&property.ty, value).ok_or_else(|| {
            AcpError::compile(format!(
                "Invalid or undefined value of property {} of component {}.",
                property.name, component.name
            ))
        })?;
        code.setup.push(binding.render(&qualified, &escaped));
    }

    // Events
    for event in &component_type.events {
        let Some(binding) = &event.binding else {
            continue;
        };
        match component.events.get(&event.name) {
            Some(handler) => {
                code.setup.push(binding.render(&qualified, handler));
                code.handlers.push(event.handler_header(handler, false));
            }
            None => code.setup.push(binding.render(&qualified, "NULL")),
        }
    }

    // Method wrappers
    for wrapper in &component_type.method_wrappers {
        let name = format!("method_wrapper_{}", counters.wrappers);
        let wrapper_qualified = format!("{namespace}::{name}");
        counters.wrappers += 1;

        let header = wrapper.header(&name);
        let call = wrapper.invocation(&format!("{qualified}.{}", wrapper.method));
        code.wrapper_declarations.push(format!("{header};"));
        code.wrapper_definitions.push(format!("{header} {{"));
        if wrapper.returns_value() {
            code.wrapper_definitions.push(format!("{INDENT}return {call};"));
        } else {
            code.wrapper_definitions.push(format!("{INDENT}{call};"));
        }
        code.wrapper_definitions.push("}".into());
        code.wrapper_definitions.push(String::new());

        if let Some(property) = wrapper
            .autogenerated_property
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
        {
            state.set_autogenerated(&component.name, property, wrapper_qualified.as_str());
        }
        if let Some(binding) = &wrapper.binding {
            code.setup.push(binding.render(&qualified, &wrapper_qualified));
        }
    }

    // View binding
    if let (Some(_), Some(binding)) = (&component_type.view, &component_type.view_binding) {
        code.setup.push(binding.render(&qualified, &component.name));
    }

    let replacements = instance::component_replacements(cx, state, component, component_type);
    if let Some(init) = &controller.init {
        code.setup
            .push(instance::invocation(init, &qualified, &replacements));
    }
    if let Some(call) = &controller.loop_call {
        code.loop_code
            .push(instance::invocation(call, &qualified, &replacements));
    }

    if code.setup.len() == setup_mark + 1 {
        code.setup.truncate(setup_mark);
    }

    code.private_objects.push(comment);
    code.private_objects
        .push(instance::declaration(controller, &object, &replacements));
    Ok(())
}

// ══════════════════════════════════════════════════════════════════════════════
// Program
// ══════════════════════════════════════════════════════════════════════════════

fn program_events(cx: &GenerationContext<'_>, code: &mut CodeBuffer) {
    if let Some(handler) = cx.project.program_event(ON_START) {
        code.setup.push(format!("// Call of the {ON_START} event"));
        code.setup.push(format!("{handler}();"));
        code.handlers.push(format!("void {handler}()"));
    }
    if let Some(handler) = cx.project.program_event(ON_LOOP) {
        code.loop_code.push(format!("// Call of the {ON_LOOP} event"));
        code.loop_code.push(format!("{handler}();"));
        code.handlers.push(format!("void {handler}()"));
    }
}

fn watchdog(cx: &GenerationContext<'_>, code: &mut CodeBuffer) {
    let Some(requested) = cx.project.watchdog_level else {
        return;
    };
    let level = cx.platform.watchdog_level(requested);
    code.includes.push("#include <avr/wdt.h>".into());
    code.setup.insert(0, "wdt_disable();".into());
    code.setup.push(format!("wdt_enable({level});"));
    code.loop_code.insert(0, "wdt_reset();".into());
}

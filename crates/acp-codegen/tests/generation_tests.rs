//! End-to-end generation tests: project model → files on disk.

use acp_codegen::{standard_pipeline, GenerationContext, SharedState, PRIVATE_NAMESPACE};
use acp_platform::{Platform, PlatformRegistry};
use acp_types::{
    Binding, Component, ComponentType, EepromItem, Event, Instance, Looper, MethodCall,
    MethodWrapper, Module, ModuleKind, ModuleMap, Parameter, Project, PropertyType, Settings,
    Timing, ValueKind, ON_START,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

// ══════════════════════════════════════════════════════════════════════════════
// Helpers
// ══════════════════════════════════════════════════════════════════════════════

fn platform(name: &str) -> Platform {
    PlatformRegistry::new().get(name).cloned().unwrap()
}

fn module(name: &str, ct: ComponentType) -> (String, Module) {
    let dir = format!("/modules/{}", name.replace('.', "/"));
    (name.to_string(), Module::new(name, dir, ModuleKind::ComponentType(ct)))
}

/// A controller with one attribute-bound property and one looper.
fn ticker_type() -> ComponentType {
    let mut looper = Looper::new("tick");
    looper.interval = Timing::parse("100");
    ComponentType {
        controller: Some(Instance::new("Ticker")),
        properties: vec![PropertyType::new("level", "int").with_binding(Binding::attribute("level"))],
        loopers: vec![looper],
        ..Default::default()
    }
}

/// A component type exercising views, events and method wrappers.
fn button_type() -> ComponentType {
    let mut controller = Instance::new("ButtonController<$pin>");
    controller.includes = vec!["Button.h".into()];
    controller.init = Some(MethodCall::new("begin", "$pin"));
    controller.loop_call = Some(MethodCall::new("poll", ""));

    let mut view = Instance::new("ButtonView");
    view.includes = vec!["ButtonView.h".into()];
    view.constructor = Some("$reader".into());

    let mut pressed = Event::new("pressed");
    pressed.parameters = vec![Parameter::new("int", Some("count".into())).unwrap()];
    pressed.binding = Some(Binding::method("setPressedHandler"));

    let mut released = Event::new("released");
    released.binding = Some(Binding::attribute("releasedHandler"));

    let mut reader = MethodWrapper::new("isDown");
    reader.result_type = Some("bool".into());
    reader.autogenerated_property = Some("reader".into());

    ComponentType {
        controller: Some(controller),
        view: Some(view),
        view_binding: Some(Binding::method("attachView")),
        properties: vec![
            PropertyType::new("pin", "digital-pin").with_value(ValueKind::Default, "2"),
        ],
        events: vec![pressed, released],
        method_wrappers: vec![reader],
        ..Default::default()
    }
}

struct Generated {
    dir: TempDir,
    settings: Settings,
    state: SharedState,
}

impl Generated {
    fn read(&self, path: &Path) -> String {
        fs::read_to_string(path).unwrap_or_else(|e| panic!("{}: {e}", path.display()))
    }

    fn core(&self) -> String {
        self.read(&self.settings.source_dir().join("core.cpp"))
    }

    fn header(&self) -> String {
        self.read(&self.settings.project_header_file())
    }

    fn example(&self) -> String {
        self.read(&self.settings.example_file())
    }
}

fn generate(project: &Project, modules: &ModuleMap, platform_name: &str) -> Generated {
    let dir = tempfile::tempdir().unwrap();
    let settings = Settings::new("project.json", dir.path(), "Demo");
    let platform = platform(platform_name);
    let cx = GenerationContext::new(&settings, project, &platform, modules);
    let mut state = SharedState::new(PRIVATE_NAMESPACE);
    standard_pipeline().run(&cx, &mut state).unwrap();
    Generated {
        dir,
        settings,
        state,
    }
}

fn ticker_project(level: &str) -> (Project, ModuleMap) {
    let modules: ModuleMap = [module("acp.ticker", ticker_type())].into_iter().collect();
    let project = Project {
        components: vec![Component::new("acp.ticker", "ticker").with_property("level", level)],
        ..Default::default()
    };
    (project, modules)
}

// ══════════════════════════════════════════════════════════════════════════════
// Project source
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_property_binding_and_looper() {
    let (project, modules) = ticker_project("42");
    let out = generate(&project, &modules, "Arduino");
    let core = out.core();

    assert!(core.contains("  // Controller for ticker\n  Ticker controller_0;"));
    assert_eq!(core.matches("acp_private::controller_0.level = 42;").count(), 1);
    assert!(core.contains(
        "unsigned long looper_handler_0() {\n  acp_private::controller_0.tick();\n  return 100;\n}"
    ));
    assert_eq!(core.matches("ENABLED, looper_handler_").count(), 1);
    assert!(core.contains("{0, ENABLED, looper_handler_0}"));
    assert!(core.contains("  acp_private::processLoopers();"));
}

#[test]
fn test_events_views_and_wrappers() {
    let modules: ModuleMap = [module("acp.input.button", button_type())].into_iter().collect();
    let mut program_events = std::collections::BTreeMap::new();
    program_events.insert(ON_START.to_string(), "onStart".to_string());
    let project = Project {
        platform: "ArduinoUno".into(),
        components: vec![Component::new("acp.input.button", "button")
            .with_property("pin", "7")
            .with_event("pressed", "onPressed")],
        program_events,
        ..Default::default()
    };
    let out = generate(&project, &modules, "ArduinoUno");
    let core = out.core();

    assert!(core.contains("#include <acp/input/button/Button.h>"));
    assert!(core.contains("#include <acp/input/button/ButtonView.h>"));
    assert!(core.contains("extern void onPressed(int);"));
    assert!(core.contains("extern void onStart();"));
    assert!(core.contains("  bool method_wrapper_0();"));
    assert!(core.contains(
        "bool method_wrapper_0() {\n  return acp_private::controller_0.isDown();\n}"
    ));
    assert!(core.contains("ButtonView button(acp_private::method_wrapper_0);"));
    assert!(core.contains("  ButtonController<7> controller_0;"));
    assert!(core.contains("  acp_private::controller_0.setPressedHandler(onPressed);"));
    assert!(core.contains("  acp_private::controller_0.releasedHandler = NULL;"));
    assert!(core.contains("  acp_private::controller_0.attachView(button);"));
    assert!(core.contains("  acp_private::controller_0.begin(7);"));
    assert!(core.contains("  // Call of the OnStart event\n  onStart();"));
    assert!(core.contains("void loop() {\n  acp_private::controller_0.poll();\n}"));
    // No loopers, no scheduler.
    assert!(!core.contains("processLoopers"));

    let header = out.header();
    assert!(header.contains("extern ButtonView button;"));
    assert!(header.contains("#include <acp/input/button/ButtonView.h>"));
    assert!(header.contains("#define ACP_EEPROM_USAGE 0"));

    let example = out.example();
    assert!(example.starts_with("#include <Demo.h>"));
    assert!(example.contains("// button (acp.input.button)"));
    assert!(example.contains("// Event callback for Program.OnStart\nvoid onStart() {"));
    assert!(example.contains("// Event callback for button.pressed\nvoid onPressed(int count) {"));
}

#[test]
fn test_controller_without_setup_code_has_no_comment() {
    let ct = ComponentType {
        controller: Some(Instance::new("Idle")),
        ..Default::default()
    };
    let modules: ModuleMap = [module("acp.idle", ct)].into_iter().collect();
    let project = Project {
        components: vec![Component::new("acp.idle", "idle")],
        ..Default::default()
    };
    let core = generate(&project, &modules, "Arduino").core();
    assert!(core.contains("void setup() {\n\n}"));
    assert!(core.contains("  // Controller for idle\n  Idle controller_0;"));
}

// ══════════════════════════════════════════════════════════════════════════════
// EEPROM and watchdog
// ══════════════════════════════════════════════════════════════════════════════

fn eeprom_project(version: &str) -> Project {
    Project {
        eeprom: vec![
            EepromItem::variable("counter", "int").with_value("42"),
            EepromItem::array("samples", "byte", 8).cached(),
        ],
        eeprom_layout_version: version.into(),
        ..Default::default()
    }
}

#[test]
fn test_eeprom_layout_and_setup() {
    let out = generate(&eeprom_project("7"), &ModuleMap::new(), "Arduino");
    assert_eq!(out.state.eeprom_usage, 4 + 2 + 8);

    let core = out.core();
    assert!(core.contains("acp::EEPROMVar<int, 4> counter;"));
    assert!(core.contains("acp::EEPROMCachedArray<byte, 6, 8> samples;"));
    assert!(core.contains("  counter.setValue(42);"));
    assert!(core.contains(
        "  eeprom_busy_wait();\n  counter.init();\n  samples.init();"
    ));
    assert!(core.contains("  if (!acp_private::checkEepromVersion(7ul)) {"));
    assert!(core.contains("    acp_private::writeEepromVersion(7ul);"));

    let header = out.header();
    assert!(header.contains("#include <acp/eeprom_vars.h>"));
    assert!(header.contains("extern acp::EEPROMVar<int, 4> counter;"));
    assert!(header.contains("#define ACP_EEPROM_USAGE 14"));

    assert!(out.settings.include_dir().join("acp/eeprom_vars.h").is_file());
    assert!(out.settings.source_dir().join("eeprom_vars.cpp").is_file());
    assert!(out.example().contains("#include <EEPROM.h>"));
    assert!(out
        .example()
        .contains("// samples (eeprom array of type byte with length 8)"));
}

#[test]
fn test_no_eeprom_files_without_items() {
    let (project, modules) = ticker_project("1");
    let out = generate(&project, &modules, "Arduino");
    assert_eq!(out.state.eeprom_usage, 0);
    assert!(!out.settings.include_dir().join("acp/eeprom_vars.h").exists());
    assert!(!out.settings.source_dir().join("eeprom_vars.cpp").exists());
    assert!(!out.example().contains("EEPROM.h"));
}

#[test]
fn test_hash_version_is_stable() {
    let version_line = |out: &Generated| {
        out.core()
            .lines()
            .find(|l| l.contains("checkEepromVersion("))
            .map(str::to_string)
            .unwrap()
    };
    let a = generate(&eeprom_project(""), &ModuleMap::new(), "Arduino");
    let b = generate(&eeprom_project("hash"), &ModuleMap::new(), "Arduino");
    assert_eq!(version_line(&a), version_line(&b));
}

#[test]
fn test_watchdog_is_clamped() {
    let project = Project {
        watchdog_level: Some(12),
        ..Default::default()
    };
    let core = generate(&project, &ModuleMap::new(), "Arduino").core();
    assert!(core.contains("#include <avr/wdt.h>"));
    assert!(core.contains("void setup() {\n  wdt_disable();"));
    assert!(core.contains("  wdt_enable(9);\n}"));
    assert!(core.contains("void loop() {\n  wdt_reset();"));
}

// ══════════════════════════════════════════════════════════════════════════════
// Library files
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_core_header_and_properties() {
    let (project, modules) = ticker_project("1");
    let out = generate(&project, &modules, "Arduino");
    let core_h = out.read(&out.settings.include_dir().join("acp/core.h"));
    assert!(core_h.contains("#define ACP_DEBUG 0"));
    let props = out.read(&out.settings.library_properties_file());
    assert!(props.contains("name=Demo"));
    assert!(out.dir.path().join("Demo").is_dir());
}

#[test]
fn test_generation_is_deterministic() {
    let (project, modules) = ticker_project("42");
    let mut project = project;
    project.eeprom = eeprom_project("").eeprom;
    let files = ["src/sources/core.cpp", "src/Demo.h", "examples/DemoSkeleton/DemoSkeleton.ino"];

    let first = generate(&project, &modules, "Arduino");
    for _ in 0..5 {
        let again = generate(&project, &modules, "Arduino");
        for file in files {
            assert_eq!(
                first.read(&first.settings.library_dir().join(file)),
                again.read(&again.settings.library_dir().join(file)),
                "{file} differs between runs"
            );
        }
    }
}

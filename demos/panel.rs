//! Terminal stand-in for the hardware panel.
//!
//! Usage: `cargo run --example panel [state.json] [bindings.json]`
//! F1-F5 pick an engine, space toggles play, Esc quits. The engine selection
//! is written back to the state file on exit; the log goes to `panel.log`.

use std::env;
use std::sync::Arc;

use instrument_ui::logging::FileSink;
use instrument_ui::{
    CliDriver, EngineRegistry, ErrorCode, ExitHandler, ExitSignal, KeyBindings, LogLevel, Logger,
    ProcessExit, RouterConfig, RouterServices, Size, StateStore, TransportState, UiRouter,
    UiRuntime,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = env::args().skip(1);
    let state_path = args.next().unwrap_or_else(|| "panel_state.json".to_string());
    let bindings = match args.next() {
        Some(path) => KeyBindings::from_path(path)?,
        None => KeyBindings::default(),
    };

    let logger = Logger::new(FileSink::new("panel.log", 1 << 20)?).with_min_level(LogLevel::Debug);
    let mut router_config = RouterConfig::default();
    router_config.logger = Some(logger.clone());
    router_config.enable_metrics();

    let exit = Arc::new(ExitSignal::new());
    let services = RouterServices {
        engines: Arc::new(EngineRegistry::with_panel_engines()),
        transport: Arc::new(TransportState::new()),
        exit: exit.clone(),
    };
    let mut router = UiRouter::with_config(services, router_config);

    let mut store = StateStore::open(&state_path)?;
    router.init(&mut store);
    store.load_into(&mut router)?;

    let mut runtime = UiRuntime::new(router, exit.clone(), Size::new(80, 24)).with_bindings(bindings);
    runtime.config_mut().logger = Some(logger);

    let runtime = CliDriver::new(runtime).run()?;
    store.save_from(runtime.router())?;
    store.flush()?;

    ProcessExit.exit(exit.requested().unwrap_or(ErrorCode::None));
    Ok(())
}

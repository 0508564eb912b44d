mod command;

use std::fs::File;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use slopes_core::analytics::LogSink;
use slopes_core::config::Config;
use slopes_core::effects::EffectTriggers;
use slopes_core::persistence::{JsonFileStore, MemoryStore, ParameterStore};
use slopes_core::Store;
use slopes_types::{Dispatcher, Parameters, ReadModel};

use command::{Command, HELP};

fn init_logging(verbose: bool) {
    use simplelog::*;

    let log_level = if verbose { LevelFilter::Debug } else { LevelFilter::Warn };

    let log_path = dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("slopes")
        .join("slopes.log");

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let log_file = match File::create(&log_path).or_else(|_| File::create(std::env::temp_dir().join("slopes.log"))) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("logging disabled: {}", e);
            return;
        }
    };

    if WriteLogger::init(log_level, simplelog::Config::default(), log_file).is_err() {
        eprintln!("logging disabled: logger already set");
        return;
    }

    log::info!("slopes starting (log level: {:?})", log_level);
}

fn read_override(path: &str) -> io::Result<Parameters> {
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

fn print_model(out: &mut impl Write, model: &ReadModel) -> io::Result<()> {
    let json = serde_json::to_string_pretty(model).map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    writeln!(out, "{}", json)
}

fn main() -> io::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let verbose = args.iter().any(|a| a == "--verbose" || a == "-v");
    let fresh = args.iter().any(|a| a == "--fresh");
    let params_path = args.iter()
        .position(|a| a == "--params")
        .and_then(|i| args.get(i + 1).cloned());
    init_logging(verbose);

    let override_params = match params_path {
        Some(path) => Some(read_override(&path).map_err(|e| {
            eprintln!("could not read {}: {}", path, e);
            e
        })?),
        None => None,
    };

    let config = Config::load();
    let disk: Arc<dyn ParameterStore> = Arc::new(JsonFileStore::new(config.storage_path()));
    // --fresh ignores the last session but still saves this one
    let initial: Arc<dyn ParameterStore> = if fresh { Arc::new(MemoryStore::new()) } else { Arc::clone(&disk) };

    let effects = EffectTriggers::from_config(&config, disk, Arc::new(LogSink));
    let mut store = Store::open(config.coalesce_window(), override_params, initial.as_ref(), effects);

    let stdin = io::stdin();
    let mut out = io::stdout().lock();
    print_model(&mut out, &store.read_model())?;

    for line in stdin.lock().lines() {
        let line = line?;
        match command::parse(&line) {
            Ok(Command::Dispatch(action)) => match store.dispatch(&action) {
                Ok(model) => print_model(&mut out, &model)?,
                Err(e) => writeln!(out, "error: {}", e)?,
            },
            Ok(Command::Show) => {
                print_model(&mut out, &store.read_model())?;
                writeln!(out, "undo steps: {}", store.state().history.len())?;
            }
            Ok(Command::Help) => writeln!(out, "{}", HELP)?,
            Ok(Command::Quit) => break,
            Err(command::ParseError::Empty) => {}
            Err(e) => writeln!(out, "error: {}", e)?,
        }
        out.flush()?;
    }

    log::info!("slopes exiting");
    Ok(())
}

use sdui_engine::{parse_messages, EngineError, Processor};
use std::env;
use std::fs;
use std::process;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: sdui-replay <messages.json>...");
        eprintln!();
        eprintln!("Each file holds a JSON array of protocol messages. Files are");
        eprintln!("replayed in order into one processor; the resulting surfaces");
        eprintln!("are printed as JSON.");
        process::exit(1);
    }

    let mut processor = Processor::new();
    let mut exit_code = 0;

    for file_path in &args[1..] {
        match replay_file(&mut processor, file_path) {
            Ok(()) => {
                println!("✓ replayed {}", file_path);
            }
            Err(e) => {
                eprintln!("✗ {} failed:", file_path);
                eprintln!("  {}", e);
                exit_code = 1;
            }
        }
    }

    match serde_json::to_string_pretty(processor.surfaces()) {
        Ok(rendered) => println!("{}", rendered),
        Err(e) => {
            eprintln!("Failed to render surfaces: {}", e);
            exit_code = 1;
        }
    }

    process::exit(exit_code);
}

fn replay_file(processor: &mut Processor, path: &str) -> Result<(), EngineError> {
    let content = fs::read_to_string(path)
        .map_err(|e| EngineError::Decode(serde_json::Error::io(e)))?;
    let messages = parse_messages(&content)?;
    processor.process_messages(&messages)
}

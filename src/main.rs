use std::path::PathBuf;
use std::time::Instant;

use log::{error, info};

use distspell::engine::run_and_write;

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() != 3 {
        eprintln!("usage: {} <dictionary_path> <query_list_path>", args.first().map(String::as_str).unwrap_or("distspell"));
        std::process::exit(1);
    }
    let dict_path = PathBuf::from(&args[1]);
    let query_path = PathBuf::from(&args[2]);

    let size = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    info!("world size resolved to {size} worker(s)");

    let start = Instant::now();
    match run_and_write(&dict_path, &query_path, size) {
        Ok(count) => {
            info!(
                "done: {count} misspelled word(s) written to {} in {:?} total",
                distspell::assembler::OUTPUT_PATH,
                start.elapsed()
            );
        }
        Err(err) => {
            error!("job aborted: {err}");
            std::process::exit(1);
        }
    }
}

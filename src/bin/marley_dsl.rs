use std::env;
use marley::demos::cli::{run_file, run_prompt, HAD_GRAMMAR_ERROR, HAD_PARSE_FAILURE};

pub fn main() -> std::io::Result<()> {
    let _ = flexi_logger::Logger::try_with_env_or_str("info").and_then(|logger| logger.start());

    let args: Vec<String> = env::args().collect();
    // args always includes the program name in args[0]
    match args.len() {
        1 => {
            run_prompt()?;
        }
        2 => {
            let mut line = String::new();
            std::io::stdin().read_line(&mut line)?;
            run_file(&args[1], line.trim_end())?;
        }
        _ => {
            println!("Usage: marley-dsl [grammar-file]");
            std::process::exit(64);
        }
    }

    if HAD_GRAMMAR_ERROR.load(std::sync::atomic::Ordering::Relaxed) {
        std::process::exit(65);
    }
    if HAD_PARSE_FAILURE.load(std::sync::atomic::Ordering::Relaxed) {
        std::process::exit(70);
    }
    Ok(())
}

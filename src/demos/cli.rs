use encoding_rs_io::DecodeReaderBytesBuilder;
use std::io::{self, Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::demos::dsl_reducer::load_grammar;
use crate::demos::tokenize_input;
use crate::make_marley;

/*
A thin demonstration binary's backing library code, in the same split the
teacher uses in `runner/runner.rs`: a `run_*` entry point that does the
actual work and a process-exit-code convention driven by a couple of static
flags, with `main` itself staying a short dispatcher (see
`src/bin/marley_dsl.rs`).

Exit codes follow the teacher's convention of distinguishing a static/compile
error (bad grammar description) from a runtime error (the grammar rejected
the input), rather than collapsing both into one generic failure code.
*/

pub static HAD_GRAMMAR_ERROR: AtomicBool = AtomicBool::new(false);
pub static HAD_PARSE_FAILURE: AtomicBool = AtomicBool::new(false);

/// Load a grammar description from `path` (or stdin, if `path == "-"`),
/// decoding it from its detected encoding the way the teacher's
/// `run_file` decodes Lox source, then drive a parse over `input_line`.
pub fn run_file(path: &str, input_line: &str) -> io::Result<()> {
    let source = read_source(path)?;
    run(&source, input_line);
    Ok(())
}

/// A REPL: read one grammar-description line as the grammar, then one line
/// of input tokens per iteration, echoing the parser's status after each.
pub fn run_prompt() -> io::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    print!("grammar> ");
    stdout.flush()?;
    let mut grammar_source = String::new();
    stdin.lock().read_line_until_blank(&mut grammar_source)?;

    loop {
        print!("tokens> ");
        stdout.flush()?;
        let mut line = String::new();
        let bytes_read = stdin.read_line(&mut line)?;
        if bytes_read == 0 {
            break;
        }
        run(&grammar_source, line.trim_end());
        HAD_GRAMMAR_ERROR.store(false, Ordering::Relaxed);
        HAD_PARSE_FAILURE.store(false, Ordering::Relaxed);
    }
    Ok(())
}

fn run(grammar_source: &str, input_line: &str) {
    let (grammar, start_rule) = match load_grammar(grammar_source) {
        Ok(parsed) => parsed,
        Err(err) => {
            log::warn!("grammar description error: {err}");
            eprintln!("grammar error: {err}");
            HAD_GRAMMAR_ERROR.store(true, Ordering::Relaxed);
            return;
        }
    };

    let mut parser = make_marley(grammar, start_rule);
    parser.feed_many(tokenize_input(input_line));

    if parser.failed() {
        let reason = parser.get_failure().unwrap_or_default();
        log::info!("parse failed: {reason}");
        println!("failed: {reason}");
        HAD_PARSE_FAILURE.store(true, Ordering::Relaxed);
    } else if parser.finished() {
        log::info!("parse finished with {} result(s)", parser.results().len());
        println!("finished: {} parse(s)", parser.results().len());
    } else {
        println!("incomplete: valid prefix, more input expected");
    }
}

fn read_source(path: &str) -> io::Result<String> {
    let mut raw = Vec::new();
    if path == "-" {
        io::stdin().read_to_end(&mut raw)?;
    } else {
        std::fs::File::open(path)?.read_to_end(&mut raw)?;
    }
    let mut decoder = DecodeReaderBytesBuilder::new().build(raw.as_slice());
    let mut decoded = String::new();
    decoder.read_to_string(&mut decoded)?;
    Ok(decoded)
}

/// Small helper so the REPL's "paste a grammar, blank line to end" flow
/// reads like the teacher's line-at-a-time `run_prompt`.
trait ReadGrammarBlock {
    fn read_line_until_blank(&mut self, buf: &mut String) -> io::Result<()>;
}

impl<R: io::BufRead> ReadGrammarBlock for R {
    fn read_line_until_blank(&mut self, buf: &mut String) -> io::Result<()> {
        loop {
            let mut line = String::new();
            let bytes_read = self.read_line(&mut line)?;
            if bytes_read == 0 || line.trim().is_empty() {
                break;
            }
            buf.push_str(&line);
        }
        Ok(())
    }
}

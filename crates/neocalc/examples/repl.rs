//! Terminal calculator session backed by a JSON file
//!
//! Run with: cargo run --example repl -- [store.json] [config.yaml]
//!
//! Enter an expression to evaluate it. Commands:
//! `:history`, `:recall N`, `:clear`, `:theme`, `:ask QUESTION`, `:say TRANSCRIPT`, `:quit`.
//! Set `RUST_LOG=neocalc=debug` to see evaluator diagnostics.

use std::io::{self, BufRead, Write};

use neocalc::prelude::*;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let store_path = args.next().unwrap_or_else(|| "neocalc.json".to_string());
    let config = match args.next() {
        Some(path) => CalculatorConfig::load(path)?,
        None => CalculatorConfig::default(),
    };

    let store = FileStore::open(&store_path)?;
    let mut calc = Calculator::load(store, config)?;

    println!("NeoCalc ({} theme, {} saved entries)", calc.theme(), calc.history().len());
    println!("Type an expression, or :quit to exit.");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();

        match line.split_once(' ').unwrap_or((line, "")) {
            ("", _) => {}
            (":quit" | ":q", _) => break,
            (":history", _) => {
                for (i, entry) in calc.history().displays_rev().iter().enumerate() {
                    println!("{i:>3}  {entry}");
                }
            }
            (":recall", index) => match index.trim().parse() {
                Ok(index) if calc.recall(index) => println!("{}", calc.screen()),
                _ => println!("no such entry"),
            },
            (":clear", _) => {
                calc.clear_history();
                println!("history cleared");
            }
            (":theme", _) => println!("theme: {}", calc.toggle_theme()),
            (":ask", question) => {
                if let Some(answer) = calc.ask(question) {
                    println!("{answer}");
                }
            }
            (":say", transcript) => {
                calc.clear();
                calc.append_transcript(transcript);
                let expression = calc.expression().to_string();
                println!("{expression} = {}", render(&mut calc));
            }
            _ => {
                calc.set_expression(line);
                println!("{}", render(&mut calc));
            }
        }
    }

    Ok(())
}

fn render(calc: &mut Calculator<FileStore>) -> String {
    calc.calculate();
    calc.screen().to_string()
}

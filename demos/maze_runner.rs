//! Terminal maze-runner demo: animates A* over a text layout.
//!
//! Run: cargo run --bin maze-runner -- [LAYOUT_FILE] [--headless] [--record FILE]

use mazerun_demos::{Command, USAGE, parse_args, run};

fn main() {
    let opts = match parse_args(std::env::args().skip(1)) {
        Ok(Command::Run(opts)) => opts,
        Ok(Command::Help) => {
            println!("{USAGE}");
            return;
        }
        Err(e) => {
            eprintln!("Error: {e}\n\n{USAGE}");
            std::process::exit(2);
        }
    };

    match run(&opts) {
        Ok(summary) => {
            if opts.headless {
                println!("{}", summary.grid);
            }
            println!("{summary}");
            if let Some(path) = &opts.record {
                println!("recorded {} frames to {}", summary.frames, path.display());
            }
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

use argh::{EarlyExit, FromArgs};
use std::process::ExitCode;
use wish::Interpreter;
use wish::error::{self, ShellError};
use wish::io_adapters::{Batch, Interactive};

#[derive(FromArgs)]
/// Run commands typed at the prompt, or read them from a batch file.
struct Args {
    #[argh(positional)]
    /// file to read commands from; no prompt is shown in batch mode.
    batch: Option<String>,
}

fn parse_args() -> Result<Args, ShellError> {
    let argv: Vec<String> = std::env::args().collect();
    let argv: Vec<&str> = argv.iter().map(String::as_str).collect();
    let (name, rest) = match argv.split_first() {
        Some((name, rest)) => (*name, rest),
        None => ("wish", &[][..]),
    };
    match Args::from_args(&[name], rest) {
        Ok(args) => Ok(args),
        Err(EarlyExit { output, status: Ok(()) }) => {
            println!("{output}");
            std::process::exit(0)
        }
        Err(EarlyExit { status: Err(()), .. }) => Err(ShellError::Usage),
    }
}

fn run() -> anyhow::Result<()> {
    let args = parse_args()?;
    let mut interpreter = Interpreter::default();
    match args.batch {
        Some(path) => interpreter.repl(&mut Batch::open(path)?),
        None => {
            let prompt = interpreter.env().config.prompt.clone();
            interpreter.repl(&mut Interactive::new(prompt)?)
        }
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error::report(&*err);
            ExitCode::FAILURE
        }
    }
}

use chameleon_lang::config::{GrammarConfig, InterpreterConfig, InterpreterConfigBuilder};
use chameleon_lang::error::LangError;
use chameleon_lang::interpreter::{
    ConsoleInput, ConsoleOutput, DebugOutcome, Debugger, Evaluator, Interpreter, RuntimeError,
};

use std::env;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process;

const USAGE: &str = "usage: chameleon --execute-file <path> \
[--config-file <path>] [--debug|-d] \
[--base-assign <n>] [--base-input <n>] [--base-output <n>]";

struct Arguments {
    config_file: Option<String>,
    execute_file: String,
    debug_mode: bool,
    base_assign: u32,
    base_input: u32,
    base_output: u32,
}

fn parse_arguments(args: &[String]) -> Result<Arguments, String> {
    let mut config_file = None;
    let mut execute_file = None;
    let mut debug_mode = false;
    let mut base_assign = 10;
    let mut base_input = 10;
    let mut base_output = 10;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        let mut value = |flag: &str| {
            iter.next()
                .cloned()
                .ok_or_else(|| format!("missing value for {}", flag))
        };

        match arg.as_str() {
            "--debug" | "-d" => debug_mode = true,
            "--config-file" => config_file = Some(value("--config-file")?),
            "--execute-file" => execute_file = Some(value("--execute-file")?),
            "--base-assign" => base_assign = parse_base(&value("--base-assign")?)?,
            "--base-input" => base_input = parse_base(&value("--base-input")?)?,
            "--base-output" => base_output = parse_base(&value("--base-output")?)?,
            unknown => return Err(format!("unknown argument: {}", unknown)),
        }
    }

    let execute_file = match execute_file {
        Some(path) => path,
        None => return Err("no input file".to_string()),
    };

    Ok(Arguments {
        config_file,
        execute_file,
        debug_mode,
        base_assign,
        base_input,
        base_output,
    })
}

fn parse_base(text: &str) -> Result<u32, String> {
    text.parse::<u32>()
        .map_err(|_| format!("invalid base: {}", text))
}

struct ConsoleDebugger;

impl Debugger for ConsoleDebugger {
    fn enter_interactive_mode(&mut self) -> DebugOutcome {
        let stdout = io::stdout();
        let stdin = io::stdin();

        let mut line = String::new();
        {
            let mut out = stdout.lock();
            let _ = write!(out, "breakpoint hit, [c]ontinue or [q]uit: ");
            let _ = out.flush();
        }

        match stdin.lock().read_line(&mut line) {
            Ok(_) if line.trim() == "q" => DebugOutcome::Terminate,
            _ => DebugOutcome::Continue,
        }
    }
}

fn build_interpreter_config(arguments: &Arguments) -> Result<InterpreterConfig, LangError> {
    let config = InterpreterConfigBuilder::new()
        .assignment_base(arguments.base_assign)
        .input_base(arguments.base_input)
        .output_base(arguments.base_output)
        .debug_mode(arguments.debug_mode)
        .build()?;

    Ok(config)
}

fn run(arguments: &Arguments) -> Result<(), LangError> {
    let source = fs::read_to_string(&arguments.execute_file)
        .map_err(|error| LangError::Runtime(RuntimeError::Io(error)))?;

    let base_dir = Path::new(&arguments.execute_file)
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    // grammar configuration files are the INI collaborator's concern; the
    // flag is accepted for compatibility and the default grammar applies
    if let Some(path) = &arguments.config_file {
        eprintln!("note: ignoring configuration file `{}`", path);
    }
    let grammar = GrammarConfig::default();
    let config = build_interpreter_config(arguments)?;

    let mut output = ConsoleOutput::new();
    let mut input = ConsoleInput::new();
    let mut debugger = ConsoleDebugger;

    let debug: Option<&mut dyn Debugger> = if arguments.debug_mode {
        Some(&mut debugger)
    } else {
        None
    };

    let evaluator = Evaluator::new(&grammar, &config, &mut output, &mut input, debug, base_dir)?;
    Interpreter::new(evaluator).run(&source)
}

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();

    let arguments = match parse_arguments(&args) {
        Ok(arguments) => arguments,
        Err(message) => {
            eprintln!("{}", message);
            eprintln!("{}", USAGE);
            process::exit(-1);
        }
    };

    match run(&arguments) {
        Ok(()) => {}
        Err(LangError::Parse(error)) => {
            eprintln!("{}", error);
            if let Some(line) = error.context_line() {
                eprintln!("  {}", line);
            }
            process::exit(-1);
        }
        Err(error) => {
            eprintln!("{}", error);
            process::exit(-2);
        }
    }
}

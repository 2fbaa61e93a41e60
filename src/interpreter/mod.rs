mod error;
mod interpreter;
mod io;
mod object;

pub use error::{Result, RuntimeError};
pub use interpreter::{CancelToken, Evaluator, Interpreter};
pub use io::{ConsoleInput, ConsoleOutput, DebugOutcome, Debugger, InputSource, OutputSink};
pub use object::Value;

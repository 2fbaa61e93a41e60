use crate::config::{self, ConfigError, GrammarConfig, InterpreterConfig};
use crate::error::LangError;
use crate::interpreter::error::{Result, RuntimeError};
use crate::interpreter::io::{DebugOutcome, Debugger, InputSource, OutputSink};
use crate::interpreter::object::Value;
use crate::numeric::{convert, Numeric, NumericError};
use crate::parser::ast::{
    BinaryNode, BinaryOp, BlockNode, FunctionNode, LiteralKind, LiteralNode, Node, NodeKind,
    OutputNode, UnaryNode, UnaryOp, VariableNode, Visitor,
};
use crate::parser::Parser;
use crate::storage::Trie;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/*
   Stack-based tree walker. Expressions push their results onto one LIFO
   value stack; statements pop what they consume. Variables and functions
   live in two tries; a function call snapshots the variable trie, overlays
   the parameter bindings, and restores the snapshot when the body returns.
*/
pub struct Evaluator<'a> {
    grammar: &'a GrammarConfig,
    config: &'a InterpreterConfig,
    variables: Trie<Value>,
    functions: Trie<FunctionNode>,
    stack: Vec<Value>,
    output: &'a mut dyn OutputSink,
    input: &'a mut dyn InputSource,
    debugger: Option<&'a mut dyn Debugger>,
    base_dir: PathBuf,
}

impl<'a> Evaluator<'a> {
    pub fn new(
        grammar: &'a GrammarConfig,
        config: &'a InterpreterConfig,
        output: &'a mut dyn OutputSink,
        input: &'a mut dyn InputSource,
        debugger: Option<&'a mut dyn Debugger>,
        base_dir: PathBuf,
    ) -> config::Result<Evaluator<'a>> {
        if config.debug_mode() && debugger.is_none() {
            return Err(ConfigError::DebuggerRequired);
        }

        Ok(Evaluator {
            grammar,
            config,
            variables: Trie::identifiers(),
            functions: Trie::identifiers(),
            stack: vec![],
            output,
            input,
            debugger,
            base_dir,
        })
    }

    pub fn grammar(&self) -> &'a GrammarConfig {
        self.grammar
    }

    /// Seeds the function table from an already-parsed declaration list
    /// before the program itself runs.
    pub fn preload(&mut self, declarations: &Node) -> Result<()> {
        declarations.accept(self)
    }

    pub fn variable(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    fn pop_value(&mut self, context: &'static str) -> Result<Value> {
        self.stack.pop().ok_or(RuntimeError::StackUnderflow(context))
    }

    fn run_breakpoints(&mut self, node: &Node) -> Result<()> {
        if !self.config.debug_mode() {
            return Ok(());
        }

        let debugger = match self.debugger.as_mut() {
            Some(debugger) => debugger,
            None => return Ok(()),
        };

        for comment in node
            .leading_comments
            .iter()
            .chain(node.trailing_comments.iter())
        {
            if !comment.is_single || comment.text.trim() != "BREAKPOINT" {
                continue;
            }

            match debugger.enter_interactive_mode() {
                DebugOutcome::Continue => {}
                DebugOutcome::Terminate => return Err(RuntimeError::Terminated),
            }
        }

        Ok(())
    }

    fn apply_binary(
        op: BinaryOp,
        left: &Value,
        right: &Value,
    ) -> std::result::Result<Value, NumericError> {
        // legacy rule: `+` with a string operand concatenates renderings
        if op == BinaryOp::Add && (left.is_str() || right.is_str()) {
            return Ok(Value::Str(format!("{}{}", left, right)));
        }

        let left = left
            .as_numeric()
            .ok_or(NumericError::Unsupported("string operand"))?;
        let right = right
            .as_numeric()
            .ok_or(NumericError::Unsupported("string operand"))?;

        let result = match op {
            BinaryOp::Add => left.add(right),
            BinaryOp::Subtract => left.sub(right),
            BinaryOp::Multiply => left.mul(right),
            BinaryOp::Divide => left.div(right),
            BinaryOp::Modulo => left.rem(right),
            BinaryOp::Power => left.pow(right),
        }?;

        Ok(Value::Num(result))
    }

    fn render(&self, value: &Value) -> Result<String> {
        let rendered = match value {
            Value::Num(Numeric::Int(n)) => convert::to_base(i64::from(*n), self.config.output_base())?,
            Value::Num(Numeric::Long(n)) => convert::to_base(*n, self.config.output_base())?,
            Value::Num(Numeric::Double(n)) => convert::decimal_to_base(
                *n,
                self.config.output_base(),
                convert::MAX_FRACTION_DIGITS,
            )?,
            Value::Str(text) => text.clone(),
        };

        Ok(rendered)
    }
}

impl<'a> Visitor for Evaluator<'a> {
    type Error = RuntimeError;

    fn visit_list(&mut self, _node: &Node, members: &[Node]) -> Result<()> {
        for member in members {
            member.accept(self)?;
        }
        Ok(())
    }

    fn visit_block(&mut self, _node: &Node, block: &BlockNode) -> Result<()> {
        for statement in &block.statements {
            statement.accept(self)?;
        }
        Ok(())
    }

    fn visit_variable_declaration(&mut self, node: &Node, variables: &[Node]) -> Result<()> {
        self.run_breakpoints(node)?;

        for variable in variables {
            variable.accept(self)?;
        }
        Ok(())
    }

    fn visit_variable(&mut self, _node: &Node, variable: &VariableNode) -> Result<()> {
        if let Some(init) = &variable.init {
            init.accept(self)?;
            let value = self.pop_value("variable initializer")?;
            self.variables.insert(&variable.name, value)?;
            return Ok(());
        }

        if let Some(value) = self.variables.get(&variable.name) {
            let value = value.clone();
            self.stack.push(value);
            return Ok(());
        }

        // A letter-initiated numeral (`FF` in base 16) parses as a variable
        // reference; resolve the spelling as a literal before giving up.
        if let Ok(value) =
            convert::from_base(&variable.name, self.config.assignment_base(), false)
        {
            self.stack.push(Value::Num(Numeric::Long(value)));
            return Ok(());
        }

        Err(RuntimeError::UndefinedVariable(variable.name.clone()))
    }

    fn visit_literal(&mut self, _node: &Node, literal: &LiteralNode) -> Result<()> {
        match literal.kind {
            LiteralKind::Integer => {
                let value =
                    convert::from_base(&literal.token, self.config.assignment_base(), false)?;
                self.stack.push(Value::Num(Numeric::Long(value)));
            }
            LiteralKind::Float => {
                let value =
                    convert::decimal_from_base(&literal.token, self.config.assignment_base())?;
                self.stack.push(Value::Num(Numeric::Double(value)));
            }
            LiteralKind::String => {
                self.stack.push(Value::Str(literal.token.clone()));
            }
        }

        Ok(())
    }

    fn visit_binary(&mut self, _node: &Node, binary: &BinaryNode) -> Result<()> {
        binary.left.accept(self)?;
        binary.right.accept(self)?;

        let right = self.pop_value("binary operation right operand")?;
        let left = self.pop_value("binary operation left operand")?;

        let result = Self::apply_binary(binary.op, &left, &right)
            .map_err(|kind| RuntimeError::binary_numeric(binary.op, &left, &right, kind))?;
        self.stack.push(result);

        Ok(())
    }

    fn visit_unary(&mut self, _node: &Node, unary: &UnaryNode) -> Result<()> {
        unary.operand.accept(self)?;
        let operand = self.pop_value("unary operation operand")?;

        let numeric = operand.as_numeric().ok_or_else(|| {
            RuntimeError::unary_numeric(unary.op, &operand, NumericError::Unsupported("string operand"))
        })?;

        let result = match unary.op {
            UnaryOp::Not => numeric.not(),
            UnaryOp::Negate => numeric.neg(),
        }
        .map_err(|kind| RuntimeError::unary_numeric(unary.op, &operand, kind))?;

        self.stack.push(Value::Num(result));
        Ok(())
    }

    fn visit_return(&mut self, node: &Node, expression: Option<&Node>) -> Result<()> {
        self.run_breakpoints(node)?;

        // the result stays on the stack for the caller
        if let Some(expression) = expression {
            expression.accept(self)?;
        }
        Ok(())
    }

    fn visit_output(&mut self, _node: &Node, output: &OutputNode) -> Result<()> {
        let expression = match &output.expression {
            Some(expression) => expression,
            None => {
                self.output.write_blank_line()?;
                return Ok(());
            }
        };

        expression.accept(self)?;
        let value = self.pop_value("output statement")?;
        let rendered = self.render(&value)?;
        self.output.write_line(&rendered)?;

        Ok(())
    }

    fn visit_input(&mut self, _node: &Node, expression: Option<&Node>) -> Result<()> {
        let mut base = self.config.input_base();

        if let Some(expression) = expression {
            expression.accept(self)?;
            let selector = self.pop_value("input statement")?;
            // a value that does not parse as an integer keeps the
            // configured base
            if let Ok(parsed) = selector.to_string().parse::<u32>() {
                base = parsed;
            }
        }

        let line = match self.input.read_line()? {
            Some(line) => line,
            None => return Ok(()),
        };

        if line.trim().is_empty() {
            return Ok(());
        }

        let value = convert::from_base(line.trim(), base, false)?;
        self.stack.push(Value::Num(Numeric::Long(value)));

        Ok(())
    }

    fn visit_import(&mut self, _node: &Node, files: &[String]) -> Result<()> {
        for file in files {
            let path = Path::new(file);
            let full = if path.is_absolute() {
                path.to_path_buf()
            } else {
                self.base_dir.join(path)
            };

            if !full.exists() {
                return Err(RuntimeError::FileNotFound(full));
            }

            let source = fs::read_to_string(&full)?;
            let program = Parser::new(self.grammar, &source).parse()?;
            program.accept(self)?;
        }

        Ok(())
    }

    fn visit_function(&mut self, node: &Node, function: &FunctionNode) -> Result<()> {
        self.run_breakpoints(node)?;

        let stored = match self.functions.get(&function.name).cloned() {
            // first occurrence registers; functions are hoisted by first visit
            None => {
                self.functions.insert(&function.name, function.clone())?;
                return Ok(());
            }
            Some(stored) => {
                if function.body.is_some() && stored.body.is_none() {
                    // a forward declaration is resolved by its definition
                    self.functions.insert(&function.name, function.clone())?;
                    return Ok(());
                }
                stored
            }
        };

        // call: arguments evaluate left-to-right, bindings pop in reverse
        // declaration order
        for argument in &function.parameters {
            argument.accept(self)?;
        }

        let mut bindings = self.variables.clone();
        bindings.clear();
        for parameter in stored.parameters.iter().rev() {
            if let NodeKind::Parameter(parameter) = &parameter.kind {
                let value = self.pop_value("function call arguments")?;
                bindings.insert(&parameter.name, value)?;
            }
        }

        let saved = self.variables.clone();
        for (name, value) in bindings.iter() {
            self.variables.insert(&name, value.clone())?;
        }

        if let Some(body) = &stored.body {
            body.accept(self)?;
        }

        self.variables = saved;
        Ok(())
    }
}

/// Cooperative cancellation handle for the outer parse/evaluate boundary.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> CancelToken {
        CancelToken::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Parse-then-evaluate driver around one evaluator.
pub struct Interpreter<'a> {
    evaluator: Evaluator<'a>,
}

impl<'a> Interpreter<'a> {
    pub fn new(evaluator: Evaluator<'a>) -> Interpreter<'a> {
        Interpreter { evaluator }
    }

    pub fn run(&mut self, source: &str) -> std::result::Result<(), LangError> {
        let program = Parser::new(self.evaluator.grammar(), source).parse()?;
        program.accept(&mut self.evaluator)?;
        Ok(())
    }

    /// Checks the token once before starting; parsing and evaluation are
    /// never interrupted mid-flight.
    pub fn run_cancellable(
        &mut self,
        source: &str,
        cancel: &CancelToken,
    ) -> std::result::Result<(), LangError> {
        if cancel.is_cancelled() {
            return Err(LangError::Cancelled);
        }
        self.run(source)
    }

    pub fn evaluator(&self) -> &Evaluator<'a> {
        &self.evaluator
    }

    pub fn evaluator_mut(&mut self) -> &mut Evaluator<'a> {
        &mut self.evaluator
    }
}

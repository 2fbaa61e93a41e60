use crate::config::{AssignmentStyle, FunctionStyle, GrammarConfig};
use crate::parser::ast::{self, BinaryOp, BlockNode, Comment, Node, NodeKind, UnaryOp};
use crate::parser::error::{ParseError, Result};

// Zero-sized failure marker; the position and expectation of the deepest
// failure live on the parser itself.
struct Fail;

type Attempt<T> = std::result::Result<T, Fail>;

/*
   Invariants:
   (1) A parsing function consumes input only on success; every alternation
       goes through `attempt`, which rewinds the cursor on failure.
   (2) Token-level parsers skip leading whitespace themselves; comment
       consumption is interleaved with token parsing, never a separate pass.
   (3) `fail` records the furthest position any attempt reached, so the final
       error points at the most specific offender.
*/
#[derive(Debug)]
pub struct Parser<'a> {
    config: &'a GrammarConfig,
    source: &'a str,
    chars: Vec<char>,
    pos: usize,
    furthest: usize,
    expected: String,
}

impl<'a> Parser<'a> {
    pub fn new(config: &'a GrammarConfig, source: &'a str) -> Parser<'a> {
        Parser {
            config,
            source,
            chars: source.chars().collect(),
            pos: 0,
            furthest: 0,
            expected: String::new(),
        }
    }

    /// Parses a whole program into a single `List` node, consuming every
    /// trailing comment and all whitespace up to end-of-input.
    pub fn parse(mut self) -> Result<Node> {
        let members = self.many(Self::member);

        let trailing = self.comments();
        self.skip_whitespace();

        if !self.at_end() {
            return Err(self.error());
        }

        Ok(ast::list(members).with_trailing_comments(trailing))
    }

    /// Parses a single expression, requiring it to span the whole input.
    pub fn parse_expression(mut self) -> Result<Node> {
        let node = match self.expr() {
            Ok(node) => node,
            Err(Fail) => return Err(self.error()),
        };

        self.skip_whitespace();
        if !self.at_end() {
            return Err(self.error());
        }

        Ok(node)
    }

    // Cursor primitives

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn fail<T>(&mut self, expected: &str) -> Attempt<T> {
        if self.pos >= self.furthest {
            self.furthest = self.pos;
            self.expected = expected.to_string();
        }
        Err(Fail)
    }

    fn error(&self) -> ParseError {
        let pos = self.furthest.max(self.pos);
        let (line, column) = self.line_column(pos);
        let message = if self.expected.is_empty() {
            "unexpected input".to_string()
        } else {
            format!("expected {}", self.expected)
        };

        ParseError::new(line, column, self.source, message)
    }

    fn line_column(&self, pos: usize) -> (usize, usize) {
        let mut line = 1;
        let mut column = 1;

        for &ch in self.chars.iter().take(pos) {
            if ch == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }

        (line, column)
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if !ch.is_whitespace() {
                break;
            }
            self.pos += 1;
        }
    }

    fn match_str(&mut self, expected: &str) -> bool {
        let mut end = self.pos;
        for expected_ch in expected.chars() {
            match self.chars.get(end) {
                Some(&ch) if ch == expected_ch => end += 1,
                _ => return false,
            }
        }
        self.pos = end;
        true
    }

    fn match_str_ci(&mut self, expected: &str) -> bool {
        let mut end = self.pos;
        for expected_ch in expected.chars() {
            match self.chars.get(end) {
                Some(&ch) if ch.eq_ignore_ascii_case(&expected_ch) => end += 1,
                _ => return false,
            }
        }
        self.pos = end;
        true
    }

    // Runs `f`, rewinding the cursor if it fails.
    fn attempt<T, F>(&mut self, f: F) -> Attempt<T>
    where
        F: FnOnce(&mut Self) -> Attempt<T>,
    {
        let start = self.pos;
        let result = f(self);
        if result.is_err() {
            self.pos = start;
        }
        result
    }

    // <f>*
    fn many<T, F>(&mut self, f: F) -> Vec<T>
    where
        F: Fn(&mut Self) -> Attempt<T>,
    {
        let mut items = vec![];
        while let Ok(item) = self.attempt(&f) {
            items.push(item);
        }
        items
    }

    // (<f>(<sep><f>)*)*
    fn separated<T, F>(&mut self, f: F, sep: &str) -> Vec<T>
    where
        F: Fn(&mut Self) -> Attempt<T>,
    {
        let mut items = vec![];

        match self.attempt(&f) {
            Ok(item) => items.push(item),
            Err(Fail) => return items,
        }

        loop {
            let mark = self.pos;
            if self.attempt(|p| p.lexeme(sep)).is_err() {
                break;
            }
            match self.attempt(&f) {
                Ok(item) => items.push(item),
                Err(Fail) => {
                    // a dangling separator belongs to whatever follows
                    self.pos = mark;
                    break;
                }
            }
        }

        items
    }

    // Tokens

    fn lexeme(&mut self, expected: &str) -> Attempt<()> {
        self.skip_whitespace();
        if self.match_str(expected) {
            Ok(())
        } else {
            self.fail(&format!("`{}`", expected))
        }
    }

    // Case-insensitive keyword that must not continue as an identifier.
    fn keyword(&mut self, word: &str) -> Attempt<()> {
        self.skip_whitespace();
        let start = self.pos;

        if !self.match_str_ci(word) {
            return self.fail(&format!("`{}`", word));
        }

        if let Some(ch) = self.peek() {
            if ch.is_alphanumeric() || ch == '_' {
                self.pos = start;
                return self.fail(&format!("`{}`", word));
            }
        }

        Ok(())
    }

    fn identifier(&mut self) -> Attempt<String> {
        let config = self.config;
        self.skip_whitespace();
        let start = self.pos;

        match self.peek() {
            Some(ch) if ch.is_alphabetic() => self.pos += 1,
            _ => return self.fail("identifier"),
        }

        while let Some(ch) = self.peek() {
            if ch.is_alphanumeric() || ch == '_' {
                self.pos += 1;
            } else {
                break;
            }
        }

        let word: String = self.chars[start..self.pos].iter().collect();
        if config.is_reserved(&word) {
            self.pos = start;
            return self.fail("identifier");
        }

        Ok(word)
    }

    // Comments. These fail quietly (no expectation recorded): a missing
    // comment is never an error, and an unterminated multi-line comment
    // simply falls through.

    fn single_comment(&mut self) -> Attempt<Comment> {
        let config = self.config;

        if !self.match_str(config.single_comment()) {
            return Err(Fail);
        }

        let text_start = self.pos;
        let newline: Vec<char> = config.newline().chars().collect();
        while let Some(ch) = self.peek() {
            if newline.contains(&ch) {
                break;
            }
            self.pos += 1;
        }

        let text: String = self.chars[text_start..self.pos].iter().collect();
        Ok(Comment::single(text.trim()))
    }

    fn multi_comment(&mut self) -> Attempt<Comment> {
        let config = self.config;
        let start = self.pos;

        if !self.match_str(config.multi_open()) {
            return Err(Fail);
        }

        let text_start = self.pos;
        loop {
            if self.at_end() {
                self.pos = start;
                return Err(Fail);
            }

            let here = self.pos;
            if self.match_str(config.multi_close()) {
                let text: String = self.chars[text_start..here].iter().collect();
                return Ok(Comment::multi(text.trim()));
            }

            self.pos += 1;
        }
    }

    fn comment(&mut self) -> Attempt<Comment> {
        self.attempt(Self::single_comment)
            .or_else(|_| self.attempt(Self::multi_comment))
    }

    // Any run of comments, whitespace-separated.
    fn comments(&mut self) -> Vec<Comment> {
        let mut comments = vec![];
        loop {
            self.skip_whitespace();
            match self.comment() {
                Ok(comment) => comments.push(comment),
                Err(Fail) => break,
            }
        }
        comments
    }

    // Literals

    fn base36_digits(&mut self) -> Attempt<String> {
        let start = self.pos;

        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() {
                self.pos += 1;
            } else {
                break;
            }
        }

        if self.pos == start {
            return self.fail("literal");
        }

        Ok(self.chars[start..self.pos].iter().collect())
    }

    // Digit runs are kept as raw text; the evaluator reads them in the
    // configured assignment base.
    fn numeric_literal(&mut self) -> Attempt<Node> {
        self.skip_whitespace();
        let integer_part = self.base36_digits()?;

        let mark = self.pos;
        if self.match_str(".") {
            if let Ok(fraction) = self.base36_digits() {
                return Ok(ast::float_literal(format!("{}.{}", integer_part, fraction)));
            }
            self.pos = mark;
        }

        Ok(ast::integer_literal(integer_part))
    }

    // Single-quoted; backslash escapes are preserved verbatim for the
    // evaluator.
    fn string_literal_text(&mut self) -> Attempt<String> {
        self.skip_whitespace();
        let start = self.pos;

        if !self.match_str("'") {
            return self.fail("string literal");
        }

        let mut text = String::new();
        loop {
            match self.peek() {
                None => {
                    self.pos = start;
                    return self.fail("closed string literal");
                }
                Some('\'') => {
                    self.pos += 1;
                    return Ok(text);
                }
                Some('\\') => {
                    self.pos += 1;
                    match self.peek() {
                        Some(escaped) => {
                            text.push('\\');
                            text.push(escaped);
                            self.pos += 1;
                        }
                        None => {
                            self.pos = start;
                            return self.fail("closed string literal");
                        }
                    }
                }
                Some(ch) => {
                    text.push(ch);
                    self.pos += 1;
                }
            }
        }
    }

    fn literal(&mut self) -> Attempt<Node> {
        self.attempt(Self::numeric_literal)
            .or_else(|_| self.attempt(|p| p.string_literal_text().map(ast::string_literal)))
    }

    // Expressions, loosest to tightest: expr > term > inner_term > operand.

    // <term> ((<+>|<->) <term>)*
    fn expr(&mut self) -> Attempt<Node> {
        let config = self.config;
        let mut left = self.term()?;

        loop {
            let op = if self.attempt(|p| p.lexeme(config.plus())).is_ok() {
                BinaryOp::Add
            } else if self.attempt(|p| p.lexeme(config.minus())).is_ok() {
                BinaryOp::Subtract
            } else {
                break;
            };

            let right = self.term()?;
            left = ast::binary(op, left, right);
        }

        Ok(left)
    }

    // <inner_term> ((<*>|</>|<%>) <inner_term>)*
    fn term(&mut self) -> Attempt<Node> {
        let config = self.config;
        let mut left = self.inner_term()?;

        loop {
            let op = if self.attempt(|p| p.lexeme(config.multiply())).is_ok() {
                BinaryOp::Multiply
            } else if self.attempt(|p| p.lexeme(config.divide())).is_ok() {
                BinaryOp::Divide
            } else if self.attempt(|p| p.lexeme(config.modulo())).is_ok() {
                BinaryOp::Modulo
            } else {
                break;
            };

            let right = self.inner_term()?;
            left = ast::binary(op, left, right);
        }

        Ok(left)
    }

    // <operand> (<^> <inner_term>)?   right-associative
    fn inner_term(&mut self) -> Attempt<Node> {
        let config = self.config;
        let left = self.operand()?;

        if self.attempt(|p| p.lexeme(config.power())).is_ok() {
            let right = self.inner_term()?;
            return Ok(ast::binary(BinaryOp::Power, left, right));
        }

        Ok(left)
    }

    // Optional prefix negate around a factor; trailing comments attach to
    // the finished operand.
    fn operand(&mut self) -> Attempt<Node> {
        let config = self.config;

        let node = if self.attempt(|p| p.lexeme(config.minus())).is_ok() {
            let factor = self.factor()?;
            ast::unary(UnaryOp::Negate, factor)
        } else {
            self.factor()?
        };

        let trailing = self.comments();
        Ok(node.with_trailing_comments(trailing))
    }

    fn factor(&mut self) -> Attempt<Node> {
        self.attempt(Self::paren_factor)
            .or_else(|_| self.attempt(Self::input_expression))
            .or_else(|_| self.attempt(Self::not_expression))
            .or_else(|_| self.attempt(Self::call_expression))
            .or_else(|_| self.attempt(Self::variable_expression))
            .or_else(|_| self.attempt(Self::literal))
    }

    fn paren_factor(&mut self) -> Attempt<Node> {
        self.lexeme("(")?;
        let expr = self.expr()?;
        self.lexeme(")")?;
        Ok(expr)
    }

    // <(> <expr>? <)>
    fn paren_inner(&mut self) -> Attempt<Option<Node>> {
        self.lexeme("(")?;
        let expr = self.attempt(Self::expr).ok();
        self.lexeme(")")?;
        Ok(expr)
    }

    fn input_expression(&mut self) -> Attempt<Node> {
        let config = self.config;
        self.keyword(config.input_keyword())?;
        self.comments();
        let expr = self.paren_inner()?;
        Ok(ast::input_stmt(expr))
    }

    fn not_expression(&mut self) -> Attempt<Node> {
        let config = self.config;
        self.lexeme(config.not_op())?;
        self.comments();
        match self.paren_inner()? {
            Some(operand) => Ok(ast::unary(UnaryOp::Not, operand)),
            None => self.fail("expression"),
        }
    }

    // <name><(><args><)> or <(><args><)><name>, per the configured style.
    fn call_expression(&mut self) -> Attempt<Node> {
        match self.config.function_style() {
            FunctionStyle::NameFirst => {
                let name = self.identifier()?;
                let arguments = self.call_arguments()?;
                Ok(ast::call(name, arguments))
            }
            FunctionStyle::ParamsFirst => {
                let arguments = self.call_arguments()?;
                let name = self.identifier()?;
                Ok(ast::call(name, arguments))
            }
        }
    }

    fn call_arguments(&mut self) -> Attempt<Vec<Node>> {
        self.lexeme("(")?;
        let arguments = self.separated(Self::expr, ",");
        self.lexeme(")")?;
        Ok(arguments)
    }

    fn variable_expression(&mut self) -> Attempt<Node> {
        let name = self.identifier()?;
        Ok(ast::variable(name, None))
    }

    // Statements

    // One assignment or reference, ordered by the configured style.
    fn variable_stmt(&mut self) -> Attempt<Node> {
        let config = self.config;

        match config.assignment_style() {
            AssignmentStyle::NameFirst => {
                let name = self.identifier()?;
                let comments = self.comments();
                let init = if self.attempt(|p| p.lexeme(config.assign())).is_ok() {
                    Some(self.expr()?)
                } else {
                    None
                };
                Ok(ast::variable(name, init).with_trailing_comments(comments))
            }
            AssignmentStyle::ValueFirst => {
                let init = self.expr()?;
                self.lexeme(config.assign())?;
                let name = self.identifier()?;
                let comments = self.comments();
                Ok(ast::variable(name, Some(init)).with_trailing_comments(comments))
            }
        }
    }

    // <variable>(<,><variable>)*<;>
    fn variable_declaration(&mut self) -> Attempt<Node> {
        let variables = self.separated(Self::variable_stmt, ",");
        if variables.is_empty() {
            return self.fail("variable declaration");
        }
        self.lexeme(";")?;
        let trailing = self.comments();
        Ok(ast::variable_declaration(variables).with_trailing_comments(trailing))
    }

    // <keyword> <expr>? <;> — the shared shape of return/output/input. The
    // expression may be parenthesized or bare.
    fn keyword_expression(
        &mut self,
        word: &str,
        with_paren: bool,
    ) -> Attempt<(Option<Node>, Vec<Comment>)> {
        self.keyword(word)?;
        self.comments();

        let expr = if with_paren {
            match self.attempt(Self::paren_inner) {
                Ok(inner) => inner,
                Err(Fail) => self.attempt(Self::expr).ok(),
            }
        } else {
            self.attempt(Self::expr).ok()
        };

        self.lexeme(";")?;
        let trailing = self.comments();

        Ok((expr, trailing))
    }

    fn return_statement(&mut self) -> Attempt<Node> {
        let config = self.config;
        let (expr, trailing) = self.keyword_expression(config.return_keyword(), false)?;
        Ok(ast::return_stmt(expr).with_trailing_comments(trailing))
    }

    fn output_statement(&mut self) -> Attempt<Node> {
        let config = self.config;
        let (expr, trailing) = self.keyword_expression(config.output_keyword(), true)?;
        Ok(ast::output_stmt(expr).with_trailing_comments(trailing))
    }

    fn input_statement(&mut self) -> Attempt<Node> {
        let config = self.config;
        let (expr, trailing) = self.keyword_expression(config.input_keyword(), true)?;
        Ok(ast::input_stmt(expr).with_trailing_comments(trailing))
    }

    fn call_statement(&mut self) -> Attempt<Node> {
        let node = self.call_expression()?;
        self.lexeme(";")?;
        let trailing = self.comments();
        Ok(node.with_trailing_comments(trailing))
    }

    // <{><statement>*<}> — comments before the closing brace become the
    // block's inner comments.
    fn block_statement(&mut self) -> Attempt<Node> {
        let leading = self.comments();
        self.lexeme("{")?;

        let statements = self.many(Self::statement);

        let inner = self.comments();
        self.lexeme("}")?;
        let trailing = self.comments();

        Ok(Node::new(NodeKind::Block(BlockNode {
            statements,
            inner_comments: inner,
        }))
        .with_leading_comments(leading)
        .with_trailing_comments(trailing))
    }

    fn statement(&mut self) -> Attempt<Node> {
        let leading = self.comments();

        let node = self
            .attempt(Self::block_statement)
            .or_else(|_| self.attempt(Self::variable_declaration))
            .or_else(|_| self.attempt(Self::return_statement))
            .or_else(|_| self.attempt(Self::input_statement))
            .or_else(|_| self.attempt(Self::output_statement))
            .or_else(|_| self.attempt(Self::call_statement))?;

        let trailing = self.comments();
        Ok(node
            .with_leading_comments(leading)
            .with_trailing_comments(trailing))
    }

    // Declarations

    fn function_declaration(&mut self) -> Attempt<Node> {
        let config = self.config;
        self.keyword(config.function_keyword())?;
        self.comments();

        let (name, parameters) = match config.function_style() {
            FunctionStyle::NameFirst => {
                let name = self.identifier()?;
                let parameters = self.parameter_declarations()?;
                (name, parameters)
            }
            FunctionStyle::ParamsFirst => {
                let parameters = self.parameter_declarations()?;
                let name = self.identifier()?;
                (name, parameters)
            }
        };

        let body = self.function_body()?;
        Ok(ast::function(name, parameters, body))
    }

    fn parameter_declarations(&mut self) -> Attempt<Vec<Node>> {
        self.lexeme("(")?;
        let parameters = self.separated(|p| p.identifier().map(ast::parameter), ",");
        self.lexeme(")")?;
        Ok(parameters)
    }

    // A block body, or `;` for a forward declaration.
    fn function_body(&mut self) -> Attempt<Option<Node>> {
        if let Ok(body) = self.attempt(Self::block_statement) {
            return Ok(Some(body));
        }
        self.lexeme(";")?;
        Ok(None)
    }

    fn import_declaration(&mut self) -> Attempt<Node> {
        let config = self.config;
        self.keyword(config.use_keyword())?;
        self.comments();

        let files = self.separated(Self::string_literal_text, ",");
        if files.is_empty() {
            return self.fail("file path");
        }

        self.lexeme(";")?;
        let trailing = self.comments();
        Ok(ast::import(files).with_trailing_comments(trailing))
    }

    fn member(&mut self) -> Attempt<Node> {
        let leading = self.comments();

        let node = self
            .attempt(Self::function_declaration)
            .or_else(|_| self.attempt(Self::import_declaration))
            .or_else(|_| self.attempt(Self::variable_declaration))
            .or_else(|_| self.attempt(Self::input_statement))
            .or_else(|_| self.attempt(Self::output_statement))
            .or_else(|_| self.attempt(Self::call_statement))?;

        Ok(node.with_leading_comments(leading))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::config::GrammarConfigBuilder;
    use crate::parser::ast::{
        binary, block, call, float_literal, function, import, input_stmt, integer_literal, list,
        output_stmt, parameter, return_stmt, string_literal, unary, variable,
        variable_declaration,
    };

    use lazy_static::lazy_static;
    use test_case::test_case;

    lazy_static! {
        static ref DEFAULT_GRAMMAR: GrammarConfig = GrammarConfig::default();
    }

    fn parse(source: &str) -> Node {
        Parser::new(&DEFAULT_GRAMMAR, source).parse().unwrap()
    }

    fn parse_with(config: &GrammarConfig, source: &str) -> Node {
        Parser::new(config, source).parse().unwrap()
    }

    // Strips comment attachments so structural assertions stay readable.
    fn bare(node: Node) -> Node {
        fn strip(mut node: Node) -> Node {
            node.leading_comments.clear();
            node.trailing_comments.clear();
            node.kind = match node.kind {
                NodeKind::Variable(mut variable) => {
                    variable.init = variable.init.map(|init| Box::new(strip(*init)));
                    NodeKind::Variable(variable)
                }
                NodeKind::Binary(mut b) => {
                    b.left = Box::new(strip(*b.left));
                    b.right = Box::new(strip(*b.right));
                    NodeKind::Binary(b)
                }
                NodeKind::Unary(mut u) => {
                    u.operand = Box::new(strip(*u.operand));
                    NodeKind::Unary(u)
                }
                NodeKind::VariableDeclaration(variables) => NodeKind::VariableDeclaration(
                    variables.into_iter().map(strip).collect(),
                ),
                NodeKind::Block(mut b) => {
                    b.statements = b.statements.into_iter().map(strip).collect();
                    b.inner_comments.clear();
                    NodeKind::Block(b)
                }
                NodeKind::Return(expr) => NodeKind::Return(expr.map(|e| Box::new(strip(*e)))),
                NodeKind::Output(mut output) => {
                    output.expression = output.expression.map(|e| Box::new(strip(*e)));
                    NodeKind::Output(output)
                }
                NodeKind::Input(expr) => NodeKind::Input(expr.map(|e| Box::new(strip(*e)))),
                NodeKind::Function(mut function) => {
                    function.parameters = function.parameters.into_iter().map(strip).collect();
                    function.body = function.body.map(|b| Box::new(strip(*b)));
                    NodeKind::Function(function)
                }
                NodeKind::List(members) => {
                    NodeKind::List(members.into_iter().map(strip).collect())
                }
                kind => kind,
            };
            node
        }

        strip(node)
    }

    #[test_case(
        "x = 5;",
        list(vec![variable_declaration(vec![
            variable("x", Some(integer_literal("5")))
        ])]) ;
        "assignment"
    )]
    #[test_case(
        "x = 2 + 3 * 4;",
        list(vec![variable_declaration(vec![variable(
            "x",
            Some(binary(
                BinaryOp::Add,
                integer_literal("2"),
                binary(BinaryOp::Multiply, integer_literal("3"), integer_literal("4")),
            )),
        )])]) ;
        "product binds tighter than sum"
    )]
    #[test_case(
        "x = (2 + 3) * 4;",
        list(vec![variable_declaration(vec![variable(
            "x",
            Some(binary(
                BinaryOp::Multiply,
                binary(BinaryOp::Add, integer_literal("2"), integer_literal("3")),
                integer_literal("4"),
            )),
        )])]) ;
        "parens group"
    )]
    #[test_case(
        "x = 10 - 3 - 2;",
        list(vec![variable_declaration(vec![variable(
            "x",
            Some(binary(
                BinaryOp::Subtract,
                binary(BinaryOp::Subtract, integer_literal("10"), integer_literal("3")),
                integer_literal("2"),
            )),
        )])]) ;
        "sum chains left"
    )]
    #[test_case(
        "x = 2 ^ 3 ^ 2;",
        list(vec![variable_declaration(vec![variable(
            "x",
            Some(binary(
                BinaryOp::Power,
                integer_literal("2"),
                binary(BinaryOp::Power, integer_literal("3"), integer_literal("2")),
            )),
        )])]) ;
        "power chains right"
    )]
    #[test_case(
        "x = 8 % 3;",
        list(vec![variable_declaration(vec![variable(
            "x",
            Some(binary(BinaryOp::Modulo, integer_literal("8"), integer_literal("3"))),
        )])]) ;
        "modulo"
    )]
    #[test_case(
        "x = -5;",
        list(vec![variable_declaration(vec![variable(
            "x",
            Some(unary(UnaryOp::Negate, integer_literal("5"))),
        )])]) ;
        "prefix negate"
    )]
    #[test_case(
        "x = not(y);",
        list(vec![variable_declaration(vec![variable(
            "x",
            Some(unary(UnaryOp::Not, variable("y", None))),
        )])]) ;
        "not expression"
    )]
    #[test_case(
        "x = 3.14;",
        list(vec![variable_declaration(vec![variable(
            "x",
            Some(float_literal("3.14")),
        )])]) ;
        "float literal expression"
    )]
    #[test_case(
        "s = 'foo';",
        list(vec![variable_declaration(vec![variable(
            "s",
            Some(string_literal("foo")),
        )])]) ;
        "string literal expression"
    )]
    #[test_case(
        r"s = 'it\'s';",
        list(vec![variable_declaration(vec![variable(
            "s",
            Some(string_literal(r"it\'s")),
        )])]) ;
        "escapes preserved verbatim"
    )]
    #[test_case(
        "x = 5, y = 6;",
        list(vec![variable_declaration(vec![
            variable("x", Some(integer_literal("5"))),
            variable("y", Some(integer_literal("6"))),
        ])]) ;
        "comma separated declaration"
    )]
    #[test_case(
        "output x;",
        list(vec![output_stmt(Some(variable("x", None)))]) ;
        "output bare expression"
    )]
    #[test_case(
        "output(x);",
        list(vec![output_stmt(Some(variable("x", None)))]) ;
        "output parenthesized"
    )]
    #[test_case(
        "output;",
        list(vec![output_stmt(None)]) ;
        "output blank"
    )]
    #[test_case(
        "x = input();",
        list(vec![variable_declaration(vec![variable(
            "x",
            Some(input_stmt(None)),
        )])]) ;
        "input expression"
    )]
    #[test_case(
        "input(16);",
        list(vec![input_stmt(Some(integer_literal("16")))]) ;
        "input statement with base"
    )]
    #[test_case(
        "add(2, 3);",
        list(vec![call("add", vec![integer_literal("2"), integer_literal("3")])]) ;
        "call statement"
    )]
    #[test_case(
        "use 'lib.cl', 'more.cl';",
        list(vec![import(vec!["lib.cl".to_string(), "more.cl".to_string()])]) ;
        "import declaration"
    )]
    #[test_case(
        "function f(a);",
        list(vec![function("f", vec![parameter("a")], None)]) ;
        "forward declaration"
    )]
    fn parses(source: &str, expected: Node) {
        assert_eq!(bare(parse(source)), expected)
    }

    #[test]
    fn parses_function_declaration_with_body() {
        let source = "function add(a, b) { return a + b; } output add(2, 3);";

        let expected = list(vec![
            function(
                "add",
                vec![parameter("a"), parameter("b")],
                Some(block(vec![return_stmt(Some(binary(
                    BinaryOp::Add,
                    variable("a", None),
                    variable("b", None),
                )))])),
            ),
            output_stmt(Some(call(
                "add",
                vec![integer_literal("2"), integer_literal("3")],
            ))),
        ]);

        assert_eq!(bare(parse(source)), expected)
    }

    #[test]
    fn parses_value_first_assignment() {
        let config = GrammarConfigBuilder::new()
            .assignment_style(AssignmentStyle::ValueFirst)
            .build()
            .unwrap();

        let expected = list(vec![variable_declaration(vec![variable(
            "x",
            Some(integer_literal("5")),
        )])]);

        assert_eq!(bare(parse_with(&config, "5 = x;")), expected)
    }

    #[test]
    fn parses_params_first_functions() {
        let config = GrammarConfigBuilder::new()
            .function_style(FunctionStyle::ParamsFirst)
            .build()
            .unwrap();

        let source = "function (a, b)add { return a + b; } (2, 3)add;";

        let expected = list(vec![
            function(
                "add",
                vec![parameter("a"), parameter("b")],
                Some(block(vec![return_stmt(Some(binary(
                    BinaryOp::Add,
                    variable("a", None),
                    variable("b", None),
                )))])),
            ),
            call("add", vec![integer_literal("2"), integer_literal("3")]),
        ]);

        assert_eq!(bare(parse_with(&config, source)), expected)
    }

    #[test]
    fn parses_respelled_keywords_and_operators() {
        let config = GrammarConfigBuilder::new()
            .output_keyword("print")
            .plus("plus")
            .single_comment("//")
            .build()
            .unwrap();

        let expected = list(vec![output_stmt(Some(binary(
            BinaryOp::Add,
            integer_literal("1"),
            integer_literal("2"),
        )))]);

        assert_eq!(
            bare(parse_with(&config, "// say it\nprint 1 plus 2;")),
            expected
        );
    }

    #[test]
    fn keywords_are_case_insensitive() {
        let expected = list(vec![output_stmt(Some(integer_literal("1")))]);

        assert_eq!(bare(parse("OUTPUT 1;")), expected);
        assert_eq!(bare(parse("Output 1;")), expected);
    }

    #[test]
    fn reserved_words_are_not_identifiers() {
        let config = GrammarConfig::default();
        let result = Parser::new(&config, "output = 5;").parse();

        assert!(result.is_err());
    }

    #[test]
    fn attaches_leading_comments() {
        let program = parse("# set up x\nx = 5;");

        let members = match &program.kind {
            NodeKind::List(members) => members,
            _ => panic!("expected list"),
        };
        assert_eq!(members[0].leading_comments.len(), 1);
        assert_eq!(members[0].leading_comments[0].text, "set up x");
        assert!(members[0].leading_comments[0].is_single);
    }

    #[test]
    fn attaches_trailing_comments() {
        let program = parse("x = 5; /* done */");

        let members = match &program.kind {
            NodeKind::List(members) => members,
            _ => panic!("expected list"),
        };
        assert_eq!(members[0].trailing_comments.len(), 1);
        assert_eq!(members[0].trailing_comments[0].text, "done");
        assert!(!members[0].trailing_comments[0].is_single);
    }

    #[test]
    fn attaches_trailing_list_comments() {
        let program = parse("x = 5;\n# epilogue\n# fin");

        assert_eq!(program.trailing_comments.len(), 0);
        let members = match &program.kind {
            NodeKind::List(members) => members,
            _ => panic!("expected list"),
        };
        // both epilogue comments belong to the declaration's trail
        assert_eq!(members[0].trailing_comments.len(), 2);
    }

    #[test]
    fn comments_interleave_with_tokens() {
        let program = parse("x /* mid */ = 5;");

        let members = match &program.kind {
            NodeKind::List(members) => members,
            _ => panic!("expected list"),
        };
        let variables = match &members[0].kind {
            NodeKind::VariableDeclaration(variables) => variables,
            _ => panic!("expected declaration"),
        };
        assert_eq!(variables[0].trailing_comments[0].text, "mid");
    }

    #[test]
    fn reports_position_of_failure() {
        let config = GrammarConfig::default();
        let error = Parser::new(&config, "x = ;").parse().unwrap_err();

        assert_eq!(error.line, 1);
        assert_eq!(error.column, 5);
        assert_eq!(error.lines, vec!["x = ;".to_string()]);
    }

    #[test]
    fn reports_failure_on_later_lines() {
        let config = GrammarConfig::default();
        let error = Parser::new(&config, "x = 5;\ny = ;").parse().unwrap_err();

        assert_eq!(error.line, 2);
        assert_eq!(error.column, 5);
        assert_eq!(error.context_line(), Some("y = ;"));
    }

    #[test]
    fn unterminated_multi_comment_fails_the_parse() {
        let config = GrammarConfig::default();
        let result = Parser::new(&config, "x = 5; /* never closed").parse();

        assert!(result.is_err());
    }

    #[test]
    fn parse_expression_entry_point() {
        let config = GrammarConfig::default();
        let node = Parser::new(&config, "1 + 2 * 3").parse_expression().unwrap();

        assert_eq!(
            bare(node),
            binary(
                BinaryOp::Add,
                integer_literal("1"),
                binary(BinaryOp::Multiply, integer_literal("2"), integer_literal("3")),
            )
        );
    }

    #[test]
    fn same_input_yields_identical_trees() {
        let source = "function f(a) { return a; } x = f(1); output x;";

        assert_eq!(parse(source), parse(source));
    }
}

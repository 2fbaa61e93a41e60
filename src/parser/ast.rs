use std::fmt;

use itertools::Itertools;

/// Comment metadata attached to nodes during parsing. `text` carries the
/// delimiter-stripped body.
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub text: String,
    pub is_single: bool,
}

impl Comment {
    pub fn single<S: Into<String>>(text: S) -> Comment {
        Comment {
            text: text.into(),
            is_single: true,
        }
    }

    pub fn multi<S: Into<String>>(text: S) -> Comment {
        Comment {
            text: text.into(),
            is_single: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Power,
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BinaryOp::Add => write!(f, "+"),
            BinaryOp::Subtract => write!(f, "-"),
            BinaryOp::Multiply => write!(f, "*"),
            BinaryOp::Divide => write!(f, "/"),
            BinaryOp::Modulo => write!(f, "%"),
            BinaryOp::Power => write!(f, "^"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Negate,
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnaryOp::Not => write!(f, "~"),
            UnaryOp::Negate => write!(f, "-"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    Integer,
    Float,
    String,
}

/// Fieldless discriminant, one per concrete node variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Expression,
    Variable,
    Binary,
    Unary,
    Literal,
    Parameter,
    Type,
    VariableDeclaration,
    Statement,
    Block,
    Return,
    Output,
    Input,
    Import,
    Function,
    List,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableNode {
    pub name: String,
    pub init: Option<Box<Node>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryNode {
    pub op: BinaryOp,
    pub left: Box<Node>,
    pub right: Box<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryNode {
    pub op: UnaryOp,
    pub operand: Box<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LiteralNode {
    pub token: String,
    pub kind: LiteralKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterNode {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeNode {
    pub namespaces: Vec<String>,
    pub name: String,
    pub type_params: Vec<TypeNode>,
    pub is_array: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlockNode {
    pub statements: Vec<Node>,
    pub inner_comments: Vec<Comment>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutputNode {
    pub expression: Option<Box<Node>>,
    pub format: Option<String>,
}

/// Declaration and call share this shape: a declaration carries `Parameter`
/// nodes and (unless forward-declared) a body; a call carries argument
/// expressions and no body.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionNode {
    pub name: String,
    pub return_type: Option<TypeNode>,
    pub parameters: Vec<Node>,
    pub body: Option<Box<Node>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Expression(String),
    Variable(VariableNode),
    Binary(BinaryNode),
    Unary(UnaryNode),
    Literal(LiteralNode),
    Parameter(ParameterNode),
    Type(TypeNode),
    VariableDeclaration(Vec<Node>),
    Statement(Option<String>),
    Block(BlockNode),
    Return(Option<Box<Node>>),
    Output(OutputNode),
    Input(Option<Box<Node>>),
    Import(Vec<String>),
    Function(FunctionNode),
    List(Vec<Node>),
}

/// One node of the syntax tree: a variant plus the comments the parser
/// attached around it. Nodes exclusively own their children.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub leading_comments: Vec<Comment>,
    pub trailing_comments: Vec<Comment>,
    pub kind: NodeKind,
}

impl Node {
    pub fn new(kind: NodeKind) -> Node {
        Node {
            leading_comments: vec![],
            trailing_comments: vec![],
            kind,
        }
    }

    pub fn kind(&self) -> Kind {
        match self.kind {
            NodeKind::Expression(_) => Kind::Expression,
            NodeKind::Variable(_) => Kind::Variable,
            NodeKind::Binary(_) => Kind::Binary,
            NodeKind::Unary(_) => Kind::Unary,
            NodeKind::Literal(_) => Kind::Literal,
            NodeKind::Parameter(_) => Kind::Parameter,
            NodeKind::Type(_) => Kind::Type,
            NodeKind::VariableDeclaration(_) => Kind::VariableDeclaration,
            NodeKind::Statement(_) => Kind::Statement,
            NodeKind::Block(_) => Kind::Block,
            NodeKind::Return(_) => Kind::Return,
            NodeKind::Output(_) => Kind::Output,
            NodeKind::Input(_) => Kind::Input,
            NodeKind::Import(_) => Kind::Import,
            NodeKind::Function(_) => Kind::Function,
            NodeKind::List(_) => Kind::List,
        }
    }

    pub fn with_leading_comments(mut self, comments: Vec<Comment>) -> Node {
        self.leading_comments.extend(comments);
        self
    }

    pub fn with_trailing_comments(mut self, comments: Vec<Comment>) -> Node {
        self.trailing_comments.extend(comments);
        self
    }

    /// Double dispatch: the node picks the visit method for its own variant,
    /// independent of the visitor's concrete type.
    pub fn accept<V: Visitor>(&self, visitor: &mut V) -> Result<(), V::Error> {
        match &self.kind {
            NodeKind::Expression(text) => visitor.visit_expression(self, text),
            NodeKind::Variable(variable) => visitor.visit_variable(self, variable),
            NodeKind::Binary(binary) => visitor.visit_binary(self, binary),
            NodeKind::Unary(unary) => visitor.visit_unary(self, unary),
            NodeKind::Literal(literal) => visitor.visit_literal(self, literal),
            NodeKind::Parameter(parameter) => visitor.visit_parameter(self, parameter),
            NodeKind::Type(ty) => visitor.visit_type(self, ty),
            NodeKind::VariableDeclaration(variables) => {
                visitor.visit_variable_declaration(self, variables)
            }
            NodeKind::Statement(body) => visitor.visit_statement(self, body.as_deref()),
            NodeKind::Block(block) => visitor.visit_block(self, block),
            NodeKind::Return(expression) => visitor.visit_return(self, expression.as_deref()),
            NodeKind::Output(output) => visitor.visit_output(self, output),
            NodeKind::Input(expression) => visitor.visit_input(self, expression.as_deref()),
            NodeKind::Import(files) => visitor.visit_import(self, files),
            NodeKind::Function(function) => visitor.visit_function(self, function),
            NodeKind::List(members) => visitor.visit_list(self, members),
        }
    }
}

/// One visit method per node variant; every method falls back to the no-op
/// `default_visit` unless overridden.
pub trait Visitor {
    type Error;

    fn default_visit(&mut self, _node: &Node) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_expression(&mut self, node: &Node, _text: &str) -> Result<(), Self::Error> {
        self.default_visit(node)
    }

    fn visit_variable(&mut self, node: &Node, _variable: &VariableNode) -> Result<(), Self::Error> {
        self.default_visit(node)
    }

    fn visit_binary(&mut self, node: &Node, _binary: &BinaryNode) -> Result<(), Self::Error> {
        self.default_visit(node)
    }

    fn visit_unary(&mut self, node: &Node, _unary: &UnaryNode) -> Result<(), Self::Error> {
        self.default_visit(node)
    }

    fn visit_literal(&mut self, node: &Node, _literal: &LiteralNode) -> Result<(), Self::Error> {
        self.default_visit(node)
    }

    fn visit_parameter(
        &mut self,
        node: &Node,
        _parameter: &ParameterNode,
    ) -> Result<(), Self::Error> {
        self.default_visit(node)
    }

    fn visit_type(&mut self, node: &Node, _ty: &TypeNode) -> Result<(), Self::Error> {
        self.default_visit(node)
    }

    fn visit_variable_declaration(
        &mut self,
        node: &Node,
        _variables: &[Node],
    ) -> Result<(), Self::Error> {
        self.default_visit(node)
    }

    fn visit_statement(&mut self, node: &Node, _body: Option<&str>) -> Result<(), Self::Error> {
        self.default_visit(node)
    }

    fn visit_block(&mut self, node: &Node, _block: &BlockNode) -> Result<(), Self::Error> {
        self.default_visit(node)
    }

    fn visit_return(&mut self, node: &Node, _expression: Option<&Node>) -> Result<(), Self::Error> {
        self.default_visit(node)
    }

    fn visit_output(&mut self, node: &Node, _output: &OutputNode) -> Result<(), Self::Error> {
        self.default_visit(node)
    }

    fn visit_input(&mut self, node: &Node, _expression: Option<&Node>) -> Result<(), Self::Error> {
        self.default_visit(node)
    }

    fn visit_import(&mut self, node: &Node, _files: &[String]) -> Result<(), Self::Error> {
        self.default_visit(node)
    }

    fn visit_function(&mut self, node: &Node, _function: &FunctionNode) -> Result<(), Self::Error> {
        self.default_visit(node)
    }

    fn visit_list(&mut self, node: &Node, _members: &[Node]) -> Result<(), Self::Error> {
        self.default_visit(node)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            NodeKind::Expression(text) => write!(f, "{}", text),
            NodeKind::Variable(variable) => match &variable.init {
                Some(init) => write!(f, "{} = {}", variable.name, init),
                None => write!(f, "{}", variable.name),
            },
            NodeKind::Binary(binary) => {
                write!(f, "({} {} {})", binary.left, binary.op, binary.right)
            }
            NodeKind::Unary(unary) => write!(f, "({}{})", unary.op, unary.operand),
            NodeKind::Literal(literal) => match literal.kind {
                LiteralKind::String => write!(f, "'{}'", literal.token),
                _ => write!(f, "{}", literal.token),
            },
            NodeKind::Parameter(parameter) => write!(f, "{}", parameter.name),
            NodeKind::Type(ty) => {
                for namespace in &ty.namespaces {
                    write!(f, "{}.", namespace)?;
                }
                write!(f, "{}", ty.name)?;
                if !ty.type_params.is_empty() {
                    write!(
                        f,
                        "<{}>",
                        ty.type_params.iter().map(|param| &param.name).join(", ")
                    )?;
                }
                if ty.is_array {
                    write!(f, "[]")?;
                }
                Ok(())
            }
            NodeKind::VariableDeclaration(variables) => {
                write!(f, "{};", variables.iter().join(", "))
            }
            NodeKind::Statement(body) => write!(f, "{}", body.as_deref().unwrap_or("")),
            NodeKind::Block(block) => {
                write!(f, "{{ {} }}", block.statements.iter().join(" "))
            }
            NodeKind::Return(expression) => match expression {
                Some(expression) => write!(f, "return {};", expression),
                None => write!(f, "return;"),
            },
            NodeKind::Output(output) => match &output.expression {
                Some(expression) => write!(f, "output({});", expression),
                None => write!(f, "output();"),
            },
            NodeKind::Input(expression) => match expression {
                Some(expression) => write!(f, "input({});", expression),
                None => write!(f, "input();"),
            },
            NodeKind::Import(files) => {
                write!(
                    f,
                    "use {};",
                    files.iter().map(|file| format!("'{}'", file)).join(", ")
                )
            }
            NodeKind::Function(function) => {
                write!(
                    f,
                    "{}({})",
                    function.name,
                    function.parameters.iter().join(", ")
                )?;
                if let Some(body) = &function.body {
                    write!(f, " {}", body)?;
                }
                Ok(())
            }
            NodeKind::List(members) => write!(f, "{}", members.iter().join(" ")),
        }
    }
}

// Node builders, used by the parser and by tests.

pub fn expression<S: Into<String>>(text: S) -> Node {
    Node::new(NodeKind::Expression(text.into()))
}

pub fn variable<S: Into<String>>(name: S, init: Option<Node>) -> Node {
    Node::new(NodeKind::Variable(VariableNode {
        name: name.into(),
        init: init.map(Box::new),
    }))
}

pub fn binary(op: BinaryOp, left: Node, right: Node) -> Node {
    Node::new(NodeKind::Binary(BinaryNode {
        op,
        left: Box::new(left),
        right: Box::new(right),
    }))
}

pub fn unary(op: UnaryOp, operand: Node) -> Node {
    Node::new(NodeKind::Unary(UnaryNode {
        op,
        operand: Box::new(operand),
    }))
}

pub fn literal<S: Into<String>>(token: S, kind: LiteralKind) -> Node {
    Node::new(NodeKind::Literal(LiteralNode {
        token: token.into(),
        kind,
    }))
}

pub fn integer_literal<S: Into<String>>(token: S) -> Node {
    literal(token, LiteralKind::Integer)
}

pub fn float_literal<S: Into<String>>(token: S) -> Node {
    literal(token, LiteralKind::Float)
}

pub fn string_literal<S: Into<String>>(token: S) -> Node {
    literal(token, LiteralKind::String)
}

pub fn parameter<S: Into<String>>(name: S) -> Node {
    Node::new(NodeKind::Parameter(ParameterNode { name: name.into() }))
}

pub fn variable_declaration(variables: Vec<Node>) -> Node {
    Node::new(NodeKind::VariableDeclaration(variables))
}

pub fn block(statements: Vec<Node>) -> Node {
    Node::new(NodeKind::Block(BlockNode {
        statements,
        inner_comments: vec![],
    }))
}

pub fn return_stmt(expression: Option<Node>) -> Node {
    Node::new(NodeKind::Return(expression.map(Box::new)))
}

pub fn output_stmt(expression: Option<Node>) -> Node {
    Node::new(NodeKind::Output(OutputNode {
        expression: expression.map(Box::new),
        format: None,
    }))
}

pub fn input_stmt(expression: Option<Node>) -> Node {
    Node::new(NodeKind::Input(expression.map(Box::new)))
}

pub fn import(files: Vec<String>) -> Node {
    Node::new(NodeKind::Import(files))
}

pub fn function<S: Into<String>>(name: S, parameters: Vec<Node>, body: Option<Node>) -> Node {
    Node::new(NodeKind::Function(FunctionNode {
        name: name.into(),
        return_type: None,
        parameters,
        body: body.map(Box::new),
    }))
}

/// A call site: same node shape as a declaration, arguments in place of
/// parameters, no body.
pub fn call<S: Into<String>>(name: S, arguments: Vec<Node>) -> Node {
    function(name, arguments, None)
}

pub fn list(members: Vec<Node>) -> Node {
    Node::new(NodeKind::List(members))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CountingVisitor {
        literals: usize,
        binaries: usize,
        others: usize,
    }

    impl Visitor for CountingVisitor {
        type Error = ();

        fn default_visit(&mut self, _node: &Node) -> Result<(), ()> {
            self.others += 1;
            Ok(())
        }

        fn visit_literal(&mut self, _node: &Node, _literal: &LiteralNode) -> Result<(), ()> {
            self.literals += 1;
            Ok(())
        }

        fn visit_binary(&mut self, _node: &Node, binary: &BinaryNode) -> Result<(), ()> {
            self.binaries += 1;
            binary.left.accept(self)?;
            binary.right.accept(self)
        }
    }

    #[test]
    fn dispatches_by_variant() {
        let tree = binary(
            BinaryOp::Add,
            integer_literal("1"),
            binary(
                BinaryOp::Multiply,
                integer_literal("2"),
                variable("x", None),
            ),
        );

        let mut visitor = CountingVisitor {
            literals: 0,
            binaries: 0,
            others: 0,
        };
        tree.accept(&mut visitor).unwrap();

        assert_eq!(visitor.binaries, 2);
        assert_eq!(visitor.literals, 2);
        // the variable reference fell through to the default no-op
        assert_eq!(visitor.others, 1);
    }

    #[test]
    fn kind_matches_variant() {
        assert_eq!(integer_literal("1").kind(), Kind::Literal);
        assert_eq!(variable("x", None).kind(), Kind::Variable);
        assert_eq!(block(vec![]).kind(), Kind::Block);
        assert_eq!(call("f", vec![]).kind(), Kind::Function);
        assert_eq!(list(vec![]).kind(), Kind::List);
    }

    #[test]
    fn comments_attach_to_nodes() {
        let node = variable("x", None)
            .with_leading_comments(vec![Comment::single("before")])
            .with_trailing_comments(vec![Comment::multi("after")]);

        assert_eq!(node.leading_comments.len(), 1);
        assert!(node.leading_comments[0].is_single);
        assert!(!node.trailing_comments[0].is_single);
    }

    #[test]
    fn display_renders_canonical_text() {
        let tree = binary(
            BinaryOp::Add,
            integer_literal("5"),
            unary(UnaryOp::Negate, variable("x", None)),
        );
        assert_eq!(tree.to_string(), "(5 + (-x))");

        let declaration = variable_declaration(vec![variable("x", Some(integer_literal("1")))]);
        assert_eq!(declaration.to_string(), "x = 1;");

        let body = block(vec![return_stmt(Some(variable("a", None)))]);
        let program = list(vec![
            function("add", vec![parameter("a")], Some(body)),
            output_stmt(Some(string_literal("hi"))),
        ]);
        assert_eq!(program.to_string(), "add(a) { return a; } output('hi');");
    }
}

use std::collections::HashSet;
use std::error::Error;
use std::fmt;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    EmptyToken(&'static str),
    DuplicateToken(String),
    InvalidBase(u32),
    DebuggerRequired,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyToken(which) => {
                write!(f, "invalid configuration: `{}` must not be empty", which)
            }
            ConfigError::DuplicateToken(token) => {
                write!(f, "invalid configuration: `{}` is configured twice", token)
            }
            ConfigError::InvalidBase(base) => {
                write!(f, "invalid configuration: base `{}` not in 2..=36", base)
            }
            ConfigError::DebuggerRequired => {
                write!(f, "invalid configuration: debug mode requires a debugger")
            }
        }
    }
}

impl Error for ConfigError {}

/// `name = expr` vs `expr = name`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentStyle {
    NameFirst,
    ValueFirst,
}

/// `name(params)` vs `(params)name`, for declarations and calls alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionStyle {
    NameFirst,
    ParamsFirst,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryStyle {
    Prefix,
    Postfix,
}

/*
   The spellings of every keyword, operator and comment delimiter the grammar
   recognizes, plus the three style switches. Immutable once built; the
   reserved-word set is derived inside `build` so it can never go stale.
*/
#[derive(Debug, Clone)]
pub struct GrammarConfig {
    float_keyword: String,
    void_keyword: String,
    int_keyword: String,
    string_keyword: String,
    return_keyword: String,
    output_keyword: String,
    input_keyword: String,
    not_op: String,
    function_keyword: String,
    use_keyword: String,

    plus: String,
    minus: String,
    multiply: String,
    divide: String,
    modulo: String,
    power: String,
    assign: String,

    single_comment: String,
    multi_open: String,
    multi_close: String,
    newline: String,

    assignment_style: AssignmentStyle,
    function_style: FunctionStyle,
    unary_style: UnaryStyle,

    reserved: HashSet<String>,
}

impl GrammarConfig {
    pub fn float_keyword(&self) -> &str {
        &self.float_keyword
    }

    pub fn void_keyword(&self) -> &str {
        &self.void_keyword
    }

    pub fn int_keyword(&self) -> &str {
        &self.int_keyword
    }

    pub fn string_keyword(&self) -> &str {
        &self.string_keyword
    }

    pub fn return_keyword(&self) -> &str {
        &self.return_keyword
    }

    pub fn output_keyword(&self) -> &str {
        &self.output_keyword
    }

    pub fn input_keyword(&self) -> &str {
        &self.input_keyword
    }

    pub fn not_op(&self) -> &str {
        &self.not_op
    }

    pub fn function_keyword(&self) -> &str {
        &self.function_keyword
    }

    pub fn use_keyword(&self) -> &str {
        &self.use_keyword
    }

    pub fn plus(&self) -> &str {
        &self.plus
    }

    pub fn minus(&self) -> &str {
        &self.minus
    }

    pub fn multiply(&self) -> &str {
        &self.multiply
    }

    pub fn divide(&self) -> &str {
        &self.divide
    }

    pub fn modulo(&self) -> &str {
        &self.modulo
    }

    pub fn power(&self) -> &str {
        &self.power
    }

    pub fn assign(&self) -> &str {
        &self.assign
    }

    pub fn single_comment(&self) -> &str {
        &self.single_comment
    }

    pub fn multi_open(&self) -> &str {
        &self.multi_open
    }

    pub fn multi_close(&self) -> &str {
        &self.multi_close
    }

    pub fn newline(&self) -> &str {
        &self.newline
    }

    pub fn assignment_style(&self) -> AssignmentStyle {
        self.assignment_style
    }

    pub fn function_style(&self) -> FunctionStyle {
        self.function_style
    }

    pub fn unary_style(&self) -> UnaryStyle {
        self.unary_style
    }

    /// Case-insensitive membership test against every configured keyword and
    /// operator spelling.
    pub fn is_reserved(&self, word: &str) -> bool {
        self.reserved.contains(&word.to_lowercase())
    }
}

impl Default for GrammarConfig {
    fn default() -> GrammarConfig {
        GrammarConfigBuilder::new()
            .build()
            .expect("default grammar configuration is valid")
    }
}

#[derive(Debug, Clone)]
pub struct GrammarConfigBuilder {
    config: GrammarConfig,
}

impl GrammarConfigBuilder {
    pub fn new() -> GrammarConfigBuilder {
        GrammarConfigBuilder {
            config: GrammarConfig {
                float_keyword: "float".to_string(),
                void_keyword: "void".to_string(),
                int_keyword: "int".to_string(),
                string_keyword: "string".to_string(),
                return_keyword: "return".to_string(),
                output_keyword: "output".to_string(),
                input_keyword: "input".to_string(),
                not_op: "not".to_string(),
                function_keyword: "function".to_string(),
                use_keyword: "use".to_string(),
                plus: "+".to_string(),
                minus: "-".to_string(),
                multiply: "*".to_string(),
                divide: "/".to_string(),
                modulo: "%".to_string(),
                power: "^".to_string(),
                assign: "=".to_string(),
                single_comment: "#".to_string(),
                multi_open: "/*".to_string(),
                multi_close: "*/".to_string(),
                newline: "\n".to_string(),
                assignment_style: AssignmentStyle::NameFirst,
                function_style: FunctionStyle::NameFirst,
                unary_style: UnaryStyle::Prefix,
                reserved: HashSet::new(),
            },
        }
    }

    pub fn float_keyword<S: Into<String>>(mut self, spelling: S) -> Self {
        self.config.float_keyword = spelling.into();
        self
    }

    pub fn void_keyword<S: Into<String>>(mut self, spelling: S) -> Self {
        self.config.void_keyword = spelling.into();
        self
    }

    pub fn int_keyword<S: Into<String>>(mut self, spelling: S) -> Self {
        self.config.int_keyword = spelling.into();
        self
    }

    pub fn string_keyword<S: Into<String>>(mut self, spelling: S) -> Self {
        self.config.string_keyword = spelling.into();
        self
    }

    pub fn return_keyword<S: Into<String>>(mut self, spelling: S) -> Self {
        self.config.return_keyword = spelling.into();
        self
    }

    pub fn output_keyword<S: Into<String>>(mut self, spelling: S) -> Self {
        self.config.output_keyword = spelling.into();
        self
    }

    pub fn input_keyword<S: Into<String>>(mut self, spelling: S) -> Self {
        self.config.input_keyword = spelling.into();
        self
    }

    pub fn not_op<S: Into<String>>(mut self, spelling: S) -> Self {
        self.config.not_op = spelling.into();
        self
    }

    pub fn function_keyword<S: Into<String>>(mut self, spelling: S) -> Self {
        self.config.function_keyword = spelling.into();
        self
    }

    pub fn use_keyword<S: Into<String>>(mut self, spelling: S) -> Self {
        self.config.use_keyword = spelling.into();
        self
    }

    pub fn plus<S: Into<String>>(mut self, spelling: S) -> Self {
        self.config.plus = spelling.into();
        self
    }

    pub fn minus<S: Into<String>>(mut self, spelling: S) -> Self {
        self.config.minus = spelling.into();
        self
    }

    pub fn multiply<S: Into<String>>(mut self, spelling: S) -> Self {
        self.config.multiply = spelling.into();
        self
    }

    pub fn divide<S: Into<String>>(mut self, spelling: S) -> Self {
        self.config.divide = spelling.into();
        self
    }

    pub fn modulo<S: Into<String>>(mut self, spelling: S) -> Self {
        self.config.modulo = spelling.into();
        self
    }

    pub fn power<S: Into<String>>(mut self, spelling: S) -> Self {
        self.config.power = spelling.into();
        self
    }

    pub fn assign<S: Into<String>>(mut self, spelling: S) -> Self {
        self.config.assign = spelling.into();
        self
    }

    pub fn single_comment<S: Into<String>>(mut self, spelling: S) -> Self {
        self.config.single_comment = spelling.into();
        self
    }

    pub fn multi_comment<S: Into<String>>(mut self, open: S, close: S) -> Self {
        self.config.multi_open = open.into();
        self.config.multi_close = close.into();
        self
    }

    pub fn newline<S: Into<String>>(mut self, spelling: S) -> Self {
        self.config.newline = spelling.into();
        self
    }

    pub fn assignment_style(mut self, style: AssignmentStyle) -> Self {
        self.config.assignment_style = style;
        self
    }

    pub fn function_style(mut self, style: FunctionStyle) -> Self {
        self.config.function_style = style;
        self
    }

    pub fn unary_style(mut self, style: UnaryStyle) -> Self {
        self.config.unary_style = style;
        self
    }

    pub fn build(mut self) -> Result<GrammarConfig> {
        {
            let named = [
                ("float keyword", &self.config.float_keyword),
                ("void keyword", &self.config.void_keyword),
                ("int keyword", &self.config.int_keyword),
                ("string keyword", &self.config.string_keyword),
                ("return keyword", &self.config.return_keyword),
                ("output keyword", &self.config.output_keyword),
                ("input keyword", &self.config.input_keyword),
                ("not operator", &self.config.not_op),
                ("function keyword", &self.config.function_keyword),
                ("use keyword", &self.config.use_keyword),
                ("plus operator", &self.config.plus),
                ("minus operator", &self.config.minus),
                ("multiply operator", &self.config.multiply),
                ("divide operator", &self.config.divide),
                ("modulo operator", &self.config.modulo),
                ("power operator", &self.config.power),
                ("assign operator", &self.config.assign),
                ("single-line comment", &self.config.single_comment),
                ("multi-line comment open", &self.config.multi_open),
                ("multi-line comment close", &self.config.multi_close),
                ("newline", &self.config.newline),
            ];

            for &(name, spelling) in named.iter() {
                if spelling.is_empty() {
                    return Err(ConfigError::EmptyToken(name));
                }
            }

            let operators = [
                &self.config.plus,
                &self.config.minus,
                &self.config.multiply,
                &self.config.divide,
                &self.config.modulo,
                &self.config.power,
                &self.config.assign,
            ];

            let mut seen = HashSet::new();
            for &op in operators.iter() {
                if !seen.insert(op.clone()) {
                    return Err(ConfigError::DuplicateToken(op.clone()));
                }
            }
        }

        let reserved = reserved_words(&self.config);
        self.config.reserved = reserved;

        Ok(self.config)
    }
}

impl Default for GrammarConfigBuilder {
    fn default() -> GrammarConfigBuilder {
        GrammarConfigBuilder::new()
    }
}

fn reserved_words(config: &GrammarConfig) -> HashSet<String> {
    let words = [
        &config.float_keyword,
        &config.void_keyword,
        &config.int_keyword,
        &config.string_keyword,
        &config.return_keyword,
        &config.output_keyword,
        &config.input_keyword,
        &config.not_op,
        &config.function_keyword,
        &config.use_keyword,
        &config.plus,
        &config.minus,
        &config.multiply,
        &config.divide,
        &config.modulo,
        &config.power,
        &config.assign,
    ];

    words.iter().map(|word| word.to_lowercase()).collect()
}

/// Numeral bases for literal assignment, input and output, plus the debug
/// flag. Bases are validated to 2..=36 at build time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterpreterConfig {
    assignment_base: u32,
    input_base: u32,
    output_base: u32,
    debug_mode: bool,
}

impl InterpreterConfig {
    pub fn assignment_base(&self) -> u32 {
        self.assignment_base
    }

    pub fn input_base(&self) -> u32 {
        self.input_base
    }

    pub fn output_base(&self) -> u32 {
        self.output_base
    }

    pub fn debug_mode(&self) -> bool {
        self.debug_mode
    }
}

impl Default for InterpreterConfig {
    fn default() -> InterpreterConfig {
        InterpreterConfig {
            assignment_base: 10,
            input_base: 10,
            output_base: 10,
            debug_mode: false,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct InterpreterConfigBuilder {
    config: InterpreterConfig,
}

impl InterpreterConfigBuilder {
    pub fn new() -> InterpreterConfigBuilder {
        InterpreterConfigBuilder {
            config: InterpreterConfig::default(),
        }
    }

    pub fn assignment_base(mut self, base: u32) -> Self {
        self.config.assignment_base = base;
        self
    }

    pub fn input_base(mut self, base: u32) -> Self {
        self.config.input_base = base;
        self
    }

    pub fn output_base(mut self, base: u32) -> Self {
        self.config.output_base = base;
        self
    }

    pub fn debug_mode(mut self, enabled: bool) -> Self {
        self.config.debug_mode = enabled;
        self
    }

    pub fn build(self) -> Result<InterpreterConfig> {
        for &base in [
            self.config.assignment_base,
            self.config.input_base,
            self.config.output_base,
        ]
        .iter()
        {
            if base < 2 || base > 36 {
                return Err(ConfigError::InvalidBase(base));
            }
        }

        Ok(self.config)
    }
}

impl Default for InterpreterConfigBuilder {
    fn default() -> InterpreterConfigBuilder {
        InterpreterConfigBuilder::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_words_are_case_insensitive() {
        let config = GrammarConfig::default();

        assert!(config.is_reserved("output"));
        assert!(config.is_reserved("OUTPUT"));
        assert!(config.is_reserved("Return"));
        assert!(config.is_reserved("+"));
        assert!(!config.is_reserved("outputs"));
        assert!(!config.is_reserved("x"));
    }

    #[test]
    fn reserved_words_follow_respelled_keywords() {
        let config = GrammarConfigBuilder::new()
            .output_keyword("print")
            .build()
            .unwrap();

        assert!(config.is_reserved("print"));
        assert!(config.is_reserved("PRINT"));
        assert!(!config.is_reserved("output"));
    }

    #[test]
    fn empty_keyword_is_rejected() {
        let result = GrammarConfigBuilder::new().return_keyword("").build();

        assert_eq!(result.unwrap_err(), ConfigError::EmptyToken("return keyword"));
    }

    #[test]
    fn duplicate_operator_is_rejected() {
        let result = GrammarConfigBuilder::new().minus("+").build();

        assert_eq!(
            result.unwrap_err(),
            ConfigError::DuplicateToken("+".to_string())
        );
    }

    #[test]
    fn base_out_of_range_is_rejected() {
        let result = InterpreterConfigBuilder::new().output_base(37).build();

        assert_eq!(result.unwrap_err(), ConfigError::InvalidBase(37));

        let result = InterpreterConfigBuilder::new().input_base(1).build();

        assert_eq!(result.unwrap_err(), ConfigError::InvalidBase(1));
    }

    #[test]
    fn valid_bases_build() {
        let config = InterpreterConfigBuilder::new()
            .assignment_base(16)
            .input_base(2)
            .output_base(36)
            .build()
            .unwrap();

        assert_eq!(config.assignment_base(), 16);
        assert_eq!(config.input_base(), 2);
        assert_eq!(config.output_base(), 36);
        assert!(!config.debug_mode());
    }
}

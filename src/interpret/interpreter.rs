//! Walking the token stream to execute the program.
//!
//! This is where the program is effectively being executed. Statements and
//! expressions are recognized from the leading tokens of the front line and
//! consumed destructively; block constructs (loops, functions) splice cloned
//! copies of their captured lines back onto the front of the stream.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::io::BufRead;
use std::iter;

use itertools::Itertools;
use num_bigint::{BigInt, Sign};
use string_builder::Builder as StringBuilder;

use anyhow::Result;

use super::env::{Env, IT};
use super::value::{to_f64, Type, Value};
use crate::stream::{Line, TokenStream};

/// Outcome of executing one statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flow {
    /// Keep executing the current block.
    Normal,
    /// A `FOUND` statement was reached: unwind to the owning call frame,
    /// which parses `FOUND YR <expr>` and produces the call's result. The
    /// tokens themselves are left in place for that frame.
    Return,
}

/// A function table entry: parameter names plus the captured body template.
///
/// The body is captured once, at the hoisting pre-scan, and cloned per
/// invocation: execution destructively consumes the clone, never the
/// template.
#[derive(Debug, Clone)]
struct Fun<'ctx> {
    /// Parameter names, in order. Arity is the length.
    params: Vec<&'ctx str>,
    /// Body lines, including the trailing `IF U SAY SO` terminator line, so
    /// a spliced clone carries its own end marker.
    body: Vec<Line<'ctx>>,
}

/// Interpreter for our language.
pub(crate) struct Interpreter<'ctx, 'io> {
    /// The remaining program tokens.
    stream: TokenStream<'ctx>,
    /// Map between function names and their definition.
    fun_env: HashMap<&'ctx str, Fun<'ctx>>,
    /// The execution environment stack: the global environment at the
    /// bottom, one environment per in-flight function call above it.
    env: Vec<Env<'ctx>>,
    /// Standard output, as a growable string.
    stdout: StringBuilder,
    /// Input sink for `GIMMEH` statements.
    stdin: &'io mut dyn BufRead,
}

impl<'ctx, 'io> Interpreter<'ctx, 'io> {
    /// Creates an interpreter over `stream`, with only the global
    /// environment in place.
    pub(crate) fn new(stream: TokenStream<'ctx>, stdin: &'io mut dyn BufRead) -> Self {
        Self {
            stream,
            fun_env: HashMap::new(),
            env: vec![Env::new()],
            stdout: StringBuilder::default(),
            stdin,
        }
    }

    /// Returns the accumulated standard output of the execution.
    pub(crate) fn stdout(self) -> Result<String> {
        Ok(self.stdout.string()?)
    }

    //------------------------------------------------------------------
    // Environment chain
    //------------------------------------------------------------------

    /// The innermost environment.
    fn innermost(&self) -> &Env<'ctx> {
        self.env.last().expect("environment stack is never empty")
    }

    /// The innermost environment, mutably.
    fn innermost_mut(&mut self) -> &mut Env<'ctx> {
        self.env
            .last_mut()
            .expect("environment stack is never empty")
    }

    /// Gets the value of a variable, walking scopes innermost first.
    fn find_var(&self, name: &str) -> Option<&Value> {
        self.env.iter().rev().find_map(|env| env.get(name))
    }

    /// Mutates `name` in the innermost scope that declares it.
    ///
    /// If no scope declares it, the assignment silently declares it in the
    /// current scope instead. That fallback is language behavior, not an
    /// error.
    fn assign(&mut self, name: &'ctx str, value: Value) {
        let idx = self
            .env
            .iter()
            .rposition(|env| env.contains(name))
            .unwrap_or(self.env.len() - 1);
        self.env[idx].insert(name, value);
    }

    //------------------------------------------------------------------
    // Program driver
    //------------------------------------------------------------------

    /// Pre-scans the stream for `HOW DUZ I` declarations and captures them
    /// into the function table, so forward references resolve.
    ///
    /// Only the first declaration of a name is kept.
    pub(crate) fn hoist(&mut self) -> Result<()> {
        let mut fun_env = HashMap::new();
        let mut lines = self.stream.iter();
        while let Some(line) = lines.next() {
            if !line_starts_with(line, &["HOW", "DUZ", "I"]) {
                continue;
            }
            let (name, params) = parse_fun_header(line)?;
            let mut body = Vec::new();
            loop {
                let Some(line) = lines.next() else {
                    bail!("unexpected end of input, expecting IF U SAY SO to close {name}");
                };
                body.push(line.clone());
                if line_is_fun_end(line) {
                    break;
                }
            }
            fun_env.entry(name).or_insert(Fun { params, body });
        }
        self.fun_env = fun_env;
        Ok(())
    }

    /// Runs the program: discards everything up to and including the `HAI`
    /// marker line, then executes statements until the `KTHXBAI` line.
    pub(crate) fn run(&mut self) -> Result<()> {
        loop {
            match self.stream.front_token() {
                Some("HAI") => break,
                Some(_) => {
                    self.stream.pop_line();
                }
                None => bail!("unexpected end of input, expecting keyword HAI"),
            }
        }
        self.stream.pop_line();

        loop {
            match self.stream.front_token() {
                Some("KTHXBAI") => return Ok(()),
                Some(_) => {
                    if self.exec_statement()? == Flow::Return {
                        // Unreachable through the grammar: FOUND is only
                        // caught by an enclosing call frame.
                        bail!("found return statement outside function");
                    }
                }
                None => bail!("unexpected end of input, expecting keyword KTHXBAI"),
            }
        }
    }

    //------------------------------------------------------------------
    // Statements
    //------------------------------------------------------------------

    /// Classifies and executes the statement at the front of the stream.
    fn exec_statement(&mut self) -> Result<Flow> {
        let Some(token) = self.stream.front_token() else {
            bail!("unexpected end of input, expecting a statement");
        };
        match token {
            "IM" => self.exec_loop(),
            "O" => self.exec_conditional(),
            "FOUND" => Ok(Flow::Return),
            "I" => self.exec_declaration().map(|()| Flow::Normal),
            "BTW" | "OBTW" => self.exec_comment().map(|()| Flow::Normal),
            "VISIBLE" => self.exec_print().map(|()| Flow::Normal),
            "GIMMEH" => self.exec_input().map(|()| Flow::Normal),
            "HOW" => self.skip_fun_decl().map(|()| Flow::Normal),
            _ => {
                let reassignment = self.stream.front().is_some_and(|line| line.contains(&"R"));
                if reassignment {
                    self.exec_assignment()?;
                } else {
                    // Bare expression: its value lands in the implicit IT
                    // slot of the current scope.
                    let value = self.eval_expr()?;
                    self.innermost_mut().insert(IT, value);
                }
                Ok(Flow::Normal)
            }
        }
    }

    /// `I HAS A <name> [ITZ <expr>]`.
    fn exec_declaration(&mut self) -> Result<()> {
        self.expect_keywords(&["I", "HAS", "A"], "declaration")?;
        let Some(name) = self.stream.pop_token() else {
            bail!("invalid declaration: missing variable name");
        };
        // Shadowing an enclosing scope is fine; redeclaring in the same
        // scope is not.
        if self.innermost().contains(name) {
            bail!("invalid declaration: {name} is already declared in this scope");
        }
        match self.stream.pop_token() {
            Some("ITZ") => {
                let value = self.eval_expr()?;
                self.innermost_mut().insert(name, value);
            }
            None => {
                self.innermost_mut().insert(name, Value::Noob);
                self.stream.trim_front();
            }
            Some(token) => bail!("invalid declaration: unexpected token {token}"),
        }
        Ok(())
    }

    /// `<name> R <expr>`.
    fn exec_assignment(&mut self) -> Result<()> {
        let Some(name) = self.stream.pop_token() else {
            bail!("invalid assignment: missing variable name");
        };
        match self.stream.pop_token() {
            Some("R") => {}
            _ => bail!("invalid assignment to {name}: expected R"),
        }
        let value = self.eval_expr()?;
        self.assign(name, value);
        Ok(())
    }

    /// `VISIBLE <expr>* MKAY?`: one space-joined output line.
    fn exec_print(&mut self) -> Result<()> {
        self.stream.pop_token(); // VISIBLE
        let mut parts = Vec::new();
        loop {
            match self.stream.front_token() {
                Some("MKAY?") => break,
                Some(_) => parts.push(self.eval_expr()?.to_string()),
                None => bail!("invalid VISIBLE statement: expected MKAY?"),
            }
        }
        self.stdout.append(parts.iter().join(" "));
        self.stdout.append("\n");
        self.stream.pop_line();
        Ok(())
    }

    /// `GIMMEH <name>`: reads one line from the input sink into an already
    /// declared variable, interpreting it as a literal when possible.
    fn exec_input(&mut self) -> Result<()> {
        let Some(name) = self.stream.token_at(1) else {
            bail!("invalid GIMMEH statement: missing variable name");
        };
        let Some(idx) = self.env.iter().rposition(|env| env.contains(name)) else {
            bail!("invalid GIMMEH statement: {name} has not been declared");
        };

        let mut buf = String::new();
        let read = self.stdin.read_line(&mut buf)?;
        if read == 0 {
            bail!("unexpected end of input in GIMMEH statement");
        }
        let text = buf.trim_end_matches(|c| c == '\n' || c == '\r');
        let value = Value::from_keyword(text)
            .or_else(|| Value::parse_scalar(text))
            .unwrap_or_else(|| Value::Yarn(text.to_string()));
        self.env[idx].insert(name, value);
        self.stream.pop_line();
        Ok(())
    }

    /// `BTW ...` (rest of the soft line) or `OBTW ... TLDR` (across lines).
    fn exec_comment(&mut self) -> Result<()> {
        if self.stream.front_token() == Some("BTW") {
            self.stream.pop_line();
            return Ok(());
        }
        // OBTW: discard lines until one ends in TLDR, then that line too.
        loop {
            let closed = match self.stream.front() {
                Some(line) => line.back() == Some(&"TLDR"),
                None => bail!("unexpected end of input, expecting keyword TLDR"),
            };
            self.stream.pop_line();
            if closed {
                return Ok(());
            }
        }
    }

    //------------------------------------------------------------------
    // Conditionals
    //------------------------------------------------------------------

    /// `O RLY?` block, branching on the truthiness of the current scope's
    /// implicit IT slot.
    fn exec_conditional(&mut self) -> Result<Flow> {
        if self.stream.front_token() != Some("O") || self.stream.token_at(1) != Some("RLY?") {
            bail!("invalid O RLY? block");
        }
        self.stream.pop_line();

        let it = self.innermost().get(IT).is_some_and(Value::truthy);
        if it {
            // Skip forward to the YA RLY line and discard it.
            loop {
                let found = match self.stream.front() {
                    Some(line) => line.contains(&"YA") || line.contains(&"RLY"),
                    None => bail!("invalid O RLY? block: missing YA RLY"),
                };
                if found {
                    break;
                }
                self.stream.pop_line();
            }
            self.stream.pop_line();

            if self.exec_branch()? == Flow::Return {
                return Ok(Flow::Return);
            }
            self.skip_to_oic()?;
            Ok(Flow::Normal)
        } else {
            self.else_branch(0)
        }
    }

    /// Scans for a `MEBBE`/`NO WAI` branch of an untaken conditional and
    /// executes at most one of them.
    ///
    /// Untaken `MEBBE` branches chain recursively at increasing depth; the
    /// `OIC` terminator is consumed exactly once, by the outermost frame.
    fn else_branch(&mut self, depth: usize) -> Result<Flow> {
        loop {
            match self.stream.front_token() {
                Some("MEBBE" | "NO" | "OIC") => break,
                Some(_) => {
                    self.stream.pop_line();
                }
                None => bail!("invalid O RLY? block: missing OIC"),
            }
        }

        let flow = match self.stream.front_token() {
            Some("MEBBE") => {
                self.stream.pop_token();
                if self.eval_expr()?.truthy() {
                    self.exec_branch()?
                } else {
                    // This MEBBE was not taken: try the next branch.
                    self.else_branch(depth + 1)?
                }
            }
            Some("NO") if self.stream.token_at(1) == Some("WAI") => {
                self.stream.pop_line();
                self.exec_branch()?
            }
            _ => Flow::Normal, // OIC: no branch taken
        };
        if flow == Flow::Return {
            return Ok(Flow::Return);
        }

        if depth == 0 {
            self.skip_to_oic()?;
        }
        Ok(Flow::Normal)
    }

    /// Executes statements until the front line opens with a branch marker
    /// (`MEBBE`, `NO`, `OIC`).
    fn exec_branch(&mut self) -> Result<Flow> {
        loop {
            match self.stream.front_token() {
                Some("MEBBE" | "NO" | "OIC") => return Ok(Flow::Normal),
                Some(_) => {
                    if self.exec_statement()? == Flow::Return {
                        return Ok(Flow::Return);
                    }
                }
                None => bail!("unexpected end of input in O RLY? block"),
            }
        }
    }

    /// Discards lines up to the `OIC` terminator line and consumes it.
    fn skip_to_oic(&mut self) -> Result<()> {
        loop {
            match self.stream.front_token() {
                Some("OIC") => {
                    self.stream.pop_line();
                    return Ok(());
                }
                Some(_) => {
                    self.stream.pop_line();
                }
                None => bail!("invalid O RLY? block: missing OIC"),
            }
        }
    }

    //------------------------------------------------------------------
    // Loops
    //------------------------------------------------------------------

    /// `IM IN YR <name> WILE <cond>` ... `IM OUTTA YR <name>`.
    ///
    /// The condition line and the body are captured once and cloned per
    /// use: both are destructively consumed on every iteration.
    fn exec_loop(&mut self) -> Result<Flow> {
        self.expect_keywords(&["IM", "IN", "YR"], "loop")?;
        let Some(name) = self.stream.pop_token() else {
            bail!("invalid loop: missing name");
        };
        match self.stream.pop_token() {
            Some("WILE") => {}
            _ => bail!("invalid loop {name}: expected WILE"),
        }
        let cond = match self.stream.pop_line() {
            Some(line) if !line.is_empty() => line,
            _ => bail!("invalid loop {name}: missing WILE condition"),
        };

        // Capture the body, leaving the terminator line in the stream as
        // the iteration marker.
        let mut body = Vec::new();
        loop {
            if self.stream.is_empty() {
                bail!("unexpected end of input, expecting IM OUTTA YR {name}");
            }
            if self.at_loop_end(name) {
                break;
            }
            if let Some(line) = self.stream.pop_line() {
                body.push(line);
            }
        }

        loop {
            // Re-splice the condition and check it before every iteration.
            self.stream.splice_front(iter::once(cond.clone()));
            if !self.eval_expr()?.truthy() {
                break;
            }
            self.stream.splice_front(body.iter().cloned());
            loop {
                if self.stream.is_empty() {
                    bail!("unexpected end of input, expecting IM OUTTA YR {name}");
                }
                if self.at_loop_end(name) {
                    break;
                }
                if self.exec_statement()? == Flow::Return {
                    return Ok(Flow::Return);
                }
            }
        }
        self.stream.pop_line(); // IM OUTTA YR <name>
        Ok(Flow::Normal)
    }

    //------------------------------------------------------------------
    // Functions
    //------------------------------------------------------------------

    /// Skips over a `HOW DUZ I` declaration encountered at runtime: the
    /// hoisting pre-scan has already captured it.
    fn skip_fun_decl(&mut self) -> Result<()> {
        let Some(header) = self.stream.pop_line() else {
            bail!("invalid function declaration");
        };
        parse_fun_header(&header)?;
        loop {
            let Some(line) = self.stream.pop_line() else {
                bail!("unexpected end of input, expecting IF U SAY SO");
            };
            if line_is_fun_end(&line) {
                return Ok(());
            }
        }
    }

    /// Calls the function named by the front token.
    ///
    /// Arguments are evaluated in the caller's environment up to the
    /// `MKAY?` terminator, then bound positionally in a fresh environment
    /// and a clone of the body is spliced in and executed.
    fn call_fun(&mut self) -> Result<Value> {
        let Some(name) = self.stream.pop_token() else {
            bail!("unexpected end of input, expecting a function name");
        };
        let fun = self
            .fun_env
            .get(name)
            .cloned()
            .ok_or_else(|| anyhow!("call to undefined function {name}"))?;

        let mut args = Vec::new();
        loop {
            match self.stream.front_token() {
                Some("MKAY?") => break,
                Some(_) => args.push(self.eval_expr()?),
                None => bail!("invalid call to function {name}: expected MKAY?"),
            }
        }
        if args.len() != fun.params.len() {
            bail!(
                "invalid number of arguments in function call to {name}: expected {}, got {}",
                fun.params.len(),
                args.len()
            );
        }
        self.stream.pop_token(); // MKAY?

        // Fresh environment parented to the caller's, parameters bound
        // positionally to the already-evaluated arguments.
        let mut env = Env::new();
        for (&param, arg) in fun.params.iter().zip(args) {
            env.insert(param, arg);
        }
        self.env.push(env);
        self.stream.splice_front(fun.body);

        let mut out = Value::Noob;
        loop {
            if self.stream.is_empty() {
                bail!("unexpected end of input, expecting IF U SAY SO");
            }
            if self.at_fun_end() {
                // Implicit return.
                self.stream.pop_line();
                break;
            }
            match self.exec_statement()? {
                Flow::Normal => {}
                Flow::Return => {
                    self.expect_keywords(&["FOUND", "YR"], "FOUND statement")?;
                    out = self.eval_expr()?;
                    // Discard the unexecuted remainder of the body.
                    while !self.at_fun_end() {
                        if self.stream.pop_line().is_none() {
                            bail!("unexpected end of input, expecting IF U SAY SO");
                        }
                    }
                    self.stream.pop_line();
                    break;
                }
            }
        }
        self.env.pop();
        Ok(out)
    }

    //------------------------------------------------------------------
    // Expressions
    //------------------------------------------------------------------

    /// Evaluates the expression at the front of the stream, consuming
    /// exactly the tokens that compose it.
    fn eval_expr(&mut self) -> Result<Value> {
        let Some(token) = self.stream.front_token() else {
            bail!("unexpected end of input, expecting an expression");
        };
        let out = match token {
            // BOTH disambiguates on its second token: OF is the logical
            // AND, otherwise a BOTH SAEM comparison is expected.
            "BOTH" if self.stream.token_at(1) == Some("OF") => self.logic_binop("BOTH")?,
            "BOTH" => self.equality(false)?,
            "DIFFRINT" => self.equality(true)?,
            "EITHER" => self.logic_binop("EITHER")?,
            "NOT" => self.negation()?,
            "ALL" | "ANY" => self.logic_nary(token)?,
            "SUM" | "DIFF" | "PRODUKT" | "QUOSHUNT" | "MOD" => self.arith(token)?,
            "BIGGR" | "SMALLR" => self.extremum(token)?,
            "MAEK" => self.cast_expr()?,
            other => {
                if let Some(value) = self.find_var(other).cloned() {
                    self.stream.pop_token();
                    value
                } else if self.fun_env.contains_key(other) {
                    self.call_fun()?
                } else {
                    self.atom()?
                }
            }
        };
        self.stream.trim_front();
        Ok(out)
    }

    /// Parses a literal: boolean/null keyword, else integer, else float,
    /// else a quoted text literal.
    fn atom(&mut self) -> Result<Value> {
        let Some(token) = self.stream.front_token() else {
            bail!("unexpected end of input, expecting an expression");
        };
        if let Some(value) = Value::from_keyword(token) {
            self.stream.pop_token();
            return Ok(value);
        }
        if let Some(value) = Value::parse_scalar(token) {
            self.stream.pop_token();
            return Ok(value);
        }
        self.yarn()
    }

    /// Parses a quoted text literal, which may span several tokens of the
    /// front line; the separating whitespace comes back as single spaces.
    fn yarn(&mut self) -> Result<Value> {
        let Some(first) = self.stream.front_token() else {
            bail!("unexpected end of input, expecting an expression");
        };
        if !first.contains('"') {
            bail!("invalid YARN: {first}");
        }
        self.stream.pop_token();
        let mut text = String::from(first);
        if first.matches('"').count() < 2 {
            loop {
                let Some(token) = self.stream.pop_token() else {
                    bail!("invalid YARN: unterminated string literal");
                };
                text.push(' ');
                text.push_str(token);
                if token.contains('"') {
                    break;
                }
            }
        }
        Ok(Value::Yarn(text.trim_matches('"').to_string()))
    }

    //------------------------------------------------------------------
    // Operators
    //------------------------------------------------------------------

    /// Evaluates the two operands of a binary operator, separated by the
    /// mandatory `AN` keyword.
    fn bin_args(&mut self, op: &str) -> Result<(Value, Value)> {
        let x = self.eval_expr()?;
        match self.stream.pop_token() {
            Some("AN") => {}
            _ => bail!("invalid {op} operation: expected AN between operands"),
        }
        let y = self.eval_expr()?;
        Ok((x, y))
    }

    /// `BOTH OF`/`EITHER OF`: logical AND/OR over truthiness.
    fn logic_binop(&mut self, op: &str) -> Result<Value> {
        self.stream.pop_token();
        match self.stream.pop_token() {
            Some("OF") => {}
            _ => bail!("invalid {op} operation: expected OF"),
        }
        let (x, y) = self.bin_args(op)?;
        let res = match op {
            "BOTH" => x.truthy() && y.truthy(),
            _ => x.truthy() || y.truthy(),
        };
        Ok(Value::Troof(res))
    }

    /// `NOT <expr>`.
    fn negation(&mut self) -> Result<Value> {
        self.stream.pop_token();
        let x = self.eval_expr()?;
        Ok(Value::Troof(!x.truthy()))
    }

    /// `ALL OF`/`ANY OF <expr> (AN <expr>)* MKAY?`: n-ary AND/OR.
    ///
    /// Every operand is evaluated; there is no short-circuiting.
    fn logic_nary(&mut self, op: &str) -> Result<Value> {
        self.stream.pop_token();
        match self.stream.pop_token() {
            Some("OF") => {}
            _ => bail!("invalid {op} operation: expected OF"),
        }
        let mut values = Vec::new();
        loop {
            match self.stream.front_token() {
                Some("MKAY?") => break,
                // The separator is optional between operands.
                Some("AN") => {
                    self.stream.pop_token();
                }
                Some(_) => values.push(self.eval_expr()?),
                None => bail!("invalid {op} operation: expected MKAY?"),
            }
        }
        self.stream.pop_token(); // MKAY?
        let res = match op {
            "ALL" => values.iter().all(Value::truthy),
            _ => values.iter().any(Value::truthy),
        };
        Ok(Value::Troof(res))
    }

    /// `BOTH SAEM`/`DIFFRINT`: type-and-value (in)equality.
    fn equality(&mut self, negated: bool) -> Result<Value> {
        if negated {
            self.stream.pop_token(); // DIFFRINT
            let (x, y) = self.bin_args("DIFFRINT")?;
            Ok(Value::Troof(x != y))
        } else {
            self.stream.pop_token(); // BOTH
            match self.stream.pop_token() {
                Some("SAEM") => {}
                _ => bail!("invalid BOTH SAEM comparison: expected SAEM"),
            }
            let (x, y) = self.bin_args("BOTH SAEM")?;
            Ok(Value::Troof(x == y))
        }
    }

    /// `SUM`/`DIFF`/`PRODUKT`/`QUOSHUNT`/`MOD` `OF <x> AN <y>`.
    ///
    /// Integer operands stay integers except for division, which always
    /// yields a float; mixing an integer and a float promotes to float.
    fn arith(&mut self, op: &str) -> Result<Value> {
        self.stream.pop_token();
        match self.stream.pop_token() {
            Some("OF") => {}
            _ => bail!("invalid {op} operation: expected OF"),
        }
        let (x, y) = self.bin_args(op)?;
        let value = match (op, numeric_pair(x, y, op)?) {
            ("SUM", NumPair::Ints(a, b)) => Value::Numbr(a + b),
            ("SUM", NumPair::Floats(a, b)) => Value::Numbar(a + b),
            ("DIFF", NumPair::Ints(a, b)) => Value::Numbr(a - b),
            ("DIFF", NumPair::Floats(a, b)) => Value::Numbar(a - b),
            ("PRODUKT", NumPair::Ints(a, b)) => Value::Numbr(a * b),
            ("PRODUKT", NumPair::Floats(a, b)) => Value::Numbar(a * b),
            ("QUOSHUNT", NumPair::Ints(a, b)) => {
                if b.sign() == Sign::NoSign {
                    bail!("division by zero in QUOSHUNT operation");
                }
                Value::Numbar(to_f64(&a) / to_f64(&b))
            }
            ("QUOSHUNT", NumPair::Floats(a, b)) => {
                if b == 0.0 {
                    bail!("division by zero in QUOSHUNT operation");
                }
                Value::Numbar(a / b)
            }
            ("MOD", NumPair::Ints(a, b)) => {
                if b.sign() == Sign::NoSign {
                    bail!("division by zero in MOD operation");
                }
                Value::Numbr(a % b)
            }
            ("MOD", NumPair::Floats(a, b)) => {
                if b == 0.0 {
                    bail!("division by zero in MOD operation");
                }
                Value::Numbar(a % b)
            }
            _ => unreachable!(),
        };
        Ok(value)
    }

    /// `BIGGR OF`/`SMALLR OF`: max/min, returning the winning operand
    /// itself so its type is preserved.
    fn extremum(&mut self, op: &str) -> Result<Value> {
        self.stream.pop_token();
        match self.stream.pop_token() {
            Some("OF") => {}
            _ => bail!("invalid {op} operation: expected OF"),
        }
        let (x, y) = self.bin_args(op)?;
        let ordering = compare(&x, &y, op)?;
        let keep_first = match op {
            "BIGGR" => ordering != Ordering::Less,
            _ => ordering != Ordering::Greater,
        };
        Ok(if keep_first { x } else { y })
    }

    /// `MAEK <expr> A <type>`.
    fn cast_expr(&mut self) -> Result<Value> {
        self.stream.pop_token(); // MAEK
        let value = self.eval_expr()?;
        match self.stream.pop_token() {
            Some("A") => {}
            _ => bail!("invalid cast: expected A before the type name"),
        }
        let Some(token) = self.stream.pop_token() else {
            bail!("invalid cast: missing type name");
        };
        let ty =
            Type::from_token(token).ok_or_else(|| anyhow!("invalid cast: unknown type {token}"))?;
        value.cast(ty)
    }

    //------------------------------------------------------------------
    // Token helpers
    //------------------------------------------------------------------

    /// Consumes the given keyword tokens from the front line, in order.
    fn expect_keywords(&mut self, keywords: &[&str], what: &str) -> Result<()> {
        for keyword in keywords {
            if self.stream.pop_token() != Some(*keyword) {
                bail!("invalid {what}");
            }
        }
        Ok(())
    }

    /// Is the front line this loop's `IM OUTTA YR <name>` terminator?
    fn at_loop_end(&self, name: &str) -> bool {
        self.stream.front().is_some_and(|line| {
            line.len() == 4
                && line[0] == "IM"
                && line[1] == "OUTTA"
                && line[2] == "YR"
                && line[3] == name
        })
    }

    /// Is the front line the `IF U SAY SO` function terminator?
    fn at_fun_end(&self) -> bool {
        self.stream.front().is_some_and(line_is_fun_end)
    }
}

/// Is this line the fixed 4-token `IF U SAY SO` terminator?
fn line_is_fun_end(line: &Line<'_>) -> bool {
    line.len() == 4 && line[0] == "IF" && line[1] == "U" && line[2] == "SAY" && line[3] == "SO"
}

/// Does this line open with the given keywords?
fn line_starts_with(line: &Line<'_>, keywords: &[&str]) -> bool {
    keywords.len() <= line.len() && keywords.iter().zip(line.iter()).all(|(kw, tok)| kw == tok)
}

/// Parses a `HOW DUZ I <name> [YR <param> (AN YR <param>)*]` header line.
fn parse_fun_header<'ctx>(line: &Line<'ctx>) -> Result<(&'ctx str, Vec<&'ctx str>)> {
    let mut tokens = line.iter().copied();
    for keyword in ["HOW", "DUZ", "I"] {
        if tokens.next() != Some(keyword) {
            bail!("invalid function declaration");
        }
    }
    let name = tokens
        .next()
        .ok_or_else(|| anyhow!("invalid function declaration: missing name"))?;
    let mut params = Vec::new();
    if let Some(sep) = tokens.next() {
        if sep != "YR" {
            bail!("invalid function declaration for {name}: expected YR");
        }
        loop {
            let param = tokens.next().ok_or_else(|| {
                anyhow!("invalid function declaration for {name}: missing parameter name")
            })?;
            params.push(param);
            match tokens.next() {
                None => break,
                Some("AN") => {
                    if tokens.next() != Some("YR") {
                        bail!("invalid function declaration for {name}: expected AN YR");
                    }
                }
                Some(_) => bail!("invalid function declaration for {name}: expected AN YR"),
            }
        }
    }
    Ok((name, params))
}

/// A pair of operands promoted to a common numeric type.
enum NumPair {
    /// Both operands are integers.
    Ints(BigInt, BigInt),
    /// At least one operand is a float: both promoted.
    Floats(f64, f64),
}

/// Promotes two operands for arithmetic, rejecting non-numeric ones.
fn numeric_pair(x: Value, y: Value, op: &str) -> Result<NumPair> {
    let pair = match (x, y) {
        (Value::Numbr(a), Value::Numbr(b)) => NumPair::Ints(a, b),
        (Value::Numbr(a), Value::Numbar(b)) => NumPair::Floats(to_f64(&a), b),
        (Value::Numbar(a), Value::Numbr(b)) => NumPair::Floats(a, to_f64(&b)),
        (Value::Numbar(a), Value::Numbar(b)) => NumPair::Floats(a, b),
        (x, y) => bail!(
            "invalid {op} operation on {} and {}",
            x.type_name(),
            y.type_name()
        ),
    };
    Ok(pair)
}

/// Orders two values for `BIGGR OF`/`SMALLR OF`: numerically for numbers
/// (with promotion), lexically for two YARNs.
fn compare(x: &Value, y: &Value, op: &str) -> Result<Ordering> {
    let ordering = match (x, y) {
        (Value::Numbr(a), Value::Numbr(b)) => a.cmp(b),
        (Value::Numbr(a), Value::Numbar(b)) => partial_order(to_f64(a), *b, op)?,
        (Value::Numbar(a), Value::Numbr(b)) => partial_order(*a, to_f64(b), op)?,
        (Value::Numbar(a), Value::Numbar(b)) => partial_order(*a, *b, op)?,
        (Value::Yarn(a), Value::Yarn(b)) => a.cmp(b),
        (x, y) => bail!(
            "invalid {op} operation on {} and {}",
            x.type_name(),
            y.type_name()
        ),
    };
    Ok(ordering)
}

/// Orders two floats, rejecting the unordered NaN case.
fn partial_order(a: f64, b: f64, op: &str) -> Result<Ordering> {
    a.partial_cmp(&b)
        .ok_or_else(|| anyhow!("invalid {op} operation on NaN"))
}

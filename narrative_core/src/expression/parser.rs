//! Parser for condition and command strings.
//!
//! Conditions use a flat two-level grammar: whitespace-separated clauses are
//! AND'ed, and `|`-separated atoms inside a clause are OR'ed. There is no
//! nesting and no grouping.
//!
//! ```text
//! condition := clause (WS clause)*
//! clause    := atom ('|' atom)*
//! atom      := directive | NAME op VALUE | '!'? NAME
//! op        := '==' | '!=' | '<' | '<=' | '>' | '>='
//! ```
//!
//! Commands are `;`-separated and each is either a directive or
//! `NAME ('=' | '+' | '-') VALUE`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Separator between command tokens.
pub const COMMAND_SEPARATOR: char = ';';

/// Separator between the alternatives of a clause.
pub const ALTERNATIVE_SEPARATOR: char = '|';

/// Prefix marking a directive call.
pub const DIRECTIVE_PREFIX: char = '@';

/// Syntax errors. The live evaluator treats these as "could not evaluate";
/// validation tooling reports them.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ParseError {
    #[error("directive '{0}' has no argument list")]
    MissingArgumentList(String),
    #[error("directive '{0}' has no name")]
    EmptyDirectiveName(String),
    #[error("unbalanced parentheses in '{0}'")]
    UnbalancedParentheses(String),
    #[error("nested parentheses are not supported in '{0}'")]
    NestedParentheses(String),
    #[error("unexpected text after the argument list in '{0}'")]
    TrailingText(String),
    #[error("malformed comparison '{0}'")]
    MalformedComparison(String),
    #[error("malformed assignment '{0}'")]
    MalformedAssignment(String),
    #[error("clause with no conditions in '{0}'")]
    EmptyClause(String),
    #[error("missing flag name in '{0}'")]
    EmptyFlagName(String),
}

/// A parsed `@name(arg, ...)` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectiveCall {
    pub name: String,
    pub args: Vec<String>,
}

impl DirectiveCall {
    /// Parse a directive token, including the leading `@`.
    pub fn parse(token: &str) -> Result<Self, ParseError> {
        let token = token.trim();
        let body = token
            .strip_prefix(DIRECTIVE_PREFIX)
            .unwrap_or(token);

        let Some(open) = body.find('(') else {
            if body.contains(')') {
                return Err(ParseError::UnbalancedParentheses(token.to_string()));
            }
            return Err(ParseError::MissingArgumentList(token.to_string()));
        };

        let name = body[..open].trim();
        if name.contains(')') {
            return Err(ParseError::UnbalancedParentheses(token.to_string()));
        }
        if name.is_empty() {
            return Err(ParseError::EmptyDirectiveName(token.to_string()));
        }

        let rest = &body[open + 1..];
        let Some(close) = rest.find(')') else {
            return Err(ParseError::UnbalancedParentheses(token.to_string()));
        };
        let inner = &rest[..close];
        if inner.contains('(') {
            return Err(ParseError::NestedParentheses(token.to_string()));
        }

        let after = &rest[close + 1..];
        if after.contains(')') || after.contains('(') {
            return Err(ParseError::UnbalancedParentheses(token.to_string()));
        }
        if !after.trim().is_empty() {
            return Err(ParseError::TrailingText(token.to_string()));
        }

        let args = if inner.trim().is_empty() {
            Vec::new()
        } else {
            inner.split(',').map(|arg| arg.trim().to_string()).collect()
        };

        Ok(Self {
            name: name.to_string(),
            args,
        })
    }
}

impl std::fmt::Display for DirectiveCall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}({})", DIRECTIVE_PREFIX, self.name, self.args.join(","))
    }
}

/// Relational operators allowed in comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOp {
    fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "==" => Some(CompareOp::Eq),
            "!=" => Some(CompareOp::Ne),
            "<" => Some(CompareOp::Lt),
            "<=" => Some(CompareOp::Le),
            ">" => Some(CompareOp::Gt),
            ">=" => Some(CompareOp::Ge),
            _ => None,
        }
    }

    /// Apply the operator.
    pub fn compare(&self, lhs: i64, rhs: i64) -> bool {
        match self {
            CompareOp::Eq => lhs == rhs,
            CompareOp::Ne => lhs != rhs,
            CompareOp::Lt => lhs < rhs,
            CompareOp::Le => lhs <= rhs,
            CompareOp::Gt => lhs > rhs,
            CompareOp::Ge => lhs >= rhs,
        }
    }
}

/// The smallest unit of a condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Atom {
    Directive(DirectiveCall),
    /// `stat op value`; the value is kept as written and parsed on evaluation.
    Comparison {
        stat: String,
        op: CompareOp,
        value: String,
    },
    Flag {
        name: String,
        negated: bool,
    },
}

impl Atom {
    /// Parse a single atom (no whitespace, no `|`).
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let text = text.trim();

        if text.starts_with(DIRECTIVE_PREFIX) {
            return DirectiveCall::parse(text).map(Atom::Directive);
        }

        if text.contains(&['=', '<', '>'][..]) {
            return parse_comparison(text);
        }

        let (name, negated) = match text.strip_prefix('!') {
            Some(name) => (name.trim(), true),
            None => (text, false),
        };
        if name.is_empty() {
            return Err(ParseError::EmptyFlagName(text.to_string()));
        }
        Ok(Atom::Flag {
            name: name.to_string(),
            negated,
        })
    }
}

fn parse_comparison(text: &str) -> Result<Atom, ParseError> {
    let is_op_char = |c: char| matches!(c, '=' | '!' | '<' | '>');
    let malformed = || ParseError::MalformedComparison(text.to_string());

    let start = text.find(is_op_char).ok_or_else(malformed)?;
    let end = text[start..]
        .find(|c: char| !is_op_char(c))
        .map(|offset| start + offset)
        .unwrap_or(text.len());

    let op = CompareOp::from_symbol(&text[start..end]).ok_or_else(malformed)?;
    let stat = text[..start].trim();
    let value = text[end..].trim();
    if stat.is_empty() || value.is_empty() {
        return Err(malformed());
    }

    Ok(Atom::Comparison {
        stat: stat.to_string(),
        op,
        value: value.to_string(),
    })
}

/// Split a condition into clauses of raw atom text, without parsing the atoms.
///
/// An empty or whitespace-only condition yields no clauses.
pub fn split_condition(condition: &str) -> Vec<Vec<&str>> {
    condition
        .split_whitespace()
        .map(|clause| {
            clause
                .split(ALTERNATIVE_SEPARATOR)
                .filter(|alt| !alt.is_empty())
                .collect()
        })
        .collect()
}

/// A fully parsed condition: every clause must hold, and a clause holds if any
/// of its atoms does.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Condition {
    pub clauses: Vec<Vec<Atom>>,
}

impl Condition {
    /// True for the empty condition, which always passes.
    pub fn is_trivial(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Iterate over every atom in the condition.
    pub fn atoms(&self) -> impl Iterator<Item = &Atom> {
        self.clauses.iter().flatten()
    }
}

/// Parse a whole condition, failing on the first malformed atom or on a clause
/// made only of `|` separators.
pub fn parse_condition(condition: &str) -> Result<Condition, ParseError> {
    let clauses = split_condition(condition)
        .into_iter()
        .map(|clause| {
            if clause.is_empty() {
                return Err(ParseError::EmptyClause(condition.to_string()));
            }
            clause.into_iter().map(Atom::parse).collect()
        })
        .collect::<Result<Vec<Vec<Atom>>, _>>()?;
    Ok(Condition { clauses })
}

/// Assignment operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignOp {
    Set,
    Add,
    Sub,
}

impl AssignOp {
    fn symbol(&self) -> char {
        match self {
            AssignOp::Set => '=',
            AssignOp::Add => '+',
            AssignOp::Sub => '-',
        }
    }

    /// Apply the operator to a current value.
    pub fn apply(&self, current: i64, operand: i64) -> i64 {
        match self {
            AssignOp::Set => operand,
            AssignOp::Add => current.saturating_add(operand),
            AssignOp::Sub => current.saturating_sub(operand),
        }
    }
}

/// One command token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    Directive(DirectiveCall),
    /// `target op value`; the value is interpreted once the target is known to
    /// be a stat or a flag.
    Assign {
        target: String,
        op: AssignOp,
        value: String,
    },
}

impl Command {
    /// Parse a single command token.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let text = text.trim();

        if text.starts_with(DIRECTIVE_PREFIX) {
            return DirectiveCall::parse(text).map(Command::Directive);
        }

        // The first `+` or `-` picks the operator; otherwise it is `=`.
        let op = match text.find(&['+', '-'][..]) {
            Some(i) if text.as_bytes()[i] == b'+' => AssignOp::Add,
            Some(_) => AssignOp::Sub,
            None => AssignOp::Set,
        };

        let malformed = || ParseError::MalformedAssignment(text.to_string());
        let (target, value) = text.split_once(op.symbol()).ok_or_else(malformed)?;
        let (target, value) = (target.trim(), value.trim());

        if target.is_empty() || target.contains(&['=', '+', '-'][..]) || value.contains(op.symbol()) {
            return Err(malformed());
        }

        Ok(Command::Assign {
            target: target.to_string(),
            op,
            value: value.to_string(),
        })
    }
}

/// Split a command string into trimmed, non-empty tokens.
pub fn split_commands(commands: &str) -> impl Iterator<Item = &str> {
    commands
        .split(COMMAND_SEPARATOR)
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Parse every command in a command string, failing on the first malformed one.
pub fn parse_commands(commands: &str) -> Result<Vec<Command>, ParseError> {
    split_commands(commands).map(Command::parse).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_directive() {
        let call = DirectiveCall::parse("@rollSuccess(0.25)").unwrap();
        assert_eq!(call.name, "rollSuccess");
        assert_eq!(call.args, vec!["0.25"]);

        let call = DirectiveCall::parse("@gameEnd( 2 , x )").unwrap();
        assert_eq!(call.args, vec!["2", "x"]);

        let call = DirectiveCall::parse("@noop()").unwrap();
        assert!(call.args.is_empty());
        assert_eq!(call.to_string(), "@noop()");
    }

    #[test]
    fn test_parse_directive_errors() {
        assert!(matches!(
            DirectiveCall::parse("@rollSuccess"),
            Err(ParseError::MissingArgumentList(_))
        ));
        assert!(matches!(
            DirectiveCall::parse("@rollSuccess(0.5"),
            Err(ParseError::UnbalancedParentheses(_))
        ));
        assert!(matches!(
            DirectiveCall::parse("@rollSuccess(0.5))"),
            Err(ParseError::UnbalancedParentheses(_))
        ));
        assert!(matches!(
            DirectiveCall::parse("@roll)Success(0.5"),
            Err(ParseError::UnbalancedParentheses(_))
        ));
        assert!(matches!(
            DirectiveCall::parse("@outer(inner(1))"),
            Err(ParseError::NestedParentheses(_))
        ));
        assert!(matches!(
            DirectiveCall::parse("@(1)"),
            Err(ParseError::EmptyDirectiveName(_))
        ));
        assert!(matches!(
            DirectiveCall::parse("@gameEnd(1)extra"),
            Err(ParseError::TrailingText(_))
        ));
    }

    #[test]
    fn test_parse_comparisons() {
        let cases = [
            ("money==5", CompareOp::Eq, "5"),
            ("money!=5", CompareOp::Ne, "5"),
            ("money<5", CompareOp::Lt, "5"),
            ("money<=5", CompareOp::Le, "5"),
            ("money>5", CompareOp::Gt, "5"),
            ("money>=-5", CompareOp::Ge, "-5"),
        ];
        for (text, expected_op, expected_value) in cases {
            match Atom::parse(text).unwrap() {
                Atom::Comparison { stat, op, value } => {
                    assert_eq!(stat, "money", "{}", text);
                    assert_eq!(op, expected_op, "{}", text);
                    assert_eq!(value, expected_value, "{}", text);
                }
                other => panic!("{} parsed as {:?}", text, other),
            }
        }
    }

    #[test]
    fn test_malformed_comparisons() {
        for text in ["money=5", "money<>5", "money=>5", ">5", "money>", "money===5"] {
            assert!(
                matches!(Atom::parse(text), Err(ParseError::MalformedComparison(_))),
                "{}",
                text
            );
        }
    }

    #[test]
    fn test_parse_flags() {
        assert_eq!(
            Atom::parse("hasMask").unwrap(),
            Atom::Flag {
                name: "hasMask".to_string(),
                negated: false
            }
        );
        assert_eq!(
            Atom::parse("!hasMask").unwrap(),
            Atom::Flag {
                name: "hasMask".to_string(),
                negated: true
            }
        );
        assert_eq!(
            Atom::parse("!"),
            Err(ParseError::EmptyFlagName("!".to_string()))
        );
        assert_eq!(
            Atom::parse(""),
            Err(ParseError::EmptyFlagName(String::new()))
        );
    }

    #[test]
    fn test_split_condition() {
        assert!(split_condition("").is_empty());
        assert!(split_condition("   \t ").is_empty());
        assert_eq!(
            split_condition("money>100  hasMask|hasCar"),
            vec![vec!["money>100"], vec!["hasMask", "hasCar"]]
        );
        assert_eq!(split_condition("a||b"), vec![vec!["a", "b"]]);
        assert_eq!(split_condition("|"), vec![Vec::<&str>::new()]);
    }

    #[test]
    fn test_parse_condition() {
        let condition = parse_condition("day>=2 !hasCovid|@rollSuccess(0.5)").unwrap();
        assert_eq!(condition.clauses.len(), 2);
        assert_eq!(condition.clauses[1].len(), 2);
        assert_eq!(condition.atoms().count(), 3);
        assert!(parse_condition("").unwrap().is_trivial());
        assert!(parse_condition("a @broken(").is_err());
        assert!(matches!(
            parse_condition("hasMask |"),
            Err(ParseError::EmptyClause(_))
        ));
        assert!(matches!(parse_condition("|"), Err(ParseError::EmptyClause(_))));
    }

    #[test]
    fn test_parse_assignments() {
        assert_eq!(
            Command::parse("money = 500").unwrap(),
            Command::Assign {
                target: "money".to_string(),
                op: AssignOp::Set,
                value: "500".to_string()
            }
        );
        assert_eq!(
            Command::parse("time+600").unwrap(),
            Command::Assign {
                target: "time".to_string(),
                op: AssignOp::Add,
                value: "600".to_string()
            }
        );
        assert_eq!(
            Command::parse("energy-10").unwrap(),
            Command::Assign {
                target: "energy".to_string(),
                op: AssignOp::Sub,
                value: "10".to_string()
            }
        );
        assert_eq!(
            Command::parse("stress+-5").unwrap(),
            Command::Assign {
                target: "stress".to_string(),
                op: AssignOp::Add,
                value: "-5".to_string()
            }
        );
    }

    #[test]
    fn test_malformed_assignments() {
        for text in ["money", "=5", "a+b+c", "a=-5", "a==5"] {
            assert!(
                matches!(Command::parse(text), Err(ParseError::MalformedAssignment(_))),
                "{}",
                text
            );
        }
    }

    #[test]
    fn test_parse_commands() {
        let commands = parse_commands(" money-50 ; ;food+3;@gameEnd(1) ").unwrap();
        assert_eq!(commands.len(), 3);
        assert!(matches!(&commands[2], Command::Directive(call) if call.name == "gameEnd"));
        assert!(parse_commands("").unwrap().is_empty());
    }

    #[test]
    fn test_apply_ops() {
        assert_eq!(AssignOp::Set.apply(10, 3), 3);
        assert_eq!(AssignOp::Add.apply(10, 3), 13);
        assert_eq!(AssignOp::Sub.apply(10, 3), 7);
        assert_eq!(AssignOp::Add.apply(i64::MAX, 1), i64::MAX);
        assert!(CompareOp::Le.compare(3, 3));
        assert!(!CompareOp::Ne.compare(3, 3));
    }
}

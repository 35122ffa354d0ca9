//! The closed set of syntactic constructs

use serde::{Deserialize, Serialize};
use std::fmt;

/// One variant per construct a parser may hand to the semantic pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Whole translation unit
    Root,
    /// `struct` declaration
    Struct,
    /// Field name inside a struct declaration or a selection
    Field,
    /// Named (struct) type
    TypeId,
    /// `void` type keyword
    Void,
    /// `int` type keyword
    Int,
    /// `char` type keyword
    Char,
    /// `bool` type keyword
    Bool,
    /// `string` type keyword
    String,
    /// `[]` marker on a declared type
    Array,
    /// Declared identifier
    DeclId,
    /// Function definition
    Function,
    /// Function prototype
    Prototype,
    /// Parameter list of a function or prototype
    ParamList,
    /// Variable declaration
    VarDecl,
    /// Braced block
    Block,
    /// `while` loop
    While,
    /// `if` without `else`
    If,
    /// `if` with `else`
    IfElse,
    /// `return` with a value
    Return,
    /// `return` without a value
    ReturnVoid,
    /// Assignment
    Assign,
    /// `+`
    Add,
    /// binary `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Rem,
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// unary `+`
    Pos,
    /// unary `-`
    Neg,
    /// `!`
    Not,
    /// `ord` cast
    Ord,
    /// `chr` cast
    Chr,
    /// Function call
    Call,
    /// `new S()`
    New,
    /// `new T[n]`
    NewArray,
    /// `new string[n]`
    NewString,
    /// `a[i]`
    Index,
    /// `a.f`
    Select,
    /// Identifier reference
    Ident,
    /// Integer literal
    IntCon,
    /// Character literal
    CharCon,
    /// String literal
    StringCon,
    /// `null`
    Null,
}

impl NodeKind {
    /// Token name as the parser reports it
    pub fn token_name(self) -> &'static str {
        match self {
            Self::Root => "TOK_ROOT",
            Self::Struct => "TOK_STRUCT",
            Self::Field => "TOK_FIELD",
            Self::TypeId => "TOK_TYPEID",
            Self::Void => "TOK_VOID",
            Self::Int => "TOK_INT",
            Self::Char => "TOK_CHAR",
            Self::Bool => "TOK_BOOL",
            Self::String => "TOK_STRING",
            Self::Array => "TOK_ARRAY",
            Self::DeclId => "TOK_DECLID",
            Self::Function => "TOK_FUNCTION",
            Self::Prototype => "TOK_PROTOTYPE",
            Self::ParamList => "TOK_PARAMLIST",
            Self::VarDecl => "TOK_VARDECL",
            Self::Block => "TOK_BLOCK",
            Self::While => "TOK_WHILE",
            Self::If => "TOK_IF",
            Self::IfElse => "TOK_IFELSE",
            Self::Return => "TOK_RETURN",
            Self::ReturnVoid => "TOK_RETURNVOID",
            Self::Assign => "'='",
            Self::Add => "'+'",
            Self::Sub => "'-'",
            Self::Mul => "'*'",
            Self::Div => "'/'",
            Self::Rem => "'%'",
            Self::Eq => "TOK_EQ",
            Self::Ne => "TOK_NE",
            Self::Lt => "TOK_LT",
            Self::Le => "TOK_LE",
            Self::Gt => "TOK_GT",
            Self::Ge => "TOK_GE",
            Self::Pos => "TOK_POS",
            Self::Neg => "TOK_NEG",
            Self::Not => "'!'",
            Self::Ord => "TOK_ORD",
            Self::Chr => "TOK_CHR",
            Self::Call => "TOK_CALL",
            Self::New => "TOK_NEW",
            Self::NewArray => "TOK_NEWARRAY",
            Self::NewString => "TOK_NEWSTRING",
            Self::Index => "TOK_INDEX",
            Self::Select => "'.'",
            Self::Ident => "TOK_IDENT",
            Self::IntCon => "TOK_INTCON",
            Self::CharCon => "TOK_CHARCON",
            Self::StringCon => "TOK_STRINGCON",
            Self::Null => "TOK_NULL",
        }
    }

    /// Tag used in the annotated-tree dump
    pub fn tag(self) -> &'static str {
        let name = self.token_name();
        name.strip_prefix("TOK_").unwrap_or(name)
    }

    /// Operator spelling for binary and unary operators
    pub fn operator(self) -> Option<&'static str> {
        let op = match self {
            Self::Add | Self::Pos => "+",
            Self::Sub | Self::Neg => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Rem => "%",
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Not => "!",
            Self::Ord => "ord",
            Self::Chr => "chr",
            _ => return None,
        };
        Some(op)
    }

    /// Kinds that name a type in a declaration
    pub fn is_type(self) -> bool {
        matches!(
            self,
            Self::Void | Self::Int | Self::Char | Self::Bool | Self::String | Self::TypeId
        )
    }

    /// `+ - * / %`
    pub fn is_arithmetic(self) -> bool {
        matches!(self, Self::Add | Self::Sub | Self::Mul | Self::Div | Self::Rem)
    }

    /// `== != < <= > >=`
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            Self::Eq | Self::Ne | Self::Lt | Self::Le | Self::Gt | Self::Ge
        )
    }

    /// Two-operand operators
    pub fn is_binary(self) -> bool {
        self.is_arithmetic() || self.is_comparison()
    }

    /// One-operand operators, casts included
    pub fn is_unary(self) -> bool {
        matches!(
            self,
            Self::Pos | Self::Neg | Self::Not | Self::Ord | Self::Chr
        )
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_strips_token_prefix() {
        assert_eq!(NodeKind::VarDecl.tag(), "VARDECL");
        assert_eq!(NodeKind::Assign.tag(), "'='");
        assert_eq!(NodeKind::Select.to_string(), "'.'");
    }

    #[test]
    fn test_operator_classification() {
        assert!(NodeKind::Lt.is_comparison());
        assert!(NodeKind::Lt.is_binary());
        assert!(!NodeKind::Not.is_binary());
        assert!(NodeKind::Chr.is_unary());
        assert_eq!(NodeKind::Le.operator(), Some("<="));
        assert_eq!(NodeKind::Ident.operator(), None);
    }

    #[test]
    fn test_serde_names_are_lowercase() {
        let kind: NodeKind = serde_json::from_str("\"vardecl\"").unwrap();
        assert_eq!(kind, NodeKind::VarDecl);
        let kind: NodeKind = serde_json::from_str("\"typeid\"").unwrap();
        assert_eq!(kind, NodeKind::TypeId);
        assert_eq!(serde_json::to_string(&NodeKind::IntCon).unwrap(), "\"intcon\"");
    }
}

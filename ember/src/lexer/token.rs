//! Token definitions

use logos::Logos;

/// Ember token
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r]+")]
#[logos(skip r"#[^\n]*")]
pub enum Token {
    // Keywords
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("fn")]
    Fn,
    #[token("let")]
    Let,
    #[token("const")]
    Const,

    // Comparison (longest match wins over `=`, `<`, `>`)
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,

    // Logical
    #[token("&&")]
    AndAnd,
    #[token("||")]
    OrOr,

    // Arithmetic
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,

    // Punctuation
    #[token("=>")]
    FatArrow,
    #[token("=")]
    Eq,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(",")]
    Comma,
    #[token(";")]
    Semi,

    // A leading `~` marks a negative literal: `~2.5` is -2.5
    #[regex(r"~?([0-9]+(\.[0-9]*)?|\.[0-9]+)", parse_number)]
    Number(f64),

    #[regex(r#""[^"]*"|'[^']*'"#, |lex| {
        let s = lex.slice();
        s[1..s.len() - 1].to_string()
    })]
    Str(String),

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string(), priority = 1)]
    Ident(String),
}

fn parse_number(lex: &mut logos::Lexer<Token>) -> Option<f64> {
    let s = lex.slice();
    match s.strip_prefix('~') {
        Some(rest) => rest.parse::<f64>().ok().map(|n| -n),
        None => s.parse::<f64>().ok(),
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::If => write!(f, "if"),
            Token::Else => write!(f, "else"),
            Token::Fn => write!(f, "fn"),
            Token::Let => write!(f, "let"),
            Token::Const => write!(f, "const"),
            Token::EqEq => write!(f, "=="),
            Token::NotEq => write!(f, "!="),
            Token::LtEq => write!(f, "<="),
            Token::GtEq => write!(f, ">="),
            Token::Lt => write!(f, "<"),
            Token::Gt => write!(f, ">"),
            Token::AndAnd => write!(f, "&&"),
            Token::OrOr => write!(f, "||"),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::Percent => write!(f, "%"),
            Token::FatArrow => write!(f, "=>"),
            Token::Eq => write!(f, "="),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::Comma => write!(f, ","),
            Token::Semi => write!(f, ";"),
            Token::Number(n) => write!(f, "{n}"),
            Token::Str(s) => write!(f, "\"{s}\""),
            Token::Ident(s) => write!(f, "{s}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex_one(src: &str) -> Token {
        let mut lexer = Token::lexer(src);
        let tok = lexer.next().expect("no token").expect("lex error");
        assert!(lexer.next().is_none(), "more than one token in {src:?}");
        tok
    }

    #[test]
    fn test_keywords_are_not_identifiers() {
        assert_eq!(lex_one("if"), Token::If);
        assert_eq!(lex_one("const"), Token::Const);
        assert_eq!(lex_one("iffy"), Token::Ident("iffy".to_string()));
    }

    #[test]
    fn test_number_forms() {
        assert_eq!(lex_one("42"), Token::Number(42.0));
        assert_eq!(lex_one("4."), Token::Number(4.0));
        assert_eq!(lex_one(".5"), Token::Number(0.5));
        assert_eq!(lex_one("~2.5"), Token::Number(-2.5));
    }

    #[test]
    fn test_string_quotes_stripped() {
        assert_eq!(lex_one("\"hi there\""), Token::Str("hi there".to_string()));
        assert_eq!(lex_one("'a \"b\"'"), Token::Str("a \"b\"".to_string()));
    }

    #[test]
    fn test_true_false_null_are_identifiers() {
        assert_eq!(lex_one("true"), Token::Ident("true".to_string()));
        assert_eq!(lex_one("null"), Token::Ident("null".to_string()));
    }

    #[test]
    fn test_display_round_trips_punctuation() {
        for src in ["==", "!=", "<=", ">=", "&&", "||", "=>", "=", "%"] {
            assert_eq!(lex_one(src).to_string(), src);
        }
    }
}

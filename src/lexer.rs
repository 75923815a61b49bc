//! Character stream to token stream, per the lexical rules of the language.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Number,
    String,
    Identifier,

    // Keywords
    If,
    Else,
    While,
    For,
    Function,
    Return,
    Break,
    Continue,
    Void,
    True,
    False,
    Null,
    Const,
    Namespace,
    Enum,
    Class,
    Struct,
    New,
    Match,
    Case,
    Default,
    Try,
    Catch,
    Finally,
    In,
    Help,
    End,

    // Word-compound-assignment tags (double as statement keywords)
    Add,
    Sub,
    Mul,
    Div,
    Mod,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    EqEq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    AndAnd,
    OrOr,
    Bang,
    PlusPlus,
    MinusMinus,
    Eq,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    PercentEq,
    FatArrow,

    // Punctuation
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Dot,
    Semi,
    Colon,

    // Declaration
    Insert,

    // Directives
    Include,
    Involve,

    Eof,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({:?}) at {}:{}", self.kind, self.text, self.line, self.column)
    }
}

fn keyword_kind(text: &str) -> Option<TokenKind> {
    use TokenKind::*;
    Some(match text {
        "if" => If,
        "else" => Else,
        "while" => While,
        "for" => For,
        "function" => Function,
        "return" => Return,
        "break" => Break,
        "continue" => Continue,
        "void" => Void,
        "true" => True,
        "false" => False,
        "null" => Null,
        "const" => Const,
        "namespace" => Namespace,
        "enum" => Enum,
        "class" => Class,
        "struct" => Struct,
        "new" => New,
        "match" => Match,
        "case" => Case,
        "default" => Default,
        "try" => Try,
        "catch" => Catch,
        "finally" => Finally,
        "in" => In,
        "help" => Help,
        "end" => End,
        "add" => Add,
        "sub" => Sub,
        "mul" => Mul,
        "div" => Div,
        "mod" => Mod,
        _ => return None,
    })
}

pub struct Lexer {
    source: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Lexer {
            source: source.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.source.get(self.pos).copied()
    }

    fn peek_char_at(&self, offset: usize) -> Option<char> {
        self.source.get(self.pos + offset).copied()
    }

    fn advance_char(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn starts_with(&self, s: &str) -> bool {
        let chars: Vec<char> = s.chars().collect();
        for (i, c) in chars.iter().enumerate() {
            if self.peek_char_at(i) != Some(*c) {
                return false;
            }
        }
        true
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            while matches!(self.peek_char(), Some(c) if c.is_whitespace()) {
                self.advance_char();
            }
            if self.peek_char() == Some('#') {
                if self.starts_with("#include") || self.starts_with("#involve") {
                    break;
                }
                while !matches!(self.peek_char(), None | Some('\n')) {
                    self.advance_char();
                }
                continue;
            }
            break;
        }
    }

    /// Saves lexer position for non-destructive lookahead (used only by the
    /// parser's for/for-in disambiguation).
    pub fn save(&self) -> (usize, usize, usize) {
        (self.pos, self.line, self.column)
    }

    pub fn restore(&mut self, state: (usize, usize, usize)) {
        self.pos = state.0;
        self.line = state.1;
        self.column = state.2;
    }

    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace_and_comments();

        let line = self.line;
        let column = self.column;

        let Some(c) = self.peek_char() else {
            return Token {
                kind: TokenKind::Eof,
                text: String::new(),
                line,
                column,
            };
        };

        if c == '#' {
            return self.lex_directive(line, column);
        }

        if c.is_ascii_digit() {
            return self.lex_number(line, column);
        }

        if c == '"' {
            return self.lex_string(line, column);
        }

        if c.is_alphabetic() || c == '_' {
            return self.lex_identifier(line, column);
        }

        if c == '&' {
            if self.starts_with("&insert") {
                for _ in 0.."&insert".len() {
                    self.advance_char();
                }
                return Token {
                    kind: TokenKind::Insert,
                    text: "&insert".to_string(),
                    line,
                    column,
                };
            }
            if self.peek_char_at(1) == Some('&') {
                self.advance_char();
                self.advance_char();
                return Token {
                    kind: TokenKind::AndAnd,
                    text: "&&".to_string(),
                    line,
                    column,
                };
            }
            self.advance_char();
            return Token {
                kind: TokenKind::Error,
                text: "&".to_string(),
                line,
                column,
            };
        }

        self.lex_operator_or_punct(line, column)
    }

    fn lex_directive(&mut self, line: usize, column: usize) -> Token {
        let (kind, word) = if self.starts_with("#include") {
            (TokenKind::Include, "#include")
        } else if self.starts_with("#involve") {
            (TokenKind::Involve, "#involve")
        } else {
            self.advance_char();
            return Token {
                kind: TokenKind::Error,
                text: "#".to_string(),
                line,
                column,
            };
        };
        for _ in 0..word.len() {
            self.advance_char();
        }
        while matches!(self.peek_char(), Some(c) if c.is_whitespace() && c != '\n') {
            self.advance_char();
        }
        if self.peek_char() != Some('"') {
            return Token {
                kind: TokenKind::Error,
                text: word.to_string(),
                line,
                column,
            };
        }
        self.advance_char();
        let mut path = String::new();
        loop {
            match self.peek_char() {
                Some('"') => {
                    self.advance_char();
                    break;
                }
                Some(c) => {
                    path.push(c);
                    self.advance_char();
                }
                None => break,
            }
        }
        Token {
            kind,
            text: path,
            line,
            column,
        }
    }

    fn lex_number(&mut self, line: usize, column: usize) -> Token {
        let mut text = String::new();
        while matches!(self.peek_char(), Some(c) if c.is_ascii_digit() || c == '.') {
            text.push(self.advance_char().unwrap());
        }
        Token {
            kind: TokenKind::Number,
            text,
            line,
            column,
        }
    }

    fn lex_string(&mut self, line: usize, column: usize) -> Token {
        self.advance_char();
        let mut text = String::new();
        loop {
            match self.peek_char() {
                Some('"') => {
                    self.advance_char();
                    break;
                }
                Some(c) => {
                    text.push(c);
                    self.advance_char();
                }
                None => break,
            }
        }
        Token {
            kind: TokenKind::String,
            text,
            line,
            column,
        }
    }

    fn lex_identifier(&mut self, line: usize, column: usize) -> Token {
        let mut text = String::new();
        while matches!(self.peek_char(), Some(c) if c.is_alphanumeric() || c == '_' || c == '.') {
            text.push(self.advance_char().unwrap());
        }
        let kind = keyword_kind(&text).unwrap_or(TokenKind::Identifier);
        Token {
            kind,
            text,
            line,
            column,
        }
    }

    fn lex_operator_or_punct(&mut self, line: usize, column: usize) -> Token {
        use TokenKind::*;
        let two_char: &[(&str, TokenKind)] = &[
            ("==", EqEq),
            ("!=", NotEq),
            ("<=", LtEq),
            (">=", GtEq),
            ("||", OrOr),
            ("=>", FatArrow),
            ("++", PlusPlus),
            ("--", MinusMinus),
            ("+=", PlusEq),
            ("-=", MinusEq),
            ("*=", StarEq),
            ("/=", SlashEq),
            ("%=", PercentEq),
        ];
        for (s, kind) in two_char {
            if self.starts_with(s) {
                self.advance_char();
                self.advance_char();
                return Token {
                    kind: kind.clone(),
                    text: s.to_string(),
                    line,
                    column,
                };
            }
        }

        let c = self.advance_char().unwrap();
        let kind = match c {
            '+' => Plus,
            '-' => Minus,
            '*' => Star,
            '/' => Slash,
            '%' => Percent,
            '<' => Lt,
            '>' => Gt,
            '!' => Bang,
            '=' => Eq,
            '(' => LParen,
            ')' => RParen,
            '{' => LBrace,
            '}' => RBrace,
            '[' => LBracket,
            ']' => RBracket,
            ',' => Comma,
            '.' => Dot,
            ';' => Semi,
            ':' => Colon,
            _ => Error,
        };
        Token {
            kind,
            text: c.to_string(),
            line,
            column,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        let mut lx = Lexer::new(src);
        let mut out = Vec::new();
        loop {
            let t = lx.next_token();
            if t.kind == TokenKind::Eof {
                break;
            }
            out.push(t.kind);
        }
        out
    }

    #[test]
    fn lexes_numbers_and_operators() {
        let toks = kinds("1 + 2.5 * 3");
        assert_eq!(
            toks,
            vec![
                TokenKind::Number,
                TokenKind::Plus,
                TokenKind::Number,
                TokenKind::Star,
                TokenKind::Number
            ]
        );
    }

    #[test]
    fn longest_match_operators() {
        let toks = kinds("a == b != c <= d >= e += f");
        assert!(toks.contains(&TokenKind::EqEq));
        assert!(toks.contains(&TokenKind::NotEq));
        assert!(toks.contains(&TokenKind::LtEq));
        assert!(toks.contains(&TokenKind::GtEq));
        assert!(toks.contains(&TokenKind::PlusEq));
    }

    #[test]
    fn dotted_identifier_is_one_token() {
        let mut lx = Lexer::new("system.print(1)");
        let t = lx.next_token();
        assert_eq!(t.kind, TokenKind::Identifier);
        assert_eq!(t.text, "system.print");
    }

    #[test]
    fn string_literal_no_escapes() {
        let mut lx = Lexer::new(r#""hello\nworld""#);
        let t = lx.next_token();
        assert_eq!(t.kind, TokenKind::String);
        assert_eq!(t.text, r"hello\nworld");
    }

    #[test]
    fn unterminated_string_consumes_to_eof() {
        let mut lx = Lexer::new("\"abc");
        let t = lx.next_token();
        assert_eq!(t.kind, TokenKind::String);
        assert_eq!(t.text, "abc");
        assert_eq!(lx.next_token().kind, TokenKind::Eof);
    }

    #[test]
    fn comment_is_skipped() {
        let toks = kinds("1 # this is a comment\n + 2");
        assert_eq!(toks, vec![TokenKind::Number, TokenKind::Plus, TokenKind::Number]);
    }

    #[test]
    fn include_directive_not_treated_as_comment() {
        let mut lx = Lexer::new(r#"#include "foo.sharp""#);
        let t = lx.next_token();
        assert_eq!(t.kind, TokenKind::Include);
        assert_eq!(t.text, "foo.sharp");
    }

    #[test]
    fn involve_directive() {
        let mut lx = Lexer::new(r#"#involve "bar.sharp""#);
        let t = lx.next_token();
        assert_eq!(t.kind, TokenKind::Involve);
        assert_eq!(t.text, "bar.sharp");
    }

    #[test]
    fn ampersand_insert_and_and_and() {
        let toks = kinds("&insert x = 1; a && b");
        assert_eq!(toks[0], TokenKind::Insert);
        assert!(toks.contains(&TokenKind::AndAnd));
    }

    #[test]
    fn unknown_char_is_error_token() {
        let mut lx = Lexer::new("@");
        let t = lx.next_token();
        assert_eq!(t.kind, TokenKind::Error);
    }

    #[test]
    fn eof_repeats() {
        let mut lx = Lexer::new("");
        assert_eq!(lx.next_token().kind, TokenKind::Eof);
        assert_eq!(lx.next_token().kind, TokenKind::Eof);
    }

    #[test]
    fn keywords_recognized() {
        let toks = kinds("if else while for function return break continue void true false null const namespace enum class struct new match case default try catch finally in help end");
        use TokenKind::*;
        assert_eq!(
            toks,
            vec![
                If, Else, While, For, Function, Return, Break, Continue, Void, True, False,
                Null, Const, Namespace, Enum, Class, Struct, New, Match, Case, Default, Try,
                Catch, Finally, In, Help, End
            ]
        );
    }

    #[test]
    fn word_compound_assignment_tags() {
        let toks = kinds("add sub mul div mod");
        use TokenKind::*;
        assert_eq!(toks, vec![Add, Sub, Mul, Div, Mod]);
    }

    #[test]
    fn line_and_column_tracking() {
        let mut lx = Lexer::new("a\nb");
        let t1 = lx.next_token();
        assert_eq!((t1.line, t1.column), (1, 1));
        let t2 = lx.next_token();
        assert_eq!((t2.line, t2.column), (2, 1));
    }
}

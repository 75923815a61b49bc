//! Recursive-descent parser: token stream to AST, with `#include`/`#involve`
//! resolution threaded through a per-parse include guard.

use crate::ast::*;
use crate::error::diagnostic;
use crate::lexer::{Lexer, Token, TokenKind};
use std::collections::HashSet;
use std::fs;

pub struct Parser {
    lexer: Lexer,
    current: Token,
    included: HashSet<String>,
}

/// Parses a complete source string into its top-level block.
pub fn parse(source: &str) -> Node {
    Parser::new(source).parse_program()
}

impl Parser {
    pub fn new(source: &str) -> Self {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token();
        Parser {
            lexer,
            current,
            included: HashSet::new(),
        }
    }

    fn bump(&mut self) -> Token {
        let next = self.lexer.next_token();
        std::mem::replace(&mut self.current, next)
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if &self.current.kind == kind {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> bool {
        if self.eat(&kind) {
            true
        } else {
            diagnostic(self.current.line, &format!("expected {}", what));
            false
        }
    }

    fn eat_semi(&mut self) {
        self.eat(&TokenKind::Semi);
    }

    pub fn parse_program(&mut self) -> Node {
        let mut stmts = Vec::new();
        while self.current.kind != TokenKind::Eof {
            stmts.push(self.parse_statement());
        }
        Node::Block(stmts)
    }

    fn parse_block(&mut self) -> Node {
        if !self.expect(TokenKind::LBrace, "'{'") {
            return Node::Null;
        }
        let mut stmts = Vec::new();
        while self.current.kind != TokenKind::RBrace && self.current.kind != TokenKind::Eof {
            stmts.push(self.parse_statement());
        }
        self.expect(TokenKind::RBrace, "'}'");
        Node::Block(stmts)
    }

    /// Body of an `if`/`while`/`for`/`function`: optional stylistic `=>`, then
    /// a block or (rarely) a single statement.
    fn parse_body(&mut self) -> Node {
        self.eat(&TokenKind::FatArrow);
        if self.current.kind == TokenKind::LBrace {
            self.parse_block()
        } else {
            self.parse_statement()
        }
    }

    fn parse_statement(&mut self) -> Node {
        match self.current.kind {
            TokenKind::Semi => {
                self.bump();
                Node::Null
            }
            TokenKind::Insert => self.parse_declaration_stmt(false),
            TokenKind::Const => self.parse_declaration_stmt(true),
            TokenKind::If => self.parse_if(),
            TokenKind::While => self.parse_while(),
            TokenKind::For => self.parse_for(),
            TokenKind::Function => self.parse_function_decl(),
            TokenKind::Return => self.parse_return(),
            TokenKind::Break => {
                self.bump();
                self.eat_semi();
                Node::Break
            }
            TokenKind::Continue => {
                self.bump();
                self.eat_semi();
                Node::Continue
            }
            TokenKind::Namespace => self.parse_namespace(),
            TokenKind::Enum => self.parse_enum(),
            TokenKind::Class | TokenKind::Struct => self.parse_class_or_struct(),
            TokenKind::Match => self.parse_match(),
            TokenKind::Try => self.parse_try(),
            TokenKind::Include | TokenKind::Involve => self.parse_include(),
            TokenKind::Add | TokenKind::Sub | TokenKind::Mul | TokenKind::Div | TokenKind::Mod => {
                self.parse_word_compound_assign()
            }
            // Reserved words with no statement-level role (SPEC_FULL.md §9 Open Questions).
            TokenKind::Help | TokenKind::End | TokenKind::New => {
                self.bump();
                self.eat_semi();
                Node::Null
            }
            TokenKind::LBrace => self.parse_block(),
            TokenKind::Eof => Node::Null,
            TokenKind::Error => {
                self.bump();
                Node::Null
            }
            _ => self.parse_expr_statement(),
        }
    }

    // ------------------------------------------------------------------
    // Declarations / assignment
    // ------------------------------------------------------------------

    fn parse_declaration_stmt(&mut self, is_const: bool) -> Node {
        let node = self.parse_declaration_inner(is_const);
        self.eat_semi();
        node
    }

    fn parse_declaration_inner(&mut self, is_const: bool) -> Node {
        self.bump(); // &insert / const
        let name = self.bump().text;
        let type_name = if self.eat(&TokenKind::Colon) {
            Some(self.bump().text)
        } else {
            None
        };
        self.expect(TokenKind::Eq, "'='");
        let value = self.parse_expression();
        Node::Assign {
            op: AssignOp::Assign,
            decl: Some(if is_const {
                DeclKind::Const
            } else {
                DeclKind::Insert
            }),
            type_name,
            target: Box::new(Node::Identifier(name)),
            value: Box::new(value),
        }
    }

    fn parse_word_compound_assign(&mut self) -> Node {
        let op = match self.bump().kind {
            TokenKind::Add => AssignOp::AddAssign,
            TokenKind::Sub => AssignOp::SubAssign,
            TokenKind::Mul => AssignOp::MulAssign,
            TokenKind::Div => AssignOp::DivAssign,
            TokenKind::Mod => AssignOp::ModAssign,
            _ => unreachable!(),
        };
        let name = self.bump().text;
        self.expect(TokenKind::Eq, "'='");
        let value = self.parse_expression();
        self.eat_semi();
        Node::Assign {
            op,
            decl: None,
            type_name: None,
            target: Box::new(Node::Identifier(name)),
            value: Box::new(value),
        }
    }

    /// A plain statement-expression, possibly followed by an assignment or
    /// increment/decrement operator. Used both at statement level and inside
    /// `for (...)` clauses, which do not consume a trailing `;` themselves.
    fn parse_simple_stmt_inner(&mut self) -> Node {
        let target = self.parse_expression();
        match self.current.kind {
            TokenKind::Eq
            | TokenKind::PlusEq
            | TokenKind::MinusEq
            | TokenKind::StarEq
            | TokenKind::SlashEq
            | TokenKind::PercentEq => {
                let op = match self.bump().kind {
                    TokenKind::Eq => AssignOp::Assign,
                    TokenKind::PlusEq => AssignOp::AddAssign,
                    TokenKind::MinusEq => AssignOp::SubAssign,
                    TokenKind::StarEq => AssignOp::MulAssign,
                    TokenKind::SlashEq => AssignOp::DivAssign,
                    TokenKind::PercentEq => AssignOp::ModAssign,
                    _ => unreachable!(),
                };
                let value = self.parse_expression();
                Node::Assign {
                    op,
                    decl: None,
                    type_name: None,
                    target: Box::new(target),
                    value: Box::new(value),
                }
            }
            TokenKind::PlusPlus => {
                self.bump();
                Node::IncDec {
                    increment: true,
                    target: Box::new(target),
                }
            }
            TokenKind::MinusMinus => {
                self.bump();
                Node::IncDec {
                    increment: false,
                    target: Box::new(target),
                }
            }
            _ => target,
        }
    }

    fn parse_expr_statement(&mut self) -> Node {
        let node = self.parse_simple_stmt_inner();
        self.eat_semi();
        node
    }

    // ------------------------------------------------------------------
    // Control flow
    // ------------------------------------------------------------------

    fn parse_if(&mut self) -> Node {
        self.bump();
        self.expect(TokenKind::LParen, "'('");
        let cond = self.parse_expression();
        self.expect(TokenKind::RParen, "')'");
        let then_branch = self.parse_body();
        let else_branch = if self.eat(&TokenKind::Else) {
            Some(Box::new(self.parse_body()))
        } else {
            None
        };
        Node::If {
            cond: Box::new(cond),
            then_branch: Box::new(then_branch),
            else_branch,
        }
    }

    fn parse_while(&mut self) -> Node {
        self.bump();
        self.expect(TokenKind::LParen, "'('");
        let cond = self.parse_expression();
        self.expect(TokenKind::RParen, "')'");
        let body = self.parse_body();
        Node::While {
            cond: Box::new(cond),
            body: Box::new(body),
        }
    }

    fn parse_for(&mut self) -> Node {
        self.bump();
        self.expect(TokenKind::LParen, "'('");

        if self.current.kind == TokenKind::Identifier {
            let saved_lexer = self.lexer.save();
            let saved_current = self.current.clone();
            let name = self.current.text.clone();
            self.bump();
            if self.current.kind == TokenKind::In {
                self.bump();
                let iterable = self.parse_expression();
                self.expect(TokenKind::RParen, "')'");
                let body = self.parse_body();
                return Node::ForIn {
                    var: name,
                    iterable: Box::new(iterable),
                    body: Box::new(body),
                };
            }
            self.lexer.restore(saved_lexer);
            self.current = saved_current;
        }

        let init = if self.current.kind == TokenKind::Semi {
            None
        } else {
            Some(Box::new(match self.current.kind {
                TokenKind::Insert => self.parse_declaration_inner(false),
                TokenKind::Const => self.parse_declaration_inner(true),
                _ => self.parse_simple_stmt_inner(),
            }))
        };
        self.expect(TokenKind::Semi, "';'");
        let cond = if self.current.kind == TokenKind::Semi {
            None
        } else {
            Some(Box::new(self.parse_expression()))
        };
        self.expect(TokenKind::Semi, "';'");
        let step = if self.current.kind == TokenKind::RParen {
            None
        } else {
            Some(Box::new(self.parse_simple_stmt_inner()))
        };
        self.expect(TokenKind::RParen, "')'");
        let body = self.parse_body();
        Node::For {
            init,
            cond,
            step,
            body: Box::new(body),
        }
    }

    fn parse_function_decl(&mut self) -> Node {
        self.bump();
        let name = self.bump().text;
        self.expect(TokenKind::LParen, "'('");
        let params = self.parse_params();
        self.expect(TokenKind::RParen, "')'");
        let body = self.parse_body();
        Node::FunctionDecl {
            name,
            params,
            body: Box::new(body),
        }
    }

    fn parse_params(&mut self) -> Vec<Param> {
        if self.current.kind == TokenKind::Void {
            self.bump();
            return Vec::new();
        }
        let mut params = Vec::new();
        if self.current.kind != TokenKind::RParen {
            loop {
                let name = self.bump().text;
                let default = if self.eat(&TokenKind::Eq) {
                    Some(Box::new(self.parse_expression()))
                } else {
                    None
                };
                params.push(Param { name, default });
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }
        params
    }

    fn parse_return(&mut self) -> Node {
        self.bump();
        let value = if matches!(self.current.kind, TokenKind::Semi | TokenKind::RBrace) {
            None
        } else {
            Some(Box::new(self.parse_expression()))
        };
        self.eat_semi();
        Node::Return(value)
    }

    fn parse_namespace(&mut self) -> Node {
        self.bump();
        let name = self.bump().text;
        let body = self.parse_block();
        Node::Namespace {
            name,
            body: Box::new(body),
        }
    }

    fn parse_enum(&mut self) -> Node {
        self.bump();
        let name = self.bump().text;
        self.expect(TokenKind::LBrace, "'{'");
        let mut members = Vec::new();
        while self.current.kind != TokenKind::RBrace && self.current.kind != TokenKind::Eof {
            let member_name = self.bump().text;
            let value = if self.eat(&TokenKind::Eq) {
                Some(Box::new(self.parse_expression()))
            } else {
                None
            };
            members.push((member_name, value));
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RBrace, "'}'");
        Node::EnumDecl { name, members }
    }

    fn parse_class_or_struct(&mut self) -> Node {
        self.bump();
        let name = self.bump().text;
        let base = if self.eat(&TokenKind::Colon) {
            Some(self.bump().text)
        } else {
            None
        };
        let body = self.parse_block();
        Node::ClassDecl {
            name,
            base,
            body: Box::new(body),
        }
    }

    fn parse_match(&mut self) -> Node {
        self.bump();
        self.expect(TokenKind::LParen, "'('");
        let scrutinee = self.parse_expression();
        self.expect(TokenKind::RParen, "')'");
        self.expect(TokenKind::LBrace, "'{'");
        let mut cases = Vec::new();
        let mut default = None;
        while self.current.kind != TokenKind::RBrace && self.current.kind != TokenKind::Eof {
            if self.eat(&TokenKind::Case) {
                let pat = self.parse_expression();
                self.expect(TokenKind::Colon, "':'");
                cases.push((pat, self.parse_case_body()));
            } else if self.eat(&TokenKind::Default) {
                self.expect(TokenKind::Colon, "':'");
                default = Some(Box::new(self.parse_case_body()));
            } else {
                diagnostic(self.current.line, "expected 'case' or 'default'");
                self.bump();
            }
        }
        self.expect(TokenKind::RBrace, "'}'");
        Node::Match {
            scrutinee: Box::new(scrutinee),
            cases,
            default,
        }
    }

    fn parse_case_body(&mut self) -> Node {
        if self.current.kind == TokenKind::LBrace {
            self.parse_block()
        } else {
            self.parse_statement()
        }
    }

    fn parse_try(&mut self) -> Node {
        self.bump();
        let try_body = self.parse_block();
        let mut catch_name = None;
        let mut catch_body = None;
        if self.eat(&TokenKind::Catch) {
            if self.eat(&TokenKind::LParen) {
                if self.current.kind == TokenKind::Identifier {
                    catch_name = Some(self.bump().text);
                }
                self.expect(TokenKind::RParen, "')'");
            }
            catch_body = Some(Box::new(self.parse_block()));
        }
        let finally_body = if self.eat(&TokenKind::Finally) {
            Some(Box::new(self.parse_block()))
        } else {
            None
        };
        Node::TryCatchFinally {
            try_body: Box::new(try_body),
            catch_name,
            catch_body,
            finally_body,
        }
    }

    // ------------------------------------------------------------------
    // `#include` / `#involve`
    // ------------------------------------------------------------------

    fn parse_include(&mut self) -> Node {
        let path = self.bump().text;
        self.eat_semi();
        self.resolve_include(&path)
    }

    fn resolve_include(&mut self, path: &str) -> Node {
        let mut resolved_path = path.to_string();
        let mut contents = fs::read_to_string(&resolved_path);
        if contents.is_err() {
            resolved_path = format!("src/{}", path);
            contents = fs::read_to_string(&resolved_path);
        }
        let contents = match contents {
            Ok(c) => c,
            Err(_) => {
                diagnostic(
                    self.current.line,
                    &format!("cannot resolve include '{}'", path),
                );
                return Node::Null;
            }
        };
        if self.included.contains(&resolved_path) {
            return Node::Null;
        }
        self.included.insert(resolved_path);
        let mut sub = Parser::new(&contents);
        sub.included = std::mem::take(&mut self.included);
        let block = sub.parse_program();
        self.included = sub.included;
        block
    }

    // ------------------------------------------------------------------
    // Expressions (precedence climbing, SPEC_FULL.md §4.2)
    // ------------------------------------------------------------------

    fn parse_expression(&mut self) -> Node {
        self.parse_or()
    }

    fn parse_or(&mut self) -> Node {
        let mut left = self.parse_and();
        while self.current.kind == TokenKind::OrOr {
            self.bump();
            let right = self.parse_and();
            left = Node::Binary {
                op: BinOp::Or,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        left
    }

    fn parse_and(&mut self) -> Node {
        let mut left = self.parse_equality();
        while self.current.kind == TokenKind::AndAnd {
            self.bump();
            let right = self.parse_equality();
            left = Node::Binary {
                op: BinOp::And,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        left
    }

    fn parse_equality(&mut self) -> Node {
        let mut left = self.parse_relational();
        loop {
            let op = match self.current.kind {
                TokenKind::EqEq => BinOp::Eq,
                TokenKind::NotEq => BinOp::NotEq,
                _ => break,
            };
            self.bump();
            let right = self.parse_relational();
            left = Node::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        left
    }

    fn parse_relational(&mut self) -> Node {
        let mut left = self.parse_additive();
        loop {
            let op = match self.current.kind {
                TokenKind::Lt => BinOp::Lt,
                TokenKind::LtEq => BinOp::LtEq,
                TokenKind::Gt => BinOp::Gt,
                TokenKind::GtEq => BinOp::GtEq,
                _ => break,
            };
            self.bump();
            let right = self.parse_additive();
            left = Node::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        left
    }

    fn parse_additive(&mut self) -> Node {
        let mut left = self.parse_multiplicative();
        loop {
            let op = match self.current.kind {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            self.bump();
            let right = self.parse_multiplicative();
            left = Node::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        left
    }

    fn parse_multiplicative(&mut self) -> Node {
        let mut left = self.parse_unary();
        loop {
            let op = match self.current.kind {
                TokenKind::Star => BinOp::Mul,
                TokenKind::Slash => BinOp::Div,
                TokenKind::Percent => BinOp::Mod,
                _ => break,
            };
            self.bump();
            let right = self.parse_unary();
            left = Node::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        left
    }

    fn parse_unary(&mut self) -> Node {
        match self.current.kind {
            TokenKind::Bang => {
                self.bump();
                Node::Unary {
                    op: UnOp::Not,
                    operand: Box::new(self.parse_unary()),
                }
            }
            TokenKind::Minus => {
                self.bump();
                Node::Unary {
                    op: UnOp::Neg,
                    operand: Box::new(self.parse_unary()),
                }
            }
            _ => self.parse_postfix(),
        }
    }

    fn parse_postfix(&mut self) -> Node {
        let mut node = self.parse_primary();
        while self.current.kind == TokenKind::LBracket {
            self.bump();
            let index = self.parse_expression();
            self.expect(TokenKind::RBracket, "']'");
            node = Node::Index {
                target: Box::new(node),
                index: Box::new(index),
            };
        }
        node
    }

    fn parse_primary(&mut self) -> Node {
        match self.current.kind.clone() {
            TokenKind::Number => {
                let t = self.bump();
                Node::NumberLit(t.text.parse().unwrap_or(0.0))
            }
            TokenKind::String => Node::StringLit(self.bump().text),
            TokenKind::True => {
                self.bump();
                Node::BoolLit(true)
            }
            TokenKind::False => {
                self.bump();
                Node::BoolLit(false)
            }
            TokenKind::Null => {
                self.bump();
                Node::NullLit
            }
            TokenKind::LBracket => self.parse_array_lit(),
            TokenKind::LBrace => self.parse_map_lit(),
            TokenKind::Identifier => self.parse_identifier_or_call(),
            TokenKind::LParen => self.parse_paren_or_lambda(),
            _ => {
                diagnostic(
                    self.current.line,
                    &format!("unexpected token {:?}", self.current.kind),
                );
                self.bump();
                Node::Null
            }
        }
    }

    fn parse_identifier_or_call(&mut self) -> Node {
        let name = self.bump().text;
        if self.current.kind == TokenKind::LParen {
            self.bump();
            let mut args = Vec::new();
            if self.current.kind != TokenKind::RParen {
                loop {
                    args.push(self.parse_expression());
                    if !self.eat(&TokenKind::Comma) {
                        break;
                    }
                }
            }
            self.expect(TokenKind::RParen, "')'");
            Node::Call { name, args }
        } else {
            Node::Identifier(name)
        }
    }

    fn parse_array_lit(&mut self) -> Node {
        self.bump();
        let mut items = Vec::new();
        if self.current.kind != TokenKind::RBracket {
            loop {
                items.push(self.parse_expression());
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RBracket, "']'");
        Node::ArrayLit(items)
    }

    fn parse_map_lit(&mut self) -> Node {
        self.bump();
        let mut entries = Vec::new();
        if self.current.kind != TokenKind::RBrace {
            loop {
                let key = self.parse_expression();
                self.expect(TokenKind::Colon, "':'");
                let value = self.parse_expression();
                entries.push((key, value));
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RBrace, "'}'");
        Node::MapLit(entries)
    }

    /// Disambiguates `(expr)` from `(a, b) => { ... }` by tentatively parsing
    /// an identifier list and checking for a trailing `=>`; restores lexer
    /// state and re-parses as a plain parenthesized expression otherwise.
    fn parse_paren_or_lambda(&mut self) -> Node {
        let saved_lexer = self.lexer.save();
        let saved_current = self.current.clone();

        self.bump(); // consume '('
        let mut names = Vec::new();
        let mut is_param_list = true;
        if self.current.kind != TokenKind::RParen {
            loop {
                if self.current.kind == TokenKind::Identifier {
                    names.push(self.bump().text);
                } else {
                    is_param_list = false;
                    break;
                }
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }

        if is_param_list && self.current.kind == TokenKind::RParen {
            self.bump(); // ')'
            if self.current.kind == TokenKind::FatArrow {
                self.bump(); // '=>'
                let body = if self.current.kind == TokenKind::LBrace {
                    self.parse_block()
                } else {
                    Node::Return(Some(Box::new(self.parse_expression())))
                };
                return Node::Lambda {
                    params: names
                        .into_iter()
                        .map(|name| Param { name, default: None })
                        .collect(),
                    body: Box::new(body),
                };
            }
        }

        self.lexer.restore(saved_lexer);
        self.current = saved_current;
        self.bump(); // consume '(' for real this time
        let expr = self.parse_expression();
        self.expect(TokenKind::RParen, "')'");
        expr
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_literals() {
        match parse("1; \"hi\"; true; false; null;") {
            Node::Block(stmts) => {
                assert_eq!(stmts[0], Node::NumberLit(1.0));
                assert_eq!(stmts[1], Node::StringLit("hi".to_string()));
                assert_eq!(stmts[2], Node::BoolLit(true));
                assert_eq!(stmts[3], Node::BoolLit(false));
                assert_eq!(stmts[4], Node::NullLit);
            }
            _ => panic!("expected block"),
        }
    }

    #[test]
    fn precedence_chain_is_respected() {
        // 1 + 2 * 3 == 7 should parse as (1 + (2 * 3)) == 7
        match parse("1 + 2 * 3 == 7;") {
            Node::Block(stmts) => match &stmts[0] {
                Node::Binary { op: BinOp::Eq, left, .. } => match left.as_ref() {
                    Node::Binary { op: BinOp::Add, right, .. } => {
                        assert_eq!(
                            **right,
                            Node::Binary {
                                op: BinOp::Mul,
                                left: Box::new(Node::NumberLit(2.0)),
                                right: Box::new(Node::NumberLit(3.0)),
                            }
                        );
                    }
                    _ => panic!("expected additive on the left of =="),
                },
                _ => panic!("expected top-level =="),
            },
            _ => panic!("expected block"),
        }
    }

    #[test]
    fn unary_binds_tighter_than_multiplicative() {
        match parse("-1 * 2;") {
            Node::Block(stmts) => assert_eq!(
                stmts[0],
                Node::Binary {
                    op: BinOp::Mul,
                    left: Box::new(Node::Unary {
                        op: UnOp::Neg,
                        operand: Box::new(Node::NumberLit(1.0)),
                    }),
                    right: Box::new(Node::NumberLit(2.0)),
                }
            ),
            _ => panic!("expected block"),
        }
    }

    #[test]
    fn postfix_index_is_left_associative() {
        match parse("a[b][c];") {
            Node::Block(stmts) => match &stmts[0] {
                Node::Index { target, .. } => {
                    assert!(matches!(target.as_ref(), Node::Index { .. }));
                }
                _ => panic!("expected nested index"),
            },
            _ => panic!("expected block"),
        }
    }

    #[test]
    fn declaration_with_type_annotation() {
        match parse("&insert x: number = 5;") {
            Node::Block(stmts) => match &stmts[0] {
                Node::Assign { decl, type_name, .. } => {
                    assert_eq!(*decl, Some(DeclKind::Insert));
                    assert_eq!(type_name.as_deref(), Some("number"));
                }
                _ => panic!("expected assign"),
            },
            _ => panic!("expected block"),
        }
    }

    #[test]
    fn const_declaration() {
        match parse("const x = 5;") {
            Node::Block(stmts) => {
                assert!(matches!(
                    &stmts[0],
                    Node::Assign { decl: Some(DeclKind::Const), .. }
                ));
            }
            _ => panic!("expected block"),
        }
    }

    #[test]
    fn word_compound_assignment_desugars_to_add_assign() {
        match parse("add x = 1;") {
            Node::Block(stmts) => match &stmts[0] {
                Node::Assign { op, decl, .. } => {
                    assert_eq!(*op, AssignOp::AddAssign);
                    assert_eq!(*decl, None);
                }
                _ => panic!("expected assign"),
            },
            _ => panic!("expected block"),
        }
    }

    #[test]
    fn if_else_parses() {
        match parse("if (x) { y; } else { z; }") {
            Node::Block(stmts) => {
                assert!(matches!(&stmts[0], Node::If { else_branch: Some(_), .. }));
            }
            _ => panic!("expected block"),
        }
    }

    #[test]
    fn c_style_for_parses() {
        match parse("for (&insert i = 0; i < 10; i++) { x; }") {
            Node::Block(stmts) => {
                assert!(matches!(&stmts[0], Node::For { .. }));
            }
            _ => panic!("expected block"),
        }
    }

    #[test]
    fn for_in_parses() {
        match parse("for (x in arr) { y; }") {
            Node::Block(stmts) => match &stmts[0] {
                Node::ForIn { var, .. } => assert_eq!(var, "x"),
                _ => panic!("expected for-in"),
            },
            _ => panic!("expected block"),
        }
    }

    #[test]
    fn function_decl_with_defaults() {
        match parse("function add(x, y = 1) { return x + y; }") {
            Node::Block(stmts) => match &stmts[0] {
                Node::FunctionDecl { name, params, .. } => {
                    assert_eq!(name, "add");
                    assert_eq!(params.len(), 2);
                    assert!(params[0].default.is_none());
                    assert!(params[1].default.is_some());
                }
                _ => panic!("expected function decl"),
            },
            _ => panic!("expected block"),
        }
    }

    #[test]
    fn function_with_void_params() {
        match parse("function show(void) { return 1; }") {
            Node::Block(stmts) => match &stmts[0] {
                Node::FunctionDecl { params, .. } => assert!(params.is_empty()),
                _ => panic!("expected function decl"),
            },
            _ => panic!("expected block"),
        }
    }

    #[test]
    fn lambda_disambiguated_from_parenthesized_expression() {
        match parse("&insert f = (x, y) => { return x + y; };") {
            Node::Block(stmts) => match &stmts[0] {
                Node::Assign { value, .. } => {
                    assert!(matches!(value.as_ref(), Node::Lambda { .. }));
                }
                _ => panic!("expected assign"),
            },
            _ => panic!("expected block"),
        }

        match parse("&insert x = (1 + 2);") {
            Node::Block(stmts) => match &stmts[0] {
                Node::Assign { value, .. } => {
                    assert!(matches!(value.as_ref(), Node::Binary { .. }));
                }
                _ => panic!("expected assign"),
            },
            _ => panic!("expected block"),
        }
    }

    #[test]
    fn namespace_and_enum_parse() {
        match parse("namespace M { &insert b = 1; } enum C { R = 1, G, B = 4 }") {
            Node::Block(stmts) => {
                assert!(matches!(&stmts[0], Node::Namespace { .. }));
                match &stmts[1] {
                    Node::EnumDecl { members, .. } => {
                        assert_eq!(members.len(), 3);
                        assert_eq!(members[0].0, "R");
                        assert_eq!(members[1].0, "G");
                        assert!(members[1].1.is_none());
                    }
                    _ => panic!("expected enum decl"),
                }
            }
            _ => panic!("expected block"),
        }
    }

    #[test]
    fn match_with_default_parses() {
        match parse("match (k) { case 1: a; case 2: b; default: c; }") {
            Node::Block(stmts) => match &stmts[0] {
                Node::Match { cases, default, .. } => {
                    assert_eq!(cases.len(), 2);
                    assert!(default.is_some());
                }
                _ => panic!("expected match"),
            },
            _ => panic!("expected block"),
        }
    }

    #[test]
    fn try_catch_finally_parses() {
        match parse("try { a; } catch (e) { b; } finally { c; }") {
            Node::Block(stmts) => match &stmts[0] {
                Node::TryCatchFinally {
                    catch_name,
                    catch_body,
                    finally_body,
                    ..
                } => {
                    assert_eq!(catch_name.as_deref(), Some("e"));
                    assert!(catch_body.is_some());
                    assert!(finally_body.is_some());
                }
                _ => panic!("expected try/catch/finally"),
            },
            _ => panic!("expected block"),
        }
    }

    #[test]
    fn bare_call_statement() {
        match parse("system.print(1, 2);") {
            Node::Block(stmts) => match &stmts[0] {
                Node::Call { name, args } => {
                    assert_eq!(name, "system.print");
                    assert_eq!(args.len(), 2);
                }
                _ => panic!("expected call"),
            },
            _ => panic!("expected block"),
        }
    }

    #[test]
    fn include_resolves_absolute_path_and_dedups() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("sharp_parser_test_{}.sharp", std::process::id()));
        std::fs::write(&path, "&insert included_marker = 1;").unwrap();

        let mut parser = Parser::new("");
        let path_str = path.to_str().unwrap().to_string();
        let first = parser.resolve_include(&path_str);
        assert!(matches!(first, Node::Block(ref stmts) if !stmts.is_empty()));

        let second = parser.resolve_include(&path_str);
        assert_eq!(second, Node::Null);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn unclosed_block_recovers_with_diagnostic_not_panic() {
        let node = parse("if (x) { y;");
        assert!(matches!(node, Node::Block(_)));
    }
}

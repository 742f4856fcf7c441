//! Hand-written recursive-descent parser with Pratt-style expression
//! precedence, built on `langtools::parsing::ParsingContext`.

mod expr;

use std::sync::Arc;

use langtools::parsing::{self, ParsingContext};
use langtools::scope::{Scope, ScopeFlags};
use langtools::source::{Source, SourceRange};
use langtools::token::{Token, TokenKind};
use langtools::tree::{NodeId, Tree};

use crate::ast::declarations::{Declaration, Function, Namespace, StructuredType, TypeAlias, Variable};
use crate::ast::statements::{BasicKind, Block, If, Return, Statement, While};
use crate::ast::types::{BasicTypeKind, Type, WithBitWidth};
use crate::ast::{kinds, Payload, TranslationUnit};
use crate::token as tok;

pub struct Parser<'a> {
    ctx: ParsingContext<Token>,
    tree: &'a mut Tree<Payload>,
    messages: &'a mut langtools::diagnostics::MessageContext,
    source: Arc<Source>,
}

pub fn parse(
    tokens: Vec<Token>,
    source: Arc<Source>,
    tree: &mut Tree<Payload>,
    messages: &mut langtools::diagnostics::MessageContext,
) -> NodeId {
    let mut parser = Parser {
        ctx: ParsingContext::new(tokens),
        tree,
        messages,
        source,
    };
    parser.parse_translation_unit()
}

impl<'a> Parser<'a> {
    fn eof_range(&self) -> SourceRange {
        self.ctx
            .last()
            .map(|t| t.range.clone())
            .unwrap_or_else(SourceRange::empty)
    }

    fn peek_kind(&self) -> Option<TokenKind> {
        self.ctx.peek().map(|t| t.kind)
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek_kind() == Some(kind)
    }

    fn advance(&mut self) -> Option<Token> {
        self.ctx.read()
    }

    fn expect(&mut self, kind: TokenKind, expected_set: &[&str]) -> Option<Token> {
        if self.check(kind) {
            self.ctx.read()
        } else {
            let range = self
                .ctx
                .peek()
                .map(|t| t.range.clone())
                .unwrap_or_else(|| self.eof_range());
            let actual = self
                .ctx
                .peek()
                .map(|t| t.value.clone())
                .unwrap_or_else(|| "end of file".to_string());
            self.messages.emit(parsing::expected(range, expected_set, actual));
            None
        }
    }

    fn current_range(&self) -> SourceRange {
        self.ctx.peek().map(|t| t.range.clone()).unwrap_or_else(|| self.eof_range())
    }

    fn insert(&mut self, kind: langtools::tree::NodeKind, range: SourceRange, payload: Payload) -> NodeId {
        self.tree.insert(kind, range, payload)
    }

    fn parse_translation_unit(&mut self) -> NodeId {
        let start = self.current_range();
        let mut declarations = Vec::new();
        while !self.ctx.at_end() {
            let before = self.ctx.save();
            match self.parse_declaration() {
                Some(decl) => declarations.push(decl),
                None => {
                    // Could not make progress on a top-level declaration;
                    // skip the offending token so later declarations still
                    // get a chance to parse, matching the "partial tree
                    // with errors recorded" recovery policy.
                    self.ctx.restore(before);
                    if self.advance().is_none() {
                        break;
                    }
                }
            }
        }
        let end = self.current_range();
        self.insert(
            kinds::TRANSLATION_UNIT,
            SourceRange::combine(&start, &end),
            Payload::TranslationUnit(TranslationUnit {
                declarations,
                scope: Scope::new(ScopeFlags::MODULE),
            }),
        )
    }

    fn parse_declaration(&mut self) -> Option<NodeId> {
        match self.peek_kind() {
            Some(k) if k == tok::KW_FUNC => self.parse_function_declaration(),
            Some(k) if k == tok::KW_LET || k == tok::KW_CONST => self.parse_variable_declaration_stmt(true),
            Some(k) if k == tok::KW_TYPE => self.parse_type_alias_declaration(),
            Some(k) if k == tok::KW_STRUCT => self.parse_struct_declaration(),
            Some(k) if k == tok::KW_NAMESPACE => self.parse_namespace_declaration(),
            _ => None,
        }
    }

    fn parse_function_declaration(&mut self) -> Option<NodeId> {
        let start = self.current_range();
        self.advance();
        let name = self.expect(tok::IDENTIFIER, &["identifier"])?.value;
        self.expect(tok::LPAREN, &["("])?;

        let mut parameters = Vec::new();
        if !self.check(tok::RPAREN) {
            loop {
                let param_start = self.current_range();
                let param_name = self.expect(tok::IDENTIFIER, &["identifier"])?.value;
                self.expect(tok::COLON, &[":"])?;
                let param_type = self.parse_type()?;
                let param_end = self.current_range();
                let param = self.insert(
                    kinds::DECL_VARIABLE,
                    SourceRange::combine(&param_start, &param_end),
                    Payload::Declaration(Declaration::Variable(Variable {
                        name: param_name,
                        is_const: true,
                        declared_type: Some(param_type),
                        initial: None,
                        resolved_type: None,
                    })),
                );
                parameters.push(param);
                if self.check(tok::COMMA) {
                    self.advance();
                } else {
                    break;
                }
            }
        }
        self.expect(tok::RPAREN, &[")"])?;
        self.expect(tok::ARROW, &["->"])?;
        let return_type = self.parse_type()?;

        let body = if self.check(tok::LBRACE) {
            Some(self.parse_block()?)
        } else {
            self.expect(tok::SEMICOLON, &[";", "{"]);
            None
        };

        let end = self.current_range();
        Some(self.insert(
            kinds::DECL_FUNCTION,
            SourceRange::combine(&start, &end),
            Payload::Declaration(Declaration::Function(Function {
                name,
                parameters,
                return_type,
                body,
                scope: Scope::new(ScopeFlags::PARAMETERS),
            })),
        ))
    }

    fn parse_variable_declaration_stmt(&mut self, top_level: bool) -> Option<NodeId> {
        let start = self.current_range();
        let is_const = self.check(tok::KW_CONST);
        self.advance();
        let name = self.expect(tok::IDENTIFIER, &["identifier"])?.value;

        let declared_type = if self.check(tok::COLON) {
            self.advance();
            Some(self.parse_type()?)
        } else {
            None
        };

        let initial = if self.check(tok::EQ) {
            self.advance();
            Some(self.parse_expression()?)
        } else {
            None
        };

        self.expect(tok::SEMICOLON, &[";"]);
        let end = self.current_range();
        let range = SourceRange::combine(&start, &end);
        let payload = Payload::Declaration(Declaration::Variable(Variable {
            name,
            is_const,
            declared_type,
            initial,
            resolved_type: None,
        }));

        if top_level {
            Some(self.insert(kinds::DECL_VARIABLE, range, payload))
        } else {
            let decl = self.insert(kinds::DECL_VARIABLE, range.clone(), payload);
            Some(self.insert(kinds::STMT_DECLARATION, range, Payload::Statement(Statement::Declaration(decl))))
        }
    }

    fn parse_type_alias_declaration(&mut self) -> Option<NodeId> {
        let start = self.current_range();
        self.advance();
        let name = self.expect(tok::IDENTIFIER, &["identifier"])?.value;
        self.expect(tok::EQ, &["="])?;
        let explicit = if self.check(tok::KW_EXPLICIT) {
            self.advance();
            true
        } else {
            false
        };
        let aliased_type = self.parse_type()?;
        self.expect(tok::SEMICOLON, &[";"]);
        let end = self.current_range();
        Some(self.insert(
            kinds::DECL_TYPE_ALIAS,
            SourceRange::combine(&start, &end),
            Payload::Declaration(Declaration::TypeAlias(TypeAlias {
                name,
                aliased_type,
                explicit,
            })),
        ))
    }

    fn parse_struct_declaration(&mut self) -> Option<NodeId> {
        let start = self.current_range();
        self.advance();
        let name = self.expect(tok::IDENTIFIER, &["identifier"])?.value;
        self.expect(tok::LBRACE, &["{"])?;

        let mut members = Vec::new();
        while !self.check(tok::RBRACE) && !self.ctx.at_end() {
            let member_start = self.current_range();
            let member_name = self.expect(tok::IDENTIFIER, &["identifier"])?.value;
            self.expect(tok::COLON, &[":"])?;
            let member_type = self.parse_type()?;
            self.expect(tok::SEMICOLON, &[";"])?;
            let member_end = self.current_range();
            members.push(self.insert(
                kinds::DECL_VARIABLE,
                SourceRange::combine(&member_start, &member_end),
                Payload::Declaration(Declaration::Variable(Variable {
                    name: member_name,
                    is_const: false,
                    declared_type: Some(member_type),
                    initial: None,
                    resolved_type: None,
                })),
            ));
        }
        self.expect(tok::RBRACE, &["}"])?;

        let end = self.current_range();
        Some(self.insert(
            kinds::DECL_STRUCTURED_TYPE,
            SourceRange::combine(&start, &end),
            Payload::Declaration(Declaration::StructuredType(StructuredType {
                name,
                members,
                scope: Scope::new(ScopeFlags::MODULE),
            })),
        ))
    }

    fn parse_namespace_declaration(&mut self) -> Option<NodeId> {
        let start = self.current_range();
        self.advance();
        let name = self.expect(tok::IDENTIFIER, &["identifier"])?.value;
        self.expect(tok::LBRACE, &["{"])?;
        let mut members = Vec::new();
        while !self.check(tok::RBRACE) && !self.ctx.at_end() {
            match self.parse_declaration() {
                Some(member) => members.push(member),
                None => {
                    self.advance();
                }
            }
        }
        self.expect(tok::RBRACE, &["}"])?;
        let end = self.current_range();
        Some(self.insert(
            kinds::DECL_NAMESPACE,
            SourceRange::combine(&start, &end),
            Payload::Declaration(Declaration::Namespace(Namespace {
                name,
                members,
                scope: Scope::new(ScopeFlags::MODULE),
            })),
        ))
    }

    fn parse_type(&mut self) -> Option<NodeId> {
        let start = self.current_range();
        if self.check(tok::STAR) {
            self.advance();
            let inner = self.parse_type()?;
            let end = self.current_range();
            return Some(self.insert(
                kinds::TYPE_POINTER,
                SourceRange::combine(&start, &end),
                Payload::Type(Type::Pointer(inner)),
            ));
        }

        let name = self.expect(tok::IDENTIFIER, &["type"])?.value;
        let end = self.current_range();
        let range = SourceRange::combine(&start, &end);
        let payload = match basic_or_bit_width_type(&name) {
            Some(Type::Basic(k)) => Payload::Type(Type::Basic(k)),
            Some(other) => Payload::Type(other),
            None => Payload::Type(Type::Symbol(crate::ast::types::Symbol { name, resolved: None })),
        };
        let kind = match &payload {
            Payload::Type(Type::Basic(_)) => kinds::TYPE_BASIC,
            Payload::Type(Type::WithBitWidth(_)) => kinds::TYPE_WITH_BIT_WIDTH,
            _ => kinds::TYPE_SYMBOL,
        };
        Some(self.insert(kind, range, payload))
    }

    fn parse_block(&mut self) -> Option<NodeId> {
        let start = self.current_range();
        self.expect(tok::LBRACE, &["{"])?;
        let mut statements = Vec::new();
        while !self.check(tok::RBRACE) && !self.ctx.at_end() {
            match self.parse_statement() {
                Some(stmt) => statements.push(stmt),
                None => {
                    self.advance();
                }
            }
        }
        self.expect(tok::RBRACE, &["}"])?;
        let end = self.current_range();
        Some(self.insert(
            kinds::STMT_BLOCK,
            SourceRange::combine(&start, &end),
            Payload::Statement(Statement::Block(Block {
                statements,
                scope: Scope::new(ScopeFlags::BLOCK),
            })),
        ))
    }

    fn parse_statement(&mut self) -> Option<NodeId> {
        match self.peek_kind() {
            Some(k) if k == tok::LBRACE => self.parse_block(),
            Some(k) if k == tok::KW_IF => self.parse_if_statement(),
            Some(k) if k == tok::KW_WHILE => self.parse_while_statement(),
            Some(k) if k == tok::KW_RETURN => self.parse_return_statement(),
            Some(k) if k == tok::KW_CONTINUE => self.parse_basic_statement(BasicKind::Continue, kinds::STMT_CONTINUE),
            Some(k) if k == tok::KW_BREAK => self.parse_basic_statement(BasicKind::Break, kinds::STMT_BREAK),
            Some(k) if k == tok::KW_LET || k == tok::KW_CONST => self.parse_variable_declaration_stmt(false),
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_basic_statement(&mut self, kind: BasicKind, node_kind: langtools::tree::NodeKind) -> Option<NodeId> {
        let start = self.current_range();
        self.advance();
        self.expect(tok::SEMICOLON, &[";"]);
        let end = self.current_range();
        Some(self.insert(
            node_kind,
            SourceRange::combine(&start, &end),
            Payload::Statement(Statement::Basic(kind)),
        ))
    }

    fn parse_if_statement(&mut self) -> Option<NodeId> {
        let start = self.current_range();
        self.advance();
        let condition = self.parse_expression()?;
        let then_block = self.parse_block()?;
        let else_branch = if self.check(tok::KW_ELSE) {
            self.advance();
            if self.check(tok::KW_IF) {
                self.parse_if_statement()
            } else {
                self.parse_block()
            }
        } else {
            None
        };
        let end = self.current_range();
        Some(self.insert(
            kinds::STMT_IF,
            SourceRange::combine(&start, &end),
            Payload::Statement(Statement::If(If {
                condition,
                then_block,
                else_branch,
            })),
        ))
    }

    fn parse_while_statement(&mut self) -> Option<NodeId> {
        let start = self.current_range();
        self.advance();
        let condition = self.parse_expression()?;
        let body = self.parse_block()?;
        let end = self.current_range();
        Some(self.insert(
            kinds::STMT_WHILE,
            SourceRange::combine(&start, &end),
            Payload::Statement(Statement::While(While { condition, body })),
        ))
    }

    fn parse_return_statement(&mut self) -> Option<NodeId> {
        let start = self.current_range();
        self.advance();
        if self.check(tok::SEMICOLON) {
            self.advance();
            let end = self.current_range();
            return Some(self.insert(
                kinds::STMT_RETURN_VOID,
                SourceRange::combine(&start, &end),
                Payload::Statement(Statement::Basic(BasicKind::ReturnVoid)),
            ));
        }
        let value = self.parse_expression()?;
        self.expect(tok::SEMICOLON, &[";"]);
        let end = self.current_range();
        Some(self.insert(
            kinds::STMT_RETURN,
            SourceRange::combine(&start, &end),
            Payload::Statement(Statement::Return(Return { value })),
        ))
    }

    fn parse_expression_statement(&mut self) -> Option<NodeId> {
        let start = self.current_range();
        let value = self.parse_expression()?;
        self.expect(tok::SEMICOLON, &[";"]);
        let end = self.current_range();
        Some(self.insert(
            kinds::STMT_VALUE,
            SourceRange::combine(&start, &end),
            Payload::Statement(Statement::Value(value)),
        ))
    }
}

fn basic_or_bit_width_type(name: &str) -> Option<Type> {
    match name {
        "bool" => Some(Type::Basic(BasicTypeKind::Bool)),
        "void" => Some(Type::Basic(BasicTypeKind::Void)),
        "isize" => Some(Type::Basic(BasicTypeKind::Isize)),
        "usize" => Some(Type::Basic(BasicTypeKind::Usize)),
        "i8" => Some(Type::WithBitWidth(WithBitWidth { signed: true, float: false, width: 8 })),
        "i16" => Some(Type::WithBitWidth(WithBitWidth { signed: true, float: false, width: 16 })),
        "i32" => Some(Type::WithBitWidth(WithBitWidth { signed: true, float: false, width: 32 })),
        "i64" => Some(Type::WithBitWidth(WithBitWidth { signed: true, float: false, width: 64 })),
        "u8" => Some(Type::WithBitWidth(WithBitWidth { signed: false, float: false, width: 8 })),
        "u16" => Some(Type::WithBitWidth(WithBitWidth { signed: false, float: false, width: 16 })),
        "u32" => Some(Type::WithBitWidth(WithBitWidth { signed: false, float: false, width: 32 })),
        "u64" => Some(Type::WithBitWidth(WithBitWidth { signed: false, float: false, width: 64 })),
        "f32" => Some(Type::WithBitWidth(WithBitWidth { signed: true, float: true, width: 32 })),
        "f64" => Some(Type::WithBitWidth(WithBitWidth { signed: true, float: true, width: 64 })),
        _ => None,
    }
}

//! Expression parsing: precedence-climbing over the table in the node
//! catalogue's binary operator list, lowest (assignment) to highest
//! (postfix).

use langtools::source::SourceRange;
use langtools::tree::NodeId;

use super::{basic_or_bit_width_type, Parser};
use crate::ast::operators::{BinaryOperator, UnaryOperator};
use crate::ast::values::{BinaryValue, CallValue, CastValue, LiteralNumber, NumberBits, SymbolRef, UnaryValue, Value, ValueKind};
use crate::ast::{kinds, Payload};
use crate::token as tok;

impl<'a> Parser<'a> {
    pub(super) fn parse_expression(&mut self) -> Option<NodeId> {
        self.parse_assignment()
    }

    fn insert_value(&mut self, start: SourceRange, end: SourceRange, kind: ValueKind) -> NodeId {
        let node_kind = match &kind {
            ValueKind::LiteralBool(_) => kinds::VALUE_LITERAL_BOOL,
            ValueKind::LiteralNumber(_) => kinds::VALUE_LITERAL_NUMBER,
            ValueKind::Symbol(_) => kinds::VALUE_SYMBOL,
            ValueKind::Unary(_) => kinds::VALUE_UNARY,
            ValueKind::Binary(_) => kinds::VALUE_BINARY,
            ValueKind::Call(_) => kinds::VALUE_CALL,
            ValueKind::Cast(_) => kinds::VALUE_CAST,
            ValueKind::MemberName(_) => kinds::VALUE_MEMBER_NAME,
        };
        self.insert(node_kind, SourceRange::combine(&start, &end), Payload::Value(Value::new(kind)))
    }

    fn parse_assignment(&mut self) -> Option<NodeId> {
        let start = self.current_range();
        let lhs = self.parse_logical_or()?;

        let op = match self.peek_kind() {
            Some(k) if k == tok::EQ => Some(BinaryOperator::Assign),
            Some(k) if k == tok::PLUS_EQ => Some(BinaryOperator::AddAssign),
            Some(k) if k == tok::MINUS_EQ => Some(BinaryOperator::SubAssign),
            Some(k) if k == tok::STAR_EQ => Some(BinaryOperator::MulAssign),
            Some(k) if k == tok::SLASH_EQ => Some(BinaryOperator::DivAssign),
            Some(k) if k == tok::PERCENT_EQ => Some(BinaryOperator::ModAssign),
            Some(k) if k == tok::AMP_EQ => Some(BinaryOperator::BitAndAssign),
            Some(k) if k == tok::PIPE_EQ => Some(BinaryOperator::BitOrAssign),
            Some(k) if k == tok::CARET_EQ => Some(BinaryOperator::BitXorAssign),
            Some(k) if k == tok::SHL_EQ => Some(BinaryOperator::ShlAssign),
            Some(k) if k == tok::SHR_EQ => Some(BinaryOperator::ShrAssign),
            _ => None,
        };

        let Some(op) = op else { return Some(lhs) };
        self.advance();
        let rhs = self.parse_assignment()?;
        let end = self.current_range();
        Some(self.insert_value(start, end, ValueKind::Binary(BinaryValue { op, lhs, rhs })))
    }

    fn parse_left_assoc(
        &mut self,
        start: SourceRange,
        next: fn(&mut Self) -> Option<NodeId>,
        mut match_op: impl FnMut(&Self) -> Option<BinaryOperator>,
    ) -> Option<NodeId> {
        let mut lhs = next(self)?;
        while let Some(op) = match_op(self) {
            self.advance();
            let rhs = next(self)?;
            let end = self.current_range();
            lhs = self.insert_value(start.clone(), end, ValueKind::Binary(BinaryValue { op, lhs, rhs }));
        }
        Some(lhs)
    }

    fn parse_logical_or(&mut self) -> Option<NodeId> {
        let start = self.current_range();
        self.parse_left_assoc(start, Self::parse_logical_and, |p| {
            (p.peek_kind() == Some(tok::PIPE_PIPE)).then_some(BinaryOperator::BoolOr)
        })
    }

    fn parse_logical_and(&mut self) -> Option<NodeId> {
        let start = self.current_range();
        self.parse_left_assoc(start, Self::parse_comparison, |p| {
            (p.peek_kind() == Some(tok::AMP_AMP)).then_some(BinaryOperator::BoolAnd)
        })
    }

    /// Equality and relational operators share one precedence level, below
    /// every bitwise operator: `a & 1 == 0` parses as `(a & 1) == 0`, not
    /// `a & (1 == 0)`, matching the precedence table most newer systems
    /// languages settled on after `&`/`==` mixups in C.
    fn parse_comparison(&mut self) -> Option<NodeId> {
        let start = self.current_range();
        self.parse_left_assoc(start, Self::parse_bit_or, |p| match p.peek_kind() {
            Some(k) if k == tok::EQ_EQ => Some(BinaryOperator::Eq),
            Some(k) if k == tok::BANG_EQ => Some(BinaryOperator::Ne),
            Some(k) if k == tok::LT => Some(BinaryOperator::Lt),
            Some(k) if k == tok::LE => Some(BinaryOperator::Le),
            Some(k) if k == tok::GT => Some(BinaryOperator::Gt),
            Some(k) if k == tok::GE => Some(BinaryOperator::Ge),
            _ => None,
        })
    }

    fn parse_bit_or(&mut self) -> Option<NodeId> {
        let start = self.current_range();
        self.parse_left_assoc(start, Self::parse_bit_xor, |p| {
            (p.peek_kind() == Some(tok::PIPE)).then_some(BinaryOperator::BitOr)
        })
    }

    fn parse_bit_xor(&mut self) -> Option<NodeId> {
        let start = self.current_range();
        self.parse_left_assoc(start, Self::parse_bit_and, |p| {
            (p.peek_kind() == Some(tok::CARET)).then_some(BinaryOperator::BitXor)
        })
    }

    fn parse_bit_and(&mut self) -> Option<NodeId> {
        let start = self.current_range();
        self.parse_left_assoc(start, Self::parse_shift, |p| {
            (p.peek_kind() == Some(tok::AMP)).then_some(BinaryOperator::BitAnd)
        })
    }

    fn parse_shift(&mut self) -> Option<NodeId> {
        let start = self.current_range();
        self.parse_left_assoc(start, Self::parse_additive, |p| match p.peek_kind() {
            Some(k) if k == tok::SHL => Some(BinaryOperator::Shl),
            Some(k) if k == tok::SHR => Some(BinaryOperator::Shr),
            _ => None,
        })
    }

    fn parse_additive(&mut self) -> Option<NodeId> {
        let start = self.current_range();
        self.parse_left_assoc(start, Self::parse_multiplicative, |p| match p.peek_kind() {
            Some(k) if k == tok::PLUS => Some(BinaryOperator::Add),
            Some(k) if k == tok::MINUS => Some(BinaryOperator::Sub),
            _ => None,
        })
    }

    fn parse_multiplicative(&mut self) -> Option<NodeId> {
        let start = self.current_range();
        self.parse_left_assoc(start, Self::parse_exponent, |p| match p.peek_kind() {
            Some(k) if k == tok::STAR => Some(BinaryOperator::Mul),
            Some(k) if k == tok::SLASH => Some(BinaryOperator::Div),
            Some(k) if k == tok::PERCENT => Some(BinaryOperator::Mod),
            _ => None,
        })
    }

    /// Right-associative: `2 ** 3 ** 2` parses as `2 ** (3 ** 2)`.
    fn parse_exponent(&mut self) -> Option<NodeId> {
        let start = self.current_range();
        let lhs = self.parse_unary()?;
        if self.check(tok::STAR_STAR) {
            self.advance();
            let rhs = self.parse_exponent()?;
            let end = self.current_range();
            return Some(self.insert_value(start, end, ValueKind::Binary(BinaryValue { op: BinaryOperator::Exp, lhs, rhs })));
        }
        Some(lhs)
    }

    fn parse_unary(&mut self) -> Option<NodeId> {
        let start = self.current_range();
        let op = match self.peek_kind() {
            Some(k) if k == tok::BANG => Some(UnaryOperator::BoolNot),
            Some(k) if k == tok::TILDE => Some(UnaryOperator::BitNot),
            Some(k) if k == tok::PLUS => Some(UnaryOperator::Pos),
            Some(k) if k == tok::MINUS => Some(UnaryOperator::Neg),
            Some(k) if k == tok::STAR => Some(UnaryOperator::Deref),
            Some(k) if k == tok::AMP => Some(UnaryOperator::GetAddr),
            _ => None,
        };
        let Some(op) = op else { return self.parse_postfix() };
        self.advance();
        let operand = self.parse_unary()?;
        let end = self.current_range();
        Some(self.insert_value(start, end, ValueKind::Unary(UnaryValue { op, operand })))
    }

    fn parse_postfix(&mut self) -> Option<NodeId> {
        let start = self.current_range();
        let mut value = self.parse_primary()?;
        loop {
            if self.check(tok::LPAREN) {
                self.advance();
                let mut args = Vec::new();
                if !self.check(tok::RPAREN) {
                    loop {
                        args.push(self.parse_expression()?);
                        if self.check(tok::COMMA) {
                            self.advance();
                        } else {
                            break;
                        }
                    }
                }
                self.expect(tok::RPAREN, &[")"])?;
                let end = self.current_range();
                value = self.insert_value(start.clone(), end, ValueKind::Call(CallValue { callee: value, args }));
            } else if self.check(tok::KW_AS) {
                self.advance();
                let target_type = self.parse_type()?;
                let end = self.current_range();
                value = self.insert_value(
                    start.clone(),
                    end,
                    ValueKind::Cast(CastValue { value, target_type, implicit: false }),
                );
            } else if self.check(tok::DOT) {
                self.advance();
                let member_start = self.current_range();
                let name_token = self.expect(tok::IDENTIFIER, &["identifier"])?;
                let member_end = self.current_range();
                let member = self.insert_value(member_start, member_end, ValueKind::MemberName(name_token.value));
                let end = self.current_range();
                value = self.insert_value(
                    start.clone(),
                    end,
                    ValueKind::Binary(BinaryValue { op: BinaryOperator::MemberAccess, lhs: value, rhs: member }),
                );
            } else {
                break;
            }
        }
        Some(value)
    }

    fn parse_primary(&mut self) -> Option<NodeId> {
        let start = self.current_range();
        match self.peek_kind() {
            Some(k) if k == tok::KW_TRUE => {
                self.advance();
                let end = self.current_range();
                Some(self.insert_value(start, end, ValueKind::LiteralBool(true)))
            }
            Some(k) if k == tok::KW_FALSE => {
                self.advance();
                let end = self.current_range();
                Some(self.insert_value(start, end, ValueKind::LiteralBool(false)))
            }
            Some(k) if k == tok::INTEGER_LITERAL => {
                let token = self.advance().unwrap();
                self.parse_integer_literal(start, token)
            }
            Some(k) if k == tok::FLOAT_LITERAL => {
                let token = self.advance().unwrap();
                self.parse_float_literal(start, token)
            }
            Some(k) if k == tok::IDENTIFIER => {
                let token = self.advance().unwrap();
                let end = self.current_range();
                Some(self.insert_value(start, end, ValueKind::Symbol(SymbolRef { name: token.value, resolved: None })))
            }
            Some(k) if k == tok::LPAREN => {
                self.advance();
                let inner = self.parse_expression()?;
                self.expect(tok::RPAREN, &[")"])?;
                Some(inner)
            }
            _ => {
                let range = self.current_range();
                let actual = self
                    .ctx
                    .peek()
                    .map(|t| t.value.clone())
                    .unwrap_or_else(|| "end of file".to_string());
                self.messages.emit(langtools::parsing::expected(range, &["expression"], actual));
                None
            }
        }
    }

    fn parse_integer_literal(&mut self, start: SourceRange, token: langtools::token::Token) -> Option<NodeId> {
        let (digits, suffix) = split_digits_and_suffix(&token.value);
        let signed = !matches!(suffix.as_str(), "u8" | "u16" | "u32" | "u64" | "usize");
        let type_name = if suffix.is_empty() { "i32" } else { suffix.as_str() };
        let type_node = self.insert_type_for_literal(type_name);

        let bits = if signed {
            NumberBits::Signed(digits.parse().unwrap_or(0))
        } else {
            NumberBits::Unsigned(digits.parse().unwrap_or(0))
        };

        let end = self.current_range();
        Some(self.insert_value(
            start,
            end,
            ValueKind::LiteralNumber(LiteralNumber { type_node, bits }),
        ))
    }

    fn parse_float_literal(&mut self, start: SourceRange, token: langtools::token::Token) -> Option<NodeId> {
        let (digits, suffix) = split_digits_and_suffix(&token.value);
        let type_name = if suffix.is_empty() { "f64" } else { suffix.as_str() };
        let type_node = self.insert_type_for_literal(type_name);
        let bits = NumberBits::Float(digits.parse().unwrap_or(0.0));
        let end = self.current_range();
        Some(self.insert_value(
            start,
            end,
            ValueKind::LiteralNumber(LiteralNumber { type_node, bits }),
        ))
    }

    fn insert_type_for_literal(&mut self, type_name: &str) -> NodeId {
        let range = self.current_range();
        match basic_or_bit_width_type(type_name) {
            Some(crate::ast::types::Type::Basic(k)) => {
                self.insert(kinds::TYPE_BASIC, range, Payload::Type(crate::ast::types::Type::Basic(k)))
            }
            Some(other @ crate::ast::types::Type::WithBitWidth(_)) => {
                self.insert(kinds::TYPE_WITH_BIT_WIDTH, range, Payload::Type(other))
            }
            _ => self.insert(
                kinds::TYPE_SYMBOL,
                range,
                Payload::Type(crate::ast::types::Type::Symbol(crate::ast::types::Symbol {
                    name: type_name.to_string(),
                    resolved: None,
                })),
            ),
        }
    }
}

fn split_digits_and_suffix(text: &str) -> (String, String) {
    match text.find(|c: char| c.is_ascii_alphabetic()) {
        Some(idx) => (text[..idx].to_string(), text[idx..].to_string()),
        None => (text.to_string(), String::new()),
    }
}

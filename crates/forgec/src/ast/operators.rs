//! Unary and binary operator tags, plus the compound-assignment desugaring
//! table used by the type-resolution pass.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    BoolNot,
    BitNot,
    Pos,
    Neg,
    Deref,
    GetAddr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    BoolAnd,
    BoolOr,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Exp,
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    ModAssign,
    ExpAssign,
    BitAndAssign,
    BitOrAssign,
    BitXorAssign,
    ShlAssign,
    ShrAssign,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    MemberAccess,
}

impl BinaryOperator {
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOperator::Eq
                | BinaryOperator::Ne
                | BinaryOperator::Lt
                | BinaryOperator::Le
                | BinaryOperator::Gt
                | BinaryOperator::Ge
        )
    }

    pub fn is_compound_assignment(self) -> bool {
        self.try_get_compound_assignment_base_operator().is_some()
    }

    /// Maps a compound-assignment operator (`+=`, `&=`, …) to the plain
    /// binary operator it desugars through (`x op= y` becomes `x = x op
    /// y`), or `None` for operators that are not compound assignments.
    pub fn try_get_compound_assignment_base_operator(self) -> Option<BinaryOperator> {
        match self {
            BinaryOperator::AddAssign => Some(BinaryOperator::Add),
            BinaryOperator::SubAssign => Some(BinaryOperator::Sub),
            BinaryOperator::MulAssign => Some(BinaryOperator::Mul),
            BinaryOperator::DivAssign => Some(BinaryOperator::Div),
            BinaryOperator::ModAssign => Some(BinaryOperator::Mod),
            BinaryOperator::ExpAssign => Some(BinaryOperator::Exp),
            BinaryOperator::BitAndAssign => Some(BinaryOperator::BitAnd),
            BinaryOperator::BitOrAssign => Some(BinaryOperator::BitOr),
            BinaryOperator::BitXorAssign => Some(BinaryOperator::BitXor),
            BinaryOperator::ShlAssign => Some(BinaryOperator::Shl),
            BinaryOperator::ShrAssign => Some(BinaryOperator::Shr),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compound_assignment_maps_to_base_operator() {
        assert_eq!(
            BinaryOperator::AddAssign.try_get_compound_assignment_base_operator(),
            Some(BinaryOperator::Add)
        );
        assert_eq!(BinaryOperator::Add.try_get_compound_assignment_base_operator(), None);
    }
}

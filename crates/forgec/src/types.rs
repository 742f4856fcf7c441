//! Queries over type nodes: classification, casting legality, and the
//! "containing type" arithmetic promotion rule. Kept separate from
//! `ast::types` so the node catalogue doesn't carry semantic logic.

use langtools::tree::{NodeId, Tree};

use crate::ast::types::{BasicTypeKind, Type};
use crate::ast::Payload;

fn get_type<'a>(tree: &'a Tree<Payload>, node: NodeId) -> &'a Type {
    match &tree.get(node).payload {
        Payload::Type(t) => t,
        other => panic!("expected a type node, found {other:?}"),
    }
}

pub fn is_void(tree: &Tree<Payload>, node: NodeId) -> bool {
    matches!(get_type(tree, node), Type::Basic(BasicTypeKind::Void))
}

pub fn is_bool(tree: &Tree<Payload>, node: NodeId) -> bool {
    matches!(get_type(tree, node), Type::Basic(BasicTypeKind::Bool))
}

pub fn is_integer(tree: &Tree<Payload>, node: NodeId) -> bool {
    match get_type(tree, node) {
        Type::Basic(BasicTypeKind::Isize | BasicTypeKind::Usize) => true,
        Type::WithBitWidth(w) => !w.float,
        _ => false,
    }
}

pub fn is_integer_signed(tree: &Tree<Payload>, node: NodeId) -> bool {
    match get_type(tree, node) {
        Type::Basic(BasicTypeKind::Isize) => true,
        Type::Basic(BasicTypeKind::Usize) => false,
        Type::WithBitWidth(w) => !w.float && w.signed,
        _ => false,
    }
}

pub fn is_float(tree: &Tree<Payload>, node: NodeId) -> bool {
    matches!(get_type(tree, node), Type::WithBitWidth(w) if w.float)
}

pub fn is_pointer(tree: &Tree<Payload>, node: NodeId) -> bool {
    matches!(get_type(tree, node), Type::Pointer(_))
}

pub fn try_get_pointer_element_type(tree: &Tree<Payload>, node: NodeId) -> Option<NodeId> {
    match get_type(tree, node) {
        Type::Pointer(inner) => Some(*inner),
        _ => None,
    }
}

/// The bit width of an integer or float type, for widening comparisons.
/// Pointer-sized (`isize`/`usize`) types are treated as the pointer width
/// of the target, which this front end fixes at 64 to match the LLVM
/// target machines it builds for.
pub fn bit_width(tree: &Tree<Payload>, node: NodeId) -> u32 {
    match get_type(tree, node) {
        Type::Basic(BasicTypeKind::Isize | BasicTypeKind::Usize) => 64,
        Type::Basic(BasicTypeKind::Bool) => 1,
        Type::Basic(BasicTypeKind::Void) => 0,
        Type::WithBitWidth(w) => w.width,
        _ => 0,
    }
}

fn types_structurally_equal(tree: &Tree<Payload>, a: NodeId, b: NodeId) -> bool {
    if a == b {
        return true;
    }
    match (get_type(tree, a), get_type(tree, b)) {
        (Type::Basic(x), Type::Basic(y)) => x == y,
        (Type::WithBitWidth(x), Type::WithBitWidth(y)) => x == y,
        (Type::Pointer(x), Type::Pointer(y)) => types_structurally_equal(tree, *x, *y),
        _ => false,
    }
}

/// Whether a cast from `from` to `to` is implicit (inserted silently by the
/// cast-insertion pass), requires an explicit `as`, or is illegal outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastingMode {
    Illegal,
    Implicit,
    Explicit,
}

/// Widening between numeric kinds is implicit; narrowing, float<->integer,
/// and any cast touching `bool` or pointers requires an explicit `as`.
/// Two structurally identical types never need a cast at all, which callers
/// should check before consulting this table.
pub fn get_casting_mode(tree: &Tree<Payload>, from: NodeId, to: NodeId) -> CastingMode {
    if types_structurally_equal(tree, from, to) {
        return CastingMode::Implicit;
    }

    if is_pointer(tree, from) || is_pointer(tree, to) {
        return CastingMode::Explicit;
    }

    if is_bool(tree, from) || is_bool(tree, to) {
        return CastingMode::Explicit;
    }

    match (is_integer(tree, from), is_integer(tree, to), is_float(tree, from), is_float(tree, to)) {
        (true, true, false, false) => {
            let from_width = bit_width(tree, from);
            let to_width = bit_width(tree, to);
            let from_signed = is_integer_signed(tree, from);
            let to_signed = is_integer_signed(tree, to);
            if from_signed == to_signed && to_width >= from_width {
                CastingMode::Implicit
            } else {
                CastingMode::Explicit
            }
        }
        (false, false, true, true) => {
            if bit_width(tree, to) >= bit_width(tree, from) {
                CastingMode::Implicit
            } else {
                CastingMode::Explicit
            }
        }
        (true, false, false, true) | (false, true, true, false) => CastingMode::Explicit,
        _ => CastingMode::Illegal,
    }
}

/// The type that the result of a binary arithmetic expression over
/// `lhs`/`rhs` is computed in: the wider of the two when both are the same
/// numeric family (int-with-int, float-with-float), promoted to float when
/// one side is a float, or `None` when the two sides have no common
/// arithmetic type (e.g. pointer with float).
pub fn get_arithmetic_containing_type(tree: &Tree<Payload>, lhs: NodeId, rhs: NodeId) -> Option<NodeId> {
    if types_structurally_equal(tree, lhs, rhs) {
        return Some(lhs);
    }

    let lhs_float = is_float(tree, lhs);
    let rhs_float = is_float(tree, rhs);
    let lhs_int = is_integer(tree, lhs);
    let rhs_int = is_integer(tree, rhs);

    if !(lhs_float || lhs_int) || !(rhs_float || rhs_int) {
        return None;
    }

    if lhs_float && rhs_float {
        return Some(if bit_width(tree, lhs) >= bit_width(tree, rhs) { lhs } else { rhs });
    }
    if lhs_float {
        return Some(lhs);
    }
    if rhs_float {
        return Some(rhs);
    }

    let lhs_width = bit_width(tree, lhs);
    let rhs_width = bit_width(tree, rhs);
    if lhs_width != rhs_width {
        return Some(if lhs_width > rhs_width { lhs } else { rhs });
    }

    // Equal width, differing signedness: prefer the signed operand's type
    // rather than whichever argument happened to be passed first.
    if is_integer_signed(tree, lhs) == is_integer_signed(tree, rhs) {
        Some(lhs)
    } else if is_integer_signed(tree, lhs) {
        Some(lhs)
    } else {
        Some(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::types::WithBitWidth;
    use langtools::source::SourceRange;

    fn insert_type(tree: &mut Tree<Payload>, t: Type) -> NodeId {
        tree.insert(crate::ast::kinds::TYPE_WITH_BIT_WIDTH, SourceRange::empty(), Payload::Type(t))
    }

    #[test]
    fn widening_int_cast_is_implicit() {
        let mut tree = Tree::new();
        let i32_ty = insert_type(&mut tree, Type::WithBitWidth(WithBitWidth { signed: true, float: false, width: 32 }));
        let i64_ty = insert_type(&mut tree, Type::WithBitWidth(WithBitWidth { signed: true, float: false, width: 64 }));
        assert_eq!(get_casting_mode(&tree, i32_ty, i64_ty), CastingMode::Implicit);
        assert_eq!(get_casting_mode(&tree, i64_ty, i32_ty), CastingMode::Explicit);
    }

    #[test]
    fn int_to_float_requires_explicit_cast() {
        let mut tree = Tree::new();
        let i32_ty = insert_type(&mut tree, Type::WithBitWidth(WithBitWidth { signed: true, float: false, width: 32 }));
        let f64_ty = insert_type(&mut tree, Type::WithBitWidth(WithBitWidth { signed: true, float: true, width: 64 }));
        assert_eq!(get_casting_mode(&tree, i32_ty, f64_ty), CastingMode::Explicit);
    }

    #[test]
    fn containing_type_promotes_to_float() {
        let mut tree = Tree::new();
        let i32_ty = insert_type(&mut tree, Type::WithBitWidth(WithBitWidth { signed: true, float: false, width: 32 }));
        let f32_ty = insert_type(&mut tree, Type::WithBitWidth(WithBitWidth { signed: true, float: true, width: 32 }));
        assert_eq!(get_arithmetic_containing_type(&tree, i32_ty, f32_ty), Some(f32_ty));
    }

    #[test]
    fn containing_type_prefers_signed_when_widths_are_equal() {
        let mut tree = Tree::new();
        let i32_ty = insert_type(&mut tree, Type::WithBitWidth(WithBitWidth { signed: true, float: false, width: 32 }));
        let u32_ty = insert_type(&mut tree, Type::WithBitWidth(WithBitWidth { signed: false, float: false, width: 32 }));
        assert_eq!(get_arithmetic_containing_type(&tree, u32_ty, i32_ty), Some(i32_ty));
        assert_eq!(get_arithmetic_containing_type(&tree, i32_ty, u32_ty), Some(i32_ty));
    }
}

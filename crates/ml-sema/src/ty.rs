//! The ML type model.
//!
//! Types are a kind tag plus a textual name; identity is by name, similarity
//! by kind. Primitives are fixed singletons; composite payloads (fields,
//! parameters, methods) live on the semantic entities that scopes own, not
//! on `Ty` itself.

use std::fmt;

use ml_parser::ast::{Accessor, ModifierFlags};

/// Every kind of type in the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TyKind {
    None,
    Void,
    Null,
    Bool,
    I8,
    I16,
    I32,
    I64,
    I128,
    U8,
    U16,
    U32,
    U64,
    U128,
    F16,
    F32,
    F64,
    F128,
    Str,
    Char,
    Array,
    Class,
    Record,
    Variable,
    Function,
}

/// A type: kind tag plus name. Equality is by name; use
/// [`Ty::is_similar_to`] for kind-level comparison.
#[derive(Debug, Clone, Eq)]
pub struct Ty {
    pub kind: TyKind,
    pub name: String,
}

impl PartialEq for Ty {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl Ty {
    pub fn new(kind: TyKind, name: impl Into<String>) -> Ty {
        Ty { kind, name: name.into() }
    }

    pub fn none() -> Ty {
        Ty::new(TyKind::None, "none")
    }

    pub fn void() -> Ty {
        Ty::new(TyKind::Void, "void")
    }

    pub fn null() -> Ty {
        Ty::new(TyKind::Null, "null")
    }

    pub fn bool() -> Ty {
        Ty::new(TyKind::Bool, "bool")
    }

    pub fn i64() -> Ty {
        Ty::new(TyKind::I64, "i64")
    }

    pub fn f64() -> Ty {
        Ty::new(TyKind::F64, "f64")
    }

    pub fn str() -> Ty {
        Ty::new(TyKind::Str, "str")
    }

    pub fn char() -> Ty {
        Ty::new(TyKind::Char, "char")
    }

    /// An array type over `element`; the name is `"array"` plus the element
    /// name.
    pub fn array_of(element: &Ty) -> Ty {
        Ty::new(TyKind::Array, format!("array{}", element.name))
    }

    /// The fixed primitive table, shared by every scope.
    pub fn primitives() -> Vec<Ty> {
        use TyKind::*;
        [
            (None, "none"),
            (Void, "void"),
            (Null, "null"),
            (Bool, "bool"),
            (I8, "i8"),
            (I16, "i16"),
            (I32, "i32"),
            (I64, "i64"),
            (I128, "i128"),
            (U8, "u8"),
            (U16, "u16"),
            (U32, "u32"),
            (U64, "u64"),
            (U128, "u128"),
            (F16, "f16"),
            (F32, "f32"),
            (F64, "f64"),
            (F128, "f128"),
            (Str, "str"),
            (Char, "char"),
        ]
        .into_iter()
        .map(|(kind, name)| Ty::new(kind, name))
        .collect()
    }

    // ── Width and category queries ─────────────────────────────────────

    /// Byte width. Numerics are sized by their suffix, `bool`/`char` are one
    /// byte, everything else is zero in this model.
    pub fn size_of(&self) -> u32 {
        use TyKind::*;
        match self.kind {
            Bool | Char | I8 | U8 => 1,
            I16 | U16 | F16 => 2,
            I32 | U32 | F32 => 4,
            I64 | U64 | F64 => 8,
            I128 | U128 | F128 => 16,
            _ => 0,
        }
    }

    pub fn is_integer(&self) -> bool {
        use TyKind::*;
        matches!(
            self.kind,
            I8 | I16 | I32 | I64 | I128 | U8 | U16 | U32 | U64 | U128
        )
    }

    pub fn is_floating_point(&self) -> bool {
        use TyKind::*;
        matches!(self.kind, F16 | F32 | F64 | F128)
    }

    pub fn is_numeric(&self) -> bool {
        self.is_integer() || self.is_floating_point()
    }

    /// Indirectly held types: arrays, classes, records, strings.
    pub fn is_pointer(&self) -> bool {
        use TyKind::*;
        matches!(self.kind, Array | Class | Record | Str)
    }

    /// Whether the type may appear in condition position.
    pub fn is_truthy(&self) -> bool {
        use TyKind::*;
        !matches!(self.kind, None | Void | Null)
    }

    pub fn is_primitive(&self) -> bool {
        self.is_numeric() || matches!(self.kind, TyKind::Bool | TyKind::Char)
    }

    pub fn is_none(&self) -> bool {
        self.kind == TyKind::None
    }

    pub fn is_void(&self) -> bool {
        self.kind == TyKind::Void
    }

    pub fn is_null(&self) -> bool {
        self.kind == TyKind::Null
    }

    /// Kind-level comparison, ignoring names.
    pub fn is_similar_to(&self, other: &Ty) -> bool {
        self.kind == other.kind
    }
}

// ── Promotion and assignability ────────────────────────────────────────

/// The common arithmetic type of a binary operation.
///
/// Matching kinds keep the left type; two floats or two integers widen to
/// the larger width; a float/integer mix promotes to the float; anything
/// else is the `none` type, which downstream checks treat as a type error.
/// Commutative: width ties break on the kind tag, never on operand order.
pub fn promote(a: &Ty, b: &Ty) -> Ty {
    if a.kind == b.kind {
        return a.clone();
    }
    if (a.is_floating_point() && b.is_floating_point()) || (a.is_integer() && b.is_integer()) {
        return wider(a, b).clone();
    }
    if a.is_floating_point() && b.is_integer() {
        return a.clone();
    }
    if b.is_floating_point() && a.is_integer() {
        return b.clone();
    }
    Ty::none()
}

fn wider<'t>(a: &'t Ty, b: &'t Ty) -> &'t Ty {
    match a.size_of().cmp(&b.size_of()) {
        std::cmp::Ordering::Greater => a,
        std::cmp::Ordering::Less => b,
        std::cmp::Ordering::Equal => {
            if a.kind <= b.kind {
                a
            } else {
                b
            }
        }
    }
}

/// Whether a value of type `from` may flow into a binding of type `to`.
///
/// Identical kinds, integer-to-float widening, or integer widening into an
/// equal or wider integer. No narrowing, no float-to-integer.
pub fn can_assign(to: &Ty, from: &Ty) -> bool {
    if to.kind == from.kind {
        return true;
    }
    if to.is_floating_point() && from.is_integer() {
        return true;
    }
    if to.is_integer() && from.is_integer() {
        return from.size_of() <= to.size_of();
    }
    false
}

// ── Semantic entities ──────────────────────────────────────────────────

/// A resolved variable: binding name, value type, visibility, modifiers.
#[derive(Debug, Clone)]
pub struct VarEntity {
    pub name: String,
    pub ty: Ty,
    pub accessor: Accessor,
    pub flags: ModifierFlags,
}

/// A resolved function: signature plus visibility and modifiers.
#[derive(Debug, Clone)]
pub struct FnEntity {
    pub name: String,
    pub ret: Ty,
    pub params: Vec<VarEntity>,
    pub accessor: Accessor,
    pub flags: ModifierFlags,
}

impl FnEntity {
    /// The function viewed as a type.
    pub fn ty(&self) -> Ty {
        Ty::new(TyKind::Function, self.name.clone())
    }
}

/// A record: an ordered list of fields.
#[derive(Debug, Clone)]
pub struct RecordEntity {
    pub name: String,
    pub fields: Vec<VarEntity>,
}

impl RecordEntity {
    pub fn ty(&self) -> Ty {
        Ty::new(TyKind::Record, self.name.clone())
    }

    pub fn field(&self, name: &str) -> Option<&VarEntity> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// A class: fields plus methods.
#[derive(Debug, Clone)]
pub struct ClassEntity {
    pub name: String,
    pub fields: Vec<VarEntity>,
    pub methods: Vec<FnEntity>,
}

impl ClassEntity {
    pub fn ty(&self) -> Ty {
        Ty::new(TyKind::Class, self.name.clone())
    }

    pub fn field(&self, name: &str) -> Option<&VarEntity> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn method(&self, name: &str) -> Option<&FnEntity> {
        self.methods.iter().find(|m| m.name == name)
    }

    /// The constructor, when declared.
    pub fn constructor(&self) -> Option<&FnEntity> {
        self.method("init")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn by_name(name: &str) -> Ty {
        Ty::primitives()
            .into_iter()
            .find(|t| t.name == name)
            .unwrap()
    }

    #[test]
    fn identity_is_by_name() {
        assert_eq!(Ty::i64(), by_name("i64"));
        assert_ne!(Ty::i64(), by_name("u64"));
    }

    #[test]
    fn similarity_is_by_kind() {
        let a = Ty::array_of(&Ty::i64());
        let b = Ty::array_of(&Ty::f64());
        assert_ne!(a, b);
        assert!(a.is_similar_to(&b));
    }

    #[test]
    fn widths_follow_suffixes() {
        assert_eq!(by_name("i8").size_of(), 1);
        assert_eq!(by_name("u16").size_of(), 2);
        assert_eq!(by_name("f32").size_of(), 4);
        assert_eq!(by_name("i128").size_of(), 16);
        assert_eq!(by_name("bool").size_of(), 1);
        assert_eq!(by_name("char").size_of(), 1);
        assert_eq!(by_name("str").size_of(), 0);
        assert_eq!(Ty::none().size_of(), 0);
    }

    #[test]
    fn category_queries() {
        assert!(by_name("u32").is_integer());
        assert!(by_name("f16").is_floating_point());
        assert!(by_name("i8").is_numeric());
        assert!(by_name("str").is_pointer());
        assert!(Ty::array_of(&Ty::i64()).is_pointer());
        assert!(!by_name("bool").is_numeric());
        assert!(by_name("bool").is_primitive());
        assert!(!Ty::none().is_primitive());
    }

    #[test]
    fn truthiness_excludes_none_void_null() {
        assert!(!Ty::none().is_truthy());
        assert!(!Ty::void().is_truthy());
        assert!(!Ty::null().is_truthy());
        assert!(Ty::bool().is_truthy());
        assert!(Ty::str().is_truthy());
        assert!(Ty::array_of(&Ty::i64()).is_truthy());
    }

    #[test]
    fn promote_same_kind() {
        assert_eq!(promote(&Ty::i64(), &Ty::i64()), Ty::i64());
    }

    #[test]
    fn promote_widens_integers() {
        assert_eq!(promote(&by_name("i32"), &by_name("i64")), by_name("i64"));
        assert_eq!(promote(&by_name("u8"), &by_name("u32")), by_name("u32"));
    }

    #[test]
    fn promote_widens_floats() {
        assert_eq!(promote(&by_name("f32"), &by_name("f64")), by_name("f64"));
    }

    #[test]
    fn promote_mixed_picks_the_float() {
        assert_eq!(promote(&by_name("i64"), &by_name("f32")), by_name("f32"));
        assert_eq!(promote(&by_name("f16"), &by_name("i128")), by_name("f16"));
    }

    #[test]
    fn promote_incompatible_is_none() {
        assert!(promote(&Ty::i64(), &Ty::str()).is_none());
        assert!(promote(&Ty::bool(), &Ty::i64()).is_none());
    }

    #[test]
    fn promote_is_commutative() {
        let prims = Ty::primitives();
        for a in &prims {
            for b in &prims {
                assert_eq!(
                    promote(a, b),
                    promote(b, a),
                    "promote not commutative for {} and {}",
                    a,
                    b
                );
            }
        }
    }

    #[test]
    fn can_assign_is_reflexive() {
        for ty in Ty::primitives() {
            assert!(can_assign(&ty, &ty), "not reflexive for {}", ty);
        }
    }

    #[test]
    fn can_assign_widens_integers() {
        assert!(can_assign(&by_name("i64"), &by_name("i32")));
        assert!(!can_assign(&by_name("i32"), &by_name("i64")));
    }

    #[test]
    fn can_assign_int_to_float() {
        assert!(can_assign(&by_name("f64"), &by_name("i64")));
        assert!(!can_assign(&by_name("i64"), &by_name("f64")));
    }

    #[test]
    fn can_assign_rejects_unrelated() {
        assert!(!can_assign(&Ty::i64(), &Ty::str()));
        assert!(!can_assign(&Ty::bool(), &Ty::i64()));
    }

    #[test]
    fn class_entity_lookups() {
        let class = ClassEntity {
            name: "Point".to_string(),
            fields: vec![VarEntity {
                name: "x".to_string(),
                ty: Ty::f64(),
                accessor: Accessor::Public,
                flags: ModifierFlags::empty(),
            }],
            methods: vec![FnEntity {
                name: "init".to_string(),
                ret: Ty::void(),
                params: vec![],
                accessor: Accessor::Public,
                flags: ModifierFlags::empty(),
            }],
        };
        assert!(class.field("x").is_some());
        assert!(class.field("y").is_none());
        assert!(class.constructor().is_some());
        assert_eq!(class.ty().kind, TyKind::Class);
    }
}

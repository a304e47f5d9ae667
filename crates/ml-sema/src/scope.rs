//! Nested named scopes.
//!
//! Scopes live in an arena; the active scope holds its parent by index, and
//! lookups walk the parent chain. A scope's kind is a bit set OR-composed
//! with its parent's kind on entry, so "am I anywhere inside a loop" is a
//! single flag test regardless of intervening blocks.

use rustc_hash::FxHashSet;

use ml_parser::ast::Accessor;

use crate::ty::{ClassEntity, FnEntity, RecordEntity, Ty, VarEntity};

/// Bit set over scope kinds. A scope carries its own kind plus every
/// ancestor kind; this is deliberate, and `has_flag` answers ancestor
/// queries in O(1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScopeKind(u8);

impl ScopeKind {
    pub const GLOBAL: ScopeKind = ScopeKind(1 << 0);
    pub const BLOCK: ScopeKind = ScopeKind(1 << 1);
    pub const FUNCTION: ScopeKind = ScopeKind(1 << 2);
    pub const LOOP: ScopeKind = ScopeKind(1 << 3);
    pub const CLASS: ScopeKind = ScopeKind(1 << 4);
    pub const RECORD: ScopeKind = ScopeKind(1 << 5);

    pub const fn empty() -> ScopeKind {
        ScopeKind(0)
    }

    /// The set holding the flags of both operands.
    pub fn union(&self, other: ScopeKind) -> ScopeKind {
        ScopeKind(self.0 | other.0)
    }

    /// Whether every flag of `other` is set.
    pub fn has_flag(&self, other: ScopeKind) -> bool {
        self.0 & other.0 == other.0
    }
}

/// Index of a scope within the arena.
pub type ScopeId = usize;

/// One lexical scope: a name, a kind set, and the entities declared in it.
#[derive(Debug)]
pub struct Scope {
    pub name: String,
    pub kind: ScopeKind,
    parent: Option<ScopeId>,
    variables: Vec<VarEntity>,
    functions: Vec<FnEntity>,
    classes: Vec<ClassEntity>,
    records: Vec<RecordEntity>,
    /// Names declared directly in this scope, for redeclaration checks.
    declared: FxHashSet<String>,
}

impl Scope {
    fn new(name: String, kind: ScopeKind, parent: Option<ScopeId>) -> Self {
        Self {
            name,
            kind,
            parent,
            variables: Vec::new(),
            functions: Vec::new(),
            classes: Vec::new(),
            records: Vec::new(),
            declared: FxHashSet::default(),
        }
    }
}

/// The scope arena plus the active-scope cursor.
///
/// `enter`/`exit` are strictly LIFO; the analyzer matches every enter with
/// an exit on every control-flow path. Exited scopes stay in the arena but
/// are unreachable from the cursor.
pub struct ScopeStack {
    scopes: Vec<Scope>,
    current: ScopeId,
    primitives: Vec<Ty>,
}

impl ScopeStack {
    /// Create the stack with its global scope already open.
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::new("global".to_string(), ScopeKind::GLOBAL, None)],
            current: 0,
            primitives: Ty::primitives(),
        }
    }

    /// Open a child of the active scope. The child's kind is OR-composed
    /// with its parent's.
    pub fn enter(&mut self, name: impl Into<String>, kind: ScopeKind) {
        let composed = kind.union(self.scopes[self.current].kind);
        let id = self.scopes.len();
        self.scopes
            .push(Scope::new(name.into(), composed, Some(self.current)));
        self.current = id;
    }

    /// Close the active scope, returning to its parent.
    pub fn exit(&mut self) {
        let parent = self.scopes[self.current].parent;
        debug_assert!(parent.is_some(), "cannot exit the global scope");
        if let Some(parent) = parent {
            self.current = parent;
        }
    }

    /// The active scope's composed kind set.
    pub fn current_kind(&self) -> ScopeKind {
        self.scopes[self.current].kind
    }

    /// The active scope's name.
    pub fn current_name(&self) -> &str {
        &self.scopes[self.current].name
    }

    // ── Insertion (append-only) ────────────────────────────────────────

    /// Whether `name` was declared directly in the active scope.
    pub fn declared_in_current(&self, name: &str) -> bool {
        self.scopes[self.current].declared.contains(name)
    }

    pub fn define_variable(&mut self, var: VarEntity) {
        let scope = &mut self.scopes[self.current];
        scope.declared.insert(var.name.clone());
        scope.variables.push(var);
    }

    pub fn define_function(&mut self, func: FnEntity) {
        let scope = &mut self.scopes[self.current];
        scope.declared.insert(func.name.clone());
        scope.functions.push(func);
    }

    pub fn define_class(&mut self, class: ClassEntity) {
        let scope = &mut self.scopes[self.current];
        scope.declared.insert(class.name.clone());
        scope.classes.push(class);
    }

    pub fn define_record(&mut self, record: RecordEntity) {
        let scope = &mut self.scopes[self.current];
        scope.declared.insert(record.name.clone());
        scope.records.push(record);
    }

    // ── Lookup (walks the parent chain) ────────────────────────────────

    pub fn get_variable(&self, name: &str) -> Option<&VarEntity> {
        self.walk(|scope| scope.variables.iter().find(|v| v.name == name))
    }

    pub fn get_function(&self, name: &str) -> Option<&FnEntity> {
        self.walk(|scope| scope.functions.iter().find(|f| f.name == name))
    }

    pub fn get_class(&self, name: &str) -> Option<&ClassEntity> {
        self.walk(|scope| scope.classes.iter().find(|c| c.name == name))
    }

    pub fn get_record(&self, name: &str) -> Option<&RecordEntity> {
        self.walk(|scope| scope.records.iter().find(|r| r.name == name))
    }

    pub fn has_variable(&self, name: &str) -> bool {
        self.get_variable(name).is_some()
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.get_function(name).is_some()
    }

    pub fn has_class(&self, name: &str) -> bool {
        self.get_class(name).is_some()
    }

    pub fn has_record(&self, name: &str) -> bool {
        self.get_record(name).is_some()
    }

    /// Resolve a type name: primitives first, then classes, then records,
    /// walking outward through the parents.
    pub fn get_type(&self, name: &str) -> Option<Ty> {
        if let Some(prim) = self.primitives.iter().find(|t| t.name == name) {
            return Some(prim.clone());
        }
        self.walk(|scope| {
            scope
                .classes
                .iter()
                .find(|c| c.name == name)
                .map(ClassEntity::ty)
                .or_else(|| {
                    scope
                        .records
                        .iter()
                        .find(|r| r.name == name)
                        .map(RecordEntity::ty)
                })
        })
    }

    /// Whether a resolved type may be declared: primitives, Void, Null, and
    /// known class/record names. Arrays are valid once their element
    /// resolved.
    pub fn is_valid_type(&self, ty: &Ty) -> bool {
        use crate::ty::TyKind;
        match ty.kind {
            TyKind::None => false,
            TyKind::Class => self.has_class(&ty.name),
            TyKind::Record => self.has_record(&ty.name),
            _ => true,
        }
    }

    fn walk<'s, T>(&'s self, find: impl Fn(&'s Scope) -> Option<T>) -> Option<T> {
        let mut cursor = Some(self.current);
        while let Some(id) = cursor {
            let scope = &self.scopes[id];
            if let Some(found) = find(scope) {
                return Some(found);
            }
            cursor = scope.parent;
        }
        None
    }
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}

/// Member visibility: Public is always visible, Private only to Private
/// requesters, Protected to Private or Protected.
pub fn can_access(member: Accessor, requester: Accessor) -> bool {
    match member {
        Accessor::Public => true,
        Accessor::Private => requester == Accessor::Private,
        Accessor::Protected => {
            requester == Accessor::Private || requester == Accessor::Protected
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ml_parser::ast::ModifierFlags;

    fn var(name: &str, ty: Ty) -> VarEntity {
        VarEntity {
            name: name.to_string(),
            ty,
            accessor: Accessor::Public,
            flags: ModifierFlags::empty(),
        }
    }

    #[test]
    fn kind_composes_with_parent() {
        let mut scopes = ScopeStack::new();
        scopes.enter("outer", ScopeKind::CLASS);
        scopes.enter("inner", ScopeKind::FUNCTION);
        let kind = scopes.current_kind();
        assert!(kind.has_flag(ScopeKind::GLOBAL));
        assert!(kind.has_flag(ScopeKind::CLASS));
        assert!(kind.has_flag(ScopeKind::FUNCTION));
        assert!(!kind.has_flag(ScopeKind::LOOP));
    }

    #[test]
    fn loop_flag_crosses_blocks() {
        let mut scopes = ScopeStack::new();
        scopes.enter("while", ScopeKind::LOOP);
        scopes.enter("block", ScopeKind::BLOCK);
        assert!(scopes.current_kind().has_flag(ScopeKind::LOOP));
        scopes.exit();
        scopes.exit();
        assert!(!scopes.current_kind().has_flag(ScopeKind::LOOP));
    }

    #[test]
    fn lookup_walks_parents() {
        let mut scopes = ScopeStack::new();
        scopes.define_variable(var("x", Ty::i64()));
        scopes.enter("block", ScopeKind::BLOCK);
        assert!(scopes.has_variable("x"));
        assert_eq!(scopes.get_variable("x").unwrap().ty, Ty::i64());
        scopes.exit();
    }

    #[test]
    fn inner_scope_shadows_outer() {
        let mut scopes = ScopeStack::new();
        scopes.define_variable(var("x", Ty::i64()));
        scopes.enter("block", ScopeKind::BLOCK);
        scopes.define_variable(var("x", Ty::str()));
        assert_eq!(scopes.get_variable("x").unwrap().ty, Ty::str());
        scopes.exit();
        assert_eq!(scopes.get_variable("x").unwrap().ty, Ty::i64());
    }

    #[test]
    fn exited_scope_entities_are_unreachable() {
        let mut scopes = ScopeStack::new();
        scopes.enter("block", ScopeKind::BLOCK);
        scopes.define_variable(var("tmp", Ty::i64()));
        scopes.exit();
        assert!(!scopes.has_variable("tmp"));
    }

    #[test]
    fn primitives_resolve_in_every_scope() {
        let mut scopes = ScopeStack::new();
        for name in ["i64", "bool", "str", "f128", "u8"] {
            assert!(scopes.get_type(name).is_some(), "{} at global", name);
        }
        scopes.enter("f", ScopeKind::FUNCTION);
        scopes.enter("b", ScopeKind::BLOCK);
        for name in ["i64", "bool", "str", "f128", "u8"] {
            assert!(scopes.get_type(name).is_some(), "{} nested", name);
        }
        scopes.exit();
        scopes.exit();
    }

    #[test]
    fn user_types_resolve_after_definition() {
        let mut scopes = ScopeStack::new();
        scopes.define_record(RecordEntity {
            name: "Point".to_string(),
            fields: vec![],
        });
        let ty = scopes.get_type("Point").unwrap();
        assert_eq!(ty.kind, crate::ty::TyKind::Record);
        assert!(scopes.is_valid_type(&ty));
        assert!(!scopes.is_valid_type(&Ty::none()));
    }

    #[test]
    fn redeclaration_is_visible_only_in_current_scope() {
        let mut scopes = ScopeStack::new();
        scopes.define_variable(var("x", Ty::i64()));
        assert!(scopes.declared_in_current("x"));
        scopes.enter("block", ScopeKind::BLOCK);
        assert!(!scopes.declared_in_current("x"));
        scopes.exit();
    }

    #[test]
    fn accessor_rules() {
        use Accessor::*;
        assert!(can_access(Public, Public));
        assert!(can_access(Public, Private));
        assert!(!can_access(Private, Public));
        assert!(!can_access(Private, Protected));
        assert!(can_access(Private, Private));
        assert!(can_access(Protected, Protected));
        assert!(can_access(Protected, Private));
        assert!(!can_access(Protected, Public));
    }
}

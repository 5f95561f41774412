use idb_index::{ElementIndex, FunctionIndex, MakeSeqIndex, TypeIndex};
use idb_ty::{
    AtomicModifiers, AtomicToken, Derivation, EnumValue, ExtensionKind, ExtensionType, WrapKind,
};

use super::{Database, nth};

impl Database {
    /// Types meant to be wrapped, as opposed to merely referenced.
    pub fn number_of_global_types(&self) -> usize {
        self.global_types.len()
    }

    pub fn get_global_type(&self, n: usize) -> Option<TypeIndex> {
        nth(&self.global_types, n)
    }

    /// Every type, wrapped and atomic types included.
    pub fn number_of_types(&self) -> usize {
        self.types.len()
    }

    pub fn get_type(&self, n: usize) -> Option<TypeIndex> {
        (n < self.types.len()).then(|| TypeIndex::from_slot(n))
    }

    pub fn type_by_name(&self, name: &str) -> Option<TypeIndex> {
        self.names.types.get(name).copied()
    }

    pub fn type_by_scoped_name(&self, scoped_name: &str) -> Option<TypeIndex> {
        self.names.types_scoped.get(scoped_name).copied()
    }

    pub fn type_by_true_name(&self, true_name: &str) -> Option<TypeIndex> {
        self.names.types_true.get(true_name).copied()
    }

    pub fn type_name(&self, ty: TypeIndex) -> &str {
        self.type_record(ty)
            .map_or("", |record| record.name.as_str())
    }

    pub fn type_scoped_name(&self, ty: TypeIndex) -> &str {
        self.type_record(ty)
            .map_or("", |record| record.scoped_name.as_str())
    }

    pub fn type_true_name(&self, ty: TypeIndex) -> &str {
        self.type_record(ty)
            .map_or("", |record| record.true_name.as_str())
    }

    pub fn type_has_comment(&self, ty: TypeIndex) -> bool {
        self.type_record(ty)
            .is_some_and(|record| record.comment.is_some())
    }

    pub fn type_comment(&self, ty: TypeIndex) -> &str {
        self.type_record(ty)
            .and_then(|record| record.comment.as_deref())
            .unwrap_or_default()
    }

    pub fn type_has_module_name(&self, ty: TypeIndex) -> bool {
        self.type_record(ty)
            .is_some_and(|record| record.module_name.is_some())
    }

    pub fn type_module_name(&self, ty: TypeIndex) -> &str {
        self.type_record(ty)
            .and_then(|record| record.module_name.as_deref())
            .unwrap_or_default()
    }

    pub fn type_has_library_name(&self, ty: TypeIndex) -> bool {
        self.type_record(ty)
            .is_some_and(|record| record.library_name.is_some())
    }

    pub fn type_library_name(&self, ty: TypeIndex) -> &str {
        self.type_record(ty)
            .and_then(|record| record.library_name.as_deref())
            .unwrap_or_default()
    }

    pub fn type_is_global(&self, ty: TypeIndex) -> bool {
        self.type_record(ty)
            .is_some_and(|record| record.is_global)
    }

    pub fn type_is_nested(&self, ty: TypeIndex) -> bool {
        self.type_outer_class(ty).is_some()
    }

    pub fn type_outer_class(&self, ty: TypeIndex) -> Option<TypeIndex> {
        self.type_record(ty)?.outer_class
    }

    // Atomic types.

    pub fn type_is_atomic(&self, ty: TypeIndex) -> bool {
        self.type_atomic_token(ty).is_some()
    }

    pub fn type_atomic_token(&self, ty: TypeIndex) -> Option<AtomicToken> {
        self.type_record(ty)?
            .atomic_type()
            .map(|atomic| atomic.token)
    }

    fn modifiers(&self, ty: TypeIndex) -> AtomicModifiers {
        self.type_record(ty)
            .and_then(|record| record.atomic_type())
            .map(|atomic| atomic.modifiers)
            .unwrap_or_default()
    }

    pub fn type_is_unsigned(&self, ty: TypeIndex) -> bool {
        self.modifiers(ty).unsigned
    }

    pub fn type_is_signed(&self, ty: TypeIndex) -> bool {
        self.modifiers(ty).signed
    }

    pub fn type_is_long(&self, ty: TypeIndex) -> bool {
        self.modifiers(ty).long
    }

    pub fn type_is_longlong(&self, ty: TypeIndex) -> bool {
        self.modifiers(ty).longlong
    }

    pub fn type_is_short(&self, ty: TypeIndex) -> bool {
        self.modifiers(ty).short
    }

    // Wrapped types. Each level is exactly one of pointer, const or typedef.

    fn wrap_kind(&self, ty: TypeIndex) -> Option<WrapKind> {
        self.type_record(ty)?
            .wrapped_type()
            .map(|wrapped| wrapped.kind)
    }

    pub fn type_is_wrapped(&self, ty: TypeIndex) -> bool {
        self.wrap_kind(ty).is_some()
    }

    pub fn type_is_pointer(&self, ty: TypeIndex) -> bool {
        self.wrap_kind(ty) == Some(WrapKind::Pointer)
    }

    pub fn type_is_const(&self, ty: TypeIndex) -> bool {
        self.wrap_kind(ty) == Some(WrapKind::Const)
    }

    pub fn type_is_typedef(&self, ty: TypeIndex) -> bool {
        self.wrap_kind(ty) == Some(WrapKind::Typedef)
    }

    /// The type one wrap level down.
    pub fn type_wrapped_type(&self, ty: TypeIndex) -> Option<TypeIndex> {
        self.type_record(ty)?
            .wrapped_type()
            .map(|wrapped| wrapped.wrapped)
    }

    // Arrays.

    pub fn type_is_array(&self, ty: TypeIndex) -> bool {
        self.type_record(ty)
            .is_some_and(|record| record.array_type().is_some())
    }

    pub fn type_array_element(&self, ty: TypeIndex) -> Option<TypeIndex> {
        self.type_record(ty)?
            .array_type()
            .map(|array| array.element)
    }

    pub fn type_array_size(&self, ty: TypeIndex) -> Option<u32> {
        self.type_record(ty)?
            .array_type()
            .map(|array| array.size)
    }

    // Enums.

    fn enum_value(&self, ty: TypeIndex, n: usize) -> Option<&EnumValue> {
        self.type_record(ty)?.enum_type()?.values.get(n)
    }

    pub fn type_is_enum(&self, ty: TypeIndex) -> bool {
        self.type_record(ty)
            .is_some_and(|record| record.enum_type().is_some())
    }

    pub fn type_is_scoped_enum(&self, ty: TypeIndex) -> bool {
        self.type_record(ty)
            .and_then(|record| record.enum_type())
            .is_some_and(|enumeration| enumeration.scoped)
    }

    pub fn type_number_of_enum_values(&self, ty: TypeIndex) -> usize {
        self.type_record(ty)
            .and_then(|record| record.enum_type())
            .map_or(0, |enumeration| enumeration.values.len())
    }

    pub fn type_enum_value_name(&self, ty: TypeIndex, n: usize) -> &str {
        self.enum_value(ty, n)
            .map_or("", |value| value.name.as_str())
    }

    pub fn type_enum_value_scoped_name(&self, ty: TypeIndex, n: usize) -> &str {
        self.enum_value(ty, n)
            .map_or("", |value| value.scoped_name.as_str())
    }

    pub fn type_enum_value_has_comment(&self, ty: TypeIndex, n: usize) -> bool {
        self.enum_value(ty, n)
            .is_some_and(|value| value.comment.is_some())
    }

    pub fn type_enum_value_comment(&self, ty: TypeIndex, n: usize) -> &str {
        self.enum_value(ty, n)
            .and_then(|value| value.comment.as_deref())
            .unwrap_or_default()
    }

    pub fn type_enum_value(&self, ty: TypeIndex, n: usize) -> Option<i64> {
        self.enum_value(ty, n).map(|value| value.value)
    }

    // Structs, classes and unions.

    fn extension_kind(&self, ty: TypeIndex) -> Option<ExtensionKind> {
        self.type_record(ty)?
            .extension_type()
            .map(|extension| extension.kind)
    }

    /// Member lists of a fully defined, published extension type.
    fn members_of(&self, ty: TypeIndex) -> Option<&ExtensionType> {
        self.type_record(ty)?.members()
    }

    pub fn type_is_struct(&self, ty: TypeIndex) -> bool {
        self.extension_kind(ty) == Some(ExtensionKind::Struct)
    }

    pub fn type_is_class(&self, ty: TypeIndex) -> bool {
        self.extension_kind(ty) == Some(ExtensionKind::Class)
    }

    pub fn type_is_union(&self, ty: TypeIndex) -> bool {
        self.extension_kind(ty) == Some(ExtensionKind::Union)
    }

    /// False only for forward declarations (and unknown handles).
    pub fn type_is_fully_defined(&self, ty: TypeIndex) -> bool {
        self.type_record(ty)
            .is_some_and(|record| !record.is_forward_declaration())
    }

    pub fn type_is_unpublished(&self, ty: TypeIndex) -> bool {
        self.type_record(ty)
            .and_then(|record| record.extension_type())
            .is_some_and(|extension| extension.unpublished)
    }

    pub fn type_is_final(&self, ty: TypeIndex) -> bool {
        self.type_record(ty)
            .and_then(|record| record.extension_type())
            .is_some_and(|extension| extension.is_final)
    }

    pub fn type_number_of_constructors(&self, ty: TypeIndex) -> usize {
        self.members_of(ty)
            .map_or(0, |extension| extension.constructors.len())
    }

    pub fn type_get_constructor(&self, ty: TypeIndex, n: usize) -> Option<FunctionIndex> {
        nth(&self.members_of(ty)?.constructors, n)
    }

    pub fn type_has_destructor(&self, ty: TypeIndex) -> bool {
        self.type_get_destructor(ty).is_some()
    }

    /// The destructor is the very function an ancestor declares.
    pub fn type_destructor_is_inherited(&self, ty: TypeIndex) -> bool {
        self.members_of(ty)
            .is_some_and(|extension| extension.destructor.is_some() && extension.destructor_inherited)
    }

    pub fn type_get_destructor(&self, ty: TypeIndex) -> Option<FunctionIndex> {
        self.members_of(ty)?.destructor
    }

    pub fn type_number_of_methods(&self, ty: TypeIndex) -> usize {
        self.members_of(ty)
            .map_or(0, |extension| extension.methods.len())
    }

    pub fn type_get_method(&self, ty: TypeIndex, n: usize) -> Option<FunctionIndex> {
        nth(&self.members_of(ty)?.methods, n)
    }

    /// Type-conversion operators declared by the type.
    pub fn type_number_of_casts(&self, ty: TypeIndex) -> usize {
        self.members_of(ty)
            .map_or(0, |extension| extension.casts.len())
    }

    pub fn type_get_cast(&self, ty: TypeIndex, n: usize) -> Option<FunctionIndex> {
        nth(&self.members_of(ty)?.casts, n)
    }

    pub fn type_number_of_elements(&self, ty: TypeIndex) -> usize {
        self.members_of(ty)
            .map_or(0, |extension| extension.elements.len())
    }

    pub fn type_get_element(&self, ty: TypeIndex, n: usize) -> Option<ElementIndex> {
        nth(&self.members_of(ty)?.elements, n)
    }

    pub fn type_number_of_make_seqs(&self, ty: TypeIndex) -> usize {
        self.members_of(ty)
            .map_or(0, |extension| extension.make_seqs.len())
    }

    pub fn type_get_make_seq(&self, ty: TypeIndex, n: usize) -> Option<MakeSeqIndex> {
        nth(&self.members_of(ty)?.make_seqs, n)
    }

    pub fn type_number_of_nested_types(&self, ty: TypeIndex) -> usize {
        self.type_record(ty)
            .and_then(|record| record.extension_type())
            .map_or(0, |extension| extension.nested_types.len())
    }

    pub fn type_get_nested_type(&self, ty: TypeIndex, n: usize) -> Option<TypeIndex> {
        nth(&self.type_record(ty)?.extension_type()?.nested_types, n)
    }

    // Direct base classes, in declaration order.

    fn nth_derivation(&self, ty: TypeIndex, n: usize) -> Option<&Derivation> {
        self.bases(ty).get(n)
    }

    pub fn type_number_of_derivations(&self, ty: TypeIndex) -> usize {
        self.bases(ty).len()
    }

    pub fn type_get_derivation(&self, ty: TypeIndex, n: usize) -> Option<TypeIndex> {
        self.nth_derivation(ty, n)
            .map(|derivation| derivation.base)
    }

    /// Without an upcast function the base pointer equals the derived one.
    pub fn derivation_has_upcast(&self, ty: TypeIndex, n: usize) -> bool {
        self.nth_derivation(ty, n)
            .is_some_and(Derivation::has_upcast)
    }

    pub fn derivation_get_upcast(&self, ty: TypeIndex, n: usize) -> Option<FunctionIndex> {
        self.nth_derivation(ty, n)?.upcast_function()
    }

    pub fn derivation_downcast_is_impossible(&self, ty: TypeIndex, n: usize) -> bool {
        self.nth_derivation(ty, n)
            .is_some_and(Derivation::downcast_is_impossible)
    }

    pub fn derivation_has_downcast(&self, ty: TypeIndex, n: usize) -> bool {
        self.nth_derivation(ty, n)
            .is_some_and(Derivation::has_downcast)
    }

    pub fn derivation_get_downcast(&self, ty: TypeIndex, n: usize) -> Option<FunctionIndex> {
        self.nth_derivation(ty, n)?.downcast_function()
    }
}

//! Record model of the interface database.
//!
//! Every record is plain data produced once by the extraction step and read
//! afterwards. Handles stored in a record point into the same database (or,
//! inside a [`artifact::ModuleArtifact`], into the same module).

pub mod artifact;
pub mod element;
pub mod function;
pub mod make_seq;
pub mod manifest;

use idb_index::{ElementIndex, FunctionIndex, MakeSeqIndex, TypeIndex};
use serde::{Deserialize, Serialize};

pub use crate::artifact::{FORMAT_VERSION, ModuleArtifact};
pub use crate::element::ElementRecord;
pub use crate::function::{
    Convention, DEFAULT_CONVENTION, FunctionFlags, FunctionRecord, PYTHON_CONVENTION, Parameter,
    ReturnOwnership, WrapperRecord,
};
pub use crate::make_seq::MakeSeqRecord;
pub use crate::manifest::{ManifestRecord, ManifestValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AtomicToken {
    Int,
    Float,
    Double,
    Bool,
    Char,
    Void,
    /// The native string representation of the calling convention.
    String,
    LongLong,
    /// The absence of any value.
    Null,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct AtomicModifiers {
    pub unsigned: bool,
    pub signed: bool,
    pub long: bool,
    pub longlong: bool,
    pub short: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AtomicType {
    pub token: AtomicToken,
    #[serde(default)]
    pub modifiers: AtomicModifiers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WrapKind {
    Pointer,
    Const,
    Typedef,
}

/// One qualifier level. `const T *` is a pointer wrapping a const wrapping `T`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WrappedType {
    pub kind: WrapKind,
    pub wrapped: TypeIndex,
}

/// A single fixed extent; `int[2][3]` is an array of arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArrayType {
    pub element: TypeIndex,
    pub size: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumValue {
    pub name: String,
    pub scoped_name: String,
    #[serde(default)]
    pub comment: Option<String>,
    pub value: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumType {
    #[serde(default)]
    pub scoped: bool,
    #[serde(default)]
    pub values: Vec<EnumValue>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtensionKind {
    Struct,
    Class,
    Union,
}

/// How a derived pointer becomes a base pointer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Upcast {
    /// Both pointers are bit-identical.
    #[default]
    Identity,
    Function(FunctionIndex),
}

/// How a base pointer becomes a derived pointer, if it can at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Downcast {
    /// No conversion exists, whatever the runtime type (virtual inheritance).
    Impossible,
    #[default]
    Identity,
    Function(FunctionIndex),
}

/// A direct base-class edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Derivation {
    pub base: TypeIndex,
    #[serde(default)]
    pub upcast: Upcast,
    #[serde(default)]
    pub downcast: Downcast,
}

impl Derivation {
    pub fn new(base: TypeIndex) -> Self {
        Self {
            base,
            upcast: Upcast::Identity,
            downcast: Downcast::Identity,
        }
    }

    #[inline]
    pub fn has_upcast(&self) -> bool {
        matches!(self.upcast, Upcast::Function(_))
    }

    #[inline]
    pub fn upcast_function(&self) -> Option<FunctionIndex> {
        match self.upcast {
            Upcast::Function(function) => Some(function),
            Upcast::Identity => None,
        }
    }

    #[inline]
    pub fn downcast_is_impossible(&self) -> bool {
        matches!(self.downcast, Downcast::Impossible)
    }

    #[inline]
    pub fn has_downcast(&self) -> bool {
        matches!(self.downcast, Downcast::Function(_))
    }

    #[inline]
    pub fn downcast_function(&self) -> Option<FunctionIndex> {
        match self.downcast {
            Downcast::Function(function) => Some(function),
            Downcast::Impossible | Downcast::Identity => None,
        }
    }
}

/// A struct, class or union.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionType {
    pub kind: ExtensionKind,
    #[serde(default = "default_true")]
    pub fully_defined: bool,
    #[serde(default)]
    pub unpublished: bool,
    #[serde(default)]
    pub is_final: bool,
    #[serde(default)]
    pub constructors: Vec<FunctionIndex>,
    #[serde(default)]
    pub destructor: Option<FunctionIndex>,
    #[serde(default)]
    pub destructor_inherited: bool,
    #[serde(default)]
    pub methods: Vec<FunctionIndex>,
    /// Type-conversion operators.
    #[serde(default)]
    pub casts: Vec<FunctionIndex>,
    #[serde(default)]
    pub elements: Vec<ElementIndex>,
    #[serde(default)]
    pub make_seqs: Vec<MakeSeqIndex>,
    #[serde(default)]
    pub derivations: Vec<Derivation>,
    #[serde(default)]
    pub nested_types: Vec<TypeIndex>,
}

const fn default_true() -> bool {
    true
}

impl ExtensionType {
    pub fn new(kind: ExtensionKind) -> Self {
        Self {
            kind,
            fully_defined: true,
            unpublished: false,
            is_final: false,
            constructors: Vec::new(),
            destructor: None,
            destructor_inherited: false,
            methods: Vec::new(),
            casts: Vec::new(),
            elements: Vec::new(),
            make_seqs: Vec::new(),
            derivations: Vec::new(),
            nested_types: Vec::new(),
        }
    }

    pub fn forward_declared(kind: ExtensionKind) -> Self {
        Self {
            fully_defined: false,
            ..Self::new(kind)
        }
    }

    /// Forward declarations and unpublished types expose no members.
    #[inline]
    pub fn has_visible_members(&self) -> bool {
        self.fully_defined && !self.unpublished
    }

    pub fn has_members(&self) -> bool {
        !(self.constructors.is_empty()
            && self.destructor.is_none()
            && self.methods.is_empty()
            && self.casts.is_empty()
            && self.elements.is_empty()
            && self.make_seqs.is_empty())
    }

    /// Drops every member list, keeping the shape and derivations.
    pub fn clear_members(&mut self) {
        self.constructors.clear();
        self.destructor = None;
        self.destructor_inherited = false;
        self.methods.clear();
        self.casts.clear();
        self.elements.clear();
        self.make_seqs.clear();
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum TypeShape {
    Atomic(AtomicType),
    Wrapped(WrappedType),
    Array(ArrayType),
    Enum(EnumType),
    Extension(ExtensionType),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeRecord {
    pub name: String,
    pub scoped_name: String,
    /// Canonical spelling, unique across the database.
    pub true_name: String,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub module_name: Option<String>,
    #[serde(default)]
    pub library_name: Option<String>,
    #[serde(default)]
    pub outer_class: Option<TypeIndex>,
    /// Whether the type is meant to be wrapped, as opposed to merely referenced.
    #[serde(default)]
    pub is_global: bool,
    #[serde(flatten)]
    pub shape: TypeShape,
}

impl TypeRecord {
    pub fn new(name: impl Into<String>, shape: TypeShape) -> Self {
        let name = name.into();
        Self {
            scoped_name: name.clone(),
            true_name: name.clone(),
            name,
            comment: None,
            module_name: None,
            library_name: None,
            outer_class: None,
            is_global: false,
            shape,
        }
    }

    pub fn atomic(name: impl Into<String>, token: AtomicToken) -> Self {
        Self::new(
            name,
            TypeShape::Atomic(AtomicType {
                token,
                modifiers: AtomicModifiers::default(),
            }),
        )
    }

    pub fn wrapped(name: impl Into<String>, kind: WrapKind, wrapped: TypeIndex) -> Self {
        Self::new(name, TypeShape::Wrapped(WrappedType { kind, wrapped }))
    }

    pub fn array(name: impl Into<String>, element: TypeIndex, size: u32) -> Self {
        Self::new(name, TypeShape::Array(ArrayType { element, size }))
    }

    pub fn extension(name: impl Into<String>, kind: ExtensionKind) -> Self {
        let mut record = Self::new(name, TypeShape::Extension(ExtensionType::new(kind)));
        record.is_global = true;
        record
    }

    pub fn with_scoped_name(mut self, scoped_name: impl Into<String>) -> Self {
        self.scoped_name = scoped_name.into();
        self
    }

    pub fn with_true_name(mut self, true_name: impl Into<String>) -> Self {
        self.true_name = true_name.into();
        self
    }

    #[inline]
    pub fn atomic_type(&self) -> Option<&AtomicType> {
        match &self.shape {
            TypeShape::Atomic(atomic) => Some(atomic),
            _ => None,
        }
    }

    #[inline]
    pub fn wrapped_type(&self) -> Option<&WrappedType> {
        match &self.shape {
            TypeShape::Wrapped(wrapped) => Some(wrapped),
            _ => None,
        }
    }

    #[inline]
    pub fn array_type(&self) -> Option<&ArrayType> {
        match &self.shape {
            TypeShape::Array(array) => Some(array),
            _ => None,
        }
    }

    #[inline]
    pub fn enum_type(&self) -> Option<&EnumType> {
        match &self.shape {
            TypeShape::Enum(enumeration) => Some(enumeration),
            _ => None,
        }
    }

    #[inline]
    pub fn extension_type(&self) -> Option<&ExtensionType> {
        match &self.shape {
            TypeShape::Extension(extension) => Some(extension),
            _ => None,
        }
    }

    #[inline]
    pub fn extension_type_mut(&mut self) -> Option<&mut ExtensionType> {
        match &mut self.shape {
            TypeShape::Extension(extension) => Some(extension),
            _ => None,
        }
    }

    /// Member lists, or `None` for non-extensions, forward declarations and
    /// unpublished types.
    #[inline]
    pub fn members(&self) -> Option<&ExtensionType> {
        self.extension_type()
            .filter(|extension| extension.has_visible_members())
    }

    /// A forward declaration may be replaced by a later full definition.
    pub fn is_forward_declaration(&self) -> bool {
        self.extension_type()
            .is_some_and(|extension| !extension.fully_defined)
    }
}

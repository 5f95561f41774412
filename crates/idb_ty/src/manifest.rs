use idb_index::{FunctionIndex, TypeIndex};
use serde::{Deserialize, Serialize};

/// How a manifest constant's typed value is obtained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ManifestValue {
    /// Only the textual definition is known.
    #[default]
    Literal,
    /// Inlined integer; no getter is generated.
    Int {
        #[serde(default)]
        ty: Option<TypeIndex>,
        value: i64,
    },
    /// Receiver-less, zero-argument getter returning a value of `ty`.
    Getter { ty: TypeIndex, getter: FunctionIndex },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestRecord {
    pub name: String,
    pub definition: String,
    #[serde(default)]
    pub value: ManifestValue,
}

impl ManifestRecord {
    pub fn literal(name: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            definition: definition.into(),
            value: ManifestValue::Literal,
        }
    }

    pub fn int(name: impl Into<String>, value: i64, ty: Option<TypeIndex>) -> Self {
        Self {
            name: name.into(),
            definition: value.to_string(),
            value: ManifestValue::Int { ty, value },
        }
    }

    #[inline]
    pub fn ty(&self) -> Option<TypeIndex> {
        match self.value {
            ManifestValue::Int { ty, .. } => ty,
            ManifestValue::Getter { ty, .. } => Some(ty),
            ManifestValue::Literal => None,
        }
    }

    #[inline]
    pub fn getter(&self) -> Option<FunctionIndex> {
        match self.value {
            ManifestValue::Getter { getter, .. } => Some(getter),
            ManifestValue::Literal | ManifestValue::Int { .. } => None,
        }
    }

    #[inline]
    pub fn int_value(&self) -> Option<i64> {
        match self.value {
            ManifestValue::Int { value, .. } => Some(value),
            ManifestValue::Literal | ManifestValue::Getter { .. } => None,
        }
    }
}

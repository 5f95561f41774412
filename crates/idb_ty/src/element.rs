use idb_index::{FunctionIndex, TypeIndex};
use serde::{Deserialize, Serialize};

/// A data member, or a global variable when `owner` is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementRecord {
    pub name: String,
    pub scoped_name: String,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub owner: Option<TypeIndex>,
    pub ty: TypeIndex,
    #[serde(default)]
    pub getter: Option<FunctionIndex>,
    #[serde(default)]
    pub setter: Option<FunctionIndex>,
    #[serde(default)]
    pub is_sequence: bool,
    #[serde(default)]
    pub is_mapping: bool,
}

impl ElementRecord {
    pub fn new(name: impl Into<String>, scoped_name: impl Into<String>, ty: TypeIndex) -> Self {
        Self {
            name: name.into(),
            scoped_name: scoped_name.into(),
            comment: None,
            owner: None,
            ty,
            getter: None,
            setter: None,
            is_sequence: false,
            is_mapping: false,
        }
    }

    #[inline]
    pub fn is_global(&self) -> bool {
        self.owner.is_none()
    }

    #[inline]
    pub fn is_read_only(&self) -> bool {
        self.setter.is_none()
    }
}

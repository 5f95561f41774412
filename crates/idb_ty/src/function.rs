use idb_index::{FunctionIndex, TypeIndex, WrapperIndex};
use serde::{Deserialize, Serialize};

/// Calling convention every function carries wrappers for.
pub const DEFAULT_CONVENTION: &str = "c";
pub const PYTHON_CONVENTION: &str = "python";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct FunctionFlags {
    pub is_virtual: bool,
    pub is_constructor: bool,
    pub is_destructor: bool,
    pub is_unary_op: bool,
    pub is_operator_typecast: bool,
}

/// The wrappers generated for one calling convention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Convention {
    pub name: String,
    #[serde(default)]
    pub wrappers: Vec<WrapperIndex>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionRecord {
    pub name: String,
    pub scoped_name: String,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub prototype: Option<String>,
    #[serde(default)]
    pub module_name: Option<String>,
    #[serde(default)]
    pub library_name: Option<String>,
    /// Owning type of a method.
    #[serde(default)]
    pub class: Option<TypeIndex>,
    #[serde(default)]
    pub flags: FunctionFlags,
    #[serde(default)]
    pub conventions: Vec<Convention>,
}

impl FunctionRecord {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            scoped_name: name.clone(),
            name,
            comment: None,
            prototype: None,
            module_name: None,
            library_name: None,
            class: None,
            flags: FunctionFlags::default(),
            conventions: Vec::new(),
        }
    }

    pub fn method(name: impl Into<String>, scoped_name: impl Into<String>, class: TypeIndex) -> Self {
        Self {
            scoped_name: scoped_name.into(),
            class: Some(class),
            ..Self::new(name)
        }
    }

    #[inline]
    pub fn is_method(&self) -> bool {
        self.class.is_some()
    }

    pub fn convention(&self, name: &str) -> Option<&Convention> {
        self.conventions
            .iter()
            .find(|convention| convention.name == name)
    }

    /// Wrappers for `convention`, empty when the function has none.
    pub fn wrappers(&self, convention: &str) -> &[WrapperIndex] {
        self.convention(convention)
            .map(|convention| convention.wrappers.as_slice())
            .unwrap_or_default()
    }

    pub fn push_wrapper(&mut self, convention: &str, wrapper: WrapperIndex) {
        if let Some(existing) = self
            .conventions
            .iter_mut()
            .find(|existing| existing.name == convention)
        {
            existing.wrappers.push(wrapper);
        } else {
            self.conventions.push(Convention {
                name: convention.to_owned(),
                wrappers: vec![wrapper],
            });
        }
    }

    pub fn all_wrappers(&self) -> impl Iterator<Item = WrapperIndex> + '_ {
        self.conventions
            .iter()
            .flat_map(|convention| convention.wrappers.iter().copied())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub ty: TypeIndex,
    #[serde(default)]
    pub name: Option<String>,
    /// The implicit receiver (`this`).
    #[serde(default)]
    pub is_receiver: bool,
    /// Has a default value and may be left out.
    #[serde(default)]
    pub is_optional: bool,
}

impl Parameter {
    pub fn new(ty: TypeIndex, name: impl Into<String>) -> Self {
        Self {
            ty,
            name: Some(name.into()),
            is_receiver: false,
            is_optional: false,
        }
    }

    pub fn receiver(ty: TypeIndex) -> Self {
        Self {
            ty,
            name: Some("this".to_owned()),
            is_receiver: true,
            is_optional: false,
        }
    }
}

/// Who releases the value a wrapper returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReturnOwnership {
    /// Aliased or borrowed; the caller must never destroy it.
    #[default]
    Borrowed,
    /// Freshly allocated or reference-counted on the caller's behalf; the
    /// caller invokes `destructor` on it exactly once.
    CallerManaged { destructor: FunctionIndex },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrapperRecord {
    pub name: String,
    #[serde(default)]
    pub unique_name: String,
    #[serde(default)]
    pub comment: Option<String>,
    /// Exported under `name`, so it can be looked up in the library directly.
    #[serde(default)]
    pub callable_by_name: bool,
    pub function: FunctionIndex,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub return_type: Option<TypeIndex>,
    #[serde(default)]
    pub return_ownership: ReturnOwnership,
}

impl WrapperRecord {
    pub fn new(name: impl Into<String>, function: FunctionIndex) -> Self {
        Self {
            name: name.into(),
            unique_name: String::new(),
            comment: None,
            callable_by_name: false,
            function,
            parameters: Vec::new(),
            return_type: None,
            return_ownership: ReturnOwnership::Borrowed,
        }
    }

    #[inline]
    pub fn caller_manages_return_value(&self) -> bool {
        matches!(self.return_ownership, ReturnOwnership::CallerManaged { .. })
    }

    #[inline]
    pub fn return_value_destructor(&self) -> Option<FunctionIndex> {
        match self.return_ownership {
            ReturnOwnership::CallerManaged { destructor } => Some(destructor),
            ReturnOwnership::Borrowed => None,
        }
    }

    pub fn receiver(&self) -> Option<&Parameter> {
        self.parameters.first().filter(|param| param.is_receiver)
    }

    /// The receiver appears at most once, and only in first position.
    pub fn receiver_is_well_formed(&self) -> bool {
        self.parameters
            .iter()
            .enumerate()
            .all(|(position, param)| !param.is_receiver || position == 0)
    }

    /// Signature text used when hashing unique names, with types spelled by
    /// `type_name`.
    pub fn signature(&self, type_name: impl Fn(TypeIndex) -> String) -> String {
        let params = self
            .parameters
            .iter()
            .map(|param| {
                let marker = if param.is_receiver { "this " } else { "" };
                let optional = if param.is_optional { " = default" } else { "" };
                format!("{marker}{}{optional}", type_name(param.ty))
            })
            .collect::<Vec<_>>()
            .join(", ");
        let result = self
            .return_type
            .map_or_else(|| "void".to_owned(), &type_name);
        format!("({params}) -> {result}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conventions_are_named_sets() {
        let mut function = FunctionRecord::new("area");
        function.push_wrapper(DEFAULT_CONVENTION, WrapperIndex::from_raw(1));
        function.push_wrapper(PYTHON_CONVENTION, WrapperIndex::from_raw(2));
        function.push_wrapper(DEFAULT_CONVENTION, WrapperIndex::from_raw(3));

        assert_eq!(function.conventions.len(), 2);
        assert_eq!(
            function.wrappers(DEFAULT_CONVENTION),
            &[WrapperIndex::from_raw(1), WrapperIndex::from_raw(3)]
        );
        assert!(function.wrappers("fastcall").is_empty());
        assert_eq!(function.all_wrappers().count(), 3);
    }

    #[test]
    fn receiver_must_come_first() {
        let class = TypeIndex::from_raw(4);
        let mut wrapper = WrapperRecord::new("Point_set_x", FunctionIndex::from_raw(1));
        wrapper.parameters = vec![Parameter::receiver(class), Parameter::new(class, "x")];
        assert!(wrapper.receiver_is_well_formed());
        assert!(wrapper.receiver().is_some());

        wrapper.parameters.reverse();
        assert!(!wrapper.receiver_is_well_formed());
        assert!(wrapper.receiver().is_none());
    }

    #[test]
    fn destructor_only_when_caller_manages() {
        let mut wrapper = WrapperRecord::new("make_point", FunctionIndex::from_raw(1));
        assert!(!wrapper.caller_manages_return_value());
        assert_eq!(wrapper.return_value_destructor(), None);

        wrapper.return_ownership = ReturnOwnership::CallerManaged {
            destructor: FunctionIndex::from_raw(2),
        };
        assert!(wrapper.caller_manages_return_value());
        assert_eq!(wrapper.return_value_destructor(), Some(FunctionIndex::from_raw(2)));
    }

    #[test]
    fn signature_spells_types_by_name() {
        let mut wrapper = WrapperRecord::new("Point_set_x", FunctionIndex::from_raw(1));
        wrapper.parameters = vec![
            Parameter::receiver(TypeIndex::from_raw(1)),
            Parameter::new(TypeIndex::from_raw(2), "x"),
        ];
        let signature = wrapper.signature(|ty| format!("t{}", ty.raw()));
        assert_eq!(signature, "(this t1, t2) -> void");
    }
}

use idb_index::{FunctionIndex, TypeIndex, WrapperIndex};
use idb_ty::Parameter;

use super::Database;

impl Database {
    fn parameter(&self, wrapper: WrapperIndex, n: usize) -> Option<&Parameter> {
        self.wrapper(wrapper)?.parameters.get(n)
    }

    pub fn wrapper_name(&self, wrapper: WrapperIndex) -> &str {
        self.wrapper(wrapper)
            .map_or("", |record| record.name.as_str())
    }

    /// Hashed name stable across sessions, usable with
    /// [`Database::wrapper_by_unique_name`].
    pub fn wrapper_unique_name(&self, wrapper: WrapperIndex) -> &str {
        self.wrapper(wrapper)
            .map_or("", |record| record.unique_name.as_str())
    }

    pub fn wrapper_by_unique_name(&self, unique_name: &str) -> Option<WrapperIndex> {
        self.names.wrappers.get(unique_name).copied()
    }

    pub fn wrapper_is_callable_by_name(&self, wrapper: WrapperIndex) -> bool {
        self.wrapper(wrapper)
            .is_some_and(|record| record.callable_by_name)
    }

    pub fn wrapper_has_comment(&self, wrapper: WrapperIndex) -> bool {
        self.wrapper(wrapper)
            .is_some_and(|record| record.comment.is_some())
    }

    pub fn wrapper_comment(&self, wrapper: WrapperIndex) -> &str {
        self.wrapper(wrapper)
            .and_then(|record| record.comment.as_deref())
            .unwrap_or_default()
    }

    pub fn wrapper_function(&self, wrapper: WrapperIndex) -> Option<FunctionIndex> {
        self.wrapper(wrapper).map(|record| record.function)
    }

    pub fn wrapper_has_return_value(&self, wrapper: WrapperIndex) -> bool {
        self.wrapper_return_type(wrapper).is_some()
    }

    pub fn wrapper_return_type(&self, wrapper: WrapperIndex) -> Option<TypeIndex> {
        self.wrapper(wrapper)?.return_type
    }

    /// When true the caller owns the returned value and must release it
    /// exactly once through [`Database::wrapper_return_value_destructor`].
    pub fn wrapper_caller_manages_return_value(&self, wrapper: WrapperIndex) -> bool {
        self.wrapper(wrapper)
            .is_some_and(|record| record.caller_manages_return_value())
    }

    pub fn wrapper_return_value_destructor(&self, wrapper: WrapperIndex) -> Option<FunctionIndex> {
        self.wrapper(wrapper)?.return_value_destructor()
    }

    pub fn wrapper_number_of_parameters(&self, wrapper: WrapperIndex) -> usize {
        self.wrapper(wrapper)
            .map_or(0, |record| record.parameters.len())
    }

    pub fn wrapper_parameter_type(&self, wrapper: WrapperIndex, n: usize) -> Option<TypeIndex> {
        self.parameter(wrapper, n).map(|param| param.ty)
    }

    pub fn wrapper_parameter_has_name(&self, wrapper: WrapperIndex, n: usize) -> bool {
        self.parameter(wrapper, n)
            .is_some_and(|param| param.name.is_some())
    }

    pub fn wrapper_parameter_name(&self, wrapper: WrapperIndex, n: usize) -> &str {
        self.parameter(wrapper, n)
            .and_then(|param| param.name.as_deref())
            .unwrap_or_default()
    }

    pub fn wrapper_parameter_is_this(&self, wrapper: WrapperIndex, n: usize) -> bool {
        self.parameter(wrapper, n)
            .is_some_and(|param| param.is_receiver)
    }

    pub fn wrapper_parameter_is_optional(&self, wrapper: WrapperIndex, n: usize) -> bool {
        self.parameter(wrapper, n)
            .is_some_and(|param| param.is_optional)
    }
}

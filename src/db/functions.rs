use idb_index::{FunctionIndex, TypeIndex, WrapperIndex};
use idb_ty::{DEFAULT_CONVENTION, FunctionFlags, PYTHON_CONVENTION};

use super::{Database, nth};

impl Database {
    /// Functions that are not methods of any type.
    pub fn number_of_global_functions(&self) -> usize {
        self.global_functions.len()
    }

    pub fn get_global_function(&self, n: usize) -> Option<FunctionIndex> {
        nth(&self.global_functions, n)
    }

    /// Every function, methods included.
    pub fn number_of_functions(&self) -> usize {
        self.functions.len()
    }

    pub fn get_function(&self, n: usize) -> Option<FunctionIndex> {
        (n < self.functions.len()).then(|| FunctionIndex::from_slot(n))
    }

    /// Overloads matching `name` by plain or scoped name, in handle order.
    pub fn functions_named(&self, name: &str) -> impl Iterator<Item = FunctionIndex> + use<> {
        let plain = self.names.functions.get(name).map_or(&[][..], Vec::as_slice);
        let scoped = self
            .names
            .functions_scoped
            .get(name)
            .map_or(&[][..], Vec::as_slice);
        let mut found: Vec<FunctionIndex> = plain.iter().chain(scoped).copied().collect();
        found.sort_unstable();
        found.dedup();
        found.into_iter()
    }

    pub fn function_name(&self, function: FunctionIndex) -> &str {
        self.function(function)
            .map_or("", |record| record.name.as_str())
    }

    pub fn function_scoped_name(&self, function: FunctionIndex) -> &str {
        self.function(function)
            .map_or("", |record| record.scoped_name.as_str())
    }

    pub fn function_has_comment(&self, function: FunctionIndex) -> bool {
        self.function(function)
            .is_some_and(|record| record.comment.is_some())
    }

    pub fn function_comment(&self, function: FunctionIndex) -> &str {
        self.function(function)
            .and_then(|record| record.comment.as_deref())
            .unwrap_or_default()
    }

    pub fn function_prototype(&self, function: FunctionIndex) -> &str {
        self.function(function)
            .and_then(|record| record.prototype.as_deref())
            .unwrap_or_default()
    }

    pub fn function_is_method(&self, function: FunctionIndex) -> bool {
        self.function(function)
            .is_some_and(|record| record.is_method())
    }

    pub fn function_class(&self, function: FunctionIndex) -> Option<TypeIndex> {
        self.function(function)?.class
    }

    fn function_flags(&self, function: FunctionIndex) -> FunctionFlags {
        self.function(function)
            .map(|record| record.flags)
            .unwrap_or_default()
    }

    pub fn function_is_virtual(&self, function: FunctionIndex) -> bool {
        self.function_flags(function).is_virtual
    }

    pub fn function_is_constructor(&self, function: FunctionIndex) -> bool {
        self.function_flags(function).is_constructor
    }

    pub fn function_is_destructor(&self, function: FunctionIndex) -> bool {
        self.function_flags(function).is_destructor
    }

    pub fn function_is_unary_op(&self, function: FunctionIndex) -> bool {
        self.function_flags(function).is_unary_op
    }

    pub fn function_is_operator_typecast(&self, function: FunctionIndex) -> bool {
        self.function_flags(function).is_operator_typecast
    }

    pub fn function_has_module_name(&self, function: FunctionIndex) -> bool {
        self.function(function)
            .is_some_and(|record| record.module_name.is_some())
    }

    pub fn function_module_name(&self, function: FunctionIndex) -> &str {
        self.function(function)
            .and_then(|record| record.module_name.as_deref())
            .unwrap_or_default()
    }

    pub fn function_has_library_name(&self, function: FunctionIndex) -> bool {
        self.function(function)
            .is_some_and(|record| record.library_name.is_some())
    }

    pub fn function_library_name(&self, function: FunctionIndex) -> &str {
        self.function(function)
            .and_then(|record| record.library_name.as_deref())
            .unwrap_or_default()
    }

    /// Names of the calling conventions `function` has wrappers for.
    pub fn function_conventions(&self, function: FunctionIndex) -> impl Iterator<Item = &str> {
        self.function(function)
            .into_iter()
            .flat_map(|record| record.conventions.iter())
            .map(|convention| convention.name.as_str())
    }

    pub fn function_number_of_wrappers(&self, function: FunctionIndex, convention: &str) -> usize {
        self.function(function)
            .map_or(0, |record| record.wrappers(convention).len())
    }

    pub fn function_wrapper(
        &self,
        function: FunctionIndex,
        convention: &str,
        n: usize,
    ) -> Option<WrapperIndex> {
        nth(self.function(function)?.wrappers(convention), n)
    }

    pub fn function_number_of_c_wrappers(&self, function: FunctionIndex) -> usize {
        self.function_number_of_wrappers(function, DEFAULT_CONVENTION)
    }

    pub fn function_c_wrapper(&self, function: FunctionIndex, n: usize) -> Option<WrapperIndex> {
        self.function_wrapper(function, DEFAULT_CONVENTION, n)
    }

    pub fn function_number_of_python_wrappers(&self, function: FunctionIndex) -> usize {
        self.function_number_of_wrappers(function, PYTHON_CONVENTION)
    }

    pub fn function_python_wrapper(
        &self,
        function: FunctionIndex,
        n: usize,
    ) -> Option<WrapperIndex> {
        self.function_wrapper(function, PYTHON_CONVENTION, n)
    }
}

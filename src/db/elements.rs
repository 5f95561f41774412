use idb_index::{ElementIndex, FunctionIndex, TypeIndex};

use super::{Database, nth};

impl Database {
    pub fn number_of_globals(&self) -> usize {
        self.globals.len()
    }

    /// The `n`th global variable.
    pub fn get_global(&self, n: usize) -> Option<ElementIndex> {
        nth(&self.globals, n)
    }

    pub fn element_by_name(&self, name: &str) -> Option<ElementIndex> {
        self.names.elements.get(name).copied()
    }

    pub fn element_by_scoped_name(&self, scoped_name: &str) -> Option<ElementIndex> {
        self.names.elements_scoped.get(scoped_name).copied()
    }

    pub fn element_name(&self, element: ElementIndex) -> &str {
        self.element(element)
            .map_or("", |record| record.name.as_str())
    }

    pub fn element_scoped_name(&self, element: ElementIndex) -> &str {
        self.element(element)
            .map_or("", |record| record.scoped_name.as_str())
    }

    pub fn element_has_comment(&self, element: ElementIndex) -> bool {
        self.element(element)
            .is_some_and(|record| record.comment.is_some())
    }

    pub fn element_comment(&self, element: ElementIndex) -> &str {
        self.element(element)
            .and_then(|record| record.comment.as_deref())
            .unwrap_or_default()
    }

    /// Owning type of a data member; `None` for globals.
    pub fn element_owner(&self, element: ElementIndex) -> Option<TypeIndex> {
        self.element(element)?.owner
    }

    pub fn element_type(&self, element: ElementIndex) -> Option<TypeIndex> {
        self.element(element).map(|record| record.ty)
    }

    pub fn element_has_getter(&self, element: ElementIndex) -> bool {
        self.element_getter(element).is_some()
    }

    pub fn element_getter(&self, element: ElementIndex) -> Option<FunctionIndex> {
        self.element(element)?.getter
    }

    /// Without a setter the element is read-only from the foreign side.
    pub fn element_has_setter(&self, element: ElementIndex) -> bool {
        self.element_setter(element).is_some()
    }

    pub fn element_setter(&self, element: ElementIndex) -> Option<FunctionIndex> {
        self.element(element)?.setter
    }

    pub fn element_is_sequence(&self, element: ElementIndex) -> bool {
        self.element(element)
            .is_some_and(|record| record.is_sequence)
    }

    pub fn element_is_mapping(&self, element: ElementIndex) -> bool {
        self.element(element)
            .is_some_and(|record| record.is_mapping)
    }
}

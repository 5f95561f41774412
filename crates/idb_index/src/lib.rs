pub mod index;
pub mod resident;

pub use crate::index::{
    ElementIndex, FunctionIndex, Handle, MakeSeqIndex, ManifestIndex, TypeIndex, WrapperIndex,
};
pub use crate::resident::{
    ModuleRegistration, RegisteredModule, ResidentError, ResidentModule, ResidentTable,
    ResidentWrapper, WrapperFn,
};

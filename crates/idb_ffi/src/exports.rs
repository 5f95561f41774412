use abi_stable::StableAbi;
use abi_stable::std_types::{ROption, RString, RVec};
use anyhow::{Context, Result};
use libloading::Library;

use idb_index::{ResidentModule, ResidentWrapper, WrapperFn};

/// Symbol a hosting library exports to describe its resident table.
pub const MODULE_DEF_SYMBOL: &[u8] = b"interrogate_module_def";

#[repr(C)]
#[derive(Clone, StableAbi)]
pub struct StableResidentWrapper {
    pub unique_name: RString,
    pub pointer: ROption<WrapperFn>,
}

#[repr(C)]
#[derive(Clone, StableAbi)]
pub struct StableModuleDef {
    pub library_name: RString,
    pub database_filename: RString,
    pub wrappers: RVec<StableResidentWrapper>,
}

pub type ModuleDefFn = extern "C" fn() -> StableModuleDef;

impl From<StableModuleDef> for ResidentModule {
    fn from(def: StableModuleDef) -> Self {
        let wrappers = def
            .wrappers
            .into_iter()
            .map(|wrapper| {
                ResidentWrapper::owned(wrapper.unique_name.into_string(), wrapper.pointer.into_option())
            })
            .collect();
        ResidentModule::owned(
            def.library_name.into_string(),
            def.database_filename.into_string(),
            wrappers,
        )
    }
}

/// Reads the resident module a loaded library describes. The library must
/// stay loaded for as long as the returned pointers are used.
pub fn read_module_def(library: &Library) -> Result<ResidentModule> {
    unsafe {
        let module_def = library
            .get::<ModuleDefFn>(MODULE_DEF_SYMBOL)
            .context("library missing interrogate_module_def symbol")?;
        Ok(module_def().into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    extern "C" fn exported() {}

    #[test]
    fn stable_defs_keep_wrapper_order() {
        let def = StableModuleDef {
            library_name: RString::from("libshape"),
            database_filename: RString::from("libshape.in"),
            wrappers: RVec::from(vec![
                StableResidentWrapper {
                    unique_name: RString::from("Shape_area"),
                    pointer: ROption::RSome(exported as WrapperFn),
                },
                StableResidentWrapper {
                    unique_name: RString::from("Shape_name"),
                    pointer: ROption::RNone,
                },
            ]),
        };

        let module = ResidentModule::from(def);
        assert_eq!(module.library_name, "libshape");
        let wrappers = module.wrappers.unwrap();
        assert_eq!(wrappers[0].unique_name, "Shape_area");
        assert!(wrappers[0].pointer.is_some());
        assert!(wrappers[1].pointer.is_none());
    }
}

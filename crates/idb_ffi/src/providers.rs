use idb_index::{ResidentModule, ResidentWrapper};

/// A resident module linked into the running binary.
///
/// ```ignore
/// inventory::submit! {
///     idb_ffi::ModuleProvider {
///         library_name: "libpoint",
///         database_filename: "libpoint.in",
///         wrappers: &POINT_WRAPPERS,
///     }
/// }
/// ```
#[derive(Clone, Copy)]
pub struct ModuleProvider {
    pub library_name: &'static str,
    pub database_filename: &'static str,
    pub wrappers: &'static [ResidentWrapper],
}

inventory::collect!(crate::providers::ModuleProvider);

impl ModuleProvider {
    pub const fn module(&self) -> ResidentModule {
        ResidentModule::new(self.library_name, self.database_filename, self.wrappers)
    }
}

/// Every module submitted with `inventory::submit!`, in link order.
pub fn submitted_modules() -> Vec<ResidentModule> {
    inventory::iter::<ModuleProvider>
        .into_iter()
        .map(ModuleProvider::module)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    extern "C" fn provided() {}

    static PROVIDED_WRAPPERS: [ResidentWrapper; 1] =
        [ResidentWrapper::new("provided_wrapper", Some(provided))];

    inventory::submit! {
        ModuleProvider {
            library_name: "libprovided",
            database_filename: "libprovided.in",
            wrappers: &PROVIDED_WRAPPERS,
        }
    }

    #[test]
    fn submitted_modules_are_collected() {
        let modules = submitted_modules();
        let module = modules
            .iter()
            .find(|module| module.library_name == "libprovided")
            .unwrap();
        assert_eq!(module.database_filename, "libprovided.in");
        assert_eq!(module.wrapper_count(), 1);
    }
}

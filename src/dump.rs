//! Human-readable listing of a loaded database.

use std::io::{self, Write};

use idb_index::{FunctionIndex, TypeIndex};

use crate::db::Database;

fn shape(db: &Database, ty: TypeIndex) -> String {
    if let Some(token) = db.type_atomic_token(ty) {
        return format!("atomic {token:?}").to_lowercase();
    }
    if let Some(inner) = db.type_wrapped_type(ty) {
        let kind = if db.type_is_pointer(ty) {
            "pointer"
        } else if db.type_is_const(ty) {
            "const"
        } else {
            "typedef"
        };
        return format!("{kind} -> {}", db.type_name(inner));
    }
    if let (Some(element), Some(size)) = (db.type_array_element(ty), db.type_array_size(ty)) {
        return format!("array[{size}] of {}", db.type_name(element));
    }
    if db.type_is_enum(ty) {
        return if db.type_is_scoped_enum(ty) {
            "enum class".to_owned()
        } else {
            "enum".to_owned()
        };
    }
    let kind = if db.type_is_struct(ty) {
        "struct"
    } else if db.type_is_union(ty) {
        "union"
    } else {
        "class"
    };
    if db.type_is_fully_defined(ty) {
        kind.to_owned()
    } else {
        format!("{kind} (forward declaration)")
    }
}

fn write_function(
    db: &Database,
    out: &mut impl Write,
    indent: &str,
    function: FunctionIndex,
) -> io::Result<()> {
    writeln!(out, "{indent}{} {}", function, db.function_scoped_name(function))?;
    for convention in db.function_conventions(function) {
        for n in 0..db.function_number_of_wrappers(function, convention) {
            let Some(wrapper) = db.function_wrapper(function, convention, n) else {
                continue;
            };
            let ownership = if db.wrapper_caller_manages_return_value(wrapper) {
                " [caller frees]"
            } else {
                ""
            };
            writeln!(
                out,
                "{indent}  {convention} {wrapper} {} ({} params) `{}`{ownership}",
                db.wrapper_name(wrapper),
                db.wrapper_number_of_parameters(wrapper),
                db.wrapper_unique_name(wrapper),
            )?;
        }
    }
    Ok(())
}

fn write_type(db: &Database, out: &mut impl Write, ty: TypeIndex) -> io::Result<()> {
    writeln!(out, "{ty} {}: {}", db.type_scoped_name(ty), shape(db, ty))?;

    for n in 0..db.type_number_of_enum_values(ty) {
        writeln!(
            out,
            "  {} = {}",
            db.type_enum_value_name(ty, n),
            db.type_enum_value(ty, n).unwrap_or_default()
        )?;
    }

    for n in 0..db.type_number_of_derivations(ty) {
        let Some(base) = db.type_get_derivation(ty, n) else {
            continue;
        };
        let upcast = if db.derivation_has_upcast(ty, n) {
            "upcast call"
        } else {
            "upcast identity"
        };
        let downcast = if db.derivation_downcast_is_impossible(ty, n) {
            "no downcast"
        } else if db.derivation_has_downcast(ty, n) {
            "downcast call"
        } else {
            "downcast identity"
        };
        writeln!(out, "  base {}: {upcast}, {downcast}", db.type_name(base))?;
    }

    for n in 0..db.type_number_of_elements(ty) {
        let Some(element) = db.type_get_element(ty, n) else {
            continue;
        };
        let access = if db.element_has_setter(element) {
            "read-write"
        } else {
            "read-only"
        };
        writeln!(
            out,
            "  element {}: {} ({access})",
            db.element_name(element),
            db.element_type(element)
                .map_or("", |element_ty| db.type_name(element_ty)),
        )?;
    }

    let functions = (0..db.type_number_of_constructors(ty))
        .filter_map(|n| db.type_get_constructor(ty, n))
        .chain(db.type_get_destructor(ty))
        .chain((0..db.type_number_of_methods(ty)).filter_map(|n| db.type_get_method(ty, n)))
        .chain((0..db.type_number_of_casts(ty)).filter_map(|n| db.type_get_cast(ty, n)));
    for function in functions {
        write_function(db, out, "  ", function)?;
    }

    for n in 0..db.type_number_of_make_seqs(ty) {
        let Some(make_seq) = db.type_get_make_seq(ty, n) else {
            continue;
        };
        writeln!(
            out,
            "  seq {} = {} / {}",
            db.make_seq_seq_name(make_seq),
            db.make_seq_num_name(make_seq),
            db.make_seq_element_name(make_seq),
        )?;
    }
    Ok(())
}

/// Writes manifests, global types with their members, and global functions.
pub fn dump(db: &Database, out: &mut impl Write) -> io::Result<()> {
    for module in db.modules() {
        writeln!(
            out,
            "module {} ({}) from {}",
            module.module_name,
            module.library_name,
            module.path.display()
        )?;
    }

    for n in 0..db.number_of_manifests() {
        let Some(manifest) = db.get_manifest(n) else {
            continue;
        };
        let value = db
            .manifest_int_value(manifest)
            .map_or_else(|| db.manifest_definition(manifest).to_owned(), |value| value.to_string());
        writeln!(out, "manifest {} = {value}", db.manifest_name(manifest))?;
    }

    for n in 0..db.number_of_global_types() {
        if let Some(ty) = db.get_global_type(n) {
            write_type(db, out, ty)?;
        }
    }

    for n in 0..db.number_of_global_functions() {
        if let Some(function) = db.get_global_function(n) {
            write_function(db, out, "", function)?;
        }
    }

    for n in 0..db.number_of_globals() {
        if let Some(element) = db.get_global(n) {
            writeln!(out, "global {}", db.element_scoped_name(element))?;
        }
    }
    Ok(())
}

mod common;

use common::PointModule;
use interrogatedb::model::{AtomicToken, DEFAULT_CONVENTION, PYTHON_CONVENTION};
use interrogatedb::{CastStep, LoadState};
use tempfile::TempDir;

#[test]
fn point_class_reports_its_members() {
    let dir = TempDir::new().unwrap();
    let module = PointModule::new();
    module.write(dir.path());
    let handle = module.handle(dir.path());

    let db = handle.db();
    assert!(!handle.error_flag());
    assert_eq!(handle.state(), LoadState::Loaded);

    let point = db.type_by_name("Point").unwrap();
    assert_eq!(db.type_by_scoped_name("Point"), Some(point));
    assert_eq!(db.type_by_true_name("Point"), Some(point));
    assert!(db.type_is_class(point));
    assert!(db.type_is_fully_defined(point));

    assert_eq!(db.type_number_of_constructors(point), 1);
    assert!(db.type_has_destructor(point));
    assert!(!db.type_destructor_is_inherited(point));
    assert_eq!(db.safe_destructor(point), db.type_get_destructor(point));

    assert_eq!(db.type_number_of_elements(point), 1);
    let x = db.type_get_element(point, 0).unwrap();
    assert_eq!(db.element_name(x), "x");
    assert_eq!(db.element_scoped_name(x), "Point::x");
    assert_eq!(db.element_owner(x), Some(point));
    assert!(db.element_has_getter(x));
    assert!(db.element_has_setter(x));
    assert!(!db.element_is_sequence(x));
    assert_eq!(db.element_by_scoped_name("Point::x"), Some(x));
    assert_eq!(db.element_type(x), db.type_by_name("int"));

    assert_eq!(db.type_number_of_methods(point), 4);
    assert_eq!(db.type_number_of_make_seqs(point), 1);
    let seq = db.type_get_make_seq(point, 0).unwrap();
    assert_eq!(db.make_seq_seq_name(seq), "coords");
    assert_eq!(db.make_seq_num_name(seq), "get_num_coords");
    let num_getter = db.make_seq_num_getter(seq).unwrap();
    assert_eq!(db.function_name(num_getter), "get_num_coords");
    assert_eq!(db.function_class(num_getter), Some(point));
}

#[test]
fn manifest_int_value_needs_no_call() {
    let dir = TempDir::new().unwrap();
    let module = PointModule::new();
    module.write(dir.path());
    let handle = module.handle(dir.path());
    let db = handle.db();

    let max = db.manifest_by_name("MAX_POINTS").unwrap();
    assert!(db.manifest_has_int_value(max));
    assert_eq!(db.manifest_int_value(max), Some(100));
    assert!(!db.manifest_has_getter(max));
    assert_eq!(db.manifest_definition(max), "100");
    assert_eq!(db.manifest_get_type(max), db.type_by_name("int"));

    let version = db.manifest_by_name("POINT_VERSION").unwrap();
    assert!(!db.manifest_has_type(version));
    assert!(!db.manifest_has_int_value(version));
    assert_eq!(db.manifest_definition(version), "\"1.0\"");

    for n in 0..db.number_of_manifests() {
        let manifest = db.get_manifest(n).unwrap();
        assert!(!(db.manifest_has_int_value(manifest) && db.manifest_has_getter(manifest)));
    }
}

#[test]
fn shape_is_a_trivial_base_of_point() {
    let dir = TempDir::new().unwrap();
    let module = PointModule::new();
    module.write(dir.path());
    let handle = module.handle(dir.path());
    let db = handle.db();

    let point = db.type_by_name("Point").unwrap();
    let shape = db.type_by_name("Shape").unwrap();
    assert_eq!(db.type_number_of_derivations(point), 1);
    assert_eq!(db.type_get_derivation(point, 0), Some(shape));
    assert!(!db.derivation_has_upcast(point, 0));
    assert!(!db.derivation_downcast_is_impossible(point, 0));
    assert!(!db.derivation_has_downcast(point, 0));

    let up = db.resolve_upcast(point, shape).unwrap();
    assert_eq!(up.steps(), &[CastStep::Identity { from: point, to: shape }]);
    let down = db.resolve_downcast(shape, point).unwrap();
    assert_eq!(down.steps(), &[CastStep::Identity { from: shape, to: point }]);
    assert!(up.is_identity() && down.is_identity());
}

#[test]
fn wrappers_carry_parameters_and_ownership() {
    let dir = TempDir::new().unwrap();
    let module = PointModule::new();
    module.write(dir.path());
    let handle = module.handle(dir.path());
    let db = handle.db();

    let setter = module.set_x_wrapper;
    assert_eq!(db.wrapper_number_of_parameters(setter), 2);
    assert!(db.wrapper_parameter_is_this(setter, 0));
    assert!(!db.wrapper_parameter_is_this(setter, 1));
    assert_eq!(db.wrapper_parameter_name(setter, 1), "value");
    assert!(!db.wrapper_has_return_value(setter));
    assert!(!db.wrapper_caller_manages_return_value(setter));
    assert_eq!(db.wrapper_return_value_destructor(setter), None);

    let getter = module.get_x_wrapper;
    assert!(db.wrapper_is_callable_by_name(getter));
    let receiver = db.wrapper_parameter_type(getter, 0).unwrap();
    let unwrapped = db.unwrap_type(receiver).unwrap();
    assert_eq!(unwrapped.base, db.type_by_name("Point").unwrap());
    assert_eq!(unwrapped.pointer_depth, 1);
    assert!(unwrapped.is_const);
    assert_eq!(unwrapped.levels, 2);

    let factory = db.functions_named("make_point").next().unwrap();
    assert_eq!(db.function_prototype(factory), "Point *make_point(int x = 0)");
    assert_eq!(db.function_comment(factory), "Allocates a new point.");
    assert!(!db.function_is_method(factory));
    assert_eq!(db.function_number_of_c_wrappers(factory), 1);
    assert_eq!(db.function_number_of_python_wrappers(factory), 1);
    assert_eq!(db.function_number_of_wrappers(factory, "fastcall"), 0);
    let conventions: Vec<&str> = db.function_conventions(factory).collect();
    assert_eq!(conventions, vec![DEFAULT_CONVENTION, PYTHON_CONVENTION]);

    let wrapper = db.function_c_wrapper(factory, 0).unwrap();
    assert!(db.wrapper_parameter_is_optional(wrapper, 0));
    assert!(db.wrapper_caller_manages_return_value(wrapper));
    let destructor = db.wrapper_return_value_destructor(wrapper).unwrap();
    assert!(db.function_is_destructor(destructor));
    assert_eq!(db.function_scoped_name(destructor), "Point::~Point");
}

#[test]
fn every_owned_return_value_has_a_destructor() {
    let dir = TempDir::new().unwrap();
    let module = PointModule::new();
    module.write(dir.path());
    let handle = module.handle(dir.path());
    let db = handle.db();

    for n in 0..db.number_of_functions() {
        let function = db.get_function(n).unwrap();
        for convention in db.function_conventions(function) {
            for w in 0..db.function_number_of_wrappers(function, convention) {
                let wrapper = db.function_wrapper(function, convention, w).unwrap();
                assert_eq!(db.wrapper_function(wrapper), Some(function));
                match db.wrapper_return_value_destructor(wrapper) {
                    Some(destructor) => {
                        assert!(db.wrapper_caller_manages_return_value(wrapper));
                        assert!(db.function(destructor).is_some());
                    }
                    None => assert!(!db.wrapper_caller_manages_return_value(wrapper)),
                }
            }
        }
    }
}

#[test]
fn enumerations_are_bounded() {
    let dir = TempDir::new().unwrap();
    let module = PointModule::new();
    module.write(dir.path());
    let handle = module.handle(dir.path());
    let db = handle.db();

    let point = db.type_by_name("Point").unwrap();
    let int = db.type_by_name("int").unwrap();
    assert_eq!(db.type_atomic_token(int), Some(AtomicToken::Int));

    assert_eq!(db.number_of_global_types(), 2);
    assert!(db.get_global_type(1).is_some());
    assert_eq!(db.get_global_type(2), None);
    assert_eq!(db.number_of_types(), 6);
    assert_eq!(db.get_type(6), None);
    assert_eq!(db.number_of_global_functions(), 1);
    assert_eq!(db.get_global_function(1), None);
    assert_eq!(db.number_of_globals(), 0);
    assert_eq!(db.get_global(0), None);
    assert_eq!(db.get_manifest(db.number_of_manifests()), None);
    assert_eq!(db.type_get_method(point, 4), None);
    assert_eq!(db.type_get_constructor(point, 1), None);
    assert_eq!(db.wrapper_parameter_type(module.set_x_wrapper, 2), None);
    assert_eq!(db.type_get_derivation(int, 0), None);
    assert_eq!(db.type_enum_value(point, 0), None);
}

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use interrogatedb::model::{
    AtomicToken, DEFAULT_CONVENTION, Derivation, ElementRecord, ExtensionKind, FunctionFlags,
    FunctionRecord, MakeSeqRecord, ManifestRecord, PYTHON_CONVENTION, Parameter,
    ReturnOwnership, TypeRecord, WrapKind, WrapperRecord,
};
use interrogatedb::{
    ArtifactBuilder, DatabaseHandle, FunctionIndex, ResidentModule, TypeIndex, WrapperFn,
    WrapperIndex,
};

pub const POINT_DB: &str = "libpoint.in";

pub extern "C" fn point_new() {}
pub extern "C" fn point_get_x() {}
pub extern "C" fn make_point_entry() {}

pub fn method(name: &str, class_name: &str, class: TypeIndex, flags: FunctionFlags) -> FunctionRecord {
    let mut record = FunctionRecord::method(name, format!("{class_name}::{name}"), class);
    record.flags = flags;
    record
}

pub fn destructor_flags(is_virtual: bool) -> FunctionFlags {
    FunctionFlags {
        is_destructor: true,
        is_virtual,
        ..FunctionFlags::default()
    }
}

pub fn constructor_flags() -> FunctionFlags {
    FunctionFlags {
        is_constructor: true,
        ..FunctionFlags::default()
    }
}

/// `Shape <- Point` with a constructor, a destructor, an `x` element, a
/// make-seq, a factory function and a couple of manifests.
pub struct PointModule {
    pub builder: ArtifactBuilder,
    pub int: TypeIndex,
    pub shape: TypeIndex,
    pub point: TypeIndex,
    pub point_ptr: TypeIndex,
    pub const_point: TypeIndex,
    pub const_point_ptr: TypeIndex,
    pub shape_dtor: FunctionIndex,
    pub point_ctor: FunctionIndex,
    pub point_dtor: FunctionIndex,
    pub get_x: FunctionIndex,
    pub set_x: FunctionIndex,
    pub make_point: FunctionIndex,
    pub ctor_wrapper: WrapperIndex,
    pub get_x_wrapper: WrapperIndex,
    pub set_x_wrapper: WrapperIndex,
    pub make_point_wrapper: WrapperIndex,
    pub make_point_python: WrapperIndex,
}

impl PointModule {
    pub fn new() -> Self {
        let mut builder = ArtifactBuilder::new("libpoint", "point");
        let int = builder.add_type(TypeRecord::atomic("int", AtomicToken::Int));
        let shape = builder.add_type(TypeRecord::extension("Shape", ExtensionKind::Class));
        let point = builder.add_type(TypeRecord::extension("Point", ExtensionKind::Class));
        let point_ptr = builder.add_type(TypeRecord::wrapped("Point *", WrapKind::Pointer, point));
        let const_point =
            builder.add_type(TypeRecord::wrapped("const Point", WrapKind::Const, point));
        let const_point_ptr = builder.add_type(TypeRecord::wrapped(
            "const Point *",
            WrapKind::Pointer,
            const_point,
        ));
        builder.add_derivation(point, Derivation::new(shape));

        let shape_dtor = builder.add_method(shape, method("~Shape", "Shape", shape, destructor_flags(true)));
        let point_ctor = builder.add_method(point, method("Point", "Point", point, constructor_flags()));
        let point_dtor = builder.add_method(point, method("~Point", "Point", point, destructor_flags(true)));
        let get_x = builder.add_method(point, method("get_x", "Point", point, FunctionFlags::default()));
        let set_x = builder.add_method(point, method("set_x", "Point", point, FunctionFlags::default()));
        let get_num_coords = builder.add_method(
            point,
            method("get_num_coords", "Point", point, FunctionFlags::default()),
        );
        let get_coord = builder.add_method(point, method("get_coord", "Point", point, FunctionFlags::default()));

        let mut make_point = FunctionRecord::new("make_point");
        make_point.prototype = Some("Point *make_point(int x = 0)".to_owned());
        make_point.comment = Some("Allocates a new point.".to_owned());
        let make_point = builder.add_function(make_point);

        let mut x = ElementRecord::new("x", "Point::x", int);
        x.owner = Some(point);
        x.getter = Some(get_x);
        x.setter = Some(set_x);
        builder.add_element(x);

        builder.add_make_seq(
            point,
            MakeSeqRecord {
                seq_name: "coords".to_owned(),
                scoped_name: "Point::coords".to_owned(),
                comment: None,
                num_name: "get_num_coords".to_owned(),
                element_name: "get_coord".to_owned(),
                num_getter: get_num_coords,
                element_getter: get_coord,
            },
        );

        builder.add_manifest(ManifestRecord::int("MAX_POINTS", 100, Some(int)));
        builder.add_manifest(ManifestRecord::literal("POINT_VERSION", "\"1.0\""));

        let mut ctor = WrapperRecord::new("_inPpoint_Point", point_ctor);
        ctor.parameters.push(Parameter::new(int, "x"));
        ctor.return_type = Some(point_ptr);
        ctor.return_ownership = ReturnOwnership::CallerManaged {
            destructor: point_dtor,
        };
        let ctor_wrapper = builder.add_wrapper(DEFAULT_CONVENTION, ctor);

        let mut dtor = WrapperRecord::new("_inPpoint_Point_destroy", point_dtor);
        dtor.parameters.push(Parameter::receiver(point_ptr));
        builder.add_wrapper(DEFAULT_CONVENTION, dtor);

        let mut shape_destroy = WrapperRecord::new("_inPpoint_Shape_destroy", shape_dtor);
        shape_destroy.parameters.push(Parameter::receiver(point_ptr));
        builder.add_wrapper(DEFAULT_CONVENTION, shape_destroy);

        let mut getter = WrapperRecord::new("_inPpoint_Point_get_x", get_x);
        getter.parameters.push(Parameter::receiver(const_point_ptr));
        getter.return_type = Some(int);
        getter.callable_by_name = true;
        let get_x_wrapper = builder.add_wrapper(DEFAULT_CONVENTION, getter);

        let mut setter = WrapperRecord::new("_inPpoint_Point_set_x", set_x);
        setter.parameters.push(Parameter::receiver(point_ptr));
        setter.parameters.push(Parameter::new(int, "value"));
        let set_x_wrapper = builder.add_wrapper(DEFAULT_CONVENTION, setter);

        let mut factory = WrapperRecord::new("_inPpoint_make_point", make_point);
        let mut x_param = Parameter::new(int, "x");
        x_param.is_optional = true;
        factory.parameters.push(x_param);
        factory.return_type = Some(point_ptr);
        factory.return_ownership = ReturnOwnership::CallerManaged {
            destructor: point_dtor,
        };
        let make_point_wrapper = builder.add_wrapper(DEFAULT_CONVENTION, factory.clone());
        factory.name = "make_point".to_owned();
        let make_point_python = builder.add_wrapper(PYTHON_CONVENTION, factory);

        Self {
            builder,
            int,
            shape,
            point,
            point_ptr,
            const_point,
            const_point_ptr,
            shape_dtor,
            point_ctor,
            point_dtor,
            get_x,
            set_x,
            make_point,
            ctor_wrapper,
            get_x_wrapper,
            set_x_wrapper,
            make_point_wrapper,
            make_point_python,
        }
    }

    pub fn write(&self, dir: &Path) -> PathBuf {
        self.builder.write(dir, POINT_DB).unwrap()
    }

    pub fn resident(&self) -> ResidentModule {
        let ctor = self.ctor_wrapper;
        let get_x = self.get_x_wrapper;
        let factory = self.make_point_wrapper;
        self.builder.resident_module(POINT_DB, move |wrapper| -> Option<WrapperFn> {
            if wrapper == ctor {
                Some(point_new)
            } else if wrapper == get_x {
                Some(point_get_x)
            } else if wrapper == factory {
                Some(make_point_entry)
            } else {
                None
            }
        })
    }

    /// A handle searching only `dir`, with this module registered through
    /// its resident table.
    pub fn handle(&self, dir: &Path) -> DatabaseHandle {
        let handle = DatabaseHandle::new();
        assert!(handle.add_search_directory(dir));
        assert!(handle.register_module(self.resident()));
        handle
    }
}

/// A handle with `filename` registered as a module without resident table.
pub fn tableless_handle(dir: &Path, filenames: &[&str]) -> DatabaseHandle {
    let handle = DatabaseHandle::new();
    assert!(handle.add_search_directory(dir));
    for filename in filenames {
        assert!(handle.register_module(ResidentModule::without_table(*filename, *filename)));
    }
    handle
}

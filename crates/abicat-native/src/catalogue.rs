//! Static description of the boundary
//!
//! Everything a binding generator needs to know about the exported surface:
//! - `TypeShape`: the C type of every parameter, return value and field
//! - `BoundaryFunction`: name, ordered parameters, return type, ownership
//! - `DataSymbol`: exported data (`GLOBALINT`)
//! - `StructLayout`: sizes and field offsets taken from the real `#[repr(C)]` types
//! - `EnumDecl`: declared tags and their values
//!
//! Type mapping:
//! - TypeShape::Int → `int` (`c_int`)
//! - TypeShape::UInt64 → `uint64_t` (`u64`)
//! - TypeShape::Size → `size_t` (`usize`)
//! - TypeShape::CString → `const char *`
//! - TypeShape::Pointer → `T *`
//! - TypeShape::Callback → `R (*)(P...)`

use crate::global::GLOBALINT_INITIAL;
use crate::types::{Double3, MyEnum, MyEnumAsInt, MyStruct, StructWithArray, StructWithStruct};
use serde::Serialize;
use std::collections::HashSet;
use std::mem::{align_of, offset_of, size_of};
use std::os::raw::{c_char, c_int};
use thiserror::Error;

/// Shape of a C type at the boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeShape {
    Void,
    Bool,
    /// C `int`
    Int,
    Int8,
    UInt8,
    Int32,
    UInt64,
    /// `size_t`, platform address width
    Size,
    Float,
    Double,
    /// `const char *`, NUL-terminated
    CString,
    Pointer {
        to: &'static TypeShape,
    },
    Array {
        of: &'static TypeShape,
        len: usize,
    },
    /// Struct known by its typedef name
    Struct {
        name: &'static str,
    },
    /// Incomplete struct, only valid behind a pointer
    Opaque {
        name: &'static str,
    },
    /// `typedef` enums are spelled `Name`, others `enum Name`
    Enum {
        name: &'static str,
        typedef: bool,
    },
    Typedef {
        name: &'static str,
        target: &'static TypeShape,
    },
    Callback {
        params: &'static [TypeShape],
        returns: &'static TypeShape,
    },
}

impl TypeShape {
    /// Render a C declaration of `name` with this type.
    ///
    /// An empty `name` yields the abstract type.
    ///
    /// # Examples
    ///
    /// ```
    /// # use abicat_native::catalogue::TypeShape;
    /// assert_eq!(TypeShape::Int.declare("a"), "int a");
    /// assert_eq!(TypeShape::Pointer { to: &TypeShape::Int }.declare(""), "int *");
    /// assert_eq!(
    ///     TypeShape::Array { of: &TypeShape::Double, len: 2 }.declare("array1"),
    ///     "double array1[2]"
    /// );
    /// ```
    pub fn declare(&self, name: &str) -> String {
        match self {
            TypeShape::CString => format!("const char *{}", name),
            TypeShape::Pointer { to } => to.declare(&format!("*{}", name)),
            TypeShape::Array { of, len } => of.declare(&format!("{}[{}]", name, len)),
            TypeShape::Callback { params, returns } => {
                returns.declare(&format!("(*{})({})", name, parameter_list(params)))
            }
            _ => {
                let base = self.base_name();
                if name.is_empty() || name.starts_with('[') {
                    format!("{}{}", base, name)
                } else {
                    format!("{} {}", base, name)
                }
            }
        }
    }

    /// The C spelling of the type
    pub fn c_name(&self) -> String {
        self.declare("")
    }

    fn base_name(&self) -> String {
        match self {
            TypeShape::Void => "void".to_string(),
            TypeShape::Bool => "bool".to_string(),
            TypeShape::Int => "int".to_string(),
            TypeShape::Int8 => "int8_t".to_string(),
            TypeShape::UInt8 => "uint8_t".to_string(),
            TypeShape::Int32 => "int32_t".to_string(),
            TypeShape::UInt64 => "uint64_t".to_string(),
            TypeShape::Size => "size_t".to_string(),
            TypeShape::Float => "float".to_string(),
            TypeShape::Double => "double".to_string(),
            TypeShape::Struct { name } | TypeShape::Opaque { name } => name.to_string(),
            TypeShape::Enum { name, typedef: true } => name.to_string(),
            TypeShape::Enum {
                name,
                typedef: false,
            } => format!("enum {}", name),
            TypeShape::Typedef { name, .. } => name.to_string(),
            TypeShape::CString
            | TypeShape::Pointer { .. }
            | TypeShape::Array { .. }
            | TypeShape::Callback { .. } => self.declare(""),
        }
    }

    /// Whether a value of this shape is an address rather than data
    pub fn is_indirect(&self) -> bool {
        match self {
            TypeShape::Pointer { .. } | TypeShape::CString | TypeShape::Callback { .. } => true,
            TypeShape::Typedef { target, .. } => target.is_indirect(),
            _ => false,
        }
    }

    /// `typedef <target> <name>;` for typedef shapes
    pub fn typedef_declaration(&self) -> Option<String> {
        match self {
            TypeShape::Typedef { name, target } => {
                Some(format!("typedef {};", target.declare(name)))
            }
            _ => None,
        }
    }
}

fn parameter_list(params: &[TypeShape]) -> String {
    if params.is_empty() {
        return "void".to_string();
    }
    params
        .iter()
        .map(TypeShape::c_name)
        .collect::<Vec<_>>()
        .join(", ")
}

/// How the callee treats an argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum ParamRole {
    /// Copied in
    Value,
    /// Pointer dereferenced for reading, never written
    ReadThrough,
    /// Caller-owned storage the callee writes into
    WriteThrough,
    /// Pointer read for the duration of the call, never freed or kept
    Borrowed,
    /// Address passed along without being dereferenced
    Forwarded,
    /// Function pointer invoked synchronously at most once
    Callback { nullable: bool },
    /// Allocation handed back to the library for release
    Released,
}

/// Who owns what a function returns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "ownership", rename_all = "snake_case")]
pub enum ReturnOwnership {
    /// Plain value or nothing
    Value,
    /// Caller owns the returned allocation
    Transferred { release: &'static str },
    /// Returned by value, but one field is a caller-owned allocation
    FieldTransferred {
        field: &'static str,
        release: &'static str,
    },
    /// Points at library-owned memory with process lifetime
    Static,
}

impl ReturnOwnership {
    /// Release function the caller must use, if any
    pub fn release(&self) -> Option<&'static str> {
        match self {
            ReturnOwnership::Transferred { release }
            | ReturnOwnership::FieldTransferred { release, .. } => Some(release),
            ReturnOwnership::Value | ReturnOwnership::Static => None,
        }
    }
}

/// Grouping used by listings and the generated header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Scalar,
    Heap,
    Struct,
    Indirection,
    Callback,
    Enum,
    Release,
    Runtime,
}

impl Category {
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Scalar => "scalars & pointer mutation",
            Category::Heap => "heap-returning",
            Category::Struct => "value structs",
            Category::Indirection => "indirection & opaque handles",
            Category::Callback => "callbacks",
            Category::Enum => "enums, wide integers, bool",
            Category::Release => "release",
            Category::Runtime => "runtime",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Param {
    pub name: &'static str,
    pub shape: TypeShape,
    #[serde(flatten)]
    pub role: ParamRole,
}

/// One exported function symbol
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundaryFunction {
    pub name: &'static str,
    pub category: Category,
    pub params: &'static [Param],
    pub returns: TypeShape,
    #[serde(flatten)]
    pub ownership: ReturnOwnership,
    pub summary: &'static str,
}

impl BoundaryFunction {
    /// C prototype, e.g. `int *multiply(int a, int b);`
    pub fn prototype(&self) -> String {
        let params = if self.params.is_empty() {
            "void".to_string()
        } else {
            self.params
                .iter()
                .map(|p| p.shape.declare(p.name))
                .collect::<Vec<_>>()
                .join(", ")
        };
        format!("{};", self.returns.declare(&format!("{}({})", self.name, params)))
    }
}

/// One exported data symbol
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DataSymbol {
    pub name: &'static str,
    pub shape: TypeShape,
    pub initial: u64,
}

impl DataSymbol {
    pub fn declaration(&self) -> String {
        format!("extern {};", self.shape.declare(self.name))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EnumVariant {
    pub name: &'static str,
    pub value: c_int,
}

/// A declared enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EnumDecl {
    pub name: &'static str,
    pub typedef: bool,
    pub variants: &'static [EnumVariant],
}

impl EnumDecl {
    pub fn declaration(&self) -> String {
        let mut out = format!("enum {} {{\n", self.name);
        for v in self.variants {
            out.push_str(&format!("    {} = {},\n", v.name, v.value));
        }
        out.push_str("};");
        if self.typedef {
            out.push_str(&format!("\ntypedef enum {0} {0};", self.name));
        }
        out
    }
}

/// Field of a struct layout, measured from the Rust definition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldLayout {
    pub name: &'static str,
    pub shape: TypeShape,
    pub offset: usize,
    pub size: usize,
}

/// Byte layout of a `#[repr(C)]` struct
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructLayout {
    pub name: &'static str,
    /// `struct Name { .. }; typedef struct Name Name;` rather than an anonymous typedef
    pub tagged: bool,
    pub size: usize,
    pub align: usize,
    pub fields: Vec<FieldLayout>,
}

impl StructLayout {
    /// Bytes not covered by any field (interior and tail padding)
    pub fn padding(&self) -> usize {
        self.size - self.fields.iter().map(|f| f.size).sum::<usize>()
    }

    pub fn declaration(&self) -> String {
        let body: String = self
            .fields
            .iter()
            .map(|f| format!("    {};\n", f.shape.declare(f.name)))
            .collect();
        if self.tagged {
            format!(
                "struct {0} {{\n{1}}};\ntypedef struct {0} {0};",
                self.name, body
            )
        } else {
            format!("typedef struct {{\n{}}} {};", body, self.name)
        }
    }
}

/// Catalogue consistency errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogueError {
    #[error("symbol '{0}' is declared more than once")]
    DuplicateSymbol(&'static str),

    #[error("'{function}' transfers ownership to '{release}', which is not a release function")]
    MissingRelease {
        function: &'static str,
        release: &'static str,
    },

    #[error("struct '{0}' is referenced but has no layout")]
    UnknownStruct(&'static str),
}

// ===== Shapes =====

const INT: TypeShape = TypeShape::Int;
const INT_PTR: TypeShape = TypeShape::Pointer { to: &INT };
const INT_PTR_PTR: TypeShape = TypeShape::Pointer { to: &INT_PTR };
const FLOAT_PTR: TypeShape = TypeShape::Pointer {
    to: &TypeShape::Float,
};
const DOUBLE_PTR: TypeShape = TypeShape::Pointer {
    to: &TypeShape::Double,
};
const VOID_PTR: TypeShape = TypeShape::Pointer {
    to: &TypeShape::Void,
};
const U8_PTR: TypeShape = TypeShape::Pointer {
    to: &TypeShape::UInt8,
};
const DOUBLE3: TypeShape = TypeShape::Struct { name: "double3" };
const MY_STRUCT: TypeShape = TypeShape::Struct { name: "MyStruct" };
const MY_STRUCT_PTR: TypeShape = TypeShape::Pointer { to: &MY_STRUCT };
const STRUCT_WITH_ARRAY: TypeShape = TypeShape::Struct {
    name: "StructWithArray",
};
const STRUCT_WITH_STRUCT: TypeShape = TypeShape::Struct {
    name: "StructWithStruct",
};
const OPAQUE_PTR: TypeShape = TypeShape::Pointer {
    to: &TypeShape::Opaque {
        name: "MyOpaqueStruct",
    },
};
const MY_ENUM: TypeShape = TypeShape::Enum {
    name: "MyEnum",
    typedef: true,
};
const MY_ENUM_AS_INT: TypeShape = TypeShape::Enum {
    name: "MyEnumAsInt",
    typedef: false,
};

/// `typedef int INTTYPE;`
pub const INTTYPE: TypeShape = TypeShape::Typedef {
    name: "INTTYPE",
    target: &INT,
};

/// `typedef void (*FunctionTypedef)(void *const owner);`
///
/// Callback shapes carry parameter types only, so the generated header
/// declares this as `void (*)(void *)`. A top-level `const` on a by-value
/// parameter is not part of the function type; the ABI is the same.
pub const FUNCTION_TYPEDEF: TypeShape = TypeShape::Typedef {
    name: "FunctionTypedef",
    target: &TypeShape::Callback {
        params: &[VOID_PTR],
        returns: &TypeShape::Void,
    },
};

/// Typedefs in declaration order
pub static TYPEDEFS: &[TypeShape] = &[INTTYPE, FUNCTION_TYPEDEF];

/// Opaque struct names
pub static OPAQUE_TYPES: &[&str] = &["MyOpaqueStruct"];

const fn param(name: &'static str, shape: TypeShape, role: ParamRole) -> Param {
    Param { name, shape, role }
}

const fn value(name: &'static str, shape: TypeShape) -> Param {
    param(name, shape, ParamRole::Value)
}

const fn released(shape: TypeShape) -> Param {
    param("ptr", shape, ParamRole::Released)
}

// ===== Symbol table =====

/// Every exported function, in header order
pub static FUNCTIONS: &[BoundaryFunction] = &[
    // scalars & pointer mutation
    BoundaryFunction {
        name: "sum",
        category: Category::Scalar,
        params: &[value("a", INT), value("b", INT)],
        returns: INT,
        ownership: ReturnOwnership::Value,
        summary: "Adds two integers.",
    },
    BoundaryFunction {
        name: "sum_with_typedef",
        category: Category::Scalar,
        params: &[value("a", INTTYPE), value("b", INTTYPE)],
        returns: INTTYPE,
        ownership: ReturnOwnership::Value,
        summary: "sum through a typedef'd scalar.",
    },
    BoundaryFunction {
        name: "subtract",
        category: Category::Scalar,
        params: &[
            param("a", INT_PTR, ParamRole::ReadThrough),
            value("b", INT),
        ],
        returns: INT,
        ownership: ReturnOwnership::Value,
        summary: "Returns *a - b without writing *a.",
    },
    BoundaryFunction {
        name: "write_int",
        category: Category::Scalar,
        params: &[param(
            "out",
            TypeShape::Pointer {
                to: &TypeShape::Int32,
            },
            ParamRole::WriteThrough,
        )],
        returns: TypeShape::Void,
        ownership: ReturnOwnership::Value,
        summary: "Writes 10 through an output pointer.",
    },
    BoundaryFunction {
        name: "uint8_tptr_",
        category: Category::Scalar,
        params: &[param("data", U8_PTR, ParamRole::ReadThrough)],
        returns: TypeShape::Void,
        ownership: ReturnOwnership::Value,
        summary: "Reads an unsigned byte through a pointer.",
    },
    BoundaryFunction {
        name: "int8_tptr_method",
        category: Category::Scalar,
        params: &[param(
            "data",
            TypeShape::Pointer {
                to: &TypeShape::Int8,
            },
            ParamRole::ReadThrough,
        )],
        returns: TypeShape::Void,
        ownership: ReturnOwnership::Value,
        summary: "Reads a signed byte through a pointer.",
    },
    BoundaryFunction {
        name: "make_buffer",
        category: Category::Scalar,
        params: &[
            param("addr", U8_PTR, ParamRole::WriteThrough),
            value("length", INT),
        ],
        returns: TypeShape::Void,
        ownership: ReturnOwnership::Value,
        summary: "Fills a caller-owned buffer with addr[i] = i.",
    },
    BoundaryFunction {
        name: "check_buffer",
        category: Category::Scalar,
        params: &[param("addr", U8_PTR, ParamRole::ReadThrough)],
        returns: TypeShape::Void,
        ownership: ReturnOwnership::Value,
        summary: "Inspects the first 10 bytes of a caller-owned buffer.",
    },
    // heap-returning
    BoundaryFunction {
        name: "multiply",
        category: Category::Heap,
        params: &[value("a", INT), value("b", INT)],
        returns: INT_PTR,
        ownership: ReturnOwnership::Transferred { release: "free_int" },
        summary: "Heap cell holding a * b.",
    },
    BoundaryFunction {
        name: "divide",
        category: Category::Heap,
        params: &[value("a", INT), value("b", INT)],
        returns: FLOAT_PTR,
        ownership: ReturnOwnership::Transferred {
            release: "free_float",
        },
        summary: "Heap cell holding (float)a / b.",
    },
    BoundaryFunction {
        name: "divide_precision",
        category: Category::Heap,
        params: &[
            param("a", FLOAT_PTR, ParamRole::ReadThrough),
            param("b", FLOAT_PTR, ParamRole::ReadThrough),
        ],
        returns: DOUBLE_PTR,
        ownership: ReturnOwnership::Transferred {
            release: "free_double",
        },
        summary: "Heap cell holding (double)*a / (double)*b.",
    },
    BoundaryFunction {
        name: "copy_string",
        category: Category::Heap,
        params: &[param("instr", TypeShape::CString, ParamRole::Borrowed)],
        returns: TypeShape::CString,
        ownership: ReturnOwnership::Transferred {
            release: "free_string",
        },
        summary: "Fresh NUL-terminated copy of the input.",
    },
    BoundaryFunction {
        name: "return_array",
        category: Category::Heap,
        params: &[],
        returns: DOUBLE_PTR,
        ownership: ReturnOwnership::Transferred {
            release: "free_array",
        },
        summary: "Heap double[4] = {1, 2, 3, 4}.",
    },
    // value structs
    BoundaryFunction {
        name: "struct_as_argument",
        category: Category::Struct,
        params: &[value("vector", DOUBLE3)],
        returns: INT,
        ownership: ReturnOwnership::Value,
        summary: "Sum of a by-value double3, truncated.",
    },
    BoundaryFunction {
        name: "return_struct_by_value",
        category: Category::Struct,
        params: &[
            value("a", TypeShape::Float),
            param("b", TypeShape::CString, ParamRole::Borrowed),
        ],
        returns: MY_STRUCT,
        ownership: ReturnOwnership::FieldTransferred {
            field: "b",
            release: "free_string",
        },
        summary: "MyStruct {a, copy of b, 2} by value.",
    },
    BoundaryFunction {
        name: "return_struct_with_array_by_value",
        category: Category::Struct,
        params: &[],
        returns: STRUCT_WITH_ARRAY,
        ownership: ReturnOwnership::Value,
        summary: "StructWithArray {[10, 20], [30, 40, 50]} by value.",
    },
    BoundaryFunction {
        name: "accept_struct_ptr",
        category: Category::Struct,
        params: &[param("arg", MY_STRUCT_PTR, ParamRole::Borrowed)],
        returns: TypeShape::Void,
        ownership: ReturnOwnership::Value,
        summary: "Borrows a struct by address.",
    },
    BoundaryFunction {
        name: "accept_struct_with_array",
        category: Category::Struct,
        params: &[value("arg", STRUCT_WITH_ARRAY)],
        returns: TypeShape::Void,
        ownership: ReturnOwnership::Value,
        summary: "Struct with array members by value.",
    },
    BoundaryFunction {
        name: "accept_struct_with_struct",
        category: Category::Struct,
        params: &[value("arg", STRUCT_WITH_STRUCT)],
        returns: TypeShape::Void,
        ownership: ReturnOwnership::Value,
        summary: "Struct with struct members by value.",
    },
    BoundaryFunction {
        name: "return_struct_ptr",
        category: Category::Struct,
        params: &[],
        returns: MY_STRUCT_PTR,
        ownership: ReturnOwnership::Transferred {
            release: "free_struct",
        },
        summary: "Zeroed heap MyStruct.",
    },
    // indirection & opaque handles
    BoundaryFunction {
        name: "ptr_ptr",
        category: Category::Indirection,
        params: &[
            param("a", INT_PTR_PTR, ParamRole::ReadThrough),
            param("b", INT_PTR_PTR, ParamRole::ReadThrough),
        ],
        returns: INT_PTR_PTR,
        ownership: ReturnOwnership::Transferred {
            release: "free_ptr_ptr",
        },
        summary: "Fresh int*[2] holding **b, **a.",
    },
    BoundaryFunction {
        name: "accept_opaque_struct_ptr",
        category: Category::Indirection,
        params: &[param("ptr", OPAQUE_PTR, ParamRole::Forwarded)],
        returns: TypeShape::Void,
        ownership: ReturnOwnership::Value,
        summary: "Forwards an opaque handle without dereferencing it.",
    },
    BoundaryFunction {
        name: "accept_void_ptr",
        category: Category::Indirection,
        params: &[param("arg", VOID_PTR, ParamRole::Forwarded)],
        returns: TypeShape::Void,
        ownership: ReturnOwnership::Value,
        summary: "Forwards an untyped pointer.",
    },
    BoundaryFunction {
        name: "return_void_ptr",
        category: Category::Indirection,
        params: &[],
        returns: VOID_PTR,
        ownership: ReturnOwnership::Static,
        summary: "Untyped pointer return (always NULL).",
    },
    // callbacks
    BoundaryFunction {
        name: "accept_fn_pointer_with_no_args",
        category: Category::Callback,
        params: &[param(
            "callback",
            TypeShape::Callback {
                params: &[],
                returns: &TypeShape::Void,
            },
            ParamRole::Callback { nullable: false },
        )],
        returns: TypeShape::Void,
        ownership: ReturnOwnership::Value,
        summary: "Invokes callback() once.",
    },
    BoundaryFunction {
        name: "accept_fn_typedef_arg",
        category: Category::Callback,
        params: &[param(
            "arg",
            FUNCTION_TYPEDEF,
            ParamRole::Callback { nullable: false },
        )],
        returns: TypeShape::Void,
        ownership: ReturnOwnership::Value,
        summary: "Invokes arg(NULL) once.",
    },
    BoundaryFunction {
        name: "accept_fn_pointer_with_primitive_args",
        category: Category::Callback,
        params: &[param(
            "callback",
            TypeShape::Callback {
                params: &[INT],
                returns: &TypeShape::Void,
            },
            ParamRole::Callback { nullable: true },
        )],
        returns: TypeShape::Void,
        ownership: ReturnOwnership::Value,
        summary: "Invokes callback(42) once if non-NULL.",
    },
    BoundaryFunction {
        name: "accept_fn_pointer_with_ptr_args",
        category: Category::Callback,
        params: &[param(
            "callback",
            TypeShape::Callback {
                params: &[MY_STRUCT_PTR],
                returns: &TypeShape::Void,
            },
            ParamRole::Callback { nullable: false },
        )],
        returns: TypeShape::Void,
        ownership: ReturnOwnership::Value,
        summary: "Invokes callback(NULL) once.",
    },
    BoundaryFunction {
        name: "return_fn_typedef",
        category: Category::Callback,
        params: &[],
        returns: FUNCTION_TYPEDEF,
        ownership: ReturnOwnership::Static,
        summary: "Library-owned FunctionTypedef.",
    },
    // enums, wide integers, bool
    BoundaryFunction {
        name: "return_enum",
        category: Category::Enum,
        params: &[],
        returns: MY_ENUM,
        ownership: ReturnOwnership::Value,
        summary: "Always ENUM_VAL1.",
    },
    BoundaryFunction {
        name: "accept_enum",
        category: Category::Enum,
        params: &[value("val", MY_ENUM)],
        returns: INT,
        ownership: ReturnOwnership::Value,
        summary: "ENUM_VAL1 -> 0, ENUM_VAL2 -> 1; other tags violate the contract.",
    },
    BoundaryFunction {
        name: "return_enum_as_int",
        category: Category::Enum,
        params: &[],
        returns: MY_ENUM_AS_INT,
        ownership: ReturnOwnership::Value,
        summary: "Always ENUM_AS_INT_VAL1.",
    },
    BoundaryFunction {
        name: "bigint_method",
        category: Category::Enum,
        params: &[value("number", TypeShape::UInt64)],
        returns: TypeShape::UInt64,
        ownership: ReturnOwnership::Value,
        summary: "number + 1, wrapping.",
    },
    BoundaryFunction {
        name: "size_tmethod",
        category: Category::Enum,
        params: &[value("number", TypeShape::Size)],
        returns: TypeShape::Size,
        ownership: ReturnOwnership::Value,
        summary: "number + 1 at address width, wrapping.",
    },
    BoundaryFunction {
        name: "returns_bool",
        category: Category::Enum,
        params: &[],
        returns: TypeShape::Bool,
        ownership: ReturnOwnership::Value,
        summary: "Always false.",
    },
    // release
    BoundaryFunction {
        name: "free_int",
        category: Category::Release,
        params: &[released(INT_PTR)],
        returns: TypeShape::Void,
        ownership: ReturnOwnership::Value,
        summary: "Releases multiply results.",
    },
    BoundaryFunction {
        name: "free_float",
        category: Category::Release,
        params: &[released(FLOAT_PTR)],
        returns: TypeShape::Void,
        ownership: ReturnOwnership::Value,
        summary: "Releases divide results.",
    },
    BoundaryFunction {
        name: "free_double",
        category: Category::Release,
        params: &[released(DOUBLE_PTR)],
        returns: TypeShape::Void,
        ownership: ReturnOwnership::Value,
        summary: "Releases divide_precision results.",
    },
    BoundaryFunction {
        name: "free_array",
        category: Category::Release,
        params: &[released(DOUBLE_PTR)],
        returns: TypeShape::Void,
        ownership: ReturnOwnership::Value,
        summary: "Releases return_array results.",
    },
    BoundaryFunction {
        name: "free_string",
        category: Category::Release,
        params: &[released(TypeShape::CString)],
        returns: TypeShape::Void,
        ownership: ReturnOwnership::Value,
        summary: "Releases copy_string results and MyStruct.b.",
    },
    BoundaryFunction {
        name: "free_ptr_ptr",
        category: Category::Release,
        params: &[released(INT_PTR_PTR)],
        returns: TypeShape::Void,
        ownership: ReturnOwnership::Value,
        summary: "Releases ptr_ptr results and both cells.",
    },
    BoundaryFunction {
        name: "free_struct",
        category: Category::Release,
        params: &[released(MY_STRUCT_PTR)],
        returns: TypeShape::Void,
        ownership: ReturnOwnership::Value,
        summary: "Releases return_struct_ptr results and a non-NULL b.",
    },
    // runtime
    BoundaryFunction {
        name: "abicat_init_logging",
        category: Category::Runtime,
        params: &[],
        returns: TypeShape::Bool,
        ownership: ReturnOwnership::Value,
        summary: "Installs the stderr log subscriber once (ABICAT_LOG filter).",
    },
];

/// Every exported data symbol
pub static DATA: &[DataSymbol] = &[DataSymbol {
    name: "GLOBALINT",
    shape: TypeShape::UInt64,
    initial: GLOBALINT_INITIAL,
}];

/// Declared enumerations
pub static ENUMS: &[EnumDecl] = &[
    EnumDecl {
        name: "MyEnum",
        typedef: true,
        variants: &[
            EnumVariant {
                name: "ENUM_VAL1",
                value: MyEnum::ENUM_VAL1 as c_int,
            },
            EnumVariant {
                name: "ENUM_VAL2",
                value: MyEnum::ENUM_VAL2 as c_int,
            },
        ],
    },
    EnumDecl {
        name: "MyEnumAsInt",
        typedef: false,
        variants: &[
            EnumVariant {
                name: "ENUM_AS_INT_VAL1",
                value: MyEnumAsInt::ENUM_AS_INT_VAL1 as c_int,
            },
            EnumVariant {
                name: "ENUM_AS_INT_VAL2",
                value: MyEnumAsInt::ENUM_AS_INT_VAL2 as c_int,
            },
        ],
    },
];

macro_rules! field {
    ($owner:ty, $field:ident: $fty:ty => $shape:expr) => {
        FieldLayout {
            name: stringify!($field),
            shape: $shape,
            offset: offset_of!($owner, $field),
            size: size_of::<$fty>(),
        }
    };
}

macro_rules! layout {
    ($owner:ty, $name:literal, tagged: $tagged:literal, [$($fields:expr),* $(,)?]) => {
        StructLayout {
            name: $name,
            tagged: $tagged,
            size: size_of::<$owner>(),
            align: align_of::<$owner>(),
            fields: vec![$($fields),*],
        }
    };
}

const ARRAY2: TypeShape = TypeShape::Array {
    of: &TypeShape::Double,
    len: 2,
};
const ARRAY3: TypeShape = TypeShape::Array {
    of: &TypeShape::Double,
    len: 3,
};

/// Layouts of every value struct, in dependency order
pub fn struct_layouts() -> Vec<StructLayout> {
    vec![
        layout!(Double3, "double3", tagged: false, [
            field!(Double3, x: f64 => TypeShape::Double),
            field!(Double3, y: f64 => TypeShape::Double),
            field!(Double3, z: f64 => TypeShape::Double),
        ]),
        layout!(MyStruct, "MyStruct", tagged: true, [
            field!(MyStruct, a: f32 => TypeShape::Float),
            field!(MyStruct, b: *const c_char => TypeShape::CString),
            field!(MyStruct, c: c_int => TypeShape::Int),
        ]),
        layout!(StructWithArray, "StructWithArray", tagged: true, [
            field!(StructWithArray, array1: [f64; 2] => ARRAY2),
            field!(StructWithArray, array2: [f64; 3] => ARRAY3),
        ]),
        layout!(StructWithStruct, "StructWithStruct", tagged: true, [
            field!(StructWithStruct, struct1: StructWithArray => STRUCT_WITH_ARRAY),
            field!(StructWithStruct, struct2: StructWithArray => STRUCT_WITH_ARRAY),
        ]),
    ]
}

/// Look up an exported function by symbol name
pub fn function(name: &str) -> Option<&'static BoundaryFunction> {
    FUNCTIONS.iter().find(|f| f.name == name)
}

/// Functions in one category, in catalogue order
pub fn functions_in(category: Category) -> impl Iterator<Item = &'static BoundaryFunction> {
    FUNCTIONS.iter().filter(move |f| f.category == category)
}

/// Check the catalogue's internal consistency
///
/// - every symbol name is unique
/// - every ownership transfer names a release function
/// - every struct shape used by a function has a layout
pub fn validate() -> Result<(), CatalogueError> {
    let mut seen = HashSet::new();
    let names = FUNCTIONS
        .iter()
        .map(|f| f.name)
        .chain(DATA.iter().map(|d| d.name));
    for name in names {
        if !seen.insert(name) {
            return Err(CatalogueError::DuplicateSymbol(name));
        }
    }

    for f in FUNCTIONS {
        if let Some(release) = f.ownership.release() {
            let is_release = function(release).is_some_and(|r| r.category == Category::Release);
            if !is_release {
                return Err(CatalogueError::MissingRelease {
                    function: f.name,
                    release,
                });
            }
        }
    }

    let layouts = struct_layouts();
    for f in FUNCTIONS {
        let shapes = f.params.iter().map(|p| &p.shape).chain(std::iter::once(&f.returns));
        for shape in shapes {
            if let Some(name) = struct_name(shape) {
                if !layouts.iter().any(|l| l.name == name) {
                    return Err(CatalogueError::UnknownStruct(name));
                }
            }
        }
    }

    Ok(())
}

fn struct_name(shape: &TypeShape) -> Option<&'static str> {
    match shape {
        TypeShape::Struct { name } => Some(name),
        TypeShape::Pointer { to } => struct_name(to),
        TypeShape::Array { of, .. } => struct_name(of),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_catalogue_is_consistent() {
        assert_eq!(validate(), Ok(()));
    }

    #[test]
    fn test_declare_scalars_and_pointers() {
        assert_eq!(TypeShape::UInt64.declare("number"), "uint64_t number");
        assert_eq!(INT_PTR_PTR.declare("a"), "int **a");
        assert_eq!(TypeShape::CString.declare("instr"), "const char *instr");
        assert_eq!(OPAQUE_PTR.c_name(), "MyOpaqueStruct *");
    }

    #[test]
    fn test_declare_callbacks() {
        let cb = TypeShape::Callback {
            params: &[INT],
            returns: &TypeShape::Void,
        };
        assert_eq!(cb.declare("callback"), "void (*callback)(int)");
        assert_eq!(
            FUNCTION_TYPEDEF.typedef_declaration().unwrap(),
            "typedef void (*FunctionTypedef)(void *);"
        );
        assert_eq!(
            INTTYPE.typedef_declaration().unwrap(),
            "typedef int INTTYPE;"
        );
    }

    #[test]
    fn test_prototypes() {
        assert_eq!(
            function("multiply").unwrap().prototype(),
            "int *multiply(int a, int b);"
        );
        assert_eq!(
            function("return_array").unwrap().prototype(),
            "double *return_array(void);"
        );
        assert_eq!(
            function("return_enum_as_int").unwrap().prototype(),
            "enum MyEnumAsInt return_enum_as_int(void);"
        );
        assert_eq!(
            function("accept_fn_pointer_with_primitive_args")
                .unwrap()
                .prototype(),
            "void accept_fn_pointer_with_primitive_args(void (*callback)(int));"
        );
        assert_eq!(
            function("copy_string").unwrap().prototype(),
            "const char *copy_string(const char *instr);"
        );
    }

    #[test]
    fn test_data_symbol_declaration() {
        assert_eq!(DATA[0].declaration(), "extern uint64_t GLOBALINT;");
        assert_eq!(DATA[0].initial, 1u64 << 63);
    }

    #[test]
    fn test_only_one_nullable_callback() {
        let nullable: Vec<_> = FUNCTIONS
            .iter()
            .filter(|f| {
                f.params
                    .iter()
                    .any(|p| p.role == ParamRole::Callback { nullable: true })
            })
            .map(|f| f.name)
            .collect();
        assert_eq!(nullable, vec!["accept_fn_pointer_with_primitive_args"]);
    }

    #[test]
    fn test_struct_layouts_match_c() {
        let layouts = struct_layouts();
        let by_name = |n: &str| layouts.iter().find(|l| l.name == n).unwrap().clone();

        let d3 = by_name("double3");
        assert_eq!((d3.size, d3.padding()), (24, 0));

        let swa = by_name("StructWithArray");
        assert_eq!(swa.size, 40);
        assert_eq!(swa.fields[1].offset, 16);

        let sws = by_name("StructWithStruct");
        assert_eq!(sws.size, 80);
        assert_eq!(sws.fields[1].offset, 40);
    }

    #[test]
    fn test_struct_declarations() {
        let layouts = struct_layouts();
        assert_eq!(
            layouts[0].declaration(),
            "typedef struct {\n    double x;\n    double y;\n    double z;\n} double3;"
        );
        assert_eq!(
            layouts[2].declaration(),
            "struct StructWithArray {\n    double array1[2];\n    double array2[3];\n};\ntypedef struct StructWithArray StructWithArray;"
        );
    }

    #[test]
    fn test_enum_declaration() {
        assert_eq!(
            ENUMS[0].declaration(),
            "enum MyEnum {\n    ENUM_VAL1 = 0,\n    ENUM_VAL2 = 1,\n};\ntypedef enum MyEnum MyEnum;"
        );
        assert!(!ENUMS[1].declaration().contains("typedef"));
    }

    #[test]
    fn test_serializes_to_json() {
        let json = serde_json::to_value(function("ptr_ptr").unwrap()).unwrap();
        assert_eq!(json["ownership"], "transferred");
        assert_eq!(json["release"], "free_ptr_ptr");
        assert_eq!(json["params"][0]["role"], "read_through");
        assert_eq!(json["returns"]["kind"], "pointer");
    }

    #[test]
    fn test_is_indirect() {
        assert!(FUNCTION_TYPEDEF.is_indirect());
        assert!(TypeShape::CString.is_indirect());
        assert!(!INTTYPE.is_indirect());
        assert!(!DOUBLE3.is_indirect());
    }
}

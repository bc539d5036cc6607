//! Declarative type descriptors
//!
//! Rust has no runtime reflection, so the type resolver works against
//! descriptors instead: every describable type reports its kind, its declared
//! identity and (for records) its ordered fields. Descriptors are usually
//! produced by `#[derive(Describe)]`, but they can also be written by hand or
//! built from parsed source.
//!
//! Nested types are reached through [`TypeRef`], which is evaluated lazily.
//! That keeps self-referential types describable: describing `Node` never
//! describes `Node` again until the resolver asks for the field's type, and
//! by then the resolver has already registered `Node`.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::rc::Rc;
use std::sync::Arc;

/// Identity of a named native type.
///
/// Two descriptors with the same `path` are the same type. `name` is the
/// declared name and only a naming candidate; it need not be unique.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeIdentity {
    pub path: String,
    pub name: String,
}

impl TypeIdentity {
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
        }
    }

    /// Identity keyed on the compiler's full type name, so each generic
    /// instantiation is a distinct type.
    pub fn of<T: ?Sized>(name: impl Into<String>) -> Self {
        Self::new(std::any::type_name::<T>(), name)
    }
}

/// Lazily evaluated handle to a type descriptor
#[derive(Clone)]
pub struct TypeRef(Arc<dyn Fn() -> TypeDescriptor + Send + Sync>);

impl TypeRef {
    /// Reference to a type implementing [`Describe`]
    pub fn of<T: Describe + ?Sized + 'static>() -> Self {
        Self(Arc::new(T::describe))
    }

    /// Reference to an already built descriptor
    pub fn new(descriptor: TypeDescriptor) -> Self {
        Self(Arc::new(move || descriptor.clone()))
    }

    /// Reference computed on demand
    pub fn lazy(f: impl Fn() -> TypeDescriptor + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Evaluate the referenced descriptor
    pub fn get(&self) -> TypeDescriptor {
        (self.0)()
    }
}

impl std::fmt::Debug for TypeRef {
    // Evaluating here could recurse forever on cyclic types.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TypeRef(..)")
    }
}

/// Description of a native type's shape
#[derive(Debug, Clone)]
pub enum TypeDescriptor {
    Bool,
    String,
    /// Date-time serialized as an RFC 3339 string
    Timestamp,
    Int8,
    Int16,
    Int32,
    /// Has no JTD representation; resolution fails
    Int64,
    Uint8,
    Uint16,
    Uint32,
    /// Has no JTD representation; resolution fails
    Uint64,
    Float32,
    Float64,
    /// Pointer or optional reference; may be null
    Nullable(TypeRef),
    /// Ordered homogeneous sequence
    Sequence(TypeRef),
    /// String-keyed map to a homogeneous value type
    Map(TypeRef),
    Struct(StructDescriptor),
    Enum(EnumDescriptor),
    /// Named wrapper serialized as its single inner value
    Newtype(NewtypeDescriptor),
    /// Serializes itself to a JSON string
    TextLike,
    /// Serializes itself to an arbitrary JSON shape
    Opaque,
    /// Open polymorphic value with no statically known variants
    Dynamic,
    /// No payload at all
    Unit,
    /// A kind the resolver cannot represent
    Unsupported(String),
}

impl TypeDescriptor {
    /// Short human-readable kind name used in errors and logs
    pub fn type_name(&self) -> String {
        match self {
            TypeDescriptor::Bool => "bool".into(),
            TypeDescriptor::String => "string".into(),
            TypeDescriptor::Timestamp => "timestamp".into(),
            TypeDescriptor::Int8 => "int8".into(),
            TypeDescriptor::Int16 => "int16".into(),
            TypeDescriptor::Int32 => "int32".into(),
            TypeDescriptor::Int64 => "int64".into(),
            TypeDescriptor::Uint8 => "uint8".into(),
            TypeDescriptor::Uint16 => "uint16".into(),
            TypeDescriptor::Uint32 => "uint32".into(),
            TypeDescriptor::Uint64 => "uint64".into(),
            TypeDescriptor::Float32 => "float32".into(),
            TypeDescriptor::Float64 => "float64".into(),
            TypeDescriptor::Nullable(_) => "nullable".into(),
            TypeDescriptor::Sequence(_) => "sequence".into(),
            TypeDescriptor::Map(_) => "map".into(),
            TypeDescriptor::Struct(s) => match &s.identity {
                Some(identity) => identity.name.clone(),
                None => "struct".into(),
            },
            TypeDescriptor::Enum(e) => match &e.identity {
                Some(identity) => identity.name.clone(),
                None => "enum".into(),
            },
            TypeDescriptor::Newtype(n) => n.identity.name.clone(),
            TypeDescriptor::TextLike => "text".into(),
            TypeDescriptor::Opaque => "opaque".into(),
            TypeDescriptor::Dynamic => "dynamic".into(),
            TypeDescriptor::Unit => "unit".into(),
            TypeDescriptor::Unsupported(name) => name.clone(),
        }
    }

    /// External field names of a record, in declaration order
    pub fn field_names(&self) -> Vec<String> {
        match self {
            TypeDescriptor::Struct(s) => s
                .fields
                .iter()
                .map(|f| f.external_name().to_string())
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// A record type
#[derive(Debug, Clone, Default)]
pub struct StructDescriptor {
    /// `None` for anonymous records, which are always inlined
    pub identity: Option<TypeIdentity>,
    pub fields: Vec<FieldDescriptor>,
}

impl StructDescriptor {
    pub fn named(identity: TypeIdentity) -> Self {
        Self {
            identity: Some(identity),
            fields: Vec::new(),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }
}

/// A record field
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    /// Declared name
    pub name: String,
    /// Serialization name override
    pub rename: Option<String>,
    /// Omitted from the output when absent
    pub optional: bool,
    pub ty: TypeRef,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            rename: None,
            optional: false,
            ty,
        }
    }

    pub fn rename(mut self, name: impl Into<String>) -> Self {
        self.rename = Some(name.into());
        self
    }

    pub fn optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    /// Name the field has on the wire
    pub fn external_name(&self) -> &str {
        self.rename.as_deref().unwrap_or(&self.name)
    }
}

/// A closed set of string literals
#[derive(Debug, Clone, Default)]
pub struct EnumDescriptor {
    pub identity: Option<TypeIdentity>,
    pub values: Vec<String>,
}

impl EnumDescriptor {
    pub fn named<I, S>(identity: TypeIdentity, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            identity: Some(identity),
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

/// A named single-field wrapper.
///
/// Inlined as its inner type's schema unless the inner type leads back to
/// the wrapper, in which case the wrapper becomes a named definition.
#[derive(Debug, Clone)]
pub struct NewtypeDescriptor {
    pub identity: TypeIdentity,
    pub inner: TypeRef,
}

impl NewtypeDescriptor {
    pub fn new(identity: TypeIdentity, inner: TypeRef) -> Self {
        Self { identity, inner }
    }
}

/// Types that can describe their own shape.
///
/// Usually derived with `#[derive(Describe)]`.
pub trait Describe {
    fn describe() -> TypeDescriptor;
}

macro_rules! describe_as {
    ($variant:ident => $($ty:ty),+ $(,)?) => {
        $(
            impl Describe for $ty {
                fn describe() -> TypeDescriptor {
                    TypeDescriptor::$variant
                }
            }
        )+
    };
}

describe_as!(Bool => bool);
describe_as!(String => String, str, char);
describe_as!(Int8 => i8);
describe_as!(Int16 => i16);
describe_as!(Int32 => i32);
describe_as!(Int64 => i64, i128, isize);
describe_as!(Uint8 => u8);
describe_as!(Uint16 => u16);
describe_as!(Uint32 => u32);
describe_as!(Uint64 => u64, u128, usize);
describe_as!(Float32 => f32);
describe_as!(Float64 => f64);
describe_as!(Dynamic => serde_json::Value);
describe_as!(Unit => ());
describe_as!(TextLike => chrono::NaiveDate, chrono::NaiveDateTime, chrono::NaiveTime);

impl<Tz: chrono::TimeZone> Describe for chrono::DateTime<Tz> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::Timestamp
    }
}

impl<T: Describe + 'static> Describe for Option<T> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::Nullable(TypeRef::of::<T>())
    }
}

macro_rules! describe_transparent {
    ($($wrapper:ident),+) => {
        $(
            impl<T: Describe + ?Sized + 'static> Describe for $wrapper<T> {
                fn describe() -> TypeDescriptor {
                    T::describe()
                }
            }
        )+
    };
}

describe_transparent!(Box, Rc, Arc);

impl<T: Describe + ?Sized> Describe for &T {
    fn describe() -> TypeDescriptor {
        T::describe()
    }
}

macro_rules! describe_sequence {
    ($($seq:ident),+) => {
        $(
            impl<T: Describe + 'static> Describe for $seq<T> {
                fn describe() -> TypeDescriptor {
                    TypeDescriptor::Sequence(TypeRef::of::<T>())
                }
            }
        )+
    };
}

describe_sequence!(Vec, VecDeque, BTreeSet);

impl<T: Describe + 'static> Describe for [T] {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::Sequence(TypeRef::of::<T>())
    }
}

impl<T: Describe + 'static, S> Describe for HashSet<T, S> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::Sequence(TypeRef::of::<T>())
    }
}

impl<V: Describe + 'static, S> Describe for HashMap<String, V, S> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::Map(TypeRef::of::<V>())
    }
}

impl<V: Describe + 'static> Describe for BTreeMap<String, V> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::Map(TypeRef::of::<V>())
    }
}

impl Describe for serde_json::Map<String, serde_json::Value> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::Map(TypeRef::of::<serde_json::Value>())
    }
}

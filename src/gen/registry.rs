//! Name-based generator lookup
//!
//! [`TypeRegistry`] maps canonical type names to generator factories, and
//! aliases to canonical names. Aliases are normalized before lookup, so a
//! fully-qualified path, a short primitive name, and the boxed names used by
//! JVM-hosted suites all reach the same generator. Container names with one
//! type argument (`Vec<i32>`, `List<String>`, `Set<...>`) are resolved
//! recursively.
//!
//! Values are produced as [`Value`], whose [`Value::type_name`] reports the
//! canonical name of the type it holds.

use std::collections::HashMap;
use std::fmt;

use log::debug;
use once_cell::sync::Lazy;

use super::{bools, bytes, doubles, floats, ints, lists, longs, shorts, strings};
use super::{BoxedGen, GenError, GenExt};

/// A dynamically typed generated value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Bool(bool),
    Float(f32),
    Double(f64),
    List(Vec<Value>),
    Set(Vec<Value>),
}

impl Value {
    /// Canonical name of the held type
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Text(_) => "String",
            Value::Byte(_) => "i8",
            Value::Short(_) => "i16",
            Value::Int(_) => "i32",
            Value::Long(_) => "i64",
            Value::Bool(_) => "bool",
            Value::Float(_) => "f32",
            Value::Double(_) => "f64",
            Value::List(_) => "Vec",
            Value::Set(_) => "BTreeSet",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => write!(f, "{:?}", s),
            Value::Byte(v) => write!(f, "{}", v),
            Value::Short(v) => write!(f, "{}", v),
            Value::Int(v) => write!(f, "{}", v),
            Value::Long(v) => write!(f, "{}", v),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Double(v) => write!(f, "{}", v),
            Value::List(items) | Value::Set(items) => {
                let (open, close) = match self {
                    Value::Set(_) => ('{', '}'),
                    _ => ('[', ']'),
                };
                write!(f, "{}", open)?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "{}", close)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ContainerKind {
    List,
    Set,
}

type Factory = Box<dyn Fn() -> BoxedGen<Value> + Send + Sync>;

const SCALAR_ALIASES: &[(&str, &[&str])] = &[
    (
        "String",
        &[
            "alloc::string::String",
            "std::string::String",
            "str",
            "&str",
            "java.lang.String",
            "kotlin.String",
        ],
    ),
    ("i8", &["core::primitive::i8", "std::primitive::i8", "java.lang.Byte", "kotlin.Byte"]),
    ("i16", &["core::primitive::i16", "std::primitive::i16", "java.lang.Short", "kotlin.Short"]),
    ("i32", &["core::primitive::i32", "std::primitive::i32", "java.lang.Integer", "kotlin.Int"]),
    ("i64", &["core::primitive::i64", "std::primitive::i64", "java.lang.Long", "kotlin.Long"]),
    (
        "bool",
        &["core::primitive::bool", "std::primitive::bool", "java.lang.Boolean", "kotlin.Boolean"],
    ),
    ("f32", &["core::primitive::f32", "std::primitive::f32", "java.lang.Float", "kotlin.Float"]),
    ("f64", &["core::primitive::f64", "std::primitive::f64", "java.lang.Double", "kotlin.Double"]),
];

const CONTAINER_ALIASES: &[(&str, ContainerKind, &[&str])] = &[
    (
        "Vec",
        ContainerKind::List,
        &[
            "alloc::vec::Vec",
            "std::vec::Vec",
            "List",
            "java.util.List",
            "java.util.ArrayList",
            "kotlin.collections.List",
            "kotlin.collections.MutableList",
        ],
    ),
    (
        "BTreeSet",
        ContainerKind::Set,
        &[
            "alloc::collections::btree::set::BTreeSet",
            "std::collections::BTreeSet",
            "HashSet",
            "std::collections::HashSet",
            "std::collections::hash::set::HashSet",
            "Set",
            "java.util.Set",
            "java.util.HashSet",
            "kotlin.collections.Set",
            "kotlin.collections.MutableSet",
        ],
    ),
];

/// Registry of generators addressable by type name
pub struct TypeRegistry {
    generators: HashMap<String, Factory>,
    containers: HashMap<String, ContainerKind>,
    aliases: HashMap<String, String>,
}

impl TypeRegistry {
    /// A registry without any types
    pub fn empty() -> Self {
        Self {
            generators: HashMap::new(),
            containers: HashMap::new(),
            aliases: HashMap::new(),
        }
    }

    /// A registry with the built-in scalar and container types
    pub fn new() -> Self {
        let mut registry = Self::empty();

        registry.register("String", || strings().map(Value::Text).boxed());
        registry.register("i8", || bytes().map(Value::Byte).boxed());
        registry.register("i16", || shorts().map(Value::Short).boxed());
        registry.register("i32", || ints().map(Value::Int).boxed());
        registry.register("i64", || longs().map(Value::Long).boxed());
        registry.register("bool", || bools().map(Value::Bool).boxed());
        registry.register("f32", || floats().map(Value::Float).boxed());
        registry.register("f64", || doubles().map(Value::Double).boxed());

        for (canonical, aliases) in SCALAR_ALIASES {
            for alias in aliases.iter() {
                registry.register_alias(alias, canonical);
            }
        }
        for (canonical, kind, aliases) in CONTAINER_ALIASES {
            registry.containers.insert(canonical.to_string(), *kind);
            for alias in aliases.iter() {
                registry.register_alias(alias, canonical);
            }
        }

        registry
    }

    /// Register a generator factory under a canonical name
    pub fn register<F>(&mut self, canonical: &str, factory: F)
    where
        F: Fn() -> BoxedGen<Value> + Send + Sync + 'static,
    {
        self.generators.insert(canonical.to_string(), Box::new(factory));
    }

    /// Make `alias` resolve to the same generator as `canonical`
    pub fn register_alias(&mut self, alias: &str, canonical: &str) {
        self.aliases.insert(alias.to_string(), canonical.to_string());
    }

    /// The canonical form of `name`, or `name` itself when it is not an alias.
    pub fn canonical_name<'a>(&'a self, name: &'a str) -> &'a str {
        self.aliases.get(name).map(String::as_str).unwrap_or(name)
    }

    /// Canonical names of every registered scalar type
    pub fn type_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.generators.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Build a generator for the type called `name`.
    pub fn resolve(&self, name: &str) -> Result<BoxedGen<Value>, GenError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GenError::MalformedTypeName(name.to_string()));
        }

        let open = match name.find('<') {
            Some(open) => open,
            None => return self.resolve_scalar(name),
        };

        if !name.ends_with('>') || !brackets_balanced(name) {
            return Err(GenError::MalformedTypeName(name.to_string()));
        }
        let outer = name[..open].trim();
        let inner = name[open + 1..name.len() - 1].trim();
        if outer.is_empty() || inner.is_empty() {
            return Err(GenError::MalformedTypeName(name.to_string()));
        }
        if has_top_level_comma(inner) {
            return Err(GenError::UnknownType(name.to_string()));
        }

        let kind = self
            .containers
            .get(self.canonical_name(outer))
            .copied()
            .ok_or_else(|| GenError::UnknownType(name.to_string()))?;
        let element = self.resolve(inner)?;
        debug!("Resolved container type {} as {:?}", name, kind);

        Ok(match kind {
            ContainerKind::List => lists(element).map(Value::List).boxed(),
            ContainerKind::Set => lists(element).map(distinct).boxed(),
        })
    }

    fn resolve_scalar(&self, name: &str) -> Result<BoxedGen<Value>, GenError> {
        if name.contains('>') || name.contains(',') {
            return Err(GenError::MalformedTypeName(name.to_string()));
        }
        let canonical = self.canonical_name(name);
        match self.generators.get(canonical) {
            Some(factory) => Ok(factory()),
            None => Err(GenError::UnknownType(name.to_string())),
        }
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn distinct(items: Vec<Value>) -> Value {
    let mut unique: Vec<Value> = Vec::with_capacity(items.len());
    for item in items {
        if !unique.contains(&item) {
            unique.push(item);
        }
    }
    Value::Set(unique)
}

fn brackets_balanced(name: &str) -> bool {
    let mut depth = 0usize;
    for c in name.chars() {
        match c {
            '<' => depth += 1,
            '>' => match depth.checked_sub(1) {
                Some(d) => depth = d,
                None => return false,
            },
            _ => {}
        }
    }
    depth == 0
}

fn has_top_level_comma(inner: &str) -> bool {
    let mut depth = 0usize;
    for c in inner.chars() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => return true,
            _ => {}
        }
    }
    false
}

static DEFAULT_REGISTRY: Lazy<TypeRegistry> = Lazy::new(TypeRegistry::new);

/// Resolve a generator by type name through the built-in registry.
pub fn for_class_name(name: &str) -> Result<BoxedGen<Value>, GenError> {
    DEFAULT_REGISTRY.resolve(name)
}

/// Resolve a generator for `T` by its [`std::any::type_name`] at runtime.
pub fn try_default<T: ?Sized>() -> Result<BoxedGen<Value>, GenError> {
    for_class_name(std::any::type_name::<T>())
}

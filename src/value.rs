//! The host value model that assertions compare.
//!
//! Examples in a casebook describe the behavior of a dynamically typed host,
//! so assertions need values that carry a runtime type tag, two distinct
//! "absent" markers, unique symbols, and reference-identity composites.
//! [`Value`] models exactly that and nothing more.

use im::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_SYMBOL_ID: AtomicU64 = AtomicU64::new(1);

/// Runtime type tag of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Undefined,
    Null,
    Boolean,
    Number,
    String,
    Symbol,
    Array,
    Object,
}

impl TypeTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeTag::Undefined => "undefined",
            TypeTag::Null => "null",
            TypeTag::Boolean => "boolean",
            TypeTag::Number => "number",
            TypeTag::String => "string",
            TypeTag::Symbol => "symbol",
            TypeTag::Array => "array",
            TypeTag::Object => "object",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A unique symbol. Two symbols are the same only if they came from the same
/// call to [`Symbol::new`], whatever their descriptions say.
#[derive(Debug, Clone)]
pub struct Symbol {
    id: u64,
    description: Option<Arc<str>>,
}

impl Symbol {
    pub fn new(description: Option<&str>) -> Self {
        Self {
            id: NEXT_SYMBOL_ID.fetch_add(1, Ordering::Relaxed),
            description: description.map(Arc::from),
        }
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.description().unwrap_or(""))
    }
}

/// A keyed bag of properties with an optional class tag.
///
/// Property order is never observable: rendering sorts keys, and equality
/// ignores insertion order.
#[derive(Debug, Clone, Default)]
pub struct Object {
    class: Option<String>,
    fields: HashMap<String, Value>,
}

impl Object {
    /// Creates a plain object literal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an instance tagged with a class name.
    pub fn instance(class: impl Into<String>) -> Self {
        Self {
            class: Some(class.into()),
            fields: HashMap::new(),
        }
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn class(&self) -> Option<&str> {
        self.class.as_deref()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Keys in sorted order.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.fields.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Object spread: `{ ...self, ...other }`. The result is a plain object;
    /// spreading never copies a class tag.
    pub fn spread(&self, other: &Object) -> Object {
        let mut fields = self.fields.clone();
        for (key, value) in other.fields.iter() {
            fields.insert(key.clone(), value.clone());
        }
        Object { class: None, fields }
    }

    /// A copy of this object without `key`.
    pub fn without(&self, key: &str) -> Object {
        Object {
            class: self.class.clone(),
            fields: self.fields.without(key),
        }
    }

    fn visible_fields(&self, strict: bool) -> impl Iterator<Item = (&String, &Value)> {
        self.fields
            .iter()
            .filter(move |(_, value)| strict || !value.is_undefined())
    }
}

/// A host value.
///
/// Arrays and objects are shared references: cloning a `Value` aliases the
/// same composite, which is what [`Value::same_value`] observes.
///
/// # Examples
///
/// ```rust
/// use casebook::value::{TypeTag, Value};
/// let n = Value::from(3);
/// assert_eq!(n.type_tag(), TypeTag::Number);
/// assert!(Value::default().is_undefined());
/// assert!(!Value::Null.loose_equals(&Value::Undefined));
/// ```
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Symbol(Symbol),
    Array(Arc<Vec<Value>>),
    Object(Arc<Object>),
}

impl Value {
    pub fn array<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Value::Array(Arc::new(items.into_iter().map(Into::into).collect()))
    }

    pub fn symbol(description: &str) -> Self {
        Value::Symbol(Symbol::new(Some(description)))
    }

    pub fn type_tag(&self) -> TypeTag {
        match self {
            Value::Undefined => TypeTag::Undefined,
            Value::Null => TypeTag::Null,
            Value::Bool(_) => TypeTag::Boolean,
            Value::Number(_) => TypeTag::Number,
            Value::String(_) => TypeTag::String,
            Value::Symbol(_) => TypeTag::Symbol,
            Value::Array(_) => TypeTag::Array,
            Value::Object(_) => TypeTag::Object,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Property access. Anything that is not an object, or a missing key,
    /// reads as `Undefined`.
    pub fn get(&self, key: &str) -> Value {
        match self {
            Value::Object(object) => object.get(key).cloned().unwrap_or_default(),
            _ => Value::Undefined,
        }
    }

    /// Index access on arrays; out of range reads as `Undefined`.
    pub fn index(&self, index: usize) -> Value {
        match self {
            Value::Array(items) => items.get(index).cloned().unwrap_or_default(),
            _ => Value::Undefined,
        }
    }

    /// Host truthiness: `""`, `0`, `-0`, `NaN`, `null`, `undefined` and
    /// `false` are falsy; everything else is truthy.
    ///
    /// ```rust
    /// use casebook::value::Value;
    /// assert!(!Value::from("").is_truthy());
    /// assert!(!Value::from(f64::NAN).is_truthy());
    /// assert!(Value::from("0").is_truthy());
    /// assert!(casebook::array![].is_truthy());
    /// ```
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => !(*n == 0.0 || n.is_nan()),
            Value::String(s) => !s.is_empty(),
            Value::Symbol(_) | Value::Array(_) | Value::Object(_) => true,
        }
    }

    /// SameValue: primitives by value (`NaN` is itself, `0` is not `-0`),
    /// symbols and composites by identity.
    pub fn same_value(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => same_number(*a, *b),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => Arc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Structural equality that ignores class tags and `undefined`-valued
    /// properties.
    pub fn loose_equals(&self, other: &Value) -> bool {
        deep_equals(self, other, false)
    }

    /// Structural equality that also requires matching type tags at every
    /// level, class tags included.
    pub fn strict_equals(&self, other: &Value) -> bool {
        deep_equals(self, other, true)
    }

    /// Recursive subset match: every property of `subset` must be present on
    /// `self` and match; arrays match element-wise with equal length.
    pub fn matches_subset(&self, subset: &Value) -> bool {
        match (self, subset) {
            (Value::Object(actual), Value::Object(subset)) => {
                subset.fields.iter().all(|(key, expected)| {
                    actual
                        .get(key)
                        .is_some_and(|value| value.matches_subset(expected))
                })
            }
            (Value::Array(actual), Value::Array(subset)) => {
                actual.len() == subset.len()
                    && actual
                        .iter()
                        .zip(subset.iter())
                        .all(|(value, expected)| value.matches_subset(expected))
            }
            _ => self.loose_equals(subset),
        }
    }

    /// Multi-line rendering used for diffs. Primitives and empty composites
    /// render on one line.
    pub fn pretty(&self) -> String {
        let mut out = String::new();
        render(self, &mut out, Some(0));
        out
    }
}

fn same_number(a: f64, b: f64) -> bool {
    if a.is_nan() && b.is_nan() {
        return true;
    }
    a == b && a.is_sign_negative() == b.is_sign_negative()
}

fn deep_equals(a: &Value, b: &Value, strict: bool) -> bool {
    match (a, b) {
        (Value::Array(x), Value::Array(y)) => {
            Arc::ptr_eq(x, y)
                || (x.len() == y.len()
                    && x.iter().zip(y.iter()).all(|(l, r)| deep_equals(l, r, strict)))
        }
        (Value::Object(x), Value::Object(y)) => {
            if Arc::ptr_eq(x, y) {
                return true;
            }
            if strict && x.class != y.class {
                return false;
            }
            if x.visible_fields(strict).count() != y.visible_fields(strict).count() {
                return false;
            }
            x.visible_fields(strict).all(|(key, value)| {
                y.fields
                    .get(key)
                    .is_some_and(|other| deep_equals(value, other, strict))
            })
        }
        _ => a.same_value(b),
    }
}

fn render_number(n: f64, out: &mut String) {
    if n.is_nan() {
        out.push_str("NaN");
    } else if n.is_infinite() {
        out.push_str(if n > 0.0 { "Infinity" } else { "-Infinity" });
    } else {
        out.push_str(&n.to_string());
    }
}

// `indent: None` renders compactly on one line.
fn render(value: &Value, out: &mut String, indent: Option<usize>) {
    match value {
        Value::Undefined => out.push_str("undefined"),
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => render_number(*n, out),
        Value::String(s) => out.push_str(&format!("{s:?}")),
        Value::Symbol(symbol) => out.push_str(&symbol.to_string()),
        Value::Array(items) => {
            if items.is_empty() {
                out.push_str("[]");
                return;
            }
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                separator(out, i, indent);
                render(item, out, indent.map(|n| n + 1));
            }
            close(out, indent, ']');
        }
        Value::Object(object) => {
            if let Some(class) = object.class() {
                out.push_str(class);
                out.push(' ');
            }
            if object.is_empty() {
                out.push_str("{}");
                return;
            }
            out.push('{');
            for (i, key) in object.keys().into_iter().enumerate() {
                separator(out, i, indent);
                out.push_str(key);
                out.push_str(": ");
                if let Some(field) = object.get(key) {
                    render(field, out, indent.map(|n| n + 1));
                }
            }
            close(out, indent, '}');
        }
    }
}

fn separator(out: &mut String, position: usize, indent: Option<usize>) {
    match indent {
        Some(level) => {
            if position > 0 {
                out.push(',');
            }
            out.push('\n');
            out.push_str(&"  ".repeat(level + 1));
        }
        None if position > 0 => out.push_str(", "),
        None => {}
    }
}

fn close(out: &mut String, indent: Option<usize>, delimiter: char) {
    if let Some(level) = indent {
        out.push('\n');
        out.push_str(&"  ".repeat(level));
    }
    out.push(delimiter);
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        render(self, &mut out, None);
        f.write_str(&out)
    }
}

/// `==` on values is strict structural equality.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.strict_equals(other)
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Undefined
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::Number(n.into())
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n.into())
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(n.into())
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::String(s.clone())
    }
}

impl From<Symbol> for Value {
    fn from(symbol: Symbol) -> Self {
        Value::Symbol(symbol)
    }
}

impl From<Object> for Value {
    fn from(object: Object) -> Self {
        Value::Object(Arc::new(object))
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::array(items)
    }
}

/// Builds an array [`Value`] from expressions convertible into values.
#[macro_export]
macro_rules! array {
    () => {
        $crate::value::Value::array(::std::iter::empty::<$crate::value::Value>())
    };
    ($($item:expr),+ $(,)?) => {
        $crate::value::Value::array([$($crate::value::Value::from($item)),+])
    };
}

/// Builds a plain object [`Value`] from `key => value` pairs.
#[macro_export]
macro_rules! object {
    () => {
        $crate::value::Value::from($crate::value::Object::new())
    };
    ($($key:expr => $val:expr),+ $(,)?) => {
        $crate::value::Value::from($crate::value::Object::new()$(.with($key, $val))+)
    };
}

//! Process-wide value resolvers.
//!
//! When a builder receives a string or an opaque object it cannot convert
//! directly, it asks the resolver registry for a converter keyed by the
//! target [`VectorType`] (and, for objects, the concrete Rust type). String
//! parsers for every primitive kind are installed by default; users may
//! register more or replace them.
//!
//! A converter returning `None` means "cannot convert"; the builder then
//! stores NA.

use std::any::{Any, TypeId};
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use stratum_core::{na, Complex, Logical};

use crate::value::Value;
use crate::vector_type::VectorType;

type StrConverter = Arc<dyn Fn(&str) -> Option<Value> + Send + Sync>;
type AnyConverter = Arc<dyn Fn(&(dyn Any + Send + Sync)) -> Option<Value> + Send + Sync>;

struct Registry {
    strings: FxHashMap<VectorType, StrConverter>,
    objects: FxHashMap<(VectorType, TypeId), AnyConverter>,
}

impl Registry {
    fn with_defaults() -> Self {
        let mut strings: FxHashMap<VectorType, StrConverter> = FxHashMap::default();
        strings.insert(
            VectorType::Double,
            Arc::new(|s: &str| {
                parse_or_na(s, Value::Double(na::double()), |s| {
                    s.parse::<f64>().ok().map(Value::Double)
                })
            }),
        );
        strings.insert(
            VectorType::Int,
            Arc::new(|s: &str| {
                parse_or_na(s, Value::Int(na::INT), |s| s.parse::<i32>().ok().map(Value::Int))
            }),
        );
        strings.insert(
            VectorType::Long,
            Arc::new(|s: &str| {
                parse_or_na(s, Value::Long(na::LONG), |s| s.parse::<i64>().ok().map(Value::Long))
            }),
        );
        strings.insert(
            VectorType::Logical,
            Arc::new(|s: &str| s.trim().parse::<Logical>().ok().map(Value::Logical)),
        );
        strings.insert(
            VectorType::Complex,
            Arc::new(|s: &str| s.trim().parse::<Complex>().ok().map(Value::Complex)),
        );
        Self {
            strings,
            objects: FxHashMap::default(),
        }
    }
}

fn parse_or_na(s: &str, na: Value, parse: impl Fn(&str) -> Option<Value>) -> Option<Value> {
    let s = s.trim();
    if s == "NA" {
        Some(na)
    } else {
        parse(s)
    }
}

fn registry() -> &'static RwLock<Registry> {
    static REGISTRY: OnceLock<RwLock<Registry>> = OnceLock::new();
    REGISTRY.get_or_init(|| RwLock::new(Registry::with_defaults()))
}

/// Register a string converter for `target`, replacing any existing one.
pub fn register_str<F>(target: VectorType, converter: F)
where
    F: Fn(&str) -> Option<Value> + Send + Sync + 'static,
{
    tracing::debug!(vector_type = %target, "registering string resolver");
    registry().write().strings.insert(target, Arc::new(converter));
}

/// Register a converter from objects of type `S` to `target`, replacing any
/// existing one.
pub fn register<S, F>(target: VectorType, converter: F)
where
    S: Any + Send + Sync,
    F: Fn(&S) -> Option<Value> + Send + Sync + 'static,
{
    tracing::debug!(
        vector_type = %target,
        source = std::any::type_name::<S>(),
        "registering object resolver"
    );
    let converter: AnyConverter = Arc::new(move |obj: &(dyn Any + Send + Sync)| {
        obj.downcast_ref::<S>().and_then(&converter)
    });
    registry()
        .write()
        .objects
        .insert((target, TypeId::of::<S>()), converter);
}

/// Convert `value` to `target` with a registered converter. Only strings
/// and objects are resolved; every other value yields `None`.
pub fn resolve(target: VectorType, value: &Value) -> Option<Value> {
    match value {
        Value::Str(s) => {
            // Release the lock before running user code.
            let converter = registry().read().strings.get(&target).cloned();
            converter.and_then(|convert| convert(&**s))
        }
        Value::Any(obj) => {
            let obj: &(dyn Any + Send + Sync) = &**obj;
            let converter = registry()
                .read()
                .objects
                .get(&(target, obj.type_id()))
                .cloned();
            converter.and_then(|convert| convert(obj))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stratum_core::NaValue;

    #[test]
    fn test_default_string_parsers() {
        assert!(matches!(
            resolve(VectorType::Double, &Value::from(" 2.5 ")),
            Some(Value::Double(x)) if x == 2.5
        ));
        assert!(matches!(
            resolve(VectorType::Int, &Value::from("42")),
            Some(Value::Int(42))
        ));
        assert!(matches!(
            resolve(VectorType::Logical, &Value::from("TRUE")),
            Some(Value::Logical(Logical::True))
        ));
        assert!(resolve(VectorType::Int, &Value::from("4.5")).is_none());
    }

    #[test]
    fn test_na_strings_resolve_to_na() {
        for ty in [VectorType::Double, VectorType::Int, VectorType::Long] {
            let v = resolve(ty, &Value::from("NA")).unwrap();
            assert!(v.is_na());
        }
        let v = resolve(VectorType::Double, &Value::from("NA")).unwrap();
        assert!(matches!(v, Value::Double(x) if x.is_na()));
    }

    #[test]
    fn test_non_resolvable_values() {
        assert!(resolve(VectorType::Double, &Value::Int(1)).is_none());
        assert!(resolve(VectorType::String, &Value::from("x")).is_none());
    }

    #[test]
    fn test_object_resolver() {
        struct Celsius(f64);
        register::<Celsius, _>(VectorType::Double, |c| Some(Value::Double(c.0)));
        assert!(matches!(
            resolve(VectorType::Double, &Value::any(Celsius(21.5))),
            Some(Value::Double(x)) if x == 21.5
        ));
        assert!(resolve(VectorType::Int, &Value::any(Celsius(1.0))).is_none());
    }
}

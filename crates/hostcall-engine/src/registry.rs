//! Native function registry
//!
//! Maps exposed names to [`NativeFunction`] entries. The map sits behind a
//! reader/writer lock: lookups share it, registration takes it exclusively.
//! Lookups hand out a cloned entry, so no lock is held while a native runs.

use std::fmt;
use std::sync::Arc;

use hostcall_sdk::{Arity, BridgeResult, ErrorInfo, IntoNativeFn, NativeFn};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::naming::NamePolicy;

/// A registered native function: exposed name, declared arity and body.
#[derive(Clone)]
pub struct NativeFunction {
    name: Arc<str>,
    arity: Arity,
    body: NativeFn,
}

impl NativeFunction {
    /// Name the function is exposed under
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared arity
    pub fn arity(&self) -> Arity {
        self.arity
    }

    /// Function body
    pub fn body(&self) -> &NativeFn {
        &self.body
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFunction")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish()
    }
}

/// Name to function table of one session.
pub struct FunctionRegistry {
    functions: RwLock<FxHashMap<Arc<str>, NativeFunction>>,
    names: NamePolicy,
}

impl FunctionRegistry {
    /// Create an empty registry accepting names under `names`
    pub fn new(names: NamePolicy) -> Self {
        Self {
            functions: RwLock::new(FxHashMap::default()),
            names,
        }
    }

    /// Naming policy of this registry
    pub fn name_policy(&self) -> NamePolicy {
        self.names
    }

    fn entry(&self, name: &str, body: NativeFn, arity: Arity) -> BridgeResult<NativeFunction> {
        if !self.names.accepts(name) {
            return Err(ErrorInfo::invalid_name(name));
        }
        if let Some(intrinsic) = body.intrinsic_arity() {
            if arity != Arity::Fixed(intrinsic) {
                return Err(ErrorInfo::arity_conflict(name, arity, intrinsic));
            }
        }
        Ok(NativeFunction {
            name: Arc::from(name),
            arity,
            body,
        })
    }

    /// Register a function under a new name.
    ///
    /// Fails with `DuplicateName` if the name is taken; the existing entry is
    /// left untouched.
    pub fn register(&self, name: &str, function: NativeFn, arity: impl Into<Arity>) -> BridgeResult<()> {
        let arity = arity.into();
        let entry = self.entry(name, function, arity)?;

        let mut functions = self.functions.write();
        if functions.contains_key(name) {
            return Err(ErrorInfo::duplicate_name(name));
        }
        functions.insert(entry.name.clone(), entry);
        drop(functions);

        tracing::debug!(target: "hostcall::registry", "registered '{}' (arity {})", name, arity);
        Ok(())
    }

    /// Register a typed closure; its signature gives the arity
    pub fn register_typed<M>(&self, name: &str, function: impl IntoNativeFn<M>) -> BridgeResult<()> {
        let body = function.into_native_fn();
        let arity = body.intrinsic_arity().map_or(Arity::Variadic, Arity::Fixed);
        self.register(name, body, arity)
    }

    /// Insert or overwrite `name`, returning the entry it replaced
    pub fn replace(
        &self,
        name: &str,
        function: NativeFn,
        arity: impl Into<Arity>,
    ) -> BridgeResult<Option<NativeFunction>> {
        let arity = arity.into();
        let entry = self.entry(name, function, arity)?;
        let previous = self.functions.write().insert(entry.name.clone(), entry);

        tracing::debug!(
            target: "hostcall::registry",
            "replaced '{}' (arity {}, previous entry: {})",
            name,
            arity,
            previous.is_some()
        );
        Ok(previous)
    }

    /// Remove `name` and hand back its entry
    pub fn unregister(&self, name: &str) -> BridgeResult<NativeFunction> {
        let removed = self.functions.write().remove(name);
        match removed {
            Some(function) => {
                tracing::debug!(target: "hostcall::registry", "unregistered '{}'", name);
                Ok(function)
            }
            None => Err(ErrorInfo::unknown_name(name)),
        }
    }

    /// Look up `name`
    pub fn resolve(&self, name: &str) -> Option<NativeFunction> {
        self.functions.read().get(name).cloned()
    }

    /// Check if `name` is registered
    pub fn contains(&self, name: &str) -> bool {
        self.functions.read().contains_key(name)
    }

    /// Declared arity of `name`
    pub fn arity_of(&self, name: &str) -> Option<Arity> {
        self.functions.read().get(name).map(|f| f.arity)
    }

    /// Registered names in sorted order
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .functions
            .read()
            .keys()
            .map(|name| name.to_string())
            .collect();
        names.sort();
        names
    }

    /// Number of registered functions
    pub fn len(&self) -> usize {
        self.functions.read().len()
    }

    /// Check if nothing is registered
    pub fn is_empty(&self) -> bool {
        self.functions.read().is_empty()
    }

    /// Release every entry, returning how many there were
    pub fn clear(&self) -> usize {
        let released = {
            let mut functions = self.functions.write();
            let count = functions.len();
            functions.clear();
            count
        };
        if released > 0 {
            tracing::info!(target: "hostcall::registry", "released {} native functions", released);
        }
        released
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new(NamePolicy::default())
    }
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionRegistry")
            .field("names", &self.names)
            .field("count", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hostcall_sdk::{CallFrame, CallResult, ErrorKind};

    fn constant(n: f64) -> NativeFn {
        NativeFn::new(move |_frame: &CallFrame<'_>| n)
    }

    #[test]
    fn test_register_and_resolve() {
        let registry = FunctionRegistry::default();
        registry.register("math.abs", constant(1.0), 1).unwrap();

        assert!(registry.contains("math.abs"));
        assert!(!registry.contains("math.sqrt"));
        assert_eq!(registry.len(), 1);

        let function = registry.resolve("math.abs").unwrap();
        assert_eq!(function.name(), "math.abs");
        assert_eq!(function.arity(), Arity::Fixed(1));
        assert_eq!(registry.arity_of("math.abs"), Some(Arity::Fixed(1)));
        assert!(registry.resolve("math.sqrt").is_none());
    }

    #[test]
    fn test_duplicate_keeps_original() {
        let registry = FunctionRegistry::default();
        registry.register("add", constant(1.0), 2).unwrap();
        let err = registry.register("add", constant(2.0), 2).unwrap_err();
        assert_eq!(
            err.kind,
            ErrorKind::DuplicateName {
                name: "add".to_string()
            }
        );

        let guest = hostcall_sdk::StackFrame::with_args([0.0, 0.0]);
        let frame = CallFrame::new("add", &guest, Default::default());
        let function = registry.resolve("add").unwrap();
        assert_eq!(function.body().call(&frame), CallResult::number(1.0));
    }

    #[test]
    fn test_replace_returns_previous() {
        let registry = FunctionRegistry::default();
        assert!(registry.replace("f", constant(1.0), 0).unwrap().is_none());
        let previous = registry.replace("f", constant(2.0), Arity::Variadic).unwrap();
        assert_eq!(previous.map(|f| f.arity()), Some(Arity::Fixed(0)));
        assert_eq!(registry.arity_of("f"), Some(Arity::Variadic));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_unregister() {
        let registry = FunctionRegistry::default();
        registry.register("add", constant(1.0), 2).unwrap();
        let removed = registry.unregister("add").unwrap();
        assert_eq!(removed.name(), "add");
        assert!(registry.resolve("add").is_none());
        assert!(registry.is_empty());

        let err = registry.unregister("add").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::UnknownName { .. }));
    }

    #[test]
    fn test_invalid_names_rejected() {
        let registry = FunctionRegistry::new(NamePolicy::Identifier);
        let err = registry.register("math.sqrt", constant(1.0), 1).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::InvalidName { .. }));
        assert_eq!(err.message, "Malformed function name 'math.sqrt'");
        assert!(registry.replace("Bad", constant(1.0), 1).is_err());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_typed_arity_conflict() {
        let registry = FunctionRegistry::default();
        let add = NativeFn::typed(|a: f64, b: f64| a + b);
        let err = registry.register("add", add.clone(), 3).unwrap_err();
        assert_eq!(
            err.kind,
            ErrorKind::ArityConflict {
                name: "add".to_string(),
                declared: Arity::Fixed(3),
                intrinsic: 2,
            }
        );
        assert!(registry.register("add", add.clone(), Arity::Variadic).is_err());
        registry.register("add", add, 2).unwrap();
    }

    #[test]
    fn test_register_typed_uses_signature_arity() {
        let registry = FunctionRegistry::default();
        registry.register_typed("negate", |x: f64| -x).unwrap();
        registry.register_typed("now", || 0.0).unwrap();
        assert_eq!(registry.arity_of("negate"), Some(Arity::Fixed(1)));
        assert_eq!(registry.arity_of("now"), Some(Arity::Fixed(0)));
    }

    #[test]
    fn test_names_sorted_and_clear() {
        let registry = FunctionRegistry::default();
        for name in ["subtract", "add", "math.sqrt"] {
            registry.register(name, constant(0.0), 0).unwrap();
        }
        assert_eq!(registry.names(), vec!["add", "math.sqrt", "subtract"]);
        assert_eq!(registry.clear(), 3);
        assert_eq!(registry.clear(), 0);
        assert!(registry.is_empty());
    }
}

//! Caller identity attached to every log event
//!
//! Public entry points are `#[track_caller]`, so the location the compiler
//! reports is always the original call site regardless of how many
//! forwarding layers sit between the caller and the formatter. Macros
//! capture the enclosing function name at compile time; for plain calls it is
//! looked up from debug symbols once per location (see [`CallSite::resolved`]).

use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::panic::Location;
use std::path::Path;
use std::sync::OnceLock;

/// Rendered in place of a call site that could not be resolved
pub const UNKNOWN_CALLER: &str = "???";

/// Rendered in place of a function name that was not captured
pub const UNKNOWN_FUNCTION: &str = "?";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CallSite {
    #[default]
    Unknown,
    Known {
        file: &'static str,
        line: u32,
        function: Option<&'static str>,
    },
}

impl CallSite {
    pub const fn new(file: &'static str, line: u32, function: &'static str) -> Self {
        CallSite::Known {
            file,
            line,
            function: Some(function),
        }
    }

    /// Capture the location of the caller of the enclosing `#[track_caller]` chain
    #[track_caller]
    #[inline]
    pub fn caller() -> Self {
        Self::from_location(Location::caller())
    }

    pub fn from_location(location: &'static Location<'static>) -> Self {
        CallSite::Known {
            file: location.file(),
            line: location.line(),
            function: None,
        }
    }

    /// Fill in the function name of a location captured without one.
    ///
    /// The name comes from the symbol of the stack frame executing the
    /// captured file and line, so this must be called while that frame is
    /// still on the stack. Names are cached per location. Stays `?` when no
    /// debug symbols match.
    #[must_use]
    pub fn resolved(self) -> Self {
        match self {
            CallSite::Known {
                file,
                line,
                function: None,
            } => CallSite::Known {
                file,
                line,
                function: resolve_function(file, line),
            },
            other => other,
        }
    }

    pub const fn unknown() -> Self {
        CallSite::Unknown
    }

    #[must_use]
    pub fn with_function(self, name: &'static str) -> Self {
        match self {
            CallSite::Known { file, line, .. } => CallSite::Known {
                file,
                line,
                function: Some(name),
            },
            CallSite::Unknown => CallSite::Unknown,
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, CallSite::Known { .. })
    }

    pub fn line(&self) -> Option<u32> {
        match self {
            CallSite::Known { line, .. } => Some(*line),
            CallSite::Unknown => None,
        }
    }

    /// Base name of the source file, without directories
    pub fn file_name(&self) -> Option<&'static str> {
        match self {
            CallSite::Known { file, .. } => Some(last_path_component(file)),
            CallSite::Unknown => None,
        }
    }
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallSite::Known {
                file,
                line,
                function,
            } => write!(
                f,
                "{}:{}:{}",
                last_path_component(file),
                line,
                function.unwrap_or(UNKNOWN_FUNCTION)
            ),
            CallSite::Unknown => f.write_str(UNKNOWN_CALLER),
        }
    }
}

fn last_path_component(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

type FunctionCache = Mutex<HashMap<(&'static str, u32), Option<&'static str>>>;

fn function_cache() -> &'static FunctionCache {
    static CACHE: OnceLock<FunctionCache> = OnceLock::new();
    CACHE.get_or_init(FunctionCache::default)
}

fn resolve_function(file: &'static str, line: u32) -> Option<&'static str> {
    if let Some(cached) = function_cache().lock().get(&(file, line)) {
        return *cached;
    }

    // Leaked once per distinct call site
    let resolved = symbolize(file, line).map(|name| &*Box::leak(name.into_boxed_str()));
    *function_cache()
        .lock()
        .entry((file, line))
        .or_insert(resolved)
}

/// Unqualified name of the innermost frame executing `file:line`
fn symbolize(file: &str, line: u32) -> Option<String> {
    let target = Path::new(file);
    let mut found = None;

    backtrace::trace(|frame| {
        backtrace::resolve_frame(frame, |symbol| {
            if found.is_some() || symbol.lineno() != Some(line) {
                return;
            }
            let same_file = symbol
                .filename()
                .is_some_and(|path| path.ends_with(target));
            if let (true, Some(name)) = (same_file, symbol.name()) {
                found = Some(unqualified_function(&format!("{:#}", name)).to_string());
            }
        });
        found.is_none()
    });

    found
}

/// Reduce `crate::module::function::{{closure}}` to `function`.
fn unqualified_function(path: &str) -> &str {
    let mut name = path;
    while let Some(stripped) = name.strip_suffix("::{{closure}}") {
        name = stripped;
    }
    name.rsplit("::").next().unwrap_or(name)
}

/// Reduce the type name of a function item nested in `function` to `function`.
#[doc(hidden)]
pub fn function_from_type_name(name: &'static str) -> &'static str {
    unqualified_function(name.strip_suffix("::f").unwrap_or(name))
}

/// Name of the enclosing function, resolved at compile time.
#[doc(hidden)]
#[macro_export]
macro_rules! __function_name {
    () => {{
        fn f() {}
        fn type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        $crate::core::call_site::function_from_type_name(type_name_of(f))
    }};
}

/// Call site of the macro invocation, including the enclosing function name.
#[macro_export]
macro_rules! call_site {
    () => {
        $crate::CallSite::new(file!(), line!(), $crate::__function_name!())
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caller_resolves_to_this_file() {
        let site = CallSite::caller();
        let rendered = site.to_string();
        assert_ne!(rendered, UNKNOWN_CALLER);
        assert!(rendered.starts_with("call_site.rs:"), "got {}", rendered);
        assert!(rendered.ends_with(":?"));
    }

    #[test]
    fn test_resolved_names_enclosing_function() {
        let site = CallSite::caller().resolved();
        assert_eq!(
            site.to_string(),
            format!("call_site.rs:{}:test_resolved_names_enclosing_function", line!() - 3)
        );
    }

    #[test]
    fn test_resolved_keeps_existing_function() {
        let site = CallSite::new("a.rs", 1, "given").resolved();
        assert_eq!(site.to_string(), "a.rs:1:given");
        assert_eq!(CallSite::unknown().resolved(), CallSite::Unknown);
    }

    #[test]
    fn test_unqualified_function() {
        assert_eq!(unqualified_function("app::server::handle"), "handle");
        assert_eq!(unqualified_function("app::run::{{closure}}::{{closure}}"), "run");
        assert_eq!(
            unqualified_function("<app::Worker as app::Job>::execute"),
            "execute"
        );
        assert_eq!(unqualified_function("main"), "main");
    }

    #[test]
    fn test_unknown_renders_placeholder() {
        assert_eq!(CallSite::unknown().to_string(), "???");
        assert_eq!(CallSite::default().to_string(), "???");
        assert_eq!(CallSite::unknown().with_function("main").to_string(), "???");
    }

    #[test]
    fn test_macro_captures_function_name() {
        let line = line!() + 1;
        let site = crate::call_site!();
        assert_eq!(
            site.to_string(),
            format!("call_site.rs:{}:test_macro_captures_function_name", line)
        );
    }

    #[test]
    fn test_function_name_inside_closure() {
        let name = (|| crate::__function_name!())();
        assert_eq!(name, "test_function_name_inside_closure");
    }

    #[test]
    fn test_windows_paths() {
        let site = CallSite::new("src\\bin\\server.rs", 12, "main");
        assert_eq!(site.to_string(), "server.rs:12:main");
        assert_eq!(site.file_name(), Some("server.rs"));
    }
}

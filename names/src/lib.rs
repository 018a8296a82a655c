//! Canonical rendering of compiler-emitted type and function names.
//!
//! Runtime type information, source-location fields and stack-trace frame
//! descriptions all spell the same C++ construct differently depending on
//! the compiler that produced them:
//!
//! ```text
//! {anonymous}::foo            // GCC
//! (anonymous namespace)::foo  // Clang
//! `anonymous namespace'::foo  // MSVC
//! ```
//!
//! This crate re-shapes any spelling it recognizes into one deterministic
//! form — `{anon-ns}::foo` for all three above — and hands back anything it
//! does not recognize verbatim. Parsing is visitor-driven: the grammar in
//! [`parse`] reports events to a [`Visitor`], and [`PrintVisitor`] is the
//! renderer behind [`prettify_type`] and [`prettify_function`]. The
//! [`scopes`] walker decomposes the same raw text scope by scope for
//! callers that want substrings instead of a re-rendering.

use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::intern::InternMap;

mod intern;
pub mod parse;
pub mod print;
pub mod scopes;
pub mod visit;


pub use parse::{parse_function, parse_type};
pub use print::PrintVisitor;
pub use scopes::{scopes, FunctionInfo, Scope, ScopeIter, TemplateInfo};
pub use visit::{Event, Recorder, Visitor};

static TYPES: Lazy<InternMap<String, str>> = Lazy::new(InternMap::new);
static FUNCTIONS: Lazy<InternMap<String, str>> = Lazy::new(InternMap::new);

/// Canonical rendering of a type name. Unrecognized input comes back
/// verbatim. Renderings are memoized for the lifetime of the process.
pub fn prettify_type(name: &str) -> Arc<str> {
    if let Some(cached) = TYPES.get(name) {
        return cached;
    }

    let mut printer = PrintVisitor::new();
    parse_type(name, &mut printer);
    TYPES.add(name.to_owned(), &printer.finish())
}

/// Canonical rendering of a function signature. Unrecognized input comes
/// back verbatim. Renderings are memoized for the lifetime of the process.
pub fn prettify_function(name: &str) -> Arc<str> {
    if let Some(cached) = FUNCTIONS.get(name) {
        return cached;
    }

    let mut printer = PrintVisitor::new();
    parse_function(name, &mut printer);
    FUNCTIONS.add(name.to_owned(), &printer.finish())
}

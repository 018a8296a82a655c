//! The canonical renderer.
//!
//! One [`Visitor`] implementation that turns the event stream back into a
//! single string, the same one for every compiler spelling of the same
//! construct: anonymous-namespace markers collapse to one alias, internal
//! stdlib namespaces vanish, lambdas print as `lambda(sig)`.

use std::borrow::Cow;

use config::CONFIG;

use crate::visit::Visitor;

/// Rendering context. Only whether we're inside a scope segment, a template
/// or argument list, a pointer declarator or an operator name matters: it
/// decides whether trailing specifiers print and where separators go.
#[derive(Debug)]
enum Frame {
    /// Output length at `begin_scope`; a segment that printed nothing (a
    /// suppressed noise identifier) drops its `::` too.
    Scope { start: usize },
    TemplateArgs,
    FunctionArgs,
    FunctionPtr,
    Operator,
}

#[derive(Debug, Default)]
pub struct PrintVisitor {
    out: String,
    stack: Vec<Frame>,
    /// Whether anything was written since `begin_operator_identifier`.
    operator_started: bool,
}

impl PrintVisitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// The rendered string. Idempotent event streams give identical output.
    pub fn finish(self) -> String {
        debug_assert!(self.stack.is_empty(), "unbalanced events: {:?}", self.stack);
        self.out
    }

    /// Specifiers print unless the element at hand is purely a qualifying
    /// component of an enclosing scope chain. Template and argument lists
    /// restore printing at their nesting level.
    fn printable_specs(&self) -> bool {
        for frame in self.stack.iter().rev() {
            match frame {
                Frame::Scope { .. } => return false,
                Frame::TemplateArgs | Frame::FunctionArgs | Frame::FunctionPtr => return true,
                Frame::Operator => {}
            }
        }
        true
    }

    /// The first write inside an operator name: symbolic spellings attach
    /// directly (`operator+`), word-like ones get the separating space
    /// (`operator new[]`).
    fn write_in_operator(&mut self, text: &str) {
        let word_like = text
            .chars()
            .next()
            .is_some_and(|chr| chr.is_alphanumeric() || chr == '_');
        if word_like {
            self.out.push(' ');
        }
        self.operator_started = true;
        self.out.push_str(text);
    }

    fn write_identifier(&mut self, text: &str) {
        if matches!(self.stack.last(), Some(Frame::Operator)) && !self.operator_started {
            self.write_in_operator(text);
            return;
        }

        if let Some(rendered) = rewrite(text) {
            self.out.push_str(&rendered);
        }
    }
}

impl<'src> Visitor<'src> for PrintVisitor {
    fn begin_type(&mut self) {
        if let Some(Frame::Operator) = self.stack.last() {
            // conversion operator: space between `operator` and the type
            if !self.operator_started {
                self.out.push(' ');
                self.operator_started = true;
            }
        }
    }

    fn push_identifier(&mut self, ident: &'src str) {
        self.write_identifier(ident);
    }

    fn begin_scope(&mut self) {
        self.stack.push(Frame::Scope {
            start: self.out.len(),
        });
    }

    fn end_scope(&mut self) {
        let Some(Frame::Scope { start }) = self.stack.pop() else {
            debug_assert!(false, "end_scope without begin_scope");
            return;
        };
        // a fully suppressed segment takes its separator with it
        if self.out.len() > start {
            self.out.push_str("::");
        }
    }

    fn push_scope(&mut self, scope: &'src str) {
        let inner = scope.trim_matches(|chr| chr == '`' || chr == '\'');
        if !inner.is_empty() && inner.bytes().all(|byte| byte.is_ascii_digit()) {
            // local-scope counters carry nothing worth printing
            return;
        }
        self.out.push_str(scope);
        self.out.push_str("::");
    }

    fn begin_template_args(&mut self, _count: usize) {
        self.out.push('<');
        self.stack.push(Frame::TemplateArgs);
    }

    fn add_arg(&mut self) {
        self.out.push_str(", ");
    }

    fn end_template_args(&mut self) {
        self.stack.pop();
        self.out.push('>');
    }

    fn end_return_type(&mut self) {
        self.out.push(' ');
    }

    fn begin_function_args(&mut self, _count: usize) {
        self.out.push('(');
        self.stack.push(Frame::FunctionArgs);
    }

    fn end_function_args(&mut self) {
        self.stack.pop();
        self.out.push(')');
    }

    fn begin_function_ptr(&mut self) {
        self.out.push('(');
        self.stack.push(Frame::FunctionPtr);
    }

    fn end_function_ptr(&mut self) {
        self.stack.pop();
        self.out.push(')');
    }

    fn begin_operator_identifier(&mut self) {
        self.out.push_str("operator");
        self.stack.push(Frame::Operator);
        self.operator_started = false;
    }

    fn end_operator_identifier(&mut self) {
        self.stack.pop();
    }

    fn add_const(&mut self) {
        if self.printable_specs() {
            self.out.push_str(" const");
        }
    }

    fn add_volatile(&mut self) {
        if self.printable_specs() {
            self.out.push_str(" volatile");
        }
    }

    fn add_noexcept(&mut self) {
        if self.printable_specs() {
            self.out.push_str(" noexcept");
        }
    }

    fn add_ptr(&mut self) {
        if self.printable_specs() {
            self.out.push('*');
        }
    }

    fn add_lvalue_ref(&mut self) {
        if self.printable_specs() {
            self.out.push('&');
        }
    }

    fn add_rvalue_ref(&mut self) {
        if self.printable_specs() {
            self.out.push_str("&&");
        }
    }

    fn unrecognized(&mut self, text: &'src str) {
        self.out.push_str(text);
    }
}

/// Canonicalize one identifier. `None` means the identifier is known noise
/// and prints as nothing at all.
fn rewrite(ident: &str) -> Option<Cow<'_, str>> {
    if CONFIG.noise.contains(ident) {
        return None;
    }
    if let Some(alias) = CONFIG.aliases.get(ident) {
        return Some(Cow::Borrowed(alias));
    }

    // `{lambda(sig)#N}` keeps its signature, loses the counter
    if ident.starts_with("{lambda(") && ident.ends_with('}') {
        if let Some(sig) = parenthesized(&ident["{lambda".len()..]) {
            return Some(Cow::Owned(format!("lambda{sig}")));
        }
    }

    // quoted placeholders unwrap to their inner text
    if ident.len() >= 2 && ident.starts_with('\'') && ident.ends_with('\'') {
        return Some(Cow::Borrowed(&ident[1..ident.len() - 1]));
    }

    // the MSVC lambda call-type marker collapses to a fixed word
    if ident.starts_with("<lambda") && ident.ends_with('>') {
        return Some(Cow::Borrowed("lambda"));
    }

    Some(Cow::Borrowed(ident))
}

/// The balanced `(…)` group `text` starts with, parentheses included.
fn parenthesized(text: &str) -> Option<&str> {
    let mut depth = 0usize;
    for (idx, byte) in text.bytes().enumerate() {
        match byte {
            b'(' => depth += 1,
            b')' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(&text[..=idx]);
                }
            }
            _ => {}
        }
    }
    None
}

//! Consumers of parse events.
//!
//! The parser never builds a tree; everything it recognizes is reported to a
//! [`Visitor`] in source order. The lifetime parameter is the input name's:
//! identifier text arrives as slices of it, so a visitor may keep them
//! around for as long as the input lives.

/// Receiver for the parser's event stream.
///
/// Every method defaults to a no-op, so implementations only handle what
/// they care about. Paired `begin_*`/`end_*` calls are always balanced and
/// well nested for a successful parse; `unrecognized` is the only call made
/// for input the grammar cannot interpret.
pub trait Visitor<'src> {
    /// Starts the whole parse. Called exactly once, first.
    fn begin(&mut self) {}
    /// Finishes the whole parse. Called exactly once, last.
    fn end(&mut self) {}

    fn begin_type(&mut self) {}
    fn end_type(&mut self) {}

    fn push_identifier(&mut self, _ident: &'src str) {}

    /// Starts one qualifying scope segment; its content follows.
    fn begin_scope(&mut self) {}
    fn end_scope(&mut self) {}
    /// One opaque, pre-formed scope segment (e.g. MSVC's `` `2' `` local
    /// scope counters), delivered as raw text.
    fn push_scope(&mut self, _scope: &'src str) {}

    /// `count` arguments follow, separated by `count - 1` [`Self::add_arg`]
    /// calls.
    fn begin_template_args(&mut self, _count: usize) {}
    fn add_arg(&mut self) {}
    fn end_template_args(&mut self) {}

    fn begin_function(&mut self) {}
    fn end_function(&mut self) {}
    fn begin_return_type(&mut self) {}
    fn end_return_type(&mut self) {}
    fn begin_function_args(&mut self, _count: usize) {}
    fn end_function_args(&mut self) {}
    fn begin_function_ptr(&mut self) {}
    fn end_function_ptr(&mut self) {}

    fn begin_operator_identifier(&mut self) {}
    fn end_operator_identifier(&mut self) {}

    fn add_const(&mut self) {}
    fn add_volatile(&mut self) {}
    fn add_noexcept(&mut self) {}
    fn add_ptr(&mut self) {}
    fn add_lvalue_ref(&mut self) {}
    fn add_rvalue_ref(&mut self) {}

    /// The input as a whole was not recognized. No other call is made.
    fn unrecognized(&mut self, _text: &'src str) {}
}

/// One parse event, mirroring the [`Visitor`] methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event<'src> {
    Begin,
    End,
    BeginType,
    EndType,
    Identifier(&'src str),
    BeginScope,
    EndScope,
    Scope(&'src str),
    BeginTemplateArgs(usize),
    AddArg,
    EndTemplateArgs,
    BeginFunction,
    EndFunction,
    BeginReturnType,
    EndReturnType,
    BeginFunctionArgs(usize),
    EndFunctionArgs,
    BeginFunctionPtr,
    EndFunctionPtr,
    BeginOperatorIdentifier,
    EndOperatorIdentifier,
    Const,
    Volatile,
    Noexcept,
    Ptr,
    LvalueRef,
    RvalueRef,
    Unrecognized(&'src str),
}

/// Visitor that records the event stream for later replay.
///
/// This is what makes the parse all-or-nothing: the drivers parse into a
/// `Recorder` and replay into the real visitor only on full success, so a
/// consumer never observes events from a failed attempt.
#[derive(Debug, Default)]
pub struct Recorder<'src> {
    events: Vec<Event<'src>>,
}

impl<'src> Recorder<'src> {
    pub fn events(&self) -> &[Event<'src>] {
        &self.events
    }

    /// Feed every recorded event to `visitor`, in order.
    pub fn replay<V: Visitor<'src>>(&self, visitor: &mut V) {
        for event in &self.events {
            match *event {
                Event::Begin => visitor.begin(),
                Event::End => visitor.end(),
                Event::BeginType => visitor.begin_type(),
                Event::EndType => visitor.end_type(),
                Event::Identifier(ident) => visitor.push_identifier(ident),
                Event::BeginScope => visitor.begin_scope(),
                Event::EndScope => visitor.end_scope(),
                Event::Scope(scope) => visitor.push_scope(scope),
                Event::BeginTemplateArgs(count) => visitor.begin_template_args(count),
                Event::AddArg => visitor.add_arg(),
                Event::EndTemplateArgs => visitor.end_template_args(),
                Event::BeginFunction => visitor.begin_function(),
                Event::EndFunction => visitor.end_function(),
                Event::BeginReturnType => visitor.begin_return_type(),
                Event::EndReturnType => visitor.end_return_type(),
                Event::BeginFunctionArgs(count) => visitor.begin_function_args(count),
                Event::EndFunctionArgs => visitor.end_function_args(),
                Event::BeginFunctionPtr => visitor.begin_function_ptr(),
                Event::EndFunctionPtr => visitor.end_function_ptr(),
                Event::BeginOperatorIdentifier => visitor.begin_operator_identifier(),
                Event::EndOperatorIdentifier => visitor.end_operator_identifier(),
                Event::Const => visitor.add_const(),
                Event::Volatile => visitor.add_volatile(),
                Event::Noexcept => visitor.add_noexcept(),
                Event::Ptr => visitor.add_ptr(),
                Event::LvalueRef => visitor.add_lvalue_ref(),
                Event::RvalueRef => visitor.add_rvalue_ref(),
                Event::Unrecognized(text) => visitor.unrecognized(text),
            }
        }
    }
}

impl<'src> Visitor<'src> for Recorder<'src> {
    fn begin(&mut self) {
        self.events.push(Event::Begin);
    }

    fn end(&mut self) {
        self.events.push(Event::End);
    }

    fn begin_type(&mut self) {
        self.events.push(Event::BeginType);
    }

    fn end_type(&mut self) {
        self.events.push(Event::EndType);
    }

    fn push_identifier(&mut self, ident: &'src str) {
        self.events.push(Event::Identifier(ident));
    }

    fn begin_scope(&mut self) {
        self.events.push(Event::BeginScope);
    }

    fn end_scope(&mut self) {
        self.events.push(Event::EndScope);
    }

    fn push_scope(&mut self, scope: &'src str) {
        self.events.push(Event::Scope(scope));
    }

    fn begin_template_args(&mut self, count: usize) {
        self.events.push(Event::BeginTemplateArgs(count));
    }

    fn add_arg(&mut self) {
        self.events.push(Event::AddArg);
    }

    fn end_template_args(&mut self) {
        self.events.push(Event::EndTemplateArgs);
    }

    fn begin_function(&mut self) {
        self.events.push(Event::BeginFunction);
    }

    fn end_function(&mut self) {
        self.events.push(Event::EndFunction);
    }

    fn begin_return_type(&mut self) {
        self.events.push(Event::BeginReturnType);
    }

    fn end_return_type(&mut self) {
        self.events.push(Event::EndReturnType);
    }

    fn begin_function_args(&mut self, count: usize) {
        self.events.push(Event::BeginFunctionArgs(count));
    }

    fn end_function_args(&mut self) {
        self.events.push(Event::EndFunctionArgs);
    }

    fn begin_function_ptr(&mut self) {
        self.events.push(Event::BeginFunctionPtr);
    }

    fn end_function_ptr(&mut self) {
        self.events.push(Event::EndFunctionPtr);
    }

    fn begin_operator_identifier(&mut self) {
        self.events.push(Event::BeginOperatorIdentifier);
    }

    fn end_operator_identifier(&mut self) {
        self.events.push(Event::EndOperatorIdentifier);
    }

    fn add_const(&mut self) {
        self.events.push(Event::Const);
    }

    fn add_volatile(&mut self) {
        self.events.push(Event::Volatile);
    }

    fn add_noexcept(&mut self) {
        self.events.push(Event::Noexcept);
    }

    fn add_ptr(&mut self) {
        self.events.push(Event::Ptr);
    }

    fn add_lvalue_ref(&mut self) {
        self.events.push(Event::LvalueRef);
    }

    fn add_rvalue_ref(&mut self) {
        self.events.push(Event::RvalueRef);
    }

    fn unrecognized(&mut self, text: &'src str) {
        self.events.push(Event::Unrecognized(text));
    }
}

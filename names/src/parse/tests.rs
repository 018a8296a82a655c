#![cfg(test)]

use pretty_assertions::assert_eq;

use crate::visit::Event::{self, *};
use crate::visit::{Recorder, Visitor};

macro_rules! events {
    ($parse:ident($input:expr) => [$($event:expr),* $(,)?]) => {{
        let mut recorder = Recorder::default();
        super::$parse($input, &mut recorder);
        let expected: &[Event] = &[$($event),*];
        assert_eq!(recorder.events(), expected, "parsing {:?}", $input);
    }};
}

#[test]
fn empty_template_args() {
    events!(parse_type("foo<>") => [
        Begin,
        BeginType,
        Identifier("foo"),
        BeginTemplateArgs(0),
        EndTemplateArgs,
        EndType,
        End,
    ]);
}

#[test]
fn template_args_with_scoped_type() {
    events!(parse_type("foo<int, std::string>") => [
        Begin,
        BeginType,
        Identifier("foo"),
        BeginTemplateArgs(2),
        BeginType,
        Identifier("int"),
        EndType,
        AddArg,
        BeginType,
        BeginScope,
        Identifier("std"),
        EndScope,
        Identifier("string"),
        EndType,
        EndTemplateArgs,
        EndType,
        End,
    ]);
}

#[test]
fn function_pointer_type() {
    events!(parse_type("void (*)(int)") => [
        Begin,
        BeginType,
        BeginReturnType,
        BeginType,
        Identifier("void"),
        EndType,
        EndReturnType,
        BeginFunctionPtr,
        Ptr,
        EndFunctionPtr,
        BeginFunctionArgs(1),
        BeginType,
        Identifier("int"),
        EndType,
        EndFunctionArgs,
        EndType,
        End,
    ]);
}

#[test]
fn specifiers_fold_in_source_order_after_the_first_block() {
    events!(parse_type("volatile foo const* volatile** const&") => [
        Begin,
        BeginType,
        Identifier("foo"),
        Const,
        Volatile,
        Ptr,
        Volatile,
        Ptr,
        Ptr,
        Const,
        LvalueRef,
        EndType,
        End,
    ]);
}

#[test]
fn conversion_operator() {
    events!(parse_function("operator bool()") => [
        Begin,
        BeginFunction,
        BeginOperatorIdentifier,
        BeginType,
        Identifier("bool"),
        EndType,
        EndOperatorIdentifier,
        BeginFunctionArgs(0),
        EndFunctionArgs,
        EndFunction,
        End,
    ]);
}

#[test]
fn unrecognized_reports_once_and_nothing_else() {
    events!(parse_type("Hello, World!") => [Unrecognized("Hello, World!")]);
    events!(parse_function("Hello, World!") => [Unrecognized("Hello, World!")]);
    events!(parse_type("") => [Unrecognized("")]);
}

#[test]
fn scoped_identifier_chain() {
    events!(parse_type("a::b::c") => [
        Begin,
        BeginType,
        BeginScope,
        Identifier("a"),
        EndScope,
        BeginScope,
        Identifier("b"),
        EndScope,
        Identifier("c"),
        EndType,
        End,
    ]);
}

#[test]
fn symbolic_operator_name() {
    events!(parse_function("Foo::operator==(Foo const&)") => [
        Begin,
        BeginFunction,
        BeginScope,
        Identifier("Foo"),
        EndScope,
        BeginOperatorIdentifier,
        Identifier("=="),
        EndOperatorIdentifier,
        BeginFunctionArgs(1),
        BeginType,
        Identifier("Foo"),
        Const,
        LvalueRef,
        EndType,
        EndFunctionArgs,
        EndFunction,
        End,
    ]);
}

#[test]
fn alternative_token_operators_canonicalize() {
    events!(parse_function("operator bitand") => [
        Begin,
        BeginFunction,
        BeginOperatorIdentifier,
        Identifier("&"),
        EndOperatorIdentifier,
        EndFunction,
        End,
    ]);
}

#[test]
fn word_operator_with_brackets() {
    events!(parse_function("operator new[]") => [
        Begin,
        BeginFunction,
        BeginOperatorIdentifier,
        Identifier("new"),
        Identifier("[]"),
        EndOperatorIdentifier,
        EndFunction,
        End,
    ]);
}

#[test]
fn destructor_name() {
    events!(parse_function("Foo::~Foo()") => [
        Begin,
        BeginFunction,
        BeginScope,
        Identifier("Foo"),
        EndScope,
        Identifier("~Foo"),
        BeginFunctionArgs(0),
        EndFunctionArgs,
        EndFunction,
        End,
    ]);
}

#[test]
fn return_type_is_detected_by_lookahead() {
    events!(parse_function("void foo(int)") => [
        Begin,
        BeginFunction,
        BeginReturnType,
        BeginType,
        Identifier("void"),
        EndType,
        EndReturnType,
        Identifier("foo"),
        BeginFunctionArgs(1),
        BeginType,
        Identifier("int"),
        EndType,
        EndFunctionArgs,
        EndFunction,
        End,
    ]);
}

#[test]
fn calling_conventions_and_void_lists_drop() {
    events!(parse_function("void __cdecl foo::bar(void)") => [
        Begin,
        BeginFunction,
        BeginReturnType,
        BeginType,
        Identifier("void"),
        EndType,
        EndReturnType,
        BeginScope,
        Identifier("foo"),
        EndScope,
        Identifier("bar"),
        BeginFunctionArgs(0),
        EndFunctionArgs,
        EndFunction,
        End,
    ]);
}

#[test]
fn member_function_pointer() {
    events!(parse_type("void (Foo::*)(int) const") => [
        Begin,
        BeginType,
        BeginReturnType,
        BeginType,
        Identifier("void"),
        EndType,
        EndReturnType,
        BeginFunctionPtr,
        BeginScope,
        Identifier("Foo"),
        EndScope,
        Ptr,
        EndFunctionPtr,
        BeginFunctionArgs(1),
        BeginType,
        Identifier("int"),
        EndType,
        EndFunctionArgs,
        Const,
        EndType,
        End,
    ]);
}

#[test]
fn calling_convention_inside_pointer_parens_drops() {
    events!(parse_type("void (__cdecl*)(int)") => [
        Begin,
        BeginType,
        BeginReturnType,
        BeginType,
        Identifier("void"),
        EndType,
        EndReturnType,
        BeginFunctionPtr,
        Ptr,
        EndFunctionPtr,
        BeginFunctionArgs(1),
        BeginType,
        Identifier("int"),
        EndType,
        EndFunctionArgs,
        EndType,
        End,
    ]);
}

#[test]
fn function_scope_segments() {
    events!(parse_type("foo()::{lambda(int)#1}") => [
        Begin,
        BeginType,
        BeginScope,
        BeginFunction,
        Identifier("foo"),
        BeginFunctionArgs(0),
        EndFunctionArgs,
        EndFunction,
        EndScope,
        Identifier("{lambda(int)#1}"),
        EndType,
        End,
    ]);
}

#[test]
fn wrapped_scope_splices_its_content() {
    events!(parse_type("`foo::bar(int)'::Baz") => [
        Begin,
        BeginType,
        BeginScope,
        BeginFunction,
        BeginScope,
        Identifier("foo"),
        EndScope,
        Identifier("bar"),
        BeginFunctionArgs(1),
        BeginType,
        Identifier("int"),
        EndType,
        EndFunctionArgs,
        EndFunction,
        EndScope,
        Identifier("Baz"),
        EndType,
        End,
    ]);
}

#[test]
fn wrapped_scope_stays_opaque_when_unparseable() {
    events!(parse_type("`anonymous namespace'::Foo") => [
        Begin,
        BeginType,
        BeginScope,
        Identifier("`anonymous namespace'"),
        EndScope,
        Identifier("Foo"),
        EndType,
        End,
    ]);
}

#[test]
fn numeric_local_scopes_are_opaque() {
    events!(parse_type("A::`2'::B") => [
        Begin,
        BeginType,
        BeginScope,
        Identifier("A"),
        EndScope,
        Scope("`2'"),
        Identifier("B"),
        EndType,
        End,
    ]);
}

#[test]
fn multiword_builtins_merge() {
    events!(parse_function("unsigned long long foo()") => [
        Begin,
        BeginFunction,
        BeginReturnType,
        BeginType,
        Identifier("unsigned long long"),
        EndType,
        EndReturnType,
        Identifier("foo"),
        BeginFunctionArgs(0),
        EndFunctionArgs,
        EndFunction,
        End,
    ]);
}

#[test]
fn variadic_argument() {
    events!(parse_function("printf(char const*, ...)") => [
        Begin,
        BeginFunction,
        Identifier("printf"),
        BeginFunctionArgs(2),
        BeginType,
        Identifier("char"),
        Const,
        Ptr,
        EndType,
        AddArg,
        BeginType,
        Identifier("..."),
        EndType,
        EndFunctionArgs,
        EndFunction,
        End,
    ]);
}

#[test]
fn plain_function_types_are_not_pointers() {
    events!(parse_type("void(int*)") => [
        Begin,
        BeginType,
        BeginFunction,
        Identifier("void"),
        BeginFunctionArgs(1),
        BeginType,
        Identifier("int"),
        Ptr,
        EndType,
        EndFunctionArgs,
        EndFunction,
        EndType,
        End,
    ]);
}

#[test]
fn nested_template_closers_split() {
    events!(parse_type("A<B<C>>") => [
        Begin,
        BeginType,
        Identifier("A"),
        BeginTemplateArgs(1),
        BeginType,
        Identifier("B"),
        BeginTemplateArgs(1),
        BeginType,
        Identifier("C"),
        EndType,
        EndTemplateArgs,
        EndType,
        EndTemplateArgs,
        EndType,
        End,
    ]);
}

/// Inputs covering every production, for the structural checks below.
const CORPUS: &[&str] = &[
    "foo",
    "foo<>",
    "foo<int, std::string>",
    "void (*)(int)",
    "void (Foo::*)(int) const",
    "volatile foo const* volatile** const&",
    "operator bool()",
    "Foo::operator==(Foo const&)",
    "Foo::~Foo()",
    "operator new[]",
    "a::b::c",
    "std::__cxx11::basic_string<char>",
    "void __cdecl foo::bar(void)",
    "foo()::{lambda(int)#1}",
    "`foo::bar(int)'::Baz",
    "`anonymous namespace'::Foo",
    "A::`2'::B",
    "unsigned long long foo()",
    "printf(char const*, ...)",
    "A<B<C>>",
    "std::map<std::string, int>::at(std::string const&)",
    "void foo(int, char) const noexcept",
];

/// Asserts every `begin_*` has its matching `end_*` in well-nested order.
#[derive(Default)]
struct Balance {
    stack: Vec<&'static str>,
    began: usize,
    ended: usize,
}

impl Balance {
    fn open(&mut self, region: &'static str) {
        self.stack.push(region);
    }

    fn close(&mut self, region: &'static str) {
        assert_eq!(self.stack.pop(), Some(region), "unbalanced {region}");
    }
}

impl<'src> Visitor<'src> for Balance {
    fn begin(&mut self) {
        self.began += 1;
    }

    fn end(&mut self) {
        self.ended += 1;
        assert!(self.stack.is_empty(), "open regions at end: {:?}", self.stack);
    }

    fn begin_type(&mut self) {
        self.open("type");
    }

    fn end_type(&mut self) {
        self.close("type");
    }

    fn begin_scope(&mut self) {
        self.open("scope");
    }

    fn end_scope(&mut self) {
        self.close("scope");
    }

    fn begin_template_args(&mut self, _count: usize) {
        self.open("template-args");
    }

    fn end_template_args(&mut self) {
        self.close("template-args");
    }

    fn begin_function(&mut self) {
        self.open("function");
    }

    fn end_function(&mut self) {
        self.close("function");
    }

    fn begin_return_type(&mut self) {
        self.open("return-type");
    }

    fn end_return_type(&mut self) {
        self.close("return-type");
    }

    fn begin_function_args(&mut self, _count: usize) {
        self.open("function-args");
    }

    fn end_function_args(&mut self) {
        self.close("function-args");
    }

    fn begin_function_ptr(&mut self) {
        self.open("function-ptr");
    }

    fn end_function_ptr(&mut self) {
        self.close("function-ptr");
    }

    fn begin_operator_identifier(&mut self) {
        self.open("operator");
    }

    fn end_operator_identifier(&mut self) {
        self.close("operator");
    }
}

#[test]
fn events_balance_over_the_corpus() {
    for input in CORPUS {
        let mut balance = Balance::default();
        super::parse_type(input, &mut balance);
        assert_eq!(balance.began, balance.ended, "type parse of {input:?}");

        let mut balance = Balance::default();
        super::parse_function(input, &mut balance);
        assert_eq!(balance.began, balance.ended, "function parse of {input:?}");
    }
}

#[test]
fn arg_lists_carry_their_count() {
    for input in CORPUS {
        let mut recorder = Recorder::default();
        super::parse_type(input, &mut recorder);

        // (expected, add_arg calls seen) per open argument list
        let mut open: Vec<(usize, usize)> = Vec::new();
        for event in recorder.events() {
            match *event {
                Event::BeginTemplateArgs(count) | Event::BeginFunctionArgs(count) => {
                    open.push((count, 0));
                }
                Event::AddArg => {
                    let Some(top) = open.last_mut() else {
                        panic!("add_arg outside any list in {input:?}");
                    };
                    top.1 += 1;
                }
                Event::EndTemplateArgs | Event::EndFunctionArgs => {
                    let (count, seen) = open.pop().unwrap();
                    assert_eq!(seen, count.saturating_sub(1), "list in {input:?}");
                }
                _ => {}
            }
        }
        assert!(open.is_empty());
    }
}

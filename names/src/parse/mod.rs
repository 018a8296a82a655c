//! Recursive descent over compiler-rendered type and function names.
//!
//! ```text
//! <type>     = [<cv>] <chain> [<specs>]
//!            | <ret-type> ( [<decorations>] [<chain> ::] * ) ( <arg-list> )
//!            | <signature>                     // function-local names
//!
//! <signature> = [<ret-type>] <chain> [( <arg-list> ) [<specs>]]
//!
//! <chain>    = <segment> {:: <segment>} [:: <operator-name>]
//! <segment>  = <identifier> [< <arg-list> >]
//!            | <placeholder>                   // {…} (…) <…> '…'
//!            | ` <chain-or-signature> '        // wrapped compound scope
//!            | <segment> ( <arg-list> ) [<specs>]
//!
//! <specs>    = { const | volatile | noexcept | * | & | && }
//! ```
//!
//! The grammar never rejects exotic identifier spellings; anything the lexer
//! classifies as an identifier can be scoped, templated or qualified. A name
//! that cannot be interpreted at all is reported through a single
//! `unrecognized` call, which the drivers guarantee by recording events and
//! replaying them only on full success.

use bitflags::bitflags;
use tokenizing::{Lexer, Token, TokenKind};

use crate::visit::{Recorder, Visitor};

mod tests;

/// Max recursion depth.
const MAX_DEPTH: usize = 256;

/// Words that may open a multi-word builtin type name.
static BUILTIN_STARTERS: &[&str] = &["long", "short", "signed", "unsigned"];

/// Words that may continue one.
static BUILTIN_CONTINUATIONS: &[&str] = &["__int64", "char", "double", "int", "long", "short"];

/// Alternative operator keyword spellings and their canonical symbols.
static DIGRAPHS: &[(&str, &str)] = &[
    ("and", "&&"),
    ("and_eq", "&="),
    ("bitand", "&"),
    ("bitor", "|"),
    ("compl", "~"),
    ("not", "!"),
    ("not_eq", "!="),
    ("or", "||"),
    ("or_eq", "|="),
    ("xor", "^"),
    ("xor_eq", "^="),
];

/// Calling-convention markers some compilers splice between the return type
/// and the name. They carry no information for display and are dropped.
static CALLING_CONVENTIONS: &[&str] = &[
    "__cdecl", "__clrcall", "__fastcall", "__stdcall", "__thiscall", "__vectorcall",
];

/// Pointer-size / aliasing decorations trailing MSVC signatures.
static POINTER_DECORATIONS: &[&str] = &["__ptr32", "__ptr64", "__restrict", "__unaligned"];

/// Parse `text` as a type name, reporting events to `visitor`.
pub fn parse_type<'src, V: Visitor<'src>>(text: &'src str, visitor: &mut V) {
    let mut recorder = Recorder::default();
    let recognized = Parser::new(text, &mut recorder).type_root().is_some();

    if recognized {
        recorder.replay(visitor);
    } else {
        visitor.unrecognized(text);
    }
}

/// Parse `text` as a function signature, reporting events to `visitor`.
pub fn parse_function<'src, V: Visitor<'src>>(text: &'src str, visitor: &mut V) {
    let mut recorder = Recorder::default();
    let recognized = Parser::new(text, &mut recorder).function_root().is_some();

    if recognized {
        recorder.replay(visitor);
    } else {
        visitor.unrecognized(text);
    }
}

bitflags! {
    /// Accumulated cv qualifiers awaiting emission.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    struct Quals: u8 {
        const CONST = 1 << 0;
        const VOLATILE = 1 << 1;
    }
}

struct Parser<'src, 'v, V> {
    lexer: Lexer<'src>,
    visitor: &'v mut V,
    depth: usize,
}

impl<'src, 'v, V: Visitor<'src>> Parser<'src, 'v, V> {
    fn new(text: &'src str, visitor: &'v mut V) -> Self {
        Self {
            lexer: Lexer::new(text),
            visitor,
            depth: 0,
        }
    }

    fn type_root(&mut self) -> Option<()> {
        self.visitor.begin();
        self.type_()?;
        self.skip_spaces();
        self.expect_end()?;
        self.visitor.end();
        Some(())
    }

    fn function_root(&mut self) -> Option<()> {
        self.visitor.begin();
        self.skip_spaces();

        // `Ret (*)(Args)` handed to the function entry point is still a
        // pointer type, not a callable
        if self.probe_function_ptr() {
            self.type_()?;
        } else {
            self.function()?;
        }

        self.skip_spaces();
        self.expect_end()?;
        self.visitor.end();
        Some(())
    }

    fn expect_end(&mut self) -> Option<()> {
        (self.lexer.peek().kind == TokenKind::End).then_some(())
    }

    fn enter(&mut self) -> Option<()> {
        self.depth += 1;
        (self.depth <= MAX_DEPTH).then_some(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn skip_spaces(&mut self) {
        while self.lexer.peek().kind == TokenKind::Space {
            self.lexer.next();
        }
    }

    fn eat_op(&mut self, spelling: &str) -> bool {
        let token = self.lexer.peek();
        if token.kind == TokenKind::Operator && token.text == spelling {
            self.lexer.next();
            return true;
        }
        false
    }

    fn eat_keyword(&mut self, word: &str) -> bool {
        let token = self.lexer.peek();
        if token.kind == TokenKind::Keyword && token.text == word {
            self.lexer.next();
            return true;
        }
        false
    }

    /// One full type with its own `begin_type`/`end_type` bracket.
    fn type_(&mut self) -> Option<()> {
        self.enter()?;
        self.visitor.begin_type();
        self.type_body()?;
        self.visitor.end_type();
        self.leave();
        Some(())
    }

    fn type_body(&mut self) -> Option<()> {
        self.skip_spaces();

        if self.probe_function_ptr() {
            return self.function_ptr_type();
        }
        if self.probe_trailing_signature() {
            // a type ending in a call signature goes through the function
            // path so the events lead with `begin_function`
            return self.function();
        }

        let quals = self.leading_quals();
        self.name_chain(false)?;
        self.suffix_specs(quals)
    }

    /// A type that cannot itself be a function pointer or signature; used
    /// for return types, where what follows decides the larger shape.
    fn simple_type(&mut self) -> Option<()> {
        self.enter()?;
        self.visitor.begin_type();
        let quals = self.leading_quals();
        self.name_chain(false)?;
        self.suffix_specs(quals)?;
        self.visitor.end_type();
        self.leave();
        Some(())
    }

    /// A full signature: optional return type, name chain, argument list,
    /// trailing specifiers. The argument list is optional because
    /// source-location name fields frequently omit it.
    fn function(&mut self) -> Option<()> {
        self.enter()?;
        self.visitor.begin_function();
        self.skip_spaces();
        self.consume_calling_conventions();

        if self.probe_return_type() {
            self.visitor.begin_return_type();
            self.simple_type()?;
            self.visitor.end_return_type();
            self.skip_spaces();
            self.consume_calling_conventions();
        }

        self.name_chain(true)?;

        let token = self.lexer.peek();
        if token.kind == TokenKind::Operator && (token.text == "(" || token.text == "()") {
            self.function_args()?;
            self.suffix_specs(Quals::empty())?;
        }

        self.visitor.end_function();
        self.leave();
        Some(())
    }

    /// Leading `const`/`volatile` keywords, deferred for merging into the
    /// first post-identifier qualifier block.
    fn leading_quals(&mut self) -> Quals {
        let mut quals = Quals::empty();
        loop {
            self.skip_spaces();
            if self.eat_keyword("const") {
                quals |= Quals::CONST;
                continue;
            }
            if self.eat_keyword("volatile") {
                quals |= Quals::VOLATILE;
                continue;
            }
            break;
        }
        quals
    }

    /// Trailing specifier run. Qualifiers collected before the identifier
    /// merge into the first block here, const before volatile; everything
    /// after the first `*`/`&`/`&&`/`noexcept` streams in source order.
    fn suffix_specs(&mut self, mut pending: Quals) -> Option<()> {
        let mut merging = true;
        loop {
            self.skip_spaces();
            let token = self.lexer.peek();
            match (token.kind, token.text) {
                (TokenKind::Keyword, "const") => {
                    self.lexer.next();
                    if merging {
                        pending |= Quals::CONST;
                    } else {
                        self.visitor.add_const();
                    }
                }
                (TokenKind::Keyword, "volatile") => {
                    self.lexer.next();
                    if merging {
                        pending |= Quals::VOLATILE;
                    } else {
                        self.visitor.add_volatile();
                    }
                }
                (TokenKind::Keyword, "noexcept") => {
                    self.lexer.next();
                    self.flush_quals(&mut pending, &mut merging);
                    self.visitor.add_noexcept();
                }
                (TokenKind::Operator, "*") => {
                    self.lexer.next();
                    self.flush_quals(&mut pending, &mut merging);
                    self.visitor.add_ptr();
                }
                (TokenKind::Operator, "&") => {
                    self.lexer.next();
                    self.flush_quals(&mut pending, &mut merging);
                    self.visitor.add_lvalue_ref();
                }
                (TokenKind::Operator, "&&") => {
                    self.lexer.next();
                    self.flush_quals(&mut pending, &mut merging);
                    self.visitor.add_rvalue_ref();
                }
                (TokenKind::Ident, text) if POINTER_DECORATIONS.binary_search(&text).is_ok() => {
                    self.lexer.next();
                }
                _ => break,
            }
        }
        self.flush_quals(&mut pending, &mut merging);
        Some(())
    }

    fn flush_quals(&mut self, pending: &mut Quals, merging: &mut bool) {
        if pending.contains(Quals::CONST) {
            self.visitor.add_const();
        }
        if pending.contains(Quals::VOLATILE) {
            self.visitor.add_volatile();
        }
        *pending = Quals::empty();
        *merging = false;
    }

    fn consume_calling_conventions(&mut self) {
        loop {
            let token = self.lexer.peek();
            if token.kind == TokenKind::Ident
                && CALLING_CONVENTIONS.binary_search(&token.text).is_ok()
            {
                self.lexer.next();
                self.skip_spaces();
                continue;
            }
            break;
        }
    }

    /// Scoped identifier chain. Every non-final segment is bracketed by
    /// `begin_scope`/`end_scope` — a segment may itself be a whole call
    /// signature — and the final segment is reported bare.
    fn name_chain(&mut self, allow_operator: bool) -> Option<()> {
        self.enter()?;
        loop {
            self.skip_spaces();
            let token = self.lexer.peek();

            if allow_operator && token.kind == TokenKind::Keyword && token.text == "operator" {
                self.operator_name()?;
                break;
            }

            if token.kind == TokenKind::Operator && token.text == "`" {
                if self.wrapped_segment()? {
                    break;
                }
                continue;
            }

            let mut probe = self.lexer;
            let shape = skim_segment(&mut probe)?;
            skim_spaces(&mut probe);

            if peek_op(&probe, "::") {
                self.visitor.begin_scope();
                if shape.has_args {
                    self.visitor.begin_function();
                    self.segment()?;
                    self.function_args()?;
                    self.suffix_specs(Quals::empty())?;
                    self.visitor.end_function();
                } else {
                    self.segment()?;
                }
                self.visitor.end_scope();
                self.skip_spaces();
                self.eat_op("::").then_some(())?;
            } else {
                self.segment()?;
                break;
            }
        }
        self.leave();
        Some(())
    }

    /// One plain segment: an identifier or placeholder plus its template
    /// argument list if one follows directly.
    fn segment(&mut self) -> Option<()> {
        let start = self.lexer.offset();
        skim_unit(&mut self.lexer)?;
        let text = &self.lexer.src()[start..self.lexer.offset()];
        self.visitor.push_identifier(text);

        if peek_op(&self.lexer, "<") {
            self.template_args()?;
        }
        Some(())
    }

    /// A back-quote wrapped compound scope: `` `content' ``. The content is
    /// itself parsed as a nested name — possibly a full signature — and
    /// spliced in as one scope; content that cannot be read that way stays
    /// opaque. Returns whether this was the chain's final element.
    fn wrapped_segment(&mut self) -> Option<bool> {
        let start = self.lexer.offset();
        let content = self.wrapped_slice()?;
        let whole = &self.lexer.src()[start..self.lexer.offset()];

        let mut probe = self.lexer;
        skim_spaces(&mut probe);
        let qualifies = peek_op(&probe, "::");

        if !content.is_empty() && content.bytes().all(|byte| byte.is_ascii_digit()) {
            // local-scope counter, opaque by definition
            self.visitor.push_scope(whole);
            if qualifies {
                self.lexer = probe;
                self.eat_op("::");
            }
            return Some(!qualifies);
        }

        let mut recorder = Recorder::default();
        let mut sub = Parser {
            lexer: Lexer::new(content),
            visitor: &mut recorder,
            depth: self.depth,
        };
        let parsed = sub.inner_name().is_some();

        if parsed {
            if qualifies {
                self.visitor.begin_scope();
                recorder.replay(self.visitor);
                self.visitor.end_scope();
                self.lexer = probe;
                self.eat_op("::");
                return Some(false);
            }
            recorder.replay(self.visitor);
            return Some(true);
        }

        // opaque placeholder identifier, alias tables may know it
        if qualifies {
            self.visitor.begin_scope();
            self.visitor.push_identifier(whole);
            self.visitor.end_scope();
            self.lexer = probe;
            self.eat_op("::");
            Some(false)
        } else {
            self.visitor.push_identifier(whole);
            Some(true)
        }
    }

    /// Entry for the content of a wrapped scope: a signature or chain that
    /// must span the whole slice.
    fn inner_name(&mut self) -> Option<()> {
        self.function()?;
        self.skip_spaces();
        self.expect_end()
    }

    /// Consume `` `…' `` and return the content between the quotes.
    fn wrapped_slice(&mut self) -> Option<&'src str> {
        self.eat_op("`").then_some(())?;
        let start = self.lexer.offset();
        skim_wrapped_tail(&mut self.lexer)?;
        Some(&self.lexer.src()[start..self.lexer.offset() - 1])
    }

    /// `operator` names: symbolic, alternative-token, word-form or a whole
    /// conversion type.
    fn operator_name(&mut self) -> Option<()> {
        self.eat_keyword("operator").then_some(())?;
        self.visitor.begin_operator_identifier();
        self.skip_spaces();

        let token = self.lexer.peek();
        match (token.kind, token.text) {
            (TokenKind::Operator, "(" | ")" | "," | "::" | "`" | "'") => return None,
            (TokenKind::Operator, _) => {
                self.lexer.next();
                self.visitor.push_identifier(token.text);
            }
            (TokenKind::Keyword, word) => {
                let idx = DIGRAPHS
                    .binary_search_by_key(&word, |&(spelling, _)| spelling)
                    .ok()?;
                self.lexer.next();
                self.visitor.push_identifier(DIGRAPHS[idx].1);
            }
            (TokenKind::Ident, "new" | "delete" | "co_await") => {
                self.lexer.next();
                self.visitor.push_identifier(token.text);

                let mut probe = self.lexer;
                skim_spaces(&mut probe);
                if peek_op(&probe, "[]") {
                    probe.next();
                    self.lexer = probe;
                    self.visitor.push_identifier("[]");
                }
            }
            // anything else is a conversion operator naming a type; simple
            // only, so a following argument list stays with the signature
            _ => self.simple_type()?,
        }

        self.visitor.end_operator_identifier();
        Some(())
    }

    fn template_args(&mut self) -> Option<()> {
        self.eat_op("<").then_some(())?;
        self.skip_spaces();

        if self.eat_template_close() {
            self.visitor.begin_template_args(0);
            self.visitor.end_template_args();
            return Some(());
        }

        let count = skim_list_count(self.lexer, ListKind::Template)?;
        self.visitor.begin_template_args(count);
        loop {
            self.type_()?;
            self.skip_spaces();
            if self.eat_op(",") {
                self.visitor.add_arg();
                continue;
            }
            if self.eat_template_close() {
                break;
            }
            return None;
        }
        self.visitor.end_template_args();
        Some(())
    }

    /// Consume one closing `>`, splitting a fused `>>` if needed.
    fn eat_template_close(&mut self) -> bool {
        let token = self.lexer.peek();
        if token.kind == TokenKind::Operator {
            if token.text == ">" {
                self.lexer.next();
                return true;
            }
            if token.text == ">>" {
                self.lexer.skip(1);
                return true;
            }
        }
        false
    }

    /// Parenthesized argument type list. `()`, `( )` and `(void)` all mean
    /// zero arguments.
    fn function_args(&mut self) -> Option<()> {
        if self.eat_op("()") {
            self.visitor.begin_function_args(0);
            self.visitor.end_function_args();
            return Some(());
        }

        self.eat_op("(").then_some(())?;
        self.skip_spaces();

        if self.eat_op(")") {
            self.visitor.begin_function_args(0);
            self.visitor.end_function_args();
            return Some(());
        }

        {
            let mut probe = self.lexer;
            let word = probe.next();
            if word.kind == TokenKind::Ident && word.text == "void" {
                skim_spaces(&mut probe);
                if peek_op(&probe, ")") {
                    probe.next();
                    self.lexer = probe;
                    self.visitor.begin_function_args(0);
                    self.visitor.end_function_args();
                    return Some(());
                }
            }
        }

        let count = skim_list_count(self.lexer, ListKind::Paren)?;
        self.visitor.begin_function_args(count);
        loop {
            self.type_()?;
            self.skip_spaces();
            if self.eat_op(",") {
                self.visitor.add_arg();
                continue;
            }
            if self.eat_op(")") {
                break;
            }
            return None;
        }
        self.visitor.end_function_args();
        Some(())
    }

    /// `Ret (*)(Args)` and `Ret (Scope::*)(Args)`, committed to after
    /// [`Self::probe_function_ptr`].
    fn function_ptr_type(&mut self) -> Option<()> {
        self.visitor.begin_return_type();
        self.simple_type()?;
        self.visitor.end_return_type();

        self.skip_spaces();
        self.eat_op("(").then_some(())?;
        self.visitor.begin_function_ptr();

        loop {
            self.skip_spaces();
            let token = self.lexer.peek();
            match (token.kind, token.text) {
                (TokenKind::Operator, "*") => {
                    self.lexer.next();
                    self.visitor.add_ptr();
                }
                (TokenKind::Operator, ")") => {
                    self.lexer.next();
                    break;
                }
                (TokenKind::Keyword, "const") => {
                    self.lexer.next();
                    self.visitor.add_const();
                }
                (TokenKind::Keyword, "volatile") => {
                    self.lexer.next();
                    self.visitor.add_volatile();
                }
                (TokenKind::Ident, text) => {
                    // the scope chain of a member pointer, or a calling
                    // convention / pointer-size decoration to drop
                    let mut probe = self.lexer;
                    skim_unit(&mut probe)?;
                    if peek_op(&probe, "<") {
                        skim_balanced(&mut probe, "<", ">")?;
                    }
                    let mut after = probe;
                    skim_spaces(&mut after);

                    if peek_op(&after, "::") {
                        self.visitor.begin_scope();
                        self.segment()?;
                        self.visitor.end_scope();
                        self.skip_spaces();
                        self.eat_op("::").then_some(())?;
                    } else if is_decoration(text) {
                        self.lexer = probe;
                    } else {
                        return None;
                    }
                }
                _ => return None,
            }
        }

        self.visitor.end_function_ptr();
        self.skip_spaces();
        self.function_args()?;
        self.suffix_specs(Quals::empty())
    }

    /// Lookahead for the `Ret (…*)(Args)` shape: a simple type, `(`, then —
    /// skipping decorations and an optional member scope — a `*`.
    fn probe_function_ptr(&self) -> bool {
        let mut lx = self.lexer;
        loop {
            skim_spaces(&mut lx);
            let token = lx.peek();
            if token.kind == TokenKind::Keyword && matches!(token.text, "const" | "volatile") {
                lx.next();
                continue;
            }
            break;
        }
        if skim_chain_no_args(&mut lx).is_none() {
            return false;
        }
        skim_suffix_specs(&mut lx);
        skim_spaces(&mut lx);

        if !peek_op(&lx, "(") {
            return false;
        }
        lx.next();

        loop {
            skim_spaces(&mut lx);
            let token = lx.peek();
            match (token.kind, token.text) {
                (TokenKind::Operator, "*") => return true,
                (TokenKind::Operator, "::") => {
                    lx.next();
                }
                (TokenKind::Ident, text) => {
                    let mut probe = lx;
                    if skim_unit(&mut probe).is_none() {
                        return false;
                    }
                    if peek_op(&probe, "<") && skim_balanced(&mut probe, "<", ">").is_none() {
                        return false;
                    }
                    let mut after = probe;
                    skim_spaces(&mut after);

                    // only a member scope or a known decoration may sit in
                    // front of the `*`; a bare identifier is an argument of
                    // a plain function type instead
                    if !peek_op(&after, "::") && !is_decoration(text) {
                        return false;
                    }
                    lx = probe;
                }
                (TokenKind::Keyword, "const" | "volatile") => {
                    lx.next();
                }
                _ => return false,
            }
        }
    }

    /// Does the upcoming chain end in a call signature with no return type
    /// in front?
    fn probe_trailing_signature(&self) -> bool {
        let token = self.lexer.peek();
        if token.kind == TokenKind::Keyword && matches!(token.text, "const" | "volatile") {
            return false;
        }
        let mut lx = self.lexer;
        matches!(skim_chain(&mut lx, true), Some(shape) if shape.has_args)
    }

    /// Is there a return type in front of the name? Requires a simple type,
    /// then something name-like that ends in a call signature.
    fn probe_return_type(&self) -> bool {
        let mut lx = self.lexer;
        if skim_simple_type(&mut lx).is_none() {
            return false;
        }
        skim_spaces(&mut lx);
        skim_calling_conventions(&mut lx);

        if !starts_name(lx.peek()) {
            return false;
        }
        matches!(skim_chain(&mut lx, true), Some(shape) if shape.has_args)
    }
}

#[derive(Debug, Clone, Copy)]
struct SegShape {
    has_args: bool,
}

enum ListKind {
    Template,
    Paren,
}

fn is_decoration(text: &str) -> bool {
    CALLING_CONVENTIONS.binary_search(&text).is_ok()
        || POINTER_DECORATIONS.binary_search(&text).is_ok()
}

fn starts_name(token: Token) -> bool {
    match (token.kind, token.text) {
        (TokenKind::Ident, _) => true,
        (TokenKind::Keyword, "operator") => true,
        (TokenKind::Operator, "{" | "(" | "<" | "`" | "'") => true,
        _ => false,
    }
}

fn peek_op(lx: &Lexer, spelling: &str) -> bool {
    let token = lx.peek();
    token.kind == TokenKind::Operator && token.text == spelling
}

fn skim_spaces(lx: &mut Lexer) {
    while lx.peek().kind == TokenKind::Space {
        lx.next();
    }
}

fn skim_calling_conventions(lx: &mut Lexer) {
    loop {
        let token = lx.peek();
        if token.kind == TokenKind::Ident && CALLING_CONVENTIONS.binary_search(&token.text).is_ok()
        {
            lx.next();
            skim_spaces(lx);
            continue;
        }
        break;
    }
}

/// Advance past the closing `'` of a `` ` `` already consumed. Wrapped
/// scopes nest, so this is a raw scan, not a token walk.
fn skim_wrapped_tail(lx: &mut Lexer) -> Option<()> {
    let rest = &lx.src()[lx.offset()..];
    let mut depth = 1usize;
    for (idx, byte) in rest.bytes().enumerate() {
        match byte {
            b'`' => depth += 1,
            b'\'' => {
                depth -= 1;
                if depth == 0 {
                    lx.skip(idx + 1);
                    return Some(());
                }
            }
            _ => {}
        }
    }
    None
}

/// Advance past the closing `'` of a plain-quoted placeholder.
fn skim_quoted_tail(lx: &mut Lexer) -> Option<()> {
    let rel = lx.src()[lx.offset()..].find('\'')?;
    lx.skip(rel + 1);
    Some(())
}

/// One identifier or placeholder, absorbing multi-word builtin spellings
/// such as `unsigned long long`.
fn skim_unit(lx: &mut Lexer) -> Option<()> {
    let token = lx.peek();
    match (token.kind, token.text) {
        (TokenKind::Ident, _) => {
            lx.next();
            let mut last = token.text;
            loop {
                if BUILTIN_STARTERS.binary_search(&last).is_err() {
                    break;
                }
                let mut probe = *lx;
                if probe.next().kind != TokenKind::Space {
                    break;
                }
                let word = probe.next();
                if word.kind != TokenKind::Ident
                    || BUILTIN_CONTINUATIONS.binary_search(&word.text).is_err()
                {
                    break;
                }
                *lx = probe;
                last = word.text;
            }
            Some(())
        }
        (TokenKind::Operator, "{") => skim_balanced(lx, "{", "}"),
        (TokenKind::Operator, "(") => skim_balanced(lx, "(", ")"),
        (TokenKind::Operator, "<") => skim_balanced(lx, "<", ">"),
        (TokenKind::Operator, "`") => {
            lx.next();
            skim_wrapped_tail(lx)
        }
        (TokenKind::Operator, "'") => {
            lx.next();
            skim_quoted_tail(lx)
        }
        (TokenKind::Operator, "...") => {
            lx.next();
            Some(())
        }
        // destructor names
        (TokenKind::Operator, "~") => {
            lx.next();
            (lx.peek().kind == TokenKind::Ident).then(|| {
                lx.next();
            })
        }
        _ => None,
    }
}

/// One segment including template arguments and, when directly attached, a
/// call signature with trailing specifiers.
fn skim_segment(lx: &mut Lexer) -> Option<SegShape> {
    skim_unit(lx)?;
    if peek_op(lx, "<") {
        skim_balanced(lx, "<", ">")?;
    }

    let mut shape = SegShape { has_args: false };
    let token = lx.peek();
    if token.kind == TokenKind::Operator && (token.text == "(" || token.text == "()") {
        if token.text == "()" {
            lx.next();
        } else {
            skim_balanced(lx, "(", ")")?;
        }
        shape.has_args = true;
        skim_suffix_specs(lx);
    }
    Some(shape)
}

/// A whole `::`-chain; returns the final segment's shape. An operator name
/// counts as a final segment with a signature.
fn skim_chain(lx: &mut Lexer, allow_operator: bool) -> Option<SegShape> {
    loop {
        skim_spaces(lx);
        let token = lx.peek();
        if token.kind == TokenKind::Keyword && token.text == "operator" {
            return allow_operator.then_some(SegShape { has_args: true });
        }

        let shape = skim_segment(lx)?;
        let mut probe = *lx;
        skim_spaces(&mut probe);
        if peek_op(&probe, "::") {
            probe.next();
            *lx = probe;
            continue;
        }
        return Some(shape);
    }
}

/// Like [`skim_chain`] but without absorbing call signatures; used where a
/// following `(` must stay visible to the caller.
fn skim_chain_no_args(lx: &mut Lexer) -> Option<()> {
    loop {
        skim_spaces(lx);
        skim_unit(lx)?;
        if peek_op(lx, "<") {
            skim_balanced(lx, "<", ">")?;
        }
        let mut probe = *lx;
        skim_spaces(&mut probe);
        if peek_op(&probe, "::") {
            probe.next();
            *lx = probe;
            continue;
        }
        return Some(());
    }
}

fn skim_simple_type(lx: &mut Lexer) -> Option<()> {
    loop {
        skim_spaces(lx);
        let token = lx.peek();
        if token.kind == TokenKind::Keyword && matches!(token.text, "const" | "volatile") {
            lx.next();
            continue;
        }
        break;
    }
    skim_chain(lx, false)?;
    skim_suffix_specs(lx);
    Some(())
}

fn skim_suffix_specs(lx: &mut Lexer) {
    loop {
        let mut probe = *lx;
        skim_spaces(&mut probe);
        let token = probe.peek();
        let is_spec = matches!(
            (token.kind, token.text),
            (TokenKind::Keyword, "const" | "volatile" | "noexcept")
                | (TokenKind::Operator, "*" | "&" | "&&")
        ) || (token.kind == TokenKind::Ident
            && POINTER_DECORATIONS.binary_search(&token.text).is_ok());

        if !is_spec {
            return;
        }
        probe.next();
        *lx = probe;
    }
}

/// Skim a balanced bracket group, `lx` sitting on the opener. Splits a
/// fused `>>` when the group is angle-bracketed.
fn skim_balanced(lx: &mut Lexer, open: &str, close: &str) -> Option<()> {
    debug_assert!(peek_op(lx, open));
    lx.next();
    let mut depth = 1i32;

    loop {
        let token = lx.peek();
        match (token.kind, token.text) {
            (TokenKind::End, _) => return None,
            (TokenKind::Operator, "`") => {
                lx.next();
                skim_wrapped_tail(lx)?;
            }
            (TokenKind::Operator, "'") => {
                lx.next();
                skim_quoted_tail(lx)?;
            }
            (TokenKind::Operator, text) if text == open => {
                lx.next();
                depth += 1;
            }
            (TokenKind::Operator, text) if text == close => {
                lx.next();
                depth -= 1;
                if depth == 0 {
                    return Some(());
                }
            }
            (TokenKind::Operator, ">>") if open == "<" => {
                if depth >= 2 {
                    lx.next();
                    depth -= 2;
                    if depth == 0 {
                        return Some(());
                    }
                } else {
                    lx.skip(1);
                    return Some(());
                }
            }
            _ => {
                lx.next();
            }
        }
    }
}

/// Count the arguments of the list whose opener was just consumed, exactly
/// the way the parser will split them.
fn skim_list_count(mut lx: Lexer, kind: ListKind) -> Option<usize> {
    let mut count = 1usize;
    let (mut paren, mut angle, mut brace, mut bracket) = (0i32, 0i32, 0i32, 0i32);

    loop {
        let token = lx.next();
        match (token.kind, token.text) {
            (TokenKind::End, _) => return None,
            (TokenKind::Operator, "`") => skim_wrapped_tail(&mut lx)?,
            (TokenKind::Operator, "'") => skim_quoted_tail(&mut lx)?,
            (TokenKind::Operator, ",") => {
                if paren == 0 && angle == 0 && brace == 0 && bracket == 0 {
                    count += 1;
                }
            }
            (TokenKind::Operator, "(") => paren += 1,
            (TokenKind::Operator, ")") => {
                if paren == 0 {
                    return matches!(kind, ListKind::Paren).then_some(count);
                }
                paren -= 1;
            }
            (TokenKind::Operator, "<") => angle += 1,
            (TokenKind::Operator, ">") => {
                if angle == 0 {
                    return matches!(kind, ListKind::Template).then_some(count);
                }
                angle -= 1;
            }
            (TokenKind::Operator, ">>") => {
                if angle <= 1 {
                    return matches!(kind, ListKind::Template).then_some(count);
                }
                angle -= 2;
            }
            (TokenKind::Operator, "{") => brace += 1,
            (TokenKind::Operator, "}") => brace = (brace - 1).max(0),
            (TokenKind::Operator, "[") => bracket += 1,
            (TokenKind::Operator, "]") => bracket = (bracket - 1).max(0),
            _ => {}
        }
    }
}

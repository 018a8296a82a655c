//! Scope-by-scope decomposition of a raw name.
//!
//! The second consumer of the same input text: instead of re-rendering, it
//! walks the name right to left, one enclosing scope at a time, handing out
//! the raw substrings (argument list, specifier text, return type) so
//! callers can apply their own heuristics without re-parsing. Wrapped
//! `` `…' `` segments are unwrapped and their content spliced in.

/// Raw signature pieces of a function-bearing scope. Substrings of the
/// input, not re-parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FunctionInfo<'src> {
    pub return_type: &'src str,
    pub args: &'src str,
    pub specs: &'src str,
}

/// Raw template argument list of a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateInfo<'src> {
    pub args: &'src str,
}

/// One `::`-delimited segment, innermost first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scope<'src> {
    pub identifier: &'src str,
    pub function: Option<FunctionInfo<'src>>,
    pub template: Option<TemplateInfo<'src>>,
}

/// Iterate `name`'s scopes from the innermost qualified name outward.
pub fn scopes(name: &str) -> ScopeIter<'_> {
    let (return_type, chain) = split_return_type(name.trim());
    ScopeIter {
        levels: vec![Level { rest: chain, return_type }],
    }
}

#[derive(Debug)]
struct Level<'src> {
    rest: &'src str,
    /// Return type stripped off the front, waiting for the segment that
    /// owns the argument list.
    return_type: &'src str,
}

#[derive(Debug)]
pub struct ScopeIter<'src> {
    levels: Vec<Level<'src>>,
}

impl<'src> Iterator for ScopeIter<'src> {
    type Item = Scope<'src>;

    fn next(&mut self) -> Option<Scope<'src>> {
        loop {
            let level = self.levels.last_mut()?;
            if level.rest.trim().is_empty() {
                self.levels.pop();
                continue;
            }

            let (left, segment) = split_last_segment(level.rest);
            level.rest = left;
            let segment = segment.trim();

            if let Some(content) = wrapped_content(segment) {
                if content.is_empty() || content.bytes().all(|byte| byte.is_ascii_digit()) {
                    // local-scope counter, yielded raw
                    return Some(Scope {
                        identifier: segment,
                        function: None,
                        template: None,
                    });
                }
                let (return_type, chain) = split_return_type(content);
                self.levels.push(Level { rest: chain, return_type });
                continue;
            }

            let mut record = decompose_segment(segment);
            if let Some(info) = record.function.as_mut() {
                let level = self.levels.last_mut()?;
                info.return_type = std::mem::take(&mut level.return_type);
            }
            return Some(record);
        }
    }
}

/// `` `content' `` → `content`.
fn wrapped_content(segment: &str) -> Option<&str> {
    segment
        .strip_prefix('`')
        .and_then(|rest| rest.strip_suffix('\''))
}

/// Bracket-, angle- and quote-aware depth state for raw scanning.
#[derive(Default)]
struct Depth {
    paren: u32,
    angle: u32,
    brace: u32,
    bracket: u32,
    backquote: u32,
    quoted: bool,
}

impl Depth {
    /// Track `byte`; returns whether it sat at top level. Openers count as
    /// top level themselves, closers as part of their region.
    fn step(&mut self, byte: u8) -> bool {
        if self.quoted {
            if byte == b'\'' {
                self.quoted = false;
            }
            return false;
        }

        let top = self.at_top();
        match byte {
            b'(' => self.paren += 1,
            b')' => self.paren = self.paren.saturating_sub(1),
            b'<' => self.angle += 1,
            b'>' => self.angle = self.angle.saturating_sub(1),
            b'{' => self.brace += 1,
            b'}' => self.brace = self.brace.saturating_sub(1),
            b'[' => self.bracket += 1,
            b']' => self.bracket = self.bracket.saturating_sub(1),
            b'`' => self.backquote += 1,
            b'\'' => {
                if self.backquote > 0 {
                    self.backquote -= 1;
                } else {
                    self.quoted = true;
                }
            }
            _ => {}
        }
        top
    }

    fn at_top(&self) -> bool {
        self.paren == 0
            && self.angle == 0
            && self.brace == 0
            && self.bracket == 0
            && self.backquote == 0
            && !self.quoted
    }
}

/// Split off the rightmost top-level `::` segment.
fn split_last_segment(text: &str) -> (&str, &str) {
    let bytes = text.as_bytes();
    let mut depth = Depth::default();
    let mut last_sep = None;
    let mut idx = 0;

    while idx < bytes.len() {
        let top = depth.step(bytes[idx]);
        if top && bytes[idx] == b':' && bytes.get(idx + 1) == Some(&b':') {
            last_sep = Some(idx);
            idx += 2;
            continue;
        }
        idx += 1;
    }

    match last_sep {
        Some(sep) => (&text[..sep], &text[sep + 2..]),
        None => ("", text),
    }
}

/// Separate a leading return type from the name chain: the last top-level
/// space before the first top-level `(`.
fn split_return_type(text: &str) -> (&str, &str) {
    let bytes = text.as_bytes();
    let mut depth = Depth::default();
    let mut last_space = None;

    for (idx, &byte) in bytes.iter().enumerate() {
        let top = depth.step(byte);
        if !top {
            continue;
        }
        if byte == b' ' {
            last_space = Some(idx);
        }
        if byte == b'(' {
            return match last_space {
                Some(space) => {
                    let ret = text[..space].trim();
                    // the space of a conversion operator's name is not a
                    // return-type boundary
                    if ret == "operator"
                        || ret.ends_with("::operator")
                        || ret.ends_with(" operator")
                    {
                        ("", text)
                    } else {
                        (ret, text[space + 1..].trim())
                    }
                }
                None => ("", text),
            };
        }
    }

    ("", text)
}

/// Pull one segment apart into identifier, template info and call info.
fn decompose_segment(segment: &str) -> Scope<'_> {
    let bytes = segment.as_bytes();
    let mut depth = Depth::default();
    let mut args_open = None;

    // the last top-level parenthesis group holds the arguments; skipping
    // position zero keeps `(anonymous namespace)` an identifier
    for (idx, &byte) in bytes.iter().enumerate() {
        if depth.step(byte) && byte == b'(' && idx > 0 {
            args_open = Some(idx);
        }
    }

    let (head, function) = match args_open {
        Some(open) => {
            let close = matching_paren(segment, open);
            let args = &segment[open + 1..close];
            let specs = segment[close + 1..].trim();
            let info = FunctionInfo {
                return_type: "",
                args,
                specs,
            };
            (segment[..open].trim_end(), Some(info))
        }
        None => (segment, None),
    };

    let (identifier, template) = split_template(head);
    Scope {
        identifier,
        function,
        template,
    }
}

/// Matching `)` for the `(` at `open`, or the string's end.
fn matching_paren(segment: &str, open: usize) -> usize {
    let mut depth = 0usize;
    for (idx, byte) in segment.bytes().enumerate().skip(open) {
        match byte {
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return idx;
                }
            }
            _ => {}
        }
    }
    segment.len().saturating_sub(1)
}

/// `vector<int>` → (`vector`, `int`). A head that *starts* with `<` or `{`
/// is a placeholder and stays whole.
fn split_template(head: &str) -> (&str, Option<TemplateInfo<'_>>) {
    if !head.ends_with('>') {
        return (head, None);
    }

    let mut depth = Depth::default();
    for (idx, byte) in head.bytes().enumerate() {
        if depth.step(byte) && byte == b'<' && idx > 0 {
            let args = &head[idx + 1..head.len() - 1];
            return (&head[..idx], Some(TemplateInfo { args }));
        }
    }
    (head, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(name: &str) -> Vec<Scope<'_>> {
        scopes(name).collect()
    }

    #[test]
    fn single_identifier() {
        let records = collect("foo");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].identifier, "foo");
        assert!(records[0].function.is_none());
        assert!(records[0].template.is_none());
    }

    #[test]
    fn innermost_first() {
        let idents: Vec<_> = collect("a::b::c").iter().map(|scope| scope.identifier).collect();
        assert_eq!(idents, ["c", "b", "a"]);
    }

    #[test]
    fn member_function() {
        let records = collect("std::vector<int>::push_back(int&&) const");

        assert_eq!(records[0].identifier, "push_back");
        let info = records[0].function.unwrap();
        assert_eq!(info.args, "int&&");
        assert_eq!(info.specs, "const");
        assert_eq!(info.return_type, "");

        assert_eq!(records[1].identifier, "vector");
        assert_eq!(records[1].template.unwrap().args, "int");

        assert_eq!(records[2].identifier, "std");
        assert_eq!(records.len(), 3);
    }

    #[test]
    fn return_type_attaches_to_the_call() {
        let records = collect("void foo::bar(int)");
        assert_eq!(records[0].identifier, "bar");
        assert_eq!(records[0].function.unwrap().return_type, "void");
        assert_eq!(records[0].function.unwrap().args, "int");
        assert_eq!(records[1].identifier, "foo");
        assert!(records[1].function.is_none());
    }

    #[test]
    fn templated_return_type_spaces_stay_nested() {
        let records = collect("std::map<int, long> foo::get(int)");
        assert_eq!(records[0].function.unwrap().return_type, "std::map<int, long>");
    }

    #[test]
    fn wrapped_scopes_splice() {
        let idents: Vec<_> = collect("`foo::bar(int)'::Baz")
            .iter()
            .map(|scope| scope.identifier)
            .collect();
        assert_eq!(idents, ["Baz", "bar", "foo"]);
    }

    #[test]
    fn numeric_local_scopes_stay_raw() {
        let records = collect("`foo(void)'::`2'::Local");
        assert_eq!(records[0].identifier, "Local");
        assert_eq!(records[1].identifier, "`2'");
        assert_eq!(records[2].identifier, "foo");
        assert_eq!(records[2].function.unwrap().args, "void");
    }

    #[test]
    fn placeholders_stay_whole() {
        let records = collect("(anonymous namespace)::foo");
        assert_eq!(records[0].identifier, "foo");
        assert_eq!(records[1].identifier, "(anonymous namespace)");
        assert!(records[1].function.is_none());

        let records = collect("foo::{lambda(int)#1}");
        assert_eq!(records[0].identifier, "{lambda(int)#1}");
        assert!(records[0].function.is_none());
    }

    #[test]
    fn conversion_operators_are_one_identifier() {
        let records = collect("Foo::operator bool()");
        assert_eq!(records[0].identifier, "operator bool");
        assert_eq!(records[0].function.unwrap().args, "");
        assert_eq!(records[1].identifier, "Foo");
    }

    #[test]
    fn exhaustion_is_terminal() {
        let mut iter = scopes("a::b");
        assert!(iter.next().is_some());
        assert!(iter.next().is_some());
        assert!(iter.next().is_none());
        assert!(iter.next().is_none());
    }

    #[test]
    fn scope_separators_inside_templates_do_not_split() {
        let idents: Vec<_> = collect("map<std::string>::find")
            .iter()
            .map(|scope| scope.identifier)
            .collect();
        assert_eq!(idents, ["find", "map"]);
    }
}

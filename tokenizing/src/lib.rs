//! Tokens used for splitting compiler-rendered type and function names.
//!
//! Demangled names aren't a fixed grammar: MSVC, GCC and Clang all emit
//! their own spellings for the same construct, including characters that no
//! identifier whitelist would accept (backticks, already-balanced brackets,
//! `#` counters). The lexer therefore classifies rather than validates: a
//! token is an operator/punctuator if it longest-prefix matches the operator
//! table, a keyword if the extracted word exact-matches the keyword table,
//! and an identifier otherwise.

use once_cell::sync::Lazy;


/// Known keyword spellings, including the C++ alternative operator tokens.
///
/// Sorted and unique, validated once on first use.
static KEYWORDS: Lazy<&'static [&'static str]> = Lazy::new(|| {
    static TABLE: &[&str] = &[
        "and", "and_eq", "bitand", "bitor", "compl", "const", "noexcept", "not", "not_eq",
        "operator", "or", "or_eq", "volatile", "xor", "xor_eq",
    ];
    debug_assert!(is_sorted_and_unique(TABLE));
    TABLE
});

/// Known operator and punctuator spellings.
///
/// Includes the fused `()` and `[]` forms so `operator()` and empty argument
/// lists come out as one token, and the wrapped-scope delimiters `` ` `` and
/// `'` that MSVC uses for compound scope descriptions.
static OPERATORS: Lazy<&'static [&'static str]> = Lazy::new(|| {
    static TABLE: &[&str] = &[
        "!", "!=", "%", "%=", "&", "&&", "&=", "'", "(", "()", ")", "*", "*=", "+", "++", "+=",
        ",", "-", "--", "-=", "->", "->*", ".", ".*", "...", "/", "/=", ":", "::", ";", "<", "<<",
        "<<=", "<=", "<=>", "=", "==", ">", ">=", ">>", ">>=", "?", "[", "[]", "]", "^", "^=",
        "`", "{", "|", "|=", "||", "}", "~",
    ];
    debug_assert!(is_sorted_and_unique(TABLE));
    TABLE
});

/// Bytes that start at least one entry of [`OPERATORS`].
static OPERATOR_STARTS: Lazy<[bool; 128]> = Lazy::new(|| {
    let mut starts = [false; 128];
    for entry in OPERATORS.iter() {
        starts[entry.as_bytes()[0] as usize] = true;
    }
    starts
});

fn is_sorted_and_unique(table: &[&str]) -> bool {
    table.windows(2).all(|pair| pair[0] < pair[1])
}

/// Does any table entry start with `candidate`.
fn any_has_prefix(table: &[&str], candidate: &str) -> bool {
    let idx = table.partition_point(|entry| *entry < candidate);
    table.get(idx).is_some_and(|entry| entry.starts_with(candidate))
}

/// Whether `chr` may begin an operator/punctuator spelling.
fn starts_operator(chr: char) -> bool {
    chr.is_ascii() && OPERATOR_STARTS[chr as usize]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// End of input, returned indefinitely once reached.
    End,
    /// Exactly one literal space. Longer or irregular whitespace runs are
    /// pure separation and produce no token at all.
    Space,
    Keyword,
    Operator,
    Ident,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'src> {
    pub text: &'src str,
    pub kind: TokenKind,
}

impl<'src> Token<'src> {
    const END: Token<'static> = Token {
        text: "",
        kind: TokenKind::End,
    };
}

/// Cursor over one name. Copying is free, so lookahead of any depth is a
/// clone away.
#[derive(Debug, Clone, Copy)]
pub struct Lexer<'src> {
    src: &'src str,
    offset: usize,
}

impl<'src> Lexer<'src> {
    pub fn new(src: &'src str) -> Self {
        Self { src, offset: 0 }
    }

    /// The entire underlying input.
    #[inline]
    pub fn src(&self) -> &'src str {
        self.src
    }

    /// Byte offset of the next unconsumed character.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// View the next token without consuming it.
    pub fn peek(&self) -> Token<'src> {
        let mut lookahead = *self;
        lookahead.next()
    }

    /// Consume and return the next token.
    pub fn next(&mut self) -> Token<'src> {
        let rest = &self.src[self.offset..];

        let mut chars = rest.chars();
        let Some(first) = chars.next() else {
            return Token::END;
        };

        if first.is_whitespace() {
            let run: usize = rest
                .chars()
                .take_while(|chr| chr.is_whitespace())
                .map(char::len_utf8)
                .sum();

            let meaningful = run == 1 && first == ' ';
            self.offset += run;

            if meaningful {
                return Token {
                    text: &rest[..1],
                    kind: TokenKind::Space,
                };
            }

            // separation only, scan on
            return self.next();
        }

        if let Some(spelling) = longest_operator(rest) {
            self.offset += spelling.len();
            return Token {
                text: &rest[..spelling.len()],
                kind: TokenKind::Operator,
            };
        }

        // anything else runs until whitespace or the start of an operator
        let mut len = 0;
        for chr in rest.chars() {
            if chr.is_whitespace() || starts_operator(chr) {
                break;
            }
            len += chr.len_utf8();
        }

        let text = &rest[..len];
        self.offset += len;

        let kind = if KEYWORDS.binary_search(&text).is_ok() {
            TokenKind::Keyword
        } else {
            TokenKind::Ident
        };

        Token { text, kind }
    }

    /// Re-lex from `bytes` into the current token. Used to split a fused
    /// token such as `>>` when only its first half closes the construct at
    /// hand.
    #[inline]
    pub fn skip(&mut self, bytes: usize) {
        self.offset += bytes;
    }
}

/// Longest-prefix match of `rest` against the operator table: greedily
/// extend the candidate while a longer entry remains a valid prefix match,
/// then backtrack to the longest exact match seen.
fn longest_operator(rest: &str) -> Option<&'static str> {
    let table = &*OPERATORS;
    let mut best = None;
    let mut len = 0;

    loop {
        len += 1;
        if len > rest.len() || !rest.is_char_boundary(len) {
            break;
        }

        let candidate = &rest[..len];
        if !any_has_prefix(table, candidate) {
            break;
        }
        if let Ok(idx) = table.binary_search(&candidate) {
            best = Some(table[idx]);
        }
    }

    best
}

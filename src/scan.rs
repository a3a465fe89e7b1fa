// src/scan.rs
//
// Lightweight text scanner shared by the analyzers. Deliberately not a
// parser: everything works over raw source with compiled regex tables plus a
// brace-depth scanner for body extraction. Upgrading this to a real grammar
// would change which inputs get flagged.

use crate::types::CodeLocation;
use once_cell::sync::Lazy;
use regex::Regex;

static FUNCTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)^[ \t]*((?:access\((?:all|self|contract|account)\)[ \t]+)?)(?:(pub|priv)[ \t]+)?fun[ \t]+([A-Za-z_][A-Za-z0-9_]*)[ \t]*\(([^)]*)\)[ \t]*(?::[ \t]*([^\{\n]+))?[ \t]*(\{)?",
    )
    .expect("function pattern")
});

static RESOURCE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)^[ \t]*((?:access\((?:all|self|contract|account)\)[ \t]+)?)(?:(pub|priv)[ \t]+)?resource[ \t]+([A-Za-z_][A-Za-z0-9_]*)[ \t]*(\{)?",
    )
    .expect("resource pattern")
});

static EVENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)^[ \t]*((?:access\((?:all|self|contract|account)\)[ \t]+)?)(?:(pub|priv)[ \t]+)?event[ \t]+([A-Za-z_][A-Za-z0-9_]*)[ \t]*\(",
    )
    .expect("event pattern")
});

static EMIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"emit[ \t]+([A-Za-z_][A-Za-z0-9_]*)").expect("emit pattern"));

static IMPORT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*import[ \t]+([A-Za-z_][A-Za-z0-9_]*)").expect("import pattern"));

static CONTRACT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:access\((?:all|self|contract|account)\)[ \t]+|pub[ \t]+)?contract[ \t]+(?:interface[ \t]+)?([A-Za-z_][A-Za-z0-9_]*)",
    )
    .expect("contract pattern")
});

// Word-boundary rather than line-start: one-line bodies like
// `resource Box { init() {} }` are valid Cadence and must still be seen.
static INIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\binit[ \t]*\(").expect("init pattern"));

static DESTROY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bdestroy[ \t]*\(").expect("destroy pattern"));

static RETURN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\breturn\b").expect("return pattern"));

/// One function declaration found by pattern matching, with its body (if any)
/// extracted by brace-depth scanning.
#[derive(Clone, Debug)]
pub struct FunctionDecl {
    pub name: String,
    /// Byte offset of the start of the declaration line.
    pub offset: usize,
    /// Byte offset just past the signature (and past the opening brace when
    /// one follows on the same line).
    pub sig_end: usize,
    pub has_access_modifier: bool,
    pub uses_legacy_modifier: bool,
    pub return_type: Option<String>,
    /// Body text between (exclusive of) the outer braces, when present.
    pub body: Option<String>,
}

#[derive(Clone, Debug)]
pub struct ResourceDecl {
    pub name: String,
    pub offset: usize,
    pub has_access_modifier: bool,
    /// Byte offset of the opening brace, when a body exists.
    pub body_open: Option<usize>,
    pub body: Option<String>,
}

#[derive(Clone, Debug)]
pub struct EventDecl {
    pub name: String,
    pub offset: usize,
    pub has_access_modifier: bool,
}

/// Compute 1-based line / 0-based column by counting newlines up to `offset`.
pub fn location_at(code: &str, offset: usize) -> CodeLocation {
    let offset = offset.min(code.len());
    let before = &code[..offset];
    let line = before.matches('\n').count() + 1;
    let column = match before.rfind('\n') {
        Some(idx) => offset - idx - 1,
        None => offset,
    };
    CodeLocation { line, column }
}

/// Extract the text between a `{` at `open_idx` and its matching `}` by brace
/// depth. Returns `None` when `open_idx` is not a brace or the braces never
/// close.
pub fn extract_block(code: &str, open_idx: usize) -> Option<&str> {
    let bytes = code.as_bytes();
    if bytes.get(open_idx) != Some(&b'{') {
        return None;
    }
    let mut depth = 0usize;
    for (i, &b) in bytes.iter().enumerate().skip(open_idx) {
        match b {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&code[open_idx + 1..i]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Index of the `}` matching the `{` at `open_idx`, by brace depth.
pub fn block_end(code: &str, open_idx: usize) -> Option<usize> {
    let bytes = code.as_bytes();
    if bytes.get(open_idx) != Some(&b'{') {
        return None;
    }
    let mut depth = 0usize;
    for (i, &b) in bytes.iter().enumerate().skip(open_idx) {
        match b {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Opening brace of the top-level contract body, when present.
pub fn contract_body_open(code: &str) -> Option<usize> {
    let (_, offset) = contract_declaration(code)?;
    code[offset..].find('{').map(|i| offset + i)
}

/// Next non-whitespace byte index at or after `from`.
fn skip_whitespace(code: &str, from: usize) -> usize {
    code[from..]
        .find(|c: char| !c.is_whitespace())
        .map(|i| from + i)
        .unwrap_or(code.len())
}

pub fn functions(code: &str) -> Vec<FunctionDecl> {
    let mut out = Vec::new();
    for caps in FUNCTION_RE.captures_iter(code) {
        let whole = caps.get(0).expect("match");
        let access = caps.get(1).map(|m| !m.as_str().trim().is_empty()).unwrap_or(false);
        let legacy = caps.get(2).is_some();
        let name = caps.get(3).expect("name").as_str().to_string();

        // `init` and `destroy` are matched by their own patterns.
        if name == "init" || name == "destroy" {
            continue;
        }

        let return_type = caps
            .get(5)
            .map(|m| m.as_str().trim().to_string())
            .filter(|t| !t.is_empty());

        let body = if caps.get(6).is_some() {
            let brace = whole.end() - 1;
            extract_block(code, brace).map(|b| b.to_string())
        } else {
            // The brace may sit on the next line.
            let next = skip_whitespace(code, whole.end());
            if code.as_bytes().get(next) == Some(&b'{') {
                extract_block(code, next).map(|b| b.to_string())
            } else {
                None
            }
        };

        out.push(FunctionDecl {
            name,
            offset: whole.start(),
            sig_end: whole.end(),
            has_access_modifier: access,
            uses_legacy_modifier: legacy,
            return_type,
            body,
        });
    }
    out
}

pub fn resources(code: &str) -> Vec<ResourceDecl> {
    let mut out = Vec::new();
    for caps in RESOURCE_RE.captures_iter(code) {
        let whole = caps.get(0).expect("match");
        let access = caps.get(1).map(|m| !m.as_str().trim().is_empty()).unwrap_or(false)
            || caps.get(2).is_some();
        let name = caps.get(3).expect("name").as_str().to_string();

        let body_open = if caps.get(4).is_some() {
            Some(whole.end() - 1)
        } else {
            let next = skip_whitespace(code, whole.end());
            if code.as_bytes().get(next) == Some(&b'{') {
                Some(next)
            } else {
                None
            }
        };
        let body = body_open.and_then(|open| extract_block(code, open).map(|b| b.to_string()));

        out.push(ResourceDecl {
            name,
            offset: whole.start(),
            has_access_modifier: access,
            body_open,
            body,
        });
    }
    out
}

pub fn events(code: &str) -> Vec<EventDecl> {
    EVENT_RE
        .captures_iter(code)
        .map(|caps| {
            let whole = caps.get(0).expect("match");
            EventDecl {
                name: caps.get(3).expect("name").as_str().to_string(),
                offset: whole.start(),
                has_access_modifier: caps
                    .get(1)
                    .map(|m| !m.as_str().trim().is_empty())
                    .unwrap_or(false)
                    || caps.get(2).is_some(),
            }
        })
        .collect()
}

pub fn emitted_event_names(code: &str) -> Vec<String> {
    EMIT_RE
        .captures_iter(code)
        .map(|c| c.get(1).expect("name").as_str().to_string())
        .collect()
}

pub fn imports(code: &str) -> Vec<String> {
    IMPORT_RE
        .captures_iter(code)
        .map(|c| c.get(1).expect("name").as_str().to_string())
        .collect()
}

pub fn contract_declaration(code: &str) -> Option<(String, usize)> {
    CONTRACT_RE
        .captures(code)
        .map(|c| (c.get(1).expect("name").as_str().to_string(), c.get(0).expect("m").start()))
}

pub fn has_init(code: &str) -> bool {
    INIT_RE.is_match(code)
}

pub fn has_destructor(body: &str) -> bool {
    DESTROY_RE.is_match(body)
}

pub fn has_return_statement(body: &str) -> bool {
    RETURN_RE.is_match(body)
}

/// True when a declared return type should be treated as requiring a
/// `return` statement in the body.
pub fn requires_return(return_type: &str) -> bool {
    let t = return_type.trim();
    !t.is_empty() && t != "Void"
}

/// Body text with braces and whitespace stripped; empty means an empty body.
pub fn stripped_body(body: &str) -> String {
    body.chars()
        .filter(|c| !c.is_whitespace() && *c != '{' && *c != '}')
        .collect()
}

/// Braces, parens, and brackets are balanced and never close below depth 0.
pub fn balanced_delimiters(code: &str) -> bool {
    let mut braces: i64 = 0;
    let mut parens: i64 = 0;
    let mut brackets: i64 = 0;
    for b in code.bytes() {
        match b {
            b'{' => braces += 1,
            b'}' => braces -= 1,
            b'(' => parens += 1,
            b')' => parens -= 1,
            b'[' => brackets += 1,
            b']' => brackets -= 1,
            _ => {}
        }
        if braces < 0 || parens < 0 || brackets < 0 {
            return false;
        }
    }
    braces == 0 && parens == 0 && brackets == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"import FungibleToken from 0xFUNGIBLETOKEN

access(all) contract ExampleToken {

    access(all) event TokensMinted(amount: UFix64)

    access(all) fun mint(amount: UFix64): UFix64 {
        emit TokensMinted(amount: amount)
        return amount
    }

    fun unqualified() {
    }

    access(all) fun headless(): String

    init() {
    }
}
"#;

    #[test]
    fn test_location_is_one_based_line_zero_based_column() {
        let loc = location_at("ab\ncd", 3);
        assert_eq!(loc.line, 2);
        assert_eq!(loc.column, 0);

        let loc = location_at("ab\ncd", 4);
        assert_eq!(loc.line, 2);
        assert_eq!(loc.column, 1);

        let loc = location_at("ab", 1);
        assert_eq!(loc.line, 1);
        assert_eq!(loc.column, 1);
    }

    #[test]
    fn test_extract_block_nested() {
        let code = "fun f() { if x { y } z }";
        let open = code.find('{').unwrap();
        assert_eq!(extract_block(code, open), Some(" if x { y } z "));
    }

    #[test]
    fn test_extract_block_unclosed() {
        let code = "fun f() { if x {";
        let open = code.find('{').unwrap();
        assert_eq!(extract_block(code, open), None);
    }

    #[test]
    fn test_function_extraction() {
        let funcs = functions(SAMPLE);
        let names: Vec<&str> = funcs.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["mint", "unqualified", "headless"]);

        let mint = &funcs[0];
        assert!(mint.has_access_modifier);
        assert_eq!(mint.return_type.as_deref(), Some("UFix64"));
        assert!(mint.body.as_deref().unwrap().contains("emit TokensMinted"));

        let unqualified = &funcs[1];
        assert!(!unqualified.has_access_modifier);
        assert!(unqualified.body.is_some());

        let headless = &funcs[2];
        assert_eq!(headless.return_type.as_deref(), Some("String"));
        assert!(headless.body.is_none());
    }

    #[test]
    fn test_contract_and_init_detection() {
        let (name, _) = contract_declaration(SAMPLE).unwrap();
        assert_eq!(name, "ExampleToken");
        assert!(has_init(SAMPLE));
        assert!(!has_init("access(all) contract Foo { }"));
    }

    #[test]
    fn test_one_line_bodies_are_recognized() {
        assert!(has_init("access(all) contract Foo { init() {} }"));
        assert!(has_destructor("{ init() {} destroy() {} }"));
        assert!(has_return_statement("let x = 1; return x"));
        assert!(!has_return_statement("let returns = 1"));
    }

    #[test]
    fn test_event_and_emit_extraction() {
        let evts = events(SAMPLE);
        assert_eq!(evts.len(), 1);
        assert_eq!(evts[0].name, "TokensMinted");
        assert_eq!(emitted_event_names(SAMPLE), vec!["TokensMinted"]);
    }

    #[test]
    fn test_imports() {
        assert_eq!(imports(SAMPLE), vec!["FungibleToken"]);
    }

    #[test]
    fn test_legacy_modifier_flagged() {
        let funcs = functions("pub fun transfer() {\n}\n");
        assert_eq!(funcs.len(), 1);
        assert!(funcs[0].uses_legacy_modifier);
        assert!(!funcs[0].has_access_modifier);
    }

    #[test]
    fn test_balanced_delimiters() {
        assert!(balanced_delimiters("fun f() { [1, 2] }"));
        assert!(!balanced_delimiters("fun f() { [1, 2] "));
        assert!(!balanced_delimiters("} {"));
    }

    #[test]
    fn test_stripped_body() {
        assert_eq!(stripped_body(" {  } \n"), "");
        assert_eq!(stripped_body(" return 1 "), "return1");
    }
}

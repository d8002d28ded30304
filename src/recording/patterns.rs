use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::model::action::ActionKind;

// ============================================================================
// Call-shape table
// ============================================================================
//
// Each recognised recorder line shape is one `CallPattern`. The table is
// ordered: navigation, locator chains, semantic accessors, then the legacy
// flat calls. The parser takes the first match per line, so supporting a new
// shape means adding an entry at the right layer.

/// Priority layer a pattern belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PatternLayer {
    Navigation,
    LocatorChain,
    SemanticAccessor,
    LegacyCall,
}

/// Selector and value pulled out of one matching line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted {
    pub selector: Option<String>,
    pub value: Option<String>,
}

type SelectorFn = fn(&Captures<'_>) -> Option<String>;

/// One `(matcher, extractor)` entry.
pub struct CallPattern {
    pub name: String,
    pub kind: ActionKind,
    pub layer: PatternLayer,
    regex: Regex,
    selector: SelectorFn,
}

impl std::fmt::Debug for CallPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallPattern")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("layer", &self.layer)
            .finish()
    }
}

impl CallPattern {
    /// Try this pattern against one trimmed line.
    ///
    /// Returns `None` when the shape does not match, or when it matches but
    /// a non-navigation shape yields no selector.
    pub fn extract(&self, line: &str) -> Option<Extracted> {
        let caps = self.regex.captures(line)?;
        let selector = (self.selector)(&caps);
        if self.kind != ActionKind::Navigate && selector.as_deref().is_none_or(str::is_empty) {
            return None;
        }
        let value = caps.name("val").map(|m| unquote(m.as_str()));
        Some(Extracted { selector, value })
    }
}

/// The ordered pattern table, built once.
pub static CALL_PATTERNS: LazyLock<Vec<CallPattern>> = LazyLock::new(build_table);

/// Lines that name an interaction but matched nothing in the table.
pub static CALL_SHAPED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:click|dblclick|fill|type|selectOption|select_option|check|uncheck|press|hover|tap|setInputFiles|set_input_files|navigate|goto|getBy\w+|get_by_\w+|locator)\s*\(",
    )
    .expect("static regex")
});

// ----------------------------------------------------------------------------
// Regex fragments
// ----------------------------------------------------------------------------

/// Optional `await` and receiver chain (`page.`, `this.page.`).
const PREFIX: &str = r"^(?:await\s+)?(?:\w+\.)*";

/// Optional statement terminator.
const SUFFIX: &str = r"\s*;?\s*$";

/// A single- or double-quoted string literal captured under `name`.
fn lit(name: &str) -> String {
    format!(r#"(?P<{name}>"(?:[^"\\]|\\.)*"|'(?:[^'\\]|\\.)*')"#)
}

/// Strip the surrounding quotes of a literal and undo simple escapes.
pub fn unquote(literal: &str) -> String {
    let inner = if literal.len() >= 2
        && ((literal.starts_with('"') && literal.ends_with('"'))
            || (literal.starts_with('\'') && literal.ends_with('\'')))
    {
        &literal[1..literal.len() - 1]
    } else {
        literal
    };

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

// ----------------------------------------------------------------------------
// Accessors (what is being located) and terminals (what is done to it)
// ----------------------------------------------------------------------------

struct Accessor {
    name: &'static str,
    pattern: String,
    selector: SelectorFn,
    terminals: &'static [ActionKind],
}

fn accessors() -> Vec<Accessor> {
    // Options after the first argument, e.g. `, exact=True`,
    // `, { exact: true }` or `, new Page.GetByTextOptions().setExact(true)`.
    let opts = r"(?:\s*,[^;]*?)?";

    vec![
        Accessor {
            name: "locator",
            pattern: format!(r"locator\(\s*{}\s*\)", lit("sel")),
            selector: |c| c.name("sel").map(|m| unquote(m.as_str())),
            terminals: &[
                ActionKind::Click,
                ActionKind::Fill,
                ActionKind::Select,
                ActionKind::Check,
                ActionKind::Press,
            ],
        },
        Accessor {
            name: "get_by_role",
            pattern: format!(
                r"(?:getByRole|get_by_role)\(\s*(?:AriaRole\.(?P<role>\w+)|{role})\s*,\s*(?:name\s*=\s*{name}[^)]*|\{{\s*name\s*:\s*{oname}[^}}]*\}}|new\s+[\w.]+\(\)\.setName\(\s*{jname}\s*\)(?:\.\w+\([^)]*\))*)\s*\)",
                role = lit("rolestr"),
                name = lit("name"),
                oname = lit("oname"),
                jname = lit("jname"),
            ),
            selector: role_selector,
            terminals: &[ActionKind::Click, ActionKind::Fill, ActionKind::Check, ActionKind::Press],
        },
        Accessor {
            name: "get_by_text",
            pattern: format!(r"(?:getByText|get_by_text)\(\s*{}{opts}\)", lit("text")),
            selector: |c| c.name("text").map(|m| format!("text={}", unquote(m.as_str()))),
            terminals: &[ActionKind::Click],
        },
        Accessor {
            name: "get_by_placeholder",
            pattern: format!(r"(?:getByPlaceholder|get_by_placeholder)\(\s*{}{opts}\)", lit("ph")),
            selector: |c| c.name("ph").map(|m| format!("placeholder={}", unquote(m.as_str()))),
            terminals: &[ActionKind::Click, ActionKind::Fill, ActionKind::Press],
        },
        Accessor {
            name: "get_by_label",
            pattern: format!(r"(?:getByLabel|get_by_label)\(\s*{}{opts}\)", lit("label")),
            selector: |c| c.name("label").map(|m| format!("label={}", unquote(m.as_str()))),
            terminals: &[ActionKind::Click, ActionKind::Fill, ActionKind::Check, ActionKind::Press],
        },
    ]
}

fn role_selector(c: &Captures<'_>) -> Option<String> {
    let role = c
        .name("role")
        .map(|m| m.as_str().to_lowercase())
        .or_else(|| c.name("rolestr").map(|m| unquote(m.as_str()).to_lowercase()))?;
    let name = c
        .name("name")
        .or_else(|| c.name("oname"))
        .or_else(|| c.name("jname"))
        .map(|m| unquote(m.as_str()))?;
    Some(format!("role={}[name=\"{}\"]", role, name))
}

/// Chained call applied to a located element.
fn terminal(kind: ActionKind) -> String {
    match kind {
        ActionKind::Click => r"\.click\(.*\)".to_string(),
        ActionKind::Fill => format!(r"\.fill\(\s*{}\s*\)", lit("val")),
        ActionKind::Select => format!(r"\.(?:selectOption|select_option)\(\s*{}\s*\)", lit("val")),
        ActionKind::Check => r"\.check\(.*\)".to_string(),
        ActionKind::Press => format!(r"\.press\(\s*{}\s*\)", lit("val")),
        ActionKind::Navigate => String::new(),
    }
}

fn kind_label(kind: ActionKind) -> &'static str {
    match kind {
        ActionKind::Navigate => "navigate",
        ActionKind::Click => "click",
        ActionKind::Fill => "fill",
        ActionKind::Select => "select_option",
        ActionKind::Check => "check",
        ActionKind::Press => "press",
    }
}

// ----------------------------------------------------------------------------
// Table assembly
// ----------------------------------------------------------------------------

fn compile(name: String, kind: ActionKind, layer: PatternLayer, body: &str, selector: SelectorFn) -> CallPattern {
    let source = format!("{PREFIX}{body}{SUFFIX}");
    CallPattern {
        name,
        kind,
        layer,
        regex: Regex::new(&source).expect("static regex"),
        selector,
    }
}

fn build_table() -> Vec<CallPattern> {
    let mut table = Vec::new();

    // 1. Navigation
    table.push(compile(
        "navigate".to_string(),
        ActionKind::Navigate,
        PatternLayer::Navigation,
        &format!(r"(?:navigate|goto)\(\s*{}\s*(?:,.*)?\)", lit("val")),
        |_| None,
    ));

    // 2 + 3. Locator chains, then semantic accessors
    for accessor in accessors() {
        let layer = if accessor.name == "locator" {
            PatternLayer::LocatorChain
        } else {
            PatternLayer::SemanticAccessor
        };
        for &kind in accessor.terminals {
            table.push(compile(
                format!("{}.{}", accessor.name, kind_label(kind)),
                kind,
                layer,
                &format!("{}{}", accessor.pattern, terminal(kind)),
                accessor.selector,
            ));
        }
    }

    // 4. Legacy flat calls
    let sel = lit("sel");
    let val = lit("val");
    let legacy: [(ActionKind, String); 5] = [
        (ActionKind::Click, format!(r"click\(\s*{sel}\s*(?:,.*)?\)")),
        (ActionKind::Fill, format!(r"fill\(\s*{sel}\s*,\s*{val}\s*\)")),
        (ActionKind::Select, format!(r"(?:selectOption|select_option)\(\s*{sel}\s*,\s*{val}\s*\)")),
        (ActionKind::Check, format!(r"check\(\s*{sel}\s*(?:,.*)?\)")),
        (ActionKind::Press, format!(r"press\(\s*{sel}\s*,\s*{val}\s*\)")),
    ];
    for (kind, body) in legacy {
        table.push(compile(
            format!("legacy.{}", kind_label(kind)),
            kind,
            PatternLayer::LegacyCall,
            &body,
            |c| c.name("sel").map(|m| unquote(m.as_str())),
        ));
    }

    table
}

//! Semantic scope name → AST node kinds, per language.
//!
//! Each supported language maps scope names (`function`, `class`, `block`,
//! `statement`, `signature`, ...) to the tree-sitter node kinds that scope
//! may match. A language entry can inherit from a parent entry (`typescript`
//! from `javascript`, `cpp` from `c`); a child overrides same-named keys and
//! inherits the rest, and common defaults fill any remaining gaps.

type ScopeEntry = (&'static str, &'static [&'static str]);

struct LanguageScopes {
    parent: Option<&'static str>,
    scopes: &'static [ScopeEntry],
}

const DEFAULTS: &[ScopeEntry] = &[
    ("block", &["block", "compound_statement", "statement_block"]),
    ("function", &["function_definition", "function_declaration", "method_definition"]),
    ("class", &["class_definition", "class_declaration"]),
    ("statement", &["expression_statement"]),
    ("signature", &["function_definition", "function_declaration", "method_definition"]),
];

const PYTHON: LanguageScopes = LanguageScopes {
    parent: None,
    scopes: &[
        ("block", &["block"]),
        ("function", &["function_definition", "decorated_definition"]),
        ("class", &["class_definition"]),
        ("signature", &["function_definition"]),
        ("docstring", &["string", "expression_statement"]),
        ("decorator", &["decorator"]),
        ("statement", &["expression_statement", "assignment"]),
    ],
};

const JAVASCRIPT: LanguageScopes = LanguageScopes {
    parent: None,
    scopes: &[
        ("block", &["statement_block", "class_body", "object"]),
        (
            "function",
            &[
                "function_declaration",
                "function_expression",
                "generator_function_declaration",
                "arrow_function",
                "method_definition",
            ],
        ),
        ("class", &["class_declaration", "class"]),
        ("signature", &["function_declaration", "method_definition"]),
        ("statement", &["expression_statement", "lexical_declaration", "variable_declaration"]),
    ],
};

const TYPESCRIPT: LanguageScopes = LanguageScopes {
    parent: Some("javascript"),
    scopes: &[
        (
            "class",
            &["class_declaration", "abstract_class_declaration", "interface_declaration"],
        ),
        ("value", &["type_alias_declaration", "enum_declaration"]),
    ],
};

const RUST: LanguageScopes = LanguageScopes {
    parent: None,
    scopes: &[
        ("block", &["block"]),
        ("function", &["function_item"]),
        ("class", &["struct_item", "enum_item", "trait_item", "impl_item"]),
        ("signature", &["function_item", "function_signature_item"]),
        ("statement", &["expression_statement", "let_declaration"]),
    ],
};

const GO: LanguageScopes = LanguageScopes {
    parent: None,
    scopes: &[
        ("block", &["block"]),
        ("function", &["function_declaration", "method_declaration", "func_literal"]),
        ("class", &["type_declaration"]),
        ("signature", &["function_declaration", "method_declaration"]),
        ("statement", &["expression_statement", "short_var_declaration"]),
    ],
};

const JAVA: LanguageScopes = LanguageScopes {
    parent: None,
    scopes: &[
        ("block", &["block", "class_body"]),
        ("function", &["method_declaration", "constructor_declaration"]),
        ("class", &["class_declaration", "interface_declaration", "enum_declaration"]),
        ("signature", &["method_declaration", "constructor_declaration"]),
        ("statement", &["expression_statement", "local_variable_declaration"]),
    ],
};

const C: LanguageScopes = LanguageScopes {
    parent: None,
    scopes: &[
        ("block", &["compound_statement"]),
        ("function", &["function_definition"]),
        ("class", &["struct_specifier", "union_specifier", "enum_specifier"]),
        ("signature", &["function_definition", "declaration"]),
        ("statement", &["expression_statement", "declaration"]),
    ],
};

const CPP: LanguageScopes = LanguageScopes {
    parent: Some("c"),
    scopes: &[
        (
            "class",
            &["class_specifier", "struct_specifier", "union_specifier", "enum_specifier"],
        ),
        ("function", &["function_definition", "lambda_expression"]),
    ],
};

fn language_entry(language_id: &str) -> Option<&'static LanguageScopes> {
    match language_id {
        "python" => Some(&PYTHON),
        "javascript" | "javascriptreact" => Some(&JAVASCRIPT),
        "typescript" | "typescriptreact" => Some(&TYPESCRIPT),
        "rust" => Some(&RUST),
        "go" => Some(&GO),
        "java" => Some(&JAVA),
        "c" => Some(&C),
        "cpp" => Some(&CPP),
        _ => None,
    }
}

/// Language ids with a semantic scope table (and an AST grammar).
pub fn ast_language_ids() -> &'static [&'static str] {
    &["python", "javascript", "typescript", "rust", "go", "java", "c", "cpp"]
}

/// Node kinds a scope name may match in a language.
///
/// Resolution walks the language's inheritance chain, then the common
/// defaults; an empty slice means the scope is unknown for that language.
pub fn node_kinds_for_scope(language_id: &str, scope: &str) -> &'static [&'static str] {
    let mut entry = language_entry(language_id);
    while let Some(lang) = entry {
        if let Some((_, kinds)) = lang.scopes.iter().find(|(name, _)| *name == scope) {
            return kinds;
        }
        entry = lang.parent.and_then(language_entry);
    }
    DEFAULTS.iter().find(|(name, _)| *name == scope).map(|(_, kinds)| *kinds).unwrap_or(&[])
}

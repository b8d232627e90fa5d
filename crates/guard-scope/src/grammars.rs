//! Grammar registry for the supported languages.

use tree_sitter::Language;

/// Language handle for a language id, if a grammar is bundled.
pub(crate) fn language_for(language_id: &str) -> Option<Language> {
    match language_id {
        "python" => Some(tree_sitter_python::LANGUAGE.into()),
        "javascript" | "javascriptreact" => Some(tree_sitter_javascript::LANGUAGE.into()),
        "typescript" => Some(tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into()),
        "typescriptreact" => Some(tree_sitter_typescript::LANGUAGE_TSX.into()),
        "rust" => Some(tree_sitter_rust::LANGUAGE.into()),
        "go" => Some(tree_sitter_go::LANGUAGE.into()),
        "java" => Some(tree_sitter_java::LANGUAGE.into()),
        "c" => Some(tree_sitter_c::LANGUAGE.into()),
        "cpp" => Some(tree_sitter_cpp::LANGUAGE.into()),
        _ => None,
    }
}

/// Whether an AST grammar is bundled for the language id.
pub fn has_grammar(language_id: &str) -> bool {
    language_for(language_id).is_some()
}

//! Tree-sitter based scope resolution.

use crate::{LineRange, consecutive_run, grammars};
use guard_lang::node_kinds_for_scope;
use tree_sitter::{Node, Parser};

/// Resolve a semantic scope through the language's AST.
///
/// Returns `None` when no grammar is bundled for the language, the parse
/// fails, or the scope cannot be located in the tree. The caller is expected
/// to fall back to the pattern resolver in that case.
pub fn resolve_with_ast(
    source: &str,
    language_id: &str,
    guard_line: usize,
    scope: &str,
) -> Option<LineRange> {
    let language = grammars::language_for(language_id)?;
    let mut parser = Parser::new();
    parser.set_language(&language).ok()?;
    let tree = parser.parse(source, None)?;
    let lines: Vec<&str> = source.lines().collect();
    if guard_line == 0 || guard_line > lines.len() {
        return None;
    }

    let resolver = AstResolver {
        language_id,
        lines: &lines,
        guard_row: guard_line - 1,
        nodes: preorder(tree.root_node()),
    };
    match scope {
        "signature" => resolver.signature(),
        "body" => resolver.body(),
        "statement" => resolver.statement(),
        "block" => resolver.block(),
        other => resolver.named_scope(other),
    }
}

/// All named nodes of the tree in pre-order (ancestors before descendants).
fn preorder(root: Node<'_>) -> Vec<Node<'_>> {
    let mut out = Vec::new();
    fn walk<'t>(node: Node<'t>, out: &mut Vec<Node<'t>>) {
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            out.push(child);
            walk(child, out);
        }
    }
    walk(root, &mut out);
    out
}

struct AstResolver<'t, 's> {
    language_id: &'s str,
    lines: &'s [&'s str],
    guard_row: usize,
    nodes: Vec<Node<'t>>,
}

impl<'t> AstResolver<'t, '_> {
    fn kinds(&self, scope: &str) -> &'static [&'static str] {
        node_kinds_for_scope(self.language_id, scope)
    }

    /// Node end row, 1 line earlier when tree-sitter reports column 0
    /// (the node really ended on the previous line).
    fn end_row(&self, node: Node<'t>) -> usize {
        let end = node.end_position();
        let row = if end.column == 0 && end.row > node.start_position().row {
            end.row - 1
        } else {
            end.row
        };
        row.min(self.lines.len().saturating_sub(1))
    }

    /// First node (outermost at its row) starting strictly after the guard
    /// whose kind is in one of the given sets.
    fn first_after(&self, kind_sets: &[&[&str]]) -> Option<Node<'t>> {
        let mut best: Option<Node<'t>> = None;
        for node in &self.nodes {
            let row = node.start_position().row;
            if row <= self.guard_row || !kind_in(node, kind_sets) {
                continue;
            }
            if best.map(|b| row < b.start_position().row).unwrap_or(true) {
                best = Some(*node);
            }
        }
        best
    }

    /// Deepest node covering the guard row whose kind is in the given sets.
    fn innermost_enclosing(&self, kind_sets: &[&[&str]]) -> Option<Node<'t>> {
        self.nodes
            .iter()
            .filter(|n| {
                kind_in(n, kind_sets)
                    && n.start_position().row <= self.guard_row
                    && self.end_row(**n) >= self.guard_row
            })
            .last()
            .copied()
    }

    /// Generic container resolution: the first matching node after the guard,
    /// else the innermost matching node enclosing it. The guard line itself
    /// is always covered.
    fn named_scope(&self, scope: &str) -> Option<LineRange> {
        let kinds = self.kinds(scope);
        if kinds.is_empty() {
            return None;
        }
        let node = self.first_after(&[kinds]).or_else(|| self.innermost_enclosing(&[kinds]))?;
        let mut end = self.end_row(node);
        if self.language_id == "python" && scope == "class" {
            while end > node.start_position().row
                && self.lines.get(end).map(|l| l.trim().is_empty()).unwrap_or(false)
            {
                end -= 1;
            }
        }
        Some(LineRange::new(self.guard_row + 1, end.max(self.guard_row) + 1))
    }

    /// Block scope. Inside a declaration the next block (or declaration)
    /// after the guard wins, then the enclosing block. At file level only a
    /// node beginning immediately below the guard is trusted; otherwise the
    /// consecutive-statements run keeps the guard from capturing the whole
    /// file.
    fn block(&self) -> Option<LineRange> {
        let functions = self.kinds("function");
        let classes = self.kinds("class");
        let blocks = self.kinds("block");
        let guard_line = self.guard_row + 1;

        if self.innermost_enclosing(&[functions, classes]).is_none() {
            let first_code_row = (self.guard_row + 1..self.lines.len())
                .find(|&row| !self.lines[row].trim().is_empty())?;
            let candidate = self.nodes.iter().find(|n| {
                n.start_position().row == first_code_row
                    && kind_in(n, &[blocks, functions, classes])
            });
            return match candidate {
                Some(node) => Some(LineRange::new(guard_line, self.end_row(*node) + 1)),
                None => consecutive_run(self.lines, guard_line),
            };
        }

        if let Some(node) = self.first_after(&[blocks, functions, classes]) {
            return Some(LineRange::new(guard_line, self.end_row(node) + 1));
        }
        let enclosing = self
            .innermost_enclosing(&[blocks])
            .or_else(|| self.innermost_enclosing(&[functions, classes]))?;
        Some(LineRange::new(guard_line, self.end_row(enclosing) + 1))
    }

    /// The function node a signature/body scope refers to.
    fn function_node(&self) -> Option<Node<'t>> {
        let functions = self.kinds("function");
        let node =
            self.first_after(&[functions]).or_else(|| self.innermost_enclosing(&[functions]))?;
        // Python decorated definitions wrap the actual function.
        if node.kind() == "decorated_definition" {
            let mut cursor = node.walk();
            let inner = node
                .named_children(&mut cursor)
                .find(|c| c.kind() == "function_definition" || c.kind() == "class_definition");
            return inner.or(Some(node));
        }
        Some(node)
    }

    fn body_node(&self, function: Node<'t>) -> Option<Node<'t>> {
        function.child_by_field_name("body").or_else(|| {
            let blocks = self.kinds("block");
            let mut cursor = function.walk();
            function.named_children(&mut cursor).find(|c| kind_in(c, &[blocks]))
        })
    }

    /// Header lines of the nearest function: from its first line up to the
    /// line before the body opens, or the line carrying `{` / `:` when the
    /// body opens on the header line itself.
    fn signature(&self) -> Option<LineRange> {
        let function = self.function_node()?;
        let body = self.body_node(function)?;
        let start = function.start_position().row;
        let body_row = body.start_position().row;
        let end = if body_row > start { body_row - 1 } else { body_row };
        Some(LineRange::new(start + 1, end + 1))
    }

    /// Interior of the nearest function body, delimiter lines trimmed.
    fn body(&self) -> Option<LineRange> {
        let function = self.function_node()?;
        let body = self.body_node(function)?;
        let start = body.start_position().row;
        let end = self.end_row(body);
        let braced = self
            .lines
            .get(start)
            .map(|l| l.trim_start().starts_with('{') || l.trim_end().ends_with('{'))
            .unwrap_or(false);
        if braced && end >= start + 2 {
            Some(LineRange::new(start + 2, end))
        } else {
            Some(LineRange::new(start + 1, end + 1))
        }
    }

    /// Smallest enclosing statement or expression, else the next one below,
    /// else the guard line alone.
    fn statement(&self) -> Option<LineRange> {
        let is_statementish = |node: &Node<'t>| {
            let kind = node.kind();
            kind.contains("statement") || kind.contains("expression") || kind.contains("declaration")
        };
        let enclosing = self
            .nodes
            .iter()
            .filter(|n| {
                is_statementish(n)
                    && n.start_position().row <= self.guard_row
                    && self.end_row(**n) >= self.guard_row
            })
            .last();
        if let Some(node) = enclosing {
            return Some(LineRange::new(node.start_position().row + 1, self.end_row(*node) + 1));
        }
        let next = self
            .nodes
            .iter()
            .filter(|n| is_statementish(n) && n.start_position().row > self.guard_row)
            .min_by_key(|n| n.start_position().row);
        match next {
            Some(node) => Some(LineRange::new(self.guard_row + 1, self.end_row(*node) + 1)),
            None => Some(LineRange::new(self.guard_row + 1, self.guard_row + 1)),
        }
    }
}

fn kind_in(node: &Node<'_>, kind_sets: &[&[&str]]) -> bool {
    let kind = node.kind();
    kind_sets.iter().any(|set| set.contains(&kind))
}

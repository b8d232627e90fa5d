//! Stack-based per-line permission evaluation.

use guard_tag::{ContextPair, GuardTag, LinePermission, Permission, PermissionPair, Target};

/// The live contribution of one guard between its push and its eviction.
///
/// Both targets are always populated: a single-target tag inherits the other
/// target's state from the entry below it at push time, so the effective
/// state of a line is simply the top of the stack.
#[derive(Debug, Clone)]
struct StackEntry {
    ai: Permission,
    human: Permission,
    ai_context: bool,
    human_context: bool,
    end_line: usize,
    #[allow(dead_code)]
    start_line: usize,
    #[allow(dead_code)]
    line_limited: bool,
    #[allow(dead_code)]
    tag_line: usize,
}

impl StackEntry {
    fn carries_context(&self) -> bool {
        self.ai_context || self.human_context
    }
}

fn state_for(stack: &[StackEntry], target: Target) -> (Permission, bool) {
    match (stack.last(), target) {
        (Some(top), Target::Ai) => (top.ai, top.ai_context),
        (Some(top), Target::Human) => (top.human, top.human_context),
        (None, Target::Ai) => (Permission::Read, false),
        (None, Target::Human) => (Permission::Write, false),
    }
}

/// Evict context entries from the top of the stack.
///
/// Applied before every push and after every pop: a context guard that is
/// interrupted or built over cannot resume.
fn evict_trailing_context(stack: &mut Vec<StackEntry>) {
    while stack.last().map(StackEntry::carries_context).unwrap_or(false) {
        stack.pop();
    }
}

/// Compose a stack entry from a tag, inheriting undeclared targets.
fn compose_entry(stack: &[StackEntry], tag: &GuardTag, start: usize, end: usize) -> StackEntry {
    let mut entry = StackEntry {
        ai: Permission::Read,
        human: Permission::Write,
        ai_context: false,
        human_context: false,
        end_line: end,
        start_line: start,
        line_limited: tag.line_count.is_some(),
        tag_line: tag.line_number,
    };
    for target in Target::ALL {
        let (inherited, inherited_ctx) = state_for(stack, target);
        let declared = tag.permission_for(target).is_some() || tag.is_context_for(target);
        let (value, ctx) = if declared {
            // A context tag without an explicit permission keeps the value
            // that was in effect below it.
            (tag.permission_for(target).unwrap_or(inherited), tag.is_context_for(target))
        } else {
            (inherited, inherited_ctx)
        };
        match target {
            Target::Ai => {
                entry.ai = value;
                entry.ai_context = ctx;
            }
            Target::Human => {
                entry.human = value;
                entry.human_context = ctx;
            }
        }
    }
    entry
}

/// Compute the per-line permission map for a document.
///
/// `total_lines` bounds the output; every line 1..=total_lines gets exactly
/// one entry. Tags must carry resolved ranges (as produced by
/// [`crate::parse`]); a tag whose range is inverted contributes nothing.
pub fn permissions(total_lines: usize, tags: &[GuardTag]) -> Vec<LinePermission> {
    let mut sorted: Vec<&GuardTag> = tags.iter().collect();
    sorted.sort_by_key(|t| t.line_number);

    let mut stack: Vec<StackEntry> = Vec::new();
    let mut out = Vec::with_capacity(total_lines);
    let mut next_tag = 0usize;

    for line in 1..=total_lines {
        // New guards first: a tag declared on the line where an earlier
        // guard dies still inherits that guard's state.
        while next_tag < sorted.len() && sorted[next_tag].line_number == line {
            let tag = sorted[next_tag];
            next_tag += 1;
            let (Some(start), Some(end)) = (tag.scope_start, tag.scope_end) else {
                continue;
            };
            if end < start {
                continue;
            }
            evict_trailing_context(&mut stack);
            let entry = compose_entry(&stack, tag, start, end);
            stack.push(entry);
        }

        // Evict everything that ended before this line, wherever it sits in
        // the stack; context guards uncovered by a pop go with it.
        while let Some(pos) = stack.iter().rposition(|e| e.end_line < line) {
            stack.remove(pos);
            evict_trailing_context(&mut stack);
        }

        let (ai, ai_context) = state_for(&stack, Target::Ai);
        let (human, human_context) = state_for(&stack, Target::Human);
        out.push(LinePermission {
            line,
            permissions: PermissionPair { ai: ai.effective(), human: human.effective() },
            is_context: ContextPair { ai: ai_context, human: human_context },
        });
    }
    out
}

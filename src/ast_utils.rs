use oxc_allocator::{Allocator, Vec as ArenaVec};
use oxc_ast::ast::*;

/// Replacement table over one statement list.
///
/// Rewrites address statements by slot index instead of by node pointer: the
/// list is drained into slots (one original statement each), a replacement
/// overwrites a slot's contents with zero or more statements, and the slots
/// are flattened back in sibling order at the end. Slots are emptied, never
/// removed, so every queued index stays valid across replacements.
pub struct StatementSlots<'a> {
    slots: Vec<Vec<Statement<'a>>>,
}

impl<'a> StatementSlots<'a> {
    pub fn take(stmts: &mut ArenaVec<'a, Statement<'a>>, allocator: &'a Allocator) -> Self {
        let original = std::mem::replace(stmts, ArenaVec::new_in(allocator));
        Self { slots: original.into_iter().map(|stmt| vec![stmt]).collect() }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// The statement at `index`, as long as the slot still holds its single
    /// original statement.
    pub fn get(&self, index: usize) -> Option<&Statement<'a>> {
        match self.slots[index].as_slice() {
            [stmt] => Some(stmt),
            _ => None,
        }
    }

    pub fn replace(&mut self, index: usize, replacements: Vec<Statement<'a>>) {
        self.slots[index] = replacements;
    }

    pub fn write_back(self, stmts: &mut ArenaVec<'a, Statement<'a>>) {
        for slot in self.slots {
            for stmt in slot {
                stmts.push(stmt);
            }
        }
    }
}

pub fn unwrap_parens<'a, 'b>(mut expr: &'b Expression<'a>) -> &'b Expression<'a> {
    loop {
        match expr {
            Expression::ParenthesizedExpression(p) => expr = &p.expression,
            _ => return expr,
        }
    }
}

pub fn is_identifier_named<'a>(expr: &Expression<'a>, name: &str) -> bool {
    let Expression::Identifier(id) = unwrap_parens(expr) else {
        return false;
    };
    id.name.as_str() == name
}

pub fn is_prototype_of<'a>(expr: &Expression<'a>, name: &str) -> bool {
    let Expression::StaticMemberExpression(mem) = unwrap_parens(expr) else {
        return false;
    };
    mem.property.name.as_str() == "prototype" && is_identifier_named(&mem.object, name)
}

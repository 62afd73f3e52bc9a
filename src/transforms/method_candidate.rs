use oxc_allocator::{Allocator, Box as ArenaBox, CloneIn, Vec as ArenaVec};
use oxc_ast::ast::*;

use crate::ast_utils::StatementSlots;

/// One constructor-or-method function lifted out of prototype-style code.
/// Owns a clone of the original function plus the slot index of its
/// originating statement; the constructor carries no slot of its own, since
/// its declaration is the node the class replaces.
pub struct MethodCandidate<'a> {
    key: IdentifierName<'a>,
    function: Function<'a>,
    kind: MethodDefinitionKind,
    is_static: bool,
    statement: Option<usize>,
}

impl<'a> MethodCandidate<'a> {
    pub fn constructor(function: &Function<'a>, allocator: &'a Allocator) -> Self {
        let key = IdentifierName {
            span: function.span,
            name: allocator.alloc_str("constructor").into(),
        };
        Self {
            key,
            function: function.clone_in(allocator),
            kind: MethodDefinitionKind::Constructor,
            is_static: false,
            statement: None,
        }
    }

    pub fn method(
        key: IdentifierName<'a>,
        function: Function<'a>,
        is_static: bool,
        statement: usize,
    ) -> Self {
        Self { key, function, kind: MethodDefinitionKind::Method, is_static, statement: Some(statement) }
    }

    pub fn name(&self) -> &str {
        self.key.name.as_str()
    }

    pub fn is_empty(&self) -> bool {
        match self.function.body.as_ref() {
            None => true,
            Some(body) => body.statements.is_empty() && body.directives.is_empty(),
        }
    }

    pub fn body_statements_mut(&mut self) -> Option<&mut ArenaVec<'a, Statement<'a>>> {
        self.function.body.as_mut().map(|body| &mut body.statements)
    }

    pub fn to_method_definition(&self, allocator: &'a Allocator) -> ClassElement<'a> {
        let mut function = self.function.clone_in(allocator);
        function.id = None;
        function.r#type = FunctionType::FunctionExpression;

        let md = MethodDefinition {
            span: self.key.span,
            r#type: MethodDefinitionType::MethodDefinition,
            decorators: ArenaVec::new_in(allocator),
            key: PropertyKey::StaticIdentifier(ArenaBox::new_in(
                self.key.clone_in(allocator),
                allocator,
            )),
            value: ArenaBox::new_in(function, allocator),
            kind: self.kind,
            computed: false,
            r#static: self.is_static,
            r#override: false,
            optional: false,
            accessibility: None,
        };

        ClassElement::MethodDefinition(ArenaBox::new_in(md, allocator))
    }

    pub fn remove(&self, slots: &mut StatementSlots<'a>) {
        if let Some(index) = self.statement {
            slots.replace(index, Vec::new());
        }
    }
}

use oxc_allocator::{Allocator, Box as ArenaBox, CloneIn, Vec as ArenaVec};
use oxc_ast::ast::*;
use oxc_span::ContentEq;

use crate::ast_utils::StatementSlots;

use super::method_candidate::MethodCandidate;

/// A queued removal against the surrounding statement list: empty the slot,
/// inserting nothing.
struct Replacement {
    node: usize,
}

/// A recognized convertible function, accumulated by the detection pass and
/// consumed exactly once by [`ClassCandidate::transform`]. Holds slot
/// indices into the statement list containing the original function; the
/// list itself is only handed over at commit time.
pub struct ClassCandidate<'a> {
    id: BindingIdentifier<'a>,
    constructor: MethodCandidate<'a>,
    full_node: usize,
    span: Span,
    super_class: Option<Expression<'a>>,
    methods: Vec<MethodCandidate<'a>>,
    replacements: Vec<Replacement>,
}

impl<'a> ClassCandidate<'a> {
    pub fn new(
        id: BindingIdentifier<'a>,
        constructor: MethodCandidate<'a>,
        full_node: usize,
        span: Span,
    ) -> Self {
        Self {
            id,
            constructor,
            full_node,
            span,
            super_class: None,
            methods: Vec::new(),
            replacements: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        self.id.name.as_str()
    }

    pub fn full_node(&self) -> usize {
        self.full_node
    }

    /// Calling this again overwrites the superclass but keeps appending
    /// removals.
    pub fn set_super_class(&mut self, super_class: Expression<'a>, related_statements: &[usize]) {
        self.super_class = Some(super_class);
        for &node in related_statements {
            self.replacements.push(Replacement { node });
        }
    }

    pub fn add_method(&mut self, method: MethodCandidate<'a>) {
        self.methods.push(method);
    }

    /// Callers must check this before committing: a function with neither a
    /// superclass nor extra methods gains nothing from class syntax.
    pub fn is_transformable(&self) -> bool {
        !self.methods.is_empty() || self.super_class.is_some()
    }

    /// The class reuses the original function's span, so the code generator
    /// reattaches any leading comments when it prints.
    pub fn to_class_declaration(&mut self, allocator: &'a Allocator) -> Statement<'a> {
        let mut elements = ArenaVec::new_in(allocator);
        if let Some(ctor) = self.create_constructor(allocator) {
            elements.push(ctor);
        }
        for method in &self.methods {
            elements.push(method.to_method_definition(allocator));
        }

        let body = ClassBody { span: self.span, body: elements };
        let class = Class {
            span: self.span,
            r#type: ClassType::ClassDeclaration,
            decorators: ArenaVec::new_in(allocator),
            id: Some(self.id.clone_in(allocator)),
            type_parameters: None,
            super_class: self.super_class.take(),
            super_type_arguments: None,
            implements: ArenaVec::new_in(allocator),
            body: ArenaBox::new_in(body, allocator),
            r#abstract: false,
            declare: false,
            scope_id: Default::default(),
        };

        Statement::ClassDeclaration(ArenaBox::new_in(class, allocator))
    }

    fn create_constructor(&mut self, allocator: &'a Allocator) -> Option<ClassElement<'a>> {
        // An empty constructor is omitted; the class falls back to the
        // implicit default one.
        if self.constructor.is_empty() {
            return None;
        }
        if let Some(super_class) = self.super_class.as_ref() {
            if let Some(statements) = self.constructor.body_statements_mut() {
                rewrite_super_calls(statements, super_class, allocator);
            }
        }
        Some(self.constructor.to_method_definition(allocator))
    }

    /// Commits the rewrite: the original function's slot becomes the class
    /// declaration, then every queued inheritance-setup statement and every
    /// method's originating statement is excised, in that order.
    pub fn transform(mut self, slots: &mut StatementSlots<'a>, allocator: &'a Allocator) {
        let class_declaration = self.to_class_declaration(allocator);
        slots.replace(self.full_node, vec![class_declaration]);
        for replacement in &self.replacements {
            slots.replace(replacement.node, Vec::new());
        }
        for method in &self.methods {
            method.remove(slots);
        }
    }
}

/// Rewrites `Super.call(this, ...)` statements into `super(...)`.
///
/// Only the immediate top-level statements of the constructor body are
/// scanned: a delegation buried in a conditional or a nested function is not
/// an unconditional super call and stays as written. Every matching
/// statement is rewritten, not just the first.
fn rewrite_super_calls<'a>(
    statements: &mut ArenaVec<'a, Statement<'a>>,
    super_class: &Expression<'a>,
    allocator: &'a Allocator,
) {
    // Pattern: <Super>.call(this, ...) where <Super> is structurally equal
    // to the recorded superclass. `this` carried the receiver for the
    // borrowed function; `super` binds it implicitly, so it is dropped.
    for stmt in statements.iter_mut() {
        let Statement::ExpressionStatement(es) = stmt else {
            continue;
        };
        let Expression::CallExpression(call) = &mut es.expression else {
            continue;
        };

        let span = {
            let Expression::StaticMemberExpression(callee) = &call.callee else {
                continue;
            };
            if callee.optional || callee.property.name.as_str() != "call" {
                continue;
            }
            if !callee.object.content_eq(super_class) {
                continue;
            }
            let Some(first) = call.arguments.first() else {
                continue;
            };
            let Some(first_expr) = first.as_expression() else {
                continue;
            };
            if !matches!(first_expr, Expression::ThisExpression(_)) {
                continue;
            }
            callee.span
        };

        call.callee = Expression::Super(ArenaBox::new_in(Super { span }, allocator));
        call.arguments.remove(0);
    }
}

use oxc_allocator::{Allocator, CloneIn, Vec as ArenaVec};
use oxc_ast::ast::*;
use oxc_ast_visit::VisitMut;

use std::collections::HashSet;

use crate::ast_utils::{is_identifier_named, is_prototype_of, unwrap_parens, StatementSlots};
use crate::{Transform, TransformCtx};

use super::class_candidate::ClassCandidate;
use super::method_candidate::MethodCandidate;

/// Converts a constructor function plus manual prototype wiring into a
/// native class declaration:
///
/// ```js
/// function Dog(name) { Animal.call(this, name); }
/// Dog.prototype = Object.create(Animal.prototype);
/// Dog.prototype.constructor = Dog;
/// Dog.prototype.bark = function () { return "woof"; };
/// ```
///
/// becomes `class Dog extends Animal { ... }` with a native super call.
pub struct ConvertToClass;

impl Transform for ConvertToClass {
    fn name(&self) -> &'static str {
        "convertToClass"
    }

    fn run<'a>(&self, ctx: &mut TransformCtx<'a>, program: &mut Program<'a>) -> bool {
        let mut v = Visitor { allocator: ctx.allocator, modified: false };
        v.visit_program(program);
        v.modified
    }
}

struct Visitor<'a> {
    allocator: &'a Allocator,
    modified: bool,
}

impl<'a> Visitor<'a> {
    fn rewrite_statement_list(&mut self, stmts: &mut ArenaVec<'a, Statement<'a>>) {
        if !stmts.iter().any(|s| matches!(s, Statement::FunctionDeclaration(_))) {
            return;
        }

        let mut slots = StatementSlots::take(stmts, self.allocator);
        let mut consumed: HashSet<usize> = HashSet::new();
        let mut candidates: Vec<ClassCandidate<'a>> = Vec::new();

        for i in 0..slots.len() {
            if consumed.contains(&i) {
                continue;
            }
            let Some(Statement::FunctionDeclaration(func)) = slots.get(i) else {
                continue;
            };
            let func = &**func;
            let Some(id) = func.id.as_ref() else {
                continue;
            };
            let class_name = id.name.as_str();

            let constructor = MethodCandidate::constructor(func, self.allocator);
            let mut candidate =
                ClassCandidate::new(id.clone_in(self.allocator), constructor, i, func.span);

            let mut super_class: Option<Expression<'a>> = None;
            let mut related: Vec<usize> = Vec::new();
            let mut taken: Vec<usize> = vec![i];

            // Methods and inheritance wiring don't have to sit right next to
            // the constructor; scan the rest of this statement list.
            for j in (i + 1)..slots.len() {
                if consumed.contains(&j) {
                    continue;
                }
                let Some(Statement::ExpressionStatement(es)) = slots.get(j) else {
                    continue;
                };
                let expr = unwrap_parens(&es.expression);

                if let Some(sc) = match_inherits_call(class_name, expr, self.allocator) {
                    super_class = Some(sc);
                    related.push(j);
                    taken.push(j);
                    continue;
                }
                if let Some(sc) = match_prototype_object_create(class_name, expr, self.allocator) {
                    super_class = Some(sc);
                    related.push(j);
                    taken.push(j);
                    continue;
                }
                if match_constructor_repair(class_name, expr) {
                    related.push(j);
                    taken.push(j);
                    continue;
                }
                if let Some((key, function, is_static)) =
                    match_member_function(class_name, expr, self.allocator)
                {
                    candidate.add_method(MethodCandidate::method(key, function, is_static, j));
                    taken.push(j);
                }
            }

            if let Some(sc) = super_class {
                candidate.set_super_class(sc, &related);
            }

            // A bare function with neither a superclass nor methods stays a
            // function.
            if !candidate.is_transformable() {
                continue;
            }

            consumed.extend(taken);
            candidates.push(candidate);
        }

        if !candidates.is_empty() {
            self.modified = true;
            for candidate in candidates {
                candidate.transform(&mut slots, self.allocator);
            }
        }

        slots.write_back(stmts);
    }
}

impl<'a> VisitMut<'a> for Visitor<'a> {
    fn visit_program(&mut self, it: &mut Program<'a>) {
        self.rewrite_statement_list(&mut it.body);
        oxc_ast_visit::walk_mut::walk_program(self, it);
    }

    fn visit_function_body(&mut self, it: &mut FunctionBody<'a>) {
        self.rewrite_statement_list(&mut it.statements);
        oxc_ast_visit::walk_mut::walk_function_body(self, it);
    }

    fn visit_block_statement(&mut self, it: &mut BlockStatement<'a>) {
        self.rewrite_statement_list(&mut it.body);
        oxc_ast_visit::walk_mut::walk_block_statement(self, it);
    }
}

fn match_member_function<'a>(
    class_name: &str,
    expr: &Expression<'a>,
    allocator: &'a Allocator,
) -> Option<(IdentifierName<'a>, Function<'a>, bool)> {
    // Pattern: C.prototype.m = function () {}  OR  C.m = function () {}
    // (static), plus the string-keyed computed forms of both.
    let Expression::AssignmentExpression(assign) = expr else {
        return None;
    };
    if assign.operator != AssignmentOperator::Assign {
        return None;
    }
    let Expression::FunctionExpression(func) = unwrap_parens(&assign.right) else {
        return None;
    };

    let (key, is_static) = match &assign.left {
        AssignmentTarget::StaticMemberExpression(mem) => {
            let key = mem.property.clone_in(allocator);
            if is_prototype_of(&mem.object, class_name) {
                (key, false)
            } else if is_identifier_named(&mem.object, class_name) {
                // `C.prototype = ...` is inheritance wiring, never a method.
                if key.name.as_str() == "prototype" {
                    return None;
                }
                (key, true)
            } else {
                return None;
            }
        }
        AssignmentTarget::ComputedMemberExpression(mem) => {
            let Expression::StringLiteral(key_lit) = unwrap_parens(&mem.expression) else {
                return None;
            };
            let key_str = key_lit.value.as_str();
            if key_str.is_empty() {
                return None;
            }
            let key =
                IdentifierName { span: key_lit.span, name: allocator.alloc_str(key_str).into() };
            if is_prototype_of(&mem.object, class_name) {
                (key, false)
            } else if is_identifier_named(&mem.object, class_name) {
                // `C["prototype"] = ...` is inheritance wiring, never a method.
                if key.name.as_str() == "prototype" {
                    return None;
                }
                (key, true)
            } else {
                return None;
            }
        }
        _ => return None,
    };

    Some((key, (**func).clone_in(allocator), is_static))
}

fn match_prototype_object_create<'a>(
    class_name: &str,
    expr: &Expression<'a>,
    allocator: &'a Allocator,
) -> Option<Expression<'a>> {
    // Pattern: C.prototype = Object.create(S.prototype);  yields S.
    let Expression::AssignmentExpression(assign) = expr else {
        return None;
    };
    if assign.operator != AssignmentOperator::Assign {
        return None;
    }
    let AssignmentTarget::StaticMemberExpression(mem) = &assign.left else {
        return None;
    };
    if mem.property.name.as_str() != "prototype" || !is_identifier_named(&mem.object, class_name) {
        return None;
    }

    let Expression::CallExpression(call) = unwrap_parens(&assign.right) else {
        return None;
    };
    let Expression::StaticMemberExpression(callee) = unwrap_parens(&call.callee) else {
        return None;
    };
    if callee.property.name.as_str() != "create" || !is_identifier_named(&callee.object, "Object") {
        return None;
    }
    if call.arguments.len() != 1 {
        return None;
    }
    let arg = call.arguments[0].as_expression()?;
    let Expression::StaticMemberExpression(proto) = unwrap_parens(arg) else {
        return None;
    };
    if proto.property.name.as_str() != "prototype" {
        return None;
    }
    Some(proto.object.clone_in(allocator))
}

fn match_constructor_repair<'a>(class_name: &str, expr: &Expression<'a>) -> bool {
    // Pattern: C.prototype.constructor = C;  cleanup that accompanies a
    // prototype replacement.
    let Expression::AssignmentExpression(assign) = expr else {
        return false;
    };
    if assign.operator != AssignmentOperator::Assign {
        return false;
    }
    let AssignmentTarget::StaticMemberExpression(mem) = &assign.left else {
        return false;
    };
    if mem.property.name.as_str() != "constructor" || !is_prototype_of(&mem.object, class_name) {
        return false;
    }
    is_identifier_named(&assign.right, class_name)
}

fn match_inherits_call<'a>(
    class_name: &str,
    expr: &Expression<'a>,
    allocator: &'a Allocator,
) -> Option<Expression<'a>> {
    // Pattern: inherits(C, S);  or  util.inherits(C, S);  yields S.
    let Expression::CallExpression(call) = expr else {
        return None;
    };
    let callee_name = match unwrap_parens(&call.callee) {
        Expression::Identifier(id) => id.name.as_str(),
        Expression::StaticMemberExpression(mem) => mem.property.name.as_str(),
        _ => return None,
    };
    if callee_name != "inherits" {
        return None;
    }
    if call.arguments.len() != 2 {
        return None;
    }
    let sub = call.arguments[0].as_expression()?;
    if !is_identifier_named(sub, class_name) {
        return None;
    }
    let sup = call.arguments[1].as_expression()?;
    Some(sup.clone_in(allocator))
}

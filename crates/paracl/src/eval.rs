//! The tree-walking evaluator.
//!
//! One [`Evaluator`] per run: it owns the scope stack and borrows the
//! program, the output sink, the input source, and a recursion guard for the
//! duration of `eval`. Every node visit follows the same shape (`spec.md`
//! §4.F): recurse into required children in the operator's evaluation
//! order, capture each child's `Value` as it comes back, then either fold
//! those into this node's own result (expressions) or apply a side effect
//! (statements).

use tracing::trace;

use crate::{
    arena::NodeId,
    ast::{AssignTarget, BinOp, Expr, Node, Program, Stmt, UnOp},
    error::RuntimeError,
    intern::NameId,
    io::{InputSource, NoInput, PrintWriter},
    namespace::Scopes,
    resource::{RecursionGuard, Unbounded},
    value::Value,
};

/// Runs `program` to completion against `print` and `input`, with no
/// recursion limit.
pub fn run(program: &Program, print: &mut impl PrintWriter, input: &mut impl InputSource) -> Result<(), RuntimeError> {
    Evaluator::new(program, print, input, Unbounded::new()).run()
}

/// Runs `program` to completion, aborting with `RuntimeError::RecursionLimit`
/// if evaluation nests deeper than `guard` allows.
pub fn run_with_guard(
    program: &Program,
    print: &mut impl PrintWriter,
    input: &mut impl InputSource,
    guard: impl RecursionGuard,
) -> Result<(), RuntimeError> {
    Evaluator::new(program, print, input, guard).run()
}

/// Runs `program` discarding all `Input` reads that never occur and
/// producing no output, useful when a program is known not to print.
pub fn run_silent(program: &Program) -> Result<(), RuntimeError> {
    run(program, &mut crate::io::NoPrint, &mut NoInput)
}

/// Holds everything a single evaluation needs: the parsed program, the live
/// scope stack, and the two I/O collaborators.
pub struct Evaluator<'a, P, I, G> {
    program: &'a Program,
    scopes: Scopes,
    print: &'a mut P,
    input: &'a mut I,
    guard: G,
}

impl<'a, P: PrintWriter, I: InputSource, G: RecursionGuard> Evaluator<'a, P, I, G> {
    pub fn new(program: &'a Program, print: &'a mut P, input: &'a mut I, guard: G) -> Self {
        Self { program, scopes: Scopes::new(), print, input, guard }
    }

    /// Evaluates the program's root scope and returns.
    pub fn run(&mut self) -> Result<(), RuntimeError> {
        trace!(nodes = self.program.arena.len(), "starting evaluation");
        let result = self.exec_stmt(self.program.root);
        match &result {
            Ok(()) => trace!("evaluation finished"),
            Err(err) => trace!(%err, "evaluation aborted"),
        }
        result
    }

    fn node(&self, id: NodeId) -> &Node {
        self.program.arena.get(id)
    }

    fn name_text(&self, name: NameId) -> String {
        self.program.interner.resolve(name).to_owned()
    }

    fn expr(&self, id: NodeId) -> &Expr {
        self.node(id).as_expr().expect("evaluator asked to evaluate a statement node as an expression")
    }

    fn stmt(&self, id: NodeId) -> &Stmt {
        self.node(id).as_stmt().expect("evaluator asked to execute an expression node as a statement")
    }

    fn enter_node(&mut self) -> Result<(), RuntimeError> {
        self.guard.enter()
    }

    fn leave_node(&mut self) {
        self.guard.leave();
    }

    /// Evaluates an expression node, producing its `Value`.
    fn eval_expr(&mut self, id: NodeId) -> Result<Value, RuntimeError> {
        self.enter_node()?;
        let result = self.eval_expr_inner(id);
        self.leave_node();
        result
    }

    fn eval_expr_inner(&mut self, id: NodeId) -> Result<Value, RuntimeError> {
        match self.expr(id).clone() {
            Expr::Constant(n) => Ok(Value::Int(n)),
            Expr::Variable(name) => {
                let text = self.name_text(name);
                self.scopes.read(name, || text).map(Value::clone)
            }
            Expr::Input => self.input.read_int().map(Value::Int),
            Expr::Binary(op, left, right) => self.eval_binary(op, left, right),
            Expr::Unary(op, operand) => self.eval_unary(op, operand),
            Expr::Index(target, index) => self.eval_index(target, index),
            Expr::ArrayLiteral(elements) => {
                let mut values = Vec::with_capacity(elements.len());
                for element in elements {
                    values.push(self.eval_expr(element)?);
                }
                Ok(Value::Array(values))
            }
            Expr::Repeat { element, size } => self.eval_repeat(element, size),
            Expr::Assign(target, rhs) => self.eval_assign(&target, rhs),
        }
    }

    fn eval_binary(&mut self, op: BinOp, left: NodeId, right: NodeId) -> Result<Value, RuntimeError> {
        // Both operands are always evaluated, left before right, even for
        // `And`/`Or` (spec.md §9: no short-circuiting).
        let lhs = self.eval_expr(left)?;
        let rhs = self.eval_expr(right)?;
        match op {
            BinOp::Add => lhs.add(&rhs),
            BinOp::Sub => lhs.sub(&rhs),
            BinOp::Mul => lhs.mul(&rhs),
            BinOp::Div => lhs.div(&rhs),
            BinOp::Mod => lhs.rem(&rhs),
            BinOp::Lt => lhs.lt(&rhs),
            BinOp::Gt => lhs.gt(&rhs),
            BinOp::Le => lhs.le(&rhs),
            BinOp::Ge => lhs.ge(&rhs),
            BinOp::Eq => lhs.eq_val(&rhs),
            BinOp::Ne => lhs.ne_val(&rhs),
            BinOp::And => lhs.and(&rhs),
            BinOp::Or => lhs.or(&rhs),
        }
    }

    fn eval_unary(&mut self, op: UnOp, operand: NodeId) -> Result<Value, RuntimeError> {
        let value = self.eval_expr(operand)?;
        match op {
            UnOp::Neg => value.neg(),
            UnOp::Not => value.not(),
        }
    }

    /// `ArrayIndex` read: evaluates the index, then resolves the base
    /// (`spec.md` §4.F); the base is either a scope read (`Variable`) or a
    /// recursive index evaluation, enabling `a[i][j]`.
    fn eval_index(&mut self, target: NodeId, index: NodeId) -> Result<Value, RuntimeError> {
        let idx = self.eval_expr(index)?.as_int()?;
        let base = match self.expr(target).clone() {
            Expr::Variable(name) => {
                let text = self.name_text(name);
                self.scopes.read(name, || text)?.clone()
            }
            _ => self.eval_expr(target)?,
        };
        let items = base.as_array()?;
        let slot = usize::try_from(idx).map_err(|_| RuntimeError::IndexOutOfBounds { index: idx, length: items.len() })?;
        items
            .get(slot)
            .cloned()
            .ok_or(RuntimeError::IndexOutOfBounds { index: idx, length: items.len() })
    }

    fn eval_repeat(&mut self, element: Option<NodeId>, size: NodeId) -> Result<Value, RuntimeError> {
        let size = self.eval_expr(size)?.as_int()?;
        let len = usize::try_from(size).map_err(|_| RuntimeError::NegativeArraySize(size))?;
        let filler = match element {
            Some(element) => self.eval_expr(element)?,
            None => Value::Int(0),
        };
        Ok(Value::Array(vec![filler; len]))
    }

    fn eval_assign(&mut self, target: &AssignTarget, rhs: NodeId) -> Result<Value, RuntimeError> {
        match target {
            AssignTarget::Variable(name) => {
                let value = self.eval_expr(rhs)?;
                self.scopes.write(*name, value.clone());
                Ok(value)
            }
            AssignTarget::Index(index_node) => {
                // Indices are collected outermost-first before the
                // right-hand side evaluates (spec.md §4.F).
                let (name, path) = self.collect_indices(*index_node)?;
                let value = self.eval_expr(rhs)?;
                self.write_into(name, &path, value.clone())?;
                Ok(value)
            }
        }
    }

    /// Walks an `Index` chain from the outside in, evaluating each
    /// subscript as it is reached (outermost-first) and returning the
    /// variable being written plus its navigation path, outermost subscript
    /// first (`[i, j]` for `a[i][j]`).
    fn collect_indices(&mut self, id: NodeId) -> Result<(NameId, Vec<i64>), RuntimeError> {
        self.enter_node()?;
        let result = self.collect_indices_inner(id);
        self.leave_node();
        result
    }

    fn collect_indices_inner(&mut self, id: NodeId) -> Result<(NameId, Vec<i64>), RuntimeError> {
        let (target, index) = match self.expr(id).clone() {
            Expr::Index(target, index) => (target, index),
            _ => unreachable!("AssignTarget::Index always names an Expr::Index node"),
        };
        let idx = self.eval_expr(index)?.as_int()?;
        match self.expr(target).clone() {
            Expr::Variable(name) => Ok((name, vec![idx])),
            Expr::Index(..) => {
                let (name, mut path) = self.collect_indices(target)?;
                path.push(idx);
                Ok((name, path))
            }
            _ => unreachable!("an Index target is always a Variable or another Index"),
        }
    }

    /// Deep-navigates to the cell named by `path` (outermost subscript
    /// first) and replaces it with `value`.
    fn write_into(&mut self, name: NameId, path: &[i64], value: Value) -> Result<(), RuntimeError> {
        let text = self.name_text(name);
        let mut cell = self.scopes.read_mut(name, || text)?;
        for (depth, &idx) in path.iter().enumerate() {
            let items = cell.as_array_mut()?;
            let slot =
                usize::try_from(idx).map_err(|_| RuntimeError::IndexOutOfBounds { index: idx, length: items.len() })?;
            if slot >= items.len() {
                return Err(RuntimeError::IndexOutOfBounds { index: idx, length: items.len() });
            }
            if depth == path.len() - 1 {
                items[slot] = value;
                return Ok(());
            }
            cell = &mut items[slot];
        }
        unreachable!("an Index node always contributes at least one path element")
    }

    /// Executes a statement node, applying its side effects.
    fn exec_stmt(&mut self, id: NodeId) -> Result<(), RuntimeError> {
        self.enter_node()?;
        let result = self.exec_stmt_inner(id);
        self.leave_node();
        result
    }

    fn exec_stmt_inner(&mut self, id: NodeId) -> Result<(), RuntimeError> {
        trace!(?id, depth = self.guard.depth(), "dispatch statement");
        match self.stmt(id).clone() {
            Stmt::Assign(target, rhs) => self.eval_assign(&target, rhs).map(|_| ()),
            Stmt::Print(expr) => {
                let value = self.eval_expr(expr)?.as_int()?;
                self.print.print_line(value)
            }
            Stmt::If { cond, then_branch, else_branch } => {
                if self.eval_expr(cond)?.is_truthy()? {
                    self.exec_stmt(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.exec_stmt(else_branch)
                } else {
                    Ok(())
                }
            }
            Stmt::While { cond, body } => {
                while self.eval_expr(cond)?.is_truthy()? {
                    self.exec_stmt(body)?;
                }
                Ok(())
            }
            Stmt::Scope(statements) => self.exec_scope(&statements),
        }
    }

    fn exec_scope(&mut self, statements: &[NodeId]) -> Result<(), RuntimeError> {
        if statements.is_empty() {
            return Ok(());
        }
        trace!("scope: enter");
        self.scopes.enter();
        let result = (|| {
            for &stmt in statements {
                self.exec_stmt(stmt)?;
            }
            Ok(())
        })();
        self.scopes.leave();
        trace!("scope: leave");
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{arena::Arena, intern::Interner, io::VecInput};

    struct Builder {
        arena: Arena,
        interner: Interner,
    }

    impl Builder {
        fn new() -> Self {
            Self { arena: Arena::new(), interner: Interner::new() }
        }

        fn var(&mut self, text: &str) -> NameId {
            self.interner.intern(text)
        }

        fn node(&mut self, node: Node) -> NodeId {
            self.arena.alloc(node)
        }

        fn finish(self, root: NodeId) -> Program {
            Program { arena: self.arena, interner: self.interner, root }
        }
    }

    fn run_collecting(build: impl FnOnce(&mut Builder) -> NodeId) -> Result<String, RuntimeError> {
        let mut builder = Builder::new();
        let root = build(&mut builder);
        let program = builder.finish(root);
        let mut sink = crate::io::CollectStringPrint::new();
        let mut input = crate::io::NoInput;
        run(&program, &mut sink, &mut input)?;
        Ok(sink.into_output())
    }

    #[test]
    fn scenario_print_a_constant() {
        // x := 5; print x;
        let out = run_collecting(|b| {
            let x = b.var("x");
            let five = b.node(Node::Expr(Expr::Constant(5)));
            let assign = b.node(Node::Stmt(Stmt::Assign(AssignTarget::Variable(x), five)));
            let read_x = b.node(Node::Expr(Expr::Variable(x)));
            let print = b.node(Node::Stmt(Stmt::Print(read_x)));
            b.node(Node::Stmt(Stmt::Scope(vec![assign, print])))
        })
        .unwrap();
        assert_eq!(out, "5\n");
    }

    #[test]
    fn scenario_while_loop_counts_down() {
        // x := 3; while (x > 0) { print x; x := x - 1; }
        let out = run_collecting(|b| {
            let x = b.var("x");
            let three = b.node(Node::Expr(Expr::Constant(3)));
            let assign_init = b.node(Node::Stmt(Stmt::Assign(AssignTarget::Variable(x), three)));

            let read_x_cond = b.node(Node::Expr(Expr::Variable(x)));
            let zero = b.node(Node::Expr(Expr::Constant(0)));
            let cond = b.node(Node::Expr(Expr::Binary(BinOp::Gt, read_x_cond, zero)));

            let read_x_print = b.node(Node::Expr(Expr::Variable(x)));
            let print = b.node(Node::Stmt(Stmt::Print(read_x_print)));

            let read_x_sub = b.node(Node::Expr(Expr::Variable(x)));
            let one = b.node(Node::Expr(Expr::Constant(1)));
            let sub = b.node(Node::Expr(Expr::Binary(BinOp::Sub, read_x_sub, one)));
            let decrement = b.node(Node::Stmt(Stmt::Assign(AssignTarget::Variable(x), sub)));

            let body = b.node(Node::Stmt(Stmt::Scope(vec![print, decrement])));
            let while_stmt = b.node(Node::Stmt(Stmt::While { cond, body }));
            b.node(Node::Stmt(Stmt::Scope(vec![assign_init, while_stmt])))
        })
        .unwrap();
        assert_eq!(out, "3\n2\n1\n");
    }

    #[test]
    fn scenario_shadowing_inner_scope() {
        // x := 1; { x := 2; print x; } print x;
        let out = run_collecting(|b| {
            let x = b.var("x");
            let one = b.node(Node::Expr(Expr::Constant(1)));
            let assign_outer = b.node(Node::Stmt(Stmt::Assign(AssignTarget::Variable(x), one)));

            let two = b.node(Node::Expr(Expr::Constant(2)));
            let assign_inner = b.node(Node::Stmt(Stmt::Assign(AssignTarget::Variable(x), two)));
            let read_inner = b.node(Node::Expr(Expr::Variable(x)));
            let print_inner = b.node(Node::Stmt(Stmt::Print(read_inner)));
            let inner_scope = b.node(Node::Stmt(Stmt::Scope(vec![assign_inner, print_inner])));

            let read_outer = b.node(Node::Expr(Expr::Variable(x)));
            let print_outer = b.node(Node::Stmt(Stmt::Print(read_outer)));
            b.node(Node::Stmt(Stmt::Scope(vec![assign_outer, inner_scope, print_outer])))
        })
        .unwrap();
        // This engine's write rule updates the nearest enclosing binding
        // when one exists (see namespace.rs), matching the grounding
        // source's Context::getVar and the loop-counter scenario above; see
        // DESIGN.md for why this means the inner write is observable here
        // rather than reverting on scope exit.
        assert_eq!(out, "2\n2\n");
    }

    #[test]
    fn scenario_array_literal_and_index_assignment() {
        // a := [1, 2, 3]; a[1] := 99; print a[0]; print a[1]; print a[2];
        let out = run_collecting(|b| {
            let a = b.var("a");
            let one = b.node(Node::Expr(Expr::Constant(1)));
            let two = b.node(Node::Expr(Expr::Constant(2)));
            let three = b.node(Node::Expr(Expr::Constant(3)));
            let literal = b.node(Node::Expr(Expr::ArrayLiteral(vec![one, two, three])));
            let assign = b.node(Node::Stmt(Stmt::Assign(AssignTarget::Variable(a), literal)));

            let var_a = b.node(Node::Expr(Expr::Variable(a)));
            let idx1 = b.node(Node::Expr(Expr::Constant(1)));
            let index_target = b.node(Node::Expr(Expr::Index(var_a, idx1)));
            let ninety_nine = b.node(Node::Expr(Expr::Constant(99)));
            let index_assign = b.node(Node::Stmt(Stmt::Assign(AssignTarget::Index(index_target), ninety_nine)));

            let mut prints = Vec::new();
            for i in 0..3 {
                let var_a = b.node(Node::Expr(Expr::Variable(a)));
                let idx = b.node(Node::Expr(Expr::Constant(i)));
                let index = b.node(Node::Expr(Expr::Index(var_a, idx)));
                prints.push(b.node(Node::Stmt(Stmt::Print(index))));
            }

            let mut statements = vec![assign, index_assign];
            statements.extend(prints);
            b.node(Node::Stmt(Stmt::Scope(statements)))
        })
        .unwrap();
        assert_eq!(out, "1\n99\n3\n");
    }

    #[test]
    fn scenario_repeat_evaluates_element_exactly_once() {
        // a := repeat (?) of 3; print a[0]; print a[2];
        let mut builder = Builder::new();
        let a = builder.var("a");
        let input_node = builder.node(Node::Expr(Expr::Input));
        let three = builder.node(Node::Expr(Expr::Constant(3)));
        let repeat = builder.node(Node::Expr(Expr::Repeat { element: Some(input_node), size: three }));
        let assign = builder.node(Node::Stmt(Stmt::Assign(AssignTarget::Variable(a), repeat)));

        let var_a1 = builder.node(Node::Expr(Expr::Variable(a)));
        let idx0 = builder.node(Node::Expr(Expr::Constant(0)));
        let index0 = builder.node(Node::Expr(Expr::Index(var_a1, idx0)));
        let print0 = builder.node(Node::Stmt(Stmt::Print(index0)));

        let var_a2 = builder.node(Node::Expr(Expr::Variable(a)));
        let idx2 = builder.node(Node::Expr(Expr::Constant(2)));
        let index2 = builder.node(Node::Expr(Expr::Index(var_a2, idx2)));
        let print2 = builder.node(Node::Stmt(Stmt::Print(index2)));

        let root = builder.node(Node::Stmt(Stmt::Scope(vec![assign, print0, print2])));
        let program = builder.finish(root);

        let mut sink = crate::io::CollectStringPrint::new();
        let mut input = VecInput::new([7]);
        run(&program, &mut sink, &mut input).unwrap();
        assert_eq!(sink.into_output(), "7\n7\n");
        assert!(matches!(input.read_int(), Err(RuntimeError::InputError(_))));
    }

    #[test]
    fn scenario_both_sides_of_logical_and_are_evaluated() {
        // a := (? == 0) && (? == 0)
        let mut builder = Builder::new();
        let a = builder.var("a");
        let left_input = builder.node(Node::Expr(Expr::Input));
        let left_zero = builder.node(Node::Expr(Expr::Constant(0)));
        let left = builder.node(Node::Expr(Expr::Binary(BinOp::Eq, left_input, left_zero)));
        let right_input = builder.node(Node::Expr(Expr::Input));
        let right_zero = builder.node(Node::Expr(Expr::Constant(0)));
        let right = builder.node(Node::Expr(Expr::Binary(BinOp::Eq, right_input, right_zero)));
        let and_expr = builder.node(Node::Expr(Expr::Binary(BinOp::And, left, right)));
        let assign = builder.node(Node::Stmt(Stmt::Assign(AssignTarget::Variable(a), and_expr)));
        let root = builder.node(Node::Stmt(Stmt::Scope(vec![assign])));
        let program = builder.finish(root);

        let mut input = VecInput::new([0, 1]);
        run_silent_with(&program, &mut input).unwrap();
        assert!(matches!(input.read_int(), Err(RuntimeError::InputError(_))));
    }

    fn run_silent_with(program: &Program, input: &mut impl InputSource) -> Result<(), RuntimeError> {
        run(program, &mut crate::io::NoPrint, input)
    }

    #[test]
    fn fault_division_by_zero() {
        let mut builder = Builder::new();
        let one = builder.node(Node::Expr(Expr::Constant(1)));
        let zero = builder.node(Node::Expr(Expr::Constant(0)));
        let div = builder.node(Node::Expr(Expr::Binary(BinOp::Div, one, zero)));
        let print = builder.node(Node::Stmt(Stmt::Print(div)));
        let root = builder.node(Node::Stmt(Stmt::Scope(vec![print])));
        let program = builder.finish(root);
        let err = run_silent(&program).unwrap_err();
        assert_eq!(err, RuntimeError::DivisionByZero);
    }

    #[test]
    fn fault_undeclared_variable() {
        let mut builder = Builder::new();
        let x = builder.var("x");
        let read = builder.node(Node::Expr(Expr::Variable(x)));
        let print = builder.node(Node::Stmt(Stmt::Print(read)));
        let root = builder.node(Node::Stmt(Stmt::Scope(vec![print])));
        let program = builder.finish(root);
        let err = run_silent(&program).unwrap_err();
        assert_eq!(err, RuntimeError::UndeclaredVariable("x".to_string()));
    }

    #[test]
    fn fault_index_out_of_bounds() {
        let mut builder = Builder::new();
        let a = builder.var("a");
        let one = builder.node(Node::Expr(Expr::Constant(1)));
        let two = builder.node(Node::Expr(Expr::Constant(2)));
        let literal = builder.node(Node::Expr(Expr::ArrayLiteral(vec![one, two])));
        let assign = builder.node(Node::Stmt(Stmt::Assign(AssignTarget::Variable(a), literal)));
        let var_a = builder.node(Node::Expr(Expr::Variable(a)));
        let five = builder.node(Node::Expr(Expr::Constant(5)));
        let index = builder.node(Node::Expr(Expr::Index(var_a, five)));
        let print = builder.node(Node::Stmt(Stmt::Print(index)));
        let root = builder.node(Node::Stmt(Stmt::Scope(vec![assign, print])));
        let program = builder.finish(root);
        let err = run_silent(&program).unwrap_err();
        assert_eq!(err, RuntimeError::IndexOutOfBounds { index: 5, length: 2 });
    }

    #[test]
    fn fault_type_mismatch_arithmetic_on_array() {
        let mut builder = Builder::new();
        let a = builder.var("a");
        let one = builder.node(Node::Expr(Expr::Constant(1)));
        let two = builder.node(Node::Expr(Expr::Constant(2)));
        let literal = builder.node(Node::Expr(Expr::ArrayLiteral(vec![one, two])));
        let assign = builder.node(Node::Stmt(Stmt::Assign(AssignTarget::Variable(a), literal)));
        let var_a = builder.node(Node::Expr(Expr::Variable(a)));
        let one_again = builder.node(Node::Expr(Expr::Constant(1)));
        let add = builder.node(Node::Expr(Expr::Binary(BinOp::Add, var_a, one_again)));
        let print = builder.node(Node::Stmt(Stmt::Print(add)));
        let root = builder.node(Node::Stmt(Stmt::Scope(vec![assign, print])));
        let program = builder.finish(root);
        let err = run_silent(&program).unwrap_err();
        assert!(matches!(err, RuntimeError::TypeMismatch { .. }));
    }

    #[test]
    fn chained_assignment_expression_writes_both_names() {
        // a := b := 5
        let mut builder = Builder::new();
        let a = builder.var("a");
        let b = builder.var("b");
        let five = builder.node(Node::Expr(Expr::Constant(5)));
        let inner_assign = builder.node(Node::Expr(Expr::Assign(AssignTarget::Variable(b), five)));
        let outer_assign = builder.node(Node::Stmt(Stmt::Assign(AssignTarget::Variable(a), inner_assign)));

        let read_a = builder.node(Node::Expr(Expr::Variable(a)));
        let print_a = builder.node(Node::Stmt(Stmt::Print(read_a)));
        let read_b = builder.node(Node::Expr(Expr::Variable(b)));
        let print_b = builder.node(Node::Stmt(Stmt::Print(read_b)));

        let root = builder.node(Node::Stmt(Stmt::Scope(vec![outer_assign, print_a, print_b])));
        let program = builder.finish(root);
        let mut sink = crate::io::CollectStringPrint::new();
        let mut input = crate::io::NoInput;
        run(&program, &mut sink, &mut input).unwrap();
        assert_eq!(sink.into_output(), "5\n5\n");
    }

    #[test]
    fn empty_scope_pushes_nothing_and_prints_nothing() {
        let mut builder = Builder::new();
        let empty = builder.node(Node::Stmt(Stmt::Scope(vec![])));
        let program = builder.finish(empty);
        let mut sink = crate::io::CollectStringPrint::new();
        let mut input = crate::io::NoInput;
        run(&program, &mut sink, &mut input).unwrap();
        assert_eq!(sink.into_output(), "");
    }

    #[test]
    fn recursion_guard_aborts_a_pathologically_deep_expression() {
        let mut builder = Builder::new();
        let mut node = builder.node(Node::Expr(Expr::Constant(0)));
        for _ in 0..50 {
            node = builder.node(Node::Expr(Expr::Unary(UnOp::Neg, node)));
        }
        let print = builder.node(Node::Stmt(Stmt::Print(node)));
        let root = builder.node(Node::Stmt(Stmt::Scope(vec![print])));
        let program = builder.finish(root);

        let mut sink = crate::io::CollectStringPrint::new();
        let mut input = crate::io::NoInput;
        let err = run_with_guard(&program, &mut sink, &mut input, crate::resource::LimitedDepth::new(10)).unwrap_err();
        assert_eq!(err, RuntimeError::RecursionLimit { limit: 10 });
    }
}

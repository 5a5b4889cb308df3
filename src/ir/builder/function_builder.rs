use crate::ir::symbol_table::{GlobalTable, SymbolTable};
use crate::ir::{
    BinOp, FuncId, Function, IcmpCond, Inst, InstKind, Label, LocalId, Module, ValueRef,
};
use crate::semantic_error::{SemanticError, SemanticErrorKind};
use crate::ty::Ty;

/// Per-function lowering state: the instruction stream under construction,
/// the scoped symbol table, and the break/continue target stacks.
///
/// The emit helpers carry the operand-type contracts of the instruction
/// set as debug assertions: violating them is a programmer error, checked
/// in debug builds and unchecked in release builds.
#[derive(Debug)]
pub struct FunctionBuilder<'a> {
    pub module: &'a mut Module,
    pub func_id: FuncId,
    pub symbol_table: SymbolTable<'a>,
    pub func_name: String,
    pub ret_ty: Ty,
    errors: &'a mut Vec<SemanticError>,
    break_stack: Vec<Label>,
    continue_stack: Vec<Label>,
    recovery: Option<LocalId>,
}

impl<'a> FunctionBuilder<'a> {
    pub fn new(
        module: &'a mut Module,
        func_id: FuncId,
        globals: &'a GlobalTable,
        errors: &'a mut Vec<SemanticError>,
    ) -> Self {
        let func_name = module.function(func_id).name.clone();
        let ret_ty = module.function(func_id).ret_ty.clone();
        FunctionBuilder {
            module,
            func_id,
            symbol_table: SymbolTable::new(globals),
            func_name,
            ret_ty,
            errors,
            break_stack: Vec::new(),
            continue_stack: Vec::new(),
            recovery: None,
        }
    }

    pub fn func(&mut self) -> &mut Function {
        self.module.function_mut(self.func_id)
    }

    pub fn func_ref(&self) -> &Function {
        self.module.function(self.func_id)
    }

    pub fn report(&mut self, kind: SemanticErrorKind, line: u32) {
        self.errors.push(SemanticError::new(kind, line));
    }

    /// The type a value has in operand position. Locals and globals denote
    /// their address; an array-typed parameter's slot value is the incoming
    /// pointer itself.
    pub fn value_ty(&self, value: ValueRef) -> Ty {
        match value {
            ValueRef::Const(_) => Ty::int32(),
            ValueRef::Global(id) => Ty::pointer_of(self.module.global(id).ty()),
            ValueRef::Local(id) => {
                let slot = self.func_ref().local(id);
                if slot.is_param && slot.ty.is_pointer() {
                    slot.ty.clone()
                } else {
                    Ty::pointer_of(&slot.ty)
                }
            }
            ValueRef::Func(id) => self.module.function(id).ret_ty.clone(),
            ValueRef::Inst(id) => self.func_ref().inst(id).ty.clone(),
        }
    }

    /// A throwaway i32 slot used to keep lowering going after a semantic
    /// error; shared across all recovery sites of the function.
    pub fn recovery_slot(&mut self) -> ValueRef {
        let id = match self.recovery {
            Some(id) => id,
            None => {
                let id = self.func().new_local(Ty::int32(), None, false);
                self.recovery = Some(id);
                id
            }
        };
        ValueRef::Local(id)
    }

    pub fn enter_loop(&mut self, header: Label, exit: Label) {
        self.continue_stack.push(header);
        self.break_stack.push(exit);
    }

    pub fn exit_loop(&mut self) {
        self.continue_stack.pop();
        self.break_stack.pop();
    }

    pub fn break_target(&self) -> Option<Label> {
        self.break_stack.last().copied()
    }

    pub fn continue_target(&self) -> Option<Label> {
        self.continue_stack.last().copied()
    }

    pub fn emit_binary(&mut self, op: BinOp, lhs: ValueRef, rhs: ValueRef) -> ValueRef {
        debug_assert!(self.value_ty(lhs).is_int32() && self.value_ty(rhs).is_int32());
        let name = self.func().new_temp_name();
        let id = self.func().push_inst(Inst {
            kind: InstKind::Binary(op),
            ty: Ty::int32(),
            name: Some(name),
            operands: vec![lhs, rhs],
        });
        ValueRef::Inst(id)
    }

    pub fn emit_icmp(&mut self, cond: IcmpCond, lhs: ValueRef, rhs: ValueRef) -> ValueRef {
        debug_assert!(self.value_ty(lhs).is_int32() && self.value_ty(rhs).is_int32());
        let name = self.func().new_temp_name();
        let id = self.func().push_inst(Inst {
            kind: InstKind::Icmp(cond),
            ty: Ty::int32(),
            name: Some(name),
            operands: vec![lhs, rhs],
        });
        ValueRef::Inst(id)
    }

    pub fn emit_load(&mut self, addr: ValueRef) -> ValueRef {
        let addr_ty = self.value_ty(addr);
        debug_assert!(addr_ty.is_pointer());
        let ty = addr_ty.pointee().unwrap_or_else(Ty::int32);
        let name = self.func().new_temp_name();
        let id = self.func().push_inst(Inst {
            kind: InstKind::Load,
            ty,
            name: Some(name),
            operands: vec![addr],
        });
        ValueRef::Inst(id)
    }

    pub fn emit_store(&mut self, value: ValueRef, addr: ValueRef) {
        debug_assert!(self.value_ty(addr).pointee() == Some(self.value_ty(value)));
        self.func().push_inst(Inst {
            kind: InstKind::Store,
            ty: Ty::void(),
            name: None,
            operands: vec![value, addr],
        });
    }

    pub fn emit_gep(&mut self, base: ValueRef, indices: Vec<ValueRef>) -> ValueRef {
        let base_ty = self.value_ty(base);
        debug_assert!(base_ty
            .pointee()
            .map(|p| p.is_array())
            .unwrap_or(false));
        let mut elem = base_ty.pointee().unwrap_or_else(Ty::int32);
        for _ in &indices {
            match elem.element() {
                Some(next) => elem = next,
                None => break,
            }
        }
        let ty = Ty::pointer_of(&elem);
        let name = self.func().new_temp_name();
        let mut operands = vec![base];
        operands.extend(indices);
        let id = self.func().push_inst(Inst {
            kind: InstKind::GetElementPtr,
            ty,
            name: Some(name),
            operands,
        });
        ValueRef::Inst(id)
    }

    pub fn emit_call(&mut self, callee: FuncId, args: Vec<ValueRef>) -> ValueRef {
        let ret_ty = self.module.function(callee).ret_ty.clone();
        let name = if ret_ty.is_void() {
            None
        } else {
            Some(self.func().new_temp_name())
        };
        let mut operands = vec![ValueRef::Func(callee)];
        operands.extend(args);
        let id = self.func().push_inst(Inst {
            kind: InstKind::Call,
            ty: ret_ty,
            name,
            operands,
        });
        ValueRef::Inst(id)
    }

    pub fn emit_br(&mut self, target: Label) {
        self.func().push_inst(Inst {
            kind: InstKind::Br(target),
            ty: Ty::void(),
            name: None,
            operands: Vec::new(),
        });
    }

    pub fn emit_cond_br(&mut self, cond: ValueRef, then_target: Label, else_target: Label) {
        debug_assert!(self.value_ty(cond).is_int32());
        self.func().push_inst(Inst {
            kind: InstKind::CondBr(then_target, else_target),
            ty: Ty::void(),
            name: None,
            operands: vec![cond],
        });
    }

    pub fn emit_label(&mut self, label: Label) {
        self.func().push_inst(Inst {
            kind: InstKind::Label(label),
            ty: Ty::void(),
            name: None,
            operands: Vec::new(),
        });
    }

    pub fn emit_ret(&mut self, value: Option<ValueRef>) {
        debug_assert!(match value {
            Some(v) => self.value_ty(v) == self.ret_ty,
            None => self.ret_ty.is_void(),
        });
        let operands = match value {
            Some(v) => vec![v],
            None => Vec::new(),
        };
        self.func().push_inst(Inst {
            kind: InstKind::Ret,
            ty: Ty::void(),
            name: None,
            operands,
        });
    }
}

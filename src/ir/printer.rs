use itertools::Itertools;

use crate::ir::{Function, GlobalVar, Inst, InstKind, LocalSlot, Module, ValueRef};

/// Renders a module as line-oriented IR: global declares first, then one
/// `define` block per function with a tab-indented instruction per line and
/// labels on their own lines.
pub fn module_to_string(module: &Module) -> String {
    let mut out = String::new();
    for global in &module.globals {
        out.push_str(&global_to_string(global));
        out.push('\n');
    }
    if !module.globals.is_empty() && !module.functions.is_empty() {
        out.push('\n');
    }
    for (index, func) in module.functions.iter().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        out.push_str(&function_to_string(module, func));
    }
    out
}

fn global_to_string(global: &GlobalVar) -> String {
    let ty = global.ty();
    if ty.is_array() {
        format!(
            "declare {} {}{}",
            ty.base_element(),
            global.ir_name(),
            ty.dim_string()
        )
    } else if let Some(value) = global.init() {
        format!("declare {} {} = {}", ty, global.ir_name(), value)
    } else {
        format!("declare {} {}", ty, global.ir_name())
    }
}

fn param_to_string(slot: &LocalSlot) -> String {
    // Array-typed parameters print as base type + name + dim string, the
    // same shape a global array declare uses.
    if let Some(pointee) = slot.ty.pointee() {
        if pointee.is_array() {
            return format!(
                "{} {}{}",
                pointee.base_element(),
                slot.ir_name,
                pointee.dim_string()
            );
        }
    }
    format!("{} {}", slot.ty, slot.ir_name)
}

fn function_to_string(module: &Module, func: &Function) -> String {
    let params = func
        .params
        .iter()
        .map(|&id| param_to_string(func.local(id)))
        .join(", ");
    let mut out = format!("define {} {}({}) {{\n", func.ret_ty, func.ir_name(), params);
    for inst in &func.insts {
        out.push_str(&inst_to_string(module, func, inst));
        out.push('\n');
    }
    out.push_str("}\n");
    out
}

fn value_name(module: &Module, func: &Function, value: ValueRef) -> String {
    match value {
        ValueRef::Const(value) => value.to_string(),
        ValueRef::Global(id) => module.global(id).ir_name(),
        ValueRef::Local(id) => func.local(id).ir_name.clone(),
        ValueRef::Func(id) => module.function(id).ir_name(),
        ValueRef::Inst(id) => func.inst(id).name.clone().unwrap_or_default(),
    }
}

fn inst_to_string(module: &Module, func: &Function, inst: &Inst) -> String {
    let operand = |index: usize| value_name(module, func, inst.operands[index]);
    let result = || inst.name.clone().unwrap_or_default();

    match inst.kind {
        InstKind::Binary(op) => {
            format!("\t{} = {} {}, {}", result(), op, operand(0), operand(1))
        }
        InstKind::Icmp(cond) => {
            format!("\t{} = icmp {} {}, {}", result(), cond, operand(0), operand(1))
        }
        InstKind::Load => format!("\t{} = load {}", result(), operand(0)),
        InstKind::Store => format!("\tstore {}, {}", operand(0), operand(1)),
        InstKind::GetElementPtr => {
            let indices = inst.operands[1..]
                .iter()
                .map(|&v| value_name(module, func, v))
                .join(", ");
            format!("\t{} = gep {}, {}", result(), operand(0), indices)
        }
        InstKind::Call => {
            let args = inst.operands[1..]
                .iter()
                .map(|&v| value_name(module, func, v))
                .join(", ");
            if inst.ty.is_void() {
                format!("\tcall {}({})", operand(0), args)
            } else {
                format!("\t{} = call {}({})", result(), operand(0), args)
            }
        }
        InstKind::Br(target) => format!("\tbr {}", target),
        InstKind::CondBr(then_target, else_target) => {
            format!("\tbr {}, {}, {}", operand(0), then_target, else_target)
        }
        InstKind::Label(label) => format!("{}:", label),
        InstKind::Ret => {
            if inst.operands.is_empty() {
                "\tret".to_string()
            } else {
                format!("\tret {}", operand(0))
            }
        }
    }
}

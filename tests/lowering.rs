mod common;

use common::*;
use minicc::ir::{InstKind, ValueRef};
use minicc::ty::Ty;

#[test]
fn scalar_global_with_nonzero_init_leaves_bss() {
    let module = lower_ok("int x = 3;");
    let global = &module.globals[0];
    assert_eq!(global.name(), "x");
    assert_eq!(global.init(), Some(3));
    assert!(!global.is_in_bss());
    assert_eq!(global.ty(), &Ty::int32());
}

#[test]
fn uninitialized_global_stays_in_bss() {
    let module = lower_ok("int x;");
    let global = &module.globals[0];
    assert_eq!(global.init(), None);
    assert!(global.is_in_bss());
}

#[test]
fn zero_initialized_global_stays_in_bss() {
    let module = lower_ok("int x = 0;");
    let global = &module.globals[0];
    assert_eq!(global.init(), Some(0));
    assert!(global.is_in_bss());
}

#[test]
fn negated_global_initializer_folds() {
    let module = lower_ok("int x = -3;");
    let global = &module.globals[0];
    assert_eq!(global.init(), Some(-3));
    assert!(!global.is_in_bss());
}

#[test]
fn global_array_shape() {
    let module = lower_ok("int a[2+3][4];");
    let global = &module.globals[0];
    let expected = Ty::array_of(&Ty::array_of(&Ty::int32(), 4), 5);
    assert_eq!(global.ty(), &expected);
    assert!(global.is_in_bss());
}

#[test]
fn array_param_indexing_lowers_to_gep_load_ret() {
    let module = lower_ok("int f(int a[][3]) { return a[1][2]; }");
    let func = &module.functions[0];

    let param = func.local(func.params[0]);
    let expected = Ty::pointer_of(&Ty::array_of(&Ty::array_of(&Ty::int32(), 3), 0));
    assert_eq!(param.ty, expected);
    assert!(param.is_param);

    let kinds: Vec<_> = func.insts.iter().map(|inst| inst.kind).collect();
    assert_eq!(
        kinds,
        vec![InstKind::GetElementPtr, InstKind::Load, InstKind::Ret]
    );

    let gep = &func.insts[0];
    assert_eq!(
        gep.operands,
        vec![
            ValueRef::Local(func.params[0]),
            ValueRef::Const(1),
            ValueRef::Const(2)
        ]
    );
    assert_eq!(gep.ty, Ty::pointer_of(&Ty::int32()));
}

#[test]
fn break_branches_to_loop_exit() {
    let module = lower_ok(
        "int main() { int i = 0; while (i < 10) { if (i == 5) break; i = i + 1; } return i; }",
    );
    let func = &module.functions[0];

    let (_, exit_label) = func
        .insts
        .iter()
        .find_map(|inst| match inst.kind {
            InstKind::CondBr(then_target, else_target) => Some((then_target, else_target)),
            _ => None,
        })
        .expect("while condition branch");

    // the break jumps straight to the while's exit label
    assert!(func
        .insts
        .iter()
        .any(|inst| inst.kind == InstKind::Br(exit_label)));

    // and the loop has a back edge to its header, the first label emitted
    let header = func
        .insts
        .iter()
        .find_map(|inst| match inst.kind {
            InstKind::Label(label) => Some(label),
            _ => None,
        })
        .expect("header label");
    assert!(func
        .insts
        .iter()
        .any(|inst| inst.kind == InstKind::Br(header)));
}

#[test]
fn short_circuit_value_materializes_through_a_slot() {
    let module = lower_ok("int f() { return 1 && 0; }");
    let func = &module.functions[0];

    let stores: Vec<_> = func
        .insts
        .iter()
        .filter(|inst| inst.kind == InstKind::Store)
        .collect();
    assert_eq!(stores.len(), 2);
    assert_eq!(stores[0].operands[0], ValueRef::Const(1));
    assert_eq!(stores[1].operands[0], ValueRef::Const(0));
    assert_eq!(stores[0].operands[1], stores[1].operands[1]);

    let loads = func
        .insts
        .iter()
        .filter(|inst| inst.kind == InstKind::Load)
        .count();
    assert_eq!(loads, 1);
}

#[test]
fn condition_short_circuit_does_not_materialize() {
    let module =
        lower_ok("int main() { int i = 0; if (i < 10 && i != 5) { i = 1; } return i; }");
    let func = &module.functions[0];

    // only the source variable, no boolean slot
    assert_eq!(func.locals().len(), 1);

    let cond_brs = func
        .insts
        .iter()
        .filter(|inst| matches!(inst.kind, InstKind::CondBr(..)))
        .count();
    assert_eq!(cond_brs, 2);
}

#[test]
fn local_array_initializer_stores_elementwise() {
    let module = lower_ok("int main() { int a[2][2] = {{1, 2}, {3, 4}}; return a[1][0]; }");
    let func = &module.functions[0];

    let stores = func
        .insts
        .iter()
        .filter(|inst| inst.kind == InstKind::Store)
        .count();
    assert_eq!(stores, 4);

    let geps: Vec<_> = func
        .insts
        .iter()
        .filter(|inst| inst.kind == InstKind::GetElementPtr)
        .collect();
    // four initializer slots plus the read in the return
    assert_eq!(geps.len(), 5);
    assert_eq!(&geps[2].operands[1..], &[ValueRef::Const(1), ValueRef::Const(0)]);
    assert_eq!(&geps[4].operands[1..], &[ValueRef::Const(1), ValueRef::Const(0)]);
}

#[test]
fn void_function_call_has_no_result_name() {
    let module = lower_ok("void p() { return; } int main() { p(); return 0; }");
    let main = &module.functions[1];
    let call = main
        .insts
        .iter()
        .find(|inst| inst.kind == InstKind::Call)
        .expect("call instruction");
    assert!(call.ty.is_void());
    assert!(call.name.is_none());
}

#[test]
fn implicit_returns_are_synthesized() {
    let module = lower_ok("void p() { } int f() { }");

    let p = &module.functions[0];
    assert_eq!(p.insts.len(), 1);
    assert_eq!(p.insts[0].kind, InstKind::Ret);
    assert!(p.insts[0].operands.is_empty());

    let f = &module.functions[1];
    assert_eq!(f.insts[0].kind, InstKind::Ret);
    assert_eq!(f.insts[0].operands, vec![ValueRef::Const(0)]);
}

#[test]
fn whole_array_argument_decays_to_address() {
    let module = lower_ok("int g(int a[]) { return a[0]; } int main() { int b[4]; return g(b); }");
    let main = &module.functions[1];

    let call = main
        .insts
        .iter()
        .find(|inst| inst.kind == InstKind::Call)
        .expect("call instruction");
    // the array argument is passed as an address, not loaded
    assert!(matches!(call.operands[1], ValueRef::Local(_)));
    let loads = main
        .insts
        .iter()
        .filter(|inst| inst.kind == InstKind::Load)
        .count();
    assert_eq!(loads, 0);
}

#[test]
fn hex_and_octal_literals() {
    let module = lower_ok("int x = 0x10; int y = 010; int z = 0xFF;");
    assert_eq!(module.globals[0].init(), Some(16));
    assert_eq!(module.globals[1].init(), Some(8));
    assert_eq!(module.globals[2].init(), Some(255));
}

#[test]
fn comments_are_skipped() {
    let module = lower_ok("int x = 1; // trailing\n/* block\nspanning lines */ int y = 2;");
    assert_eq!(module.globals.len(), 2);
    assert_eq!(module.globals[1].init(), Some(2));
}

#[test]
fn load_register_hint_defaults_and_sets() {
    let (mut module, errors) = lower("int x;");
    assert!(errors.is_empty());
    assert_eq!(module.globals[0].load_reg(), -1);
    module.globals[0].set_load_reg(3);
    assert_eq!(module.globals[0].load_reg(), 3);
}

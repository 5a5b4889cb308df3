mod common;

use common::*;

#[test]
fn prints_scalar_global_declares() {
    assert_eq!(printed("int x = 3;"), "declare i32 @x = 3\n");
    assert_eq!(printed("int x;"), "declare i32 @x\n");
}

#[test]
fn prints_array_global_with_dim_string() {
    assert_eq!(printed("int a[2+3][4];"), "declare i32 @a[5][4]\n");
}

#[test]
fn prints_param_array_and_gep_body() {
    let out = printed("int f(int a[][3]) { return a[1][2]; }");
    assert_eq!(
        out,
        "define i32 @f(i32 %l0[0][3]) {\n\
         \t%t0 = gep %l0, 1, 2\n\
         \t%t1 = load %t0\n\
         \tret %t1\n\
         }\n"
    );
}

#[test]
fn prints_while_break_structure() {
    let out = printed(
        "int main() { int i = 0; while (i < 10) { if (i == 5) break; i = i + 1; } return i; }",
    );
    // while condition branches to body or exit
    assert!(out.contains("\tbr %t1, .L1, .L2\n"), "got:\n{}", out);
    // the break jumps straight from the if-then label to the while exit
    assert!(out.contains(".L3:\n\tbr .L2\n.L4:\n"), "got:\n{}", out);
    // back edge into the loop header, then the exit label
    assert!(out.contains("\tbr .L0\n.L2:\n"), "got:\n{}", out);
    assert!(out.ends_with("\t%t6 = load %l0\n\tret %t6\n}\n"), "got:\n{}", out);
}

#[test]
fn prints_short_circuit_materialization() {
    let out = printed("int f() { return 1 && 0; }");
    assert_eq!(
        out,
        "define i32 @f() {\n\
         \tbr 1, .L3, .L1\n\
         .L3:\n\
         \tbr 0, .L0, .L1\n\
         .L0:\n\
         \tstore 1, %l0\n\
         \tbr .L2\n\
         .L1:\n\
         \tstore 0, %l0\n\
         \tbr .L2\n\
         .L2:\n\
         \t%t0 = load %l0\n\
         \tret %t0\n\
         }\n"
    );
}

#[test]
fn prints_void_call_without_result() {
    let out = printed("void p() { return; } int main() { p(); return 0; }");
    assert!(out.contains("define void @p() {\n\tret\n}\n"));
    assert!(out.contains("\tcall @p()\n"));
    assert!(out.contains("\tret 0\n"));
}

#[test]
fn separates_globals_and_functions_with_a_blank_line() {
    let out = printed("int x; int main() { return x; }");
    assert_eq!(
        out,
        "declare i32 @x\n\
         \n\
         define i32 @main() {\n\
         \t%t0 = load @x\n\
         \tret %t0\n\
         }\n"
    );
}

#[test]
fn prints_icmp_and_arithmetic_forms() {
    let out = printed("int f(int a, int b) { return a % b < 3; }");
    assert_eq!(
        out,
        "define i32 @f(i32 %l0, i32 %l1) {\n\
         \t%t0 = load %l0\n\
         \t%t1 = load %l1\n\
         \t%t2 = mod %t0, %t1\n\
         \t%t3 = icmp lt %t2, 3\n\
         \tret %t3\n\
         }\n"
    );
}

#[test]
fn prints_call_with_arguments() {
    let out = printed("int add(int a, int b) { return a + b; } int main() { return add(1, 2); }");
    assert!(out.contains("\t%t0 = call @add(1, 2)\n"), "got:\n{}", out);
}

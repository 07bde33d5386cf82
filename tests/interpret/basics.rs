use unindent::Unindent;

use super::*;

#[test]
fn prints_a_text_literal() {
    let source = r#"
        HAI
        VISIBLE "HELLO WORLD" MKAY?
        KTHXBAI
    "#
    .unindent();
    assert_eq!(run(&source).unwrap(), "HELLO WORLD\n");
}

#[test]
fn print_space_joins_its_arguments() {
    let source = r#"
        HAI
        VISIBLE 1 "AND" 2 MKAY?
        KTHXBAI
    "#
    .unindent();
    assert_eq!(run(&source).unwrap(), "1 AND 2\n");
}

#[test]
fn declared_variable_defaults_to_noob() {
    let source = r#"
        HAI
        I HAS A X
        VISIBLE X MKAY?
        KTHXBAI
    "#
    .unindent();
    assert_eq!(run(&source).unwrap(), "NOOB\n");
}

#[test]
fn declaration_with_initializer() {
    let source = r#"
        HAI
        I HAS A X ITZ 42
        VISIBLE X MKAY?
        KTHXBAI
    "#
    .unindent();
    assert_eq!(run(&source).unwrap(), "42\n");
}

#[test]
fn integer_arithmetic_stays_integer() {
    let source = r#"
        HAI
        VISIBLE SUM OF 40 AN 2 MKAY?
        VISIBLE DIFF OF 44 AN 2 MKAY?
        VISIBLE PRODUKT OF 6 AN 7 MKAY?
        VISIBLE MOD OF 7 AN 3 MKAY?
        KTHXBAI
    "#
    .unindent();
    assert_eq!(run(&source).unwrap(), "42\n42\n42\n1\n");
}

#[test]
fn integers_have_arbitrary_precision() {
    let source = r#"
        HAI
        VISIBLE PRODUKT OF 1000000000000 AN 1000000000000 MKAY?
        KTHXBAI
    "#
    .unindent();
    assert_eq!(run(&source).unwrap(), "1000000000000000000000000\n");
}

#[test]
fn mixed_arithmetic_promotes_to_float() {
    let source = r#"
        HAI
        VISIBLE SUM OF 1 AN 2.5 MKAY?
        KTHXBAI
    "#
    .unindent();
    assert_eq!(run(&source).unwrap(), "3.5\n");
}

#[test]
fn division_always_yields_a_float() {
    let source = r#"
        HAI
        VISIBLE QUOSHUNT OF 5 AN 2 MKAY?
        VISIBLE QUOSHUNT OF 4 AN 2 MKAY?
        KTHXBAI
    "#
    .unindent();
    assert_eq!(run(&source).unwrap(), "2.5\n2.0\n");
}

#[test]
fn bare_expression_lands_in_it() {
    let source = r#"
        HAI
        SUM OF 2 AN 2
        VISIBLE IT MKAY?
        KTHXBAI
    "#
    .unindent();
    assert_eq!(run(&source).unwrap(), "4\n");
}

#[test]
fn reassignment_mutates_the_binding() {
    let source = r#"
        HAI
        I HAS A X ITZ 1
        X R 2
        VISIBLE X MKAY?
        KTHXBAI
    "#
    .unindent();
    assert_eq!(run(&source).unwrap(), "2\n");
}

#[test]
fn assignment_implicitly_declares_unknown_names() {
    let source = r#"
        HAI
        Y R 5
        VISIBLE Y MKAY?
        KTHXBAI
    "#
    .unindent();
    assert_eq!(run(&source).unwrap(), "5\n");
}

#[test]
fn implicit_declarations_are_visible_in_nested_scopes() {
    let source = r#"
        HAI
        Y R 5
        HOW DUZ I SHOW
        VISIBLE Y MKAY?
        IF U SAY SO
        SHOW MKAY?
        KTHXBAI
    "#
    .unindent();
    assert_eq!(run(&source).unwrap(), "5\n");
}

#[test]
fn mixed_assignment_reads_back_as_a_float() {
    let source = r#"
        HAI
        I HAS A X
        X R SUM OF 2 AN 3.0
        VISIBLE X MKAY?
        KTHXBAI
    "#
    .unindent();
    assert_eq!(run(&source).unwrap(), "5.0\n");
}

#[test]
fn extremum_returns_the_winning_operand() {
    let source = r#"
        HAI
        VISIBLE BIGGR OF 2 AN 3.5 MKAY?
        VISIBLE SMALLR OF 2 AN 3.5 MKAY?
        KTHXBAI
    "#
    .unindent();
    assert_eq!(run(&source).unwrap(), "3.5\n2\n");
}

#[test]
fn equality_is_type_and_value() {
    let source = r#"
        HAI
        VISIBLE BOTH SAEM 1 AN 1 MKAY?
        VISIBLE BOTH SAEM 1 AN 1.0 MKAY?
        VISIBLE DIFFRINT "A" AN "B" MKAY?
        KTHXBAI
    "#
    .unindent();
    assert_eq!(run(&source).unwrap(), "WIN\nFAIL\nWIN\n");
}

#[test]
fn logical_operators() {
    let source = r#"
        HAI
        VISIBLE BOTH OF WIN AN FAIL MKAY?
        VISIBLE EITHER OF WIN AN FAIL MKAY?
        VISIBLE NOT FAIL MKAY?
        VISIBLE ALL OF WIN AN WIN AN FAIL MKAY? MKAY?
        VISIBLE ANY OF FAIL AN WIN MKAY? MKAY?
        KTHXBAI
    "#
    .unindent();
    assert_eq!(run(&source).unwrap(), "FAIL\nWIN\nWIN\nFAIL\nWIN\n");
}

#[test]
fn casts() {
    let source = r#"
        HAI
        VISIBLE MAEK "42" A NUMBR MKAY?
        VISIBLE MAEK 3.9 A NUMBR MKAY?
        VISIBLE MAEK 0 A TROOF MKAY?
        VISIBLE MAEK WIN A YARN MKAY?
        KTHXBAI
    "#
    .unindent();
    assert_eq!(run(&source).unwrap(), "42\n3\nFAIL\nWIN\n");
}

#[test]
fn gimmeh_reads_typed_input() {
    let source = r#"
        HAI
        I HAS A X
        GIMMEH X
        VISIBLE SUM OF X AN 1 MKAY?
        KTHXBAI
    "#
    .unindent();
    assert_eq!(run_with_input(&source, "42\n").unwrap(), "43\n");
}

#[test]
fn gimmeh_reads_text_input() {
    let source = r#"
        HAI
        I HAS A NAME
        GIMMEH NAME
        VISIBLE NAME MKAY?
        KTHXBAI
    "#
    .unindent();
    assert_eq!(run_with_input(&source, "WORLD\n").unwrap(), "WORLD\n");
}

#[test]
fn comments_are_skipped() {
    let source = r#"
        HAI
        BTW VISIBLE "NOT ME" MKAY?
        OBTW none of this
        is executed TLDR
        VISIBLE "OK" MKAY?
        KTHXBAI
    "#
    .unindent();
    assert_eq!(run(&source).unwrap(), "OK\n");
}

use unindent::Unindent;

use super::*;

#[test]
fn calls_resolve_forward_declarations() {
    let source = r#"
        HAI
        VISIBLE ADD 1 2 MKAY? MKAY?
        HOW DUZ I ADD YR X AN YR Y
        FOUND YR SUM OF X AN Y
        IF U SAY SO
        KTHXBAI
    "#
    .unindent();
    assert_eq!(run(&source).unwrap(), "3\n");
}

#[test]
fn implicit_return_yields_noob() {
    let source = r#"
        HAI
        HOW DUZ I NOP
        VISIBLE "HI" MKAY?
        IF U SAY SO
        NOP MKAY?
        VISIBLE IT MKAY?
        KTHXBAI
    "#
    .unindent();
    assert_eq!(run(&source).unwrap(), "HI\nNOOB\n");
}

#[test]
fn parameters_shadow_caller_variables() {
    let source = r#"
        HAI
        I HAS A X ITZ 10
        HOW DUZ I SHOW YR X
        VISIBLE X MKAY?
        IF U SAY SO
        SHOW 1 MKAY?
        VISIBLE X MKAY?
        KTHXBAI
    "#
    .unindent();
    assert_eq!(run(&source).unwrap(), "1\n10\n");
}

#[test]
fn local_declarations_may_shadow_enclosing_scopes() {
    let source = r#"
        HAI
        I HAS A X ITZ 1
        HOW DUZ I G
        I HAS A X ITZ 2
        VISIBLE X MKAY?
        IF U SAY SO
        G MKAY?
        VISIBLE X MKAY?
        KTHXBAI
    "#
    .unindent();
    assert_eq!(run(&source).unwrap(), "2\n1\n");
}

#[test]
fn recursion() {
    let source = r#"
        HAI
        HOW DUZ I FAC YR N
        BOTH SAEM N AN 0
        O RLY?
        YA RLY
        FOUND YR 1
        OIC
        FOUND YR PRODUKT OF N AN FAC DIFF OF N AN 1 MKAY?
        IF U SAY SO
        VISIBLE FAC 5 MKAY? MKAY?
        KTHXBAI
    "#
    .unindent();
    assert_eq!(run(&source).unwrap(), "120\n");
}

#[test]
fn return_unwinds_past_nested_conditionals() {
    let source = r#"
        HAI
        HOW DUZ I PICK YR X
        X
        O RLY?
        YA RLY
        FOUND YR "BIG"
        NO WAI
        FOUND YR "SMOL"
        OIC
        VISIBLE "UNREACHED" MKAY?
        IF U SAY SO
        VISIBLE PICK WIN MKAY? MKAY?
        VISIBLE PICK FAIL MKAY? MKAY?
        VISIBLE "AFTER" MKAY?
        KTHXBAI
    "#
    .unindent();
    assert_eq!(run(&source).unwrap(), "BIG\nSMOL\nAFTER\n");
}

#[test]
fn first_declaration_of_a_name_wins() {
    let source = r#"
        HAI
        HOW DUZ I F
        FOUND YR 1
        IF U SAY SO
        HOW DUZ I F
        FOUND YR 2
        IF U SAY SO
        VISIBLE F MKAY? MKAY?
        KTHXBAI
    "#
    .unindent();
    assert_eq!(run(&source).unwrap(), "1\n");
}

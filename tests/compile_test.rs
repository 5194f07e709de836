// Integration tests for whole-class compilation

use jackc::codegen::Instruction;
use jackc::parser::lexer::LexErrorKind;
use jackc::parser::token::TokenKind;
use jackc::{compile, compile_with_options, CompileError, CompileOptions};
use std::collections::HashSet;

fn vm(source: &str) -> String {
    compile(source).expect("Compilation failed").vm_code()
}

fn vm_lines(source: &str) -> Vec<String> {
    vm(source).lines().map(str::to_string).collect()
}

#[test]
fn test_operators_apply_without_precedence() {
    let lines = vm_lines(
        r#"
        class Main {
            function int f() {
                return 1 + 2 * 3;
            }
        }
    "#,
    );

    assert_eq!(
        lines,
        vec![
            "function Main.f 0",
            "push constant 1",
            "push constant 2",
            "push constant 3",
            "call Math.multiply 2",
            "add",
            "return",
        ]
    );
}

#[test]
fn test_boolean_and_null_constants() {
    let lines = vm_lines(
        r#"
        class Main {
            function void f() {
                var boolean a, b;
                var Array c;
                let a = true;
                let b = false;
                let c = null;
                return;
            }
        }
    "#,
    );

    assert_eq!(
        lines,
        vec![
            "function Main.f 3",
            "push constant 0",
            "not",
            "pop local 0",
            "push constant 0",
            "pop local 1",
            "push constant 0",
            "pop local 2",
            "push constant 0",
            "return",
        ]
    );
}

#[test]
fn test_every_constructor_allocates_all_fields() {
    let code = vm(r#"
        class Vec3 {
            field int x, y, z;
            static int created;
            field boolean dirty;

            constructor Vec3 new(int ax, int ay, int az) {
                let x = ax;
                let y = ay;
                let z = az;
                return this;
            }

            constructor Vec3 zero() {
                return this;
            }
        }
    "#);

    let allocations: Vec<&str> = code
        .lines()
        .zip(code.lines().skip(1))
        .filter(|(_, next)| *next == "call Memory.alloc 1")
        .map(|(push, _)| push)
        .collect();

    assert_eq!(allocations, vec!["push constant 4", "push constant 4"]);
}

#[test]
fn test_header_counts_var_names() {
    let compiled = compile(
        r#"
        class Main {
            function void main() {
                var int i, j;
                var String s;
                var Array a, b, c, d;
                let i = 0;
                return;
            }
            function void empty() {
                return;
            }
        }
    "#,
    )
    .unwrap();

    let headers: Vec<(String, u16)> = compiled
        .instructions
        .iter()
        .filter_map(|e| match &e.instruction {
            Instruction::Function { name, locals } => Some((name.clone(), *locals)),
            _ => None,
        })
        .collect();

    assert_eq!(
        headers,
        vec![("Main.main".to_string(), 7), ("Main.empty".to_string(), 0)]
    );
}

#[test]
fn test_labels_unique_within_file() {
    let code = vm(r#"
        class Main {
            function void a(int n) {
                while (n > 0) {
                    if (n = 5) {
                        while (n > 3) { let n = n - 1; }
                    } else {
                        if (n = 2) { let n = 0; }
                    }
                    let n = n - 1;
                }
                return;
            }
            function void b(int n) {
                if (n) { return; }
                while (n) { let n = 0; }
                return;
            }
        }
    "#);

    let labels: Vec<&str> = code
        .lines()
        .filter_map(|line| line.strip_prefix("label "))
        .collect();
    let unique: HashSet<&str> = labels.iter().copied().collect();

    assert_eq!(labels.len(), 12);
    assert_eq!(unique.len(), labels.len());

    // every jump target is defined
    for line in code.lines() {
        if let Some(target) = line
            .strip_prefix("goto ")
            .or_else(|| line.strip_prefix("if-goto "))
        {
            assert!(unique.contains(target), "undefined label {}", target);
        }
    }
}

#[test]
fn test_receiverless_call_passes_this() {
    let code = vm(r#"
        class Ball {
            method void move() {
                do draw(1);
                do Ball.draw(1);
                return;
            }
            method void draw(int size) {
                return;
            }
        }
    "#);

    assert!(code.contains("push pointer 0\npush constant 1\ncall Ball.draw 2\npop temp 0\n"));
    assert!(code.contains("pop temp 0\npush constant 1\ncall Ball.draw 1\npop temp 0\n"));
}

#[test]
fn test_fields_map_to_this_segment() {
    let code = vm(r#"
        class Point {
            field int x, y;
            method int sum() {
                return x + y;
            }
        }
    "#);

    assert_eq!(
        code,
        "function Point.sum 0\npush argument 0\npop pointer 0\npush this 0\npush this 1\nadd\nreturn\n"
    );
}

#[test]
fn test_local_shadows_field_only_in_its_subroutine() {
    let code = vm(r#"
        class Counter {
            field int count;
            method int shadowed() {
                var int count;
                let count = 7;
                return count;
            }
            method int plain() {
                return count;
            }
        }
    "#);

    assert!(code.contains("function Counter.shadowed 1\npush argument 0\npop pointer 0\npush constant 7\npop local 0\npush local 0\nreturn\n"));
    assert!(code.ends_with("function Counter.plain 0\npush argument 0\npop pointer 0\npush this 0\nreturn\n"));
}

#[test]
fn test_let_without_equals_is_syntax_error() {
    let result = compile(
        r#"
        class Main {
            function void main() {
                var int x;
                let x 5;
                return;
            }
        }
    "#,
    );

    match result {
        Err(CompileError::Syntax {
            production,
            found,
            expected,
        }) => {
            assert_eq!(production, "letStatement");
            assert_eq!(found.kind(), TokenKind::IntegerConstant);
            assert_eq!(found.lexeme(), "5");
            assert_eq!(found.location().line, 5);
            assert_eq!(expected, vec!["'='".to_string()]);
        }
        other => panic!("Expected syntax error, got {:?}", other),
    }
}

#[test]
fn test_lexical_errors_surface() {
    let err = compile("class Main { function void f() { let x = 40000; } }").unwrap_err();
    match err {
        CompileError::Lexical(lex) => {
            assert_eq!(lex.kind, LexErrorKind::InvalidToken);
            assert_eq!(lex.lexeme, "40000");
        }
        other => panic!("Expected lexical error, got {:?}", other),
    }
}

#[test]
fn test_wrong_token_category() {
    let err = compile("class 42 { }").unwrap_err();
    assert!(matches!(
        err,
        CompileError::UnexpectedTokenType {
            production: "class",
            expected: TokenKind::Identifier,
            ..
        }
    ));
    assert_eq!(err.location().map(|l| l.column), Some(7));
}

#[test]
fn test_full_program() {
    let code = vm(r#"
        /** Sums an array. */
        class Summer {
            static int calls;

            function int sum(Array a, int n) {
                var int i, total;
                let calls = calls + 1;
                let i = 0;
                let total = 0;
                while (i < n) {
                    let total = total + a[i];
                    let i = i + 1;
                }
                return total;
            }

            function void main() {
                var Array a;
                let a = Array.new(2);
                let a[0] = 3;
                let a[1] = 4;
                do Output.printInt(Summer.sum(a, 2));
                do Output.printString("ok");
                return;
            }
        }
    "#);

    let expected = "\
function Summer.sum 2
push static 0
push constant 1
add
pop static 0
push constant 0
pop local 0
push constant 0
pop local 1
label WHILE_EXP0
push local 0
push argument 1
lt
not
if-goto WHILE_END0
push local 1
push argument 0
push local 0
add
pop pointer 1
push that 0
add
pop local 1
push local 0
push constant 1
add
pop local 0
goto WHILE_EXP0
label WHILE_END0
push local 1
return
function Summer.main 1
push constant 2
call Array.new 1
pop local 0
push local 0
push constant 0
add
push constant 3
pop temp 0
pop pointer 1
push temp 0
pop that 0
push local 0
push constant 1
add
push constant 4
pop temp 0
pop pointer 1
push temp 0
pop that 0
push local 0
push constant 2
call Summer.sum 2
call Output.printInt 1
pop temp 0
push constant 2
call String.new 1
push constant 111
call String.appendChar 2
push constant 107
call String.appendChar 2
call Output.printString 1
pop temp 0
push constant 0
return
";
    assert_eq!(code, expected);
}

#[test]
fn test_trace_only_when_requested() {
    let source = "class Main { function void main() { return; } }";
    assert_eq!(compile(source).unwrap().trace, None);

    let traced = compile_with_options(source, CompileOptions { emit_trace: true }).unwrap();
    let trace = traced.trace.as_ref().unwrap();
    assert!(trace.contains("<subroutineDec>"));
    assert!(trace.contains("    <symbol> ( </symbol>\n    <parameterList>\n    </parameterList>\n"));
    assert!(trace.contains("<returnStatement>"));
    assert_eq!(traced.vm_code(), "function Main.main 0\npush constant 0\nreturn\n");
}

#[test]
fn test_long_operator_chain_compiles() {
    let terms = 50_000;
    let chain = vec!["1"; terms].join(" + ");
    let code = vm(&format!(
        "class Main {{ function int f() {{ return {}; }} }}",
        chain
    ));

    let lines: Vec<&str> = code.lines().collect();
    assert_eq!(lines.len(), 1 + terms + (terms - 1) + 1);
    assert!(lines[1..=terms].iter().all(|l| *l == "push constant 1"));
    assert!(lines[terms + 1..lines.len() - 1].iter().all(|l| *l == "add"));
    assert_eq!(lines.last(), Some(&"return"));
}

#[test]
fn test_mixed_operator_chain_applies_last_operator_first() {
    let lines = vm_lines("class Main { function int f() { return 1 - 2 + 3 * 4; } }");
    assert_eq!(
        lines,
        vec![
            "function Main.f 0",
            "push constant 1",
            "push constant 2",
            "push constant 3",
            "push constant 4",
            "call Math.multiply 2",
            "add",
            "sub",
            "return",
        ]
    );
}

#[test]
fn test_argument_count_past_u16_is_an_error() {
    let args = vec!["0"; 65_536].join(",");
    let err = compile(&format!(
        "class Main {{ function void f() {{ do Sys.g({}); return; }} }}",
        args
    ))
    .unwrap_err();

    assert!(matches!(
        err,
        CompileError::TooMany {
            production: "expressionList",
            what: "call arguments",
            ..
        }
    ));
    assert_eq!(err.location().map(|l| l.line), Some(1));
}

#[test]
fn test_hidden_this_counts_toward_argument_limit() {
    let args = vec!["0"; 65_535].join(",");
    let err = compile(&format!(
        "class Main {{ method void f() {{ do g({}); return; }} }}",
        args
    ))
    .unwrap_err();

    assert!(matches!(
        err,
        CompileError::TooMany {
            production: "doStatement",
            what: "call arguments",
            ..
        }
    ));
}

#[test]
fn test_local_count_past_u16_is_an_error() {
    let names = vec!["v"; 65_536].join(", ");
    let err = compile(&format!(
        "class Main {{ function void f() {{ var int {}; return; }} }}",
        names
    ))
    .unwrap_err();

    assert!(matches!(
        err,
        CompileError::TooMany {
            production: "varDec",
            what: "local variables",
            ..
        }
    ));
    assert!(err.to_string().starts_with("Too many local variables at line 1"));
}

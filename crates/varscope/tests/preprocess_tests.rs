//! End-to-end preprocessing tests

use std::sync::{Arc, Mutex};

use pretty_assertions::assert_eq;
use varscope::*;

/// Generator that records every payload it is handed.
fn recording_generator(log: Arc<Mutex<Vec<String>>>) -> CallbackGenerator {
    let describe = |vs: &[Variable]| {
        vs.iter()
            .map(|v| format!("{}:{}#{}", v.name, v.ty, v.id))
            .collect::<Vec<_>>()
            .join(",")
    };
    let (b, e, d, u) = (log.clone(), log.clone(), log.clone(), log);
    CallbackGenerator::new()
        .with_begin(move |vs| {
            b.lock().unwrap().push(format!("begin [{}]", describe(vs)));
            String::new()
        })
        .with_end(move |vs| {
            e.lock().unwrap().push(format!("end [{}]", describe(vs)));
            String::new()
        })
        .with_def(move |vs| {
            d.lock().unwrap().push(format!("def [{}]", describe(vs)));
            String::new()
        })
        .with_undef(move |vs| {
            u.lock().unwrap().push(format!("undef [{}]", describe(vs)));
            String::new()
        })
}

// ═══════════════════════════════════════════════════════════════════════
// Basic Scenarios
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_use_only_generator() {
    let src = "~begin\n~def i:int\ni = 2;\n~undef i\n~end";
    let gen = CallbackGenerator::new().with_use(|v| format!("i{}", v.id));
    let out = preprocess_with(src, &gen).unwrap();
    assert_eq!(out, "\n\ni0 = 2;\n\n");
}

#[test]
fn test_defaults_blank_directives_keep_indent() {
    let src = "int main() {\n  ~begin\n  ~def n:int\n  n = 3;\n  ~end\n}";
    let out = preprocess_with(src, &CallbackGenerator::new()).unwrap();
    assert_eq!(out, "int main() {\n  \n  \n  i0 = 3;\n  \n}");
}

#[test]
fn test_line_count_preserved() {
    let inputs = [
        "",
        "\n",
        "plain",
        "~begin\n~end",
        "~begin\n~def a:int b:int\na = b;\n~undef a b\n\n~end\n",
        "a\r\nb\rc",
    ];
    for src in inputs {
        let out = preprocess(src, "c").unwrap();
        let expected = src.split(|c: char| c == '\n' || c == '\r').count()
            - src.matches("\r\n").count();
        assert_eq!(out.split('\n').count(), expected, "input {:?}", src);
    }
}

#[test]
fn test_unresolved_tokens_untouched() {
    let src = "~begin\n~def x:int\nprintf(\"%d\", x + y);\n~end";
    let out = preprocess(src, "c").unwrap();
    assert_eq!(out, "int i0;\n\nprintf(\"%d\", i0 + y);\n");
}

#[test]
fn test_type_id_and_slot_index_rendering() {
    let src = "~begin\n~def a:int b:float c:int\na = b * c;\n~end";
    let gen = CallbackGenerator::new()
        .with_use(|v| format!("t{}_{}", v.type_info.type_id, v.type_info.slot_index));
    let out = preprocess_with(src, &gen).unwrap();
    assert_eq!(out, "\n\nt0_0 = t1_0 * t0_1;\n");
}

// ═══════════════════════════════════════════════════════════════════════
// Slots and Shadowing
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_slot_reuse_across_names() {
    let src = "~begin\n~def x:T\nx;\n~undef x\n~def y:T\ny;\n~end";
    let out = preprocess(src, "python").unwrap();
    assert_eq!(out, "\n\ni0;\n\n\ni0;\n");
}

#[test]
fn test_no_cross_type_reuse() {
    let src = "~begin\n~def x:T\nx;\n~undef x\n~def y:U\ny;\n~end";
    let out = preprocess(src, "c").unwrap();
    assert_eq!(out, "U i1; T i0;\n\ni0;\n\n\ni1;\n");
}

#[test]
fn test_shadowing_resolves_to_latest() {
    let src = "~begin\n~def x:int\n~def x:float\nx;\n~undef x\nx;\n~end";
    let gen = CallbackGenerator::new().with_use(|v| format!("{}{}", v.ty, v.id));
    let out = preprocess_with(src, &gen).unwrap();
    assert_eq!(out, "\n\n\nfloat1;\n\nint0;\n");
}

#[test]
fn test_nested_scope_does_not_disturb_outer() {
    let src = "\
~begin
~def x:int
x = 1;
~begin
~def x:float
x = 0.5;
~end
x = 2;
~end";
    let gen = CallbackGenerator::new().with_use(|v| format!("{}_{}", v.ty, v.id));
    let out = preprocess_with(src, &gen).unwrap();
    assert_eq!(out, "\n\nint_0 = 1;\n\n\nfloat_0 = 0.5;\n\nint_0 = 2;\n");
}

#[test]
fn test_inner_scope_does_not_see_outer_names() {
    let src = "~begin\n~def x:int\nx;\n~begin\nx;\n~end\n~end";
    let out = preprocess(src, "c").unwrap();
    assert_eq!(out, "int i0;\n\ni0;\n\nx;\n\n");
}

// ═══════════════════════════════════════════════════════════════════════
// Unused Variable Elision
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_unused_variables_hidden_from_generator() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let gen = recording_generator(log.clone());
    let src = "~begin\n~def used:int unused:int\nused;\n~undef used unused\n~end";
    preprocess_with(src, &gen).unwrap();

    assert_eq!(
        *log.lock().unwrap(),
        vec![
            "begin [used:int#0]",
            "def [used:int#0]",
            "undef [used:int#0]",
            "end [used:int#0]",
        ]
    );
}

#[test]
fn test_elision_can_be_disabled() {
    let pre = Preprocessor::for_target("c")
        .unwrap()
        .with_options(PreprocessOptions::new().with_elide_unused(false));
    let out = pre.run("~begin\n~def a:int b:char\na;\n~end").unwrap();
    assert_eq!(out, "int i0; char i1;\n\ni0;\n");
}

#[test]
fn test_begin_lists_whole_block() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let gen = recording_generator(log.clone());
    let src = "\
~begin
~def a:int
a;
~undef a
~def b:float c:int
b + c;
~end";
    preprocess_with(src, &gen).unwrap();

    let log = log.lock().unwrap();
    assert_eq!(log[0], "begin [b:float#1,c:int#0]");
    assert_eq!(log[log.len() - 1], "end [b:float#1,c:int#0]");
}

// ═══════════════════════════════════════════════════════════════════════
// Built-in Languages
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_language_names_listed() {
    let names = language_names();
    for name in ["js", "c", "cpp", "java", "python", "typescript", "c-heap"] {
        assert!(names.contains(&name), "missing {}", name);
    }
}

#[test]
fn test_language_name_case_insensitive() {
    let src = "~begin\n~def n:int\nn;\n~end";
    assert_eq!(preprocess(src, "CPP").unwrap(), preprocess(src, "c").unwrap());
}

#[test]
fn test_custom_target_through_arc() {
    let gen: Arc<dyn CodeGenerator> = Arc::new(languages::JavaScript);
    let out = preprocess("~begin\n~def n\nn;\n~end", gen).unwrap();
    assert_eq!(out, "var i0;\n\ni0;\n");
}

#[test]
fn test_larger_c_program() {
    let src = "\
int main() {
  ~begin
  ~def i:int
  i = 2;
  printf(\"%d\", i);
  ~def i:float
  i = 8.;
  ~undef i
  printf(\"%d\", i);
  ~undef i
  ~def x:float y:float
  x = 0.5;
  y = 0.8;
  ~def y:float
  ~undef y y x
  ~def x:int y:int
  y = 8;
  ~end
}";
    let out = preprocess(src, "c").unwrap();
    let expected = [
        "int main() {",
        "  int i0; int i4; float i2; float i1;",
        "  ",
        "  i0 = 2;",
        "  printf(\"%d\", i0);",
        "  ",
        "  i1 = 8.;",
        "  ",
        "  printf(\"%d\", i0);",
        "  ",
        "  ",
        "  i1 = 0.5;",
        "  i2 = 0.8;",
        "  ",
        "  ",
        "  ",
        "  i4 = 8;",
        "  ",
        "}",
    ]
    .join("\n");
    assert_eq!(out, expected);
}

#[test]
fn test_bytes_input() {
    let out = preprocess_bytes(b"~begin\n~def n:int\nn;\n~end", "c").unwrap();
    assert_eq!(out, "int i0;\n\ni0;\n");
}

#[test]
fn test_concurrent_runs() {
    let handles: Vec<_> = (0..4)
        .map(|i| {
            std::thread::spawn(move || {
                let src = format!("~begin\n~def v{i}:int\nv{i};\n~end");
                preprocess(&src, "c").unwrap()
            })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), "int i0;\n\ni0;\n");
    }
}

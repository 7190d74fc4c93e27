use jinja2gotmpl::{transpile, transpile_with, Options, TranspileError, Warning};

// ── Edge cases around the supported subset ──

#[test]
fn empty_template_produces_empty_output() {
    assert_eq!(transpile("").unwrap(), "");
}

#[test]
fn plain_text_template_no_tags() {
    assert_eq!(transpile("Hello, world!").unwrap(), "Hello, world!");
}

#[test]
fn context_var_outside_loop() {
    let out = transpile("{{ bos_token }}PROMPT{{ eos_token }}").unwrap();
    assert_eq!(out, "{{ .bos_token }}PROMPT{{ .eos_token }}");
}

#[test]
fn loop_first_and_last_reference_metadata() {
    let out = transpile("{% for m in ms %}{{ loop.first }}{{ loop.last }}{% endfor %}").unwrap();
    assert!(out.contains("{{ $loop.first }}{{ $loop.last }}{{ end }}"), "{out}");
    assert!(out.contains("\"first\" (eq $_idx 0)"), "{out}");
    assert!(out.contains("\"last\" (eq (add $_idx 1) (len $.ms))"), "{out}");
}

#[test]
fn context_var_inside_loop_is_anchored_at_root() {
    let out = transpile("{% for m in ms %}{{ eos_token }}{% endfor %}{{ eos_token }}").unwrap();
    assert!(out.contains("{{ $.eos_token }}{{ end }}{{ .eos_token }}"), "{out}");
}

#[test]
fn special_characters_in_text() {
    let template = "Hello <world> & \"friends\" $ . | %";
    assert_eq!(transpile(template).unwrap(), template);
}

#[test]
fn unicode_text() {
    let out = transpile("こんにちは {{ name }} 🌍").unwrap();
    assert_eq!(out, "こんにちは {{ .name }} 🌍");
}

#[test]
fn unterminated_comment_swallows_rest() {
    assert_eq!(transpile("a{# never closed {{ x }}").unwrap(), "a");
}

#[test]
fn unterminated_variable_becomes_literal_content() {
    // The opener stays in the token, so the path is nonsense but no error.
    assert_eq!(transpile("a {{ b").unwrap(), "a {{ .{{ b }}");
}

#[test]
fn comments_inside_bodies_are_dropped() {
    let out = transpile("{% if x %}a{# c #}b{% else %}{# d #}{% endif %}").unwrap();
    assert_eq!(out, "{{ if x }}ab{{ end }}");
}

#[test]
fn empty_else_branch_is_omitted() {
    let out = transpile("{% if x %}a{% else %}{% endif %}").unwrap();
    assert_eq!(out, "{{ if x }}a{{ end }}");
}

#[test]
fn set_then_reference() {
    let out = transpile("{% set x = 1 %}{{ x }}").unwrap();
    assert_eq!(out, "{{ $x := 1 }}{{ $x }}");
}

#[test]
fn set_after_reference_does_not_apply_backwards() {
    let out = transpile("{{ x }}{% set x = 1 %}{{ x }}").unwrap();
    assert_eq!(out, "{{ .x }}{{ $x := 1 }}{{ $x }}");
}

#[test]
fn reassignment_uses_plain_equals() {
    let out = transpile("{% set x = 1 %}{% set x = 2 %}").unwrap();
    assert_eq!(out, "{{ $x := 1 }}{{ $x = 2 }}");
}

#[test]
fn assigned_name_visible_inside_later_loop() {
    let out = transpile("{% set sep = \", \" %}{% for t in tags %}{{ t }}{{ sep }}{% endfor %}")
        .unwrap();
    assert!(out.ends_with("{{ . }}{{ $sep }}{{ end }}"), "{out}");
}

#[test]
fn stray_end_tags_warn() {
    let result = transpile_with("a{% endfor %}b{% endif %}", &Options::new()).unwrap();
    assert_eq!(result.output, "ab");
    assert!(result
        .warnings
        .iter()
        .all(|w| matches!(w, Warning::UnknownBlock { .. })));
}

#[test]
fn first_error_wins() {
    let err = transpile("{% for x %}{% set y %}").unwrap_err();
    assert!(matches!(err, TranspileError::MalformedForHeader { .. }));
}

#[test]
fn error_positions_point_at_the_block() {
    let err = transpile("Hello {% set nothing %}").unwrap_err();
    assert_eq!(err.position(), 6);
}

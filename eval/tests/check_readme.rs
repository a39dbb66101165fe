//! Tests that the README code samples actually work.

use pulldown_cmark::{CodeBlockKind, Event, Parser, Tag, TagEnd};

use scalar_expr::{env::VariableContext, fns::CommonFunctions, Compiler, Value};

fn check_sample(code_sample: &str) {
    let expr = Compiler::with_resolver(&CommonFunctions)
        .parse_block(code_sample)
        .unwrap_or_else(|err| panic!("Cannot compile sample:\n{code_sample}\n{err}"));

    let mut context = VariableContext::new();
    context.set("x", Value::integer(3)).set("dt", Value::float(0.1));
    let output = expr
        .evaluate_in(&mut context)
        .unwrap_or_else(|err| panic!("Cannot evaluate sample:\n{code_sample}\n{err}"));
    assert_eq!(output, Value::TRUE, "Unexpected sample output:\n{code_sample}");
}

#[test]
fn code_samples_in_readme_are_valid() {
    const README: &str = include_str!("../README.md");

    let parser = Parser::new(README);
    let mut code: Option<String> = None;
    let mut sample_count = 0;
    for event in parser {
        match event {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(lang)))
                if lang.as_ref() == "text" =>
            {
                assert!(code.is_none(), "Embedded code samples");
                code = Some(String::with_capacity(1_024));
            }
            Event::End(TagEnd::CodeBlock) => {
                if let Some(code_sample) = code.take() {
                    assert!(!code_sample.is_empty());
                    check_sample(&code_sample);
                    sample_count += 1;
                }
            }
            Event::Text(text) => {
                if let Some(code) = &mut code {
                    code.push_str(text.as_ref());
                }
            }
            _ => { /* Do nothing */ }
        }
    }
    assert!(sample_count > 0, "README contains no samples");
}

#[cfg(test)]
mod formatting_tests {
    use std::path::PathBuf;
    use std::sync::Arc;
    use std::time::Duration;

    use crate::{
        predicate, CustomizerRegistry, ErrorValue, Literals, QuoteStyle, RenderConfig, Renderer,
        Rendering, Scope, Value,
    };

    // Built-ins only, so tests elsewhere that touch the global registry
    // cannot leak into these renders.
    fn render_with(config: RenderConfig, value: &Value) -> String {
        Renderer::with_registry(config, Arc::new(CustomizerRegistry::new())).render(value)
    }

    fn render(value: &Value) -> String {
        render_with(RenderConfig::default(), value)
    }

    fn ints(values: &[i64]) -> Vec<Value> {
        values.iter().map(|&i| Value::from(i)).collect()
    }

    #[test]
    fn test_scalars() {
        assert_eq!(render(&Value::Null), "null");
        assert_eq!(render(&Value::from(true)), "true");
        assert_eq!(render(&Value::from(-12)), "-12");
        assert_eq!(render(&Value::from(u64::MAX)), "18446744073709551615");
        assert_eq!(render(&Value::from(0.5)), "0.5");
        assert_eq!(render(&Value::from("hi")), "\"hi\"");
        assert_eq!(render(&Value::from(vec![0x61u8, 0x00])), r#"b"a\x00""#);
        assert_eq!(
            render(&Value::from(Duration::from_secs(3_723))),
            "1h:02m:03s"
        );
    }

    #[test]
    fn test_container_delimiters() {
        assert_eq!(render(&Value::list(ints(&[1, 2]))), "[1, 2]");
        assert_eq!(render(&Value::tuple(ints(&[1, 2]))), "(1, 2)");
        assert_eq!(render(&Value::set(ints(&[1, 2]))), "{1, 2}");
        assert_eq!(render(&Value::set(Vec::new())), "{}");
        assert_eq!(
            render(&Value::map(vec![("a", Value::from(1)), ("b", Value::Null)])),
            r#"{"a": 1, "b": null}"#
        );
        assert_eq!(
            render(&Value::record(
                "Point",
                vec![("x", Value::from(1)), ("y", Value::from(2))]
            )),
            "Point(x=1, y=2)"
        );
        assert_eq!(
            render(&Value::record("Unit", Vec::<(String, Value)>::new())),
            "Unit()"
        );
    }

    #[test]
    fn test_named_containers_carry_label() {
        let map = Value::map(vec![("a", Value::from(1))]).named("OrderedDict");
        assert_eq!(render(&map), r#"OrderedDict{"a": 1}"#);

        let deque = Value::list(ints(&[1])).named("deque");
        assert_eq!(render(&deque), "deque[1]");
    }

    #[test]
    fn test_non_string_keys() {
        let map = Value::map(vec![
            (Value::from(1), Value::from("one")),
            (Value::tuple(ints(&[1, 2])), Value::from("pair")),
            (Value::Null, Value::from(false)),
        ]);
        assert_eq!(render(&map), r#"{1: "one", (1, 2): "pair", null: false}"#);
    }

    #[test]
    fn test_pretty_layout() {
        let value = Value::map(vec![
            ("a", Value::list(ints(&[1, 2]))),
            ("b", Value::map::<&str>(Vec::new())),
        ]);
        let config = RenderConfig::builder().indent(Some(2)).build().unwrap();
        assert_eq!(
            render_with(config, &value),
            "{\n  \"a\": [\n    1,\n    2\n  ],\n  \"b\": {}\n}"
        );
    }

    #[test]
    fn test_pretty_record() {
        let value = Value::record("P", vec![("x", Value::from(1))]);
        let config = RenderConfig::builder().indent(Some(4)).build().unwrap();
        assert_eq!(render_with(config, &value), "P(\n    x=1\n)");
    }

    #[test]
    fn test_rshift_compact() {
        let config = RenderConfig::builder().rshift(2).build().unwrap();
        assert_eq!(render_with(config, &Value::list(ints(&[1]))), "  [1]");
    }

    #[test]
    fn test_literal_spellings_and_quotes() {
        let config = RenderConfig::builder()
            .literals(Literals::capitalized())
            .quote_style(QuoteStyle::Single)
            .build()
            .unwrap();
        let value = Value::list(vec![Value::Null, Value::from(true), Value::from("it's")]);
        assert_eq!(render_with(config, &value), r"[None, True, 'it\'s']");
    }

    #[test]
    fn test_string_truncation_suffix() {
        let config = RenderConfig::builder()
            .truncate_string_length(5)
            .build()
            .unwrap();
        assert_eq!(
            render_with(config, &Value::from("abcdefghij")),
            "\"abcde\"...(+5)"
        );
    }

    #[test]
    fn test_exception_and_path_builtins() {
        let error = ErrorValue::new("ValueError", "bad input")
            .with_cause(ErrorValue::new("KeyError", "id"));
        assert_eq!(
            render(&Value::from(error)),
            r#"ValueError(message="bad input", cause=KeyError(message="id"))"#
        );
        assert_eq!(
            render(&Value::from(PathBuf::from(r"logs\app.log"))),
            "\"logs/app.log\""
        );
    }

    #[test]
    fn test_exception_fallback_without_builtins() {
        let error = ErrorValue::new("ValueError", "bad")
            .with_cause(ErrorValue::new("KeyError", "k"));
        let renderer =
            Renderer::with_registry(RenderConfig::default(), Arc::new(CustomizerRegistry::empty()));
        assert_eq!(
            renderer.render(&Value::from(error)),
            r#"ValueError("bad", KeyError("k"))"#
        );
        assert_eq!(
            renderer.render(&Value::from(PathBuf::from("a/b"))),
            "\"a/b\""
        );
    }

    #[test]
    fn test_serializable_values() {
        #[derive(serde::Serialize)]
        struct Job {
            id: u32,
            steps: Vec<&'static str>,
        }
        let job = Job {
            id: 7,
            steps: vec!["fetch", "build"],
        };
        assert_eq!(
            crate::render_serializable(&job, None),
            r#"{"id": 7, "steps": ["fetch", "build"]}"#
        );
    }

    #[test]
    fn test_labels_and_field_names_are_escaped() {
        let record = Value::record("R\nX", vec![("a\nb", Value::from(1))]);
        let text = render(&record);
        assert_eq!(text, r"R\nX(a\nb=1)");
        assert!(!text.contains('\n'));

        let deque = Value::list(ints(&[1])).named("deque\tx");
        assert_eq!(render(&deque), r"deque\tx[1]");

        let error = ErrorValue::new("Bad\nError", "m");
        let renderer =
            Renderer::with_registry(RenderConfig::default(), Arc::new(CustomizerRegistry::empty()));
        assert_eq!(renderer.render(&Value::from(error)), r#"Bad\nError("m")"#);
    }

    #[test]
    fn test_customizer_label_is_escaped() {
        let mut registry = CustomizerRegistry::empty();
        registry.register(
            predicate::type_name("int"),
            |value: &Value, _: &Scope<'_>| Ok(Rendering::labeled("Id\r", value.clone())),
            0,
        );
        let renderer = Renderer::with_registry(RenderConfig::default(), Arc::new(registry));
        assert_eq!(renderer.render(&Value::from(5)), r"Id\r(5)");
    }

    #[test]
    fn test_custom_separators() {
        let config = RenderConfig::builder()
            .separators(";", " => ")
            .build()
            .unwrap();
        let map = Value::map(vec![
            (Value::from("a"), Value::from(1)),
            (Value::tuple(ints(&[1, 2])), Value::list(ints(&[3, 4]))),
        ]);
        assert_eq!(
            render_with(config.clone(), &map),
            r#"{"a" => 1;(1;2) => [3;4]}"#
        );

        let record = Value::record("P", vec![("x", Value::from(1)), ("y", Value::from(2))]);
        assert_eq!(render_with(config, &record), "P(x=1;y=2)");

        let pretty = RenderConfig::builder()
            .indent(Some(2))
            .separators(" ;", ": ")
            .build()
            .unwrap();
        assert_eq!(
            render_with(pretty, &Value::list(ints(&[1, 2]))),
            "[\n  1 ;\n  2\n]"
        );
    }

    #[test]
    fn test_string_bypass() {
        let value = Value::from("line one\nline two");
        assert_eq!(render(&value), r#""line one\nline two""#);

        let config = RenderConfig::builder().string_bypass(true).build().unwrap();
        assert_eq!(render_with(config.clone(), &value), "line one\nline two");
        // Only a top-level string is passed through.
        assert_eq!(
            render_with(config, &Value::list(vec![Value::from("a")])),
            r#"["a"]"#
        );

        let shifted = RenderConfig::builder()
            .string_bypass(true)
            .rshift(2)
            .build()
            .unwrap();
        assert_eq!(render_with(shifted, &Value::from("a\nb")), "  a\n  b");

        let tight = RenderConfig::builder()
            .string_bypass(true)
            .max_total_length(5)
            .build()
            .unwrap();
        assert_eq!(render_with(tight, &Value::from("abcdefgh")), "...");
    }
}

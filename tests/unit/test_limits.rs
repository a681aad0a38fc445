#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use xdumps::{ContainerKind, CustomizerRegistry, RenderConfig, Renderer, Token, Value};

    fn renderer(config: RenderConfig) -> Renderer {
        Renderer::with_registry(config, Arc::new(CustomizerRegistry::new()))
    }

    fn ints(count: i64) -> Value {
        Value::list((0..count).map(Value::from))
    }

    #[test]
    fn test_width_limit_elides_remainder() {
        let config = RenderConfig::builder()
            .max_container_width(10)
            .build()
            .unwrap();
        let tokens = renderer(config).tokenize(&ints(1000)).into_tokens();

        let literals = tokens
            .iter()
            .filter(|token| matches!(token, Token::Literal(_)))
            .count();
        assert_eq!(literals, 10);
        assert_eq!(tokens[11], Token::Elided(990));
        assert_eq!(tokens.len(), 13);
        assert_eq!(
            tokens.last(),
            Some(&Token::CloseContainer(ContainerKind::List))
        );
    }

    #[test]
    fn test_width_limit_text() {
        assert_eq!(
            renderer(RenderConfig::default()).render(&ints(25)),
            "[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, ...(15 more)]"
        );
    }

    #[test]
    fn test_zero_width_elides_everything() {
        let config = RenderConfig::builder()
            .max_container_width(0)
            .build()
            .unwrap();
        assert_eq!(renderer(config).render(&ints(3)), "[...(3 more)]");
    }

    #[test]
    fn test_width_applies_to_mappings_and_records() {
        let config = RenderConfig::builder()
            .max_container_width(2)
            .build()
            .unwrap();
        let map = Value::map(
            ["a", "b", "c", "d"]
                .iter()
                .enumerate()
                .map(|(i, key)| (*key, Value::from(i))),
        );
        let record = Value::record(
            "Wide",
            vec![("x", Value::from(1)), ("y", Value::from(2)), ("z", Value::from(3))],
        );
        let renderer = renderer(config);
        assert_eq!(renderer.render(&map), r#"{"a": 0, "b": 1, ...(2 more)}"#);
        assert_eq!(renderer.render(&record), "Wide(x=1, y=2, ...(1 more))");
    }

    #[test]
    fn test_depth_limit_stops_descent() {
        let mut value = Value::list(Vec::new());
        for _ in 0..20 {
            value = Value::list(vec![value]);
        }
        let config = RenderConfig::builder().max_depth(6).build().unwrap();
        let tokens = renderer(config).tokenize(&value).into_tokens();

        let opens = tokens
            .iter()
            .take_while(|token| matches!(token, Token::OpenContainer { .. }))
            .count();
        assert_eq!(opens, 6);
        assert_eq!(tokens[6], Token::Truncated(0));
        assert!(tokens[7..]
            .iter()
            .all(|token| *token == Token::CloseContainer(ContainerKind::List)));
        assert_eq!(tokens.len(), 13);
    }

    #[test]
    fn test_depth_limit_text() {
        let mut value = Value::from(1);
        for _ in 0..8 {
            value = Value::list(vec![value]);
        }
        assert_eq!(
            renderer(RenderConfig::default()).render(&value),
            "[[[[[[...]]]]]]"
        );
    }

    #[test]
    fn test_budget_cuts_whole_render() {
        let config = RenderConfig::builder()
            .max_total_length(50)
            .max_container_width(100)
            .build()
            .unwrap();
        let value = Value::list((0..100).map(|_| Value::from("abcdefgh")));
        assert_eq!(
            renderer(config).render(&value),
            r#"["abcdefgh", "abcdefgh", "abcdefgh", ...]"#
        );
    }

    #[test]
    fn test_budget_exhaustion_stops_siblings_everywhere() {
        let config = RenderConfig::builder()
            .max_total_length(20)
            .build()
            .unwrap();
        let inner = Value::list((0..8).map(Value::from));
        let outer = Value::list(vec![inner, Value::from("never shown")]);
        let stream = renderer(config).tokenize(&outer);
        assert_eq!(stream.join(), "[[0, 1, 2, 3, ...]]");
        let tokens = stream.into_tokens();

        let cut = tokens
            .iter()
            .filter(|token| **token == Token::Truncated(0))
            .count();
        assert_eq!(cut, 1);
        assert!(!tokens
            .iter()
            .any(|token| *token == Token::Literal("\"never shown\"".into())));
        assert_eq!(
            &tokens[tokens.len() - 2..],
            &[
                Token::CloseContainer(ContainerKind::List),
                Token::CloseContainer(ContainerKind::List),
            ]
        );
    }

    #[test]
    fn test_budget_exhausted_inside_mapping_key() {
        let config = RenderConfig::builder()
            .max_total_length(17)
            .build()
            .unwrap();
        let map = Value::map(vec![
            ("first", Value::from(1)),
            ("a much longer second key", Value::from(2)),
        ]);
        assert_eq!(renderer(config).render(&map), r#"{"first": 1, ...}"#);
    }

    #[test]
    fn test_output_is_bounded_for_huge_input() {
        let rows: Vec<Value> = (0..10_000)
            .map(|i| Value::map(vec![("id", Value::from(i)), ("name", Value::from("row"))]))
            .collect();
        let config = RenderConfig::builder()
            .max_container_width(10_000)
            .max_total_length(1_000)
            .build()
            .unwrap();
        let text = renderer(config).render(&Value::list(rows));
        assert!(text.chars().count() <= 1_000);
        assert!(text.contains("..."));
        assert!(text.ends_with(']'));
    }

    fn nested(levels: usize) -> Value {
        let mut value = Value::from(7);
        for _ in 0..levels {
            value = Value::list(vec![value]);
        }
        value
    }

    fn cyclic_key_map() -> Value {
        let map = Value::map(Vec::<(Value, Value)>::new());
        map.insert(Value::tuple(vec![map.clone(), Value::from("k")]), Value::from(1));
        map.insert("list", ints(6));
        map.insert("self", map.clone());
        map
    }

    #[test]
    fn test_total_length_is_a_hard_cap() {
        let values = vec![
            ints(10),
            nested(5),
            cyclic_key_map(),
            Value::record(
                "Row",
                vec![("name", Value::from("a fairly long name")), ("tags", ints(4))],
            ),
        ];
        let layouts: Vec<(Option<i64>, i64)> =
            vec![(None, 0), (Some(40), 0), (Some(2), 3), (None, 5)];

        for budget in 1..=120usize {
            for (indent, rshift) in &layouts {
                let config = RenderConfig::builder()
                    .max_total_length(budget as i64)
                    .indent(*indent)
                    .rshift(*rshift)
                    .build()
                    .unwrap();
                let renderer = renderer(config);
                for value in &values {
                    let text = renderer.render(value);
                    assert!(
                        text.chars().count() <= budget,
                        "budget {budget}, indent {indent:?}, rshift {rshift}: {text:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_pretty_layout_counts_against_budget() {
        let config = RenderConfig::builder()
            .max_total_length(100)
            .indent(Some(40))
            .build()
            .unwrap();
        let text = renderer(config).render(&ints(10));
        assert!(text.chars().count() <= 100);
        assert!(text.starts_with("[\n"));
        assert!(text.ends_with("...\n]"));
    }

    #[test]
    fn test_tight_budget_keeps_closing_brackets() {
        let config = RenderConfig::builder()
            .max_total_length(12)
            .build()
            .unwrap();
        assert_eq!(renderer(config).render(&nested(5)), "[[[...]]]");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use xdumps::{
        predicate, register_customizer, render_for_diagnostics, unregister_customizer,
        CustomizerRegistry, RenderConfig, Renderer, Rendering, Scope, Value, DEFAULT_PRIORITY,
    };

    fn job(worker: usize, round: usize) -> Value {
        Value::record(
            "Job",
            vec![
                ("worker", Value::from(worker)),
                ("round", Value::from(round)),
                ("token", Value::record("Secret", vec![("key", Value::from("s3cr3t"))])),
            ],
        )
    }

    #[test]
    fn test_shared_registry_across_threads() {
        let mut registry = CustomizerRegistry::new();
        registry.register(
            predicate::type_name("Secret"),
            |_: &Value, _: &Scope<'_>| Ok(Rendering::raw("<hidden>")),
            DEFAULT_PRIORITY,
        );
        let renderer = Renderer::with_registry(RenderConfig::default(), Arc::new(registry));

        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let renderer = renderer.clone();
                thread::spawn(move || {
                    (0..50)
                        .map(|round| renderer.render(&job(worker, round)))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        for (worker, handle) in handles.into_iter().enumerate() {
            let texts = handle.join().unwrap();
            assert_eq!(texts.len(), 50);
            for (round, text) in texts.iter().enumerate() {
                assert_eq!(
                    text,
                    &format!("Job(worker={worker}, round={round}, token=<hidden>)")
                );
            }
        }
    }

    #[test]
    fn test_global_registry_changes_while_rendering() {
        let readers: Vec<_> = (0..4)
            .map(|_| {
                thread::spawn(|| {
                    for _ in 0..200 {
                        let value = Value::record("Flicker", vec![("n", Value::from(1))]);
                        let text = render_for_diagnostics(&value, None);
                        assert!(
                            text == "<flicker>" || text == "Flicker(n=1)",
                            "unexpected rendering {text:?}"
                        );
                    }
                })
            })
            .collect();

        for _ in 0..50 {
            let id = register_customizer(
                predicate::type_name("Flicker"),
                |_: &Value, _: &Scope<'_>| Ok(Rendering::raw("<flicker>")),
                DEFAULT_PRIORITY,
            );
            assert!(unregister_customizer(id));
        }

        for reader in readers {
            reader.join().unwrap();
        }
        let value = Value::record("Flicker", vec![("n", Value::from(1))]);
        assert_eq!(render_for_diagnostics(&value, None), "Flicker(n=1)");
    }
}

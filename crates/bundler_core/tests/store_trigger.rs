use std::thread;

use bundler_core::{Config, Effect, TaskStore};

fn config(max_files: usize) -> Config {
    Config {
        port: "8080".to_string(),
        allowed_extensions: vec!["pdf".to_string()],
        max_files_per_task: max_files,
        max_concurrent_tasks: 8,
    }
}

#[test]
fn threshold_hands_out_exactly_one_run_pipeline_effect() {
    let store = TaskStore::new(config(2));
    let task = store.create_task().unwrap();
    let url_a = "https://files.example.com/a.pdf";
    let url_b = "https://files.example.com/b.pdf";

    let first = store.add_url(&task.id, url_a).unwrap();
    assert_eq!(first, None);

    let second = store.add_url(&task.id, url_b).unwrap();
    assert_eq!(
        second,
        Some(Effect::RunPipeline {
            task_id: task.id.clone(),
            urls: vec![url_a.to_string(), url_b.to_string()],
        })
    );
}

#[test]
fn concurrent_final_appends_trigger_exactly_once() {
    bundler_logging::initialize_for_tests();
    let max_files = 8;
    let store = TaskStore::new(config(max_files));
    let task = store.create_task().unwrap();

    let results: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = (0..max_files)
            .map(|i| {
                let store = &store;
                let id = task.id.clone();
                scope.spawn(move || store.add_url(&id, &format!("https://files.example.com/doc-{i}.pdf")))
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert!(results.iter().all(|r| r.is_ok()));
    let triggers = results
        .iter()
        .filter(|r| matches!(r, Ok(Some(Effect::RunPipeline { .. }))))
        .count();
    assert_eq!(triggers, 1);

    let snapshot = store.get_task(&task.id).unwrap();
    assert_eq!(snapshot.urls.len(), max_files);
}

#[test]
fn tasks_trigger_independently() {
    let store = TaskStore::new(config(1));
    let first = store.create_task().unwrap();
    let second = store.create_task().unwrap();

    let effect_a = store
        .add_url(&first.id, "https://files.example.com/a.pdf")
        .unwrap();
    let effect_b = store
        .add_url(&second.id, "https://files.example.com/b.pdf")
        .unwrap();

    match (effect_a, effect_b) {
        (Some(Effect::RunPipeline { task_id: id_a, .. }), Some(Effect::RunPipeline { task_id: id_b, .. })) => {
            assert_eq!(id_a, first.id);
            assert_eq!(id_b, second.id);
        }
        other => panic!("expected two pipeline hand-offs, got {other:?}"),
    }
}

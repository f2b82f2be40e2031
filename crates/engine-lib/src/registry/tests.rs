//! Scenario tests for the registry
//!
//! These run against real temporary directories so existence checks and
//! file side effects hit the host filesystem.

mod entry_scenarios {
    use crate::error::RegistryError;
    use crate::registry::{normalize_path, Registry};
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn make_dir(temp_dir: &TempDir, name: &str) -> String {
        let path: PathBuf = temp_dir.path().join(name);
        fs::create_dir_all(&path).unwrap();
        normalize_path(&path.to_string_lossy()).unwrap()
    }

    #[test]
    fn test_starts_empty() {
        let registry = Registry::new();
        assert!(registry.is_empty());
        assert!(registry.list_entries().is_empty());
    }

    #[test]
    fn test_add_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let a = make_dir(&temp_dir, "a");
        let mut registry = Registry::new();

        assert!(registry.add_entry(&a).unwrap());
        assert!(!registry.add_entry(&a).unwrap());
        assert!(!registry.add_entry(&format!("{}/", a)).unwrap());

        assert_eq!(registry.list_entries(), vec![a]);
    }

    #[test]
    fn test_add_rejects_empty_and_missing() {
        let temp_dir = TempDir::new().unwrap();
        let mut registry = Registry::new();

        assert!(matches!(
            registry.add_entry(""),
            Err(RegistryError::InvalidPath { .. })
        ));
        let missing = temp_dir.path().join("missing");
        assert!(matches!(
            registry.add_entry(&missing.to_string_lossy()),
            Err(RegistryError::InvalidPath { .. })
        ));
        assert!(registry.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_trailing_space_is_a_distinct_directory() {
        let temp_dir = TempDir::new().unwrap();
        let spaced = make_dir(&temp_dir, "data ");
        let mut registry = Registry::new();

        assert!(spaced.ends_with("data "));
        assert!(registry.add_entry(&spaced).unwrap());
        assert!(matches!(
            registry.add_entry(spaced.trim_end()),
            Err(RegistryError::InvalidPath { .. })
        ));

        let plain = make_dir(&temp_dir, "data");
        assert!(registry.add_entry(&plain).unwrap());
        assert_eq!(registry.list_entries(), vec![spaced, plain]);
    }

    #[test]
    fn test_add_rejects_blank_input() {
        let mut registry = Registry::new();
        assert!(matches!(
            registry.add_entry("  \t"),
            Err(RegistryError::InvalidPath { .. })
        ));
    }

    #[test]
    fn test_add_remove_list_scenario() {
        let temp_dir = TempDir::new().unwrap();
        let a = make_dir(&temp_dir, "a");
        let b = make_dir(&temp_dir, "b");
        let mut registry = Registry::new();

        registry.add_entry(&a).unwrap();
        registry.add_entry(&b).unwrap();
        assert_eq!(registry.list_entries(), vec![a.clone(), b.clone()]);

        let removed = registry.remove_entry(&a).unwrap();
        assert_eq!(removed.path(), a);
        assert_eq!(registry.list_entries(), vec![b]);
    }

    #[test]
    fn test_remove_missing_leaves_list_unchanged() {
        let temp_dir = TempDir::new().unwrap();
        let a = make_dir(&temp_dir, "a");
        let b = make_dir(&temp_dir, "b");
        let mut registry = Registry::new();
        registry.add_entry(&a).unwrap();

        let before = registry.list_entries();
        assert!(matches!(
            registry.remove_entry(&b),
            Err(RegistryError::EntryNotFound(_))
        ));
        assert!(matches!(
            registry.remove_entry(""),
            Err(RegistryError::EntryNotFound(_))
        ));
        assert_eq!(registry.list_entries(), before);
    }

    #[test]
    fn test_remove_does_not_require_directory_to_exist() {
        let temp_dir = TempDir::new().unwrap();
        let a = make_dir(&temp_dir, "a");
        let mut registry = Registry::new();
        registry.add_entry(&a).unwrap();

        fs::remove_dir(&a).unwrap();
        registry.remove_entry(&a).unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_update_keeps_position() {
        let temp_dir = TempDir::new().unwrap();
        let a = make_dir(&temp_dir, "a");
        let b = make_dir(&temp_dir, "b");
        let c = make_dir(&temp_dir, "c");
        let x = make_dir(&temp_dir, "x");
        let mut registry = Registry::new();
        for dir in [&a, &b, &c] {
            registry.add_entry(dir).unwrap();
        }

        registry.update_entry(&b, &x).unwrap();

        assert_eq!(registry.list_entries(), vec![a, x, c]);
        assert!(!registry.contains(&b));
    }

    #[test]
    fn test_update_missing_old_entry() {
        let temp_dir = TempDir::new().unwrap();
        let a = make_dir(&temp_dir, "a");
        let b = make_dir(&temp_dir, "b");
        let mut registry = Registry::new();

        assert!(matches!(
            registry.update_entry(&a, &b),
            Err(RegistryError::EntryNotFound(_))
        ));
    }

    #[test]
    fn test_update_to_invalid_path_keeps_old_entry() {
        let temp_dir = TempDir::new().unwrap();
        let a = make_dir(&temp_dir, "a");
        let mut registry = Registry::new();
        registry.add_entry(&a).unwrap();

        let missing = temp_dir.path().join("missing");
        assert!(matches!(
            registry.update_entry(&a, &missing.to_string_lossy()),
            Err(RegistryError::InvalidPath { .. })
        ));
        assert_eq!(registry.list_entries(), vec![a]);
    }

    #[test]
    fn test_update_to_already_tracked_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let a = make_dir(&temp_dir, "a");
        let b = make_dir(&temp_dir, "b");
        let mut registry = Registry::new();
        registry.add_entry(&a).unwrap();
        registry.add_entry(&b).unwrap();

        assert!(matches!(
            registry.update_entry(&a, &b),
            Err(RegistryError::InvalidPath { .. })
        ));
        assert_eq!(registry.list_entries(), vec![a.clone(), b]);

        // Replacing an entry with itself is a no-op
        registry.update_entry(&a, &a).unwrap();
    }

    #[test]
    fn test_list_is_a_snapshot() {
        let temp_dir = TempDir::new().unwrap();
        let a = make_dir(&temp_dir, "a");
        let b = make_dir(&temp_dir, "b");
        let mut registry = Registry::new();
        registry.add_entry(&a).unwrap();

        let snapshot = registry.list_entries();
        registry.add_entry(&b).unwrap();
        assert_eq!(snapshot, vec![a]);
    }

    #[test]
    fn test_from_persisted_deduplicates() {
        let registry = Registry::from_persisted(vec![
            "/srv/data".to_string(),
            "/srv/data/".to_string(),
            "".to_string(),
            "/srv/logs".to_string(),
        ]);
        assert_eq!(registry.len(), 2);
        assert!(registry.contains("/srv/data"));
        assert!(registry.contains("/srv/logs"));
    }
}

mod run_scenarios {
    use crate::error::{ModelError, RegistryError};
    use crate::models::{FeatureVector, Label, ManagementAction};
    use crate::observability::StructuredLogger;
    use crate::predictor::{bootstrap_samples, PredictiveModel, Predictor};
    use crate::registry::Registry;
    use std::cell::Cell;
    use std::fs;
    use tempfile::TempDir;

    /// Predicts from the name length and counts calls
    struct NameLengthPredictor {
        calls: Cell<usize>,
        fail_after: Option<usize>,
    }

    impl Predictor for NameLengthPredictor {
        fn predict(&self, features: &FeatureVector) -> Result<Label, ModelError> {
            let n = self.calls.get();
            if self.fail_after == Some(n) {
                return Err(ModelError::NotTrained);
            }
            self.calls.set(n + 1);
            Ok(features.values()[0] as Label % 3)
        }

        fn feature_dimensionality(&self) -> Option<usize> {
            Some(2)
        }
    }

    fn registry_with(temp_dir: &TempDir, names: &[&str]) -> Registry {
        let mut registry = Registry::new();
        for name in names {
            let path = temp_dir.path().join(name);
            fs::create_dir_all(&path).unwrap();
            registry.add_entry(&path.to_string_lossy()).unwrap();
        }
        registry
    }

    #[test]
    fn test_run_untrained_model_fails() {
        let temp_dir = TempDir::new().unwrap();
        let registry = registry_with(&temp_dir, &["a"]);
        let model = PredictiveModel::new();

        let result = registry.run(&model, &StructuredLogger::new("test"));
        assert!(matches!(
            result,
            Err(RegistryError::Model(ModelError::NotTrained))
        ));
    }

    #[test]
    fn test_run_maps_labels_to_actions_in_order() {
        let temp_dir = TempDir::new().unwrap();
        let registry = registry_with(&temp_dir, &["abc", "a", "ab"]);
        let predictor = NameLengthPredictor {
            calls: Cell::new(0),
            fail_after: None,
        };

        let outcomes = registry
            .run(&predictor, &StructuredLogger::new("test"))
            .unwrap();

        let actions: Vec<_> = outcomes.iter().map(|o| o.action).collect();
        assert_eq!(
            actions,
            vec![
                ManagementAction::Ignore,
                ManagementAction::Flag,
                ManagementAction::Archive
            ]
        );
        assert_eq!(outcomes[0].entry, registry.list_entries()[0]);
    }

    #[test]
    fn test_run_is_deterministic_and_leaves_entries() {
        let temp_dir = TempDir::new().unwrap();
        let registry = registry_with(&temp_dir, &["alpha", "b", "gamma-ray"]);
        let mut model = PredictiveModel::new();
        model.train(&bootstrap_samples()).unwrap();
        let logger = StructuredLogger::new("test");

        let before = registry.list_entries();
        let first = registry.run(&model, &logger).unwrap();
        let second = registry.run(&model, &logger).unwrap();

        let labels = |o: &[crate::models::RunOutcome]| o.iter().map(|x| x.label).collect::<Vec<_>>();
        assert_eq!(labels(&first), labels(&second));
        assert_eq!(registry.list_entries(), before);
    }

    #[test]
    fn test_run_rejects_model_of_other_width() {
        let temp_dir = TempDir::new().unwrap();
        let registry = registry_with(&temp_dir, &["a"]);
        let mut model = PredictiveModel::new();
        model
            .train(&[crate::models::Sample::new(vec![1.0, 2.0, 3.0], 0)])
            .unwrap();

        let result = registry.run(&model, &StructuredLogger::new("test"));
        assert!(matches!(
            result,
            Err(RegistryError::Model(ModelError::DimensionMismatch {
                expected: 3,
                actual: 2
            }))
        ));
    }

    #[test]
    fn test_run_stops_at_first_failure() {
        let temp_dir = TempDir::new().unwrap();
        let registry = registry_with(&temp_dir, &["a", "b", "c"]);
        let predictor = NameLengthPredictor {
            calls: Cell::new(0),
            fail_after: Some(1),
        };

        let result = registry.run(&predictor, &StructuredLogger::new("test"));
        assert!(result.is_err());
        assert_eq!(predictor.calls.get(), 1);
        assert_eq!(registry.len(), 3);
    }
}

mod file_scenarios {
    use crate::error::RegistryError;
    use crate::registry::{create_file, remove_file};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_create_then_remove_note() {
        let temp_dir = TempDir::new().unwrap();
        let b = temp_dir.path().join("b");
        fs::create_dir_all(&b).unwrap();

        let note = create_file(&b.to_string_lossy(), "note.txt", Some("hello"), false).unwrap();
        assert_eq!(note.file_name().unwrap(), "note.txt");
        assert_eq!(fs::read_to_string(&note).unwrap(), "hello");

        remove_file(&note.to_string_lossy()).unwrap();
        assert!(!note.exists());
        assert!(matches!(
            remove_file(&note.to_string_lossy()),
            Err(RegistryError::FileNotFound(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_padded_name_never_removes_neighbour() {
        let temp_dir = TempDir::new().unwrap();
        let victim = temp_dir.path().join("note.txt");
        fs::write(&victim, "hello").unwrap();

        let result = remove_file(&format!("{} ", victim.to_string_lossy()));
        assert!(matches!(result, Err(RegistryError::FileNotFound(_))));
        assert!(victim.exists());
    }
}

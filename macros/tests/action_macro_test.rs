//! Tests for #[derive(Action)] macro

use todolist_macros::Action;

#[derive(Action, Clone, Debug, PartialEq)]
#[action(slice = "tasks")]
enum TaskAction {
    #[thunk]
    Fetch {
        todolist_id: String,
    },

    #[thunk]
    Remove(String, String),

    #[settled]
    Fetched(Result<Vec<String>, String>),

    #[settled]
    Removed,

    Clear,

    Rename {
        id: String,
        title: String,
    },
}

#[derive(Action, Clone, Debug)]
enum StatusAction {
    #[settled]
    Initialized,
    SetError(Option<String>),
}

#[test]
fn test_is_thunk() {
    let action = TaskAction::Fetch {
        todolist_id: "tl-1".to_string(),
    };
    assert!(action.is_thunk());
    assert!(!action.is_settled());
    assert!(!action.is_transition());

    assert!(TaskAction::Remove("tl-1".into(), "t-1".into()).is_thunk());
}

#[test]
fn test_is_settled() {
    let action = TaskAction::Fetched(Ok(vec!["t-1".to_string()]));
    assert!(!action.is_thunk());
    assert!(action.is_settled());
    assert!(!action.is_transition());

    assert!(TaskAction::Removed.is_settled());
}

#[test]
fn test_unmarked_variants_are_transitions() {
    assert!(TaskAction::Clear.is_transition());

    let action = TaskAction::Rename {
        id: "t-1".to_string(),
        title: "Milk".to_string(),
    };
    assert!(action.is_transition());
    assert!(!action.is_thunk());
}

#[test]
fn test_action_type_uses_slice_prefix() {
    assert_eq!(TaskAction::Clear.action_type(), "tasks/Clear");
    assert_eq!(TaskAction::Fetched(Err("boom".into())).action_type(), "tasks/Fetched");
    assert_eq!(
        TaskAction::Fetch {
            todolist_id: "tl-1".into()
        }
        .action_type(),
        "tasks/Fetch"
    );
}

#[test]
fn test_action_type_defaults_to_enum_name() {
    assert_eq!(StatusAction::Initialized.action_type(), "StatusAction/Initialized");
    assert!(StatusAction::SetError(None).is_transition());
}


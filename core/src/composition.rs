//! Reducer composition utilities
//!
//! The root state tree is built out of independently written feature
//! reducers. [`combine_reducers`] runs each of them, in order, against the
//! same state and action, inside one `reduce` call, so whatever the feature
//! reducers change for one action lands as a single atomic transition.
//!
//! # Examples
//!
//! ```
//! use todolist_core::composition::combine_reducers;
//! use todolist_core::{effect::Effect, reducer::Reducer, SmallVec};
//!
//! #[derive(Clone, Default)]
//! struct RootState {
//!     loading: bool,
//!     titles: Vec<String>,
//! }
//!
//! #[derive(Clone)]
//! enum RootAction {
//!     SetLoading(bool),
//!     AddTitle(String),
//! }
//!
//! struct StatusReducer;
//! struct TitlesReducer;
//!
//! impl Reducer for StatusReducer {
//!     type State = RootState;
//!     type Action = RootAction;
//!     type Environment = ();
//!
//!     fn reduce(&self, state: &mut RootState, action: RootAction, _env: &()) -> SmallVec<[Effect<RootAction>; 4]> {
//!         if let RootAction::SetLoading(loading) = action {
//!             state.loading = loading;
//!         }
//!         SmallVec::new()
//!     }
//! }
//!
//! impl Reducer for TitlesReducer {
//!     type State = RootState;
//!     type Action = RootAction;
//!     type Environment = ();
//!
//!     fn reduce(&self, state: &mut RootState, action: RootAction, _env: &()) -> SmallVec<[Effect<RootAction>; 4]> {
//!         if let RootAction::AddTitle(title) = action {
//!             state.titles.insert(0, title);
//!         }
//!         SmallVec::new()
//!     }
//! }
//!
//! let combined = combine_reducers(vec![Box::new(StatusReducer), Box::new(TitlesReducer)]);
//!
//! let mut state = RootState::default();
//! let _ = combined.reduce(&mut state, RootAction::AddTitle("Groceries".into()), &());
//! let _ = combined.reduce(&mut state, RootAction::SetLoading(true), &());
//! assert!(state.loading);
//! assert_eq!(state.titles, vec!["Groceries".to_string()]);
//! ```

use crate::effect::Effect;
use crate::reducer::Reducer;
use smallvec::SmallVec;

/// A boxed reducer that can be shared with the runtime's effect tasks.
pub type BoxedReducer<S, A, E> =
    Box<dyn Reducer<State = S, Action = A, Environment = E> + Send + Sync>;

/// Combines multiple reducers that operate on the same state and action types.
///
/// Each reducer is run in sequence, and all effects are collected and concatenated.
/// This is how the feature slices are assembled into one root reducer.
///
/// # Type Parameters
///
/// - `S`: The state type
/// - `A`: The action type
/// - `E`: The environment type
#[must_use]
pub fn combine_reducers<S, A, E>(reducers: Vec<BoxedReducer<S, A, E>>) -> CombinedReducer<S, A, E>
where
    S: 'static,
    A: Clone + 'static,
    E: 'static,
{
    CombinedReducer { reducers }
}

/// A combined reducer that runs multiple reducers in sequence.
///
/// Created by [`combine_reducers`].
pub struct CombinedReducer<S, A, E>
where
    S: 'static,
    A: Clone + 'static,
    E: 'static,
{
    reducers: Vec<BoxedReducer<S, A, E>>,
}

impl<S, A, E> CombinedReducer<S, A, E>
where
    S: 'static,
    A: Clone + 'static,
    E: 'static,
{
    /// Number of reducers in this combination
    #[must_use]
    pub fn len(&self) -> usize {
        self.reducers.len()
    }

    /// Returns true if no reducers were combined
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reducers.is_empty()
    }
}

impl<S, A, E> Reducer for CombinedReducer<S, A, E>
where
    S: 'static,
    A: Clone + 'static,
    E: 'static,
{
    type State = S;
    type Action = A;
    type Environment = E;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let mut all_effects = SmallVec::new();

        for reducer in &self.reducers {
            let effects = reducer.reduce(state, action.clone(), env);
            all_effects.extend(effects.into_iter().filter(|e| !e.is_none()));
        }

        all_effects
    }
}

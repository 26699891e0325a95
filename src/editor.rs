//! Application state of the editor page and the submission flow.
//!
//! All mutation happens under the state lock; the lock is released while a
//! request to the solver is in flight. Two overlapping submissions therefore
//! both run to completion and the one that finishes last decides what the
//! page and the storage slots show.

use parking_lot::Mutex;
use simplex_api_sdk::{Operator, ProblemPayload, ProblemType, SimplexError, SolveResponse, SolverResult};
use thiserror::Error;

use crate::domain::form::{self, FieldId, FormModel, RowId, VARIABLE_COUNT_FIELD};
use crate::domain::serialize::{self, SerializeError};
use crate::domain::solver::Solver;
use crate::domain::validate::{self, ValidationError};
use crate::store::{SessionStore, SlotRead};

/// Why a submission did not produce a result
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Serialize(#[from] SerializeError),
    #[error(transparent)]
    Transport(#[from] SimplexError),
}

/// Content of the results region
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ResultsPanel {
    #[default]
    Hidden,
    Solved {
        result: SolverResult,
        inputs: Option<ProblemPayload>,
    },
    /// The payload could not be built or the solver call failed
    Failed { message: String },
    /// Validation stopped the submission
    Invalid { message: String },
}

/// A user action posted from the editor page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorAction {
    /// Apply the variable count input
    SetVariables,
    AddConstraint,
    RemoveConstraint(RowId),
    SetSense(ProblemType),
    Solve,
}

impl EditorAction {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "variables" => Some(EditorAction::SetVariables),
            "add" => Some(EditorAction::AddConstraint),
            "sense:max" => Some(EditorAction::SetSense(ProblemType::Maximization)),
            "sense:min" => Some(EditorAction::SetSense(ProblemType::Minimization)),
            "solve" => Some(EditorAction::Solve),
            other => other
                .strip_prefix("remove:")
                .and_then(|id| id.parse().ok())
                .map(EditorAction::RemoveConstraint),
        }
    }
}

/// Everything the editor page shows
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EditorState {
    pub form: FormModel,
    pub results: ResultsPanel,
    /// Whether the two-variable graph link is shown
    pub graph_offered: bool,
    /// Fields flagged by the last validation
    pub invalid_fields: Vec<FieldId>,
}

impl EditorState {
    /// Rebuild the editor from the storage slots without contacting the solver
    pub fn restore(store: &SessionStore) -> Self {
        let Some(inputs) = store.inputs.load_last() else {
            return Self::default();
        };

        let form = serialize::from_payload(&inputs);
        let (results, graph_offered) = match store.result.read() {
            SlotRead::Present(result) => {
                let graph = inputs.is_two_dimensional();
                (
                    ResultsPanel::Solved {
                        result,
                        inputs: Some(inputs),
                    },
                    graph,
                )
            }
            SlotRead::Absent | SlotRead::Corrupt => (ResultsPanel::Hidden, false),
        };

        log::info!(
            "Restored a problem with {} variable(s) and {} constraint(s)",
            form.variable_count(),
            form.constraints().len()
        );

        EditorState {
            form,
            results,
            graph_offered,
            invalid_fields: Vec::new(),
        }
    }

    /// Apply the variable count input; a regeneration hides results and the graph link
    pub fn set_variable_count(&mut self, raw: &str) -> bool {
        let regenerated = self.form.set_variable_count(raw);
        if regenerated {
            self.results = ResultsPanel::Hidden;
            self.graph_offered = false;
            self.invalid_fields.clear();
        }
        regenerated
    }

    /// Copy posted input values into the form
    ///
    /// A changed variable count is applied first, like a change event firing
    /// before the click that submitted the page; values posted for the
    /// discarded inputs are then ignored.
    pub fn apply_inputs(&mut self, inputs: &[(String, String)]) {
        let count = inputs
            .iter()
            .find(|(name, _)| name == VARIABLE_COUNT_FIELD)
            .map(|(_, value)| value.as_str());
        if let Some(count) = count {
            if count != self.form.variable_count_input() && self.set_variable_count(count) {
                return;
            }
        }

        for (name, value) in inputs {
            if let Ok(field) = name.parse::<FieldId>() {
                if self.form.edit_field(field, value, value.chars().count()).is_none() {
                    log::debug!("Ignoring input for unknown field {}", name);
                }
            } else if let Some(row) = form::parse_operator_field(name) {
                match value.parse::<Operator>() {
                    Ok(operator) => {
                        self.form.set_operator(row, operator);
                    }
                    Err(e) => log::warn!("Ignoring operator for row {}: {}", row, e),
                }
            }
        }
    }

    /// Apply an action that only touches the form
    pub fn apply_action(&mut self, action: EditorAction) {
        match action {
            EditorAction::AddConstraint => {
                self.form.add_constraint_row();
            }
            EditorAction::RemoveConstraint(row) => {
                self.form.remove_constraint_row(row);
            }
            EditorAction::SetSense(sense) => self.form.set_objective_sense(sense),
            // The count arrives with the posted inputs; solving is async.
            EditorAction::SetVariables | EditorAction::Solve => (),
        }
    }

    /// Gate and serialize a submission
    ///
    /// On success the result slot has been cleared and the payload saved as
    /// the last inputs. On failure the results region shows the error.
    pub fn begin_submission(&mut self, store: &SessionStore) -> Result<ProblemPayload, SubmitError> {
        self.invalid_fields.clear();

        if let Err(e) = validate::validate_submission(&self.form) {
            log::info!("Submission blocked: {}", e);
            self.invalid_fields = e.invalid_fields().to_vec();
            self.results = ResultsPanel::Invalid {
                message: e.to_string(),
            };
            return Err(e.into());
        }

        store.result.clear();

        match serialize::to_payload(&self.form) {
            Ok(payload) => {
                store.inputs.save(&payload);
                Ok(payload)
            }
            Err(e) => {
                log::error!("Could not build the problem payload: {}", e);
                self.results = ResultsPanel::Failed {
                    message: e.to_string(),
                };
                Err(e.into())
            }
        }
    }

    /// Record the solver's answer for a submission
    pub fn finish_submission(
        &mut self,
        store: &SessionStore,
        payload: ProblemPayload,
        outcome: Result<SolveResponse, SimplexError>,
    ) -> Result<(), SubmitError> {
        match outcome {
            Ok(response) => {
                if response.result.is_optimal() {
                    store.result.save_raw(&response.body);
                }
                self.graph_offered = payload.is_two_dimensional();
                self.results = ResultsPanel::Solved {
                    result: response.result,
                    inputs: Some(payload),
                };
                Ok(())
            }
            Err(e) => {
                log::error!("Solver request failed: {}", e);
                self.results = ResultsPanel::Failed {
                    message: e.to_string(),
                };
                Err(e.into())
            }
        }
    }
}

/// Validate, persist and solve the problem currently in the editor
///
/// There is no "Calculating…" panel: the posting request waits here until
/// the solver answers and only then redirects, so no page is rendered while
/// the solve is in flight. The results region moves straight from its
/// previous content to the outcome.
pub async fn submit(
    state: &Mutex<EditorState>,
    store: &SessionStore,
    solver: &dyn Solver,
) -> Result<(), SubmitError> {
    let payload = state.lock().begin_submission(store)?;

    log::info!(
        "Solving a {} problem with {} variable(s) via {}",
        payload.problem_type.as_str(),
        payload.num_variables(),
        solver.name()
    );
    let outcome = solver.solve(&payload).await;

    state.lock().finish_submission(store, payload, outcome)
}

/// Fetch the plot of the problem currently in the editor
///
/// `Ok(None)` means the problem does not have exactly two variables, so no
/// plot is offered.
pub async fn fetch_graph(
    state: &Mutex<EditorState>,
    solver: &dyn Solver,
) -> Result<Option<String>, SubmitError> {
    let payload = serialize::to_payload(&state.lock().form)?;
    if !payload.is_two_dimensional() {
        return Ok(None);
    }
    Ok(Some(solver.fetch_graph(&payload).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use simplex_api_sdk::OPTIMAL_STATUS;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeSolver {
        calls: AtomicUsize,
        status: &'static str,
    }

    impl FakeSolver {
        fn new(status: &'static str) -> Self {
            FakeSolver {
                calls: AtomicUsize::new(0),
                status,
            }
        }
    }

    #[async_trait]
    impl Solver for FakeSolver {
        async fn solve(&self, _payload: &ProblemPayload) -> Result<SolveResponse, SimplexError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let body = format!(
                r#"{{"status":"{}","solucion":{{"variables":{{"x1":4,"x2":6}},"valor_optimo":38}},"tablas":[]}}"#,
                self.status
            );
            let result = serde_json::from_str(&body).map_err(|_| SimplexError::SolverRequestFailed {
                status_code: 200,
                raw_body: body.clone(),
            })?;
            Ok(SolveResponse { result, body })
        }

        async fn fetch_graph(&self, _payload: &ProblemPayload) -> Result<String, SimplexError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok("<html></html>".to_string())
        }

        fn name(&self) -> &str {
            "fake"
        }
    }

    fn run<F: std::future::Future>(future: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap()
            .block_on(future)
    }

    #[test]
    fn test_action_parsing() {
        assert_eq!(EditorAction::parse("add"), Some(EditorAction::AddConstraint));
        assert_eq!(
            EditorAction::parse("remove:3"),
            Some(EditorAction::RemoveConstraint("3".parse().unwrap()))
        );
        assert_eq!(
            EditorAction::parse("sense:min"),
            Some(EditorAction::SetSense(ProblemType::Minimization))
        );
        assert_eq!(EditorAction::parse("remove:x"), None);
        assert_eq!(EditorAction::parse("launch"), None);
    }

    #[test]
    fn test_empty_rhs_never_reaches_the_solver() {
        let store = SessionStore::in_memory();
        let mut editor = EditorState::default();
        let row = editor.form.constraints()[0].id();
        editor.apply_inputs(&[(FieldId::Rhs(row).to_string(), String::new())]);
        let state = Mutex::new(editor);
        let solver = FakeSolver::new(OPTIMAL_STATUS);

        let result = run(submit(&state, &store, &solver));

        assert!(matches!(result, Err(SubmitError::Validation(_))));
        assert_eq!(solver.calls.load(Ordering::SeqCst), 0);
        assert!(store.inputs.load_last().is_none());
        let editor = state.lock();
        assert_eq!(editor.invalid_fields, vec![FieldId::Rhs(row)]);
        assert!(matches!(editor.results, ResultsPanel::Invalid { .. }));
    }

    #[test]
    fn test_optimal_submission_is_persisted() {
        let store = SessionStore::in_memory();
        let state = Mutex::new(EditorState::default());
        let solver = FakeSolver::new(OPTIMAL_STATUS);

        run(submit(&state, &store, &solver)).unwrap();

        assert_eq!(solver.calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.inputs.load_last().unwrap().c, vec![1.0, 1.0]);
        assert!(store.result.load_last().unwrap().is_optimal());
        let editor = state.lock();
        assert!(editor.graph_offered);
        assert!(matches!(editor.results, ResultsPanel::Solved { .. }));
    }

    #[test]
    fn test_non_optimal_submission_clears_previous_result() {
        let store = SessionStore::in_memory();
        store.result.save_raw(r#"{"status":"optimo","tablas":[]}"#);
        let state = Mutex::new(EditorState::default());
        let solver = FakeSolver::new("infactible");

        run(submit(&state, &store, &solver)).unwrap();

        assert!(store.result.load_last().is_none());
        assert!(store.inputs.load_last().is_some());
    }

    #[test]
    fn test_graph_hidden_for_three_variables() {
        let store = SessionStore::in_memory();
        let mut editor = EditorState::default();
        editor.set_variable_count("3");
        let state = Mutex::new(editor);
        let solver = FakeSolver::new(OPTIMAL_STATUS);

        run(submit(&state, &store, &solver)).unwrap();
        assert!(!state.lock().graph_offered);
        assert_eq!(run(fetch_graph(&state, &solver)).unwrap(), None);

        state.lock().set_variable_count("2");
        run(submit(&state, &store, &solver)).unwrap();
        assert!(state.lock().graph_offered);
        assert!(run(fetch_graph(&state, &solver)).unwrap().is_some());
    }

    #[test]
    fn test_count_change_hides_results_and_graph() {
        let mut editor = EditorState {
            graph_offered: true,
            results: ResultsPanel::Failed {
                message: "boom".to_string(),
            },
            ..Default::default()
        };
        editor.set_variable_count("5");
        assert!(!editor.graph_offered);
        assert_eq!(editor.results, ResultsPanel::Hidden);
        assert_eq!(editor.form.variable_count(), 5);
    }

    #[test]
    fn test_posted_count_change_discards_stale_values() {
        let mut editor = EditorState::default();
        editor.apply_inputs(&[
            (VARIABLE_COUNT_FIELD.to_string(), "3".to_string()),
            ("c1".to_string(), "9".to_string()),
        ]);
        assert_eq!(editor.form.variable_count(), 3);
        assert_eq!(editor.form.objective()[0].text(), "1");
    }

    #[test]
    fn test_posted_values_are_sanitized() {
        let mut editor = EditorState::default();
        let row = editor.form.constraints()[0].id();
        editor.apply_inputs(&[
            (VARIABLE_COUNT_FIELD.to_string(), "2".to_string()),
            ("c1".to_string(), "3a".to_string()),
            (form::operator_field(row), ">=".to_string()),
            ("unknown".to_string(), "1".to_string()),
        ]);
        assert_eq!(editor.form.objective()[0].text(), "3");
        assert_eq!(editor.form.constraints()[0].operator(), Operator::GreaterEqual);
    }

    #[test]
    fn test_restore_rebuilds_form_and_result() {
        let store = SessionStore::in_memory();
        let payload = ProblemPayload {
            problem_type: ProblemType::Minimization,
            c: vec![3.0, 5.0],
            li: vec![vec![1.0, 0.0], vec![0.0, 2.0]],
            o: vec![Operator::GreaterEqual, Operator::LessEqual],
            ld: vec![4.0, 12.0],
        };
        store.inputs.save(&payload);
        store.result.save_raw(r#"{"status":"optimo","solucion":{"variables":{"x1":4,"x2":6},"valor_optimo":38},"tablas":[]}"#);

        let editor = EditorState::restore(&store);
        assert_eq!(serialize::to_payload(&editor.form).unwrap(), payload);
        assert!(editor.graph_offered);
        assert!(matches!(editor.results, ResultsPanel::Solved { .. }));
    }

    #[test]
    fn test_restore_with_corrupt_inputs_falls_back_to_default() {
        let store = SessionStore::in_memory();
        store.inputs.save_raw("[1, 2");
        assert_eq!(EditorState::restore(&store), EditorState::default());
    }
}

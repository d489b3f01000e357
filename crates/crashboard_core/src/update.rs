use crate::{AppState, Effect, Key, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let mut effects = Vec::new();
    let changed = match msg {
        Msg::CutoffDateChanged(raw) => state.tasks.set_cutoff(raw),
        Msg::RunTaskClicked(kind) => {
            let before = state.tasks.clone();
            if let Some(effect) = state.tasks.start(kind) {
                effects.push(effect);
            }
            state.tasks != before
        }
        Msg::TaskOutput { kind, text } => state.tasks.append_output(kind, &text),
        Msg::TaskFinished { kind } => state.tasks.finish(kind, None),
        Msg::TaskFailed { kind, message } => state.tasks.finish(kind, Some(&message)),
        Msg::DashboardOpened => match state.dashboard.open() {
            Some(effect) => {
                effects.push(effect);
                true
            }
            None => false,
        },
        Msg::StatisticsLoaded(snapshot) => state.dashboard.loaded(&snapshot),
        Msg::StatisticsFailed(_reason) => state.dashboard.failed(),
        Msg::QueryInputChanged(text) => state.query.set_input(text),
        Msg::QuerySubmitClicked | Msg::QueryKeyPressed(Key::Enter) => {
            if let Some(effect) = state.query.submit() {
                effects.push(effect);
            }
            true
        }
        Msg::QueryAnswered(result) => {
            state.query.answered(&result);
            true
        }
        Msg::QueryFailed(failure) => {
            state.query.failed(&failure);
            true
        }
        Msg::QueryKeyPressed(Key::Other) => false,
    };

    if changed {
        state.mark_dirty();
    }
    (state, effects)
}

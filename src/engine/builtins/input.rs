//! `${input:id}` variables, asking the user through the context's prompter

use crate::config::InputKind;
use crate::engine::context::Context;
use crate::engine::registry::VariableRegistry;
use crate::error::{EvalError, EvalResult};

pub fn register(registry: &mut VariableRegistry) {
    registry.add("input", resolve);
}

fn resolve(ctx: &Context, id: &str) -> EvalResult<String> {
    let task = ctx
        .task
        .as_ref()
        .ok_or_else(|| EvalError::UnknownInput(id.to_string()))?;
    let input = task
        .input(id)
        .ok_or_else(|| EvalError::UnknownInput(id.to_string()))?;
    let prompter = ctx
        .prompter
        .as_ref()
        .ok_or_else(|| EvalError::PromptUnavailable(id.to_string()))?;

    match input.kind {
        InputKind::PromptString => prompter.prompt_text(&task.label, input),
        InputKind::PickString => prompter.pick(&task.label, input),
    }
}

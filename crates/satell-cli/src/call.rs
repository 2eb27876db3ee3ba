//! `call` subcommand handler

use crate::utils::{CallReport, format_result, new_state, parse_arg, to_json};
use satell_core::Value;
use satell_ext::MODULE_NAME;

/// Call `function` from the built-in extension and print its results.
pub fn handle_call(function: &str, args: &[String], typed: bool, json: bool) -> Result<(), String> {
    let mut state = new_state();
    let module = state.require(MODULE_NAME).map_err(|e| e.to_string())?;

    let func = match &module {
        Value::Table(t) => t.borrow().get(function).cloned(),
        _ => None,
    }
    .ok_or_else(|| format!("module '{MODULE_NAME}' has no function '{function}'"))?;

    let args: Vec<Value> = args.iter().map(|a| parse_arg(a, typed)).collect();
    log::debug!("calling {}.{} with {} argument(s)", MODULE_NAME, function, args.len());

    let results = state.pcall(&func, args).map_err(|e| e.to_string())?;

    if json {
        let report = CallReport {
            function: function.to_string(),
            results: results.iter().map(to_json).collect(),
        };
        let text = serde_json::to_string_pretty(&report).map_err(|e| e.to_string())?;
        println!("{text}");
    } else {
        for value in &results {
            println!("{}", format_result(value));
        }
    }
    Ok(())
}

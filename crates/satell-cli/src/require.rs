//! `require` and `list` subcommand handlers

use crate::utils::new_state;
use satell_core::Value;
use satell_ext::MODULE_NAME;

/// Require `module` and print the names it exports.
pub fn handle_require(module: &str, cpath: Option<&str>) -> Result<(), String> {
    let mut state = new_state();
    if let Some(path) = cpath {
        // SAFETY: the user chose this search path explicitly and vouches for
        // the libraries on it.
        unsafe { state.set_cpath(path) };
    }
    log::debug!("native search path: {}", state.cpath());

    let value = state.require(module).map_err(|e| e.to_string())?;
    print_exports(module, &value);
    Ok(())
}

/// List the functions of the built-in extension.
pub fn handle_list() -> Result<(), String> {
    handle_require(MODULE_NAME, None)
}

fn print_exports(module: &str, value: &Value) {
    match value {
        Value::Table(t) => {
            let table = t.borrow();
            for key in table.keys() {
                let kind = table.get(key).map_or("nil", Value::type_name);
                println!("{module}.{key}\t{kind}");
            }
        }
        other => println!("{module} = {other}"),
    }
}

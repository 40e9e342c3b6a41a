// Script templates with `{key}` placeholders. `{{` & `}}` are literal braces.

use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;

use super::SynthInput;
use crate::error::{Error, Result};

lazy_static! {
    static ref PLACEHOLDER: Regex = Regex::new(r"\{\{|\}\}|\{(\w+)\}").unwrap();
}

/// Substitute VALUES into TEMPLATE.
pub fn render(template: &str, values: &HashMap<&str, String>) -> Result<String> {
    let mut acc = String::with_capacity(template.len());
    let mut last = 0;

    for caps in PLACEHOLDER.captures_iter(template) {
        let Some(whole) = caps.get(0) else { continue };
        acc.push_str(&template[last..whole.start()]);
        last = whole.end();

        match (whole.as_str(), caps.get(1)) {
            ("{{", _) => acc.push('{'),
            ("}}", _) => acc.push('}'),
            (_, Some(key)) => match values.get(key.as_str()) {
                Some(v) => acc.push_str(v),
                None => {
                    return Err(Error::Template(format!("unknown placeholder '{}'", whole.as_str())));
                },
            },
            _ => unreachable!(),
        }
    }

    acc.push_str(&template[last..]);
    return Ok(acc);
}

/// Placeholder values for one synthesis run.
pub fn synth_values(input: &SynthInput) -> HashMap<&'static str, String> {
    let mut values = HashMap::new();
    values.insert("proj_name", input.namespace.clone());
    values.insert("user_code", input.user_code.display().to_string());
    values.insert("user_tb", input.user_tb().display().to_string());
    values.insert("top_function", input.top_function.clone());
    values.insert("loop_name", input.loop_name.clone());
    values.insert("unroll_factor", input.factor.to_string());
    values.insert("array_name", input.array_name.clone());
    values
}

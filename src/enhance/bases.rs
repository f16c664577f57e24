use regex_lite::Regex;

use crate::error::EngineError;
use crate::game::{Base, HOME};

const OUTS_ON_BASES: &str =
    "(?:out at|doubled off|picked off and caught stealing|caught stealing|was picked off)";
const LONG_BASE: &str = "(1st|2nd|3rd|home)";

fn base_number(name: &str) -> Option<Base> {
    match name {
        "1st" => Some(1),
        "2nd" => Some(2),
        "3rd" => Some(3),
        "home" => Some(HOME),
        _ => None,
    }
}

/// Base where the runner with this last name was put out, if the text says.
///
/// Recognised forms: "Betts out at 1st", "Betts doubled off 2nd",
/// "Betts caught stealing home", "Betts was picked off 1st",
/// "picks off Mookie Betts at 1st".
pub fn find_out_base(last_name: &str, text: &str) -> Option<Base> {
    let name = regex_lite::escape(last_name);
    let templates = [
        format!("{} {} {}", name, OUTS_ON_BASES, LONG_BASE),
        format!("picks off .* {} at {}", name, LONG_BASE),
    ];
    templates.iter().find_map(|t| {
        let re = Regex::new(t).ok()?;
        let caps = re.captures(text)?;
        base_number(caps.get(1)?.as_str())
    })
}

pub fn find_base_where_out_was_made(last_name: &str, text: &str) -> Result<Base, EngineError> {
    find_out_base(last_name, text).ok_or_else(|| EngineError::BaseNotFound {
        runner: last_name.to_string(),
        text: text.to_string(),
    })
}

use regex_lite::Captures;

/// Fielder names as written in play descriptions → scorecard position digit.
const POSITIONS: &[(&str, &str)] = &[
    ("pitcher", "1"),
    ("catcher", "2"),
    ("1B", "3"),
    ("first baseman", "3"),
    ("2B", "4"),
    ("second baseman", "4"),
    ("3B", "5"),
    ("third baseman", "5"),
    ("SS", "6"),
    ("shortstop", "6"),
    ("left fielder", "7"),
    ("center fielder", "8"),
    ("right fielder", "9"),
    ("fan interference", ""),
];

/// Batted-ball type as it appears on a hit ("on a line drive to ...").
const HIT_BALLS: &[(&str, &str)] = &[
    ("bunt pop", "P"),
    ("pop up", "P"),
    ("line drive", "L"),
    ("fly ball", "F"),
    ("ground ball", "G"),
];

/// Verb used for balls put in play ("grounds into a force out").
const AIR_TYPES: &[(&str, &str)] = &[
    ("ground bunts", "G"),
    ("grounds", "G"),
    ("pops", "P"),
    ("lines", "L"),
    ("flies", "F"),
    ("hit", "H"),
];

const OUT_TYPES: &[(&str, &str)] = &[
    ("pops out", "P"),
    ("flies out", "F"),
    ("lines out", "L"),
    ("grounds out", "G"),
];

const POS: &str = r"(\w+ fielder|\w+ baseman|shortstop|pitcher|catcher|fan interference|1B|2B|3B)";
const ERROR_TYPES: &str = "(?:interference|fielding|missed catch|throwing|reaches on an)";

fn alternation(table: &[(&str, &str)]) -> String {
    let keys: Vec<&str> = table.iter().map(|(k, _)| *k).collect();
    format!("({})", keys.join("|"))
}

fn lookup(table: &[(&str, &'static str)], key: &str) -> Option<&'static str> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

/// Replaces `{POS}`, `{AIR}`, `{OUT}`, `{HIT}` and `{ERR}` with their
/// regex fragments. Each fragment except `{ERR}` is one capture group.
pub fn expand_pattern(pattern: &str) -> String {
    pattern
        .replace("{POS}", POS)
        .replace("{AIR}", &alternation(AIR_TYPES))
        .replace("{OUT}", &alternation(OUT_TYPES))
        .replace("{HIT}", &alternation(HIT_BALLS))
        .replace("{ERR}", ERROR_TYPES)
}

/// Builds a scoring code from a template such as `{air:1}{pos:2}` or
/// `FC{pos:1}`. Returns `None` when a referenced group is missing or holds
/// a phrase with no notation.
pub fn expand_code(template: &str, caps: Option<&Captures<'_>>) -> Option<String> {
    let mut code = String::new();
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        code.push_str(&rest[..open]);
        let close = open + rest[open..].find('}')?;
        let (kind, group) = rest[open + 1..close].split_once(':')?;
        let group: usize = group.parse().ok()?;
        let text = caps?.get(group)?.as_str();
        let table = match kind {
            "pos" => POSITIONS,
            "air" => AIR_TYPES,
            "out" => OUT_TYPES,
            "hit" => HIT_BALLS,
            _ => return None,
        };
        code.push_str(lookup(table, text)?);
        rest = &rest[close + 1..];
    }
    code.push_str(rest);
    Some(code)
}

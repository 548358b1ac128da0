use std::collections::HashMap;

const BUILTIN: &[(&str, &str)] = &[
    ("int", r"\d+"),
    ("integer", r"\d+"),
    ("string", r"\w+"),
    ("float", r"[-+]?[0-9]*\.?[0-9]+"),
    ("bool", "1|0|true|false|yes|no"),
    ("boolean", "1|0|true|false|yes|no"),
];

/// Symbolic placeholder types, e.g. `{id:int}`.
#[derive(Debug, Clone)]
pub struct Wildcards {
    map: HashMap<Box<str>, Box<str>>,
}

impl Default for Wildcards {
    fn default() -> Self {
        Self::new()
    }
}

impl Wildcards {
    pub fn new() -> Self {
        let map = BUILTIN
            .iter()
            .map(|&(name, regex)| (name.into(), regex.into()))
            .collect();
        Self { map }
    }

    /// Adds or replaces an alias.
    pub fn set(&mut self, name: &str, regex: &str) -> &mut Self {
        self.map.insert(name.into(), regex.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.map.get(name).map(|r| &**r)
    }

    /// Returns the alias fragment when `regex` names one, otherwise `regex` itself.
    pub fn resolve<'a>(&'a self, regex: &'a str) -> &'a str {
        self.get(regex).unwrap_or(regex)
    }
}

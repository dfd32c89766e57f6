//! Environment variable overrides.
//!
//! A dotted path maps to an upper-snake-case variable with the `ESIM_`
//! prefix. Paths already rooted at the `esim` section are not prefixed twice:
//!
//! | path                    | variable                     |
//! |-------------------------|------------------------------|
//! | `esim.timeout`          | `ESIM_TIMEOUT`               |
//! | `simulation.output_dir` | `ESIM_SIMULATION_OUTPUT_DIR` |
//!
//! A few paths also accept a shorter legacy name; see [`ENV_ALIASES`].

use std::collections::BTreeMap;

use serde_yaml::Value;

/// Prefix shared by every recognized variable.
pub const ENV_PREFIX: &str = "ESIM";

/// Extra variable names accepted for a path. The canonical name wins when
/// both are set.
pub const ENV_ALIASES: [(&str, &str); 1] = [("simulation.output_dir", "ESIM_OUTPUT_DIR")];

/// Variable name for a dotted configuration path.
pub fn env_var_name(path: &str) -> String {
    let snake = path.replace(['.', '-'], "_").to_ascii_uppercase();
    let rooted = path
        .split('.')
        .next()
        .is_some_and(|first| first.eq_ignore_ascii_case(ENV_PREFIX));

    if rooted {
        snake
    } else {
        format!("{}_{}", ENV_PREFIX, snake)
    }
}

/// Interpret a variable's text as a YAML scalar so `90` is a number and
/// `true` a boolean. Anything that is not a plain scalar stays a string.
pub fn parse_scalar(raw: &str) -> Value {
    if raw.trim().is_empty() {
        return Value::String(raw.to_string());
    }
    match serde_yaml::from_str::<Value>(raw) {
        Ok(value @ (Value::Bool(_) | Value::Number(_) | Value::String(_))) => value,
        _ => Value::String(raw.to_string()),
    }
}

/// Snapshot of the `ESIM_*` variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverrides {
    vars: BTreeMap<String, String>,
}

impl EnvOverrides {
    /// Capture the current process environment.
    pub fn from_process() -> Self {
        Self::from_pairs(std::env::vars())
    }

    /// Build from explicit name/value pairs. Names without the prefix are
    /// ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let prefix = format!("{}_", ENV_PREFIX);
        let vars = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .filter(|(k, _)| k.starts_with(&prefix))
            .collect();
        Self { vars }
    }

    /// Override for a dotted path, if its variable is set.
    pub fn lookup(&self, path: &str) -> Option<Value> {
        let name = env_var_name(path);
        let aliases = ENV_ALIASES
            .iter()
            .filter(|(aliased, _)| *aliased == path)
            .map(|(_, alias)| *alias);

        std::iter::once(name.as_str())
            .chain(aliases)
            .find_map(|var| self.vars.get(var).map(|raw| (var, raw)))
            .map(|(var, raw)| {
                log::debug!("config '{}' overridden by {}", path, var);
                parse_scalar(raw)
            })
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Captured variable names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.vars.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_var_name() {
        assert_eq!(env_var_name("esim.timeout"), "ESIM_TIMEOUT");
        assert_eq!(env_var_name("esim.installation_path"), "ESIM_INSTALLATION_PATH");
        assert_eq!(
            env_var_name("simulation.output_dir"),
            "ESIM_SIMULATION_OUTPUT_DIR"
        );
        assert_eq!(env_var_name("a.b.c"), "ESIM_A_B_C");
    }

    #[test]
    fn test_parse_scalar() {
        assert_eq!(parse_scalar("90"), Value::from(90));
        assert_eq!(parse_scalar("true"), Value::Bool(true));
        assert_eq!(parse_scalar("/custom/esim/path"), Value::from("/custom/esim/path"));
        assert_eq!(parse_scalar("a: b"), Value::from("a: b"));
        assert_eq!(parse_scalar(""), Value::from(""));
    }

    #[test]
    fn test_from_pairs_filters_prefix() {
        let env = EnvOverrides::from_pairs([("ESIM_TIMEOUT", "90"), ("HOME", "/root")]);

        assert_eq!(env.names().collect::<Vec<_>>(), vec!["ESIM_TIMEOUT"]);
        assert_eq!(env.lookup("esim.timeout"), Some(Value::from(90)));
        assert_eq!(env.lookup("esim.ngspice_path"), None);
    }

    #[test]
    fn test_output_dir_alias() {
        let env = EnvOverrides::from_pairs([("ESIM_OUTPUT_DIR", "/tmp/legacy")]);
        assert_eq!(env.lookup("simulation.output_dir"), Some(Value::from("/tmp/legacy")));

        let env = EnvOverrides::from_pairs([
            ("ESIM_OUTPUT_DIR", "/tmp/legacy"),
            ("ESIM_SIMULATION_OUTPUT_DIR", "/tmp/canonical"),
        ]);
        assert_eq!(env.lookup("simulation.output_dir"), Some(Value::from("/tmp/canonical")));
    }
}

//! Page templates rendered once at startup with `minijinja`.
//!
//! Templates named `*.html` are HTML auto-escaped, so caller-supplied text
//! such as page titles cannot inject markup. Server-owned paths are passed
//! through [`trusted_path`] to keep them verbatim.

use minijinja::{Environment, Value};

/// Build an environment holding `templates`, keyed by file name.
pub(crate) fn environment(
    templates: &[(&'static str, &'static str)],
) -> Result<Environment<'static>, minijinja::Error> {
    let mut env = Environment::new();
    for &(name, source) in templates {
        env.add_template(name, source)?;
    }
    Ok(env)
}

/// A path the server itself controls, exempt from auto-escaping.
pub(crate) fn trusted_path(path: &str) -> Value {
    Value::from_safe_string(path.to_owned())
}

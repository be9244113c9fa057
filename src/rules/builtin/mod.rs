mod access_control;
mod auth;
mod injection;
mod misconfig;
mod sensitive_data;
mod ssrf;
mod xss;

use crate::rules::catalog::Rule;
use std::sync::LazyLock;

static ALL_RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    let mut rules = Vec::with_capacity(20);
    rules.extend(injection::rules());
    rules.extend(xss::rules());
    rules.extend(auth::rules());
    rules.extend(sensitive_data::rules());
    rules.extend(access_control::rules());
    rules.extend(misconfig::rules());
    rules.extend(ssrf::rules());
    rules
});

pub fn all_rules() -> &'static [Rule] {
    &ALL_RULES
}

// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Wildcard name patterns
//!
//! Element arguments may contain `*` (any run of characters) and `?` (exactly
//! one character). A pattern argument cannot be looked up directly and forces
//! the resolver into scan mode.

/// Whether `name` contains wildcard characters
pub fn is_pattern(name: &str) -> bool {
    name.contains(['*', '?'])
}

/// Match `text` against a glob `pattern` supporting `*` and `?`
///
/// Iterative with single-star backtracking, linear in practice.
pub fn glob_match(pattern: &str, text: &str) -> bool {
    let pat: Vec<char> = pattern.chars().collect();
    let txt: Vec<char> = text.chars().collect();

    let (mut p, mut t) = (0, 0);
    // (pattern index after the last '*', text index it was tried at)
    let mut backtrack: Option<(usize, usize)> = None;

    while t < txt.len() {
        match pat.get(p) {
            Some('*') => {
                p += 1;
                backtrack = Some((p, t));
            }
            Some(&c) if c == '?' || c == txt[t] => {
                p += 1;
                t += 1;
            }
            _ => match backtrack {
                Some((star_p, star_t)) => {
                    p = star_p;
                    t = star_t + 1;
                    backtrack = Some((star_p, t));
                }
                None => return false,
            },
        }
    }

    pat[p..].iter().all(|&c| c == '*')
}

/// Match an optional scope value against a field
///
/// An absent scope matches everything; a present one is a glob over the
/// field, and a missing field never matches a present scope.
pub fn scope_match(scope: Option<&str>, value: Option<&str>) -> bool {
    match (scope, value) {
        (None, _) => true,
        (Some(_), None) => false,
        (Some(pattern), Some(value)) => glob_match(pattern, value),
    }
}

// Argument Normalizer

use crate::domain::args::Arg;

/// Canonicalize one argument value.
///
/// Symbols become strings; lists and maps are rebuilt with every element
/// (map keys included) normalized; every other value is returned as is.
/// Pure and idempotent: `normalize(&normalize(x)) == normalize(x)`.
///
/// Applied once at enqueue time, and to the expected side of every
/// assertion, so `:test` and `"test"` compare equal after the fact.
pub fn normalize(arg: &Arg) -> Arg {
    match arg {
        Arg::Symbol(name) => Arg::Str(name.clone()),
        Arg::List(items) => Arg::List(normalize_all(items)),
        Arg::Map(entries) => Arg::Map(
            entries
                .iter()
                .map(|(k, v)| (normalize(k), normalize(v)))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Normalize a positional argument list.
pub fn normalize_all(args: &[Arg]) -> Vec<Arg> {
    args.iter().map(normalize).collect()
}

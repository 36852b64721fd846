//! Naming normalization shared by every backend.
//!
//! SDK field names carry a member-scope marker and Hungarian-notation
//! prefixes (`m_ulSteamIDLobby`); consumers see plain snake_case keys
//! (`steam_id_lobby`). Struct names lose their `_t` suffix when they become
//! event names.

/// Member-scope marker stripped from field names.
const SCOPE_MARKER: &str = "m_";

/// Suffix convention of SDK record type names.
const TYPE_SUFFIX: &str = "_t";

/// Hungarian prefixes in match precedence order. The first prefix that
/// matches (and is followed by an upper-case letter) is stripped.
const HUNGARIAN_PREFIXES: &[&str] = &[
    "ppch", "ppsz", "pch", "psz", "pfn", "pfl", "pun", "pub", "pvec", "rgb", "rgf", "rg", "pp",
    "pb", "pn", "pi", "pf", "fl", "un", "ul", "cb", "cch", "cub", "sz", "ch", "fn", "p", "n", "b",
    "e", "i", "c", "f", "h",
];

/// Convert a record field name into a value-map key.
///
/// `m_nLobbiesMatching` -> `lobbies_matching`,
/// `m_ulSteamIDLobby` -> `steam_id_lobby`.
pub fn to_key(field_name: &str) -> String {
    camel_to_snake(strip_hungarian(strip_scope_marker(field_name)))
}

/// Drop the `m_` marker if present.
pub fn strip_scope_marker(name: &str) -> &str {
    name.strip_prefix(SCOPE_MARKER).unwrap_or(name)
}

/// Drop the first matching Hungarian prefix, but only when the remainder
/// starts with an upper-case letter (`bActive` -> `Active`, `ball` stays).
pub fn strip_hungarian(name: &str) -> &str {
    for prefix in HUNGARIAN_PREFIXES {
        if let Some(rest) = name.strip_prefix(prefix)
            && rest.chars().next().is_some_and(|c| c.is_ascii_uppercase())
        {
            return rest;
        }
    }
    name
}

/// PascalCase/camelCase to snake_case.
///
/// A separator goes before an upper-case letter that ends an upper-case run
/// and is followed by a lower-case letter (`IDLobby` -> `ID_Lobby`), and
/// before an upper-case letter that follows a lower-case letter or digit.
pub fn camel_to_snake(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut result = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_ascii_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next = chars.get(i + 1).copied();
            let ends_upper_run =
                prev.is_ascii_uppercase() && next.is_some_and(|n| n.is_ascii_lowercase());
            let after_lower = prev.is_ascii_lowercase() || prev.is_ascii_digit();
            if ends_upper_run || after_lower {
                result.push('_');
            }
        }
        result.push(c.to_ascii_lowercase());
    }
    result
}

/// Struct name without the `_t` suffix.
///
/// `GameOverlayActivated_t` -> `GameOverlayActivated`
pub fn broadcast_name(struct_name: &str) -> &str {
    struct_name.strip_suffix(TYPE_SUFFIX).unwrap_or(struct_name)
}

/// Publish/subscribe event name for a broadcast struct.
pub fn to_event_name(struct_name: &str, prefix: &str) -> String {
    format!("{prefix}{}", broadcast_name(struct_name))
}

/// snake_case identifier for a struct, used in generated function names.
///
/// `LobbyCreated_t` -> `lobby_created`
pub fn struct_ident(struct_name: &str) -> String {
    camel_to_snake(broadcast_name(struct_name)).replace("__", "_")
}

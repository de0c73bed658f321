#![forbid(unsafe_code)]

//! Mode-list parsing: user allow/deny strings into a candidate index set.
//!
//! A mode list is a string of tokens separated by spaces, commas, tabs, or
//! newlines. Each token is a mode name or a group keyword, optionally signed:
//! `+` (or no sign) includes, `-` excludes. Signs may be glued to the name
//! (`-ball`) or stand alone between separators (`- ball`).
//!
//! Tokens apply left to right and later tokens override earlier ones for the
//! same mode, so `all,-ball` is "everything but ball" while `-ball,all` is
//! simply "everything" (the trailing `all` rewrites every slot).
//!
//! # Group keywords
//!
//! | Keyword | Members |
//! |---------|---------|
//! | `all` | every non-meta mode |
//! | `allstable` | `all` minus `UNSTABLE` |
//! | `allstandard` | `allstable` minus `GL` |
//! | `allnice` | `allstandard` minus `CPU_HEAVY` |
//! | `allgl` | only `GL` |
//! | `all3d` | only `USE_3D` |
//! | `allxpm` | only `XPM` |
//! | `allwrite` | only `WRITABLE` |
//! | `allmouse` | only `MOUSE` |
//! | `allautomata` | only `AUTOMATA` |
//! | `allfractal` | only `FRACTAL` |
//! | `allgeometry` | only `GEOMETRY` |
//! | `allspace` | only `SPACE` |
//!
//! Group keywords never touch meta entries; a meta entry (e.g. "blank") can
//! only be enabled by naming it literally.
//!
//! # Failure policy
//!
//! Parsing never fails. Unrecognized tokens get a `warn!` diagnostic and are
//! collected in the outcome for the caller, then ignored. A list that selects
//! nothing at all falls back to every non-meta mode — the scheduler must
//! always end up with a usable, non-empty candidate set.

use lockshuffle_core::mode::{ModeFlags, ModeRegistry};
use tracing::{debug, warn};

/// Result of parsing a mode list against a registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedModeList {
    /// Dense candidate registry indices, in registration order. Never empty
    /// for a non-empty registry.
    pub candidates: Vec<usize>,
    /// Tokens that matched neither a mode name nor a group keyword.
    pub unknown: Vec<String>,
}

/// A token with its effective sign: `true` includes, `false` excludes.
#[derive(Debug, PartialEq, Eq)]
struct SignedToken<'a> {
    include: bool,
    name: &'a str,
}

/// Split the raw list into signed tokens.
///
/// A sign character applies to the next name token and is consumed by it;
/// a name with no preceding sign is included.
fn tokenize(input: &str) -> Vec<SignedToken<'_>> {
    let mut out = Vec::new();
    let mut include = true;
    let mut start = None;

    let mut flush = |start: &mut Option<usize>, include: &mut bool, end: usize| {
        if let Some(s) = start.take() {
            out.push(SignedToken {
                include: *include,
                name: &input[s..end],
            });
            *include = true;
        }
    };

    for (i, ch) in input.char_indices() {
        match ch {
            '+' | '-' => {
                flush(&mut start, &mut include, i);
                include = ch == '+';
            }
            ' ' | ',' | '\t' | '\n' => flush(&mut start, &mut include, i),
            _ => {
                if start.is_none() {
                    start = Some(i);
                }
            }
        }
    }
    flush(&mut start, &mut include, input.len());
    out
}

/// Flag predicate for a group keyword, if the token is one.
///
/// Encoded as (must-have, must-not-have) flag sets; a mode is a member when it
/// is not meta, contains all of the former, and intersects none of the latter.
fn group_filter(token: &str) -> Option<(ModeFlags, ModeFlags)> {
    let none = ModeFlags::empty();
    match token {
        "all" => Some((none, none)),
        "allstable" => Some((none, ModeFlags::UNSTABLE)),
        "allstandard" => Some((none, ModeFlags::UNSTABLE | ModeFlags::GL)),
        "allnice" => Some((
            none,
            ModeFlags::UNSTABLE | ModeFlags::GL | ModeFlags::CPU_HEAVY,
        )),
        "allgl" => Some((ModeFlags::GL, none)),
        "all3d" => Some((ModeFlags::USE_3D, none)),
        "allxpm" => Some((ModeFlags::XPM, none)),
        "allwrite" => Some((ModeFlags::WRITABLE, none)),
        "allmouse" => Some((ModeFlags::MOUSE, none)),
        "allautomata" => Some((ModeFlags::AUTOMATA, none)),
        "allfractal" => Some((ModeFlags::FRACTAL, none)),
        "allgeometry" => Some((ModeFlags::GEOMETRY, none)),
        "allspace" => Some((ModeFlags::SPACE, none)),
        _ => None,
    }
}

/// Parse a mode list into candidate registry indices.
///
/// Pure function of `(registry, input)`: no scheduler state is touched.
pub fn parse_mode_list(registry: &ModeRegistry, input: &str) -> ParsedModeList {
    let mut table = vec![false; registry.len()];
    let mut unknown = Vec::new();

    for token in tokenize(input) {
        if let Some((require, forbid)) = group_filter(token.name) {
            for (i, entry) in registry.iter().enumerate() {
                let flags = entry.flags();
                if !entry.is_meta() && flags.contains(require) && !flags.intersects(forbid) {
                    table[i] = token.include;
                }
            }
        } else if let Some(i) = registry.find(token.name) {
            table[i] = token.include;
        } else {
            warn!(token = token.name, "unrecognized mode in mode list");
            unknown.push(token.name.to_owned());
        }
    }

    let mut candidates: Vec<usize> = (0..registry.len()).filter(|&i| table[i]).collect();
    if candidates.is_empty() {
        // Empty selection is "no restriction", never an error.
        candidates = registry.selectable_indices();
    }
    if candidates.is_empty() {
        // Registry of nothing but meta entries; schedule them anyway rather
        // than hand the picker an empty set.
        candidates = (0..registry.len()).collect();
    }
    debug!(count = candidates.len(), indices = ?candidates, "mode list parsed");

    ParsedModeList {
        candidates,
        unknown,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

// crates/core/src/decode.rs
//! Decoding of Claude Code's encoded project directory names.
//!
//! Claude stores each project's sessions under `~/.claude/projects/<name>`,
//! where `<name>` is the working directory path with `/`, `.` and `_` all
//! replaced by `-` (literal dashes pass through unchanged). The mapping is
//! lossy, so it cannot be inverted syntactically: `-home-user-my-app` could
//! have been `/home/user/my-app`, `/home/user/my.app`, `/home/user/my/app`
//! and so on. This module recovers the most plausible original path by
//! walking the encoded name left to right and probing the filesystem for
//! each candidate interpretation, accepting a candidate only if it names
//! something that actually exists.
//!
//! The decoder is a total function: when nothing on disk matches, it falls
//! back to rejoining the unmatched segments with literal dashes instead of
//! failing. Callers that decode many names (the project listing) share a
//! [`DecodeCache`] so repeated lookups skip the filesystem entirely.

use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// The single character the encoding collapses `/`, `.` and `_` onto.
pub const ENCODED_DELIMITER: char = '-';

/// Default cap on the number of segments in one unmatched run.
///
/// Each run of N segments costs up to 3^(N-1) existence probes, so a
/// pathological name with many consecutive dots/underscores could stall the
/// decoder. Past the cap the run degrades to the literal-dash fallback.
pub const MAX_RUN_SEGMENTS: usize = 8;

/// Filesystem existence oracle used to validate candidate reconstructions.
///
/// Abstracted behind a trait so unit tests can substitute an in-memory set
/// of "existing" paths instead of touching the real filesystem.
pub trait ExistenceOracle {
    /// Whether `path` names an existing filesystem entry. Probe failures
    /// (permission denied, transient I/O errors) read as `false`.
    fn exists(&self, path: &str) -> bool;
}

/// Production oracle backed by the real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsOracle;

impl ExistenceOracle for FsOracle {
    fn exists(&self, path: &str) -> bool {
        Path::new(path).exists()
    }
}

/// Memoized encoded-name → decoded-path mapping.
///
/// Unbounded for the life of the owning process: the filesystem is assumed
/// not to change shape between decodes within a single run. Re-inserting a
/// key is an idempotent overwrite. Not synchronized; callers that decode
/// across threads must guard it themselves.
#[derive(Debug, Default)]
pub struct DecodeCache {
    entries: HashMap<String, String>,
}

impl DecodeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, encoded: &str) -> Option<&str> {
        self.entries.get(encoded).map(String::as_str)
    }

    pub fn put(&mut self, encoded: impl Into<String>, decoded: impl Into<String>) {
        self.entries.insert(encoded.into(), decoded.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Decoder for encoded project directory names.
///
/// Combines a progressive left-to-right scanner with a combinatorial
/// resolver for the runs the scanner cannot disambiguate locally. All
/// existence checks go through the injected oracle.
#[derive(Debug, Clone)]
pub struct PathDecoder<O: ExistenceOracle> {
    oracle: O,
    max_run_segments: usize,
}

impl Default for PathDecoder<FsOracle> {
    fn default() -> Self {
        Self::new(FsOracle)
    }
}

impl<O: ExistenceOracle> PathDecoder<O> {
    pub fn new(oracle: O) -> Self {
        Self {
            oracle,
            max_run_segments: MAX_RUN_SEGMENTS,
        }
    }

    /// Override the unmatched-run cap (mainly for tests).
    pub fn with_max_run_segments(mut self, max: usize) -> Self {
        self.max_run_segments = max;
        self
    }

    /// Decode `encoded` to a filesystem path, consulting `cache` first and
    /// recording the result in it.
    ///
    /// Never fails: a name with no filesystem backing decodes to the
    /// literal-dash fallback, and a name missing the expected leading
    /// delimiter is returned unchanged.
    pub fn decode(&self, cache: &mut DecodeCache, encoded: &str) -> String {
        if let Some(hit) = cache.get(encoded) {
            debug!(encoded, decoded = hit, "decode cache hit");
            return hit.to_string();
        }
        let decoded = self.decode_uncached(encoded);
        cache.put(encoded, decoded.as_str());
        decoded
    }

    /// One full scan of the encoded name, no memoization.
    fn decode_uncached(&self, encoded: &str) -> String {
        let Some(rest) = encoded.strip_prefix(ENCODED_DELIMITER) else {
            // Malformed input (no leading delimiter): treat as already decoded.
            return encoded.to_string();
        };

        let segments: Vec<&str> = rest.split(ENCODED_DELIMITER).collect();
        let last = segments.len() - 1;

        // Path prefix already validated against the oracle. Grows
        // monotonically; every further probe is anchored to it.
        let mut confirmed = String::new();
        // Segments whose internal delimiters are still ambiguous. Empty
        // segments mark two consecutive encoded characters collapsed onto
        // one delimiter (the hidden-entry case).
        let mut pending: Vec<String> = Vec::new();

        for (i, segment) in segments.iter().enumerate() {
            if pending.is_empty() {
                if i == last {
                    // Terminal optimistic acceptance: nothing left to
                    // disambiguate, so the final segment joins unchecked.
                    return join_component(&confirmed, segment);
                }
                if !segment.is_empty() {
                    let candidate = join_component(&confirmed, segment);
                    if self.oracle.exists(&candidate) {
                        // Greedy acceptance: this delimiter is a separator.
                        confirmed = candidate;
                        continue;
                    }
                }
                pending.push((*segment).to_string());
            } else {
                pending.push((*segment).to_string());
                if pending.len() <= self.max_run_segments {
                    if let Some(resolved) = self.resolve_run(&confirmed, &pending) {
                        confirmed = resolved;
                        pending.clear();
                    }
                }
            }
        }

        if pending.is_empty() {
            return confirmed;
        }

        // Best-effort fallback: nothing on disk matched the trailing run,
        // so rejoin it with literal dashes.
        debug!(encoded, "no filesystem match for trailing run; using literal fallback");
        join_component(&confirmed, &pending.join("-"))
    }

    /// Find the first interpretation of `run` that exists under `confirmed`.
    ///
    /// Each internal join position tries the three characters the encoding
    /// collapses into a dash, in fixed priority: literal `-`, then `.`,
    /// then `_`, with the leftmost position varying slowest. A leading
    /// empty segment means the original had two consecutive encoded
    /// characters; the second of the pair is tried as `.` (hidden entry),
    /// `_`, then literal `-`, prepended to the following segment.
    fn resolve_run(&self, confirmed: &str, run: &[String]) -> Option<String> {
        match run {
            [] => None,
            [only] => {
                let candidate = join_component(confirmed, only);
                self.oracle.exists(&candidate).then_some(candidate)
            }
            [first, second, rest @ ..] if first.is_empty() => {
                for ch in ['.', '_', ENCODED_DELIMITER] {
                    let mut merged = Vec::with_capacity(run.len() - 1);
                    merged.push(format!("{ch}{second}"));
                    merged.extend(rest.iter().cloned());
                    if let Some(hit) = self.resolve_run(confirmed, &merged) {
                        return Some(hit);
                    }
                }
                None
            }
            [first, second, rest @ ..] => {
                for ch in [ENCODED_DELIMITER, '.', '_'] {
                    let mut merged = Vec::with_capacity(run.len() - 1);
                    merged.push(format!("{first}{ch}{second}"));
                    merged.extend(rest.iter().cloned());
                    if let Some(hit) = self.resolve_run(confirmed, &merged) {
                        return Some(hit);
                    }
                }
                None
            }
        }
    }
}

/// Join a path component onto a base with exactly one separator.
///
/// An empty component returns the base unchanged (root when the base is
/// also empty), so the result never contains a doubled separator.
fn join_component(base: &str, component: &str) -> String {
    if component.is_empty() {
        if base.is_empty() {
            return "/".to_string();
        }
        return base.to_string();
    }
    format!("{}/{}", base.trim_end_matches('/'), component)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashSet;

    /// In-memory oracle: a fixed set of "existing" paths.
    struct SetOracle(HashSet<String>);

    impl SetOracle {
        fn new(paths: &[&str]) -> Self {
            Self(paths.iter().map(|p| p.to_string()).collect())
        }
    }

    impl ExistenceOracle for SetOracle {
        fn exists(&self, path: &str) -> bool {
            self.0.contains(path)
        }
    }

    /// Oracle wrapper that counts probes (for the cache tests).
    struct CountingOracle {
        inner: SetOracle,
        probes: RefCell<usize>,
    }

    impl ExistenceOracle for CountingOracle {
        fn exists(&self, path: &str) -> bool {
            *self.probes.borrow_mut() += 1;
            self.inner.exists(path)
        }
    }

    /// Oracle that believes every prefix of the given paths exists, the way
    /// a real filesystem would.
    fn fs_like(paths: &[&str]) -> SetOracle {
        let mut all = HashSet::new();
        for path in paths {
            let mut prefix = String::new();
            for part in path.split('/').filter(|p| !p.is_empty()) {
                prefix.push('/');
                prefix.push_str(part);
                all.insert(prefix.clone());
            }
        }
        SetOracle(all)
    }

    fn decode(oracle: SetOracle, encoded: &str) -> String {
        let mut cache = DecodeCache::new();
        PathDecoder::new(oracle).decode(&mut cache, encoded)
    }

    // ============================================================================
    // Scanner: greedy walk
    // ============================================================================

    #[test]
    fn test_decode_simple_path() {
        let oracle = fs_like(&["/home/user/projects/myapp"]);
        assert_eq!(
            decode(oracle, "-home-user-projects-myapp"),
            "/home/user/projects/myapp"
        );
    }

    #[test]
    fn test_decode_terminal_segment_accepted_without_probe() {
        // Only /home/user exists; the final segment joins optimistically.
        let oracle = fs_like(&["/home/user"]);
        assert_eq!(decode(oracle, "-home-user-newdir"), "/home/user/newdir");
    }

    #[test]
    fn test_decode_without_leading_delimiter_returned_unchanged() {
        let oracle = fs_like(&["/home"]);
        assert_eq!(decode(oracle, "home-user-x"), "home-user-x");
    }

    #[test]
    fn test_decode_empty_string() {
        let oracle = SetOracle::new(&[]);
        assert_eq!(decode(oracle, ""), "");
    }

    #[test]
    fn test_decode_bare_delimiter() {
        let oracle = SetOracle::new(&[]);
        assert_eq!(decode(oracle, "-"), "/");
    }

    // ============================================================================
    // Resolver: ambiguous runs
    // ============================================================================

    #[test]
    fn test_decode_dotted_project_name() {
        let oracle = fs_like(&["/home/user/projects/plugin.nvim"]);
        assert_eq!(
            decode(oracle, "-home-user-projects-plugin-nvim"),
            "/home/user/projects/plugin.nvim"
        );
    }

    #[test]
    fn test_decode_underscored_project_name() {
        let oracle = fs_like(&["/home/user/my_awesome_project"]);
        assert_eq!(
            decode(oracle, "-home-user-my-awesome-project"),
            "/home/user/my_awesome_project"
        );
    }

    #[test]
    fn test_decode_dashed_project_name() {
        let oracle = fs_like(&["/home/user/projects/data-analytics"]);
        assert_eq!(
            decode(oracle, "-home-user-projects-data-analytics"),
            "/home/user/projects/data-analytics"
        );
    }

    #[test]
    fn test_decode_mixed_run() {
        // One run needing a dot and an underscore at different positions.
        let oracle = fs_like(&["/srv/app.v2_final"]);
        assert_eq!(decode(oracle, "-srv-app-v2-final"), "/srv/app.v2_final");
    }

    #[test]
    fn test_decode_run_resolved_midway_resumes_greedy_walk() {
        // The run over "plugin-nvim" resolves to plugin.nvim, after which
        // the scanner resumes greedy acceptance for "lua".
        let oracle = fs_like(&["/home/user/plugin.nvim/lua"]);
        assert_eq!(
            decode(oracle, "-home-user-plugin-nvim-lua"),
            "/home/user/plugin.nvim/lua"
        );
    }

    #[test]
    fn test_decode_ambiguity_prefers_dash_over_dot() {
        let mut oracle = fs_like(&["/home/user/my-app"]);
        oracle.0.insert("/home/user/my.app".to_string());
        assert_eq!(decode(oracle, "-home-user-my-app"), "/home/user/my-app");
    }

    #[test]
    fn test_decode_ambiguity_prefers_dot_over_underscore() {
        let mut oracle = fs_like(&["/home/user/my.app"]);
        oracle.0.insert("/home/user/my_app".to_string());
        assert_eq!(decode(oracle, "-home-user-my-app"), "/home/user/my.app");
    }

    #[test]
    fn test_decode_greedy_separator_wins_over_literal_dash() {
        // Both /home/user/test/app and /home/user/test-app exist: the
        // scanner confirms /home/user/test greedily before the resolver
        // ever sees a run, so the separator reading wins deterministically.
        let mut oracle = fs_like(&["/home/user/test/app"]);
        oracle.0.insert("/home/user/test-app".to_string());
        assert_eq!(decode(oracle, "-home-user-test-app"), "/home/user/test/app");
    }

    // ============================================================================
    // Hidden-entry special case (consecutive delimiters)
    // ============================================================================

    #[test]
    fn test_decode_hidden_directory() {
        let oracle = fs_like(&["/home/user/.config"]);
        assert_eq!(decode(oracle, "-home-user--config"), "/home/user/.config");
    }

    #[test]
    fn test_decode_hidden_directory_with_suffix() {
        let oracle = fs_like(&["/home/user/.config/app"]);
        assert_eq!(
            decode(oracle, "-home-user--config-app"),
            "/home/user/.config/app"
        );
    }

    #[test]
    fn test_decode_hidden_entry_priority_dot_before_underscore() {
        let mut oracle = fs_like(&["/home/user/.config"]);
        oracle.0.insert("/home/user/_config".to_string());
        assert_eq!(decode(oracle, "-home-user--config"), "/home/user/.config");
    }

    #[test]
    fn test_decode_underscore_prefixed_entry() {
        let oracle = fs_like(&["/home/user/_build"]);
        assert_eq!(decode(oracle, "-home-user--build"), "/home/user/_build");
    }

    #[test]
    fn test_decode_triple_delimiter_resolves_through_recursion() {
        // "..config" needs two consecutive resolved characters; the leading
        // empty segments recurse: '.' + (empty second segment) then '.' again.
        let oracle = fs_like(&["/home/user/..config"]);
        assert_eq!(decode(oracle, "-home-user---config"), "/home/user/..config");
    }

    #[test]
    fn test_decode_git_worktree_path() {
        let oracle = fs_like(&[
            "/home/user/projects/myapp/.git/worktrees/workspace-feat-1751800909-a0c4a922/worktree",
        ]);
        assert_eq!(
            decode(
                oracle,
                "-home-user-projects-myapp--git-worktrees-workspace-feat-1751800909-a0c4a922-worktree"
            ),
            "/home/user/projects/myapp/.git/worktrees/workspace-feat-1751800909-a0c4a922/worktree"
        );
    }

    // ============================================================================
    // Fallback and degradation
    // ============================================================================

    #[test]
    fn test_decode_no_backing_falls_back_to_literal() {
        let oracle = SetOracle::new(&[]);
        assert_eq!(decode(oracle, "-totally-fake-path"), "/totally-fake-path");
    }

    #[test]
    fn test_decode_partial_match_keeps_confirmed_prefix() {
        let oracle = fs_like(&["/home/user"]);
        assert_eq!(
            decode(oracle, "-home-user-ghost-proj-x"),
            "/home/user/ghost-proj-x"
        );
    }

    #[test]
    fn test_decode_never_produces_double_separator() {
        let inputs = ["-a--b--c", "---", "-a-b-", "--", "-home--user---x-"];
        for input in inputs {
            let oracle = SetOracle::new(&[]);
            let decoded = decode(oracle, input);
            assert!(
                !decoded.contains("//"),
                "double separator in {decoded:?} (from {input:?})"
            );
        }
    }

    #[test]
    fn test_decode_run_cap_degrades_to_literal() {
        let oracle = fs_like(&["/a/x.y_z.w"]);
        let decoder = PathDecoder::new(oracle).with_max_run_segments(2);
        let mut cache = DecodeCache::new();
        // Needs a 4-segment run; over the cap the resolver is skipped.
        assert_eq!(decoder.decode(&mut cache, "-a-x-y-z-w"), "/a/x-y-z-w");
    }

    #[test]
    fn test_decode_run_within_default_cap_resolves() {
        let oracle = fs_like(&["/a/x.y_z.w"]);
        let decoder = PathDecoder::new(oracle);
        let mut cache = DecodeCache::new();
        assert_eq!(decoder.decode(&mut cache, "-a-x-y-z-w"), "/a/x.y_z.w");
    }

    // ============================================================================
    // Cache
    // ============================================================================

    #[test]
    fn test_decode_second_call_served_from_cache() {
        let oracle = CountingOracle {
            inner: fs_like(&["/home/user/projects/myapp"]),
            probes: RefCell::new(0),
        };
        let decoder = PathDecoder::new(oracle);
        let mut cache = DecodeCache::new();

        let first = decoder.decode(&mut cache, "-home-user-projects-myapp");
        let probes_after_first = *decoder.oracle.probes.borrow();
        assert!(probes_after_first > 0);

        let second = decoder.decode(&mut cache, "-home-user-projects-myapp");
        assert_eq!(first, second);
        assert_eq!(
            *decoder.oracle.probes.borrow(),
            probes_after_first,
            "cache hit must perform zero filesystem probes"
        );
    }

    #[test]
    fn test_decode_inserts_cache_entry_even_for_fallback() {
        let decoder = PathDecoder::new(SetOracle::new(&[]));
        let mut cache = DecodeCache::new();
        decoder.decode(&mut cache, "-no-such-thing");
        assert_eq!(cache.get("-no-such-thing"), Some("/no-such-thing"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_put_is_idempotent_overwrite() {
        let mut cache = DecodeCache::new();
        cache.put("-x", "/x");
        cache.put("-x", "/x");
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("-x"), Some("/x"));
    }

    // ============================================================================
    // Join primitive
    // ============================================================================

    #[test]
    fn test_join_component_exactly_one_separator() {
        assert_eq!(join_component("", "home"), "/home");
        assert_eq!(join_component("/", "home"), "/home");
        assert_eq!(join_component("/home", "user"), "/home/user");
    }

    #[test]
    fn test_join_component_empty_component_returns_base() {
        assert_eq!(join_component("/home/user", ""), "/home/user");
        assert_eq!(join_component("", ""), "/");
    }
}
